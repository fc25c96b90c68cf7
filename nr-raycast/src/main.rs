use std::path::PathBuf;

use clap::Parser;
use nr_core::{
    geometry::{Camera, LightSource, Material, Scene, Sphere},
    image::Renderer,
    GeometryError, RasterProducer, RgbBuffers, Size, Vector3,
};
use nr_render::{FailurePolicy, Partition, Partitioner, RayCaster};
use tracing_subscriber::EnvFilter;

/// Ray-casts a fixed demo scene of spheres and writes it as a PNG.
#[derive(Debug, Parser)]
struct Args {
    /// Where to write the PNG image.
    output: PathBuf,

    #[arg(long, default_value_t = 800)]
    width: usize,
    #[arg(long, default_value_t = 800)]
    height: usize,

    /// Split rows across threads by fork-join instead of rendering on one thread.
    #[arg(long)]
    parallel: bool,

    /// Worker threads for --parallel; defaults to one per CPU.
    #[arg(long)]
    threads: Option<usize>,

    /// Deliver the image even if some rows failed to render.
    #[arg(long)]
    best_effort: bool,
}

/// The demo scene: a large sphere flanked by smaller ones, lit from two sides.
fn predefined_scene() -> Result<Scene, GeometryError> {
    let matte = |r, g, b| Material {
        diffuse: [r, g, b],
        reflective: [0.2, 0.2, 0.2],
        shininess: 5.0,
    };
    let glossy = |r, g, b| Material {
        diffuse: [r, g, b],
        reflective: [0.8, 0.8, 0.8],
        shininess: 50.0,
    };
    Ok(Scene::new()
        .with_object(Sphere::new(Vector3::new(0.0, 0.0, 0.0), 2.0, matte(1.0, 1.0, 1.0))?)
        .with_object(Sphere::new(Vector3::new(1.0, 3.5, 2.5), 1.2, glossy(1.0, 0.3, 0.3))?)
        .with_object(Sphere::new(Vector3::new(1.5, -3.0, -1.0), 1.5, glossy(0.3, 0.3, 1.0))?)
        .with_object(Sphere::new(Vector3::new(-6.0, 5.0, -4.0), 3.0, matte(0.3, 1.0, 0.3))?)
        .with_object(Sphere::new(Vector3::new(-2.0, -6.5, 4.0), 1.0, glossy(1.0, 1.0, 0.2))?)
        .with_light(LightSource::new(Vector3::new(10.0, 5.0, 5.0), 100.0, 100.0, 100.0))
        .with_light(LightSource::new(Vector3::new(2.0, 50.0, 50.0), 50.0, 50.0, 50.0))
        .with_light(LightSource::new(Vector3::new(8.0, -10.0, -3.0), 60.0, 40.0, 100.0)))
}

fn default_camera() -> Camera {
    Camera {
        eye: Vector3::new(10.0, 0.0, 0.0),
        view: Vector3::new(0.0, 0.0, 0.0),
        view_up: Vector3::new(0.0, 0.0, 10.0),
        horizontal: 20.0,
        vertical: 20.0,
    }
}

fn main() -> Result<(), String> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let args = Args::parse();

    let scene = predefined_scene().map_err(|e| e.to_string())?;
    let policy = if args.best_effort {
        FailurePolicy::BestEffort
    } else {
        FailurePolicy::FailFast
    };
    let partitioner = if args.parallel {
        let threads = args.threads.unwrap_or_else(num_cpus::get);
        Partitioner::with_threads(Partition::DEFAULT_FORK_JOIN, threads, policy)
    } else {
        Partitioner::with_threads(Partition::Sequential, 1, policy)
    }
    .map_err(|e| e.to_string())?;
    let caster = RayCaster::with_partitioner(scene, partitioner);

    let mut sink: Option<(RgbBuffers, u64)> = None;
    caster
        .produce(
            &default_camera(),
            Size::new(args.width, args.height),
            1,
            &mut sink,
        )
        .map_err(|e| e.to_string())?;
    let (buffers, _) = sink.ok_or_else(|| "renderer produced no result".to_string())?;

    let img = Renderer::default().render_rgb(&buffers)?;
    img.save_with_format(&args.output, image::ImageFormat::Png)
        .map_err(|e| format!("error writing {}: {}", args.output.display(), e))?;
    tracing::info!("wrote {}", args.output.display());
    Ok(())
}
