use std::{
    io::{BufRead, Write},
    path::PathBuf,
};

use clap::Parser;
use nr_core::{image::Renderer, Complex, RasterProducer, RootBasins, RootedPolynomial, Size, Viewport};
use nr_render::{FailurePolicy, NewtonParams, NewtonProducer, Partition, Partitioner};
use tracing_subscriber::EnvFilter;

/// Renders the Newton-Raphson basins of a polynomial given by its roots.
///
/// Roots are read from standard input, one per line, e.g. `1`, `-i`, `0.5 - i2`.
/// Enter `done` to finish.
#[derive(Debug, Parser)]
struct Args {
    /// Where to write the PNG image.
    output: PathBuf,

    #[arg(long, default_value_t = 800)]
    width: usize,
    #[arg(long, default_value_t = 800)]
    height: usize,

    #[arg(long, default_value_t = -2.0, allow_hyphen_values = true)]
    re_min: f64,
    #[arg(long, default_value_t = 2.0, allow_hyphen_values = true)]
    re_max: f64,
    #[arg(long, default_value_t = -2.0, allow_hyphen_values = true)]
    im_min: f64,
    #[arg(long, default_value_t = 2.0, allow_hyphen_values = true)]
    im_max: f64,

    #[arg(long, default_value_t = NewtonParams::default().convergence_threshold)]
    convergence_threshold: f64,
    #[arg(long, default_value_t = NewtonParams::default().root_threshold)]
    root_threshold: f64,
    #[arg(long, default_value_t = NewtonParams::default().max_iterations)]
    max_iterations: usize,

    /// Worker threads; defaults to one per CPU.
    #[arg(long)]
    threads: Option<usize>,

    /// Deliver the image even if some lanes failed.
    #[arg(long)]
    best_effort: bool,
}

const DONE: &str = "done";

/// Reads roots until `done` or end of input. Lines that do not parse are reported and skipped.
fn read_roots(input: impl BufRead, mut prompt: impl Write) -> std::io::Result<Vec<Complex>> {
    writeln!(
        prompt,
        "Welcome to the Newton-Raphson iteration-based fractal renderer."
    )?;
    writeln!(
        prompt,
        "Please enter at least one root, one root per line. Enter '{}' when done.",
        DONE
    )?;

    let mut roots = Vec::new();
    let mut lines = input.lines();
    loop {
        write!(prompt, "Root {}> ", roots.len() + 1)?;
        prompt.flush()?;
        let Some(line) = lines.next().transpose()? else {
            break;
        };
        let line = line.trim();
        if line.eq_ignore_ascii_case(DONE) {
            if roots.is_empty() {
                tracing::error!("at least one root is required");
                continue;
            }
            break;
        }
        match Complex::parse(line) {
            Ok(root) => {
                tracing::debug!("root {}: {}", roots.len() + 1, root);
                roots.push(root);
            }
            Err(e) => tracing::error!("could not parse {:?}: {}", line, e),
        }
    }
    Ok(roots)
}

fn main() -> Result<(), String> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let args = Args::parse();

    let roots = read_roots(std::io::stdin().lock(), std::io::stdout())
        .map_err(|e| format!("error reading roots: {}", e))?;
    let polynomial = RootedPolynomial::new(roots).map_err(|e| e.to_string())?;
    tracing::info!("{}", polynomial);
    tracing::info!("{}", polynomial.to_coefficient_form());

    let policy = if args.best_effort {
        FailurePolicy::BestEffort
    } else {
        FailurePolicy::FailFast
    };
    let threads = args.threads.unwrap_or_else(num_cpus::get);
    let partitioner = Partitioner::with_threads(Partition::DEFAULT_LANES, threads, policy)
        .map_err(|e| e.to_string())?;
    let params = NewtonParams {
        convergence_threshold: args.convergence_threshold,
        root_threshold: args.root_threshold,
        max_iterations: args.max_iterations,
    };
    let producer =
        NewtonProducer::with_options(polynomial, params, partitioner).map_err(|e| e.to_string())?;

    let viewport = Viewport::new(args.re_min, args.re_max, args.im_min, args.im_max);
    let mut sink: Option<(RootBasins, u64)> = None;
    producer
        .produce(&viewport, Size::new(args.width, args.height), 1, &mut sink)
        .map_err(|e| e.to_string())?;
    let (basins, _) = sink.ok_or_else(|| "renderer produced no result".to_string())?;

    let img = Renderer::default().render_basins(&basins)?;
    img.save_with_format(&args.output, image::ImageFormat::Png)
        .map_err(|e| format!("error writing {}: {}", args.output.display(), e))?;
    tracing::info!("wrote {}", args.output.display());
    Ok(())
}
