//! Local illumination for the ray caster.
//!
//! A pixel is ambient light plus, for every light that can see the surface point, a diffuse
//! and a reflective (specular) term. There is no recursion: reflections and refractions of
//! other objects are not traced.

use std::cmp::Ordering;

use crate::{
    geometry::{Intersection, LightSource, Ray, Scene},
    tolerance::{approx_cmp, approx_eq},
    ArithmeticError,
};

/// Light every visible surface receives, per channel.
pub const AMBIENT: f64 = 15.0;

/// Color seen along `ray`, each channel clamped to `[0, 255]`.
///
/// Rays that hit nothing are black.
pub fn trace(scene: &Scene, ray: &Ray) -> Result<[u8; 3], ArithmeticError> {
    let Some(hit) = scene.closest_intersection(ray)? else {
        return Ok([0, 0, 0]);
    };

    let mut rgb = [AMBIENT; 3];
    for light in &scene.lights {
        illuminate(scene, ray, &hit, light, &mut rgb)?;
    }
    Ok(rgb.map(|channel| channel.clamp(0.0, 255.0) as u8))
}

/// Adds the contribution of `light` at `hit`, unless something is in the way.
fn illuminate(
    scene: &Scene,
    eye_ray: &Ray,
    hit: &Intersection,
    light: &LightSource,
    rgb: &mut [f64; 3],
) -> Result<(), ArithmeticError> {
    let light_distance = (hit.point - light.position).norm();
    if approx_eq(light_distance, 0.0) {
        return Ok(());
    }

    let light_ray = Ray::from_points(light.position, hit.point)?;
    if let Some(blocker) = scene.closest_intersection(&light_ray)? {
        if approx_cmp(blocker.distance, light_distance) == Ordering::Less {
            return Ok(());
        }
    }

    let normal = hit.normal;
    let light_dir = light_ray.direction;
    let diffuse = light_dir.dot(normal).abs();
    let reflected = normal * (2.0 * normal.dot(light_dir)) - light_dir;
    let reflective = reflected
        .dot(eye_ray.direction)
        .abs()
        .powf(hit.material.shininess);

    let material = &hit.material;
    for channel in 0..3 {
        rgb[channel] += light.intensity[channel]
            * (material.diffuse[channel] * diffuse + material.reflective[channel] * reflective);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        geometry::{Material, Sphere},
        Vector3,
    };

    fn matte() -> Material {
        Material {
            diffuse: [1.0, 1.0, 1.0],
            reflective: [0.0, 0.0, 0.0],
            shininess: 1.0,
        }
    }

    fn eye_ray() -> Ray {
        Ray::from_points(Vector3::new(10.0, 0.0, 0.0), Vector3::default()).unwrap()
    }

    fn target() -> Sphere {
        Sphere::new(Vector3::default(), 1.0, matte()).unwrap()
    }

    #[test]
    fn test_background() {
        let scene = Scene::new().with_light(LightSource::new(Vector3::default(), 1.0, 1.0, 1.0));
        assert_eq!(trace(&scene, &eye_ray()), Ok([0, 0, 0]));
    }

    #[test]
    fn test_ambient_only() {
        let scene = Scene::new().with_object(target());
        assert_eq!(trace(&scene, &eye_ray()), Ok([15, 15, 15]));
    }

    #[test]
    fn test_head_on_light() {
        let scene = Scene::new()
            .with_object(target())
            .with_light(LightSource::new(Vector3::new(10.0, 0.0, 0.0), 100.0, 50.0, 0.0));
        assert_eq!(trace(&scene, &eye_ray()), Ok([115, 65, 15]));
    }

    #[test]
    fn test_clamped() {
        let scene = Scene::new()
            .with_object(target())
            .with_light(LightSource::new(Vector3::new(10.0, 0.0, 0.0), 1000.0, 1000.0, 1000.0));
        assert_eq!(trace(&scene, &eye_ray()), Ok([255, 255, 255]));
    }

    #[test]
    fn test_specular() {
        let shiny = Material {
            diffuse: [0.0; 3],
            reflective: [1.0; 3],
            shininess: 10.0,
        };
        let scene = Scene::new()
            .with_object(Sphere::new(Vector3::default(), 1.0, shiny).unwrap())
            .with_light(LightSource::new(Vector3::new(10.0, 0.0, 0.0), 100.0, 100.0, 100.0));
        // Light, eye and normal are collinear, so the reflection points straight back.
        assert_eq!(trace(&scene, &eye_ray()), Ok([115, 115, 115]));
    }

    #[test]
    fn test_shadow() {
        let light = LightSource::new(Vector3::new(10.0, 10.0, 0.0), 100.0, 100.0, 100.0);
        let lit = Scene::new().with_object(target()).with_light(light);
        let [r, g, b] = trace(&lit, &eye_ray()).unwrap();
        assert!(r > 15 && r == g && g == b, "expected lit pixel, got {:?}", [r, g, b]);

        // Halfway between the light and the lit point, clear of the eye ray.
        let blocker = Sphere::new(Vector3::new(5.5, 5.0, 0.0), 0.5, matte()).unwrap();
        let shadowed = lit.with_object(blocker);
        assert_eq!(trace(&shadowed, &eye_ray()), Ok([15, 15, 15]));
    }

    #[test]
    fn test_light_on_surface_is_skipped() {
        let scene = Scene::new()
            .with_object(target())
            .with_light(LightSource::new(Vector3::new(1.0, 0.0, 0.0), 100.0, 100.0, 100.0));
        assert_eq!(trace(&scene, &eye_ray()), Ok([15, 15, 15]));
    }
}
