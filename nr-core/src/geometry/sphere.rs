use super::{Intersection, Material, Ray};
use crate::{ArithmeticError, GeometryError, Vector3};

#[derive(Clone, Debug, PartialEq)]
pub struct Sphere {
    center: Vector3,
    radius: f64,
    material: Material,
}

impl Sphere {
    pub fn new(center: Vector3, radius: f64, material: Material) -> Result<Self, GeometryError> {
        if radius.is_nan() || radius <= 0.0 {
            return Err(GeometryError::InvalidRadius(radius));
        }
        Ok(Sphere {
            center,
            radius,
            material,
        })
    }

    pub fn center(&self) -> Vector3 {
        self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Nearest point where `ray` enters (or, from inside, leaves) the sphere.
    ///
    /// Solves `|O + λD - C|² = r²` for λ. `D` is a unit vector, so the quadratic's leading
    /// coefficient is 1.
    pub fn closest_intersection(&self, ray: &Ray) -> Result<Option<Intersection>, ArithmeticError> {
        let offset = ray.start - self.center;
        let b = 2.0 * ray.direction.dot(offset);
        let c = offset.dot(offset) - self.radius * self.radius;
        let discriminant = b * b - 4.0 * c;
        if discriminant < 0.0 {
            return Ok(None);
        }

        let (lambda, outer) = if discriminant == 0.0 && -b > 0.0 {
            // Tangent.
            (-b, true)
        } else {
            let root = discriminant.sqrt();
            let far = (-b + root) / 2.0;
            let near = (-b - root) / 2.0;
            match (near > 0.0, far > 0.0) {
                (true, true) => (near, true),
                // Starting inside the sphere: only the exit point is ahead of us.
                (false, true) => (far, false),
                _ => return Ok(None),
            }
        };

        let travel = ray.direction * lambda;
        let point = ray.start + travel;
        Ok(Some(Intersection {
            point,
            distance: travel.norm(),
            outer,
            normal: (point - self.center).normalized()?,
            material: self.material,
        }))
    }
}
