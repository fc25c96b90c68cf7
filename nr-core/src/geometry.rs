//! Scene geometry for the ray caster: rays, shapes, lights and the camera.

use crate::{raster::fraction, ArithmeticError, Size, Vector3};

mod sphere;

pub use sphere::Sphere;

/// A half-line from `start` along the unit vector `direction`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Ray {
    pub start: Vector3,
    pub direction: Vector3,
}

impl Ray {
    /// Ray from `start` through `through`. Fails if the points coincide.
    pub fn from_points(start: Vector3, through: Vector3) -> Result<Ray, ArithmeticError> {
        Ok(Ray {
            start,
            direction: (through - start).normalized()?,
        })
    }
}

/// Surface coefficients used by the shader, per RGB channel.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Material {
    pub diffuse: [f64; 3],
    pub reflective: [f64; 3],
    /// Exponent of the reflective (specular) term.
    pub shininess: f64,
}

/// Where a ray meets a surface.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Intersection {
    pub point: Vector3,
    /// Distance from the ray start to `point`.
    pub distance: f64,
    /// True when the ray hit the surface from outside.
    pub outer: bool,
    /// Unit surface normal at `point`.
    pub normal: Vector3,
    pub material: Material,
}

/// Objects a ray can be tested against.
#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    Sphere(Sphere),
}

impl Shape {
    pub fn closest_intersection(&self, ray: &Ray) -> Result<Option<Intersection>, ArithmeticError> {
        match self {
            Shape::Sphere(sphere) => sphere.closest_intersection(ray),
        }
    }
}

impl From<Sphere> for Shape {
    fn from(sphere: Sphere) -> Self {
        Shape::Sphere(sphere)
    }
}

/// A point light with per-channel intensity.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LightSource {
    pub position: Vector3,
    pub intensity: [f64; 3],
}

impl LightSource {
    pub fn new(position: Vector3, r: f64, g: f64, b: f64) -> Self {
        LightSource {
            position,
            intensity: [r, g, b],
        }
    }
}

/// Everything visible in a render. Read-only while rendering.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scene {
    pub objects: Vec<Shape>,
    pub lights: Vec<LightSource>,
}

impl Scene {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with_object(mut self, object: impl Into<Shape>) -> Self {
        self.objects.push(object.into());
        self
    }

    pub fn with_light(mut self, light: LightSource) -> Self {
        self.lights.push(light);
        self
    }

    /// The nearest intersection of `ray` with any object in the scene.
    ///
    /// Objects are scanned in order; on an exact tie in distance the earlier object wins.
    pub fn closest_intersection(&self, ray: &Ray) -> Result<Option<Intersection>, ArithmeticError> {
        let mut closest: Option<Intersection> = None;
        for object in &self.objects {
            let Some(candidate) = object.closest_intersection(ray)? else {
                continue;
            };
            match &closest {
                Some(best) if best.distance <= candidate.distance => (),
                _ => closest = Some(candidate),
            }
        }
        Ok(closest)
    }
}

/// Viewer position and screen placement.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Camera {
    pub eye: Vector3,
    /// Center of the screen; the eye looks at this point.
    pub view: Vector3,
    /// Approximate "up" direction; it is orthogonalized against the view direction.
    pub view_up: Vector3,
    /// Screen width, in scene units.
    pub horizontal: f64,
    /// Screen height, in scene units.
    pub vertical: f64,
}

impl Camera {
    /// Computes the screen axes and corner for this camera.
    pub fn frame(&self) -> Result<Frame, ArithmeticError> {
        let z_axis = (self.view - self.eye).normalized()?;
        let y_axis = (self.view_up - z_axis * z_axis.dot(self.view_up)).normalized()?;
        let x_axis = z_axis.cross(y_axis).normalized()?;
        let corner = self.view - x_axis * (self.horizontal / 2.0) + y_axis * (self.vertical / 2.0);
        Ok(Frame {
            eye: self.eye,
            x_axis,
            y_axis,
            corner,
            horizontal: self.horizontal,
            vertical: self.vertical,
        })
    }
}

/// A camera resolved into screen-space axes. Cheap to copy into worker tasks.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Frame {
    pub eye: Vector3,
    pub x_axis: Vector3,
    pub y_axis: Vector3,
    /// Upper-left corner of the screen.
    pub corner: Vector3,
    pub horizontal: f64,
    pub vertical: f64,
}

impl Frame {
    /// Ray from the eye through the center of pixel `(x, y)`.
    ///
    /// Pixel (0, 0) is the upper-left corner of the screen, pixel (width-1, height-1) the
    /// lower-right.
    pub fn ray_through(&self, x: usize, y: usize, size: Size) -> Result<Ray, ArithmeticError> {
        let x_part = self.x_axis * (fraction(x, size.width) * self.horizontal);
        let y_part = self.y_axis * (fraction(y, size.height) * self.vertical);
        Ray::from_points(self.eye, self.corner + x_part - y_part)
    }
}
