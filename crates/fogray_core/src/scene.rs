//! Scene container: an ordered list of shapes lit by one point light.

use fogray_math::{Color, Ray, Vec3};
use serde::{Deserialize, Serialize};

use crate::shape::{Plane, Shape, Sphere};

/// The nearest surface found along a ray.
#[derive(Debug, Clone, Copy)]
pub struct Hit<'a> {
    /// Parametric distance along the ray
    pub distance: f32,
    /// The shape that was hit
    pub shape: &'a Shape,
}

/// A complete scene.
///
/// Shape order only matters for ties: when two shapes are hit at exactly the
/// same distance, the one added first wins.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    shapes: Vec<Shape>,

    /// Point light position
    pub light: Vec3,
}

impl Scene {
    /// Create an empty scene with the light at `light`.
    pub fn new(light: Vec3) -> Self {
        Self {
            shapes: Vec::new(),
            light,
        }
    }

    /// Add a shape to the scene and return its index.
    pub fn add(&mut self, shape: impl Into<Shape>) -> usize {
        self.shapes.push(shape.into());
        self.shapes.len() - 1
    }

    /// Builder form of [`Scene::add`].
    pub fn with(mut self, shape: impl Into<Shape>) -> Self {
        self.add(shape);
        self
    }

    pub fn set_light(&mut self, light: Vec3) {
        self.light = light;
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Linear search for the closest intersection along `ray`.
    pub fn nearest_hit(&self, ray: &Ray) -> Option<Hit<'_>> {
        let mut nearest: Option<Hit<'_>> = None;

        for shape in &self.shapes {
            if let Some(distance) = shape.intersection(ray) {
                if nearest.map_or(true, |hit| distance < hit.distance) {
                    nearest = Some(Hit { distance, shape });
                }
            }
        }

        nearest
    }

    /// True if any shape is hit strictly closer than `max_distance`.
    pub fn occluded(&self, ray: &Ray, max_distance: f32) -> bool {
        self.shapes
            .iter()
            .filter_map(|shape| shape.intersection(ray))
            .any(|distance| distance < max_distance)
    }

    /// The reference scene: a checkerboard floor, a cluster of reflective
    /// spheres and a light circling above them.
    pub fn demo() -> Self {
        let orbit = LightOrbit::default();

        let scene = Scene::new(orbit.position(0.0))
            .with(Plane::new(
                Vec3::new(0.0, -150.0, 0.0),
                Vec3::Y,
                Color::new(0.9, 0.9, 0.9),
                Color::new(0.15, 0.15, 0.2),
                0.25,
            ))
            .with(Sphere::new(
                Vec3::new(0.0, 0.0, 200.0),
                100.0,
                Color::new(0.9, 0.2, 0.2),
                0.3,
            ))
            .with(Sphere::new(
                Vec3::new(-260.0, -50.0, 320.0),
                100.0,
                Color::new(0.2, 0.85, 0.3),
                0.5,
            ))
            .with(Sphere::new(
                Vec3::new(260.0, -50.0, 120.0),
                100.0,
                Color::new(0.25, 0.35, 0.95),
                0.6,
            ))
            .with(Sphere::new(
                Vec3::new(0.0, 150.0, 700.0),
                220.0,
                Color::new(0.85, 0.85, 0.85),
                0.9,
            ));

        log::debug!("Built demo scene with {} shapes", scene.len());
        scene
    }
}

/// Circular path the light follows over time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightOrbit {
    /// Center of the circle
    pub center: Vec3,
    /// Radius in the XZ plane
    pub radius: f32,
    /// Angular speed in radians per second
    pub speed: f32,
}

impl Default for LightOrbit {
    fn default() -> Self {
        Self {
            center: Vec3::new(0.0, 500.0, 250.0),
            radius: 450.0,
            speed: 0.6,
        }
    }
}

impl LightOrbit {
    /// A light that never moves.
    pub fn fixed(position: Vec3) -> Self {
        Self {
            center: position,
            radius: 0.0,
            speed: 0.0,
        }
    }

    /// Light position after `time` seconds.
    pub fn position(&self, time: f32) -> Vec3 {
        let angle = time * self.speed;
        self.center + Vec3::new(angle.cos() * self.radius, 0.0, angle.sin() * self.radius)
    }
}
