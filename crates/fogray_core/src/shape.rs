//! Geometric primitives: spheres and checkerboard planes.
//!
//! Shapes form a closed set, so they are an enum rather than trait objects.
//! Every shape answers three questions: how far along a ray it is hit,
//! which way its surface faces at a point, and what color it shows.

use fogray_math::{Color, Interval, Ray, Vec3};

/// Rays whose direction is this close to perpendicular with a plane normal
/// are treated as parallel to the plane.
pub const PARALLEL_EPSILON: f32 = 0.001;

/// Edge length of one checkerboard tile, in world units.
pub const CHECKER_TILE: f32 = 100.0;

/// A sphere primitive.
#[derive(Debug, Clone, PartialEq)]
pub struct Sphere {
    pub origin: Vec3,
    pub radius: f32,
    pub fill: Color,
    reflectivity: f32,
}

impl Sphere {
    /// Create a new sphere. Reflectivity is clamped to [0, 1].
    pub fn new(origin: Vec3, radius: f32, fill: Color, reflectivity: f32) -> Self {
        Self {
            origin,
            radius: radius.max(0.0),
            fill,
            reflectivity: Interval::UNIT.clamp(reflectivity),
        }
    }

    /// Distance along `ray` to the near surface.
    ///
    /// Only the near root of the quadratic is considered, so a ray that starts
    /// inside the sphere does not report its exit point.
    pub fn intersection(&self, ray: &Ray) -> Option<f32> {
        let oc = ray.origin - self.origin;
        let a = ray.direction.dot(ray.direction);
        let b = 2.0 * oc.dot(ray.direction);
        let c = oc.dot(oc) - self.radius * self.radius;

        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            return None;
        }

        let t = (-b - discriminant.sqrt()) / (2.0 * a);
        Interval::FORWARD.contains(t).then_some(t)
    }

    /// Outward unit normal at `point`.
    pub fn normal(&self, point: Vec3) -> Ray {
        Ray::new(point, (point - self.origin).normalize())
    }
}

/// An infinite plane with a checkerboard pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    pub origin: Vec3,
    /// Unit normal
    pub direction: Vec3,
    pub fill: Color,
    pub check_color: Color,
    reflectivity: f32,
}

impl Plane {
    /// Create a new plane. The direction is normalized and reflectivity is
    /// clamped to [0, 1].
    pub fn new(
        origin: Vec3,
        direction: Vec3,
        fill: Color,
        check_color: Color,
        reflectivity: f32,
    ) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
            fill,
            check_color,
            reflectivity: Interval::UNIT.clamp(reflectivity),
        }
    }

    pub fn intersection(&self, ray: &Ray) -> Option<f32> {
        let denom = self.direction.dot(ray.direction);
        if denom.abs() <= PARALLEL_EPSILON {
            return None;
        }

        let t = (self.origin - ray.origin).dot(self.direction) / denom;
        (t > 0.0).then_some(t)
    }

    /// Planes are flat, so the normal does not depend on the point.
    pub fn normal(&self, point: Vec3) -> Ray {
        Ray::new(point, self.direction)
    }

    /// Checkerboard color where `ray` meets the plane.
    pub fn sample(&self, ray: &Ray) -> Color {
        match self.intersection(ray) {
            Some(t) => self.checker_at(ray.at(t)),
            None => self.fill,
        }
    }

    /// Checkerboard color at a point on the plane, tiled on the X and Z axes.
    pub fn checker_at(&self, point: Vec3) -> Color {
        let diff_x = self.origin.x - point.x;
        let diff_z = self.origin.z - point.z;

        let mut tile = (diff_x < 0.0) ^ (diff_z < 0.0);
        if diff_x.abs() % CHECKER_TILE < CHECKER_TILE / 2.0 {
            tile = !tile;
        }
        if diff_z.abs() % CHECKER_TILE < CHECKER_TILE / 2.0 {
            tile = !tile;
        }

        if tile {
            self.fill
        } else {
            self.check_color
        }
    }
}

/// Any primitive a scene can hold.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Sphere(Sphere),
    Plane(Plane),
}

impl Shape {
    /// Distance along `ray` to the first surface hit, if any.
    ///
    /// The distance is in units of `ray.direction`, so it is a true distance
    /// only when the direction is unit length.
    #[inline]
    pub fn intersection(&self, ray: &Ray) -> Option<f32> {
        match self {
            Shape::Sphere(sphere) => sphere.intersection(ray),
            Shape::Plane(plane) => plane.intersection(ray),
        }
    }

    /// Ray from `point` along the outward unit normal.
    #[inline]
    pub fn normal(&self, point: Vec3) -> Ray {
        match self {
            Shape::Sphere(sphere) => sphere.normal(point),
            Shape::Plane(plane) => plane.normal(point),
        }
    }

    /// Surface color seen along `ray`.
    #[inline]
    pub fn sample(&self, ray: &Ray) -> Color {
        match self {
            Shape::Sphere(sphere) => sphere.fill,
            Shape::Plane(plane) => plane.sample(ray),
        }
    }

    pub fn origin(&self) -> Vec3 {
        match self {
            Shape::Sphere(sphere) => sphere.origin,
            Shape::Plane(plane) => plane.origin,
        }
    }

    pub fn fill(&self) -> Color {
        match self {
            Shape::Sphere(sphere) => sphere.fill,
            Shape::Plane(plane) => plane.fill,
        }
    }

    /// Fraction of the reflected color mixed into the surface color.
    pub fn reflectivity(&self) -> f32 {
        match self {
            Shape::Sphere(sphere) => sphere.reflectivity,
            Shape::Plane(plane) => plane.reflectivity,
        }
    }
}

impl From<Sphere> for Shape {
    fn from(sphere: Sphere) -> Self {
        Shape::Sphere(sphere)
    }
}

impl From<Plane> for Shape {
    fn from(plane: Plane) -> Self {
        Shape::Plane(plane)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Color = Vec3::ONE;
    const BLACK: Color = Vec3::ZERO;

    fn floor() -> Plane {
        Plane::new(Vec3::ZERO, Vec3::Y, WHITE, BLACK, 0.0)
    }

    /// Color of the floor directly below (x, z).
    fn floor_color(plane: &Plane, x: f32, z: f32) -> Color {
        let ray = Ray::new(Vec3::new(x, 10.0, z), Vec3::NEG_Y);
        plane.sample(&ray)
    }

    #[test]
    fn test_sphere_hit_on_axis() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, 200.0), 100.0, WHITE, 0.0);
        let ray = Ray::new(Vec3::new(0.0, 0.0, -800.0), Vec3::Z);

        let t = sphere.intersection(&ray).expect("ray should hit sphere");
        assert!((t - 900.0).abs() < 1e-3, "t = {}", t);
    }

    #[test]
    fn test_sphere_miss() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, 200.0), 100.0, WHITE, 0.0);

        // Ray pointing away from sphere
        let ray = Ray::new(Vec3::new(0.0, 0.0, -800.0), Vec3::Y);
        assert!(sphere.intersection(&ray).is_none());
    }

    #[test]
    fn test_sphere_behind_ray_is_rejected() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -200.0), 50.0, WHITE, 0.0);
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);
        assert!(sphere.intersection(&ray).is_none());
    }

    #[test]
    fn test_sphere_inside_reports_no_exit() {
        let sphere = Sphere::new(Vec3::ZERO, 100.0, WHITE, 0.0);
        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        assert!(sphere.intersection(&ray).is_none());
    }

    #[test]
    fn test_sphere_normal() {
        let sphere = Sphere::new(Vec3::new(1.0, 1.0, 1.0), 2.0, WHITE, 0.0);
        let point = Vec3::new(1.0, 3.0, 1.0);
        let normal = sphere.normal(point);

        assert_eq!(normal.origin, point);
        assert!((normal.direction - Vec3::Y).length() < 1e-6);
    }

    #[test]
    fn test_reflectivity_clamped() {
        let sphere = Sphere::new(Vec3::ZERO, 1.0, WHITE, 1.5);
        assert_eq!(Shape::from(sphere).reflectivity(), 1.0);

        let plane = Plane::new(Vec3::ZERO, Vec3::Y, WHITE, BLACK, -0.5);
        assert_eq!(Shape::from(plane).reflectivity(), 0.0);
    }

    #[test]
    fn test_plane_hit() {
        let plane = floor();
        let ray = Ray::new(Vec3::new(3.0, 10.0, -2.0), Vec3::NEG_Y);

        let t = plane.intersection(&ray).expect("ray should hit plane");
        assert!((t - 10.0).abs() < 1e-5);
        assert!((ray.at(t) - Vec3::new(3.0, 0.0, -2.0)).length() < 1e-5);
    }

    #[test]
    fn test_plane_parallel_ray_misses() {
        let plane = floor();
        let ray = Ray::new(Vec3::new(0.0, 10.0, 0.0), Vec3::new(1.0, 0.0005, 0.0));
        assert!(plane.intersection(&ray).is_none());
    }

    #[test]
    fn test_plane_behind_ray_misses() {
        let plane = floor();
        let ray = Ray::new(Vec3::new(0.0, 10.0, 0.0), Vec3::Y);
        assert!(plane.intersection(&ray).is_none());
    }

    #[test]
    fn test_plane_normal_is_constant() {
        let plane = Plane::new(Vec3::ZERO, Vec3::new(0.0, 2.0, 0.0), WHITE, BLACK, 0.0);
        let a = plane.normal(Vec3::new(5.0, 0.0, 5.0));
        let b = plane.normal(Vec3::new(-40.0, 0.0, 12.0));

        assert_eq!(a.direction, Vec3::Y);
        assert_eq!(a.direction, b.direction);
        assert_eq!(b.origin, Vec3::new(-40.0, 0.0, 12.0));
    }

    #[test]
    fn test_checker_period_is_one_hundred() {
        let plane = floor();

        for &(x, z) in &[(10.0, 20.0), (130.0, 260.0), (-75.0, 35.0)] {
            let base = floor_color(&plane, x, z);
            assert_eq!(floor_color(&plane, x + 100.0, z), base, "x step at ({}, {})", x, z);
            assert_eq!(floor_color(&plane, x, z + 100.0), base, "z step at ({}, {})", x, z);
        }
    }

    #[test]
    fn test_checker_half_tile_flips() {
        let plane = floor();

        for &(x, z) in &[(10.0, 20.0), (120.0, 260.0), (-75.0, -135.0)] {
            let base = floor_color(&plane, x, z);
            let flipped = floor_color(&plane, x + 50.0, z);
            assert_ne!(flipped, base, "x half step at ({}, {})", x, z);
            let flipped = floor_color(&plane, x, z + 50.0);
            assert_ne!(flipped, base, "z half step at ({}, {})", x, z);
        }
    }

    #[test]
    fn test_shape_dispatch() {
        let sphere: Shape = Sphere::new(Vec3::new(0.0, 0.0, 10.0), 1.0, WHITE, 0.25).into();
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);

        assert!((sphere.intersection(&ray).unwrap() - 9.0).abs() < 1e-5);
        assert_eq!(sphere.sample(&ray), WHITE);
        assert_eq!(sphere.fill(), WHITE);
        assert_eq!(sphere.origin(), Vec3::new(0.0, 0.0, 10.0));
        assert_eq!(sphere.reflectivity(), 0.25);
    }
}
