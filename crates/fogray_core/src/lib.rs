//! fogray core - scene description for the fogray ray tracer.
//!
//! This crate provides:
//!
//! - **Shapes**: `Sphere` and checkerboard `Plane`, wrapped in the `Shape` enum
//! - **Scene**: the ordered shape list plus the point light
//!
//! # Example
//!
//! ```
//! use fogray_core::{Scene, Sphere};
//! use fogray_math::{Color, Ray, Vec3};
//!
//! let scene = Scene::new(Vec3::new(0.0, 100.0, 0.0))
//!     .with(Sphere::new(Vec3::new(0.0, 0.0, 200.0), 100.0, Color::ONE, 0.0));
//!
//! let hit = scene.nearest_hit(&Ray::new(Vec3::new(0.0, 0.0, -800.0), Vec3::Z));
//! assert!(hit.is_some());
//! ```

pub mod scene;
pub mod shape;

// Re-export commonly used types
pub use scene::{Hit, LightOrbit, Scene};
pub use shape::{Plane, Shape, Sphere, CHECKER_TILE, PARALLEL_EPSILON};
