//! fogray renderer - multi-threaded CPU ray tracing.
//!
//! Traces primary rays through a pinhole camera with recursive mirror
//! reflections, hard shadows and distance fog. Each frame is split into
//! interleaved row groups that run on a reusable pool of worker threads.

mod camera;
mod config;
mod error;
mod frame;
mod pool;
mod raster;
mod renderer;

pub use camera::Camera;
pub use config::{PoolKind, RenderConfig};
pub use error::{RenderError, RenderResult};
pub use frame::{fill_group, group_rows, render_group, FrameStats, Renderer};
pub use pool::{Job, JobPool, SpawnPool, WorkerPool};
pub use raster::{PixelSink, Raster};
pub use renderer::{
    color_to_rgba, render_pixel, sample, sample_ray, sample_ray_with_stats, TraceStats,
    SURFACE_EPSILON,
};

/// Re-export scene and math types used in the public API
pub use fogray_core::{LightOrbit, Plane, Scene, Shape, Sphere};
pub use fogray_math::{Color, Ray, Vec3};
