//! Core shading kernel.
//!
//! Implements Whitted-style ray tracing with:
//! - Recursive mirror reflection with a configurable bounce budget
//! - Hard shadows from a single point light
//! - Ambient + diffuse lighting
//! - Distance fog with an early cutoff at the fog horizon
//! - Anti-aliasing via jittered multi-sampling

use std::sync::Once;

use fogray_core::Scene;
use fogray_math::{lerp, Color, Interval, Ray};
use rand::{Rng, RngCore};

use crate::{Camera, RenderConfig, RenderError};

/// Offset along the surface normal for secondary rays, so they do not
/// immediately hit the surface they start on.
pub const SURFACE_EPSILON: f32 = 0.001;

static DEGENERATE_REPORTED: Once = Once::new();

/// Counters collected while tracing.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TraceStats {
    /// Primary and reflected rays traced (shadow rays excluded)
    pub rays: u64,
    /// Deepest recursion level reached, 1 for a primary ray with no bounce
    pub max_depth: u32,
}

impl TraceStats {
    pub fn merge(&mut self, other: TraceStats) {
        self.rays += other.rays;
        self.max_depth = self.max_depth.max(other.max_depth);
    }
}

/// Compute the color seen along `ray`.
///
/// Returns `None` if the ray hits nothing; the caller substitutes the fog
/// color. Recursion depth never exceeds `max(bounces, 1)`.
pub fn sample_ray(scene: &Scene, config: &RenderConfig, ray: &Ray, bounces: u32) -> Option<Color> {
    let mut stats = TraceStats::default();
    trace(scene, config, ray, bounces, 1, &mut stats)
}

/// [`sample_ray`], accumulating counters into `stats`.
pub fn sample_ray_with_stats(
    scene: &Scene,
    config: &RenderConfig,
    ray: &Ray,
    bounces: u32,
    stats: &mut TraceStats,
) -> Option<Color> {
    trace(scene, config, ray, bounces, 1, stats)
}

fn trace(
    scene: &Scene,
    config: &RenderConfig,
    ray: &Ray,
    bounces: u32,
    depth: u32,
    stats: &mut TraceStats,
) -> Option<Color> {
    let bounces = bounces.saturating_sub(1);
    stats.rays += 1;
    stats.max_depth = stats.max_depth.max(depth);

    let hit = scene.nearest_hit(ray)?;

    // Past the horizon only fog is visible
    if hit.distance >= config.fog_distance {
        return Some(config.fog_color);
    }

    let shape = hit.shape;
    let mut color = shape.sample(ray);

    let point = ray.at(hit.distance);
    let normal = shape.normal(point).direction;
    let surface = point + normal * SURFACE_EPSILON;

    if bounces != 0 && shape.reflectivity() > 0.0 {
        let direction = normal * (2.0 * -ray.direction.dot(normal)) + ray.direction;
        let reflection = Ray::new(surface, direction).normalize();
        let reflected = trace(scene, config, &reflection, bounces, depth + 1, stats)
            .unwrap_or(config.fog_color);
        color = lerp(color, reflected, shape.reflectivity());
    }

    let to_light = Ray::between(surface, scene.light);
    let light_distance = to_light.direction.length();
    let to_light = to_light.normalize();

    if scene.occluded(&to_light, light_distance) {
        color *= config.ambient;
    } else {
        color *= Interval::UNIT.clamp(config.ambient + to_light.direction.dot(normal));
    }

    if config.fog_enabled() {
        color = lerp(color, config.fog_color, hit.distance / config.fog_distance);
    }

    Some(color)
}

/// Color seen through the continuous pixel position (x, y).
///
/// Non-finite results are replaced with the fog color; the first one in the
/// process is logged.
pub fn sample(
    scene: &Scene,
    config: &RenderConfig,
    camera: &Camera,
    x: f32,
    y: f32,
    stats: &mut TraceStats,
) -> Color {
    let ray = camera.get_ray(x, y);
    let color = sample_ray_with_stats(scene, config, &ray, config.bounces, stats)
        .unwrap_or(config.fog_color);

    if !color.is_finite() {
        DEGENERATE_REPORTED.call_once(|| {
            log::warn!("{}", RenderError::DegenerateGeometry { x, y });
        });
        return config.fog_color;
    }

    color
}

/// Render a single pixel with jittered multi-sampling.
pub fn render_pixel(
    scene: &Scene,
    config: &RenderConfig,
    camera: &Camera,
    x: u32,
    y: u32,
    rng: &mut dyn RngCore,
    stats: &mut TraceStats,
) -> Color {
    let mut pixel_color = Color::ZERO;

    for _ in 0..config.samples {
        let sx = x as f32 + rng.gen::<f32>();
        let sy = y as f32 + rng.gen::<f32>();
        pixel_color += sample(scene, config, camera, sx, sy, stats);
    }

    // Average the samples
    pixel_color / config.samples as f32
}

/// Clamp a value to [0, 1] range.
#[inline]
pub fn clamp_01(x: f32) -> f32 {
    Interval::UNIT.clamp(x)
}

/// Convert a color to 8-bit RGBA.
pub fn color_to_rgba(color: Color) -> [u8; 4] {
    let r = (255.0 * clamp_01(color.x)) as u8;
    let g = (255.0 * clamp_01(color.y)) as u8;
    let b = (255.0 * clamp_01(color.z)) as u8;
    [r, g, b, 255]
}
