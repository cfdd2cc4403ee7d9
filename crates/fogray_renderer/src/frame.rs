//! Per-frame driver.
//!
//! Splits the image into interleaved row groups (row `y` belongs to group
//! `y % threads`), hands all but the last group to the pool, renders the
//! last group on the calling thread, then waits for the pool.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use fogray_core::Scene;
use fogray_math::Color;
use rand::rngs::SmallRng;
use rand::{RngCore, SeedableRng};

use crate::pool::{JobPool, SpawnPool, WorkerPool};
use crate::renderer::{render_pixel, TraceStats};
use crate::{Camera, PixelSink, PoolKind, RenderConfig, RenderError, RenderResult};

/// Summary of one rendered frame.
#[derive(Debug, Clone, Default)]
pub struct FrameStats {
    /// Frame number, starting at 1
    pub frame: u64,
    /// Wall-clock time spent in `render_frame`
    pub duration: Duration,
    /// Row groups that failed and were repainted with fog
    pub failed_groups: Vec<usize>,
    /// Rays traced across all groups
    pub rays: u64,
    /// Deepest reflection recursion reached
    pub max_depth: u32,
}

/// Render every row of `group`, writing each pixel to `sink`.
pub fn render_group(
    scene: &Scene,
    config: &RenderConfig,
    camera: &Camera,
    group: usize,
    sink: &dyn PixelSink,
    rng: &mut dyn RngCore,
) -> TraceStats {
    let mut stats = TraceStats::default();

    for y in group_rows(config, group) {
        for x in 0..config.width {
            let color = render_pixel(scene, config, camera, x, y, rng, &mut stats);
            sink.put_pixel(x, y, color);
        }
    }

    stats
}

/// Paint every row of `group` a single color.
pub fn fill_group(config: &RenderConfig, group: usize, color: Color, sink: &dyn PixelSink) {
    for y in group_rows(config, group) {
        for x in 0..config.width {
            sink.put_pixel(x, y, color);
        }
    }
}

/// Rows belonging to an interleaved group.
pub fn group_rows(config: &RenderConfig, group: usize) -> impl Iterator<Item = u32> {
    (group as u32..config.height).step_by(config.threads.max(1))
}

/// Everything one row-group job needs, shared by reference count so the job
/// can outlive the borrow of the renderer.
#[derive(Clone)]
struct GroupJob {
    scene: Arc<Scene>,
    config: Arc<RenderConfig>,
    camera: Camera,
    sink: Arc<dyn PixelSink>,
    seed: u64,
    rays: Arc<AtomicU64>,
    max_depth: Arc<AtomicU32>,
}

impl GroupJob {
    fn run(&self, group: usize) {
        let mut rng = SmallRng::seed_from_u64(self.seed ^ group as u64);
        let stats = render_group(
            &self.scene,
            &self.config,
            &self.camera,
            group,
            self.sink.as_ref(),
            &mut rng,
        );
        self.rays.fetch_add(stats.rays, Ordering::Relaxed);
        self.max_depth.fetch_max(stats.max_depth, Ordering::Relaxed);
    }
}

/// Renders frames of a scene with a reusable pool of threads.
pub struct Renderer {
    config: Arc<RenderConfig>,
    camera: Camera,
    scene: Arc<Scene>,
    pool: Box<dyn JobPool>,
    /// Seconds of scene time elapsed
    clock: f32,
    frame: u64,
}

impl Renderer {
    /// Create a renderer. Fails if the configuration is invalid.
    pub fn new(config: RenderConfig, scene: Scene) -> RenderResult<Self> {
        config.validate()?;

        let pool: Box<dyn JobPool> = match config.pool {
            PoolKind::Persistent => Box::new(WorkerPool::new(config.threads - 1)),
            PoolKind::Spawn => Box::new(SpawnPool::new()),
        };

        log::info!(
            "Renderer ready: {}x{}, {} row groups, {:?} pool, {} spp, {} bounces",
            config.width,
            config.height,
            config.threads,
            config.pool,
            config.samples,
            config.bounces
        );

        Ok(Self {
            camera: Camera::from_config(&config),
            config: Arc::new(config),
            scene: Arc::new(scene),
            pool,
            clock: 0.0,
            frame: 0,
        })
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Mutable access to the scene between frames.
    pub fn scene_mut(&mut self) -> &mut Scene {
        // Jobs drop their handles before `wait_all` returns, so no copy is made
        Arc::make_mut(&mut self.scene)
    }

    /// Scene time in seconds.
    pub fn time(&self) -> f32 {
        self.clock
    }

    /// Frames rendered so far.
    pub fn frames(&self) -> u64 {
        self.frame
    }

    /// Advance the clock by `elapsed` seconds and render one full image.
    ///
    /// Returns after every pixel has been written to `sink`.
    pub fn render_frame(&mut self, elapsed: f32, sink: Arc<dyn PixelSink>) -> FrameStats {
        let start = Instant::now();
        self.frame += 1;
        self.clock += elapsed;

        let light = self.config.light_orbit.position(self.clock);
        self.scene_mut().set_light(light);

        let groups = self.config.threads;
        let job = GroupJob {
            scene: Arc::clone(&self.scene),
            config: Arc::clone(&self.config),
            camera: self.camera,
            sink: Arc::clone(&sink),
            seed: self.frame.wrapping_mul(0x9E37_79B9_7F4A_7C15),
            rays: Arc::new(AtomicU64::new(0)),
            max_depth: Arc::new(AtomicU32::new(0)),
        };

        for group in 0..groups - 1 {
            let job = job.clone();
            self.pool.submit(Box::new(move || job.run(group)));
        }
        self.pool.run_all();

        // The calling thread always renders the last group itself
        let last = groups - 1;
        let mut failures = Vec::new();
        if panic::catch_unwind(AssertUnwindSafe(|| job.run(last))).is_err() {
            failures.push(RenderError::JobFailed { index: last });
        }

        failures.extend(self.pool.wait_all());

        let mut stats = FrameStats {
            frame: self.frame,
            rays: job.rays.load(Ordering::Relaxed),
            max_depth: job.max_depth.load(Ordering::Relaxed),
            ..Default::default()
        };
        drop(job);

        for failure in failures {
            log::error!("Frame {}: {}", self.frame, failure);
            if let RenderError::JobFailed { index } = failure {
                fill_group(&self.config, index, self.config.fog_color, sink.as_ref());
                stats.failed_groups.push(index);
            }
        }
        stats.failed_groups.sort_unstable();

        stats.duration = start.elapsed();
        log::debug!(
            "Frame {} rendered in {:?} ({} rays, depth {})",
            stats.frame,
            stats.duration,
            stats.rays,
            stats.max_depth
        );
        stats
    }
}
