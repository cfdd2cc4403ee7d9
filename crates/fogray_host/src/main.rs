// Headless host loop for the fogray renderer.
// Run with: cargo run --release -- [config.json] [frames] [output.png]

use std::env;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use fogray_renderer::{Raster, RenderConfig, Renderer, Scene};

const DEFAULT_FRAMES: u64 = 60;
const DEFAULT_OUTPUT: &str = "fogray.png";

/// Command line settings
struct Args {
    config: Option<String>,
    frames: u64,
    output: String,
}

impl Args {
    fn parse() -> Result<Self> {
        let mut args = env::args().skip(1);

        let config = args.next().filter(|path| path != "-");
        let frames = match args.next() {
            Some(count) => count
                .parse()
                .with_context(|| format!("Invalid frame count: {}", count))?,
            None => DEFAULT_FRAMES,
        };
        let output = args.next().unwrap_or_else(|| DEFAULT_OUTPUT.to_string());

        Ok(Self {
            config,
            frames,
            output,
        })
    }
}

fn load_config(path: Option<&str>) -> Result<RenderConfig> {
    let Some(path) = path else {
        log::info!("No config file given, using defaults");
        return Ok(RenderConfig::default());
    };

    let text = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path))?;
    let config = serde_json::from_str(&text).with_context(|| format!("Failed to parse {}", path))?;
    log::info!("Loaded config from {}", path);
    Ok(config)
}

/// Drive the renderer like a game loop: each frame is told how much time
/// passed since the previous one.
fn run(renderer: &mut Renderer, raster: &Arc<Raster>, frames: u64) -> Duration {
    let started = Instant::now();
    let mut last_frame = Instant::now();
    let mut failed = 0;

    for _ in 0..frames {
        let now = Instant::now();
        let elapsed = (now - last_frame).as_secs_f32();
        last_frame = now;

        let stats = renderer.render_frame(elapsed, raster.clone());
        failed += stats.failed_groups.len();
    }

    if failed > 0 {
        log::warn!("{} row groups failed across {} frames", failed, frames);
    }
    started.elapsed()
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    log::info!("Starting fogray");

    let args = Args::parse()?;
    let config = load_config(args.config.as_deref())?;
    let raster = Arc::new(Raster::new(config.width, config.height));
    let mut renderer = Renderer::new(config, Scene::demo())?;

    let total = run(&mut renderer, &raster, args.frames);
    if args.frames > 0 {
        let fps = args.frames as f64 / total.as_secs_f64().max(f64::EPSILON);
        log::info!(
            "Rendered {} frames in {:?} ({:.1} fps)",
            args.frames,
            total,
            fps
        );
    }

    raster
        .save_png(Path::new(&args.output))
        .with_context(|| format!("Failed to save {}", args.output))?;
    log::info!("Saved {}", args.output);

    Ok(())
}
