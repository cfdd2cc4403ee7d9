//! Render one frame of the demo scene and save it as PPM.

use std::sync::Arc;

use fogray_renderer::{Raster, RenderConfig, Renderer, Scene};

fn main() {
    println!("fogray - Single Frame Example");
    println!("=============================");

    let config = RenderConfig::default()
        .with_resolution(640, 480)
        .with_quality(16, 5);

    println!(
        "Rendering {}x{} @ {} spp on {} threads...",
        config.width, config.height, config.samples, config.threads
    );

    let raster = Arc::new(Raster::new(config.width, config.height));
    let mut renderer = Renderer::new(config, Scene::demo()).expect("Invalid config");

    let stats = renderer.render_frame(0.0, raster.clone());
    println!("Rendered in {:?} ({} rays)", stats.duration, stats.rays);

    let filename = "output.ppm";
    raster.save_ppm(filename).expect("Failed to save image");
    println!("Saved to {}", filename);
}
