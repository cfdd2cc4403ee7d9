//! Pixel sinks and the shared output raster.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::atomic::{AtomicU32, Ordering};

use fogray_math::Color;

use crate::renderer::color_to_rgba;
use crate::RenderResult;

/// Destination for rendered pixels.
///
/// Called from every worker thread at once, always for distinct
/// coordinates within a frame.
pub trait PixelSink: Send + Sync {
    fn put_pixel(&self, x: u32, y: u32, color: Color);
}

/// RGBA8 image that many threads can write into without locking.
///
/// Each pixel is one packed atomic word. Pixels never written in the
/// current frame keep alpha 0.
pub struct Raster {
    width: u32,
    height: u32,
    cells: Vec<AtomicU32>,
}

impl Raster {
    /// Create a new raster filled with transparent black.
    pub fn new(width: u32, height: u32) -> Self {
        let cells = (0..width as usize * height as usize)
            .map(|_| AtomicU32::new(0))
            .collect();
        Self {
            width,
            height,
            cells,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the RGBA value at (x, y).
    pub fn get(&self, x: u32, y: u32) -> [u8; 4] {
        self.cells[self.index(x, y)].load(Ordering::Relaxed).to_ne_bytes()
    }

    /// Reset every pixel to transparent black.
    pub fn clear(&self) {
        for cell in &self.cells {
            cell.store(0, Ordering::Relaxed);
        }
    }

    /// Snapshot as tightly packed RGBA bytes, row-major.
    pub fn to_rgba(&self) -> Vec<u8> {
        let pixels: Vec<[u8; 4]> = self
            .cells
            .iter()
            .map(|cell| cell.load(Ordering::Relaxed).to_ne_bytes())
            .collect();
        bytemuck::cast_slice::<[u8; 4], u8>(&pixels).to_vec()
    }

    /// Save as PNG.
    pub fn save_png(&self, path: impl AsRef<Path>) -> RenderResult<()> {
        image::save_buffer(
            path,
            &self.to_rgba(),
            self.width,
            self.height,
            image::ColorType::Rgba8,
        )?;
        Ok(())
    }

    /// Save as plain-text PPM.
    pub fn save_ppm(&self, path: impl AsRef<Path>) -> RenderResult<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);

        writeln!(writer, "P3")?;
        writeln!(writer, "{} {}", self.width, self.height)?;
        writeln!(writer, "255")?;

        for y in 0..self.height {
            for x in 0..self.width {
                let rgba = self.get(x, y);
                writeln!(writer, "{} {} {}", rgba[0], rgba[1], rgba[2])?;
            }
        }

        writer.flush()?;
        Ok(())
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}

impl PixelSink for Raster {
    fn put_pixel(&self, x: u32, y: u32, color: Color) {
        if x >= self.width || y >= self.height {
            log::debug!("Dropping pixel outside raster: ({}, {})", x, y);
            return;
        }
        let packed = u32::from_ne_bytes(color_to_rgba(color));
        self.cells[self.index(x, y)].store(packed, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_put_and_get() {
        let raster = Raster::new(4, 3);
        assert_eq!(raster.get(2, 1), [0, 0, 0, 0]);

        raster.put_pixel(2, 1, Color::new(1.0, 0.0, 0.5));
        assert_eq!(raster.get(2, 1), [255, 0, 127, 255]);

        // Out of bounds writes are ignored
        raster.put_pixel(4, 0, Color::ONE);
        raster.put_pixel(0, 3, Color::ONE);

        raster.clear();
        assert_eq!(raster.get(2, 1), [0, 0, 0, 0]);
    }

    #[test]
    fn test_to_rgba_layout() {
        let raster = Raster::new(2, 2);
        raster.put_pixel(1, 0, Color::new(1.0, 0.0, 0.0));
        raster.put_pixel(0, 1, Color::new(0.0, 0.0, 1.0));

        let bytes = raster.to_rgba();
        assert_eq!(bytes.len(), 16);
        assert_eq!(&bytes[4..8], &[255, 0, 0, 255]);
        assert_eq!(&bytes[8..12], &[0, 0, 255, 255]);
        assert_eq!(&bytes[0..4], &[0, 0, 0, 0]);
    }

    #[test]
    fn test_concurrent_disjoint_rows() {
        let raster = Arc::new(Raster::new(64, 8));

        let handles: Vec<_> = (0..8u32)
            .map(|row| {
                let raster = Arc::clone(&raster);
                thread::spawn(move || {
                    for x in 0..64 {
                        raster.put_pixel(x, row, Color::splat(row as f32 / 7.0));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        for y in 0..8 {
            let expected = color_to_rgba(Color::splat(y as f32 / 7.0));
            for x in 0..64 {
                assert_eq!(raster.get(x, y), expected);
            }
        }
    }
}
