//! Blended biome map rendering and PNG export

use image::{ImageBuffer, Rgb, RgbImage};

use crate::blend::BlendedBiomeProvider;
use crate::cache::PopulationError;

/// Demo palette: green, dark orange, dark cyan.
pub const DEFAULT_BIOME_COLORS: [[u8; 3]; 3] = [[0, 255, 0], [178, 140, 0], [0, 178, 178]];

/// Render a blended biome map anchored at the world origin.
///
/// Walks the map chunk by chunk, so each chunk of columns costs a single
/// region cache query, then mixes the palette colors by biome weight per
/// column. `colors` is indexed by biome id.
pub fn render_blended_map(
    provider: &mut BlendedBiomeProvider,
    width: u32,
    height: u32,
    colors: &[[u8; 3]],
) -> Result<RgbImage, PopulationError> {
    let mut img: RgbImage = ImageBuffer::new(width, height);
    let chunk_size = provider.geometry().chunk_size() as u32;

    for chunk_z in 0..height.div_ceil(chunk_size) {
        for chunk_x in 0..width.div_ceil(chunk_size) {
            let chunk = provider.blended_biomes_for_chunk(chunk_x as i32, chunk_z as i32)?;

            for cz in 0..chunk_size {
                for cx in 0..chunk_size {
                    let x = chunk_x * chunk_size + cx;
                    let z = chunk_z * chunk_size + cz;
                    if x >= width || z >= height {
                        continue;
                    }

                    let mut rgb = [0.0f32; 3];
                    for entry in chunk.get(cx as usize, cz as usize) {
                        let color = colors[entry.biome as usize];
                        for channel in 0..3 {
                            rgb[channel] += color[channel] as f32 * entry.weight;
                        }
                    }

                    img.put_pixel(x, z, Rgb([rgb[0] as u8, rgb[1] as u8, rgb[2] as u8]));
                }
            }
        }
    }

    Ok(img)
}

/// Save a rendered map as a PNG.
pub fn export_blended_map(image: &RgbImage, path: &str) -> Result<(), image::ImageError> {
    image.save(path)
}
