use clap::Parser;

use biome_blender::blend::BlendedBiomeProvider;
use biome_blender::export::{export_blended_map, render_blended_map, DEFAULT_BIOME_COLORS};
use biome_blender::geometry::BlendGeometry;
use biome_blender::populator::SimplexBiomeMapPopulator;
use biome_blender::viewer;

#[derive(Parser, Debug)]
#[command(name = "biome_blender")]
#[command(about = "Render a smoothly blended biome map from simplex noise")]
struct Args {
    /// Width of the map in columns
    #[arg(short = 'W', long, default_value = "512")]
    width: u32,

    /// Height of the map in columns
    #[arg(short = 'H', long, default_value = "512")]
    height: u32,

    /// Random seed (uses random seed if not specified)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Noise period in columns (larger = bigger biome patches)
    #[arg(long, default_value = "192.0")]
    noise_period: f64,

    /// Number of fBm octaves per biome noise
    #[arg(long, default_value = "3")]
    octaves: usize,

    /// Output PNG path (opens a window when not specified)
    #[arg(short, long)]
    output: Option<String>,
}

fn main() {
    let args = Args::parse();

    let seed = args.seed.unwrap_or_else(|| rand::random());
    println!(
        "Rendering {}x{} blended biome map with seed: {}",
        args.width, args.height, seed
    );

    let geometry = BlendGeometry::default();
    let populator = SimplexBiomeMapPopulator::new(
        seed,
        1.0 / args.noise_period,
        args.octaves,
        DEFAULT_BIOME_COLORS.len(),
        geometry,
    );
    let mut provider = BlendedBiomeProvider::new(geometry, Box::new(populator));

    let image = render_blended_map(&mut provider, args.width, args.height, &DEFAULT_BIOME_COLORS)
        .expect("Failed to render biome map");

    match args.output {
        Some(path) => {
            export_blended_map(&image, &path).expect("Failed to save image");
            println!("Saved image as {}", path);
        }
        None => viewer::show_image(&image, "Biome Blender - Esc: Exit"),
    }
}
