//! Minimal window for eyeballing a rendered map

use image::RgbImage;
use minifb::{Key, Window, WindowOptions};

/// Show a rendered map in a window until Escape or close.
pub fn show_image(image: &RgbImage, title: &str) {
    let width = image.width() as usize;
    let height = image.height() as usize;

    let buffer: Vec<u32> = image
        .pixels()
        .map(|pixel| {
            let [r, g, b] = pixel.0;
            u32::from_be_bytes([0, r, g, b])
        })
        .collect();

    let mut window = Window::new(
        title,
        width,
        height,
        WindowOptions {
            resize: false,
            ..WindowOptions::default()
        },
    )
    .expect("Failed to create window");

    // Limit to ~60fps
    window.set_target_fps(60);

    while window.is_open() && !window.is_key_down(Key::Escape) {
        window
            .update_with_buffer(&buffer, width, height)
            .expect("Failed to update window");
    }
}
