#![allow(dead_code)]

use lib_planar::{IndexedImage, Rgb};

pub const SPLASH_WIDTH: u32 = 320;
pub const SPLASH_HEIGHT: u32 = 256;
pub const SPLASH_PLANE_LEN: usize = 10240;

/// 32 distinct colors whose low nibbles are non-zero, so truncation shows.
pub fn splash_palette() -> Vec<Rgb> {
    (0..32u8)
        .map(|i| Rgb::new(i * 8 + 7, 0xFF - i * 8, i.wrapping_mul(37) | 0x0F))
        .collect()
}

/// Deterministic pseudo-random indices below `colors`.
pub fn noise_image(width: u32, height: u32, colors: u8, seed: u32) -> IndexedImage {
    let mut state = seed;
    let indices = (0..width * height)
        .map(|_| {
            state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            ((state >> 16) % colors as u32) as u8
        })
        .collect();
    IndexedImage::new(width, height, indices).unwrap()
}

/// Splash-sized image that only uses palette indices 0 and 5.
pub fn two_color_splash() -> IndexedImage {
    let indices = (0..SPLASH_WIDTH * SPLASH_HEIGHT)
        .map(|i| {
            let (x, y) = (i % SPLASH_WIDTH, i / SPLASH_WIDTH);
            if (x / 8 + y) % 3 == 0 {
                5
            } else {
                0
            }
        })
        .collect();
    IndexedImage::new(SPLASH_WIDTH, SPLASH_HEIGHT, indices).unwrap()
}
