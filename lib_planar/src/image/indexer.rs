use std::collections::HashMap;

use log::{debug, error};
use thiserror::Error;

use super::format::{ImageError, IndexedImage, Rgb};

#[derive(Error, Debug)]
pub enum IndexingError {
    #[error("Invalid pixel data length: expected {expected} bytes of RGB, got {actual}")]
    InvalidPixelDataLength { expected: usize, actual: usize },
    #[error("Palette overflow: maximum {max} colors supported, attempted to add color #{attempted}")]
    PaletteOverflow { max: usize, attempted: usize },
    #[error("Invalid image")]
    Image(#[from] ImageError),
}

/// Reduces a raw RGB buffer to a palette and an index grid.
///
/// Palette entries appear in the order their color is first encountered,
/// scanning rows top to bottom, so the same pixels always produce the same
/// palette.
///
/// # Parameters
/// - `pixels`: Raw RGB buffer, three bytes per pixel, rows top to bottom.
/// - `width`, `height`: Image dimensions in pixels.
/// - `max_colors`: Largest palette the caller accepts.
///
/// # Returns
/// The palette in first-encountered order and an image indexing into it.
///
/// # Errors
/// - `InvalidPixelDataLength` if `pixels` is not `width * height * 3` bytes
/// - `PaletteOverflow` if the image holds more than `max_colors` distinct colors
pub fn index_rgb(
    pixels: &[u8],
    width: u32,
    height: u32,
    max_colors: usize,
) -> Result<(Vec<Rgb>, IndexedImage), IndexingError> {
    // Validate input length
    let expected = width as usize * height as usize * 3;
    if pixels.len() != expected {
        error!(
            "RGB buffer of {} bytes does not match {}x{}",
            pixels.len(),
            width,
            height
        );
        return Err(IndexingError::InvalidPixelDataLength {
            expected,
            actual: pixels.len(),
        });
    }

    let mut unique_colors = HashMap::new();
    let mut palette = Vec::new();
    let mut indices = Vec::with_capacity(pixels.len() / 3);

    for pixel in pixels.chunks_exact(3) {
        let color = Rgb::new(pixel[0], pixel[1], pixel[2]);

        if let Some(&index) = unique_colors.get(&color) {
            indices.push(index);
            continue;
        }

        // An 8-bit index caps the palette at 256 regardless of `max_colors`
        if palette.len() >= max_colors.min(256) {
            error!("Image holds more than {} distinct colors", max_colors);
            return Err(IndexingError::PaletteOverflow {
                max: max_colors,
                attempted: palette.len() + 1,
            });
        }

        let index = palette.len() as u8;
        palette.push(color);
        unique_colors.insert(color, index);
        indices.push(index);
    }

    debug!(
        "Indexed {}x{} image: {} distinct colors",
        width,
        height,
        palette.len()
    );

    let image = IndexedImage::new(width, height, indices)?;
    Ok((palette, image))
}

/// Expands palette indices back into RGB pixel data.
///
/// # Errors
/// - `Image(IndexOutOfRange)` if any index exceeds the palette size
pub fn expand_rgb(image: &IndexedImage, palette: &[Rgb]) -> Result<Vec<u8>, IndexingError> {
    image.check_indices(palette.len())?;

    let mut pixels = Vec::with_capacity(image.indices().len() * 3);
    for &index in image.indices() {
        pixels.extend_from_slice(&palette[index as usize].to_array());
    }

    Ok(pixels)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_first_encountered_order() {
        let pixels = vec![
            0, 0, 255, // Blue
            255, 0, 0, // Red
            0, 0, 255, // Blue
            0, 255, 0, // Green
        ];

        let (palette, image) = index_rgb(&pixels, 4, 1, 32).unwrap();
        assert_eq!(
            palette,
            vec![
                Rgb::new(0, 0, 255),
                Rgb::new(255, 0, 0),
                Rgb::new(0, 255, 0)
            ]
        );
        assert_eq!(image.indices(), &[0, 1, 0, 2]);

        let expanded = expand_rgb(&image, &palette).unwrap();
        assert_eq!(expanded, pixels);
    }

    #[test]
    fn test_index_invalid_length() {
        let result = index_rgb(&[255, 0, 0, 255], 1, 1, 32);
        assert!(matches!(
            result,
            Err(IndexingError::InvalidPixelDataLength {
                expected: 3,
                actual: 4
            })
        ));
    }

    #[test]
    fn test_index_overflow() {
        let mut pixels = Vec::new();
        for i in 0..33u8 {
            pixels.extend_from_slice(&[i, 0, 0]);
        }
        let result = index_rgb(&pixels, 33, 1, 32);
        assert!(matches!(
            result,
            Err(IndexingError::PaletteOverflow {
                max: 32,
                attempted: 33
            })
        ));
    }

    #[test]
    fn test_index_empty_input() {
        let (palette, image) = index_rgb(&[], 0, 0, 32).unwrap();
        assert!(palette.is_empty());
        assert!(image.is_empty());
    }

    #[test]
    fn test_expand_invalid_index() {
        let image = IndexedImage::new(2, 1, vec![0, 1]).unwrap();
        let result = expand_rgb(&image, &[Rgb::new(255, 0, 0)]);
        assert!(matches!(
            result,
            Err(IndexingError::Image(ImageError::IndexOutOfRange {
                index: 1,
                position: 1,
                palette_size: 1
            }))
        ));
    }
}
