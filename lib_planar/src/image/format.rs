use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImageError {
    #[error("Pixel count mismatch: {width}x{height} needs {expected} indices, got {actual}")]
    PixelCountMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
    #[error("Invalid palette index: {index} at pixel #{position} exceeds palette size of {palette_size}")]
    IndexOutOfRange {
        index: u8,
        position: usize,
        palette_size: usize,
    },
    #[error("Palette index {index} at pixel #{position} has no remapped entry")]
    UnmappedIndex { index: u8, position: usize },
}

/// An 8-bit-per-channel palette color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Packs the top nibble of each channel into a `0x0BGR` hardware word.
    pub const fn to_rgb12(self) -> u16 {
        ((self.b as u16 >> 4) << 8) | ((self.g as u16 >> 4) << 4) | (self.r as u16 >> 4)
    }

    /// Expands a `0x0BGR` word back to 8 bits per channel (nibble * 17).
    pub const fn from_rgb12(word: u16) -> Self {
        let r = (word & 0xF) as u8;
        let g = ((word >> 4) & 0xF) as u8;
        let b = ((word >> 8) & 0xF) as u8;
        Self {
            r: r * 17,
            g: g * 17,
            b: b * 17,
        }
    }

    pub const fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl From<[u8; 3]> for Rgb {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self::new(r, g, b)
    }
}

/// A grid of palette indices, stored row-major.
///
/// The image only guarantees that the index buffer matches its dimensions.
/// Byte alignment of the width is checked by the bitplane encoder, which is
/// the stage that depends on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedImage {
    width: u32,
    height: u32,
    indices: Vec<u8>,
}

impl IndexedImage {
    pub fn new(width: u32, height: u32, indices: Vec<u8>) -> Result<Self, ImageError> {
        let expected = width as usize * height as usize;
        if indices.len() != expected {
            return Err(ImageError::PixelCountMismatch {
                width,
                height,
                expected,
                actual: indices.len(),
            });
        }

        Ok(Self {
            width,
            height,
            indices,
        })
    }

    /// Builds an image and checks every index against the palette size.
    pub fn with_palette(
        width: u32,
        height: u32,
        indices: Vec<u8>,
        palette_size: usize,
    ) -> Result<Self, ImageError> {
        let image = Self::new(width, height, indices)?;
        image.check_indices(palette_size)?;
        Ok(image)
    }

    pub fn check_indices(&self, palette_size: usize) -> Result<(), ImageError> {
        match self
            .indices
            .iter()
            .position(|&index| index as usize >= palette_size)
        {
            Some(position) => Err(ImageError::IndexOutOfRange {
                index: self.indices[position],
                position,
                palette_size,
            }),
            None => Ok(()),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn indices(&self) -> &[u8] {
        &self.indices
    }

    pub fn into_indices(self) -> Vec<u8> {
        self.indices
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.indices
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    /// Rows top to bottom. Yields nothing for a zero-width image.
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.indices.chunks_exact(self.width.max(1) as usize)
    }

    pub fn max_index(&self) -> Option<u8> {
        self.indices.iter().copied().max()
    }
}
