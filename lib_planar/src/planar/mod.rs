pub mod bitplane;
pub mod palette;

use bitplane::{Bitplane, EncodeError};
use log::{debug, error, info};
use palette::{PaletteError, QuantizedPalette};
use thiserror::Error;

use crate::config::CodecConfig;
use crate::constants::PIXELS_PER_BYTE;
use crate::image::{ImageError, IndexedImage, Rgb};

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("Palette quantization failed")]
    PaletteFailed(#[from] PaletteError),
    #[error("Bitplane encoding failed")]
    EncodeFailed(#[from] EncodeError),
    #[error("Index remapping failed")]
    RemapFailed(#[from] ImageError),
}

/// Everything the serializer needs: the padded palette and one buffer per plane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedOutput {
    pub width: u32,
    pub height: u32,
    pub palette: QuantizedPalette,
    pub planes: Vec<Bitplane>,
}

impl EncodedOutput {
    pub fn plane_count(&self) -> usize {
        self.planes.len()
    }

    pub fn plane_len(&self) -> usize {
        (self.width as usize / PIXELS_PER_BYTE) * self.height as usize
    }

    /// Reassembles the remapped index grid from the planes.
    pub fn decode(&self) -> Result<IndexedImage, EncodeError> {
        bitplane::decode_planes(&self.planes, self.width, self.height)
    }
}

/// Runs palette quantization, index remapping and bitplane encoding on one
/// image.
///
/// Shape problems are reported before any work is done, so a failure never
/// leaves a partial result behind.
pub fn encode_image(
    palette: &[Rgb],
    image: &IndexedImage,
    config: &CodecConfig,
) -> Result<EncodedOutput, CodecError> {
    info!("Starting encoding");

    let (width, height) = (image.width(), image.height());
    if let Some((expected_width, expected_height)) = config.expected_size() {
        if (width, height) != (expected_width, expected_height) {
            error!(
                "Image is {}x{}, expected {}x{}",
                width, height, expected_width, expected_height
            );
            return Err(EncodeError::UnexpectedSize {
                width,
                height,
                expected_width,
                expected_height,
            }
            .into());
        }
    }
    bitplane::row_bytes(width, height)?;
    let plane_count = config.plane_count();
    bitplane::check_plane_count(plane_count, None)?;
    debug!(
        "Image {}x{}, {} source colors, {} slots, {} planes",
        width,
        height,
        palette.len(),
        config.slots,
        plane_count
    );

    // Step 1: Palette quantization
    let (quantized, remap) = palette::quantize_with_slots(palette, image, config.slots)?;
    debug!("Palette words: {:03x?}", quantized.words());

    // Step 2: Index remapping
    let remapped = if remap.is_identity() {
        image.clone()
    } else {
        debug!("Remapping indices {:?}", remap.originals());
        remap.apply(image)?
    };

    // Step 3: Bitplane encoding
    let planes = bitplane::encode_planes(&remapped, plane_count)?;

    info!(
        "Encoding completed successfully: {} colors, {} planes of {} bytes",
        remap.len(),
        planes.len(),
        planes.first().map_or(0, Bitplane::len)
    );

    Ok(EncodedOutput {
        width,
        height,
        palette: quantized,
        planes,
    })
}
