use log::{debug, error};
use thiserror::Error;

use crate::constants::{MAX_PLANES, MIN_PLANES, PIXELS_PER_BYTE};
use crate::image::{ImageError, IndexedImage};

#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("Unsupported dimensions {width}x{height}: width must be a non-zero multiple of 8 and height non-zero")]
    UnsupportedDimensions { width: u32, height: u32 },
    #[error("Image is {width}x{height}, expected {expected_width}x{expected_height}")]
    UnexpectedSize {
        width: u32,
        height: u32,
        expected_width: u32,
        expected_height: u32,
    },
    #[error("Invalid plane count {planes}: need between {required} and 8 planes")]
    InvalidPlaneCount { planes: u8, required: u8 },
    #[error("Blob length mismatch: expected {expected} bytes, got {actual}")]
    BlobLength { expected: usize, actual: usize },
    #[error("Plane #{plane} holds {actual} bytes, expected {expected}")]
    PlaneLength {
        plane: usize,
        expected: usize,
        actual: usize,
    },
    #[error("Invalid image")]
    Image(#[from] ImageError),
}

/// One bit of every pixel's index, packed MSB-first, rows top to bottom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitplane {
    plane: u8,
    bytes: Vec<u8>,
}

impl Bitplane {
    /// The index bit this plane carries.
    pub fn plane(&self) -> u8 {
        self.plane
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Bit for pixel `(x, y)` of an image `width` pixels wide.
    ///
    /// Returns `None` for pixels outside the plane, and for widths the
    /// encoder would have rejected.
    pub fn bit(&self, x: u32, y: u32, width: u32) -> Option<bool> {
        if x >= width || width as usize % PIXELS_PER_BYTE != 0 {
            return None;
        }
        let row_bytes = width as usize / PIXELS_PER_BYTE;
        let byte = self
            .bytes
            .get(y as usize * row_bytes + x as usize / PIXELS_PER_BYTE)?;
        Some(byte & (0x80 >> (x as usize % PIXELS_PER_BYTE)) != 0)
    }
}

/// Validates the grid shape and returns the number of bytes per plane row.
pub fn row_bytes(width: u32, height: u32) -> Result<usize, EncodeError> {
    if width == 0 || height == 0 || width as usize % PIXELS_PER_BYTE != 0 {
        error!("Unsupported dimensions {}x{}", width, height);
        return Err(EncodeError::UnsupportedDimensions { width, height });
    }
    Ok(width as usize / PIXELS_PER_BYTE)
}

/// Bytes in one plane of a `width` x `height` image.
pub fn plane_len(width: u32, height: u32) -> Result<usize, EncodeError> {
    Ok(row_bytes(width, height)? * height as usize)
}

/// Fewest planes that can hold `max_index`, never less than one.
pub fn planes_for_index(max_index: u8) -> u8 {
    (u8::BITS - max_index.leading_zeros()).max(MIN_PLANES as u32) as u8
}

/// Planes needed to address every one of `slots` palette entries.
pub fn planes_for_slots(slots: usize) -> u8 {
    planes_for_index(slots.saturating_sub(1).min(u8::MAX as usize) as u8)
}

pub fn check_plane_count(planes: u8, max_index: Option<u8>) -> Result<(), EncodeError> {
    let required = max_index.map_or(MIN_PLANES, planes_for_index);
    if planes < required || planes > MAX_PLANES {
        error!(
            "Plane count {} out of range {}..={}",
            planes, required, MAX_PLANES
        );
        return Err(EncodeError::InvalidPlaneCount { planes, required });
    }
    Ok(())
}

/// Splits an indexed image into `plane_count` bitplanes.
///
/// Plane `p` holds bit `p` of every index. Within a plane, rows run top to
/// bottom and each byte covers eight pixels, the leftmost in the most
/// significant bit.
///
/// # Parameters
/// - `image`: Indexed image, already remapped to compact indices.
/// - `plane_count`: Number of planes to emit, 1 to 8.
///
/// # Returns
/// `plane_count` planes ordered by bit, each `(width / 8) * height` bytes.
///
/// # Errors
/// - `UnsupportedDimensions` if the width is not a non-zero multiple of 8,
///   or the height is zero
/// - `InvalidPlaneCount` if `plane_count` is outside `1..=8` or too small for
///   the largest index in the image
pub fn encode_planes(
    image: &IndexedImage,
    plane_count: u8,
) -> Result<Vec<Bitplane>, EncodeError> {
    // Validate shape before plane count
    let row_bytes = row_bytes(image.width(), image.height())?;
    check_plane_count(plane_count, image.max_index())?;

    // Pack one plane per index bit
    let planes: Vec<Bitplane> = (0..plane_count)
        .map(|plane| encode_plane(image, plane, row_bytes))
        .collect();

    debug!(
        "Encoded {} planes of {} bytes",
        planes.len(),
        row_bytes * image.height() as usize
    );
    Ok(planes)
}

fn encode_plane(image: &IndexedImage, plane: u8, row_bytes: usize) -> Bitplane {
    let mut bytes = Vec::with_capacity(row_bytes * image.height() as usize);

    for row in image.rows() {
        for group in row.chunks_exact(PIXELS_PER_BYTE) {
            let byte = group
                .iter()
                .fold(0u8, |acc, &index| (acc << 1) | ((index >> plane) & 1));
            bytes.push(byte);
        }
    }

    Bitplane { plane, bytes }
}

/// Stacks bitplanes back into an index grid.
///
/// # Errors
/// - `UnsupportedDimensions` for the same shapes `encode_planes` rejects
/// - `InvalidPlaneCount` if there are no planes or more than 8
/// - `PlaneLength` if a plane does not hold `(width / 8) * height` bytes
pub fn decode_planes(
    planes: &[Bitplane],
    width: u32,
    height: u32,
) -> Result<IndexedImage, EncodeError> {
    let expected = plane_len(width, height)?;
    let count = u8::try_from(planes.len()).unwrap_or(u8::MAX);
    check_plane_count(count, None)?;

    if let Some((plane, bitplane)) = planes
        .iter()
        .enumerate()
        .find(|(_, bitplane)| bitplane.len() != expected)
    {
        error!("Plane #{} has {} bytes", plane, bitplane.len());
        return Err(EncodeError::PlaneLength {
            plane,
            expected,
            actual: bitplane.len(),
        });
    }

    let mut indices = vec![0u8; expected * PIXELS_PER_BYTE];
    for (p, bitplane) in planes.iter().enumerate() {
        for (i, &byte) in bitplane.bytes().iter().enumerate() {
            for bit in 0..PIXELS_PER_BYTE {
                let value = (byte >> (7 - bit)) & 1;
                indices[i * PIXELS_PER_BYTE + bit] |= value << p;
            }
        }
    }

    Ok(IndexedImage::new(width, height, indices)?)
}

/// Cuts a headerless binary blob into its `plane_count` planes.
pub fn split_blob(
    blob: &[u8],
    width: u32,
    height: u32,
    plane_count: u8,
) -> Result<Vec<Bitplane>, EncodeError> {
    let len = plane_len(width, height)?;
    check_plane_count(plane_count, None)?;

    let expected = len * plane_count as usize;
    if blob.len() != expected {
        error!("Blob has {} bytes, expected {}", blob.len(), expected);
        return Err(EncodeError::BlobLength {
            expected,
            actual: blob.len(),
        });
    }

    Ok(blob
        .chunks_exact(len)
        .zip(0..plane_count)
        .map(|(bytes, plane)| Bitplane {
            plane,
            bytes: bytes.to_vec(),
        })
        .collect())
}
