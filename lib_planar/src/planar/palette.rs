use std::collections::{BTreeSet, HashMap};

use log::{debug, error};
use thiserror::Error;

use crate::constants::{MAX_SLOTS, PALETTE_SLOTS};
use crate::image::{ImageError, IndexedImage, Rgb};

#[derive(Error, Debug)]
pub enum PaletteError {
    #[error("Palette too large: {len} colors do not fit in {slots} slots")]
    PaletteTooLarge { len: usize, slots: usize },
    #[error("Invalid slot count {0}: must be between 1 and 256")]
    InvalidSlotCount(usize),
    #[error("Palette index {index} is outside the source palette of {len} colors")]
    IndexOutOfPalette { index: u8, len: usize },
    #[error("Invalid palette file length: {0} bytes is not a whole number of 16-bit words within 256 slots")]
    InvalidPaletteFile(usize),
}

/// Hardware palette: `0x0BGR` words padded with zeros to the slot count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantizedPalette {
    words: Vec<u16>,
}

impl QuantizedPalette {
    pub fn words(&self) -> &[u16] {
        &self.words
    }

    /// Slot count, including zero padding.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<u16> {
        self.words.get(index).copied()
    }

    /// Colors as the display shows them.
    pub fn colors(&self) -> Vec<Rgb> {
        self.words.iter().map(|&word| Rgb::from_rgb12(word)).collect()
    }

    /// Standalone palette file layout: one big-endian word per slot.
    pub fn to_be_bytes(&self) -> Vec<u8> {
        self.words.iter().flat_map(|word| word.to_be_bytes()).collect()
    }

    pub fn from_be_bytes(bytes: &[u8]) -> Result<Self, PaletteError> {
        if bytes.is_empty() || bytes.len() % 2 != 0 || bytes.len() > MAX_SLOTS * 2 {
            error!("Palette file has {} bytes", bytes.len());
            return Err(PaletteError::InvalidPaletteFile(bytes.len()));
        }

        let words = bytes
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        Ok(Self { words })
    }
}

/// Maps the palette indices an image references onto `0..used`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IndexRemap {
    forward: HashMap<u8, u8>,
    originals: Vec<u8>,
}

impl IndexRemap {
    /// Assigns compact indices in ascending order of the original index.
    pub fn from_used(used: &BTreeSet<u8>) -> Self {
        let originals: Vec<u8> = used.iter().copied().collect();
        let forward = originals
            .iter()
            .enumerate()
            .map(|(compact, &original)| (original, compact as u8))
            .collect();
        Self { forward, originals }
    }

    /// Number of surviving colors.
    pub fn len(&self) -> usize {
        self.originals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.originals.is_empty()
    }

    pub fn get(&self, original: u8) -> Option<u8> {
        self.forward.get(&original).copied()
    }

    pub fn original(&self, compact: u8) -> Option<u8> {
        self.originals.get(compact as usize).copied()
    }

    /// Original indices in compact order.
    pub fn originals(&self) -> &[u8] {
        &self.originals
    }

    pub fn is_identity(&self) -> bool {
        self.originals
            .iter()
            .enumerate()
            .all(|(compact, &original)| compact == original as usize)
    }

    /// Rewrites every pixel of `image` to its compact index.
    pub fn apply(&self, image: &IndexedImage) -> Result<IndexedImage, ImageError> {
        let indices = self.rewrite(image, |index| self.get(index))?;
        IndexedImage::new(image.width(), image.height(), indices)
    }

    /// Restores original indices on an image produced by [`IndexRemap::apply`].
    pub fn undo(&self, image: &IndexedImage) -> Result<IndexedImage, ImageError> {
        let indices = self.rewrite(image, |index| self.original(index))?;
        IndexedImage::new(image.width(), image.height(), indices)
    }

    fn rewrite(
        &self,
        image: &IndexedImage,
        lookup: impl Fn(u8) -> Option<u8>,
    ) -> Result<Vec<u8>, ImageError> {
        image
            .indices()
            .iter()
            .enumerate()
            .map(|(position, &index)| {
                lookup(index).ok_or(ImageError::UnmappedIndex { index, position })
            })
            .collect()
    }
}

/// Quantizes `source_palette` to the default 32 hardware slots.
pub fn quantize(
    source_palette: &[Rgb],
    image: &IndexedImage,
) -> Result<(QuantizedPalette, IndexRemap), PaletteError> {
    quantize_with_slots(source_palette, image, PALETTE_SLOTS)
}

/// Drops palette entries the image never references, quantizes the rest to
/// `0x0BGR` and pads the result with zero words up to `slots`.
///
/// # Parameters
/// - `source_palette`: Colors the image indices point into.
/// - `image`: Indexed image; only the indices it actually uses are kept.
/// - `slots`: Hardware palette size the result is padded to.
///
/// # Returns
/// The padded palette in compact order, and the remap from source indices to
/// compact ones. Compact indices follow ascending source index order.
///
/// # Errors
/// - `InvalidSlotCount` if `slots` is outside `1..=256`
/// - `PaletteTooLarge` if `source_palette` has more entries than `slots`
/// - `IndexOutOfPalette` if a pixel references a color the palette lacks
pub fn quantize_with_slots(
    source_palette: &[Rgb],
    image: &IndexedImage,
    slots: usize,
) -> Result<(QuantizedPalette, IndexRemap), PaletteError> {
    // Validate slot count and palette size
    if slots == 0 || slots > MAX_SLOTS {
        error!("Slot count {} is out of range", slots);
        return Err(PaletteError::InvalidSlotCount(slots));
    }
    if source_palette.len() > slots {
        error!(
            "Source palette has {} colors, only {} slots available",
            source_palette.len(),
            slots
        );
        return Err(PaletteError::PaletteTooLarge {
            len: source_palette.len(),
            slots,
        });
    }

    // Collect used indices; every one must name a palette entry
    let used: BTreeSet<u8> = image.indices().iter().copied().collect();
    if let Some(&index) = used
        .iter()
        .find(|&&index| index as usize >= source_palette.len())
    {
        error!(
            "Pixel index {} has no entry in a palette of {} colors",
            index,
            source_palette.len()
        );
        return Err(PaletteError::IndexOutOfPalette {
            index,
            len: source_palette.len(),
        });
    }

    // Quantize surviving colors in remapped order, then pad with black
    let remap = IndexRemap::from_used(&used);
    let mut words: Vec<u16> = remap
        .originals()
        .iter()
        .map(|&original| source_palette[original as usize].to_rgb12())
        .collect();
    words.resize(slots, 0);

    debug!(
        "Quantized palette: {} of {} colors used, padded to {} slots",
        remap.len(),
        source_palette.len(),
        slots
    );

    Ok((QuantizedPalette { words }, remap))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn palette_of(len: usize) -> Vec<Rgb> {
        (0..len)
            .map(|i| Rgb::new((i * 8) as u8, 0x80, 0xFF - (i * 8) as u8))
            .collect()
    }

    #[test]
    fn test_quantize_drops_unused_entries() {
        let palette = palette_of(8);
        let image = IndexedImage::new(4, 1, vec![6, 2, 2, 6]).unwrap();

        let (quantized, remap) = quantize(&palette, &image).unwrap();
        assert_eq!(quantized.len(), 32);
        assert_eq!(quantized.get(0), Some(palette[2].to_rgb12()));
        assert_eq!(quantized.get(1), Some(palette[6].to_rgb12()));
        assert!(quantized.words()[2..].iter().all(|&word| word == 0));

        assert_eq!(remap.len(), 2);
        assert_eq!(remap.get(2), Some(0));
        assert_eq!(remap.get(6), Some(1));
        assert_eq!(remap.get(3), None);
        assert!(!remap.is_identity());
    }

    #[test]
    fn test_quantize_identity_remap() {
        let palette = palette_of(4);
        let image = IndexedImage::new(4, 1, vec![3, 2, 1, 0]).unwrap();

        let (_, remap) = quantize(&palette, &image).unwrap();
        assert!(remap.is_identity());

        let remapped = remap.apply(&image).unwrap();
        assert_eq!(remapped, image);
    }

    #[test]
    fn test_quantize_palette_too_large() {
        let palette = palette_of(33);
        let image = IndexedImage::new(1, 1, vec![0]).unwrap();

        let result = quantize(&palette, &image);
        assert!(matches!(
            result,
            Err(PaletteError::PaletteTooLarge { len: 33, slots: 32 })
        ));
    }

    #[test]
    fn test_quantize_index_out_of_palette() {
        let palette = palette_of(2);
        let image = IndexedImage::new(2, 1, vec![0, 2]).unwrap();

        let result = quantize(&palette, &image);
        assert!(matches!(
            result,
            Err(PaletteError::IndexOutOfPalette { index: 2, len: 2 })
        ));
    }

    #[test]
    fn test_quantize_empty_image() {
        let image = IndexedImage::new(0, 0, Vec::new()).unwrap();

        let (quantized, remap) = quantize(&[], &image).unwrap();
        assert_eq!(quantized.words(), &[0u16; 32]);
        assert!(remap.is_empty());
    }

    #[test]
    fn test_quantize_custom_slots() {
        let palette = palette_of(4);
        let image = IndexedImage::new(2, 1, vec![1, 3]).unwrap();

        let (quantized, _) = quantize_with_slots(&palette, &image, 4).unwrap();
        assert_eq!(quantized.len(), 4);

        assert!(matches!(
            quantize_with_slots(&palette, &image, 0),
            Err(PaletteError::InvalidSlotCount(0))
        ));
        assert!(matches!(
            quantize_with_slots(&palette, &image, 3),
            Err(PaletteError::PaletteTooLarge { len: 4, slots: 3 })
        ));
    }

    #[test]
    fn test_remap_undo() {
        let palette = palette_of(16);
        let image = IndexedImage::new(4, 2, vec![15, 9, 9, 4, 4, 15, 0, 9]).unwrap();

        let (_, remap) = quantize(&palette, &image).unwrap();
        let remapped = remap.apply(&image).unwrap();
        assert_eq!(remapped.indices(), &[3, 2, 2, 1, 1, 3, 0, 2]);
        assert_eq!(remap.undo(&remapped).unwrap(), image);
    }

    #[test]
    fn test_remap_unmapped_index() {
        let remap = IndexRemap::from_used(&BTreeSet::from([1, 2]));
        let image = IndexedImage::new(2, 1, vec![1, 5]).unwrap();

        let result = remap.apply(&image);
        assert!(matches!(
            result,
            Err(ImageError::UnmappedIndex {
                index: 5,
                position: 1
            })
        ));
    }

    #[test]
    fn test_palette_file_bytes() {
        let palette = vec![Rgb::new(0xF0, 0x80, 0x10)];
        let image = IndexedImage::new(1, 1, vec![0]).unwrap();
        let (quantized, _) = quantize(&palette, &image).unwrap();

        let bytes = quantized.to_be_bytes();
        assert_eq!(bytes.len(), 64);
        assert_eq!(&bytes[..2], &[0x01, 0x8F]);
        assert!(bytes[2..].iter().all(|&b| b == 0));

        let read_back = QuantizedPalette::from_be_bytes(&bytes).unwrap();
        assert_eq!(read_back, quantized);
    }

    #[test]
    fn test_palette_file_invalid_length() {
        assert!(matches!(
            QuantizedPalette::from_be_bytes(&[0x01, 0x02, 0x03]),
            Err(PaletteError::InvalidPaletteFile(3))
        ));
        assert!(matches!(
            QuantizedPalette::from_be_bytes(&[]),
            Err(PaletteError::InvalidPaletteFile(0))
        ));
    }
}
