/// Number of hardware palette slots a quantized palette is padded to.
pub const PALETTE_SLOTS: usize = 32;
/// Largest slot count an 8-bit index can address.
pub const MAX_SLOTS: usize = 256;

pub const MIN_PLANES: u8 = 1;
pub const MAX_PLANES: u8 = 8;

/// Horizontal pixels covered by one bitplane byte.
pub const PIXELS_PER_BYTE: usize = 8;

/// Screen size of the splash target.
pub const SCREEN_WIDTH: u32 = 320;
pub const SCREEN_HEIGHT: u32 = 256;

/// Array-name prefix used by the source text rendering.
pub const DEFAULT_NAME: &str = "splash";

pub const PALETTE_WORDS_PER_LINE: usize = 8;
pub const PLANE_BYTES_PER_LINE: usize = 16;
