use std::io;

use lib_planar::image::IndexingError;
use lib_planar::planar::bitplane::EncodeError;
use lib_planar::planar::palette::PaletteError;
use lib_planar::CodecError;
use thiserror::Error;

/// Wrapping variants keep the inner error as their source; callers walk
/// `source()` for the details.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("IO error")]
    Io(#[from] io::Error),

    #[error("Image processing error")]
    Image(#[from] image::ImageError),

    #[error("Invalid config file")]
    Config(#[from] toml::de::Error),

    #[error("Could not reduce image to a palette")]
    Indexing(#[from] IndexingError),

    #[error("Encoding failed")]
    Codec(#[from] CodecError),

    #[error("Invalid bitplane data")]
    Bitplane(#[from] EncodeError),

    #[error("Invalid palette")]
    Palette(#[from] PaletteError),

    #[error("Decoded pixels do not fill a {0}x{1} image")]
    PreviewBuffer(u32, u32),
}
