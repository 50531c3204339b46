pub mod config;
pub mod constants;
pub mod image;
pub mod output;
pub mod planar;

use log::*;
use std::io::Write;

pub use crate::config::CodecConfig;
pub use crate::image::{index_rgb, IndexedImage, Rgb};
pub use crate::output::{serialize, serialize_named, OutputMode, Serialized};
pub use crate::planar::bitplane::{decode_planes, encode_planes, Bitplane};
pub use crate::planar::palette::{quantize, IndexRemap, QuantizedPalette};
pub use crate::planar::{encode_image, CodecError, EncodedOutput};

/// Sends log records from `targets` to stderr at `level`; everything else
/// stays at warnings.
pub fn init_logging(targets: &[&str], level: LevelFilter) {
    let mut builder = env_logger::Builder::new();
    builder
        .target(env_logger::Target::Stderr)
        .filter_level(LevelFilter::Warn)
        .filter(Some("lib_planar"), level);
    for &target in targets {
        builder.filter(Some(target), level);
    }

    builder
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}:{}] {}",
                record.level(),
                record.file().unwrap_or("unknown"),
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .init();
}
