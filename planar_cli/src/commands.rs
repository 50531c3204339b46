//! Subcommand implementations.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use clap::Args;
use lib_planar::image::expand_rgb;
use lib_planar::output::palette_bytes;
use lib_planar::planar::bitplane::split_blob;
use lib_planar::{
    decode_planes, encode_image, index_rgb, serialize_named, CodecConfig, QuantizedPalette,
    Serialized,
};
use log::{debug, info};

use crate::config::{self, ConfigFile};
use crate::error::CliError;
use crate::{parse_size, CliOutputMode};

#[derive(Args, Debug, Clone, Default)]
pub struct EncodeArgs {
    /// Source image, at most as many colors as palette slots
    pub input: PathBuf,

    /// Output file (binary default: <input>.bpl, source default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum)]
    pub mode: Option<CliOutputMode>,

    /// Also write the standalone palette file
    #[arg(long)]
    pub palette_out: Option<PathBuf>,

    /// Number of bitplanes (default: enough for every palette slot)
    #[arg(long)]
    pub planes: Option<u8>,

    /// Hardware palette slots
    #[arg(long)]
    pub slots: Option<usize>,

    /// Required image size, e.g. 320x256
    #[arg(long, value_parser = parse_size)]
    pub size: Option<(u32, u32)>,

    /// Array-name prefix for source output
    #[arg(long)]
    pub name: Option<String>,

    /// TOML config file; flags override its values
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct PreviewArgs {
    /// Binary bitplane blob
    pub blob: PathBuf,

    /// Standalone palette file
    #[arg(long)]
    pub palette: PathBuf,

    /// Image size, e.g. 320x256
    #[arg(long, value_parser = parse_size)]
    pub size: (u32, u32),

    /// Number of bitplanes in the blob
    #[arg(long, default_value_t = 5)]
    pub planes: u8,

    /// Output image
    #[arg(short, long, default_value = "preview.png")]
    pub output: PathBuf,
}

/// Settings for one encode run after merging the config file and flags.
#[derive(Debug, Clone)]
pub struct EncodeSettings {
    pub codec: CodecConfig,
    pub mode: CliOutputMode,
    pub palette_out: Option<PathBuf>,
}

impl EncodeArgs {
    /// Flags win over the config file; the file wins over built-in defaults.
    pub fn settings(&self, file: ConfigFile) -> EncodeSettings {
        let mut codec = file.codec;
        if let Some(slots) = self.slots {
            codec.slots = slots;
        }
        if self.planes.is_some() {
            codec.planes = self.planes;
        }
        if let Some((width, height)) = self.size {
            codec.width = Some(width);
            codec.height = Some(height);
        }
        if let Some(name) = &self.name {
            codec.name = name.clone();
        }

        EncodeSettings {
            codec,
            mode: self.mode.or(file.output.mode).unwrap_or_default(),
            palette_out: self.palette_out.clone().or(file.output.palette),
        }
    }
}

/// Encodes `args.input`. Source text without `-o` goes to `stdout`.
pub fn encode<W: Write>(args: &EncodeArgs, stdout: &mut W) -> Result<(), CliError> {
    let settings = args.settings(config::load(args.config.as_deref())?);
    debug!("Encode settings: {:?}", settings);

    // Step 1: Decode and index the source image
    let source = image::open(&args.input)?.to_rgb8();
    let (width, height) = source.dimensions();
    info!("Loaded {} ({}x{})", args.input.display(), width, height);
    let (palette, indexed) = index_rgb(source.as_raw(), width, height, settings.codec.slots)?;

    // Step 2: Quantize, remap and split into planes
    let encoded = encode_image(&palette, &indexed, &settings.codec)?;
    let serialized = serialize_named(&encoded, settings.mode.into(), &settings.codec.name);

    // Step 3: Write the artifacts
    match (&args.output, &serialized) {
        (Some(path), _) => write_file(path, serialized.as_bytes())?,
        (None, Serialized::Text(_)) => serialized.write_to(stdout)?,
        (None, Serialized::Binary(bytes)) => write_file(&args.input.with_extension("bpl"), bytes)?,
    }

    if let Some(path) = &settings.palette_out {
        write_file(path, &palette_bytes(&encoded.palette))?;
    }
    Ok(())
}

/// Rebuilds an RGB image from a binary blob and a palette file.
pub fn preview(args: &PreviewArgs) -> Result<(), CliError> {
    let (width, height) = args.size;
    let blob = fs::read(&args.blob)?;
    let palette = QuantizedPalette::from_be_bytes(&fs::read(&args.palette)?)?;

    let bitplanes = split_blob(&blob, width, height, args.planes)?;
    let indexed = decode_planes(&bitplanes, width, height)?;
    let pixels = expand_rgb(&indexed, &palette.colors())?;

    let preview = image::RgbImage::from_raw(width, height, pixels)
        .ok_or(CliError::PreviewBuffer(width, height))?;
    preview.save(&args.output)?;
    info!("Wrote preview {}", args.output.display());
    Ok(())
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<(), CliError> {
    fs::write(path, bytes)?;
    info!("Wrote {} ({} bytes)", path.display(), bytes.len());
    Ok(())
}
