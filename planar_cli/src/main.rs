//! png2planar
//!
//! Converts an image into planar bitplanes and a 12-bit hardware palette,
//! either as a raw blob or as array literals for firmware sources.

mod commands;
mod config;
mod error;

use std::error::Error as _;
use std::io;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use lib_planar::OutputMode;
use log::{error, LevelFilter};
use serde::Deserialize;

use crate::commands::{EncodeArgs, PreviewArgs};
use crate::error::CliError;

#[derive(Clone, Copy, Debug, Default, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CliOutputMode {
    /// Headerless blob of concatenated bitplanes
    #[default]
    Binary,
    /// Array literals for firmware sources
    Source,
}

impl From<CliOutputMode> for OutputMode {
    fn from(mode: CliOutputMode) -> Self {
        match mode {
            CliOutputMode::Binary => OutputMode::Binary,
            CliOutputMode::Source => OutputMode::SourceText,
        }
    }
}

#[derive(Parser)]
#[command(name = "png2planar")]
#[command(about = "Convert images to planar bitplanes and an RGB12 palette")]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode an image into bitplanes
    Encode(EncodeArgs),
    /// Render a binary blob and palette file back into an image
    Preview(PreviewArgs),
}

fn parse_size(s: &str) -> Result<(u32, u32), String> {
    let (width, height) = s
        .split_once(|c: char| c == 'x' || c == 'X')
        .ok_or_else(|| format!("Invalid size '{}': expected WIDTHxHEIGHT", s))?;
    let width = width
        .trim()
        .parse()
        .map_err(|_| format!("Invalid width in '{}'", s))?;
    let height = height
        .trim()
        .parse()
        .map_err(|_| format!("Invalid height in '{}'", s))?;
    Ok((width, height))
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    lib_planar::init_logging(&["png2planar"], level);

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            let mut source = e.source();
            while let Some(cause) = source {
                error!("  caused by: {}", cause);
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Encode(args) => commands::encode(&args, &mut io::stdout().lock()),
        Commands::Preview(args) => commands::preview(&args),
    }
}
