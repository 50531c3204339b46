//! Serialization of encoded planes.
//!
//! Two renderings of the same data:
//! - `Binary`: the planes back to back, plane 0 first, no header
//! - `SourceText`: array literals of the palette and each plane, for
//!   including in firmware sources
//!
//! The text form carries exactly the bytes of the binary form, so element
//! counts match between the two.

use std::io::{self, Write};

use log::debug;

use crate::constants::{DEFAULT_NAME, PALETTE_WORDS_PER_LINE, PLANE_BYTES_PER_LINE};
use crate::planar::palette::QuantizedPalette;
use crate::planar::EncodedOutput;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    #[default]
    Binary,
    SourceText,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Serialized {
    Binary(Vec<u8>),
    Text(String),
}

impl Serialized {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Serialized::Binary(bytes) => bytes,
            Serialized::Text(text) => text.as_bytes(),
        }
    }

    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(self.as_bytes())?;
        writer.flush()
    }
}

/// Serializes with the default array-name prefix.
pub fn serialize(output: &EncodedOutput, mode: OutputMode) -> Serialized {
    serialize_named(output, mode, DEFAULT_NAME)
}

pub fn serialize_named(output: &EncodedOutput, mode: OutputMode, name: &str) -> Serialized {
    match mode {
        OutputMode::Binary => Serialized::Binary(to_binary(output)),
        OutputMode::SourceText => Serialized::Text(to_source_text(output, name)),
    }
}

/// Concatenates the planes in ascending plane order.
pub fn to_binary(output: &EncodedOutput) -> Vec<u8> {
    let mut blob = Vec::with_capacity(output.plane_count() * output.plane_len());
    for plane in &output.planes {
        blob.extend_from_slice(plane.bytes());
    }
    debug!("Binary blob: {} bytes", blob.len());
    blob
}

/// Standalone palette file: one big-endian `0x0BGR` word per slot.
pub fn palette_bytes(palette: &QuantizedPalette) -> Vec<u8> {
    palette.to_be_bytes()
}

/// Renders the palette and every plane as array literals.
pub fn to_source_text(output: &EncodedOutput, name: &str) -> String {
    let mut text = String::new();

    text.push_str(&format!(
        "// --- {} palette: {} colors, 0x0BGR ---\n",
        display_name(name),
        output.palette.len()
    ));
    push_array(
        &mut text,
        "unsigned short",
        &symbol(name, "palette"),
        output
            .palette
            .words()
            .iter()
            .map(|word| format!("0x{:03x}", word)),
        PALETTE_WORDS_PER_LINE,
    );

    text.push_str(&format!(
        "// --- {} bitplanes: {} x {} bytes ---\n",
        display_name(name),
        output.plane_count(),
        output.plane_len()
    ));
    for plane in &output.planes {
        push_array(
            &mut text,
            "unsigned char",
            &symbol(name, &format!("plane{}", plane.plane())),
            plane.bytes().iter().map(|byte| format!("0x{:02x}", byte)),
            PLANE_BYTES_PER_LINE,
        );
    }

    debug!("Source text: {} bytes", text.len());
    text
}

fn push_array(
    text: &mut String,
    element_type: &str,
    symbol: &str,
    items: impl ExactSizeIterator<Item = String>,
    per_line: usize,
) {
    text.push_str(&format!("{} {}[{}] = {{\n", element_type, symbol, items.len()));

    let items: Vec<String> = items.collect();
    for line in items.chunks(per_line) {
        text.push_str("    ");
        text.push_str(&line.join(", "));
        text.push_str(",\n");
    }

    text.push_str("};\n\n");
}

fn symbol(name: &str, suffix: &str) -> String {
    if name.is_empty() {
        suffix.to_string()
    } else {
        format!("{}_{}", name, suffix)
    }
}

fn display_name(name: &str) -> &str {
    if name.is_empty() {
        "image"
    } else {
        name
    }
}
