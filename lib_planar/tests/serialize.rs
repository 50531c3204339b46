mod common;

use common::{noise_image, splash_palette, SPLASH_HEIGHT, SPLASH_PLANE_LEN, SPLASH_WIDTH};
use lib_planar::output::{palette_bytes, to_binary};
use lib_planar::planar::bitplane::split_blob;
use lib_planar::planar::palette::QuantizedPalette;
use lib_planar::{encode_image, serialize, CodecConfig, EncodedOutput, OutputMode, Serialized};

fn splash_output() -> EncodedOutput {
    let image = noise_image(SPLASH_WIDTH, SPLASH_HEIGHT, 32, 42);
    encode_image(&splash_palette(), &image, &CodecConfig::splash()).unwrap()
}

#[test]
fn test_binary_size_and_order() {
    let output = splash_output();

    let Serialized::Binary(blob) = serialize(&output, OutputMode::Binary) else {
        panic!("binary mode must produce bytes");
    };
    assert_eq!(blob.len(), 5 * SPLASH_PLANE_LEN);

    let planes = split_blob(&blob, SPLASH_WIDTH, SPLASH_HEIGHT, 5).unwrap();
    assert_eq!(planes, output.planes);
}

#[test]
fn test_source_text_is_deterministic() {
    let first = serialize(&splash_output(), OutputMode::SourceText);
    let second = serialize(&splash_output(), OutputMode::SourceText);
    assert_eq!(first.as_bytes(), second.as_bytes());
}

#[test]
fn test_source_text_matches_binary() {
    let output = splash_output();
    let Serialized::Text(text) = serialize(&output, OutputMode::SourceText) else {
        panic!("source mode must produce text");
    };

    assert!(text.contains("unsigned short splash_palette[32] = {"));
    assert!(text.contains("unsigned char splash_plane4[10240] = {"));

    // Every byte literal, in order, is the binary blob
    let (_, planes_text) = text.split_once("bitplanes").unwrap();
    let bytes: Vec<u8> = planes_text
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter_map(|token| token.strip_prefix("0x"))
        .map(|hex| u8::from_str_radix(hex, 16).unwrap())
        .collect();
    assert_eq!(bytes, to_binary(&output));

    // 10240 bytes at 16 per line
    let plane_lines = planes_text
        .lines()
        .filter(|line| line.starts_with("    0x"))
        .count();
    assert_eq!(plane_lines, 5 * SPLASH_PLANE_LEN / 16);
}

#[test]
fn test_palette_file_round_trip() {
    let output = splash_output();

    let bytes = palette_bytes(&output.palette);
    assert_eq!(bytes.len(), 64);
    assert!(bytes.chunks_exact(2).all(|word| word[0] & 0xF0 == 0));

    let palette = QuantizedPalette::from_be_bytes(&bytes).unwrap();
    assert_eq!(palette, output.palette);
}
