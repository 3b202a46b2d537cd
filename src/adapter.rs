//! String in, string out functions for each format.
//!
//! Decompression distinguishes between absent and empty input: `None` is what a store returns
//! for a key that was never written and decompresses to an empty string, while an empty string
//! can not have been produced by compression and decompresses to `None`. Every other failure
//! also results in `None`.
use crate::{Decoder, Encoder, Format};

/// Compress into arbitrary UTF-16 code units, 16 bits per unit.
pub fn compress(input: &str) -> Vec<u16> {
    Encoder::new(Format::Raw).encode(input)
}

/// Decompress the output of [`compress`].
pub fn decompress<'a>(compressed: impl Into<Option<&'a [u16]>>) -> Option<String> {
    match compressed.into() {
        None => Some(String::new()),
        Some([]) => None,
        Some(units) => Decoder::new(Format::Raw).decode(units).ok(),
    }
}

/// Compress into a padded base64 string.
pub fn compress_to_base64(input: &str) -> String {
    Encoder::new(Format::Base64).encode_to_string(input)
}

/// Decompress the output of [`compress_to_base64`].
pub fn decompress_from_base64<'a>(compressed: impl Into<Option<&'a str>>) -> Option<String> {
    decompress_str(Format::Base64, compressed.into())
}

/// Compress into a string that can be used in a URI component without escaping.
pub fn compress_to_encoded_uri_component(input: &str) -> String {
    Encoder::new(Format::UriComponent).encode_to_string(input)
}

/// Decompress the output of [`compress_to_encoded_uri_component`].
///
/// Spaces are read as `+`, so that strings that went through form decoding are accepted.
pub fn decompress_from_encoded_uri_component<'a>(
    compressed: impl Into<Option<&'a str>>,
) -> Option<String> {
    decompress_str(Format::UriComponent, compressed.into())
}

/// Compress into a valid UTF-16 string without control characters.
pub fn compress_to_utf16(input: &str) -> String {
    Encoder::new(Format::Utf16).encode_to_string(input)
}

/// Decompress the output of [`compress_to_utf16`].
pub fn decompress_from_utf16<'a>(compressed: impl Into<Option<&'a str>>) -> Option<String> {
    decompress_str(Format::Utf16, compressed.into())
}

/// Compress into the big-endian bytes of the units of [`compress`].
pub fn compress_to_uint8_array(input: &str) -> Vec<u8> {
    Encoder::new(Format::Raw).encode_to_be_bytes(input)
}

/// Decompress the output of [`compress_to_uint8_array`].
pub fn decompress_from_uint8_array<'a>(compressed: impl Into<Option<&'a [u8]>>) -> Option<String> {
    match compressed.into() {
        None => Some(String::new()),
        Some([]) => None,
        Some(bytes) => Decoder::new(Format::Raw).decode_be_bytes(bytes).ok(),
    }
}

fn decompress_str(format: Format, compressed: Option<&str>) -> Option<String> {
    match compressed {
        None => Some(String::new()),
        Some("") => None,
        Some(input) => Decoder::new(format).decode_str(input).ok(),
    }
}
