//! # LZ string compressor and decompressor
//!
//! This crate compresses strings into shorter strings drawn from restricted alphabets, so that
//! the result can be kept in channels that only accept text: key-value stores, cookies or URL
//! components. The stream format is the one of lz-string 1.4.4, so data can be exchanged with
//! other implementations of that format.
//!
//! The codec works on UTF-16 code units. Codes are written into a bit stream that is cut into
//! fixed-width symbols, one symbol per output character. The width and the character set depend
//! on the [`Format`]:
//!
//!  * `Raw`: 16 bits per symbol, the output is arbitrary UTF-16 code units.
//!  * `Base64`: 6 bits per symbol, standard base64 characters padded with `=`.
//!  * `UriComponent`: 6 bits per symbol, characters that need no escaping in a URI.
//!  * `Utf16`: 15 bits per symbol, valid and printable UTF-16.
//!
//! Exemplary use of the string interface:
//!
//! ```
//! let data = "TOBEORNOTTOBEORTOBEORNOT".repeat(20);
//! let compressed = lzstr::compress_to_base64(&data);
//! assert!(compressed.len() < data.len());
//!
//! let original = lzstr::decompress_from_base64(compressed.as_str());
//! assert_eq!(original, Some(data));
//! ```
//!
//! The lower level [`Encoder`] and [`Decoder`] report why decoding failed instead of mapping all
//! failures to `None`:
//!
//! ```
//! use lzstr::{Format, Decoder, DecodeError};
//! let result = Decoder::new(Format::Base64).decode_str("IZ");
//! assert_eq!(result, Err(DecodeError::TruncatedInput));
//! ```
#![forbid(unsafe_code)]

/// Alias for a dictionary code.
pub(crate) type Code = u32;

/// Escape code: an 8-bit literal follows.
pub(crate) const LITERAL_8: Code = 0;
/// Escape code: a 16-bit literal follows.
pub(crate) const LITERAL_16: Code = 1;
/// Marks the end of the stream.
pub(crate) const END_OF_STREAM: Code = 2;
/// The first code that refers to a phrase.
pub(crate) const FIRST_CODE: Code = 3;

/// The code width of the very first code in a stream.
pub(crate) const INITIAL_CODE_SIZE: u8 = 2;

/// The output alphabet and framing of a compressed string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// 16 bits per character, the characters are arbitrary UTF-16 code units.
    Raw,
    /// 6 bits per character from the standard base64 alphabet, padded with `=`.
    Base64,
    /// 6 bits per character from an alphabet that is safe inside URI components.
    UriComponent,
    /// 15 bits per character, offset so that no control characters are produced.
    Utf16,
}

/// The width of dictionary codes and the countdown to its next increase.
///
/// Encoder and decoder must tick this in the same order, otherwise the code widths diverge and
/// all following codes are misread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct CodeSize {
    bits: u8,
    enlarge_in: u64,
}

impl CodeSize {
    pub(crate) fn new() -> Self {
        // The first literal does not take a code of its own, which is compensated by starting
        // with a shorter countdown.
        CodeSize {
            bits: INITIAL_CODE_SIZE,
            enlarge_in: 2,
        }
    }

    pub(crate) fn bits(&self) -> u8 {
        self.bits
    }

    /// Account for one more assigned code, widening codes when needed.
    pub(crate) fn tick(&mut self) {
        self.enlarge_in -= 1;
        if self.enlarge_in == 0 {
            self.enlarge_in = 1 << self.bits;
            self.bits += 1;
            log::trace!("code size increased to {} bits", self.bits);
        }
    }
}

pub mod alphabet;
pub mod decode;
pub mod encode;
mod adapter;

pub use adapter::{
    compress, compress_to_base64, compress_to_encoded_uri_component, compress_to_uint8_array,
    compress_to_utf16, decompress, decompress_from_base64, decompress_from_encoded_uri_component,
    decompress_from_uint8_array, decompress_from_utf16,
};
pub use decode::{DecodeError, Decoder};
pub use encode::Encoder;
