#![no_main]
use libfuzzer_sys::fuzz_target;
use lzstr::{Decoder, Format};

fuzz_target!(|raw_data: &[u8]| {
    for &format in &[Format::Raw, Format::Base64, Format::UriComponent, Format::Utf16] {
        let _ = Decoder::new(format).decode_be_bytes(raw_data);
    }
    if let Ok(text) = std::str::from_utf8(raw_data) {
        let _ = lzstr::decompress_from_base64(text);
        let _ = lzstr::decompress_from_encoded_uri_component(text);
        let _ = lzstr::decompress_from_utf16(text);
    }
});
