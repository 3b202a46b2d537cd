#![no_main]
use libfuzzer_sys::fuzz_target;
use lzstr::{Decoder, Encoder, Format};

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);
    for &format in &[Format::Raw, Format::Base64, Format::UriComponent, Format::Utf16] {
        let compressed = Encoder::new(format).encode(&text);
        let result = Decoder::new(format).decode(&compressed);
        assert_eq!(result.as_deref(), Ok(&*text), "{:?}", format);
    }
});
