use lzstr::{Decoder, Encoder, Format};

const FORMATS: [Format; 4] = [Format::Raw, Format::Base64, Format::UriComponent, Format::Utf16];

#[test]
fn roundtrip_all() {
    let samples = [
        String::new(),
        "a".to_string(),
        "aaaaaaaaaa".to_string(),
        "Hello World".to_string(),
        "TOBEORNOTTOBEORTOBEORNOT".to_string(),
        "ab".repeat(1000),
        "Grüße aus Köln, ça va? Ωμέγα".to_string(),
        "日本語のテキスト、日本語のテキスト".to_string(),
        "emoji 🎉🎉🎉 and 𝄞 outside the basic plane".to_string(),
        "\u{0}\u{1}\u{ff}\u{100}\u{ffff}".to_string(),
        include_str!("../src/encode.rs").to_string(),
    ];

    for data in &samples {
        for &format in &FORMATS {
            assert_roundtrips(data, format);
        }
    }
}

#[test]
fn matches_known_streams() {
    let streams = [
        ("ab".to_string(), "IYIyA==="),
        ("Hello World".to_string(), "BIUwNmD2AEDqkCcwBMg="),
        ("aaaaaaaaaa".to_string(), "IY1o"),
        ("TOBEORNOTTOBEORTOBEORNOT".to_string(), "CoeQQgoiBKByLFJGSpwUA==="),
        ("ab".repeat(50), "IYI17SOrZ+6IcpqVA==="),
        (
            "日本語のテキスト、日本語のテキスト".to_string(),
            "qemhpzR5UYdgyGMMi1DInQyAmGQgAykrRQ==",
        ),
    ];

    for (data, stream) in &streams {
        assert_eq!(lzstr::compress_to_base64(data), *stream, "{:?}", data);
        assert_eq!(
            lzstr::decompress_from_base64(*stream).as_deref(),
            Some(data.as_str()),
            "{:?}",
            stream
        );
    }
}

#[test]
fn roundtrip_all_lengths() {
    let text = include_str!("../src/decode.rs");
    let chars: Vec<char> = text.chars().collect();
    for len in 0..300 {
        let data: String = chars[..len].iter().collect();
        for &format in &FORMATS {
            assert_roundtrips(&data, format);
        }
    }
}

#[test]
fn alphabet_closure() {
    let data = "Some text, with punctuation; and ünïcödé 字符 to push the literal widths.";

    let base64 = lzstr::compress_to_base64(data);
    assert_eq!(base64.len() % 4, 0);
    assert!(base64
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'+' || b == b'/' || b == b'='));

    let uri = lzstr::compress_to_encoded_uri_component(data);
    assert!(uri
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'+' || b == b'-' || b == b'$'));

    let utf16 = lzstr::compress_to_utf16(data);
    assert!(utf16.ends_with(' '));
    assert!(utf16.chars().all(|c| c >= ' '));
}

#[test]
fn compresses_repetition() {
    let data = "ab".repeat(1000);
    let compressed = lzstr::compress(&data);
    assert!(compressed.len() * 10 < data.len(), "{}", compressed.len());

    let base64 = lzstr::compress_to_base64(&data);
    assert!(base64.len() < data.len() / 4, "{}", base64.len());
}

#[test]
fn empty_compresses_to_one_symbol() {
    let compressed = lzstr::compress("");
    assert_eq!(compressed.len(), 1);
    assert_eq!(lzstr::decompress(compressed.as_slice()).as_deref(), Some(""));
    assert_eq!(lzstr::compress_to_base64(""), "Q===");
}

#[test]
fn truncated_input_never_panics() {
    let data = "The quick brown fox jumps over the lazy dog. The quick brown fox!";
    for &format in &FORMATS {
        let compressed = Encoder::new(format).encode(data);
        let decoder = Decoder::new(format);
        for len in 0..compressed.len() {
            let _ = decoder.decode(&compressed[..len]);
        }
    }
}

#[test]
fn mutated_input_never_panics() {
    let data = "The quick brown fox jumps over the lazy dog. The quick brown fox!";
    for &format in &FORMATS {
        let compressed = Encoder::new(format).encode(data);
        let decoder = Decoder::new(format);
        for idx in 0..compressed.len() {
            for &flip in &[1u16, 2, 4, 8, 0x10, 0x20, 0x100, 0x4000, 0x8000] {
                let mut mutated = compressed.clone();
                mutated[idx] ^= flip;
                let _ = decoder.decode(&mutated);
            }
        }
    }
}

fn assert_roundtrips(data: &str, format: Format) {
    let compressed = Encoder::new(format).encode(data);
    let result = Decoder::new(format).decode(&compressed);
    assert_eq!(result.as_deref(), Ok(data), "{:?}, {} chars", format, data.len());

    if format != Format::Raw {
        let text = Encoder::new(format).encode_to_string(data);
        let result = Decoder::new(format).decode_str(&text);
        assert_eq!(result.as_deref(), Ok(data), "{:?}, {} chars", format, data.len());
    }
}
