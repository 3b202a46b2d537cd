//! Output alphabets, mapping fixed-width symbols to characters and back.
use std::sync::OnceLock;

/// A character set that fixed-width symbols of the bit stream are written with.
///
/// Characters are UTF-16 code units. The encoder only ever passes values below
/// `1 << BITS_PER_CHAR` to [`encode`], while [`decode`] sees whatever the caller supplied and
/// must reject units that are not part of the alphabet.
///
/// [`encode`]: #tymethod.encode
/// [`decode`]: #tymethod.decode
pub trait Alphabet {
    /// The number of stream bits carried by each character.
    const BITS_PER_CHAR: u8;

    /// Map a symbol to its character.
    fn encode(&self, symbol: u32) -> u16;

    /// Map a character back to its symbol.
    fn decode(&self, unit: u16) -> Option<u32>;
}

/// Every UTF-16 code unit is a character, 16 bits each.
#[derive(Debug, Clone, Copy, Default)]
pub struct Raw;

/// Code units from `0x20` upwards, 15 bits each.
#[derive(Debug, Clone, Copy, Default)]
pub struct Utf16;

/// The standard base64 characters, 6 bits each.
#[derive(Debug, Clone, Copy, Default)]
pub struct Base64;

/// Characters that are kept as-is in URI components, 6 bits each.
#[derive(Debug, Clone, Copy, Default)]
pub struct UriComponent;

/// Offset that moves the `Utf16` alphabet out of the control characters.
const UTF16_OFFSET: u16 = 32;

/// The padding character is part of the table so that padded input decodes.
const BASE64_CHARS: &[u8; 65] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/=";
const URI_CHARS: &[u8; 65] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+-$";

/// Reverse lookup from an ASCII character to its index in a table.
struct ReverseTable {
    index: [Option<u8>; 128],
}

impl ReverseTable {
    fn new(chars: &[u8]) -> Self {
        let mut index = [None; 128];
        for (value, &ch) in chars.iter().enumerate() {
            index[usize::from(ch)] = Some(value as u8);
        }
        ReverseTable { index }
    }

    fn get(&self, unit: u16) -> Option<u32> {
        let entry = self.index.get(usize::from(unit))?;
        entry.map(u32::from)
    }
}

fn base64_reverse() -> &'static ReverseTable {
    static TABLE: OnceLock<ReverseTable> = OnceLock::new();
    TABLE.get_or_init(|| ReverseTable::new(BASE64_CHARS))
}

fn uri_reverse() -> &'static ReverseTable {
    static TABLE: OnceLock<ReverseTable> = OnceLock::new();
    TABLE.get_or_init(|| ReverseTable::new(URI_CHARS))
}

impl Alphabet for Raw {
    const BITS_PER_CHAR: u8 = 16;

    fn encode(&self, symbol: u32) -> u16 {
        symbol as u16
    }

    fn decode(&self, unit: u16) -> Option<u32> {
        Some(u32::from(unit))
    }
}

impl Alphabet for Utf16 {
    const BITS_PER_CHAR: u8 = 15;

    fn encode(&self, symbol: u32) -> u16 {
        symbol as u16 + UTF16_OFFSET
    }

    fn decode(&self, unit: u16) -> Option<u32> {
        unit.checked_sub(UTF16_OFFSET).map(u32::from)
    }
}

impl Alphabet for Base64 {
    const BITS_PER_CHAR: u8 = 6;

    fn encode(&self, symbol: u32) -> u16 {
        u16::from(BASE64_CHARS[symbol as usize])
    }

    fn decode(&self, unit: u16) -> Option<u32> {
        base64_reverse().get(unit)
    }
}

impl Alphabet for UriComponent {
    const BITS_PER_CHAR: u8 = 6;

    fn encode(&self, symbol: u32) -> u16 {
        u16::from(URI_CHARS[symbol as usize])
    }

    fn decode(&self, unit: u16) -> Option<u32> {
        uri_reverse().get(unit)
    }
}
