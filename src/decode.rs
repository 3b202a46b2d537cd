//! A module for all decoding needs.
use crate::alphabet::{self, Alphabet};
use crate::{
    Code, CodeSize, Format, END_OF_STREAM, FIRST_CODE, INITIAL_CODE_SIZE, LITERAL_16, LITERAL_8,
};

/// Decompresses strings of one output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decoder {
    format: Format,
}

/// The reasons for which a compressed string can be rejected.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// The input ended before the end of stream code.
    #[error("compressed data ended before the end of stream marker")]
    TruncatedInput,
    /// A code that neither refers to a phrase nor to the phrase being built.
    #[error("invalid code {code}, the next code to be assigned is {next}")]
    CorruptStream { code: u32, next: u32 },
    /// A character that is not part of the alphabet of the format.
    #[error("character {unit:#06x} at position {position} is not part of the alphabet")]
    InvalidAlphabetCharacter { unit: u16, position: usize },
    /// The decompressed code units do not form a valid string.
    #[error("decompressed data is not valid UTF-16")]
    InvalidUtf16,
    /// A byte sequence that does not consist of whole code units.
    #[error("odd number of bytes in big-endian UTF-16 input")]
    OddByteLength,
}

/// Serves single bits from symbols of `A::BITS_PER_CHAR` bits.
struct BitReader<'inp, A: Alphabet> {
    alphabet: A,
    input: &'inp [u16],
    /// The current symbol.
    value: u32,
    /// Mask of the next bit in `value`, zero when a new symbol is needed.
    position: u32,
    /// The index of the next symbol.
    index: usize,
}

/// The link describing one phrase.
#[derive(Clone, Copy)]
struct Link {
    /// The code of the phrase without its last unit.
    prefix: Code,
    /// The last unit.
    unit: u16,
}

/// The table of decoded phrases, indexed by code.
struct Table {
    inner: Vec<Link>,
    depths: Vec<u32>,
}

struct DecodeState<'inp, A: Alphabet> {
    table: Table,
    reader: BitReader<'inp, A>,
    code_size: CodeSize,
    /// The decoded units.
    out: Vec<u16>,
}

impl Decoder {
    pub fn new(format: Format) -> Self {
        Decoder { format }
    }

    pub fn format(&self) -> Format {
        self.format
    }

    /// Decompress characters of the output format.
    pub fn decode(&self, input: &[u16]) -> Result<String, DecodeError> {
        let units = self.decode_units(input)?;
        String::from_utf16(&units).map_err(|_| {
            log::debug!("decompressed {} units are not valid UTF-16", units.len());
            DecodeError::InvalidUtf16
        })
    }

    /// Decompress a string of the output format.
    pub fn decode_str(&self, input: &str) -> Result<String, DecodeError> {
        let units: Vec<u16> = input.encode_utf16().collect();
        self.decode(&units)
    }

    /// Decompress characters given as big-endian UTF-16 bytes.
    pub fn decode_be_bytes(&self, input: &[u8]) -> Result<String, DecodeError> {
        if input.len() % 2 != 0 {
            log::debug!("{} bytes do not form whole code units", input.len());
            return Err(DecodeError::OddByteLength);
        }

        let units: Vec<u16> = input
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        self.decode(&units)
    }

    /// Decompress characters of the output format into UTF-16 code units.
    ///
    /// The units are exactly those that were compressed, even when they are not valid UTF-16.
    pub fn decode_units(&self, input: &[u16]) -> Result<Vec<u16>, DecodeError> {
        let result = match self.format {
            Format::Raw => DecodeState::new(alphabet::Raw, input).decompress(),
            Format::Base64 => DecodeState::new(alphabet::Base64, input).decompress(),
            Format::UriComponent => {
                // Spaces are what a `+` becomes when the string went through form encoding.
                let input: Vec<u16> = input
                    .iter()
                    .map(|&unit| if unit == u16::from(b' ') { u16::from(b'+') } else { unit })
                    .collect();
                DecodeState::new(alphabet::UriComponent, &input).decompress()
            }
            Format::Utf16 => DecodeState::new(alphabet::Utf16, input).decompress(),
        };

        match &result {
            Ok(out) => log::debug!(
                "decompressed {} characters into {} units ({:?})",
                input.len(),
                out.len(),
                self.format
            ),
            Err(err) => log::debug!("failed to decompress {:?} input: {}", self.format, err),
        }

        result
    }
}

impl<'inp, A: Alphabet> DecodeState<'inp, A> {
    fn new(alphabet: A, input: &'inp [u16]) -> Self {
        DecodeState {
            table: Table::new(),
            reader: BitReader::new(alphabet, input),
            code_size: CodeSize::new(),
            out: Vec::new(),
        }
    }

    fn decompress(mut self) -> Result<Vec<u16>, DecodeError> {
        let first = match self.reader.read_bits(INITIAL_CODE_SIZE)? {
            END_OF_STREAM => return Ok(self.out),
            code => self.read_literal(code)?,
        };
        // The encoder counted the first literal twice, for itself and for its successor.
        self.code_size.tick();
        self.code_size.tick();

        let mut last = first;
        let mut last_start = self.out.len();
        self.table.reconstruct(first, &mut self.out);

        loop {
            let code = match self.reader.read_bits(self.code_size.bits())? {
                END_OF_STREAM => return Ok(self.out),
                code @ (LITERAL_8 | LITERAL_16) => {
                    let code = self.read_literal(code)?;
                    self.code_size.tick();
                    code
                }
                code => code,
            };

            let start = self.out.len();
            if self.table.contains(code) {
                self.table.reconstruct(code, &mut self.out);
            } else if code == self.table.next_code() {
                // The phrase being defined right now: the last one extended by its own start.
                let first = self.out[last_start];
                self.out.extend_from_within(last_start..start);
                self.out.push(first);
            } else {
                return Err(DecodeError::CorruptStream {
                    code,
                    next: self.table.next_code(),
                });
            }

            let unit = self.out[start];
            self.table.derive(last, unit);
            self.code_size.tick();

            last = code;
            last_start = start;
        }
    }

    /// Read the literal announced by the escape `code` and assign it a code.
    fn read_literal(&mut self, code: Code) -> Result<Code, DecodeError> {
        let bits = match code {
            LITERAL_8 => 8,
            LITERAL_16 => 16,
            _ => {
                return Err(DecodeError::CorruptStream {
                    code,
                    next: self.table.next_code(),
                })
            }
        };
        let unit = self.reader.read_bits(bits)? as u16;
        Ok(self.table.push_literal(unit))
    }
}

impl<'inp, A: Alphabet> BitReader<'inp, A> {
    fn new(alphabet: A, input: &'inp [u16]) -> Self {
        BitReader {
            alphabet,
            input,
            value: 0,
            position: 0,
            index: 0,
        }
    }

    /// Read `count` bits, the first one read is the least significant.
    fn read_bits(&mut self, count: u8) -> Result<Code, DecodeError> {
        let mut bits: u64 = 0;
        for i in 0..count {
            if self.read_bit()? {
                bits |= 1 << i;
            }
        }

        // Codes this wide would need a table of billions of entries first.
        Code::try_from(bits).map_err(|_| DecodeError::TruncatedInput)
    }

    fn read_bit(&mut self) -> Result<bool, DecodeError> {
        if self.position == 0 {
            self.next_symbol()?;
        }

        let bit = self.value & self.position != 0;
        self.position >>= 1;
        Ok(bit)
    }

    fn next_symbol(&mut self) -> Result<(), DecodeError> {
        let &unit = self.input.get(self.index).ok_or(DecodeError::TruncatedInput)?;
        self.value = self.alphabet.decode(unit).ok_or(DecodeError::InvalidAlphabetCharacter {
            unit,
            position: self.index,
        })?;
        self.position = 1 << (A::BITS_PER_CHAR - 1);
        self.index += 1;
        Ok(())
    }
}

impl Table {
    fn new() -> Self {
        let reserved = Link { prefix: 0, unit: 0 };
        Table {
            inner: vec![reserved; FIRST_CODE as usize],
            depths: vec![0; FIRST_CODE as usize],
        }
    }

    fn next_code(&self) -> Code {
        self.inner.len() as Code
    }

    fn contains(&self, code: Code) -> bool {
        code >= FIRST_CODE && (code as usize) < self.inner.len()
    }

    fn push_literal(&mut self, unit: u16) -> Code {
        let code = self.next_code();
        self.inner.push(Link { prefix: 0, unit });
        self.depths.push(1);
        code
    }

    /// Add the phrase of `prefix` extended by `unit`.
    fn derive(&mut self, prefix: Code, unit: u16) -> Code {
        let code = self.next_code();
        let depth = self.depths[prefix as usize] + 1;
        self.inner.push(Link { prefix, unit });
        self.depths.push(depth);
        code
    }

    /// Append the phrase of a contained code to `out`.
    fn reconstruct(&self, code: Code, out: &mut Vec<u16>) {
        let start = out.len();
        let depth = self.depths[code as usize] as usize;
        out.resize(start + depth, 0);

        let mut code_iter = code;
        for unit in out[start..].iter_mut().rev() {
            let link = self.inner[code_iter as usize];
            *unit = link.unit;
            code_iter = link.prefix;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{DecodeError, Decoder, Table};
    use crate::{Encoder, Format};

    #[test]
    fn reconstructs_chained_phrases() {
        let mut table = Table::new();
        let a = table.push_literal(u16::from(b'a'));
        let b = table.push_literal(u16::from(b'b'));
        let ab = table.derive(a, u16::from(b'b'));
        let abb = table.derive(ab, u16::from(b'b'));
        assert_eq!((a, b, ab, abb), (3, 4, 5, 6));

        let mut out = vec![u16::from(b'x')];
        table.reconstruct(abb, &mut out);
        assert_eq!(String::from_utf16_lossy(&out), "xabb");
    }

    #[test]
    fn empty_stream() {
        let decoder = Decoder::new(Format::Raw);
        assert_eq!(decoder.decode(&[0x4000]), Ok(String::new()));
    }

    #[test]
    fn single_char() {
        let decoder = Decoder::new(Format::Base64);
        assert_eq!(decoder.format(), Format::Base64);
        assert_eq!(decoder.decode_str("IZA="), Ok("a".to_string()));
        // Padding is never read.
        assert_eq!(decoder.decode_str("IZA"), Ok("a".to_string()));
    }

    #[test]
    fn truncated_input() {
        let decoder = Decoder::new(Format::Base64);
        assert_eq!(decoder.decode_str(""), Err(DecodeError::TruncatedInput));
        assert_eq!(decoder.decode_str("IZ"), Err(DecodeError::TruncatedInput));
    }

    #[test]
    fn invalid_first_code() {
        // The two bits 1, 1 form the code 3 which cannot start a stream.
        let decoder = Decoder::new(Format::Raw);
        assert_eq!(
            decoder.decode(&[0xc000]),
            Err(DecodeError::CorruptStream { code: 3, next: 3 })
        );
    }

    #[test]
    fn invalid_character() {
        let decoder = Decoder::new(Format::Base64);
        assert_eq!(
            decoder.decode_str("I!A="),
            Err(DecodeError::InvalidAlphabetCharacter { unit: u16::from(b'!'), position: 1 })
        );
    }

    #[test]
    fn code_beyond_table() {
        // First literal 'a', then the 3-bit code 7 although only code 4 could be defined next.
        let decoder = Decoder::new(Format::Raw);
        let mut bits = vec![0, 0];
        bits.extend((0..8).map(|i| (97 >> i) & 1));
        bits.extend(&[1, 1, 1]);
        let mut unit = 0u16;
        for (i, &bit) in bits.iter().enumerate() {
            unit |= (bit as u16) << (15 - i);
        }
        assert_eq!(
            decoder.decode(&[unit]),
            Err(DecodeError::CorruptStream { code: 7, next: 4 })
        );
    }

    #[test]
    fn self_referencing_code() {
        // "aaaa" uses the code of "aa" in the step that defines it.
        let encoder = Encoder::new(Format::Raw);
        let decoder = Decoder::new(Format::Raw);
        for len in 0..40 {
            let input = "a".repeat(len);
            assert_eq!(decoder.decode(&encoder.encode(&input)), Ok(input));
        }
    }

    #[test]
    fn unpaired_surrogate() {
        let encoder = Encoder::new(Format::Raw);
        let decoder = Decoder::new(Format::Raw);
        let compressed = encoder.encode_units(&[0xd800, u16::from(b'x')]);
        assert_eq!(decoder.decode_units(&compressed), Ok(vec![0xd800, u16::from(b'x')]));
        assert_eq!(decoder.decode(&compressed), Err(DecodeError::InvalidUtf16));
    }

    #[test]
    fn uri_space_is_plus() {
        let encoder = Encoder::new(Format::UriComponent);
        let decoder = Decoder::new(Format::UriComponent);
        let input = "hello world, hello uri";
        let compressed = encoder.encode_to_string(input);
        let mangled = compressed.replace('+', " ");
        assert_eq!(decoder.decode_str(&mangled), Ok(input.to_string()));
    }
}
