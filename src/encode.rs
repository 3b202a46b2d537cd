//! A module for all encoding needs.
use crate::alphabet::{self, Alphabet};
use crate::{Code, CodeSize, Format, END_OF_STREAM, FIRST_CODE, LITERAL_16, LITERAL_8};

use ahash::{AHashMap, AHashSet};

/// Compresses strings into one output format.
///
/// The encoder holds no state between calls, each call builds its own dictionary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Encoder {
    format: Format,
}

/// Accumulates bits into symbols of `A::BITS_PER_CHAR` bits.
struct BitWriter<A: Alphabet> {
    alphabet: A,
    /// The bits of the current, incomplete symbol.
    value: u32,
    /// The number of bits in `value`.
    position: u8,
    /// Finished characters.
    out: Vec<u16>,
}

/// The phrases seen so far.
///
/// A phrase of more than one unit is identified by the code of its prefix and its last unit.
#[derive(Default)]
struct Dictionary {
    singles: AHashMap<u16, Code>,
    links: AHashMap<(Code, u16), Code>,
    next_code: Code,
}

/// The longest phrase matched at the current input position.
#[derive(Clone, Copy)]
struct Phrase {
    code: Code,
    /// The first unit, which is also the whole phrase if it is still pending.
    first: u16,
}

struct EncodeState<A: Alphabet> {
    dictionary: Dictionary,
    /// Codes that have been assigned but never written.
    pending: AHashSet<Code>,
    /// The code width.
    code_size: CodeSize,
    /// The currently matched phrase, none before the first unit.
    current: Option<Phrase>,
    writer: BitWriter<A>,
}

impl Encoder {
    pub fn new(format: Format) -> Self {
        Encoder { format }
    }

    pub fn format(&self) -> Format {
        self.format
    }

    /// Compress a string into the characters of the output format.
    ///
    /// The result includes the framing of the format, that is the padding of `Base64` and the
    /// trailing separator of `Utf16`. Only the `Raw` format may produce unpaired surrogates, use
    /// [`encode_to_string`] for the others.
    ///
    /// [`encode_to_string`]: #method.encode_to_string
    pub fn encode(&self, input: &str) -> Vec<u16> {
        let units: Vec<u16> = input.encode_utf16().collect();
        self.encode_units(&units)
    }

    /// Compress a sequence of UTF-16 code units.
    pub fn encode_units(&self, input: &[u16]) -> Vec<u16> {
        let mut out = match self.format {
            Format::Raw => EncodeState::new(alphabet::Raw).compress(input),
            Format::Base64 => EncodeState::new(alphabet::Base64).compress(input),
            Format::UriComponent => EncodeState::new(alphabet::UriComponent).compress(input),
            Format::Utf16 => EncodeState::new(alphabet::Utf16).compress(input),
        };

        match self.format {
            Format::Base64 => {
                let padded = (out.len() + 3) / 4 * 4;
                out.resize(padded, u16::from(b'='));
            }
            Format::Utf16 => out.push(u16::from(b' ')),
            Format::Raw | Format::UriComponent => {}
        }

        log::debug!(
            "compressed {} units into {} characters ({:?})",
            input.len(),
            out.len(),
            self.format
        );
        out
    }

    /// Compress a string into the characters of the output format as big-endian UTF-16 bytes.
    pub fn encode_to_be_bytes(&self, input: &str) -> Vec<u8> {
        self.encode(input)
            .into_iter()
            .flat_map(u16::to_be_bytes)
            .collect()
    }

    /// Compress a string into a string of the output format.
    ///
    /// The `Raw` format is not guaranteed to produce valid UTF-16, unpaired surrogates are
    /// replaced in that case and the result will not decompress. Use [`encode`] for it instead.
    ///
    /// [`encode`]: #method.encode
    pub fn encode_to_string(&self, input: &str) -> String {
        String::from_utf16_lossy(&self.encode(input))
    }
}

impl<A: Alphabet> EncodeState<A> {
    fn new(alphabet: A) -> Self {
        EncodeState {
            dictionary: Dictionary::new(),
            pending: AHashSet::new(),
            code_size: CodeSize::new(),
            current: None,
            writer: BitWriter::new(alphabet),
        }
    }

    fn compress(mut self, input: &[u16]) -> Vec<u16> {
        for &unit in input {
            let single = match self.dictionary.single(unit) {
                Some(code) => code,
                None => {
                    let code = self.dictionary.insert_single(unit);
                    self.pending.insert(code);
                    code
                }
            };

            let current = match self.current {
                None => {
                    self.current = Some(Phrase { code: single, first: unit });
                    continue;
                }
                Some(current) => current,
            };

            match self.dictionary.successor(current.code, unit) {
                Some(code) => {
                    self.current = Some(Phrase { code, ..current });
                }
                None => {
                    self.emit(current);
                    // Assigning the new phrase is accounted for by the tick of the emission.
                    self.dictionary.insert_successor(current.code, unit);
                    self.current = Some(Phrase { code: single, first: unit });
                }
            }
        }

        if let Some(current) = self.current.take() {
            self.emit(current);
        }

        self.writer.write_bits(END_OF_STREAM, self.code_size.bits());
        self.writer.finish()
    }

    /// Write a phrase, as a literal if its code is not yet known to the decoder.
    fn emit(&mut self, phrase: Phrase) {
        if self.pending.remove(&phrase.code) {
            if phrase.first < 256 {
                self.writer.write_bits(LITERAL_8, self.code_size.bits());
                self.writer.write_bits(phrase.first.into(), 8);
            } else {
                self.writer.write_bits(LITERAL_16, self.code_size.bits());
                self.writer.write_bits(phrase.first.into(), 16);
            }
            // The decoder assigns the literal its code at this point.
            self.code_size.tick();
        } else {
            self.writer.write_bits(phrase.code, self.code_size.bits());
        }
        self.code_size.tick();
    }
}

impl Dictionary {
    fn new() -> Self {
        Dictionary {
            next_code: FIRST_CODE,
            ..Dictionary::default()
        }
    }

    fn single(&self, unit: u16) -> Option<Code> {
        self.singles.get(&unit).copied()
    }

    fn successor(&self, prefix: Code, unit: u16) -> Option<Code> {
        self.links.get(&(prefix, unit)).copied()
    }

    fn insert_single(&mut self, unit: u16) -> Code {
        let code = self.assign();
        self.singles.insert(unit, code);
        code
    }

    fn insert_successor(&mut self, prefix: Code, unit: u16) -> Code {
        let code = self.assign();
        self.links.insert((prefix, unit), code);
        code
    }

    fn assign(&mut self) -> Code {
        let code = self.next_code;
        self.next_code += 1;
        code
    }
}

impl<A: Alphabet> BitWriter<A> {
    fn new(alphabet: A) -> Self {
        BitWriter {
            alphabet,
            value: 0,
            position: 0,
            out: Vec::new(),
        }
    }

    /// Write the `count` low bits of `value`, starting with its least significant bit.
    fn write_bits(&mut self, mut value: Code, count: u8) {
        for _ in 0..count {
            self.write_bit(value & 1);
            value >>= 1;
        }
    }

    fn write_bit(&mut self, bit: u32) {
        self.value = (self.value << 1) | bit;
        if self.position == A::BITS_PER_CHAR - 1 {
            self.push_symbol();
        } else {
            self.position += 1;
        }
    }

    fn push_symbol(&mut self) {
        let symbol = self.alphabet.encode(self.value);
        self.out.push(symbol);
        self.value = 0;
        self.position = 0;
    }

    /// Pad with zero bits and emit the final symbol.
    ///
    /// This always emits a symbol, even when the written bits ended on a symbol boundary.
    fn finish(mut self) -> Vec<u16> {
        while self.position < A::BITS_PER_CHAR - 1 {
            self.value <<= 1;
            self.position += 1;
        }
        self.value <<= 1;
        self.push_symbol();
        self.out
    }
}
