//! Static frequency-ranked coding.
//!
//! Distinct symbols are ranked by ascending frequency and each receives its
//! rank, in binary, as a fixed-width codeword of `ceil(log2 k)` bits for `k`
//! distinct symbols. Ties keep first-appearance order. A one-symbol alphabet
//! uses the codeword `1` and a two-symbol alphabet `0`/`1`.
//!
//! This is not Huffman coding: all codewords share one length, so frequent
//! symbols are not rewarded with shorter codes. It is decodable only because
//! equal-length codewords can never be prefixes of one another. See
//! [`crate::compression::huffman`] for the variable-length code.

use crate::compression::{bits, ratio, Codec, CodeTable, FrequencyTable, Result};
use crate::error::Error;
use serde::Serialize;

/// Output of [`encode`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StaticFrequencyEncoding {
    pub frequencies: FrequencyTable,
    pub code_table: CodeTable,
    /// Concatenated codewords, one `'0'`/`'1'` character per bit
    pub bits: String,
    /// Eight bits per input character
    pub original_bits: usize,
    pub encoded_bits: usize,
    /// `original_bits / encoded_bits`
    pub ratio: f64,
}

impl StaticFrequencyEncoding {
    /// The bit string packed MSB-first into bytes.
    pub fn packed(&self) -> Result<Vec<u8>> {
        bits::pack(&self.bits)
    }

    pub fn packed_hex(&self) -> Result<String> {
        Ok(hex::encode(self.packed()?))
    }
}

/// Codeword length for an alphabet of `distinct` symbols.
pub fn codeword_width(distinct: usize) -> usize {
    if distinct <= 2 {
        1
    } else {
        (usize::BITS - (distinct - 1).leading_zeros()) as usize
    }
}

/// Assign every symbol of `frequencies` its fixed-width rank codeword.
pub fn build_code_table(frequencies: &FrequencyTable) -> CodeTable {
    let mut table = CodeTable::new();
    if frequencies.len() == 1 {
        for (symbol, _) in frequencies.iter() {
            table.insert(symbol, "1".to_string());
        }
        return table;
    }

    let width = codeword_width(frequencies.len());
    for (rank, (symbol, _)) in frequencies.ranked().into_iter().enumerate() {
        table.insert(symbol, format!("{rank:0width$b}"));
    }
    table
}

/// Encode `input` with a frequency-ranked fixed-width code.
///
/// # Errors
///
/// Returns `Error::EmptyInput` for an empty string.
///
/// # Example
///
/// ```
/// use text_codecs::compression::static_frequency::encode;
///
/// let encoded = encode("ABRAKADABRA").unwrap();
/// assert_eq!(encoded.code_table.get('A'), Some("100"));
/// assert_eq!(encoded.encoded_bits, 33);
/// ```
pub fn encode(input: &str) -> Result<StaticFrequencyEncoding> {
    if input.is_empty() {
        return Err(Error::empty_input("nothing to encode"));
    }

    let frequencies = FrequencyTable::from_text(input);
    let code_table = build_code_table(&frequencies);
    let bits = code_table.encode(input)?;

    let symbols = frequencies.total()?;
    let original_bits = symbols * 8;
    let encoded_bits = bits.len();
    let ratio = ratio::ratio(original_bits as u64, encoded_bits as u64)?.ratio;
    log::debug!(
        "static frequency: {} symbols ({} distinct) -> {} bits",
        symbols,
        frequencies.len(),
        encoded_bits
    );

    Ok(StaticFrequencyEncoding {
        frequencies,
        code_table,
        bits,
        original_bits,
        encoded_bits,
        ratio,
    })
}

/// Decode a bit string produced with `code_table`.
///
/// # Errors
///
/// Returns `Error::EmptyInput` for an empty bit string, and `Error::Format`
/// for a table without a single codeword width, a character other than
/// `'0'`/`'1'`, a length that is not a multiple of the width, or a codeword
/// the table does not assign.
pub fn decode(bits: &str, code_table: &CodeTable) -> Result<String> {
    if bits.is_empty() {
        return Err(Error::empty_input("no bits to decode"));
    }
    let width = code_table
        .uniform_width()
        .ok_or_else(|| Error::format("code table is empty or not fixed-width"))?;
    bits::validate(bits)?;
    if bits.len() % width != 0 {
        return Err(Error::format(format!(
            "{} bits is not a whole number of {}-bit codewords",
            bits.len(),
            width
        )));
    }

    let symbols = code_table.reverse();
    let mut output = String::with_capacity(bits.len() / width);
    for start in (0..bits.len()).step_by(width) {
        let codeword = &bits[start..start + width];
        let symbol = symbols.get(codeword).ok_or_else(|| {
            Error::format(format!("codeword {codeword} at bit {start} is not assigned"))
        })?;
        output.push(*symbol);
    }
    log::debug!("static frequency: {} bits -> {} symbols", bits.len(), output.chars().count());
    Ok(output)
}

/// Static frequency coder as a value.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticFrequencyCodec;

impl Codec for StaticFrequencyCodec {
    type Input = str;
    type Encoded = StaticFrequencyEncoding;
    type Decoded = String;

    fn encode(&self, input: &str) -> Result<StaticFrequencyEncoding> {
        encode(input)
    }

    fn decode(&self, encoded: &StaticFrequencyEncoding) -> Result<String> {
        decode(&encoded.bits, &encoded.code_table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_codeword_width() {
        assert_eq!(codeword_width(1), 1);
        assert_eq!(codeword_width(2), 1);
        assert_eq!(codeword_width(3), 2);
        assert_eq!(codeword_width(4), 2);
        assert_eq!(codeword_width(5), 3);
        assert_eq!(codeword_width(8), 3);
        assert_eq!(codeword_width(9), 4);
        assert_eq!(codeword_width(256), 8);
    }

    #[test]
    fn test_ranked_codes() {
        let encoded = encode("ABRAKADABRA").unwrap();
        // Ranked ascending: K, D, B, R, A
        assert_eq!(
            encoded.code_table.to_string(),
            "K: 000 | D: 001 | B: 010 | R: 011 | A: 100"
        );
        assert_eq!(encoded.original_bits, 88);
        assert_eq!(encoded.encoded_bits, 33);
        assert_relative_eq!(encoded.ratio, 88.0 / 33.0);
        assert!(encoded.bits.starts_with("100010011"));
    }

    #[test]
    fn test_single_symbol_alphabet() {
        let encoded = encode("zzzz").unwrap();
        assert_eq!(encoded.code_table.get('z'), Some("1"));
        assert_eq!(encoded.bits, "1111");
        assert_eq!(decode(&encoded.bits, &encoded.code_table).unwrap(), "zzzz");
    }

    #[test]
    fn test_two_symbol_alphabet() {
        let encoded = encode("abb").unwrap();
        assert_eq!(encoded.code_table.get('a'), Some("0"));
        assert_eq!(encoded.code_table.get('b'), Some("1"));
        assert_eq!(encoded.bits, "011");
    }

    #[test]
    fn test_codeword_length_invariant() {
        let input = "the quick brown fox jumps over the lazy dog";
        let encoded = encode(input).unwrap();
        let width = codeword_width(encoded.frequencies.len());
        assert!(encoded.code_table.iter().all(|(_, code)| code.len() == width));

        let expected: usize = input
            .chars()
            .map(|c| encoded.code_table.get(c).unwrap().len())
            .sum();
        assert_eq!(encoded.encoded_bits, expected);
    }

    #[test]
    fn test_decode_round_trip() {
        let input = "mississippi river";
        let encoded = encode(input).unwrap();
        assert_eq!(StaticFrequencyCodec.decode(&encoded).unwrap(), input);
    }

    #[test]
    fn test_packed_output() {
        let encoded = encode("abb").unwrap();
        assert_eq!(encoded.packed().unwrap(), vec![0b0110_0000]);
        assert_eq!(encoded.packed_hex().unwrap(), "60");
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(encode(""), Err(Error::EmptyInput(_))));
        let table = encode("ab").unwrap().code_table;
        assert!(matches!(decode("", &table), Err(Error::EmptyInput(_))));
    }

    #[test]
    fn test_malformed_bits() {
        let table = encode("abc").unwrap().code_table;
        assert!(matches!(decode("0", &table), Err(Error::Format(_))));
        assert!(matches!(decode("0x", &table), Err(Error::Format(_))));
        // Three symbols use 00, 01 and 10; 11 is unassigned.
        assert!(matches!(decode("0011", &table), Err(Error::Format(_))));
        assert!(matches!(decode("01", &CodeTable::new()), Err(Error::Format(_))));
    }
}
