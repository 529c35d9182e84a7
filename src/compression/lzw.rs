use crate::compression::{Codec, Result};
use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Number of single-byte entries every dictionary starts with.
pub const SEED_ENTRIES: usize = 256;

/// First code handed out for a multi-byte dictionary entry.
pub const FIRST_CODE: u16 = 256;

const MIN_CODE_WIDTH: u32 = 9;
const MAX_CODE_WIDTH: u32 = 16;

/// Dictionary sizing for LZW.
///
/// The dictionary holds at most `1 << max_code_width` entries. Once it is
/// full it is frozen: encoding and decoding keep using the existing entries
/// and stop adding new ones, so memory stays bounded on any input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LzwConfig {
    /// Code width in bits, between 9 and 16.
    pub max_code_width: u32,
}

impl Default for LzwConfig {
    fn default() -> Self {
        LzwConfig {
            max_code_width: MAX_CODE_WIDTH,
        }
    }
}

impl LzwConfig {
    pub fn validate(&self) -> Result<()> {
        if !(MIN_CODE_WIDTH..=MAX_CODE_WIDTH).contains(&self.max_code_width) {
            return Err(Error::config(format!(
                "LZW code width must be between {} and {} bits, got {}",
                MIN_CODE_WIDTH, MAX_CODE_WIDTH, self.max_code_width
            )));
        }
        Ok(())
    }

    /// Maximum number of dictionary entries, seed entries included.
    pub fn capacity(&self) -> usize {
        1usize << self.max_code_width.clamp(MIN_CODE_WIDTH, MAX_CODE_WIDTH)
    }
}

/// Output of [`compress`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LzwEncoding {
    pub codes: Vec<u16>,
    /// Input length in bytes
    pub original_length: usize,
    /// Dictionary entries at the end of encoding, seed entries included
    pub dictionary_size: usize,
    /// Entries added on top of the 256 seed entries
    pub entries_added: usize,
}

impl LzwEncoding {
    /// Codes joined by `", "`.
    pub fn notation(&self) -> String {
        self.codes
            .iter()
            .map(u16::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Output of [`decompress`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LzwDecoding {
    pub bytes: Vec<u8>,
    pub length: usize,
}

impl LzwDecoding {
    /// The decoded bytes as UTF-8 text.
    pub fn text(&self) -> Result<String> {
        String::from_utf8(self.bytes.clone())
            .map_err(|e| Error::format(format!("decoded bytes are not valid UTF-8: {e}")))
    }
}

/// Compresses the input data using the LZW algorithm.
///
/// # Details
///
/// The dictionary starts with all 256 single-byte sequences; code `n` stands
/// for byte `n`, so those entries are implicit. New entries are keyed by
/// (code of the matched prefix, next byte) and numbered from 256 upwards.
/// The algorithm extends the current match while `match + byte` is known;
/// otherwise it emits the code of the match, adds `match + byte` to the
/// dictionary (while there is room) and restarts the match at `byte`.
///
/// # Errors
///
/// Returns `Error::EmptyInput` for empty input and `Error::Config` for an
/// invalid configuration.
///
/// # Example
///
/// ```
/// use text_codecs::compression::lzw::{compress, LzwConfig};
///
/// let encoded = compress(b"TOBEORNOTTOBEORTOBEORNOT", &LzwConfig::default()).unwrap();
/// assert_eq!(&encoded.codes[..3], &[84, 79, 66]);
/// ```
pub fn compress(input: &[u8], config: &LzwConfig) -> Result<LzwEncoding> {
    config.validate()?;
    let (&first, rest) = input
        .split_first()
        .ok_or_else(|| Error::empty_input("nothing to LZW encode"))?;

    let capacity = config.capacity();
    let mut dict: HashMap<(u16, u8), u16> = HashMap::new();
    let mut next_code = FIRST_CODE as usize;

    let mut codes = Vec::new();
    let mut prefix = first as u16;
    for &byte in rest {
        if let Some(&code) = dict.get(&(prefix, byte)) {
            prefix = code;
            continue;
        }
        codes.push(prefix);
        if next_code < capacity {
            log::trace!("lzw: entry {} = ({}, {})", next_code, prefix, byte);
            dict.insert((prefix, byte), next_code as u16);
            next_code += 1;
            if next_code == capacity {
                log::warn!(
                    "lzw: dictionary full at {} entries, no further entries will be added",
                    capacity
                );
            }
        }
        prefix = byte as u16;
    }
    codes.push(prefix);

    let entries_added = next_code - FIRST_CODE as usize;
    log::debug!(
        "lzw: {} bytes -> {} codes, {} dictionary entries added",
        input.len(),
        codes.len(),
        entries_added
    );

    Ok(LzwEncoding {
        codes,
        original_length: input.len(),
        dictionary_size: SEED_ENTRIES + entries_added,
        entries_added,
    })
}

/// Decompresses a sequence of LZW codes back into the original byte data.
///
/// # Details
///
/// The dictionary is rebuilt in lockstep with the encoder: every code after
/// the first adds `previous + first byte of current` while there is room. A
/// code equal to the next unassigned code is the self-referencing case and
/// decodes to `previous + first byte of previous`.
///
/// # Errors
///
/// Returns `Error::EmptyInput` for an empty code list, `Error::Format` for a
/// code that is neither in the dictionary nor the self-referencing case, and
/// `Error::Config` for an invalid configuration.
///
/// # Example
///
/// ```
/// use text_codecs::compression::lzw::{compress, decompress, LzwConfig};
///
/// let config = LzwConfig::default();
/// let encoded = compress(b"TOBEORNOTTOBE", &config).unwrap();
/// let decoded = decompress(&encoded.codes, &config).unwrap();
/// assert_eq!(decoded.bytes, b"TOBEORNOTTOBE");
/// ```
pub fn decompress(codes: &[u16], config: &LzwConfig) -> Result<LzwDecoding> {
    config.validate()?;
    let (&first, rest) = codes
        .split_first()
        .ok_or_else(|| Error::empty_input("no LZW codes to decode"))?;
    if first as usize >= SEED_ENTRIES {
        return Err(Error::format(format!(
            "first code {first} must be a single-byte code"
        )));
    }

    let capacity = config.capacity();
    let mut dict: Vec<Vec<u8>> = (0..SEED_ENTRIES).map(|i| vec![i as u8]).collect();

    let mut previous = dict[first as usize].clone();
    let mut result = previous.clone();
    for (i, &code) in rest.iter().enumerate() {
        let code = code as usize;
        let entry = if code < dict.len() {
            dict[code].clone()
        } else if code == dict.len() && dict.len() < capacity {
            let mut entry = previous.clone();
            entry.push(previous[0]);
            entry
        } else {
            return Err(Error::format(format!(
                "code {} at position {} is not in the dictionary ({} entries)",
                code,
                i + 1,
                dict.len()
            )));
        };
        result.extend_from_slice(&entry);

        if dict.len() < capacity {
            let mut new_entry = previous;
            new_entry.push(entry[0]);
            dict.push(new_entry);
        }
        previous = entry;
    }

    log::debug!("lzw: {} codes -> {} bytes", codes.len(), result.len());
    let length = result.len();
    Ok(LzwDecoding {
        bytes: result,
        length,
    })
}

/// Parse a code list such as `"65, 66, 256"`.
///
/// # Errors
///
/// Returns `Error::EmptyInput` for blank text and `Error::Format` for a token
/// that is not an integer code in `0..=65535`.
pub fn parse_codes(text: &str) -> Result<Vec<u16>> {
    if text.trim().is_empty() {
        return Err(Error::empty_input("code list is blank"));
    }
    text.split(',')
        .map(str::trim)
        .enumerate()
        .map(|(i, token)| {
            token.parse::<u16>().map_err(|_| {
                Error::format(format!("token {i} ({token:?}) is not a valid LZW code"))
            })
        })
        .collect()
}

/// LZW codec holding its dictionary configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct LzwCodec {
    config: LzwConfig,
}

impl LzwCodec {
    pub fn new(config: LzwConfig) -> Result<Self> {
        config.validate()?;
        Ok(LzwCodec { config })
    }

    pub fn config(&self) -> &LzwConfig {
        &self.config
    }
}

impl Codec for LzwCodec {
    type Input = [u8];
    type Encoded = LzwEncoding;
    type Decoded = LzwDecoding;

    fn encode(&self, input: &[u8]) -> Result<LzwEncoding> {
        compress(input, &self.config)
    }

    fn decode(&self, encoded: &LzwEncoding) -> Result<LzwDecoding> {
        decompress(&encoded.codes, &self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(input: &[u8]) {
        let config = LzwConfig::default();
        let compressed = compress(input, &config).unwrap();
        let decompressed = decompress(&compressed.codes, &config).unwrap();
        assert_eq!(decompressed.bytes, input);
        assert_eq!(decompressed.length, input.len());
    }

    #[test]
    fn test_empty_input() {
        let config = LzwConfig::default();
        assert!(matches!(compress(b"", &config), Err(Error::EmptyInput(_))));
        assert!(matches!(decompress(&[], &config), Err(Error::EmptyInput(_))));
    }

    #[test]
    fn test_single_character() {
        round_trip(b"AAAAAA");
    }

    #[test]
    fn test_simple_string() {
        round_trip(b"TOBEORNOTTOBE");
    }

    #[test]
    fn test_known_codes() {
        let encoded = compress(b"ABABBABCABABBA", &LzwConfig::default()).unwrap();
        assert_eq!(
            encoded.codes,
            vec![65, 66, 256, 257, 66, 67, 256, 258, 65]
        );
        assert_eq!(encoded.entries_added, 8);
        assert_eq!(encoded.dictionary_size, 264);
        assert_eq!(encoded.notation(), "65, 66, 256, 257, 66, 67, 256, 258, 65");

        let decoded = decompress(&encoded.codes, &LzwConfig::default()).unwrap();
        assert_eq!(decoded.text().unwrap(), "ABABBABCABABBA");
    }

    #[test]
    fn test_self_referencing_code() {
        // "aaa" encodes to [97, 256] where 256 is used before the decoder has assigned it.
        let encoded = compress(b"aaa", &LzwConfig::default()).unwrap();
        assert_eq!(encoded.codes, vec![97, 256]);
        round_trip(b"aaa");
    }

    #[test]
    fn test_longer_input() {
        round_trip(b"abracadabra abracadabra abracadabra");
    }

    #[test]
    fn test_non_ascii() {
        round_trip("这是一段测试".as_bytes());
    }

    #[test]
    fn test_dictionary_freezes_at_capacity() {
        let config = LzwConfig { max_code_width: 9 };
        let input: Vec<u8> = (0..20_000u32).map(|i| (i * 7 % 251) as u8).collect();
        let encoded = compress(&input, &config).unwrap();
        assert_eq!(encoded.dictionary_size, config.capacity());
        assert!(encoded.codes.iter().all(|&c| (c as usize) < config.capacity()));
        let decoded = decompress(&encoded.codes, &config).unwrap();
        assert_eq!(decoded.bytes, input);
    }

    #[test]
    fn test_bad_codes_rejected() {
        let config = LzwConfig::default();
        assert!(matches!(decompress(&[300], &config), Err(Error::Format(_))));
        assert!(matches!(
            decompress(&[65, 258], &config),
            Err(Error::Format(_))
        ));
    }

    #[test]
    fn test_invalid_config() {
        assert!(matches!(
            LzwCodec::new(LzwConfig { max_code_width: 8 }),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            compress(b"abc", &LzwConfig { max_code_width: 17 }),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_parse_codes() {
        assert_eq!(parse_codes("65, 66, 256").unwrap(), vec![65, 66, 256]);
        assert!(matches!(parse_codes("  "), Err(Error::EmptyInput(_))));
        assert!(matches!(parse_codes("65, x"), Err(Error::Format(_))));
        assert!(matches!(parse_codes("65,,66"), Err(Error::Format(_))));
        assert!(matches!(parse_codes("70000"), Err(Error::Format(_))));
        assert!(matches!(parse_codes("-1"), Err(Error::Format(_))));
    }

    #[test]
    fn test_invalid_utf8_text() {
        let decoded = decompress(&[0xff, 0xfe], &LzwConfig::default()).unwrap();
        assert!(matches!(decoded.text(), Err(Error::Format(_))));
    }

    #[test]
    fn test_codec_trait() {
        let codec = LzwCodec::new(LzwConfig { max_code_width: 12 }).unwrap();
        let encoded = codec.encode(b"banana bandana").unwrap();
        assert_eq!(codec.decode(&encoded).unwrap().bytes, b"banana bandana");
    }
}
