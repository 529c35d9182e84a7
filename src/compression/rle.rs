//! Run-length encoding over text.
//!
//! Consecutive repeats of a character collapse into a single [`Run`]. Runs
//! render as the symbol followed by its decimal count (`A5`), and a whole
//! encoding renders as those runs separated by single spaces
//! (`A5 B3 C2 D1 A2`). [`parse_runs`] reads that notation back.

use crate::compression::{ratio, Codec, Result};
use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest expansion, in bytes, that [`decode`] will produce.
pub const MAX_DECODED_BYTES: usize = 1 << 30;

/// A symbol together with the number of times it repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Run {
    pub symbol: char,
    pub count: usize,
}

impl Run {
    pub fn new(symbol: char, count: usize) -> Self {
        Run { symbol, count }
    }

    /// Length in characters of the rendered form, e.g. 3 for `A12`.
    pub fn rendered_len(&self) -> usize {
        1 + self.count.to_string().len()
    }
}

impl fmt::Display for Run {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.symbol, self.count)
    }
}

/// Output of [`encode`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RleEncoding {
    pub runs: Vec<Run>,
    /// Input length in characters
    pub original_length: usize,
    /// Length of all rendered runs concatenated without separators
    pub compressed_length: usize,
    /// `original_length / compressed_length`
    pub ratio: f64,
}

impl RleEncoding {
    /// Runs rendered and joined by single spaces.
    pub fn notation(&self) -> String {
        self.runs
            .iter()
            .map(Run::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Output of [`decode`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RleDecoding {
    pub sequence: String,
    /// Length of `sequence` in characters
    pub length: usize,
}

/// Run-length encode `input`.
///
/// # Errors
///
/// Returns `Error::EmptyInput` for an empty string.
///
/// # Example
///
/// ```
/// use text_codecs::compression::rle::{encode, Run};
///
/// let encoded = encode("AAAAABBBCCDAA").unwrap();
/// assert_eq!(encoded.runs[0], Run::new('A', 5));
/// assert_eq!(encoded.compressed_length, 10);
/// ```
pub fn encode(input: &str) -> Result<RleEncoding> {
    let mut chars = input.chars();
    let first = chars
        .next()
        .ok_or_else(|| Error::empty_input("nothing to run-length encode"))?;

    let mut runs = Vec::new();
    let mut current = Run::new(first, 1);
    let mut original_length = 1;
    for ch in chars {
        original_length += 1;
        if ch == current.symbol {
            current.count += 1;
        } else {
            runs.push(current);
            current = Run::new(ch, 1);
        }
    }
    runs.push(current);

    let compressed_length: usize = runs.iter().map(Run::rendered_len).sum();
    let ratio = ratio::ratio(original_length as u64, compressed_length as u64)?.ratio;
    log::debug!(
        "rle: {} chars -> {} runs ({} chars rendered)",
        original_length,
        runs.len(),
        compressed_length
    );

    Ok(RleEncoding {
        runs,
        original_length,
        compressed_length,
        ratio,
    })
}

/// Expand runs back into the original text, in order.
///
/// # Errors
///
/// Returns `Error::EmptyInput` for an empty run list and `Error::Format` for a
/// run with a zero count or runs that expand past [`MAX_DECODED_BYTES`].
pub fn decode(runs: &[Run]) -> Result<RleDecoding> {
    if runs.is_empty() {
        return Err(Error::empty_input("no runs to decode"));
    }

    // Size the output before allocating anything.
    let mut length = 0usize;
    let mut bytes = 0usize;
    for (i, run) in runs.iter().enumerate() {
        if run.count == 0 {
            return Err(Error::format(format!(
                "run {} ({:?}) has a zero count",
                i, run.symbol
            )));
        }
        bytes = run
            .count
            .checked_mul(run.symbol.len_utf8())
            .and_then(|run_bytes| bytes.checked_add(run_bytes))
            .filter(|&total| total <= MAX_DECODED_BYTES)
            .ok_or_else(|| {
                Error::format(format!(
                    "run {i} expands past the {MAX_DECODED_BYTES} byte limit"
                ))
            })?;
        length += run.count;
    }

    let mut sequence = String::with_capacity(bytes);
    for run in runs {
        sequence.extend(std::iter::repeat(run.symbol).take(run.count));
    }
    log::debug!("rle: {} runs -> {} chars", runs.len(), length);

    Ok(RleDecoding { sequence, length })
}

/// Parse run notation such as `"A5 B3 C2"` (or the compact `"A5B3C2"`).
///
/// Each run is one symbol character followed by a decimal count; a single
/// space may separate runs. Because the symbol is always exactly one
/// character, spaces and digits are valid symbols too (`" 3"` is three spaces).
///
/// # Errors
///
/// Returns `Error::EmptyInput` for blank notation and `Error::Format` when a
/// run is missing its count or has a zero or oversized count.
pub fn parse_runs(notation: &str) -> Result<Vec<Run>> {
    if notation.trim().is_empty() {
        return Err(Error::empty_input("run notation is blank"));
    }

    let mut runs = Vec::new();
    let mut chars = notation.char_indices().peekable();
    while let Some((offset, symbol)) = chars.next() {
        let mut digits = String::new();
        while let Some(&(_, ch)) = chars.peek() {
            if !ch.is_ascii_digit() {
                break;
            }
            digits.push(ch);
            chars.next();
        }

        if digits.is_empty() {
            return Err(Error::format(format!(
                "run {symbol:?} at byte {offset} has no count"
            )));
        }
        let count: usize = digits.parse().map_err(|_| {
            Error::format(format!("count {digits} at byte {offset} is too large"))
        })?;
        if count == 0 {
            return Err(Error::format(format!(
                "run {symbol:?} at byte {offset} has a zero count"
            )));
        }
        runs.push(Run::new(symbol, count));

        if let Some(&(_, ' ')) = chars.peek() {
            chars.next();
        }
    }
    Ok(runs)
}

/// Parse run notation and expand it.
pub fn decode_notation(notation: &str) -> Result<RleDecoding> {
    decode(&parse_runs(notation)?)
}

/// Run-length codec as a value, for callers that hold codecs behind [`Codec`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RleCodec;

impl Codec for RleCodec {
    type Input = str;
    type Encoded = RleEncoding;
    type Decoded = RleDecoding;

    fn encode(&self, input: &str) -> Result<RleEncoding> {
        encode(input)
    }

    fn decode(&self, encoded: &RleEncoding) -> Result<RleDecoding> {
        decode(&encoded.runs)
    }
}
