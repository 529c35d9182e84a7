//! Arithmetic coding over a caller-supplied probability model.
//!
//! The model partitions `[0, 1)` into one half-open interval per symbol, in
//! lexicographic symbol order, sized by the symbol's share of the total
//! count. Encoding narrows `[low, high)` to the current symbol's
//! sub-interval for every symbol of the message and reports the midpoint of
//! the final interval.
//!
//! The model is taken as given and is never re-derived from the message: a
//! message may use its symbols in proportions quite unlike the model's.
//!
//! This coder works in double precision. Each symbol shrinks the interval by
//! its probability, so long messages eventually run out of precision; that
//! is reported as [`Error::PrecisionExhausted`] rather than producing a
//! collapsed interval.

use crate::compression::{Codec, FrequencyTable, Result};
use crate::error::Error;
use serde::{Deserialize, Serialize};

/// The sub-interval `[start, end)` owned by one symbol.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SymbolInterval {
    pub symbol: char,
    pub count: usize,
    pub start: f64,
    pub end: f64,
}

impl SymbolInterval {
    pub fn contains(&self, value: f64) -> bool {
        self.start <= value && value < self.end
    }
}

/// Partition of the unit interval by cumulative frequency.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProbabilityModel {
    intervals: Vec<SymbolInterval>,
    total: usize,
}

impl ProbabilityModel {
    /// Build the model from a frequency table.
    ///
    /// # Errors
    ///
    /// Returns `Error::EmptyInput` for an empty table and `Error::Format` if
    /// any count is zero or the counts sum past `usize::MAX`.
    pub fn from_frequencies(frequencies: &FrequencyTable) -> Result<Self> {
        if frequencies.is_empty() {
            return Err(Error::empty_input("probability model has no symbols"));
        }
        if let Some((symbol, _)) = frequencies.iter().find(|&(_, count)| count == 0) {
            return Err(Error::format(format!("symbol {symbol:?} has a zero count")));
        }

        let total = frequencies.total()?;
        let mut cumulative = 0usize;
        let mut intervals = Vec::with_capacity(frequencies.len());
        for (symbol, count) in frequencies.sorted_by_symbol() {
            let start = cumulative as f64 / total as f64;
            cumulative = cumulative
                .checked_add(count)
                .ok_or_else(|| Error::format("frequency counts overflow"))?;
            intervals.push(SymbolInterval {
                symbol,
                count,
                start,
                end: cumulative as f64 / total as f64,
            });
        }

        Ok(ProbabilityModel { intervals, total })
    }

    /// Parse a frequency spec such as `"a:2,b:7,c:1"` and build the model.
    ///
    /// Pairs are separated by commas; each pair is split at its last colon,
    /// so `"::3"` gives the colon itself a count of 3. Whitespace around the
    /// symbol and the count is ignored. A symbol listed twice keeps its last
    /// count.
    ///
    /// # Errors
    ///
    /// Returns `Error::EmptyInput` for a blank spec and `Error::Format` for a
    /// pair without a colon, a symbol that is not exactly one character, or
    /// a count that is not a positive integer.
    pub fn parse(spec: &str) -> Result<Self> {
        if spec.trim().is_empty() {
            return Err(Error::empty_input("frequency spec is blank"));
        }

        let mut frequencies = FrequencyTable::new();
        for (i, pair) in spec.split(',').enumerate() {
            let (symbol, count) = pair.rsplit_once(':').ok_or_else(|| {
                Error::format(format!("pair {i} ({pair:?}) is not of the form symbol:count"))
            })?;

            let mut chars = symbol.trim().chars();
            let symbol = match (chars.next(), chars.next()) {
                (Some(ch), None) => ch,
                _ => {
                    return Err(Error::format(format!(
                        "pair {i} ({pair:?}) must name exactly one symbol"
                    )))
                }
            };
            let count: usize = count.trim().parse().map_err(|_| {
                Error::format(format!("pair {i} ({pair:?}) has an invalid count"))
            })?;
            if count == 0 {
                return Err(Error::format(format!("pair {i} ({pair:?}) has a zero count")));
            }

            if let Some(previous) = frequencies.set(symbol, count) {
                log::warn!(
                    "arithmetic: symbol {:?} listed twice, count {} replaces {}",
                    symbol,
                    count,
                    previous
                );
            }
        }

        Self::from_frequencies(&frequencies)
    }

    pub fn interval(&self, symbol: char) -> Option<&SymbolInterval> {
        self.intervals
            .binary_search_by_key(&symbol, |interval| interval.symbol)
            .ok()
            .map(|i| &self.intervals[i])
    }

    /// Intervals in lexicographic symbol order.
    pub fn intervals(&self) -> &[SymbolInterval] {
        &self.intervals
    }

    /// Sum of all counts
    pub fn total(&self) -> usize {
        self.total
    }
}

/// Rendering precision for arithmetic coding results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArithmeticConfig {
    /// Decimal places of the encoded value
    pub value_precision: usize,
    /// Decimal places of the reported range bounds
    pub range_precision: usize,
}

impl Default for ArithmeticConfig {
    fn default() -> Self {
        ArithmeticConfig {
            value_precision: 8,
            range_precision: 4,
        }
    }
}

impl ArithmeticConfig {
    pub fn validate(&self) -> Result<()> {
        // f64 carries at most 17 significant decimal digits.
        if self.value_precision > 17 || self.range_precision > 17 {
            return Err(Error::config(format!(
                "precision must be at most 17 decimals, got value {} and range {}",
                self.value_precision, self.range_precision
            )));
        }
        Ok(())
    }
}

/// Output of [`arithmetic_encode`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArithmeticEncoding {
    /// Midpoint of the final interval
    pub value: f64,
    pub low: f64,
    pub high: f64,
    /// `value` rendered with the configured precision
    pub encoded: String,
    /// The final interval rendered as `[low, high)`
    pub range: String,
    /// Number of symbols in the message
    pub message_length: usize,
}

/// Encode `message` by successive interval narrowing.
///
/// # Errors
///
/// Returns `Error::EmptyInput` for an empty message, `Error::UnknownSymbol`
/// for a symbol the model does not cover, `Error::PrecisionExhausted` if the
/// interval collapses, and `Error::Config` for an invalid configuration.
///
/// # Example
///
/// ```
/// use text_codecs::compression::arithmetic::{arithmetic_encode, ArithmeticConfig, ProbabilityModel};
///
/// let model = ProbabilityModel::parse("a:2,b:7,c:1").unwrap();
/// let encoded = arithmetic_encode("abc", &model, &ArithmeticConfig::default()).unwrap();
/// assert_eq!(encoded.encoded, "0.17300000");
/// assert_eq!(encoded.range, "[0.1660, 0.1800)");
/// ```
pub fn arithmetic_encode(
    message: &str,
    model: &ProbabilityModel,
    config: &ArithmeticConfig,
) -> Result<ArithmeticEncoding> {
    config.validate()?;
    if message.is_empty() {
        return Err(Error::empty_input("nothing to arithmetic encode"));
    }

    let mut low = 0.0f64;
    let mut high = 1.0f64;
    let mut message_length = 0;
    for (position, symbol) in message.chars().enumerate() {
        let interval = model
            .interval(symbol)
            .ok_or(Error::UnknownSymbol { symbol, position })?;
        let range = high - low;
        high = low + range * interval.end;
        low += range * interval.start;
        if low >= high {
            return Err(Error::PrecisionExhausted { position });
        }
        message_length += 1;
    }

    let value = (low + high) / 2.0;
    log::debug!(
        "arithmetic: {} symbols -> {} in [{}, {})",
        message_length,
        value,
        low,
        high
    );

    Ok(ArithmeticEncoding {
        value,
        low,
        high,
        encoded: format!("{:.*}", config.value_precision, value),
        range: format!(
            "[{:.*}, {:.*})",
            config.range_precision, low, config.range_precision, high
        ),
        message_length,
    })
}

/// Parse `spec` into a model and encode `message` with it.
pub fn encode_with_spec(
    message: &str,
    spec: &str,
    config: &ArithmeticConfig,
) -> Result<ArithmeticEncoding> {
    if message.is_empty() {
        return Err(Error::empty_input("nothing to arithmetic encode"));
    }
    let model = ProbabilityModel::parse(spec)?;
    arithmetic_encode(message, &model, config)
}

/// Recover `length` symbols from an encoded value.
///
/// Replays the encoder's narrowing: at each step the next symbol is the one
/// whose sub-interval of the current `[low, high)` contains `value`. The
/// result is exact only while the message fits in double precision, which is
/// also the limit [`arithmetic_encode`] enforces.
///
/// # Errors
///
/// Returns `Error::EmptyInput` for a zero length and `Error::Format` if the
/// value falls outside every sub-interval.
///
/// # Example
///
/// ```
/// use text_codecs::compression::arithmetic::{arithmetic_decode, ProbabilityModel};
///
/// let model = ProbabilityModel::parse("a:2,b:7,c:1").unwrap();
/// assert_eq!(arithmetic_decode(0.173, 3, &model).unwrap(), "abc");
/// ```
pub fn arithmetic_decode(value: f64, length: usize, model: &ProbabilityModel) -> Result<String> {
    if length == 0 {
        return Err(Error::empty_input("nothing to arithmetic decode"));
    }

    let mut low = 0.0f64;
    let mut high = 1.0f64;
    let mut output = String::with_capacity(length);
    for position in 0..length {
        let range = high - low;
        let interval = model
            .intervals()
            .iter()
            .find(|interval| {
                let start = low + range * interval.start;
                let end = low + range * interval.end;
                start <= value && value < end
            })
            .ok_or_else(|| {
                Error::format(format!(
                    "value {value} lies outside every interval at position {position}"
                ))
            })?;
        output.push(interval.symbol);
        high = low + range * interval.end;
        low += range * interval.start;
    }

    log::debug!("arithmetic: {} -> {} symbols", value, length);
    Ok(output)
}

/// Arithmetic coder bound to one probability model.
#[derive(Debug, Clone)]
pub struct ArithmeticCodec {
    model: ProbabilityModel,
    config: ArithmeticConfig,
}

impl ArithmeticCodec {
    pub fn new(model: ProbabilityModel, config: ArithmeticConfig) -> Result<Self> {
        config.validate()?;
        Ok(ArithmeticCodec { model, config })
    }

    /// Build a codec from a frequency spec with the default configuration.
    pub fn from_spec(spec: &str) -> Result<Self> {
        Self::new(ProbabilityModel::parse(spec)?, ArithmeticConfig::default())
    }

    pub fn model(&self) -> &ProbabilityModel {
        &self.model
    }
}

impl Codec for ArithmeticCodec {
    type Input = str;
    type Encoded = ArithmeticEncoding;
    type Decoded = String;

    fn encode(&self, message: &str) -> Result<ArithmeticEncoding> {
        arithmetic_encode(message, &self.model, &self.config)
    }

    fn decode(&self, encoded: &ArithmeticEncoding) -> Result<String> {
        arithmetic_decode(encoded.value, encoded.message_length, &self.model)
    }
}
