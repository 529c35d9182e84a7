use crate::compression::Result;
use crate::error::Error;
use serde::Serialize;
use std::fmt;

/// Compression ratio, rate and savings for a pair of sizes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CompressionRatio {
    /// `original / compressed`
    pub ratio: f64,
    /// Compressed size as a percentage of the original
    pub rate: f64,
    /// Percentage of the original size saved (negative when the data grew)
    pub saved: f64,
}

impl CompressionRatio {
    /// Ratio rendered as `"X.XX:1"`.
    pub fn ratio_string(&self) -> String {
        format!("{:.2}:1", self.ratio)
    }

    pub fn rate_string(&self) -> String {
        format!("{:.2}%", self.rate)
    }

    pub fn saved_string(&self) -> String {
        format!("{:.2}%", self.saved)
    }
}

impl fmt::Display for CompressionRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (rate {}, saved {})",
            self.ratio_string(),
            self.rate_string(),
            self.saved_string()
        )
    }
}

/// Compute the compression ratio between an original and a compressed size.
///
/// # Errors
///
/// Returns `Error::DivisionByZero` if either size is zero.
///
/// # Example
///
/// ```
/// use text_codecs::compression::ratio::ratio;
///
/// let r = ratio(1000, 400).unwrap();
/// assert_eq!(r.ratio_string(), "2.50:1");
/// assert_eq!(r.saved_string(), "60.00%");
/// ```
pub fn ratio(original_size: u64, compressed_size: u64) -> Result<CompressionRatio> {
    if compressed_size == 0 {
        return Err(Error::division_by_zero("compressed size is zero"));
    }
    if original_size == 0 {
        return Err(Error::division_by_zero("original size is zero"));
    }

    let original = original_size as f64;
    let compressed = compressed_size as f64;
    Ok(CompressionRatio {
        ratio: original / compressed,
        rate: compressed / original * 100.0,
        saved: (original - compressed) / original * 100.0,
    })
}
