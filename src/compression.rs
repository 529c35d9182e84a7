//! Compression algorithms implementation.
//!
//! This module provides implementations of several text compression codecs:
//! - Run-length encoding
//! - Dictionary-based compression (LZW)
//! - Static frequency-ranked fixed-width coding
//! - Huffman coding
//! - Arithmetic coding
//! - Compression ratio arithmetic
//!
//! Every codec is stateless: tables, dictionaries and models are built fresh
//! inside each call, so one codec value can be shared freely across threads.
//!
//! # Examples
//!
//! ```rust
//! use text_codecs::compression::{rle, Codec, RleCodec};
//!
//! let encoded = RleCodec.encode("AAAAABBBCCDAA").unwrap();
//! assert_eq!(encoded.notation(), "A5 B3 C2 D1 A2");
//! assert_eq!(RleCodec.decode(&encoded).unwrap().sequence, "AAAAABBBCCDAA");
//! assert!(rle::encode("").is_err());
//! ```

pub use crate::error::Result;

/// Trait for codecs that can encode an input and decode their own output
pub trait Codec {
    /// Raw input accepted by `encode`
    type Input: ?Sized;
    /// Record produced by `encode`
    type Encoded;
    /// Record produced by `decode`
    type Decoded;

    /// Encode the input data
    fn encode(&self, input: &Self::Input) -> Result<Self::Encoded>;

    /// Decode previously encoded data
    fn decode(&self, encoded: &Self::Encoded) -> Result<Self::Decoded>;
}

/// Encode a batch of independent inputs with one codec.
///
/// Each input gets its own result; a failure on one input does not affect the
/// others. With the `parallel` feature enabled the batch is spread over the
/// rayon thread pool.
pub fn encode_all<C>(codec: &C, inputs: &[&C::Input]) -> Vec<Result<C::Encoded>>
where
    C: Codec + Sync,
    C::Input: Sync,
    C::Encoded: Send,
{
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        inputs.par_iter().map(|input| codec.encode(*input)).collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        inputs.iter().map(|input| codec.encode(*input)).collect()
    }
}

pub mod bits;

pub mod table;
pub use table::{CodeTable, FrequencyTable};

pub mod ratio;
pub use ratio::{ratio, CompressionRatio};

pub mod rle;
pub use rle::{Run, RleCodec, RleDecoding, RleEncoding};

pub mod lzw;
pub use lzw::{LzwCodec, LzwConfig, LzwDecoding, LzwEncoding};

pub mod static_frequency;
pub use static_frequency::{StaticFrequencyCodec, StaticFrequencyEncoding};

pub mod huffman;
pub use huffman::{HuffmanCodec, HuffmanEncoding, HuffmanNode};

pub mod arithmetic;
pub use arithmetic::{
    ArithmeticCodec, ArithmeticConfig, ArithmeticEncoding, ProbabilityModel, SymbolInterval,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_all_keeps_order_and_errors() {
        let inputs = ["AAB", "", "CCCC"];
        let results = encode_all(&RleCodec, &inputs);
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap().notation(), "A2 B1");
        assert!(matches!(results[1], Err(crate::Error::EmptyInput(_))));
        assert_eq!(results[2].as_ref().unwrap().notation(), "C4");
    }
}
