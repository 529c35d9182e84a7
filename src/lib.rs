pub mod compression;
pub mod error;

pub use compression::{arithmetic, huffman, lzw, ratio, rle, static_frequency, table, Codec};
pub use error::{Error, Result};
