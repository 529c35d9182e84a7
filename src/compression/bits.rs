//! Conversion between textual bit strings and packed bytes.
//!
//! Coders in this crate report their output as a string of `'0'`/`'1'`
//! characters so it can be displayed directly. These helpers pack such a
//! string MSB-first into bytes (padding the final byte with zeros) and read
//! it back when the exact bit count is known.

use crate::compression::Result;
use crate::error::Error;
use bitvec::prelude::*;

/// Check that `bits` only contains `'0'` and `'1'`.
pub fn validate(bits: &str) -> Result<()> {
    match bits.char_indices().find(|&(_, ch)| ch != '0' && ch != '1') {
        Some((offset, ch)) => Err(Error::format(format!(
            "bit string has {ch:?} at byte {offset}, expected '0' or '1'"
        ))),
        None => Ok(()),
    }
}

/// Pack a bit string into bytes, MSB first.
///
/// # Example
///
/// ```
/// use text_codecs::compression::bits::pack;
///
/// assert_eq!(pack("10111").unwrap(), vec![0b1011_1000]);
/// ```
pub fn pack(bits: &str) -> Result<Vec<u8>> {
    validate(bits)?;
    let mut packed: BitVec<u8, Msb0> = BitVec::repeat(false, bits.len());
    for (i, bit) in bits.bytes().enumerate() {
        if bit == b'1' {
            packed.set(i, true);
        }
    }
    Ok(packed.into_vec())
}

/// Read the first `bit_len` bits of `bytes` back into a bit string.
///
/// # Errors
///
/// Returns `Error::Format` if `bytes` holds fewer than `bit_len` bits.
pub fn unpack(bytes: &[u8], bit_len: usize) -> Result<String> {
    let view = bytes.view_bits::<Msb0>();
    if bit_len > view.len() {
        return Err(Error::format(format!(
            "need {} bits but only {} are available",
            bit_len,
            view.len()
        )));
    }
    Ok(view[..bit_len]
        .iter()
        .map(|bit| if *bit { '1' } else { '0' })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_pads_final_byte() {
        assert_eq!(pack("1").unwrap(), vec![0b1000_0000]);
        assert_eq!(
            pack("1010101111110000").unwrap(),
            vec![0b1010_1011, 0b1111_0000]
        );
        assert_eq!(pack("").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_unpack_reverses_pack() {
        let bits = "0110100111";
        let packed = pack(bits).unwrap();
        assert_eq!(packed.len(), 2);
        assert_eq!(unpack(&packed, bits.len()).unwrap(), bits);
    }

    #[test]
    fn test_invalid_bits() {
        assert!(matches!(pack("01a1"), Err(Error::Format(_))));
        assert!(matches!(unpack(&[0xff], 9), Err(Error::Format(_))));
    }
}
