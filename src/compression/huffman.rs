use crate::compression::{bits, ratio, Codec, CodeTable, FrequencyTable, Result};
use crate::error::Error;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Node of a Huffman tree; `freq` is the weight of the subtree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum HuffmanNode {
    Leaf { ch: char, freq: usize },
    Internal {
        freq: usize,
        left: Box<HuffmanNode>,
        right: Box<HuffmanNode>,
    },
}

impl HuffmanNode {
    pub fn freq(&self) -> usize {
        match *self {
            HuffmanNode::Leaf { freq, .. } | HuffmanNode::Internal { freq, .. } => freq,
        }
    }
}

/// Heap entry ordering nodes by frequency, then by creation order, so that
/// the node with the smallest frequency (and among equals, the oldest) has
/// the highest priority.
#[derive(Debug)]
struct NodeWrapper {
    node: Box<HuffmanNode>,
    seq: usize,
}

impl PartialEq for NodeWrapper {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for NodeWrapper {}

impl Ord for NodeWrapper {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse: lower frequency and lower sequence come first.
        other
            .node
            .freq()
            .cmp(&self.node.freq())
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for NodeWrapper {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Build the Huffman tree given a frequency table.
/// Returns `None` if the frequency table is empty.
///
/// Leaves enter the heap in the table's order, so the tree is the same for
/// the same input on every run.
pub fn build_huffman_tree(freq_table: &FrequencyTable) -> Option<Box<HuffmanNode>> {
    let mut heap = BinaryHeap::new();
    let mut seq = 0;
    for (ch, freq) in freq_table.iter() {
        heap.push(NodeWrapper {
            node: Box::new(HuffmanNode::Leaf { ch, freq }),
            seq,
        });
        seq += 1;
    }

    // Combine nodes until only one tree remains.
    loop {
        let first = heap.pop()?;
        let Some(second) = heap.pop() else {
            return Some(first.node);
        };
        let internal = Box::new(HuffmanNode::Internal {
            freq: first.node.freq() + second.node.freq(),
            left: first.node,
            right: second.node,
        });
        heap.push(NodeWrapper {
            node: internal,
            seq,
        });
        seq += 1;
    }
}

/// Assign each leaf the path that reaches it: `0` for a left branch, `1`
/// for a right one. A tree that is a single leaf gets the code `"0"`.
pub fn build_code_table(node: &HuffmanNode) -> CodeTable {
    let mut table = CodeTable::new();
    let mut path = String::new();
    assign_codes(node, &mut path, &mut table);
    table
}

fn assign_codes(node: &HuffmanNode, path: &mut String, table: &mut CodeTable) {
    match node {
        HuffmanNode::Leaf { ch, .. } if path.is_empty() => table.insert(*ch, "0".to_string()),
        HuffmanNode::Leaf { ch, .. } => table.insert(*ch, path.clone()),
        HuffmanNode::Internal { left, right, .. } => {
            for (bit, child) in [('0', left), ('1', right)] {
                path.push(bit);
                assign_codes(child, path, table);
                path.pop();
            }
        }
    }
}

/// Output of [`huffman_encode`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HuffmanEncoding {
    pub frequencies: FrequencyTable,
    pub code_table: CodeTable,
    pub tree: Box<HuffmanNode>,
    pub bits: String,
    pub original_bits: usize,
    pub encoded_bits: usize,
    pub ratio: f64,
}

impl HuffmanEncoding {
    /// The bit string packed MSB-first into bytes.
    pub fn packed(&self) -> Result<Vec<u8>> {
        bits::pack(&self.bits)
    }
}

/// Builds the Huffman tree from input, encodes the input, and returns the
/// tree, code table and bit string together.
///
/// # Errors
///
/// Returns `Error::EmptyInput` for an empty string.
///
/// # Example
///
/// ```
/// use text_codecs::compression::huffman::{huffman_decode, huffman_encode};
///
/// let encoded = huffman_encode("huffman coding in rust is fun!").unwrap();
/// let decoded = huffman_decode(&encoded.bits, &encoded.tree).unwrap();
/// assert_eq!(decoded, "huffman coding in rust is fun!");
/// ```
pub fn huffman_encode(input: &str) -> Result<HuffmanEncoding> {
    let frequencies = FrequencyTable::from_text(input);
    let tree = build_huffman_tree(&frequencies)
        .ok_or_else(|| Error::empty_input("nothing to Huffman encode"))?;
    let code_table = build_code_table(&tree);
    let bits = code_table.encode(input)?;

    let symbols = frequencies.total()?;
    let original_bits = symbols * 8;
    let encoded_bits = bits.len();
    let ratio = ratio::ratio(original_bits as u64, encoded_bits as u64)?.ratio;
    log::debug!(
        "huffman: {} symbols ({} distinct) -> {} bits",
        symbols,
        frequencies.len(),
        encoded_bits
    );

    Ok(HuffmanEncoding {
        frequencies,
        code_table,
        tree,
        bits,
        original_bits,
        encoded_bits,
        ratio,
    })
}

/// Decode an encoded bit string using the Huffman tree.
/// Traverses the tree according to each bit until a leaf is reached.
///
/// # Errors
///
/// Returns `Error::EmptyInput` for an empty bit string and `Error::Format`
/// for a character other than `'0'`/`'1'`, a bit that leads out of the tree,
/// or a stream that ends partway through a codeword.
pub fn huffman_decode(encoded: &str, tree: &HuffmanNode) -> Result<String> {
    if encoded.is_empty() {
        return Err(Error::empty_input("no bits to decode"));
    }
    bits::validate(encoded)?;

    // Special case: if tree is a leaf, each '0' represents one occurrence
    if let HuffmanNode::Leaf { ch, .. } = tree {
        if let Some(offset) = encoded.find('1') {
            return Err(Error::format(format!(
                "bit {offset} is '1' but a single-symbol code only uses '0'"
            )));
        }
        return Ok(encoded.chars().map(|_| *ch).collect());
    }

    let mut result = String::new();
    let mut current = tree;
    for bit in encoded.bytes() {
        if let HuffmanNode::Internal { left, right, .. } = current {
            current = if bit == b'0' { left } else { right };
        }
        if let HuffmanNode::Leaf { ch, .. } = current {
            result.push(*ch);
            current = tree;
        }
    }
    if !std::ptr::eq(current, tree) {
        return Err(Error::format("bit string ends partway through a codeword"));
    }

    log::debug!("huffman: {} bits -> {} symbols", encoded.len(), result.chars().count());
    Ok(result)
}

/// Huffman codec as a value.
#[derive(Debug, Clone, Copy, Default)]
pub struct HuffmanCodec;

impl Codec for HuffmanCodec {
    type Input = str;
    type Encoded = HuffmanEncoding;
    type Decoded = String;

    fn encode(&self, input: &str) -> Result<HuffmanEncoding> {
        huffman_encode(input)
    }

    fn decode(&self, encoded: &HuffmanEncoding) -> Result<String> {
        huffman_decode(&encoded.bits, &encoded.tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_tree_weights_and_coverage() {
        let input = "mississippi river";
        let freq = FrequencyTable::from_text(input);
        let tree = build_huffman_tree(&freq).unwrap();
        // The root weighs the whole message; every distinct symbol gets a code.
        assert_eq!(tree.freq(), 17);
        let code_table = build_code_table(&tree);
        assert_eq!(code_table.len(), freq.len());
        for (symbol, _) in freq.iter() {
            assert!(code_table.get(symbol).is_some(), "no code for {symbol:?}");
        }
        assert!(build_huffman_tree(&FrequencyTable::new()).is_none());
    }

    #[test]
    fn test_codes_are_prefix_free() {
        let encoded = huffman_encode("abracadabra alakazam").unwrap();
        let codes: Vec<&str> = encoded.code_table.iter().map(|(_, code)| code).collect();
        for (i, a) in codes.iter().enumerate() {
            for (j, b) in codes.iter().enumerate() {
                if i != j {
                    assert!(!b.starts_with(a), "{a} is a prefix of {b}");
                }
            }
        }
    }

    #[test]
    fn test_frequent_symbols_get_short_codes() {
        let encoded = huffman_encode("aaaaaaaabbbcd").unwrap();
        assert_eq!(encoded.code_table.get('a').map(str::len), Some(1));
        assert!(encoded.encoded_bits < 2 * 13);
        assert_eq!(encoded.original_bits, 104);
    }

    #[test]
    fn test_deterministic_tree() {
        let a = huffman_encode("tie break test").unwrap();
        let b = huffman_encode("tie break test").unwrap();
        assert_eq!(a.tree, b.tree);
        assert_eq!(a.bits, b.bits);
    }

    #[test]
    fn test_encoding_sizes_and_ratio() {
        let input = "aaaabbc";
        let encoded = huffman_encode(input).unwrap();
        // c and b merge first, so a takes one bit and the others two.
        assert_eq!(encoded.code_table.get('a').map(str::len), Some(1));
        assert_eq!(encoded.code_table.get('b').map(str::len), Some(2));
        assert_eq!(encoded.encoded_bits, 4 + 2 * 2 + 2);
        assert_eq!(encoded.bits.len(), encoded.encoded_bits);
        assert_eq!(encoded.original_bits, 56);
        assert_relative_eq!(encoded.ratio, 5.6);
        assert_eq!(huffman_decode(&encoded.bits, &encoded.tree).unwrap(), input);
    }

    #[test]
    fn test_single_symbol_stream() {
        let encoded = huffman_encode("zzzz").unwrap();
        assert_eq!(encoded.code_table.get('z'), Some("0"));
        assert_eq!(encoded.bits, "0000");
        assert_relative_eq!(encoded.ratio, 8.0);
        assert_eq!(huffman_decode("00", &encoded.tree).unwrap(), "zz");
        assert!(matches!(
            huffman_decode("001", &encoded.tree),
            Err(Error::Format(_))
        ));
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(huffman_encode(""), Err(Error::EmptyInput(_))));
        let tree = huffman_encode("ab").unwrap().tree;
        assert!(matches!(huffman_decode("", &tree), Err(Error::EmptyInput(_))));
    }

    #[test]
    fn test_truncated_stream() {
        let encoded = huffman_encode("aaaabbc").unwrap();
        // 'a' is the only one-bit code, so dropping the last bit of a multi-bit code leaves a partial codeword.
        let code_c = encoded.code_table.get('c').unwrap();
        let truncated = &code_c[..code_c.len() - 1];
        assert!(matches!(
            huffman_decode(truncated, &encoded.tree),
            Err(Error::Format(_))
        ));
        assert!(matches!(
            huffman_decode("01x", &encoded.tree),
            Err(Error::Format(_))
        ));
    }

    #[test]
    fn test_codec_trait() {
        let encoded = HuffmanCodec.encode("go go gophers").unwrap();
        assert_eq!(encoded.packed().unwrap().len(), encoded.encoded_bits.div_ceil(8));
        assert_eq!(HuffmanCodec.decode(&encoded).unwrap(), "go go gophers");
    }
}
