/// Primitive decoding helpers shared by every schema-driven parser in this module.
///
/// A `DecodedField` is the result of decoding an opaque byte slice: its raw bytes,
/// its little-endian unsigned value, and a hex rendering. A `BitField` is the result
/// of splitting a byte slice into sub-fields by bit width.
use std::fmt;

/// A decoded fixed-width field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedField {
    /// Raw bytes as they appeared in the stream.
    pub bytes: Vec<u8>,
    /// Little-endian unsigned integer value of `bytes`.
    pub numeric: u64,
    /// Lowercase `0x`-prefixed hex rendering of `bytes`.
    pub hex: String,
}

impl DecodedField {
    /// Decode a byte slice into its numeric and hex forms.
    ///
    /// `bytes` must be no longer than 8; longer inputs have their numeric value
    /// computed from the first 8 bytes only (the hex/raw forms are unaffected).
    pub fn decode(bytes: &[u8]) -> Self {
        let mut numeric: u64 = 0;
        for (i, &b) in bytes.iter().take(8).enumerate() {
            numeric |= (b as u64) << (8 * i);
        }
        let mut hex = String::with_capacity(2 + bytes.len() * 2);
        hex.push_str("0x");
        for &b in bytes {
            hex.push_str(&format!("{:02x}", b));
        }
        Self {
            bytes: bytes.to_vec(),
            numeric,
            hex,
        }
    }

    /// Length of the underlying byte slice.
    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }
}

/// A decoded bit-packed sub-field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitField {
    /// Bit string in MSB-first order, e.g. `"101"`.
    pub bits: String,
    /// Numeric value of the bit string, read MSB-first.
    pub numeric: u64,
    /// Width of this sub-field in bits.
    pub width: usize,
}

/// Split `bytes` into bit-packed sub-fields of the given widths.
///
/// Each byte is expanded LSB-first into the bit stream (bit 0 first), the full
/// stream is then chunked by `widths`, and each chunk is read back MSB-first to
/// produce its numeric value. This mirrors how the source format packs bit fields:
/// the byte-level storage order is little-endian-like (LSB first) but individual
/// sub-fields are still meant to be read as ordinary big-endian integers.
///
/// Panics if `widths` does not sum to `8 * bytes.len()` — this is a schema
/// authoring error, not a runtime data error, and is checked by the schema
/// completeness test.
pub fn decode_bits(bytes: &[u8], widths: &[usize]) -> Vec<BitField> {
    let mut stream: Vec<u8> = Vec::with_capacity(bytes.len() * 8);
    for &b in bytes {
        for i in 0..8 {
            stream.push((b >> i) & 1);
        }
    }
    debug_assert_eq!(
        stream.len(),
        widths.iter().sum::<usize>(),
        "bit widths must cover every bit of the input"
    );

    let mut fields = Vec::with_capacity(widths.len());
    let mut cursor = 0;
    for &width in widths {
        let chunk = &stream[cursor..cursor + width];
        cursor += width;

        // Reverse the LSB-first chunk so it reads MSB-first, then parse as an
        // ordinary binary string.
        let reversed: Vec<u8> = chunk.iter().rev().copied().collect();
        let mut bits = String::with_capacity(width);
        let mut numeric: u64 = 0;
        for (j, &bit) in reversed.iter().enumerate() {
            bits.push(if bit == 1 { '1' } else { '0' });
            numeric |= (bit as u64) << (width - 1 - j);
        }
        fields.push(BitField {
            bits,
            numeric,
            width,
        });
    }
    fields
}

/// A value held in a [`Record`]: either an opaque decoded field or a bit sub-field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Field(DecodedField),
    Bits(BitField),
}

impl FieldValue {
    /// The numeric value, regardless of which variant this is.
    pub fn numeric(&self) -> u64 {
        match self {
            FieldValue::Field(f) => f.numeric,
            FieldValue::Bits(b) => b.numeric,
        }
    }

    pub fn as_field(&self) -> Option<&DecodedField> {
        match self {
            FieldValue::Field(f) => Some(f),
            FieldValue::Bits(_) => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Field(d) => write!(f, "{}", d.hex),
            FieldValue::Bits(b) => write!(f, "{} ({})", b.numeric, b.bits),
        }
    }
}

/// An ordered, name-indexed collection of decoded fields.
///
/// Insertion order matters: it mirrors the order fields appear in the binary
/// layout, and several callers rely on being able to iterate a record in schema
/// order. A `Vec`-backed lookup is used rather than a map type, matching this
/// codebase's preference for concrete ordered containers over a general-purpose
/// map dependency.
#[derive(Debug, Clone, Default)]
pub struct Record {
    entries: Vec<(String, FieldValue)>,
}

impl Record {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn insert(&mut self, name: impl Into<String>, value: FieldValue) {
        self.entries.push((name.into(), value));
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn get_field(&self, name: &str) -> Option<&DecodedField> {
        self.get(name).and_then(FieldValue::as_field)
    }

    pub fn numeric(&self, name: &str) -> Option<u64> {
        self.get(name).map(FieldValue::numeric)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(String, FieldValue)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_field_little_endian() {
        let f = DecodedField::decode(&[0x01, 0x02]);
        assert_eq!(f.numeric, 0x0201);
        assert_eq!(f.hex, "0x0102");
        assert_eq!(f.len(), 2);
    }

    #[test]
    fn test_decode_field_empty() {
        let f = DecodedField::decode(&[]);
        assert_eq!(f.numeric, 0);
        assert_eq!(f.hex, "0x");
    }

    #[test]
    fn test_decode_bits_canonical_example() {
        // 0b10110100 with widths [3, 5] must decode to 4 and 22.
        let fields = decode_bits(&[0b1011_0100], &[3, 5]);
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].numeric, 4);
        assert_eq!(fields[0].width, 3);
        assert_eq!(fields[1].numeric, 22);
        assert_eq!(fields[1].width, 5);
    }

    #[test]
    fn test_record_preserves_insertion_order() {
        let mut rec = Record::new();
        rec.insert("a", FieldValue::Field(DecodedField::decode(&[1])));
        rec.insert("b", FieldValue::Field(DecodedField::decode(&[2])));
        let names: Vec<&str> = rec.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(rec.numeric("b"), Some(2));
    }

    proptest::proptest! {
        #[test]
        fn prop_decode_field_matches_le_integer(bytes in proptest::collection::vec(proptest::prelude::any::<u8>(), 0..=8)) {
            let f = DecodedField::decode(&bytes);
            let mut expected: u64 = 0;
            for (i, &b) in bytes.iter().enumerate() {
                expected |= (b as u64) << (8 * i);
            }
            proptest::prop_assert_eq!(f.numeric, expected);
            proptest::prop_assert_eq!(f.hex, format!("0x{}", bytes.iter().map(|b| format!("{:02x}", b)).collect::<String>()));
        }

        #[test]
        fn prop_decode_bits_widths_sum_to_input(byte in proptest::prelude::any::<u8>()) {
            let fields = decode_bits(&[byte], &[3, 5]);
            let total: usize = fields.iter().map(|f| f.width).sum();
            proptest::prop_assert_eq!(total, 8);
            let reconstructed = fields[0].numeric | (fields[1].numeric << 3);
            proptest::prop_assert_eq!(reconstructed as u8, byte);
        }
    }
}
