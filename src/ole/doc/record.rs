/// Schema-driven decoding of fixed-layout records.
///
/// Given a record-type tag and a byte slice, walks the tag's schema in order,
/// slicing off each field's bytes and decoding it (or its bit sub-fields) into a
/// [`Record`].
use super::package::{DocError, Result};
use super::primitive::{decode_bits, DecodedField, FieldValue, Record};
use super::schema::{self, SchemaEntry};

/// Parse `bytes` as an instance of the record type named `tag`.
///
/// Fails with [`DocError::UnknownRecordType`] if `tag` has no registered schema,
/// and with [`DocError::Truncated`] if `bytes` runs out before the schema does.
pub fn parse(tag: &str, bytes: &[u8]) -> Result<Record> {
    let schema = schema::lookup(tag).ok_or_else(|| DocError::UnknownRecordType(tag.to_string()))?;
    parse_with_schema(&schema, bytes, tag)
}

/// Parse `bytes` against an explicit schema (used by callers that build a
/// schema dynamically, such as the `FibRgFcLcb` walk).
pub fn parse_with_schema(schema: &[SchemaEntry], bytes: &[u8], tag: &str) -> Result<Record> {
    let mut record = Record::new();
    let mut cursor = 0usize;

    for entry in schema {
        let len = entry.len();
        if cursor + len > bytes.len() {
            return Err(DocError::Truncated(format!(
                "{}: field '{}' needs {} bytes at offset {}, only {} available",
                tag,
                entry.name(),
                len,
                cursor,
                bytes.len() - cursor
            )));
        }
        let slice = &bytes[cursor..cursor + len];
        cursor += len;

        match entry {
            SchemaEntry::Opaque { name, .. } => {
                record.insert(*name, FieldValue::Field(DecodedField::decode(slice)));
            }
            SchemaEntry::Bits { names, widths, .. } => {
                for (sub_name, field) in names.iter().zip(decode_bits(slice, widths)) {
                    record.insert(*sub_name, FieldValue::Bits(field));
                }
            }
        }
    }

    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_clw() {
        let rec = parse("Clw", &[0x05, 0x00]).unwrap();
        assert_eq!(rec.numeric("clw"), Some(5));
    }

    #[test]
    fn test_parse_unknown_tag() {
        let err = parse("NoSuchRecord", &[0x00]);
        assert!(matches!(err, Err(DocError::UnknownRecordType(_))));
    }

    #[test]
    fn test_parse_truncated() {
        let err = parse("FibBase", &[0x00; 4]);
        assert!(matches!(err, Err(DocError::Truncated(_))));
    }

    #[test]
    fn test_parse_pcd() {
        let mut bytes = vec![0u8; 8];
        bytes[2..6].copy_from_slice(&0x1234_5678u32.to_le_bytes());
        let rec = parse("Pcd", &bytes).unwrap();
        assert_eq!(rec.numeric("fc"), Some(0x1234_5678));
    }
}
