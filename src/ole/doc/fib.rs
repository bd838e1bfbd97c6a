/// File Information Block (FIB) parser for DOC files.
///
/// The FIB is located at the beginning of the WordDocument stream and describes
/// the document's overall shape: version, flags, and the offset/length of every
/// other structure in the file (including, critically, the Clx piece table).
///
/// Unlike the older, hand-rolled field-at-a-time reader this replaces, the FIB is
/// now decoded by walking nine sub-records in order through the schema-driven
/// [`record`](super::record) parser. Two of those sub-records (`FibRgFcLcb`,
/// `FibRgCswNew`) have lengths that depend on earlier fields and are walked by
/// hand rather than through a single static schema.
use super::package::{DocError, Result};
use super::primitive::{DecodedField, FieldValue, Record};
use super::schema;

/// A fully parsed FIB: one `Record` per sub-record, in the order they appear.
#[derive(Debug, Clone)]
pub struct Fib {
    pub fib_base: Record,
    pub clw: Record,
    pub fib_rg_w97: Record,
    pub cslw: Record,
    pub fib_rg_lw97: Record,
    pub cb_rg_fc_lcb: Record,
    pub fib_rg_fc_lcb: Record,
    pub csw_new: Record,
    pub fib_rg_csw_new: Record,
}

const WORD97_MAGIC: u64 = 0xA5EC;
const WORD6_MAGIC: u64 = 0xA5DC;

impl Fib {
    /// Parse a FIB from the start of the `WordDocument` stream.
    pub fn parse(word_document: &[u8]) -> Result<Self> {
        let mut cursor = 0usize;

        let fib_base = take_fixed(word_document, &mut cursor, "FibBase")?;
        let magic = fib_base.numeric("wIdent").unwrap_or(0);
        if magic != WORD97_MAGIC && magic != WORD6_MAGIC {
            return Err(DocError::InvalidFormat(format!(
                "invalid FIB magic number: 0x{:04X}",
                magic
            )));
        }

        let clw = take_fixed(word_document, &mut cursor, "Clw")?;
        let fib_rg_w97 = take_fixed(word_document, &mut cursor, "FibRgW97")?;
        let cslw = take_fixed(word_document, &mut cursor, "Cslw")?;
        let fib_rg_lw97 = take_fixed(word_document, &mut cursor, "FibRgLw97")?;
        let cb_rg_fc_lcb = take_fixed(word_document, &mut cursor, "CbRgFcLcb")?;

        let fc_lcb_count = cb_rg_fc_lcb.numeric("cbRgFcLcb").unwrap_or(0) as usize;
        let fib_rg_fc_lcb = parse_fib_rg_fc_lcb(word_document, &mut cursor, fc_lcb_count)?;

        let csw_new = take_fixed(word_document, &mut cursor, "CswNew")?;
        let csw_new_count = csw_new.numeric("cswNew").unwrap_or(0) as usize;
        let mut fib_rg_csw_new = parse_fib_rg_csw_new(word_document, &mut cursor, csw_new_count)?;

        // Word 2010+ (nFib == 274) appends an 8-byte rgCswNewData field formed by
        // concatenating nFibNew with the extension tail, when both were present.
        if let (Some(n_fib_new), Some(extend)) = (
            fib_rg_csw_new.get_field("nFibNew").cloned(),
            fib_rg_csw_new.get_field("rgCswNewData_extend").cloned(),
        ) {
            if n_fib_new.numeric == 274 {
                let mut combined = n_fib_new.bytes.clone();
                combined.extend_from_slice(&extend.bytes);
                fib_rg_csw_new.insert(
                    "rgCswNewData",
                    FieldValue::Field(DecodedField::decode(&combined)),
                );
            }
        }

        Ok(Self {
            fib_base,
            clw,
            fib_rg_w97,
            cslw,
            fib_rg_lw97,
            cb_rg_fc_lcb,
            fib_rg_fc_lcb,
            csw_new,
            fib_rg_csw_new,
        })
    }

    /// Byte offset of the Clx structure within the Table stream.
    pub fn fc_clx(&self) -> Option<u64> {
        self.fib_rg_fc_lcb.numeric("fcClx")
    }

    /// Byte length of the Clx structure within the Table stream.
    pub fn lcb_clx(&self) -> Option<u64> {
        self.fib_rg_fc_lcb.numeric("lcbClx")
    }

    /// File format version (`nFib`).
    pub fn version(&self) -> u16 {
        self.fib_base.numeric("nFib").unwrap_or(0) as u16
    }

    /// Whether the document requires a password to open (`fEncrypted`).
    pub fn is_encrypted(&self) -> bool {
        self.fib_base.numeric("fEncrypted").unwrap_or(0) != 0
    }
}

/// Run the generic schema-driven parser for one of the fixed-size sub-records,
/// advancing `cursor` by the number of bytes it consumed.
fn take_fixed(word_document: &[u8], cursor: &mut usize, tag: &str) -> Result<Record> {
    let schema = schema::lookup(tag)
        .unwrap_or_else(|| unreachable!("fixed FIB sub-record '{tag}' is always registered"));
    let len: usize = schema.iter().map(|e| e.len()).sum();

    if *cursor + len > word_document.len() {
        return Err(DocError::Truncated(format!(
            "FIB sub-record '{}' needs {} bytes at offset {}, only {} available",
            tag,
            len,
            cursor,
            word_document.len() - *cursor
        )));
    }
    let slice = &word_document[*cursor..*cursor + len];
    *cursor += len;
    super::record::parse(tag, slice)
}

/// Walk the variable-length `FibRgFcLcb` sub-record: `cb_rg_fc_lcb_count` pairs
/// of `(fc, lcb)` 4-byte fields, named generically except for `fcClx`/`lcbClx`.
fn parse_fib_rg_fc_lcb(
    word_document: &[u8],
    cursor: &mut usize,
    pair_count: usize,
) -> Result<Record> {
    let declared_len = pair_count * 8;
    if *cursor + declared_len > word_document.len() {
        return Err(DocError::InconsistentLength(format!(
            "FibRgFcLcb claims {} bytes ({} pairs) at offset {}, but only {} remain",
            declared_len,
            pair_count,
            cursor,
            word_document.len() - *cursor
        )));
    }

    let mut record = Record::new();
    for i in 0..pair_count {
        let (fc_name, lcb_name) = schema::fc_lcb_pair_names(i);
        let fc_bytes = &word_document[*cursor..*cursor + 4];
        let lcb_bytes = &word_document[*cursor + 4..*cursor + 8];
        record.insert(fc_name, FieldValue::Field(DecodedField::decode(fc_bytes)));
        record.insert(lcb_name, FieldValue::Field(DecodedField::decode(lcb_bytes)));
        *cursor += 8;
    }
    Ok(record)
}

/// Walk the variable-length `FibRgCswNew` sub-record: up to 8 bytes, split into
/// `nFibNew` (2 bytes) and `rgCswNewData_extend` (6 bytes). Truncates rather than
/// padding when `delta` falls short — older documents simply omit the tail.
fn parse_fib_rg_csw_new(
    word_document: &[u8],
    cursor: &mut usize,
    csw_count: usize,
) -> Result<Record> {
    let declared_len = csw_count * 2;
    if *cursor + declared_len > word_document.len() {
        return Err(DocError::InconsistentLength(format!(
            "FibRgCswNew claims {} bytes at offset {}, but only {} remain",
            declared_len,
            cursor,
            word_document.len() - *cursor
        )));
    }

    let mut record = Record::new();
    let mut remaining = declared_len;
    let base = *cursor;

    if remaining >= 2 {
        let bytes = &word_document[base..base + 2];
        record.insert("nFibNew", FieldValue::Field(DecodedField::decode(bytes)));
        remaining -= 2;
    }
    if remaining >= 6 {
        let start = base + 2;
        let bytes = &word_document[start..start + 6];
        record.insert(
            "rgCswNewData_extend",
            FieldValue::Field(DecodedField::decode(bytes)),
        );
    }

    *cursor += declared_len;
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_word_document(nfib: u16, csw_new_count: u16, extra_csw_bytes: &[u8]) -> Vec<u8> {
        // FibBase(32) + clw(2) + FibRgW97(28) + cslw(2) + FibRgLw97(88)
        //   + cbRgFcLcb(2) + FibRgFcLcb(0 pairs) + cswNew(2) + FibRgCswNew(extra)
        let mut data = vec![0u8; 32 + 2 + 28 + 2 + 88 + 2];
        data[0..2].copy_from_slice(&(WORD97_MAGIC as u16).to_le_bytes());
        data[2..4].copy_from_slice(&nfib.to_le_bytes());
        // cbRgFcLcb = 0 pairs, so FibRgFcLcb contributes no bytes.
        data.extend_from_slice(&csw_new_count.to_le_bytes());
        data.extend_from_slice(extra_csw_bytes);
        data
    }

    #[test]
    fn test_fib_min_size() {
        let short_data = vec![0u8; 16];
        assert!(Fib::parse(&short_data).is_err());
    }

    #[test]
    fn test_fib_magic_validation() {
        let mut data = vec![0u8; 512];
        data[0] = 0xFF;
        data[1] = 0xFF;
        assert!(Fib::parse(&data).is_err());
    }

    #[test]
    fn test_fib_valid_minimal() {
        let data = minimal_word_document(0x00C1, 2, &[0xAA, 0xBB]);
        let fib = Fib::parse(&data).unwrap();
        assert_eq!(fib.version(), 0x00C1);
        assert!(!fib.is_encrypted());
    }

    #[test]
    fn test_fib_rg_fc_lcb_clx_pointer() {
        // Build cbRgFcLcb = FC_CLX_INDEX + 1 pairs so the clx pair is present.
        let pairs = schema::FC_CLX_INDEX + 1;
        let mut data = vec![0u8; 32 + 2 + 28 + 2 + 88];
        data[0..2].copy_from_slice(&(WORD97_MAGIC as u16).to_le_bytes());
        data[2..4].copy_from_slice(&0x00C1u16.to_le_bytes());
        data.extend_from_slice(&(pairs as u16).to_le_bytes());

        for i in 0..pairs {
            if i == schema::FC_CLX_INDEX {
                data.extend_from_slice(&1234u32.to_le_bytes());
                data.extend_from_slice(&56u32.to_le_bytes());
            } else {
                data.extend_from_slice(&0u32.to_le_bytes());
                data.extend_from_slice(&0u32.to_le_bytes());
            }
        }
        data.extend_from_slice(&0u16.to_le_bytes()); // cswNew = 0

        let fib = Fib::parse(&data).unwrap();
        assert_eq!(fib.fc_clx(), Some(1234));
        assert_eq!(fib.lcb_clx(), Some(56));
    }

    #[test]
    fn test_fib_rg_csw_new_truncates_without_padding() {
        // cswNew = 1 means only nFibNew (2 bytes) is present, no extension tail.
        let data = minimal_word_document(0x0101, 1, &[]);
        let fib = Fib::parse(&data).unwrap();
        assert!(fib.fib_rg_csw_new.get_field("nFibNew").is_some());
        assert!(fib.fib_rg_csw_new.get_field("rgCswNewData_extend").is_none());
    }

    #[test]
    fn test_fib_rg_csw_new_synthesizes_combined_field_for_word2010() {
        let extend_bytes = [0x42u8, 0, 0, 0, 0, 0];
        let mut data = minimal_word_document(0x0112, 4, &extend_bytes);
        let nfib_new_offset = data.len() - 8;
        data[nfib_new_offset..nfib_new_offset + 2].copy_from_slice(&274u16.to_le_bytes());

        let fib = Fib::parse(&data).unwrap();
        let combined = fib.fib_rg_csw_new.get_field("rgCswNewData").unwrap();
        assert_eq!(combined.bytes.len(), 8);
        assert_eq!(combined.bytes[0..2], 274u16.to_le_bytes());
    }

    #[test]
    fn test_fib_inconsistent_length_fails() {
        let mut data = vec![0u8; 32 + 2 + 28 + 2 + 88];
        data[0..2].copy_from_slice(&(WORD97_MAGIC as u16).to_le_bytes());
        data[2..4].copy_from_slice(&0x00C1u16.to_le_bytes());
        // Claim far more fc/lcb pairs than the stream can possibly hold.
        data.extend_from_slice(&60000u16.to_le_bytes());
        let err = Fib::parse(&data);
        assert!(matches!(err, Err(DocError::InconsistentLength(_))));
    }
}
