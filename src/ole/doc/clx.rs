/// Parsing of the Clx / Pcdt / PlcPcd chain: the piece table that maps logical
/// character positions onto byte ranges in the `WordDocument` stream.
use super::package::{DocError, Result};
use super::primitive::DecodedField;
use super::record;

/// One piece descriptor, decoded two ways: the raw 8-byte `Pcd` fields, and the
/// bit-split re-decoding of its `fc` sub-field (offset + compression flag).
#[derive(Debug, Clone)]
pub struct PieceDescriptor {
    pub pcd: super::primitive::Record,
    pub fc_fields: super::primitive::Record,
}

impl PieceDescriptor {
    /// Byte offset into `WordDocument` where this piece's raw bytes begin.
    pub fn fc(&self) -> u64 {
        self.fc_fields.numeric("fc").unwrap_or(0)
    }

    /// Whether this piece is single-byte ("compressed") rather than UTF-16LE.
    pub fn is_compressed(&self) -> bool {
        self.fc_fields.numeric("fCompressed").unwrap_or(0) != 0
    }
}

/// The parsed Clx structure.
#[derive(Debug, Clone)]
pub struct Clx {
    /// Bytes preceding the `0x02` Pcdt marker (grouping/property data, not
    /// further decoded by this crate).
    pub rg_prc: Vec<u8>,
    /// `lcb` as claimed by the Pcdt header.
    pub claimed_lcb: u64,
    /// Character-position boundaries, length `N`.
    pub cp: Vec<u64>,
    /// Piece descriptors, length `N - 1`.
    pub pieces: Vec<PieceDescriptor>,
}

/// Split the Clx blob at the first `0x02` byte and parse the Pcdt/PlcPcd tail.
pub fn parse(clx_bytes: &[u8]) -> Result<Clx> {
    let split = clx_bytes
        .iter()
        .position(|&b| b == 0x02)
        .ok_or(DocError::MissingPcdt)?;

    let rg_prc = clx_bytes[..split].to_vec();
    let pcdt_blob = &clx_bytes[split..];

    if pcdt_blob.len() < 5 {
        return Err(DocError::Truncated(
            "Pcdt header (clxt + lcb) truncated".to_string(),
        ));
    }

    let lcb = DecodedField::decode(&pcdt_blob[1..5]);
    let plc_pcd_blob = &pcdt_blob[5..];
    let actual_len = plc_pcd_blob.len() as u64;

    if lcb.numeric != actual_len {
        eprintln!(
            "warning: Pcdt lcb claims {} bytes but PlcPcd is actually {} bytes; using actual length",
            lcb.numeric, actual_len
        );
    }

    let (cp, pieces) = parse_plc_pcd(plc_pcd_blob)?;

    Ok(Clx {
        rg_prc,
        claimed_lcb: lcb.numeric,
        cp,
        pieces,
    })
}

/// Decode a PlcPcd blob into its character-position array and piece descriptors.
fn parse_plc_pcd(blob: &[u8]) -> Result<(Vec<u64>, Vec<PieceDescriptor>)> {
    let l = blob.len();
    if (l + 8) % 12 != 0 {
        return Err(DocError::MalformedPlcPcd(format!(
            "PlcPcd length {} does not satisfy the 12N-8 form",
            l
        )));
    }
    let n = (l + 8) / 12;
    if n == 0 {
        return Err(DocError::MalformedPlcPcd(
            "PlcPcd blob too short to contain even one character position".to_string(),
        ));
    }

    let cp_bytes = 4 * n;
    let mut cp = Vec::with_capacity(n);
    for chunk in blob[..cp_bytes].chunks_exact(4) {
        cp.push(DecodedField::decode(chunk).numeric);
    }

    let mut pieces = Vec::with_capacity(n - 1);
    for chunk in blob[cp_bytes..].chunks_exact(8) {
        let pcd = record::parse("Pcd", chunk)?;
        let fc_bytes = pcd
            .get_field("fc")
            .map(|f| f.bytes.clone())
            .unwrap_or_default();
        let fc_fields = record::parse("Fc", &fc_bytes)?;
        pieces.push(PieceDescriptor { pcd, fc_fields });
    }

    Ok((cp, pieces))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_plc_pcd(cp: &[u32], pieces: &[(u32, bool)]) -> Vec<u8> {
        let mut blob = Vec::new();
        for &c in cp {
            blob.extend_from_slice(&c.to_le_bytes());
        }
        for &(offset, compressed) in pieces {
            blob.extend_from_slice(&0u16.to_le_bytes()); // descriptor
            let mut fc = offset & 0x3FFF_FFFF;
            if compressed {
                fc |= 1 << 30;
            }
            blob.extend_from_slice(&fc.to_le_bytes());
            blob.extend_from_slice(&0u16.to_le_bytes()); // prm
        }
        blob
    }

    fn build_clx(plc_pcd: &[u8]) -> Vec<u8> {
        let mut clx = vec![0x01, 0x00, 0x00]; // a fake RgPrc prefix
        clx.push(0x02); // Pcdt marker
        clx.extend_from_slice(&(plc_pcd.len() as u32).to_le_bytes());
        clx.extend_from_slice(plc_pcd);
        clx
    }

    #[test]
    fn test_missing_pcdt_fails() {
        let clx_bytes = [0x01, 0x01, 0x01];
        assert!(matches!(parse(&clx_bytes), Err(DocError::MissingPcdt)));
    }

    #[test]
    fn test_plc_pcd_shape() {
        let plc_pcd = build_plc_pcd(&[0, 5, 11], &[(0, true), (0, false)]);
        let clx_bytes = build_clx(&plc_pcd);
        let clx = parse(&clx_bytes).unwrap();
        assert_eq!(clx.cp, vec![0, 5, 11]);
        assert_eq!(clx.pieces.len(), 2);
        assert!(clx.pieces[0].is_compressed());
        assert!(!clx.pieces[1].is_compressed());
    }

    #[test]
    fn test_malformed_plc_pcd_length() {
        // 10 bytes satisfies neither 12N-8 for any integer N.
        let clx_bytes = build_clx(&[0u8; 10]);
        assert!(matches!(parse(&clx_bytes), Err(DocError::MalformedPlcPcd(_))));
    }

    #[test]
    fn test_rg_prc_captured_before_pcdt_marker() {
        let plc_pcd = build_plc_pcd(&[0, 3], &[(0, true)]);
        let clx_bytes = build_clx(&plc_pcd);
        let clx = parse(&clx_bytes).unwrap();
        assert_eq!(clx.rg_prc, vec![0x01, 0x00, 0x00]);
    }

    proptest::proptest! {
        #[test]
        fn prop_plc_pcd_shape_holds(n in 1usize..50) {
            let cp: Vec<u32> = (0..=n as u32).collect();
            let pieces: Vec<(u32, bool)> = (0..n).map(|i| (i as u32, i % 2 == 0)).collect();
            let plc_pcd = build_plc_pcd(&cp, &pieces);
            let clx_bytes = build_clx(&plc_pcd);
            let clx = parse(&clx_bytes).unwrap();

            proptest::prop_assert_eq!(clx.cp.len(), clx.pieces.len() + 1);
            proptest::prop_assert_eq!(12 * clx.pieces.len() + 4, plc_pcd.len());
        }
    }
}
