/// Offset schemas for the fixed-layout binary records that make up a legacy Word
/// document header and piece table.
///
/// Each schema is an ordered sequence of [`SchemaEntry`] values. Order is
/// semantically significant: it is the order fields appear in the byte layout.
/// A schema is resolved from a record-type tag via [`lookup`].

/// One entry in an offset schema.
#[derive(Debug, Clone)]
pub enum SchemaEntry {
    /// An opaque fixed-length field, decoded as a plain little-endian value.
    Opaque { name: &'static str, len: usize },
    /// A fixed-length field split into bit-packed sub-fields.
    ///
    /// `names.len() == widths.len()` and `widths.iter().sum() == 8 * len`.
    Bits {
        name: &'static str,
        len: usize,
        names: &'static [&'static str],
        widths: &'static [usize],
    },
}

impl SchemaEntry {
    pub fn len(&self) -> usize {
        match self {
            SchemaEntry::Opaque { len, .. } => *len,
            SchemaEntry::Bits { len, .. } => *len,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SchemaEntry::Opaque { name, .. } => name,
            SchemaEntry::Bits { name, .. } => name,
        }
    }
}

const fn opaque(name: &'static str, len: usize) -> SchemaEntry {
    SchemaEntry::Opaque { name, len }
}

const fn bits(
    name: &'static str,
    len: usize,
    names: &'static [&'static str],
    widths: &'static [usize],
) -> SchemaEntry {
    SchemaEntry::Bits {
        name,
        len,
        names,
        widths,
    }
}

/// FibBase: the fixed 32-byte header at the start of the FIB.
pub fn fib_base_schema() -> Vec<SchemaEntry> {
    vec![
        opaque("wIdent", 2),
        opaque("nFib", 2),
        opaque("unused", 2),
        opaque("lid", 2),
        opaque("pnNext", 2),
        bits(
            "flags1",
            2,
            &[
                "fDot",
                "fGlsy",
                "fComplex",
                "fHasPic",
                "cQuickSaves",
                "fEncrypted",
                "fWhichTblStm",
                "fReadOnlyRecommended",
                "fWriteReservation",
                "fExtChar",
                "fLoadOverride",
                "fFarEast",
                "fObfuscated",
            ],
            &[1, 1, 1, 1, 4, 1, 1, 1, 1, 1, 1, 1, 1],
        ),
        opaque("nFibBack", 2),
        opaque("lKey", 4),
        opaque("envr", 1),
        bits(
            "flags2",
            1,
            &[
                "fMac",
                "fEmptySpecial",
                "fLoadOverridePage",
                "fFutureSavedUndo",
                "fWord97Saved",
                "fSpare0",
            ],
            &[1, 1, 1, 1, 1, 3],
        ),
        opaque("reserved3", 2),
        opaque("reserved4", 2),
        opaque("reserved5", 4),
        opaque("reserved6", 4),
    ]
}

/// `clw`: a single count field preceding `FibRgW97`.
pub fn clw_schema() -> Vec<SchemaEntry> {
    vec![opaque("clw", 2)]
}

/// FibRgW97: fourteen reserved 2-byte words (28 bytes total).
pub fn fib_rg_w97_schema() -> Vec<SchemaEntry> {
    (0..14)
        .map(|i| match i {
            0 => opaque("abcdefg", 2),
            _ => opaque(leak(format!("rgW97Reserved{}", i)), 2),
        })
        .collect()
}

/// `cslw`: a single count field preceding `FibRgLw97`.
pub fn cslw_schema() -> Vec<SchemaEntry> {
    vec![opaque("cslw", 2)]
}

/// FibRgLw97: document-wide lengths and subdocument character counts (88 bytes).
pub fn fib_rg_lw97_schema() -> Vec<SchemaEntry> {
    let mut entries = vec![
        opaque("cbMac", 4),
        opaque("reserved1", 4),
        opaque("reserved2", 4),
        opaque("ccpText", 4),
        opaque("ccpFtn", 4),
        opaque("ccpHdd", 4),
        opaque("ccpMcr", 4),
        opaque("ccpAtn", 4),
        opaque("ccpEdn", 4),
        opaque("ccpTxbx", 4),
        opaque("ccpHdrTxbx", 4),
    ];
    for i in 0..11 {
        entries.push(opaque(leak(format!("lw97Reserved{}", i)), 4));
    }
    entries
}

/// `cbRgFcLcb`: the count of `(fc, lcb)` pairs that follow in `FibRgFcLcb`.
pub fn cb_rg_fc_lcb_schema() -> Vec<SchemaEntry> {
    vec![opaque("cbRgFcLcb", 2)]
}

/// `cswNew`: the count of 2-byte words that follow in `FibRgCswNew`.
pub fn csw_new_schema() -> Vec<SchemaEntry> {
    vec![opaque("cswNew", 2)]
}

/// Index of the `(fcClx, lcbClx)` pair within `FibRgFcLcb`, matching the
/// documented offset (FIB byte 0x1A2, i.e. 154 + 33*8).
pub const FC_CLX_INDEX: usize = 33;

/// Name the `i`th `(fc*, lcb*)` pair within `FibRgFcLcb`.
///
/// `FibRgFcLcb` has no fixed length (it is sized by `cbRgFcLcb * 8`), so its
/// field names are generated on demand rather than carried in a static table;
/// only the pair this crate actually reads (`fcClx`/`lcbClx`) gets a real name.
pub fn fc_lcb_pair_names(index: usize) -> (String, String) {
    if index == FC_CLX_INDEX {
        ("fcClx".to_string(), "lcbClx".to_string())
    } else {
        (format!("fcReserved{}", index), format!("lcbReserved{}", index))
    }
}

/// `Pcd`: an 8-byte piece descriptor (descriptor flags, fc, PRM).
pub fn pcd_schema() -> Vec<SchemaEntry> {
    vec![
        opaque("descriptor", 2),
        opaque("fc", 4),
        opaque("prm", 2),
    ]
}

/// `Fc`: the bit-packed re-decoding of a piece descriptor's 4-byte `fc` field.
pub fn fc_schema() -> Vec<SchemaEntry> {
    vec![bits(
        "fc",
        4,
        &["fc", "fCompressed", "fR2"],
        &[30, 1, 1],
    )]
}

/// Resolve a schema by its record-type tag.
///
/// `FibRgFcLcb` and `FibRgCswNew` are variable-length and are not resolved here;
/// they use the dedicated walks in [`super::fib`].
pub fn lookup(tag: &str) -> Option<Vec<SchemaEntry>> {
    match tag {
        "FibBase" => Some(fib_base_schema()),
        "Clw" => Some(clw_schema()),
        "FibRgW97" => Some(fib_rg_w97_schema()),
        "Cslw" => Some(cslw_schema()),
        "FibRgLw97" => Some(fib_rg_lw97_schema()),
        "CbRgFcLcb" => Some(cb_rg_fc_lcb_schema()),
        "CswNew" => Some(csw_new_schema()),
        "Pcd" => Some(pcd_schema()),
        "Fc" => Some(fc_schema()),
        _ => None,
    }
}

/// Leak a computed string into a `'static str`.
///
/// The generated reserved-field names are needed only a handful of times per
/// parse (schema construction happens once per document, not per record), so the
/// small one-time leak is preferable to threading lifetimes through every schema
/// consumer for names nobody inspects beyond debug output.
fn leak(s: String) -> &'static str {
    Box::leak(s.into_boxed_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn total_bits(entries: &[SchemaEntry]) -> usize {
        entries
            .iter()
            .map(|e| match e {
                SchemaEntry::Opaque { len, .. } => len * 8,
                SchemaEntry::Bits { widths, .. } => widths.iter().sum(),
            })
            .sum()
    }

    #[test]
    fn test_fib_base_is_32_bytes() {
        let schema = fib_base_schema();
        assert_eq!(total_bits(&schema), 32 * 8);
    }

    #[test]
    fn test_fib_rg_w97_is_28_bytes() {
        assert_eq!(total_bits(&fib_rg_w97_schema()), 28 * 8);
    }

    #[test]
    fn test_fib_rg_lw97_is_88_bytes() {
        assert_eq!(total_bits(&fib_rg_lw97_schema()), 88 * 8);
    }

    #[test]
    fn test_bit_entries_cover_every_bit() {
        for entry in fib_base_schema() {
            if let SchemaEntry::Bits { len, widths, .. } = entry {
                assert_eq!(widths.iter().sum::<usize>(), len * 8);
            }
        }
    }

    #[test]
    fn test_fc_clx_index_matches_documented_offset() {
        // FibRgFcLcb starts at FIB offset 154; fcClx/lcbClx is documented at 0x1A2.
        assert_eq!(154 + FC_CLX_INDEX * 8, 0x1A2);
    }

    #[test]
    fn test_fc_lcb_pair_names_has_clx_pair() {
        assert_eq!(
            fc_lcb_pair_names(FC_CLX_INDEX),
            ("fcClx".to_string(), "lcbClx".to_string())
        );
        assert_eq!(
            fc_lcb_pair_names(0),
            ("fcReserved0".to_string(), "lcbReserved0".to_string())
        );
    }

    #[test]
    fn test_unknown_tag_is_none() {
        assert!(lookup("NotARecord").is_none());
    }
}
