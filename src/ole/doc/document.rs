/// Document - the main API for working with Word document content.
use super::clx::Clx;
use super::fib::Fib;
use super::package::{DocError, Result};
use super::text::{self, TextExtractionOptions};
use super::super::consts::STGTY_STREAM;
use super::super::OleFile;
use std::io::{Read, Seek};

/// A Word document (.doc).
///
/// This is the main API for reading legacy Word document content: the
/// compound file's two streams are parsed once, at construction time, and the
/// extracted text is held for the lifetime of the `Document`.
///
/// # Examples
///
/// ```rust,no_run
/// use litchi::doc::Package;
///
/// let mut pkg = Package::open("document.doc")?;
/// let doc = pkg.document()?;
/// println!("Document text: {}", doc.text());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct Document {
    /// File Information Block from the WordDocument stream.
    fib: Fib,
    /// The already-extracted, post-processed document text.
    text: String,
}

impl Document {
    /// Build a `Document` by driving the full extraction pipeline: open
    /// streams, locate the Clx inside the Table stream via the Fib's
    /// offsets, parse the piece table, and run text extraction.
    ///
    /// This is typically called internally by `Package::document()`.
    pub(crate) fn from_ole<R: Read + Seek>(
        ole: &mut OleFile<R>,
        options: &TextExtractionOptions,
    ) -> Result<Self> {
        let word_document = ole
            .open_stream(&["WordDocument"])
            .map_err(|_| DocError::StreamNotFound("WordDocument".to_string()))?;

        let fib = Fib::parse(&word_document)?;

        let table_stream_name = find_table_stream_name(ole)?;
        let table_stream = ole
            .open_stream(&[&table_stream_name])
            .map_err(|_| DocError::StreamNotFound(table_stream_name.clone()))?;

        let fc_clx = fib.fc_clx().ok_or_else(|| {
            DocError::InvalidFormat("FibRgFcLcb has no fcClx/lcbClx pair".to_string())
        })? as usize;
        let lcb_clx = fib.lcb_clx().unwrap_or(0) as usize;
        if fc_clx + lcb_clx > table_stream.len() {
            return Err(DocError::InconsistentLength(format!(
                "Clx range [{}, {}) exceeds {} stream length {}",
                fc_clx,
                fc_clx + lcb_clx,
                table_stream_name,
                table_stream.len()
            )));
        }
        let clx_bytes = &table_stream[fc_clx..fc_clx + lcb_clx];
        let clx: Clx = super::clx::parse(clx_bytes)?;

        let text = text::extract(&word_document, &clx, options);

        Ok(Self { fib, text })
    }

    /// Get the extracted, post-processed text content of the document.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use litchi::doc::Package;
    ///
    /// let mut pkg = Package::open("document.doc")?;
    /// let doc = pkg.document()?;
    /// println!("{}", doc.text());
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Get access to the parsed File Information Block.
    ///
    /// This provides lower-level access to document version and offsets.
    #[inline]
    pub fn fib(&self) -> &Fib {
        &self.fib
    }
}

/// Find the single root-level stream whose name, with its first character
/// stripped, equals `"Table"`. The legacy format stores the active piece
/// table in either `0Table` or `1Table`; the Fib's `fWhichTblStm` bit is
/// ignored here in favor of "the one that exists". Zero or multiple matches
/// is a fatal `AmbiguousTableStream`.
fn find_table_stream_name<R: Read + Seek>(ole: &OleFile<R>) -> Result<String> {
    let candidates: Vec<String> = ole
        .list_directory_entries(&[])
        .map_err(DocError::Ole)?
        .into_iter()
        .filter(|entry| entry.entry_type == STGTY_STREAM)
        .filter(|entry| entry.name.len() > 1 && &entry.name[1..] == "Table")
        .map(|entry| entry.name.clone())
        .collect();

    match candidates.as_slice() {
        [name] => Ok(name.clone()),
        [] => Err(DocError::AmbiguousTableStream(
            "no root stream named '0Table' or '1Table' found".to_string(),
        )),
        _ => Err(DocError::AmbiguousTableStream(format!(
            "multiple candidate Table streams found: {:?}",
            candidates
        ))),
    }
}

#[cfg(test)]
mod tests {
    // End-to-end construction is exercised via `Package`/`OleFile`
    // integration tests (requires building a full compound file); the
    // per-component behaviors (Fib/Clx/text parsing, stream disambiguation)
    // are covered in their own modules.
}
