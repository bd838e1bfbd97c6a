/// Word (.doc) document support.
///
/// This module extracts the plain-text stream from legacy compound-binary
/// Word documents (Word 97-2003, the pre-XML binary Office format). It does
/// not parse formatting, styles, tables, or images; it reads a `.doc` file's
/// two OLE2 streams and returns one `String`.
///
/// # DOC File Structure
///
/// A .doc file is an OLE2 structured storage containing (at minimum):
/// - **WordDocument**: the File Information Block (Fib) and the raw text
///   bytes it indexes into.
/// - **0Table** or **1Table**: the Clx/Pcdt/PlcPcd piece table that maps
///   logical character positions to byte ranges inside `WordDocument`.
///
/// # Example
///
/// ```rust,no_run
/// use litchi::doc::Package;
///
/// let mut pkg = Package::open("document.doc")?;
/// let doc = pkg.document()?;
/// println!("Document text: {}", doc.text());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub mod clx;
pub mod document;
pub mod encoding;
pub mod fib;
pub mod package;
pub mod primitive;
pub mod record;
pub mod schema;
pub mod text;

pub use document::Document;
pub use package::{DocError, Package, Result};
pub use text::TextExtractionOptions;
