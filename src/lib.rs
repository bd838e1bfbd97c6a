//! Litchi - a Rust library for extracting plain text from legacy Microsoft
//! Word binary documents (`.doc`, the pre-XML Word 97-2003 format).
//!
//! The interesting engineering is not file I/O but the structured decoding of
//! a layered binary container: an OLE2/CFB compound-file storage that holds
//! two raw streams (`WordDocument` and a `Table` stream), a document header
//! (the "Fib") whose layout is versioned and partly length-prefixed, and a
//! piece-table (the "Clx"/"Pcdt"/"PlcPcd" chain) that maps logical character
//! positions to byte ranges inside the text stream.
//!
//! # Features
//!
//! - **OLE2/CFB reader**: generic compound-file structured storage reader
//!   (FAT/MiniFAT sector chains, directory traversal, stream assembly).
//! - **DOC text extraction**: schema-driven Fib and piece-table decoding,
//!   plus format-specific post-processing (hyperlink field collapse,
//!   control-character normalization, table-cell markers).
//!
//! # Example
//!
//! ```no_run
//! use litchi::ole::doc::Package;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut pkg = Package::open("document.doc")?;
//! let doc = pkg.document()?;
//! println!("Document text: {}", doc.text());
//! # Ok(())
//! # }
//! ```
//!
//! # Example - low-level OLE2 access
//!
//! ```no_run
//! use std::fs::File;
//! use litchi::ole::OleFile;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let file = File::open("document.doc")?;
//! let mut ole = OleFile::open(file)?;
//!
//! let streams = ole.list_streams();
//! for stream in streams {
//!     println!("Stream: {:?}", stream);
//! }
//!
//! let data = ole.open_stream(&["WordDocument"])?;
//! println!("Stream size: {} bytes", data.len());
//! # Ok(())
//! # }
//! ```

/// OLE2 (Object Linking and Embedding) compound-file parser, and the `doc`
/// submodule built on top of it for legacy Word documents.
pub mod ole;

// Re-export commonly used types for convenience.
pub use ole::doc;
pub use ole::{is_ole_file, OleFile};
