//! md2x - small tools that convert Markdown into EPUB, PDF and XML
//!
//! Each binary reads a Markdown file, takes its front matter apart, fixes up
//! image paths and hands the document to external programs (pandoc,
//! xsltproc, htmldoc, faketime) to produce the target format.

pub mod cli;
pub mod convert;
pub mod error;
pub mod front_matter;
pub mod images;
pub mod tools;
pub mod xhtml;
pub mod xslt;

pub use error::{Error, Result};
pub use front_matter::{DocumentMeta, Metadata};
pub use tools::Toolchain;
pub use xslt::Stylesheet;
