//! Embedded XSLT stylesheets and their application through `xsltproc`.

use crate::error::Result;
use crate::front_matter::Metadata;
use crate::tools::{self, Toolchain};
use std::ffi::OsString;
use std::path::Path;

static PDF_STYLESHEET: &str = include_str!("stylesheets/pdf.xsl");
static ARTICLE_STYLESHEET: &str = include_str!("stylesheets/article.xsl");
static BLOG_STYLESHEET: &str = include_str!("stylesheets/blog.xsl");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stylesheet {
    /// XHTML to the HTML flavour htmldoc lays out.
    Pdf,
    /// XHTML to an `<article>` document.
    Article,
    /// XHTML to a `<blog>` entry.
    Blog,
}

impl Stylesheet {
    pub fn source(self) -> &'static str {
        match self {
            Stylesheet::Pdf => PDF_STYLESHEET,
            Stylesheet::Article => ARTICLE_STYLESHEET,
            Stylesheet::Blog => BLOG_STYLESHEET,
        }
    }

    fn scratch_prefix(self) -> &'static str {
        match self {
            Stylesheet::Pdf => "md2pdf-",
            Stylesheet::Article | Stylesheet::Blog => "md2xml-",
        }
    }
}

/// `--stringparam name value` for every metadata entry.
pub fn string_params(params: &Metadata) -> Vec<OsString> {
    let mut args = Vec::with_capacity(3 * params.len());
    for (name, value) in params.iter() {
        args.push("--stringparam".into());
        args.push(name.into());
        args.push(value.into());
    }
    args
}

/// Applies `stylesheet` to the XML document at `document` and returns the result.
pub fn transform(
    toolchain: &Toolchain,
    stylesheet: Stylesheet,
    document: &Path,
    params: &Metadata,
) -> Result<Vec<u8>> {
    let xsl = tools::scratch_file(
        stylesheet.scratch_prefix(),
        ".xsl",
        stylesheet.source().as_bytes(),
    )?;

    let mut command = tools::command(&toolchain.xsltproc)?;
    command
        .args(string_params(params))
        .arg(xsl.path())
        .arg(document);
    tracing::debug!(?stylesheet, params = params.len(), "applying stylesheet");
    tools::run(&mut command)
}
