//! Markdown to the article / blog XML dialect: pandoc, then `xsltproc`.

use crate::error::Result;
use crate::front_matter::{self, Metadata};
use crate::images;
use crate::tools::{self, Toolchain};
use crate::xhtml;
use crate::xslt::{self, Stylesheet};

pub fn stylesheet(article: bool) -> Stylesheet {
    if article {
        Stylesheet::Article
    } else {
        Stylesheet::Blog
    }
}

/// Splits off the `%` header, rewrites images and has pandoc produce the XHTML.
pub fn prepare(
    toolchain: &Toolchain,
    source: &str,
    image_dir: Option<&str>,
) -> Result<(Metadata, String)> {
    let (data, markdown) = front_matter::split_percent_header(source);
    let markdown = images::strip_or_prefix(&markdown, image_dir);
    let xhtml = xhtml::pandoc(toolchain, &markdown)?;
    Ok((data, xhtml))
}

/// Runs the article or blog stylesheet over the XHTML, with the header entries as parameters.
pub fn transform(
    toolchain: &Toolchain,
    xhtml: &str,
    data: &Metadata,
    article: bool,
) -> Result<Vec<u8>> {
    let document = tools::scratch_file("md2xml-", ".xhtml", xhtml.as_bytes())?;
    xslt::transform(toolchain, stylesheet(article), document.path(), data)
}
