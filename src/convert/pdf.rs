//! Markdown to PDF: in-process XHTML, `xsltproc`, then `htmldoc` under `faketime`.

use crate::error::Result;
use crate::front_matter::{self, Metadata};
use crate::images;
use crate::tools::{self, Toolchain};
use crate::xhtml;
use crate::xslt::{self, Stylesheet};
use std::ffi::OsString;
use std::path::Path;

/// Page setup handed to htmldoc.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfLayout {
    pub size: String,
    pub top: String,
    pub bottom: String,
    pub left: String,
    pub right: String,
    pub body_font: String,
    pub font_size: u32,
    pub head_foot_font: String,
    pub head_foot_size: u32,
    pub link_color: String,
    pub link_style: String,
    pub permissions: String,
    pub charset: String,
    pub compression: u8,
    pub default_header: String,
    pub default_footer: String,
}

impl Default for PdfLayout {
    fn default() -> Self {
        Self {
            size: "A4".into(),
            top: "2cm".into(),
            bottom: "2cm".into(),
            left: "2cm".into(),
            right: "2cm".into(),
            body_font: "Times".into(),
            font_size: 12,
            head_foot_font: "Courier-Oblique".into(),
            head_foot_size: 10,
            link_color: "#0000A0".into(),
            link_style: "plain".into(),
            permissions: "no-modify".into(),
            charset: "iso-8859-1".into(),
            compression: 9,
            default_header: "...".into(),
            default_footer: "dt1".into(),
        }
    }
}

pub const DEFAULT_LANG: &str = "fr";

/// Locale exported to htmldoc for a document language.
pub fn locale(lang: &str) -> Option<&'static str> {
    match lang {
        "fr" => Some("fr_FR.UTF-8"),
        "en" => Some("en_US.UTF-8"),
        _ => None,
    }
}

/// Today's date the way faketime is given it: `YYYYMMDD`, local time.
pub fn today() -> String {
    chrono::Local::now().format("%Y%m%d").to_string()
}

/// Reads the YAML front matter, anchors the images and renders the XHTML.
pub fn prepare(source: &str, input: &Path, image_dir: Option<&Path>) -> Result<(Metadata, String)> {
    let (meta, markdown) = front_matter::split_yaml_header(source)?;
    let markdown = match image_dir {
        Some(dir) => images::into_directory(markdown, dir)?,
        None => images::relative_to_file(markdown, input)?,
    };
    Ok((meta.to_metadata(), xhtml::render(&markdown)))
}

/// Applies the PDF stylesheet, yielding the HTML htmldoc will lay out.
pub fn to_html(toolchain: &Toolchain, xhtml: &str, data: &Metadata) -> Result<Vec<u8>> {
    let document = tools::scratch_file("md2pdf-", ".xhtml", xhtml.as_bytes())?;
    xslt::transform(toolchain, Stylesheet::Pdf, document.path(), data)
}

/// Arguments of htmldoc, up to and including the input file.
///
/// `data` must already carry its defaults; a relative `logo` is resolved
/// against `file_dir`.
pub fn htmldoc_args(
    layout: &PdfLayout,
    data: &Metadata,
    output: &Path,
    html: &Path,
    file_dir: &Path,
) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec!["--outfile".into(), output.into()];
    let options = [
        ("--size", layout.size.clone()),
        ("--top", layout.top.clone()),
        ("--bottom", layout.bottom.clone()),
        ("--left", layout.left.clone()),
        ("--right", layout.right.clone()),
        ("--bodyfont", layout.body_font.clone()),
        ("--fontsize", layout.font_size.to_string()),
        ("--headfootfont", layout.head_foot_font.clone()),
        ("--headfootsize", layout.head_foot_size.to_string()),
        ("--linkcolor", layout.link_color.clone()),
        ("--linkstyle", layout.link_style.clone()),
        ("--permissions", layout.permissions.clone()),
        ("--charset", layout.charset.clone()),
    ];
    for (flag, value) in options {
        args.push(flag.into());
        args.push(value.into());
    }
    args.push("--no-title".into());
    args.push("--no-toc".into());
    args.push(format!("--compression={}", layout.compression).into());
    args.push("--embedfonts".into());
    args.push("--webpage".into());

    args.push("--header".into());
    args.push(data.get("header").unwrap_or(layout.default_header.as_str()).into());
    args.push("--footer".into());
    args.push(data.get("footer").unwrap_or(layout.default_footer.as_str()).into());

    if let Some(logo) = data.get("logo") {
        let logo = Path::new(logo);
        let logo = if logo.is_absolute() {
            logo.to_path_buf()
        } else {
            file_dir.join(logo)
        };
        args.push("--logoimage".into());
        args.push(logo.into());
    }

    args.push(html.into());
    args
}

/// Lays `html` out as a PDF at `output`, with the clock set to the document date.
pub fn generate(
    toolchain: &Toolchain,
    layout: &PdfLayout,
    html: &[u8],
    output: &Path,
    data: &Metadata,
    file_dir: &Path,
) -> Result<()> {
    let mut data = data.clone();
    data.set_default("date", today());
    data.set_default("lang", DEFAULT_LANG);

    let page = tools::scratch_file("md2pdf-", ".html", html)?;
    let htmldoc = tools::locate(&toolchain.htmldoc)?;

    let mut command = tools::command(&toolchain.faketime)?;
    command
        .arg(data.get("date").unwrap_or_default())
        .arg(htmldoc)
        .args(htmldoc_args(layout, &data, output, page.path(), file_dir));

    let lang = data.get("lang").unwrap_or(DEFAULT_LANG);
    match locale(lang) {
        Some(locale) => {
            command.env("LANG", locale).env("LC_ALL", locale);
        }
        None => tracing::warn!(lang, "no locale known for language, keeping the environment"),
    }

    tools::run(&mut command)?;
    tracing::info!(output = %output.display(), "PDF written");
    Ok(())
}
