//! Markdown to EPUB through pandoc.

use crate::error::Result;
use crate::front_matter;
use crate::images;
use crate::tools::{self, Toolchain};
use std::path::Path;

/// Moves the `%` header into a pandoc title block and rewrites image paths.
pub fn prepare(source: &str, image_dir: Option<&str>) -> String {
    let (data, markdown) = front_matter::split_percent_header(source);
    let markdown = images::strip_or_prefix(&markdown, image_dir);
    data.to_yaml_header() + &markdown
}

/// Runs `pandoc -f markdown -t epub -o <output>` on the prepared Markdown.
pub fn generate(toolchain: &Toolchain, markdown: &str, output: &Path) -> Result<()> {
    let source = tools::scratch_file("md2epub-", ".md", markdown.as_bytes())?;

    let mut command = tools::command(&toolchain.pandoc)?;
    command
        .args(["-f", "markdown", "-t", "epub", "-o"])
        .arg(output)
        .arg(source.path());
    tools::run(&mut command)?;

    tracing::info!(output = %output.display(), "EPUB written");
    Ok(())
}
