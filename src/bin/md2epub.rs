//! md2epub - converts a Markdown file into an EPUB book with pandoc

use md2x::convert::{self, epub};
use md2x::{cli, Toolchain};
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "md2epub",
    about = "Transforms a given Markdown file into EPUB. Calls pandoc, which must be installed."
)]
struct Arguments {
    #[structopt(
        short = "-i",
        long = "--image-dir",
        help = "directory holding the images; image paths are reduced to their file names otherwise"
    )]
    image_dir: Option<String>,

    #[structopt(
        short = "-o",
        long = "--output-file",
        help = "the file to write; defaults to the input file with an .epub extension"
    )]
    output_file: Option<PathBuf>,

    #[structopt(help = "the Markdown file to convert", name = "file.md")]
    file: Option<PathBuf>,
}

fn process_file(args: &Arguments) -> md2x::Result<()> {
    let input = args.file.as_deref().ok_or(md2x::Error::NoInput)?;
    let source = convert::read_source(input)?;
    let markdown = epub::prepare(&source, args.image_dir.as_deref());
    let output = convert::output_path(input, args.output_file.as_deref(), "epub");
    epub::generate(&Toolchain::from_env(), &markdown, &output)
}

fn main() {
    let args: Arguments = cli::parse_args();
    cli::init_logging();
    cli::exit_with(process_file(&args));
}
