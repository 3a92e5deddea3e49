//! md2pdf - converts a Markdown file into a PDF document with xsltproc and htmldoc

use md2x::convert::{self, pdf};
use md2x::{cli, Stylesheet, Toolchain};
use std::path::{Path, PathBuf};
use structopt::clap::AppSettings;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "md2pdf",
    about = "Transforms a given Markdown file to PDF. Calls xsltproc, htmldoc and faketime, which must be installed.",
    setting = AppSettings::DisableVersion
)]
struct Arguments {
    #[structopt(short = "-v", long = "--version", help = "print version and exit")]
    version: bool,

    #[structopt(short = "-x", long = "--xhtml", help = "print the intermediate XHTML output and exit")]
    xhtml: bool,

    #[structopt(
        short = "-s",
        long = "--stylesheet",
        help = "print the stylesheet used for the transformation and exit"
    )]
    stylesheet: bool,

    #[structopt(short = "-t", long = "--html", help = "print the HTML given to htmldoc and exit")]
    html: bool,

    #[structopt(
        short = "-i",
        long = "--image-dir",
        help = "directory holding the images; they are looked up next to the Markdown file otherwise"
    )]
    image_dir: Option<PathBuf>,

    #[structopt(
        short = "-o",
        long = "--output-file",
        help = "the file to write; defaults to the input file with a .pdf extension"
    )]
    output_file: Option<PathBuf>,

    #[structopt(help = "the Markdown file to convert", name = "file.md")]
    file: Option<PathBuf>,
}

fn process_file(args: &Arguments) -> md2x::Result<()> {
    let input = args.file.as_deref().ok_or(md2x::Error::NoInput)?;
    let source = convert::read_source(input)?;
    let (data, xhtml) = pdf::prepare(&source, input, args.image_dir.as_deref())?;
    if args.xhtml {
        println!("{xhtml}");
        return Ok(());
    }

    let toolchain = Toolchain::from_env();
    let html = pdf::to_html(&toolchain, &xhtml, &data)?;
    if args.html {
        return cli::print_bytes(&html);
    }

    let output = convert::output_path(input, args.output_file.as_deref(), "pdf");
    let file_dir = input.parent().unwrap_or_else(|| Path::new(""));
    pdf::generate(
        &toolchain,
        &pdf::PdfLayout::default(),
        &html,
        &output,
        &data,
        file_dir,
    )
}

fn main() {
    let args: Arguments = cli::parse_args();
    cli::init_logging();

    if args.version {
        println!("{}", env!("CARGO_PKG_VERSION"));
        return;
    }
    if args.stylesheet {
        println!("{}", Stylesheet::Pdf.source());
        return;
    }

    cli::exit_with(process_file(&args));
}
