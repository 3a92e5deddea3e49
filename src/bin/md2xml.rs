//! md2xml - converts a Markdown file into a blog entry or an article in XML

use md2x::convert::{self, xml};
use md2x::{cli, Toolchain};
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "md2xml",
    about = "Transforms a given Markdown file into XML. Calls pandoc and xsltproc, which must be installed."
)]
struct Arguments {
    #[structopt(short = "-x", long = "--xhtml", help = "print the intermediate XHTML output")]
    xhtml: bool,

    #[structopt(
        short = "-s",
        long = "--stylesheet",
        help = "print the stylesheet used for the transformation and exit"
    )]
    stylesheet: bool,

    #[structopt(short = "-a", long = "--article", help = "output an article instead of a blog entry")]
    article: bool,

    #[structopt(
        short = "-i",
        long = "--image-dir",
        help = "directory holding the images; image paths are reduced to their file names otherwise"
    )]
    image_dir: Option<String>,

    #[structopt(
        short = "-o",
        long = "--output-file",
        help = "the file to write; the XML is printed otherwise"
    )]
    output_file: Option<PathBuf>,

    #[structopt(help = "the Markdown file to convert", name = "file.md")]
    file: Option<PathBuf>,
}

fn process_file(args: &Arguments) -> md2x::Result<()> {
    let input = args.file.as_deref().ok_or(md2x::Error::NoInput)?;
    let toolchain = Toolchain::from_env();

    let source = convert::read_source(input)?;
    let (data, xhtml) = xml::prepare(&toolchain, &source, args.image_dir.as_deref())?;
    if args.xhtml {
        println!("{xhtml}");
    }

    let result = xml::transform(&toolchain, &xhtml, &data, args.article)?;
    match &args.output_file {
        Some(output) => convert::write_output(output, &result),
        None => cli::print_bytes(&result),
    }
}

fn main() {
    let args: Arguments = cli::parse_args();
    cli::init_logging();

    if args.stylesheet {
        println!("{}", xml::stylesheet(args.article).source());
        return;
    }

    cli::exit_with(process_file(&args));
}
