//! Plumbing shared by the three binaries: argument parsing, logging and exit codes.

use std::io::Write;
use std::process;
use structopt::clap::{self, AppSettings, ErrorKind};
use structopt::StructOpt;
use tracing_subscriber::EnvFilter;

/// Parses the command line, exiting the way the converters always have:
/// no arguments prints the help and fails, `-h` succeeds, usage errors fail.
/// Everything is printed to stdout.
pub fn parse_args<T: StructOpt>() -> T {
    parse_args_from(std::env::args_os().collect())
}

fn parse_args_from<T: StructOpt>(args: Vec<std::ffi::OsString>) -> T {
    if args.len() < 2 {
        let mut stdout = std::io::stdout();
        let _ = T::clap().write_help(&mut stdout);
        let _ = writeln!(stdout);
        process::exit(1);
    }

    match try_parse(args) {
        Ok(arguments) => arguments,
        Err(e) => {
            println!("{}", e.message);
            match e.kind {
                ErrorKind::HelpDisplayed | ErrorKind::VersionDisplayed => process::exit(0),
                _ => process::exit(1),
            }
        }
    }
}

/// Parses `args` without colouring messages, since they end up on stdout.
fn try_parse<T: StructOpt>(args: Vec<std::ffi::OsString>) -> Result<T, clap::Error> {
    let matches = T::clap()
        .setting(AppSettings::ColorNever)
        .get_matches_from_safe(args)?;
    Ok(T::from_clap(&matches))
}

/// Logs go to stderr so stdout stays free for converter output.
/// `RUST_LOG` picks the level; warnings only by default.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Writes raw converter output (which may not be UTF-8) to stdout, followed by a newline.
pub fn print_bytes(bytes: &[u8]) -> crate::Result<()> {
    let mut stdout = std::io::stdout().lock();
    let mut write = || -> std::io::Result<()> {
        stdout.write_all(bytes)?;
        if !bytes.ends_with(b"\n") {
            stdout.write_all(b"\n")?;
        }
        stdout.flush()
    };
    write().map_err(crate::Error::Stdout)
}

/// Ends the process: 0 on success, otherwise the error on stdout and 1.
///
/// Called once the pipeline has returned, so its temporary files are gone.
pub fn exit_with(result: crate::Result<()>) -> ! {
    match result {
        Ok(()) => process::exit(0),
        Err(e) => {
            tracing::debug!(error = ?e, "conversion failed");
            println!("Error: {e}");
            process::exit(1);
        }
    }
}
