//! Encoder regression harness command line tool
//!
//! Runs one or two LAME-compatible encoders over every option line of an
//! options file and diffs their outputs.

use clap::error::ErrorKind;
use clap::Parser;
use lametest::config::RunConfig;
use lametest::error::HarnessError;
use lametest::precheck::check_preconditions;
use std::io;
use std::process;

/// Command line arguments
#[derive(Debug, Parser)]
#[command(name = "lametest", version, about)]
struct Args {
    /// Convert mp3's to wav's before comparison
    #[arg(short = 'w')]
    decode: bool,

    /// Generate reference solutions using lame1
    #[arg(short = 'm')]
    make_reference: bool,

    /// Show debug logging
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,

    /// options_file input.wav lame1 [lame2]
    #[arg(value_name = "FILES")]
    files: Vec<String>,
}

/// Print usage information (one block per run mode)
fn print_usage() {
    println!("Usage:");
    println!();
    println!("Mode 1. Compare output of 'lame1' and 'lame2':");
    println!("lametest [options] options_file input.wav lame1 lame2");
    println!();
    println!("Mode 2. Compare output of lame1 with reference solutions:");
    println!("lametest [options] options_file input.wav lame1");
    println!();
    println!("Mode 3. Generate reference solutions using lame1:");
    println!("lametest -m options_file input.wav lame1");
    println!();
    println!("options:");
    println!("   -w   convert mp3's to wav's before comparison");
    println!("   -v   show debug logging");
}

/// Report an error that stops the run.
///
/// Usage and precondition errors are an ordinary exit after the usage text;
/// only a failure during the test loop exits with status 1.
fn fail(err: &HarnessError) -> ! {
    println!("{}", err);
    println!();
    if err.shows_usage() {
        print_usage();
        process::exit(0);
    }
    process::exit(1);
}

fn main() {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(err) => {
            println!("ERROR: {}", err.kind());
            println!();
            print_usage();
            process::exit(0);
        }
    };

    env_logger::Builder::from_default_env()
        .filter_level(if args.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Warn
        })
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(false)
        .init();

    if args.make_reference {
        println!();
        println!("Generating reference output");
    }

    let config = match RunConfig::resolve(args.decode, args.make_reference, &args.files) {
        Ok(config) => config,
        Err(err) => fail(&err),
    };

    let encoders = match check_preconditions(&config) {
        Ok(encoders) => encoders,
        Err(err) => fail(&err),
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if let Err(err) = lametest::run(&config, &encoders, &mut out) {
        drop(out);
        fail(&err);
    }
}
