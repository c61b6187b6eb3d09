//! Still-capture front end for rpicam-still.

use std::path::PathBuf;

use clap::Parser;
use rpicam_tools::{ChainResult, ChainRunner, CommandSpec, SystemLauncher};

const RPICAM_STILL: &str = "rpicam-still";

/// Capture a still image using rpicam-still.
#[derive(Parser)]
struct Args {
    /// Output image path.
    #[arg(short, long, default_value = "capture.jpg")]
    output: PathBuf,

    /// Capture width.
    #[arg(long, default_value_t = 2028)]
    width: u32,

    /// Capture height.
    #[arg(long, default_value_t = 1520)]
    height: u32,

    /// JPEG quality (1-100).
    #[arg(long, default_value_t = 90, value_parser = clap::value_parser!(u8).range(1..=100))]
    quality: u8,

    /// Preview time before capture (ms).
    #[arg(long, default_value_t = 1000)]
    timeout: u32,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    match run(&args) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
    }
}

fn run(args: &Args) -> rpicam_tools::Result<i32> {
    let mut runner = ChainRunner::new(SystemLauncher::new());
    runner.require_executable(RPICAM_STILL)?;
    runner.install_interrupt_handler()?;

    let cmd = CommandSpec::new(RPICAM_STILL)
        .with_arg("-o")
        .with_arg(args.output.display().to_string())
        .with_arg("--width")
        .with_arg(args.width.to_string())
        .with_arg("--height")
        .with_arg(args.height.to_string())
        .with_arg("--quality")
        .with_arg(args.quality.to_string())
        .with_arg("-t")
        .with_arg(args.timeout.to_string());

    println!("Capturing: {cmd}");
    match runner.run(&cmd)? {
        ChainResult::Completed(code) => Ok(code),
        ChainResult::Interrupted => {
            println!("Stopped by user.");
            Ok(0)
        }
    }
}
