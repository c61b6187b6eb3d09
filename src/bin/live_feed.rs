//! Live-preview front end for rpicam-vid.

use clap::Parser;
use rpicam_tools::{ChainResult, ChainRunner, CommandSpec, SystemLauncher};

const RPICAM_VID: &str = "rpicam-vid";

/// Open a live camera preview using rpicam-vid.
#[derive(Parser)]
struct Args {
    /// Preview width.
    #[arg(long, default_value_t = 1280)]
    width: u32,

    /// Preview height.
    #[arg(long, default_value_t = 720)]
    height: u32,

    /// Framerate.
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Duration in ms (0 = infinite).
    #[arg(long, default_value_t = 0)]
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
    runner.require_executable(RPICAM_VID)?;
    runner.install_interrupt_handler()?;

    let cmd = CommandSpec::new(RPICAM_VID)
        .with_arg("-t")
        .with_arg(args.timeout.to_string())
        .with_arg("--width")
        .with_arg(args.width.to_string())
        .with_arg("--height")
        .with_arg(args.height.to_string())
        .with_arg("--framerate")
        .with_arg(args.fps.to_string());

    println!("Launching: {cmd}");
    match runner.run(&cmd)? {
        ChainResult::Completed(code) => Ok(code),
        ChainResult::Interrupted => {
            println!("Stopped by user.");
            Ok(0)
        }
    }
}
