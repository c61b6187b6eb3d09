//! Piped preview: rpicam-vid streaming H.264 into mpv.

use rpicam_tools::{ChainResult, ChainRunner, CommandSpec, SystemLauncher};

const RPICAM_VID: &str = "rpicam-vid";
const MPV: &str = "mpv";

fn main() {
    env_logger::init();

    match run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
    }
}

fn run() -> rpicam_tools::Result<i32> {
    let mut runner = ChainRunner::new(SystemLauncher::new());
    runner.require_executable(RPICAM_VID)?;
    runner.require_executable(MPV)?;
    runner.install_interrupt_handler()?;

    let camera = CommandSpec::new(RPICAM_VID).with_args([
        "-t", "0", "--width", "1280", "--height", "720", "--codec", "h264", "--inline", "-o", "-",
    ]);
    let player = CommandSpec::new(MPV).with_args(["--no-cache", "--untimed", "-"]);

    println!("Previewing: {camera} | {player}");
    match runner.run_chain(&camera, &player)? {
        ChainResult::Completed(code) => Ok(code),
        ChainResult::Interrupted => {
            println!("Stopped by user.");
            Ok(0)
        }
    }
}
