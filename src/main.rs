use anyhow::{Context, Result};
use clap::Parser;
use doublons::fingerprint::{FrameSampler, PerceptualFingerprinter};
use doublons::prompt::TerminalPrompt;
use doublons::session::{Session, SessionOutcome};
use log::{LevelFilter, info};
use std::io;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "doublons",
    version,
    about = "Find and remove duplicate photos and videos"
)]
struct Cli {
    /// Directory to scan, subdirectories included
    #[arg(value_name = "DIR", default_value = ".", env = "DOUBLONS_DIR")]
    path: PathBuf,

    /// ffmpeg binary used to grab video frames
    #[arg(long, value_name = "BIN", default_value = "ffmpeg", env = "DOUBLONS_FFMPEG")]
    ffmpeg: PathBuf,

    /// ffprobe binary used to read video durations
    #[arg(long, value_name = "BIN", default_value = "ffprobe", env = "DOUBLONS_FFPROBE")]
    ffprobe: PathBuf,

    /// More log output (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    println!("▶ Scanning for duplicates in: {}", cli.path.display());
    let fingerprinter = PerceptualFingerprinter::new(FrameSampler::new(cli.ffmpeg, cli.ffprobe));
    let outcome = Session::new(&cli.path, &fingerprinter, TerminalPrompt::new(), io::stdout().lock())
        .run()
        .with_context(|| format!("Duplicate session failed in {}", cli.path.display()))?;

    match outcome {
        SessionOutcome::Removed(report) if !report.failed.is_empty() => {
            anyhow::bail!("{} duplicates could not be deleted", report.failed.len())
        }
        outcome => info!("Session ended: {:?}", outcome),
    }
    Ok(())
}

fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}
