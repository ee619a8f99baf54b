//! mp3fan - inspector for MP3 files
//!
//! Reports the tags, frame headers and frame size statistics of an MP3 file.
//!
//! # Usage
//!
//! ```bash
//! # Show the tags and the first and last frames
//! mp3fan info song.mp3
//!
//! # Count tags and frames by their length in bytes
//! mp3fan summary song.mp3
//!
//! # Show the 100th frame
//! mp3fan frame song.mp3 100
//! ```

use std::{
    fs,
    path::{Path, PathBuf},
    process::ExitCode,
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use mp3fan::avec::{self, Mpeg};

mod print;

#[derive(Parser)]
#[command(name = "mp3fan")]
#[command(about = "Inspect the tags, frames and frame sizes of MP3 files", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display the tags and the first and last frames of an MP3 file
    Info {
        /// Path to the MP3 file
        file: PathBuf,
    },

    /// Display a summary of the byte lengths of tags and frames in an MP3 file
    Summary {
        /// Path to the MP3 file
        file: PathBuf,
    },

    /// Display the frame at a position in an MP3 file
    Frame {
        /// Path to the MP3 file
        file: PathBuf,

        /// Number of the frame, counting from 1
        #[arg(allow_negative_numbers = true)]
        frame_number: i64,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.debug {
        "debug"
    } else if cli.verbose {
        "info"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Info { file } => {
            let data = read(&file)?;
            let info = avec::info(&Mpeg, &data);

            print::heading("Tags");
            if info.tags.is_empty() {
                println!("not exist");
            } else {
                println!("{:#?}\n", info.tags);
            }

            print::frame(info.first_frame.as_ref(), "First Frame");
            print::frame(info.last_frame.as_ref(), "Last Frame");
        }

        Commands::Summary { file } => {
            let data = read(&file)?;
            let summary = avec::summary(&Mpeg, &data)
                .with_context(|| format!("Failed to traverse '{}'", file.display()))?;

            println!("File size: {} byte\n", print::grouped(data.len()));

            print::summary("Tag", &summary.tags);
            if let Some(frames) = &summary.frames {
                print::summary("Frame", frames);
            }
        }

        Commands::Frame { file, frame_number } => {
            // Reject bad input before touching the file.
            if frame_number < 1 {
                Err(avec::Error::InvalidFrameNumber(frame_number))?;
            }

            let data = read(&file)?;
            let frame = avec::frame(&Mpeg, &data, frame_number)
                .with_context(|| format!("Failed to traverse '{}'", file.display()))?;

            match frame {
                Some(frame) => print::frame(Some(&frame), &format!("Frame {frame_number}")),
                None => println!("Frame number {frame_number} not found in the file."),
            }
        }
    }

    Ok(())
}

fn read(path: &Path) -> Result<Vec<u8>> {
    let data = fs::read(path).with_context(|| format!("Failed to read '{}'", path.display()))?;
    info!(path = %path.display(), bytes = data.len(), "read file");
    Ok(data)
}
