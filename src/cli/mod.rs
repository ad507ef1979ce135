//! CLI interface for Chordpad

use chordpad::chords::Side;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Call-and-response chord pad for ear training
#[derive(Parser)]
#[command(name = "chordpad")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Open the interactive pad
    Play {
        /// Configuration file path (defaults are used when omitted)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Play one chord, hold it, then let it ring out
    Audition {
        /// Button number (1-8)
        #[arg(short, long)]
        button: u32,

        /// Which half of the button
        #[arg(short, long, value_enum, default_value = "call")]
        side: Side,

        /// Seconds to hold before releasing
        #[arg(long, default_value = "2.0", value_parser = parse_hold)]
        hold: f64,

        /// Configuration file path (defaults are used when omitted)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// List available audio output devices
    Devices,

    /// Validate a configuration file
    Check {
        /// Configuration file path
        #[arg(short, long, default_value = "chordpad.yaml")]
        config: PathBuf,
    },

    /// Generate an example configuration file
    Init,
}

/// Hold times must be usable as a sleep duration
fn parse_hold(s: &str) -> Result<f64, String> {
    let secs: f64 = s.parse().map_err(|e| format!("{}", e))?;
    if !secs.is_finite() || secs < 0.0 {
        return Err(format!("'{}' is not a finite, non-negative number of seconds", s));
    }
    Ok(secs)
}
