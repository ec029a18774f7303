//! Command-line interface for gfa-align.
//!
//! ## Usage
//!
//! ```text
//! # Print every link and containment alignment
//! gfa-align assembly.gfa
//!
//! # Gzipped input, wider rows
//! gfa-align assembly.gfa.gz --width 200
//!
//! # JSON output for scripting
//! gfa-align assembly.gfa --format json
//!
//! # Skip relationships that fail instead of stopping at the first
//! gfa-align assembly.gfa --keep-going
//! ```

use std::path::PathBuf;

use clap::Parser;

use crate::graph::relationship::OrientationMode;

pub mod align;

/// Default column width for text output
pub const DEFAULT_WIDTH: u32 = 120;

#[derive(Parser)]
#[command(name = "gfa-align")]
#[command(version)]
#[command(about = "Reconstruct base-level alignments from GFA links and containments")]
#[command(
    long_about = "gfa-align reads a GFA file and rebuilds the pairwise alignment described by the CIGAR of every link and containment.\n\nFor each relationship it prints both aligned rows, wrapped at a fixed width, followed by match, mismatch and gap counts and the identity of the aligned region."
)]
pub struct Cli {
    /// Input GFA file (plain, or gzip compressed with a .gz/.bgz extension)
    #[arg(required = true)]
    pub input: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,

    /// Column width for wrapping alignment rows in text output
    #[arg(short, long, default_value_t = DEFAULT_WIDTH, value_parser = clap::value_parser!(u32).range(1..))]
    pub width: u32,

    /// How link/containment orientations are applied to the two segments
    #[arg(long, value_enum, default_value = "independent")]
    pub orientation_mode: OrientationMode,

    /// Log and skip relationships that cannot be reconstructed
    #[arg(long)]
    pub keep_going: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}
