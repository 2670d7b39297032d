//! CLI interface for chipwave

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Procedural chiptune music and sound effect generator
#[derive(Parser)]
#[command(name = "chipwave")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path (defaults are used if it does not exist)
    #[arg(short, long, global = true, default_value = "chipwave.yaml")]
    pub config: PathBuf,

    /// Log per-channel detail
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render compositions to WAV files
    Render {
        /// Built-in compositions to render (all of them if none are given)
        names: Vec<String>,

        /// Only the built-in themes
        #[arg(long, conflicts_with_all = ["effects", "names", "score"])]
        themes: bool,

        /// Only the built-in sound effects
        #[arg(long, conflicts_with_all = ["names", "score"])]
        effects: bool,

        /// Render a composition from a YAML score file instead
        #[arg(short, long)]
        score: Vec<PathBuf>,

        /// Output directory (overrides the config)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List the built-in compositions
    List,

    /// Print a built-in composition as a YAML score
    Show {
        /// Composition id
        name: String,
    },

    /// Validate a configuration file
    Check,

    /// Generate an example configuration file
    Init,
}
