//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand};
use eyre::Result;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "nemo-export")]
#[command(about = "Convert NeMo CTC checkpoints into sherpa-onnx model directories")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Export a model variant into the app models directory
    Export(ExportArgs),

    /// Print the metadata entries of an exported graph
    Inspect {
        /// Path to a model.onnx file
        path: PathBuf,
    },

    /// List known model variants and their export state
    List,
}

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Model variant to export
    #[arg(short, long, default_value = "nemo-conformer-ca")]
    pub model: String,

    /// Output directory (default: platform models directory)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Use a local .nemo checkpoint instead of downloading
    #[arg(long)]
    pub checkpoint: Option<PathBuf>,

    /// Use a local directory holding the exported graph files
    #[arg(long)]
    pub graph_dir: Option<PathBuf>,

    /// Resolve hub files from the local cache only
    #[arg(long)]
    pub offline: bool,

    /// Re-export even if the output files already exist
    #[arg(long)]
    pub force: bool,

    /// Load the patched graph with ONNX Runtime afterwards
    #[arg(long)]
    pub verify: bool,
}

/// Execute CLI command - separated for testing.
pub fn run_cli(cli: Cli) -> Result<()> {
    tracing::debug!(?cli, "parsed arguments");

    match cli.command {
        Commands::Export(args) => crate::export_cmd::execute(args),
        Commands::Inspect { path } => crate::inspect::execute(path),
        Commands::List => crate::list::execute(),
    }
}
