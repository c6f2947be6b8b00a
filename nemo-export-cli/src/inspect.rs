//! Inspect subcommand - print the metadata entries of an exported graph.

use eyre::{Context, Result};
use nemo_export::onnx;
use std::path::PathBuf;

pub fn execute(path: PathBuf) -> Result<()> {
    let entries = onnx::read_metadata(&path)
        .wrap_err_with(|| format!("failed to read metadata from {}", path.display()))?;

    if entries.is_empty() {
        println!("no metadata entries");
        return Ok(());
    }

    for (key, value) in entries {
        println!("{key}={value}");
    }

    Ok(())
}
