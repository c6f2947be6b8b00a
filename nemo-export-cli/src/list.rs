//! List subcommand - registry overview with export state.

use eyre::{Context, Result};
use nemo_export::{paths, registry};

pub fn execute() -> Result<()> {
    let models_dir = paths::models_dir().wrap_err("failed to resolve models directory")?;

    for variant in registry::VARIANTS {
        let dir = models_dir.join(variant.id);
        let state = if variant.is_exported(&dir) {
            "exported"
        } else {
            "not exported"
        };

        println!("{} ({}) [{}]", variant.id, variant.display_name, state);
        println!(
            "    checkpoint: {}/{}",
            variant.checkpoint_repo, variant.checkpoint_file
        );
        println!("    graph:      {}/{}", variant.graph_repo, variant.graph_file);
        println!("    output:     {}", dir.display());
    }

    Ok(())
}
