//! Export subcommand - run the conversion pipeline.

use eyre::{Context, OptionExt, Result};
use nemo_export::export::Exporter;
use nemo_export::source::ArtifactSource;
use nemo_export::{paths, registry};
use std::path::PathBuf;

use crate::cli::ExportArgs;

pub fn execute(args: ExportArgs) -> Result<()> {
    let variant = registry::find(&args.model)
        .ok_or_eyre(format!("unknown model variant: {}", args.model))?;

    let output_dir = match args.output_dir {
        Some(dir) => dir,
        None => paths::models_dir()
            .wrap_err("failed to resolve models directory")?
            .join(variant.id),
    };

    let checkpoint_source = resolve_source(
        args.checkpoint,
        variant.checkpoint_repo,
        args.offline,
        "checkpoint",
    )?;
    let graph_source = resolve_source(args.graph_dir, variant.graph_repo, args.offline, "graph")?;

    let exporter = Exporter {
        variant,
        checkpoint_source,
        graph_source,
        output_dir,
        force: args.force,
        verify: args.verify,
    };

    let report = exporter.run().wrap_err("export failed")?;
    print!("{report}");

    Ok(())
}

/// Pick the artifact source for one repository: a local path wins, then
/// the cache when offline, then the hub API.
fn resolve_source(
    local: Option<PathBuf>,
    repo_id: &str,
    offline: bool,
    what: &str,
) -> Result<ArtifactSource> {
    match local {
        Some(path) => Ok(ArtifactSource::Path(path)),
        None if offline => Ok(ArtifactSource::cache(repo_id)),
        None => ArtifactSource::api(repo_id)
            .wrap_err_with(|| format!("failed to initialize hub client for the {what}")),
    }
}
