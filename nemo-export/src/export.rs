//! The export pipeline: checkpoint in, sherpa-onnx model directory out.

use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::checkpoint;
use crate::error::{Error, VocabError};
use crate::graph;
use crate::onnx;
use crate::paths;
use crate::registry::{GRAPH_DATA_FILE, GRAPH_FILE, ModelVariant, TOKENS_FILE};
use crate::source::ArtifactSource;
use crate::vocab::Vocabulary;

/// One export run, fully parameterized up front.
///
/// The run is a strict linear sequence; any stage failure aborts it.
/// There is no rollback; a failed run may leave a partial output
/// directory behind, and the next run overwrites it.
#[derive(Debug)]
pub struct Exporter {
    pub variant: &'static ModelVariant,
    pub checkpoint_source: ArtifactSource,
    pub graph_source: ArtifactSource,
    pub output_dir: PathBuf,
    /// Re-export even when the output files already exist.
    pub force: bool,
    /// Load the patched graph with ONNX Runtime afterwards.
    pub verify: bool,
}

/// Files confirmed on disk after a run.
#[derive(Debug)]
pub struct ExportReport {
    pub output_dir: PathBuf,
    pub files: Vec<PathBuf>,
    /// The run was skipped because the variant was already exported.
    pub skipped: bool,
}

impl Exporter {
    pub fn run(&self) -> Result<ExportReport, Error> {
        paths::ensure_dir(&self.output_dir)?;

        if !self.force && self.variant.is_exported(&self.output_dir) {
            tracing::info!(
                dir = %self.output_dir.display(),
                "already exported, skipping (use force to re-export)"
            );
            return Ok(self.report(true));
        }

        tracing::info!(
            repo = self.variant.checkpoint_repo,
            file = self.variant.checkpoint_file,
            "resolving checkpoint"
        );
        let ckpt_path = self.checkpoint_source.resolve(self.variant.checkpoint_file)?;
        tracing::info!(path = %ckpt_path.display(), "checkpoint resolved");

        let ckpt = checkpoint::open(&ckpt_path)?;
        let vocab = Vocabulary::from_checkpoint(&ckpt)?;

        let tokens_path = self.output_dir.join(TOKENS_FILE);
        tracing::info!(
            tokens = vocab.len(),
            path = %tokens_path.display(),
            "writing vocabulary"
        );
        write_tokens_file(&vocab, &tokens_path)?;

        let artifact = graph::materialize(&self.graph_source, self.variant, &self.output_dir)?;

        let metadata = graph::sherpa_metadata(self.variant, &vocab, &ckpt);
        tracing::info!(
            vocab_size = vocab.size_with_blank(),
            "patching graph metadata"
        );
        onnx::append_metadata(&artifact.graph_path, &metadata)?;

        if self.verify {
            graph::verify(&artifact.graph_path)?;
            tracing::info!("graph verified");
        }

        Ok(self.report(false))
    }

    fn report(&self, skipped: bool) -> ExportReport {
        let files = [TOKENS_FILE, GRAPH_FILE, GRAPH_DATA_FILE]
            .iter()
            .map(|name| self.output_dir.join(name))
            .filter(|path| path.exists())
            .collect();

        ExportReport {
            output_dir: self.output_dir.clone(),
            files,
            skipped,
        }
    }
}

fn write_tokens_file(vocab: &Vocabulary, path: &Path) -> Result<(), VocabError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    vocab.write_tokens(&mut writer)?;
    writer.flush()?;
    Ok(())
}

impl fmt::Display for ExportReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.skipped {
            writeln!(
                f,
                "Already exported: {} (use --force to re-export)",
                self.output_dir.display()
            )?;
        } else {
            writeln!(f, "Done! Files written to: {}", self.output_dir.display())?;
        }
        for file in &self.files {
            if let Some(name) = file.file_name() {
                writeln!(f, "  - {}", name.to_string_lossy())?;
            }
        }
        Ok(())
    }
}
