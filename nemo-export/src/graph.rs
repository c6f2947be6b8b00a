//! Graph artifact materialization and inference-engine metadata.

use std::fs;
use std::path::{Path, PathBuf};

use crate::checkpoint::Checkpoint;
use crate::error::{Error, GraphError};
use crate::registry::{GRAPH_DATA_FILE, GRAPH_FILE, ModelVariant};
use crate::source::ArtifactSource;
use crate::vocab::Vocabulary;

/// Metadata format version declared to the inference engine.
const METADATA_VERSION: &str = "1";

/// The graph files present in the output directory after materialization.
#[derive(Debug)]
pub struct GraphArtifact {
    pub graph_path: PathBuf,
    /// External-tensor side file; not every distribution carries one.
    pub data_path: Option<PathBuf>,
}

/// The five metadata entries the inference engine requires on the graph.
///
/// `vocab_size` counts the appended blank entry, never the raw
/// vocabulary size.
pub fn sherpa_metadata(
    variant: &ModelVariant,
    vocab: &Vocabulary,
    ckpt: &Checkpoint,
) -> Vec<(String, String)> {
    vec![
        ("vocab_size".to_string(), vocab.size_with_blank().to_string()),
        (
            "normalize_type".to_string(),
            ckpt.config.normalize_type().to_string(),
        ),
        (
            "subsampling_factor".to_string(),
            ckpt.config.subsampling_factor().to_string(),
        ),
        ("model_type".to_string(), variant.model_type.to_string()),
        ("version".to_string(), METADATA_VERSION.to_string()),
    ]
}

/// Copy the serialized graph, and its side file when present, into
/// the output directory, overwriting prior copies.
pub fn materialize(
    source: &ArtifactSource,
    variant: &ModelVariant,
    output_dir: &Path,
) -> Result<GraphArtifact, Error> {
    let src = source.resolve(variant.graph_file)?;
    let graph_path = output_dir.join(GRAPH_FILE);
    copy_into_place(&src, &graph_path)?;
    tracing::info!(path = %graph_path.display(), "graph materialized");

    let data_path = match source.resolve_optional(variant.graph_data_file) {
        Some(src) => {
            let dest = output_dir.join(GRAPH_DATA_FILE);
            copy_into_place(&src, &dest)?;
            tracing::info!(path = %dest.display(), "external tensor data materialized");
            Some(dest)
        }
        None => {
            tracing::debug!(
                file = variant.graph_data_file,
                "no external tensor data in distribution"
            );
            None
        }
    };

    Ok(GraphArtifact {
        graph_path,
        data_path,
    })
}

fn copy_into_place(src: &Path, dest: &Path) -> Result<(), GraphError> {
    // The source may already be the destination when exporting from a
    // local graph directory that is also the output directory.
    if src == dest {
        return Ok(());
    }
    fs::copy(src, dest)?;
    Ok(())
}

/// Load the patched graph as an ONNX Runtime session to confirm the
/// runtime still accepts it.
pub fn verify(graph_path: &Path) -> Result<(), GraphError> {
    let session = ort::session::Session::builder()?.commit_from_file(graph_path)?;
    tracing::debug!(
        inputs = session.inputs().len(),
        outputs = session.outputs().len(),
        "graph loads as a session"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkpoint::{Checkpoint, ModelConfig};
    use crate::registry;

    fn catalan_variant() -> &'static ModelVariant {
        registry::find("nemo-conformer-ca").expect("registry entry should exist")
    }

    #[test]
    fn metadata_counts_the_blank_entry() {
        let ckpt = Checkpoint {
            config: ModelConfig::default(),
            tokenizer_vocab: None,
        };
        let vocab = Vocabulary::Subword(vec!["a".into(), "b".into(), "c".into()]);

        let metadata = sherpa_metadata(catalan_variant(), &vocab, &ckpt);

        assert_eq!(metadata[0], ("vocab_size".to_string(), "4".to_string()));
        assert_eq!(metadata[1], ("normalize_type".to_string(), String::new()));
        assert_eq!(
            metadata[2],
            ("subsampling_factor".to_string(), "4".to_string())
        );
        assert_eq!(
            metadata[3],
            ("model_type".to_string(), "EncDecCTCModelBPE".to_string())
        );
        assert_eq!(metadata[4], ("version".to_string(), "1".to_string()));
    }

    #[test]
    fn materialize_overwrites_and_tolerates_missing_side_file() {
        let tmp = tempfile::tempdir().expect("failed to create temp dir");
        let dist = tmp.path().join("dist");
        let out = tmp.path().join("out");
        std::fs::create_dir_all(&dist).unwrap();
        std::fs::create_dir_all(&out).unwrap();
        std::fs::write(dist.join("model.onnx"), b"fresh graph").unwrap();
        std::fs::write(out.join("model.onnx"), b"stale graph").unwrap();

        let source = ArtifactSource::Path(dist);
        let artifact =
            materialize(&source, catalan_variant(), &out).expect("materialize should succeed");

        assert_eq!(std::fs::read(&artifact.graph_path).unwrap(), b"fresh graph");
        assert!(artifact.data_path.is_none());
    }

    #[test]
    fn materialize_copies_the_side_file_when_present() {
        let tmp = tempfile::tempdir().expect("failed to create temp dir");
        let dist = tmp.path().join("dist");
        let out = tmp.path().join("out");
        std::fs::create_dir_all(&dist).unwrap();
        std::fs::create_dir_all(&out).unwrap();
        std::fs::write(dist.join("model.onnx"), b"graph").unwrap();
        std::fs::write(dist.join("model.onnx_data"), b"tensors").unwrap();

        let source = ArtifactSource::Path(dist);
        let artifact =
            materialize(&source, catalan_variant(), &out).expect("materialize should succeed");

        let data_path = artifact.data_path.expect("side file should be copied");
        assert_eq!(std::fs::read(data_path).unwrap(), b"tensors");
    }
}
