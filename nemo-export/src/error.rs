//! Error types for nemo-export organized by pipeline stage.

use std::path::PathBuf;
use thiserror::Error;

/// Export pipeline error variants organized by stage.
#[derive(Debug, Error)]
pub enum Error {
    /// Output path resolution stage error
    #[error(transparent)]
    Path(#[from] PathError),

    /// Artifact resolution stage error
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// Checkpoint reading stage error
    #[error(transparent)]
    Checkpoint(#[from] CheckpointError),

    /// Vocabulary emission stage error
    #[error(transparent)]
    Vocab(#[from] VocabError),

    /// Graph materialization or metadata stage error
    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// Output directory resolution errors.
#[derive(Debug, Error)]
pub enum PathError {
    /// No per-user application data directory on this platform
    #[error("no local application data directory on this platform")]
    NoDataDirectory,

    /// Directory creation failed
    #[error("failed to create directory {}: {}", .path.display(), .source)]
    Create {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Artifact source resolution errors (hub, cache, local path).
#[derive(Debug, Error)]
pub enum ResolveError {
    /// Unknown registry id
    #[error("unknown model variant: {0}")]
    UnknownVariant(String),

    /// File not present in a local source directory
    #[error("{} not found in {}", .name, .dir.display())]
    NotFound { name: String, dir: PathBuf },

    /// File not present in the local hub cache
    #[error("{0} is not in the local hub cache (re-run without --offline)")]
    NotCached(String),

    /// Hub API error
    #[error(transparent)]
    Api(#[from] hf_hub::api::sync::ApiError),
}

/// Checkpoint archive reading and config parsing errors.
#[derive(Debug, Error)]
pub enum CheckpointError {
    /// Required archive entry is absent
    #[error("missing {0} inside checkpoint archive")]
    MissingEntry(&'static str),

    /// Embedded model config failed to parse
    #[error("invalid model config: {0}")]
    Config(#[from] serde_yaml::Error),

    /// IO error while reading the archive
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Vocabulary construction and emission errors.
#[derive(Debug, Error)]
pub enum VocabError {
    /// Tokenizer vocabulary entry contained no pieces
    #[error("checkpoint tokenizer vocabulary is empty")]
    EmptyTokenizerVocab,

    /// Neither vocabulary form is present in the checkpoint
    #[error("checkpoint has neither a tokenizer vocabulary nor a labels list")]
    NoVocabulary,

    /// IO error while writing the tokens file
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Graph artifact and metadata errors.
#[derive(Debug, Error)]
pub enum GraphError {
    /// Serialized model bytes do not parse as a protobuf message
    #[error("malformed model protobuf: {0}")]
    Malformed(&'static str),

    /// ONNX Runtime rejected the patched graph
    #[error(transparent)]
    Ort(#[from] ort::Error),

    /// IO error while copying or patching the artifact
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type alias for nemo-export operations.
pub type Result<T> = std::result::Result<T, Error>;
