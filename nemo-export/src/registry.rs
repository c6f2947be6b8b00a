//! Exportable model variants and their artifact coordinates.

use std::path::Path;

/// Vocabulary file name in an exported model directory.
pub const TOKENS_FILE: &str = "tokens.txt";
/// Graph file name in an exported model directory.
pub const GRAPH_FILE: &str = "model.onnx";
/// External-tensor side file name in an exported model directory.
pub const GRAPH_DATA_FILE: &str = "model.onnx_data";

/// Export coordinates for one model variant.
///
/// The checkpoint repository holds the `.nemo` training artifact the
/// vocabulary and config are read from; the graph repository holds the
/// published ONNX export of the same checkpoint.
#[derive(Debug, Clone, Copy)]
pub struct ModelVariant {
    /// Registry id, also the output subdirectory name.
    pub id: &'static str,
    /// Human-readable display name.
    pub display_name: &'static str,
    /// Hub repository holding the checkpoint.
    pub checkpoint_repo: &'static str,
    /// Checkpoint file name within the repository.
    pub checkpoint_file: &'static str,
    /// Hub repository holding the exported computation graph.
    pub graph_repo: &'static str,
    /// Graph file name within the graph repository.
    pub graph_file: &'static str,
    /// Optional external-tensor side file name.
    pub graph_data_file: &'static str,
    /// Model type string declared to the inference engine.
    pub model_type: &'static str,
}

/// All variants this tool can export.
pub const VARIANTS: &[ModelVariant] = &[ModelVariant {
    id: "nemo-conformer-ca",
    display_name: "Conformer CTC (Catalan)",
    checkpoint_repo: "nvidia/stt_ca_conformer_ctc_large",
    checkpoint_file: "stt_ca_conformer_ctc_large.nemo",
    graph_repo: "mpuig/stt_ca_conformer_ctc_large_onnx",
    graph_file: "model.onnx",
    graph_data_file: "model.onnx_data",
    model_type: "EncDecCTCModelBPE",
}];

/// Look up a variant by registry id.
pub fn find(id: &str) -> Option<&'static ModelVariant> {
    VARIANTS.iter().find(|v| v.id == id)
}

impl ModelVariant {
    /// Whether the required output files are already on disk.
    /// The external-tensor side file is optional and not checked.
    pub fn is_exported(&self, dir: &Path) -> bool {
        dir.join(GRAPH_FILE).exists() && dir.join(TOKENS_FILE).exists()
    }
}
