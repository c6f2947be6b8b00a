//! nemo-export: convert NeMo Conformer CTC checkpoints into sherpa-onnx
//! model directories.
//!
//! The pipeline is a one-shot linear sequence: resolve the platform
//! output directory, fetch the `.nemo` checkpoint, read its config and
//! vocabulary, write the `tokens.txt` table, materialize the exported
//! computation graph, and stamp the metadata entries the inference
//! engine expects.
//!
//! # Quick Start
//!
//! ```ignore
//! use nemo_export::export::Exporter;
//! use nemo_export::source::ArtifactSource;
//! use nemo_export::{paths, registry};
//!
//! let variant = registry::find("nemo-conformer-ca").unwrap();
//! let exporter = Exporter {
//!     variant,
//!     checkpoint_source: ArtifactSource::api(variant.checkpoint_repo)?,
//!     graph_source: ArtifactSource::api(variant.graph_repo)?,
//!     output_dir: paths::models_dir()?.join(variant.id),
//!     force: false,
//!     verify: false,
//! };
//! let report = exporter.run()?;
//! print!("{report}");
//! ```

pub mod checkpoint;
pub mod error;
pub mod export;
pub mod graph;
pub mod onnx;
pub mod paths;
pub mod registry;
pub mod source;
pub mod vocab;

pub use error::{Error, Result};
pub use export::{ExportReport, Exporter};
