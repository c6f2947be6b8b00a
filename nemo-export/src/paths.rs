//! Output directory resolution for exported models.
//!
//! Exported models land under the per-user application data directory of
//! the app that consumes them:
//!
//! | Platform | Models directory |
//! |----------|------------------|
//! | Linux    | `~/.local/share/gibb.eri.sh/models` |
//! | macOS    | `~/Library/Application Support/gibb.eri.sh/models` |
//! | Windows  | `%LOCALAPPDATA%\gibb.eri.sh\models` |
//!
//! When the platform base directory cannot be determined (e.g. an unset
//! `%LOCALAPPDATA%`), resolution fails loudly rather than degrading to a
//! relative path.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::PathError;

/// Application namespace under the platform data directory.
pub const APP_DIR_NAME: &str = "gibb.eri.sh";

/// Base directory holding one subdirectory per exported model variant.
pub fn models_dir() -> Result<PathBuf, PathError> {
    let base = dirs::data_local_dir().ok_or(PathError::NoDataDirectory)?;
    Ok(base.join(APP_DIR_NAME).join("models"))
}

/// Create an output directory if absent. Idempotent: an existing
/// directory, with or without prior output files, is left untouched.
pub fn ensure_dir(dir: &Path) -> Result<(), PathError> {
    fs::create_dir_all(dir).map_err(|source| PathError::Create {
        path: dir.to_path_buf(),
        source,
    })
}
