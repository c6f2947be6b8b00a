//! Artifact sources: local paths, the hub cache, or the hub API.

use hf_hub::api::sync::{Api, ApiRepo};
use hf_hub::{Cache, CacheRepo};
use std::path::PathBuf;

use crate::error::ResolveError;

/// Where a model repository's files are resolved from.
#[derive(Debug)]
pub enum ArtifactSource {
    /// Local filesystem path: a directory holding the files, or a single
    /// file that every name resolves to
    Path(PathBuf),
    /// HuggingFace cache lookup, no network
    Cache(CacheRepo),
    /// HuggingFace API repository with its default caching client
    Api(ApiRepo),
}

impl ArtifactSource {
    /// Hub API source for a repository id.
    pub fn api(repo_id: &str) -> Result<Self, ResolveError> {
        Ok(Self::Api(Api::new()?.model(repo_id.to_string())))
    }

    /// Cache-only source for a repository id.
    pub fn cache(repo_id: &str) -> Self {
        Self::Cache(Cache::from_env().model(repo_id.to_string()))
    }

    /// Resolve a file name to a local path, downloading through the hub
    /// client when the source is [`ArtifactSource::Api`].
    pub fn resolve(&self, file_name: &str) -> Result<PathBuf, ResolveError> {
        match self {
            ArtifactSource::Path(path) => {
                // A source pointing directly at a file answers for every name.
                let resolved = if path.is_file() {
                    path.clone()
                } else {
                    path.join(file_name)
                };
                if resolved.is_file() {
                    Ok(resolved)
                } else {
                    Err(ResolveError::NotFound {
                        name: file_name.to_string(),
                        dir: path.clone(),
                    })
                }
            }
            ArtifactSource::Cache(repo) => repo
                .get(file_name)
                .ok_or_else(|| ResolveError::NotCached(file_name.to_string())),
            ArtifactSource::Api(repo) => Ok(repo.get(file_name)?),
        }
    }

    /// Resolve a file that may legitimately be absent from the source.
    pub fn resolve_optional(&self, file_name: &str) -> Option<PathBuf> {
        self.resolve(file_name).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_source_resolves_files_in_directory() {
        let tmp = tempfile::tempdir().expect("failed to create temp dir");
        std::fs::write(tmp.path().join("model.onnx"), b"x").expect("write failed");

        let source = ArtifactSource::Path(tmp.path().to_path_buf());
        let resolved = source.resolve("model.onnx").expect("file should resolve");
        assert_eq!(resolved, tmp.path().join("model.onnx"));

        assert!(source.resolve("missing.onnx").is_err());
        assert!(source.resolve_optional("missing.onnx").is_none());
    }

    #[test]
    fn file_source_answers_for_any_name() {
        let tmp = tempfile::tempdir().expect("failed to create temp dir");
        let file = tmp.path().join("local.nemo");
        std::fs::write(&file, b"x").expect("write failed");

        let source = ArtifactSource::Path(file.clone());
        let resolved = source
            .resolve("stt_ca_conformer_ctc_large.nemo")
            .expect("file source should resolve");
        assert_eq!(resolved, file);
    }
}
