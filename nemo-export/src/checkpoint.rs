//! Reading NeMo checkpoint archives.
//!
//! A `.nemo` checkpoint is a tar archive, sometimes gzip-compressed,
//! holding the serialized weights, a `model_config.yaml`, and, for
//! subword models, the tokenizer files. Only the config and the
//! tokenizer vocabulary are read here; the weight entries are skipped
//! unread.

use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use flate2::read::GzDecoder;
use serde::Deserialize;
use tar::Archive;

use crate::error::CheckpointError;

const CONFIG_ENTRY: &str = "model_config.yaml";
/// Tokenizer vocabulary entry suffixes, in preference order. Archive
/// entries carry tool-generated prefixes, so matching is by suffix.
const TOKENIZER_VOCAB_ENTRY: &str = "tokenizer.vocab";
const TOKENIZER_VOCAB_FALLBACK: &str = "vocab.txt";

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Config fields the exporter reads; everything else in the embedded
/// YAML is ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Flat label list of character-based CTC models.
    pub labels: Option<Vec<String>>,
    pub preprocessor: PreprocessorConfig,
    pub encoder: EncoderConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PreprocessorConfig {
    pub normalize: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct EncoderConfig {
    pub subsampling_factor: Option<u32>,
}

impl ModelConfig {
    /// Feature-normalization mode declared by the checkpoint; empty
    /// string when the config does not carry one.
    pub fn normalize_type(&self) -> &str {
        self.preprocessor.normalize.as_deref().unwrap_or("")
    }

    /// Encoder time-subsampling factor; Conformer encoders default to 4.
    pub fn subsampling_factor(&self) -> u32 {
        self.encoder.subsampling_factor.unwrap_or(4)
    }
}

/// An opened checkpoint: parsed config plus the raw tokenizer vocabulary
/// text when the model carries one.
#[derive(Debug)]
pub struct Checkpoint {
    pub config: ModelConfig,
    pub tokenizer_vocab: Option<String>,
}

/// Open a `.nemo` checkpoint and extract the entries the export needs.
///
/// The archive is scanned in a single pass since a gzip stream cannot
/// seek backwards.
pub fn open(path: &Path) -> Result<Checkpoint, CheckpointError> {
    tracing::debug!(path = %path.display(), "opening checkpoint archive");

    let mut archive = open_archive(path)?;
    let mut config_text: Option<String> = None;
    let mut vocab_text: Option<String> = None;
    let mut vocab_fallback: Option<String> = None;

    for entry in archive.entries()? {
        let mut entry = entry?;
        let name = entry.path()?.to_string_lossy().into_owned();

        if name.ends_with(CONFIG_ENTRY) {
            config_text = Some(read_entry(&mut entry)?);
        } else if name.ends_with(TOKENIZER_VOCAB_ENTRY) {
            vocab_text = Some(read_entry(&mut entry)?);
        } else if name.ends_with(TOKENIZER_VOCAB_FALLBACK) && vocab_fallback.is_none() {
            vocab_fallback = Some(read_entry(&mut entry)?);
        }
    }

    let config_text = config_text.ok_or(CheckpointError::MissingEntry(CONFIG_ENTRY))?;
    let config: ModelConfig = serde_yaml::from_str(&config_text)?;
    let tokenizer_vocab = vocab_text.or(vocab_fallback);

    tracing::debug!(
        has_tokenizer_vocab = tokenizer_vocab.is_some(),
        has_labels = config.labels.is_some(),
        "checkpoint entries read"
    );

    Ok(Checkpoint {
        config,
        tokenizer_vocab,
    })
}

fn open_archive(path: &Path) -> Result<Archive<Box<dyn Read>>, CheckpointError> {
    let mut file = File::open(path)?;
    let mut magic = [0u8; 2];
    let n = file.read(&mut magic)?;
    file.seek(SeekFrom::Start(0))?;

    let reader: Box<dyn Read> = if n == 2 && magic == GZIP_MAGIC {
        Box::new(GzDecoder::new(BufReader::new(file)))
    } else {
        Box::new(BufReader::new(file))
    };

    Ok(Archive::new(reader))
}

fn read_entry(entry: &mut impl Read) -> Result<String, CheckpointError> {
    let mut text = String::new();
    entry.read_to_string(&mut text)?;
    Ok(text)
}
