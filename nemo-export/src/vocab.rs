//! Vocabulary extraction and tokens.txt emission.
//!
//! The inference engine reads the vocabulary as a two-column text table,
//! one `<token> <id>` pair per line, with a synthetic `<blk>` entry one
//! past the last real id for CTC decoding.

use std::io::{self, Write};

use crate::checkpoint::Checkpoint;
use crate::error::VocabError;

/// Word-boundary glyph of the downstream tokenizer format (U+2581).
pub const WORD_BOUNDARY: &str = "▁";
/// Synthetic CTC blank entry appended past the last vocabulary id.
pub const BLANK_TOKEN: &str = "<blk>";

/// Model vocabulary, in id order. Ids are dense and zero-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Vocabulary {
    /// Subword pieces from the checkpoint tokenizer.
    Subword(Vec<String>),
    /// Flat character labels from the model config.
    Labels(Vec<String>),
}

impl Vocabulary {
    /// Build from a checkpoint. A tokenizer vocabulary is preferred;
    /// a checkpoint without one must carry a labels list.
    pub fn from_checkpoint(ckpt: &Checkpoint) -> Result<Self, VocabError> {
        if let Some(raw) = &ckpt.tokenizer_vocab {
            return Ok(Self::Subword(parse_tokenizer_vocab(raw)?));
        }
        match &ckpt.config.labels {
            Some(labels) => Ok(Self::Labels(labels.clone())),
            None => Err(VocabError::NoVocabulary),
        }
    }

    /// Raw entry count, excluding the appended blank.
    pub fn len(&self) -> usize {
        match self {
            Self::Subword(pieces) => pieces.len(),
            Self::Labels(labels) => labels.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Entry count including the appended blank; this is the
    /// `vocab_size` the inference engine expects, never the raw count.
    pub fn size_with_blank(&self) -> usize {
        self.len() + 1
    }

    /// Write the tokens table: `<token> <id>` per line, terminated by
    /// the blank entry at id = raw count.
    ///
    /// Token text is written verbatim: no escaping, sorting, or
    /// deduplication. The one exception is a subword piece that is
    /// exactly a single space, which is written as [`WORD_BOUNDARY`] so
    /// the downstream tokenizer format can represent it.
    pub fn write_tokens(&self, w: &mut impl Write) -> io::Result<()> {
        match self {
            Self::Subword(pieces) => {
                for (id, piece) in pieces.iter().enumerate() {
                    let piece = if piece == " " {
                        WORD_BOUNDARY
                    } else {
                        piece.as_str()
                    };
                    writeln!(w, "{piece} {id}")?;
                }
            }
            Self::Labels(labels) => {
                for (id, label) in labels.iter().enumerate() {
                    writeln!(w, "{label} {id}")?;
                }
            }
        }
        writeln!(w, "{BLANK_TOKEN} {}", self.len())
    }
}

/// Parse a SentencePiece vocabulary export: one `piece<TAB>score` line
/// per id, with the id equal to the line index. Pieces are kept
/// verbatim; trimming would destroy whitespace pieces.
fn parse_tokenizer_vocab(raw: &str) -> Result<Vec<String>, VocabError> {
    let pieces: Vec<String> = raw
        .lines()
        .map(|line| line.split('\t').next().unwrap_or("").to_string())
        .collect();

    if pieces.is_empty() {
        return Err(VocabError::EmptyTokenizerVocab);
    }
    Ok(pieces)
}
