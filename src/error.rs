use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum QuizError {
    #[error("no items to quiz: the selected vocabulary is empty")]
    EmptyItemSet,

    #[error("item weights sum to {0}, expected a positive finite total")]
    InvalidWeights(f64),

    #[error("unknown built-in vocabulary `{0}`")]
    UnknownVocabulary(String),

    #[error("failed to read vocabulary file {path}")]
    VocabularyRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse vocabulary `{name}`")]
    VocabularyParse {
        name: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("console I/O failed")]
    Console(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, QuizError>;
