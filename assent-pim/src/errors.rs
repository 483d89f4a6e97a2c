use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum WardenError {
    #[error("The request was denied because statement {0} denied it")]
    Denied(String),
    #[error("The request was denied because no matching statement was found")]
    NoMatch,
    #[error("Unbalanced delimiters in {0:?}")]
    Unbalanced(String),
    #[error("Invalid pattern {pattern:?}: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("Regex cache size must be greater than zero")]
    CacheSize,
    #[error("Could not read policy file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Could not parse policy file {path:?}: {reason}")]
    Parse { path: PathBuf, reason: String },
}
