//! Errors raised while loading reference data and household inputs
//!
//! The projection engine itself cannot fail; only the I/O edges do.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{file}, line {line}: {message}")]
    Parse {
        file: String,
        line: u64,
        message: String,
    },

    #[error("Unknown {field}: {value}")]
    UnknownLabel { field: &'static str, value: String },

    #[error("Table '{0}' is empty")]
    EmptyTable(&'static str),
}

impl LoadError {
    pub(crate) fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        LoadError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type LoadResult<T> = Result<T, LoadError>;
