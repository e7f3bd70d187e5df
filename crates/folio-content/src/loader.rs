#![forbid(unsafe_code)]

//! Content loading.
//!
//! [`load`] surfaces read and parse failures distinctly so callers can
//! report them; [`load_or_default`] is the degrade-to-empty path the
//! components use. Neither ever panics on bad content.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use thiserror::Error;

/// A content document failed to load.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Read and parse a JSON document.
pub fn load<T: DeserializeOwned>(path: &Path) -> Result<T, ContentError> {
    let text = std::fs::read_to_string(path).map_err(|source| ContentError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| ContentError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a document, degrading to `T::default()` on any failure.
pub fn load_or_default<T: DeserializeOwned + Default>(path: &Path) -> T {
    match load(path) {
        Ok(value) => value,
        Err(err) => {
            tracing::warn!(error = %err, "content load failed, using empty default");
            T::default()
        }
    }
}
