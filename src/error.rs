//! Error kinds surfaced at the ledger's boundaries.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    /// Missing or invalid operator input (message, difficulty, block count, name).
    #[error("Configuration error: {0}")]
    Config(String),

    /// The audited chain failed verification.
    #[error("Data corruption detected! {0}")]
    Integrity(String),

    #[error("Stored chain contains no blocks")]
    EmptyChain,

    #[error("Storage error at {}: {source}", .path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("Broadcaster is not running")]
    Stopped,

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Peer {peer} rejected announcement with status {status}")]
    Rejected { peer: String, status: u16 },
}
