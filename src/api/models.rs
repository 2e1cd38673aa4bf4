use crate::blockchain::BlockRecord;
use crate::network::MAX_ANNOUNCEMENTS;
use crate::storage::Storage;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Mutex;

/// An announcement received from another process.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeerMessage {
    pub block_hash: String,
    pub received_at: i64, // Unix timestamp in milliseconds (UTC)
}

/// Shared state of the hub: where the chain lives and the most recent
/// announcements, oldest first.
pub struct AppState {
    pub storage: Storage,
    announcements: Mutex<VecDeque<PeerMessage>>,
    max_announcements: usize,
}

impl AppState {
    pub fn new(storage: Storage) -> Self {
        Self::with_limit(storage, MAX_ANNOUNCEMENTS)
    }

    /// Keep at most `limit` announcements (at least one).
    pub fn with_limit(storage: Storage, limit: usize) -> Self {
        let max_announcements = limit.max(1);
        Self {
            storage,
            announcements: Mutex::new(VecDeque::with_capacity(max_announcements.min(64))),
            max_announcements,
        }
    }

    /// Remember `message`, evicting the oldest entry when full. Returns how
    /// many are held afterwards.
    pub fn record_announcement(&self, message: PeerMessage) -> usize {
        let mut announcements = self.announcements.lock().expect("mutex poisoned");
        while announcements.len() >= self.max_announcements {
            announcements.pop_front();
        }
        announcements.push_back(message);
        announcements.len()
    }

    pub fn announcements(&self) -> Vec<PeerMessage> {
        let announcements = self.announcements.lock().expect("mutex poisoned");
        announcements.iter().cloned().collect()
    }
}

#[derive(Serialize)]
pub struct ChainResponse {
    pub length: usize,
    pub difficulty: u32,
    pub chain: Vec<BlockRecord>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateResponse {
    pub valid: bool,
    pub length: usize,
    pub difficulty: u32,
    pub top_hash: Option<String>,
    pub corruption: Option<String>,
}

#[derive(Serialize)]
pub struct PeerAck {
    pub received: usize,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
