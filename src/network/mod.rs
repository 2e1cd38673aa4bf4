//! One-way block announcements to other processes.

mod broadcaster;
mod transport;

pub use broadcaster::Broadcaster;
pub use transport::{HttpTransport, Transport};

use serde::{Deserialize, Serialize};

/// Path under a peer's base URL that accepts announcements.
pub const PEER_ENDPOINT: &str = "/api/v1/peer/";

/// Announcements a hub remembers; the oldest is dropped beyond this.
pub const MAX_ANNOUNCEMENTS: usize = 1024;

/// What gets sent about a sealed block: its hash, nothing else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockAnnouncement {
    pub block_hash: String,
}
