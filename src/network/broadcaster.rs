use log::{debug, info, warn};

use super::{BlockAnnouncement, Transport};
use crate::blockchain::Block;
use crate::error::NetworkError;

/// Sends sealed block hashes to a fixed set of peers.
///
/// Constructed stopped; the caller decides when it runs. Delivery is fire and
/// forget: a failing peer is logged and skipped, nothing is retried.
#[derive(Debug)]
pub struct Broadcaster<T: Transport> {
    transport: T,
    peers: Vec<String>,
    running: bool,
}

impl<T: Transport> Broadcaster<T> {
    pub fn new(transport: T, peers: Vec<String>) -> Self {
        Self {
            transport,
            peers,
            running: false,
        }
    }

    pub fn start(&mut self) {
        self.running = true;
        info!("P2P - broadcaster started with {} peer(s)", self.peers.len());
    }

    pub fn stop(&mut self) {
        self.running = false;
        info!("P2P - broadcaster stopped");
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    #[cfg(test)]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Announce `block`'s hash to every peer; returns how many accepted it.
    pub async fn broadcast_block(&self, block: &Block) -> Result<usize, NetworkError> {
        if !self.running {
            return Err(NetworkError::Stopped);
        }

        let announcement = BlockAnnouncement {
            block_hash: block.block_hash().to_string(),
        };
        let mut delivered = 0;
        for peer in &self.peers {
            match self.transport.send(peer, &announcement).await {
                Ok(()) => {
                    debug!("[client -> {peer}]: {}", announcement.block_hash);
                    delivered += 1;
                }
                Err(e) => warn!("P2P - could not reach {peer}: {e}"),
            }
        }
        Ok(delivered)
    }
}
