use std::fmt;

use log::warn;

use super::{Block, Blockchain};

/// Read-only integrity check over one chain.
#[derive(Debug, Clone, Copy)]
pub struct Auditor<'a> {
    chain: &'a Blockchain,
}

/// The first check that failed, and where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Corruption {
    /// The block stored at `index` claims another height.
    HeightMismatch { index: usize, found: u64 },
    /// The block before `index` does not sit at `index - 1`.
    BrokenSequence { index: usize, previous: u64 },
    /// `previousHash` at `index` is not the previous block's hash.
    BrokenLink { index: usize },
    /// The stored hash at `index` is empty or differs from a fresh digest.
    HashMismatch { index: usize },
}

impl fmt::Display for Corruption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Corruption::HeightMismatch { index, found } => {
                write!(f, "block at index {index} has height {found}")
            }
            Corruption::BrokenSequence { index, previous } => {
                write!(f, "block before index {index} has height {previous}")
            }
            Corruption::BrokenLink { index } => {
                write!(f, "block {index} does not link to the previous block hash")
            }
            Corruption::HashMismatch { index } => {
                write!(f, "block {index} hash does not match its content")
            }
        }
    }
}

impl<'a> Auditor<'a> {
    pub fn new(chain: &'a Blockchain) -> Self {
        Self { chain }
    }

    /// True when every block passes height, linkage and hash checks.
    pub fn verify(&self) -> bool {
        match self.first_corruption() {
            None => true,
            Some(corruption) => {
                warn!("AUDIT - {corruption}");
                false
            }
        }
    }

    /// Walk the chain from genesis and stop at the first failing block.
    pub fn first_corruption(&self) -> Option<Corruption> {
        let blocks = self.chain.blocks();
        (0..blocks.len()).find_map(|index| self.verify_block(blocks, index).err())
    }

    fn verify_block(&self, blocks: &[Block], index: usize) -> Result<(), Corruption> {
        let block = &blocks[index];

        if block.height() != index as u64 {
            return Err(Corruption::HeightMismatch {
                index,
                found: block.height(),
            });
        }

        if index > 0 {
            let previous = &blocks[index - 1];
            if previous.height() != index as u64 - 1 {
                return Err(Corruption::BrokenSequence {
                    index,
                    previous: previous.height(),
                });
            }
            if previous.block_hash() != block.previous_hash() {
                return Err(Corruption::BrokenLink { index });
            }
        }

        if block.block_hash().is_empty() || block.compute_hash() != block.block_hash() {
            return Err(Corruption::HashMismatch { index });
        }

        Ok(())
    }
}
