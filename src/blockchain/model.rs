use log::info;

use super::block::{Block, BlockRecord, UnsealedBlock};
use crate::error::LedgerError;

/// Simple in-memory blockchain with Proof-of-Work.
#[derive(Debug, Clone)]
pub struct Blockchain {
    genesis_message: String,
    difficulty: u32,
    blocks: Vec<Block>,
}

impl Blockchain {
    /// Start a new chain whose genesis block carries `genesis_message`,
    /// mined at `difficulty`.
    pub fn create(genesis_message: impl Into<String>, difficulty: u32) -> Self {
        let genesis_message = genesis_message.into();
        let genesis =
            UnsealedBlock::create(0, genesis_message.clone(), None, difficulty, 0).mine(difficulty);
        info!("CHAIN - genesis sealed: {genesis}");

        Self {
            genesis_message,
            difficulty,
            blocks: vec![genesis],
        }
    }

    /// Rebuild a chain from persisted records without re-mining.
    ///
    /// The genesis message comes from the first record and the difficulty
    /// from the last one, so per-block difficulty changes are not preserved.
    pub fn from_storage(records: Vec<BlockRecord>) -> Result<Self, LedgerError> {
        let (Some(first), Some(last)) = (records.first(), records.last()) else {
            return Err(LedgerError::EmptyChain);
        };
        let genesis_message = first.data.clone();
        let difficulty = last.difficulty;

        Ok(Self {
            genesis_message,
            difficulty,
            blocks: records.into_iter().map(Block::from).collect(),
        })
    }

    /// Build the next block on top of the current tail. It is not appended.
    pub fn create_block(&self, data: impl Into<String>) -> UnsealedBlock {
        let previous = self.last_block();
        UnsealedBlock::create(
            previous.height() + 1,
            data,
            Some(previous.block_hash()),
            self.difficulty,
            0,
        )
    }

    /// Mine `block` at the chain difficulty and append it.
    ///
    /// Height and previous hash are not checked here; a block that does not
    /// fit the tail is appended anyway and fails the audit later.
    pub fn append_block(&mut self, block: UnsealedBlock) -> &Block {
        let sealed = block.mine(self.difficulty);
        self.blocks.push(sealed);
        self.last_block()
    }

    /// Return the last block in the chain.
    pub fn last_block(&self) -> &Block {
        self.blocks
            .last()
            .expect("Blockchain should always have at least the genesis block")
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn records(&self) -> Vec<BlockRecord> {
        self.blocks.iter().map(Block::to_record).collect()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn difficulty(&self) -> u32 {
        self.difficulty
    }

    pub fn genesis_message(&self) -> &str {
        &self.genesis_message
    }
}
