use std::fmt;

use chrono::Utc;
use log::debug;
use serde::{Deserialize, Serialize};

use super::GENESIS_PREVIOUS_HASH;
use super::codec::{HashFields, hash_fields, meets_difficulty};

/// Fields committed to by the block hash. Shared by both block states.
#[derive(Debug, Clone, PartialEq, Eq)]
struct BlockFields {
    height: u64,
    previous_hash: String,
    timestamp: u64,
    data: String,
    difficulty: u32,
    nonce: u64,
}

impl BlockFields {
    fn compute_hash(&self) -> String {
        hash_fields(&HashFields {
            height: self.height,
            previous_hash: &self.previous_hash,
            timestamp: self.timestamp,
            difficulty: self.difficulty,
            nonce: self.nonce,
            data: &self.data,
        })
    }
}

/// A block that has been created but not mined yet.
///
/// Height, data, previous hash, timestamp and difficulty are fixed at
/// construction. Only mining can turn it into a [`Block`].
#[derive(Debug, Clone)]
pub struct UnsealedBlock {
    fields: BlockFields,
    candidate_hash: String,
}

/// A sealed block: its hash was produced by mining (or loaded from storage
/// and not yet audited). There is no way to change its fields in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    fields: BlockFields,
    block_hash: String,
}

/// Plain block record exchanged at the persistence and API boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockRecord {
    pub height: u64,
    pub previous_hash: String,
    pub block_hash: String,
    pub timestamp: u64,
    pub data: String,
    pub difficulty: u32,
    pub nonce: u64,
}

impl UnsealedBlock {
    /// Create a block at `height`. A `previous_hash` that is missing or not
    /// exactly 64 characters long becomes the all-zero genesis sentinel.
    pub fn create(
        height: u64,
        data: impl Into<String>,
        previous_hash: Option<&str>,
        difficulty: u32,
        nonce: u64,
    ) -> Self {
        let previous_hash = match previous_hash {
            Some(prev) if prev.len() == GENESIS_PREVIOUS_HASH.len() => prev.to_string(),
            _ => GENESIS_PREVIOUS_HASH.to_string(),
        };
        let fields = BlockFields {
            height,
            previous_hash,
            timestamp: now_millis(),
            data: data.into(),
            difficulty,
            nonce,
        };
        let candidate_hash = fields.compute_hash();
        Self {
            fields,
            candidate_hash,
        }
    }

    /// Proof-of-Work: search nonces from 0 upwards until the hash starts with
    /// `difficulty` hex zeros. Unbounded; never gives up.
    pub fn mine(self, difficulty: u32) -> Block {
        let mut fields = self.fields;
        let mut block_hash = self.candidate_hash;
        if fields.nonce != 0 {
            fields.nonce = 0;
            block_hash = fields.compute_hash();
        }
        while !meets_difficulty(&block_hash, difficulty) {
            fields.nonce = fields.nonce.wrapping_add(1);
            block_hash = fields.compute_hash();
        }
        debug!(
            "MINER - found nonce {} for height {} at difficulty {}",
            fields.nonce, fields.height, difficulty
        );

        Block { fields, block_hash }
    }

    #[cfg(test)]
    pub fn height(&self) -> u64 {
        self.fields.height
    }

    #[cfg(test)]
    pub fn previous_hash(&self) -> &str {
        &self.fields.previous_hash
    }

    #[cfg(test)]
    pub fn difficulty(&self) -> u32 {
        self.fields.difficulty
    }

    #[cfg(test)]
    pub fn nonce(&self) -> u64 {
        self.fields.nonce
    }

    /// Hash of the current fields; not necessarily meeting any target.
    #[cfg(test)]
    pub fn candidate_hash(&self) -> &str {
        &self.candidate_hash
    }
}

impl Block {
    pub fn height(&self) -> u64 {
        self.fields.height
    }

    pub fn previous_hash(&self) -> &str {
        &self.fields.previous_hash
    }

    #[cfg(test)]
    pub fn data(&self) -> &str {
        &self.fields.data
    }

    #[cfg(test)]
    pub fn nonce(&self) -> u64 {
        self.fields.nonce
    }

    /// The stored hash. For loaded blocks this is whatever storage held.
    pub fn block_hash(&self) -> &str {
        &self.block_hash
    }

    /// Recompute the digest from the block's current field values.
    pub fn compute_hash(&self) -> String {
        self.fields.compute_hash()
    }

    pub fn to_record(&self) -> BlockRecord {
        let fields = &self.fields;
        BlockRecord {
            height: fields.height,
            previous_hash: fields.previous_hash.clone(),
            block_hash: self.block_hash.clone(),
            timestamp: fields.timestamp,
            data: fields.data.clone(),
            difficulty: fields.difficulty,
            nonce: fields.nonce,
        }
    }
}

/// Loaded records are trusted as sealed; only the auditor checks them.
impl From<BlockRecord> for Block {
    fn from(record: BlockRecord) -> Self {
        Self {
            fields: BlockFields {
                height: record.height,
                previous_hash: record.previous_hash,
                timestamp: record.timestamp,
                data: record.data,
                difficulty: record.difficulty,
                nonce: record.nonce,
            },
            block_hash: record.block_hash,
        }
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} Hash: {}; Nonce: {}; Previous: {}; Time: {}",
            self.fields.height,
            shortened(&self.block_hash),
            self.fields.nonce,
            shortened(&self.fields.previous_hash),
            self.fields.timestamp
        )
    }
}

/// First and last six characters of a hash, e.g. `0004ab...91fe02`.
pub fn shortened(hash: &str) -> String {
    const HALF: usize = 6;
    if hash.len() <= HALF * 2 || !hash.is_ascii() {
        return hash.to_string();
    }
    format!("{}...{}", &hash[..HALF], &hash[hash.len() - HALF..])
}

fn now_millis() -> u64 {
    u64::try_from(Utc::now().timestamp_millis()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_computes_candidate_hash() {
        let b = UnsealedBlock::create(3, "data", None, 1, 0);
        assert_eq!(b.candidate_hash(), b.fields.compute_hash());
        assert_eq!(b.candidate_hash().len(), 64);
    }

    #[test]
    fn sealed_and_unsealed_hash_identically() {
        // Difficulty 0 accepts nonce 0, so the sealed hash is the candidate hash.
        let unsealed = UnsealedBlock::create(5, "same fields", None, 0, 0);
        let candidate = unsealed.candidate_hash().to_string();
        let block = unsealed.mine(0);
        assert_eq!(block.block_hash(), candidate);
        assert_eq!(block.compute_hash(), candidate);
    }

    #[test]
    fn malformed_previous_hash_becomes_zero_sentinel() {
        let b = UnsealedBlock::create(1, "x", Some("abc"), 1, 0);
        assert_eq!(b.previous_hash(), GENESIS_PREVIOUS_HASH);

        let b = UnsealedBlock::create(1, "x", None, 1, 0);
        assert_eq!(b.previous_hash(), GENESIS_PREVIOUS_HASH);

        let prev = "ab".repeat(32);
        let b = UnsealedBlock::create(1, "x", Some(&prev), 1, 0);
        assert_eq!(b.previous_hash(), prev);
    }

    #[test]
    fn mining_produces_leading_zeros() {
        for difficulty in 0..=4 {
            let block = UnsealedBlock::create(1, "payload", None, difficulty, 0).mine(difficulty);
            assert!(
                block.block_hash().starts_with(&"0".repeat(difficulty as usize)),
                "difficulty {difficulty}: {}",
                block.block_hash()
            );
            assert_eq!(block.block_hash(), block.compute_hash());
        }
    }

    #[test]
    fn mining_restarts_nonce_from_zero() {
        let block = UnsealedBlock::create(1, "payload", None, 0, 99).mine(0);
        assert_eq!(block.nonce(), 0);
    }

    #[test]
    fn record_round_trip_keeps_hash() {
        let block = UnsealedBlock::create(2, "rec", None, 1, 0).mine(1);
        let record = block.to_record();
        assert_eq!(record.block_hash, block.block_hash());
        assert_eq!(Block::from(record), block);
    }

    #[test]
    fn record_uses_camel_case_keys() {
        let block = UnsealedBlock::create(0, "g", None, 0, 0).mine(0);
        let json = serde_json::to_value(block.to_record()).unwrap();
        for key in [
            "height",
            "previousHash",
            "blockHash",
            "timestamp",
            "data",
            "difficulty",
            "nonce",
        ] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
    }

    #[test]
    fn tampered_record_no_longer_matches() {
        let block = UnsealedBlock::create(2, "original", None, 1, 0).mine(1);
        let mut record = block.to_record();
        record.data = "tampered".into();
        let loaded = Block::from(record);
        assert_ne!(loaded.block_hash(), loaded.compute_hash());
    }

    #[test]
    fn summary_shortens_hashes() {
        let block = UnsealedBlock::create(0, "g", None, 0, 0).mine(0);
        let summary = block.to_string();
        assert!(summary.starts_with("#0 Hash: "));
        assert!(summary.contains("Previous: 000000...000000"));
        assert!(summary.contains("Nonce: 0"));
        assert_eq!(shortened("abc"), "abc");
    }
}
