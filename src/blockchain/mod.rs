pub mod auditor;
pub mod block;
pub mod codec;
pub mod model;

pub use auditor::Auditor;
pub use block::{Block, BlockRecord};
pub use model::Blockchain;

/// Previous-hash sentinel of the genesis block (32 zero bytes in hex).
pub const GENESIS_PREVIOUS_HASH: &str =
    "0000000000000000000000000000000000000000000000000000000000000000";

/// Data carried by every block mined after genesis unless told otherwise.
pub const DEFAULT_BLOCK_DATA: &str = "Another block";
