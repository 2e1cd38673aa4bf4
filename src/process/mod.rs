//! The workflows behind the `mine` and `validate` commands.

pub mod miner;
pub mod validator;

pub use miner::{MinerSettings, mine};
pub use validator::validate;
