mod prompt;

use clap::{Args, Parser, Subcommand};

pub use prompt::{parse_block_count, parse_difficulty, resolve_option};

use crate::blockchain::DEFAULT_BLOCK_DATA;

/// Disposable proof-of-work ledger: mine a chain, audit it, serve it.
#[derive(Debug, Parser)]
#[command(name = "pow_ledger", version, about)]
pub struct Cli {
    /// Enables debug mode
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Enables quiet mode
    #[arg(short, long, global = true, conflicts_with = "debug")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Mine a new chain and audit it
    Mine(MineArgs),
    /// Audit a stored chain
    Validate(ValidateArgs),
    /// Serve stored chains and accept peer announcements over HTTP
    Serve(ServeArgs),
}

#[derive(Debug, Args)]
pub struct MineArgs {
    /// The message or data added to the genesis block.
    #[arg(short = 'm', long, env = "CHAIN_MESSAGE")]
    pub message: Option<String>,

    /// The difficulty of finding blocks (i.e. number of leading zeros).
    #[arg(short = 'D', long, env = "CHAIN_DIFFICULTY")]
    pub difficulty: Option<String>,

    /// The number of blocks to mine.
    #[arg(short = 'b', long, env = "CHAIN_BLOCKS")]
    pub blocks: Option<String>,

    /// Save the mined chain under this network name.
    #[arg(short = 'n', long)]
    pub name: Option<String>,

    /// Data carried by every block after genesis.
    #[arg(long, default_value = DEFAULT_BLOCK_DATA)]
    pub data: String,
}

#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// The name of the blockchain network.
    #[arg(short = 'n', long, env = "CHAIN_NAME")]
    pub name: Option<String>,
}

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// The name of the blockchain network to expose.
    #[arg(short = 'n', long, env = "CHAIN_NAME")]
    pub name: Option<String>,
}
