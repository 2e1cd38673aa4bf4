use std::io::{BufRead, Write};

use log::{info, warn};

use crate::blockchain::{Auditor, Blockchain};
use crate::cli::{MineArgs, parse_block_count, parse_difficulty, resolve_option};
use crate::error::LedgerError;
use crate::network::{Broadcaster, Transport};
use crate::process::validator::integrity_failure;
use crate::storage::Storage;

/// Fully resolved inputs of one mining run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MinerSettings {
    pub message: String,
    pub difficulty: u32,
    pub blocks: usize,
    pub data: String,
}

impl MinerSettings {
    /// Fill in whatever the flags and environment left out by prompting.
    pub fn resolve<R: BufRead, W: Write>(
        args: MineArgs,
        input: &mut R,
        output: &mut W,
    ) -> Result<Self, LedgerError> {
        let message = resolve_option(
            args.message,
            "Enter a message for the genesis block: ",
            input,
            output,
        )?;
        let difficulty = resolve_option(
            args.difficulty,
            "Enter the difficulty or number of leading zeros (e.g.: 3): ",
            input,
            output,
        )?;
        let blocks = resolve_option(
            args.blocks,
            "Enter the number of blocks that will be mined: ",
            input,
            output,
        )?;

        Ok(Self {
            message,
            difficulty: parse_difficulty(&difficulty)?,
            blocks: parse_block_count(&blocks)?,
            data: args.data,
        })
    }
}

/// Create a chain, grow it to `settings.blocks` blocks, then audit it.
///
/// Each sealed block is announced when a running broadcaster is given. The
/// chain is saved only after it passed the audit.
pub async fn mine<T: Transport>(
    settings: &MinerSettings,
    broadcaster: Option<&Broadcaster<T>>,
    storage: Option<&Storage>,
) -> Result<Blockchain, LedgerError> {
    let mut blockchain = Blockchain::create(settings.message.clone(), settings.difficulty);
    info!("{}", blockchain.last_block());
    announce(broadcaster, &blockchain).await;

    while blockchain.len() < settings.blocks {
        let block = blockchain.create_block(settings.data.clone());
        let sealed = blockchain.append_block(block);
        info!("{sealed}");
        announce(broadcaster, &blockchain).await;
    }

    let auditor = Auditor::new(&blockchain);
    if !auditor.verify() {
        return Err(integrity_failure(&auditor));
    }

    if let Some(storage) = storage {
        storage.save(&blockchain)?;
    }
    Ok(blockchain)
}

async fn announce<T: Transport>(broadcaster: Option<&Broadcaster<T>>, chain: &Blockchain) {
    let Some(broadcaster) = broadcaster.filter(|b| b.is_running()) else {
        return;
    };
    if let Err(e) = broadcaster.broadcast_block(chain.last_block()).await {
        warn!("P2P - announcement skipped: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::GENESIS_PREVIOUS_HASH;
    use crate::error::NetworkError;
    use crate::network::{BlockAnnouncement, HttpTransport};
    use std::io::Cursor;
    use std::sync::Mutex;
    use tempfile::tempdir;

    #[derive(Default)]
    struct CountingTransport {
        hashes: Mutex<Vec<String>>,
    }

    impl Transport for CountingTransport {
        async fn send(
            &self,
            _peer: &str,
            announcement: &BlockAnnouncement,
        ) -> Result<(), NetworkError> {
            self.hashes
                .lock()
                .unwrap()
                .push(announcement.block_hash.clone());
            Ok(())
        }
    }

    fn settings(blocks: usize) -> MinerSettings {
        MinerSettings {
            message: "genesis text".into(),
            difficulty: 1,
            blocks,
            data: "Another block".into(),
        }
    }

    fn args(message: Option<&str>, difficulty: Option<&str>, blocks: Option<&str>) -> MineArgs {
        MineArgs {
            message: message.map(str::to_string),
            difficulty: difficulty.map(str::to_string),
            blocks: blocks.map(str::to_string),
            name: None,
            data: "Another block".into(),
        }
    }

    #[test]
    fn resolve_prompts_for_missing_options() {
        let mut input = Cursor::new("2\n4\n");
        let mut out = Vec::new();
        let resolved =
            MinerSettings::resolve(args(Some("hello"), None, None), &mut input, &mut out).unwrap();
        assert_eq!(resolved.message, "hello");
        assert_eq!(resolved.difficulty, 2);
        assert_eq!(resolved.blocks, 4);
        let shown = String::from_utf8(out).unwrap();
        assert!(shown.contains("difficulty"));
        assert!(shown.contains("number of blocks"));
    }

    #[test]
    fn resolve_rejects_bad_numbers() {
        let mut out = Vec::new();
        let err = MinerSettings::resolve(
            args(Some("m"), Some("x"), Some("1")),
            &mut Cursor::new(""),
            &mut out,
        )
        .unwrap_err();
        assert!(matches!(err, LedgerError::Config(_)));

        let err = MinerSettings::resolve(
            args(Some("m"), Some("1"), Some("0")),
            &mut Cursor::new(""),
            &mut out,
        )
        .unwrap_err();
        assert!(matches!(err, LedgerError::Config(_)));
    }

    #[actix_web::test]
    async fn mines_requested_number_of_blocks() {
        let chain = mine(&settings(4), None::<&Broadcaster<HttpTransport>>, None)
            .await
            .unwrap();
        assert_eq!(chain.len(), 4);
        assert_eq!(chain.blocks()[0].previous_hash(), GENESIS_PREVIOUS_HASH);
        assert!(chain.blocks().iter().skip(1).all(|b| b.data() == "Another block"));
        assert!(Auditor::new(&chain).verify());
    }

    #[actix_web::test]
    async fn single_block_target_keeps_only_genesis() {
        let chain = mine(&settings(1), None::<&Broadcaster<HttpTransport>>, None)
            .await
            .unwrap();
        assert_eq!(chain.len(), 1);
    }

    #[actix_web::test]
    async fn announces_every_sealed_block() {
        let mut broadcaster = Broadcaster::new(CountingTransport::default(), vec!["p".into()]);
        broadcaster.start();
        let chain = mine(&settings(3), Some(&broadcaster), None).await.unwrap();

        let expected: Vec<String> = chain
            .blocks()
            .iter()
            .map(|b| b.block_hash().to_string())
            .collect();
        assert_eq!(*broadcaster_hashes(&broadcaster), expected);
    }

    fn broadcaster_hashes(
        broadcaster: &Broadcaster<CountingTransport>,
    ) -> std::sync::MutexGuard<'_, Vec<String>> {
        broadcaster.transport().hashes.lock().unwrap()
    }

    #[actix_web::test]
    async fn saves_verified_chain() {
        let dir = tempdir().unwrap();
        let storage = Storage::open(dir.path(), "mined").unwrap();
        let chain = mine(&settings(2), None::<&Broadcaster<HttpTransport>>, Some(&storage))
            .await
            .unwrap();
        assert_eq!(storage.load().unwrap().records(), chain.records());
    }
}
