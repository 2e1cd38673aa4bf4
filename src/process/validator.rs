use log::info;

use crate::blockchain::{Auditor, Blockchain};
use crate::error::LedgerError;
use crate::storage::Storage;

/// Reload a stored chain and audit it. Nothing is re-mined.
pub fn validate(storage: &Storage) -> Result<Blockchain, LedgerError> {
    let blockchain = storage.load()?;
    info!(
        "VALIDATOR - auditing {} blocks of \"{}\" from {}",
        blockchain.len(),
        blockchain.genesis_message(),
        storage.filepath().display()
    );

    let auditor = Auditor::new(&blockchain);
    if !auditor.verify() {
        return Err(integrity_failure(&auditor));
    }
    Ok(blockchain)
}

/// Integrity error naming the first failing check.
pub(crate) fn integrity_failure(auditor: &Auditor<'_>) -> LedgerError {
    let reason = auditor
        .first_corruption()
        .map(|c| c.to_string())
        .unwrap_or_default();
    LedgerError::Integrity(reason)
}
