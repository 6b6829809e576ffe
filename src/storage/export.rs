use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Serialize;
use tracing::info;

use crate::core::{
    errors::Result,
    utils::{ensure_dir, write_atomic},
};
use crate::ledger::{Category, Ledger, Transaction, TransactionType};

/// File name used when exporting into a directory.
pub const EXPORT_FILE_NAME: &str = "transactions.json";

/// Exported shape of a transaction. Identifiers are session-local and are
/// left out.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ExportRecord {
    pub date: NaiveDate,
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub category: Category,
}

impl From<&Transaction> for ExportRecord {
    fn from(txn: &Transaction) -> Self {
        Self {
            date: txn.date,
            amount: txn.amount,
            kind: txn.kind,
            category: txn.category,
        }
    }
}

/// Renders the full, unfiltered ledger as a pretty-printed JSON array.
pub fn export_json(ledger: &Ledger) -> Result<String> {
    let records: Vec<ExportRecord> = ledger.iter().map(ExportRecord::from).collect();
    Ok(serde_json::to_string_pretty(&records)?)
}

/// Writes the export to `target`. A directory target receives
/// `transactions.json`; any other path is used as the file name. The file is
/// staged next to its destination and renamed into place.
pub fn export_ledger(ledger: &Ledger, target: &Path) -> Result<PathBuf> {
    let path = if target.is_dir() {
        target.join(EXPORT_FILE_NAME)
    } else {
        target.to_path_buf()
    };
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        ensure_dir(parent)?;
    }

    let json = export_json(ledger)?;
    write_atomic(&path, &json)?;

    info!(path = %path.display(), count = ledger.len(), "ledger exported");
    Ok(path)
}
