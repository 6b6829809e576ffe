//! One-shot JSON export of a ledger. The ledger itself is never persisted.

pub mod export;

pub use export::{export_json, export_ledger, ExportRecord, EXPORT_FILE_NAME};
