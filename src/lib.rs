#![doc(test(attr(deny(warnings))))]

//! Budget Form keeps a single session's income and expense transactions in
//! memory, derives filtered views and totals from them, and exports the full
//! ledger as JSON.

pub mod cli;
pub mod config;
pub mod core;
pub mod ledger;
pub mod session;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Budget Form tracing initialized.");
    });
}
