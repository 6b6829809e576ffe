//! Error types, path helpers, and the stateless services that operate on a
//! [`Ledger`](crate::ledger::Ledger).

pub mod errors;
pub mod services;
pub mod utils;
