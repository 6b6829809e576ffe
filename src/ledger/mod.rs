//! Ledger domain models: transactions, their closed enums, the ledger itself,
//! and the criteria used to filter it.

pub mod category;
pub mod criteria;
#[allow(clippy::module_inception)]
pub mod ledger;
pub mod transaction;

pub use category::Category;
pub use criteria::{parse_date, FilterCriteria, FilterField};
pub use ledger::Ledger;
pub use transaction::{Transaction, TransactionType};
