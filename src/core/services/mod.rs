pub mod summary_service;
pub mod transaction_service;

pub use summary_service::{FilteredView, SummaryService, Totals};
pub use transaction_service::TransactionService;

use crate::core::errors::BudgetError;

pub type ServiceResult<T> = Result<T, BudgetError>;
