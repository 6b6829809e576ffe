use tracing::{debug, info};
use uuid::Uuid;

use crate::core::errors::BudgetError;
use crate::core::services::ServiceResult;
use crate::ledger::{Ledger, Transaction};

/// Mutating operations on a ledger, with logging at each change.
pub struct TransactionService;

impl TransactionService {
    pub fn add(ledger: &mut Ledger, transaction: Transaction) -> ServiceResult<Uuid> {
        let id = ledger.add(transaction);
        info!(transaction_id = %id, count = ledger.len(), "transaction added");
        Ok(id)
    }

    pub fn replace(ledger: &mut Ledger, id: Uuid, transaction: Transaction) -> ServiceResult<()> {
        ledger.update(id, transaction)?;
        info!(transaction_id = %id, "transaction replaced");
        Ok(())
    }

    pub fn remove(ledger: &mut Ledger, id: Uuid) -> ServiceResult<Transaction> {
        let removed = ledger.remove(id)?;
        info!(transaction_id = %id, count = ledger.len(), "transaction removed");
        Ok(removed)
    }

    /// Positional replace, bounds-checked against the raw ledger.
    pub fn update_at(
        ledger: &mut Ledger,
        index: usize,
        transaction: Transaction,
    ) -> ServiceResult<()> {
        ledger.update_at(index, transaction)?;
        debug!(index, "transaction replaced by position");
        Ok(())
    }

    /// Positional delete, bounds-checked against the raw ledger.
    pub fn remove_at(ledger: &mut Ledger, index: usize) -> ServiceResult<Transaction> {
        let removed = ledger.remove_at(index)?;
        debug!(index, transaction_id = %removed.id, "transaction removed by position");
        Ok(removed)
    }
}
