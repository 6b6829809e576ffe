use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::transaction::Transaction;
use crate::core::errors::{BudgetError, Result};

/// Ordered collection of every transaction entered during a session.
///
/// Insertion order is preserved. Replacements keep their slot and deletions
/// shift later entries left.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Ledger {
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `transaction` and returns its id.
    pub fn add(&mut self, transaction: Transaction) -> Uuid {
        let id = transaction.id;
        self.transactions.push(transaction);
        id
    }

    /// Replaces the entry at `index`. The replacement inherits the id of the
    /// entry it overwrites.
    pub fn update_at(&mut self, index: usize, transaction: Transaction) -> Result<()> {
        let len = self.transactions.len();
        let slot = self
            .transactions
            .get_mut(index)
            .ok_or(BudgetError::IndexOutOfRange { index, len })?;
        let id = slot.id;
        *slot = transaction.with_id(id);
        Ok(())
    }

    /// Removes and returns the entry at `index`.
    pub fn remove_at(&mut self, index: usize) -> Result<Transaction> {
        let len = self.transactions.len();
        if index >= len {
            return Err(BudgetError::IndexOutOfRange { index, len });
        }
        Ok(self.transactions.remove(index))
    }

    pub fn update(&mut self, id: Uuid, transaction: Transaction) -> Result<()> {
        let index = self
            .position(id)
            .ok_or(BudgetError::TransactionNotFound(id))?;
        self.update_at(index, transaction)
    }

    pub fn remove(&mut self, id: Uuid) -> Result<Transaction> {
        let index = self
            .position(id)
            .ok_or(BudgetError::TransactionNotFound(id))?;
        self.remove_at(index)
    }

    pub fn position(&self, id: Uuid) -> Option<usize> {
        self.transactions.iter().position(|txn| txn.id == id)
    }

    pub fn get(&self, id: Uuid) -> Option<&Transaction> {
        self.transactions.iter().find(|txn| txn.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Transaction> {
        self.transactions.iter()
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}
