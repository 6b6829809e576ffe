use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::category::Category;
use crate::core::errors::BudgetError;

/// A single income or expense entry.
///
/// `id` is assigned at creation and survives edits, so mutations can be keyed
/// by identity instead of by position in whatever view is on screen.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub id: Uuid,
    pub date: NaiveDate,
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub category: Category,
}

impl Transaction {
    pub fn new(date: NaiveDate, amount: f64, kind: TransactionType, category: Category) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            amount,
            kind,
            category,
        }
    }

    pub fn is_income(&self) -> bool {
        self.kind == TransactionType::Income
    }

    /// Returns a copy carrying `id` instead of the freshly generated one.
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }
}

/// Direction of money flow for a transaction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    #[default]
    Income,
    Expense,
}

impl TransactionType {
    pub const ALL: [TransactionType; 2] = [TransactionType::Income, TransactionType::Expense];

    pub fn as_str(self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TransactionType::Income => "Income",
            TransactionType::Expense => "Expense",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = BudgetError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            other => Err(BudgetError::InvalidInput(format!(
                "unknown transaction type `{}` (expected income or expense)",
                other
            ))),
        }
    }
}
