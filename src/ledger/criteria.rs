use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{category::Category, transaction::Transaction, transaction::TransactionType};
use crate::core::errors::{BudgetError, Result};

/// Predicate narrowing the ledger down to the rows shown to the user.
///
/// `None` means "all" for the enum fields and "unbounded" for the dates.
/// Both date bounds are inclusive.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FilterCriteria {
    pub kind: Option<TransactionType>,
    pub category: Option<Category>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl FilterCriteria {
    /// Criteria that match every transaction.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn is_unset(&self) -> bool {
        *self == Self::default()
    }

    pub fn matches(&self, txn: &Transaction) -> bool {
        self.kind.map_or(true, |kind| txn.kind == kind)
            && self.category.map_or(true, |category| txn.category == category)
            && self.start_date.map_or(true, |start| txn.date >= start)
            && self.end_date.map_or(true, |end| txn.date <= end)
    }

    /// Updates one field from user text. `all`, `any`, `-`, and the empty
    /// string clear the field.
    pub fn set(&mut self, field: FilterField, value: &str) -> Result<()> {
        let value = value.trim();
        let clear = is_clear_token(value);
        match field {
            FilterField::Type => {
                self.kind = if clear { None } else { Some(value.parse()?) };
            }
            FilterField::Category => {
                self.category = if clear { None } else { Some(value.parse()?) };
            }
            FilterField::StartDate => {
                self.start_date = if clear { None } else { Some(parse_date(value)?) };
            }
            FilterField::EndDate => {
                self.end_date = if clear { None } else { Some(parse_date(value)?) };
            }
        }
        Ok(())
    }

    /// Replaces every field with its unset value.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl fmt::Display for FilterCriteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = self.kind.map_or("all", TransactionType::as_str);
        let category = self.category.map_or("all", Category::as_str);
        let start = self
            .start_date
            .map_or_else(|| "any".to_string(), |date| date.to_string());
        let end = self
            .end_date
            .map_or_else(|| "any".to_string(), |date| date.to_string());
        write!(
            f,
            "type={} category={} from={} to={}",
            kind, category, start, end
        )
    }
}

/// Names the individually editable criteria fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    Type,
    Category,
    StartDate,
    EndDate,
}

impl FromStr for FilterField {
    type Err = BudgetError;

    fn from_str(input: &str) -> std::result::Result<Self, Self::Err> {
        match input.trim().to_ascii_lowercase().as_str() {
            "type" => Ok(FilterField::Type),
            "category" => Ok(FilterField::Category),
            "from" | "start" | "start-date" | "startdate" => Ok(FilterField::StartDate),
            "to" | "end" | "end-date" | "enddate" => Ok(FilterField::EndDate),
            other => Err(BudgetError::InvalidInput(format!(
                "unknown filter field `{}` (expected type, category, from, or to)",
                other
            ))),
        }
    }
}

fn is_clear_token(value: &str) -> bool {
    value.is_empty()
        || value.eq_ignore_ascii_case("all")
        || value.eq_ignore_ascii_case("any")
        || value == "-"
}

/// Parses an ISO 8601 calendar date (`YYYY-MM-DD`).
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").map_err(|_| {
        BudgetError::InvalidInput(format!("invalid date `{}` (use YYYY-MM-DD)", input.trim()))
    })
}
