use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::core::errors::BudgetError;

/// Fixed set of categories a transaction can be filed under.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    Salary,
    Groceries,
    Bills,
    Other,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Salary,
        Category::Groceries,
        Category::Bills,
        Category::Other,
    ];

    /// Lowercase token used in commands and the export format.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Salary => "salary",
            Category::Groceries => "groceries",
            Category::Bills => "bills",
            Category::Other => "other",
        }
    }

    /// Title-case label for prompts.
    pub fn label(self) -> &'static str {
        match self {
            Category::Salary => "Salary",
            Category::Groceries => "Groceries",
            Category::Bills => "Bills",
            Category::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = BudgetError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let normalized = input.trim().to_ascii_lowercase();
        Category::ALL
            .into_iter()
            .find(|candidate| candidate.as_str() == normalized)
            .ok_or_else(|| {
                BudgetError::InvalidInput(format!(
                    "unknown category `{}` (expected salary, groceries, bills, or other)",
                    input.trim()
                ))
            })
    }
}
