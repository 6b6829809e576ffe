//! Interactive prompts that fill the transaction form field by field.

use dialoguer::{theme::ColorfulTheme, Input, Select};

use crate::cli::core::CommandError;
use crate::ledger::{parse_date, Category, TransactionType};
use crate::session::{parse_amount, TransactionForm};

/// Lifecycle of a prompt run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormResult<T> {
    Completed(T),
    Cancelled,
}

/// Walks the user through every form field, starting from `initial`.
pub struct TransactionWizard<'a> {
    theme: &'a ColorfulTheme,
    initial: TransactionForm,
}

impl<'a> TransactionWizard<'a> {
    pub fn new(theme: &'a ColorfulTheme, initial: &TransactionForm) -> Self {
        Self {
            theme,
            initial: initial.clone(),
        }
    }

    pub fn run(self) -> Result<FormResult<TransactionForm>, CommandError> {
        let date = self.text(
            "Date (YYYY-MM-DD)",
            &self.initial.date,
            |input| parse_date(input).map(|_| ()).map_err(|err| err.to_string()),
        )?;
        let amount = self.text("Amount", &self.initial.amount, |input| {
            parse_amount(input).map(|_| ()).map_err(|err| err.to_string())
        })?;

        let kind_labels: Vec<&str> = TransactionType::ALL.iter().map(|k| k.label()).collect();
        let kind_default = TransactionType::ALL
            .iter()
            .position(|kind| *kind == self.initial.kind)
            .unwrap_or(0);
        let Some(kind_idx) = self.choose("Type", &kind_labels, kind_default)? else {
            return Ok(FormResult::Cancelled);
        };

        let category_labels: Vec<&str> = Category::ALL.iter().map(|c| c.label()).collect();
        let category_default = Category::ALL
            .iter()
            .position(|category| *category == self.initial.category)
            .unwrap_or(0);
        let Some(category_idx) = self.choose("Category", &category_labels, category_default)?
        else {
            return Ok(FormResult::Cancelled);
        };

        Ok(FormResult::Completed(TransactionForm {
            date,
            amount,
            kind: TransactionType::ALL[kind_idx],
            category: Category::ALL[category_idx],
        }))
    }

    fn text<F>(&self, prompt: &str, initial: &str, check: F) -> Result<String, CommandError>
    where
        F: Fn(&str) -> Result<(), String>,
    {
        let mut input = Input::<String>::with_theme(self.theme)
            .with_prompt(prompt)
            .validate_with(|value: &String| -> Result<(), String> {
                if value.trim().is_empty() {
                    Err(format!("{} is required", prompt))
                } else {
                    check(value)
                }
            });
        if !initial.is_empty() {
            input = input.with_initial_text(initial.to_string());
        }
        let value = input.interact_text().map_err(CommandError::from)?;
        Ok(value.trim().to_string())
    }

    fn choose(
        &self,
        prompt: &str,
        items: &[&str],
        default: usize,
    ) -> Result<Option<usize>, CommandError> {
        Select::with_theme(self.theme)
            .with_prompt(prompt)
            .items(items)
            .default(default)
            .interact_opt()
            .map_err(CommandError::from)
    }
}
