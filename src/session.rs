//! Explicit session state and the transitions a user can drive.
//!
//! A [`Session`] owns the ledger, the active filter criteria, the pending
//! form, and the edit cursor. Every user action maps to one method here, so
//! the transition rules can be exercised without any terminal in the loop.

use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use tracing::debug;
use uuid::Uuid;

use crate::core::errors::{BudgetError, Result};
use crate::core::services::{FilteredView, SummaryService, TransactionService};
use crate::ledger::{
    parse_date, Category, FilterCriteria, FilterField, Ledger, Transaction, TransactionType,
};

/// Raw values of the entry form. Text fields stay unparsed until submit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionForm {
    pub date: String,
    pub amount: String,
    pub kind: TransactionType,
    pub category: Category,
}

impl TransactionForm {
    pub fn from_transaction(txn: &Transaction) -> Self {
        Self {
            date: txn.date.format("%Y-%m-%d").to_string(),
            amount: txn.amount.to_string(),
            kind: txn.kind,
            category: txn.category,
        }
    }

    /// Sets one field. Enum fields are checked immediately; text fields are
    /// checked on submit.
    pub fn set(&mut self, field: FormField, value: &str) -> Result<()> {
        let value = value.trim();
        match field {
            FormField::Date => self.date = value.to_string(),
            FormField::Amount => self.amount = value.to_string(),
            FormField::Type => self.kind = value.parse()?,
            FormField::Category => self.category = value.parse()?,
        }
        Ok(())
    }

    /// Validates the form and builds the transaction it describes.
    pub fn to_transaction(&self) -> Result<Transaction> {
        if self.date.trim().is_empty() {
            return Err(BudgetError::MissingField("date"));
        }
        if self.amount.trim().is_empty() {
            return Err(BudgetError::MissingField("amount"));
        }
        let date: NaiveDate = parse_date(&self.date)?;
        let amount = parse_amount(&self.amount)?;
        Ok(Transaction::new(date, amount, self.kind, self.category))
    }

    pub fn is_blank(&self) -> bool {
        *self == Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl fmt::Display for TransactionForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let date = if self.date.is_empty() { "<unset>" } else { &self.date };
        let amount = if self.amount.is_empty() { "<unset>" } else { &self.amount };
        write!(
            f,
            "date={} amount={} type={} category={}",
            date, amount, self.kind, self.category
        )
    }
}

/// Parses a form amount. Non-numeric, non-finite, and negative values are
/// rejected; zero is allowed.
pub fn parse_amount(input: &str) -> Result<f64> {
    let trimmed = input.trim();
    let amount = trimmed
        .parse::<f64>()
        .map_err(|_| BudgetError::InvalidInput(format!("amount `{}` is not a number", trimmed)))?;
    if !amount.is_finite() {
        return Err(BudgetError::InvalidInput(format!(
            "amount `{}` must be a finite number",
            trimmed
        )));
    }
    if amount < 0.0 {
        return Err(BudgetError::InvalidInput(format!(
            "amount `{}` must not be negative; use the expense type instead",
            trimmed
        )));
    }
    Ok(amount)
}

/// Names the fields of [`TransactionForm`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Date,
    Amount,
    Type,
    Category,
}

impl FormField {
    pub const ALL: [FormField; 4] = [
        FormField::Date,
        FormField::Amount,
        FormField::Type,
        FormField::Category,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FormField::Date => "date",
            FormField::Amount => "amount",
            FormField::Type => "type",
            FormField::Category => "category",
        }
    }
}

impl FromStr for FormField {
    type Err = BudgetError;

    fn from_str(input: &str) -> std::result::Result<Self, Self::Err> {
        let normalized = input.trim().to_ascii_lowercase();
        FormField::ALL
            .into_iter()
            .find(|field| field.as_str() == normalized)
            .ok_or_else(|| {
                BudgetError::InvalidInput(format!(
                    "unknown form field `{}` (expected date, amount, type, or category)",
                    input.trim()
                ))
            })
    }
}

/// Whether the form creates a new entry or rewrites an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditState {
    #[default]
    Idle,
    Editing(Uuid),
}

/// Result of a successful [`Session::submit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Added(Uuid),
    Updated(Uuid),
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    ledger: Ledger,
    criteria: FilterCriteria,
    form: TransactionForm,
    edit: EditState,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ledger(ledger: Ledger) -> Self {
        Self {
            ledger,
            ..Self::default()
        }
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn form(&self) -> &TransactionForm {
        &self.form
    }

    pub fn edit_state(&self) -> EditState {
        self.edit
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.edit, EditState::Editing(_))
    }

    pub fn set_form_field(&mut self, field: FormField, value: &str) -> Result<()> {
        self.form.set(field, value)
    }

    /// Loads an existing entry into the form and switches to editing.
    pub fn begin_edit(&mut self, id: Uuid) -> Result<()> {
        let txn = self
            .ledger
            .get(id)
            .ok_or(BudgetError::TransactionNotFound(id))?;
        self.form = TransactionForm::from_transaction(txn);
        self.edit = EditState::Editing(id);
        debug!(transaction_id = %id, "editing started");
        Ok(())
    }

    /// Commits the form. Nothing changes when validation fails.
    pub fn submit(&mut self) -> Result<SubmitOutcome> {
        let transaction = self.form.to_transaction()?;
        let outcome = match self.edit {
            EditState::Idle => {
                SubmitOutcome::Added(TransactionService::add(&mut self.ledger, transaction)?)
            }
            EditState::Editing(id) => {
                TransactionService::replace(&mut self.ledger, id, transaction)?;
                SubmitOutcome::Updated(id)
            }
        };
        self.form.reset();
        self.edit = EditState::Idle;
        Ok(outcome)
    }

    pub fn cancel_edit(&mut self) {
        if let EditState::Editing(id) = self.edit {
            debug!(transaction_id = %id, "editing cancelled");
        }
        self.edit = EditState::Idle;
        self.form.reset();
    }

    /// Removes an entry. Deleting the entry under edit ends the edit.
    pub fn delete(&mut self, id: Uuid) -> Result<Transaction> {
        let removed = TransactionService::remove(&mut self.ledger, id)?;
        if self.edit == EditState::Editing(id) {
            self.edit = EditState::Idle;
            self.form.reset();
        }
        Ok(removed)
    }

    pub fn set_filter(&mut self, field: FilterField, value: &str) -> Result<()> {
        self.criteria.set(field, value)?;
        debug!(criteria = %self.criteria, "filter updated");
        Ok(())
    }

    pub fn reset_filter(&mut self) {
        self.criteria.reset();
        debug!("filter reset");
    }

    /// The filtered rows and totals for the current state.
    pub fn view(&self) -> FilteredView<'_> {
        SummaryService::view(&self.ledger, &self.criteria)
    }

    /// Maps a user reference to a stable id.
    ///
    /// A number is a 1-based row of the current filtered view; when no such
    /// row exists it is tried as an id prefix, since short ids can be all
    /// digits. `@` forces id matching. Anything else is matched as a full id
    /// or a unique id prefix across the whole ledger.
    pub fn resolve(&self, reference: &str) -> Result<Uuid> {
        let reference = reference.trim();
        if let Some(id) = reference.strip_prefix('@') {
            return self.resolve_id(id);
        }
        let reference = reference.trim_start_matches('#');
        if reference.is_empty() {
            return Err(BudgetError::InvalidInput(
                "expected a row number or transaction id".into(),
            ));
        }

        let Ok(row) = reference.parse::<usize>() else {
            return self.resolve_id(reference);
        };
        let view = self.view();
        if let Some(txn) = row.checked_sub(1).and_then(|index| view.rows.get(index)) {
            return Ok(txn.id);
        }
        self.resolve_id(reference).map_err(|_| {
            BudgetError::InvalidInput(format!(
                "row {} is not in the current view ({} shown)",
                row,
                view.len()
            ))
        })
    }

    fn resolve_id(&self, reference: &str) -> Result<Uuid> {
        if let Ok(id) = Uuid::parse_str(reference) {
            return self
                .ledger
                .get(id)
                .map(|txn| txn.id)
                .ok_or(BudgetError::TransactionNotFound(id));
        }

        let prefix = reference.to_ascii_lowercase();
        if prefix.is_empty() {
            return Err(BudgetError::InvalidInput("expected a transaction id".into()));
        }
        let mut matches = self
            .ledger
            .iter()
            .filter(|txn| txn.id.simple().to_string().starts_with(&prefix));
        match (matches.next(), matches.next()) {
            (Some(txn), None) => Ok(txn.id),
            (Some(_), Some(_)) => Err(BudgetError::InvalidInput(format!(
                "id prefix `{}` is ambiguous",
                reference
            ))),
            (None, _) => Err(BudgetError::InvalidInput(format!(
                "no transaction matches `{}`",
                reference
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill(session: &mut Session, date: &str, amount: &str, kind: &str, category: &str) {
        session.set_form_field(FormField::Date, date).unwrap();
        session.set_form_field(FormField::Amount, amount).unwrap();
        session.set_form_field(FormField::Type, kind).unwrap();
        session.set_form_field(FormField::Category, category).unwrap();
    }

    fn add(session: &mut Session, date: &str, amount: &str, kind: &str, category: &str) -> Uuid {
        fill(session, date, amount, kind, category);
        match session.submit().unwrap() {
            SubmitOutcome::Added(id) => id,
            other => panic!("expected an add, got {:?}", other),
        }
    }

    fn scenario_session() -> Session {
        let mut session = Session::new();
        add(&mut session, "2024-01-01", "1000", "income", "salary");
        add(&mut session, "2024-01-05", "200", "expense", "groceries");
        session
    }

    #[test]
    fn new_session_is_idle_with_default_form() {
        let session = Session::new();
        assert_eq!(session.edit_state(), EditState::Idle);
        assert!(session.form().is_blank());
        assert_eq!(session.form().kind, TransactionType::Income);
        assert_eq!(session.form().category, Category::Salary);
        assert!(session.criteria().is_unset());
    }

    #[test]
    fn submit_appends_and_resets_form() {
        let session = scenario_session();
        assert_eq!(session.ledger().len(), 2);
        assert!(session.form().is_blank());
        assert_eq!(session.ledger().transactions[1].amount, 200.0);
    }

    #[test]
    fn missing_required_fields_block_submit() {
        let mut session = Session::new();
        session.set_form_field(FormField::Amount, "5").unwrap();
        assert!(matches!(
            session.submit(),
            Err(BudgetError::MissingField("date"))
        ));

        session.set_form_field(FormField::Date, "2024-01-01").unwrap();
        session.set_form_field(FormField::Amount, "  ").unwrap();
        assert!(matches!(
            session.submit(),
            Err(BudgetError::MissingField("amount"))
        ));
        assert!(session.ledger().is_empty());
        assert_eq!(session.form().date, "2024-01-01");
    }

    #[test]
    fn amount_policy_rejects_non_numeric_non_finite_and_negative() {
        for bad in ["abc", "NaN", "inf", "-5", "1,5"] {
            assert!(parse_amount(bad).is_err(), "{bad} should be rejected");
        }
        assert_eq!(parse_amount("0").unwrap(), 0.0);
        assert_eq!(parse_amount(" 12.34 ").unwrap(), 12.34);
    }

    #[test]
    fn invalid_amount_leaves_session_unchanged() {
        let mut session = Session::new();
        fill(&mut session, "2024-01-01", "ten", "income", "salary");
        assert!(session.submit().is_err());
        assert!(session.ledger().is_empty());
        assert_eq!(session.form().amount, "ten");
    }

    #[test]
    fn enum_fields_validate_on_set() {
        let mut session = Session::new();
        assert!(session.set_form_field(FormField::Type, "transfer").is_err());
        assert!(session.set_form_field(FormField::Category, "rent").is_err());
        assert_eq!(session.form().kind, TransactionType::Income);
        assert!("memo".parse::<FormField>().is_err());
    }

    #[test]
    fn edit_replaces_in_place_and_returns_to_idle() {
        let mut session = scenario_session();
        let target = session.ledger().transactions[0].id;

        session.begin_edit(target).unwrap();
        assert_eq!(session.edit_state(), EditState::Editing(target));
        assert_eq!(session.form().date, "2024-01-01");
        assert_eq!(session.form().amount, "1000");

        session.set_form_field(FormField::Amount, "1250.50").unwrap();
        assert_eq!(session.submit().unwrap(), SubmitOutcome::Updated(target));

        assert_eq!(session.edit_state(), EditState::Idle);
        assert_eq!(session.ledger().len(), 2);
        assert_eq!(session.ledger().transactions[0].id, target);
        assert_eq!(session.ledger().transactions[0].amount, 1250.5);
    }

    #[test]
    fn cancel_discards_pending_changes() {
        let mut session = scenario_session();
        let before = session.ledger().clone();
        let target = before.transactions[1].id;

        session.begin_edit(target).unwrap();
        session.set_form_field(FormField::Amount, "999").unwrap();
        session.cancel_edit();

        assert_eq!(session.edit_state(), EditState::Idle);
        assert!(session.form().is_blank());
        assert_eq!(session.ledger(), &before);
    }

    #[test]
    fn begin_edit_unknown_id_keeps_state() {
        let mut session = scenario_session();
        assert!(session.begin_edit(Uuid::new_v4()).is_err());
        assert_eq!(session.edit_state(), EditState::Idle);
    }

    #[test]
    fn deleting_the_record_under_edit_ends_the_edit() {
        let mut session = scenario_session();
        let target = session.ledger().transactions[1].id;
        session.begin_edit(target).unwrap();

        session.delete(target).unwrap();

        assert_eq!(session.edit_state(), EditState::Idle);
        assert!(session.form().is_blank());
        assert_eq!(session.ledger().len(), 1);
    }

    #[test]
    fn deleting_another_record_keeps_the_edit() {
        let mut session = scenario_session();
        let first = session.ledger().transactions[0].id;
        let second = session.ledger().transactions[1].id;
        session.begin_edit(second).unwrap();

        session.delete(first).unwrap();
        session.set_form_field(FormField::Category, "bills").unwrap();
        assert_eq!(session.submit().unwrap(), SubmitOutcome::Updated(second));
        assert_eq!(session.ledger().transactions[0].category, Category::Bills);
    }

    #[test]
    fn expense_filter_scenario() {
        let mut session = scenario_session();
        session.set_filter(FilterField::Type, "expense").unwrap();

        let view = session.view();
        assert_eq!(view.len(), 1);
        assert_eq!(view.rows[0].category, Category::Groceries);
        assert_eq!(view.totals.total_income, 0.0);
        assert_eq!(view.totals.total_expense, 200.0);
        assert_eq!(view.totals.balance, -200.0);
    }

    #[test]
    fn edited_record_leaves_view_but_stays_in_ledger() {
        let mut session = scenario_session();
        session.set_filter(FilterField::Category, "groceries").unwrap();
        let target = session.resolve("1").unwrap();

        session.begin_edit(target).unwrap();
        session.set_form_field(FormField::Category, "bills").unwrap();
        session.submit().unwrap();

        assert!(session.view().is_empty());
        assert_eq!(session.ledger().len(), 2);
        assert_eq!(session.ledger().get(target).unwrap().category, Category::Bills);
    }

    #[test]
    fn reset_filter_shows_whole_ledger() {
        let mut session = scenario_session();
        session.set_filter(FilterField::Type, "income").unwrap();
        session.set_filter(FilterField::EndDate, "2023-12-31").unwrap();
        assert!(session.view().is_empty());

        session.reset_filter();
        let view = session.view();
        let all: Vec<&Transaction> = session.ledger().iter().collect();
        assert_eq!(view.rows, all);
    }

    #[test]
    fn rows_resolve_against_the_filtered_view() {
        let mut session = scenario_session();
        let groceries = session.ledger().transactions[1].id;
        session.set_filter(FilterField::Type, "expense").unwrap();

        assert_eq!(session.resolve("1").unwrap(), groceries);
        assert_eq!(session.resolve("#1").unwrap(), groceries);
        assert!(session.resolve("2").is_err());
        assert!(session.resolve("0").is_err());

        session.delete(session.resolve("1").unwrap()).unwrap();
        assert_eq!(session.ledger().len(), 1);
        assert_eq!(
            session.ledger().transactions[0].category,
            Category::Salary
        );
    }

    #[test]
    fn ids_resolve_by_full_value_and_prefix() {
        let session = scenario_session();
        let id = session.ledger().transactions[0].id;

        assert_eq!(session.resolve(&id.to_string()).unwrap(), id);
        let prefix: String = id.simple().to_string().chars().take(12).collect();
        assert_eq!(session.resolve(&prefix).unwrap(), id);
        assert_eq!(session.resolve(&format!("@{}", prefix)).unwrap(), id);
        assert!(session.resolve(&Uuid::new_v4().to_string()).is_err());
        assert!(session.resolve("zzzz").is_err());
        assert!(session.resolve("").is_err());
    }

    #[test]
    fn all_digit_short_ids_still_resolve() {
        let digits = Uuid::parse_str("12345678-9abc-4def-8123-456789abcdef").unwrap();
        let row_like = Uuid::parse_str("00000001-0000-4000-8000-000000000000").unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let mut ledger = Ledger::new();
        ledger.add(
            Transaction::new(date, 10.0, TransactionType::Expense, Category::Bills)
                .with_id(row_like),
        );
        ledger.add(
            Transaction::new(date, 1000.0, TransactionType::Income, Category::Salary)
                .with_id(digits),
        );
        let session = Session::with_ledger(ledger);

        assert_eq!(session.resolve("12345678").unwrap(), digits);
        assert_eq!(session.resolve("@00000001").unwrap(), row_like);
        // A row in range wins over an id prefix.
        assert_eq!(session.resolve("1").unwrap(), row_like);
        assert_eq!(session.resolve("2").unwrap(), digits);

        let err = session.resolve("99999999").unwrap_err();
        assert!(err.to_string().contains("row 99999999 is not in the current view (2 shown)"));
        assert!(session.resolve("@").is_err());
    }

    #[test]
    fn length_tracks_adds_minus_deletes() {
        let mut session = Session::new();
        let mut adds = 0;
        let mut deletes = 0;
        for day in 1..=9 {
            add(
                &mut session,
                &format!("2024-03-0{}", day),
                "10",
                "expense",
                "other",
            );
            adds += 1;
            if day % 2 == 0 {
                let id = session.resolve("1").unwrap();
                session.delete(id).unwrap();
                deletes += 1;
            } else {
                let id = session.resolve("1").unwrap();
                session.begin_edit(id).unwrap();
                session.set_form_field(FormField::Amount, "11").unwrap();
                session.submit().unwrap();
            }
        }
        assert_eq!(session.ledger().len(), adds - deletes);
    }

    #[test]
    fn add_then_delete_restores_prior_state() {
        let mut session = scenario_session();
        let before = session.ledger().clone();
        let id = add(&mut session, "2024-02-02", "5", "expense", "bills");
        session.delete(id).unwrap();
        assert_eq!(session.ledger(), &before);
    }
}
