//! Derives the filtered view and its totals from a ledger and criteria.

use serde::Serialize;

use crate::ledger::{FilterCriteria, Ledger, Transaction};

/// Income, expense, and balance over a set of transactions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Totals {
    pub total_income: f64,
    pub total_expense: f64,
    pub balance: f64,
}

impl Totals {
    pub fn from_transactions<'a>(rows: impl IntoIterator<Item = &'a Transaction>) -> Self {
        let (total_income, total_expense) =
            rows.into_iter()
                .fold((0.0, 0.0), |(income, expense), txn| {
                    if txn.is_income() {
                        (income + txn.amount, expense)
                    } else {
                        (income, expense + txn.amount)
                    }
                });
        Self {
            total_income,
            total_expense,
            balance: total_income - total_expense,
        }
    }
}

/// The rows matching a set of criteria, in ledger order, plus their totals.
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredView<'a> {
    pub rows: Vec<&'a Transaction>,
    pub totals: Totals,
}

impl FilteredView<'_> {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Stateless aggregation over a ledger. Every call recomputes from scratch.
pub struct SummaryService;

impl SummaryService {
    pub fn filter<'a>(ledger: &'a Ledger, criteria: &FilterCriteria) -> Vec<&'a Transaction> {
        ledger.iter().filter(|txn| criteria.matches(txn)).collect()
    }

    pub fn view<'a>(ledger: &'a Ledger, criteria: &FilterCriteria) -> FilteredView<'a> {
        let rows = Self::filter(ledger, criteria);
        let totals = Totals::from_transactions(rows.iter().copied());
        FilteredView { rows, totals }
    }

    /// Totals across the whole ledger, ignoring any criteria.
    pub fn ledger_totals(ledger: &Ledger) -> Totals {
        Totals::from_transactions(ledger.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{Category, FilterField, TransactionType};
    use chrono::NaiveDate;

    fn txn(
        y: i32,
        m: u32,
        d: u32,
        amount: f64,
        kind: TransactionType,
        category: Category,
    ) -> Transaction {
        Transaction::new(
            NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            amount,
            kind,
            category,
        )
    }

    fn salary_and_groceries() -> Ledger {
        let mut ledger = Ledger::new();
        ledger.add(txn(2024, 1, 1, 1000.0, TransactionType::Income, Category::Salary));
        ledger.add(txn(2024, 1, 5, 200.0, TransactionType::Expense, Category::Groceries));
        ledger
    }

    fn mixed_ledger() -> Ledger {
        let mut ledger = salary_and_groceries();
        ledger.add(txn(2024, 2, 1, 1000.0, TransactionType::Income, Category::Salary));
        ledger.add(txn(2024, 2, 3, 80.5, TransactionType::Expense, Category::Bills));
        ledger.add(txn(2024, 2, 9, 12.25, TransactionType::Income, Category::Other));
        ledger.add(txn(2024, 3, 1, 45.0, TransactionType::Expense, Category::Groceries));
        ledger
    }

    #[test]
    fn expense_filter_scenario() {
        let ledger = salary_and_groceries();
        let mut criteria = FilterCriteria::all();
        criteria.set(FilterField::Type, "expense").unwrap();

        let view = SummaryService::view(&ledger, &criteria);

        assert_eq!(view.rows, vec![&ledger.transactions[1]]);
        assert_eq!(view.totals.total_income, 0.0);
        assert_eq!(view.totals.total_expense, 200.0);
        assert_eq!(view.totals.balance, -200.0);
    }

    #[test]
    fn unset_criteria_return_whole_ledger() {
        let ledger = mixed_ledger();
        let view = SummaryService::view(&ledger, &FilterCriteria::all());
        let expected: Vec<&Transaction> = ledger.iter().collect();
        assert_eq!(view.rows, expected);
        assert_eq!(view.totals, SummaryService::ledger_totals(&ledger));
    }

    #[test]
    fn filtered_rows_are_an_ordered_subsequence() {
        let ledger = mixed_ledger();
        let mut criteria = FilterCriteria::all();
        criteria.set(FilterField::StartDate, "2024-01-05").unwrap();
        criteria.set(FilterField::EndDate, "2024-02-28").unwrap();

        let view = SummaryService::view(&ledger, &criteria);
        let positions: Vec<usize> = view
            .rows
            .iter()
            .map(|row| ledger.position(row.id).unwrap())
            .collect();

        assert_eq!(positions, vec![1, 2, 3, 4]);
        assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn balance_is_income_minus_expense_for_any_criteria() {
        let ledger = mixed_ledger();
        let mut criteria_sets = vec![FilterCriteria::all()];
        for (field, value) in [
            (FilterField::Type, "income"),
            (FilterField::Type, "expense"),
            (FilterField::Category, "groceries"),
            (FilterField::StartDate, "2024-02-01"),
            (FilterField::EndDate, "2024-01-31"),
        ] {
            let mut criteria = FilterCriteria::all();
            criteria.set(field, value).unwrap();
            criteria_sets.push(criteria);
        }

        for criteria in criteria_sets {
            let totals = SummaryService::view(&ledger, &criteria).totals;
            assert_eq!(totals.total_income - totals.total_expense, totals.balance);
        }
    }

    #[test]
    fn category_and_type_combine() {
        let ledger = mixed_ledger();
        let mut criteria = FilterCriteria::all();
        criteria.set(FilterField::Type, "income").unwrap();
        criteria.set(FilterField::Category, "salary").unwrap();

        let view = SummaryService::view(&ledger, &criteria);
        assert_eq!(view.len(), 2);
        assert_eq!(view.totals.total_income, 2000.0);
        assert_eq!(view.totals.balance, 2000.0);
    }

    #[test]
    fn inverted_date_range_yields_empty_view() {
        let ledger = mixed_ledger();
        let mut criteria = FilterCriteria::all();
        criteria.set(FilterField::StartDate, "2024-03-01").unwrap();
        criteria.set(FilterField::EndDate, "2024-01-01").unwrap();

        let view = SummaryService::view(&ledger, &criteria);
        assert!(view.is_empty());
        assert_eq!(view.totals, Totals::default());
    }

    #[test]
    fn empty_ledger_has_zero_totals() {
        let ledger = Ledger::new();
        let view = SummaryService::view(&ledger, &FilterCriteria::all());
        assert!(view.is_empty());
        assert_eq!(view.totals.balance, 0.0);
    }
}
