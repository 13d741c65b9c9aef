use serde::Serialize;
use std::collections::BTreeMap;

use crate::domain::{Category, Cents, Expense};

/// Sum of amounts per category name, as stored on each expense.
/// Categories with no matching expense are absent from the result. Sums saturate
/// at the `Cents` bounds.
pub fn category_totals<'a>(
    expenses: impl IntoIterator<Item = &'a Expense>,
) -> BTreeMap<String, Cents> {
    let mut totals = BTreeMap::new();
    for expense in expenses {
        let sum = totals.entry(expense.category().to_string()).or_insert(0);
        *sum = Cents::saturating_add(*sum, expense.amount_cents());
    }
    totals
}

/// Sum of all amounts, saturating at the `Cents` bounds.
pub fn total<'a>(expenses: impl IntoIterator<Item = &'a Expense>) -> Cents {
    expenses
        .into_iter()
        .map(Expense::amount_cents)
        .fold(0, Cents::saturating_add)
}

fn share(amount: Cents, max: Cents) -> f64 {
    if max > 0 {
        amount as f64 / max as f64
    } else {
        0.0
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CategorySummary {
    pub category: Category,
    pub total: Cents,
    pub count: usize,
    /// Share of the grand total, 0-100
    pub percentage: f64,
    /// Total relative to the largest category total, 0.0-1.0 (for bar rendering)
    pub share_of_max: f64,
}

/// Spending per fixed category, default-filled with zero.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryReport {
    pub categories: Vec<CategorySummary>,
    /// Spending recorded under names outside the fixed category set
    pub other: Cents,
    pub total: Cents,
}

impl CategoryReport {
    pub fn build<'a>(expenses: impl IntoIterator<Item = &'a Expense>) -> Self {
        let mut totals = BTreeMap::<&str, (Cents, usize)>::new();
        for expense in expenses {
            let entry = totals.entry(expense.category()).or_insert((0, 0));
            entry.0 = entry.0.saturating_add(expense.amount_cents());
            entry.1 += 1;
        }

        let total = totals
            .values()
            .map(|(amount, _)| *amount)
            .fold(0, Cents::saturating_add);
        let max = totals.values().map(|(amount, _)| *amount).max().unwrap_or(0);

        let categories: Vec<CategorySummary> = Category::ALL
            .into_iter()
            .map(|category| {
                let (amount, count) = totals.get(category.as_str()).copied().unwrap_or((0, 0));
                CategorySummary {
                    category,
                    total: amount,
                    count,
                    percentage: if total == 0 {
                        0.0
                    } else {
                        amount as f64 / total as f64 * 100.0
                    },
                    share_of_max: share(amount, max),
                }
            })
            .collect();

        let fixed = categories
            .iter()
            .map(|c| c.total)
            .fold(0, Cents::saturating_add);

        Self {
            categories,
            other: total.saturating_sub(fixed),
            total,
        }
    }
}

/// Expenses of one calendar month with their total and per-category breakdown.
#[derive(Debug, Clone, Serialize)]
pub struct MonthlyReport<'a> {
    pub month: u32,
    pub year: i32,
    pub expenses: Vec<&'a Expense>,
    pub total: Cents,
    pub breakdown: BTreeMap<String, Cents>,
}

impl<'a> MonthlyReport<'a> {
    pub fn build(month: u32, year: i32, expenses: Vec<&'a Expense>) -> Self {
        let total = total(expenses.iter().copied());
        let breakdown = category_totals(expenses.iter().copied());
        Self {
            month,
            year,
            expenses,
            total,
            breakdown,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.expenses.is_empty()
    }
}

/// How large an expense is compared to the largest one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Intensity {
    /// More than 70% of the largest amount
    High,
    /// More than 30% of the largest amount
    Medium,
    Low,
}

impl Intensity {
    pub fn classify(amount: Cents, max: Cents) -> Self {
        let amount = i128::from(amount) * 10;
        let max = i128::from(max);
        if amount > max * 7 {
            Intensity::High
        } else if amount > max * 3 {
            Intensity::Medium
        } else {
            Intensity::Low
        }
    }
}

/// One bar of the per-expense chart.
#[derive(Debug, Clone, Serialize)]
pub struct ChartBar<'a> {
    pub expense: &'a Expense,
    pub share_of_max: f64,
    pub intensity: Intensity,
}

pub fn expense_chart<'a>(expenses: &'a [Expense]) -> Vec<ChartBar<'a>> {
    let max = expenses
        .iter()
        .map(Expense::amount_cents)
        .max()
        .unwrap_or(0);

    expenses
        .iter()
        .map(|expense| ChartBar {
            expense,
            share_of_max: share(expense.amount_cents(), max),
            intensity: Intensity::classify(expense.amount_cents(), max),
        })
        .collect()
}
