use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::{Category, Cents};

/// Advisory level of a category's spending against its budget limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetLevel {
    /// No limit set (limit <= 0)
    Unset,
    Safe,
    /// Spent more than 80% of the limit, but not more than the limit
    Nearing,
    Exceeded,
}

impl BudgetLevel {
    /// The single threshold rule shared by post-add alerts and budget overviews.
    pub fn evaluate(spent: Cents, limit: Cents) -> Self {
        if limit <= 0 {
            BudgetLevel::Unset
        } else if spent > limit {
            BudgetLevel::Exceeded
        } else if i128::from(spent) * 5 > i128::from(limit) * 4 {
            BudgetLevel::Nearing
        } else {
            BudgetLevel::Safe
        }
    }

    /// Whether this level should be reported to the user after an expense is added.
    pub fn is_alert(&self) -> bool {
        matches!(self, BudgetLevel::Nearing | BudgetLevel::Exceeded)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BudgetLevel::Unset => "unset",
            BudgetLevel::Safe => "safe",
            BudgetLevel::Nearing => "nearing",
            BudgetLevel::Exceeded => "exceeded",
        }
    }
}

impl fmt::Display for BudgetLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Spending against the limit for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetStatus {
    pub category: String,
    pub spent: Cents,
    pub limit: Cents,
    pub level: BudgetLevel,
}

impl BudgetStatus {
    pub fn new(category: impl Into<String>, spent: Cents, limit: Cents) -> Self {
        Self {
            category: category.into(),
            spent,
            limit,
            level: BudgetLevel::evaluate(spent, limit),
        }
    }

    pub fn remaining(&self) -> Cents {
        self.limit.saturating_sub(self.spent)
    }

    /// Fraction of the limit already spent; `None` when no limit is set.
    pub fn ratio(&self) -> Option<f64> {
        (self.limit > 0).then(|| self.spent as f64 / self.limit as f64)
    }
}

/// Budget limits keyed by category name.
///
/// A limit <= 0 means "no budget". Keys outside the fixed category set are kept
/// but not included in category sweeps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetMap {
    limits: BTreeMap<String, Cents>,
}

impl BudgetMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// A map holding a zero limit for every fixed category.
    pub fn with_defaults() -> Self {
        let mut map = Self::new();
        map.ensure_defaults();
        map
    }

    /// Insert a zero limit for each fixed category that has no entry yet.
    pub fn ensure_defaults(&mut self) {
        for category in Category::ALL {
            self.limits.entry(category.as_str().to_string()).or_insert(0);
        }
    }

    pub fn set(&mut self, category: impl Into<String>, limit: Cents) {
        self.limits.insert(category.into(), limit);
    }

    /// Limit for a category: exact key first, then a case-insensitive match; 0 if absent.
    pub fn get(&self, category: &str) -> Cents {
        if let Some(limit) = self.limits.get(category) {
            return *limit;
        }
        self.limits
            .iter()
            .find(|(name, _)| name.to_lowercase() == category.to_lowercase())
            .map(|(_, limit)| *limit)
            .unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.limits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.limits.is_empty()
    }

    /// Entries in persistence order: fixed categories first (display order), then
    /// any other keys sorted by name.
    pub fn entries(&self) -> Vec<(&str, Cents)> {
        let fixed = Category::ALL.iter().filter_map(|category| {
            self.limits
                .get_key_value(category.as_str())
                .map(|(name, limit)| (name.as_str(), *limit))
        });
        let extra = self
            .limits
            .iter()
            .filter(|(name, _)| !Category::ALL.iter().any(|c| c.as_str() == name.as_str()))
            .map(|(name, limit)| (name.as_str(), *limit));
        fixed.chain(extra).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_thresholds() {
        assert_eq!(BudgetLevel::evaluate(0, 10000), BudgetLevel::Safe);
        assert_eq!(BudgetLevel::evaluate(8000, 10000), BudgetLevel::Safe);
        assert_eq!(BudgetLevel::evaluate(8001, 10000), BudgetLevel::Nearing);
        assert_eq!(BudgetLevel::evaluate(8500, 10000), BudgetLevel::Nearing);
        // spent == limit is not exceeded
        assert_eq!(BudgetLevel::evaluate(10000, 10000), BudgetLevel::Nearing);
        assert_eq!(BudgetLevel::evaluate(10100, 10000), BudgetLevel::Exceeded);
        assert_eq!(BudgetLevel::evaluate(10001, 10000), BudgetLevel::Exceeded);
    }

    #[test]
    fn test_level_unset_regardless_of_spent() {
        assert_eq!(BudgetLevel::evaluate(0, 0), BudgetLevel::Unset);
        assert_eq!(BudgetLevel::evaluate(999999, 0), BudgetLevel::Unset);
        assert_eq!(BudgetLevel::evaluate(50, -100), BudgetLevel::Unset);
    }

    #[test]
    fn test_is_alert() {
        assert!(!BudgetLevel::Unset.is_alert());
        assert!(!BudgetLevel::Safe.is_alert());
        assert!(BudgetLevel::Nearing.is_alert());
        assert!(BudgetLevel::Exceeded.is_alert());
    }

    #[test]
    fn test_status_remaining_and_ratio() {
        let status = BudgetStatus::new("Food", 2500, 10000);
        assert_eq!(status.remaining(), 7500);
        assert_eq!(status.ratio(), Some(0.25));
        assert_eq!(BudgetStatus::new("Food", 2500, 0).ratio(), None);
        assert_eq!(BudgetStatus::new("Food", Cents::MAX, -10).remaining(), Cents::MIN);
    }

    #[test]
    fn test_ensure_defaults_keeps_loaded_values() {
        let mut map = BudgetMap::new();
        map.set("Food", 30000);
        map.ensure_defaults();
        assert_eq!(map.len(), 5);
        assert_eq!(map.get("Food"), 30000);
        assert_eq!(map.get("Bills"), 0);
    }

    #[test]
    fn test_get_falls_back_to_case_insensitive() {
        let mut map = BudgetMap::with_defaults();
        map.set("Food", 100);
        assert_eq!(map.get("food"), 100);
        assert_eq!(map.get("Unknown"), 0);
    }

    #[test]
    fn test_entries_order() {
        let mut map = BudgetMap::with_defaults();
        map.set("Zoo", 5);
        map.set("Gifts", 7);
        let names: Vec<&str> = map.entries().into_iter().map(|(n, _)| n).collect();
        assert_eq!(
            names,
            vec![
                "Food",
                "Transport",
                "Bills",
                "Entertainment",
                "Misc",
                "Gifts",
                "Zoo"
            ]
        );
    }
}
