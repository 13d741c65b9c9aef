use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// The fixed set of expense categories.
/// Drives default budgets, summary ordering and the choices offered to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Food,
    Transport,
    Bills,
    Entertainment,
    Misc,
}

impl Category {
    /// All categories in display order.
    pub const ALL: [Category; 5] = [
        Category::Food,
        Category::Transport,
        Category::Bills,
        Category::Entertainment,
        Category::Misc,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Transport => "Transport",
            Category::Bills => "Bills",
            Category::Entertainment => "Entertainment",
            Category::Misc => "Misc",
        }
    }

    /// Case-insensitive comparison against free-text category stored on an expense.
    pub fn matches(&self, name: &str) -> bool {
        self.as_str().eq_ignore_ascii_case(name)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown category '{0}' (expected one of: Food, Transport, Bills, Entertainment, Misc)")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.matches(s))
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}
