use serde::{Deserialize, Serialize};

use super::CategoryId;

/// Non-fatal conditions found while aggregating. They ride along with a
/// report instead of failing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notice {
    /// No transaction fell inside the requested window.
    EmptyInput,
    /// Transactions referenced a category that no longer exists and were
    /// counted under "Other".
    UnresolvedCategory {
        category_id: CategoryId,
        transactions: usize,
    },
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Notice::EmptyInput => write!(f, "no transactions in the selected period"),
            Notice::UnresolvedCategory {
                category_id,
                transactions,
            } => write!(
                f,
                "{} transaction(s) reference missing category {}",
                transactions, category_id
            ),
        }
    }
}
