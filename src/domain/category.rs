use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::TransactionType;

pub type CategoryId = Uuid;

/// Name of the synthetic bucket for transactions whose category is gone.
pub const OTHER_CATEGORY_NAME: &str = "Other";
pub const OTHER_CATEGORY_COLOR: &str = "#9E9E9E";
pub const OTHER_CATEGORY_ICON: &str = "ellipsis-horizontal";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryType {
    #[serde(alias = "Expense")]
    Expense,
    #[serde(alias = "Revenue")]
    Revenue,
    #[serde(alias = "Both")]
    Both,
}

impl CategoryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryType::Expense => "expense",
            CategoryType::Revenue => "revenue",
            CategoryType::Both => "both",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "expense" => Some(CategoryType::Expense),
            "revenue" | "income" => Some(CategoryType::Revenue),
            "both" => Some(CategoryType::Both),
            _ => None,
        }
    }

    /// Whether a transaction of the given type may be filed here.
    pub fn accepts(&self, transaction_type: TransactionType) -> bool {
        match self {
            CategoryType::Both => true,
            CategoryType::Expense => transaction_type == TransactionType::Expense,
            CategoryType::Revenue => transaction_type == TransactionType::Revenue,
        }
    }
}

impl std::fmt::Display for CategoryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    #[serde(rename = "type")]
    pub category_type: CategoryType,
    pub color: String,
    pub icon: String,
    #[serde(default)]
    pub is_pinned: bool,
}

impl Category {
    pub fn new(name: impl Into<String>, category_type: CategoryType) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            category_type,
            color: OTHER_CATEGORY_COLOR.to_string(),
            icon: "pricetag".to_string(),
            is_pinned: false,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    pub fn pinned(mut self) -> Self {
        self.is_pinned = true;
        self
    }

    /// Built-in categories offered to a fresh store.
    pub fn presets() -> Vec<Category> {
        [
            ("Food & Dining", CategoryType::Expense, "#FF6B6B", "restaurant"),
            ("Transportation", CategoryType::Expense, "#4ECDC4", "car"),
            ("Housing", CategoryType::Expense, "#45B7D1", "home"),
            ("Utilities", CategoryType::Expense, "#96CEB4", "flash"),
            ("Entertainment", CategoryType::Expense, "#FFEAA7", "game-controller"),
            ("Healthcare", CategoryType::Expense, "#DDA0DD", "medkit"),
            ("Shopping", CategoryType::Expense, "#F8B195", "cart"),
            ("Salary", CategoryType::Revenue, "#2ECC71", "cash"),
            ("Freelance", CategoryType::Revenue, "#27AE60", "briefcase"),
            ("Investments", CategoryType::Both, "#3498DB", "trending-up"),
        ]
        .into_iter()
        .map(|(name, category_type, color, icon)| {
            Category::new(name, category_type)
                .with_color(color)
                .with_icon(icon)
        })
        .collect()
    }
}
