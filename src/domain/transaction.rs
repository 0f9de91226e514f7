use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{CategoryId, Cents};

pub type TransactionId = Uuid;

/// Direction of a money movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    #[serde(alias = "Expense", alias = "EXPENSE")]
    Expense,
    #[serde(alias = "Revenue", alias = "REVENUE", alias = "income")]
    Revenue,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Expense => "expense",
            TransactionType::Revenue => "revenue",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "expense" => Some(TransactionType::Expense),
            "revenue" | "income" => Some(TransactionType::Revenue),
            _ => None,
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which transaction types an aggregation looks at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeFilter {
    #[serde(alias = "Expense", alias = "EXPENSE")]
    Expense,
    #[serde(alias = "Revenue", alias = "REVENUE")]
    Revenue,
    #[default]
    #[serde(alias = "Both", alias = "BOTH")]
    Both,
}

impl TypeFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeFilter::Expense => "expense",
            TypeFilter::Revenue => "revenue",
            TypeFilter::Both => "both",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "expense" => Some(TypeFilter::Expense),
            "revenue" | "income" => Some(TypeFilter::Revenue),
            "both" | "all" => Some(TypeFilter::Both),
            _ => None,
        }
    }

    pub fn matches(&self, transaction_type: TransactionType) -> bool {
        match self {
            TypeFilter::Both => true,
            TypeFilter::Expense => transaction_type == TransactionType::Expense,
            TypeFilter::Revenue => transaction_type == TransactionType::Revenue,
        }
    }
}

impl std::fmt::Display for TypeFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How often a recurring transaction repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurringFrequency {
    #[serde(alias = "Daily")]
    Daily,
    #[serde(alias = "Weekly")]
    Weekly,
    #[serde(alias = "Monthly")]
    Monthly,
    #[serde(alias = "Yearly")]
    Yearly,
}

impl RecurringFrequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecurringFrequency::Daily => "daily",
            RecurringFrequency::Weekly => "weekly",
            RecurringFrequency::Monthly => "monthly",
            RecurringFrequency::Yearly => "yearly",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "daily" => Some(RecurringFrequency::Daily),
            "weekly" => Some(RecurringFrequency::Weekly),
            "monthly" => Some(RecurringFrequency::Monthly),
            "yearly" => Some(RecurringFrequency::Yearly),
            _ => None,
        }
    }

    /// Convert an amount charged once per period into its monthly equivalent.
    /// A month is taken as 30 days or 52/12 weeks.
    pub fn monthly_equivalent(&self, amount: Cents) -> Cents {
        match self {
            RecurringFrequency::Daily => amount.saturating_mul(30),
            RecurringFrequency::Weekly => amount.saturating_mul(52) / 12,
            RecurringFrequency::Monthly => amount,
            RecurringFrequency::Yearly => amount / 12,
        }
    }
}

impl std::fmt::Display for RecurringFrequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single recorded money movement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: TransactionId,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// Amount in cents (never negative)
    pub amount: Cents,
    /// Weak reference: the category may since have been deleted
    pub category_id: CategoryId,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub is_recurring: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurring_frequency: Option<RecurringFrequency>,
}

impl Transaction {
    pub fn new(
        transaction_type: TransactionType,
        amount: Cents,
        category_id: CategoryId,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            transaction_type,
            amount,
            category_id,
            date,
            description: None,
            is_recurring: false,
            recurring_frequency: None,
        }
    }

    pub fn expense(amount: Cents, category_id: CategoryId, date: NaiveDate) -> Self {
        Self::new(TransactionType::Expense, amount, category_id, date)
    }

    pub fn revenue(amount: Cents, category_id: CategoryId, date: NaiveDate) -> Self {
        Self::new(TransactionType::Revenue, amount, category_id, date)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_recurrence(mut self, frequency: RecurringFrequency) -> Self {
        self.is_recurring = true;
        self.recurring_frequency = Some(frequency);
        self
    }

    pub fn is_expense(&self) -> bool {
        self.transaction_type == TransactionType::Expense
    }

    /// Signed contribution to a balance: revenue adds, expense subtracts.
    pub fn signed_amount(&self) -> Cents {
        match self.transaction_type {
            TransactionType::Expense => self.amount.saturating_neg(),
            TransactionType::Revenue => self.amount,
        }
    }
}
