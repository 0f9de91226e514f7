use std::path::Path;

use anyhow::Result;
use chrono::NaiveDate;
use tracing::{debug, info};

use crate::domain::{Budget, BudgetId, Category, CategoryId, Cents, Transaction, TransactionId};

use super::DataSnapshot;

/// Owned, immutable copy of the store's collections. Analytics always run
/// against one of these so several reports see the same data.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub transactions: Vec<Transaction>,
    pub categories: Vec<Category>,
    pub budgets: Vec<Budget>,
}

/// In-memory owner of transactions, categories and budgets.
///
/// This is the only place collections are mutated. It does no validation
/// of its own: edits are checked by `AnalyticsService` and fixture data by
/// `DataSnapshot::validate` before they arrive here.
#[derive(Debug, Clone, Default)]
pub struct Store {
    transactions: Vec<Transaction>,
    categories: Vec<Category>,
    budgets: Vec<Budget>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store holding only the preset categories.
    pub fn with_presets() -> Self {
        Self {
            categories: Category::presets(),
            ..Self::default()
        }
    }

    pub fn from_data(data: DataSnapshot) -> Self {
        Self {
            transactions: data.transactions,
            categories: data.categories,
            budgets: data.budgets,
        }
    }

    /// Seed a store from a JSON fixture file.
    pub fn load_fixture(path: impl AsRef<Path>) -> Result<Self> {
        let data = DataSnapshot::read_from(path.as_ref())?;
        debug!(
            path = %path.as_ref().display(),
            transactions = data.transactions.len(),
            categories = data.categories.len(),
            budgets = data.budgets.len(),
            "loaded fixture"
        );
        Ok(Self::from_data(data))
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            transactions: self.transactions.clone(),
            categories: self.categories.clone(),
            budgets: self.budgets.clone(),
        }
    }

    pub fn to_data(&self) -> DataSnapshot {
        DataSnapshot::new(
            self.transactions.clone(),
            self.categories.clone(),
            self.budgets.clone(),
        )
    }

    // ========================
    // Transactions
    // ========================

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn get_transaction(&self, id: TransactionId) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id == id)
    }

    pub fn insert_transaction(&mut self, transaction: Transaction) {
        self.transactions.push(transaction);
    }

    /// Replace the transaction with the same id, returning the old one.
    pub fn replace_transaction(&mut self, transaction: Transaction) -> Option<Transaction> {
        let slot = self
            .transactions
            .iter_mut()
            .find(|t| t.id == transaction.id)?;
        Some(std::mem::replace(slot, transaction))
    }

    pub fn remove_transaction(&mut self, id: TransactionId) -> Option<Transaction> {
        let index = self.transactions.iter().position(|t| t.id == id)?;
        Some(self.transactions.remove(index))
    }

    // ========================
    // Categories
    // ========================

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn get_category(&self, id: CategoryId) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// Case-insensitive lookup by name.
    pub fn find_category_by_name(&self, name: &str) -> Option<&Category> {
        let name = name.trim().to_lowercase();
        self.categories
            .iter()
            .find(|c| c.name.to_lowercase() == name)
    }

    pub fn insert_category(&mut self, category: Category) {
        self.categories.push(category);
    }

    /// Remove a category. Transactions keep pointing at the id and will be
    /// reported under "Other".
    pub fn remove_category(&mut self, id: CategoryId) -> Option<Category> {
        let index = self.categories.iter().position(|c| c.id == id)?;
        Some(self.categories.remove(index))
    }

    pub fn set_category_pinned(&mut self, id: CategoryId, pinned: bool) -> Option<&Category> {
        let category = self.categories.iter_mut().find(|c| c.id == id)?;
        category.is_pinned = pinned;
        Some(category)
    }

    /// Pinned categories first, then alphabetical.
    pub fn list_categories(&self) -> Vec<&Category> {
        let mut categories: Vec<&Category> = self.categories.iter().collect();
        categories.sort_by(|a, b| {
            b.is_pinned
                .cmp(&a.is_pinned)
                .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        });
        categories
    }

    // ========================
    // Budgets
    // ========================

    pub fn budgets(&self) -> &[Budget] {
        &self.budgets
    }

    pub fn get_budget(&self, id: BudgetId) -> Option<&Budget> {
        self.budgets.iter().find(|b| b.id == id)
    }

    pub fn insert_budget(&mut self, budget: Budget) {
        self.budgets.push(budget);
    }

    pub fn remove_budget(&mut self, id: BudgetId) -> Option<Budget> {
        let index = self.budgets.iter().position(|b| b.id == id)?;
        Some(self.budgets.remove(index))
    }

    pub fn set_budget_spent(&mut self, id: BudgetId, spent: Cents) -> Option<&Budget> {
        let budget = self.budgets.iter_mut().find(|b| b.id == id)?;
        budget.spent = spent;
        Some(budget)
    }

    /// Recompute every budget's `spent` from the expenses filed under its
    /// category during the period containing `today`. Returns the number of
    /// budgets whose figure changed.
    pub fn refresh_budget_spending(&mut self, today: NaiveDate) -> usize {
        let mut changed = 0;
        for budget in &mut self.budgets {
            let Some(period) = budget.current_period(today) else {
                continue;
            };
            let spent: Cents = self
                .transactions
                .iter()
                .filter(|t| {
                    t.is_expense()
                        && t.category_id == budget.category_id
                        && period.contains(t.date)
                })
                .fold(0, |total: Cents, t| total.saturating_add(t.amount));
            if budget.spent != spent {
                budget.spent = spent;
                changed += 1;
            }
        }
        info!(budgets = self.budgets.len(), changed, %today, "refreshed budget spending");
        changed
    }
}
