use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{
    Category, CategoryId, Cents, DateWindow, OTHER_CATEGORY_COLOR, OTHER_CATEGORY_ICON,
    OTHER_CATEGORY_NAME, Transaction, TypeFilter, percentage_of,
};

/// One row of a category breakdown. `category_id` is `None` for the
/// synthetic "Other" bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryBreakdownItem {
    pub category_id: Option<CategoryId>,
    pub name: String,
    pub color: String,
    pub icon: String,
    pub amount: Cents,
    pub count: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    pub items: Vec<CategoryBreakdownItem>,
    pub total: Cents,
    /// Missing category ids and how many transactions pointed at each,
    /// sorted by id
    pub unresolved: Vec<(CategoryId, usize)>,
}

impl CategoryBreakdown {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[derive(Hash, PartialEq, Eq, Clone, Copy)]
enum Bucket {
    Known(CategoryId),
    Other,
}

/// Group the windowed transactions by category, largest amount first.
pub fn compute_category_breakdown(
    transactions: &[Transaction],
    categories: &[Category],
    window: &DateWindow,
    filter: TypeFilter,
) -> CategoryBreakdown {
    let by_id: HashMap<CategoryId, &Category> = categories.iter().map(|c| (c.id, c)).collect();

    let mut buckets: HashMap<Bucket, (Cents, usize)> = HashMap::new();
    let mut unresolved: HashMap<CategoryId, usize> = HashMap::new();

    for transaction in transactions
        .iter()
        .filter(|t| window.contains(t.date) && filter.matches(t.transaction_type))
    {
        let bucket = if by_id.contains_key(&transaction.category_id) {
            Bucket::Known(transaction.category_id)
        } else {
            *unresolved.entry(transaction.category_id).or_insert(0) += 1;
            Bucket::Other
        };
        let entry = buckets.entry(bucket).or_insert((0, 0));
        entry.0 = entry.0.saturating_add(transaction.amount);
        entry.1 += 1;
    }

    let total = buckets
        .values()
        .fold(0, |total: Cents, (amount, _)| total.saturating_add(*amount));

    let mut items: Vec<CategoryBreakdownItem> = buckets
        .into_iter()
        .map(|(bucket, (amount, count))| {
            let (category_id, name, color, icon) = match bucket {
                Bucket::Known(id) => {
                    let category = by_id[&id];
                    (
                        Some(id),
                        category.name.clone(),
                        category.color.clone(),
                        category.icon.clone(),
                    )
                }
                Bucket::Other => (
                    None,
                    OTHER_CATEGORY_NAME.to_string(),
                    OTHER_CATEGORY_COLOR.to_string(),
                    OTHER_CATEGORY_ICON.to_string(),
                ),
            };
            CategoryBreakdownItem {
                category_id,
                name,
                color,
                icon,
                amount,
                count,
                percentage: percentage_of(amount, total),
            }
        })
        .collect();

    items.sort_by(|a, b| {
        b.amount
            .cmp(&a.amount)
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.category_id.cmp(&b.category_id))
    });

    let mut unresolved: Vec<(CategoryId, usize)> = unresolved.into_iter().collect();
    unresolved.sort();

    CategoryBreakdown {
        items,
        total,
        unresolved,
    }
}
