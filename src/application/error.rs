use thiserror::Error;

use crate::domain::{Cents, InvalidRangeError};

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    InvalidRange(#[from] InvalidRangeError),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(Cents),

    #[error("Invalid percentage: {0} (expected 0-100)")]
    InvalidPercentage(f64),

    #[error("Transaction not found: {0}")]
    TransactionNotFound(String),

    #[error("Category not found: {0}")]
    CategoryNotFound(String),

    #[error("Category already exists: {0}")]
    CategoryAlreadyExists(String),

    #[error("Category '{category}' does not accept {transaction_type} transactions")]
    CategoryTypeMismatch {
        category: String,
        transaction_type: String,
    },

    #[error("Budget not found: {0}")]
    BudgetNotFound(String),

    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),
}
