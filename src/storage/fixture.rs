use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Budget, Category, Transaction, is_valid_amount};

pub const SNAPSHOT_VERSION: &str = "1";

/// On-disk shape of a fixture and of a full export.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSnapshot {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exported_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub budgets: Vec<Budget>,
}

fn default_version() -> String {
    SNAPSHOT_VERSION.to_string()
}

impl DataSnapshot {
    pub fn new(
        transactions: Vec<Transaction>,
        categories: Vec<Category>,
        budgets: Vec<Budget>,
    ) -> Self {
        Self {
            version: default_version(),
            exported_at: Some(Utc::now()),
            transactions,
            categories,
            budgets,
        }
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let snapshot: DataSnapshot =
            serde_json::from_reader(reader).context("Failed to parse fixture JSON")?;
        if snapshot.version != SNAPSHOT_VERSION {
            bail!("Unsupported fixture version: {}", snapshot.version);
        }
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Reject records the service would never have accepted. Category
    /// references are left alone; dangling ones surface as notices.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for transaction in &self.transactions {
            if !seen.insert(transaction.id) {
                bail!("Duplicate transaction id {}", transaction.id);
            }
            if !is_valid_amount(transaction.amount) {
                bail!("Transaction {} has invalid amount {}", transaction.id, transaction.amount);
            }
        }

        seen.clear();
        for category in &self.categories {
            if !seen.insert(category.id) {
                bail!("Duplicate category id {}", category.id);
            }
        }

        seen.clear();
        for budget in &self.budgets {
            if !seen.insert(budget.id) {
                bail!("Duplicate budget id {}", budget.id);
            }
            if !is_valid_amount(budget.limit) {
                bail!("Budget {} has invalid limit {}", budget.id, budget.limit);
            }
            if budget.spent < 0 {
                bail!("Budget {} has negative spent {}", budget.id, budget.spent);
            }
            if !(0.0..=100.0).contains(&budget.alert_threshold) {
                bail!(
                    "Budget {} has alert threshold {} outside 0-100",
                    budget.id,
                    budget.alert_threshold
                );
            }
        }
        Ok(())
    }

    pub fn read_from(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open fixture {}", path.display()))?;
        Self::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to load fixture {}", path.display()))
    }

    pub fn to_writer<W: Write>(&self, writer: W) -> Result<()> {
        serde_json::to_writer_pretty(writer, self).context("Failed to serialize snapshot")?;
        Ok(())
    }

    pub fn write_to(&self, path: &Path) -> Result<()> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        self.to_writer(&mut writer)?;
        writer.flush()?;
        Ok(())
    }
}
