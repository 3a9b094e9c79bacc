use crate::error::{ErrorType, IntoResult};
use crate::model::{Amount, Column, TransactionRecord};
use crate::Result;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Counts describing what happened to the source rows during a load.
#[derive(Default, Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoadReport {
    /// Data rows read from the source, excluding the header.
    pub rows_read: usize,
    /// Rows dropped because the date, quantity or price could not be coerced.
    pub invalid_rows: usize,
    /// Rows dropped because they exactly repeated an earlier row.
    pub duplicate_rows: usize,
}

impl LoadReport {
    pub fn rows_dropped(&self) -> usize {
        self.invalid_rows + self.duplicate_rows
    }
}

/// The cleaned transaction records of one source file, in source row order.
///
/// A table is immutable once loaded. A new load produces a new table rather than merging.
///
/// The total quantity and total revenue of every table fit in an `Amount`. Quantities and
/// revenues are non-negative, so the sum over any subset of the records fits too.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct TransactionTable {
    /// Normalized names of all columns in the source, in source order.
    columns: Vec<Column>,
    data: Vec<TransactionRecord>,
    report: LoadReport,
}

impl TransactionTable {
    pub(crate) fn new(
        columns: Vec<Column>,
        data: Vec<TransactionRecord>,
        report: LoadReport,
    ) -> Result<Self> {
        check_totals(&data).pub_result(ErrorType::Parse)?;
        Ok(Self {
            columns,
            data,
            report,
        })
    }

    /// Builds a table directly from records, e.g. for tests or for callers that have their own
    /// source. Records are taken as-is; no cleaning is applied.
    ///
    /// # Errors
    /// `ErrorType::Parse` when the total quantity or total revenue is too large to represent.
    pub fn from_records(data: impl IntoIterator<Item = TransactionRecord>) -> Result<Self> {
        let data: Vec<TransactionRecord> = data.into_iter().collect();
        let report = LoadReport {
            rows_read: data.len(),
            ..LoadReport::default()
        };
        Self::new(Vec::new(), data, report)
    }

    pub fn data(&self) -> &[TransactionRecord] {
        &self.data
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn report(&self) -> LoadReport {
        self.report
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Distinct product names, sorted.
    pub fn products(&self) -> Vec<&str> {
        self.data
            .iter()
            .map(|r| r.product())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

fn check_totals(data: &[TransactionRecord]) -> anyhow::Result<()> {
    let mut quantity = Amount::ZERO;
    let mut revenue = Amount::ZERO;
    for r in data {
        quantity = quantity
            .checked_add(r.quantity_sold())
            .context("The total quantity sold is too large")?;
        revenue = revenue
            .checked_add(r.revenue())
            .context("The total revenue is too large")?;
    }
    Ok(())
}
