use crate::model::{Amount, AmountError};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// Represents a single cleaned sales line.
///
/// `month` and `revenue` are derived from the other fields when the record is created and are
/// never read from a source file.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct TransactionRecord {
    date: NaiveDate,
    product: String,
    quantity_sold: Amount,
    unit_price: Amount,
    month: String,
    revenue: Amount,
    /// Source columns that are not required fields, keyed by normalized column name.
    other_fields: BTreeMap<String, String>,
}

impl TransactionRecord {
    /// # Errors
    /// `AmountError::Overflow` when `quantity_sold * unit_price` is too large to represent.
    pub fn new(
        date: NaiveDate,
        product: impl Into<String>,
        quantity_sold: Amount,
        unit_price: Amount,
    ) -> Result<Self, AmountError> {
        Self::new_with_other_fields(date, product, quantity_sold, unit_price, BTreeMap::new())
    }

    pub fn new_with_other_fields(
        date: NaiveDate,
        product: impl Into<String>,
        quantity_sold: Amount,
        unit_price: Amount,
        other_fields: BTreeMap<String, String>,
    ) -> Result<Self, AmountError> {
        let revenue = quantity_sold
            .checked_mul(unit_price)
            .ok_or(AmountError::Overflow)?;
        Ok(Self {
            date,
            product: product.into().trim().to_string(),
            quantity_sold,
            unit_price,
            month: month_key(date),
            revenue,
            other_fields,
        })
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn product(&self) -> &str {
        &self.product
    }

    pub fn quantity_sold(&self) -> Amount {
        self.quantity_sold
    }

    pub fn unit_price(&self) -> Amount {
        self.unit_price
    }

    /// The calendar month of `date` as `YYYY-MM`.
    pub fn month(&self) -> &str {
        &self.month
    }

    /// Always `quantity_sold * unit_price`.
    pub fn revenue(&self) -> Amount {
        self.revenue
    }

    pub fn other_fields(&self) -> &BTreeMap<String, String> {
        &self.other_fields
    }

    /// The identity used for duplicate detection: every source-backed field. Derived fields are
    /// functions of these and add nothing.
    pub(crate) fn identity(
        &self,
    ) -> (NaiveDate, &str, Amount, Amount, &BTreeMap<String, String>) {
        (
            self.date,
            &self.product,
            self.quantity_sold,
            self.unit_price,
            &self.other_fields,
        )
    }
}

/// Formats the calendar month of `date` as `YYYY-MM`. These keys sort chronologically.
pub fn month_key(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}
