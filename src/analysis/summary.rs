//! Scalar statistics over a view, and their export as a two-column CSV file.

use crate::analysis::View;
use crate::error::{Error, ErrorType, IntoResult};
use crate::model::Amount;
use crate::Result;
use anyhow::Context;
use chrono::NaiveDate;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use tracing::debug;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Decimal places used for the mean and standard deviation when exporting.
const EXPORT_DP: u32 = 2;

/// Statistics for a non-empty view.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct Summary {
    pub total_quantity: Amount,
    pub total_revenue: Amount,
    /// Mean revenue per record.
    pub mean_revenue: Decimal,
    /// Population standard deviation of revenue per record.
    pub std_revenue: Decimal,
    pub count: usize,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// The product with the largest total quantity. Ties go to the product that sorts first.
    pub best_seller: String,
    pub best_seller_quantity: Amount,
}

impl Summary {
    /// The export rows as `(label, value)` pairs, in export order.
    pub fn rows(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Total Quantity Sold", self.total_quantity.to_string()),
            ("Total Revenue", self.total_revenue.to_string()),
            (
                "Mean Revenue",
                self.mean_revenue.round_dp(EXPORT_DP).to_string(),
            ),
            (
                "Revenue Standard Deviation",
                self.std_revenue.round_dp(EXPORT_DP).to_string(),
            ),
            ("Record Count", self.count.to_string()),
            ("Start Date", self.start_date.format(DATE_FORMAT).to_string()),
            ("End Date", self.end_date.format(DATE_FORMAT).to_string()),
            ("Best-Selling Product", self.best_seller.clone()),
            (
                "Best-Selling Product Quantity",
                self.best_seller_quantity.to_string(),
            ),
        ]
    }

    /// Writes the summary as CSV with the columns `label` and `value`.
    pub fn write_csv<W: Write>(&self, writer: W) -> anyhow::Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(["label", "value"])?;
        for (label, value) in self.rows() {
            wtr.write_record([label, value.as_str()])?;
        }
        wtr.flush().context("Unable to flush the summary")?;
        Ok(())
    }

    /// Writes the summary CSV to `path`, replacing any existing file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = std::fs::File::create(path)
            .with_context(|| format!("Unable to create {}", path.display()))
            .pub_result(ErrorType::Export)?;
        self.write_csv(file)
            .with_context(|| format!("Unable to write the summary to {}", path.display()))
            .pub_result(ErrorType::Export)?;
        debug!("Saved the summary to {}", path.display());
        Ok(())
    }
}

/// The always-available status line of the dashboard. Unlike `Summary` this is defined for an
/// empty view.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct Headline {
    pub transactions: usize,
    pub units_sold: Amount,
    pub revenue: Amount,
    pub best_seller: Option<(String, Amount)>,
}

impl Headline {
    /// e.g. `Transactions: 6 | Units Sold: 16 | Revenue: Rp 3,005,000 | Best Seller: Slip On (9 units)`
    pub fn describe(&self, currency: &str) -> String {
        let (name, units) = match &self.best_seller {
            Some((name, units)) => (name.as_str(), *units),
            None => ("-", Amount::ZERO),
        };
        format!(
            "Transactions: {} | Units Sold: {} | Revenue: {} | Best Seller: {name} ({units} units)",
            self.transactions,
            self.units_sold,
            self.revenue.grouped(currency),
        )
    }
}

impl View<'_> {
    /// Computes the summary statistics.
    ///
    /// # Errors
    /// `ErrorType::InsufficientData` when the view is empty, since the date span and best seller
    /// are undefined. Check `is_empty` first to show a "no data" state instead.
    pub fn summary(&self) -> Result<Summary> {
        let first = self.iter().next().ok_or_else(|| {
            Error::msg(
                ErrorType::InsufficientData,
                "A summary needs at least one record, but the view is empty",
            )
        })?;

        let by_product = self.total_quantity_by_product();
        let (best_seller, best_seller_quantity) = by_product
            .max()
            .map(|(name, quantity)| (name.clone(), quantity))
            .unwrap_or_default();

        let (start_date, end_date) = self.iter().fold(
            (first.date(), first.date()),
            |(min, max), r| (min.min(r.date()), max.max(r.date())),
        );

        let count = self.len();
        let total_revenue: Amount = self.iter().map(|r| r.revenue()).sum();
        let mean_revenue = total_revenue.value() / Decimal::from(count);

        Ok(Summary {
            total_quantity: by_product.total(),
            total_revenue,
            mean_revenue,
            std_revenue: self.revenue_std(mean_revenue),
            count,
            start_date,
            end_date,
            best_seller,
            best_seller_quantity,
        })
    }

    /// Builds the status line. Never fails.
    pub fn headline(&self) -> Headline {
        let by_product = self.total_quantity_by_product();
        Headline {
            transactions: self.len(),
            units_sold: by_product.total(),
            revenue: self.iter().map(|r| r.revenue()).sum(),
            best_seller: by_product.max().map(|(name, units)| (name.clone(), units)),
        }
    }

    /// Population standard deviation of revenue. Computed in `f64`, which is ample for a
    /// statistic that is only ever displayed rounded.
    fn revenue_std(&self, mean: Decimal) -> Decimal {
        let mean = mean.to_f64().unwrap_or_default();
        let n = self.len() as f64;
        let variance = self
            .iter()
            .map(|r| r.revenue().value().to_f64().unwrap_or_default() - mean)
            .map(|d| d * d)
            .sum::<f64>()
            / n;
        Decimal::from_f64(variance.sqrt()).unwrap_or_default()
    }
}
