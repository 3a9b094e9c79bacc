use crate::analysis::{Point, View};
use crate::args::ReportArgs;
use crate::commands::{open_dashboard, Out, Rows};
use crate::error::IntoResult;
use crate::{utils, Config, ErrorType, Result};
use anyhow::Context;
use serde::{Deserialize, Serialize};

/// The grouped statistics that `sales report` can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ReportKind {
    /// Units sold per product.
    QuantityByProduct,
    /// Revenue per product.
    RevenueByProduct,
    /// Revenue per calendar day.
    DailyRevenue,
    /// Units sold per month.
    MonthlyQuantity,
    /// Revenue per month.
    MonthlyRevenue,
}

serde_plain::derive_display_from_serialize!(ReportKind);
serde_plain::derive_fromstr_from_deserialize!(ReportKind);

impl ReportKind {
    /// The label and value column names.
    fn headers(&self) -> [&'static str; 2] {
        match self {
            ReportKind::QuantityByProduct => ["product", "quantity_sold"],
            ReportKind::RevenueByProduct => ["product", "revenue"],
            ReportKind::DailyRevenue => ["date", "revenue"],
            ReportKind::MonthlyQuantity => ["month", "quantity_sold"],
            ReportKind::MonthlyRevenue => ["month", "revenue"],
        }
    }

    fn points(&self, view: &View<'_>) -> Vec<Point> {
        match self {
            ReportKind::QuantityByProduct => view.total_quantity_by_product().points(),
            ReportKind::RevenueByProduct => view.revenue_by_product().points(),
            ReportKind::DailyRevenue => view.daily_revenue().points(),
            ReportKind::MonthlyQuantity => view.monthly_quantity().points(),
            ReportKind::MonthlyRevenue => view.monthly_revenue().points(),
        }
    }
}

/// Computes one grouped series over the filtered records and renders it in the requested format.
/// When an output path is given the rendered series is written there instead of being returned.
pub fn report(config: &Config, args: &ReportArgs) -> Result<Out<Rows>> {
    let dashboard = open_dashboard(config, args.file())?;
    let spec = args.filters().spec(config.all_products_label());
    let view = dashboard.view(&spec).unwrap_or_default();

    let kind = args.kind();
    let cells: Vec<Vec<String>> = kind
        .points(&view)
        .into_iter()
        .map(|p| vec![p.label, p.value.to_string()])
        .collect();
    let rendered = Rows::render(args.format(), &kind.headers(), &cells)?;
    let message = format!("{kind}: {} groups from {} records", cells.len(), view.len());

    match args.output() {
        None => Ok(Out::new(message, rendered)),
        Some(path) => {
            let mut text = rendered.to_string();
            if !text.ends_with('\n') {
                text.push('\n');
            }
            utils::write(path, text)
                .with_context(|| format!("Unable to save the {kind} report"))
                .pub_result(ErrorType::Export)?;
            Ok(format!("{message}, written to {}", path.display()).into())
        }
    }
}
