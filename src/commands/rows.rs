use crate::args::RowsArgs;
use crate::commands::{open_dashboard, OutputFormat, Out, Rows};
use crate::model::TransactionRecord;
use crate::{Config, Result};

const HEADERS: [&str; 6] = [
    "date",
    "product",
    "quantity_sold",
    "unit_price",
    "month",
    "revenue",
];

/// Prints the cleaned records that pass the filters, with the headline as the message.
///
/// The search narrows the filtered records to products containing the text, and the sort is
/// applied last.
pub fn rows(config: &Config, args: &RowsArgs) -> Result<Out<Rows>> {
    let dashboard = open_dashboard(config, args.file())?;
    let spec = args.filters().spec(config.all_products_label());
    let mut view = dashboard.view(&spec).unwrap_or_default();
    if let Some(text) = args.search() {
        view = view.search(text);
    }
    if let Some(column) = args.sort() {
        view = view.sorted_by(column, args.desc());
    }

    let message = view.headline().describe(config.currency());
    let cells: Vec<Vec<String>> = view.iter().map(record_cells).collect();
    let rendered = Rows::render(OutputFormat::Table, &HEADERS, &cells)?;
    Ok(Out::new(message, rendered))
}

fn record_cells(record: &TransactionRecord) -> Vec<String> {
    vec![
        record.date().to_string(),
        record.product().to_string(),
        record.quantity_sold().to_string(),
        record.unit_price().to_string(),
        record.month().to_string(),
        record.revenue().to_string(),
    ]
}
