use crate::args::SummaryArgs;
use crate::commands::{open_dashboard, OutputFormat, Out, Rows};
use crate::{Config, Result};

/// Prints the summary statistics of the filtered records and optionally exports them.
///
/// # Errors
/// - `ErrorType::InsufficientData` when no record passes the filters.
/// - `ErrorType::Export` when the export file cannot be written.
pub fn summary(config: &Config, args: &SummaryArgs) -> Result<Out<Rows>> {
    let dashboard = open_dashboard(config, args.file())?;
    let spec = args.filters().spec(config.all_products_label());
    let view = dashboard.view(&spec).unwrap_or_default();
    let summary = view.summary()?;

    let cells: Vec<Vec<String>> = summary
        .rows()
        .into_iter()
        .map(|(label, value)| vec![label.to_string(), value])
        .collect();
    let rendered = Rows::render(OutputFormat::Table, &["label", "value"], &cells)?;

    let mut message = format!(
        "Summary of {} records from {} to {}",
        summary.count, summary.start_date, summary.end_date
    );
    if let Some(path) = args.export() {
        summary.save(path)?;
        message = format!("{message}, exported to {}", path.display());
    }
    Ok(Out::new(message, rendered))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::FilterArgs;
    use crate::test::{TestEnv, SAMPLE_CSV};
    use crate::ErrorType;

    #[test]
    fn test_summary_with_export() {
        let env = TestEnv::new();
        let file = env.write("sales.csv", SAMPLE_CSV);
        let export = env.path("summary.csv");
        let config = Config::load(env.path("home")).unwrap();
        let args = SummaryArgs::new(file, FilterArgs::default(), Some(export.clone()));
        let out = summary(&config, &args).unwrap();
        assert!(out
            .message()
            .starts_with("Summary of 6 records from 2024-01-15 to 2024-03-01"));
        let table = out.structure().unwrap().to_string();
        assert!(table.contains("| Best-Selling Product          | Slip On    |"));

        let written = std::fs::read_to_string(&export).unwrap();
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(lines[0], "label,value");
        assert_eq!(lines[1], "Total Quantity Sold,16");
        assert_eq!(lines[3], "Mean Revenue,500833.33");
        assert_eq!(lines.len(), 10);
    }

    #[test]
    fn test_summary_of_nothing() {
        let env = TestEnv::new();
        let file = env.write("sales.csv", SAMPLE_CSV);
        let config = Config::load(env.path("home")).unwrap();
        let filters = FilterArgs::new(None, None, Some(String::from("Sandal")));
        let args = SummaryArgs::new(file, filters, None);
        let err = summary(&config, &args).unwrap_err();
        assert_eq!(err.error_type(), ErrorType::InsufficientData);
    }
}
