use crate::analysis::{filter, FilterSpec, View};
use crate::ingest::{load_path, load_with, LoadOptions};
use crate::model::{LoadReport, TransactionTable};
use crate::Result;
use std::io::Read;
use std::path::Path;
use tracing::{error, info};

/// Holds the current `TransactionTable` on behalf of an application shell.
///
/// A load either replaces the whole table or, when it fails, leaves the previous table in place.
/// Views borrow the table, so the table cannot be replaced while a view of it is alive.
#[derive(Debug, Default, Clone)]
pub struct Dashboard {
    options: LoadOptions,
    table: Option<TransactionTable>,
}

impl Dashboard {
    pub fn new(options: LoadOptions) -> Self {
        Self {
            options,
            table: None,
        }
    }

    /// Loads the CSV file at `path` and makes it the current table.
    pub fn load_path(&mut self, path: impl AsRef<Path>) -> Result<LoadReport> {
        let path = path.as_ref();
        let result = load_path(path, &self.options);
        self.replace(result)
    }

    /// Loads CSV text from `reader` and makes it the current table.
    pub fn load<R: Read>(&mut self, reader: R) -> Result<LoadReport> {
        let result = load_with(reader, &self.options);
        self.replace(result)
    }

    fn replace(&mut self, result: Result<TransactionTable>) -> Result<LoadReport> {
        match result {
            Ok(table) => {
                let report = table.report();
                info!("Loaded {} records", table.len());
                self.table = Some(table);
                Ok(report)
            }
            Err(e) => {
                error!("Failed to load the file, keeping the previous data: {e}");
                Err(e)
            }
        }
    }

    pub fn table(&self) -> Option<&TransactionTable> {
        self.table.as_ref()
    }

    pub fn is_loaded(&self) -> bool {
        self.table.is_some()
    }

    /// The filtered view of the current table, or `None` when nothing has been loaded.
    pub fn view(&self, spec: &FilterSpec) -> Option<View<'_>> {
        self.table.as_ref().map(|table| filter(table, spec))
    }

    /// Distinct product names of the current table, sorted, for a product picker.
    pub fn products(&self) -> Vec<&str> {
        self.table
            .as_ref()
            .map(TransactionTable::products)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::ProductFilter;
    use crate::error::ErrorType;
    use crate::test::{TestEnv, SAMPLE_CSV};

    #[test]
    fn test_starts_empty() {
        let dashboard = Dashboard::default();
        assert!(!dashboard.is_loaded());
        assert!(dashboard.view(&FilterSpec::default()).is_none());
        assert!(dashboard.products().is_empty());
    }

    #[test]
    fn test_load_and_view() {
        let mut dashboard = Dashboard::default();
        let report = dashboard.load(SAMPLE_CSV.as_bytes()).unwrap();
        assert_eq!(report.rows_read, 9);
        assert_eq!(dashboard.products(), vec!["Air Runner", "Boot", "Slip On"]);
        let spec = FilterSpec::default().with_product(ProductFilter::named("Boot"));
        let view = dashboard.view(&spec).unwrap();
        assert_eq!(view.len(), 1);
    }

    #[test]
    fn test_failed_load_keeps_previous_table() {
        let mut dashboard = Dashboard::default();
        dashboard.load(SAMPLE_CSV.as_bytes()).unwrap();
        let err = dashboard.load("date,product\n".as_bytes()).unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Schema);
        assert_eq!(dashboard.table().map(|t| t.len()), Some(6));
    }

    #[test]
    fn test_new_load_replaces_table() {
        let env = TestEnv::new();
        let path = env.write(
            "second.csv",
            "date,product,quantity_sold,unit_price\n2024-06-01,Clog,2,90000\n",
        );
        let mut dashboard = Dashboard::default();
        dashboard.load(SAMPLE_CSV.as_bytes()).unwrap();
        dashboard.load_path(&path).unwrap();
        assert_eq!(dashboard.products(), vec!["Clog"]);
    }

    #[test]
    fn test_options_are_used() {
        let options = LoadOptions::default().with_date_formats(["%d.%m.%Y"]);
        let mut dashboard = Dashboard::new(options);
        dashboard
            .load("date,product,quantity_sold,unit_price\n01.06.2024,Clog,2,90000\n".as_bytes())
            .unwrap();
        assert_eq!(dashboard.table().map(|t| t.len()), Some(1));
    }
}
