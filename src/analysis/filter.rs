use crate::model::{TransactionRecord, TransactionTable};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// An inclusive range of calendar dates.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// A range where `start > end` is allowed and matches nothing.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Selects either every product or exactly one product by name.
#[derive(Debug, Default, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductFilter {
    #[default]
    All,
    /// Matches a product name exactly (case-sensitive) after trimming.
    Named(String),
}

impl ProductFilter {
    pub fn named(name: impl AsRef<str>) -> Self {
        ProductFilter::Named(name.as_ref().trim().to_string())
    }

    /// Interprets `value` as a product name unless it equals `all_label`.
    pub fn parse(value: &str, all_label: &str) -> Self {
        if value.trim() == all_label {
            ProductFilter::All
        } else {
            ProductFilter::named(value)
        }
    }

    pub fn matches(&self, product: &str) -> bool {
        match self {
            ProductFilter::All => true,
            ProductFilter::Named(name) => name == product,
        }
    }
}

/// The filters in effect. The default has no filters and retains every record.
#[derive(Debug, Default, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct FilterSpec {
    date_range: Option<DateRange>,
    product: ProductFilter,
}

impl FilterSpec {
    pub fn new(date_range: Option<DateRange>, product: ProductFilter) -> Self {
        Self {
            date_range,
            product,
        }
    }

    pub fn with_date_range(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.date_range = Some(DateRange::new(start, end));
        self
    }

    pub fn with_product(mut self, product: ProductFilter) -> Self {
        self.product = product;
        self
    }

    pub fn date_range(&self) -> Option<DateRange> {
        self.date_range
    }

    pub fn product(&self) -> &ProductFilter {
        &self.product
    }

    /// True when the record passes every filter.
    pub fn matches(&self, record: &TransactionRecord) -> bool {
        let in_range = self
            .date_range
            .map_or(true, |range| range.contains(record.date()));
        in_range && self.product.matches(record.product())
    }
}

/// Applies `spec` to `table`. The table is not modified.
pub fn filter<'a>(table: &'a TransactionTable, spec: &FilterSpec) -> View<'a> {
    View::new(table.data().iter().filter(|r| spec.matches(r)))
}

/// Columns of the record grid that rows can be sorted by.
#[derive(
    Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum SortColumn {
    Date,
    Product,
    QuantitySold,
    UnitPrice,
    Revenue,
}

serde_plain::derive_display_from_serialize!(SortColumn);
serde_plain::derive_fromstr_from_deserialize!(SortColumn);

impl SortColumn {
    fn compare(&self, a: &TransactionRecord, b: &TransactionRecord) -> Ordering {
        match self {
            SortColumn::Date => a.date().cmp(&b.date()),
            SortColumn::Product => a.product().cmp(b.product()),
            SortColumn::QuantitySold => a.quantity_sold().cmp(&b.quantity_sold()),
            SortColumn::UnitPrice => a.unit_price().cmp(&b.unit_price()),
            SortColumn::Revenue => a.revenue().cmp(&b.revenue()),
        }
    }
}

/// A read-only selection of records from a `TransactionTable`, in table order unless sorted.
#[derive(Debug, Default, Clone, Eq, PartialEq)]
pub struct View<'a> {
    records: Vec<&'a TransactionRecord>,
}

impl<'a> View<'a> {
    pub(crate) fn new(records: impl IntoIterator<Item = &'a TransactionRecord>) -> Self {
        Self {
            records: records.into_iter().collect(),
        }
    }

    /// A view of every record in `table`.
    pub fn all(table: &'a TransactionTable) -> Self {
        Self::new(table.data())
    }

    pub fn records(&self) -> &[&'a TransactionRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a TransactionRecord> + '_ {
        self.records.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Narrows the view to products containing `text` as typed, ignoring case. Whitespace is
    /// significant. An empty `text` keeps every record.
    pub fn search(&self, text: &str) -> View<'a> {
        let needle = text.to_lowercase();
        if needle.is_empty() {
            return self.clone();
        }
        View::new(
            self.iter()
                .filter(|r| r.product().to_lowercase().contains(&needle)),
        )
    }

    /// Returns the records ordered by `column`. The sort is stable, so equal values keep their
    /// current relative order.
    pub fn sorted_by(&self, column: SortColumn, descending: bool) -> View<'a> {
        let mut records = self.records.clone();
        records.sort_by(|a, b| {
            let ordering = column.compare(a, b);
            if descending {
                ordering.reverse()
            } else {
                ordering
            }
        });
        View { records }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::{sample_table, two_row_table, ymd};

    #[test]
    fn test_no_filter_is_identity() {
        let table = sample_table();
        let view = filter(&table, &FilterSpec::default());
        assert_eq!(view.len(), table.len());
        assert_eq!(view, View::all(&table));
    }

    #[test]
    fn test_date_range_single_day() {
        let table = two_row_table();
        let spec = FilterSpec::default().with_date_range(ymd(2024, 1, 1), ymd(2024, 1, 1));
        let view = filter(&table, &spec);
        assert_eq!(view.records(), &[&table.data()[0]]);
    }

    #[test]
    fn test_product_filter() {
        let table = two_row_table();
        let spec = FilterSpec::default().with_product(ProductFilter::named("B"));
        let view = filter(&table, &spec);
        assert_eq!(view.records(), &[&table.data()[1]]);
    }

    #[test]
    fn test_product_filter_is_case_sensitive() {
        let table = two_row_table();
        let spec = FilterSpec::default().with_product(ProductFilter::named(" b "));
        assert!(filter(&table, &spec).is_empty());
    }

    #[test]
    fn test_date_range_is_inclusive() {
        let table = sample_table();
        let spec = FilterSpec::default().with_date_range(ymd(2024, 1, 28), ymd(2024, 2, 14));
        let view = filter(&table, &spec);
        assert_eq!(view.len(), 4);
        assert!(view
            .iter()
            .all(|r| r.date() >= ymd(2024, 1, 28) && r.date() <= ymd(2024, 2, 14)));
    }

    #[test]
    fn test_filters_compose() {
        let table = sample_table();
        let spec = FilterSpec::new(
            Some(DateRange::new(ymd(2024, 1, 1), ymd(2024, 1, 31))),
            ProductFilter::named("Air Runner"),
        );
        let view = filter(&table, &spec);
        assert_eq!(view.len(), 2);
        assert!(view.iter().all(|r| r.product() == "Air Runner"));
    }

    #[test]
    fn test_reversed_range_is_empty() {
        let table = sample_table();
        let spec = FilterSpec::default().with_date_range(ymd(2024, 3, 1), ymd(2024, 1, 1));
        assert!(filter(&table, &spec).is_empty());
    }

    #[test]
    fn test_product_filter_parse() {
        assert_eq!(ProductFilter::parse("all", "all"), ProductFilter::All);
        assert_eq!(ProductFilter::parse("Semua", "Semua"), ProductFilter::All);
        assert_eq!(
            ProductFilter::parse(" Boot ", "all"),
            ProductFilter::Named(String::from("Boot"))
        );
    }

    #[test]
    fn test_search_ignores_case() {
        let table = sample_table();
        let view = View::all(&table).search("RUN");
        assert_eq!(view.len(), 3);
        assert!(view.iter().all(|r| r.product() == "Air Runner"));
    }

    #[test]
    fn test_search_layers_on_filter() {
        let table = sample_table();
        let spec = FilterSpec::default().with_date_range(ymd(2024, 2, 1), ymd(2024, 3, 31));
        let view = filter(&table, &spec).search("o");
        let products: Vec<&str> = view.iter().map(|r| r.product()).collect();
        assert_eq!(products, vec!["Boot", "Slip On"]);
    }

    #[test]
    fn test_search_empty_is_identity() {
        let table = sample_table();
        let view = View::all(&table);
        assert_eq!(view.search(""), view);
    }

    #[test]
    fn test_search_keeps_whitespace() {
        let table = sample_table();
        let view = View::all(&table);
        assert_eq!(view.search("air ").len(), 3);
        assert_eq!(view.search("slip on").len(), 2);
        assert!(view.search(" air").is_empty());
        assert!(view.search("  ").is_empty());
    }

    #[test]
    fn test_sorted_by_revenue_descending() {
        let table = sample_table();
        let view = View::all(&table).sorted_by(SortColumn::Revenue, true);
        let revenues: Vec<String> = view.iter().map(|r| r.revenue().to_string()).collect();
        assert_eq!(
            revenues,
            vec!["750000", "600000", "500000", "480000", "400000", "275000"]
        );
    }

    #[test]
    fn test_sorted_by_product_is_stable() {
        let table = sample_table();
        let view = View::all(&table).sorted_by(SortColumn::Product, false);
        let rows: Vec<(&str, NaiveDate)> = view.iter().map(|r| (r.product(), r.date())).collect();
        assert_eq!(
            rows,
            vec![
                ("Air Runner", ymd(2024, 1, 15)),
                ("Air Runner", ymd(2024, 1, 28)),
                ("Air Runner", ymd(2024, 3, 1)),
                ("Boot", ymd(2024, 2, 3)),
                ("Slip On", ymd(2024, 1, 28)),
                ("Slip On", ymd(2024, 2, 14)),
            ]
        );
    }

    #[test]
    fn test_sort_column_from_str() {
        assert_eq!(
            "quantity_sold".parse::<SortColumn>().unwrap(),
            SortColumn::QuantitySold
        );
    }
}
