//! These structs provide the CLI interface for the sales CLI.

use crate::analysis::{FilterSpec, ProductFilter, SortColumn};
use crate::commands::{OutputFormat, ReportKind};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// sales: A command-line dashboard for shoe-sales transaction files.
///
/// Each command reads a CSV file with (at least) a date, product, quantity sold and unit price
/// column. Headers are matched after trimming, lowercasing, and replacing spaces with
/// underscores, so `Jumlah Terjual` and `jumlah_terjual` are the same column. Both English
/// (`date`, `product`, `quantity_sold`, `unit_price`) and Indonesian (`tanggal`, `produk`,
/// `jumlah_terjual`, `harga_satuan`) headers are understood.
///
/// Rows with an invalid date, quantity or price are dropped, as are exact duplicate rows.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the sales home directory and a default config.json in it.
    Init,
    /// List the distinct products found in a file.
    Products(FileArgs),
    /// Print the cleaned records, optionally searched and sorted.
    Rows(RowsArgs),
    /// Print one grouped statistic as a chart-ready series.
    Report(ReportArgs),
    /// Print the summary statistics, and optionally export them to a CSV file.
    Summary(SummaryArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG. See the tracing-subscriber EnvFilter docs.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where the configuration is held. Defaults to ~/sales
    #[arg(long, env = "SALES_HOME", default_value_t = default_sales_home())]
    sales_home: DisplayPath,
}

impl Common {
    pub fn new(log_level: LevelFilter, sales_home: PathBuf) -> Self {
        Self {
            log_level,
            sales_home: sales_home.into(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn sales_home(&self) -> &DisplayPath {
        &self.sales_home
    }
}

/// Args for commands that only need an input file.
#[derive(Debug, Parser, Clone)]
pub struct FileArgs {
    /// The CSV file to read.
    file: PathBuf,
}

impl FileArgs {
    pub fn new(file: impl Into<PathBuf>) -> Self {
        Self { file: file.into() }
    }

    pub fn file(&self) -> &Path {
        &self.file
    }
}

/// Filters shared by the data commands. With no filters every record is used.
#[derive(Debug, Default, Parser, Clone)]
pub struct FilterArgs {
    /// First date to include, as YYYY-MM-DD. Requires --to.
    #[arg(long, requires = "to")]
    from: Option<NaiveDate>,

    /// Last date to include, as YYYY-MM-DD. Requires --from.
    #[arg(long, requires = "from")]
    to: Option<NaiveDate>,

    /// Only include this product (exact, case-sensitive match). The configured "all" label
    /// (default: all) selects every product.
    #[arg(long)]
    product: Option<String>,
}

impl FilterArgs {
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>, product: Option<String>) -> Self {
        Self { from, to, product }
    }

    /// Converts the arguments into a `FilterSpec`. `all_label` is the product value that means
    /// "every product".
    pub fn spec(&self, all_label: &str) -> FilterSpec {
        let mut spec = FilterSpec::default();
        if let (Some(from), Some(to)) = (self.from, self.to) {
            spec = spec.with_date_range(from, to);
        }
        if let Some(product) = &self.product {
            spec = spec.with_product(ProductFilter::parse(product, all_label));
        }
        spec
    }
}

/// Args for the `sales rows` command.
#[derive(Debug, Parser, Clone)]
pub struct RowsArgs {
    /// The CSV file to read.
    file: PathBuf,

    #[clap(flatten)]
    filters: FilterArgs,

    /// Only show products containing this text (case-insensitive).
    #[arg(long)]
    search: Option<String>,

    /// Sort the rows by this column.
    #[arg(long, value_enum)]
    sort: Option<SortColumn>,

    /// Sort in descending order.
    #[arg(long, requires = "sort")]
    desc: bool,
}

impl RowsArgs {
    pub fn new(
        file: impl Into<PathBuf>,
        filters: FilterArgs,
        search: Option<String>,
        sort: Option<SortColumn>,
        desc: bool,
    ) -> Self {
        Self {
            file: file.into(),
            filters,
            search,
            sort,
            desc,
        }
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    pub fn filters(&self) -> &FilterArgs {
        &self.filters
    }

    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    pub fn sort(&self) -> Option<SortColumn> {
        self.sort
    }

    pub fn desc(&self) -> bool {
        self.desc
    }
}

/// Args for the `sales report` command.
#[derive(Debug, Parser, Clone)]
pub struct ReportArgs {
    /// The CSV file to read.
    file: PathBuf,

    /// The statistic to compute.
    #[arg(value_enum)]
    kind: ReportKind,

    #[clap(flatten)]
    filters: FilterArgs,

    /// How to print the series.
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Write the series to this file instead of printing it.
    #[arg(long)]
    output: Option<PathBuf>,
}

impl ReportArgs {
    pub fn new(
        file: impl Into<PathBuf>,
        kind: ReportKind,
        filters: FilterArgs,
        format: OutputFormat,
        output: Option<PathBuf>,
    ) -> Self {
        Self {
            file: file.into(),
            kind,
            filters,
            format,
            output,
        }
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    pub fn kind(&self) -> ReportKind {
        self.kind
    }

    pub fn filters(&self) -> &FilterArgs {
        &self.filters
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn output(&self) -> Option<&Path> {
        self.output.as_deref()
    }
}

/// Args for the `sales summary` command.
#[derive(Debug, Parser, Clone)]
pub struct SummaryArgs {
    /// The CSV file to read.
    file: PathBuf,

    #[clap(flatten)]
    filters: FilterArgs,

    /// Also write the summary as a `label,value` CSV file to this path.
    #[arg(long)]
    export: Option<PathBuf>,
}

impl SummaryArgs {
    pub fn new(file: impl Into<PathBuf>, filters: FilterArgs, export: Option<PathBuf>) -> Self {
        Self {
            file: file.into(),
            filters,
            export,
        }
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    pub fn filters(&self) -> &FilterArgs {
        &self.filters
    }

    pub fn export(&self) -> Option<&Path> {
        self.export.as_deref()
    }
}

fn default_sales_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("sales"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --sales-home or SALES_HOME instead of relying on the default \
                sales home directory.",
            );
            PathBuf::from("sales")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn path(&self) -> &Path {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::ymd;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("sales").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_parse_report() {
        let args = parse(&[
            "--sales-home",
            "/tmp/s",
            "report",
            "data.csv",
            "monthly-revenue",
            "--from",
            "2024-01-01",
            "--to",
            "2024-01-31",
            "--format",
            "csv",
        ]);
        assert_eq!(args.common().sales_home().path(), Path::new("/tmp/s"));
        match args.command() {
            Command::Report(report) => {
                assert_eq!(report.kind(), ReportKind::MonthlyRevenue);
                assert_eq!(report.format(), OutputFormat::Csv);
                let spec = report.filters().spec("all");
                let range = spec.date_range().unwrap();
                assert_eq!(range.start(), ymd(2024, 1, 1));
                assert_eq!(range.end(), ymd(2024, 1, 31));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_from_requires_to() {
        let result = Args::try_parse_from(["sales", "summary", "x.csv", "--from", "2024-01-01"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_rows_sort() {
        let args = parse(&["rows", "x.csv", "--sort", "quantity-sold", "--desc"]);
        match args.command() {
            Command::Rows(rows) => {
                assert_eq!(rows.sort(), Some(SortColumn::QuantitySold));
                assert!(rows.desc());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_filter_spec_all_label() {
        let filters = FilterArgs::new(None, None, Some(String::from("Semua")));
        assert_eq!(filters.spec("Semua"), FilterSpec::default());
        let filters = FilterArgs::new(None, None, Some(String::from("Boot")));
        assert_eq!(filters.spec("all").product(), &ProductFilter::named("Boot"));
    }

    #[test]
    fn test_log_level() {
        let args = parse(&["--log-level", "debug", "init"]);
        assert_eq!(args.common().log_level(), LevelFilter::DEBUG);
    }
}
