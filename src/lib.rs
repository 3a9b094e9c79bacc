//! Loads shoe-sales transaction records from CSV files, cleans them, and computes the filtered,
//! grouped and summary statistics shown by the sales dashboard.
//!
//! ```
//! use sales_dash::analysis::{filter, FilterSpec, ProductFilter};
//!
//! let csv = "Tanggal,Produk,Jumlah Terjual,Harga Satuan\n\
//!            2024-01-01,A,10,100\n\
//!            2024-01-02,B,5,200\n";
//! let table = sales_dash::load(csv.as_bytes()).unwrap();
//! let view = filter(&table, &FilterSpec::default().with_product(ProductFilter::named("B")));
//! assert_eq!(view.len(), 1);
//! assert_eq!(view.summary().unwrap().best_seller, "B");
//! ```

pub mod analysis;
pub mod args;
pub mod commands;
mod config;
mod dashboard;
mod error;
mod ingest;
pub mod model;
mod utils;


pub use analysis::filter;
pub use config::Config;
pub use dashboard::Dashboard;
pub use error::{Error, ErrorType, Result};
pub use ingest::{load, load_path, load_with, parse_date, LoadOptions};
