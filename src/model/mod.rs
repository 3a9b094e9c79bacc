//! Types that represent the core data model, such as `TransactionRecord` and `TransactionTable`.
mod amount;
mod mapping;
mod table;
mod transaction;

pub use amount::{Amount, AmountError};
pub use mapping::{Column, Field, Header, Mapping, MappingError, MissingFields};
pub use table::{LoadReport, TransactionTable};
pub use transaction::{month_key, TransactionRecord};
