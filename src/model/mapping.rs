use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::convert::Infallible;
use std::error::Error as StdError;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

#[derive(Default, Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct MappingError(String);

impl Display for MappingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl StdError for MappingError {}

/// Returned when one or more required fields cannot be found among the headers. Every missing
/// field is listed, not only the first.
#[derive(Default, Debug, Clone, Eq, PartialEq, Hash)]
pub struct MissingFields(Vec<Field>);

impl MissingFields {
    pub fn fields(&self) -> &[Field] {
        &self.0
    }
}

impl Display for MissingFields {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.0.iter().map(|field| field.name()).collect();
        write!(f, "Missing required columns: {}", names.join(", "))
    }
}

impl StdError for MissingFields {}

/// The logical fields that every sales file must provide.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Date,
    Product,
    QuantitySold,
    UnitPrice,
}

serde_plain::derive_display_from_serialize!(Field);
serde_plain::derive_fromstr_from_deserialize!(Field);

impl Field {
    pub const REQUIRED: [Field; 4] = [
        Field::Date,
        Field::Product,
        Field::QuantitySold,
        Field::UnitPrice,
    ];

    /// The canonical, normalized column name.
    pub fn name(&self) -> &'static str {
        self.aliases()[0]
    }

    /// Normalized column names accepted for this field. The first is the canonical name, the
    /// rest are the names used by the Indonesian-language exports this tool was built for.
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            Field::Date => &["date", "tanggal"],
            Field::Product => &["product", "produk"],
            Field::QuantitySold => &["quantity_sold", "jumlah_terjual"],
            Field::UnitPrice => &["unit_price", "harga_satuan"],
        }
    }
}

/// Normalized names of columns that are always derived and therefore never read from a file.
const DERIVED: [&str; 4] = ["month", "bulan", "revenue", "pendapatan"];

/// Maps the headers of a sales file to the required fields and to the pass-through columns.
#[derive(Default, Debug, Clone, Eq, PartialEq)]
pub struct Mapping {
    headers: Vec<Header>,
    columns: Vec<Column>,
    fields: HashMap<Field, usize>,
    extras: Vec<usize>,
}

impl Mapping {
    /// Create a new `Mapping` from a list of header strings. Each header is normalized into a
    /// `Column` name and the required fields are resolved against those names.
    ///
    /// # Errors
    /// - A `MappingError` (wrapped in `anyhow`) when two headers normalize to the same column.
    /// - `MissingFields` (wrapped in `anyhow`) when any required field cannot be resolved.
    pub fn new<S, I>(headers: I) -> anyhow::Result<Self>
    where
        S: Into<String>,
        I: IntoIterator<Item = S>,
    {
        let headers: Vec<Header> = headers.into_iter().map(|s| Header(s.into())).collect();
        let columns: Vec<Column> = headers.iter().map(Column::normalize).collect();

        let mut seen: HashMap<&Column, usize> = HashMap::new();
        for (ix, column) in columns.iter().enumerate() {
            if let Some(first) = seen.insert(column, ix) {
                return Err(MappingError(format!(
                    "Headers '{}' and '{}' both normalize to the column name '{}'",
                    headers[first].as_ref(),
                    headers[ix].as_ref(),
                    column.as_ref()
                ))
                .into());
            }
        }

        let mut fields = HashMap::new();
        let mut missing = Vec::new();
        for field in Field::REQUIRED {
            let found = columns
                .iter()
                .position(|c| field.aliases().contains(&c.as_ref()));
            match found {
                Some(ix) => {
                    fields.insert(field, ix);
                }
                None => missing.push(field),
            }
        }
        if !missing.is_empty() {
            return Err(MissingFields(missing).into());
        }

        let extras = columns
            .iter()
            .enumerate()
            .filter(|(ix, c)| {
                !fields.values().any(|f| f == ix) && !DERIVED.contains(&c.as_ref())
            })
            .map(|(ix, _)| ix)
            .collect();

        Ok(Self {
            headers,
            columns,
            fields,
            extras,
        })
    }

    pub fn len(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    pub fn headers(&self) -> &[Header] {
        &self.headers
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// The index of the source column that provides `field`.
    pub fn index(&self, field: Field) -> Option<usize> {
        self.fields.get(&field).copied()
    }

    /// Indexes of source columns that are neither required fields nor derived columns.
    pub fn extras(&self) -> &[usize] {
        &self.extras
    }
}

/// Represents a header exactly as it appears in the source file, for example, ` Jumlah Terjual`
#[derive(Default, Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Header(String);

impl AsRef<str> for Header {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl<S: Into<String>> From<S> for Header {
    fn from(value: S) -> Self {
        Self(value.into())
    }
}

impl FromStr for Header {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(s.into())
    }
}

/// Represents a normalized column name, for example, `jumlah_terjual`
#[derive(Default, Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Column(String);

impl AsRef<str> for Column {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for Column {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl Column {
    /// Trims surrounding whitespace, lowercases, and replaces each inner space with `_`.
    pub fn normalize(header: &Header) -> Self {
        Self(normalize_header(header.as_ref()))
    }
}

fn normalize_header(s: &str) -> String {
    s.trim().to_lowercase().replace(' ', "_")
}

#[cfg(test)]
mod test {
    use super::*;

    fn missing(err: anyhow::Error) -> Vec<Field> {
        err.downcast_ref::<MissingFields>()
            .map(|m| m.fields().to_vec())
            .unwrap_or_default()
    }

    #[test]
    fn test_normalize_header() {
        assert_eq!(normalize_header("  Jumlah Terjual "), "jumlah_terjual");
        assert_eq!(normalize_header("UNIT PRICE"), "unit_price");
        assert_eq!(normalize_header("date"), "date");
    }

    #[test]
    fn test_normalize_keeps_inner_double_space() {
        assert_eq!(normalize_header("Unit  Price"), "unit__price");
    }

    #[test]
    fn test_mapping_english() {
        let mapping = Mapping::new(["Date", "Product", "Quantity Sold", "Unit Price"]).unwrap();
        assert_eq!(mapping.index(Field::Date), Some(0));
        assert_eq!(mapping.index(Field::Product), Some(1));
        assert_eq!(mapping.index(Field::QuantitySold), Some(2));
        assert_eq!(mapping.index(Field::UnitPrice), Some(3));
        assert!(mapping.extras().is_empty());
    }

    #[test]
    fn test_mapping_indonesian_mixed_case() {
        let mapping =
            Mapping::new(["Tanggal", " Produk", " Jumlah Terjual", " Harga Satuan"]).unwrap();
        assert_eq!(mapping.index(Field::Date), Some(0));
        assert_eq!(mapping.index(Field::UnitPrice), Some(3));
        assert_eq!(mapping.columns()[2].as_ref(), "jumlah_terjual");
    }

    #[test]
    fn test_mapping_extras_skip_derived() {
        let mapping = Mapping::new([
            "store",
            "date",
            "product",
            "quantity_sold",
            "unit_price",
            "Revenue",
            "bulan",
            "note",
        ])
        .unwrap();
        assert_eq!(mapping.extras(), &[0, 7]);
    }

    #[test]
    fn test_mapping_missing_product() {
        let err = Mapping::new(["date", "quantity_sold", "unit_price"]).unwrap_err();
        assert!(err.to_string().contains("product"));
        assert_eq!(missing(err), vec![Field::Product]);
    }

    #[test]
    fn test_mapping_lists_every_missing_field() {
        let err = Mapping::new(["date", "notes"]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing required columns: product, quantity_sold, unit_price"
        );
        assert_eq!(
            missing(err),
            vec![Field::Product, Field::QuantitySold, Field::UnitPrice]
        );
    }

    #[test]
    fn test_mapping_duplicate_column() {
        let err = Mapping::new(["Date", "date ", "product", "quantity_sold", "unit_price"])
            .unwrap_err();
        assert!(err.downcast_ref::<MappingError>().is_some());
        assert!(err.to_string().contains("both normalize"));
    }

    #[test]
    fn test_field_names() {
        assert_eq!(Field::QuantitySold.name(), "quantity_sold");
        assert_eq!(Field::QuantitySold.to_string(), "quantity_sold");
        assert_eq!("unit_price".parse::<Field>().unwrap(), Field::UnitPrice);
    }
}
