//! The public error type. Internally the crate uses `anyhow` for context chains, and at the
//! public boundary every failure is tagged with an `ErrorType` so that callers can branch on the
//! kind of failure instead of matching on message text.

use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display, Formatter};

/// The kind of failure that occurred.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    /// The source is not a well-formed delimited table.
    Parse,
    /// One or more required columns are missing.
    Schema,
    /// A summary was requested for an empty view.
    InsufficientData,
    /// A file could not be opened or read.
    Io,
    /// The configuration file is invalid.
    Config,
    /// An export file could not be written.
    Export,
}

serde_plain::derive_display_from_serialize!(ErrorType);
serde_plain::derive_fromstr_from_deserialize!(ErrorType);

/// An error with an `ErrorType` tag and a human-readable message chain.
pub struct Error {
    error_type: ErrorType,
    source: anyhow::Error,
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn new(error_type: ErrorType, source: impl Into<anyhow::Error>) -> Self {
        Self {
            error_type,
            source: source.into(),
        }
    }

    pub(crate) fn msg(error_type: ErrorType, message: impl Display) -> Self {
        Self::new(error_type, anyhow::anyhow!("{message}"))
    }

    /// Wraps the message chain with `context`, keeping the `ErrorType`.
    pub(crate) fn context<C>(self, context: C) -> Self
    where
        C: Display + Send + Sync + 'static,
    {
        Self {
            error_type: self.error_type,
            source: self.source.context(context),
        }
    }

    pub fn error_type(&self) -> ErrorType {
        self.error_type
    }

    /// The full message, including every context layer, e.g. `Unable to load x.csv: bad row`.
    pub fn message(&self) -> String {
        format!("{:#}", self.source)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#}", self.source)
    }
}

impl Debug for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} error: {:?}", self.error_type, self.source)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&*self.source)
    }
}

/// Converts an internal result into a public, tagged `Result`.
pub(crate) trait IntoResult<T> {
    fn pub_result(self, error_type: ErrorType) -> Result<T>;
}

impl<T, E> IntoResult<T> for std::result::Result<T, E>
where
    E: Into<anyhow::Error>,
{
    fn pub_result(self, error_type: ErrorType) -> Result<T> {
        self.map_err(|e| Error::new(error_type, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_message_includes_context() {
        let result: anyhow::Result<()> = Err(anyhow::anyhow!("inner")).context("outer");
        let err = result.pub_result(ErrorType::Parse).unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Parse);
        assert_eq!(err.message(), "outer: inner");
        assert_eq!(err.to_string(), "outer: inner");
    }

    #[test]
    fn test_error_type_display() {
        assert_eq!(ErrorType::InsufficientData.to_string(), "insufficient_data");
        assert_eq!("schema".parse::<ErrorType>().unwrap(), ErrorType::Schema);
    }
}
