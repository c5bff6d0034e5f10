use crate::value::Value;
use derive_more::Display;
use std::error::Error as StdError;
use thiserror::Error as ThisError;

///
/// ScanError
///
/// Every failure a scan can surface. Each variant maps onto one stable
/// [`ScanErrorKind`]; callers match on the kind, not on message text.
///

#[derive(Debug, ThisError)]
pub enum ScanError {
    #[error("structural error: {message}")]
    Structural { message: String },

    #[error("entity '{entity}' must declare exactly one 'pk' field, found {found}")]
    PrimaryKey { entity: &'static str, found: usize },

    #[error("unknown scan path '{path}'")]
    UnknownPath { path: String },

    #[error("column mismatch at path '{path}': expected {expected} columns, found {found}")]
    ColumnMismatch {
        path: String,
        expected: usize,
        found: usize,
    },

    #[error("row width mismatch: plan expects {expected} values, row has {found}")]
    RowWidth { expected: usize, found: usize },

    #[error("cannot scan {value} into {entity}.{field} ({ty})")]
    Conversion {
        entity: &'static str,
        field: &'static str,
        ty: &'static str,
        value: Value,
    },

    #[error(
        "inconsistent single relation at '{path}': already holds key {existing}, row supplied key {found}"
    )]
    InconsistentSingleRelation {
        path: String,
        existing: Value,
        found: Value,
    },

    #[error("no rows returned for single-root scan of '{entity}'")]
    NoRows { entity: &'static str },

    #[error("row source error: {0}")]
    Source(#[source] Box<dyn StdError + Send + Sync>),
}

impl ScanError {
    /// Construct a structural error.
    pub fn structural(message: impl Into<String>) -> Self {
        Self::Structural {
            message: message.into(),
        }
    }

    /// Construct an unknown-path error.
    pub fn unknown_path(path: impl Into<String>) -> Self {
        Self::UnknownPath { path: path.into() }
    }

    /// Wrap a failure raised by the upstream row source.
    pub fn from_source(err: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
        Self::Source(err.into())
    }

    #[must_use]
    pub const fn kind(&self) -> ScanErrorKind {
        match self {
            Self::Structural { .. } => ScanErrorKind::Structural,
            Self::PrimaryKey { .. } => ScanErrorKind::PrimaryKey,
            Self::UnknownPath { .. } => ScanErrorKind::UnknownPath,
            Self::ColumnMismatch { .. } | Self::RowWidth { .. } => ScanErrorKind::ColumnMismatch,
            Self::Conversion { .. } => ScanErrorKind::Conversion,
            Self::InconsistentSingleRelation { .. } => ScanErrorKind::InconsistentSingleRelation,
            Self::NoRows { .. } => ScanErrorKind::NoRows,
            Self::Source(_) => ScanErrorKind::Source,
        }
    }

    #[must_use]
    pub const fn is_no_rows(&self) -> bool {
        matches!(self, Self::NoRows { .. })
    }

    #[must_use]
    pub fn display_with_kind(&self) -> String {
        format!("{}: {self}", self.kind())
    }
}

///
/// ScanErrorKind
/// Stable classification of [`ScanError`].
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
#[remain::sorted]
pub enum ScanErrorKind {
    #[display("column_mismatch")]
    ColumnMismatch,
    #[display("conversion")]
    Conversion,
    #[display("inconsistent_single_relation")]
    InconsistentSingleRelation,
    #[display("no_rows")]
    NoRows,
    #[display("primary_key")]
    PrimaryKey,
    #[display("source")]
    Source,
    #[display("structural")]
    Structural,
    #[display("unknown_path")]
    UnknownPath,
}
