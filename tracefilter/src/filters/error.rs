//! Filter validation errors
//!
//! Every failure carries a stable upper-snake code so callers can map it to
//! a structured response. Errors raised while parsing a list also carry the
//! index and field of the offending descriptor.

use std::fmt;

use thiserror::Error;

use super::decoder::DecodeError;
use super::kind::ValueKind;
use super::operator::Operator;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterErrorKind {
    #[error("operator '{operator}' is not supported for {kind} fields")]
    UnsupportedOperator { operator: Operator, kind: ValueKind },

    #[error("key is required for dictionary fields")]
    MissingKey,

    #[error("key is not allowed for {kind} fields")]
    UnexpectedKey { kind: ValueKind },

    #[error("value is required for operator '{operator}'")]
    MissingValue { operator: Operator },

    #[error("invalid {kind} value: {reason}")]
    InvalidValueFormat { kind: ValueKind, reason: String },

    #[error("unknown field '{name}' for {entity}")]
    UnknownField { name: String, entity: String },

    #[error("unknown operator '{name}'")]
    UnknownOperator { name: String },

    #[error("unknown entity '{name}'")]
    UnknownEntity { name: String },

    #[error("failed to decode value: {0}")]
    DecodeFailure(#[from] DecodeError),

    #[error("filter JSON exceeds maximum size of {max} bytes")]
    JsonTooLarge { max: usize },

    #[error("maximum {max} filters allowed")]
    TooManyFilters { max: usize },

    #[error("invalid filter JSON: {0}")]
    InvalidJson(String),
}

impl FilterErrorKind {
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnsupportedOperator { .. } => "UNSUPPORTED_OPERATOR",
            Self::MissingKey => "MISSING_KEY",
            Self::UnexpectedKey { .. } => "UNEXPECTED_KEY",
            Self::MissingValue { .. } => "MISSING_VALUE",
            Self::InvalidValueFormat { .. } => "INVALID_VALUE_FORMAT",
            Self::UnknownField { .. } => "UNKNOWN_FIELD",
            Self::UnknownOperator { .. } => "UNKNOWN_OPERATOR",
            Self::UnknownEntity { .. } => "UNKNOWN_ENTITY",
            Self::DecodeFailure(_) => "DECODE_FAILURE",
            Self::JsonTooLarge { .. } => "FILTER_JSON_TOO_LARGE",
            Self::TooManyFilters { .. } => "TOO_MANY_FILTERS",
            Self::InvalidJson(_) => "INVALID_FILTER_JSON",
        }
    }
}

/// A rejected filter, optionally located within a descriptor list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterError {
    pub index: Option<usize>,
    pub field: Option<String>,
    pub kind: FilterErrorKind,
}

impl FilterError {
    pub fn new(kind: FilterErrorKind) -> Self {
        Self {
            index: None,
            field: None,
            kind,
        }
    }

    /// Attach the descriptor position within its list
    pub fn at(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    /// Attach the wire name of the offending field
    pub fn on_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }
}

impl From<FilterErrorKind> for FilterError {
    fn from(kind: FilterErrorKind) -> Self {
        Self::new(kind)
    }
}

impl fmt::Display for FilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.index, &self.field) {
            (Some(i), Some(field)) => write!(f, "filter {} ({}): {}", i, field, self.kind),
            (Some(i), None) => write!(f, "filter {}: {}", i, self.kind),
            (None, Some(field)) => write!(f, "{}: {}", field, self.kind),
            (None, None) => write!(f, "{}", self.kind),
        }
    }
}

impl std::error::Error for FilterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.kind)
    }
}
