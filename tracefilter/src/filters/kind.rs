//! Semantic value kinds
//!
//! Every filterable field declares one kind. The kind decides which
//! operators are legal, whether a `key` is required, and what a decoded
//! value must look like.

use std::fmt;

use chrono::DateTime;
use serde::Serialize;

use super::operator::Operator;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    String,
    Number,
    DateTime,
    Enum,
    List,
    /// Structured value addressed by a key or JSON path (metadata, feedback scores, ...)
    Dictionary,
}

const STRING_OPS: &[Operator] = &[
    Operator::Equal,
    Operator::NotEqual,
    Operator::Contains,
    Operator::NotContains,
    Operator::StartsWith,
    Operator::EndsWith,
    Operator::IsEmpty,
    Operator::IsNotEmpty,
];

const NUMBER_OPS: &[Operator] = &[
    Operator::Equal,
    Operator::NotEqual,
    Operator::GreaterThan,
    Operator::GreaterThanEqual,
    Operator::LessThan,
    Operator::LessThanEqual,
];

const DATE_TIME_OPS: &[Operator] = &[
    Operator::Equal,
    Operator::GreaterThan,
    Operator::GreaterThanEqual,
    Operator::LessThan,
    Operator::LessThanEqual,
];

const ENUM_OPS: &[Operator] = &[Operator::Equal, Operator::NotEqual];

const LIST_OPS: &[Operator] = &[Operator::Contains];

const DICTIONARY_OPS: &[Operator] = &[
    Operator::Equal,
    Operator::NotEqual,
    Operator::Contains,
    Operator::NotContains,
    Operator::StartsWith,
    Operator::EndsWith,
    Operator::GreaterThan,
    Operator::LessThan,
    Operator::IsEmpty,
    Operator::IsNotEmpty,
];

impl ValueKind {
    pub const ALL: &'static [ValueKind] = &[
        ValueKind::String,
        ValueKind::Number,
        ValueKind::DateTime,
        ValueKind::Enum,
        ValueKind::List,
        ValueKind::Dictionary,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::DateTime => "date_time",
            Self::Enum => "enum",
            Self::List => "list",
            Self::Dictionary => "dictionary",
        }
    }

    pub fn permitted_operators(&self) -> &'static [Operator] {
        match self {
            Self::String => STRING_OPS,
            Self::Number => NUMBER_OPS,
            Self::DateTime => DATE_TIME_OPS,
            Self::Enum => ENUM_OPS,
            Self::List => LIST_OPS,
            Self::Dictionary => DICTIONARY_OPS,
        }
    }

    pub fn supports(&self, operator: Operator) -> bool {
        self.permitted_operators().contains(&operator)
    }

    pub fn requires_key(&self) -> bool {
        matches!(self, Self::Dictionary)
    }

    /// Check a decoded value against this kind and return the form to store.
    ///
    /// Number, date-time and enum values are compared trimmed and stored
    /// trimmed. Free-text kinds keep the value verbatim, so a lone space is a
    /// valid `contains` needle; only an empty string is rejected there.
    /// `enum_values` is only consulted for [`ValueKind::Enum`].
    pub fn normalize_value(&self, value: &str, enum_values: &[&str]) -> Result<String, String> {
        if let Self::String | Self::List | Self::Dictionary = self {
            return if value.is_empty() {
                Err("value is empty".to_string())
            } else {
                Ok(value.to_string())
            };
        }

        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err("value is blank".to_string());
        }
        match self {
            Self::Number => match trimmed.parse::<f64>() {
                Ok(n) if n.is_finite() => Ok(trimmed.to_string()),
                _ => Err(format!("'{}' is not a number", trimmed)),
            },
            Self::DateTime => DateTime::parse_from_rfc3339(trimmed)
                .map(|_| trimmed.to_string())
                .map_err(|_| format!("'{}' is not an RFC 3339 timestamp", trimmed)),
            Self::Enum if enum_values.contains(&trimmed) => Ok(trimmed.to_string()),
            Self::Enum => Err(format!(
                "'{}' is not one of: {}",
                trimmed,
                enum_values.join(", ")
            )),
            Self::String | Self::List | Self::Dictionary => Ok(value.to_string()),
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
