//! Shared filter state and validation
//!
//! [`FieldFilter`] is the immutable predicate shared by every entity
//! variant. Construction checks the operator, key and value presence;
//! [`FieldFilter::build`] swaps in the decoded value and checks its format.

use serde::Serialize;

use super::error::{FilterError, FilterErrorKind};
use super::fields::FilterField;
use super::operator::Operator;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct FieldFilter<F: FilterField> {
    field: F,
    operator: Operator,
    key: Option<String>,
    value: Option<String>,
}

impl<F: FilterField> FieldFilter<F> {
    /// Validate a descriptor and hold its raw (still encoded) value.
    ///
    /// Blank keys and values count as absent. Nullary operators drop any
    /// supplied value.
    pub fn new(
        field: F,
        operator: Operator,
        key: Option<String>,
        value: Option<String>,
    ) -> Result<Self, FilterError> {
        let kind = field.value_kind();
        let fail = |err: FilterErrorKind| FilterError::new(err).on_field(field.as_str());

        if !field.is_supported(operator) {
            return Err(fail(FilterErrorKind::UnsupportedOperator { operator, kind }));
        }

        let key = key.filter(|k| !k.trim().is_empty());
        match (kind.requires_key(), &key) {
            (true, None) => return Err(fail(FilterErrorKind::MissingKey)),
            (false, Some(_)) => return Err(fail(FilterErrorKind::UnexpectedKey { kind })),
            _ => {}
        }

        let value = if operator.is_nullary() {
            None
        } else {
            match value.filter(|v| !v.trim().is_empty()) {
                Some(v) => Some(v),
                None => return Err(fail(FilterErrorKind::MissingValue { operator })),
            }
        };

        Ok(Self {
            field,
            operator,
            key,
            value,
        })
    }

    /// New filter with `decoded_value` in place of the raw value.
    ///
    /// Field, operator and key are carried over unchanged. Nullary filters
    /// ignore the value and are returned as-is.
    pub fn build(&self, decoded_value: impl Into<String>) -> Result<Self, FilterError> {
        if self.operator.is_nullary() {
            return Ok(self.clone());
        }

        let decoded_value = decoded_value.into();
        let kind = self.field.value_kind();
        let value = kind
            .normalize_value(&decoded_value, self.field.enum_values())
            .map_err(|reason| {
                FilterError::new(FilterErrorKind::InvalidValueFormat { kind, reason })
                    .on_field(self.field.as_str())
            })?;

        Ok(Self {
            value: Some(value),
            ..self.clone()
        })
    }

    pub fn field(&self) -> F {
        self.field
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }
}
