//! Filter list parsing
//!
//! Parses a JSON list of raw descriptors into validated, decoded
//! [`Filter`]s. Lists are all-or-nothing: the first invalid descriptor
//! fails the whole batch and the error carries its index.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::decoder::{DecodeContext, Decoder, WireDecoder};
use super::entity::{Entity, Filter};
use super::error::{FilterError, FilterErrorKind};
use super::operator::Operator;

/// Maximum size of filter JSON in bytes (64KB)
pub const MAX_FILTER_JSON_SIZE: usize = 64 * 1024;

/// Maximum number of filters allowed
pub const MAX_FILTERS: usize = 50;

/// One descriptor as received on the wire
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawFilter {
    pub field: String,
    pub operator: String,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default, deserialize_with = "scalar_as_string")]
    pub value: Option<String>,
}

/// Descriptor carrying its own entity discriminator
#[derive(Debug, Clone, Deserialize)]
struct TaggedRawFilter {
    entity: String,
    #[serde(flatten)]
    filter: RawFilter,
}

/// Accept numbers and booleans where a string value is expected
fn scalar_as_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "filter value must be a string, got {}",
            other
        ))),
    }
}

/// Batch size limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseLimits {
    pub max_filters: usize,
    pub max_json_bytes: usize,
}

impl Default for ParseLimits {
    fn default() -> Self {
        Self {
            max_filters: MAX_FILTERS,
            max_json_bytes: MAX_FILTER_JSON_SIZE,
        }
    }
}

/// Parses descriptor lists with a fixed decoder and context
pub struct FilterParser<'a> {
    decoder: &'a dyn Decoder,
    ctx: DecodeContext,
    limits: ParseLimits,
}

impl<'a> FilterParser<'a> {
    pub fn new(decoder: &'a dyn Decoder, ctx: DecodeContext) -> Self {
        Self {
            decoder,
            ctx,
            limits: ParseLimits::default(),
        }
    }

    pub fn with_limits(mut self, limits: ParseLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Parse a JSON list of descriptors, all bound to `entity`
    pub fn parse(&self, json_str: &str, entity: Entity) -> Result<Vec<Filter>, FilterError> {
        let items = self.read_list(json_str)?;
        let result: Result<Vec<Filter>, FilterError> = items
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                let raw: RawFilter = descriptor(index, item)?;
                self.resolve(entity, index, &raw)
            })
            .collect();
        log_outcome(&result, Some(entity));
        result
    }

    /// Parse a JSON list where each descriptor names its own `entity`
    pub fn parse_tagged(&self, json_str: &str) -> Result<Vec<Filter>, FilterError> {
        let items = self.read_list(json_str)?;
        let result: Result<Vec<Filter>, FilterError> = items
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                let tagged: TaggedRawFilter = descriptor(index, item)?;
                let entity = Entity::from_wire(&tagged.entity).ok_or_else(|| {
                    FilterError::new(FilterErrorKind::UnknownEntity {
                        name: tagged.entity.clone(),
                    })
                    .at(index)
                })?;
                self.resolve(entity, index, &tagged.filter)
            })
            .collect();
        log_outcome(&result, None);
        result
    }

    /// Validate and decode already-deserialized descriptors, preserving order
    pub fn parse_descriptors(
        &self,
        entity: Entity,
        descriptors: &[RawFilter],
    ) -> Result<Vec<Filter>, FilterError> {
        if descriptors.len() > self.limits.max_filters {
            return Err(FilterErrorKind::TooManyFilters {
                max: self.limits.max_filters,
            }
            .into());
        }

        let result: Result<Vec<Filter>, FilterError> = descriptors
            .iter()
            .enumerate()
            .map(|(index, raw)| self.resolve(entity, index, raw))
            .collect();
        log_outcome(&result, Some(entity));
        result
    }

    /// Size and count checks; descriptors stay untyped until resolved in order
    fn read_list(&self, json_str: &str) -> Result<Vec<Value>, FilterError> {
        if json_str.len() > self.limits.max_json_bytes {
            return Err(FilterErrorKind::JsonTooLarge {
                max: self.limits.max_json_bytes,
            }
            .into());
        }

        if json_str.trim().is_empty() {
            return Ok(Vec::new());
        }

        let list: Vec<Value> = serde_json::from_str(json_str)
            .map_err(|e| FilterError::new(FilterErrorKind::InvalidJson(e.to_string())))?;

        if list.len() > self.limits.max_filters {
            return Err(FilterErrorKind::TooManyFilters {
                max: self.limits.max_filters,
            }
            .into());
        }
        Ok(list)
    }

    /// Construct, decode and rebuild one descriptor
    fn resolve(&self, entity: Entity, index: usize, raw: &RawFilter) -> Result<Filter, FilterError> {
        tracing::trace!(index, %entity, field = %raw.field, operator = %raw.operator, "Resolving filter");

        let operator = Operator::from_wire(&raw.operator).ok_or_else(|| {
            FilterError::new(FilterErrorKind::UnknownOperator {
                name: raw.operator.clone(),
            })
            .at(index)
            .on_field(raw.field.as_str())
        })?;

        let filter = Filter::construct(
            entity,
            &raw.field,
            operator,
            raw.key.clone(),
            raw.value.clone(),
        )
        .map_err(|e| e.at(index))?;

        let Some(raw_value) = filter.value() else {
            return Ok(filter);
        };

        let decoded = self
            .decoder
            .decode(raw_value, filter.value_kind(), &self.ctx)
            .map_err(|e| {
                FilterError::new(e.into())
                    .at(index)
                    .on_field(filter.field_name())
            })?;

        filter.build(decoded).map_err(|e| e.at(index))
    }
}

/// Deserialize one list element, locating shape errors at `index`
fn descriptor<T: DeserializeOwned>(index: usize, item: Value) -> Result<T, FilterError> {
    let field = item
        .get("field")
        .and_then(Value::as_str)
        .map(str::to_string);
    serde_json::from_value(item).map_err(|e| {
        let err = FilterError::new(FilterErrorKind::InvalidJson(e.to_string())).at(index);
        match field {
            Some(field) => err.on_field(field),
            None => err,
        }
    })
}

fn log_outcome(result: &Result<Vec<Filter>, FilterError>, entity: Option<Entity>) {
    let entity = entity.map(|e| e.as_str()).unwrap_or("mixed");
    match result {
        Ok(filters) => tracing::debug!(entity, count = filters.len(), "Parsed filters"),
        Err(e) => tracing::warn!(
            entity,
            code = e.code(),
            index = ?e.index,
            field = ?e.field,
            error = %e.kind,
            "Rejected filter list"
        ),
    }
}

/// Parse plain (unencoded) filters for `entity` with default limits
pub fn parse_filters(json_str: &str, entity: Entity) -> Result<Vec<Filter>, FilterError> {
    let decoder = WireDecoder::default();
    FilterParser::new(&decoder, DecodeContext::default()).parse(json_str, entity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::decoder::ValueEncoding;
    use base64::prelude::*;

    fn b64(s: &str) -> String {
        BASE64_STANDARD.encode(s)
    }

    fn parse_base64(json: &str, entity: Entity) -> Result<Vec<Filter>, FilterError> {
        let decoder = WireDecoder::new(ValueEncoding::Base64);
        FilterParser::new(&decoder, DecodeContext::default()).parse(json, entity)
    }

    #[test]
    fn parse_filters_valid_json() {
        let json = r#"[{"field": "name", "operator": "=", "value": "support-bot"}]"#;
        let filters = parse_filters(json, Entity::Prompts).unwrap();
        assert_eq!(filters.len(), 1);
        assert_eq!(filters[0].value(), Some("support-bot"));
    }

    #[test]
    fn parse_filters_empty_input() {
        assert!(parse_filters("", Entity::Traces).unwrap().is_empty());
        assert!(parse_filters("  ", Entity::Traces).unwrap().is_empty());
        assert!(parse_filters("[]", Entity::Traces).unwrap().is_empty());
    }

    #[test]
    fn parse_filters_invalid_json() {
        let err = parse_filters("not valid json", Entity::Traces).unwrap_err();
        assert_eq!(err.code(), "INVALID_FILTER_JSON");
        assert_eq!(err.index, None);

        let err = parse_filters(r#"{"field": "name"}"#, Entity::Traces).unwrap_err();
        assert_eq!(err.code(), "INVALID_FILTER_JSON");
        assert_eq!(err.index, None);
    }

    #[test]
    fn malformed_descriptor_is_located() {
        // second descriptor has no "operator"
        let json = r#"[
            {"field": "name", "operator": "=", "value": "a"},
            {"field": "name", "value": "b"}
        ]"#;
        let err = parse_filters(json, Entity::Traces).unwrap_err();
        assert_eq!(err.code(), "INVALID_FILTER_JSON");
        assert_eq!(err.index, Some(1));
        assert_eq!(err.field.as_deref(), Some("name"));

        let err = parse_filters(r#"[{"operator": "="}]"#, Entity::Traces).unwrap_err();
        assert_eq!(err.index, Some(0));
        assert_eq!(err.field, None);

        let err = parse_filters(r#"[42]"#, Entity::Traces).unwrap_err();
        assert_eq!(err.code(), "INVALID_FILTER_JSON");
        assert_eq!(err.index, Some(0));
    }

    #[test]
    fn non_scalar_value_is_located() {
        let json = r#"[
            {"field": "name", "operator": "=", "value": "a"},
            {"field": "tags", "operator": "contains", "value": ["x"]}
        ]"#;
        let err = parse_filters(json, Entity::Traces).unwrap_err();
        assert_eq!(err.code(), "INVALID_FILTER_JSON");
        assert_eq!(err.index, Some(1));
        assert_eq!(err.field.as_deref(), Some("tags"));
    }

    #[test]
    fn earlier_semantic_error_wins_over_later_malformed_descriptor() {
        let json = r#"[
            {"field": "version_count", "operator": "contains", "value": "2"},
            {"field": "name", "operator": "=", "value": "ok"},
            {"field": "name", "operator": "=", "value": {"x": 1}}
        ]"#;
        let err = parse_filters(json, Entity::Prompts).unwrap_err();
        assert_eq!(err.code(), "UNSUPPORTED_OPERATOR");
        assert_eq!(err.index, Some(0));
    }

    #[test]
    fn tagged_malformed_descriptor_is_located() {
        let decoder = WireDecoder::default();
        let parser = FilterParser::new(&decoder, DecodeContext::default());
        let json = r#"[
            {"entity": "prompts", "field": "name", "operator": "=", "value": "a"},
            {"field": "name", "operator": "=", "value": "a"}
        ]"#;
        let err = parser.parse_tagged(json).unwrap_err();
        assert_eq!(err.code(), "INVALID_FILTER_JSON");
        assert_eq!(err.index, Some(1));
    }

    #[test]
    fn parse_descriptors_enforces_max_filters() {
        let decoder = WireDecoder::default();
        let parser = FilterParser::new(&decoder, DecodeContext::default()).with_limits(ParseLimits {
            max_filters: 2,
            ..Default::default()
        });
        let raw = RawFilter {
            field: "name".to_string(),
            operator: "is_not_empty".to_string(),
            key: None,
            value: None,
        };

        let filters = parser
            .parse_descriptors(Entity::Traces, &vec![raw.clone(); 2])
            .unwrap();
        assert_eq!(filters.len(), 2);

        let err = parser
            .parse_descriptors(Entity::Traces, &vec![raw; 3])
            .unwrap_err();
        assert_eq!(err.code(), "TOO_MANY_FILTERS");
        assert_eq!(err.index, None);
    }

    #[test]
    fn url_encoded_space_is_a_valid_needle() {
        let decoder = WireDecoder::new(ValueEncoding::Url);
        let parser = FilterParser::new(&decoder, DecodeContext::default());
        let json = r#"[
            {"field": "name", "operator": "contains", "value": "%20"},
            {"field": "duration", "operator": ">", "value": "%203%20"}
        ]"#;
        let filters = parser.parse(json, Entity::Traces).unwrap();
        assert_eq!(filters[0].value(), Some(" "));
        assert_eq!(filters[1].value(), Some("3"));
    }

    #[test]
    fn parse_filters_numeric_value() {
        let json = r#"[{"field": "duration", "operator": ">", "value": 1500}]"#;
        let filters = parse_filters(json, Entity::Traces).unwrap();
        assert_eq!(filters[0].value(), Some("1500"));
    }

    #[test]
    fn parse_filters_preserves_order_and_duplicates() {
        let json = r#"[
            {"field": "tags", "operator": "contains", "value": "prod"},
            {"field": "name", "operator": "starts_with", "value": "chat"},
            {"field": "tags", "operator": "contains", "value": "beta"}
        ]"#;
        let filters = parse_filters(json, Entity::Datasets).unwrap();
        let seen: Vec<_> = filters
            .iter()
            .map(|f| (f.field_name(), f.value().unwrap()))
            .collect();
        assert_eq!(
            seen,
            vec![("tags", "prod"), ("name", "chat"), ("tags", "beta")]
        );
    }

    #[test]
    fn parse_filters_fails_fast_with_index() {
        let json = r#"[
            {"field": "name", "operator": "=", "value": "a"},
            {"field": "version_count", "operator": "contains", "value": "2"},
            {"field": "nope", "operator": "=", "value": "c"}
        ]"#;
        let err = parse_filters(json, Entity::Prompts).unwrap_err();
        assert_eq!(err.code(), "UNSUPPORTED_OPERATOR");
        assert_eq!(err.index, Some(1));
        assert_eq!(err.field.as_deref(), Some("version_count"));
    }

    #[test]
    fn parse_filters_unknown_operator() {
        let json = r#"[{"field": "name", "operator": "like", "value": "a"}]"#;
        let err = parse_filters(json, Entity::Prompts).unwrap_err();
        assert_eq!(err.code(), "UNKNOWN_OPERATOR");
        assert_eq!(err.index, Some(0));
    }

    #[test]
    fn parse_filters_too_large() {
        let json = format!("[{}]", " ".repeat(MAX_FILTER_JSON_SIZE));
        let err = parse_filters(&json, Entity::Prompts).unwrap_err();
        assert_eq!(err.code(), "FILTER_JSON_TOO_LARGE");
    }

    #[test]
    fn parse_filters_too_many() {
        let one = r#"{"field": "name", "operator": "is_not_empty"}"#;
        let json = format!("[{}]", vec![one; MAX_FILTERS + 1].join(","));
        let err = parse_filters(&json, Entity::Prompts).unwrap_err();
        assert_eq!(err.code(), "TOO_MANY_FILTERS");
    }

    #[test]
    fn custom_limits() {
        let decoder = WireDecoder::default();
        let parser = FilterParser::new(&decoder, DecodeContext::default()).with_limits(ParseLimits {
            max_filters: 1,
            max_json_bytes: 1024,
        });
        let json = r#"[
            {"field": "name", "operator": "is_empty"},
            {"field": "name", "operator": "is_empty"}
        ]"#;
        assert_eq!(
            parser.parse(json, Entity::Projects).unwrap_err().code(),
            "TOO_MANY_FILTERS"
        );
    }

    #[test]
    fn base64_prompt_name_contains() {
        let json = format!(
            r#"[{{"field": "name", "operator": "contains", "value": "{}"}}]"#,
            b64("draft")
        );
        let filters = parse_base64(&json, Entity::Prompts).unwrap();
        let prompt = filters[0].as_prompt().unwrap();
        assert_eq!(prompt.value(), Some("draft"));
        assert_eq!(prompt.operator(), Operator::Contains);
    }

    #[test]
    fn base64_decode_failure_is_reported() {
        let json = r#"[{"field": "name", "operator": "contains", "value": "%%%"}]"#;
        let err = parse_base64(json, Entity::Prompts).unwrap_err();
        assert_eq!(err.code(), "DECODE_FAILURE");
        assert_eq!(err.index, Some(0));
        assert_eq!(err.field.as_deref(), Some("name"));
    }

    #[test]
    fn decoded_value_format_is_checked() {
        let json = format!(
            r#"[{{"field": "usage.total_tokens", "operator": ">", "value": "{}"}}]"#,
            b64("lots")
        );
        let err = parse_base64(&json, Entity::Traces).unwrap_err();
        assert_eq!(err.code(), "INVALID_VALUE_FORMAT");
    }

    #[test]
    fn nullary_filter_skips_decoding() {
        let json = r#"[{"field": "name", "operator": "is_empty", "value": "%%%"}]"#;
        let filters = parse_base64(json, Entity::Prompts).unwrap();
        assert_eq!(filters[0].value(), None);
    }

    #[test]
    fn parse_tagged_dispatches_per_descriptor() {
        let decoder = WireDecoder::default();
        let parser = FilterParser::new(&decoder, DecodeContext::default());
        let json = r#"[
            {"entity": "prompts", "field": "name", "operator": "=", "value": "a"},
            {"entity": "span", "field": "type", "operator": "=", "value": "tool"}
        ]"#;
        let filters = parser.parse_tagged(json).unwrap();
        assert_eq!(filters[0].entity(), Entity::Prompts);
        assert_eq!(filters[1].entity(), Entity::Spans);

        let json = r#"[{"entity": "widgets", "field": "name", "operator": "=", "value": "a"}]"#;
        let err = parser.parse_tagged(json).unwrap_err();
        assert_eq!(err.code(), "UNKNOWN_ENTITY");
        assert_eq!(err.index, Some(0));
    }
}
