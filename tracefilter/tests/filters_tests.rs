//! End-to-end checks over the public filter API

use tracefilter::filters::fields::{PromptField, SpanField, TraceField};
use tracefilter::filters::{
    DecodeContext, Entity, FieldFilter, Filter, FilterErrorKind, FilterField, FilterParser,
    Operator, ParseLimits, ValueEncoding, ValueKind, WireDecoder, parse_filters, schema,
};

fn parser_for(decoder: &WireDecoder) -> FilterParser<'_> {
    FilterParser::new(decoder, DecodeContext::default())
}

#[test]
fn base64_value_is_decoded_for_prompts() {
    let decoder = WireDecoder::new(ValueEncoding::Base64);
    let json = r#"[{"field": "name", "operator": "contains", "value": "ZHJhZnQ="}]"#;

    let filters = parser_for(&decoder).parse(json, Entity::Prompts).unwrap();

    assert_eq!(filters.len(), 1);
    let prompt = filters[0].as_prompt().unwrap();
    assert_eq!(prompt.field(), PromptField::Name);
    assert_eq!(prompt.operator(), Operator::Contains);
    assert_eq!(prompt.key(), None);
    assert_eq!(prompt.value(), Some("draft"));
}

#[test]
fn is_empty_needs_no_value() {
    let filters = parse_filters(
        r#"[{"field": "description", "operator": "is_empty"}]"#,
        Entity::Prompts,
    )
    .unwrap();
    assert_eq!(filters[0].operator(), Operator::IsEmpty);
    assert_eq!(filters[0].value(), None);
}

#[test]
fn dictionary_field_requires_key() {
    let ok = parse_filters(
        r#"[{"field": "metadata", "operator": "=", "key": "model", "value": "gpt-4"}]"#,
        Entity::Traces,
    )
    .unwrap();
    assert_eq!(ok[0].key(), Some("model"));
    assert_eq!(ok[0].value(), Some("gpt-4"));

    let err = parse_filters(
        r#"[{"field": "metadata", "operator": "=", "value": "gpt-4"}]"#,
        Entity::Traces,
    )
    .unwrap_err();
    assert_eq!(err.kind, FilterErrorKind::MissingKey);
    assert_eq!(err.index, Some(0));
    assert_eq!(err.field.as_deref(), Some("metadata"));
}

#[test]
fn key_on_plain_field_is_rejected() {
    let err = parse_filters(
        r#"[{"field": "name", "operator": "=", "key": "x", "value": "a"}]"#,
        Entity::Spans,
    )
    .unwrap_err();
    assert_eq!(err.code(), "UNEXPECTED_KEY");
}

#[test]
fn constructed_filters_only_carry_supported_operators() {
    for &entity in Entity::ALL {
        for info in schema::fields(entity) {
            for &operator in Operator::ALL {
                let key = info.requires_key.then(|| "k".to_string());
                let result = Filter::construct(
                    entity,
                    info.name,
                    operator,
                    key,
                    Some("v".to_string()),
                );
                assert_eq!(
                    result.is_ok(),
                    info.kind.supports(operator),
                    "{} {} {}",
                    entity,
                    info.name,
                    operator
                );
            }
        }
    }
}

#[test]
fn build_keeps_field_operator_and_key() {
    let filter = FieldFilter::new(
        SpanField::Metadata,
        Operator::StartsWith,
        Some("env".to_string()),
        Some("cHJvZA==".to_string()),
    )
    .unwrap();

    let built = filter.build("prod").unwrap();
    assert_eq!(built.field(), SpanField::Metadata);
    assert_eq!(built.operator(), Operator::StartsWith);
    assert_eq!(built.key(), Some("env"));
    assert_eq!(built.value(), Some("prod"));

    // Building twice with the same value yields the same filter
    assert_eq!(built.build("prod").unwrap(), built);
}

#[test]
fn list_order_and_duplicates_are_preserved() {
    let json = r#"[
        {"field": "tags", "operator": "contains", "value": "b"},
        {"field": "tags", "operator": "contains", "value": "a"},
        {"field": "tags", "operator": "contains", "value": "b"}
    ]"#;
    let filters = parse_filters(json, Entity::Traces).unwrap();
    let values: Vec<_> = filters.iter().map(|f| f.value()).collect();
    assert_eq!(values, vec![Some("b"), Some("a"), Some("b")]);
}

#[test]
fn first_bad_descriptor_fails_whole_list() {
    let json = r#"[
        {"field": "name", "operator": "=", "value": "ok"},
        {"field": "total_estimated_cost", "operator": "contains", "value": "1"},
        {"field": "nope", "operator": "=", "value": "x"}
    ]"#;
    let err = parse_filters(json, Entity::Traces).unwrap_err();
    assert_eq!(err.index, Some(1));
    assert_eq!(err.code(), "UNSUPPORTED_OPERATOR");
}

#[test]
fn url_encoded_datetime_is_normalized_in_timezone() {
    let decoder = WireDecoder::new(ValueEncoding::Url);
    let parser = FilterParser::new(
        &decoder,
        DecodeContext::with_timezone(chrono_tz::America::New_York),
    );
    let json = r#"[{"field": "start_time", "operator": ">", "value": "2024-07-01T08%3A00%3A00"}]"#;

    let filters = parser.parse(json, Entity::Traces).unwrap();
    assert_eq!(filters[0].value_kind(), ValueKind::DateTime);
    assert_eq!(filters[0].value(), Some("2024-07-01T12:00:00Z"));
}

#[test]
fn limits_are_configurable() {
    let decoder = WireDecoder::default();
    let parser = parser_for(&decoder).with_limits(ParseLimits {
        max_filters: 1,
        ..Default::default()
    });
    let json = r#"[
        {"field": "id", "operator": "is_not_empty"},
        {"field": "id", "operator": "is_empty"}
    ]"#;
    let err = parser.parse(json, Entity::Threads).unwrap_err();
    assert_eq!(err.code(), "TOO_MANY_FILTERS");
}

#[test]
fn usage_subfield_uses_dotted_wire_name() {
    assert_eq!(
        TraceField::from_wire("usage.total_tokens"),
        Some(TraceField::TotalTokens)
    );
    assert_eq!(TraceField::TotalTokens.value_kind(), ValueKind::Number);
}

#[test]
fn builtin_schema_is_consistent() {
    schema::validate().unwrap();
}
