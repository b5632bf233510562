//! Query filter system
//!
//! Turns user-supplied filter descriptors (field, operator, optional key,
//! encoded value) into validated, immutable [`Filter`]s for one entity.
//! Filters carry no storage knowledge; a query layer reads their field,
//! operator, key and decoded value.
//!
//! ## Usage
//!
//! ```
//! use tracefilter::filters::{DecodeContext, Entity, FilterParser, ValueEncoding, WireDecoder};
//!
//! let decoder = WireDecoder::new(ValueEncoding::Base64);
//! let parser = FilterParser::new(&decoder, DecodeContext::default());
//!
//! // "ZHJhZnQ=" is base64 for "draft"
//! let json = r#"[{"field": "name", "operator": "contains", "value": "ZHJhZnQ="}]"#;
//! let filters = parser.parse(json, Entity::Prompts).unwrap();
//! assert_eq!(filters[0].value(), Some("draft"));
//! ```

mod decoder;
mod entity;
mod error;
pub mod fields;
mod filter;
mod kind;
mod operator;
mod parser;
pub mod schema;

pub use decoder::{DecodeContext, DecodeError, Decoder, ValueEncoding, WireDecoder};
pub use entity::{
    DatasetFilter, Entity, ExperimentFilter, Filter, ProjectFilter, PromptFilter, SpanFilter,
    ThreadFilter, TraceFilter,
};
pub use error::{FilterError, FilterErrorKind};
pub use fields::FilterField;
pub use filter::FieldFilter;
pub use kind::ValueKind;
pub use operator::Operator;
pub use parser::{
    FilterParser, MAX_FILTER_JSON_SIZE, MAX_FILTERS, ParseLimits, RawFilter, parse_filters,
};
