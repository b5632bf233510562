//! Entities and the polymorphic filter
//!
//! [`Filter`] is a sum type with one variant per entity. Each variant wraps
//! a [`FieldFilter`] bound to that entity's field enumeration, so matching
//! on the variant is exhaustive over every entity kind.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::error::{FilterError, FilterErrorKind};
use super::fields::{
    DatasetField, ExperimentField, FilterField, ProjectField, PromptField, SpanField, ThreadField,
    TraceField,
};
use super::filter::FieldFilter;
use super::kind::ValueKind;
use super::operator::Operator;

/// Backend resource type owning its own field enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Entity {
    Prompts,
    Traces,
    Spans,
    Threads,
    Experiments,
    Datasets,
    Projects,
}

impl Entity {
    pub const ALL: &'static [Entity] = &[
        Entity::Prompts,
        Entity::Traces,
        Entity::Spans,
        Entity::Threads,
        Entity::Experiments,
        Entity::Datasets,
        Entity::Projects,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Prompts => "prompts",
            Self::Traces => "traces",
            Self::Spans => "spans",
            Self::Threads => "threads",
            Self::Experiments => "experiments",
            Self::Datasets => "datasets",
            Self::Projects => "projects",
        }
    }

    /// Accepts plural and singular names, case-insensitive
    pub fn from_wire(name: &str) -> Option<Self> {
        let entity = match name.trim().to_ascii_lowercase().as_str() {
            "prompts" | "prompt" => Self::Prompts,
            "traces" | "trace" => Self::Traces,
            "spans" | "span" => Self::Spans,
            "threads" | "thread" => Self::Threads,
            "experiments" | "experiment" => Self::Experiments,
            "datasets" | "dataset" => Self::Datasets,
            "projects" | "project" => Self::Projects,
            _ => return None,
        };
        Some(entity)
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Entity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_wire(s).ok_or_else(|| {
            let valid: Vec<&str> = Self::ALL.iter().map(|e| e.as_str()).collect();
            format!(
                "Invalid entity '{}'. Valid options: {}",
                s,
                valid.join(", ")
            )
        })
    }
}

impl Serialize for Entity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Entity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}

pub type PromptFilter = FieldFilter<PromptField>;
pub type TraceFilter = FieldFilter<TraceField>;
pub type SpanFilter = FieldFilter<SpanField>;
pub type ThreadFilter = FieldFilter<ThreadField>;
pub type ExperimentFilter = FieldFilter<ExperimentField>;
pub type DatasetFilter = FieldFilter<DatasetField>;
pub type ProjectFilter = FieldFilter<ProjectField>;

/// Immutable predicate bound to one entity
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Filter {
    Prompt(PromptFilter),
    Trace(TraceFilter),
    Span(SpanFilter),
    Thread(ThreadFilter),
    Experiment(ExperimentFilter),
    Dataset(DatasetFilter),
    Project(ProjectFilter),
}

/// Apply the same expression to whichever variant is present
macro_rules! with_variant {
    ($filter:expr, $inner:ident => $body:expr) => {
        match $filter {
            Filter::Prompt($inner) => $body,
            Filter::Trace($inner) => $body,
            Filter::Span($inner) => $body,
            Filter::Thread($inner) => $body,
            Filter::Experiment($inner) => $body,
            Filter::Dataset($inner) => $body,
            Filter::Project($inner) => $body,
        }
    };
}

fn construct<F: FilterField>(
    field: &str,
    operator: Operator,
    key: Option<String>,
    value: Option<String>,
) -> Result<FieldFilter<F>, FilterError> {
    let field = F::from_wire(field).ok_or_else(|| {
        FilterError::new(FilterErrorKind::UnknownField {
            name: field.to_string(),
            entity: F::ENTITY.to_string(),
        })
        .on_field(field)
    })?;
    FieldFilter::new(field, operator, key, value)
}

impl Filter {
    /// Resolve `field` against `entity`'s enumeration and validate the descriptor
    pub fn construct(
        entity: Entity,
        field: &str,
        operator: Operator,
        key: Option<String>,
        value: Option<String>,
    ) -> Result<Self, FilterError> {
        Ok(match entity {
            Entity::Prompts => Self::Prompt(construct(field, operator, key, value)?),
            Entity::Traces => Self::Trace(construct(field, operator, key, value)?),
            Entity::Spans => Self::Span(construct(field, operator, key, value)?),
            Entity::Threads => Self::Thread(construct(field, operator, key, value)?),
            Entity::Experiments => Self::Experiment(construct(field, operator, key, value)?),
            Entity::Datasets => Self::Dataset(construct(field, operator, key, value)?),
            Entity::Projects => Self::Project(construct(field, operator, key, value)?),
        })
    }

    /// Same filter with its value replaced by `decoded_value`
    pub fn build(&self, decoded_value: impl Into<String>) -> Result<Self, FilterError> {
        let decoded_value = decoded_value.into();
        Ok(match self {
            Self::Prompt(f) => Self::Prompt(f.build(decoded_value)?),
            Self::Trace(f) => Self::Trace(f.build(decoded_value)?),
            Self::Span(f) => Self::Span(f.build(decoded_value)?),
            Self::Thread(f) => Self::Thread(f.build(decoded_value)?),
            Self::Experiment(f) => Self::Experiment(f.build(decoded_value)?),
            Self::Dataset(f) => Self::Dataset(f.build(decoded_value)?),
            Self::Project(f) => Self::Project(f.build(decoded_value)?),
        })
    }

    pub fn entity(&self) -> Entity {
        match self {
            Self::Prompt(_) => Entity::Prompts,
            Self::Trace(_) => Entity::Traces,
            Self::Span(_) => Entity::Spans,
            Self::Thread(_) => Entity::Threads,
            Self::Experiment(_) => Entity::Experiments,
            Self::Dataset(_) => Entity::Datasets,
            Self::Project(_) => Entity::Projects,
        }
    }

    pub fn field_name(&self) -> &'static str {
        with_variant!(self, f => f.field().as_str())
    }

    pub fn value_kind(&self) -> ValueKind {
        with_variant!(self, f => f.field().value_kind())
    }

    pub fn operator(&self) -> Operator {
        with_variant!(self, f => f.operator())
    }

    pub fn key(&self) -> Option<&str> {
        with_variant!(self, f => f.key())
    }

    pub fn value(&self) -> Option<&str> {
        with_variant!(self, f => f.value())
    }

    pub fn as_prompt(&self) -> Option<&PromptFilter> {
        match self {
            Self::Prompt(f) => Some(f),
            _ => None,
        }
    }
}

#[derive(Serialize)]
struct FilterView<'a> {
    entity: Entity,
    field: &'static str,
    operator: Operator,
    key: Option<&'a str>,
    value: Option<&'a str>,
}

impl Serialize for Filter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        FilterView {
            entity: self.entity(),
            field: self.field_name(),
            operator: self.operator(),
            key: self.key(),
            value: self.value(),
        }
        .serialize(serializer)
    }
}
