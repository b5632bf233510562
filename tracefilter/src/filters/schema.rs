//! Field catalogue and startup validation
//!
//! The per-entity field tables are checked once per process. Callers that
//! start up (the CLI, a server) run [`validate`] before accepting filters.

use std::collections::HashSet;
use std::sync::OnceLock;

use serde::Serialize;
use thiserror::Error;

use super::entity::Entity;
use super::fields::{
    DatasetField, ExperimentField, FilterField, ProjectField, PromptField, SpanField, ThreadField,
    TraceField,
};
use super::kind::ValueKind;
use super::operator::Operator;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{entity}.{field}: {problem}")]
pub struct SchemaError {
    pub entity: Entity,
    pub field: &'static str,
    pub problem: String,
}

/// Description of one filterable field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldInfo {
    pub name: &'static str,
    pub kind: ValueKind,
    pub operators: &'static [Operator],
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    pub enum_values: &'static [&'static str],
    pub requires_key: bool,
}

fn describe<F: FilterField>() -> Vec<FieldInfo> {
    F::all()
        .iter()
        .map(|f| FieldInfo {
            name: f.as_str(),
            kind: f.value_kind(),
            operators: f.permitted_operators(),
            enum_values: f.enum_values(),
            requires_key: f.value_kind().requires_key(),
        })
        .collect()
}

/// Field catalogue for one entity, in declaration order
pub fn fields(entity: Entity) -> Vec<FieldInfo> {
    match entity {
        Entity::Prompts => describe::<PromptField>(),
        Entity::Traces => describe::<TraceField>(),
        Entity::Spans => describe::<SpanField>(),
        Entity::Threads => describe::<ThreadField>(),
        Entity::Experiments => describe::<ExperimentField>(),
        Entity::Datasets => describe::<DatasetField>(),
        Entity::Projects => describe::<ProjectField>(),
    }
}

fn check_entity(entity: Entity) -> Result<(), SchemaError> {
    let mut seen = HashSet::new();
    for info in fields(entity) {
        let fail = |problem: String| SchemaError {
            entity,
            field: info.name,
            problem,
        };

        if !seen.insert(info.name) {
            return Err(fail("duplicate wire name".to_string()));
        }
        if info.operators.is_empty() {
            return Err(fail("no permitted operators".to_string()));
        }
        match (info.kind, info.enum_values.is_empty()) {
            (ValueKind::Enum, true) => return Err(fail("enum field without values".to_string())),
            (kind, false) if kind != ValueKind::Enum => {
                return Err(fail(format!("{} field declares enum values", kind)));
            }
            _ => {}
        }
    }
    Ok(())
}

fn check_all() -> Result<(), SchemaError> {
    for entity in Entity::ALL {
        check_entity(*entity)?;
    }
    Ok(())
}

/// Validate every entity's field table; the result is computed once
pub fn validate() -> Result<(), SchemaError> {
    static VALIDATED: OnceLock<Result<(), SchemaError>> = OnceLock::new();
    let result = VALIDATED.get_or_init(|| {
        let result = check_all();
        match &result {
            Ok(()) => tracing::debug!(entities = Entity::ALL.len(), "Filter schema validated"),
            Err(e) => tracing::error!(error = %e, "Filter schema is invalid"),
        }
        result
    });
    result.clone()
}
