//! Per-entity field enumerations
//!
//! Each entity owns one enum of filterable fields. The enums are generated
//! from explicit tables (wire name, value kind, allowed enum values) so the
//! wire-name lookup is a plain table scan rather than reflection.

use std::fmt::Debug;
use std::hash::Hash;

use super::entity::Entity;
use super::kind::ValueKind;
use super::operator::Operator;

/// Contract shared by every entity's field enumeration
pub trait FilterField: Debug + Copy + Eq + Hash + Send + Sync + 'static {
    /// Entity this enumeration belongs to
    const ENTITY: Entity;

    /// Every member, in declaration order
    fn all() -> &'static [Self];

    fn as_str(&self) -> &'static str;

    fn value_kind(&self) -> ValueKind;

    /// Allowed values for [`ValueKind::Enum`] fields, empty otherwise
    fn enum_values(&self) -> &'static [&'static str];

    fn from_wire(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::all().iter().copied().find(|f| f.as_str() == name)
    }

    fn permitted_operators(&self) -> &'static [Operator] {
        self.value_kind().permitted_operators()
    }

    fn is_supported(&self, operator: Operator) -> bool {
        self.value_kind().supports(operator)
    }
}

/// Generate a field enum and its [`FilterField`] table
macro_rules! filter_fields {
    (
        $(#[$meta:meta])*
        $name:ident for $entity:path {
            $(
                $variant:ident => ($wire:literal, $kind:ident $(, [$($value:literal),+ $(,)?])?)
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $crate::filters::fields::FilterField for $name {
            const ENTITY: $crate::filters::entity::Entity = $entity;

            fn all() -> &'static [Self] {
                &[$(Self::$variant),+]
            }

            fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $wire),+
                }
            }

            fn value_kind(&self) -> $crate::filters::kind::ValueKind {
                match self {
                    $(Self::$variant => $crate::filters::kind::ValueKind::$kind),+
                }
            }

            fn enum_values(&self) -> &'static [&'static str] {
                match self {
                    $(Self::$variant => &[$($($value),+)?]),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str($crate::filters::fields::FilterField::as_str(self))
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str($crate::filters::fields::FilterField::as_str(self))
            }
        }
    };
}

mod dataset;
mod experiment;
mod project;
mod prompt;
mod span;
mod thread;
mod trace;

pub use dataset::DatasetField;
pub use experiment::ExperimentField;
pub use project::ProjectField;
pub use prompt::PromptField;
pub use span::SpanField;
pub use thread::ThreadField;
pub use trace::TraceField;
