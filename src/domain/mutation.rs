use serde::{Deserialize, Serialize};

use super::template::FieldTemplate;

/// Declarative description of how a snapshot changes after an operation. The host
/// applies it with its own reducer; see `form::apply_mutation`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DomainMutation {
    /// Replace the field with the same id (or append it when absent).
    ReplaceField(FieldTemplate),
    /// Keep only `leading`, followed by `fields`, and focus the first of `fields`.
    InsertFields {
        leading: FieldTemplate,
        fields: Vec<FieldTemplate>,
    },
    /// Snapshot every field's current value as its default.
    MarkDefaults,
    Batch { mutations: Vec<DomainMutation> },
}
