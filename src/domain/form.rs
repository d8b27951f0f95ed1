use serde::{Deserialize, Serialize};

use super::tags::Tag;
use super::template::{FieldTemplate, TemplateId};

/// Identity of the integration a form belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IntegrationId(pub String);

impl std::fmt::Display for IntegrationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormStyle {
    pub name: String,
    pub icon: String,
    pub color: Rgba,
}

/// A named phase of the form, led by the field carrying `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub id: Tag,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormSnapshot {
    pub integration: IntegrationId,
    pub style: FormStyle,
    pub fields: Vec<FieldTemplate>,
    pub steps: Vec<Step>,
    pub first_field: Option<TemplateId>,
}

impl FormSnapshot {
    pub fn field(&self, id: &TemplateId) -> Option<&FieldTemplate> {
        self.fields.iter().find(|field| field.id() == id)
    }

    pub fn first_with_tag(&self, tag: &Tag) -> Option<&FieldTemplate> {
        self.fields.iter().find(|field| field.has_tag(tag))
    }

    /// Replaces the field with the same id in place, or appends it.
    pub fn upsert(&mut self, field: FieldTemplate) {
        match self.fields.iter_mut().find(|f| f.id() == field.id()) {
            Some(slot) => *slot = field,
            None => self.fields.push(field),
        }
    }

    pub fn save_values_as_default(&mut self) {
        for field in &mut self.fields {
            field.save_value_as_default();
        }
    }
}
