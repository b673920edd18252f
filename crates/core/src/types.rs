//! Wire types shared by the editor, the backend client and the gateway.
//!
//! Field names match the backend's JSON (snake_case). Optional fields carry
//! serde defaults so partial sections coming back from the backend still
//! deserialize; [`crate::sections::normalize_sections`] fills the rest at
//! save time.

use serde::{Deserialize, Serialize};

use crate::ids::is_custom_id;

fn default_true() -> bool {
    true
}

/// One unit of a template: a retrieval query plus a generation prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default = "default_true")]
    pub default_enabled: bool,
    /// Display/generation position. `0` means unset.
    #[serde(default)]
    pub order: u32,
    #[serde(default)]
    pub rag_query_template: String,
    #[serde(default)]
    pub prompt_template: String,
}

/// A named, ordered collection of sections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub sections: Vec<Section>,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub is_custom: bool,
}

impl Template {
    /// Re-derive `is_custom` from the id prefix.
    pub fn with_derived_custom_flag(mut self) -> Self {
        self.is_custom = is_custom_id(&self.id);
        self
    }

    /// Body for a create or update call.
    pub fn to_payload(&self) -> TemplatePayload {
        TemplatePayload {
            name: self.name.clone(),
            description: self.description.clone(),
            sections: self.sections.clone(),
            is_default: self.is_default,
        }
    }
}

/// Body of `POST /templates` and `PUT /templates/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplatePayload {
    pub name: String,
    pub description: String,
    pub sections: Vec<Section>,
    pub is_default: bool,
}

/// Response of `GET /templates`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemplatesResponse {
    #[serde(default)]
    pub templates: Vec<Template>,
}

/// Optional response body of `DELETE /templates/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub success: bool,
}
