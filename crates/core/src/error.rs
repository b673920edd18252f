#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Template {0} is read-only")]
    ReadOnly(String),

    #[error("Section {0} is required and cannot be removed")]
    RequiredSection(String),

    #[error("Unsaved changes to template {template_id} would be lost")]
    UnsavedChanges { template_id: String },

    #[error("Another {0} operation is already in progress")]
    Busy(&'static str),
}
