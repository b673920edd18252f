use async_trait::async_trait;
use fiche_core::types::{Template, TemplatePayload};

use crate::error::BackendError;

/// Template persistence as seen by the editor.
///
/// The backend is the sole source of truth; implementations perform exactly
/// one call per method with no retries.
#[async_trait]
pub trait TemplateBackend: Send + Sync {
    /// `GET /templates`.
    async fn list_templates(&self) -> Result<Vec<Template>, BackendError>;

    /// `POST /templates`. The backend assigns the id.
    async fn create_template(&self, payload: &TemplatePayload) -> Result<Template, BackendError>;

    /// `PUT /templates/{id}`.
    async fn update_template(
        &self,
        id: &str,
        payload: &TemplatePayload,
    ) -> Result<Template, BackendError>;

    /// `DELETE /templates/{id}`.
    async fn delete_template(&self, id: &str) -> Result<(), BackendError>;
}
