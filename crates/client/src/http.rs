//! REST client for the template backend.
//!
//! Wraps the backend's template CRUD endpoints and the generation
//! pass-throughs using [`reqwest`]. Every request is bounded by the
//! configured timeout.

use async_trait::async_trait;
use fiche_core::types::{Template, TemplatePayload, TemplatesResponse};

use crate::backend::TemplateBackend;
use crate::config::ClientConfig;
use crate::error::BackendError;

/// HTTP client for one backend instance.
#[derive(Debug, Clone)]
pub struct HttpTemplateBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTemplateBackend {
    pub fn new(config: &ClientConfig) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self::with_client(client, config.base_url.clone()))
    }

    /// Reuse an existing [`reqwest::Client`] (shares its connection pool).
    pub fn with_client(client: reqwest::Client, base_url: String) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `POST /templates/generate`: sectioned product sheet generation.
    pub async fn generate_sections(
        &self,
        request: &serde_json::Value,
    ) -> Result<serde_json::Value, BackendError> {
        self.post_json("/templates/generate", request).await
    }

    /// `POST /generate-product-description`.
    pub async fn generate_product_description(
        &self,
        request: &serde_json::Value,
    ) -> Result<serde_json::Value, BackendError> {
        self.post_json("/generate-product-description", request).await
    }

    /// `POST /generate-with-rag`.
    pub async fn generate_with_rag(
        &self,
        request: &serde_json::Value,
    ) -> Result<serde_json::Value, BackendError> {
        self.post_json("/generate-with-rag", request).await
    }

    // ---- private helpers ----

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `{base}/templates/{id}` with `id` percent-encoded as one segment.
    fn template_url(&self, id: &str) -> Result<reqwest::Url, BackendError> {
        let mut url = reqwest::Url::parse(&self.url("/templates"))
            .map_err(|e| BackendError::InvalidUrl(format!("{}: {e}", self.base_url)))?;
        url.path_segments_mut()
            .map_err(|_| BackendError::InvalidUrl(self.base_url.clone()))?
            .push(id);
        Ok(url)
    }

    async fn post_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: &impl serde::Serialize,
    ) -> Result<T, BackendError> {
        let response = self.client.post(self.url(path)).json(body).send().await?;
        Self::parse_response(response).await
    }

    /// Map a non-2xx response to [`BackendError::Api`] carrying the body.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, BackendError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            tracing::warn!(status = status.as_u16(), "Backend returned an error status");
            return Err(BackendError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, BackendError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl TemplateBackend for HttpTemplateBackend {
    async fn list_templates(&self) -> Result<Vec<Template>, BackendError> {
        let response = self.client.get(self.url("/templates")).send().await?;
        let body: TemplatesResponse = Self::parse_response(response).await?;
        tracing::debug!(count = body.templates.len(), "Fetched templates");
        Ok(body.templates)
    }

    async fn create_template(&self, payload: &TemplatePayload) -> Result<Template, BackendError> {
        let created: Template = self.post_json("/templates", payload).await?;
        tracing::info!(id = %created.id, name = %created.name, "Template created");
        Ok(created)
    }

    async fn update_template(
        &self,
        id: &str,
        payload: &TemplatePayload,
    ) -> Result<Template, BackendError> {
        let response = self
            .client
            .put(self.template_url(id)?)
            .json(payload)
            .send()
            .await?;
        let updated: Template = Self::parse_response(response).await?;
        tracing::info!(id = %updated.id, "Template updated");
        Ok(updated)
    }

    async fn delete_template(&self, id: &str) -> Result<(), BackendError> {
        let response = self
            .client
            .delete(self.template_url(id)?)
            .send()
            .await?;
        Self::ensure_success(response).await?;
        tracing::info!(id, "Template deleted");
        Ok(())
    }
}
