#![allow(dead_code)]

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use fiche_client::{BackendError, TemplateBackend};
use fiche_core::types::{Section, Template, TemplatePayload};

/// One recorded backend call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    List,
    Create,
    Update(String),
    Delete(String),
}

/// In-memory backend that records every call.
#[derive(Default)]
pub struct InMemoryBackend {
    templates: Mutex<Vec<Template>>,
    calls: Mutex<Vec<Call>>,
    next_id: Mutex<u32>,
    /// When set, every call fails with this status.
    fail_with: Mutex<Option<u16>>,
    /// Artificial latency before each answer.
    delay: Option<Duration>,
}

impl InMemoryBackend {
    pub fn with_templates(templates: Vec<Template>) -> Self {
        Self {
            templates: Mutex::new(templates),
            ..Default::default()
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn fail_with(&self, status: u16) {
        *self.fail_with.lock().unwrap() = Some(status);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn stored(&self) -> Vec<Template> {
        self.templates.lock().unwrap().clone()
    }

    async fn enter(&self, call: Call) -> Result<(), BackendError> {
        self.calls.lock().unwrap().push(call);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(status) = *self.fail_with.lock().unwrap() {
            return Err(BackendError::Api {
                status,
                body: "injected failure".to_string(),
            });
        }
        Ok(())
    }
}

fn from_payload(id: String, payload: &TemplatePayload) -> Template {
    Template {
        id,
        name: payload.name.clone(),
        description: payload.description.clone(),
        sections: payload.sections.clone(),
        is_default: payload.is_default,
        is_custom: true,
    }
}

fn not_found(id: &str) -> BackendError {
    BackendError::Api {
        status: 404,
        body: format!("template {id} not found"),
    }
}

#[async_trait]
impl TemplateBackend for InMemoryBackend {
    async fn list_templates(&self) -> Result<Vec<Template>, BackendError> {
        self.enter(Call::List).await?;
        Ok(self.stored())
    }

    async fn create_template(&self, payload: &TemplatePayload) -> Result<Template, BackendError> {
        self.enter(Call::Create).await?;
        let id = {
            let mut next = self.next_id.lock().unwrap();
            *next += 1;
            format!("custom_{next}")
        };
        let created = from_payload(id, payload);
        self.templates.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn update_template(
        &self,
        id: &str,
        payload: &TemplatePayload,
    ) -> Result<Template, BackendError> {
        self.enter(Call::Update(id.to_string())).await?;
        let mut templates = self.templates.lock().unwrap();
        let slot = templates
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| not_found(id))?;
        *slot = from_payload(id.to_string(), payload);
        Ok(slot.clone())
    }

    async fn delete_template(&self, id: &str) -> Result<(), BackendError> {
        self.enter(Call::Delete(id.to_string())).await?;
        let mut templates = self.templates.lock().unwrap();
        let before = templates.len();
        templates.retain(|t| t.id != id);
        if templates.len() == before {
            return Err(not_found(id));
        }
        Ok(())
    }
}

pub fn section(id: &str, required: bool, order: u32) -> Section {
    Section {
        id: id.to_string(),
        name: format!("Section {id}"),
        description: String::new(),
        required,
        default_enabled: true,
        order,
        rag_query_template: "{product_name} in {product_category}".to_string(),
        prompt_template: "Describe {product_name}".to_string(),
    }
}

pub fn template(id: &str, name: &str) -> Template {
    Template {
        id: id.to_string(),
        name: name.to_string(),
        description: String::new(),
        sections: vec![section("intro", true, 1), section("benefits", false, 2)],
        is_default: false,
        is_custom: id.starts_with("custom_"),
    }
}

/// Serve `app` on an ephemeral local port and return its base URL.
pub async fn spawn_backend(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// A base URL nothing listens on.
pub async fn unreachable_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}
