//! Async driver for the template editor.
//!
//! Each operation pairs a `begin_*` transition on the editor with one or
//! two backend calls and the matching `complete_*` / `fail_*`. Every call
//! runs under [`EditorController::call_timeout`] and aborts early when the
//! controller's [`CancellationToken`] fires.

use std::future::Future;
use std::time::Duration;

use fiche_core::editor::{SavePlan, TemplateEditor};
use fiche_core::types::Template;
use tokio_util::sync::CancellationToken;

use crate::backend::TemplateBackend;
use crate::error::{BackendError, ClientError};

/// Default upper bound for one backend call.
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(30);

pub struct EditorController<B> {
    backend: B,
    editor: TemplateEditor,
    cancel: CancellationToken,
    call_timeout: Duration,
}

impl<B: TemplateBackend> EditorController<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            editor: TemplateEditor::new(),
            cancel: CancellationToken::new(),
            call_timeout: DEFAULT_CALL_TIMEOUT,
        }
    }

    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    pub fn call_timeout(&self) -> Duration {
        self.call_timeout
    }

    pub fn editor(&self) -> &TemplateEditor {
        &self.editor
    }

    /// Local edits (field changes, section add/delete, drafts).
    pub fn editor_mut(&mut self) -> &mut TemplateEditor {
        &mut self.editor
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Token that aborts the operation currently in flight.
    ///
    /// A cancelled token is replaced when the next operation starts, so fetch
    /// a fresh handle before each operation you may want to cancel.
    pub fn cancellation_handle(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Fetch the template list.
    pub async fn load(&mut self) -> Result<(), ClientError> {
        self.rearm();
        self.editor.begin_load()?;
        match self.bounded(self.backend.list_templates()).await {
            Ok(templates) => {
                tracing::debug!(count = templates.len(), "Template list loaded");
                self.editor.apply_templates(templates);
                Ok(())
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to load templates");
                self.editor.fail_load(&err.to_string());
                Err(err.into())
            }
        }
    }

    /// Persist the edit buffer, then re-fetch the list.
    pub async fn save(&mut self) -> Result<Template, ClientError> {
        self.rearm();
        let request = self.editor.begin_save()?;

        let result = async {
            let saved = match &request.plan {
                SavePlan::Create => {
                    self.bounded(self.backend.create_template(&request.payload))
                        .await?
                }
                SavePlan::Update { id } => {
                    self.bounded(self.backend.update_template(id, &request.payload))
                        .await?
                }
            };
            let refreshed = self.bounded(self.backend.list_templates()).await?;
            Ok::<_, BackendError>((saved, refreshed))
        }
        .await;

        match result {
            Ok((saved, refreshed)) => {
                tracing::info!(id = %saved.id, plan = ?request.plan, "Template saved");
                self.editor.complete_save(saved.clone(), refreshed);
                Ok(saved)
            }
            Err(err) => {
                tracing::error!(error = %err, plan = ?request.plan, "Failed to save template");
                self.editor.fail_save(&err.to_string());
                Err(err.into())
            }
        }
    }

    /// Delete the active custom template, then re-fetch the list.
    pub async fn delete(&mut self) -> Result<(), ClientError> {
        self.rearm();
        let id = self.editor.begin_delete()?;

        let result = async {
            self.bounded(self.backend.delete_template(&id)).await?;
            self.bounded(self.backend.list_templates()).await
        }
        .await;

        match result {
            Ok(refreshed) => {
                tracing::info!(id = %id, "Template deleted");
                self.editor.complete_delete(refreshed);
                Ok(())
            }
            Err(err) => {
                tracing::error!(error = %err, id = %id, "Failed to delete template");
                self.editor.fail_delete(&err.to_string());
                Err(err.into())
            }
        }
    }

    // ---- private helpers ----

    /// Run one backend call under the timeout and the cancellation token.
    async fn bounded<T>(
        &self,
        call: impl Future<Output = Result<T, BackendError>>,
    ) -> Result<T, BackendError> {
        tokio::select! {
            _ = self.cancel.cancelled() => Err(BackendError::Cancelled),
            outcome = tokio::time::timeout(self.call_timeout, call) => match outcome {
                Ok(result) => result,
                Err(_) => Err(BackendError::Timeout(self.call_timeout)),
            },
        }
    }
}

impl<B> EditorController<B> {
    /// Replace a token that was cancelled during an earlier operation.
    fn rearm(&mut self) {
        if self.cancel.is_cancelled() {
            self.cancel = CancellationToken::new();
        }
    }
}
