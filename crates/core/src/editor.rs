//! Template editor state machine.
//!
//! Holds the template list as last fetched from the backend, the active
//! template, and a transient edit buffer. All transitions are synchronous;
//! network calls are issued by the caller between a `begin_*` and the
//! matching `complete_*` / `fail_*`.
//!
//! Replacing a buffer that has unsaved changes is a guarded transition:
//! [`TemplateEditor::select_template`] refuses with
//! [`CoreError::UnsavedChanges`] until the caller acknowledges the loss via
//! [`TemplateEditor::select_template_discarding`] or
//! [`TemplateEditor::discard_changes`].

use serde::Serialize;
use validator::Validate;

use crate::error::CoreError;
use crate::ids::{is_custom_id, PLACEHOLDER_TEMPLATE_ID};
use crate::placeholders::unknown_placeholders;
use crate::sections::{append_section, normalize_sections, remove_section};
use crate::types::{Section, Template, TemplatePayload};

/// Marker prepended to the name of a duplicated template.
pub const COPY_NAME_PREFIX: &str = "Copy of ";

/// Maximum length of a template name entered in the create dialog.
pub const MAX_TEMPLATE_NAME_LENGTH: u64 = 200;

// ---------------------------------------------------------------------------
// Notifications
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Success,
    Error,
    Info,
}

/// A transient toast notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub message: String,
}

impl Notice {
    fn success(title: &str, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            title: title.to_string(),
            message: message.into(),
        }
    }

    fn error(title: &str, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            title: title.to_string(),
            message: message.into(),
        }
    }

    fn info(title: &str, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            title: title.to_string(),
            message: message.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Inputs and outputs
// ---------------------------------------------------------------------------

/// In-flight operation flags. Each disables its triggering control.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BusyFlags {
    pub loading: bool,
    pub saving: bool,
    pub deleting: bool,
}

/// Which controls of the edit form are enabled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditorControls {
    /// Template-level fields (name, description, default flag).
    pub editable: bool,
    pub can_add_section: bool,
    pub can_save: bool,
    pub can_delete_template: bool,
    pub can_duplicate: bool,
    pub sections: Vec<SectionControls>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionControls {
    pub id: String,
    pub can_edit: bool,
    pub can_delete: bool,
    /// Tokens in the query or prompt that the backend will not substitute.
    pub unknown_placeholders: Vec<String>,
}

/// Field-level section edit. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default)]
pub struct SectionPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub required: Option<bool>,
    pub default_enabled: Option<bool>,
    pub rag_query_template: Option<String>,
    pub prompt_template: Option<String>,
}

impl SectionPatch {
    fn apply(self, section: &mut Section) {
        if let Some(v) = self.name {
            section.name = v;
        }
        if let Some(v) = self.description {
            section.description = v;
        }
        if let Some(v) = self.required {
            section.required = v;
        }
        if let Some(v) = self.default_enabled {
            section.default_enabled = v;
        }
        if let Some(v) = self.rag_query_template {
            section.rag_query_template = v;
        }
        if let Some(v) = self.prompt_template {
            section.prompt_template = v;
        }
    }
}

/// Contents of the "new template" dialog.
#[derive(Debug, Clone, Default, Validate)]
pub struct NewTemplateForm {
    #[validate(length(max = MAX_TEMPLATE_NAME_LENGTH))]
    pub name: String,
    pub description: String,
    /// Template whose sections are copied. Defaults to the first template.
    pub base_template_id: Option<String>,
}

/// Whether a save creates a new template or updates an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SavePlan {
    Create,
    Update { id: String },
}

impl SavePlan {
    /// Absent, blank, or non-custom ids create; custom ids update.
    pub fn for_id(id: Option<&str>) -> Self {
        match id {
            Some(id) if is_custom_id(id) => SavePlan::Update { id: id.to_string() },
            _ => SavePlan::Create,
        }
    }
}

/// What the caller must send to the backend to persist the buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveRequest {
    pub plan: SavePlan,
    pub payload: TemplatePayload,
}

// ---------------------------------------------------------------------------
// Editor
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct TemplateEditor {
    templates: Vec<Template>,
    active_id: Option<String>,
    buffer: Option<Template>,
    busy: BusyFlags,
    banner: Option<String>,
    notices: Vec<Notice>,
}

impl TemplateEditor {
    pub fn new() -> Self {
        Self::default()
    }

    // ---- accessors ----

    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    pub fn active_template(&self) -> Option<&Template> {
        let id = self.active_id.as_deref()?;
        self.templates.iter().find(|t| t.id == id)
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active_id.as_deref()
    }

    pub fn buffer(&self) -> Option<&Template> {
        self.buffer.as_ref()
    }

    pub fn busy(&self) -> BusyFlags {
        self.busy
    }

    /// Persistent error message shown above the form.
    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    /// Drain queued toasts.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Whether replacing the buffer now would lose edits.
    pub fn has_unsaved_changes(&self) -> bool {
        match &self.buffer {
            None => false,
            Some(buffer) if buffer.id == PLACEHOLDER_TEMPLATE_ID => true,
            Some(buffer) => self.active_template() != Some(buffer),
        }
    }

    pub fn controls(&self) -> EditorControls {
        let Some(buffer) = &self.buffer else {
            return EditorControls {
                editable: false,
                can_add_section: false,
                can_save: false,
                can_delete_template: false,
                can_duplicate: false,
                sections: Vec::new(),
            };
        };

        let editable = buffer.is_custom && !self.busy.saving;
        let sections = buffer
            .sections
            .iter()
            .map(|s| {
                let mut unknown = unknown_placeholders(&s.rag_query_template);
                unknown.extend(unknown_placeholders(&s.prompt_template));
                unknown.sort();
                unknown.dedup();
                SectionControls {
                    id: s.id.clone(),
                    can_edit: editable,
                    can_delete: editable && !s.required,
                    unknown_placeholders: unknown,
                }
            })
            .collect();

        EditorControls {
            editable,
            can_add_section: editable,
            can_save: !self.busy.saving,
            can_delete_template: buffer.is_custom
                && is_custom_id(&buffer.id)
                && !self.busy.deleting,
            can_duplicate: true,
            sections,
        }
    }

    // ---- listing ----

    pub fn begin_load(&mut self) -> Result<(), CoreError> {
        if self.busy.loading {
            return Err(CoreError::Busy("load"));
        }
        self.busy.loading = true;
        Ok(())
    }

    /// Store a freshly fetched list. A clean buffer follows the refreshed
    /// copy of the active template; the first template is selected when
    /// nothing is active.
    pub fn apply_templates(&mut self, templates: Vec<Template>) {
        self.busy.loading = false;
        self.banner = None;
        let was_clean = !self.has_unsaved_changes();
        self.replace_list(templates);

        if was_clean {
            if let Some(active) = self.active_template().cloned() {
                self.buffer = Some(active);
            }
        }

        let has_draft = self
            .buffer
            .as_ref()
            .is_some_and(|b| b.id == PLACEHOLDER_TEMPLATE_ID);
        if self.active_template().is_none() && !has_draft {
            self.active_id = None;
            self.buffer = None;
            if let Some(first) = self.templates.first().cloned() {
                self.active_id = Some(first.id.clone());
                self.buffer = Some(first);
            }
        }
    }

    pub fn fail_load(&mut self, details: &str) {
        self.busy.loading = false;
        self.report_failure("Failed to load templates", details);
    }

    // ---- selection ----

    /// Make `id` the active template, refusing to drop unsaved edits.
    pub fn select_template(&mut self, id: &str) -> Result<(), CoreError> {
        if self.active_id.as_deref() == Some(id) && !self.has_unsaved_changes() {
            return Ok(());
        }
        self.ensure_no_unsaved_changes()?;
        self.select_unchecked(id)
    }

    /// Make `id` the active template, dropping any unsaved edits.
    pub fn select_template_discarding(&mut self, id: &str) -> Result<(), CoreError> {
        self.select_unchecked(id)
    }

    /// Reset the buffer to the active template (dropping a draft entirely).
    pub fn discard_changes(&mut self) {
        self.buffer = self.active_template().cloned();
    }

    // ---- field edits ----

    pub fn set_name(&mut self, name: impl Into<String>) -> Result<(), CoreError> {
        self.editable_buffer_mut()?.name = name.into();
        Ok(())
    }

    pub fn set_description(&mut self, description: impl Into<String>) -> Result<(), CoreError> {
        self.editable_buffer_mut()?.description = description.into();
        Ok(())
    }

    pub fn set_is_default(&mut self, is_default: bool) -> Result<(), CoreError> {
        self.editable_buffer_mut()?.is_default = is_default;
        Ok(())
    }

    pub fn update_section(&mut self, section_id: &str, patch: SectionPatch) -> Result<(), CoreError> {
        let buffer = self.editable_buffer_mut()?;
        let section = buffer
            .sections
            .iter_mut()
            .find(|s| s.id == section_id)
            .ok_or_else(|| CoreError::NotFound {
                entity: "Section",
                id: section_id.to_string(),
            })?;
        patch.apply(section);
        Ok(())
    }

    /// Append a placeholder section to a custom buffer; returns its id.
    pub fn add_section(&mut self) -> Result<String, CoreError> {
        let buffer = self.editable_buffer_mut()?;
        Ok(append_section(buffer))
    }

    /// Remove a non-required section from a custom buffer.
    pub fn delete_section(&mut self, section_id: &str) -> Result<(), CoreError> {
        let result = self
            .editable_buffer_mut()
            .and_then(|buffer| remove_section(buffer, section_id));
        match result {
            Ok(_) => Ok(()),
            Err(err @ (CoreError::RequiredSection(_) | CoreError::ReadOnly(_))) => {
                self.notices
                    .push(Notice::error("Section cannot be removed", err.to_string()));
                Err(err)
            }
            Err(err) => Err(err),
        }
    }

    // ---- drafts ----

    /// Copy the current buffer (edits included) into a new draft.
    pub fn duplicate_active(&mut self) -> Result<(), CoreError> {
        let source = self
            .buffer
            .clone()
            .ok_or_else(|| CoreError::Validation("No template selected".to_string()))?;
        self.buffer = Some(draft_copy(&source));
        Ok(())
    }

    /// Load a draft copy of a listed template into the buffer.
    pub fn duplicate_template(&mut self, id: &str) -> Result<(), CoreError> {
        self.ensure_no_unsaved_changes()?;
        let source = self.find(id)?.clone();
        self.buffer = Some(draft_copy(&source));
        Ok(())
    }

    /// Build a draft from the "new template" dialog. No network call.
    pub fn create_from_dialog(&mut self, form: NewTemplateForm) -> Result<(), CoreError> {
        if let Err(err) = validate_form(&form) {
            self.notices
                .push(Notice::error("Invalid template", err.to_string()));
            return Err(err);
        }
        self.ensure_no_unsaved_changes()?;

        let base = match form.base_template_id.as_deref() {
            Some(id) => self.find(id).cloned(),
            None => self.templates.first().cloned().ok_or_else(|| {
                CoreError::Validation("No base template available".to_string())
            }),
        };
        let base = match base {
            Ok(base) => base,
            Err(err) => {
                self.notices
                    .push(Notice::error("Template creation failed", err.to_string()));
                return Err(err);
            }
        };

        let description = if form.description.trim().is_empty() {
            format!("Custom template based on {}", base.name)
        } else {
            form.description
        };

        self.buffer = Some(Template {
            id: PLACEHOLDER_TEMPLATE_ID.to_string(),
            name: form.name.trim().to_string(),
            description,
            sections: base.sections.clone(),
            is_default: false,
            is_custom: true,
        });
        self.notices.push(Notice::info(
            "Draft created",
            "Save the template to persist it",
        ));
        Ok(())
    }

    // ---- save ----

    /// Normalize the buffer and decide between create and update.
    pub fn begin_save(&mut self) -> Result<SaveRequest, CoreError> {
        if self.busy.saving {
            return Err(CoreError::Busy("save"));
        }
        let buffer = self
            .buffer
            .as_mut()
            .ok_or_else(|| CoreError::Validation("No template selected".to_string()))?;

        buffer.sections = normalize_sections(std::mem::take(&mut buffer.sections));
        let id = Some(buffer.id.as_str()).filter(|id| !id.trim().is_empty());
        let request = SaveRequest {
            plan: SavePlan::for_id(id),
            payload: buffer.to_payload(),
        };

        self.busy.saving = true;
        Ok(request)
    }

    /// Adopt the backend's view after a successful create or update.
    pub fn complete_save(&mut self, saved: Template, refreshed: Vec<Template>) {
        self.busy.saving = false;
        self.banner = None;
        self.replace_list(refreshed);

        let entry = match self.templates.iter().find(|t| t.id == saved.id) {
            Some(entry) => entry.clone(),
            None => {
                // Listing lagged behind the write.
                let entry = saved.with_derived_custom_flag();
                self.templates.push(entry.clone());
                entry
            }
        };
        self.notices.push(Notice::success(
            "Template saved",
            format!("\"{}\" was saved", entry.name),
        ));
        self.active_id = Some(entry.id.clone());
        self.buffer = Some(entry);
    }

    pub fn fail_save(&mut self, details: &str) {
        self.busy.saving = false;
        self.report_failure("Failed to save template", details);
    }

    // ---- delete ----

    /// Returns the id to delete. Only persisted custom templates qualify.
    pub fn begin_delete(&mut self) -> Result<String, CoreError> {
        if self.busy.deleting {
            return Err(CoreError::Busy("delete"));
        }
        let buffer = self
            .buffer
            .as_ref()
            .ok_or_else(|| CoreError::Validation("No template selected".to_string()))?;
        if !buffer.is_custom || !is_custom_id(&buffer.id) {
            return Err(CoreError::ReadOnly(buffer.id.clone()));
        }
        let id = buffer.id.clone();
        self.busy.deleting = true;
        Ok(id)
    }

    pub fn complete_delete(&mut self, refreshed: Vec<Template>) {
        self.busy.deleting = false;
        self.banner = None;
        self.replace_list(refreshed);
        self.active_id = None;
        self.buffer = None;
        self.notices
            .push(Notice::success("Template deleted", "The template was removed"));
    }

    pub fn fail_delete(&mut self, details: &str) {
        self.busy.deleting = false;
        self.report_failure("Failed to delete template", details);
    }

    // ---- private helpers ----

    fn replace_list(&mut self, templates: Vec<Template>) {
        self.templates = templates
            .into_iter()
            .map(Template::with_derived_custom_flag)
            .collect();
    }

    fn find(&self, id: &str) -> Result<&Template, CoreError> {
        self.templates
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| CoreError::NotFound {
                entity: "Template",
                id: id.to_string(),
            })
    }

    fn select_unchecked(&mut self, id: &str) -> Result<(), CoreError> {
        let template = self.find(id)?.clone();
        self.active_id = Some(template.id.clone());
        self.buffer = Some(template);
        Ok(())
    }

    fn ensure_no_unsaved_changes(&self) -> Result<(), CoreError> {
        if self.has_unsaved_changes() {
            let template_id = self
                .buffer
                .as_ref()
                .map(|b| b.id.clone())
                .unwrap_or_default();
            return Err(CoreError::UnsavedChanges { template_id });
        }
        Ok(())
    }

    fn editable_buffer_mut(&mut self) -> Result<&mut Template, CoreError> {
        let buffer = self
            .buffer
            .as_mut()
            .ok_or_else(|| CoreError::Validation("No template selected".to_string()))?;
        if !buffer.is_custom {
            return Err(CoreError::ReadOnly(buffer.id.clone()));
        }
        Ok(buffer)
    }

    fn report_failure(&mut self, title: &str, details: &str) {
        self.banner = Some(format!("{title}: {details}"));
        self.notices.push(Notice::error(title, details));
    }
}

fn draft_copy(source: &Template) -> Template {
    Template {
        id: PLACEHOLDER_TEMPLATE_ID.to_string(),
        name: format!("{COPY_NAME_PREFIX}{}", source.name),
        description: source.description.clone(),
        sections: source.sections.clone(),
        is_default: false,
        is_custom: true,
    }
}

fn validate_form(form: &NewTemplateForm) -> Result<(), CoreError> {
    if form.name.trim().is_empty() {
        return Err(CoreError::Validation(
            "Template name must not be empty".to_string(),
        ));
    }
    form.validate()
        .map_err(|e| CoreError::Validation(e.to_string()))
}
