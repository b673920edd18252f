//! Backend access for the template editor.
//!
//! [`HttpTemplateBackend`] talks to the template service over HTTP;
//! [`EditorController`] drives a [`fiche_core::editor::TemplateEditor`]
//! against any [`TemplateBackend`], bounding every call by a timeout and a
//! cancellation token.

pub mod backend;
pub mod config;
pub mod controller;
pub mod error;
pub mod http;

pub use backend::TemplateBackend;
pub use config::ClientConfig;
pub use controller::EditorController;
pub use error::{BackendError, ClientError};
pub use http::HttpTemplateBackend;
