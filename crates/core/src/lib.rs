//! Domain model and editing rules for product sheet templates.
//!
//! Everything here is synchronous and network-free. The backend client and
//! the gateway live in `fiche-client` and `fiche-api`.

pub mod editor;
pub mod error;
pub mod ids;
pub mod placeholders;
pub mod sections;
pub mod types;
