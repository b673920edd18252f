//! Identifier conventions for templates and sections.

use uuid::Uuid;

use crate::types::Section;

/// Prefix the backend puts on every user-created template id.
pub const CUSTOM_ID_PREFIX: &str = "custom_";

/// Id carried by a draft template until the backend assigns a real one.
///
/// It deliberately lacks [`CUSTOM_ID_PREFIX`], so saving a draft creates.
pub const PLACEHOLDER_TEMPLATE_ID: &str = "new_template";

/// Prefix for section ids generated in the editor.
pub const SECTION_ID_PREFIX: &str = "section_";

/// Whether `id` names a user-created template.
pub fn is_custom_id(id: &str) -> bool {
    id.starts_with(CUSTOM_ID_PREFIX)
}

/// Generate a section id that does not collide with any in `existing`.
pub fn new_section_id(existing: &[Section]) -> String {
    loop {
        let candidate = format!("{SECTION_ID_PREFIX}{}", Uuid::new_v4().simple());
        if !existing.iter().any(|s| s.id == candidate) {
            return candidate;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn custom_prefix_detection() {
        assert!(is_custom_id("custom_42"));
        assert!(!is_custom_id("default_7"));
        assert!(!is_custom_id("standard"));
        assert!(!is_custom_id(""));
        assert!(!is_custom_id(PLACEHOLDER_TEMPLATE_ID));
    }

    #[test]
    fn section_ids_are_unique() {
        let mut sections = Vec::new();
        for _ in 0..100 {
            let id = new_section_id(&sections);
            assert!(id.starts_with(SECTION_ID_PREFIX));
            sections.push(Section {
                id,
                name: String::new(),
                description: String::new(),
                required: false,
                default_enabled: true,
                order: 0,
                rag_query_template: String::new(),
                prompt_template: String::new(),
            });
        }
        let mut ids: Vec<_> = sections.iter().map(|s| s.id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 100);
    }
}
