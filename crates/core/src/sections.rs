//! Section list bookkeeping: insertion, removal, ordering and save-time
//! normalization.
//!
//! Invariant: after any insertion or removal, `order` values are exactly
//! `1..=N` by position.

use crate::error::CoreError;
use crate::ids::new_section_id;
use crate::types::{Section, Template};

/// Name given to a section saved without one.
pub const DEFAULT_SECTION_NAME: &str = "Untitled section";

/// Name of a freshly added section.
pub const NEW_SECTION_NAME: &str = "New section";

pub const NEW_SECTION_DESCRIPTION: &str = "Describe what this section covers";

pub const NEW_SECTION_RAG_QUERY: &str =
    "information about {product_name} in the category {product_category}";

pub const NEW_SECTION_PROMPT: &str = "Write this section for {product_name} using the following \
information:\n{client_data_context}";

/// Set `order` to `1..=N` following slice position.
pub fn renumber(sections: &mut [Section]) {
    for (i, section) in sections.iter_mut().enumerate() {
        section.order = (i + 1) as u32;
    }
}

/// Append a placeholder section at the end of `template` and return its id.
pub fn append_section(template: &mut Template) -> String {
    let id = new_section_id(&template.sections);
    template.sections.push(Section {
        id: id.clone(),
        name: NEW_SECTION_NAME.to_string(),
        description: NEW_SECTION_DESCRIPTION.to_string(),
        required: false,
        default_enabled: true,
        order: 0,
        rag_query_template: NEW_SECTION_RAG_QUERY.to_string(),
        prompt_template: NEW_SECTION_PROMPT.to_string(),
    });
    renumber(&mut template.sections);
    id
}

/// Remove a non-required section and renumber the rest.
///
/// The section list is left untouched on error.
pub fn remove_section(template: &mut Template, section_id: &str) -> Result<Section, CoreError> {
    let index = template
        .sections
        .iter()
        .position(|s| s.id == section_id)
        .ok_or_else(|| CoreError::NotFound {
            entity: "Section",
            id: section_id.to_string(),
        })?;

    if template.sections[index].required {
        return Err(CoreError::RequiredSection(section_id.to_string()));
    }

    let removed = template.sections.remove(index);
    renumber(&mut template.sections);
    Ok(removed)
}

/// Fill defaults on every section before a save. Never fails.
pub fn normalize_sections(mut sections: Vec<Section>) -> Vec<Section> {
    for i in 0..sections.len() {
        if sections[i].id.trim().is_empty() {
            let id = new_section_id(&sections);
            sections[i].id = id;
        }
        if sections[i].name.trim().is_empty() {
            sections[i].name = DEFAULT_SECTION_NAME.to_string();
        }
    }
    renumber(&mut sections);
    sections
}

/// Whether `order` values are exactly `1..=N` by position.
pub fn is_contiguous(sections: &[Section]) -> bool {
    sections
        .iter()
        .enumerate()
        .all(|(i, s)| s.order == (i + 1) as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(id: &str, required: bool, order: u32) -> Section {
        Section {
            id: id.to_string(),
            name: id.to_string(),
            description: String::new(),
            required,
            default_enabled: true,
            order,
            rag_query_template: String::new(),
            prompt_template: String::new(),
        }
    }

    fn template(sections: Vec<Section>) -> Template {
        Template {
            id: "custom_1".into(),
            name: "Custom".into(),
            description: String::new(),
            sections,
            is_default: false,
            is_custom: true,
        }
    }

    #[test]
    fn append_goes_last_with_next_order() {
        let mut t = template(vec![section("a", true, 1), section("b", false, 2)]);
        let id = append_section(&mut t);
        assert_eq!(t.sections.len(), 3);
        assert_eq!(t.sections[2].id, id);
        assert_eq!(t.sections[2].order, 3);
        assert!(is_contiguous(&t.sections));
    }

    #[test]
    fn append_repairs_gaps() {
        let mut t = template(vec![section("a", false, 4), section("b", false, 9)]);
        append_section(&mut t);
        assert!(is_contiguous(&t.sections));
    }

    #[test]
    fn remove_renumbers_remaining() {
        let mut t = template(vec![
            section("a", true, 1),
            section("b", false, 2),
            section("c", false, 3),
        ]);
        let removed = remove_section(&mut t, "b").unwrap();
        assert_eq!(removed.id, "b");
        let ids: Vec<_> = t.sections.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["a", "c"]);
        assert!(is_contiguous(&t.sections));
    }

    #[test]
    fn remove_required_is_rejected_and_list_unchanged() {
        let mut t = template(vec![section("a", true, 1), section("b", false, 2)]);
        let before = t.sections.clone();
        let err = remove_section(&mut t, "a").unwrap_err();
        assert_eq!(err, CoreError::RequiredSection("a".into()));
        assert_eq!(t.sections, before);
    }

    #[test]
    fn remove_unknown_section() {
        let mut t = template(vec![section("a", false, 1)]);
        assert!(matches!(
            remove_section(&mut t, "zzz"),
            Err(CoreError::NotFound { entity: "Section", .. })
        ));
    }

    #[test]
    fn normalize_fills_missing_fields() {
        let raw: Section = serde_json::from_str(r#"{"id":""}"#).unwrap();
        let named = section("keep", false, 7);
        let out = normalize_sections(vec![raw, named]);

        assert!(!out[0].id.is_empty());
        assert_eq!(out[0].name, DEFAULT_SECTION_NAME);
        assert_eq!(out[0].description, "");
        assert!(!out[0].required);
        assert!(out[0].default_enabled);
        assert_eq!(out[1].name, "keep");
        assert!(is_contiguous(&out));
    }

    #[test]
    fn normalize_empty_list() {
        assert!(normalize_sections(Vec::new()).is_empty());
    }
}
