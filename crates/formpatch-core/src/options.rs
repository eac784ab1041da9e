//! Engine options.
//!
//! The two historical dialects of the form-submission engine differ only in
//! the DELETE clause layout and in whether self-references are reduced; both
//! are choices here rather than separate code paths.

use serde::Deserialize;

/// Layout of the DELETE part of the update body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeleteClauseStyle {
    /// `DELETE WHERE {..};` followed by `INSERT {..} WHERE {};`
    #[default]
    DeleteWhere,
    /// One `DELETE {..} INSERT {..} WHERE {..};` operation.
    DeleteInsertWhere,
}

/// When (and whether) self-reference reduction runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SelfReferenceReduction {
    #[default]
    Disabled,
    BeforeClosure,
    /// Can drop quads the closure mirrored onto the other side.
    AfterClosure,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PatchOptions {
    #[serde(alias = "deleteClauseStyle")]
    pub delete_clause_style: DeleteClauseStyle,
    #[serde(alias = "selfReference")]
    pub self_reference: SelfReferenceReduction,
}

impl PatchOptions {
    pub fn with_style(mut self, style: DeleteClauseStyle) -> Self {
        self.delete_clause_style = style;
        self
    }

    pub fn with_self_reference(mut self, mode: SelfReferenceReduction) -> Self {
        self.self_reference = mode;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_kebab_case_names() {
        let options: PatchOptions = serde_json::from_str(
            r#"{"delete_clause_style": "delete-insert-where", "self_reference": "before-closure"}"#,
        )
        .expect("options");
        assert_eq!(options.delete_clause_style, DeleteClauseStyle::DeleteInsertWhere);
        assert_eq!(options.self_reference, SelfReferenceReduction::BeforeClosure);
    }

    #[test]
    fn accepts_camel_case_option_names() {
        let options: PatchOptions =
            serde_json::from_str(r#"{"deleteClauseStyle": "delete-insert-where"}"#)
                .expect("options");
        assert_eq!(options.delete_clause_style, DeleteClauseStyle::DeleteInsertWhere);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let options: PatchOptions = serde_json::from_str("{}").expect("options");
        assert_eq!(options, PatchOptions::default());
        assert_eq!(options.delete_clause_style, DeleteClauseStyle::DeleteWhere);
        assert_eq!(options.self_reference, SelfReferenceReduction::Disabled);
    }
}
