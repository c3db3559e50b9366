//! Runtime field classification.

use page_surface::ElementFacts;

use crate::model::FieldKind;

/// Classify a probed element. Unknown tags and input types fall back to
/// text, which matches how browsers treat them.
pub fn classify(facts: &ElementFacts) -> FieldKind {
    match facts.tag.to_ascii_lowercase().as_str() {
        "select" => FieldKind::Select,
        "input" => match facts
            .input_type
            .as_deref()
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("checkbox") => FieldKind::Checkbox,
            Some("radio") => FieldKind::Radio,
            Some("file") => FieldKind::File,
            _ => FieldKind::Text,
        },
        _ => FieldKind::Text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_types_map_to_their_kinds() {
        let cases = [
            (ElementFacts::new("input", Some("checkbox")), FieldKind::Checkbox),
            (ElementFacts::new("input", Some("radio")), FieldKind::Radio),
            (ElementFacts::new("input", Some("file")), FieldKind::File),
            (ElementFacts::new("input", Some("email")), FieldKind::Text),
            (ElementFacts::new("input", None), FieldKind::Text),
            (ElementFacts::new("select", None), FieldKind::Select),
            (ElementFacts::new("textarea", None), FieldKind::Text),
            (ElementFacts::new("div", None), FieldKind::Text),
        ];
        for (facts, expected) in cases {
            assert_eq!(classify(&facts), expected, "{facts:?}");
        }
    }

    #[test]
    fn classification_is_case_insensitive() {
        assert_eq!(
            classify(&ElementFacts::new("INPUT", Some("CheckBox"))),
            FieldKind::Checkbox
        );
        assert_eq!(classify(&ElementFacts::new("SELECT", None)), FieldKind::Select);
    }
}
