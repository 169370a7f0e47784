//! Heuristic label parsing
//!
//! A label is split on commas and every trimmed segment is offered to each
//! rule in [`LABEL_RULES`]. Rules are independent: each one scans the full
//! segment list and keeps its first match, so segment order in the label does
//! not matter and one segment may satisfy several rules. Anything a rule does
//! not recognize just leaves its field empty.

use crate::BodyType;
use serde::{Deserialize, Serialize};

/// Attributes recovered from one label, still in textual form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelFields {
    pub age: Option<String>,
    pub height: Option<String>,
    pub size: Option<String>,
    pub body_type: Option<BodyType>,
}

impl LabelFields {
    /// Check if no field was recognized
    pub fn is_empty(&self) -> bool {
        self.age.is_none()
            && self.height.is_none()
            && self.size.is_none()
            && self.body_type.is_none()
    }
}

/// The field a rule fills
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LabelField {
    Age,
    Height,
    Size,
    BodyType,
}

/// A segment predicate paired with the extractor applied to the first match
#[derive(Clone, Copy)]
pub struct LabelRule {
    pub field: LabelField,
    predicate: fn(&str) -> bool,
    extractor: fn(&str) -> String,
}

impl std::fmt::Debug for LabelRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LabelRule").field("field", &self.field).finish()
    }
}

impl LabelRule {
    /// Whether a single trimmed segment satisfies this rule
    pub fn matches(&self, segment: &str) -> bool {
        (self.predicate)(segment)
    }

    /// The value this rule keeps from a matching segment
    pub fn extract(&self, segment: &str) -> String {
        (self.extractor)(segment)
    }

    /// Extracted value of the first matching segment
    pub fn first_match(&self, segments: &[&str]) -> Option<String> {
        segments
            .iter()
            .find(|segment| self.matches(segment))
            .map(|segment| self.extract(segment))
    }
}

/// Classification rules, one per field
pub const LABEL_RULES: &[LabelRule] = &[
    LabelRule {
        field: LabelField::Age,
        predicate: is_numeric,
        extractor: keep,
    },
    LabelRule {
        field: LabelField::Height,
        predicate: is_height,
        extractor: keep,
    },
    LabelRule {
        field: LabelField::Size,
        predicate: is_size,
        extractor: numeric_chars,
    },
    LabelRule {
        field: LabelField::BodyType,
        predicate: is_body_type,
        extractor: lowercase,
    },
];

const FEET_MARK: char = '\'';
const INCHES_MARK: char = '"';

fn is_numeric(segment: &str) -> bool {
    !segment.is_empty()
        && segment
            .parse::<f64>()
            .map(|value| value.is_finite())
            .unwrap_or(false)
}

fn is_height(segment: &str) -> bool {
    segment.contains(FEET_MARK) && segment.contains(INCHES_MARK)
}

fn is_size(segment: &str) -> bool {
    segment.contains(INCHES_MARK) && !segment.contains(FEET_MARK)
}

fn is_body_type(segment: &str) -> bool {
    BodyType::from_label(segment).is_some()
}

fn keep(segment: &str) -> String {
    segment.to_string()
}

fn numeric_chars(segment: &str) -> String {
    segment
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect()
}

fn lowercase(segment: &str) -> String {
    segment.to_ascii_lowercase()
}

/// Split a label into trimmed comma-delimited segments
pub fn segments(label: &str) -> Vec<&str> {
    label.split(',').map(str::trim).collect()
}

/// Parse a label into its recognizable fields.
///
/// Never fails: empty, absent or unrecognizable input yields empty fields.
pub fn parse_label(label: Option<&str>) -> LabelFields {
    let mut fields = LabelFields::default();
    let Some(label) = label.filter(|label| !label.is_empty()) else {
        return fields;
    };

    let segments = segments(label);
    for rule in LABEL_RULES {
        let Some(value) = rule.first_match(&segments) else {
            continue;
        };
        match rule.field {
            LabelField::Age => fields.age = Some(value),
            LabelField::Height => fields.height = Some(value),
            LabelField::Size => fields.size = Some(value),
            LabelField::BodyType => fields.body_type = BodyType::from_label(&value),
        }
    }
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn rule(field: LabelField) -> &'static LabelRule {
        LABEL_RULES.iter().find(|rule| rule.field == field).unwrap()
    }

    #[test]
    fn test_full_label() {
        let fields = parse_label(Some("34, 5'10\", 7\", slim"));
        assert_eq!(fields.age.as_deref(), Some("34"));
        assert_eq!(fields.height.as_deref(), Some("5'10\""));
        assert_eq!(fields.size.as_deref(), Some("7"));
        assert_eq!(fields.body_type, Some(BodyType::Slim));
    }

    #[test]
    fn test_empty_and_absent_labels() {
        assert!(parse_label(Some("")).is_empty());
        assert!(parse_label(None).is_empty());
        assert!(parse_label(Some(" , ,")).is_empty());
    }

    #[test]
    fn test_segment_order_does_not_matter() {
        let fields = parse_label(Some("Muscular,7.5 in\", 29"));
        assert_eq!(fields.age.as_deref(), Some("29"));
        assert_eq!(fields.size.as_deref(), Some("7.5"));
        assert_eq!(fields.body_type, Some(BodyType::Muscular));
        assert_eq!(fields.height, None);
    }

    #[test]
    fn test_first_match_wins_per_field() {
        let fields = parse_label(Some("30, 41, 6'1\", 5'9\", 8\", 6\", fit, slim"));
        assert_eq!(fields.age.as_deref(), Some("30"));
        assert_eq!(fields.height.as_deref(), Some("6'1\""));
        assert_eq!(fields.size.as_deref(), Some("8"));
        assert_eq!(fields.body_type, Some(BodyType::Fit));
    }

    #[test]
    fn test_feet_only_is_not_height_or_size() {
        let fields = parse_label(Some("30, 6', slim"));
        assert_eq!(fields.age.as_deref(), Some("30"));
        assert_eq!(fields.height, None);
        assert_eq!(fields.size, None);
    }

    #[test]
    fn test_age_rule_requires_whole_segment() {
        let age = rule(LabelField::Age);
        assert!(age.matches("34"));
        assert!(age.matches("34.5"));
        assert!(!age.matches("34yo"));
        assert!(!age.matches(""));
        assert!(!age.matches("inf"));
        assert!(!age.matches("NaN"));
    }

    #[test]
    fn test_size_rule_strips_non_numeric() {
        let size = rule(LabelField::Size);
        assert!(size.matches("~7.5\" cut"));
        assert!(!size.matches("5'10\""));
        assert_eq!(size.extract("~7.5\" cut"), "7.5");
    }

    #[test]
    fn test_body_type_rule_is_case_insensitive() {
        let body = rule(LabelField::BodyType);
        assert!(body.matches("STOCKY"));
        assert!(!body.matches("stocky build"));
        assert_eq!(body.extract("Stocky"), "stocky");
    }

    proptest! {
        #[test]
        fn parse_never_panics(label in "\\PC*") {
            let _ = parse_label(Some(&label));
        }

        #[test]
        fn parsed_size_is_digits_and_dots(label in "[0-9a-z'\" .,]{0,40}") {
            if let Some(size) = parse_label(Some(&label)).size {
                prop_assert!(size.chars().all(|c| c.is_ascii_digit() || c == '.'));
            }
        }
    }
}
