//! Per-pass profile records

use crate::{parse_label, Attribute, BodyType, LabelFields};

/// Structured attributes of one marker, tied to the node it was read from.
///
/// `N` is the tree's node handle. Profiles are rebuilt on every filter pass
/// and dropped when the pass ends; they never outlive the query that made them.
#[derive(Debug, Clone, PartialEq)]
pub struct Profile<N> {
    pub age: Option<f64>,
    pub height: Option<String>,
    pub size: Option<f64>,
    pub body_type: Option<BodyType>,
    pub node: N,
}

impl<N> Profile<N> {
    /// Parse a label and attach the node it came from
    pub fn from_label(label: &str, node: N) -> Self {
        Self::from_fields(parse_label(Some(label)), node)
    }

    /// Coerce parsed fields into a profile
    pub fn from_fields(fields: LabelFields, node: N) -> Self {
        Self {
            age: to_number(fields.age.as_deref()),
            height: fields.height,
            size: to_number(fields.size.as_deref()),
            body_type: fields.body_type,
            node,
        }
    }

    /// Numeric value of an attribute
    pub fn attribute(&self, attribute: Attribute) -> Option<f64> {
        match attribute {
            Attribute::Age => self.age,
            Attribute::Size => self.size,
        }
    }
}

fn to_number(text: Option<&str>) -> Option<f64> {
    text.and_then(|text| text.parse::<f64>().ok())
        .filter(|value| value.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_label_coerces_numbers() {
        let profile = Profile::from_label("34, 5'10\", 7\", slim", 1u32);
        assert_eq!(profile.age, Some(34.0));
        assert_eq!(profile.size, Some(7.0));
        assert_eq!(profile.height.as_deref(), Some("5'10\""));
        assert_eq!(profile.body_type, Some(BodyType::Slim));
        assert_eq!(profile.node, 1);
    }

    #[test]
    fn test_uncoercible_size_is_unknown() {
        let profile = Profile::from_label("7.5.1\"", ());
        assert_eq!(profile.size, None);

        let profile = Profile::from_label("\"", ());
        assert_eq!(profile.size, None);
    }

    #[test]
    fn test_empty_label_yields_unknown_attributes() {
        let profile = Profile::from_label("", ());
        assert_eq!(profile.attribute(Attribute::Age), None);
        assert_eq!(profile.attribute(Attribute::Size), None);
        assert_eq!(profile.body_type, None);
    }
}
