//! Numeric filter criteria
//!
//! Four optional thresholds, evaluated in the fixed order age max, age min,
//! size max, size min. Zero, NaN and absent values all mean "not active".
//! Boundaries are exclusive: a profile fails a max threshold only when it is
//! strictly greater, and a min threshold only when it is strictly less.

use serde::{Deserialize, Serialize};

/// Numeric attribute a threshold applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Attribute {
    Age,
    Size,
}

/// Direction of a threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bound {
    Max,
    Min,
}

/// One of the four criteria slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ThresholdField {
    AgeMax,
    AgeMin,
    SizeMax,
    SizeMin,
}

impl ThresholdField {
    /// Evaluation order
    pub const ORDER: [ThresholdField; 4] = [
        ThresholdField::AgeMax,
        ThresholdField::AgeMin,
        ThresholdField::SizeMax,
        ThresholdField::SizeMin,
    ];

    pub fn attribute(&self) -> Attribute {
        match self {
            ThresholdField::AgeMax | ThresholdField::AgeMin => Attribute::Age,
            ThresholdField::SizeMax | ThresholdField::SizeMin => Attribute::Size,
        }
    }

    pub fn bound(&self) -> Bound {
        match self {
            ThresholdField::AgeMax | ThresholdField::SizeMax => Bound::Max,
            ThresholdField::AgeMin | ThresholdField::SizeMin => Bound::Min,
        }
    }
}

/// An active threshold
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Threshold {
    pub field: ThresholdField,
    pub value: f64,
}

impl Threshold {
    /// Whether an attribute value survives this threshold.
    ///
    /// An unknown value never survives an active threshold.
    pub fn admits(&self, value: Option<f64>) -> bool {
        match (value, self.field.bound()) {
            (None, _) => false,
            (Some(value), Bound::Max) => value <= self.value,
            (Some(value), Bound::Min) => value >= self.value,
        }
    }
}

/// Thresholds supplied to one filter invocation
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterCriteria {
    pub age_max: Option<f64>,
    pub age_min: Option<f64>,
    pub size_max: Option<f64>,
    pub size_min: Option<f64>,
}

impl FilterCriteria {
    /// Criteria with nothing active
    pub fn none() -> Self {
        Self::default()
    }

    /// Set a slot, builder style
    pub fn with(mut self, field: ThresholdField, value: f64) -> Self {
        self.set(field, Some(value));
        self
    }

    /// Raw value stored in a slot
    pub fn get(&self, field: ThresholdField) -> Option<f64> {
        match field {
            ThresholdField::AgeMax => self.age_max,
            ThresholdField::AgeMin => self.age_min,
            ThresholdField::SizeMax => self.size_max,
            ThresholdField::SizeMin => self.size_min,
        }
    }

    /// Store a raw value in a slot
    pub fn set(&mut self, field: ThresholdField, value: Option<f64>) {
        let slot = match field {
            ThresholdField::AgeMax => &mut self.age_max,
            ThresholdField::AgeMin => &mut self.age_min,
            ThresholdField::SizeMax => &mut self.size_max,
            ThresholdField::SizeMin => &mut self.size_min,
        };
        *slot = value;
    }

    /// Active thresholds in evaluation order
    pub fn thresholds(&self) -> impl Iterator<Item = Threshold> + '_ {
        ThresholdField::ORDER.into_iter().filter_map(move |field| {
            self.get(field)
                .filter(|value| is_active(*value))
                .map(|value| Threshold { field, value })
        })
    }

    /// Check if no threshold is active
    pub fn is_empty(&self) -> bool {
        self.thresholds().next().is_none()
    }
}

fn is_active(value: f64) -> bool {
    value != 0.0 && !value.is_nan()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inactive_values() {
        let criteria = FilterCriteria {
            age_max: Some(0.0),
            age_min: Some(f64::NAN),
            size_max: None,
            size_min: None,
        };
        assert!(criteria.is_empty());
        assert!(FilterCriteria::none().is_empty());
    }

    #[test]
    fn test_thresholds_follow_fixed_order() {
        let criteria = FilterCriteria::none()
            .with(ThresholdField::SizeMin, 4.0)
            .with(ThresholdField::AgeMin, 21.0)
            .with(ThresholdField::AgeMax, 40.0);
        let fields: Vec<_> = criteria.thresholds().map(|t| t.field).collect();
        assert_eq!(
            fields,
            vec![ThresholdField::AgeMax, ThresholdField::AgeMin, ThresholdField::SizeMin]
        );
    }

    #[test]
    fn test_boundaries_are_exclusive() {
        let max = Threshold { field: ThresholdField::AgeMax, value: 40.0 };
        assert!(max.admits(Some(40.0)));
        assert!(max.admits(Some(39.0)));
        assert!(!max.admits(Some(40.5)));
        assert!(!max.admits(None));

        let min = Threshold { field: ThresholdField::SizeMin, value: 6.0 };
        assert!(min.admits(Some(6.0)));
        assert!(!min.admits(Some(5.9)));
        assert!(!min.admits(None));
    }

    #[test]
    fn test_field_mapping() {
        assert_eq!(ThresholdField::AgeMin.attribute(), Attribute::Age);
        assert_eq!(ThresholdField::SizeMax.attribute(), Attribute::Size);
        assert_eq!(ThresholdField::SizeMax.bound(), Bound::Max);
    }

    #[test]
    fn test_criteria_json_uses_camel_case() {
        let criteria: FilterCriteria = serde_json::from_str(r#"{"ageMax": 40}"#).unwrap();
        assert_eq!(criteria.age_max, Some(40.0));
        assert_eq!(criteria.size_min, None);
    }
}
