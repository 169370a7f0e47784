//! Sequential threshold elimination

use profile_model::{FilterCriteria, Profile};
use serde::{Deserialize, Serialize};

/// Shown and hidden counts of one pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterStats {
    pub shown: usize,
    pub hidden: usize,
}

impl std::fmt::Display for FilterStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Profiles Shown: {}, Profiles Hidden: {}",
            self.shown, self.hidden
        )
    }
}

/// Profiles split into those that stay visible and those to hide
#[derive(Debug, Clone, PartialEq)]
pub struct Partition<N> {
    pub visible: Vec<Profile<N>>,
    pub hidden: Vec<Profile<N>>,
}

impl<N> Partition<N> {
    pub fn stats(&self) -> FilterStats {
        FilterStats {
            shown: self.visible.len(),
            hidden: self.hidden.len(),
        }
    }

    /// Number of profiles across both sides
    pub fn len(&self) -> usize {
        self.visible.len() + self.hidden.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visible.is_empty() && self.hidden.is_empty()
    }
}

/// Partition `profiles` against `criteria`.
///
/// Each active threshold, in order, moves the still-visible profiles it does
/// not admit to the hidden side. Hidden profiles are never reconsidered, and
/// with no active threshold everything stays visible. Relative order is kept
/// on both sides.
pub fn filter<N>(profiles: Vec<Profile<N>>, criteria: &FilterCriteria) -> Partition<N> {
    let mut visible = profiles;
    let mut hidden = Vec::new();

    for threshold in criteria.thresholds() {
        let attribute = threshold.field.attribute();
        let (kept, failed): (Vec<_>, Vec<_>) = visible
            .into_iter()
            .partition(|profile| threshold.admits(profile.attribute(attribute)));
        visible = kept;
        hidden.extend(failed);
    }

    Partition { visible, hidden }
}

#[cfg(test)]
mod tests {
    use super::*;
    use profile_model::ThresholdField;
    use proptest::prelude::*;

    fn profiles(labels: &[&str]) -> Vec<Profile<usize>> {
        labels
            .iter()
            .enumerate()
            .map(|(i, label)| Profile::from_label(label, i))
            .collect()
    }

    fn nodes(side: &[Profile<usize>]) -> Vec<usize> {
        side.iter().map(|profile| profile.node).collect()
    }

    #[test]
    fn test_age_max_example() {
        let partition = filter(
            profiles(&["25, fit", "45, chubby", "30, 6', slim"]),
            &FilterCriteria::none().with(ThresholdField::AgeMax, 40.0),
        );
        assert_eq!(nodes(&partition.visible), vec![0, 2]);
        assert_eq!(nodes(&partition.hidden), vec![1]);
        assert_eq!(partition.stats(), FilterStats { shown: 2, hidden: 1 });
    }

    #[test]
    fn test_no_criteria_keeps_everything() {
        let input = profiles(&["25", "", "7\""]);
        let partition = filter(input.clone(), &FilterCriteria::none());
        assert_eq!(partition.visible, input);
        assert!(partition.hidden.is_empty());
    }

    #[test]
    fn test_unknown_age_hidden_by_any_age_threshold() {
        for field in [ThresholdField::AgeMax, ThresholdField::AgeMin] {
            let partition = filter(
                profiles(&["slim", "30"]),
                &FilterCriteria::none().with(field, 30.0),
            );
            assert_eq!(nodes(&partition.hidden), vec![0]);
            assert_eq!(nodes(&partition.visible), vec![1]);
        }
    }

    #[test]
    fn test_hidden_order_follows_passes() {
        let partition = filter(
            profiles(&["20, 5\"", "50, 9\"", "30", "35, 3\""]),
            &FilterCriteria::none()
                .with(ThresholdField::AgeMax, 40.0)
                .with(ThresholdField::SizeMin, 4.0),
        );
        // age max removes #1, size min then removes #2 (unknown) and #3 (too small)
        assert_eq!(nodes(&partition.hidden), vec![1, 2, 3]);
        assert_eq!(nodes(&partition.visible), vec![0]);
    }

    #[test]
    fn test_display_stats() {
        let stats = FilterStats { shown: 2, hidden: 1 };
        assert_eq!(stats.to_string(), "Profiles Shown: 2, Profiles Hidden: 1");
    }

    fn arb_profile() -> impl Strategy<Value = (Option<f64>, Option<f64>)> {
        (
            proptest::option::of(18.0f64..80.0),
            proptest::option::of(0.0f64..12.0),
        )
    }

    fn arb_criteria() -> impl Strategy<Value = FilterCriteria> {
        (
            proptest::option::of(0.0f64..90.0),
            proptest::option::of(0.0f64..90.0),
            proptest::option::of(0.0f64..15.0),
            proptest::option::of(0.0f64..15.0),
        )
            .prop_map(|(age_max, age_min, size_max, size_min)| FilterCriteria {
                age_max,
                age_min,
                size_max,
                size_min,
            })
    }

    fn build(attributes: &[(Option<f64>, Option<f64>)]) -> Vec<Profile<usize>> {
        attributes
            .iter()
            .enumerate()
            .map(|(i, (age, size))| Profile {
                age: *age,
                height: None,
                size: *size,
                body_type: None,
                node: i,
            })
            .collect()
    }

    proptest! {
        #[test]
        fn partition_is_disjoint_and_complete(
            attributes in proptest::collection::vec(arb_profile(), 0..40),
            criteria in arb_criteria(),
        ) {
            let input = build(&attributes);
            let partition = filter(input.clone(), &criteria);

            let mut seen = nodes(&partition.visible);
            seen.extend(nodes(&partition.hidden));
            seen.sort_unstable();
            prop_assert_eq!(seen, (0..input.len()).collect::<Vec<_>>());
        }

        #[test]
        fn filtering_is_deterministic(
            attributes in proptest::collection::vec(arb_profile(), 0..40),
            criteria in arb_criteria(),
        ) {
            let input = build(&attributes);
            let first = filter(input.clone(), &criteria);
            let second = filter(input, &criteria);
            prop_assert_eq!(first, second);
        }

        #[test]
        fn empty_criteria_is_identity(attributes in proptest::collection::vec(arb_profile(), 0..40)) {
            let input = build(&attributes);
            let partition = filter(input.clone(), &FilterCriteria::none());
            prop_assert_eq!(partition.visible, input);
            prop_assert!(partition.hidden.is_empty());
        }

        #[test]
        fn visible_profiles_satisfy_every_threshold(
            attributes in proptest::collection::vec(arb_profile(), 0..40),
            criteria in arb_criteria(),
        ) {
            let partition = filter(build(&attributes), &criteria);
            for profile in &partition.visible {
                for threshold in criteria.thresholds() {
                    prop_assert!(threshold.admits(profile.attribute(threshold.field.attribute())));
                }
            }
        }
    }
}
