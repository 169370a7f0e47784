//! Writing a partition back to the tree

use crate::Partition;
use live_tree::LiveTree;
use serde::{Deserialize, Serialize};

pub const DISPLAY: &str = "display";
pub const ANIMATION_DELAY: &str = "animation-delay";
pub const ANIMATION_DURATION: &str = "animation-duration";

/// Display values used to show and hide markers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisibilityStyle {
    /// Display value of a visible marker
    pub visible: String,
    /// Display value of a hidden marker
    pub hidden: String,
    /// Zero animation timing on visible markers while toggling
    pub suppress_transitions: bool,
}

impl Default for VisibilityStyle {
    fn default() -> Self {
        Self {
            visible: "initial".to_string(),
            hidden: "none".to_string(),
            suppress_transitions: true,
        }
    }
}

/// Apply a partition as display styles.
///
/// Returns the number of style writes that failed. A failed write is logged
/// and skipped; it never stops the rest of the pass.
pub fn apply_partition<T: LiveTree>(
    tree: &mut T,
    partition: &Partition<T::Node>,
    style: &VisibilityStyle,
) -> usize {
    let mut failures = 0;

    if style.suppress_transitions {
        for profile in &partition.visible {
            write(tree, &profile.node, ANIMATION_DELAY, "0", &mut failures);
            write(tree, &profile.node, ANIMATION_DURATION, "0", &mut failures);
        }
    }
    for profile in &partition.visible {
        write(tree, &profile.node, DISPLAY, &style.visible, &mut failures);
    }
    for profile in &partition.hidden {
        write(tree, &profile.node, DISPLAY, &style.hidden, &mut failures);
    }
    if style.suppress_transitions {
        for profile in &partition.visible {
            write(tree, &profile.node, ANIMATION_DELAY, "initial", &mut failures);
            write(tree, &profile.node, ANIMATION_DURATION, "initial", &mut failures);
        }
    }

    failures
}

fn write<T: LiveTree>(tree: &mut T, node: &T::Node, property: &str, value: &str, failures: &mut usize) {
    if let Err(err) = tree.set_style(node, property, value) {
        *failures += 1;
        tracing::warn!(?node, property, value, error = %err, "failed to write marker style");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use live_tree::{ElementSpec, MemoryTree};
    use profile_model::Profile;

    #[test]
    fn test_apply_sets_display_values() {
        let mut tree = MemoryTree::new();
        let body = tree.body().unwrap();
        let shown = tree.append_element(&body, &ElementSpec::new("div")).unwrap();
        let hidden = tree.append_element(&body, &ElementSpec::new("div")).unwrap();

        let partition = Partition {
            visible: vec![Profile::from_label("25", shown)],
            hidden: vec![Profile::from_label("45", hidden)],
        };
        let failures = apply_partition(&mut tree, &partition, &VisibilityStyle::default());

        assert_eq!(failures, 0);
        assert_eq!(tree.style(&shown, DISPLAY).as_deref(), Some("initial"));
        assert_eq!(tree.style(&hidden, DISPLAY).as_deref(), Some("none"));
        assert_eq!(tree.style(&shown, ANIMATION_DURATION).as_deref(), Some("initial"));
        assert_eq!(tree.style(&hidden, ANIMATION_DURATION), None);
    }

    #[test]
    fn test_apply_without_transition_suppression() {
        let mut tree = MemoryTree::new();
        let body = tree.body().unwrap();
        let shown = tree.append_element(&body, &ElementSpec::new("div")).unwrap();

        let partition = Partition {
            visible: vec![Profile::from_label("25", shown)],
            hidden: vec![],
        };
        let style = VisibilityStyle {
            suppress_transitions: false,
            ..VisibilityStyle::default()
        };
        apply_partition(&mut tree, &partition, &style);

        assert_eq!(tree.style(&shown, ANIMATION_DELAY), None);
        assert_eq!(tree.style(&shown, DISPLAY).as_deref(), Some("initial"));
    }

    #[test]
    fn test_detached_nodes_count_as_failures() {
        let mut tree = MemoryTree::new();
        let body = tree.body().unwrap();
        let gone = tree.append_element(&body, &ElementSpec::new("div")).unwrap();
        let kept = tree.append_element(&body, &ElementSpec::new("div")).unwrap();
        tree.remove(&gone).unwrap();

        let partition = Partition {
            visible: vec![],
            hidden: vec![Profile::from_label("", gone), Profile::from_label("", kept)],
        };
        let failures = apply_partition(&mut tree, &partition, &VisibilityStyle::default());

        assert_eq!(failures, 1);
        assert_eq!(tree.style(&kept, DISPLAY).as_deref(), Some("none"));
    }
}
