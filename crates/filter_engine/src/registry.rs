//! Reading profiles out of the live tree

use live_tree::{LiveTree, Selector};
use profile_model::Profile;

/// Locates marker nodes and their labels.
///
/// The registry only reads. Every call re-queries the tree, so the returned
/// profiles always refer to nodes present at read time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerRegistry {
    marker: Selector,
    label: Selector,
}

impl MarkerRegistry {
    /// Create a registry from the marker selector and the label selector
    /// evaluated inside each marker
    pub fn new(marker: Selector, label: Selector) -> Self {
        Self { marker, label }
    }

    /// Build one profile per marker currently in the tree.
    ///
    /// Markers holding more than one label are skipped: their source text is
    /// ambiguous, so they are left exactly as the host rendered them.
    pub fn profiles<T: LiveTree>(&self, tree: &T) -> Vec<Profile<T::Node>> {
        tree.query_all(&self.marker)
            .into_iter()
            .filter_map(|marker| {
                let labels = tree.query_within(&marker, &self.label);
                if labels.len() > 1 {
                    tracing::trace!(labels = labels.len(), "skipping ambiguous marker");
                    return None;
                }
                let text = labels
                    .first()
                    .and_then(|label| tree.text(label))
                    .unwrap_or_default();
                Some(Profile::from_label(&text, marker))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use live_tree::{ElementSpec, MemoryTree};

    fn registry() -> MarkerRegistry {
        MarkerRegistry::new(
            Selector::parse("div.marker").unwrap(),
            Selector::parse("div.title-tag").unwrap(),
        )
    }

    fn label(text: &str) -> ElementSpec {
        ElementSpec::new("div").with_class("title-tag").with_text(text)
    }

    #[test]
    fn test_profiles_follow_markers() {
        let mut tree = MemoryTree::new();
        let body = tree.body().unwrap();
        let a = tree
            .append_element(&body, &ElementSpec::new("div").with_class("marker").with_child(label("25, fit")))
            .unwrap();
        let b = tree
            .append_element(&body, &ElementSpec::new("div").with_class("marker"))
            .unwrap();

        let profiles = registry().profiles(&tree);
        assert_eq!(profiles.len(), 2);
        assert_eq!(profiles[0].node, a);
        assert_eq!(profiles[0].age, Some(25.0));
        assert_eq!(profiles[1].node, b);
        assert_eq!(profiles[1].age, None);
    }

    #[test]
    fn test_ambiguous_markers_are_skipped() {
        let mut tree = MemoryTree::new();
        let body = tree.body().unwrap();
        tree.append_element(
            &body,
            &ElementSpec::new("div")
                .with_class("marker")
                .with_child(label("25"))
                .with_child(label("31")),
        )
        .unwrap();

        assert!(registry().profiles(&tree).is_empty());
    }

    #[test]
    fn test_no_markers() {
        let tree = MemoryTree::new();
        assert!(registry().profiles(&tree).is_empty());
    }
}
