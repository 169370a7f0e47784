//! The live tree trait and the values that cross it

use crate::{Result, Selector};
use serde::{Deserialize, Serialize};

/// Identifier of an established child-list subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Create a SubscriptionId from a raw counter value
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw counter value
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// Direct children added to or removed from one observed target
#[derive(Debug, Clone, PartialEq)]
pub struct ChildListChange<N> {
    /// The observed element whose children changed
    pub target: N,
    /// Elements inserted as direct children
    pub added: Vec<N>,
    /// Elements removed from the direct children
    pub removed: Vec<N>,
}

/// Every change a subscription accumulated before the host delivered it.
///
/// A single batch may report many insertions and removals; consumers treat
/// one batch as one trigger.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeBatch<N> {
    pub changes: Vec<ChildListChange<N>>,
}

impl<N> ChangeBatch<N> {
    /// Create an empty batch
    pub fn new() -> Self {
        Self { changes: Vec::new() }
    }

    /// Whether any record actually added or removed a child
    pub fn has_child_list_changes(&self) -> bool {
        self.changes
            .iter()
            .any(|change| !change.added.is_empty() || !change.removed.is_empty())
    }

    /// All added elements across the batch, in record order
    pub fn added(&self) -> impl Iterator<Item = &N> {
        self.changes.iter().flat_map(|change| change.added.iter())
    }

    /// Number of records in the batch
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// Check if the batch carries no records
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

impl<N> Default for ChangeBatch<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Description of an element subtree to inject into the tree
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementSpec {
    /// Tag name
    pub tag: String,
    /// Element id
    pub id: Option<String>,
    /// Class list
    pub classes: Vec<String>,
    /// Tooltip text
    pub title: Option<String>,
    /// Plain text content
    pub text: Option<String>,
    /// Inline style declarations, in application order
    pub styles: Vec<(String, String)>,
    /// Additional attributes
    pub attributes: Vec<(String, String)>,
    /// Swallow click interaction (prevent the default action)
    pub intercept_clicks: bool,
    /// Child elements
    pub children: Vec<ElementSpec>,
}

impl ElementSpec {
    /// Create a new element spec with the given tag
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    /// Set the element id
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Add a class
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    /// Set the tooltip
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the text content
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Add an inline style declaration
    pub fn with_style(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.styles.push((property.into(), value.into()));
        self
    }

    /// Add an attribute
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Make the element swallow clicks
    pub fn intercepting_clicks(mut self) -> Self {
        self.intercept_clicks = true;
        self
    }

    /// Add a child element
    pub fn with_child(mut self, child: ElementSpec) -> Self {
        self.children.push(child);
        self
    }

    /// Add several child elements
    pub fn with_children(mut self, children: impl IntoIterator<Item = ElementSpec>) -> Self {
        self.children.extend(children);
        self
    }
}

/// The host's rendered element tree.
///
/// Reads never mutate. Writes are limited to inline styles, text of injected
/// elements, and inserting or removing injected subtrees. Child-list changes of
/// subscribed targets are queued and handed out by [`LiveTree::take_batches`];
/// the host decides when to drain them, so a consumer never runs re-entrantly
/// inside a tree mutation.
pub trait LiveTree {
    /// Non-owning handle to one element
    type Node: Clone + PartialEq + std::fmt::Debug;

    /// The document body, when one exists
    fn body(&self) -> Option<Self::Node>;

    /// All elements matching `selector`, in document order
    fn query_all(&self, selector: &Selector) -> Vec<Self::Node>;

    /// All descendants of `scope` matching `selector`, in document order
    fn query_within(&self, scope: &Self::Node, selector: &Selector) -> Vec<Self::Node>;

    /// First element matching `selector`
    fn query_first(&self, selector: &Selector) -> Option<Self::Node> {
        self.query_all(selector).into_iter().next()
    }

    /// First descendant of `scope` matching `selector`
    fn query_first_within(&self, scope: &Self::Node, selector: &Selector) -> Option<Self::Node> {
        self.query_within(scope, selector).into_iter().next()
    }

    /// Whether `node` itself matches `selector`
    fn matches(&self, node: &Self::Node, selector: &Selector) -> bool;

    /// Element with the given id attribute
    fn find_by_id(&self, id: &str) -> Option<Self::Node>;

    /// Parent element
    fn parent(&self, node: &Self::Node) -> Option<Self::Node>;

    /// Whether the handle still resolves to an element in the tree
    fn is_attached(&self, node: &Self::Node) -> bool;

    /// Rendered text of the element and its descendants
    fn text(&self, node: &Self::Node) -> Option<String>;

    /// Inline style value
    fn style(&self, node: &Self::Node, property: &str) -> Option<String>;

    /// Set an inline style value
    fn set_style(&mut self, node: &Self::Node, property: &str, value: &str) -> Result<()>;

    /// Replace the text content of an element
    fn set_text(&mut self, node: &Self::Node, text: &str) -> Result<()>;

    /// Build `spec` and append it as the last child of `parent`
    fn append_element(&mut self, parent: &Self::Node, spec: &ElementSpec) -> Result<Self::Node>;

    /// Detach an element and its subtree
    fn remove(&mut self, node: &Self::Node) -> Result<()>;

    /// Start observing direct child insertions and removals of `target`
    fn subscribe(&mut self, target: &Self::Node) -> Result<SubscriptionId>;

    /// Stop observing. Already queued batches for the subscription are dropped.
    fn unsubscribe(&mut self, id: SubscriptionId) -> Result<()>;

    /// Drain every queued batch, ordered by subscription
    fn take_batches(&mut self) -> Vec<(SubscriptionId, ChangeBatch<Self::Node>)>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_reports_child_list_changes() {
        let mut batch: ChangeBatch<u32> = ChangeBatch::new();
        assert!(batch.is_empty());
        assert!(!batch.has_child_list_changes());

        batch.changes.push(ChildListChange {
            target: 1,
            added: vec![],
            removed: vec![],
        });
        assert!(!batch.has_child_list_changes());

        batch.changes.push(ChildListChange {
            target: 1,
            added: vec![2, 3],
            removed: vec![4],
        });
        assert!(batch.has_child_list_changes());
        assert_eq!(batch.added().copied().collect::<Vec<_>>(), vec![2, 3]);
        assert_eq!(batch.len(), 2);
    }

    #[test]
    fn test_element_spec_builder() {
        let spec = ElementSpec::new("div")
            .with_id("guard")
            .with_title("blocked")
            .with_style("cursor", "not-allowed")
            .intercepting_clicks()
            .with_child(ElementSpec::new("div"));

        assert_eq!(spec.id.as_deref(), Some("guard"));
        assert!(spec.intercept_clicks);
        assert_eq!(spec.styles, vec![("cursor".to_string(), "not-allowed".to_string())]);
        assert_eq!(spec.children.len(), 1);
    }
}
