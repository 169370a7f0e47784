//! In-memory live tree
//!
//! `MemoryTree` behaves like a minimal DOM: elements live in an arena keyed by
//! [`NodeId`], child-list changes of observed targets are queued per
//! subscription until the host drains them, and removal drops the whole
//! subtree. It stands in for the browser in tests and headless hosts.

use crate::{
    ChangeBatch, ChildListChange, ElementSpec, LiveTree, NodeId, Result, Selector,
    SubscriptionId, TreeError,
};
use std::collections::{BTreeMap, HashMap};

/// One element stored in the arena
#[derive(Debug, Clone)]
struct Element {
    tag: String,
    id: Option<String>,
    classes: Vec<String>,
    title: Option<String>,
    text: String,
    styles: BTreeMap<String, String>,
    attributes: BTreeMap<String, String>,
    intercepts_clicks: bool,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Element {
    fn from_spec(spec: &ElementSpec, parent: Option<NodeId>) -> Self {
        Self {
            tag: spec.tag.to_ascii_lowercase(),
            id: spec.id.clone(),
            classes: spec.classes.clone(),
            title: spec.title.clone(),
            text: spec.text.clone().unwrap_or_default(),
            styles: spec.styles.iter().cloned().collect(),
            attributes: spec.attributes.iter().cloned().collect(),
            intercepts_clicks: spec.intercept_clicks,
            parent,
            children: Vec::new(),
        }
    }
}

/// An arena-backed element tree rooted at a `body` element
#[derive(Debug, Clone)]
pub struct MemoryTree {
    nodes: HashMap<NodeId, Element>,
    body: NodeId,
    observers: BTreeMap<SubscriptionId, NodeId>,
    pending: BTreeMap<SubscriptionId, ChangeBatch<NodeId>>,
    next_subscription: u64,
}

impl MemoryTree {
    /// Create a tree holding only an empty body
    pub fn new() -> Self {
        let body = NodeId::new();
        let mut nodes = HashMap::new();
        nodes.insert(body, Element::from_spec(&ElementSpec::new("body"), None));
        Self {
            nodes,
            body,
            observers: BTreeMap::new(),
            pending: BTreeMap::new(),
            next_subscription: 1,
        }
    }

    /// Total number of elements, body included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the tree holds only the body
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Number of live subscriptions
    pub fn subscription_count(&self) -> usize {
        self.observers.len()
    }

    /// Direct children of an element
    pub fn children(&self, node: &NodeId) -> &[NodeId] {
        self.nodes
            .get(node)
            .map(|element| element.children.as_slice())
            .unwrap_or(&[])
    }

    /// Tag name of an element
    pub fn tag(&self, node: &NodeId) -> Option<&str> {
        self.nodes.get(node).map(|element| element.tag.as_str())
    }

    /// Tooltip of an element
    pub fn title(&self, node: &NodeId) -> Option<&str> {
        self.nodes.get(node).and_then(|element| element.title.as_deref())
    }

    /// Attribute value of an element
    pub fn attribute(&self, node: &NodeId, name: &str) -> Option<&str> {
        self.nodes
            .get(node)
            .and_then(|element| element.attributes.get(name))
            .map(String::as_str)
    }

    /// Whether the element swallows clicks
    pub fn intercepts_clicks(&self, node: &NodeId) -> bool {
        self.nodes
            .get(node)
            .map(|element| element.intercepts_clicks)
            .unwrap_or(false)
    }

    fn element(&self, node: &NodeId) -> Result<&Element> {
        self.nodes.get(node).ok_or_else(|| TreeError::node_not_found(node))
    }

    fn element_mut(&mut self, node: &NodeId) -> Result<&mut Element> {
        self.nodes
            .get_mut(node)
            .ok_or_else(|| TreeError::node_not_found(node))
    }

    fn build(&mut self, parent: NodeId, spec: &ElementSpec) -> NodeId {
        let id = NodeId::new();
        self.nodes.insert(id, Element::from_spec(spec, Some(parent)));
        let children: Vec<NodeId> = spec
            .children
            .iter()
            .map(|child| self.build(id, child))
            .collect();
        if let Some(element) = self.nodes.get_mut(&id) {
            element.children = children;
        }
        id
    }

    fn record(&mut self, target: NodeId, added: Vec<NodeId>, removed: Vec<NodeId>) {
        let watchers: Vec<SubscriptionId> = self
            .observers
            .iter()
            .filter(|(_, observed)| **observed == target)
            .map(|(id, _)| *id)
            .collect();
        for id in watchers {
            self.pending
                .entry(id)
                .or_default()
                .changes
                .push(ChildListChange {
                    target,
                    added: added.clone(),
                    removed: removed.clone(),
                });
        }
    }

    /// Pre-order walk of the subtree below `root`, root excluded
    fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(&root).iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(self.children(&node).iter().rev().copied());
        }
        out
    }

    fn node_matches(&self, node: NodeId, selector: &Selector) -> bool {
        let Some(element) = self.nodes.get(&node) else {
            return false;
        };
        if !selector
            .subject()
            .matches(&element.tag, element.id.as_deref(), &element.classes)
        {
            return false;
        }

        // Descendant combinators only: match ancestors greedily, innermost first.
        let ancestors = selector.ancestors();
        let mut unmatched = ancestors.len();
        let mut cursor = element.parent;
        while unmatched > 0 {
            let Some(candidate) = cursor.and_then(|ancestor| self.nodes.get(&ancestor)) else {
                break;
            };
            let step = &ancestors[unmatched - 1];
            if step.matches(&candidate.tag, candidate.id.as_deref(), &candidate.classes) {
                unmatched -= 1;
            }
            cursor = candidate.parent;
        }
        unmatched == 0
    }

    fn collect_text(&self, node: NodeId, out: &mut String) {
        if let Some(element) = self.nodes.get(&node) {
            out.push_str(&element.text);
            for child in &element.children {
                self.collect_text(*child, out);
            }
        }
    }
}

impl Default for MemoryTree {
    fn default() -> Self {
        Self::new()
    }
}

impl LiveTree for MemoryTree {
    type Node = NodeId;

    fn body(&self) -> Option<NodeId> {
        Some(self.body)
    }

    fn query_all(&self, selector: &Selector) -> Vec<NodeId> {
        self.query_within(&self.body, selector)
    }

    fn query_within(&self, scope: &NodeId, selector: &Selector) -> Vec<NodeId> {
        self.descendants(*scope)
            .into_iter()
            .filter(|node| self.node_matches(*node, selector))
            .collect()
    }

    fn matches(&self, node: &NodeId, selector: &Selector) -> bool {
        self.node_matches(*node, selector)
    }

    fn find_by_id(&self, id: &str) -> Option<NodeId> {
        std::iter::once(self.body)
            .chain(self.descendants(self.body))
            .find(|node| {
                self.nodes
                    .get(node)
                    .is_some_and(|element| element.id.as_deref() == Some(id))
            })
    }

    fn parent(&self, node: &NodeId) -> Option<NodeId> {
        self.nodes.get(node).and_then(|element| element.parent)
    }

    fn is_attached(&self, node: &NodeId) -> bool {
        self.nodes.contains_key(node)
    }

    fn text(&self, node: &NodeId) -> Option<String> {
        if !self.nodes.contains_key(node) {
            return None;
        }
        let mut out = String::new();
        self.collect_text(*node, &mut out);
        Some(out)
    }

    fn style(&self, node: &NodeId, property: &str) -> Option<String> {
        self.nodes
            .get(node)
            .and_then(|element| element.styles.get(property))
            .cloned()
    }

    fn set_style(&mut self, node: &NodeId, property: &str, value: &str) -> Result<()> {
        self.element_mut(node)?
            .styles
            .insert(property.to_string(), value.to_string());
        Ok(())
    }

    fn set_text(&mut self, node: &NodeId, text: &str) -> Result<()> {
        let descendants = self.descendants(*node);
        let element = self.element_mut(node)?;
        element.text = text.to_string();
        let removed = std::mem::take(&mut element.children);
        for child in descendants {
            self.nodes.remove(&child);
        }
        if !removed.is_empty() {
            self.record(*node, Vec::new(), removed);
        }
        Ok(())
    }

    fn append_element(&mut self, parent: &NodeId, spec: &ElementSpec) -> Result<NodeId> {
        self.element(parent)?;
        let id = self.build(*parent, spec);
        self.element_mut(parent)?.children.push(id);
        self.record(*parent, vec![id], Vec::new());
        Ok(id)
    }

    fn remove(&mut self, node: &NodeId) -> Result<()> {
        if *node == self.body {
            return Err(TreeError::host("the body cannot be removed"));
        }
        let parent = self.element(node)?.parent;
        for descendant in self.descendants(*node) {
            self.nodes.remove(&descendant);
        }
        self.nodes.remove(node);
        if let Some(parent) = parent {
            if let Some(element) = self.nodes.get_mut(&parent) {
                element.children.retain(|child| child != node);
            }
            self.record(parent, Vec::new(), vec![*node]);
        }
        Ok(())
    }

    fn subscribe(&mut self, target: &NodeId) -> Result<SubscriptionId> {
        self.element(target)?;
        let id = SubscriptionId::new(self.next_subscription);
        self.next_subscription += 1;
        self.observers.insert(id, *target);
        Ok(id)
    }

    fn unsubscribe(&mut self, id: SubscriptionId) -> Result<()> {
        self.pending.remove(&id);
        self.observers
            .remove(&id)
            .map(|_| ())
            .ok_or(TreeError::SubscriptionNotFound(id))
    }

    fn take_batches(&mut self) -> Vec<(SubscriptionId, ChangeBatch<NodeId>)> {
        std::mem::take(&mut self.pending).into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selector(s: &str) -> Selector {
        Selector::parse(s).unwrap()
    }

    fn marker(label: &str) -> ElementSpec {
        ElementSpec::new("div")
            .with_class("marker")
            .with_child(ElementSpec::new("div").with_class("title-tag").with_text(label))
    }

    #[test]
    fn test_query_in_document_order() {
        let mut tree = MemoryTree::new();
        let body = tree.body().unwrap();
        let a = tree.append_element(&body, &marker("a")).unwrap();
        let b = tree.append_element(&body, &marker("b")).unwrap();

        let found = tree.query_all(&selector("div.marker"));
        assert_eq!(found, vec![a, b]);

        let labels = tree.query_within(&b, &selector("div.title-tag"));
        assert_eq!(labels.len(), 1);
        assert_eq!(tree.text(&labels[0]).as_deref(), Some("b"));
    }

    #[test]
    fn test_descendant_selector_matching() {
        let mut tree = MemoryTree::new();
        let body = tree.body().unwrap();
        let panel = tree
            .append_element(
                &body,
                &ElementSpec::new("filter-layer-component").with_child(
                    ElementSpec::new("section")
                        .with_child(ElementSpec::new("div").with_class("list-item-group")),
                ),
            )
            .unwrap();
        tree.append_element(&body, &ElementSpec::new("div").with_class("list-item-group"))
            .unwrap();

        let scoped = selector("filter-layer-component div.list-item-group");
        assert_eq!(tree.query_all(&scoped).len(), 1);
        assert_eq!(tree.query_within(&panel, &scoped).len(), 1);
        assert_eq!(tree.query_all(&selector("div.list-item-group")).len(), 2);
    }

    #[test]
    fn test_matches_checks_the_node_itself() {
        let mut tree = MemoryTree::new();
        let body = tree.body().unwrap();
        let panel = tree
            .append_element(
                &body,
                &ElementSpec::new("filter-layer-component")
                    .with_child(ElementSpec::new("div").with_class("list-item-group")),
            )
            .unwrap();
        let area = tree.children(&panel)[0];

        assert!(tree.matches(&panel, &selector("filter-layer-component")));
        assert!(!tree.matches(&body, &selector("filter-layer-component")));
        assert!(tree.matches(&area, &selector("filter-layer-component div.list-item-group")));
        assert!(!tree.matches(&panel, &selector("filter-layer-component div.list-item-group")));
    }

    #[test]
    fn test_text_includes_descendants() {
        let mut tree = MemoryTree::new();
        let body = tree.body().unwrap();
        let node = tree
            .append_element(
                &body,
                &ElementSpec::new("div")
                    .with_text("25, ")
                    .with_child(ElementSpec::new("span").with_text("fit")),
            )
            .unwrap();
        assert_eq!(tree.text(&node).as_deref(), Some("25, fit"));
    }

    #[test]
    fn test_subscription_sees_only_direct_children() {
        let mut tree = MemoryTree::new();
        let body = tree.body().unwrap();
        let container = tree.append_element(&body, &ElementSpec::new("div")).unwrap();
        let sub = tree.subscribe(&container).unwrap();

        let child = tree.append_element(&container, &marker("x")).unwrap();
        let label = tree.query_first_within(&child, &selector("div.title-tag")).unwrap();
        tree.append_element(&label, &ElementSpec::new("span")).unwrap();
        tree.remove(&child).unwrap();

        let batches = tree.take_batches();
        assert_eq!(batches.len(), 1);
        let (id, batch) = &batches[0];
        assert_eq!(*id, sub);
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.changes[0].added, vec![child]);
        assert_eq!(batch.changes[1].removed, vec![child]);

        assert!(tree.take_batches().is_empty());
    }

    #[test]
    fn test_unsubscribe_drops_pending_batches() {
        let mut tree = MemoryTree::new();
        let body = tree.body().unwrap();
        let sub = tree.subscribe(&body).unwrap();
        tree.append_element(&body, &ElementSpec::new("div")).unwrap();

        tree.unsubscribe(sub).unwrap();
        assert!(tree.take_batches().is_empty());
        assert_eq!(tree.subscription_count(), 0);
        assert!(matches!(
            tree.unsubscribe(sub),
            Err(TreeError::SubscriptionNotFound(_))
        ));
    }

    #[test]
    fn test_remove_drops_subtree() {
        let mut tree = MemoryTree::new();
        let body = tree.body().unwrap();
        let node = tree.append_element(&body, &marker("gone")).unwrap();
        let label = tree.query_first(&selector("div.title-tag")).unwrap();
        assert_eq!(tree.len(), 3);

        tree.remove(&node).unwrap();
        assert!(!tree.is_attached(&node));
        assert!(!tree.is_attached(&label));
        assert!(tree.is_empty());
        assert!(tree.set_style(&node, "display", "none").is_err());
        assert!(tree.remove(&body).is_err());
    }

    #[test]
    fn test_find_by_id_and_styles() {
        let mut tree = MemoryTree::new();
        let body = tree.body().unwrap();
        let node = tree
            .append_element(
                &body,
                &ElementSpec::new("div")
                    .with_id("panel")
                    .with_style("position", "absolute"),
            )
            .unwrap();

        assert_eq!(tree.find_by_id("panel"), Some(node));
        assert_eq!(tree.find_by_id("missing"), None);
        assert_eq!(tree.style(&node, "position").as_deref(), Some("absolute"));

        tree.set_style(&node, "display", "none").unwrap();
        assert_eq!(tree.style(&node, "display").as_deref(), Some("none"));
    }

    #[test]
    fn test_set_text_replaces_children() {
        let mut tree = MemoryTree::new();
        let body = tree.body().unwrap();
        let node = tree.append_element(&body, &marker("old")).unwrap();
        tree.set_text(&node, "new").unwrap();
        assert_eq!(tree.text(&node).as_deref(), Some("new"));
        assert!(tree.children(&node).is_empty());
    }
}
