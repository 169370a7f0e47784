//! `LiveTree` over the browser DOM

use crate::listeners::{Listener, ListenerSet};
use live_tree::{
    ChangeBatch, ChildListChange, ElementSpec, LiveTree, Result, Selector, SubscriptionId,
    TreeError,
};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, HtmlElement, MutationObserver, MutationObserverInit, MutationRecord,
    NodeList,
};

type Pending = Rc<RefCell<BTreeMap<SubscriptionId, ChangeBatch<Element>>>>;
type ObserverCallback = Closure<dyn FnMut(js_sys::Array, MutationObserver)>;

struct Observer {
    observer: MutationObserver,
    // Must outlive the observer registration
    _callback: ObserverCallback,
}

/// The page's document, observed through `MutationObserver`s.
///
/// Observer callbacks only queue records and then call `notify`; the host
/// drains the queue with [`LiveTree::take_batches`].
pub struct DomTree {
    document: Document,
    observers: BTreeMap<SubscriptionId, Observer>,
    interceptors: ListenerSet<Listener>,
    pending: Pending,
    notify: Rc<dyn Fn()>,
    next_subscription: u64,
}

impl DomTree {
    pub fn new(document: Document, notify: Rc<dyn Fn()>) -> Self {
        Self {
            document,
            observers: BTreeMap::new(),
            interceptors: ListenerSet::new(),
            pending: Rc::new(RefCell::new(BTreeMap::new())),
            notify,
            next_subscription: 1,
        }
    }

    fn build(&mut self, spec: &ElementSpec) -> Result<Element> {
        let element = self.document.create_element(&spec.tag).map_err(js_error)?;
        if let Some(id) = &spec.id {
            element.set_id(id);
        }
        if !spec.classes.is_empty() {
            element.set_class_name(&spec.classes.join(" "));
        }
        if let Some(title) = &spec.title {
            element.set_attribute("title", title).map_err(js_error)?;
        }
        for (name, value) in &spec.attributes {
            element.set_attribute(name, value).map_err(js_error)?;
        }
        for (property, value) in &spec.styles {
            set_style(&element, property, value)?;
        }
        if let Some(text) = &spec.text {
            element.set_text_content(Some(text));
        }
        if spec.intercept_clicks {
            let swallow = Listener::attach(&element, "click", |event| event.prevent_default())?;
            self.interceptors.hold(swallow);
        }
        for child in &spec.children {
            let child = self.build(child)?;
            element.append_child(&child).map_err(js_error)?;
        }
        Ok(element)
    }
}

impl std::fmt::Debug for DomTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DomTree")
            .field("observers", &self.observers.len())
            .field("interceptors", &self.interceptors.len())
            .finish()
    }
}

pub(crate) fn js_error(err: JsValue) -> TreeError {
    TreeError::host(
        err.as_string()
            .or_else(|| err.dyn_ref::<js_sys::Error>().map(|e| String::from(e.message())))
            .unwrap_or_else(|| format!("{err:?}")),
    )
}

fn html(node: &Element) -> Result<&HtmlElement> {
    node.dyn_ref::<HtmlElement>()
        .ok_or_else(|| TreeError::host(format!("<{}> has no inline style", node.tag_name())))
}

fn set_style(node: &Element, property: &str, value: &str) -> Result<()> {
    html(node)?
        .style()
        .set_property(property, value)
        .map_err(js_error)
}

/// Element nodes of a list; text and comment nodes are skipped
fn elements(list: &NodeList) -> Vec<Element> {
    (0..list.length())
        .filter_map(|index| list.get(index))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

fn child_list_changes(records: &js_sys::Array) -> Vec<ChildListChange<Element>> {
    records
        .iter()
        .filter_map(|record| record.dyn_into::<MutationRecord>().ok())
        .filter(|record| record.type_() == "childList")
        .filter_map(|record| {
            let target = record.target()?.dyn_into::<Element>().ok()?;
            Some(ChildListChange {
                target,
                added: elements(&record.added_nodes()),
                removed: elements(&record.removed_nodes()),
            })
        })
        .collect()
}

impl LiveTree for DomTree {
    type Node = Element;

    fn body(&self) -> Option<Element> {
        self.document.body().map(Element::from)
    }

    fn query_all(&self, selector: &Selector) -> Vec<Element> {
        match self.document.query_selector_all(selector.as_css()) {
            Ok(list) => elements(&list),
            Err(err) => {
                tracing::warn!(%selector, error = %js_error(err), "query failed");
                Vec::new()
            }
        }
    }

    fn query_within(&self, scope: &Element, selector: &Selector) -> Vec<Element> {
        match scope.query_selector_all(selector.as_css()) {
            Ok(list) => elements(&list),
            Err(err) => {
                tracing::warn!(%selector, error = %js_error(err), "scoped query failed");
                Vec::new()
            }
        }
    }

    fn matches(&self, node: &Element, selector: &Selector) -> bool {
        node.matches(selector.as_css()).unwrap_or_else(|err| {
            tracing::warn!(%selector, error = %js_error(err), "match failed");
            false
        })
    }

    fn find_by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn parent(&self, node: &Element) -> Option<Element> {
        node.parent_element()
    }

    fn is_attached(&self, node: &Element) -> bool {
        node.is_connected()
    }

    fn text(&self, node: &Element) -> Option<String> {
        node.text_content()
    }

    fn style(&self, node: &Element, property: &str) -> Option<String> {
        html(node)
            .ok()?
            .style()
            .get_property_value(property)
            .ok()
            .filter(|value| !value.is_empty())
    }

    fn set_style(&mut self, node: &Element, property: &str, value: &str) -> Result<()> {
        set_style(node, property, value)
    }

    fn set_text(&mut self, node: &Element, text: &str) -> Result<()> {
        node.set_text_content(Some(text));
        Ok(())
    }

    fn append_element(&mut self, parent: &Element, spec: &ElementSpec) -> Result<Element> {
        let element = self.build(spec)?;
        parent.append_child(&element).map_err(js_error)?;
        Ok(element)
    }

    fn remove(&mut self, node: &Element) -> Result<()> {
        node.remove();
        let released = self.interceptors.retain(Listener::is_connected);
        if released > 0 {
            tracing::trace!(released, "click interceptors released");
        }
        Ok(())
    }

    fn subscribe(&mut self, target: &Element) -> Result<SubscriptionId> {
        let id = SubscriptionId::new(self.next_subscription);
        self.next_subscription += 1;

        let pending = Rc::clone(&self.pending);
        let notify = Rc::clone(&self.notify);
        let callback: ObserverCallback = Closure::wrap(Box::new(
            move |records: js_sys::Array, _observer: MutationObserver| {
                let changes = child_list_changes(&records);
                if changes.is_empty() {
                    return;
                }
                pending
                    .borrow_mut()
                    .entry(id)
                    .or_default()
                    .changes
                    .extend(changes);
                notify();
            },
        )
            as Box<dyn FnMut(js_sys::Array, MutationObserver)>);

        let observer = MutationObserver::new(callback.as_ref().unchecked_ref()).map_err(js_error)?;
        let init = MutationObserverInit::new();
        init.set_child_list(true);
        observer
            .observe_with_options(target, &init)
            .map_err(js_error)?;

        self.observers.insert(
            id,
            Observer {
                observer,
                _callback: callback,
            },
        );
        Ok(id)
    }

    fn unsubscribe(&mut self, id: SubscriptionId) -> Result<()> {
        self.pending.borrow_mut().remove(&id);
        let observer = self
            .observers
            .remove(&id)
            .ok_or(TreeError::SubscriptionNotFound(id))?;
        observer.observer.disconnect();
        Ok(())
    }

    fn take_batches(&mut self) -> Vec<(SubscriptionId, ChangeBatch<Element>)> {
        std::mem::take(&mut *self.pending.borrow_mut())
            .into_iter()
            .collect()
    }
}
