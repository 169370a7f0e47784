//! Page-wide session state
//!
//! The browser gives us no owner to hang state on, so the one session lives
//! in a thread local. Every entry point (exports, panel listeners, observer
//! notifications) borrows it for the duration of one synchronous call.

use crate::dom::DomTree;
use crate::listeners::{Listener, ListenerSet};
use live_tree::{LiveTree, TreeError};
use overlay::{
    controls, ControlKind, Lifecycle, Overlay, OverlayConfig, PanelAction, PanelEvent, Result,
};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys::HtmlInputElement;

/// The live document, the tool's lifecycle on it and the panel listeners of
/// the active instance
pub struct Session {
    tree: DomTree,
    lifecycle: Lifecycle<DomTree>,
    listeners: ListenerSet<Listener>,
}

thread_local! {
    static SESSION: RefCell<Option<Session>> = const { RefCell::new(None) };
}

impl Session {
    fn new() -> Result<Self> {
        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or(TreeError::NoBody)?;
        let notify: Rc<dyn Fn()> = Rc::new(dispatch_pending);
        Ok(Self {
            tree: DomTree::new(document, notify),
            lifecycle: Lifecycle::default(),
            listeners: ListenerSet::new(),
        })
    }

    /// Blank the input elements after a reset
    fn clear_inputs(&self) {
        let Some(overlay) = self.lifecycle.overlay() else {
            return;
        };
        for control in controls(overlay.ids()) {
            if !matches!(control.kind, ControlKind::Input(_)) {
                continue;
            }
            if let Some(input) = self
                .tree
                .find_by_id(&control.id)
                .and_then(|element| element.dyn_into::<HtmlInputElement>().ok())
            {
                input.set_value("");
            }
        }
    }
}

/// Attach listeners to every panel control of a fresh overlay
fn wire_panel(tree: &DomTree, overlay: &Overlay<DomTree>) -> Result<Vec<Listener>> {
    let mut listeners = Vec::new();
    for control in controls(overlay.ids()) {
        let Some(element) = tree.find_by_id(&control.id) else {
            tracing::warn!(id = %control.id, "panel control missing");
            continue;
        };
        let listener = match control.kind {
            ControlKind::Input(field) => Listener::attach(&element, "input", move |event| {
                let raw = event
                    .target()
                    .and_then(|target| target.dyn_into::<HtmlInputElement>().ok())
                    .map(|input| input.value())
                    .unwrap_or_default();
                handle_event(PanelEvent::Input { field, raw });
            })?,
            ControlKind::Action(action) => Listener::attach(&element, "click", move |_| {
                handle_event(PanelEvent::Action(action));
            })?,
        };
        listeners.push(listener);
    }
    Ok(listeners)
}

fn with_session<R>(f: impl FnOnce(&mut Session) -> R) -> Option<R> {
    SESSION.with(|cell| match cell.try_borrow_mut() {
        Ok(mut slot) => slot.as_mut().map(f),
        Err(_) => {
            tracing::trace!("session busy");
            None
        }
    })
}

/// Start the overlay, restarting it when already active
pub fn activate(config: OverlayConfig) -> Result<()> {
    SESSION.with(|cell| -> Result<()> {
        let mut slot = cell
            .try_borrow_mut()
            .map_err(|_| TreeError::host("activation re-entered"))?;
        if slot.is_none() {
            *slot = Some(Session::new()?);
        }
        let Some(session) = slot.as_mut() else {
            return Ok(());
        };
        session.listeners.release();
        session.lifecycle.set_config(config);
        let listeners = session.lifecycle.activate_with(&mut session.tree, wire_panel)?;
        tracing::debug!(listeners = listeners.len(), "panel wired");
        session.listeners.replace(listeners);
        Ok(())
    })
}

/// Tear the overlay down. No-op while inactive.
pub fn deactivate() {
    with_session(|session| {
        session.lifecycle.teardown(&mut session.tree);
        session.listeners.release();
    });
}

pub fn is_active() -> bool {
    with_session(|session| session.lifecycle.is_active()).unwrap_or(false)
}

fn handle_event(event: PanelEvent) {
    with_session(|session| {
        let reset = event == PanelEvent::Action(PanelAction::Reset);
        let state = session.lifecycle.handle_event(&mut session.tree, event);
        session.listeners.sync(state);
        if reset {
            session.clear_inputs();
        }
    });
}

/// Deliver queued change batches. When the session is busy they stay queued
/// for the next notification.
fn dispatch_pending() {
    with_session(|session| session.lifecycle.dispatch(&mut session.tree));
}
