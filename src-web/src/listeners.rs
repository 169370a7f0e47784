//! Event listeners owned by the session
//!
//! A [`Listener`] keeps its closure alive exactly as long as it is registered
//! and detaches it when dropped. [`ListenerSet`] holds the listeners of one
//! overlay instance so they are released together with it.

use crate::dom::js_error;
use live_tree::Result;
use overlay::LifecycleState;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, Event};

type EventCallback = Closure<dyn FnMut(Event)>;

/// A callback registered on one element for one event type
pub struct Listener {
    target: Element,
    event: &'static str,
    callback: EventCallback,
}

impl Listener {
    pub fn attach(
        target: &Element,
        event: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<Self> {
        let callback: EventCallback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        target
            .add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
            .map_err(js_error)?;
        Ok(Self {
            target: target.clone(),
            event,
            callback,
        })
    }

    /// Whether the element is still part of the document
    pub fn is_connected(&self) -> bool {
        self.target.is_connected()
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let detached = self
            .target
            .remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref());
        if let Err(err) = detached {
            tracing::debug!(event = self.event, error = %js_error(err), "listener already gone");
        }
    }
}

impl std::fmt::Debug for Listener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listener")
            .field("event", &self.event)
            .finish()
    }
}

/// Listeners held on behalf of the active overlay
#[derive(Debug)]
pub struct ListenerSet<L> {
    held: Vec<L>,
}

impl<L> ListenerSet<L> {
    pub fn new() -> Self {
        Self { held: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.held.len()
    }

    pub fn is_empty(&self) -> bool {
        self.held.is_empty()
    }

    pub fn hold(&mut self, listener: L) {
        self.held.push(listener);
    }

    /// Release the current listeners and hold `listeners` instead.
    /// Returns how many were released.
    pub fn replace(&mut self, listeners: Vec<L>) -> usize {
        let released = self.release();
        self.held = listeners;
        released
    }

    /// Drop every held listener, returning how many there were
    pub fn release(&mut self) -> usize {
        let released = self.held.len();
        self.held.clear();
        released
    }

    /// Drop the listeners for which `keep` is false
    pub fn retain(&mut self, keep: impl FnMut(&L) -> bool) -> usize {
        let before = self.held.len();
        self.held.retain(keep);
        before - self.held.len()
    }

    /// Follow the overlay's lifecycle: once it is inactive nothing is kept
    pub fn sync(&mut self, state: LifecycleState) -> usize {
        match state {
            LifecycleState::Active => 0,
            LifecycleState::Inactive => self.release(),
        }
    }
}

impl<L> Default for ListenerSet<L> {
    fn default() -> Self {
        Self::new()
    }
}
