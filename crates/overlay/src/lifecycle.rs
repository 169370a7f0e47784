//! Single-instance lifecycle
//!
//! [`Lifecycle`] is the only way a host should create an [`Overlay`]: it
//! guarantees at most one instance per tree. Activating while active tears
//! the old instance down first, so the tool can be launched repeatedly from a
//! bookmark or a button without stacking panels or subscriptions.

use crate::{Flow, Overlay, OverlayConfig, PanelEvent, Result};
use live_tree::LiveTree;

/// State of the overlay tool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// Nothing injected, nothing observed
    Inactive,
    /// Panel injected and subscriptions live
    Active,
}

/// Owner of the one active overlay, if any
#[derive(Debug)]
pub struct Lifecycle<T: LiveTree> {
    config: OverlayConfig,
    active: Option<Overlay<T>>,
}

impl<T: LiveTree> Lifecycle<T> {
    pub fn new(config: OverlayConfig) -> Self {
        Self {
            config,
            active: None,
        }
    }

    pub fn state(&self) -> LifecycleState {
        if self.active.is_some() {
            LifecycleState::Active
        } else {
            LifecycleState::Inactive
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Configuration used by the next activation
    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    /// Replace the configuration. Takes effect on the next activation.
    pub fn set_config(&mut self, config: OverlayConfig) {
        self.config = config;
    }

    /// Start the overlay, tearing down a running instance first
    pub fn activate(&mut self, tree: &mut T) -> Result<()> {
        self.activate_with(tree, |_, _| Ok(()))
    }

    /// Start the overlay and hand it to `wire`, which attaches whatever the
    /// host needs to the fresh instance. If wiring fails the instance is torn
    /// down again, so a failed activation leaves nothing behind.
    pub fn activate_with<W>(
        &mut self,
        tree: &mut T,
        wire: impl FnOnce(&T, &Overlay<T>) -> Result<W>,
    ) -> Result<W> {
        if let Some(running) = self.active.take() {
            tracing::info!("overlay already active, restarting");
            running.teardown(tree);
        }
        let overlay = Overlay::initialize(tree, self.config.clone())?;
        match wire(&*tree, &overlay) {
            Ok(wired) => {
                self.active = Some(overlay);
                Ok(wired)
            }
            Err(err) => {
                tracing::warn!(error = %err, "overlay wiring failed, tearing down");
                overlay.teardown(tree);
                Err(err)
            }
        }
    }

    /// Stop the overlay. No-op while inactive.
    pub fn teardown(&mut self, tree: &mut T) {
        if let Some(running) = self.active.take() {
            running.teardown(tree);
        }
    }

    pub fn overlay(&self) -> Option<&Overlay<T>> {
        self.active.as_ref()
    }

    /// Forward a panel event. A close request tears the overlay down.
    pub fn handle_event(&mut self, tree: &mut T, event: PanelEvent) -> LifecycleState {
        let flow = match self.active.as_mut() {
            Some(overlay) => overlay.handle_event(tree, event),
            None => {
                tracing::debug!(?event, "panel event while inactive, ignoring");
                return LifecycleState::Inactive;
            }
        };
        if flow == Flow::Close {
            self.teardown(tree);
        }
        self.state()
    }

    /// Drain queued change batches into the active overlay.
    ///
    /// While inactive the queue is drained and discarded.
    pub fn dispatch(&mut self, tree: &mut T) -> usize {
        match self.active.as_mut() {
            Some(overlay) => overlay.dispatch(tree),
            None => {
                tree.take_batches();
                0
            }
        }
    }
}

impl<T: LiveTree> Default for Lifecycle<T> {
    fn default() -> Self {
        Self::new(OverlayConfig::default())
    }
}
