//! One active overlay instance
//!
//! [`Overlay`] owns everything the tool injects or establishes: the panel,
//! the guard, the UI state, the recorded criteria and both change
//! subscriptions. It reacts to panel events and to change batches drained
//! from the tree, and [`Overlay::teardown`] releases all of it.

use crate::panel::{panel_spec, toggle_label, PanelAction, PanelEvent, UiState};
use crate::{find_native_filter_area, inject_guard, ElementIds, OverlayConfig, Result};
use filter_engine::{run_pass, FilterStats, MarkerRegistry, DISPLAY};
use live_tree::{ChangeBatch, LiveTree, Subscription, SubscriptionId, TreeError};
use profile_model::FilterCriteria;

/// What a subscription watches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionRole {
    /// Children of the marker container
    Markers,
    /// Children of the host's menu region
    HostMenu,
}

/// What the host should do after an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    /// The user asked to close the overlay
    Close,
}

/// An initialized overlay bound to one live tree
#[derive(Debug)]
pub struct Overlay<T: LiveTree> {
    config: OverlayConfig,
    ids: ElementIds,
    registry: MarkerRegistry,
    ui: UiState,
    recorded: Option<FilterCriteria>,
    panel: T::Node,
    guard: Option<T::Node>,
    subscriptions: Vec<(SubscriptionRole, Subscription)>,
}

impl<T: LiveTree> Overlay<T> {
    /// Inject the panel, subscribe to marker and menu changes and run the
    /// baseline pass that makes every marker visible.
    ///
    /// Only a missing document body is fatal. Missing subscription targets
    /// are logged and leave that subscription unestablished.
    pub fn initialize(tree: &mut T, config: OverlayConfig) -> Result<Self> {
        let ids = config.ids();
        let registry = config.registry();
        let body = tree.body().ok_or(TreeError::NoBody)?;
        let panel = tree.append_element(&body, &panel_spec(&ids))?;

        let mut overlay = Self {
            config,
            ids,
            registry,
            ui: UiState::new(),
            recorded: None,
            panel,
            guard: None,
            subscriptions: Vec::with_capacity(2),
        };

        let markers = tree.query_first(&overlay.config.selectors.marker_container);
        overlay.establish(tree, SubscriptionRole::Markers, markers);
        let menu = tree
            .query_first(&overlay.config.selectors.menu_anchor)
            .and_then(|anchor| tree.parent(&anchor));
        overlay.establish(tree, SubscriptionRole::HostMenu, menu);

        overlay.pass(tree, &FilterCriteria::none());
        tracing::info!(
            subscriptions = overlay.subscriptions.len(),
            shown = overlay.ui.stats().shown,
            "overlay initialized"
        );
        Ok(overlay)
    }

    fn establish(&mut self, tree: &mut T, role: SubscriptionRole, target: Option<T::Node>) {
        let Some(target) = target else {
            tracing::warn!(?role, "subscription target not found, not observing");
            return;
        };
        match Subscription::establish(tree, &target) {
            Ok(subscription) => self.subscriptions.push((role, subscription)),
            Err(err) => tracing::warn!(?role, error = %err, "failed to subscribe"),
        }
    }

    /// Run one pass and render its stats
    fn pass(&mut self, tree: &mut T, criteria: &FilterCriteria) -> FilterStats {
        let stats = run_pass(tree, &self.registry, criteria, &self.config.visibility);
        self.ui.set_stats(stats);
        self.render_stats(tree);
        stats
    }

    fn render_stats(&self, tree: &mut T) {
        let Some(node) = tree.find_by_id(&self.ids.stats) else {
            return;
        };
        if let Err(err) = tree.set_text(&node, &self.ui.stats().to_string()) {
            tracing::warn!(error = %err, "failed to render stats");
        }
    }

    /// React to user interaction with the panel
    pub fn handle_event(&mut self, tree: &mut T, event: PanelEvent) -> Flow {
        match event {
            PanelEvent::Input { field, raw } => self.ui.set_input(field, &raw),
            PanelEvent::Action(PanelAction::Filter) => {
                self.apply_filter(tree);
            }
            PanelEvent::Action(PanelAction::Reset) => {
                self.reset_filters(tree);
            }
            PanelEvent::Action(PanelAction::ToggleFilters) => self.toggle_filters(tree),
            PanelEvent::Action(PanelAction::Close) => return Flow::Close,
        }
        Flow::Continue
    }

    /// Filter with the current inputs and remember them for later batches
    pub fn apply_filter(&mut self, tree: &mut T) -> FilterStats {
        let criteria = self.ui.criteria();
        self.recorded = Some(criteria);
        self.pass(tree, &criteria)
    }

    /// Clear inputs and recorded criteria, showing every marker
    pub fn reset_filters(&mut self, tree: &mut T) -> FilterStats {
        self.ui.clear_inputs();
        self.recorded = None;
        self.pass(tree, &FilterCriteria::none())
    }

    /// Collapse or expand the filter section
    pub fn toggle_filters(&mut self, tree: &mut T) {
        let collapsed = self.ui.toggle_filters();
        let display = if collapsed { "none" } else { "block" };
        if let Some(wrapper) = tree.find_by_id(&self.ids.filter_wrapper) {
            if let Err(err) = tree.set_style(&wrapper, DISPLAY, display) {
                tracing::warn!(error = %err, "failed to toggle filter section");
            }
        }
        if let Some(toggle) = tree.find_by_id(&self.ids.toggle) {
            if let Err(err) = tree.set_text(&toggle, toggle_label(collapsed)) {
                tracing::warn!(error = %err, "failed to relabel toggle");
            }
        }
    }

    /// Handle one drained batch. Batches for foreign subscriptions are ignored.
    ///
    /// Returns true when the batch caused a filter pass.
    pub fn on_change(&mut self, tree: &mut T, id: SubscriptionId, batch: &ChangeBatch<T::Node>) -> bool {
        match self.role_of(id) {
            Some(SubscriptionRole::Markers) => self.on_markers_changed(tree, batch),
            Some(SubscriptionRole::HostMenu) => {
                self.on_menu_changed(tree, batch);
                false
            }
            None => false,
        }
    }

    fn role_of(&self, id: SubscriptionId) -> Option<SubscriptionRole> {
        self.subscriptions
            .iter()
            .find(|(_, subscription)| subscription.id() == id)
            .map(|(role, _)| *role)
    }

    fn on_markers_changed(&mut self, tree: &mut T, batch: &ChangeBatch<T::Node>) -> bool {
        if !batch.has_child_list_changes() {
            return false;
        }
        let Some(criteria) = self.recorded else {
            return false;
        };
        tracing::trace!(records = batch.len(), "markers changed, refiltering");
        self.pass(tree, &criteria);
        true
    }

    fn on_menu_changed(&mut self, tree: &mut T, batch: &ChangeBatch<T::Node>) {
        if tree.find_by_id(&self.ids.guard).is_some() {
            return;
        }
        let Some(area) = find_native_filter_area(tree, batch, &self.config.selectors) else {
            return;
        };
        match inject_guard(tree, &area, &self.ids, &self.config.guard_tooltip) {
            Ok(Some(guard)) => self.guard = Some(guard),
            Ok(None) => {}
            Err(err) => tracing::warn!(error = %err, "failed to inject guard"),
        }
    }

    /// Drain every queued batch from the tree and handle it.
    ///
    /// Returns the number of passes the batches caused.
    pub fn dispatch(&mut self, tree: &mut T) -> usize {
        let mut passes = 0;
        for (id, batch) in tree.take_batches() {
            if self.on_change(tree, id, &batch) {
                passes += 1;
            }
        }
        passes
    }

    /// Show every marker, cancel the subscriptions and remove every
    /// injected element
    pub fn teardown(mut self, tree: &mut T) {
        let stats = run_pass(tree, &self.registry, &FilterCriteria::none(), &self.config.visibility);

        for (role, subscription) in self.subscriptions.drain(..) {
            if let Err(err) = subscription.cancel(tree) {
                tracing::warn!(?role, error = %err, "failed to cancel subscription");
            }
        }

        let guard = tree.find_by_id(&self.ids.guard).or(self.guard.take());
        for node in guard.into_iter().chain(std::iter::once(self.panel.clone())) {
            if tree.is_attached(&node) {
                if let Err(err) = tree.remove(&node) {
                    tracing::warn!(?node, error = %err, "failed to remove injected element");
                }
            }
        }

        tracing::info!(restored = stats.shown, "overlay torn down");
    }

    pub fn stats(&self) -> FilterStats {
        self.ui.stats()
    }

    pub fn ui(&self) -> &UiState {
        &self.ui
    }

    /// Criteria of the latest explicit filter action, if any
    pub fn recorded_criteria(&self) -> Option<&FilterCriteria> {
        self.recorded.as_ref()
    }

    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    pub fn ids(&self) -> &ElementIds {
        &self.ids
    }

    pub fn panel(&self) -> &T::Node {
        &self.panel
    }

    pub fn guard(&self) -> Option<&T::Node> {
        self.guard.as_ref()
    }
}
