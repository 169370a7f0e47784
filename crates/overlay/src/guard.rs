//! Guard over the host's native filter panel
//!
//! While the overlay is active the native filters would fight with ours, so
//! whenever the host renders its filter panel a click-swallowing cover is laid
//! over the panel's interactive area. At most one guard exists at a time.

use crate::{ElementIds, SelectorConfig};
use live_tree::{ChangeBatch, ElementSpec, LiveTree, Result};

/// Markup of the guard
pub fn guard_spec(ids: &ElementIds, tooltip: &str) -> ElementSpec {
    let strike = ElementSpec::new("div")
        .with_style("border-bottom", "3px solid rgb(255, 0, 0)")
        .with_style("width", "100%")
        .with_style("transform", "rotate(10deg)")
        .with_style("transform-origin", "left")
        .with_style("position", "relative");

    ElementSpec::new("div")
        .with_id(&ids.guard)
        .with_title(tooltip)
        .with_style("width", "100%")
        .with_style("height", "100%")
        .with_style("cursor", "not-allowed")
        .with_style("position", "absolute")
        .with_style("top", "0")
        .with_style("left", "0")
        .with_style("background", "rgba(0, 0, 0, 0.5)")
        .intercepting_clicks()
        .with_child(strike)
}

/// Find the native filter area inside any node the batch added.
///
/// The added node may be the native panel itself or contain it.
pub fn find_native_filter_area<T: LiveTree>(
    tree: &T,
    batch: &ChangeBatch<T::Node>,
    selectors: &SelectorConfig,
) -> Option<T::Node> {
    batch
        .added()
        .filter(|node| tree.is_attached(node))
        .find_map(|added| {
            let panel = if tree.matches(added, &selectors.native_filter_panel) {
                added.clone()
            } else {
                tree.query_first_within(added, &selectors.native_filter_panel)?
            };
            tree.query_first_within(&panel, &selectors.native_filter_area)
        })
}

/// Cover `area` with the guard unless one is already present.
///
/// Returns the new guard node, or `None` when a guard already exists.
pub fn inject_guard<T: LiveTree>(
    tree: &mut T,
    area: &T::Node,
    ids: &ElementIds,
    tooltip: &str,
) -> Result<Option<T::Node>> {
    if tree.find_by_id(&ids.guard).is_some() {
        return Ok(None);
    }
    let guard = tree.append_element(area, &guard_spec(ids, tooltip))?;
    tracing::debug!(?guard, "native filter guard injected");
    Ok(Some(guard))
}
