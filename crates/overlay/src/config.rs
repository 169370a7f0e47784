//! Overlay configuration
//!
//! Every field has a default matching the host application's current markup,
//! so an empty JSON object is a valid configuration.

use crate::{OverlayError, Result};
use filter_engine::{MarkerRegistry, VisibilityStyle};
use live_tree::Selector;
use serde::{Deserialize, Serialize};

/// Top-level overlay configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// Locators for markers and host regions
    pub selectors: SelectorConfig,
    /// Prefix of every injected element id
    pub namespace: String,
    /// Display values used for markers
    pub visibility: VisibilityStyle,
    /// Tooltip shown on the guard over the native filter panel
    pub guard_tooltip: String,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            selectors: SelectorConfig::default(),
            namespace: "sniff_extra_tooling_".to_string(),
            visibility: VisibilityStyle::default(),
            guard_tooltip: "Regular filters are disabled while using Sniff Tools to prevent errors"
                .to_string(),
        }
    }
}

impl OverlayConfig {
    /// Parse and validate a JSON configuration
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check values the type system cannot
    pub fn validate(&self) -> Result<()> {
        if self.namespace.is_empty() {
            return Err(OverlayError::InvalidConfig("namespace must not be empty".into()));
        }
        if !self
            .namespace
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(OverlayError::InvalidConfig(format!(
                "namespace {:?} is not a valid id prefix",
                self.namespace
            )));
        }
        if self.visibility.visible == self.visibility.hidden {
            return Err(OverlayError::InvalidConfig(
                "visible and hidden display values must differ".into(),
            ));
        }
        Ok(())
    }

    /// Ids of the injected elements
    pub fn ids(&self) -> ElementIds {
        ElementIds::new(&self.namespace)
    }

    /// Registry reading markers with the configured selectors
    pub fn registry(&self) -> MarkerRegistry {
        MarkerRegistry::new(self.selectors.marker.clone(), self.selectors.label.clone())
    }
}

/// Locators into the host application's markup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Map pin elements
    pub marker: Selector,
    /// Label element inside a pin
    pub label: Selector,
    /// Container whose children are the pins
    pub marker_container: Selector,
    /// Element whose parent is the host's menu region
    pub menu_anchor: Selector,
    /// The host's native filter panel
    pub native_filter_panel: Selector,
    /// Interactive area inside the native filter panel that the guard covers
    pub native_filter_area: Selector,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            marker: Selector::element("div")
                .with_class("mapboxgl-marker")
                .with_class("mapboxgl-marker-anchor-center"),
            label: Selector::element("div").with_class("title-tag"),
            marker_container: Selector::any().with_class("mapboxgl-canvas-container"),
            menu_anchor: Selector::element("router-outlet"),
            native_filter_panel: Selector::element("filter-layer-component"),
            native_filter_area: Selector::element("div").with_class("list-item-group"),
        }
    }
}

/// Ids of every element the overlay injects
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementIds {
    pub panel: String,
    pub header: String,
    pub toggle: String,
    pub close: String,
    pub stats: String,
    pub filter_wrapper: String,
    pub min_age: String,
    pub max_age: String,
    pub min_size: String,
    pub max_size: String,
    pub filter_button: String,
    pub reset_button: String,
    pub guard: String,
}

impl ElementIds {
    pub fn new(namespace: &str) -> Self {
        let id = |name: &str| format!("{namespace}{name}");
        let panel = id("outer_div");
        Self {
            header: format!("{panel}_header"),
            panel,
            toggle: id("toggle_filters"),
            close: id("close"),
            stats: id("stats"),
            filter_wrapper: id("filter_wrapper"),
            min_age: id("min_age_input"),
            max_age: id("max_age_input"),
            min_size: id("min_size_input"),
            max_size: id("max_size_input"),
            filter_button: id("filter_button"),
            reset_button: id("reset_button"),
            guard: id("menu_overlay"),
        }
    }
}
