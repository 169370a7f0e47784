//! Overlay - Reactive marker filtering on top of a host map
//!
//! This crate wires the filtering pipeline into a running page:
//!
//! - **Config**: selectors, id namespace and display values ([`OverlayConfig`])
//! - **Panel**: the injected control panel and its UI state
//! - **Guard**: a click-swallowing cover over the host's own filter panel
//! - **Controller**: one [`Overlay`] instance reacting to panel events and to
//!   change batches drained from the tree
//! - **Lifecycle**: [`Lifecycle`] keeps at most one instance alive per tree
//!
//! # Example
//!
//! ```rust
//! use live_tree::{ElementSpec, LiveTree, MemoryTree};
//! use overlay::{Lifecycle, OverlayConfig, PanelAction, PanelEvent};
//! use profile_model::ThresholdField;
//!
//! let mut tree = MemoryTree::new();
//! let body = tree.body().unwrap();
//! let pins = tree
//!     .append_element(&body, &ElementSpec::new("div").with_class("mapboxgl-canvas-container"))
//!     .unwrap();
//! tree.append_element(
//!     &pins,
//!     &ElementSpec::new("div")
//!         .with_class("mapboxgl-marker")
//!         .with_class("mapboxgl-marker-anchor-center")
//!         .with_child(ElementSpec::new("div").with_class("title-tag").with_text("45, fit")),
//! )
//! .unwrap();
//!
//! let mut lifecycle = Lifecycle::new(OverlayConfig::default());
//! lifecycle.activate(&mut tree).unwrap();
//! lifecycle.handle_event(
//!     &mut tree,
//!     PanelEvent::Input { field: ThresholdField::AgeMax, raw: "40".into() },
//! );
//! lifecycle.handle_event(&mut tree, PanelEvent::Action(PanelAction::Filter));
//!
//! let stats = lifecycle.overlay().unwrap().stats();
//! assert_eq!(stats.to_string(), "Profiles Shown: 0, Profiles Hidden: 1");
//! ```

mod config;
mod controller;
mod error;
mod guard;
mod lifecycle;
mod panel;

pub use config::*;
pub use controller::*;
pub use error::*;
pub use guard::*;
pub use lifecycle::*;
pub use panel::*;
