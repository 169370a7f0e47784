//! Live Tree - The rendered element tree the overlay reads from and writes to
//!
//! This crate abstracts the host application's live visual tree behind the
//! [`LiveTree`] trait so the filtering pipeline never touches a concrete DOM:
//!
//! - **Selectors**: compound, descendant-only CSS subset (`div.a.b`, `#id`, `a b`)
//! - **Elements**: [`ElementSpec`] descriptions for injected subtrees
//! - **Subscriptions**: child-list observation delivered as queued [`ChangeBatch`]es
//! - **MemoryTree**: an in-memory tree for tests and headless hosts
//!
//! # Example
//!
//! ```rust
//! use live_tree::{ElementSpec, LiveTree, MemoryTree, Selector};
//!
//! let mut tree = MemoryTree::new();
//! let body = tree.body().unwrap();
//! let container = tree
//!     .append_element(&body, &ElementSpec::new("div").with_class("pins"))
//!     .unwrap();
//!
//! let subscription = tree.subscribe(&container).unwrap();
//! tree.append_element(&container, &ElementSpec::new("div").with_class("pin"))
//!     .unwrap();
//!
//! let batches = tree.take_batches();
//! assert_eq!(batches.len(), 1);
//! assert_eq!(batches[0].0, subscription);
//!
//! let pins = tree.query_all(&Selector::parse("div.pin").unwrap());
//! assert_eq!(pins.len(), 1);
//! ```

mod error;
mod memory;
mod node_id;
mod selector;
mod subscription;
mod tree;

pub use error::*;
pub use memory::*;
pub use node_id::*;
pub use selector::*;
pub use subscription::*;
pub use tree::*;
