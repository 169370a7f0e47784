//! Profile Model - Structured attributes recovered from free-text marker labels
//!
//! Marker labels on the host map are loose, comma-delimited text such as
//! `34, 5'10", 7", slim`. This crate turns them into typed records:
//!
//! - **Label parsing**: a data-driven table of segment classification rules
//! - **Profiles**: per-pass records holding parsed attributes and a node handle
//! - **Criteria**: optional numeric thresholds evaluated in a fixed order
//!
//! Nothing here touches a tree; everything is pure and cheap per label.

mod body_type;
mod criteria;
mod label;
mod profile;

pub use body_type::*;
pub use criteria::*;
pub use label::*;
pub use profile::*;
