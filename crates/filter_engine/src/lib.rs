//! Filter Engine - From live markers to a visible/hidden partition
//!
//! A filter pass has three stages:
//!
//! 1. [`MarkerRegistry`] reads the live tree and builds one [`Profile`] per
//!    unambiguous marker
//! 2. [`filter`] partitions the profiles by sequential threshold elimination
//! 3. [`apply_partition`] writes the partition back as display styles
//!
//! [`run_pass`] chains all three and reports [`FilterStats`].
//!
//! [`Profile`]: profile_model::Profile

mod engine;
mod pass;
mod registry;
mod visibility;

pub use engine::*;
pub use pass::*;
pub use registry::*;
pub use visibility::*;
