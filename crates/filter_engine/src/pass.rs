//! One complete filter pass

use crate::{apply_partition, filter, FilterStats, MarkerRegistry, VisibilityStyle};
use live_tree::LiveTree;
use profile_model::FilterCriteria;

/// Read the current markers, partition them and apply the result.
///
/// Profiles exist only for the duration of this call.
pub fn run_pass<T: LiveTree>(
    tree: &mut T,
    registry: &MarkerRegistry,
    criteria: &FilterCriteria,
    style: &VisibilityStyle,
) -> FilterStats {
    let profiles = registry.profiles(tree);
    let partition = filter(profiles, criteria);
    let failures = apply_partition(tree, &partition, style);
    let stats = partition.stats();

    tracing::debug!(
        shown = stats.shown,
        hidden = stats.hidden,
        failures,
        active = !criteria.is_empty(),
        "filter pass applied"
    );
    stats
}
