use std::collections::BTreeMap;

use crate::models::AggregateReport;

/// Layers `overlay` on top of `base`.
///
/// The total is taken from the overlay when it carries one. Each count map is
/// a key-wise union where the overlay's count replaces the base count for a
/// shared key; counts are never added together.
pub fn merge(base: AggregateReport, overlay: AggregateReport) -> AggregateReport {
    AggregateReport {
        total_complaints: overlay.total_complaints.or(base.total_complaints),
        by_channel: merge_counts(base.by_channel, overlay.by_channel),
        by_nature: merge_counts(base.by_nature, overlay.by_nature),
        by_severity_bucket: merge_counts(base.by_severity_bucket, overlay.by_severity_bucket),
    }
}

fn merge_counts(
    mut base: BTreeMap<String, i64>,
    overlay: BTreeMap<String, i64>,
) -> BTreeMap<String, i64> {
    base.extend(overlay);
    base
}
