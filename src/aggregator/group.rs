use crate::aggregator::types::{DateGroups, Reading};
use tracing::info;

/// Number of progress updates emitted while grouping.
const PROGRESS_STEPS: usize = 10;

/// Percentage complete after `done` of `total` readings, or `None` between
/// reporting steps. Reports roughly every tenth of the input and always at the end.
pub fn progress_percent(done: usize, total: usize) -> Option<f64> {
    let step = (total / PROGRESS_STEPS).max(1);
    if done == 0 || done > total || (done % step != 0 && done != total) {
        return None;
    }
    Some((done as f64 / total as f64 * 10000.0).round() / 100.0)
}

/// Buckets readings by calendar date, keeping dates in first-encounter order.
#[tracing::instrument(skip(records), fields(records = records.len()))]
pub fn group_by_date(records: Vec<Reading>) -> DateGroups {
    let total = records.len();
    let mut groups = DateGroups::new();

    for (i, reading) in records.into_iter().enumerate() {
        groups.insert(reading);

        if let Some(percent) = progress_percent(i + 1, total) {
            info!(done = i + 1, total, percent, "Segregating data");
        }
    }

    info!(dates = groups.len(), "Data segregated");
    groups
}
