//! Daily sensor log aggregation.
//!
//! Reads every log file in a directory, groups the readings by calendar
//! date, and averages temperature and humidity per date. All readings are
//! held in memory, which is fine for calibration-sized data sets (tens of
//! thousands of rows) but not for arbitrarily large inputs.

pub mod average;
pub mod collect;
pub mod group;
pub mod types;
pub mod utility;

pub use average::average_groups;
pub use collect::collect_records;
pub use group::group_by_date;
pub use types::{DateGroup, DateGroups, Reading, SummaryRow};

use crate::config::AggregatorConfig;
use crate::error::AggregateResult;
use crate::output::write_summary;
use tracing::info;

/// Runs the whole pipeline and writes the summary file.
///
/// The output file is only touched once every input row has been parsed and
/// every date averaged, so a failed run leaves no new output behind.
#[tracing::instrument(skip(config), fields(
    input_dir = %config.input_dir.display(),
    output = %config.output_path.display(),
))]
pub fn run(config: &AggregatorConfig) -> AggregateResult<Vec<SummaryRow>> {
    let records = collect_records(config)?;
    let groups = group_by_date(records);
    let rows = average_groups(groups)?;

    write_summary(&config.output_path, &rows)?;
    info!(rows = rows.len(), "Summary written");

    Ok(rows)
}
