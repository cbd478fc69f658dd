use crate::aggregator::types::{DateGroup, DateGroups, Reading, SummaryRow};
use crate::aggregator::utility::{mean, round2};
use crate::error::{AggregateError, AggregateResult};
use chrono::NaiveDateTime;
use tracing::debug;

/// Format of `date + ' ' + time` as written by the logger.
pub const TIMESTAMP_FORMAT: &str = "%m/%d/%Y %H:%M:%S";

/// Parses a reading's date and time into an absolute instant.
pub fn parse_instant(reading: &Reading) -> AggregateResult<NaiveDateTime> {
    let text = reading.timestamp_text();
    NaiveDateTime::parse_from_str(&text, TIMESTAMP_FORMAT)
        .map_err(|source| AggregateError::InvalidTimestamp {
            location: reading.source.clone(),
            value: text,
            source,
        })
}

/// Sorts a group's readings chronologically. Ties keep their original order.
pub fn sort_chronologically(group: &mut DateGroup) -> AggregateResult<()> {
    let mut keyed = group
        .readings
        .drain(..)
        .map(|r| parse_instant(&r).map(|instant| (instant, r)))
        .collect::<AggregateResult<Vec<_>>>()?;

    keyed.sort_by_key(|(instant, _)| *instant);
    group.readings = keyed.into_iter().map(|(_, r)| r).collect();
    Ok(())
}

/// Averages one group, rounding both means to two decimals.
pub fn summarize(group: &DateGroup) -> SummaryRow {
    let temperatures: Vec<f64> = group.readings.iter().map(|r| r.temperature).collect();
    let humidities: Vec<f64> = group.readings.iter().map(|r| r.humidity).collect();

    SummaryRow {
        date: group.date.clone(),
        avg_temperature: round2(mean(&temperatures)),
        avg_humidity: round2(mean(&humidities)),
    }
}

/// Produces one summary row per date, in the order the dates were first seen.
///
/// # Errors
///
/// Returns [`AggregateError::InvalidTimestamp`] if any reading's date and time
/// do not match [`TIMESTAMP_FORMAT`].
#[tracing::instrument(skip(groups), fields(dates = groups.len()))]
pub fn average_groups(groups: DateGroups) -> AggregateResult<Vec<SummaryRow>> {
    let mut rows = Vec::with_capacity(groups.len());

    for mut group in groups {
        sort_chronologically(&mut group)?;
        let row = summarize(&group);
        debug!(
            date = %row.date,
            readings = group.readings.len(),
            avg_temperature = row.avg_temperature,
            avg_humidity = row.avg_humidity,
            "Date averaged"
        );
        rows.push(row);
    }

    Ok(rows)
}
