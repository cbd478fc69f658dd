//! Clock synchronization for the device's real-time clock.
//!
//! On boot the sketch prints `REQ_TIME` and waits for the host to reply
//! with the current local time.

use super::LineReader;
use anyhow::{Context, Result, bail};
use chrono::NaiveDateTime;
use std::io::{BufRead, Write};
use std::time::Duration;
use tracing::{debug, info};

/// Line the device sends when it wants the time.
pub const TIME_REQUEST: &str = "REQ_TIME";

/// Format the sketch parses, two-digit year.
pub const DEVICE_TIME_FORMAT: &str = "%m/%d/%y %H:%M:%S";

/// How long to keep the port open after replying so the device can read it.
pub const SETTLE_DELAY: Duration = Duration::from_millis(100);

/// Blocks until the device asks for the time. Other lines are skipped.
pub fn wait_for_request<R: BufRead>(lines: &mut LineReader<R>) -> Result<()> {
    loop {
        match lines.next_line().context("failed to read from device")? {
            Some(line) if line == TIME_REQUEST => return Ok(()),
            Some(line) => debug!(line = %line, "Ignoring device output"),
            None => bail!("device closed the connection before requesting the time"),
        }
    }
}

pub fn format_device_time(now: NaiveDateTime) -> String {
    now.format(DEVICE_TIME_FORMAT).to_string()
}

/// Waits for the device's request, then writes the time returned by `now`.
///
/// The clock is read only after the request arrives. The reply carries no
/// line terminator. Returns the text that was sent.
#[tracing::instrument(skip_all)]
pub fn sync_clock<R, W, F>(lines: &mut LineReader<R>, writer: &mut W, now: F) -> Result<String>
where
    R: BufRead,
    W: Write,
    F: FnOnce() -> NaiveDateTime,
{
    wait_for_request(lines)?;
    debug!("Time request received");

    let current_time = format_device_time(now());
    writer
        .write_all(current_time.as_bytes())
        .and_then(|_| writer.flush())
        .context("failed to send time to device")?;

    info!(time = %current_time, "Sent time to device");
    Ok(current_time)
}
