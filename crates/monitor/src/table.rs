// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Console table printed after every cycle when not acting as an agent.
//!
//! ```text
//! 2025-06-01 12:00:09.912345,    5432 us, MAIN: +5.11, REG: +5.01, BAT: +4.11, +5V:  Nan
//! ```

use chrono::{DateTime, Local, TimeZone, Utc};
use sampler::Snapshot;

/// Table line in local time, `None` while the snapshot is not valid.
pub fn format_line(snapshot: &Snapshot) -> Option<String> {
    format_line_in(snapshot, &Local)
}

/// Table line with timestamps rendered in `tz`.
pub fn format_line_in<Tz>(snapshot: &Snapshot, tz: &Tz) -> Option<String>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    if !snapshot.valid {
        return None;
    }
    let completed = snapshot.completed?;
    let stamp = DateTime::<Utc>::from(completed).with_timezone(tz);
    let elapsed_us = snapshot
        .cycle_duration()
        .map(|d| d.as_micros())
        .unwrap_or(0);

    let mut line = format!(
        "{}.{:06}, {:7} us, ",
        stamp.format("%Y-%m-%d %H:%M:%S"),
        stamp.timestamp_subsec_micros(),
        elapsed_us
    );
    for ch in &snapshot.channels {
        match (ch.valid, ch.last_mv) {
            (true, Some(mv)) => {
                line.push_str(&format!("{}: {:+.2}, ", ch.label, f64::from(mv) / 1000.0))
            }
            _ => line.push_str(&format!("{}:  Nan ", ch.label)),
        }
    }
    Some(line.trim_end().to_string())
}
