// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Wall-clock alignment of measurement cycles.
//!
//! Cycles fire on multiples of the interval since the Unix epoch, moved
//! slightly earlier so that a cycle started at `:09.9` completes right
//! around `:10.0`.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Default interval between measurement cycles.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(10);

/// Constant lead subtracted from every aligned start time.
pub const ALIGNMENT_SHIFT: Duration = Duration::from_millis(100);

/// Delay from `now` until the first aligned cycle.
///
/// `interval - (now mod interval) - shift`, wrapped into `[0, interval)`
/// when the shift pushes it negative. A zero interval yields zero.
pub fn first_tick_delay(now: SystemTime, interval: Duration, shift: Duration) -> Duration {
    let interval_ns = interval.as_nanos();
    if interval_ns == 0 {
        return Duration::ZERO;
    }

    let since_epoch = now.duration_since(UNIX_EPOCH).unwrap_or_default().as_nanos();
    let shift_ns = shift.as_nanos() % interval_ns;

    let rest = interval_ns - since_epoch % interval_ns;
    let delay = if rest >= shift_ns {
        rest - shift_ns
    } else {
        rest + interval_ns - shift_ns
    };
    Duration::from_nanos(delay as u64)
}
