// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Point-in-time view of the latest measurement cycle.
//!
//! A [`Snapshot`] is what every consumer reads: the UDP responder, the
//! SNMP agent and the console table. It is cloned out of the bank so that
//! no consumer holds a lock while formatting.

use crate::ThermalInfo;
use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

/// Latest averaged value of one channel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelReading {
    /// MCP3008 input number.
    pub number: u8,
    /// Rail name, e.g. `MAIN` or `BAT`.
    pub label: String,
    /// `true` once at least one cycle has averaged this channel.
    pub valid: bool,
    /// Rail voltage in millivolts.
    pub last_mv: Option<u32>,
    /// When the value was averaged.
    pub timestamp: Option<SystemTime>,
}

/// Result of the latest measurement cycle.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Snapshot {
    /// `false` while a cycle is running or before the first one ran.
    pub valid: bool,
    /// Start of the latest cycle.
    pub started: Option<SystemTime>,
    /// Completion of the latest cycle.
    pub completed: Option<SystemTime>,
    /// Channels in ascending number order.
    pub channels: Vec<ChannelReading>,
    /// Die temperature read at the end of the latest cycle.
    pub temperature: Option<ThermalInfo>,
}

impl Snapshot {
    /// Looks up a channel by MCP3008 input number.
    pub fn channel(&self, number: u8) -> Option<&ChannelReading> {
        self.channels.iter().find(|c| c.number == number)
    }

    /// Duration of the latest cycle, when both ends are known.
    pub fn cycle_duration(&self) -> Option<std::time::Duration> {
        let (start, end) = (self.started?, self.completed?);
        end.duration_since(start).ok()
    }

    /// Returns a one-line summary suitable for logging.
    pub fn summary(&self) -> String {
        let rails: Vec<String> = self
            .channels
            .iter()
            .map(|c| match (c.valid, c.last_mv) {
                (true, Some(mv)) => format!("{} {:.2} V", c.label, f64::from(mv) / 1000.0),
                _ => format!("{} n/a", c.label),
            })
            .collect();
        let temp = self
            .temperature
            .map(|t| format!("{:.1}°C", t.celsius()))
            .unwrap_or_else(|| "n/a".to_string());
        format!("{}, Temp {temp}", rails.join(", "))
    }
}

/// Seconds since the Unix epoch as a float, `0.0` for `None`.
pub fn epoch_secs(t: Option<SystemTime>) -> f64 {
    t.and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn reading(number: u8, label: &str, mv: Option<u32>) -> ChannelReading {
        ChannelReading {
            number,
            label: label.into(),
            valid: mv.is_some(),
            last_mv: mv,
            timestamp: mv.map(|_| UNIX_EPOCH),
        }
    }

    #[test]
    fn test_default_is_invalid() {
        let s = Snapshot::default();
        assert!(!s.valid);
        assert!(s.channels.is_empty());
        assert_eq!(s.cycle_duration(), None);
    }

    #[test]
    fn test_cycle_duration() {
        let start = UNIX_EPOCH + Duration::from_secs(100);
        let s = Snapshot {
            started: Some(start),
            completed: Some(start + Duration::from_micros(5_250)),
            ..Default::default()
        };
        assert_eq!(s.cycle_duration(), Some(Duration::from_micros(5_250)));
    }

    #[test]
    fn test_channel_lookup() {
        let s = Snapshot {
            channels: vec![reading(0, "MAIN", Some(5100)), reading(2, "BAT", None)],
            ..Default::default()
        };
        assert_eq!(s.channel(2).unwrap().label, "BAT");
        assert!(s.channel(1).is_none());
    }

    #[test]
    fn test_summary() {
        let s = Snapshot {
            channels: vec![reading(0, "MAIN", Some(5108)), reading(2, "BAT", None)],
            temperature: Some(ThermalInfo {
                millidegrees: 48_312,
                timestamp: UNIX_EPOCH,
            }),
            ..Default::default()
        };
        assert_eq!(s.summary(), "MAIN 5.11 V, BAT n/a, Temp 48.3°C");
    }

    #[test]
    fn test_epoch_secs() {
        assert_eq!(epoch_secs(None), 0.0);
        let t = UNIX_EPOCH + Duration::from_millis(1_500);
        assert!((epoch_secs(Some(t)) - 1.5).abs() < 1e-9);
    }
}
