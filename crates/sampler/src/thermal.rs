// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! SoC die temperature via `/sys/class/thermal/`.
//!
//! Thermal zone 0 reports the die temperature in millidegrees Celsius.
//! The value is kept in millidegrees end to end so that the UDP reply and
//! the MIB can carry it as an integer.

use crate::ThermalError;
use serde::Serialize;
use std::path::Path;
use std::time::SystemTime;

/// Default sysfs path for the SoC thermal zone.
pub const THERMAL_ZONE_PATH: &str = "/sys/class/thermal/thermal_zone0/temp";

/// Temperature at which the firmware starts soft throttling (°C).
const THROTTLE_THRESHOLD_C: f32 = 80.0;

/// One die temperature reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ThermalInfo {
    /// Die temperature in millidegrees Celsius, as reported by the kernel.
    pub millidegrees: i32,
    /// When the zone was read.
    pub timestamp: SystemTime,
}

impl ThermalInfo {
    /// Reads the default thermal zone.
    pub fn read() -> Result<Self, ThermalError> {
        Self::read_from(Path::new(THERMAL_ZONE_PATH))
    }

    /// Reads a specific thermal zone file.
    pub fn read_from(path: &Path) -> Result<Self, ThermalError> {
        let content = read_sysfs_file(path)?;
        let millidegrees = content.parse::<i32>().map_err(|_| ThermalError::ParseError {
            path: path.display().to_string(),
            detail: format!("expected integer millidegrees, got '{content}'"),
        })?;

        Ok(Self {
            millidegrees,
            timestamp: SystemTime::now(),
        })
    }

    /// Temperature in degrees Celsius.
    pub fn celsius(&self) -> f32 {
        self.millidegrees as f32 / 1000.0
    }

    /// Returns `true` at or above the soft throttling threshold.
    pub fn is_overheating(&self) -> bool {
        self.celsius() >= THROTTLE_THRESHOLD_C
    }
}

/// Reads a sysfs file and returns its trimmed content.
pub(crate) fn read_sysfs_file(path: &Path) -> Result<String, ThermalError> {
    if !path.exists() {
        return Err(ThermalError::NotAvailable {
            path: path.display().to_string(),
        });
    }
    std::fs::read_to_string(path)
        .map(|s| s.trim().to_string())
        .map_err(|e| ThermalError::ReadError {
            path: path.display().to_string(),
            source: e,
        })
}
