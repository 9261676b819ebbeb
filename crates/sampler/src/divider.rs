// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Resistive divider in front of every ADC input.
//!
//! Each monitored rail is halved by a pull-up/pull-down pair before it
//! reaches the MCP3008, so a normalized reading `x` maps back to the rail
//! voltage as `x * VREF * (R_PU + R_PD) / R_PD`.

use serde::{Deserialize, Serialize};

/// Voltage on the MCP3008 VREF pin, measured on the board (mV).
pub const VREF_MV: u32 = 3324;

/// Measured pull-up resistance of the input divider (Ω).
pub const R_PULLUP_OHM: u32 = 9920;

/// Measured pull-down resistance of the input divider (Ω).
pub const R_PULLDOWN_OHM: u32 = 9930;

/// Reference voltage and divider resistors for one board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoltageDivider {
    pub vref_mv: u32,
    pub r_pullup_ohm: u32,
    pub r_pulldown_ohm: u32,
}

impl VoltageDivider {
    /// Millivolts at the rail for a full-scale (1.0) normalized reading.
    ///
    /// Returns `None` when the pull-down is zero.
    pub fn factor(&self) -> Option<f64> {
        if self.r_pulldown_ohm == 0 {
            return None;
        }
        let total = f64::from(self.r_pullup_ohm) + f64::from(self.r_pulldown_ohm);
        Some(f64::from(self.vref_mv) * total / f64::from(self.r_pulldown_ohm))
    }
}

impl Default for VoltageDivider {
    fn default() -> Self {
        Self {
            vref_mv: VREF_MV,
            r_pullup_ohm: R_PULLUP_OHM,
            r_pulldown_ohm: R_PULLDOWN_OHM,
        }
    }
}
