// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! A stand-in converter for hosts without the UPS board.

use crate::{check_channel, AdcError, AnalogSource, CHANNEL_COUNT};

/// Returns fixed conversion codes, optionally with a small triangular
/// ripple so that averaging is visible in the output.
#[derive(Debug, Clone)]
pub struct SimulatedAdc {
    codes: [u16; CHANNEL_COUNT as usize],
    ripple: u16,
    tick: i32,
}

impl SimulatedAdc {
    /// Every channel reads `code`.
    pub fn constant(code: u16) -> Self {
        Self {
            codes: [code.min(1023); CHANNEL_COUNT as usize],
            ripple: 0,
            tick: 0,
        }
    }

    /// Codes that, through the board's divider, read as roughly
    /// 5.1 V MAIN, 5.0 V REG, 4.1 V BAT and 5.0 V on the +5V rail.
    pub fn ups_board() -> Self {
        let mut adc = Self::constant(0);
        adc.codes[..4].copy_from_slice(&[786, 771, 632, 771]);
        adc
    }

    /// Sets the code returned for `channel`.
    pub fn with_code(mut self, channel: u8, code: u16) -> Self {
        if let Some(slot) = self.codes.get_mut(usize::from(channel)) {
            *slot = code.min(1023);
        }
        self
    }

    /// Adds a ±`ripple` code wobble that cycles with every read.
    pub fn with_ripple(mut self, ripple: u16) -> Self {
        self.ripple = ripple;
        self
    }
}

impl Default for SimulatedAdc {
    fn default() -> Self {
        Self::ups_board()
    }
}

impl AnalogSource for SimulatedAdc {
    fn read_raw(&mut self, channel: u8) -> Result<u16, AdcError> {
        check_channel(channel)?;
        let base = self.codes[usize::from(channel)];
        if self.ripple == 0 {
            return Ok(base);
        }

        let r = i32::from(self.ripple);
        let period = 4 * r;
        self.tick = (self.tick + 1) % period;
        let phase = self.tick;
        // Triangle wave in [-r, r].
        let offset = if phase < 2 * r { phase - r } else { 3 * r - phase };
        Ok((i32::from(base) + offset).clamp(0, 1023) as u16)
    }
}
