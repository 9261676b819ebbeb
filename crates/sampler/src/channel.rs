// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! A single ADC channel and its sample accumulator.

use crate::ChannelReading;
use mcp3008::{AdcError, AnalogSource};
use std::time::SystemTime;

/// One monitored MCP3008 input.
#[derive(Debug, Clone)]
pub struct Channel {
    number: u8,
    label: String,
    acc: f64,
    samples: u32,
    valid: bool,
    last_mv: Option<u32>,
    timestamp: Option<SystemTime>,
}

impl Channel {
    pub fn new(number: u8, label: impl Into<String>) -> Self {
        Self {
            number,
            label: label.into(),
            acc: 0.0,
            samples: 0,
            valid: false,
            last_mv: None,
            timestamp: None,
        }
    }

    pub fn number(&self) -> u8 {
        self.number
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Clears the accumulator before a new cycle.
    pub fn reset(&mut self) {
        self.acc = 0.0;
        self.samples = 0;
    }

    /// Takes one normalized sample from `source` into the accumulator.
    pub fn accumulate(&mut self, source: &mut dyn AnalogSource) -> Result<(), AdcError> {
        self.acc += source.read_normalized(self.number)?;
        self.samples += 1;
        Ok(())
    }

    /// Averages the accumulator, scales by `factor` and stores the result
    /// in millivolts. Does nothing when no sample was taken.
    pub fn average(&mut self, factor: f64) {
        if self.samples == 0 {
            return;
        }
        let mv = (self.acc * factor / f64::from(self.samples)).round();
        self.last_mv = Some(mv.clamp(0.0, f64::from(u32::MAX)) as u32);
        self.timestamp = Some(SystemTime::now());
        self.valid = true;
    }

    /// The latest averaged value with its validity and timestamp.
    pub fn reading(&self) -> ChannelReading {
        ChannelReading {
            number: self.number,
            label: self.label.clone(),
            valid: self.valid,
            last_mv: self.last_mv,
            timestamp: self.timestamp,
        }
    }
}
