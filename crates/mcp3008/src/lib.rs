// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # mcp3008
//!
//! Access to the MCP3008 8-channel, 10-bit ADC that senses the UPS board
//! voltages, wired to the RPi SPI0 bus.
//!
//! The crate is split along one seam: [`AnalogSource`] is what the sampler
//! consumes, and it is implemented both by the real SPI driver
//! ([`Mcp3008`]) and by [`SimulatedAdc`] for hosts without the board.
//!
//! # Example
//! ```no_run
//! use mcp3008::{AnalogSource, Mcp3008};
//!
//! let mut adc = Mcp3008::open(0, 0).expect("spidev not available");
//! let main_rail = adc.read_normalized(0).expect("transfer failed");
//! println!("MAIN at {:.1}% of VREF", main_rail * 100.0);
//! ```

mod driver;
mod error;
pub mod frame;
mod simulated;

pub use driver::{Mcp3008, SpiBus, DEFAULT_SPI_SPEED_HZ};
pub use error::AdcError;
pub use simulated::SimulatedAdc;

/// Number of input channels on the MCP3008.
pub const CHANNEL_COUNT: u8 = 8;

/// Resolution of the MCP3008 in bits.
pub const RESOLUTION_BITS: u8 = 10;

/// A single-ended analog input device addressed by channel number.
pub trait AnalogSource: Send {
    /// Reads the raw conversion code of `channel`.
    fn read_raw(&mut self, channel: u8) -> Result<u16, AdcError>;

    /// Converter resolution in bits.
    fn resolution_bits(&self) -> u8 {
        RESOLUTION_BITS
    }

    /// Reads `channel` scaled to `[0.0, 1.0]` of the reference voltage.
    fn read_normalized(&mut self, channel: u8) -> Result<f64, AdcError> {
        let raw = self.read_raw(channel)?;
        let full_scale = (1u32 << self.resolution_bits()) - 1;
        Ok(f64::from(raw) / f64::from(full_scale))
    }
}

/// Fails with [`AdcError::InvalidChannel`] unless `channel` exists on the chip.
pub fn check_channel(channel: u8) -> Result<(), AdcError> {
    if channel < CHANNEL_COUNT {
        Ok(())
    } else {
        Err(AdcError::InvalidChannel(channel))
    }
}
