// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! MCP3008 driver over a Linux `spidev` node.

use crate::frame::{command_frame, decode_frame, has_null_bit};
use crate::{check_channel, AdcError, AnalogSource};
use spidev::{SpiModeFlags, Spidev, SpidevOptions, SpidevTransfer};

/// Clock rate used when opening the bus. The MCP3008 is rated for
/// 1.35 MHz at 2.7 V, which covers the 3.3 V supply on the board.
pub const DEFAULT_SPI_SPEED_HZ: u32 = 1_350_000;

/// A full-duplex 3-byte exchange, the only transfer the MCP3008 needs.
pub trait SpiBus: Send {
    fn transfer3(&mut self, tx: &[u8; 3], rx: &mut [u8; 3]) -> std::io::Result<()>;
}

impl SpiBus for Spidev {
    fn transfer3(&mut self, tx: &[u8; 3], rx: &mut [u8; 3]) -> std::io::Result<()> {
        let mut transfer = SpidevTransfer::read_write(tx, rx);
        self.transfer(&mut transfer)
    }
}

/// An MCP3008 attached to an SPI bus.
#[derive(Debug)]
pub struct Mcp3008<B = Spidev> {
    bus: B,
    path: String,
}

impl Mcp3008<Spidev> {
    /// Opens `/dev/spidev{bus}.{device}` in SPI mode 0.
    pub fn open(bus: u8, device: u8) -> Result<Self, AdcError> {
        Self::open_with_speed(bus, device, DEFAULT_SPI_SPEED_HZ)
    }

    /// Opens the spidev node with an explicit clock rate.
    pub fn open_with_speed(bus: u8, device: u8, speed_hz: u32) -> Result<Self, AdcError> {
        let path = format!("/dev/spidev{bus}.{device}");
        let io_err = |source| AdcError::Io {
            path: path.clone(),
            source,
        };

        let mut spi = Spidev::open(&path).map_err(io_err)?;
        let options = SpidevOptions::new()
            .bits_per_word(8)
            .max_speed_hz(speed_hz)
            .mode(SpiModeFlags::SPI_MODE_0)
            .build();
        spi.configure(&options).map_err(io_err)?;

        tracing::debug!("opened {path} at {speed_hz} Hz");
        Ok(Self { bus: spi, path })
    }
}

impl<B: SpiBus> Mcp3008<B> {
    /// Wraps an already configured bus. `label` is used in error messages.
    pub fn with_bus(bus: B, label: impl Into<String>) -> Self {
        Self {
            bus,
            path: label.into(),
        }
    }

    /// Device path (or label) this driver talks to.
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl<B: SpiBus> AnalogSource for Mcp3008<B> {
    fn read_raw(&mut self, channel: u8) -> Result<u16, AdcError> {
        check_channel(channel)?;

        let tx = command_frame(channel);
        let mut rx = [0u8; 3];
        self.bus
            .transfer3(&tx, &mut rx)
            .map_err(|source| AdcError::Io {
                path: self.path.clone(),
                source,
            })?;

        if !has_null_bit(rx) {
            return Err(AdcError::BadFrame { channel, frame: rx });
        }
        Ok(decode_frame(rx))
    }
}
