// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for ADC access.

/// Errors that can occur when talking to the converter.
#[derive(Debug, thiserror::Error)]
pub enum AdcError {
    /// Channel number outside `0..=7`.
    #[error("invalid ADC channel {0} (expected 0..=7)")]
    InvalidChannel(u8),

    /// Opening, configuring or transferring on the spidev node failed.
    #[error("SPI error on {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    /// The device answered with a frame that cannot carry a conversion.
    #[error("malformed reply frame from channel {channel}: {frame:02x?}")]
    BadFrame { channel: u8, frame: [u8; 3] },
}
