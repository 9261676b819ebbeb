// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for sampling.

/// Errors raised while configuring the channel bank or running a cycle.
#[derive(Debug, thiserror::Error)]
pub enum SampleError {
    /// Channel number does not exist on the converter.
    #[error("channel {0} out of range (expected 0..=7)")]
    InvalidChannel(u8),

    /// Channel is already part of the bank.
    #[error("channel {0} already configured")]
    DuplicateChannel(u8),

    /// Channel is not part of the bank.
    #[error("channel {0} not configured")]
    UnknownChannel(u8),

    /// A cycle parameter is out of range.
    #[error("invalid {name}: {detail}")]
    InvalidParameter { name: &'static str, detail: String },

    /// Another measurement cycle is still running.
    #[error("measurement cycle already in progress")]
    Busy,

    /// The converter failed mid-cycle.
    #[error("ADC read failed: {0}")]
    Adc(#[from] mcp3008::AdcError),
}

/// Errors that can occur when reading the thermal zone.
#[derive(Debug, thiserror::Error)]
pub enum ThermalError {
    /// Failed to read the sysfs file.
    #[error("failed to read {path}: {source}")]
    ReadError {
        path: String,
        source: std::io::Error,
    },

    /// The file did not hold an integer millidegree value.
    #[error("failed to parse value from {path}: {detail}")]
    ParseError { path: String, detail: String },

    /// The thermal zone does not exist (not running on an RPi).
    #[error("sysfs path not found: {path}")]
    NotAvailable { path: String },
}
