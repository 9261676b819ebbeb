// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for the monitoring daemon.

/// Errors that stop the daemon or one of its commands.
#[derive(Debug, thiserror::Error)]
pub enum MonitorError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// The bind address did not resolve to an IPv4 address.
    #[error("cannot resolve '{address}': {detail}")]
    ResolveError { address: String, detail: String },

    /// Binding the UDP socket failed.
    #[error("cannot bind UDP socket to {address}: {source}")]
    BindError {
        address: String,
        #[source]
        source: std::io::Error,
    },

    /// Receiving from the UDP socket failed.
    #[error("UDP receive failed: {0}")]
    SocketError(#[source] std::io::Error),

    /// Reading the SNMP channel or writing replies failed.
    #[error("SNMP agent I/O failed: {0}")]
    AgentIo(#[source] std::io::Error),

    /// Installing a signal handler failed.
    #[error("cannot install signal handler: {0}")]
    SignalError(#[source] std::io::Error),

    /// Opening the converter failed.
    #[error("ADC error: {0}")]
    AdcError(#[from] mcp3008::AdcError),

    /// The channel bank rejected its setup.
    #[error("sampler error: {0}")]
    SampleError(#[from] sampler::SampleError),

    /// The MIB could not be built.
    #[error("MIB error: {0}")]
    MibError(#[from] snmp_agent::MibError),
}
