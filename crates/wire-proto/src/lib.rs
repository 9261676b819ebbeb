// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # wire-proto
//!
//! The binary datagram protocol spoken by the UPS monitor on UDP
//! port 10000.
//!
//! A client sends a bare 4-byte GETLAST (or GETTEMP) header and gets back
//! a RETLAST (or RETTEMP) reply built from the latest
//! [`sampler::Snapshot`]. Everything is big-endian with no padding.

mod error;
pub mod header;
mod message;
mod stats;

pub use error::WireError;
pub use header::{Command, Header, AUTH_NONE, HEADER_LEN, PROTO_VERSION};
pub use message::{ChannelRecord, Reply, Request, RetLast, RetTemp};
pub use stats::PacketStats;

/// Default UDP port of the server.
pub const DEFAULT_PORT: u16 = 10000;

/// Largest datagram read from the socket.
pub const RECV_BUFSIZE: usize = 4096;
