// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Datagram counters for the UDP responder.

use crate::WireError;
use serde::Serialize;

/// Cumulative packet counters. Exposed over SNMP as Counter32 values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PacketStats {
    /// Every datagram received.
    pub in_total: u64,
    /// Datagrams that parsed into a request.
    pub in_valid: u64,
    /// Datagrams rejected for any reason.
    pub in_bad: u64,
    /// Rejected for protocol version.
    pub in_bad_version: u64,
    /// Rejected for length (short header or unexpected payload).
    pub in_bad_length: u64,
    /// Rejected for an unknown command.
    pub in_bad_command: u64,
    /// Replies handed to the socket.
    pub out_total: u64,
    /// Replies sent in full.
    pub out_success: u64,
    /// Replies that failed or were sent short.
    pub out_failed: u64,
}

impl PacketStats {
    /// Records a datagram that parsed into a request.
    pub fn record_valid(&mut self) {
        self.in_total += 1;
        self.in_valid += 1;
    }

    /// Records a rejected datagram.
    pub fn record_rejected(&mut self, err: &WireError) {
        self.in_total += 1;
        self.in_bad += 1;
        match err {
            WireError::BadVersion(_) => self.in_bad_version += 1,
            WireError::UnknownCommand(_) => self.in_bad_command += 1,
            e if e.is_length_error() => self.in_bad_length += 1,
            _ => {}
        }
    }

    /// Records the outcome of one send: `sent` bytes out of `expected`,
    /// or `None` when the socket reported an error.
    pub fn record_sent(&mut self, sent: Option<usize>, expected: usize) {
        self.out_total += 1;
        if sent == Some(expected) {
            self.out_success += 1;
        } else {
            self.out_failed += 1;
        }
    }

    /// Counters in MIB column order.
    pub fn counters(&self) -> [u64; 9] {
        [
            self.in_total,
            self.in_valid,
            self.in_bad,
            self.in_bad_version,
            self.in_bad_length,
            self.in_bad_command,
            self.out_total,
            self.out_success,
            self.out_failed,
        ]
    }

    /// Returns a human-readable summary.
    pub fn summary(&self) -> String {
        format!(
            "Packets in: {} total ({} valid, {} bad: {} version, {} length, {} command), \
             out: {} total ({} ok, {} failed)",
            self.in_total,
            self.in_valid,
            self.in_bad,
            self.in_bad_version,
            self.in_bad_length,
            self.in_bad_command,
            self.out_total,
            self.out_success,
            self.out_failed,
        )
    }
}
