// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! SPI framing for a single-ended MCP3008 conversion.
//!
//! One conversion is a 3-byte full-duplex exchange:
//!
//! ```text
//! MOSI: 0000_0001  1ccc_0000  xxxx_xxxx
//! MISO: ????_????  ????_?0bb  bbbb_bbbb
//! ```
//!
//! The first byte carries the start bit, the second the single-ended flag
//! and the channel select, the reply holds a null bit followed by the
//! 10-bit code, MSB first.

/// Start bit, right-aligned in the first byte.
const START_BIT: u8 = 0x01;

/// Single-ended mode flag, before shifting into the upper nibble.
const SINGLE_ENDED: u8 = 0x08;

/// Builds the request frame for `channel` (assumed `0..=7`).
pub fn command_frame(channel: u8) -> [u8; 3] {
    [START_BIT, (SINGLE_ENDED | (channel & 0x07)) << 4, 0x00]
}

/// Extracts the 10-bit code from a reply frame.
pub fn decode_frame(rx: [u8; 3]) -> u16 {
    (u16::from(rx[1] & 0x03) << 8) | u16::from(rx[2])
}

/// Returns `true` when the null bit preceding the code is low.
///
/// A floating MISO line reads as all ones, which fails this check.
pub fn has_null_bit(rx: [u8; 3]) -> bool {
    rx[1] & 0x04 == 0
}
