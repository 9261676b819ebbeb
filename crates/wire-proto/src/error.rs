// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for the datagram codec.

/// Reasons a datagram is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WireError {
    /// Shorter than the 4-byte header.
    #[error("datagram of {len} bytes is shorter than the header")]
    TooShort { len: usize },

    /// Header carries an unsupported protocol version.
    #[error("unsupported protocol version {0}")]
    BadVersion(u8),

    /// A request that takes no payload carried one.
    #[error("command {command} carries {extra} unexpected payload bytes")]
    TrailingBytes { command: u8, extra: usize },

    /// Command byte is not a request this side understands.
    #[error("unknown command {0}")]
    UnknownCommand(u8),

    /// A reply ended before all announced fields were read.
    #[error("truncated reply: need {needed} more bytes, {available} available")]
    Truncated { needed: usize, available: usize },
}

impl WireError {
    /// `true` for errors that count as length violations.
    pub fn is_length_error(&self) -> bool {
        matches!(
            self,
            WireError::TooShort { .. } | WireError::TrailingBytes { .. } | WireError::Truncated { .. }
        )
    }
}
