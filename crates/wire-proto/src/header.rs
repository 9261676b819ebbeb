// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The 4-byte header shared by every message.
//!
//! ```text
//! +---------+----------+--------+---------+
//! | version | authtype | unused | command |
//! +---------+----------+--------+---------+
//! ```

use crate::WireError;
use bytes::{Buf, BufMut};

/// Protocol version spoken by this crate.
pub const PROTO_VERSION: u8 = 1;

/// Authentication type "none", the only one defined.
pub const AUTH_NONE: u8 = 1;

/// Header length in bytes.
pub const HEADER_LEN: usize = 4;

/// Message types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Command {
    /// Request for the latest channel values.
    GetLast = 1,
    /// Reply carrying the latest channel values.
    RetLast = 2,
    /// Request for the latest die temperature.
    GetTemp = 3,
    /// Reply carrying the latest die temperature.
    RetTemp = 4,
}

impl TryFrom<u8> for Command {
    type Error = WireError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Command::GetLast),
            2 => Ok(Command::RetLast),
            3 => Ok(Command::GetTemp),
            4 => Ok(Command::RetTemp),
            other => Err(WireError::UnknownCommand(other)),
        }
    }
}

/// A decoded header. The command byte is kept raw so that unknown
/// commands can be reported after the version check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub version: u8,
    pub authtype: u8,
    pub command: u8,
}

impl Header {
    /// Header for an outgoing message of this crate's version.
    pub fn new(command: Command) -> Self {
        Self {
            version: PROTO_VERSION,
            authtype: AUTH_NONE,
            command: command as u8,
        }
    }

    pub fn encode(&self, buf: &mut impl BufMut) {
        buf.put_u8(self.version);
        buf.put_u8(self.authtype);
        buf.put_u8(0);
        buf.put_u8(self.command);
    }

    /// Reads a header and checks the version. Authtype is not checked.
    pub fn decode(buf: &mut impl Buf) -> Result<Self, WireError> {
        if buf.remaining() < HEADER_LEN {
            return Err(WireError::TooShort {
                len: buf.remaining(),
            });
        }
        let version = buf.get_u8();
        let authtype = buf.get_u8();
        let _unused = buf.get_u8();
        let command = buf.get_u8();
        if version != PROTO_VERSION {
            return Err(WireError::BadVersion(version));
        }
        Ok(Self {
            version,
            authtype,
            command,
        })
    }
}
