// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Requests and replies.
//!
//! RETLAST body (big-endian, no padding):
//!
//! ```text
//! count:u8 valid:u8 ts_start:f64 ts_complete:f64
//! count x { channel:u8 valid:u8 last_mv:u32 ts:f64 }
//! ```
//!
//! RETTEMP body: `valid:u8 ts:f64 millidegrees:i32`.
//!
//! Timestamps are Unix seconds. Values that do not exist yet (no cycle
//! has completed) go out as zero with the valid flag cleared.

use crate::header::{Command, Header, HEADER_LEN};
use crate::WireError;
use bytes::{Buf, BufMut, Bytes, BytesMut};
use sampler::{epoch_secs, Snapshot};
use serde::Serialize;

/// Size of the RETLAST summary block following the header.
const RETLAST_SUMMARY_LEN: usize = 1 + 1 + 8 + 8;

/// Size of one per-channel RETLAST record.
const RETLAST_CHANNEL_LEN: usize = 1 + 1 + 4 + 8;

/// Size of the RETTEMP body.
const RETTEMP_LEN: usize = 1 + 8 + 4;

/// A request understood by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    GetLast,
    GetTemp,
}

impl Request {
    fn command(self) -> Command {
        match self {
            Request::GetLast => Command::GetLast,
            Request::GetTemp => Command::GetTemp,
        }
    }

    /// Serialises the request (header only).
    pub fn encode(self) -> Bytes {
        let mut buf = BytesMut::with_capacity(HEADER_LEN);
        Header::new(self.command()).encode(&mut buf);
        buf.freeze()
    }

    /// Parses an incoming datagram.
    ///
    /// Checks run in order: header length, version, command, then
    /// trailing payload.
    pub fn parse(data: &[u8]) -> Result<Self, WireError> {
        let mut buf = data;
        let header = Header::decode(&mut buf)?;
        let request = match Command::try_from(header.command) {
            Ok(Command::GetLast) => Request::GetLast,
            Ok(Command::GetTemp) => Request::GetTemp,
            _ => return Err(WireError::UnknownCommand(header.command)),
        };
        if buf.has_remaining() {
            return Err(WireError::TrailingBytes {
                command: header.command,
                extra: buf.remaining(),
            });
        }
        Ok(request)
    }
}

/// One channel inside a RETLAST reply.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelRecord {
    pub channel: u8,
    pub valid: bool,
    pub last_mv: u32,
    pub ts: f64,
}

/// The latest channel values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetLast {
    pub valid: bool,
    pub ts_start: f64,
    pub ts_complete: f64,
    pub channels: Vec<ChannelRecord>,
}

impl RetLast {
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        Self {
            valid: snapshot.valid,
            ts_start: epoch_secs(snapshot.started),
            ts_complete: epoch_secs(snapshot.completed),
            channels: snapshot
                .channels
                .iter()
                .map(|c| ChannelRecord {
                    channel: c.number,
                    valid: c.valid,
                    last_mv: c.last_mv.unwrap_or(0),
                    ts: epoch_secs(c.timestamp),
                })
                .collect(),
        }
    }

    /// Length of the encoded reply including the header.
    pub fn encoded_len(&self) -> usize {
        HEADER_LEN + RETLAST_SUMMARY_LEN + self.channels.len() * RETLAST_CHANNEL_LEN
    }

    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(self.encoded_len());
        Header::new(Command::RetLast).encode(&mut buf);
        buf.put_u8(self.channels.len().min(usize::from(u8::MAX)) as u8);
        buf.put_u8(u8::from(self.valid));
        buf.put_f64(self.ts_start);
        buf.put_f64(self.ts_complete);
        for ch in self.channels.iter().take(usize::from(u8::MAX)) {
            buf.put_u8(ch.channel);
            buf.put_u8(u8::from(ch.valid));
            buf.put_u32(ch.last_mv);
            buf.put_f64(ch.ts);
        }
        buf.freeze()
    }

    /// Decodes the body that follows a RETLAST header.
    fn decode_body(buf: &mut &[u8]) -> Result<Self, WireError> {
        need(buf, RETLAST_SUMMARY_LEN)?;
        let count = usize::from(buf.get_u8());
        let valid = buf.get_u8() != 0;
        let ts_start = buf.get_f64();
        let ts_complete = buf.get_f64();

        need(buf, count * RETLAST_CHANNEL_LEN)?;
        let channels = (0..count)
            .map(|_| ChannelRecord {
                channel: buf.get_u8(),
                valid: buf.get_u8() != 0,
                last_mv: buf.get_u32(),
                ts: buf.get_f64(),
            })
            .collect();

        Ok(Self {
            valid,
            ts_start,
            ts_complete,
            channels,
        })
    }
}

/// The latest die temperature.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetTemp {
    pub valid: bool,
    pub ts: f64,
    pub millidegrees: i32,
}

impl RetTemp {
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        match snapshot.temperature {
            Some(t) => Self {
                valid: true,
                ts: epoch_secs(Some(t.timestamp)),
                millidegrees: t.millidegrees,
            },
            None => Self {
                valid: false,
                ts: 0.0,
                millidegrees: 0,
            },
        }
    }

    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(HEADER_LEN + RETTEMP_LEN);
        Header::new(Command::RetTemp).encode(&mut buf);
        buf.put_u8(u8::from(self.valid));
        buf.put_f64(self.ts);
        buf.put_i32(self.millidegrees);
        buf.freeze()
    }

    fn decode_body(buf: &mut &[u8]) -> Result<Self, WireError> {
        need(buf, RETTEMP_LEN)?;
        Ok(Self {
            valid: buf.get_u8() != 0,
            ts: buf.get_f64(),
            millidegrees: buf.get_i32(),
        })
    }
}

/// A reply received by a client.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Reply {
    Last(RetLast),
    Temp(RetTemp),
}

impl Reply {
    /// Decodes a reply datagram. Trailing bytes after the body are an error.
    pub fn decode(data: &[u8]) -> Result<Self, WireError> {
        let mut buf = data;
        let header = Header::decode(&mut buf)?;
        let reply = match Command::try_from(header.command)? {
            Command::RetLast => Reply::Last(RetLast::decode_body(&mut buf)?),
            Command::RetTemp => Reply::Temp(RetTemp::decode_body(&mut buf)?),
            _ => return Err(WireError::UnknownCommand(header.command)),
        };
        if buf.has_remaining() {
            return Err(WireError::TrailingBytes {
                command: header.command,
                extra: buf.remaining(),
            });
        }
        Ok(reply)
    }
}

fn need(buf: &&[u8], needed: usize) -> Result<(), WireError> {
    if buf.remaining() < needed {
        return Err(WireError::Truncated {
            needed,
            available: buf.remaining(),
        });
    }
    Ok(())
}
