// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The net-snmp `pass_persist` line protocol.
//!
//! snmpd writes one keyword per line, followed by its arguments on the
//! next lines:
//!
//! ```text
//! PING                       -> PONG
//! get      <oid>             -> <oid> <type> <value>  | NONE
//! getnext  <oid>             -> <oid> <type> <value>  | NONE
//! set      <oid> <type val>  -> not-writable
//! ```
//!
//! Replies are one item per line. The session is a pure state machine:
//! feed it lines, write out whatever it returns.

use crate::{Mib, MibError, MibView};

/// Reply for anything that cannot be answered.
pub const NONE_REPLY: &str = "NONE\n";

/// Reply to the handshake.
pub const PONG_REPLY: &str = "PONG\n";

/// Reply to every SET.
pub const NOT_WRITABLE_REPLY: &str = "not-writable\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Pending {
    #[default]
    Keyword,
    GetOid,
    GetNextOid,
    SetOid,
    SetValue,
}

/// Per-connection pass_persist state.
#[derive(Debug, Default)]
pub struct PassPersist {
    pending: Pending,
}

impl PassPersist {
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` when the session is waiting for an argument line.
    pub fn is_mid_request(&self) -> bool {
        self.pending != Pending::Keyword
    }

    /// Consumes one input line (without its newline) and returns the
    /// reply to write, if the request is complete.
    pub fn handle_line(&mut self, line: &str, mib: &Mib, view: &MibView<'_>) -> Option<String> {
        let line = line.trim_end_matches(['\r', '\n']);

        match std::mem::take(&mut self.pending) {
            Pending::Keyword => self.handle_keyword(line),
            Pending::GetOid => Some(reply(mib.get(line.trim(), view), "GET")),
            Pending::GetNextOid => Some(reply(mib.get_next(line.trim(), view), "GETNEXT")),
            Pending::SetOid => {
                tracing::debug!("SET requested for {line}");
                self.pending = Pending::SetValue;
                None
            }
            Pending::SetValue => Some(NOT_WRITABLE_REPLY.to_string()),
        }
    }

    fn handle_keyword(&mut self, line: &str) -> Option<String> {
        match line.trim() {
            "" => None,
            "PING" => {
                tracing::info!("passed PING/PONG handshake");
                Some(PONG_REPLY.to_string())
            }
            "get" => {
                self.pending = Pending::GetOid;
                None
            }
            "getnext" => {
                self.pending = Pending::GetNextOid;
                None
            }
            "set" => {
                self.pending = Pending::SetOid;
                None
            }
            other => {
                tracing::error!("unrecognized request on stdin: {other:?}");
                Some(NONE_REPLY.to_string())
            }
        }
    }
}

fn reply(result: Result<crate::Binding, MibError>, op: &str) -> String {
    match result {
        Ok(binding) => {
            let text = binding.to_reply();
            tracing::debug!("{op}: replying {text:?}");
            text
        }
        Err(e @ MibError::EndOfMib(_)) => {
            tracing::debug!("{op}: {e}");
            NONE_REPLY.to_string()
        }
        Err(e) => {
            tracing::warn!("{op}: {e}");
            NONE_REPLY.to_string()
        }
    }
}
