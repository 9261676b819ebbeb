// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The pass_persist agent loop.
//!
//! snmpd talks to the agent over stdin/stdout. Lines are read on a plain
//! thread and forwarded through a channel, so a blocked read never holds
//! up the runtime on shutdown.

use crate::MonitorError;
use sampler::ChannelBank;
use snmp_agent::{Mib, MibView, PassPersist};
use std::io::BufRead;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use wire_proto::PacketStats;

/// Answers pass_persist requests from the latest snapshot.
#[derive(Debug)]
pub struct Agent {
    mib: Mib,
    bank: Arc<ChannelBank>,
    stats: Arc<Mutex<PacketStats>>,
    session: PassPersist,
}

impl Agent {
    pub fn new(mib: Mib, bank: Arc<ChannelBank>, stats: Arc<Mutex<PacketStats>>) -> Self {
        Self {
            mib,
            bank,
            stats,
            session: PassPersist::new(),
        }
    }

    /// Feeds one line to the session and returns the reply, if any.
    pub fn handle_line(&mut self, line: &str) -> Option<String> {
        let snapshot = self.bank.last();
        let stats = self
            .stats
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        let view = MibView {
            snapshot: &snapshot,
            stats: &stats,
        };
        self.session.handle_line(line, &self.mib, &view)
    }

    /// Serves lines from `lines` until the sender side closes, writing
    /// and flushing every reply to `out`.
    pub async fn run<W>(
        &mut self,
        mut lines: mpsc::Receiver<std::io::Result<String>>,
        mut out: W,
    ) -> Result<(), MonitorError>
    where
        W: AsyncWrite + Unpin,
    {
        while let Some(line) = lines.recv().await {
            let line = line.map_err(MonitorError::AgentIo)?;
            tracing::trace!("stdin: {line:?}");
            if let Some(reply) = self.handle_line(&line) {
                out.write_all(reply.as_bytes())
                    .await
                    .map_err(MonitorError::AgentIo)?;
                out.flush().await.map_err(MonitorError::AgentIo)?;
            }
        }
        Ok(())
    }
}

/// Reads stdin line by line on a detached thread.
///
/// The channel closes at EOF or after forwarding a read error.
pub fn spawn_stdin_reader() -> mpsc::Receiver<std::io::Result<String>> {
    let (tx, rx) = mpsc::channel(16);
    let spawned = std::thread::Builder::new()
        .name("snmp-stdin".into())
        .spawn(move || {
            for line in std::io::stdin().lock().lines() {
                let failed = line.is_err();
                if tx.blocking_send(line).is_err() || failed {
                    break;
                }
            }
        });
    if let Err(e) = spawned {
        tracing::error!("cannot spawn stdin reader: {e}");
    }
    rx
}
