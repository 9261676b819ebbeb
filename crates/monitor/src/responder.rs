// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! UDP request handling.

use crate::MonitorError;
use bytes::Bytes;
use sampler::ChannelBank;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::net::UdpSocket;
use wire_proto::{PacketStats, Request, RetLast, RetTemp, RECV_BUFSIZE};

/// Answers GETLAST/GETTEMP datagrams from the latest snapshot.
#[derive(Debug, Clone)]
pub struct UdpResponder {
    bank: Arc<ChannelBank>,
    stats: Arc<Mutex<PacketStats>>,
}

impl UdpResponder {
    pub fn new(bank: Arc<ChannelBank>, stats: Arc<Mutex<PacketStats>>) -> Self {
        Self { bank, stats }
    }

    /// Builds the reply to one datagram, or `None` if it is rejected.
    pub fn handle(&self, data: &[u8]) -> Option<Bytes> {
        match Request::parse(data) {
            Ok(request) => {
                self.with_stats(PacketStats::record_valid);
                let snapshot = self.bank.last();
                Some(match request {
                    Request::GetLast => RetLast::from_snapshot(&snapshot).encode(),
                    Request::GetTemp => RetTemp::from_snapshot(&snapshot).encode(),
                })
            }
            Err(e) => {
                tracing::debug!("rejected datagram: {e}");
                self.with_stats(|s| s.record_rejected(&e));
                None
            }
        }
    }

    /// Receives and answers datagrams until the socket fails.
    ///
    /// A failed send is counted and logged; a failed receive ends the loop.
    pub async fn serve(&self, socket: &UdpSocket) -> Result<(), MonitorError> {
        let mut buf = vec![0u8; RECV_BUFSIZE];
        loop {
            let (len, peer) = socket
                .recv_from(&mut buf)
                .await
                .map_err(MonitorError::SocketError)?;
            tracing::trace!("{len} bytes from {peer}");

            let Some(reply) = self.handle(&buf[..len]) else {
                continue;
            };
            let sent = match socket.send_to(&reply, peer).await {
                Ok(n) => Some(n),
                Err(e) => {
                    tracing::warn!("error sending to {peer}: {e}");
                    None
                }
            };
            self.with_stats(|s| s.record_sent(sent, reply.len()));
        }
    }

    /// Copy of the current counters.
    pub fn stats(&self) -> PacketStats {
        self.stats.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn with_stats(&self, update: impl FnOnce(&mut PacketStats)) {
        let mut stats = self.stats.lock().unwrap_or_else(PoisonError::into_inner);
        update(&mut stats);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcp3008::SimulatedAdc;
    use sampler::CycleParams;
    use wire_proto::Reply;

    fn responder() -> UdpResponder {
        let bank = ChannelBank::new(Box::new(SimulatedAdc::ups_board()), CycleParams::default()).unwrap();
        bank.add_channel(0, "MAIN").unwrap();
        bank.add_channel(2, "BAT").unwrap();
        UdpResponder::new(Arc::new(bank), Arc::new(Mutex::new(PacketStats::default())))
    }

    #[test]
    fn test_getlast_before_first_cycle() {
        let r = responder();
        let reply = r.handle(&[1, 1, 0, 1]).unwrap();
        match Reply::decode(&reply).unwrap() {
            Reply::Last(last) => {
                assert!(!last.valid);
                assert_eq!(last.channels.len(), 2);
                assert_eq!(last.channels[1].channel, 2);
                assert!(!last.channels[1].valid);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(r.stats().in_valid, 1);
    }

    #[test]
    fn test_getlast_after_cycle() {
        let r = responder();
        r.bank.measure().unwrap();
        let reply = r.handle(&[1, 1, 0, 1]).unwrap();
        let Reply::Last(last) = Reply::decode(&reply).unwrap() else {
            panic!("expected RETLAST");
        };
        assert!(last.valid);
        assert!(last.ts_complete >= last.ts_start);
        assert!(last.channels.iter().all(|c| c.valid && c.last_mv > 0));
    }

    #[test]
    fn test_gettemp_without_zone() {
        let r = responder();
        let reply = r.handle(&[1, 1, 0, 3]).unwrap();
        assert_eq!(
            Reply::decode(&reply).unwrap(),
            Reply::Temp(wire_proto::RetTemp {
                valid: false,
                ts: 0.0,
                millidegrees: 0
            })
        );
    }

    #[test]
    fn test_empty_datagram_is_bad_length() {
        let r = responder();
        assert!(r.handle(&[]).is_none());
        let s = r.stats();
        assert_eq!((s.in_total, s.in_bad, s.in_bad_length), (1, 1, 1));
    }

    #[tokio::test]
    async fn test_serve_counts_every_datagram() {
        let r = responder();
        let server = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let addr = server.local_addr().unwrap();
        let serving = {
            let r = r.clone();
            tokio::spawn(async move { r.serve(&server).await })
        };

        let client = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        client.send_to(&[], addr).await.unwrap();
        client.send_to(&[1], addr).await.unwrap();
        client.send_to(&[1, 1, 0, 1], addr).await.unwrap();

        // The reply to the valid request arrives after both rejects were
        // counted, since datagrams are handled in order.
        let mut buf = [0u8; 512];
        tokio::time::timeout(std::time::Duration::from_secs(2), client.recv_from(&mut buf))
            .await
            .expect("no reply")
            .unwrap();

        let s = r.stats();
        assert_eq!(s.in_total, 3);
        assert_eq!(s.in_bad, 2);
        assert_eq!(s.in_bad_length, 2);
        assert_eq!(s.in_valid, 1);
        serving.abort();
    }

    #[test]
    fn test_rejections_counted() {
        let r = responder();
        assert!(r.handle(&[1]).is_none());
        assert!(r.handle(&[2, 1, 0, 1]).is_none());
        assert!(r.handle(&[1, 1, 0, 1, 0xAA]).is_none());
        assert!(r.handle(&[1, 1, 0, 2]).is_none());
        let s = r.stats();
        assert_eq!(s.in_total, 4);
        assert_eq!(s.in_bad, 4);
        assert_eq!(s.in_bad_length, 2);
        assert_eq!(s.in_bad_version, 1);
        assert_eq!(s.in_bad_command, 1);
    }
}
