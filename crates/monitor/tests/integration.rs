// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! End-to-end tests: a daemon on a loopback socket answering real datagrams.

use mcp3008::{AdcError, AnalogSource, SimulatedAdc};
use monitor::{run_cycle, CycleOutcome, Daemon, MonitorConfig};
use sampler::{ChannelBank, CycleParams};
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::time::timeout;
use wire_proto::{Reply, Request};

fn loopback_config() -> MonitorConfig {
    MonitorConfig {
        bind_address: "127.0.0.1".to_string(),
        port: 0,
        measure_interval_secs: 3600,
        thermal_zone: None,
        ..Default::default()
    }
}

async fn exchange(client: &UdpSocket, server: std::net::SocketAddr, datagram: &[u8]) -> Vec<u8> {
    client.send_to(datagram, server).await.unwrap();
    let mut buf = [0u8; 4096];
    let (len, from) = timeout(Duration::from_secs(2), client.recv_from(&mut buf))
        .await
        .expect("no reply within 2 s")
        .unwrap();
    assert_eq!(from, server);
    buf[..len].to_vec()
}

#[tokio::test]
async fn test_getlast_over_udp() {
    let daemon = Daemon::new(loopback_config(), Box::new(SimulatedAdc::ups_board())).unwrap();
    daemon.bank().measure().unwrap();

    let socket = daemon.bind().await.unwrap();
    let server = socket.local_addr().unwrap();
    let handle = tokio::spawn(daemon.run_with(socket, None));

    let client = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let reply = exchange(&client, server, &Request::GetLast.encode()).await;
    assert_eq!(&reply[..4], &[1, 1, 0, 2]);

    match Reply::decode(&reply).unwrap() {
        Reply::Last(last) => {
            assert!(last.valid);
            assert!(last.ts_complete >= last.ts_start);
            let channels: Vec<_> = last.channels.iter().map(|c| c.channel).collect();
            assert_eq!(channels, vec![0, 1, 2, 3]);
            assert_eq!(last.channels[0].last_mv, 5105);
            assert!(last.channels.iter().all(|c| c.valid));
        }
        other => panic!("unexpected reply {other:?}"),
    }

    handle.abort();
}

#[tokio::test]
async fn test_invalid_datagrams_get_no_reply() {
    let daemon = Daemon::new(loopback_config(), Box::new(SimulatedAdc::ups_board())).unwrap();
    let socket = daemon.bind().await.unwrap();
    let server = socket.local_addr().unwrap();
    let handle = tokio::spawn(daemon.run_with(socket, None));

    let client = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    client.send_to(&[2, 1, 0, 1], server).await.unwrap();
    client.send_to(&[1, 1, 0, 1, 0xff], server).await.unwrap();

    // The next valid request is answered first, so nothing was queued
    // for the two bad ones.
    let reply = exchange(&client, server, &Request::GetTemp.encode()).await;
    match Reply::decode(&reply).unwrap() {
        Reply::Temp(temp) => assert!(!temp.valid),
        other => panic!("unexpected reply {other:?}"),
    }

    handle.abort();
}

#[tokio::test]
async fn test_reply_before_first_cycle_is_invalid() {
    let daemon = Daemon::new(loopback_config(), Box::new(SimulatedAdc::ups_board())).unwrap();
    let socket = daemon.bind().await.unwrap();
    let server = socket.local_addr().unwrap();
    let handle = tokio::spawn(daemon.run_with(socket, None));

    let client = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let reply = exchange(&client, server, &Request::GetLast.encode()).await;
    match Reply::decode(&reply).unwrap() {
        Reply::Last(last) => {
            assert!(!last.valid);
            assert!(last.channels.iter().all(|c| !c.valid && c.last_mv == 0));
        }
        other => panic!("unexpected reply {other:?}"),
    }

    handle.abort();
}

#[test]
fn test_config_file_drives_bank() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
measure_interval_secs = 5
thermal_zone = ""

[adc]
samples = 3

[[channels]]
number = 2
label = "BAT"
"#
    )
    .unwrap();

    let config = MonitorConfig::from_file(file.path()).unwrap();
    assert_eq!(config.interval(), Duration::from_secs(5));

    let daemon = Daemon::new(config, Box::new(SimulatedAdc::ups_board())).unwrap();
    assert_eq!(daemon.bank().channel_numbers(), vec![2]);
    assert_eq!(daemon.bank().params().samples, 3);

    let snap = daemon.bank().measure().unwrap();
    assert_eq!(snap.channel(2).unwrap().label, "BAT");
    assert!(snap.temperature.is_none());
}

/// Full-scale source that can block inside a read or fail on demand.
struct Gated {
    gate: Option<mpsc::Receiver<()>>,
    fail: Arc<AtomicBool>,
}

impl AnalogSource for Gated {
    fn read_raw(&mut self, channel: u8) -> Result<u16, AdcError> {
        if let Some(gate) = self.gate.take() {
            let _ = gate.recv();
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(AdcError::InvalidChannel(channel));
        }
        Ok(1023)
    }
}

fn gated_bank(gate: Option<mpsc::Receiver<()>>, fail: Arc<AtomicBool>) -> Arc<ChannelBank> {
    let params = CycleParams {
        samples: 1,
        delta: Duration::ZERO,
        factor: 1000.0,
    };
    let bank = ChannelBank::new(Box::new(Gated { gate, fail }), params).unwrap();
    bank.add_channel(0, "MAIN").unwrap();
    Arc::new(bank)
}

#[tokio::test]
async fn test_agent_input_eof_shuts_down() {
    let config = MonitorConfig {
        snmp_agent: true,
        ..loopback_config()
    };
    let daemon = Daemon::new(config, Box::new(SimulatedAdc::ups_board())).unwrap();
    let socket = daemon.bind().await.unwrap();

    let (tx, rx) = tokio::sync::mpsc::channel(1);
    drop(tx);

    let result = timeout(Duration::from_secs(3), daemon.run_with(socket, Some(rx)))
        .await
        .expect("daemon did not stop on agent EOF");
    assert!(result.is_ok());
}

#[test]
fn test_cycle_skipped_while_another_runs() {
    let (release, gate) = mpsc::channel();
    let bank = gated_bank(Some(gate), Arc::new(AtomicBool::new(false)));

    let worker = {
        let bank = bank.clone();
        std::thread::spawn(move || run_cycle(&bank, false))
    };
    while bank.last().started.is_none() {
        std::thread::yield_now();
    }

    assert_eq!(run_cycle(&bank, true), CycleOutcome::Skipped);
    assert!(!bank.last().valid);

    release.send(()).unwrap();
    assert_eq!(
        worker.join().unwrap(),
        CycleOutcome::Measured { printed: false }
    );
    assert!(bank.last().valid);
}

#[test]
fn test_table_printed_only_when_requested() {
    let bank = gated_bank(None, Arc::new(AtomicBool::new(false)));
    assert_eq!(run_cycle(&bank, false), CycleOutcome::Measured { printed: false });
    assert_eq!(run_cycle(&bank, true), CycleOutcome::Measured { printed: true });
}

#[test]
fn test_adc_failure_still_prints_table() {
    let fail = Arc::new(AtomicBool::new(false));
    let bank = gated_bank(None, fail.clone());
    run_cycle(&bank, false);

    fail.store(true, Ordering::SeqCst);
    assert_eq!(run_cycle(&bank, true), CycleOutcome::AdcFailed { printed: true });
    assert_eq!(bank.last().channel(0).unwrap().last_mv, Some(1000));
}
