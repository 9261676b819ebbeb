// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Daemon orchestration.
//!
//! One task multiplexes everything with `select!`:
//! - the aligned interval timer, which hands each cycle to a blocking
//!   thread (a cycle sleeps between passes and talks to SPI),
//! - the UDP responder,
//! - the pass_persist agent on stdin, when enabled,
//! - SIGINT/SIGTERM (shutdown) and SIGHUP (ignored).

use crate::{table, Agent, MonitorConfig, MonitorError, UdpResponder};
use mcp3008::{AnalogSource, Mcp3008, SimulatedAdc};
use sampler::schedule::{first_tick_delay, ALIGNMENT_SHIFT};
use sampler::{ChannelBank, SampleError, Snapshot};
use snmp_agent::{ups_mib, DeviceInfo};
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::{Arc, Mutex};
use std::time::SystemTime;
use tokio::net::UdpSocket;
use tokio::signal::unix::{signal, SignalKind};
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use wire_proto::PacketStats;

/// Opens the converter named by the config, or a simulated one.
pub fn open_source(
    config: &MonitorConfig,
    simulate: bool,
) -> Result<Box<dyn AnalogSource>, MonitorError> {
    if simulate {
        tracing::info!("using simulated ADC");
        return Ok(Box::new(SimulatedAdc::ups_board().with_ripple(2)));
    }
    let adc = Mcp3008::open(config.adc.spi_bus, config.adc.spi_device)?;
    tracing::info!("using MCP3008 on {}", adc.path());
    Ok(Box::new(adc))
}

/// Builds the channel bank described by `config` on top of `source`.
pub fn build_bank(
    config: &MonitorConfig,
    source: Box<dyn AnalogSource>,
) -> Result<ChannelBank, MonitorError> {
    config.validate()?;
    tracing::info!("initializing {} channels", config.channels.len());

    let mut bank = ChannelBank::new(source, config.adc.cycle_params()?)?;
    if let Some(zone) = config
        .thermal_zone
        .as_ref()
        .filter(|p| !p.as_os_str().is_empty())
    {
        bank = bank.with_thermal_zone(zone);
    }
    for ch in &config.channels {
        bank.add_channel(ch.number, &ch.label)?;
    }
    Ok(bank)
}

/// Device table contents for the MIB.
pub fn device_info(config: &MonitorConfig) -> DeviceInfo {
    DeviceInfo {
        spi_port: config.adc.spi_bus,
        spi_device: config.adc.spi_device,
        name: config.adc.device_name.clone(),
        channel_count: config.channels.len(),
    }
}

/// What one timer tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The cycle ran; `printed` tells whether a table line went to stdout.
    Measured { printed: bool },
    /// The converter failed mid-cycle. The snapshot is still completed.
    AdcFailed { printed: bool },
    /// Another cycle held the lock.
    Skipped,
}

/// Runs one cycle and reports the outcome. Called on a blocking thread.
pub fn run_cycle(bank: &ChannelBank, print_table: bool) -> CycleOutcome {
    match bank.measure() {
        Ok(snapshot) => CycleOutcome::Measured {
            printed: print_table && print_line(&snapshot),
        },
        Err(SampleError::Busy) => {
            tracing::warn!("measurement cycle skipped: previous cycle still running");
            CycleOutcome::Skipped
        }
        Err(e) => {
            tracing::error!("measurement cycle failed: {e}");
            CycleOutcome::AdcFailed {
                printed: print_table && print_line(&bank.last()),
            }
        }
    }
}

fn print_line(snapshot: &Snapshot) -> bool {
    match table::format_line(snapshot) {
        Some(line) => {
            println!("{line}");
            true
        }
        None => false,
    }
}

/// Resolves the configured bind address to an IPv4 socket address.
pub async fn resolve_bind_address(address: &str, port: u16) -> Result<SocketAddr, MonitorError> {
    if address.is_empty() {
        return Ok(SocketAddr::from((Ipv4Addr::UNSPECIFIED, port)));
    }
    let resolve_err = |detail: String| MonitorError::ResolveError {
        address: address.to_string(),
        detail,
    };
    tokio::net::lookup_host((address, port))
        .await
        .map_err(|e| resolve_err(e.to_string()))?
        .find(SocketAddr::is_ipv4)
        .ok_or_else(|| resolve_err("no IPv4 address".into()))
}

/// The monitoring daemon.
pub struct Daemon {
    config: MonitorConfig,
    bank: Arc<ChannelBank>,
    stats: Arc<Mutex<PacketStats>>,
}

impl Daemon {
    /// Validates `config` and sets up the channel bank.
    pub fn new(config: MonitorConfig, source: Box<dyn AnalogSource>) -> Result<Self, MonitorError> {
        let bank = build_bank(&config, source)?;
        Ok(Self {
            config,
            bank: Arc::new(bank),
            stats: Arc::new(Mutex::new(PacketStats::default())),
        })
    }

    pub fn bank(&self) -> &Arc<ChannelBank> {
        &self.bank
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Binds the UDP socket named by the config.
    pub async fn bind(&self) -> Result<UdpSocket, MonitorError> {
        let addr = resolve_bind_address(&self.config.bind_address, self.config.port).await?;
        tracing::debug!("binding UDP socket to {addr}");
        UdpSocket::bind(addr)
            .await
            .map_err(|source| MonitorError::BindError {
                address: addr.to_string(),
                source,
            })
    }

    /// Binds the socket and runs until a termination signal arrives.
    pub async fn run(self) -> Result<(), MonitorError> {
        let socket = self.bind().await?;
        let lines = self.config.snmp_agent.then(crate::agent::spawn_stdin_reader);
        self.run_with(socket, lines).await
    }

    /// Runs on an already bound socket. `agent_lines` carries the
    /// pass_persist input when the agent is enabled; its end of stream
    /// shuts the daemon down.
    pub async fn run_with(
        self,
        socket: UdpSocket,
        agent_lines: Option<tokio::sync::mpsc::Receiver<std::io::Result<String>>>,
    ) -> Result<(), MonitorError> {
        let print_table = agent_lines.is_none();
        let interval = self.config.interval();

        let agent = match agent_lines {
            Some(lines) => {
                let mib = ups_mib(&device_info(&self.config), &self.config.channel_numbers())?;
                tracing::debug!("MIB initialized, {} variables", mib.len());
                Some((Agent::new(mib, self.bank.clone(), self.stats.clone()), lines))
            }
            None => None,
        };
        let agent_task = async move {
            match agent {
                Some((mut agent, lines)) => agent.run(lines, tokio::io::stdout()).await,
                None => std::future::pending::<Result<(), MonitorError>>().await,
            }
        };
        tokio::pin!(agent_task);

        let responder = UdpResponder::new(self.bank.clone(), self.stats.clone());
        let udp_task = responder.serve(&socket);
        tokio::pin!(udp_task);

        let mut sigint = signal(SignalKind::interrupt()).map_err(MonitorError::SignalError)?;
        let mut sigterm = signal(SignalKind::terminate()).map_err(MonitorError::SignalError)?;
        let mut sighup = signal(SignalKind::hangup()).map_err(MonitorError::SignalError)?;

        let delay = first_tick_delay(SystemTime::now(), interval, ALIGNMENT_SHIFT);
        tracing::debug!("first cycle in {delay:?}, then every {interval:?}");
        let mut ticker = interval_at(Instant::now() + delay, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        match socket.local_addr() {
            Ok(addr) => tracing::info!("entering main loop, serving on {addr}"),
            Err(_) => tracing::info!("entering main loop"),
        }

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let bank = self.bank.clone();
                    tokio::task::spawn_blocking(move || run_cycle(&bank, print_table));
                }
                result = &mut udp_task => {
                    return result;
                }
                result = &mut agent_task => {
                    result?;
                    tracing::info!("SNMP agent input closed, terminating");
                    break;
                }
                _ = sigint.recv() => {
                    tracing::info!("SIGINT received, terminating");
                    break;
                }
                _ = sigterm.recv() => {
                    tracing::info!("SIGTERM received, terminating");
                    break;
                }
                _ = sighup.recv() => {
                    tracing::info!("SIGHUP received, ignoring");
                }
            }
        }

        tracing::info!("clean-up: {}", responder.stats().summary());
        Ok(())
    }
}

impl std::fmt::Debug for Daemon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Daemon")
            .field("config", &self.config)
            .field("bank", &self.bank)
            .finish()
    }
}
