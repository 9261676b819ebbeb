// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `ups-srv serve`: run the daemon until SIGINT/SIGTERM.

use anyhow::Context;
use monitor::{Daemon, MonitorConfig};
use std::path::PathBuf;

/// Command-line values that take precedence over the config file.
#[derive(Debug, Default)]
pub struct Overrides {
    pub server: Option<String>,
    pub port: Option<u16>,
    pub minterval: Option<u64>,
    pub snmp_agent: bool,
}

impl Overrides {
    fn apply(self, config: &mut MonitorConfig) {
        if let Some(server) = self.server {
            config.bind_address = server;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(secs) = self.minterval {
            config.measure_interval_secs = secs;
        }
        if self.snmp_agent {
            config.snmp_agent = true;
        }
    }
}

pub async fn execute(
    config_path: Option<PathBuf>,
    overrides: Overrides,
    simulate: bool,
) -> anyhow::Result<()> {
    let mut config = super::load_config(config_path.as_deref())?;
    overrides.apply(&mut config);
    tracing::debug!("effective configuration: {config:?}");

    let source = monitor::open_source(&config, simulate).context("opening ADC")?;
    let daemon = Daemon::new(config, source).context("initializing daemon")?;
    daemon.run().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_replace_config_values() {
        let mut config = MonitorConfig::default();
        Overrides {
            server: Some("127.0.0.1".into()),
            port: Some(10001),
            minterval: Some(30),
            snmp_agent: true,
        }
        .apply(&mut config);
        assert_eq!(config.bind_address, "127.0.0.1");
        assert_eq!(config.port, 10001);
        assert_eq!(config.measure_interval_secs, 30);
        assert!(config.snmp_agent);
    }

    #[test]
    fn test_empty_overrides_keep_config() {
        let mut config = MonitorConfig {
            snmp_agent: true,
            ..Default::default()
        };
        Overrides::default().apply(&mut config);
        assert_eq!(config, MonitorConfig {
            snmp_agent: true,
            ..Default::default()
        });
    }
}
