// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Daemon configuration loaded from TOML files or built programmatically.
//!
//! # TOML Format
//! ```toml
//! bind_address = ""
//! port = 10000
//! measure_interval_secs = 10
//! snmp_agent = false
//! thermal_zone = "/sys/class/thermal/thermal_zone0/temp"
//!
//! [adc]
//! spi_bus = 0
//! spi_device = 0
//! device_name = "MCP3008 on PCB"
//! vref_mv = 3324
//! r_pullup_ohm = 9920
//! r_pulldown_ohm = 9930
//! samples = 5
//! sample_delta_secs = 0.001
//!
//! [[channels]]
//! number = 0
//! label = "MAIN"
//! ```
//!
//! Every key is optional; missing keys take the values shown above.

use crate::MonitorError;
use sampler::{CycleParams, VoltageDivider};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Converter wiring and sampling parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdcConfig {
    /// SPI bus number (`/dev/spidev{bus}.{device}`).
    pub spi_bus: u8,
    /// Chip select on the bus.
    pub spi_device: u8,
    /// Name published in the MIB device table.
    pub device_name: String,
    /// Voltage on the VREF pin in millivolts.
    pub vref_mv: u32,
    /// Divider pull-up resistor in ohms.
    pub r_pullup_ohm: u32,
    /// Divider pull-down resistor in ohms.
    pub r_pulldown_ohm: u32,
    /// Passes over every channel per cycle.
    pub samples: u32,
    /// Pause between passes in seconds.
    pub sample_delta_secs: f64,
}

impl AdcConfig {
    pub fn divider(&self) -> VoltageDivider {
        VoltageDivider {
            vref_mv: self.vref_mv,
            r_pullup_ohm: self.r_pullup_ohm,
            r_pulldown_ohm: self.r_pulldown_ohm,
        }
    }

    /// Cycle parameters with the divider factor applied.
    pub fn cycle_params(&self) -> Result<CycleParams, MonitorError> {
        let factor = self.divider().factor().ok_or_else(|| {
            MonitorError::ConfigError("adc.r_pulldown_ohm must be non-zero".into())
        })?;
        let delta = Duration::try_from_secs_f64(self.sample_delta_secs).map_err(|e| {
            MonitorError::ConfigError(format!(
                "adc.sample_delta_secs {} is not a valid duration: {e}",
                self.sample_delta_secs
            ))
        })?;
        Ok(CycleParams {
            samples: self.samples,
            delta,
            factor,
        })
    }
}

impl Default for AdcConfig {
    fn default() -> Self {
        Self {
            spi_bus: 0,
            spi_device: 0,
            device_name: "MCP3008 on PCB".to_string(),
            vref_mv: sampler::VREF_MV,
            r_pullup_ohm: sampler::R_PULLUP_OHM,
            r_pulldown_ohm: sampler::R_PULLDOWN_OHM,
            samples: sampler::DEFAULT_SAMPLES,
            sample_delta_secs: sampler::DEFAULT_DELTA.as_secs_f64(),
        }
    }
}

/// One monitored input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelConfig {
    /// MCP3008 input number, `0..=7`.
    pub number: u8,
    /// Rail name shown in the table and the MIB.
    pub label: String,
}

impl ChannelConfig {
    pub fn new(number: u8, label: &str) -> Self {
        Self {
            number,
            label: label.to_string(),
        }
    }
}

/// Configuration for the monitoring daemon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Host name or address to bind to; empty binds all IPv4 interfaces.
    pub bind_address: String,
    /// UDP port.
    pub port: u16,
    /// Seconds between measurement cycles.
    pub measure_interval_secs: u64,
    /// Act as a net-snmp pass_persist agent on stdin/stdout.
    pub snmp_agent: bool,
    /// Thermal zone holding the die temperature; `None` disables it.
    pub thermal_zone: Option<PathBuf>,
    /// Converter settings.
    pub adc: AdcConfig,
    /// Monitored inputs.
    pub channels: Vec<ChannelConfig>,
}

impl MonitorConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, MonitorError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            MonitorError::ConfigError(format!("cannot read config '{}': {e}", path.display()))
        })?;
        Self::from_toml(&content)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, MonitorError> {
        toml::from_str(toml_str)
            .map_err(|e| MonitorError::ConfigError(format!("TOML parse error: {e}")))
    }

    /// Serialises configuration to TOML.
    pub fn to_toml(&self) -> Result<String, MonitorError> {
        toml::to_string_pretty(self)
            .map_err(|e| MonitorError::ConfigError(format!("TOML serialise error: {e}")))
    }

    /// Interval between measurement cycles.
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.measure_interval_secs)
    }

    /// Checks values that deserialisation alone cannot.
    pub fn validate(&self) -> Result<(), MonitorError> {
        if self.measure_interval_secs == 0 {
            return Err(MonitorError::ConfigError(
                "measure_interval_secs must be at least 1".into(),
            ));
        }
        if self.channels.is_empty() {
            return Err(MonitorError::ConfigError("no channels configured".into()));
        }

        let mut seen = BTreeSet::new();
        for ch in &self.channels {
            if ch.number >= mcp3008::CHANNEL_COUNT {
                return Err(MonitorError::ConfigError(format!(
                    "channel {} ({}) out of range 0..=7",
                    ch.number, ch.label
                )));
            }
            if !seen.insert(ch.number) {
                return Err(MonitorError::ConfigError(format!(
                    "channel {} configured twice",
                    ch.number
                )));
            }
        }

        self.adc.cycle_params()?.validate()?;
        Ok(())
    }

    /// Channel numbers in ascending order.
    pub fn channel_numbers(&self) -> Vec<u8> {
        let set: BTreeSet<u8> = self.channels.iter().map(|c| c.number).collect();
        set.into_iter().collect()
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            bind_address: String::new(),
            port: wire_proto::DEFAULT_PORT,
            measure_interval_secs: sampler::schedule::DEFAULT_INTERVAL.as_secs(),
            snmp_agent: false,
            thermal_zone: Some(PathBuf::from(sampler::THERMAL_ZONE_PATH)),
            adc: AdcConfig::default(),
            channels: vec![
                ChannelConfig::new(0, "MAIN"),
                ChannelConfig::new(1, "REG"),
                ChannelConfig::new(2, "BAT"),
                ChannelConfig::new(3, "+5V"),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let c = MonitorConfig::default();
        assert_eq!(c.port, 10000);
        assert_eq!(c.measure_interval_secs, 10);
        assert!(!c.snmp_agent);
        assert_eq!(c.channel_numbers(), vec![0, 1, 2, 3]);
        c.validate().unwrap();
    }

    #[test]
    fn test_from_toml_partial() {
        let toml = r#"
port = 10500
measure_interval_secs = 30

[adc]
samples = 8

[[channels]]
number = 2
label = "BAT"
"#;
        let c = MonitorConfig::from_toml(toml).unwrap();
        assert_eq!(c.port, 10500);
        assert_eq!(c.interval(), Duration::from_secs(30));
        assert_eq!(c.adc.samples, 8);
        assert_eq!(c.adc.vref_mv, 3324);
        assert_eq!(c.channels, vec![ChannelConfig::new(2, "BAT")]);
    }

    #[test]
    fn test_to_toml_roundtrip() {
        let c = MonitorConfig::default();
        let toml = c.to_toml().unwrap();
        let back = MonitorConfig::from_toml(&toml).unwrap();
        assert_eq!(back, c);
    }

    #[test]
    fn test_cycle_params() {
        let p = AdcConfig::default().cycle_params().unwrap();
        assert_eq!(p.samples, 5);
        assert_eq!(p.delta, Duration::from_millis(1));
        assert!((p.factor - 6644.65).abs() < 0.01);
    }

    #[test]
    fn test_validate_rejects() {
        let mut c = MonitorConfig::default();
        c.measure_interval_secs = 0;
        assert!(c.validate().is_err());

        let mut c = MonitorConfig::default();
        c.channels.push(ChannelConfig::new(1, "DUP"));
        assert!(c.validate().is_err());

        let mut c = MonitorConfig::default();
        c.channels = vec![ChannelConfig::new(8, "X")];
        assert!(c.validate().is_err());

        let mut c = MonitorConfig::default();
        c.adc.r_pulldown_ohm = 0;
        assert!(c.validate().is_err());

        let mut c = MonitorConfig::default();
        c.adc.sample_delta_secs = -0.5;
        assert!(c.validate().is_err());

        let mut c = MonitorConfig::default();
        c.adc.samples = 0;
        assert!(c.validate().is_err());
    }

    #[test]
    fn test_bad_toml() {
        assert!(matches!(
            MonitorConfig::from_toml("port = \"ten\""),
            Err(MonitorError::ConfigError(_))
        ));
    }
}
