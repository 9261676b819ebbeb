// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The UPS monitor MIB.
//!
//! ```text
//! .1.3.6.1.3.999            snGroup
//!   .1                      snAdc
//!     .1.0                  snAdcDevNumber
//!     .2.1.{col}.1          devSpiPort devSpiDevice devType devName devChanNumber
//!     .3.0                  snAdcStatsNumber
//!     .4.1.{col}.1          statsValid statsTsStart statsTsComplete
//!     .5.0                  snAdcChanNumber
//!     .6.1.{col}.1.1.{n+1}  chanNumber chanName chanValid chanLast chanTs
//!   .2                      snTemp
//!     .1.0 .2.0 .3.0        tempValid tempCpu tempTs
//!   .3                      snProto
//!     .{1..9}.0             packet counters
//! ```

use crate::{Mib, MibError, MibValue, MibVar, MibView, Oid, Syntax};

/// `devType` value of an MCP3008.
pub const DEVTYPE_MCP3008: i64 = 1;

/// Static description of the converter, published in the device table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    pub spi_port: u8,
    pub spi_device: u8,
    pub name: String,
    /// Channels configured on the device.
    pub channel_count: usize,
}

/// Protocol counter names in `PacketStats::counters` order.
const PROTO_COUNTERS: [&str; 9] = [
    "inPktsTotal",
    "inPktsValid",
    "inPktsBad",
    "inPktsBadVer",
    "inPktsBadLen",
    "inPktsBadCmd",
    "outPktsTotal",
    "outPktsSuccess",
    "outPktsFailed",
];

fn rel(components: &[u32]) -> Oid {
    Oid::from(components)
}

/// Builds the MIB for `device` and the given channel numbers.
pub fn ups_mib(device: &DeviceInfo, channels: &[u8]) -> Result<Mib, MibError> {
    let mut vars = vec![
        MibVar::node("snGroup", Oid::default()),
        MibVar::node("snAdc", rel(&[1])),
    ];

    // Device table: a single MCP3008.
    vars.push(MibVar::read_only("snAdcDevNumber", rel(&[1, 1, 0]), Syntax::Integer, |_| {
        Some(MibValue::Int(1))
    }));
    vars.push(MibVar::node("snAdcDevTable", rel(&[1, 2])));
    vars.push(MibVar::node("snAdcDevEntry", rel(&[1, 2, 1])));
    let port = i64::from(device.spi_port);
    let dev = i64::from(device.spi_device);
    let name = device.name.clone();
    let count = device.channel_count as i64;
    vars.push(MibVar::read_only("devSpiPort", rel(&[1, 2, 1, 1, 1]), Syntax::Integer, move |_| {
        Some(MibValue::Int(port))
    }));
    vars.push(MibVar::read_only("devSpiDevice", rel(&[1, 2, 1, 2, 1]), Syntax::Integer, move |_| {
        Some(MibValue::Int(dev))
    }));
    vars.push(MibVar::read_only("devType", rel(&[1, 2, 1, 3, 1]), Syntax::Integer, |_| {
        Some(MibValue::Int(DEVTYPE_MCP3008))
    }));
    vars.push(MibVar::read_only("devName", rel(&[1, 2, 1, 4, 1]), Syntax::OctetString, move |_| {
        Some(MibValue::Str(name.clone()))
    }));
    vars.push(MibVar::read_only("devChanNumber", rel(&[1, 2, 1, 5, 1]), Syntax::Integer, move |_| {
        Some(MibValue::Int(count))
    }));

    // Statistics table: one block for the single cycle stream.
    vars.push(MibVar::read_only("snAdcStatsNumber", rel(&[1, 3, 0]), Syntax::Integer, |_| {
        Some(MibValue::Int(1))
    }));
    vars.push(MibVar::node("snAdcStatsTable", rel(&[1, 4])));
    vars.push(MibVar::node("snAdcStatsEntry", rel(&[1, 4, 1])));
    vars.push(MibVar::read_only("statsValid", rel(&[1, 4, 1, 1, 1]), Syntax::Integer, |v| {
        Some(MibValue::flag(v.snapshot.valid))
    }));
    vars.push(MibVar::read_only("statsTsStart", rel(&[1, 4, 1, 2, 1]), Syntax::TimeTicks, |v| {
        MibValue::timeticks(v.snapshot.started)
    }));
    vars.push(MibVar::read_only("statsTsComplete", rel(&[1, 4, 1, 3, 1]), Syntax::TimeTicks, |v| {
        MibValue::timeticks(v.snapshot.completed)
    }));

    // Channel table.
    vars.push(MibVar::read_only("snAdcChanNumber", rel(&[1, 5, 0]), Syntax::Integer, |v| {
        Some(MibValue::Int(v.snapshot.channels.len() as i64))
    }));
    vars.push(MibVar::node("snAdcChanTable", rel(&[1, 6])));
    vars.push(MibVar::node("snAdcChanEntry", rel(&[1, 6, 1])));
    for &n in channels {
        let index = u32::from(n) + 1;
        let col = |c: u32| rel(&[1, 6, 1, c, 1, 1, index]);
        vars.push(MibVar::read_only("chanNumber", col(1), Syntax::Integer, move |_| {
            Some(MibValue::Int(i64::from(n)))
        }));
        vars.push(MibVar::read_only("chanName", col(2), Syntax::OctetString, move |v| {
            v.snapshot.channel(n).map(|c| MibValue::Str(c.label.clone()))
        }));
        vars.push(MibVar::read_only("chanValid", col(3), Syntax::Integer, move |v| {
            v.snapshot.channel(n).map(|c| MibValue::flag(c.valid))
        }));
        vars.push(MibVar::read_only("chanLast", col(4), Syntax::Gauge32, move |v| {
            let mv = v.snapshot.channel(n)?.last_mv?;
            Some(MibValue::Unsigned(u64::from(mv)))
        }));
        vars.push(MibVar::read_only("chanTs", col(5), Syntax::TimeTicks, move |v| {
            MibValue::timeticks(v.snapshot.channel(n)?.timestamp)
        }));
    }

    // Die temperature.
    vars.push(MibVar::node("snTemp", rel(&[2])));
    vars.push(MibVar::read_only("tempValid", rel(&[2, 1, 0]), Syntax::Integer, |v| {
        Some(MibValue::flag(v.snapshot.temperature.is_some()))
    }));
    vars.push(MibVar::read_only("tempCpu", rel(&[2, 2, 0]), Syntax::Integer, |v| {
        v.snapshot
            .temperature
            .map(|t| MibValue::Int(i64::from(t.millidegrees)))
    }));
    vars.push(MibVar::read_only("tempTs", rel(&[2, 3, 0]), Syntax::TimeTicks, |v| {
        MibValue::timeticks(v.snapshot.temperature.map(|t| t.timestamp))
    }));

    // UDP protocol counters.
    vars.push(MibVar::node("snProto", rel(&[3])));
    for (i, &name) in PROTO_COUNTERS.iter().enumerate() {
        vars.push(MibVar::read_only(
            name,
            rel(&[3, i as u32 + 1, 0]),
            Syntax::Counter32,
            move |v: &MibView<'_>| Some(MibValue::counter32(v.stats.counters()[i])),
        ));
    }

    Mib::new(vars)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sampler::{ChannelReading, Snapshot, ThermalInfo};
    use std::time::{Duration, UNIX_EPOCH};
    use wire_proto::PacketStats;

    fn device() -> DeviceInfo {
        DeviceInfo {
            spi_port: 0,
            spi_device: 0,
            name: "MCP3008 on PCB".into(),
            channel_count: 4,
        }
    }

    fn snapshot() -> Snapshot {
        let ts = UNIX_EPOCH + Duration::from_secs(1000);
        Snapshot {
            valid: true,
            started: Some(ts),
            completed: Some(ts + Duration::from_millis(20)),
            channels: ["MAIN", "REG", "BAT", "+5V"]
                .iter()
                .enumerate()
                .map(|(i, label)| ChannelReading {
                    number: i as u8,
                    label: label.to_string(),
                    valid: i != 3,
                    last_mv: (i != 3).then_some(5000 + i as u32),
                    timestamp: (i != 3).then_some(ts),
                })
                .collect(),
            temperature: Some(ThermalInfo {
                millidegrees: 45_600,
                timestamp: ts,
            }),
        }
    }

    fn get(mib: &Mib, rel: &str) -> Option<String> {
        let snap = snapshot();
        let mut stats = PacketStats::default();
        stats.record_valid();
        stats.record_valid();
        let view = MibView {
            snapshot: &snap,
            stats: &stats,
        };
        mib.get(&format!(".1.3.6.1.3.999{rel}"), &view)
            .ok()
            .map(|b| format!("{} {}", b.syntax.pass_type(), b.value))
    }

    #[test]
    fn test_variable_count() {
        let mib = ups_mib(&device(), &[0, 1, 2, 3]).unwrap();
        // 2 roots, 8 device, 6 stats, 3 + 4*5 channel, 4 temp, 10 proto.
        assert_eq!(mib.len(), 2 + 8 + 6 + 23 + 4 + 10);
    }

    #[test]
    fn test_device_table() {
        let mib = ups_mib(&device(), &[0, 1, 2, 3]).unwrap();
        assert_eq!(get(&mib, ".1.1.0").as_deref(), Some("integer 1"));
        assert_eq!(get(&mib, ".1.2.1.3.1").as_deref(), Some("integer 1"));
        assert_eq!(get(&mib, ".1.2.1.4.1").as_deref(), Some("string MCP3008 on PCB"));
        assert_eq!(get(&mib, ".1.2.1.5.1").as_deref(), Some("integer 4"));
    }

    #[test]
    fn test_stats_table() {
        let mib = ups_mib(&device(), &[0]).unwrap();
        assert_eq!(get(&mib, ".1.4.1.1.1").as_deref(), Some("integer 1"));
        assert_eq!(get(&mib, ".1.4.1.2.1").as_deref(), Some("timeticks 100000"));
        assert_eq!(get(&mib, ".1.4.1.3.1").as_deref(), Some("timeticks 100002"));
    }

    #[test]
    fn test_channel_columns() {
        let mib = ups_mib(&device(), &[0, 1, 2, 3]).unwrap();
        assert_eq!(get(&mib, ".1.5.0").as_deref(), Some("integer 4"));
        // Channel 2 is row index 3.
        assert_eq!(get(&mib, ".1.6.1.1.1.1.3").as_deref(), Some("integer 2"));
        assert_eq!(get(&mib, ".1.6.1.2.1.1.3").as_deref(), Some("string BAT"));
        assert_eq!(get(&mib, ".1.6.1.3.1.1.3").as_deref(), Some("integer 1"));
        assert_eq!(get(&mib, ".1.6.1.4.1.1.3").as_deref(), Some("gauge 5002"));
        assert_eq!(get(&mib, ".1.6.1.5.1.1.3").as_deref(), Some("timeticks 100000"));
    }

    #[test]
    fn test_unmeasured_channel_has_no_value() {
        let mib = ups_mib(&device(), &[0, 1, 2, 3]).unwrap();
        assert_eq!(get(&mib, ".1.6.1.3.1.1.4").as_deref(), Some("integer 0"));
        assert_eq!(get(&mib, ".1.6.1.4.1.1.4"), None);
        assert_eq!(get(&mib, ".1.6.1.5.1.1.4"), None);
    }

    #[test]
    fn test_temperature_and_counters() {
        let mib = ups_mib(&device(), &[0]).unwrap();
        assert_eq!(get(&mib, ".2.1.0").as_deref(), Some("integer 1"));
        assert_eq!(get(&mib, ".2.2.0").as_deref(), Some("integer 45600"));
        assert_eq!(get(&mib, ".3.1.0").as_deref(), Some("counter 2"));
        assert_eq!(get(&mib, ".3.2.0").as_deref(), Some("counter 2"));
        assert_eq!(get(&mib, ".3.9.0").as_deref(), Some("counter 0"));
    }

    #[test]
    fn test_walk_order_is_column_major() {
        let mib = ups_mib(&device(), &[0, 1]).unwrap();
        let chan: Vec<_> = mib
            .iter()
            .filter(|v| v.name().starts_with("chan"))
            .map(|v| v.name())
            .collect();
        assert_eq!(
            chan,
            vec![
                "chanNumber", "chanNumber", "chanName", "chanName", "chanValid", "chanValid",
                "chanLast", "chanLast", "chanTs", "chanTs",
            ]
        );
    }
}
