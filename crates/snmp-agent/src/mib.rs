// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! MIB variables and the sorted variable table.

use crate::{MibError, Oid};
use sampler::Snapshot;
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};
use wire_proto::PacketStats;

/// SMI MAX-ACCESS clause, ordered from least to most permissive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Access {
    NotAccessible,
    AccessibleForNotify,
    ReadOnly,
    ReadWrite,
    ReadCreate,
}

impl Access {
    pub fn is_readable(self) -> bool {
        self >= Access::ReadOnly
    }
}

/// SMI SYNTAX of a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Syntax {
    Integer,
    OctetString,
    ObjectIdentifier,
    Bits,
    IpAddress,
    Counter32,
    Gauge32,
    TimeTicks,
    Counter64,
    Unsigned32,
    Sequence,
}

impl Syntax {
    /// Type keyword used on the pass_persist channel.
    pub fn pass_type(self) -> &'static str {
        match self {
            Syntax::Integer | Syntax::Bits | Syntax::Unsigned32 => "integer",
            Syntax::OctetString | Syntax::Sequence => "string",
            Syntax::ObjectIdentifier => "objectid",
            Syntax::IpAddress => "ipaddress",
            Syntax::Counter32 | Syntax::Counter64 => "counter",
            Syntax::Gauge32 => "gauge",
            Syntax::TimeTicks => "timeticks",
        }
    }
}

/// A variable value as written on the pass_persist channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MibValue {
    Int(i64),
    Unsigned(u64),
    Str(String),
}

impl fmt::Display for MibValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MibValue::Int(v) => write!(f, "{v}"),
            MibValue::Unsigned(v) => write!(f, "{v}"),
            MibValue::Str(s) => f.write_str(s),
        }
    }
}

impl MibValue {
    pub fn flag(b: bool) -> Self {
        MibValue::Int(i64::from(b))
    }

    /// 32-bit counter value; wraps like the SNMP type does.
    pub fn counter32(v: u64) -> Self {
        MibValue::Unsigned(v & u64::from(u32::MAX))
    }

    /// Unix time in hundredths of a second, wrapped to 32 bits.
    /// `None` before the timestamp exists.
    pub fn timeticks(t: Option<SystemTime>) -> Option<Self> {
        let secs = t?.duration_since(UNIX_EPOCH).ok()?.as_secs_f64();
        let ticks = (secs * 100.0).round() as u64;
        Some(MibValue::Unsigned(ticks & u64::from(u32::MAX)))
    }
}

/// Live data that value handlers read from.
#[derive(Debug, Clone, Copy)]
pub struct MibView<'a> {
    pub snapshot: &'a Snapshot,
    pub stats: &'a PacketStats,
}

type Handler = Box<dyn Fn(&MibView<'_>) -> Option<MibValue> + Send + Sync>;

/// One variable of the MIB.
pub struct MibVar {
    name: &'static str,
    oid: Oid,
    access: Access,
    syntax: Syntax,
    handler: Option<Handler>,
}

impl MibVar {
    /// A structural node (table, entry, group): not accessible, no value.
    pub fn node(name: &'static str, oid: Oid) -> Self {
        Self {
            name,
            oid,
            access: Access::NotAccessible,
            syntax: Syntax::ObjectIdentifier,
            handler: None,
        }
    }

    /// A read-only scalar or column instance.
    pub fn read_only<F>(name: &'static str, oid: Oid, syntax: Syntax, handler: F) -> Self
    where
        F: Fn(&MibView<'_>) -> Option<MibValue> + Send + Sync + 'static,
    {
        Self {
            name,
            oid,
            access: Access::ReadOnly,
            syntax,
            handler: Some(Box::new(handler)),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// OID relative to the MIB base.
    pub fn oid(&self) -> &Oid {
        &self.oid
    }

    pub fn access(&self) -> Access {
        self.access
    }

    pub fn syntax(&self) -> Syntax {
        self.syntax
    }

    /// Current value, or `None` when not readable or not yet known.
    pub fn value(&self, view: &MibView<'_>) -> Option<MibValue> {
        if !self.access.is_readable() {
            return None;
        }
        self.handler.as_ref().and_then(|h| h(view))
    }
}

impl fmt::Debug for MibVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MibVar")
            .field("name", &self.name)
            .field("oid", &self.oid.to_string())
            .field("access", &self.access)
            .field("syntax", &self.syntax)
            .finish()
    }
}

/// A variable bound to its full OID and current value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub oid: Oid,
    pub syntax: Syntax,
    pub value: MibValue,
}

impl Binding {
    /// The three-line pass_persist reply.
    pub fn to_reply(&self) -> String {
        format!("{}\n{}\n{}\n", self.oid, self.syntax.pass_type(), self.value)
    }
}

/// Variables sorted by OID.
#[derive(Debug)]
pub struct Mib {
    vars: Vec<MibVar>,
}

impl Mib {
    /// Sorts `vars` and rejects duplicate OIDs.
    pub fn new(mut vars: Vec<MibVar>) -> Result<Self, MibError> {
        vars.sort_by(|a, b| a.oid.cmp(&b.oid));
        if let Some(pair) = vars.windows(2).find(|w| w[0].oid == w[1].oid) {
            return Err(MibError::Duplicate(pair[0].oid.to_string()));
        }
        Ok(Self { vars })
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Variables in OID order.
    pub fn iter(&self) -> impl Iterator<Item = &MibVar> {
        self.vars.iter()
    }

    /// Exact lookup by relative OID.
    pub fn find(&self, oid: &Oid) -> Option<&MibVar> {
        self.vars
            .binary_search_by(|v| v.oid.cmp(oid))
            .ok()
            .map(|i| &self.vars[i])
    }

    /// GET: the variable at exactly `full_oid`.
    pub fn get(&self, full_oid: &str, view: &MibView<'_>) -> Result<Binding, MibError> {
        let full: Oid = full_oid.parse()?;
        let var = full
            .relative_to_base()
            .and_then(|rel| self.find(&rel))
            .ok_or_else(|| MibError::NotFound(full_oid.to_string()))?;

        if !var.access.is_readable() {
            return Err(MibError::NotAccessible(full_oid.to_string()));
        }
        let value = var
            .value(view)
            .ok_or_else(|| MibError::NoValue(full_oid.to_string()))?;
        Ok(Binding {
            oid: full,
            syntax: var.syntax,
            value,
        })
    }

    /// GETNEXT: the first readable variable with a value strictly after
    /// `full_oid`.
    ///
    /// OIDs ordered before the MIB base start at the first variable; OIDs
    /// after the whole subtree have no successor.
    pub fn get_next(&self, full_oid: &str, view: &MibView<'_>) -> Result<Binding, MibError> {
        let full: Oid = full_oid.parse()?;
        let start = match full.relative_to_base() {
            Some(rel) => self.vars.partition_point(|v| v.oid <= rel),
            None if full < Oid::base() => 0,
            None => self.vars.len(),
        };

        self.vars[start..]
            .iter()
            .filter(|v| v.access.is_readable())
            .find_map(|v| {
                v.value(view).map(|value| Binding {
                    oid: v.oid.under_base(),
                    syntax: v.syntax,
                    value,
                })
            })
            .ok_or_else(|| MibError::EndOfMib(full_oid.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn oid(s: &str) -> Oid {
        s.parse().unwrap()
    }

    fn sample_mib() -> Mib {
        Mib::new(vec![
            MibVar::read_only("b", oid(".1.2.0"), Syntax::Integer, |_| Some(MibValue::Int(2))),
            MibVar::node("root", Oid::default()),
            MibVar::node("grp", oid(".1")),
            MibVar::read_only("a", oid(".1.1.0"), Syntax::OctetString, |_| {
                Some(MibValue::Str("x".into()))
            }),
            MibVar::read_only("empty", oid(".1.3.0"), Syntax::Gauge32, |_| None),
            MibVar::read_only("valid", oid(".1.10.0"), Syntax::Integer, |v| {
                Some(MibValue::flag(v.snapshot.valid))
            }),
        ])
        .unwrap()
    }

    fn with_view<R>(f: impl FnOnce(&MibView<'_>) -> R) -> R {
        let snapshot = Snapshot::default();
        let stats = PacketStats::default();
        f(&MibView {
            snapshot: &snapshot,
            stats: &stats,
        })
    }

    #[test]
    fn test_sorted() {
        let mib = sample_mib();
        let names: Vec<_> = mib.iter().map(|v| v.name()).collect();
        assert_eq!(names, vec!["root", "grp", "a", "b", "empty", "valid"]);
    }

    #[test]
    fn test_duplicate_rejected() {
        let err = Mib::new(vec![MibVar::node("x", oid(".1")), MibVar::node("y", oid(".1"))]);
        assert!(matches!(err, Err(MibError::Duplicate(_))));
    }

    #[test]
    fn test_get() {
        let mib = sample_mib();
        with_view(|view| {
            let b = mib.get(".1.3.6.1.3.999.1.2.0", view).unwrap();
            assert_eq!(b.value, MibValue::Int(2));
            assert_eq!(b.to_reply(), ".1.3.6.1.3.999.1.2.0\ninteger\n2\n");
        });
    }

    #[test]
    fn test_get_failures() {
        let mib = sample_mib();
        with_view(|view| {
            assert!(matches!(mib.get(".1.3.6.1.3.999.1", view), Err(MibError::NotAccessible(_))));
            assert!(matches!(mib.get(".1.3.6.1.3.999.1.3.0", view), Err(MibError::NoValue(_))));
            assert!(matches!(mib.get(".1.3.6.1.3.999.1.9.0", view), Err(MibError::NotFound(_))));
            assert!(matches!(mib.get(".1.3.6.1.2.1", view), Err(MibError::NotFound(_))));
            assert!(matches!(mib.get(".1.x", view), Err(MibError::MalformedOid(_))));
        });
    }

    #[test]
    fn test_get_next_walk() {
        let mib = sample_mib();
        with_view(|view| {
            let mut walked = Vec::new();
            let mut cursor = ".1.3.6.1.3.999".to_string();
            while let Ok(b) = mib.get_next(&cursor, view) {
                cursor = b.oid.to_string();
                walked.push(cursor.clone());
            }
            // Nodes and the valueless gauge are skipped.
            assert_eq!(
                walked,
                vec![
                    ".1.3.6.1.3.999.1.1.0",
                    ".1.3.6.1.3.999.1.2.0",
                    ".1.3.6.1.3.999.1.10.0",
                ]
            );
        });
    }

    #[test]
    fn test_get_next_from_missing_oid() {
        let mib = sample_mib();
        with_view(|view| {
            let b = mib.get_next(".1.3.6.1.3.999.1.1.5", view).unwrap();
            assert_eq!(b.oid, oid(".1.3.6.1.3.999.1.2.0"));
            let b = mib.get_next(".1.3.6.1.3.999.1.4", view).unwrap();
            assert_eq!(b.oid, oid(".1.3.6.1.3.999.1.10.0"));
        });
    }

    #[test]
    fn test_get_next_outside_base() {
        let mib = sample_mib();
        with_view(|view| {
            let b = mib.get_next(".1.3.6.1.2", view).unwrap();
            assert_eq!(b.oid, oid(".1.3.6.1.3.999.1.1.0"));
            assert!(matches!(mib.get_next(".1.3.6.1.4", view), Err(MibError::EndOfMib(_))));
            assert!(matches!(
                mib.get_next(".1.3.6.1.3.999.1.10.0", view),
                Err(MibError::EndOfMib(_))
            ));
        });
    }

    #[test]
    fn test_timeticks() {
        let t = UNIX_EPOCH + Duration::from_millis(12_346);
        assert_eq!(MibValue::timeticks(Some(t)), Some(MibValue::Unsigned(1235)));
        assert_eq!(MibValue::timeticks(None), None);
        // 2^32 hundredths later wraps back.
        let wrapped = t + Duration::from_secs(42_949_672) + Duration::from_millis(960);
        assert_eq!(MibValue::timeticks(Some(wrapped)), Some(MibValue::Unsigned(1235)));
    }

    #[test]
    fn test_pass_types() {
        assert_eq!(Syntax::Counter64.pass_type(), "counter");
        assert_eq!(Syntax::Bits.pass_type(), "integer");
        assert_eq!(Syntax::TimeTicks.pass_type(), "timeticks");
        assert_eq!(Syntax::Sequence.pass_type(), "string");
    }
}
