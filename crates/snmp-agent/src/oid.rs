// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Object identifiers.
//!
//! OIDs are kept as integer components so that ordering is numeric per
//! component (`.1.10` sorts after `.1.9`) and a proper prefix sorts
//! before everything below it, which is the order GETNEXT walks.

use crate::MibError;
use std::fmt;
use std::str::FromStr;

/// Experimental subtree the UPS MIB lives under: `.1.3.6.1.3.999`.
pub const MIB_BASE: [u32; 6] = [1, 3, 6, 1, 3, 999];

/// A sequence of OID components.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Oid(Vec<u32>);

impl Oid {
    pub fn new(components: impl Into<Vec<u32>>) -> Self {
        Self(components.into())
    }

    /// The MIB base itself.
    pub fn base() -> Self {
        Self(MIB_BASE.to_vec())
    }

    pub fn components(&self) -> &[u32] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Appends components, returning a new OID.
    pub fn child(&self, tail: &[u32]) -> Self {
        let mut components = self.0.clone();
        components.extend_from_slice(tail);
        Self(components)
    }

    /// Returns `true` if `self` equals `prefix` or lies below it.
    pub fn starts_with(&self, prefix: &Oid) -> bool {
        self.0.starts_with(&prefix.0)
    }

    /// Strips the MIB base from a full OID. `None` if not under the base.
    pub fn relative_to_base(&self) -> Option<Oid> {
        self.0
            .strip_prefix(&MIB_BASE[..])
            .map(|rest| Oid(rest.to_vec()))
    }

    /// Prepends the MIB base to a relative OID.
    pub fn under_base(&self) -> Oid {
        Oid::base().child(&self.0)
    }
}

impl FromStr for Oid {
    type Err = MibError;

    /// Parses dotted notation. Leading and trailing dots are ignored and
    /// empty components read as zero.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_matches('.');
        if trimmed.is_empty() {
            return Ok(Oid::default());
        }
        trimmed
            .split('.')
            .map(|part| {
                if part.is_empty() {
                    Ok(0)
                } else if part.bytes().all(|b| b.is_ascii_digit()) {
                    part.parse::<u32>()
                        .map_err(|_| MibError::MalformedOid(s.to_string()))
                } else {
                    Err(MibError::MalformedOid(s.to_string()))
                }
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Oid)
    }
}

impl fmt::Display for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in &self.0 {
            write!(f, ".{c}")?;
        }
        Ok(())
    }
}

impl From<&[u32]> for Oid {
    fn from(components: &[u32]) -> Self {
        Self(components.to_vec())
    }
}
