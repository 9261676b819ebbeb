// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # snmp-agent
//!
//! Exposes the UPS monitor under `.1.3.6.1.3.999` to net-snmp through the
//! `pass_persist` extension:
//!
//! ```text
//! pass_persist .1.3.6.1.3.999 /usr/local/bin/ups-srv serve --snmp-agent
//! ```
//!
//! The [`Mib`] is a sorted table of [`MibVar`]s whose values are computed
//! on demand from a [`MibView`] (latest snapshot plus packet counters).
//! [`PassPersist`] drives the line protocol over it.

mod error;
mod mib;
mod oid;
mod session;
mod tree;

pub use error::MibError;
pub use mib::{Access, Binding, Mib, MibValue, MibVar, MibView, Syntax};
pub use oid::{Oid, MIB_BASE};
pub use session::{PassPersist, NONE_REPLY, NOT_WRITABLE_REPLY, PONG_REPLY};
pub use tree::{ups_mib, DeviceInfo, DEVTYPE_MCP3008};
