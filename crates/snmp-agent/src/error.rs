// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for MIB lookups.

/// Why a GET or GETNEXT produced no binding.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MibError {
    /// The OID text is not a dotted sequence of integers.
    #[error("malformed OID '{0}'")]
    MalformedOid(String),

    /// No variable with this OID.
    #[error("MIB variable with OID {0} does not exist")]
    NotFound(String),

    /// The variable exists but cannot be read.
    #[error("MIB variable with OID {0} is not accessible")]
    NotAccessible(String),

    /// The variable is readable but has no value yet.
    #[error("read of MIB variable with OID {0} returned no value")]
    NoValue(String),

    /// Nothing readable follows the OID.
    #[error("no accessible MIB variable after OID {0}")]
    EndOfMib(String),

    /// Two variables were registered under one OID.
    #[error("duplicate MIB variable OID {0}")]
    Duplicate(String),
}
