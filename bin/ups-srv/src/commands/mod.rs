// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Subcommand implementations and shared CLI plumbing.

pub mod config;
pub mod query;
pub mod serve;
pub mod status;

use anyhow::Context;
use monitor::MonitorConfig;
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Installs the global subscriber.
///
/// Console logs go to stderr (stdout carries the table or the SNMP
/// replies). `RUST_LOG` overrides the `-v` level. With `debug_file`, every
/// debug-level event is also appended to that file.
pub fn init_tracing(verbose: u8, debug_file: Option<&Path>) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let console = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(filter);

    let mut open_failure = None;
    let file_layer = debug_file.and_then(|path| {
        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file))
                    .with_filter(LevelFilter::DEBUG),
            ),
            Err(e) => {
                open_failure = Some(format!("{}: {e}", path.display()));
                None
            }
        }
    });

    tracing_subscriber::registry()
        .with(console)
        .with(file_layer)
        .init();

    if let Some(failure) = open_failure {
        tracing::warn!("cannot open debug file {failure}, continuing without it");
    }
}

/// Loads the config file if one was given, defaults otherwise.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<MonitorConfig> {
    match path {
        Some(path) => MonitorConfig::from_file(path)
            .with_context(|| format!("loading configuration from {}", path.display())),
        None => Ok(MonitorConfig::default()),
    }
}
