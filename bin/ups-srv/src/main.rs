// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # ups-srv
//!
//! Raspberry Pi UPS monitoring server and client.
//!
//! ## Usage
//! ```bash
//! # Run the daemon, printing one line per measurement cycle
//! ups-srv serve --minterval 10
//!
//! # Run as a net-snmp pass_persist agent (from snmpd.conf)
//! ups-srv -d /var/log/ups-srv.log serve --snmp-agent
//!
//! # Ask a running daemon for its latest readings
//! ups-srv query --server 192.168.1.20
//!
//! # One local measurement, without a daemon
//! ups-srv status --simulate
//! ```

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "ups-srv",
    about = "Voltage and temperature monitor for a Raspberry Pi UPS board",
    version,
    author
)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging (repeat for more: -v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Append debug-level logs to this file.
    #[arg(short, long, global = true)]
    debug: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the monitoring daemon.
    Serve {
        /// Address to bind the UDP socket to (empty for all interfaces).
        #[arg(short, long)]
        server: Option<String>,

        /// UDP port to listen on.
        #[arg(short, long)]
        port: Option<u16>,

        /// Seconds between measurement cycles.
        #[arg(short, long)]
        minterval: Option<u64>,

        /// Act as a net-snmp pass_persist agent on stdin/stdout.
        #[arg(short = 'a', long)]
        snmp_agent: bool,

        /// Use a simulated ADC instead of /dev/spidev.
        #[arg(long)]
        simulate: bool,
    },

    /// Query a running daemon over UDP.
    Query {
        /// Host running the daemon.
        #[arg(short, long, default_value = "127.0.0.1")]
        server: String,

        /// UDP port of the daemon.
        #[arg(short, long, default_value_t = wire_proto::DEFAULT_PORT)]
        port: u16,

        /// How long to wait for the reply.
        #[arg(long, default_value_t = 2000)]
        timeout_ms: u64,

        /// Ask for the CPU temperature instead of the voltages.
        #[arg(long)]
        temp: bool,

        /// Print the decoded reply as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Run one measurement cycle locally and print the result.
    Status {
        /// Use a simulated ADC instead of /dev/spidev.
        #[arg(long)]
        simulate: bool,
    },

    /// Print the effective configuration as TOML.
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    commands::init_tracing(cli.verbose, cli.debug.as_deref());

    match cli.command {
        Commands::Serve {
            server,
            port,
            minterval,
            snmp_agent,
            simulate,
        } => {
            let overrides = commands::serve::Overrides {
                server,
                port,
                minterval,
                snmp_agent,
            };
            commands::serve::execute(cli.config, overrides, simulate).await
        }
        Commands::Query {
            server,
            port,
            timeout_ms,
            temp,
            json,
        } => commands::query::execute(server, port, timeout_ms, temp, json).await,
        Commands::Status { simulate } => commands::status::execute(cli.config, simulate).await,
        Commands::Config => commands::config::execute(cli.config),
    }
}
