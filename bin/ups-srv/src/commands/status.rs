// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `ups-srv status` command: one local measurement cycle.
//!
//! Opens the converter directly, so it must not run while a daemon holds
//! the same SPI device.

use std::path::PathBuf;

pub async fn execute(config_path: Option<PathBuf>, simulate: bool) -> anyhow::Result<()> {
    let config = super::load_config(config_path.as_deref())?;
    let source = monitor::open_source(&config, simulate)?;
    let bank = monitor::build_bank(&config, source)?;

    let snapshot = tokio::task::spawn_blocking(move || bank.measure()).await??;

    println!("╔══════════════════════════════════════════════════════╗");
    println!("║              ups-srv · Supply Status                 ║");
    println!("╚══════════════════════════════════════════════════════╝");
    println!();

    // ── Rails ──────────────────────────────────────────────────
    println!("  Rails");
    for ch in &snapshot.channels {
        match (ch.valid, ch.last_mv) {
            (true, Some(mv)) => println!(
                "   CH{} {:<6} {:>6} mV  {}",
                ch.number,
                ch.label,
                mv,
                rail_bar(mv)
            ),
            _ => println!("   CH{} {:<6}    n/a", ch.number, ch.label),
        }
    }
    println!();

    // ── Thermal ────────────────────────────────────────────────
    println!("  Thermal");
    match snapshot.temperature {
        Some(t) => {
            println!("   Temperature:  {:.1} C", t.celsius());
            if t.is_overheating() {
                println!("   WARNING: THERMAL THROTTLING ACTIVE");
            }
        }
        None => println!("   Temperature:  n/a"),
    }
    println!();

    if let Some(d) = snapshot.cycle_duration() {
        println!("  Cycle took {} us", d.as_micros());
    }
    println!("{}", snapshot.summary());

    Ok(())
}

/// Bar over a 0-6 V scale.
fn rail_bar(mv: u32) -> String {
    let filled = ((f64::from(mv) / 6000.0) * 20.0).round() as usize;
    let filled = filled.min(20);
    format!("[{}{}]", "-".repeat(filled), ".".repeat(20 - filled))
}
