// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `ups-srv query`: ask a running daemon for its latest readings.

use anyhow::{bail, Context};
use std::time::Duration;
use tokio::net::UdpSocket;
use wire_proto::{Reply, Request, RetLast, RetTemp, RECV_BUFSIZE};

pub async fn execute(
    server: String,
    port: u16,
    timeout_ms: u64,
    temp: bool,
    json: bool,
) -> anyhow::Result<()> {
    let request = if temp {
        Request::GetTemp
    } else {
        Request::GetLast
    };

    let socket = UdpSocket::bind(("0.0.0.0", 0)).await?;
    socket
        .connect((server.as_str(), port))
        .await
        .with_context(|| format!("resolving {server}:{port}"))?;
    socket.send(&request.encode()).await?;

    let mut buf = vec![0u8; RECV_BUFSIZE];
    let len = tokio::time::timeout(Duration::from_millis(timeout_ms), socket.recv(&mut buf))
        .await
        .with_context(|| format!("no reply from {server}:{port} within {timeout_ms} ms"))??;
    let reply = Reply::decode(&buf[..len]).context("decoding reply")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&reply)?);
        return Ok(());
    }
    match (request, reply) {
        (Request::GetLast, Reply::Last(last)) => print_last(&last),
        (Request::GetTemp, Reply::Temp(t)) => print_temp(&t),
        (_, other) => bail!("reply does not match request: {other:?}"),
    }
    Ok(())
}

fn print_last(last: &RetLast) {
    println!("Valid:     {}", yes_no(last.valid));
    println!("Started:   {:.6}", last.ts_start);
    println!("Completed: {:.6}", last.ts_complete);
    for ch in &last.channels {
        if ch.valid {
            println!(
                "  CH{}  {:>6} mV  ({:+.2} V)  at {:.6}",
                ch.channel,
                ch.last_mv,
                f64::from(ch.last_mv) / 1000.0,
                ch.ts
            );
        } else {
            println!("  CH{}  n/a", ch.channel);
        }
    }
}

fn print_temp(t: &RetTemp) {
    println!("Valid:       {}", yes_no(t.valid));
    println!("Timestamp:   {:.6}", t.ts);
    println!("Temperature: {:.3} C", f64::from(t.millidegrees) / 1000.0);
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}
