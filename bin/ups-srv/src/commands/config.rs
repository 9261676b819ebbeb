// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `ups-srv config`: print the effective configuration.

use std::path::PathBuf;

pub fn execute(config_path: Option<PathBuf>) -> anyhow::Result<()> {
    let config = super::load_config(config_path.as_deref())?;
    config.validate()?;
    print!("{}", config.to_toml()?);
    Ok(())
}
