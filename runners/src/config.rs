// This file is part of ecpflash, a flash runner for ecpprog-programmed FPGA boards.
//
// Copyright 2025 The ecpflash Authors
//
// SPDX-License-Identifier: GPL-3.0-only
//
// ecpflash is free software: you can redistribute it and/or modify it under the terms of the GNU General Public License version 3, as published by the Free Software Foundation.
//
// ecpflash is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranties of MERCHANTABILITY, SATISFACTORY QUALITY, or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with this program.  If not, see http://www.gnu.org/licenses/.

//! Runner configuration.
//!
//! Two sources feed a flashing run:
//! - [`build_configuration`]: the Kconfig output of the build being flashed, which supplies
//!   the flash load offset.
//! - Layered TOML files holding runner defaults. A file passed explicitly overrides the user
//!   config in `/etc/ecpflash/config.toml`, which overrides the vendor config in
//!   `/usr/lib/ecpflash/config.toml`, which overrides the hardcoded defaults of each runner.
//!   Command line flags override all of them.

pub mod build_configuration;
pub mod config_files;

use crate::config::config_files::{HookSection, MpremoteSection, TomlConfig, config_from_file};
use crate::error::FlashError;
use log::{trace, warn};
use std::path::Path;

pub static VENDOR_CONFIG_PATH: &str = "/usr/lib/ecpflash/config.toml";
pub static USER_CONFIG_PATH: &str = "/etc/ecpflash/config.toml";

/// Merged defaults for both runners.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunnerConfig {
    pub hook: HookSection,
    pub mpremote: MpremoteSection,
}

impl RunnerConfig {
    pub fn merge(self, fallback: RunnerConfig) -> RunnerConfig {
        RunnerConfig {
            hook: self.hook.merge(fallback.hook),
            mpremote: self.mpremote.merge(fallback.mpremote),
        }
    }
}

impl From<TomlConfig> for RunnerConfig {
    fn from(value: TomlConfig) -> Self {
        let (hook, mpremote) = value.into_sections();
        RunnerConfig { hook, mpremote }
    }
}

fn optional_layer(path: &Path) -> RunnerConfig {
    config_from_file(path).map_or_else(
        |e| {
            warn!("Skipping config layer {path:?}: {e}");
            RunnerConfig::default()
        },
        RunnerConfig::from,
    )
}

/// Load and merge the system config layers, with `explicit` on top.
///
/// The system layers are optional. A file named explicitly must load.
pub fn load_runner_config(explicit: Option<&Path>) -> Result<RunnerConfig, FlashError> {
    load_layers(
        explicit,
        Path::new(USER_CONFIG_PATH),
        Path::new(VENDOR_CONFIG_PATH),
    )
}

pub fn load_layers(
    explicit: Option<&Path>,
    user: &Path,
    vendor: &Path,
) -> Result<RunnerConfig, FlashError> {
    let top = match explicit {
        Some(path) => RunnerConfig::from(config_from_file(path)?),
        None => RunnerConfig::default(),
    };
    let merged = top.merge(optional_layer(user).merge(optional_layer(vendor)));
    trace!("Resulting config: {merged:?}");
    Ok(merged)
}
