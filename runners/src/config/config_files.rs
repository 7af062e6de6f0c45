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

use crate::error::FlashError;
use crate::system_io::fs_read;
use log::trace;
use serde::Deserialize;
use std::path::Path;

/// This is the top level struct which holds all sections
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    ecpprog_hook: Option<HookSection>,
    ecpprog_mpremote: Option<MpremoteSection>,
}

/// The `[ecpprog_hook]` section
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HookSection {
    pub device: Option<String>,
    pub pre_cmd: Option<String>,
    pub post_cmd: Option<String>,
    pub ecpprog: Option<String>,
}

/// The `[ecpprog_mpremote]` section
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MpremoteSection {
    pub host: Option<String>,
    pub mpremote: Option<String>,
    pub ecpprog: Option<String>,
    pub scripts: Option<Vec<String>>,
}

impl HookSection {
    pub fn merge(self, fallback: HookSection) -> HookSection {
        HookSection {
            device: self.device.or(fallback.device),
            pre_cmd: self.pre_cmd.or(fallback.pre_cmd),
            post_cmd: self.post_cmd.or(fallback.post_cmd),
            ecpprog: self.ecpprog.or(fallback.ecpprog),
        }
    }
}

impl MpremoteSection {
    /// Scripts are not concatenated across layers: the first layer naming any wins.
    pub fn merge(self, fallback: MpremoteSection) -> MpremoteSection {
        MpremoteSection {
            host: self.host.or(fallback.host),
            mpremote: self.mpremote.or(fallback.mpremote),
            ecpprog: self.ecpprog.or(fallback.ecpprog),
            scripts: self
                .scripts
                .filter(|s| !s.is_empty())
                .or(fallback.scripts),
        }
    }
}

pub(crate) fn toml_str_to_config(toml_string: &str) -> Result<TomlConfig, FlashError> {
    let config: TomlConfig = match toml::from_str(toml_string) {
        Ok(config) => config,
        Err(e) => {
            return Err(FlashError::TomlDe {
                toml_string: toml_string.into(),
                e,
            });
        }
    };
    Ok(config)
}

pub(crate) fn config_from_file(file_path: &Path) -> Result<TomlConfig, FlashError> {
    let config = toml_str_to_config(&fs_read(file_path)?)?;
    trace!("Loaded {config:?} from {file_path:?}");
    Ok(config)
}

impl TomlConfig {
    pub(crate) fn into_sections(self) -> (HookSection, MpremoteSection) {
        (
            self.ecpprog_hook.unwrap_or_default(),
            self.ecpprog_mpremote.unwrap_or_default(),
        )
    }
}
