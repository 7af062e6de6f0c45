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

//! Runner driving ecpprog and mpremote together, optionally on a remote host.
//!
//! The companion MicroPython board controls the reset and power lines of the FPGA board.
//! A run is three phases, strictly in order:
//! 1. every script is streamed to `mpremote run /dev/stdin`, preparing the board,
//! 2. the image is streamed to `ecpprog -o <offset> -`,
//! 3. every script is streamed again, releasing the board.
//!
//! Scripts and image reach the tools on their standard input, so with `--host` the same
//! commands work unchanged behind `ssh <host>`, where the files only exist locally.

use crate::command::{CommandRunner, Invocation, RedirectedInput};
use crate::config::build_configuration::format_offset;
use crate::error::FlashError;
use crate::payloads::{BUILTIN_PREFIX, Payload, PayloadPins};
use crate::runners::runner::{BuildContext, Runner, RunnerType};
use log::{info, trace};
use std::fmt;
use std::path::{Path, PathBuf};

/// Default mpremote location, relative to the home directory of the (remote) user.
pub static DEFAULT_MPREMOTE: &str = ".local/bin/mpremote";
/// Default ecpprog location, relative to the home directory of the (remote) user.
pub static DEFAULT_ECPPROG: &str = ".local/bin/ecpprog";

/// Where one mpremote script comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptSource {
    File(PathBuf),
    Builtin(Payload),
}

impl ScriptSource {
    /// `builtin:<name>` selects a built-in payload, anything else is a path.
    pub fn parse(value: &str) -> Result<Self, FlashError> {
        match value.strip_prefix(BUILTIN_PREFIX) {
            Some(name) => Ok(ScriptSource::Builtin(name.parse()?)),
            None => Ok(ScriptSource::File(PathBuf::from(value))),
        }
    }

    fn open(&self, pins: &PayloadPins) -> Result<RedirectedInput, FlashError> {
        match self {
            ScriptSource::File(path) => RedirectedInput::open(path),
            ScriptSource::Builtin(payload) => {
                Ok(RedirectedInput::text(self.to_string(), payload.render(pins)))
            }
        }
    }
}

impl fmt::Display for ScriptSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptSource::File(path) => write!(f, "{}", path.display()),
            ScriptSource::Builtin(payload) => write!(f, "{BUILTIN_PREFIX}{payload}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EcpprogMpremoteRunner {
    host: Option<String>,
    mpremote: String,
    ecpprog: String,
    scripts: Vec<ScriptSource>,
    pins: PayloadPins,
}

impl EcpprogMpremoteRunner {
    /// # Returns: `Result<EcpprogMpremoteRunner, FlashError>`
    /// * `Ok(EcpprogMpremoteRunner)` - The runner
    /// * `Err(FlashError::Argument)` - `scripts` is empty
    pub fn new(
        host: Option<String>,
        mpremote: Option<String>,
        ecpprog: Option<String>,
        scripts: Vec<ScriptSource>,
    ) -> Result<Self, FlashError> {
        trace!("creating new EcpprogMpremoteRunner");
        if scripts.is_empty() {
            return Err(FlashError::Argument(
                "At least one mpremote script is required".to_string(),
            ));
        }
        Ok(EcpprogMpremoteRunner {
            host,
            mpremote: mpremote.unwrap_or_else(|| DEFAULT_MPREMOTE.to_string()),
            ecpprog: ecpprog.unwrap_or_else(|| DEFAULT_ECPPROG.to_string()),
            scripts,
            pins: PayloadPins::default(),
        })
    }

    /// Wiring used when rendering built-in payloads.
    pub fn with_payload_pins(mut self, pins: PayloadPins) -> Self {
        self.pins = pins;
        self
    }

    pub fn scripts(&self) -> &[ScriptSource] {
        &self.scripts
    }

    fn remote_prefix(&self) -> Vec<String> {
        match &self.host {
            Some(host) => vec!["ssh".to_string(), host.clone()],
            None => Vec::new(),
        }
    }

    /// `[ssh <host>] <mpremote> run /dev/stdin`
    pub fn mpremote_invocation(&self) -> Invocation {
        Invocation::new(&self.mpremote)
            .args(["run", "/dev/stdin"])
            .prefixed(&self.remote_prefix())
    }

    /// `[ssh <host>] <ecpprog> -o <offset> -`
    pub fn ecpprog_invocation(&self, offset: u64) -> Invocation {
        Invocation::new(&self.ecpprog)
            .args(["-o".to_string(), format_offset(offset), "-".to_string()])
            .prefixed(&self.remote_prefix())
    }

    fn run_scripts(&self, executor: &mut dyn CommandRunner) -> Result<(), FlashError> {
        let invocation = self.mpremote_invocation();
        for script in &self.scripts {
            info!("{invocation} <{script}");
            let stdin = script.open(&self.pins)?;
            executor.check_call(&invocation, Some(stdin))?;
        }
        Ok(())
    }

    fn run_ecpprog(
        &self,
        bin_file: &Path,
        offset: u64,
        executor: &mut dyn CommandRunner,
    ) -> Result<(), FlashError> {
        let invocation = self.ecpprog_invocation(offset);
        info!("{invocation} <{}", bin_file.display());
        let stdin = RedirectedInput::open(bin_file)?;
        executor.check_call(&invocation, Some(stdin))
    }
}

impl Runner for EcpprogMpremoteRunner {
    fn runner_type(&self) -> RunnerType {
        RunnerType::EcpprogMpremote
    }

    fn flash(
        &self,
        build: &BuildContext,
        executor: &mut dyn CommandRunner,
    ) -> Result<(), FlashError> {
        let offset = build.flash_load_offset()?;
        self.run_scripts(executor)?;
        self.run_ecpprog(build.bin_file(), offset, executor)?;
        self.run_scripts(executor)
    }
}
