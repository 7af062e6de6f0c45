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

//! Runner wrapping ecpprog between two local hook commands.
//!
//! Some Lattice devices stay in "evaluation mode" after programming and refuse to start
//! until they are reset. The hooks give the board a chance to be reset before and after
//! ecpprog writes the image.

use crate::command::{CommandRunner, Invocation};
use crate::config::build_configuration::format_offset;
use crate::error::FlashError;
use crate::runners::runner::{BuildContext, Runner, RunnerType};
use log::{debug, trace};
use std::path::Path;

pub static DEFAULT_ECPPROG: &str = "ecpprog";

/// Program run for a hook that was not configured. Always succeeds.
pub static NO_OP_COMMAND: &str = "true";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EcpprogHookRunner {
    device: Option<String>,
    pre_cmd: Invocation,
    post_cmd: Invocation,
    ecpprog: String,
}

/// A hook is a shell command line. An unset or blank hook is the no-op command.
fn hook_invocation(command: Option<&str>) -> Invocation {
    match command.map(str::trim) {
        Some(line) if !line.is_empty() => Invocation::new("sh").args(["-c", line]),
        _ => Invocation::new(NO_OP_COMMAND),
    }
}

impl EcpprogHookRunner {
    pub fn new(
        device: Option<String>,
        pre_cmd: Option<&str>,
        post_cmd: Option<&str>,
        ecpprog: Option<String>,
    ) -> Self {
        trace!("creating new EcpprogHookRunner");
        EcpprogHookRunner {
            device,
            pre_cmd: hook_invocation(pre_cmd),
            post_cmd: hook_invocation(post_cmd),
            ecpprog: ecpprog.unwrap_or_else(|| DEFAULT_ECPPROG.to_string()),
        }
    }

    pub fn pre_cmd(&self) -> &Invocation {
        &self.pre_cmd
    }

    pub fn post_cmd(&self) -> &Invocation {
        &self.post_cmd
    }

    /// `ecpprog [-d <device>] -o <offset> <bin_file>`
    pub fn ecpprog_invocation(&self, bin_file: &Path, offset: u64) -> Invocation {
        let mut invocation = Invocation::new(&self.ecpprog);
        if let Some(device) = &self.device {
            invocation = invocation.args(["-d", device.as_str()]);
        }
        invocation
            .args(["-o".to_string(), format_offset(offset)])
            .arg(bin_file.to_string_lossy())
    }
}

impl Runner for EcpprogHookRunner {
    fn runner_type(&self) -> RunnerType {
        RunnerType::EcpprogHook
    }

    fn flash(
        &self,
        build: &BuildContext,
        executor: &mut dyn CommandRunner,
    ) -> Result<(), FlashError> {
        let offset = build.flash_load_offset()?;
        let flash = self.ecpprog_invocation(build.bin_file(), offset);

        for step in [&self.pre_cmd, &flash, &self.post_cmd] {
            debug!("{step}");
            executor.check_call(step, None)?;
        }
        Ok(())
    }
}
