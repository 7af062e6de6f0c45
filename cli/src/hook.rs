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
//! `ecpprog-hook` command.
//!
//! Flags override the `[ecpprog_hook]` section of the merged runner config.

use ecpflash::command::SystemRunner;
use ecpflash::config::config_files::HookSection;
use ecpflash::error::FlashError;
use ecpflash::runners::ecpprog_hook::EcpprogHookRunner;
use ecpflash::runners::runner::{BuildContext, Runner};
use log::info;

/// Merge `flags` over `config` and build the runner from the result.
pub fn build_hook_runner(flags: HookSection, config: HookSection) -> EcpprogHookRunner {
    let merged = flags.merge(config);
    EcpprogHookRunner::new(
        merged.device,
        merged.pre_cmd.as_deref(),
        merged.post_cmd.as_deref(),
        merged.ecpprog,
    )
}

/// Builds the hook runner from flags and config, then flashes `build`.
///
/// # Returns: `Result<String, FlashError>`
/// * `Ok(String)` - Summary of the flashed image
/// * `Err(FlashError)` - The first failing step. See [`ecpflash::error::FlashError`].
pub fn hook_handler(
    build: &BuildContext,
    flags: HookSection,
    config: HookSection,
) -> Result<String, FlashError> {
    let runner = build_hook_runner(flags, config);
    info!(
        "Flashing {} with {}",
        build.bin_file().display(),
        runner.runner_type()
    );
    runner.flash(build, &mut SystemRunner::new())?;
    Ok(format!("{} flashed", build.bin_file().display()))
}
