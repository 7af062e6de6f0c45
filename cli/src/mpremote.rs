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
//! `ecpprog-mpremote` command.
//!
//! Flags override the `[ecpprog_mpremote]` section of the merged runner config. Scripts given
//! on the command line replace the configured list instead of extending it.

use ecpflash::command::SystemRunner;
use ecpflash::config::config_files::MpremoteSection;
use ecpflash::error::FlashError;
use ecpflash::payloads::PayloadPins;
use ecpflash::runners::ecpprog_mpremote::{EcpprogMpremoteRunner, ScriptSource};
use ecpflash::runners::runner::{BuildContext, Runner};
use log::info;

/// Merge `flags` over `config` and build the runner from the result.
///
/// # Returns: `Result<EcpprogMpremoteRunner, FlashError>`
/// * `Ok(EcpprogMpremoteRunner)` - The runner
/// * `Err(FlashError::Argument)` - No script given by flag nor config, or an unknown payload
pub fn build_mpremote_runner(
    flags: MpremoteSection,
    config: MpremoteSection,
    pins: PayloadPins,
) -> Result<EcpprogMpremoteRunner, FlashError> {
    let merged = flags.merge(config);
    let scripts = merged
        .scripts
        .unwrap_or_default()
        .iter()
        .map(|s| ScriptSource::parse(s))
        .collect::<Result<Vec<_>, _>>()?;
    if scripts.is_empty() {
        return Err(FlashError::Argument(
            "--add-script is required at least once".to_string(),
        ));
    }
    Ok(
        EcpprogMpremoteRunner::new(merged.host, merged.mpremote, merged.ecpprog, scripts)?
            .with_payload_pins(pins),
    )
}

/// Builds the mpremote runner from flags and config, then flashes `build`.
///
/// # Returns: `Result<String, FlashError>`
/// * `Ok(String)` - Summary of the flashed image
/// * `Err(FlashError::Argument)` - See [`build_mpremote_runner`]
/// * `Err(FlashError)` - The first failing step. See [`ecpflash::error::FlashError`].
pub fn mpremote_handler(
    build: &BuildContext,
    flags: MpremoteSection,
    config: MpremoteSection,
    pins: PayloadPins,
) -> Result<String, FlashError> {
    let runner = build_mpremote_runner(flags, config, pins)?;
    info!(
        "Flashing {} with {}",
        build.bin_file().display(),
        runner.runner_type()
    );
    runner.flash(build, &mut SystemRunner::new())?;
    Ok(format!("{} flashed", build.bin_file().display()))
}
