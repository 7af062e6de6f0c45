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

//! Common runner interface and the build being flashed.

use crate::command::CommandRunner;
use crate::config::build_configuration::BuildConfiguration;
use crate::error::FlashError;
use log::debug;
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerType {
    EcpprogHook,
    EcpprogMpremote,
}

impl RunnerType {
    pub fn name(&self) -> &'static str {
        match self {
            RunnerType::EcpprogHook => "ecpprog_hook",
            RunnerType::EcpprogMpremote => "ecpprog_mpremote",
        }
    }
}

impl fmt::Display for RunnerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Location of a finished build and the image to flash from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildContext {
    build_dir: PathBuf,
    bin_file: PathBuf,
}

impl BuildContext {
    /// `bin_file` defaults to `<build_dir>/zephyr/zephyr.bin`.
    pub fn new(build_dir: impl Into<PathBuf>, bin_file: Option<PathBuf>) -> Self {
        let build_dir = build_dir.into();
        let bin_file = bin_file.unwrap_or_else(|| build_dir.join("zephyr").join("zephyr.bin"));
        BuildContext {
            build_dir,
            bin_file,
        }
    }

    pub fn build_dir(&self) -> &Path {
        &self.build_dir
    }

    pub fn bin_file(&self) -> &Path {
        &self.bin_file
    }

    /// Read `CONFIG_FLASH_LOAD_OFFSET` from the build, 0 when unset.
    pub fn flash_load_offset(&self) -> Result<u64, FlashError> {
        let offset = BuildConfiguration::from_build_dir(&self.build_dir)?.flash_load_offset()?;
        debug!("Flash load offset of {:?} is {offset:#x}", self.build_dir);
        Ok(offset)
    }
}

/// A flashing strategy for one board setup.
pub trait Runner {
    fn runner_type(&self) -> RunnerType;

    /// Program the image of `build`, running every step through `executor` in order.
    ///
    /// The first failing step ends the run. Steps already completed are not undone.
    ///
    /// # Returns: `Result<(), FlashError>`
    /// * `Ok(())` - Every step succeeded
    /// * `Err(FlashError)` - The error of the first step that failed
    fn flash(
        &self,
        build: &BuildContext,
        executor: &mut dyn CommandRunner,
    ) -> Result<(), FlashError>;
}
