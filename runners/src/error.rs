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

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum FlashError {
    #[error("FlashError::Exit: `{command}` failed with {status}")]
    Exit { command: String, status: String },
    #[error("FlashError::Spawn: Failed to start `{command}`: {e}")]
    Spawn { command: String, e: std::io::Error },
    #[error("FlashError::IOOpen: An IO error occurred when opening {file:?}: {e}")]
    IOOpen { file: PathBuf, e: std::io::Error },
    #[error("FlashError::IORead: An IO error occurred when reading from {file:?}: {e}")]
    IORead { file: PathBuf, e: std::io::Error },
    #[error("FlashError::IOWrite: An IO error occurred when writing {source_name} to `{command}`: {e}")]
    IOWrite {
        source_name: String,
        command: String,
        e: std::io::Error,
    },
    #[error("FlashError::BuildConfig: {file:?} line {line}: {message}")]
    BuildConfig {
        file: PathBuf,
        line: usize,
        message: String,
    },
    #[error("FlashError::TomlDe: Failed to parse config from {toml_string:?}: {e}")]
    TomlDe {
        toml_string: String,
        e: toml::de::Error,
    },
    #[error("FlashError::Argument: {0}")]
    Argument(String),
    #[error("FlashError::Internal: An Internal error occurred: {0}")]
    Internal(String),
}
