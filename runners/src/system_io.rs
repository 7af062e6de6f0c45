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

//! Error Wrapping File System I/O Helpers
//!
//! Thin wrappers around the standard file operations used by the runners, with trace
//! logging and conversion to `FlashError` carrying the offending path.
//!
//! # Examples
//!
//! ```rust,no_run
//! # use ecpflash::system_io::{fs_open_read, fs_read};
//! # use std::path::Path;
//!
//! # fn example() -> Result<(), ecpflash::error::FlashError> {
//! // Read a Kconfig output file
//! let config = fs_read(Path::new("build/zephyr/.config"))?;
//!
//! // Open an image that a child process will read as its stdin
//! let image = fs_open_read(Path::new("build/zephyr/zephyr.bin"))?;
//! # Ok(())
//! # }
//! ```

use crate::error::FlashError;
use log::trace;
use std::fs::{File, OpenOptions};
use std::io::Read;
use std::path::Path;

/// Read the contents of a file to a String.
///
/// # Arguments
///
/// * `file_path` - Path to the file to read
///
/// # Returns: `Result<String, FlashError>`
/// * `Ok(String)` - The complete contents of the file
/// * `Err(FlashError::IORead)` - If the file cannot be opened or read
pub fn fs_read(file_path: &Path) -> Result<String, FlashError> {
    trace!("Attempting to read from {file_path:?}");
    let mut buf: String = String::new();
    let result = OpenOptions::new()
        .read(true)
        .open(file_path)
        .and_then(|mut f| f.read_to_string(&mut buf));

    match result {
        Ok(_) => {
            trace!("Reading done");
            Ok(buf)
        }
        Err(e) => Err(FlashError::IORead {
            file: file_path.into(),
            e,
        }),
    }
}

/// Open a file read-only and hand back the handle.
///
/// Directories are rejected here so that the failure surfaces before a child process is
/// started, instead of as a read error inside the child.
///
/// # Arguments
///
/// * `file_path` - Path to the file to open
///
/// # Returns: `Result<File, FlashError>`
/// * `Ok(File)` - Open handle positioned at the start of the file
/// * `Err(FlashError::IOOpen)` - If the file does not exist, is a directory, or permissions deny it
pub fn fs_open_read(file_path: &Path) -> Result<File, FlashError> {
    trace!("Attempting to open {file_path:?} for reading");
    let result = OpenOptions::new()
        .read(true)
        .open(file_path)
        .and_then(|f| {
            if f.metadata()?.is_dir() {
                Err(std::io::Error::new(
                    std::io::ErrorKind::IsADirectory,
                    "Is a directory",
                ))
            } else {
                Ok(f)
            }
        });
    match result {
        Ok(f) => {
            trace!("Opened {file_path:?}");
            Ok(f)
        }
        Err(e) => Err(FlashError::IOOpen {
            file: file_path.into(),
            e,
        }),
    }
}
