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

//! Reader for the Kconfig output of a Zephyr build, `<build-dir>/zephyr/.config`.
//!
//! Lines of the form `CONFIG_NAME=value` are recorded, as are `# CONFIG_NAME is not set`
//! lines (recorded as `false`). Everything else is ignored. Values are typed the way
//! Kconfig writes them: `y`/`n` are booleans, quoted values are strings, and anything else
//! is an integer when it parses as one (`0x`, `0o` and `0b` prefixes are honoured) and a raw
//! string otherwise.

use crate::error::FlashError;
use crate::system_io::fs_read;
use log::{trace, warn};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Option holding the byte offset in flash where the image is written.
pub static FLASH_LOAD_OFFSET: &str = "CONFIG_FLASH_LOAD_OFFSET";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigValue {
    Bool(bool),
    Int(i64),
    Str(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ConfigEntry {
    value: ConfigValue,
    line: usize,
}

/// Read-only view of the options of one build.
#[derive(Debug, Clone, Default)]
pub struct BuildConfiguration {
    path: PathBuf,
    options: BTreeMap<String, ConfigEntry>,
}

/// Format an offset the way ecpprog expects it on the command line: lowercase hex with a
/// `0x` prefix.
pub fn format_offset(offset: u64) -> String {
    format!("{offset:#x}")
}

fn parse_int(value: &str) -> Option<i64> {
    let (negative, unsigned) = match value.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, value.strip_prefix('+').unwrap_or(value)),
    };
    let lower = unsigned.to_ascii_lowercase();
    let (radix, digits) = if let Some(rest) = lower.strip_prefix("0x") {
        (16, rest)
    } else if let Some(rest) = lower.strip_prefix("0o") {
        (8, rest)
    } else if let Some(rest) = lower.strip_prefix("0b") {
        (2, rest)
    } else {
        // "010" is not a valid literal, "000" is
        if lower.len() > 1 && lower.starts_with('0') && lower.bytes().any(|b| b != b'0') {
            return None;
        }
        (10, lower.as_str())
    };
    if digits.is_empty() || digits.starts_with(['+', '-']) {
        return None;
    }
    let magnitude = i64::from_str_radix(digits, radix).ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

fn unquote(value: &str) -> Option<String> {
    let inner = value.strip_prefix('"')?.strip_suffix('"')?;
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(escaped) = chars.next() {
                out.push(escaped);
            }
        } else {
            out.push(c);
        }
    }
    Some(out)
}

fn parse_value(raw: &str) -> ConfigValue {
    if let Some(s) = unquote(raw) {
        return ConfigValue::Str(s);
    }
    match raw {
        "y" => ConfigValue::Bool(true),
        "n" => ConfigValue::Bool(false),
        _ => parse_int(raw).map_or_else(|| ConfigValue::Str(raw.to_string()), ConfigValue::Int),
    }
}

fn is_option_name(name: &str) -> bool {
    name.strip_prefix("CONFIG_").is_some_and(|rest| {
        !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
    })
}

impl BuildConfiguration {
    /// Load the configuration of the build in `build_dir`.
    ///
    /// A build without a `.config` yields an empty configuration, so every lookup falls
    /// back to its default.
    pub fn from_build_dir(build_dir: &Path) -> Result<Self, FlashError> {
        let path = build_dir.join("zephyr").join(".config");
        if !path.is_file() {
            warn!("No build configuration found at {path:?}, using defaults");
            return Ok(BuildConfiguration {
                path,
                options: BTreeMap::new(),
            });
        }
        Self::from_file(&path)
    }

    pub fn from_file(path: &Path) -> Result<Self, FlashError> {
        let contents = fs_read(path)?;
        Ok(Self::parse(path, &contents))
    }

    /// Parse `contents` as if read from `path`.
    pub fn parse(path: &Path, contents: &str) -> Self {
        let mut options = BTreeMap::new();
        for (index, line) in contents.lines().enumerate() {
            let line_no = index + 1;
            let line = line.trim_end();
            if let Some(name) = line
                .strip_prefix("# ")
                .and_then(|rest| rest.strip_suffix(" is not set"))
                .filter(|name| is_option_name(name))
            {
                options.insert(
                    name.to_string(),
                    ConfigEntry {
                        value: ConfigValue::Bool(false),
                        line: line_no,
                    },
                );
                continue;
            }
            match line.split_once('=') {
                Some((name, raw)) if is_option_name(name) => {
                    options.insert(
                        name.to_string(),
                        ConfigEntry {
                            value: parse_value(raw),
                            line: line_no,
                        },
                    );
                }
                _ => trace!("{path:?} line {line_no}: skipping {line:?}"),
            }
        }
        BuildConfiguration {
            path: path.to_owned(),
            options,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, option: &str) -> Option<&ConfigValue> {
        self.options.get(option).map(|entry| &entry.value)
    }

    /// Integer value of `option`, or `default` when the option is absent.
    ///
    /// # Returns: `Result<i64, FlashError>`
    /// * `Ok(i64)` - The configured value or `default`
    /// * `Err(FlashError::BuildConfig)` - The option is present but not an integer
    pub fn get_int(&self, option: &str, default: i64) -> Result<i64, FlashError> {
        match self.options.get(option) {
            None => {
                trace!("{option} not set, using {default}");
                Ok(default)
            }
            Some(ConfigEntry {
                value: ConfigValue::Int(v),
                ..
            }) => Ok(*v),
            Some(ConfigEntry { value, line }) => Err(FlashError::BuildConfig {
                file: self.path.clone(),
                line: *line,
                message: format!("{option} is not an integer: {value:?}"),
            }),
        }
    }

    /// The flash load offset of the image, 0 when the build does not set one.
    pub fn flash_load_offset(&self) -> Result<u64, FlashError> {
        let offset = self.get_int(FLASH_LOAD_OFFSET, 0)?;
        u64::try_from(offset).map_err(|_| FlashError::BuildConfig {
            file: self.path.clone(),
            line: self.options.get(FLASH_LOAD_OFFSET).map_or(0, |e| e.line),
            message: format!("{FLASH_LOAD_OFFSET} must not be negative, got {offset}"),
        })
    }
}
