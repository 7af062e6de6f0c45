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

//! External process invocations.
//!
//! An [`Invocation`] is the ordered token list of one external program run. Runners build
//! invocations and hand them, one at a time, to a [`CommandRunner`] which runs them to
//! completion. The real implementation is [`SystemRunner`].
//!
//! Standard input of a child is supplied through a [`RedirectedInput`]. The input is
//! acquired before the call and owned by it, so it is released when the call returns
//! whether the child succeeded or not. The standard input of the calling process itself is
//! never rebound.

use crate::error::FlashError;
use crate::system_io::fs_open_read;
use log::{debug, trace};
use std::fmt;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

/// One external program run: the program followed by its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    tokens: Vec<String>,
}

impl Invocation {
    pub fn new(program: impl Into<String>) -> Self {
        Invocation {
            tokens: vec![program.into()],
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.tokens.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tokens.extend(args.into_iter().map(Into::into));
        self
    }

    /// Put `prefix` in front of the whole invocation, e.g. `ssh <host>`.
    ///
    /// An empty prefix leaves the invocation untouched.
    pub fn prefixed(self, prefix: &[String]) -> Self {
        if prefix.is_empty() {
            return self;
        }
        let mut tokens = prefix.to_vec();
        tokens.extend(self.tokens);
        Invocation { tokens }
    }

    pub fn program(&self) -> &str {
        &self.tokens[0]
    }

    pub fn arguments(&self) -> &[String] {
        &self.tokens[1..]
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tokens.join(" "))
    }
}

/// Data bound to the standard input of exactly one child process.
#[derive(Debug)]
pub enum RedirectedInput {
    /// An opened file, passed to the child as its stdin file descriptor.
    File { path: PathBuf, file: File },
    /// In-memory text, written to the child through a pipe.
    Text { name: String, text: String },
}

impl RedirectedInput {
    /// Open `path` for reading. Fails before any process is started.
    pub fn open(path: &Path) -> Result<Self, FlashError> {
        let file = fs_open_read(path)?;
        Ok(RedirectedInput::File {
            path: path.to_owned(),
            file,
        })
    }

    pub fn text(name: impl Into<String>, text: impl Into<String>) -> Self {
        RedirectedInput::Text {
            name: name.into(),
            text: text.into(),
        }
    }

    /// Human readable origin of the input, used in logs and errors.
    pub fn source_name(&self) -> String {
        match self {
            RedirectedInput::File { path, .. } => path.display().to_string(),
            RedirectedInput::Text { name, .. } => name.clone(),
        }
    }
}

/// Runs invocations synchronously, one at a time.
pub trait CommandRunner {
    /// Run `invocation` to completion with `stdin` bound as its standard input, or the
    /// inherited one when `None`.
    ///
    /// # Returns: `Result<(), FlashError>`
    /// * `Ok(())` - The process exited with status zero
    /// * `Err(FlashError::Spawn)` - The process could not be started or waited on
    /// * `Err(FlashError::Exit)` - The process exited non-zero or was killed
    /// * `Err(FlashError::IOWrite)` - Piped text input could not be delivered
    fn check_call(
        &mut self,
        invocation: &Invocation,
        stdin: Option<RedirectedInput>,
    ) -> Result<(), FlashError>;
}

/// [`CommandRunner`] backed by `std::process::Command`. Output streams are inherited.
#[derive(Debug, Default)]
pub struct SystemRunner;

impl SystemRunner {
    pub fn new() -> Self {
        SystemRunner
    }
}

fn spawn_error(invocation: &Invocation, e: std::io::Error) -> FlashError {
    FlashError::Spawn {
        command: invocation.to_string(),
        e,
    }
}

fn check_status(invocation: &Invocation, status: ExitStatus) -> Result<(), FlashError> {
    if status.success() {
        trace!("`{invocation}` finished with {status}");
        Ok(())
    } else {
        Err(FlashError::Exit {
            command: invocation.to_string(),
            status: status.to_string(),
        })
    }
}

impl CommandRunner for SystemRunner {
    fn check_call(
        &mut self,
        invocation: &Invocation,
        stdin: Option<RedirectedInput>,
    ) -> Result<(), FlashError> {
        let mut command = Command::new(invocation.program());
        command.args(invocation.arguments());

        match stdin {
            None => {
                debug!("Running `{invocation}`");
                let status = command
                    .status()
                    .map_err(|e| spawn_error(invocation, e))?;
                check_status(invocation, status)
            }
            Some(RedirectedInput::File { path, file }) => {
                debug!("Running `{invocation}` with stdin from {path:?}");
                let status = command
                    .stdin(Stdio::from(file))
                    .status()
                    .map_err(|e| spawn_error(invocation, e))?;
                check_status(invocation, status)
            }
            Some(RedirectedInput::Text { name, text }) => {
                debug!("Running `{invocation}` with stdin piped from {name}");
                let mut child = command
                    .stdin(Stdio::piped())
                    .spawn()
                    .map_err(|e| spawn_error(invocation, e))?;
                // The pipe is dropped at the end of this block so the child sees EOF.
                let written = match child.stdin.take() {
                    Some(mut pipe) => pipe.write_all(text.as_bytes()),
                    None => Err(std::io::Error::other("child stdin was not captured")),
                };
                let status = child.wait().map_err(|e| spawn_error(invocation, e))?;
                check_status(invocation, status)?;
                written.map_err(|e| FlashError::IOWrite {
                    source_name: name,
                    command: invocation.to_string(),
                    e,
                })
            }
        }
    }
}
