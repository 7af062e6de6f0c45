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

//! Flash runners.
//!
//! A runner turns a finished build into an ordered sequence of external invocations that
//! program the board. Runners only build invocations. Executing them is delegated to a
//! [`CommandRunner`](crate::command::CommandRunner) so the sequencing can be observed in
//! tests without touching hardware.
//!
//! - [`ecpprog_hook`]: pre-command, ecpprog, post-command, all local.
//! - [`ecpprog_mpremote`]: mpremote payloads, ecpprog from stdin, the same payloads again,
//!   optionally over ssh.

pub mod ecpprog_hook;
pub mod ecpprog_mpremote;
pub mod runner;
