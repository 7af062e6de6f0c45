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

//! ecpflash - flash runners for ecpprog-programmed FPGA boards.
//!
//! The crate programs the flash of a Lattice FPGA board with `ecpprog` after a Zephyr
//! build, bracketed by board reset steps. See [`runners`] for the two available strategies
//! and [`command`] for how their invocations are executed.

pub mod command;
pub mod config;
pub mod error;
pub mod payloads;
pub mod runners;
pub mod system_io;
