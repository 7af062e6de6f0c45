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

//! Built-in MicroPython payloads for the companion board.
//!
//! The tinyCLUNX33 devkit is wired to a Raspberry Pi Pico running MicroPython. Two of its
//! GPIOs drive the FPGA board:
//! - GPIO20 is wired to PROGN. It is driven open-drain, low to hold the FPGA in reset.
//! - GPIO22 is wired to EN, the power enable of the FPGA board.
//!
//! These payloads are streamed through `mpremote run /dev/stdin` like any script file.

use crate::error::FlashError;
use std::fmt;
use std::str::FromStr;

/// Prefix marking a script source as a built-in payload, e.g. `builtin:soft-reset`.
pub static BUILTIN_PREFIX: &str = "builtin:";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Payload {
    PowerOff,
    PowerCycle,
    SoftReset,
}

impl Payload {
    pub const ALL: [Payload; 3] = [Payload::PowerOff, Payload::PowerCycle, Payload::SoftReset];

    pub fn name(&self) -> &'static str {
        match self {
            Payload::PowerOff => "power-off",
            Payload::PowerCycle => "power-cycle",
            Payload::SoftReset => "soft-reset",
        }
    }

    /// MicroPython source of this payload for the given wiring.
    pub fn render(&self, pins: &PayloadPins) -> String {
        let PayloadPins {
            reset_pin,
            power_pin,
            hold_ms,
        } = pins;
        let hold_s = *hold_ms as f64 / 1000.0;
        match self {
            Payload::PowerOff => format!(
                "import machine\n\
                 \n\
                 reset = machine.Pin({reset_pin}, machine.Pin.OPEN_DRAIN)\n\
                 power = machine.Pin({power_pin}, machine.Pin.OUT)\n\
                 \n\
                 power.off()\n"
            ),
            Payload::PowerCycle => format!(
                "import machine, time\n\
                 \n\
                 pin = machine.Pin({power_pin}, machine.Pin.OUT)\n\
                 \n\
                 pin.value(0)\n\
                 time.sleep({hold_s})\n\
                 pin.value(1)\n"
            ),
            Payload::SoftReset => format!(
                "import machine, time\n\
                 \n\
                 pin = machine.Pin({reset_pin}, machine.Pin.OPEN_DRAIN)\n\
                 \n\
                 pin.value(0)\n\
                 time.sleep({hold_s})\n\
                 pin.value(1)\n"
            ),
        }
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Payload {
    type Err = FlashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Payload::ALL
            .into_iter()
            .find(|p| p.name() == s)
            .ok_or_else(|| {
                let known: Vec<&str> = Payload::ALL.iter().map(Payload::name).collect();
                FlashError::Argument(format!(
                    "Unknown payload '{s}', expected one of: {}",
                    known.join(", ")
                ))
            })
    }
}

/// GPIO wiring between the companion board and the FPGA board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadPins {
    pub reset_pin: u8,
    pub power_pin: u8,
    pub hold_ms: u64,
}

impl Default for PayloadPins {
    fn default() -> Self {
        PayloadPins {
            reset_pin: 20,
            power_pin: 22,
            hold_ms: 500,
        }
    }
}
