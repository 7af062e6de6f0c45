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

use ecpflash::error::FlashError;
use ecpflash::payloads::{Payload, PayloadPins};

/// Renders the payload called `name` for the given wiring.
pub fn payload_handler(name: &str, pins: &PayloadPins) -> Result<String, FlashError> {
    let payload: Payload = name.parse()?;
    Ok(payload.render(pins).trim_end().to_string())
}
