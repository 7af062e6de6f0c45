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

//! ecpflash - program the flash of an ecpprog-supported FPGA board after a Zephyr build.
//!
//! # Runners
//!
//! - `ecpprog-hook`: runs a pre-command, `ecpprog`, then a post-command, locally.
//! - `ecpprog-mpremote`: streams MicroPython scripts to the companion board through
//!   `mpremote`, flashes with `ecpprog` reading the image from stdin, then streams the same
//!   scripts again. `--host` runs every step over `ssh`.
//!
//! `payload` prints one of the built-in MicroPython payloads, for use with plain `mpremote`.
//!
//! # Configuration
//!
//! Runner defaults are read from `/usr/lib/ecpflash/config.toml`, then
//! `/etc/ecpflash/config.toml`, then the file given with `--config`. Flags override all of
//! them. Each runner has its own section, `[ecpprog_hook]` or `[ecpprog_mpremote]`, holding
//! keys named after its flags (`scripts` for `--add-script`). Unknown sections or keys are
//! rejected.
//!
//! # Environment Variables
//!
//! - `RUST_LOG` - Controls logging level (`trace`, `debug`, `info`, `warn`, `error`
//!   or `off`). Defaults to `info`

mod hook;
mod mpremote;
mod payload;

use crate::hook::hook_handler;
use crate::mpremote::mpremote_handler;
use crate::payload::payload_handler;
use clap::{Args, Parser, Subcommand};
use ecpflash::config::config_files::{HookSection, MpremoteSection};
use ecpflash::config::load_runner_config;
use ecpflash::error::FlashError;
use ecpflash::payloads::PayloadPins;
use ecpflash::runners::runner::BuildContext;
use log::{debug, error};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "ecpflash")]
#[command(bin_name = "ecpflash")]
#[command(version, about = "Flash ecpprog-programmed FPGA boards after a Zephyr build")]
struct Cli {
    #[arg(long = "build-dir", default_value = "build", help = "Zephyr build directory")]
    build_dir: PathBuf,
    #[arg(
        long = "bin-file",
        help = "Image to flash. Defaults to <build-dir>/zephyr/zephyr.bin"
    )]
    bin_file: Option<PathBuf>,
    #[arg(
        long = "config",
        help = r#"Runner config file. Overrides /etc/ecpflash/config.toml and
/usr/lib/ecpflash/config.toml, which are read when present.
        "#
    )]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

/// Wiring of the companion board, used by built-in payloads.
#[derive(Args, Debug, Clone)]
pub struct PinArgs {
    #[arg(long = "reset-pin", help = "GPIO wired to PROGN (default 20)")]
    reset_pin: Option<u8>,
    #[arg(long = "power-pin", help = "GPIO wired to EN (default 22)")]
    power_pin: Option<u8>,
    #[arg(long = "hold-ms", help = "How long reset or power is held low (default 500)")]
    hold_ms: Option<u64>,
}

impl PinArgs {
    pub fn pins(&self) -> PayloadPins {
        let defaults = PayloadPins::default();
        PayloadPins {
            reset_pin: self.reset_pin.unwrap_or(defaults.reset_pin),
            power_pin: self.power_pin.unwrap_or(defaults.power_pin),
            hold_ms: self.hold_ms.unwrap_or(defaults.hold_ms),
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run ecpprog locally between a pre and a post hook command
    EcpprogHook {
        #[arg(long = "device", help = "Device identifier such as i:<vid>:<pid>")]
        device: Option<String>,
        #[arg(long = "pre-cmd", help = "Shell command to run before flashing")]
        pre_cmd: Option<String>,
        #[arg(long = "post-cmd", help = "Shell command to run as soon as flashing is done")]
        post_cmd: Option<String>,
        #[arg(long = "ecpprog", help = "Path to the ecpprog binary (default ecpprog)")]
        ecpprog: Option<String>,
    },
    /// Run mpremote scripts around ecpprog, optionally over ssh
    EcpprogMpremote {
        #[arg(long = "host", help = "SSH host to connect to (optional)")]
        host: Option<String>,
        #[arg(
            long = "mpremote",
            help = "Path to the mpremote binary on the remote host (default .local/bin/mpremote)"
        )]
        mpremote: Option<String>,
        #[arg(
            long = "ecpprog",
            help = "Path to the ecpprog binary on the remote host (default .local/bin/ecpprog)"
        )]
        ecpprog: Option<String>,
        #[arg(
            long = "add-script",
            help = r#"Script to load with mpremote. Set multiple times to run several scripts.
Use builtin:<name> for a built-in payload (power-off, power-cycle, soft-reset).
        "#
        )]
        scripts: Vec<String>,
        #[command(flatten)]
        pins: PinArgs,
    },
    /// Print a built-in MicroPython payload
    Payload {
        #[arg(help = "One of power-off, power-cycle, soft-reset")]
        name: String,
        #[command(flatten)]
        pins: PinArgs,
    },
}

fn run(cli: &Cli) -> Result<String, FlashError> {
    let build = BuildContext::new(&cli.build_dir, cli.bin_file.clone());
    match &cli.command {
        Commands::EcpprogHook {
            device,
            pre_cmd,
            post_cmd,
            ecpprog,
        } => {
            let config = load_runner_config(cli.config.as_deref())?;
            let flags = HookSection {
                device: device.clone(),
                pre_cmd: pre_cmd.clone(),
                post_cmd: post_cmd.clone(),
                ecpprog: ecpprog.clone(),
            };
            hook_handler(&build, flags, config.hook)
        }
        Commands::EcpprogMpremote {
            host,
            mpremote,
            ecpprog,
            scripts,
            pins,
        } => {
            let config = load_runner_config(cli.config.as_deref())?;
            let flags = MpremoteSection {
                host: host.clone(),
                mpremote: mpremote.clone(),
                ecpprog: ecpprog.clone(),
                scripts: Some(scripts.clone()),
            };
            mpremote_handler(&build, flags, config.mpremote, pins.pins())
        }
        Commands::Payload { name, pins } => payload_handler(name, &pins.pins()),
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    debug!("parsed cli command with {cli:?}");
    match run(&cli) {
        Ok(msg) => {
            if !msg.is_empty() {
                println!("{msg}");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
