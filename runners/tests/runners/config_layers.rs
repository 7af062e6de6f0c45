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

use crate::common::test_functions::test_data;
use ecpflash::config::{RunnerConfig, load_layers, load_runner_config};
use ecpflash::error::FlashError;
use googletest::prelude::*;
use rstest::*;
use std::path::Path;

#[test]
fn layers_merge_top_down() {
    let config = load_layers(
        Some(&test_data("configs/explicit.toml")),
        &test_data("configs/user.toml"),
        &test_data("configs/vendor.toml"),
    )
    .expect("failed to load config");

    assert_eq!(
        config.hook.post_cmd.as_deref(),
        Some("mpremote run /dev/stdin < reset.py")
    );
    assert_eq!(config.hook.device.as_deref(), Some("i:0x0403:0x6010"));
    assert_eq!(config.hook.pre_cmd, None);
    assert_eq!(config.mpremote.host.as_deref(), Some("pi@flasher"));
    assert_eq!(
        config.mpremote.mpremote.as_deref(),
        Some("/opt/mpremote/bin/mpremote")
    );
    assert_eq!(
        config.mpremote.scripts,
        Some(vec!["builtin:soft-reset".to_string()])
    );
}

#[test]
fn broken_system_layer_is_skipped() {
    let config = load_layers(
        None,
        &test_data("configs/broken.toml"),
        &test_data("configs/vendor.toml"),
    )
    .expect("failed to load config");
    assert_eq!(config.mpremote.host.as_deref(), Some("vendor-host"));
    assert_eq!(config.mpremote.scripts, None);
}

#[gtest]
#[rstest]
#[case::broken(
    "configs/broken.toml",
    err(displays_as(contains_substring("FlashError::TomlDe:")))
)]
#[case::missing(
    "configs/missing.toml",
    err(displays_as(contains_substring("FlashError::IORead:")))
)]
#[case::unknown_sections(
    "configs/unknown_sections.toml",
    err(displays_as(contains_substring("FlashError::TomlDe:")))
)]
#[case::ok("configs/explicit.toml", ok(anything()))]
fn explicit_layer_must_load<M: for<'a> Matcher<&'a std::result::Result<RunnerConfig, FlashError>>>(
    #[case] file: &str,
    #[case] condition: M,
) {
    let result = load_layers(
        Some(&test_data(file)),
        Path::new("/nonexistent/user.toml"),
        Path::new("/nonexistent/vendor.toml"),
    );
    assert_that!(&result, condition);
}

#[test]
fn system_config_loads_without_explicit_file() {
    assert!(load_runner_config(None).is_ok());
}

#[test]
fn missing_explicit_file_names_the_path() {
    let missing = test_data("configs/missing.toml");
    let result = load_layers(
        Some(&missing),
        Path::new("/nonexistent/user.toml"),
        Path::new("/nonexistent/vendor.toml"),
    );
    match result {
        Err(FlashError::IORead { file, e }) => {
            assert_eq!(file, missing);
            assert_eq!(e.kind(), std::io::ErrorKind::NotFound);
        }
        other => panic!("expected an IORead error, got {other:?}"),
    }
}
