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

use crate::common::recording_runner::RecordingRunner;
use crate::common::test_functions::{test_data, test_data_str};
use ecpflash::error::FlashError;
use ecpflash::runners::ecpprog_hook::EcpprogHookRunner;
use ecpflash::runners::runner::{BuildContext, Runner, RunnerType};
use googletest::prelude::*;
use rstest::*;

fn hook_runner() -> EcpprogHookRunner {
    EcpprogHookRunner::new(None, Some("board-reset on"), Some("board-reset off"), None)
}

#[test]
fn runs_pre_flash_post_in_order() {
    let build = BuildContext::new(test_data("build"), None);
    let mut executor = RecordingRunner::new();
    hook_runner()
        .flash(&build, &mut executor)
        .expect("flashing failed");

    assert_eq!(
        executor.commands(),
        vec![
            "sh -c board-reset on".to_string(),
            format!(
                "ecpprog -o 0x1000 {}",
                test_data_str("build/zephyr/zephyr.bin")
            ),
            "sh -c board-reset off".to_string(),
        ]
    );
    assert_eq!(executor.stdin_sources(), vec![None, None, None]);
}

#[test]
fn missing_offset_flashes_at_zero() {
    let build = BuildContext::new(test_data("build_no_offset"), Some("fw.bin".into()));
    let mut executor = RecordingRunner::new();
    EcpprogHookRunner::new(None, None, None, None)
        .flash(&build, &mut executor)
        .expect("flashing failed");

    assert_eq!(
        executor.commands(),
        vec!["true", "ecpprog -o 0x0 fw.bin", "true"]
    );
}

#[gtest]
#[rstest]
#[case::pre_fails(0)]
#[case::flash_fails(1)]
#[case::post_fails(2)]
fn failure_stops_the_sequence(#[case] fail_at: usize) {
    let build = BuildContext::new(test_data("build"), None);
    let mut executor = RecordingRunner::failing_at(fail_at);
    let result = hook_runner().flash(&build, &mut executor);

    assert!(matches!(result, Err(FlashError::Exit { .. })));
    expect_that!(executor.calls.len(), eq(fail_at + 1));
}

#[gtest]
fn pre_failure_is_reported_with_its_command() {
    let build = BuildContext::new(test_data("build"), None);
    let mut executor = RecordingRunner::failing_at(0);
    let result = hook_runner().flash(&build, &mut executor);

    assert_that!(
        &result,
        err(displays_as(contains_substring(
            "`sh -c board-reset on` failed with exit status: 1"
        )))
    );
    expect_that!(executor.commands().join("\n"), not(contains_substring("ecpprog")));
}

#[test]
fn bad_offset_fails_before_any_hook() {
    let build = BuildContext::new(test_data("build_bad_offset"), None);
    let mut executor = RecordingRunner::new();
    let result = hook_runner().flash(&build, &mut executor);

    assert!(matches!(result, Err(FlashError::BuildConfig { line: 2, .. })));
    assert!(executor.calls.is_empty());
}

#[test]
fn reports_its_type() {
    assert_eq!(hook_runner().runner_type(), RunnerType::EcpprogHook);
    assert_eq!(RunnerType::EcpprogHook.to_string(), "ecpprog_hook");
}
