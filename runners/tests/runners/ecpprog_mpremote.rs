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
use ecpflash::payloads::{Payload, PayloadPins};
use ecpflash::runners::ecpprog_mpremote::{EcpprogMpremoteRunner, ScriptSource};
use ecpflash::runners::runner::{BuildContext, Runner};
use googletest::prelude::*;
use rstest::*;
use std::fs;

static MPREMOTE: &str = "mpremote run /dev/stdin";

fn scripts(names: &[&str]) -> Vec<ScriptSource> {
    names
        .iter()
        .map(|n| ScriptSource::File(test_data(&format!("scripts/{n}"))))
        .collect()
}

fn local_runner(names: &[&str]) -> EcpprogMpremoteRunner {
    EcpprogMpremoteRunner::new(
        None,
        Some("mpremote".into()),
        Some("ecpprog".into()),
        scripts(names),
    )
    .expect("failed to create runner")
}

#[test]
fn single_script_brackets_the_flash() {
    let build = BuildContext::new(test_data("build"), Some(test_data("fw.bin")));
    let mut executor = RecordingRunner::new();
    local_runner(&["reset.py"])
        .flash(&build, &mut executor)
        .expect("flashing failed");

    assert_eq!(
        executor.commands(),
        vec![MPREMOTE, "ecpprog -o 0x1000 -", MPREMOTE]
    );
    assert_eq!(
        executor.stdin_sources(),
        vec![
            Some(test_data_str("scripts/reset.py")),
            Some(test_data_str("fw.bin")),
            Some(test_data_str("scripts/reset.py")),
        ]
    );
}

#[test]
fn script_list_runs_before_and_after_flashing() {
    let build = BuildContext::new(test_data("build"), None);
    let mut executor = RecordingRunner::new();
    local_runner(&["a.py", "b.py"])
        .flash(&build, &mut executor)
        .expect("flashing failed");

    let a = Some(test_data_str("scripts/a.py"));
    let b = Some(test_data_str("scripts/b.py"));
    let image = Some(test_data_str("build/zephyr/zephyr.bin"));
    assert_eq!(
        executor.stdin_sources(),
        vec![a.clone(), b.clone(), image, a, b]
    );
    assert_eq!(
        executor
            .commands()
            .iter()
            .filter(|c| c.as_str() == MPREMOTE)
            .count(),
        4
    );
    assert_eq!(executor.commands()[2], "ecpprog -o 0x1000 -");
}

#[test]
fn tools_receive_file_contents_on_stdin() {
    let build = BuildContext::new(test_data("build"), None);
    let mut executor = RecordingRunner::new();
    local_runner(&["a.py"])
        .flash(&build, &mut executor)
        .expect("flashing failed");

    let script = fs::read(test_data("scripts/a.py")).expect("failed to read script");
    let image = fs::read(test_data("build/zephyr/zephyr.bin")).expect("failed to read image");
    assert_eq!(executor.calls[0].stdin_data.as_deref(), Some(script.as_slice()));
    assert_eq!(executor.calls[1].stdin_data.as_deref(), Some(image.as_slice()));
    assert_eq!(executor.calls[2].stdin_data.as_deref(), Some(script.as_slice()));
}

#[gtest]
#[rstest]
#[case::local(None, "")]
#[case::remote(Some("pi@flasher"), "ssh pi@flasher ")]
fn remote_host_prefixes_every_call(#[case] host: Option<&str>, #[case] prefix: &str) {
    let build = BuildContext::new(test_data("build_no_offset"), None);
    let mut executor = RecordingRunner::new();
    EcpprogMpremoteRunner::new(host.map(String::from), None, None, scripts(&["a.py", "b.py"]))
        .expect("failed to create runner")
        .flash(&build, &mut executor)
        .expect("flashing failed");

    let commands = executor.commands();
    expect_that!(commands.len(), eq(5));
    for command in &commands {
        assert!(
            command.starts_with(&format!("{prefix}.local/bin/")),
            "unexpected command {command:?}"
        );
    }
    expect_that!(
        commands[2].clone(),
        eq(&format!("{prefix}.local/bin/ecpprog -o 0x0 -"))
    );
    if host.is_none() {
        expect_that!(commands.join("\n"), not(contains_substring("ssh")));
    }
}

#[test]
fn missing_script_aborts_before_calling_mpremote() {
    let build = BuildContext::new(test_data("build"), None);
    let mut executor = RecordingRunner::new();
    let result = local_runner(&["missing.py", "a.py"]).flash(&build, &mut executor);

    assert!(matches!(result, Err(FlashError::IOOpen { .. })));
    assert!(executor.calls.is_empty());
}

#[test]
fn missing_second_script_stops_after_the_first() {
    let build = BuildContext::new(test_data("build"), None);
    let mut executor = RecordingRunner::new();
    let result = local_runner(&["a.py", "missing.py"]).flash(&build, &mut executor);

    assert!(matches!(result, Err(FlashError::IOOpen { .. })));
    assert_eq!(executor.calls.len(), 1);
}

#[gtest]
fn missing_image_is_reported_after_the_first_pass() {
    let build = BuildContext::new(test_data("build"), Some(test_data("nothing.bin")));
    let mut executor = RecordingRunner::new();
    let result = local_runner(&["a.py", "b.py"]).flash(&build, &mut executor);

    assert_that!(
        &result,
        err(displays_as(contains_substring("nothing.bin")))
    );
    expect_that!(executor.calls.len(), eq(2));
}

#[gtest]
#[rstest]
#[case::first_pass(1, 2)]
#[case::flash(2, 3)]
#[case::second_pass(3, 4)]
fn failed_call_ends_the_run(#[case] fail_at: usize, #[case] expected_calls: usize) {
    let build = BuildContext::new(test_data("build"), None);
    let mut executor = RecordingRunner::failing_at(fail_at);
    let result = local_runner(&["a.py", "b.py"]).flash(&build, &mut executor);

    assert!(matches!(result, Err(FlashError::Exit { .. })));
    expect_that!(executor.calls.len(), eq(expected_calls));
}

#[test]
fn builtin_payloads_are_piped() {
    let pins = PayloadPins {
        reset_pin: 4,
        power_pin: 5,
        hold_ms: 100,
    };
    let build = BuildContext::new(test_data("build"), None);
    let mut executor = RecordingRunner::new();
    EcpprogMpremoteRunner::new(
        None,
        None,
        None,
        vec![ScriptSource::Builtin(Payload::SoftReset)],
    )
    .expect("failed to create runner")
    .with_payload_pins(pins.clone())
    .flash(&build, &mut executor)
    .expect("flashing failed");

    let expected = Payload::SoftReset.render(&pins).into_bytes();
    assert_eq!(executor.calls[0].stdin.as_deref(), Some("builtin:soft-reset"));
    assert_eq!(executor.calls[0].stdin_data.as_deref(), Some(expected.as_slice()));
    assert_eq!(executor.calls[2].stdin_data.as_deref(), Some(expected.as_slice()));
}
