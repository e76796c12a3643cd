// crates/dndltr-regress-cli/src/tests/console.rs
// ============================================================================
// Module: Console Reporter Tests
// Description: Unit tests for rendering run events as console lines.
// Purpose: Ensure report lines and fault diagnostics land on the right stream.
// Dependencies: dndltr-regress-cli console module, dndltr-regress-core
// ============================================================================

//! ## Overview
//! Feeds hand-built [`RunEvent`]s through [`ConsoleReporter`] over in-memory
//! buffers and checks both streams.

use std::io;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use dndltr_regress_core::CaseFailure;
use dndltr_regress_core::Comparison;
use dndltr_regress_core::DiscoveryError;
use dndltr_regress_core::InvokeError;
use dndltr_regress_core::ReportSink;
use dndltr_regress_core::ResultCode;
use dndltr_regress_core::RunEvent;
use dndltr_regress_core::RunSummary;
use dndltr_regress_core::Suite;

use crate::console::ConsoleReporter;

type Buffers = ConsoleReporter<Vec<u8>, Vec<u8>>;

fn reporter() -> Buffers {
    ConsoleReporter::new(Vec::new(), Vec::new())
}

fn streams(reporter: Buffers) -> (String, String) {
    let (out, err) = reporter.into_inner();
    (String::from_utf8(out).unwrap(), String::from_utf8(err).unwrap())
}

fn summary(code: ResultCode) -> RunSummary {
    RunSummary {
        code,
        suites_passed: 0,
        cases_passed: 0,
        failed_suite: None,
    }
}

#[test]
fn passing_run_renders_report_lines() {
    let suite = Suite::new(Path::new("/corpus/tests"), "cpu");
    let case = suite.case("nestest.nes");
    let done = summary(ResultCode::SUCCESS);
    let mut reporter = reporter();

    reporter
        .report(&RunEvent::SuiteStarted {
            suite: &suite,
        })
        .unwrap();
    reporter
        .report(&RunEvent::CasePassed {
            suite: &suite,
            case: &case,
        })
        .unwrap();
    reporter
        .report(&RunEvent::SuitePassed {
            suite: &suite,
        })
        .unwrap();
    reporter
        .report(&RunEvent::Finished {
            summary: &done,
        })
        .unwrap();

    let (out, err) = streams(reporter);
    assert_eq!(
        out,
        "SUITE: cpu\n  SUCCESS: Test nestest.nes passed\nSUCCESS: Test suite cpu \
         passed\nSUCCESS: All tests passed\n"
    );
    assert!(err.is_empty());
}

#[test]
fn mismatch_hides_reason_from_report() {
    let suite = Suite::new(Path::new("/corpus/tests"), "ppu");
    let case = suite.case("scroll.nes");
    let failure = CaseFailure::Mismatch {
        comparison: Comparison::Differs {
            offset: 54,
        },
    };
    let mut reporter = reporter();

    reporter
        .report(&RunEvent::CaseFailed {
            suite: &suite,
            case: &case,
            failure: &failure,
        })
        .unwrap();
    reporter
        .report(&RunEvent::SuiteFailed {
            suite: &suite,
            code: failure.code(),
        })
        .unwrap();

    let (out, err) = streams(reporter);
    assert_eq!(
        out,
        "  FAIL: Test scroll.nes failed: output does not match expected\nFAIL: Test suite ppu \
         failed: -1\n"
    );
    assert!(err.is_empty());
}

#[test]
fn exit_status_is_cited_verbatim() {
    let suite = Suite::new(Path::new("/corpus/tests"), "cpu");
    let case = suite.case("bad.nes");
    let failure = CaseFailure::Exited {
        code: 7,
    };
    let mut reporter = reporter();

    reporter
        .report(&RunEvent::CaseFailed {
            suite: &suite,
            case: &case,
            failure: &failure,
        })
        .unwrap();

    let (out, err) = streams(reporter);
    assert_eq!(out, "  FAIL: Test bad.nes failed: 7\n");
    assert!(err.is_empty());
}

#[test]
fn harness_faults_add_a_diagnostic_line() {
    let suite = Suite::new(Path::new("/corpus/tests"), "cpu");
    let case = suite.case("hang.nes");
    let timed_out = CaseFailure::TimedOut {
        limit: Duration::from_secs(30),
    };
    let launch = CaseFailure::Launch {
        error: InvokeError::Spawn {
            program: PathBuf::from("/corpus/bin/dndltr_d"),
            source: io::Error::new(io::ErrorKind::NotFound, "not found"),
        },
    };
    let mut reporter = reporter();

    for failure in [&timed_out, &launch, &CaseFailure::Signaled] {
        reporter
            .report(&RunEvent::CaseFailed {
                suite: &suite,
                case: &case,
                failure,
            })
            .unwrap();
    }

    let (out, err) = streams(reporter);
    assert_eq!(out, "  FAIL: Test hang.nes failed: -2\n".repeat(3));
    let errors: Vec<&str> = err.lines().collect();
    assert_eq!(errors.len(), 3);
    assert_eq!(errors[0], "Error: test hang.nes exceeded the 30s time limit");
    assert!(errors[1].starts_with("Error: test hang.nes could not be run: failed to start"));
    assert_eq!(errors[2], "Error: test hang.nes was terminated by a signal");
}

#[test]
fn discovery_failure_goes_to_diagnostics() {
    let error = DiscoveryError::ReadDir {
        path: PathBuf::from("/corpus/tests"),
        source: io::Error::new(io::ErrorKind::NotFound, "missing"),
    };
    let done = summary(ResultCode::HARNESS_FAULT);
    let mut reporter = reporter();

    reporter
        .report(&RunEvent::DiscoveryFailed {
            error: &error,
        })
        .unwrap();
    reporter
        .report(&RunEvent::Finished {
            summary: &done,
        })
        .unwrap();

    let (out, err) = streams(reporter);
    assert_eq!(out, "FAIL: Some or all tests failed\n");
    assert!(err.starts_with("Error: unable to discover suites: unable to list /corpus/tests"));
}

#[test]
fn brace_names_are_not_treated_as_placeholders() {
    let suite = Suite::new(Path::new("/corpus/tests"), "{code}");
    let case = suite.case("{code}.nes");
    let failure = CaseFailure::Exited {
        code: 7,
    };
    let mut reporter = reporter();

    reporter
        .report(&RunEvent::SuiteStarted {
            suite: &suite,
        })
        .unwrap();
    reporter
        .report(&RunEvent::CaseFailed {
            suite: &suite,
            case: &case,
            failure: &failure,
        })
        .unwrap();
    reporter
        .report(&RunEvent::SuiteFailed {
            suite: &suite,
            code: failure.code(),
        })
        .unwrap();

    let (out, _) = streams(reporter);
    assert_eq!(
        out,
        "SUITE: {code}\n  FAIL: Test {code}.nes failed: 7\nFAIL: Test suite {code} failed: 7\n"
    );
}

#[test]
fn undeletable_output_is_a_harness_fault() {
    let suite = Suite::new(Path::new("/corpus/tests"), "ppu");
    let case = suite.case("scroll.nes");
    let failure = CaseFailure::StaleOutput {
        path: PathBuf::from("/corpus/tests/ppu/output.bmp"),
        error: io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"),
    };
    let mut reporter = reporter();

    reporter
        .report(&RunEvent::CaseFailed {
            suite: &suite,
            case: &case,
            failure: &failure,
        })
        .unwrap();

    let (out, err) = streams(reporter);
    assert_eq!(out, "  FAIL: Test scroll.nes failed: -2\n");
    assert_eq!(
        err,
        "Error: test scroll.nes could not be run: stale output /corpus/tests/ppu/output.bmp could \
         not be removed: permission denied\n"
    );
}
