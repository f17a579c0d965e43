//! Integration tests for bytefreq.

#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

use bytefreq::OutputFormat;
use bytefreq::analysis::{Analyzer, SequentialAnalyzer, analyze};
use bytefreq::core::FrequencyResult;
use bytefreq::error::JobError;
use bytefreq::session::{
    JobLauncher, JobRegistry, JobState, Launch, LoopState, MemoryOutput, OutputSink, RngSource,
    Session, SessionConfig,
};
use std::io::Cursor;
use std::sync::{Arc, Condvar, Mutex};
use std::thread;
use std::time::{Duration, Instant};

/// Helper to create a session with small, seeded buffers.
fn create_test_session(buffer_size: usize) -> (Session, MemoryOutput) {
    let (output, memory) = OutputSink::memory();
    let config = SessionConfig {
        identity: "tester".to_string(),
        buffer_size,
        seed: Some(1234),
        ..SessionConfig::default()
    };
    (Session::new(config, output), memory)
}

/// Polls until `needle` appears at least `n` times in the output.
fn wait_for(memory: &MemoryOutput, needle: &str, n: usize) -> bool {
    let deadline = Instant::now() + Duration::from_secs(30);
    while Instant::now() < deadline {
        if memory.count(needle) >= n {
            return true;
        }
        thread::sleep(Duration::from_millis(10));
    }
    false
}

/// Analyzer that blocks until released, to hold jobs in the running state.
struct GatedAnalyzer {
    gate: Arc<(Mutex<bool>, Condvar)>,
}

impl GatedAnalyzer {
    fn new() -> (Self, Arc<(Mutex<bool>, Condvar)>) {
        let gate = Arc::new((Mutex::new(false), Condvar::new()));
        (
            Self {
                gate: Arc::clone(&gate),
            },
            gate,
        )
    }
}

impl Analyzer for GatedAnalyzer {
    fn analyze(&self, bytes: &[u8]) -> FrequencyResult {
        let (lock, cvar) = &*self.gate;
        let mut open = lock.lock().unwrap();
        while !*open {
            open = cvar.wait(open).unwrap();
        }
        SequentialAnalyzer::new().analyze(bytes)
    }

    fn name(&self) -> &'static str {
        "gated"
    }
}

fn release(gate: &Arc<(Mutex<bool>, Condvar)>) {
    let (lock, cvar) = &**gate;
    *lock.lock().unwrap() = true;
    cvar.notify_all();
}

#[test]
fn test_analyze_examples() {
    assert_eq!(analyze(&[0, 0, 1, 1, 1, 2]), FrequencyResult::new(1, 3, 6));
    assert_eq!(analyze(&[5, 5, 3, 3]), FrequencyResult::new(3, 2, 4));
    assert_eq!(analyze(&[]), FrequencyResult::new(0, 0, 0));
}

#[test]
fn test_two_jobs_with_gc_between() {
    let (mut session, memory) = create_test_session(64 * 1024);

    let summary = session
        .run(Cursor::new("\ngc\n\nq\n"))
        .expect("session failed");
    assert_eq!(summary.jobs_started, 3);
    assert_eq!(summary.jobs_failed, 0);

    assert!(wait_for(&memory, "occurred", 3), "missing job reports");
    for id in 1..=3 {
        assert!(memory.contents().contains(&format!("Job {id}: the byte")));
    }
    assert!(memory.contents().contains("in a buffer of size 65536."));
    assert_eq!(memory.count("Memory reclamation ran successfully"), 1);
    assert_eq!(memory.count("Good-bye!"), 1);
}

#[test]
fn test_quit_does_not_wait_for_jobs() {
    let (output, memory) = OutputSink::memory();
    let (analyzer, gate) = GatedAnalyzer::new();
    let config = SessionConfig {
        buffer_size: 1024,
        seed: Some(7),
        ..SessionConfig::default()
    };
    let mut session = Session::with_analyzer(config, output, Arc::new(analyzer));

    let summary = session.run(Cursor::new("\nGC\nq\n")).expect("session failed");
    assert_eq!(summary.jobs_started, 2);

    // Loop has terminated while both jobs are still blocked.
    assert_eq!(session.jobs().count(JobState::Running), 2);
    assert_eq!(memory.count("occurred"), 0);
    assert_eq!(memory.count("Good-bye!"), 1);

    release(&gate);
    assert!(wait_for(&memory, "occurred", 2), "reports lost after quit");

    let deadline = Instant::now() + Duration::from_secs(10);
    while session.jobs().count(JobState::Completed) < 2 && Instant::now() < deadline {
        thread::sleep(Duration::from_millis(5));
    }
    assert_eq!(session.jobs().count(JobState::Completed), 2);
}

#[test]
fn test_unknown_command_reported_once() {
    let (mut session, memory) = create_test_session(256);

    assert_eq!(
        session.dispatch("HELP").expect("dispatch failed"),
        LoopState::AwaitingCommand
    );
    assert_eq!(memory.count("unknown command"), 1);
    assert_eq!(session.summary().unknown_commands, 1);

    // The loop still processes commands afterwards.
    assert_eq!(
        session.dispatch("gc").expect("dispatch failed"),
        LoopState::AwaitingCommand
    );
    assert_eq!(memory.count("unknown command"), 1);
}

#[test]
fn test_prompt_written_before_each_command() {
    let (mut session, memory) = create_test_session(128);
    session
        .run(Cursor::new("x\ny\nq\n"))
        .expect("session failed");
    assert_eq!(memory.count("Hello, tester on thread "), 3);
}

#[test]
fn test_out_of_memory_is_isolated() {
    let (output, memory) = OutputSink::memory();
    let config = SessionConfig {
        buffer_size: usize::MAX,
        ..SessionConfig::default()
    };
    let mut session = Session::new(config, output);

    let summary = session.run(Cursor::new("\n\nq\n")).expect("session failed");
    assert_eq!(summary.jobs_started, 3);
    assert_eq!(summary.jobs_failed, 3);
    assert_eq!(memory.count("out of memory"), 3);
    assert_eq!(session.jobs().count(JobState::Failed), 3);
    assert_eq!(memory.count("Good-bye!"), 1);
}

#[test]
fn test_out_of_memory_leaves_running_job_untouched() {
    let (output, memory) = OutputSink::memory();
    let (analyzer, gate) = GatedAnalyzer::new();
    let registry = JobRegistry::new();
    let launcher = JobLauncher::new(
        registry.clone(),
        output,
        Arc::new(analyzer),
        RngSource::new(Some(21)),
        OutputFormat::Text,
    );

    let first = launcher.launch(4096).expect("launch failed");
    assert_eq!(first, Launch::Spawned(1));

    let second = launcher.launch(usize::MAX).expect("launch failed");
    assert_eq!(
        second,
        Launch::Failed {
            id: 2,
            error: JobError::OutOfMemory {
                requested: usize::MAX
            },
        }
    );
    assert_eq!(registry.get(1).unwrap().state, JobState::Running);
    assert_eq!(registry.get(2).unwrap().state, JobState::Failed);

    release(&gate);
    assert!(wait_for(&memory, "Job 1: the byte", 1), "running job lost");

    let deadline = Instant::now() + Duration::from_secs(10);
    while registry.count(JobState::Completed) < 1 && Instant::now() < deadline {
        thread::sleep(Duration::from_millis(5));
    }
    let job = registry.get(1).unwrap();
    assert_eq!(job.state, JobState::Completed);
    assert_eq!(job.result.map(|r| r.buffer_size), Some(4096));
    assert_eq!(registry.get(2).unwrap().state, JobState::Failed);
    assert_eq!(memory.count("occurred"), 1);
    assert!(!memory.contents().contains("Job 2: the byte"));
}

#[test]
fn test_json_reports() {
    let (output, memory) = OutputSink::memory();
    let config = SessionConfig {
        buffer_size: 2048,
        seed: Some(5),
        format: OutputFormat::Json,
        ..SessionConfig::default()
    };
    let mut session = Session::new(config, output);
    session.run(Cursor::new("q\n")).expect("session failed");

    assert!(wait_for(&memory, "\"job_id\":1", 1));
    let contents = memory.contents();
    // A report can land on the same line as a pending prompt.
    let line = contents
        .lines()
        .find_map(|l| l.find('{').map(|i| &l[i..]))
        .expect("no JSON line");
    let report: serde_json::Value = serde_json::from_str(line).expect("invalid JSON");
    assert_eq!(report["job_id"], 1);
    assert_eq!(report["buffer_size"], 2048);
}

#[test]
fn test_seeded_sessions_are_reproducible() {
    let (mut a, memory_a) = create_test_session(8192);
    let (mut b, memory_b) = create_test_session(8192);
    a.run(Cursor::new("q\n")).expect("session failed");
    b.run(Cursor::new("q\n")).expect("session failed");
    assert!(wait_for(&memory_a, "occurred", 1));
    assert!(wait_for(&memory_b, "occurred", 1));

    let report = |m: &MemoryOutput| {
        m.contents()
            .lines()
            .find_map(|l| l.find("Job 1: the byte").map(|i| l[i..].to_string()))
    };
    assert_eq!(report(&memory_a), report(&memory_b));
}

mod command_tests {
    use bytefreq::error::{CommandError, Error};
    use bytefreq::session::{Command, parse_size};
    use test_case::test_case;

    #[test_case("GC", Command::Collect ; "upper gc")]
    #[test_case("gc", Command::Collect ; "lower gc")]
    #[test_case("Gc\r\n", Command::Collect ; "mixed gc crlf")]
    #[test_case("", Command::StartJob ; "empty")]
    #[test_case("\n", Command::StartJob ; "newline only")]
    #[test_case("Q", Command::Quit ; "upper q")]
    #[test_case("q\n", Command::Quit ; "lower q")]
    fn parses_known_commands(line: &str, expected: Command) {
        assert_eq!(Command::parse(line), Ok(expected));
    }

    #[test_case("HELP")]
    #[test_case("quit")]
    #[test_case("g c")]
    #[test_case(" ")]
    fn rejects_unknown_commands(line: &str) {
        assert_eq!(
            Command::parse(line),
            Err(CommandError::UnknownCommand(line.to_string()))
        );
    }

    #[test_case("0", 0)]
    #[test_case("4096", 4096)]
    #[test_case("1B", 1)]
    #[test_case("4k", 4096)]
    #[test_case("64KiB", 65_536)]
    #[test_case("2M", 2 * 1024 * 1024)]
    #[test_case("1GiB", 1 << 30)]
    #[test_case(" 8 mib ", 8 * 1024 * 1024)]
    fn parses_sizes(input: &str, expected: usize) {
        assert_eq!(parse_size(input).unwrap(), expected);
    }

    #[test_case("")]
    #[test_case("MiB")]
    #[test_case("1.5G")]
    #[test_case("10TB")]
    fn rejects_bad_sizes(input: &str) {
        assert!(matches!(parse_size(input), Err(Error::Config { .. })));
    }
}

mod property_tests {
    use bytefreq::analysis::{analyze, analyze_parallel};
    use proptest::prelude::*;

    fn naive(bytes: &[u8]) -> (u8, u64) {
        let mut best = (0u8, 0u64);
        for value in 0..=u8::MAX {
            let count = bytes.iter().filter(|&&b| b == value).count() as u64;
            if count > best.1 {
                best = (value, count);
            }
        }
        best
    }

    proptest! {
        #[test]
        fn lowest_most_frequent_wins(bytes in prop::collection::vec(any::<u8>(), 0..2000)) {
            let result = analyze(&bytes);
            prop_assert_eq!((result.value, result.count), naive(&bytes));
            prop_assert_eq!(result.buffer_size, bytes.len());
        }

        #[test]
        fn analyze_is_idempotent(bytes in prop::collection::vec(any::<u8>(), 0..500)) {
            prop_assert_eq!(analyze(&bytes), analyze(&bytes));
        }

        #[test]
        fn analyze_single_repeated_byte(value in any::<u8>(), len in 1usize..5000) {
            let bytes = vec![value; len];
            let result = analyze(&bytes);
            prop_assert_eq!(result.value, value);
            prop_assert_eq!(result.count, len as u64);
        }

        #[test]
        fn parallel_matches_sequential(
            bytes in prop::collection::vec(0u8..8, 0..5000),
            threshold in 0usize..3000,
        ) {
            prop_assert_eq!(analyze_parallel(&bytes, threshold), analyze(&bytes));
        }
    }
}

/// Binary integration tests.
mod cli_tests {
    use assert_cmd::Command;
    use predicates::prelude::*;

    fn bare() -> Command {
        let mut cmd = Command::cargo_bin("bytefreq").expect("binary not built");
        cmd.env_remove("RUST_LOG")
            .env_remove("BYTEFREQ_BUFFER_SIZE")
            .env_remove("BYTEFREQ_SEED");
        cmd
    }

    fn bytefreq() -> Command {
        let mut cmd = bare();
        cmd.args(["--identity", "alice", "--buffer-size", "4KiB", "--seed", "1"]);
        cmd
    }

    #[test]
    fn test_interactive_commands() {
        bytefreq()
            .write_stdin("HELP\nGC\nq\n")
            .assert()
            .success()
            .stdout(predicate::str::contains("Hello, alice on thread"))
            .stdout(predicate::str::contains("Sorry, unknown command: HELP"))
            .stdout(predicate::str::contains("Memory reclamation ran successfully"))
            .stdout(predicate::str::contains("Good-bye!"));
    }

    #[test]
    fn test_end_of_input_quits() {
        bytefreq()
            .write_stdin("")
            .assert()
            .success()
            .stdout(predicate::str::contains("Job 1: allocating"))
            .stdout(predicate::str::contains("Good-bye!"));
    }

    #[test]
    fn test_invalid_buffer_size() {
        bare()
            .args(["--buffer-size", "huge"])
            .write_stdin("q\n")
            .assert()
            .failure()
            .stderr(predicate::str::contains("invalid size"));
    }

    #[test]
    fn test_logs_go_to_stderr() {
        bytefreq()
            .arg("--verbose")
            .write_stdin("q\n")
            .assert()
            .success()
            .stdout(predicate::str::contains("job started").not());
    }
}
