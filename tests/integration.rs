use std::cell::RefCell;

use gitchord::chord::ChordInvocation;
use gitchord::config_file::ConfigError;
use gitchord::executor::{CommandLine, ExecutionError, Outcome, ProcessRunner, Runner};
use gitchord::load_registry;
use gitchord::registry::Registry;
use gitchord::sequencer::{SequenceError, Sequencer};

/// Records each command line; the `fail_at`-th call (1-based) exits with 1.
struct RecordingRunner {
    calls: RefCell<Vec<String>>,
    fail_at: Option<usize>,
}

impl RecordingRunner {
    fn new(fail_at: Option<usize>) -> Self {
        RecordingRunner {
            calls: RefCell::new(Vec::new()),
            fail_at,
        }
    }
}

impl Runner for RecordingRunner {
    fn run(&self, line: &CommandLine) -> std::io::Result<Outcome> {
        let mut calls = self.calls.borrow_mut();
        calls.push(line.to_string());
        let success = self.fail_at != Some(calls.len());
        Ok(Outcome {
            success,
            exit_code: Some(i32::from(!success)),
        })
    }
}

fn write_config(dir: &std::path::Path, content: &str) -> String {
    let path = dir.join(".gitchord.yaml");
    std::fs::write(&path, content).unwrap();
    path.to_string_lossy().to_string()
}

fn run_chord(
    registry: &Registry,
    chord: &str,
    args: &[&str],
    fail_at: Option<usize>,
) -> (Result<usize, SequenceError>, Vec<String>) {
    let invocation = ChordInvocation::with_branch(
        chord,
        args.iter().map(ToString::to_string).collect(),
        "feature/login",
    );
    let sequencer = Sequencer::new(registry, RecordingRunner::new(fail_at));
    let result = sequencer.run(&invocation).map(|report| report.executed);
    let calls = sequencer.executor().runner().calls.borrow().clone();
    (result, calls)
}

fn builtin() -> Registry {
    Registry::builtin().unwrap()
}

#[test]
fn test_empty_chord_is_status() {
    let (result, calls) = run_chord(&builtin(), "", &[], None);
    assert_eq!(result.unwrap(), 1);
    assert_eq!(calls, vec!["git status"]);
}

#[test]
fn test_add_all() {
    let (_, calls) = run_chord(&builtin(), "a", &[], None);
    assert_eq!(calls, vec!["git add -A"]);
}

#[test]
fn test_commit_with_positional_message() {
    let (_, calls) = run_chord(&builtin(), "c", &["Fix bug"], None);
    assert_eq!(calls, vec!["git commit -m 'Fix bug'"]);
}

#[test]
fn test_add_commit_push() {
    let (result, calls) = run_chord(&builtin(), "acp", &["Feature complete"], None);
    assert_eq!(result.unwrap(), 3);
    assert_eq!(
        calls,
        vec![
            "git add -A",
            "git commit -m 'Feature complete'",
            "git push"
        ]
    );
}

#[test]
fn test_inline_arguments() {
    let (result, calls) = run_chord(&builtin(), r#"x"develop"ac"message"p"#, &[], None);
    assert_eq!(result.unwrap(), 4);
    assert_eq!(
        calls,
        vec![
            "git checkout develop",
            "git add -A",
            "git commit -m message",
            "git push"
        ]
    );
}

#[test]
fn test_checkout_default_branch() {
    let (_, calls) = run_chord(&builtin(), "x", &[], None);
    assert_eq!(calls, vec!["git checkout main"]);
}

#[test]
fn test_unknown_key_runs_nothing() {
    let (result, calls) = run_chord(&builtin(), "az", &[], None);
    match result {
        Err(SequenceError::Parse(err)) => {
            assert_eq!(err.to_string(), "Unknown command 'z' at position 1");
        }
        other => panic!("Expected Parse error, got: {other:?}"),
    }
    assert!(calls.is_empty());
}

#[test]
fn test_macro_failure_skips_remaining_steps() {
    let (result, calls) = run_chord(&builtin(), "S", &[], Some(2));
    assert_eq!(calls, vec!["git checkout main", "git pull"]);
    match result {
        Err(SequenceError::Step { index, key, .. }) => {
            assert_eq!(index, 2);
            assert_eq!(key, "l");
        }
        other => panic!("Expected Step error, got: {other:?}"),
    }
}

#[test]
fn test_macro_runs_with_captured_branch() {
    let (result, calls) = run_chord(&builtin(), "S", &[], None);
    assert_eq!(result.unwrap(), 4);
    assert_eq!(
        calls,
        vec![
            "git checkout main",
            "git pull",
            "git checkout feature/login",
            "git rebase main"
        ]
    );
}

#[test]
fn test_wip_macro_message_is_single_argument() {
    let (_, calls) = run_chord(&builtin(), "W", &[], None);
    assert_eq!(
        calls,
        vec![
            "git add -A",
            "git commit -m 'WIP on feature/login'",
            "git push"
        ]
    );
}

#[test]
fn test_config_overrides_and_extends() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        dir.path(),
        r#"
gitchord_version: "0.1.0"
default_chord: "sg"
commands:
  - key: x
    template: "switch {}"
    default: trunk
  - key: w
    template: "worktree add {}"
    arg: required
    description: Add a worktree
multi:
  - key: sw
    cmd: "switch -"
macros:
  - key: T
    steps: "x:w ../{branch}-review"
"#,
    );
    let (registry, used) = load_registry(Some(&path)).unwrap();
    assert_eq!(used.unwrap().to_string_lossy(), path);

    let (_, calls) = run_chord(&registry, "", &[], None);
    assert_eq!(calls[0], "git status");
    assert!(calls[1].starts_with("git log"));

    let (_, calls) = run_chord(&registry, "xswT", &[], None);
    assert_eq!(
        calls,
        vec![
            "git switch trunk",
            "git switch -",
            "git switch trunk",
            "git worktree add ../feature/login-review"
        ]
    );
}

#[test]
fn test_config_rejects_bad_template() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        dir.path(),
        r#"
gitchord_version: "0.1.0"
commands:
  - key: k
    template: "status"
"#,
    );
    match load_registry(Some(&path)) {
        Err(ConfigError::Placeholder { template, count }) => {
            assert_eq!(template, "status");
            assert_eq!(count, 0);
        }
        other => panic!("Expected Placeholder error, got: {other:?}"),
    }
}

#[test]
fn test_config_rejects_macro_with_unknown_step() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        dir.path(),
        r#"
gitchord_version: "0.1.0"
macros:
  - key: Q
    steps: "a:q"
"#,
    );
    match load_registry(Some(&path)) {
        Err(ConfigError::Validation(msg)) => assert!(msg.contains("unknown command"), "got: {msg}"),
        other => panic!("Expected Validation error, got: {other:?}"),
    }
}

#[cfg(unix)]
#[test]
fn test_process_runner_exit_status() {
    let dir = tempfile::tempdir().unwrap();

    let path = write_config(dir.path(), "gitchord_version: '0.1.0'\nvcs: 'true'\n");
    let (registry, _) = load_registry(Some(&path)).unwrap();
    let invocation = ChordInvocation::with_branch("ac", vec!["msg".to_string()], "main");
    let report = Sequencer::new(&registry, ProcessRunner)
        .run(&invocation)
        .unwrap();
    assert_eq!(report.executed, 2);

    let path = write_config(dir.path(), "gitchord_version: '0.1.0'\nvcs: 'false'\n");
    let (registry, _) = load_registry(Some(&path)).unwrap();
    let invocation = ChordInvocation::with_branch("ap", vec![], "main");
    match Sequencer::new(&registry, ProcessRunner).run(&invocation) {
        Err(SequenceError::Step { index, source, .. }) => {
            assert_eq!(index, 1);
            match source {
                ExecutionError::Failed { exit_code, .. } => assert_eq!(exit_code, Some(1)),
                other => panic!("Expected Failed, got: {other:?}"),
            }
        }
        other => panic!("Expected Step error, got: {other:?}"),
    }
}

#[cfg(unix)]
fn gitchord(dir: &std::path::Path, config: &str, words: &[&str]) -> std::process::Output {
    std::process::Command::new(env!("CARGO_BIN_EXE_gitchord"))
        .current_dir(dir)
        .arg("--config")
        .arg(config)
        .args(words)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

#[cfg(unix)]
#[test]
fn test_binary_exit_codes() {
    let ok_dir = tempfile::tempdir().unwrap();
    let ok = write_config(ok_dir.path(), "gitchord_version: '0.1.0'\nvcs: 'true'\n");
    let failing_dir = tempfile::tempdir().unwrap();
    let failing = write_config(
        failing_dir.path(),
        "gitchord_version: '0.1.0'\nvcs: 'false'\n",
    );
    let broken_dir = tempfile::tempdir().unwrap();
    let broken = write_config(
        broken_dir.path(),
        "gitchord_version: '0.1.0'\ncommands:\n  - key: k\n    template: 'status'\n",
    );

    assert!(gitchord(ok_dir.path(), &ok, &["acp", "msg"]).status.success());
    assert!(gitchord(ok_dir.path(), &ok, &[]).status.success());

    // Unknown key
    assert!(!gitchord(ok_dir.path(), &ok, &["az"]).status.success());
    // Missing required argument
    assert!(!gitchord(ok_dir.path(), &ok, &["c"]).status.success());
    // Failing step
    assert!(!gitchord(failing_dir.path(), &failing, &["a"]).status.success());
    // Invalid config
    assert!(!gitchord(broken_dir.path(), &broken, &["s"]).status.success());
    let missing = ok_dir.path().join("missing.yaml");
    assert!(
        !gitchord(ok_dir.path(), &missing.to_string_lossy(), &["s"])
            .status
            .success()
    );
}

#[cfg(unix)]
#[test]
fn test_binary_hyphen_arguments_after_chord() {
    let dir = tempfile::tempdir().unwrap();
    let ok = write_config(dir.path(), "gitchord_version: '0.1.0'\nvcs: 'true'\n");

    let output = gitchord(dir.path(), &ok, &["c", "-q"]);
    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("❱ true commit -m -q"), "got: {stderr}");

    let failing_dir = tempfile::tempdir().unwrap();
    let failing = write_config(
        failing_dir.path(),
        "gitchord_version: '0.1.0'\nvcs: 'false'\n",
    );

    // Before the chord `-n` is the dry-run flag
    let output = gitchord(failing_dir.path(), &failing, &["-n", "acp", "msg"]);
    assert!(output.status.success());

    // After the chord it is just an argument, so the commands really run
    let output = gitchord(failing_dir.path(), &failing, &["acp", "msg", "-n"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Ignoring unused argument(s): -n"),
        "got: {stderr}"
    );
}

#[cfg(unix)]
#[test]
fn test_binary_discovered_config_is_not_echoed() {
    let dir = tempfile::tempdir().unwrap();
    write_config(dir.path(), "gitchord_version: '0.1.0'\nvcs: 'true'\n");
    let output = std::process::Command::new(env!("CARGO_BIN_EXE_gitchord"))
        .current_dir(dir.path())
        .arg("a")
        .env_remove("RUST_LOG")
        .output()
        .unwrap();
    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(stderr.lines().collect::<Vec<_>>(), vec!["❱ true add -A"]);
}
