//! # Execution Module Unit Tests / Execution 模块单元测试
//!
//! Drives `run_and_compare` and `run_all` with synthetic interpreters:
//! `cat` prints a script verbatim and `sh` executes it.
//!
//! 使用模拟解释器驱动 `run_and_compare` 和 `run_all`：
//! `cat` 原样输出脚本内容，`sh` 执行脚本。

#![cfg(unix)]

mod common;

use common::*;
use script_acceptance::config::TestCase;
use script_acceptance::execution::{RunContext, run_all, run_and_compare};
use script_acceptance::models::{FailureReason, TestResult};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

fn scenario_cases() -> Vec<TestCase> {
    vec![
        TestCase::new("exp", ["4294967296", "256"]),
        TestCase::new("fibonacci", ["55"]),
        TestCase::new("counter", ["-3", "201"]),
        TestCase::new("object", ["o1", "o2", "o3", "o2"]),
    ]
}

#[cfg(test)]
mod run_and_compare_tests {
    use super::*;

    #[tokio::test]
    async fn test_exp_passes() {
        let dir = scripts_dir_with(SCENARIO_SCRIPTS);
        let case = TestCase::new("exp", ["4294967296", "256"]);

        let result = run_and_compare(&case, &cat_context(dir.path()), &quiet_options())
            .await
            .unwrap();
        assert!(result.is_success());
    }

    #[tokio::test]
    async fn test_fibonacci_passes() {
        let dir = scripts_dir_with(SCENARIO_SCRIPTS);
        let case = TestCase::new("fibonacci", ["55"]);

        let result = run_and_compare(&case, &cat_context(dir.path()), &quiet_options())
            .await
            .unwrap();
        assert!(result.is_success());
    }

    #[tokio::test]
    async fn test_counter_off_by_one_fails_with_both_sequences() {
        let dir = scripts_dir_with(SCENARIO_SCRIPTS);
        let case = TestCase::new("counter", ["-3", "201"]);

        let result = run_and_compare(&case, &cat_context(dir.path()), &quiet_options())
            .await
            .unwrap();

        match result {
            TestResult::Failed {
                reason,
                actual,
                expected,
                exit_code,
                ..
            } => {
                assert_eq!(reason, FailureReason::Mismatch);
                assert_eq!(actual, vec!["-3", "200", ""]);
                assert_eq!(expected, vec!["-3", "201", ""]);
                assert_eq!(exit_code, Some(0));
            }
            other => panic!("expected a mismatch, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_object_passes() {
        let dir = scripts_dir_with(SCENARIO_SCRIPTS);
        let case = TestCase::new("object", ["o1", "o2", "o3", "o2"]);

        let result = run_and_compare(&case, &cat_context(dir.path()), &quiet_options())
            .await
            .unwrap();
        assert!(result.is_success());
    }

    #[tokio::test]
    async fn test_repeated_runs_agree() {
        let dir = scripts_dir_with(SCENARIO_SCRIPTS);
        let ctx = cat_context(dir.path());

        for case in scenario_cases() {
            let first = run_and_compare(&case, &ctx, &quiet_options()).await.unwrap();
            let second = run_and_compare(&case, &ctx, &quiet_options()).await.unwrap();
            assert_eq!(first.is_success(), second.is_success(), "case {}", case.name);
        }
    }

    #[tokio::test]
    async fn test_missing_final_newline_fails() {
        let dir = scripts_dir_with(&[("fibonacci", "55")]);
        let case = TestCase::new("fibonacci", ["55"]);

        let result = run_and_compare(&case, &cat_context(dir.path()), &quiet_options())
            .await
            .unwrap();
        assert_eq!(result.failure_reason(), Some(FailureReason::Mismatch));
    }

    #[tokio::test]
    async fn test_stderr_does_not_affect_comparison() {
        let dir = scripts_dir_with(&[("noisy", "echo 55\necho 'warning: noise' >&2\n")]);
        let case = TestCase::new("noisy", ["55"]);

        let result = run_and_compare(&case, &sh_context(dir.path()), &quiet_options())
            .await
            .unwrap();
        assert!(result.is_success());
    }

    #[tokio::test]
    async fn test_stderr_is_kept_as_detail_on_mismatch() {
        let dir = scripts_dir_with(&[("noisy", "echo 54\necho 'boom' >&2\n")]);
        let case = TestCase::new("noisy", ["55"]);

        let result = run_and_compare(&case, &sh_context(dir.path()), &quiet_options())
            .await
            .unwrap();
        match result {
            TestResult::Failed { detail, actual, .. } => {
                assert_eq!(detail, "boom\n");
                assert_eq!(actual, vec!["54", ""]);
            }
            other => panic!("expected a failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_exit_code_is_not_compared() {
        let dir = scripts_dir_with(&[("exits", "echo 55\nexit 7\n")]);
        let case = TestCase::new("exits", ["55"]);

        let result = run_and_compare(&case, &sh_context(dir.path()), &quiet_options())
            .await
            .unwrap();
        assert!(result.is_success());
    }

    #[tokio::test]
    async fn test_arguments_precede_script_path() {
        let dir = scripts_dir_with(&[("args", "unused\n")]);
        // `sh -c <body> <script>` binds the script path to $0.
        let ctx = RunContext {
            args: vec!["-c".to_string(), "basename \"$0\"".to_string()],
            ..sh_context(dir.path())
        };
        let case = TestCase::new("args", ["args.script"]);

        let result = run_and_compare(&case, &ctx, &quiet_options()).await.unwrap();
        assert!(result.is_success());
    }

    #[tokio::test]
    async fn test_working_dir_is_applied() {
        let dir = scripts_dir_with(&[("pwd", "basename \"$(pwd)\"\n")]);
        let work = tempfile::tempdir().unwrap();
        let expected = work
            .path()
            .file_name()
            .unwrap()
            .to_string_lossy()
            .to_string();
        let ctx = RunContext {
            working_dir: Some(work.path().to_path_buf()),
            ..sh_context(dir.path())
        };
        let case = TestCase::new("pwd", [expected]);

        let result = run_and_compare(&case, &ctx, &quiet_options()).await.unwrap();
        assert!(result.is_success());
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_decoded_lossily_and_compared() {
        let dir = scripts_dir_with(&[]);
        std::fs::write(dir.path().join("bad.script"), b"5\xff5\n").unwrap();
        let case = TestCase::new("bad", ["55"]);

        let result = run_and_compare(&case, &cat_context(dir.path()), &quiet_options())
            .await
            .unwrap();
        match result {
            TestResult::Failed { reason, actual, .. } => {
                assert_eq!(reason, FailureReason::Mismatch);
                assert_eq!(actual, vec!["5\u{FFFD}5", ""]);
            }
            other => panic!("expected a mismatch, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_replacement_character_can_be_expected() {
        let dir = scripts_dir_with(&[]);
        std::fs::write(dir.path().join("bad.script"), b"5\xff5\n").unwrap();
        let case = TestCase::new("bad", ["5\u{FFFD}5"]);

        let result = run_and_compare(&case, &cat_context(dir.path()), &quiet_options())
            .await
            .unwrap();
        assert!(result.is_success());
    }

    #[tokio::test]
    async fn test_missing_script_is_a_launch_failure() {
        let dir = scripts_dir_with(&[]);
        let case = TestCase::new("ghost", ["1"]);

        let result = run_and_compare(&case, &cat_context(dir.path()), &quiet_options())
            .await
            .unwrap();
        match result {
            TestResult::Failed { reason, detail, actual, .. } => {
                assert_eq!(reason, FailureReason::Launch);
                assert!(detail.contains("ghost.script"));
                assert!(actual.is_empty());
            }
            other => panic!("expected a launch failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_interpreter_is_an_error() {
        let dir = scripts_dir_with(SCENARIO_SCRIPTS);
        let ctx = context_for("this_interpreter_does_not_exist_12345", dir.path());
        let case = TestCase::new("fibonacci", ["55"]);

        let err = run_and_compare(&case, &ctx, &quiet_options())
            .await
            .unwrap_err();
        assert!(format!("{err:#}").contains("this_interpreter_does_not_exist_12345"));
    }

    #[tokio::test]
    async fn test_hanging_interpreter_times_out() {
        let dir = scripts_dir_with(&[("hang", "echo started\nsleep 30\n")]);
        let ctx = RunContext {
            timeout: Some(Duration::from_secs(1)),
            ..sh_context(dir.path())
        };
        let case = TestCase::new("hang", ["started"]);

        let started = std::time::Instant::now();
        let result = run_and_compare(&case, &ctx, &quiet_options()).await.unwrap();
        assert_eq!(result.failure_reason(), Some(FailureReason::Timeout));
        assert!(started.elapsed() < Duration::from_secs(20));
    }
}

#[cfg(test)]
mod run_all_tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_suite_runs_nothing() {
        // A context pointing at a missing interpreter proves nothing is launched.
        let ctx = context_for("this_interpreter_does_not_exist_12345", std::path::Path::new("/nonexistent"));
        let summary = run_all(&[], &ctx, &quiet_options(), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(summary.success_count, 0);
        assert_eq!(summary.total_count, 0);
        assert!(summary.results.is_empty());
        assert!(summary.all_passed());
    }

    #[tokio::test]
    async fn test_scenario_three_of_four() {
        let dir = scripts_dir_with(SCENARIO_SCRIPTS);
        let summary = run_all(
            &scenario_cases(),
            &cat_context(dir.path()),
            &quiet_options(),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

        assert_eq!(summary.success_count, 3);
        assert_eq!(summary.total_count, 4);
        assert!(!summary.all_passed());

        let order: Vec<_> = summary.results.iter().map(|r| r.case_name()).collect();
        assert_eq!(order, vec!["exp", "fibonacci", "counter", "object"]);
        assert!(summary.results[2].is_failure());
    }

    #[tokio::test]
    async fn test_failures_do_not_stop_the_run() {
        let dir = scripts_dir_with(&[("good", "ok\n")]);
        let cases = vec![
            TestCase::new("missing", ["x"]),
            TestCase::new("good", ["wrong"]),
            TestCase::new("good2", ["x"]),
        ];
        let summary = run_all(
            &cases,
            &cat_context(dir.path()),
            &quiet_options(),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

        assert_eq!(summary.total_count, 3);
        assert_eq!(summary.success_count, 0);
        assert_eq!(summary.infrastructure_failure_count(), 2);
    }

    #[tokio::test]
    async fn test_missing_interpreter_aborts_the_run() {
        let dir = scripts_dir_with(SCENARIO_SCRIPTS);
        let ctx = context_for("this_interpreter_does_not_exist_12345", dir.path());

        let result = run_all(
            &scenario_cases(),
            &ctx,
            &quiet_options(),
            &CancellationToken::new(),
        )
        .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_cancelled_run_skips_remaining_cases() {
        let dir = scripts_dir_with(SCENARIO_SCRIPTS);
        let token = CancellationToken::new();
        token.cancel();

        let summary = run_all(
            &scenario_cases(),
            &cat_context(dir.path()),
            &quiet_options(),
            &token,
        )
        .await
        .unwrap();

        assert!(summary.interrupted);
        assert_eq!(summary.total_count, 0);
        assert_eq!(summary.results.len(), 4);
        assert!(summary.results.iter().all(|r| r.is_skipped()));
        assert!(!summary.all_passed());
    }

    #[tokio::test]
    async fn test_cancellation_kills_in_flight_case() {
        let dir = scripts_dir_with(&[("hang", "sleep 30\n"), ("after", "echo 1\n")]);
        let ctx = RunContext {
            timeout: None,
            ..sh_context(dir.path())
        };
        let cases = vec![TestCase::new("hang", ["1"]), TestCase::new("after", ["1"])];
        let token = CancellationToken::new();

        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(300)).await;
            canceller.cancel();
        });

        let started = std::time::Instant::now();
        let summary = run_all(&cases, &ctx, &quiet_options(), &token).await.unwrap();

        assert!(started.elapsed() < Duration::from_secs(20));
        assert!(summary.interrupted);
        assert!(summary.results.iter().all(|r| r.is_skipped()));
    }
}

/// Processes started by the interpreter share its process group and must not
/// outlive the case.
///
/// 解释器启动的进程与其共享进程组，不得在用例结束后继续存活。
#[cfg(all(test, target_os = "linux"))]
mod process_group_tests {
    use super::*;
    use std::path::Path;

    /// Alive means present in /proc and not a zombie waiting to be reaped.
    fn is_running(pid: u32) -> bool {
        match std::fs::read_to_string(format!("/proc/{pid}/stat")) {
            Ok(stat) => stat
                .rsplit(") ")
                .next()
                .and_then(|rest| rest.chars().next())
                .is_some_and(|state| state != 'Z'),
            Err(_) => false,
        }
    }

    async fn wait_until_gone(pid: u32) -> bool {
        for _ in 0..50 {
            if !is_running(pid) {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        false
    }

    fn read_pid(dir: &Path) -> u32 {
        std::fs::read_to_string(dir.join("grandchild.pid"))
            .unwrap()
            .trim()
            .parse()
            .unwrap()
    }

    fn context_in(dir: &Path, timeout: Option<Duration>) -> RunContext {
        RunContext {
            working_dir: Some(dir.to_path_buf()),
            timeout,
            ..sh_context(dir)
        }
    }

    #[tokio::test]
    async fn test_timeout_kills_grandchildren() {
        let dir = scripts_dir_with(&[(
            "hang",
            "sleep 4243 &\necho $! > grandchild.pid\nwait\n",
        )]);
        let ctx = context_in(dir.path(), Some(Duration::from_secs(1)));
        let case = TestCase::new("hang", Vec::<String>::new());

        let result = run_and_compare(&case, &ctx, &quiet_options()).await.unwrap();
        assert_eq!(result.failure_reason(), Some(FailureReason::Timeout));

        let pid = read_pid(dir.path());
        assert!(wait_until_gone(pid).await, "grandchild {pid} survived the timeout");
    }

    #[tokio::test]
    async fn test_background_process_does_not_hold_the_case_open() {
        let dir = scripts_dir_with(&[(
            "detach",
            "sleep 4244 &\necho $! > grandchild.pid\necho done\n",
        )]);
        let ctx = context_in(dir.path(), Some(Duration::from_secs(20)));
        let case = TestCase::new("detach", ["done"]);

        let started = std::time::Instant::now();
        let result = run_and_compare(&case, &ctx, &quiet_options()).await.unwrap();
        assert!(result.is_success(), "got {result:?}");
        assert!(started.elapsed() < Duration::from_secs(10));

        let pid = read_pid(dir.path());
        assert!(wait_until_gone(pid).await, "grandchild {pid} outlived the case");
    }

    #[tokio::test]
    async fn test_cancellation_kills_grandchildren() {
        let dir = scripts_dir_with(&[(
            "hang",
            "sleep 4245 &\necho $! > grandchild.pid\nwait\n",
        )]);
        let ctx = context_in(dir.path(), None);
        let cases = vec![TestCase::new("hang", Vec::<String>::new())];
        let token = CancellationToken::new();

        let canceller = token.clone();
        let pid_file = dir.path().join("grandchild.pid");
        tokio::spawn(async move {
            while !pid_file.exists() {
                tokio::time::sleep(Duration::from_millis(50)).await;
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
            canceller.cancel();
        });

        let summary = run_all(&cases, &ctx, &quiet_options(), &token).await.unwrap();
        assert!(summary.interrupted);

        let pid = read_pid(dir.path());
        assert!(wait_until_gone(pid).await, "grandchild {pid} survived cancellation");
    }
}
