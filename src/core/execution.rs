//! # Test Execution Engine Module / 测试执行引擎模块
//!
//! This module runs the interpreter once per test case, captures what it
//! prints, compares it with the expected lines and aggregates the results.
//! Cases run strictly one after another; each child process is bounded by
//! the configured timeout and killed whenever its future is dropped.
//!
//! 此模块为每个测试用例运行一次解释器，捕获其输出，
//! 与期望行进行比较并汇总结果。
//! 用例严格按顺序逐个运行；每个子进程受配置的超时约束，
//! 并在其 future 被丢弃时被终止。

use anyhow::{Context, Result};
use colored::*;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

use crate::{
    core::{
        compare::{expected_with_terminator, lines_match, split_output_lines},
        config::{TestCase, TestSuite},
        models::{ExecutionResult, FailureReason, RunSummary, TestResult},
    },
    infra::{command, fs::script_path, t},
    reporting::console,
};

/// Everything needed to invoke the interpreter for any test case of a suite.
///
/// 为测试套件中任一用例调用解释器所需的全部信息。
#[derive(Debug, Clone)]
pub struct RunContext {
    /// The interpreter executable. / 解释器可执行文件。
    pub program: String,
    /// Arguments placed before the script path. / 位于脚本路径之前的参数。
    pub args: Vec<String>,
    pub scripts_dir: PathBuf,
    pub extension: String,
    pub working_dir: Option<PathBuf>,
    /// `None` lets an invocation run forever. / 为 `None` 时调用可无限运行。
    pub timeout: Option<Duration>,
}

impl RunContext {
    /// Builds the context from a suite, parsing its command line.
    /// 根据测试套件构建上下文，并解析其命令行。
    pub fn from_suite(suite: &TestSuite) -> Result<Self> {
        let (program, args) = command::parse_command_line(&suite.command)?;
        Ok(Self {
            program,
            args,
            scripts_dir: suite.scripts_dir.clone(),
            extension: suite.extension.clone(),
            working_dir: suite.working_dir.clone(),
            timeout: suite.timeout(),
        })
    }

    pub fn script_path(&self, name: &str) -> PathBuf {
        script_path(&self.scripts_dir, name, &self.extension)
    }
}

/// Console behaviour of a run.
/// 运行时的控制台行为。
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Suppress per-case progress lines. / 不输出每个用例的进度行。
    pub quiet: bool,
    /// Echo captured stderr under failure diagnostics. / 在失败诊断下显示捕获的标准错误。
    pub show_stderr: bool,
    pub locale: String,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            quiet: false,
            show_stderr: false,
            locale: "en".to_string(),
        }
    }
}

/// Runs the interpreter on one test case and compares its output.
///
/// The expected lines get one implicit empty entry for the final newline.
/// The result is `Passed` exactly when the captured lines equal them.
/// A missing script, a failure while waiting on the child, or a timeout
/// yield a `Failed` result with the matching reason. An interpreter that
/// cannot be spawned at all is returned as `Err`, since no later case can
/// succeed either.
///
/// 对一个测试用例运行解释器并比较其输出。
/// 期望行会追加一个代表末尾换行的隐式空行，捕获的行与之完全相同时结果为 `Passed`。
/// 脚本缺失、等待子进程失败或超时会产生带相应原因的 `Failed` 结果。
/// 解释器根本无法启动时返回 `Err`，因为后续用例同样无法成功。
pub async fn run_and_compare(
    case: &TestCase,
    ctx: &RunContext,
    options: &RunOptions,
) -> Result<TestResult> {
    let expected = expected_with_terminator(&case.expected);
    let script = ctx.script_path(&case.name);
    let start_time = Instant::now();

    if !script.is_file() {
        let result = TestResult::Failed {
            case: case.clone(),
            reason: FailureReason::Launch,
            actual: vec![],
            expected,
            detail: t!("run.script_missing", path = script.display()).to_string(),
            exit_code: None,
            duration: start_time.elapsed(),
        };
        console::print_case_outcome(&result, options);
        return Ok(result);
    }

    if !options.quiet {
        println!("{}", t!("run.running_test", name = &case.name).blue());
    }

    let mut cmd = tokio::process::Command::new(&ctx.program);
    cmd.args(&ctx.args).arg(&script).kill_on_drop(true);
    if let Some(dir) = &ctx.working_dir {
        cmd.current_dir(dir);
    }

    let capture = command::spawn_and_capture(cmd);
    let captured = match ctx.timeout {
        Some(limit) => match tokio::time::timeout(limit, capture).await {
            Ok(res) => res,
            Err(_) => {
                let result = TestResult::Failed {
                    case: case.clone(),
                    reason: FailureReason::Timeout,
                    actual: vec![],
                    expected,
                    detail: t!("run.test_timeout_message", timeout = limit.as_secs()).to_string(),
                    exit_code: None,
                    duration: start_time.elapsed(),
                };
                console::print_case_outcome(&result, options);
                return Ok(result);
            }
        },
        None => capture.await,
    }
    .with_context(|| t!("run.launch_failed", program = &ctx.program).to_string())?;
    let duration = start_time.elapsed();

    let status = match captured.status {
        Ok(status) => status,
        Err(e) => {
            let result = TestResult::Failed {
                case: case.clone(),
                reason: FailureReason::Launch,
                actual: vec![],
                expected,
                detail: t!("run.wait_failed", error = e).to_string(),
                exit_code: None,
                duration,
            };
            console::print_case_outcome(&result, options);
            return Ok(result);
        }
    };

    let (stdout, stdout_lossy) = command::decode_utf8(&captured.stdout);
    if stdout_lossy {
        println!(
            "{}",
            t!("run.invalid_utf8", name = &case.name).yellow()
        );
    }
    let (stderr, _) = command::decode_utf8(&captured.stderr);

    let actual_lines = split_output_lines(&stdout);
    let execution = ExecutionResult {
        succeeded: lines_match(&actual_lines, &expected),
        actual_lines,
        stderr,
        exit_code: status.code(),
    };

    let result = judge(case.clone(), expected, execution, duration);
    console::print_case_outcome(&result, options);
    Ok(result)
}

/// Turns a finished invocation into the verdict for its test case.
fn judge(
    case: TestCase,
    expected: Vec<String>,
    execution: ExecutionResult,
    duration: Duration,
) -> TestResult {
    if execution.succeeded {
        TestResult::Passed { case, duration }
    } else {
        TestResult::Failed {
            case,
            reason: FailureReason::Mismatch,
            actual: execution.actual_lines,
            expected,
            detail: execution.stderr,
            exit_code: execution.exit_code,
            duration,
        }
    }
}

/// Runs every case once, in order, and tallies the results.
///
/// Cases never influence each other: a failing case does not stop the run.
/// Only an interpreter that cannot be spawned aborts it with `Err`. When
/// `stop_token` is cancelled the in-flight child is killed and the
/// remaining cases are recorded as skipped.
///
/// 按顺序将每个用例运行一次并统计结果。
/// 用例之间互不影响：失败的用例不会中止运行。
/// 只有解释器无法启动时才会以 `Err` 中止。
/// `stop_token` 被取消时，正在运行的子进程会被终止，其余用例记为跳过。
pub async fn run_all(
    cases: &[TestCase],
    ctx: &RunContext,
    options: &RunOptions,
    stop_token: &CancellationToken,
) -> Result<RunSummary> {
    let mut summary = RunSummary::default();

    for case in cases {
        if stop_token.is_cancelled() {
            summary.interrupted = true;
            summary.record(TestResult::Skipped { case: case.clone() });
            continue;
        }

        let outcome = tokio::select! {
            biased;
            _ = stop_token.cancelled() => None,
            res = run_and_compare(case, ctx, options) => Some(res),
        };

        match outcome {
            Some(result) => summary.record(result?),
            None => {
                summary.interrupted = true;
                summary.record(TestResult::Skipped { case: case.clone() });
            }
        }
    }

    Ok(summary)
}
