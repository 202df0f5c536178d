//! # Data Models Module / 数据模型模块
//!
//! This module defines the data structures produced while running a suite:
//! the raw result of one interpreter invocation, the verdict for a test case,
//! and the aggregated run summary.
//!
//! 此模块定义运行测试套件时产生的数据结构：
//! 单次解释器调用的原始结果、测试用例的判定结果以及汇总的运行摘要。

use crate::core::config::TestCase;
use crate::infra::t;
use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// Enumerates the possible reasons for a test case failure.
/// 枚举测试用例失败的可能原因。
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// The interpreter ran but printed something other than the expected lines.
    /// 解释器已运行，但输出与期望行不同。
    Mismatch,
    /// The script was missing or the process could not be driven to completion.
    /// 脚本缺失，或进程无法正常运行完成。
    Launch,
    /// The invocation exceeded the configured timeout and was killed.
    /// 调用超出配置的超时时间并被终止。
    Timeout,
}

/// What a single interpreter invocation produced.
///
/// 单次解释器调用的产出。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    /// Standard output split into lines. / 按行拆分的标准输出。
    pub actual_lines: Vec<String>,
    /// Standard error, kept apart from the compared stream. / 标准错误，与比较的输出流分开保存。
    pub stderr: String,
    /// The exit code, if the process exited normally. / 进程正常退出时的退出码。
    pub exit_code: Option<i32>,
    /// Whether `actual_lines` matched the expected lines. / `actual_lines` 是否与期望行一致。
    pub succeeded: bool,
}

/// Represents the final result of a single test case.
///
/// 表示单个测试用例的最终结果。
#[derive(Debug, Clone)]
pub enum TestResult {
    /// The captured output matched. / 捕获的输出一致。
    Passed {
        case: TestCase,
        duration: Duration,
    },
    /// The test case failed for the given reason.
    /// 测试用例因给定原因失败。
    Failed {
        case: TestCase,
        reason: FailureReason,
        /// Lines actually captured (empty when nothing ran). / 实际捕获的行（未运行时为空）。
        actual: Vec<String>,
        /// Lines expected, including the trailing empty entry. / 期望的行，包含末尾空行。
        expected: Vec<String>,
        /// Human readable detail: the launch error, or the captured stderr.
        /// 可读的详细信息：启动错误或捕获的标准错误。
        detail: String,
        /// Exit code of the interpreter, if it ran to completion.
        /// 解释器运行完成时的退出码。
        exit_code: Option<i32>,
        duration: Duration,
    },
    /// The run was interrupted before this case started.
    /// 运行在此用例开始之前被中断。
    Skipped { case: TestCase },
}

impl TestResult {
    pub fn is_success(&self) -> bool {
        matches!(self, TestResult::Passed { .. })
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, TestResult::Failed { .. })
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, TestResult::Skipped { .. })
    }

    /// The failure reason, if this result is a failure.
    pub fn failure_reason(&self) -> Option<FailureReason> {
        match self {
            TestResult::Failed { reason, .. } => Some(*reason),
            _ => None,
        }
    }

    pub fn case(&self) -> &TestCase {
        match self {
            TestResult::Passed { case, .. }
            | TestResult::Failed { case, .. }
            | TestResult::Skipped { case } => case,
        }
    }

    /// Gets the name of the test case.
    /// 获取测试用例的名称。
    pub fn case_name(&self) -> &str {
        &self.case().name
    }

    /// Gets the duration of the test case. Returns None for skipped cases.
    /// 获取测试用例的持续时间。跳过的用例返回 None。
    pub fn get_duration(&self) -> Option<Duration> {
        match self {
            TestResult::Passed { duration, .. } | TestResult::Failed { duration, .. } => {
                Some(*duration)
            }
            TestResult::Skipped { .. } => None,
        }
    }

    /// Gets the status of the test result as a string for display.
    /// 以字符串形式获取测试结果的状态以供显示。
    pub fn get_status_str(&self, locale: &str) -> String {
        match self {
            TestResult::Passed { .. } => t!("report.status_passed", locale = locale).to_string(),
            TestResult::Failed { reason, .. } => match reason {
                FailureReason::Mismatch => t!("report.status_failed", locale = locale).to_string(),
                FailureReason::Launch => t!("report.status_launch", locale = locale).to_string(),
                FailureReason::Timeout => t!("report.status_timeout", locale = locale).to_string(),
            },
            TestResult::Skipped { .. } => t!("report.status_skipped", locale = locale).to_string(),
        }
    }

    /// Gets the appropriate CSS class for the test status.
    pub fn get_status_class(&self) -> &'static str {
        match self {
            TestResult::Passed { .. } => "status-Passed",
            TestResult::Failed { reason, .. } => match reason {
                FailureReason::Mismatch => "status-Failed",
                FailureReason::Launch => "status-Launch",
                FailureReason::Timeout => "status-Timeout",
            },
            TestResult::Skipped { .. } => "status-Skipped",
        }
    }
}

impl fmt::Display for TestResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestResult::Passed { case, .. } => write!(f, "{}: passed", case.name),
            TestResult::Failed { case, reason, .. } => {
                write!(f, "{}: failed ({:?})", case.name, reason)
            }
            TestResult::Skipped { case } => write!(f, "{}: skipped", case.name),
        }
    }
}

/// The aggregate of one harness run.
///
/// 一次测试运行的汇总。
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Number of cases whose output matched. / 输出一致的用例数量。
    pub success_count: usize,
    /// Number of cases that were executed. / 已执行的用例数量。
    pub total_count: usize,
    /// Per-case results in execution order. / 按执行顺序排列的各用例结果。
    pub results: Vec<TestResult>,
    /// Set when a shutdown signal stopped the run early. / 关闭信号提前终止运行时置位。
    pub interrupted: bool,
}

impl RunSummary {
    /// Records a result, updating the running counters.
    /// Skipped cases are kept for reporting but never counted.
    pub fn record(&mut self, result: TestResult) {
        if !result.is_skipped() {
            self.total_count += 1;
            if result.is_success() {
                self.success_count += 1;
            }
        }
        self.results.push(result);
    }

    /// `true` when every executed case passed and the run was not interrupted.
    pub fn all_passed(&self) -> bool {
        !self.interrupted && self.success_count == self.total_count
    }

    pub fn failures(&self) -> impl Iterator<Item = &TestResult> {
        self.results.iter().filter(|r| r.is_failure())
    }

    /// Counts failures caused by something other than wrong output.
    pub fn infrastructure_failure_count(&self) -> usize {
        self.failures()
            .filter(|r| r.failure_reason() != Some(FailureReason::Mismatch))
            .count()
    }
}
