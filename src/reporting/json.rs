//! # JSON Reporting Module / JSON 报告模块
//!
//! Writes a machine-readable summary of a run for CI pipelines.
//!
//! 为 CI 流水线写出机器可读的运行摘要。

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;

use crate::core::models::{FailureReason, RunSummary, TestResult};

#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub generated_at: chrono::DateTime<chrono::Utc>,
    pub success_count: usize,
    pub total_count: usize,
    pub interrupted: bool,
    pub cases: Vec<JsonCase<'a>>,
}

#[derive(Debug, Serialize)]
pub struct JsonCase<'a> {
    pub name: &'a str,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<FailureReason>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u128>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual: Option<&'a [String]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<&'a [String]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<&'a str>,
}

impl<'a> From<&'a TestResult> for JsonCase<'a> {
    fn from(result: &'a TestResult) -> Self {
        let mut case = JsonCase {
            name: result.case_name(),
            status: "passed",
            reason: None,
            duration_ms: result.get_duration().map(|d| d.as_millis()),
            exit_code: None,
            actual: None,
            expected: None,
            detail: None,
        };

        match result {
            TestResult::Passed { .. } => {}
            TestResult::Failed {
                reason,
                actual,
                expected,
                detail,
                exit_code,
                ..
            } => {
                case.status = "failed";
                case.reason = Some(*reason);
                case.exit_code = *exit_code;
                case.actual = Some(actual.as_slice());
                case.expected = Some(expected.as_slice());
                case.detail = Some(detail).filter(|d| !d.is_empty()).map(String::as_str);
            }
            TestResult::Skipped { .. } => case.status = "skipped",
        }
        case
    }
}

impl<'a> JsonReport<'a> {
    pub fn new(summary: &'a RunSummary) -> Self {
        Self {
            generated_at: chrono::Utc::now(),
            success_count: summary.success_count,
            total_count: summary.total_count,
            interrupted: summary.interrupted,
            cases: summary.results.iter().map(JsonCase::from).collect(),
        }
    }
}

/// Serializes the summary as pretty-printed JSON into `output_path`.
///
/// 将摘要序列化为格式化的 JSON 并写入 `output_path`。
pub fn generate_json_report(summary: &RunSummary, output_path: &Path) -> Result<()> {
    let report = JsonReport::new(summary);
    let content = serde_json::to_string_pretty(&report).context("Failed to serialize JSON report")?;
    fs::write(output_path, content)
        .with_context(|| format!("Failed to write JSON report: {}", output_path.display()))?;
    Ok(())
}
