//! # Console Reporting Module / 控制台报告模块
//!
//! This module prints per-case outcomes, failure diagnostics and the final
//! tally to the console, with colour and internationalization support.
//! The last line of every run is `<passed> / <total> tests succeeded`.
//!
//! 此模块在控制台打印每个用例的结果、失败诊断以及最终统计，支持彩色输出和国际化。
//! 每次运行的最后一行是 `<passed> / <total> tests succeeded`。

use colored::*;

use crate::core::execution::RunOptions;
use crate::core::models::{FailureReason, RunSummary, TestResult};
use crate::infra::t;

/// Number of stderr lines echoed under a failure diagnostic.
const STDERR_PREVIEW_LINES: usize = 20;

/// Formats the diagnostic line for a failed case.
///
/// Mismatches show both line sequences; launch errors and timeouts show
/// their detail instead. Returns `None` for anything but a failure.
///
/// 格式化失败用例的诊断行。
/// 输出不一致时显示两组行序列；启动错误和超时则显示其详细信息。
/// 非失败结果返回 `None`。
pub fn format_failure_diagnostic(result: &TestResult, locale: &str) -> Option<String> {
    let TestResult::Failed {
        case,
        reason,
        actual,
        expected,
        detail,
        ..
    } = result
    else {
        return None;
    };

    let line = match reason {
        FailureReason::Mismatch => t!(
            "run.test_failed_mismatch",
            locale = locale,
            name = &case.name,
            actual = format!("{:?}", actual),
            expected = format!("{:?}", expected)
        ),
        FailureReason::Launch | FailureReason::Timeout => t!(
            "run.test_failed_detail",
            locale = locale,
            name = &case.name,
            detail = detail
        ),
    };
    Some(line.to_string())
}

/// Prints the outcome of a single case as soon as it is known.
/// Failures are always reported; passes only when not quiet.
///
/// 在单个用例结果确定后立即打印。失败总是会报告；通过仅在非安静模式下报告。
pub fn print_case_outcome(result: &TestResult, options: &RunOptions) {
    let locale = options.locale.as_str();
    match result {
        TestResult::Passed { case, duration } => {
            if !options.quiet {
                println!(
                    "{}",
                    t!(
                        "run.test_passed",
                        locale = locale,
                        name = &case.name,
                        duration = format!("{:.2}", duration.as_secs_f64())
                    )
                    .green()
                );
            }
        }
        TestResult::Failed {
            reason,
            detail,
            exit_code,
            ..
        } => {
            if let Some(line) = format_failure_diagnostic(result, locale) {
                match reason {
                    FailureReason::Timeout => println!("{}", line.yellow()),
                    _ => println!("{}", line.red()),
                }
            }

            if *reason == FailureReason::Mismatch {
                if let Some(code) = exit_code.filter(|code| *code != 0) {
                    println!(
                        "  {}",
                        t!("run.exit_code", locale = locale, code = code).dimmed()
                    );
                }
                if options.show_stderr && !detail.trim().is_empty() {
                    println!("  {}", t!("run.stderr_header", locale = locale).dimmed());
                    for line in detail.lines().take(STDERR_PREVIEW_LINES) {
                        println!("    {}", line.dimmed());
                    }
                }
            }
        }
        TestResult::Skipped { .. } => {}
    }
}

/// Formats the final tally line.
///
/// The line keeps this exact English form in every locale.
///
/// 格式化最终统计行。该行在任何语言区域下都保持此英文格式。
pub fn format_tally(summary: &RunSummary) -> String {
    format!(
        "{} / {} tests succeeded",
        summary.success_count, summary.total_count
    )
}

/// Prints a summary table (unless quiet) followed by the tally line.
///
/// 打印摘要表（安静模式下省略），随后打印统计行。
///
/// # Output Format / 输出格式
/// ```text
/// --- Test Summary ---
///   - Passed           | exp                                     |     31.20ms
///   - Failed           | counter                                 |     29.87ms
///
/// 3 / 4 tests succeeded
/// ```
pub fn print_summary(summary: &RunSummary, options: &RunOptions) {
    let locale = options.locale.as_str();

    if !options.quiet && !summary.results.is_empty() {
        println!("\n{}", t!("test_summary_banner", locale = locale).bold());

        for result in &summary.results {
            let status_str = result.get_status_str(locale);
            let duration_str = result
                .get_duration()
                .map(|d| format!("{:.2?}", d))
                .unwrap_or_else(|| "N/A".to_string());

            let status_colored = match result {
                TestResult::Passed { .. } => status_str.green(),
                TestResult::Failed {
                    reason: FailureReason::Timeout,
                    ..
                } => status_str.yellow(),
                TestResult::Failed { .. } => status_str.red(),
                TestResult::Skipped { .. } => status_str.dimmed(),
            };

            println!(
                "  - {:<18} | {:<40} | {:>10}",
                status_colored,
                result.case_name(),
                duration_str
            );
        }
    }

    if summary.interrupted {
        println!("\n{}", t!("run_interrupted", locale = locale).yellow());
    }

    let infrastructure_failures = summary.infrastructure_failure_count();
    if infrastructure_failures > 0 {
        println!(
            "\n{}",
            t!(
                "infrastructure_failures",
                locale = locale,
                count = infrastructure_failures
            )
            .yellow()
        );
    }

    println!("\n{}", format_tally(summary));
}
