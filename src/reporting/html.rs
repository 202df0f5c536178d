//! # HTML Reporting Module / HTML 报告模块
//!
//! This module renders a standalone HTML report of a run: summary counters,
//! a results table, and for each failure the actual and expected lines side
//! by side.
//!
//! 此模块为一次运行生成独立的 HTML 报告：汇总计数、结果表格，
//! 以及每个失败用例并排显示的实际输出行和期望输出行。

use anyhow::{Context, Result};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use std::fs;
use std::path::Path;

use crate::core::models::{RunSummary, TestResult};
use crate::infra::t;
use crate::reporting::console::format_failure_diagnostic;

/// Embedded CSS styles for HTML reports / HTML 报告的嵌入式 CSS 样式
const HTML_STYLE: &str = r#"
body { font-family: -apple-system, "Segoe UI", Helvetica, Arial, sans-serif; margin: 2em; color: #24292e; }
h1 { font-size: 1.6em; }
.meta { color: #6a737d; font-size: 0.9em; }
.summary-container { display: flex; gap: 1.5em; margin: 1.5em 0; }
.summary-item { display: flex; flex-direction: column; align-items: center; }
.count { font-size: 2em; font-weight: bold; }
.passed-text { color: #22863a; }
.failed-text { color: #cb2431; }
.skipped-text { color: #6a737d; }
table { border-collapse: collapse; width: 100%; }
th, td { border-bottom: 1px solid #e1e4e8; padding: 0.4em 0.8em; text-align: left; vertical-align: top; }
.duration-cell { text-align: right; white-space: nowrap; }
.status-cell { font-weight: bold; }
.status-Passed { color: #22863a; }
.status-Failed, .status-Launch { color: #cb2431; }
.status-Timeout { color: #b08800; }
.status-Skipped { color: #6a737d; }
pre.output-content { background: #f6f8fa; padding: 0.6em; margin: 0.3em 0; white-space: pre-wrap; }
"#;

/// Generates an HTML report from a run summary and writes it to `output_path`.
///
/// 从运行摘要生成 HTML 报告并写入 `output_path`。
///
/// # Errors / 错误
/// Returns an error if the file cannot be written.
/// 无法写入文件时返回错误。
pub fn generate_html_report(summary: &RunSummary, output_path: &Path, locale: &str) -> Result<()> {
    let markup = render_report(summary, locale);
    fs::write(output_path, markup.into_string())
        .with_context(|| format!("Failed to write HTML report: {}", output_path.display()))?;
    Ok(())
}

/// Renders the report markup without touching the file system.
pub fn render_report(summary: &RunSummary, locale: &str) -> Markup {
    let failed = summary.failures().count();
    let skipped = summary.results.iter().filter(|r| r.is_skipped()).count();
    let generated_at = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();

    html! {
        (DOCTYPE)
        html {
            head {
                meta charset="utf-8";
                title { (t!("html_report.title", locale = locale)) }
                style { (PreEscaped(HTML_STYLE)) }
            }
            body {
                h1 { (t!("html_report.main_header", locale = locale)) }
                p class="meta" { (t!("html_report.generated_at", locale = locale, time = generated_at)) }

                div class="summary-container" {
                    (summary_item(summary.total_count, "", &t!("html_report.summary.total", locale = locale)))
                    (summary_item(summary.success_count, "passed-text", &t!("html_report.summary.passed", locale = locale)))
                    (summary_item(failed, "failed-text", &t!("html_report.summary.failed", locale = locale)))
                    (summary_item(skipped, "skipped-text", &t!("html_report.summary.skipped", locale = locale)))
                }

                table {
                    thead {
                        tr {
                            th { (t!("html_report.table.header.name", locale = locale)) }
                            th { (t!("html_report.table.header.status", locale = locale)) }
                            th class="duration-cell" { (t!("html_report.table.header.duration", locale = locale)) }
                            th { (t!("html_report.table.header.details", locale = locale)) }
                        }
                    }
                    tbody {
                        @for result in &summary.results {
                            (result_row(result, locale))
                        }
                    }
                }

                p { strong { (crate::reporting::console::format_tally(summary)) } }
            }
        }
    }
}

fn summary_item(count: usize, class: &str, label: &str) -> Markup {
    html! {
        div class="summary-item" {
            span class={ "count " (class) } { (count) }
            span class="label" { (label) }
        }
    }
}

fn result_row(result: &TestResult, locale: &str) -> Markup {
    let duration_str = result
        .get_duration()
        .map(|d| format!("{:.2}s", d.as_secs_f64()))
        .unwrap_or_else(|| "N/A".to_string());

    html! {
        tr {
            td { (result.case_name()) }
            td { div class={ "status-cell " (result.get_status_class()) } { (result.get_status_str(locale)) } }
            td class="duration-cell" { (duration_str) }
            td {
                @if let TestResult::Failed { actual, expected, .. } = result {
                    @if let Some(diagnostic) = format_failure_diagnostic(result, locale) {
                        div { (diagnostic) }
                    }
                    @if !actual.is_empty() {
                        div { (t!("html_report.actual", locale = locale)) }
                        pre class="output-content" { (actual.join("\n")) }
                        div { (t!("html_report.expected", locale = locale)) }
                        pre class="output-content" { (expected.join("\n")) }
                    }
                }
            }
        }
    }
}
