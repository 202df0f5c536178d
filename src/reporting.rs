//! # Reporting Module / 报告模块
//!
//! This module handles the display and persistence of run results:
//! colourful console diagnostics and summaries, plus optional HTML and JSON
//! report files.
//!
//! 此模块负责运行结果的显示和保存：彩色控制台诊断与摘要，
//! 以及可选的 HTML 和 JSON 报告文件。

pub mod console;
pub mod html;
pub mod json;

// Re-export common reporting functions
pub use console::{print_case_outcome, print_summary};
pub use html::generate_html_report;
pub use json::generate_json_report;
