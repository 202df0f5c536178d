//! # Script Acceptance Library / Script Acceptance 库
//!
//! This library provides the core functionality of the `script-acceptance`
//! harness: it runs an interpreter once per named script, captures what the
//! interpreter prints and compares it line by line with the expected output.
//!
//! 此库为 `script-acceptance` 测试工具提供核心功能：
//! 它为每个具名脚本运行一次解释器，捕获解释器的输出，并与期望输出逐行比较。
//!
//! ## Modules / 模块
//!
//! - `core` - Test table, comparison, result models and the execution loop
//! - `infra` - Child process execution and path helpers
//! - `reporting` - Console diagnostics and HTML/JSON reports
//! - `cli` - Command-line interface and commands
//!
//! - `core` - 测试表、比较逻辑、结果模型和执行循环
//! - `infra` - 子进程执行和路径辅助函数
//! - `reporting` - 控制台诊断以及 HTML/JSON 报告
//! - `cli` - 命令行接口和命令

pub mod cli;
pub mod core;
pub mod infra;
pub mod reporting;

// Re-export commonly used items
pub use core::config;
pub use core::execution;
pub use core::models;

/// Picks the locale for the runner's messages.
///
/// An explicitly requested locale wins, otherwise the system locale is used.
/// The full locale (e.g. "zh-CN") is tried first, then just the language
/// code (e.g. "en" from "en-US"), and finally "en".
///
/// 选择运行器消息使用的语言区域。
/// 优先使用显式指定的区域，否则使用系统区域设置。
/// 先尝试完整区域（如 "zh-CN"），再尝试语言代码（如 "en-US" 中的 "en"），最后回退到 "en"。
pub fn resolve_locale(requested: Option<&str>) -> String {
    let locale = requested
        .map(str::to_string)
        .or_else(sys_locale::get_locale)
        .unwrap_or_else(|| "en".to_string());
    let available_locales = rust_i18n::available_locales!();

    if available_locales.contains(&locale.as_str()) {
        return locale;
    }
    locale
        .split(['-', '_'])
        .next()
        .filter(|lang_code| available_locales.contains(lang_code))
        .unwrap_or("en")
        .to_string()
}

// Initialize i18n
rust_i18n::i18n!("locales", fallback = "en");
