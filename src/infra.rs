//! # Infrastructure Module / 基础设施模块
//!
//! This module provides infrastructure services for the harness:
//! child process execution, path handling and i18n support.
//!
//! 此模块为测试工具提供基础设施服务：
//! 子进程执行、路径处理和国际化支持。

pub mod command;
pub mod fs;

// Re-export i18n functions for easier access
pub use rust_i18n::t;
