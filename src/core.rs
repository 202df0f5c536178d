//! # Core Module / 核心模块
//!
//! This module contains the core functionality of the harness:
//! the test table, output comparison, result models and the execution loop.
//!
//! 此模块包含测试工具的核心功能：
//! 测试表、输出比较、结果模型以及执行循环。

pub mod compare;
pub mod config;
pub mod execution;
pub mod models;
pub mod planner;

// Re-exports
pub use config::{TestCase, TestSuite};
pub use execution::{run_all, run_and_compare};
pub use models::{RunSummary, TestResult};
