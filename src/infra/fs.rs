//! # File System Operations Module / 文件系统操作模块
//!
//! Path helpers: deriving a test case's script path and resolving
//! configured paths against a base directory.
//!
//! 路径辅助函数：推导测试用例的脚本路径，并基于基础目录解析配置中的路径。

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// The script for a test case: `<scripts_dir>/<name>.<extension>`.
///
/// 测试用例对应的脚本：`<scripts_dir>/<name>.<extension>`。
pub fn script_path(scripts_dir: &Path, name: &str, extension: &str) -> PathBuf {
    scripts_dir.join(format!("{name}.{extension}"))
}

/// Joins `path` onto `base` unless it is already absolute.
pub fn resolve_against(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

/// Gets the absolute path from a potentially relative path.
///
/// # Arguments
/// * `path` - Path to canonicalize
///
/// # Returns
/// Canonicalized absolute path, or an error if the path doesn't exist
pub fn absolute_path(path: &Path) -> Result<PathBuf> {
    fs::canonicalize(path).with_context(|| format!("Failed to resolve path: {}", path.display()))
}
