//! # Configuration Module / 配置模块
//!
//! This module defines the test table and the settings used to invoke the
//! interpreter under test. A suite is either loaded from a TOML file or taken
//! from the built-in default table.
//!
//! 此模块定义测试表以及调用被测解释器所需的设置。
//! 测试套件可以从 TOML 文件加载，也可以使用内置的默认测试表。

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::infra::fs::resolve_against;

/// File name looked up in the current directory when no `--config` is given.
/// 未指定 `--config` 时在当前目录中查找的文件名。
pub const DEFAULT_CONFIG_FILE: &str = "Harness.toml";

/// A single named test case: the script `<name>.<extension>` and the lines it must print.
/// 单个具名测试用例：脚本 `<name>.<extension>` 及其必须输出的行。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TestCase {
    /// Name of the test case, also the stem of its script file.
    /// 测试用例名称，同时也是脚本文件的文件名主干。
    pub name: String,
    /// The lines the interpreter is expected to print, in order.
    /// 解释器应当按顺序输出的行。
    #[serde(default)]
    pub expected: Vec<String>,
}

impl TestCase {
    pub fn new<I, S>(name: impl Into<String>, expected: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            expected: expected.into_iter().map(Into::into).collect(),
        }
    }
}

/// The whole test table together with the interpreter invocation settings.
///
/// 完整的测试表以及解释器调用设置。
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TestSuite {
    /// The language for the runner's output messages (e.g., "en", "zh-CN").
    /// When absent the `--lang` flag or the system locale decides.
    ///
    /// 运行器输出消息的语言（例如 "en", "zh-CN"）。
    /// 未设置时由 `--lang` 参数或系统区域设置决定。
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    /// The interpreter command line. The script path is appended as the last argument.
    /// 解释器命令行。脚本路径会作为最后一个参数追加。
    #[serde(default = "default_command")]
    pub command: String,

    /// Directory holding the `<name>.<extension>` scripts.
    /// 存放 `<name>.<extension>` 脚本的目录。
    #[serde(default = "default_scripts_dir")]
    pub scripts_dir: PathBuf,

    /// Extension of the script files, without the leading dot.
    /// 脚本文件的扩展名，不含前导点。
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Upper bound for a single invocation in seconds. `0` disables the bound.
    /// 单次调用的时间上限（秒）。`0` 表示不设上限。
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Working directory of the interpreter. Defaults to the suite's base directory.
    /// 解释器的工作目录。默认为测试套件的基础目录。
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_dir: Option<PathBuf>,

    /// All test cases, in the order they run.
    /// 所有测试用例，按运行顺序排列。
    #[serde(default)]
    pub cases: Vec<TestCase>,
}

fn default_command() -> String {
    "cargo run".to_string()
}

fn default_scripts_dir() -> PathBuf {
    PathBuf::from("./scripts")
}

fn default_extension() -> String {
    "script".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

impl Default for TestSuite {
    fn default() -> Self {
        Self {
            language: None,
            command: default_command(),
            scripts_dir: default_scripts_dir(),
            extension: default_extension(),
            timeout_secs: default_timeout_secs(),
            working_dir: None,
            cases: vec![],
        }
    }
}

impl TestSuite {
    /// The table the harness runs when no configuration file is present.
    /// 不存在配置文件时运行的测试表。
    pub fn builtin() -> Self {
        Self {
            cases: vec![
                TestCase::new("exp", ["4294967296", "256"]),
                TestCase::new("fibonacci", ["55"]),
                TestCase::new("counter", ["-3", "201"]),
                TestCase::new("object", ["o1", "o2", "o3", "o2"]),
            ],
            ..Self::default()
        }
    }

    /// The per-invocation timeout, or `None` when disabled.
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }

    /// Checks the suite for problems that would make every run meaningless.
    ///
    /// 检查测试套件中会导致运行失去意义的问题。
    pub fn validate(&self) -> Result<()> {
        if self.command.trim().is_empty() {
            bail!("The interpreter command must not be empty.");
        }
        if self.extension.is_empty() {
            bail!("The script extension must not be empty.");
        }

        let mut seen = HashSet::new();
        for case in &self.cases {
            if case.name.trim().is_empty() {
                bail!("Test case names must not be empty.");
            }
            if !seen.insert(case.name.as_str()) {
                bail!("Duplicate test case name: '{}'", case.name);
            }
        }
        Ok(())
    }

    /// Makes relative `scripts_dir` and `working_dir` absolute against `base`,
    /// and pins the working directory to `base` when it was not configured.
    ///
    /// 将相对的 `scripts_dir` 和 `working_dir` 基于 `base` 转换为绝对路径，
    /// 未配置工作目录时将其固定为 `base`。
    pub fn resolve_paths(&mut self, base: &Path) {
        self.scripts_dir = resolve_against(base, &self.scripts_dir);
        self.working_dir = Some(match &self.working_dir {
            Some(dir) => resolve_against(base, dir),
            None => base.to_path_buf(),
        });
    }
}

/// Loads and validates a test suite from a TOML file. Relative paths inside
/// the file are resolved against the directory containing it.
///
/// 从 TOML 文件加载并校验测试套件。文件中的相对路径基于其所在目录解析。
pub fn load_test_suite(path: &Path) -> Result<TestSuite> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let mut suite: TestSuite = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
    suite.validate()?;

    let base = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    suite.resolve_paths(base);
    Ok(suite)
}
