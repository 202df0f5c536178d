//! # Run Command Module / 运行命令模块
//!
//! This module implements the `run` command: it loads the suite (from a
//! config file or the built-in table), applies command-line overrides,
//! runs every selected case once and prints the tally.
//!
//! 此模块实现 `run` 命令：加载测试套件（来自配置文件或内置测试表），
//! 应用命令行覆盖项，将每个选中的用例运行一次并打印统计结果。

use anyhow::{Context, Result};
use colored::*;
use std::{env, path::Path, path::PathBuf};
use tokio::signal;
use tokio_util::sync::CancellationToken;

use crate::{
    core::{
        config::{self, TestSuite},
        execution::{RunContext, RunOptions, run_all},
        models::RunSummary,
        planner,
    },
    infra::{
        fs::{absolute_path, resolve_against},
        t,
    },
    reporting::{generate_html_report, generate_json_report, print_summary},
};

/// Options accepted by the `run` command.
/// `run` 命令接受的选项。
#[derive(Debug, Clone, Default)]
pub struct RunArgs {
    /// Explicit config file; when absent `Harness.toml` is used if present.
    /// 显式指定的配置文件；未指定时若存在 `Harness.toml` 则使用它。
    pub config: Option<PathBuf>,
    pub command: Option<String>,
    pub scripts_dir: Option<PathBuf>,
    pub extension: Option<String>,
    pub timeout_secs: Option<u64>,
    /// Run only these cases. / 仅运行这些用例。
    pub only: Vec<String>,
    pub html: Option<PathBuf>,
    pub json: Option<PathBuf>,
    pub quiet: bool,
    pub show_stderr: bool,
    pub lang: Option<String>,
}

/// Where the suite came from.
#[derive(Debug)]
enum SuiteSource {
    File(PathBuf),
    Builtin,
}

/// Executes the run command with the provided arguments.
///
/// # Returns
/// The run summary. Failing cases are part of the summary, not an error;
/// only fatal problems are returned as `Err`.
///
/// 使用提供的参数执行运行命令。
/// 返回运行摘要。失败的用例属于摘要的一部分而非错误；只有致命问题以 `Err` 返回。
pub async fn execute(args: RunArgs) -> Result<RunSummary> {
    let (mut suite, source) = load_suite(args.config.as_deref())?;
    apply_overrides(&mut suite, &args)?;
    suite.validate()?;

    let locale = crate::resolve_locale(args.lang.as_deref().or(suite.language.as_deref()));
    rust_i18n::set_locale(&locale);

    if !args.quiet {
        match &source {
            SuiteSource::File(path) => println!(
                "{}",
                t!("loading_suite", locale = &locale, path = path.display())
            ),
            SuiteSource::Builtin => println!("{}", t!("using_builtin_suite", locale = &locale)),
        }
    }

    let plan = planner::plan_execution(suite.cases.clone(), &args.only)?;
    let ctx = RunContext::from_suite(&suite)?;

    if !args.quiet {
        if plan.filtered_count > 0 {
            println!(
                "{}",
                t!(
                    "filtered_cases",
                    locale = &locale,
                    filtered = plan.filtered_count,
                    total = plan.cases_to_run.len()
                )
                .cyan()
            );
        }
        println!(
            "{}",
            t!(
                "interpreter_command",
                locale = &locale,
                command = &suite.command,
                dir = ctx.scripts_dir.display()
            )
            .cyan()
        );
        if plan.cases_to_run.is_empty() {
            println!("{}", t!("no_cases_to_run", locale = &locale).green());
        }
    }

    let options = RunOptions {
        quiet: args.quiet,
        show_stderr: args.show_stderr,
        locale: locale.clone(),
    };
    let stop_token = setup_signal_handler(&locale);

    let summary = run_all(&plan.cases_to_run, &ctx, &options, &stop_token).await?;

    write_reports(&summary, &args, &locale);
    print_summary(&summary, &options);

    Ok(summary)
}

/// Loads the suite from an explicit config, then `Harness.toml` in the
/// current directory, then the built-in table.
///
/// 依次从显式指定的配置、当前目录下的 `Harness.toml`、内置测试表加载测试套件。
fn load_suite(config_arg: Option<&Path>) -> Result<(TestSuite, SuiteSource)> {
    let config_path = match config_arg {
        Some(path) => Some(path.to_path_buf()),
        None => {
            let default_path = PathBuf::from(config::DEFAULT_CONFIG_FILE);
            default_path.is_file().then_some(default_path)
        }
    };

    match config_path {
        Some(path) => {
            let config_path = absolute_path(&path).with_context(|| {
                t!("config_read_failed_path", path = path.display()).to_string()
            })?;
            let suite = config::load_test_suite(&config_path)
                .with_context(|| t!("config_parse_failed").to_string())?;
            Ok((suite, SuiteSource::File(config_path)))
        }
        None => {
            let mut suite = TestSuite::builtin();
            let cwd = env::current_dir().context("Failed to determine the current directory")?;
            suite.resolve_paths(&cwd);
            Ok((suite, SuiteSource::Builtin))
        }
    }
}

/// Applies command-line overrides. Paths given on the command line are
/// relative to the current directory, not to the config file.
fn apply_overrides(suite: &mut TestSuite, args: &RunArgs) -> Result<()> {
    if let Some(command) = &args.command {
        suite.command = command.clone();
    }
    if let Some(dir) = &args.scripts_dir {
        let cwd = env::current_dir().context("Failed to determine the current directory")?;
        suite.scripts_dir = resolve_against(&cwd, dir);
    }
    if let Some(extension) = &args.extension {
        suite.extension = extension.trim_start_matches('.').to_string();
    }
    if let Some(timeout) = args.timeout_secs {
        suite.timeout_secs = timeout;
    }
    Ok(())
}

/// Report files are advisory: a failure to write one is printed, not propagated.
fn write_reports(summary: &RunSummary, args: &RunArgs, locale: &str) {
    if let Some(report_path) = &args.html {
        if !args.quiet {
            println!(
                "{}",
                t!("generating_html_report", locale = locale, path = report_path.display())
            );
        }
        if let Err(e) = generate_html_report(summary, report_path, locale) {
            eprintln!("{} {:#}", t!("report_write_failed", locale = locale).red(), e);
        }
    }

    if let Some(report_path) = &args.json {
        if !args.quiet {
            println!(
                "{}",
                t!("generating_json_report", locale = locale, path = report_path.display())
            );
        }
        if let Err(e) = generate_json_report(summary, report_path) {
            eprintln!("{} {:#}", t!("report_write_failed", locale = locale).red(), e);
        }
    }
}

/// Sets up a Ctrl-C handler that cancels the returned token.
fn setup_signal_handler(locale: &str) -> CancellationToken {
    let token = CancellationToken::new();
    let token_clone = token.clone();
    let locale = locale.to_string();

    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            println!("\n{}", t!("shutdown_signal", locale = &locale).yellow());
            token_clone.cancel();
        }
    });

    token
}
