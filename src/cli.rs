//! # Command Line Interface / 命令行接口
//!
//! Builds the `script-acceptance` command with localized help texts and
//! dispatches to the `run` and `init` commands. Without a subcommand the
//! harness runs, so the top level accepts the same options as `run`.
//!
//! 构建带本地化帮助文本的 `script-acceptance` 命令，并分发到 `run` 和 `init` 命令。
//! 未指定子命令时直接运行测试，因此顶层接受与 `run` 相同的选项。

pub mod commands;

use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::{env, path::PathBuf, process::ExitCode};

use crate::infra::t;
use commands::run::RunArgs;

/// Pre-parses the command line arguments to find the language setting.
/// This allows i18n to be initialized before the full CLI is built.
/// It looks for a `--lang <VALUE>` or `--lang=<VALUE>` argument.
fn pre_parse_language() -> Option<String> {
    let args: Vec<String> = env::args().collect();
    if let Some(pos) = args.iter().position(|arg| arg == "--lang") {
        return args.get(pos + 1).cloned();
    }
    args.iter()
        .find_map(|arg| arg.strip_prefix("--lang=").map(str::to_string))
}

fn run_args(locale: &str) -> Vec<Arg> {
    vec![
        Arg::new("config")
            .short('c')
            .long("config")
            .help(t!("arg_config", locale = locale).to_string())
            .value_name("CONFIG")
            .value_parser(clap::value_parser!(PathBuf))
            .action(ArgAction::Set),
        Arg::new("command")
            .long("command")
            .help(t!("arg_command", locale = locale).to_string())
            .value_name("COMMAND")
            .action(ArgAction::Set),
        Arg::new("scripts-dir")
            .long("scripts-dir")
            .help(t!("arg_scripts_dir", locale = locale).to_string())
            .value_name("DIR")
            .value_parser(clap::value_parser!(PathBuf))
            .action(ArgAction::Set),
        Arg::new("extension")
            .long("extension")
            .help(t!("arg_extension", locale = locale).to_string())
            .value_name("EXT")
            .action(ArgAction::Set),
        Arg::new("timeout")
            .long("timeout")
            .help(t!("arg_timeout", locale = locale).to_string())
            .value_name("SECS")
            .value_parser(clap::value_parser!(u64))
            .action(ArgAction::Set),
        Arg::new("test")
            .short('t')
            .long("test")
            .help(t!("arg_test", locale = locale).to_string())
            .value_name("NAME")
            .action(ArgAction::Append),
        Arg::new("html")
            .long("html")
            .help(t!("arg_html", locale = locale).to_string())
            .value_name("HTML")
            .value_parser(clap::value_parser!(PathBuf))
            .action(ArgAction::Set),
        Arg::new("json")
            .long("json")
            .help(t!("arg_json", locale = locale).to_string())
            .value_name("JSON")
            .value_parser(clap::value_parser!(PathBuf))
            .action(ArgAction::Set),
        Arg::new("quiet")
            .short('q')
            .long("quiet")
            .help(t!("arg_quiet", locale = locale).to_string())
            .action(ArgAction::SetTrue),
        Arg::new("show-stderr")
            .long("show-stderr")
            .help(t!("arg_show_stderr", locale = locale).to_string())
            .action(ArgAction::SetTrue),
    ]
}

fn build_cli(locale: &str) -> Command {
    Command::new("script-acceptance")
        .version(env!("CARGO_PKG_VERSION"))
        .about(t!("cli_about", locale = locale).to_string())
        .arg(
            Arg::new("lang")
                .long("lang")
                .help(t!("cli_lang", locale = locale).to_string())
                .value_name("LANGUAGE")
                .global(true)
                .action(ArgAction::Set),
        )
        .args(run_args(locale))
        .subcommand(
            Command::new("run")
                .about(t!("cmd_run_about", locale = locale).to_string())
                .args(run_args(locale)),
        )
        .subcommand(
            Command::new("init")
                .about(t!("cmd_init_about", locale = locale).to_string())
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .help(t!("arg_init_output", locale = locale).to_string())
                        .value_name("PATH")
                        .default_value(crate::config::DEFAULT_CONFIG_FILE)
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("force")
                        .long("force")
                        .help(t!("arg_init_force", locale = locale).to_string())
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("non-interactive")
                        .long("non-interactive")
                        .help(t!("arg_init_non_interactive", locale = locale).to_string())
                        .action(ArgAction::SetTrue),
                ),
        )
}

/// Collects the `run` options from either the top level or the `run` subcommand.
fn run_args_from_matches(matches: &ArgMatches, lang: Option<String>) -> RunArgs {
    RunArgs {
        config: matches.get_one::<PathBuf>("config").cloned(),
        command: matches.get_one::<String>("command").cloned(),
        scripts_dir: matches.get_one::<PathBuf>("scripts-dir").cloned(),
        extension: matches.get_one::<String>("extension").cloned(),
        timeout_secs: matches.get_one::<u64>("timeout").copied(),
        only: matches
            .get_many::<String>("test")
            .map(|names| names.cloned().collect())
            .unwrap_or_default(),
        html: matches.get_one::<PathBuf>("html").cloned(),
        json: matches.get_one::<PathBuf>("json").cloned(),
        quiet: matches.get_flag("quiet"),
        show_stderr: matches.get_flag("show-stderr"),
        lang,
    }
}

/// Parses the command line and runs the selected command.
///
/// Returns the process exit code: success when every executed case passed,
/// failure otherwise. Fatal problems (unreadable configuration, an
/// interpreter that cannot be spawned) come back as `Err`.
///
/// 解析命令行并运行选定的命令。
/// 返回进程退出码：所有已执行用例通过时为成功，否则为失败。
/// 致命问题（无法读取配置、解释器无法启动）以 `Err` 返回。
pub async fn run() -> Result<ExitCode> {
    // Pre-parse language and initialize i18n first.
    let requested_language = pre_parse_language();
    let language = crate::resolve_locale(requested_language.as_deref());
    rust_i18n::set_locale(&language);

    let matches = build_cli(&language).get_matches();
    let lang = requested_language;

    match matches.subcommand() {
        Some(("init", init_matches)) => {
            let output = init_matches
                .get_one::<PathBuf>("output")
                .cloned()
                .unwrap_or_else(|| PathBuf::from(crate::config::DEFAULT_CONFIG_FILE));
            let force = init_matches.get_flag("force");
            let non_interactive = init_matches.get_flag("non-interactive");

            commands::init::execute(&output, force, non_interactive, &language)?;
            Ok(ExitCode::SUCCESS)
        }
        Some(("run", run_matches)) => {
            let summary = commands::run::execute(run_args_from_matches(run_matches, lang)).await?;
            Ok(exit_code_for(summary.all_passed()))
        }
        _ => {
            let summary = commands::run::execute(run_args_from_matches(&matches, lang)).await?;
            Ok(exit_code_for(summary.all_passed()))
        }
    }
}

fn exit_code_for(all_passed: bool) -> ExitCode {
    if all_passed {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
