//! # Init Command Module / 初始化命令模块
//!
//! This module implements the `init` command, which writes a starter
//! `Harness.toml` containing the built-in test table. In interactive mode a
//! short wizard asks for the interpreter command and the scripts directory.
//!
//! 此模块实现 `init` 命令，用于写出包含内置测试表的初始 `Harness.toml`。
//! 在交互模式下，一个简短的向导会询问解释器命令和脚本目录。

use anyhow::{Context, Result};
use colored::*;
use dialoguer::{Confirm, Input, theme::ColorfulTheme};
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::config::TestSuite;
use crate::infra::t;

const CONFIG_HEADER: &str = "\
# Acceptance suite for the interpreter under test.
# Each case runs `<command> <scripts_dir>/<name>.<extension>` and compares
# standard output line by line with `expected`.
# `timeout_secs = 0` lets an invocation run without a time limit.

";

/// Renders a suite as a commented TOML document.
///
/// 将测试套件渲染为带注释的 TOML 文档。
pub fn render_config(suite: &TestSuite) -> Result<String> {
    let body = toml::to_string_pretty(suite).context("Failed to serialize the configuration")?;
    Ok(format!("{CONFIG_HEADER}{body}"))
}

/// Executes the init command.
///
/// # Arguments
/// * `output` - Path for the new configuration file
/// * `force` - Overwrite an existing file without asking
/// * `non_interactive` - Skip the wizard and write the built-in table
/// * `language` - Locale for messages, also written into the file
///
/// 执行 init 命令。
pub fn execute(output: &Path, force: bool, non_interactive: bool, language: &str) -> Result<()> {
    let theme = ColorfulTheme::default();

    if !non_interactive {
        println!("\n{}", t!("init.wizard_welcome", locale = language).cyan().bold());
        println!("{}", t!("init.wizard_description", locale = language));
    }

    if output.exists() && !force {
        if non_interactive {
            println!(
                "{}",
                t!("init.file_exists", locale = language, path = output.display()).red()
            );
            println!("{}", t!("init.use_force", locale = language).yellow());
            return Ok(());
        }

        let confirmation = Confirm::with_theme(&theme)
            .with_prompt(t!("init.overwrite_prompt", locale = language, path = output.display()))
            .default(false)
            .interact()
            .context(t!("init.user_confirmation_failed", locale = language).to_string())?;
        if !confirmation {
            println!("{}", t!("init.aborted", locale = language));
            return Ok(());
        }
    }

    let mut suite = TestSuite::builtin();
    suite.language = Some(language.to_string());

    if !non_interactive {
        run_wizard(&mut suite, &theme, language)?;
    }

    write_config(output, &suite, language)
}

/// Asks for the invocation settings, keeping the suite's values as defaults.
fn run_wizard(suite: &mut TestSuite, theme: &ColorfulTheme, language: &str) -> Result<()> {
    suite.command = Input::with_theme(theme)
        .with_prompt(t!("init.command_prompt", locale = language))
        .default(suite.command.clone())
        .interact_text()
        .context(t!("init.user_confirmation_failed", locale = language).to_string())?;

    let scripts_dir: String = Input::with_theme(theme)
        .with_prompt(t!("init.scripts_dir_prompt", locale = language))
        .default(suite.scripts_dir.display().to_string())
        .interact_text()
        .context(t!("init.user_confirmation_failed", locale = language).to_string())?;
    suite.scripts_dir = PathBuf::from(scripts_dir);

    suite.extension = Input::<String>::with_theme(theme)
        .with_prompt(t!("init.extension_prompt", locale = language))
        .default(suite.extension.clone())
        .interact_text()
        .context(t!("init.user_confirmation_failed", locale = language).to_string())?
        .trim_start_matches('.')
        .to_string();

    let keep_examples = Confirm::with_theme(theme)
        .with_prompt(t!("init.examples_prompt", locale = language))
        .default(true)
        .interact()
        .context(t!("init.user_confirmation_failed", locale = language).to_string())?;
    if !keep_examples {
        suite.cases.clear();
        println!("{}", t!("init.no_cases_selected", locale = language).yellow());
    }

    Ok(())
}

fn write_config(output: &Path, suite: &TestSuite, language: &str) -> Result<()> {
    // Create parent directories if needed
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        if !parent.exists() {
            fs::create_dir_all(parent).with_context(|| {
                t!("init.create_parent_dir_failed", locale = language, path = parent.display())
                    .to_string()
            })?;
        }
    }

    let content = render_config(suite)?;
    fs::write(output, content).with_context(|| {
        t!("init.write_failed", locale = language, path = output.display()).to_string()
    })?;

    println!(
        "{}",
        t!("init.success", locale = language, path = output.display()).green()
    );
    println!("{}", t!("init.next_steps", locale = language));
    Ok(())
}
