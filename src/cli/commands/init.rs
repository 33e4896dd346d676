//! # Init Command Module / 初始化命令模块
//!
//! This module implements the `init` command for the Triage Runner CLI,
//! which creates a new `Triage.toml` configuration file, either from a
//! commented template or through a short interactive wizard.
//!
//! 此模块实现了 Triage Runner CLI 的 `init` 命令，
//! 用于通过带注释的模板或简短的交互式向导创建新的 `Triage.toml` 配置文件。

use anyhow::{Context, Result};
use colored::*;
use dialoguer::{theme::ColorfulTheme, Confirm, Input};
use std::{fs, path::Path};

use crate::core::config::TriageConfig;
use crate::infra::t;

pub const DEFAULT_CONFIG: &str = r#"# Triage Runner Configuration / 分诊运行器配置

# Language for messages / 消息语言
language = "en"

# Naming convention tying sources to tests / 源文件与测试文件的命名约定
[layout]
test_dir = "spec"
source_dir = "lib"
extension = "rb"
test_suffix = "_spec"
helper_file = "spec_helper"
shared_dir = "shared"

[mapping]
# "first-match" or "union" / 首个匹配或全部匹配
policy = "first-match"
include_defaults = true

# Custom rules are tried before the built-in ones unless position = "after".
# 自定义规则默认在内置规则之前尝试，除非 position = "after"。
# [[mapping.rules]]
# pattern = "^app/models/(.*)\\.rb$"
# targets = ["spec/models/$1_spec.rb"]
#
# [[mapping.rules]]
# pattern = "^spec/support/.*\\.rb$"
# all_tests = true

[runner]
program = "rspec"
# Prefix used when `-x bundle` is given / 指定 `-x bundle` 时使用的前缀
wrapper = ["bundle", "exec"]
fixed_args = ["--tty"]
dependency_manifest = "Gemfile"
use_dependency_manager = false
# Same shape as --extra: "name[,value]" / 与 --extra 格式相同
options = []
"#;

/// Executes the init command.
///
/// # Arguments
/// * `path` - Path for the new configuration file
/// * `non_interactive` - Write the template without prompting
/// * `force` - Whether to overwrite an existing file
/// * `locale` - Language for messages
pub fn execute(path: &Path, non_interactive: bool, force: bool, locale: &str) -> Result<()> {
    let theme = ColorfulTheme::default();

    if path.exists() && !force {
        if non_interactive {
            println!(
                "{}",
                t!("init_file_exists", locale = locale, path = path.display()).red()
            );
            println!("{}", t!("init_use_force", locale = locale).yellow());
            return Ok(());
        }
        let overwrite = Confirm::with_theme(&theme)
            .with_prompt(t!("init_overwrite_prompt", locale = locale, path = path.display()))
            .default(false)
            .interact()?;
        if !overwrite {
            println!("{}", t!("init_aborted", locale = locale).yellow());
            return Ok(());
        }
    }

    let content = if non_interactive {
        DEFAULT_CONFIG.to_string()
    } else {
        run_wizard(&theme, locale)?
    };

    // Create parent directories if needed
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).with_context(|| {
                t!("init_create_parent_dir_failed", locale = locale, path = parent.display())
            })?;
        }
    }

    fs::write(path, content)
        .with_context(|| t!("init_write_failed", locale = locale, path = path.display()))?;

    println!(
        "{}",
        t!("init_success", locale = locale, path = path.display()).green()
    );
    println!("{}", t!("init_next_steps", locale = locale));
    Ok(())
}

fn run_wizard(theme: &ColorfulTheme, locale: &str) -> Result<String> {
    println!("\n{}", t!("init_wizard_welcome", locale = locale).cyan().bold());

    let mut config = TriageConfig {
        language: locale.to_string(),
        ..TriageConfig::default()
    };

    config.layout.test_dir = Input::with_theme(theme)
        .with_prompt(t!("init_prompt_test_dir", locale = locale))
        .default(config.layout.test_dir.clone())
        .interact_text()?;
    config.layout.source_dir = Input::with_theme(theme)
        .with_prompt(t!("init_prompt_source_dir", locale = locale))
        .default(config.layout.source_dir.clone())
        .interact_text()?;
    config.layout.extension = Input::with_theme(theme)
        .with_prompt(t!("init_prompt_extension", locale = locale))
        .default(config.layout.extension.clone())
        .interact_text()?;
    config.layout.test_suffix = Input::with_theme(theme)
        .with_prompt(t!("init_prompt_test_suffix", locale = locale))
        .default(config.layout.test_suffix.clone())
        .interact_text()?;
    config.runner.invocation.program = Input::with_theme(theme)
        .with_prompt(t!("init_prompt_program", locale = locale))
        .default(config.runner.invocation.program.clone())
        .interact_text()?;
    config.runner.use_dependency_manager = Confirm::with_theme(theme)
        .with_prompt(t!("init_prompt_dependency_manager", locale = locale))
        .default(false)
        .interact()?;

    toml::to_string_pretty(&config).context("Failed to serialize configuration")
}
