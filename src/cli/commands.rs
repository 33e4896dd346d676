//! # Commands Module / 命令模块
//!
//! Subcommands of the Triage Runner CLI and the context they share.
//!
//! Triage Runner CLI 的子命令及其共享的上下文。

use anyhow::Result;
use colored::*;
use std::path::{Path, PathBuf};

use crate::core::command::RunnerOptions;
use crate::core::config::TriageConfig;
use crate::core::cycle::TriageSession;
use crate::infra::fs::{absolute_path, has_dependency_manifest, load_config, DirectoryCatalog};
use crate::infra::t;

pub mod init;
pub mod map;
pub mod triage;

/// Configuration file looked up in the project directory by default.
pub const DEFAULT_CONFIG_FILE: &str = "Triage.toml";

/// Everything a subcommand needs, resolved once per process.
/// 子命令所需的一切，每个进程解析一次。
#[derive(Debug)]
pub struct CommandContext {
    pub root: PathBuf,
    pub config: TriageConfig,
    pub extras: Vec<String>,
    pub locale: String,
}

impl CommandContext {
    /// Resolves the project root and loads its configuration.
    /// A `language` set in the configuration wins over the detected one
    /// unless `--lang` was passed.
    pub fn load(
        project_dir: &Path,
        explicit_config: Option<PathBuf>,
        extras: Vec<String>,
        detected_locale: &str,
    ) -> Result<Self> {
        let root = absolute_path(project_dir)?;
        let explicit = explicit_config.is_some();
        let config_path = explicit_config.unwrap_or_else(|| root.join(DEFAULT_CONFIG_FILE));
        let config = load_config(&config_path, explicit)?;

        let locale = if std::env::args().any(|arg| arg == "--lang") {
            detected_locale.to_string()
        } else {
            config.language.clone()
        };
        rust_i18n::set_locale(&locale);

        Ok(Self {
            root,
            config,
            extras,
            locale,
        })
    }

    pub fn session(&self) -> Result<TriageSession> {
        Ok(TriageSession::new(
            self.config.resolver(&self.root)?,
            self.config.extractor(&self.root)?,
        ))
    }

    pub fn catalog(&self) -> DirectoryCatalog {
        DirectoryCatalog::new(&self.root, self.config.layout.clone())
    }

    /// Runner options from configuration and `--extra`. The wrapped strategy
    /// degrades to the direct one when the dependency manifest is absent.
    pub fn runner_options(&self) -> RunnerOptions {
        let options = self.config.runner_options(&self.extras);
        let manifest = &self.config.runner.dependency_manifest;
        if options.use_dependency_manager() && !has_dependency_manifest(&self.root, manifest) {
            eprintln!(
                "{}",
                t!("dependency_manifest_missing", locale = self.locale.as_str(), manifest = manifest).yellow()
            );
            return options.with_dependency_manager(false);
        }
        options
    }
}
