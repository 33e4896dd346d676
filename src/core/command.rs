//! # Command Builder Module / 命令构建模块
//!
//! Renders the shell command line that runs a finalized set of test targets.
//! An empty target set renders as the empty string, meaning "skip this cycle":
//! most runners treat "no arguments" as "run the whole project".
//!
//! 渲染运行一组最终测试目标的 shell 命令行。
//! 空的目标集合渲染为空字符串，表示"跳过本轮"：
//! 大多数运行器会把"没有参数"理解为"运行整个项目"。

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use tracing::warn;

use crate::core::target::TestTarget;

/// Option name that selects the dependency-manager-wrapped invocation.
/// It is consumed by the builder and never forwarded to the runner.
/// 选择依赖管理器包装调用方式的选项名。它由构建器消费，永远不会转发给运行器。
pub const DEPENDENCY_MANAGER_OPTION: &str = "bundle";

/// A single option forwarded to the runner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunnerOption {
    pub name: String,
    pub value: Option<String>,
}

impl RunnerOption {
    /// `-t` for single-character names, `--format` otherwise.
    pub fn flag(&self) -> String {
        if self.name.chars().count() == 1 {
            format!("-{}", self.name)
        } else {
            format!("--{}", self.name)
        }
    }
}

/// Runner options for one process lifetime, with the invocation strategy
/// pulled out as an explicit flag. Built once, never mutated during a cycle.
///
/// 单个进程生命周期内的运行器选项，调用策略被提取为显式标志。
/// 构建一次，在一轮中不会被修改。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunnerOptions {
    options: Vec<RunnerOption>,
    use_dependency_manager: bool,
}

impl RunnerOptions {
    /// Builds options from `(name, value)` pairs. The reserved selector sets
    /// the strategy flag; malformed names are skipped with a warning.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, Option<String>)>,
    {
        let mut options = Vec::new();
        let mut use_dependency_manager = false;

        for (raw_name, value) in pairs {
            let name = raw_name.trim().trim_start_matches('-').to_string();
            if name.is_empty() || name.chars().any(char::is_whitespace) {
                warn!(option = %raw_name, "malformed runner option skipped");
                continue;
            }
            if name == DEPENDENCY_MANAGER_OPTION {
                use_dependency_manager = true;
                continue;
            }
            let value = value.filter(|v| !v.is_empty());
            options.push(RunnerOption { name, value });
        }

        Self {
            options,
            use_dependency_manager,
        }
    }

    /// Parses `name[,value]` entries as given on the command line
    /// (`-x t,slow -x format,documentation -x bundle`).
    pub fn parse<I, S>(raw: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::from_pairs(raw.into_iter().map(|entry| {
            let entry = entry.as_ref();
            match entry.split_once(',') {
                Some((name, value)) => (name.to_string(), Some(value.to_string())),
                None => (entry.to_string(), None),
            }
        }))
    }

    /// Forces the strategy flag, e.g. from configuration or environment probing.
    pub fn with_dependency_manager(mut self, enabled: bool) -> Self {
        self.use_dependency_manager = enabled;
        self
    }

    pub fn use_dependency_manager(&self) -> bool {
        self.use_dependency_manager
    }

    /// The options forwarded to the runner; the selector is never among them.
    pub fn passthrough(&self) -> &[RunnerOption] {
        &self.options
    }

    /// Options rendered as argv words.
    pub fn to_args(&self) -> Vec<String> {
        let mut args = Vec::with_capacity(self.options.len() * 2);
        for option in &self.options {
            args.push(option.flag());
            if let Some(value) = &option.value {
                args.push(value.clone());
            }
        }
        args
    }
}

/// The two ways the runner can be started.
/// 运行器的两种启动方式。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RunnerInvocation {
    /// Runner binary, e.g. `rspec`.
    pub program: String,
    /// Prefix for the wrapped strategy, e.g. `bundle exec`.
    pub wrapper: Vec<String>,
    /// Arguments always passed after the options.
    pub fixed_args: Vec<String>,
}

impl Default for RunnerInvocation {
    fn default() -> Self {
        Self {
            program: "rspec".to_string(),
            wrapper: vec!["bundle".to_string(), "exec".to_string()],
            fixed_args: vec!["--tty".to_string()],
        }
    }
}

/// Renders runner command lines.
#[derive(Debug, Clone, Default)]
pub struct CommandBuilder {
    invocation: RunnerInvocation,
}

impl CommandBuilder {
    pub fn new(invocation: RunnerInvocation) -> Self {
        Self { invocation }
    }

    pub fn invocation(&self) -> &RunnerInvocation {
        &self.invocation
    }

    /// The argv for running `targets`, or `None` when there is nothing to run.
    /// Targets are deduplicated, first occurrence kept.
    pub fn build_args(&self, targets: &[TestTarget], options: &RunnerOptions) -> Option<Vec<String>> {
        let mut unique: Vec<&TestTarget> = Vec::with_capacity(targets.len());
        for target in targets {
            if !unique.contains(&target) {
                unique.push(target);
            }
        }
        if unique.is_empty() {
            return None;
        }

        let mut args = Vec::new();
        if options.use_dependency_manager() {
            args.extend(self.invocation.wrapper.iter().cloned());
        }
        args.push(self.invocation.program.clone());
        args.extend(options.to_args());
        args.extend(self.invocation.fixed_args.iter().cloned());
        args.extend(unique.iter().map(|t| t.to_string()));
        Some(args)
    }

    /// The shell command line for `targets`; empty when `targets` is empty.
    ///
    /// # Examples
    /// ```
    /// use triage_runner::core::command::{CommandBuilder, RunnerOptions};
    ///
    /// let builder = CommandBuilder::default();
    /// assert_eq!(builder.build(&[], &RunnerOptions::default()), "");
    /// ```
    pub fn build(&self, targets: &[TestTarget], options: &RunnerOptions) -> String {
        let Some(args) = self.build_args(targets, options) else {
            return String::new();
        };
        args.iter()
            .filter_map(|arg| quote(arg))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn quote(arg: &str) -> Option<String> {
    match shlex::try_quote(arg) {
        Ok(quoted) => Some(Cow::into_owned(quoted)),
        Err(e) => {
            // Only NUL bytes are unquotable.
            warn!(argument = %arg.escape_debug(), error = %e, "argument dropped from command line");
            None
        }
    }
}
