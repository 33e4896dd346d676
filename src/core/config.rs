//! # Configuration Module / 配置模块
//!
//! The `Triage.toml` model. Every field has a default, so an absent or
//! partial file yields the built-in RSpec policy.
//!
//! `Triage.toml` 的模型。每个字段都有默认值，
//! 因此缺失或不完整的文件会使用内置的 RSpec 策略。

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::command::{CommandBuilder, RunnerInvocation, RunnerOptions};
use crate::core::error::TriageError;
use crate::core::extract::{FailureExtractor, OutputSignatures};
use crate::core::layout::ProjectLayout;
use crate::core::mapping::{builtin_rules, MappingRule, MappingTable, MatchPolicy, PathResolver};

/// Where a custom rule is registered relative to the built-in ones.
/// 自定义规则相对于内置规则的注册位置。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RulePosition {
    /// Ahead of the built-in rules, overriding them.
    #[default]
    Before,
    After,
}

/// A mapping rule as written in the configuration file.
/// 配置文件中编写的映射规则。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RuleConfig {
    /// Regular expression matched against the root-relative changed path.
    pub pattern: String,
    /// Target templates; `$1` and `${name}` refer to capture groups.
    #[serde(default)]
    pub targets: Vec<String>,
    /// Fan out to every known test file instead of using `targets`.
    #[serde(default)]
    pub all_tests: bool,
    #[serde(default)]
    pub position: RulePosition,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct MappingConfig {
    pub policy: MatchPolicy,
    /// Register the three built-in rules.
    pub include_defaults: bool,
    pub rules: Vec<RuleConfig>,
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self {
            policy: MatchPolicy::FirstMatch,
            include_defaults: true,
            rules: vec![],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RunnerConfig {
    #[serde(flatten)]
    pub invocation: RunnerInvocation,
    /// File whose presence means the dependency manager is usable.
    pub dependency_manifest: String,
    pub use_dependency_manager: bool,
    /// `name[,value]` entries, same shape as `--extra`.
    pub options: Vec<String>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            invocation: RunnerInvocation::default(),
            dependency_manifest: "Gemfile".to_string(),
            use_dependency_manager: false,
            options: vec![],
        }
    }
}

/// Optional replacements for the output signatures.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SignatureConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completion: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_header: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backtrace_frame: Option<String>,
}

/// The whole configuration file.
/// 整个配置文件。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TriageConfig {
    /// The language for the runner's output messages (e.g., "en", "zh-CN").
    /// 运行器输出消息的语言（例如 "en", "zh-CN"）。
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default)]
    pub layout: ProjectLayout,
    #[serde(default)]
    pub mapping: MappingConfig,
    #[serde(default)]
    pub runner: RunnerConfig,
    #[serde(default)]
    pub signatures: SignatureConfig,
}

fn default_language() -> String {
    "en".to_string()
}

impl Default for TriageConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            layout: ProjectLayout::default(),
            mapping: MappingConfig::default(),
            runner: RunnerConfig::default(),
            signatures: SignatureConfig::default(),
        }
    }
}

impl TriageConfig {
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Compiles the mapping table: custom `before` rules, the built-ins,
    /// then custom `after` rules, each group in file order.
    pub fn mapping_table(&self) -> Result<MappingTable, TriageError> {
        let mut table = MappingTable::new();

        for (i, rule) in self.mapping.rules.iter().enumerate() {
            if rule.position == RulePosition::Before {
                table.push(self.compile_rule(i, rule)?);
            }
        }
        if self.mapping.include_defaults {
            for rule in builtin_rules(&self.layout)? {
                table.push(rule);
            }
        }
        for (i, rule) in self.mapping.rules.iter().enumerate() {
            if rule.position == RulePosition::After {
                table.push(self.compile_rule(i, rule)?);
            }
        }
        Ok(table)
    }

    fn compile_rule(&self, index: usize, rule: &RuleConfig) -> Result<MappingRule, TriageError> {
        let name = format!("custom-{}", index + 1);
        if rule.all_tests {
            return MappingRule::fan_out(name, &rule.pattern, self.layout.test_file_regex()?);
        }
        if rule.targets.is_empty() {
            return Err(TriageError::Config(format!(
                "rule `{}` needs `targets` or `all_tests = true`",
                rule.pattern
            )));
        }
        MappingRule::from_templates(name, &rule.pattern, rule.targets.clone())
    }

    pub fn resolver(&self, root: &Path) -> Result<PathResolver, TriageError> {
        Ok(PathResolver::new(self.mapping_table()?, root).with_policy(self.mapping.policy))
    }

    pub fn signatures(&self) -> Result<OutputSignatures, TriageError> {
        OutputSignatures::with_overrides(
            self.signatures.completion.as_deref(),
            self.signatures.failure_header.as_deref(),
            self.signatures.backtrace_frame.as_deref(),
        )
    }

    pub fn extractor(&self, root: &Path) -> Result<FailureExtractor, TriageError> {
        FailureExtractor::new(root, &self.layout, self.signatures()?)
    }

    pub fn command_builder(&self) -> CommandBuilder {
        CommandBuilder::new(self.runner.invocation.clone())
    }

    /// Configured options followed by `extras`; the strategy flag is set if
    /// either the configuration or an extra selects it.
    pub fn runner_options<S: AsRef<str>>(&self, extras: &[S]) -> RunnerOptions {
        let merged = self
            .runner
            .options
            .iter()
            .map(String::as_str)
            .chain(extras.iter().map(|extra| extra.as_ref()));
        let options = RunnerOptions::parse(merged);
        let wrapped = options.use_dependency_manager() || self.runner.use_dependency_manager;
        options.with_dependency_manager(wrapped)
    }

    /// Rejects patterns that will not compile, before any cycle runs.
    pub fn validate(&self) -> Result<(), TriageError> {
        self.mapping_table()?;
        self.signatures()?;
        Ok(())
    }
}
