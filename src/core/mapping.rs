//! # Mapping Module / 映射模块
//!
//! This module translates a changed file into the test files that validate it.
//! A `MappingTable` is an ordered list of `(pattern, resolver)` rules; the
//! `PathResolver` walks it for each changed path, by default stopping at the
//! first rule whose pattern matches.
//!
//! 此模块将已更改的文件转换为验证它的测试文件。
//! `MappingTable` 是一个有序的 `(模式, 解析器)` 规则列表；
//! `PathResolver` 针对每个更改的路径遍历该列表，默认在第一个匹配的规则处停止。
//!
//! ## Built-in rules / 内置规则
//!
//! 1. A test file maps to itself.
//! 2. `<source_dir>/<rel>.<ext>` maps to `<test_dir>/<rel><suffix>.<ext>`.
//! 3. The helper file or anything under the shared directory maps to every
//!    known test file.
//!
//! 1. 测试文件映射到其自身。
//! 2. `<source_dir>/<rel>.<ext>` 映射到 `<test_dir>/<rel><suffix>.<ext>`。
//! 3. 辅助文件或共享目录下的任何文件映射到所有已知的测试文件。

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

use crate::core::error::TriageError;
use crate::core::layout::{compile, ProjectLayout};
use crate::core::target::{normalize_path, relative_to_root, ChangeSet, TestTarget};

/// Enumeration of every test file currently known to the watcher.
/// Injected into resolution so fan-out rules can query it without the
/// engine owning any directory state.
///
/// 当前监视器已知的所有测试文件的枚举。
/// 注入到解析过程中，使扇出规则无需引擎持有目录状态即可查询。
pub trait TestCatalog {
    /// Absolute paths, in discovery order.
    fn test_files(&self) -> Vec<PathBuf>;
}

impl TestCatalog for [PathBuf] {
    fn test_files(&self) -> Vec<PathBuf> {
        self.to_vec()
    }
}

impl TestCatalog for Vec<PathBuf> {
    fn test_files(&self) -> Vec<PathBuf> {
        self.clone()
    }
}

/// What a resolver sees when its rule fires.
/// 规则触发时解析器所能看到的内容。
pub struct RuleMatch<'a> {
    /// The changed path, relative to the project root, `/`-separated.
    pub path: &'a str,
    pub captures: &'a Captures<'a>,
    root: &'a Path,
    catalog: &'a dyn TestCatalog,
}

impl<'a> RuleMatch<'a> {
    /// Capture group `index`, if it participated in the match.
    pub fn group(&self, index: usize) -> Option<&str> {
        self.captures.get(index).map(|m| m.as_str())
    }

    /// Expands `$1` / `${name}` references in `template`.
    pub fn expand(&self, template: &str) -> String {
        let mut expanded = String::new();
        self.captures.expand(template, &mut expanded);
        expanded
    }

    /// Known test files whose root-relative path matches `pattern`,
    /// in catalog order.
    pub fn files_matching(&self, pattern: &Regex) -> Vec<String> {
        self.catalog
            .test_files()
            .into_iter()
            .filter(|file| pattern.is_match(&relative_to_root(self.root, file)))
            .map(|file| file.to_string_lossy().into_owned())
            .collect()
    }
}

/// Turns a rule match into candidate test paths (relative or absolute).
pub type ResolveFn = dyn Fn(&RuleMatch<'_>) -> Vec<String> + Send + Sync;

/// A single `(pattern, resolver)` pair. Immutable once built.
/// 单个 `(模式, 解析器)` 对，构建后不可变。
#[derive(Clone)]
pub struct MappingRule {
    name: String,
    pattern: Regex,
    resolve: Arc<ResolveFn>,
}

impl MappingRule {
    pub fn new<F>(name: impl Into<String>, pattern: &str, resolve: F) -> Result<Self, TriageError>
    where
        F: Fn(&RuleMatch<'_>) -> Vec<String> + Send + Sync + 'static,
    {
        Ok(Self {
            name: name.into(),
            pattern: compile(pattern)?,
            resolve: Arc::new(resolve),
        })
    }

    /// A rule whose targets are capture templates such as `spec/$1_spec.rb`.
    pub fn from_templates(
        name: impl Into<String>,
        pattern: &str,
        templates: Vec<String>,
    ) -> Result<Self, TriageError> {
        Self::new(name, pattern, move |m| {
            templates.iter().map(|t| m.expand(t)).collect()
        })
    }

    /// A rule that fans out to every known test file matching `tests`.
    pub fn fan_out(
        name: impl Into<String>,
        pattern: &str,
        tests: Regex,
    ) -> Result<Self, TriageError> {
        Self::new(name, pattern, move |m| m.files_matching(&tests))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn matches(&self, relative_path: &str) -> bool {
        self.pattern.is_match(relative_path)
    }
}

impl fmt::Debug for MappingRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MappingRule")
            .field("name", &self.name)
            .field("pattern", &self.pattern.as_str())
            .finish_non_exhaustive()
    }
}

/// Ordered rule list. Registration order is part of the contract: a rule
/// placed earlier shadows later ones for the paths it matches.
///
/// 有序的规则列表。注册顺序是契约的一部分：
/// 排在前面的规则会遮蔽其所匹配路径上的后续规则。
#[derive(Debug, Clone, Default)]
pub struct MappingTable {
    rules: Vec<MappingRule>,
}

impl MappingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The table holding only the three built-in rules for `layout`.
    pub fn with_defaults(layout: &ProjectLayout) -> Result<Self, TriageError> {
        Ok(Self {
            rules: builtin_rules(layout)?,
        })
    }

    pub fn push(&mut self, rule: MappingRule) {
        self.rules.push(rule);
    }

    /// Places `rule` ahead of every registered rule.
    pub fn prepend(&mut self, rule: MappingRule) {
        self.rules.insert(0, rule);
    }

    /// Inserts at `index`, clamped to the table length.
    pub fn insert(&mut self, index: usize, rule: MappingRule) {
        let index = index.min(self.rules.len());
        self.rules.insert(index, rule);
    }

    pub fn clear(&mut self) {
        self.rules.clear();
    }

    pub fn rules(&self) -> &[MappingRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// The three built-in rules, in their required order.
pub fn builtin_rules(layout: &ProjectLayout) -> Result<Vec<MappingRule>, TriageError> {
    let test_files = layout.test_file_regex()?;
    let layout_for_source = layout.clone();

    Ok(vec![
        MappingRule::new("test-file", &layout.test_file_pattern(), |m| {
            vec![m.path.to_string()]
        })?,
        MappingRule::new("source-file", &layout.source_file_pattern(), move |m| {
            m.group(1)
                .map(|stem| vec![layout_for_source.test_file_for(stem)])
                .unwrap_or_default()
        })?,
        MappingRule::fan_out("shared-infra", &layout.shared_infra_pattern(), test_files)?,
    ])
}

/// How many rules may contribute targets for a single path.
/// 单个路径可以有多少条规则提供目标。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchPolicy {
    /// Only the first matching rule applies.
    #[default]
    FirstMatch,
    /// Every matching rule applies, results concatenated in rule order.
    Union,
}

/// Resolves changed paths into test targets using a `MappingTable`.
/// 使用 `MappingTable` 将已更改的路径解析为测试目标。
#[derive(Debug, Clone)]
pub struct PathResolver {
    table: MappingTable,
    root: PathBuf,
    policy: MatchPolicy,
}

impl PathResolver {
    pub fn new(table: MappingTable, root: impl Into<PathBuf>) -> Self {
        Self {
            table,
            root: root.into(),
            policy: MatchPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: MatchPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn table(&self) -> &MappingTable {
        &self.table
    }

    pub fn policy(&self) -> MatchPolicy {
        self.policy
    }

    /// Test targets implicated by `changed`. An unmatched path yields an
    /// empty list; that is not an error.
    ///
    /// # Arguments
    /// * `changed` - Absolute path, or a path relative to the project root
    /// * `catalog` - All known test files, consulted only by fan-out rules
    ///
    /// # Returns
    /// Targets in rule order, with duplicates removed (first occurrence kept)
    pub fn resolve(&self, changed: &Path, catalog: &dyn TestCatalog) -> Vec<TestTarget> {
        let absolute = normalize_path(&self.root, &changed.to_string_lossy());
        let relative = relative_to_root(&self.root, &absolute);

        let mut targets = Vec::new();
        let mut matched = false;

        for rule in self.table.rules() {
            let Some(captures) = rule.pattern.captures(&relative) else {
                continue;
            };
            matched = true;

            let rule_match = RuleMatch {
                path: &relative,
                captures: &captures,
                root: &self.root,
                catalog,
            };
            let candidates = (rule.resolve)(&rule_match);
            debug!(
                rule = rule.name(),
                path = %relative,
                candidates = candidates.len(),
                "mapping rule matched"
            );

            for candidate in candidates {
                let target = TestTarget::new(&self.root, &candidate);
                if !targets.contains(&target) {
                    targets.push(target);
                }
            }

            if self.policy == MatchPolicy::FirstMatch {
                break;
            }
        }

        if !matched {
            debug!(path = %relative, "no mapping rule matched; path ignored");
        }
        targets
    }

    /// Union of `resolve` over every changed path, first occurrence wins.
    pub fn resolve_all(&self, changes: &ChangeSet, catalog: &dyn TestCatalog) -> Vec<TestTarget> {
        let mut targets: Vec<TestTarget> = Vec::new();
        for path in changes.iter() {
            for target in self.resolve(path, catalog) {
                if !targets.contains(&target) {
                    targets.push(target);
                }
            }
        }
        targets
    }
}
