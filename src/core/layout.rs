//! # Project Layout Module / 项目布局模块
//!
//! Describes the naming convention that ties source files to test files:
//! which directory holds tests, which holds sources, the test-file suffix and
//! the shared scaffolding names. Defaults follow the RSpec convention
//! (`lib/foo.rb` is covered by `spec/foo_spec.rb`).
//!
//! 描述将源文件与测试文件关联起来的命名约定：
//! 测试目录、源码目录、测试文件后缀以及共享脚手架名称。
//! 默认值遵循 RSpec 约定（`lib/foo.rb` 由 `spec/foo_spec.rb` 覆盖）。

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::core::error::TriageError;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ProjectLayout {
    /// Directory holding test files, relative to the project root.
    /// 存放测试文件的目录（相对于项目根目录）。
    pub test_dir: String,
    /// Directory holding library sources, relative to the project root.
    /// 存放库源码的目录（相对于项目根目录）。
    pub source_dir: String,
    /// File extension without the leading dot.
    /// 不带前导点的文件扩展名。
    pub extension: String,
    /// Suffix appended to a source stem to name its test file.
    /// 附加到源文件名上以命名其测试文件的后缀。
    pub test_suffix: String,
    /// Stem of the global test-setup file inside `test_dir`.
    /// `test_dir` 中全局测试初始化文件的文件名（不含扩展名）。
    pub helper_file: String,
    /// Shared-fixture directory inside `test_dir`.
    /// `test_dir` 中共享夹具所在的目录。
    pub shared_dir: String,
}

impl Default for ProjectLayout {
    fn default() -> Self {
        Self {
            test_dir: "spec".to_string(),
            source_dir: "lib".to_string(),
            extension: "rb".to_string(),
            test_suffix: "_spec".to_string(),
            helper_file: "spec_helper".to_string(),
            shared_dir: "shared".to_string(),
        }
    }
}

impl ProjectLayout {
    /// `^spec/.*_spec\.rb$` for the default layout.
    pub fn test_file_pattern(&self) -> String {
        format!(
            r"^{}/.*{}\.{}$",
            regex::escape(&self.test_dir),
            regex::escape(&self.test_suffix),
            regex::escape(&self.extension)
        )
    }

    /// `^lib/(.*)\.rb$` for the default layout.
    pub fn source_file_pattern(&self) -> String {
        format!(
            r"^{}/(.*)\.{}$",
            regex::escape(&self.source_dir),
            regex::escape(&self.extension)
        )
    }

    /// `^spec/(spec_helper|shared/.*)\.rb$` for the default layout.
    pub fn shared_infra_pattern(&self) -> String {
        format!(
            r"^{}/({}|{}/.*)\.{}$",
            regex::escape(&self.test_dir),
            regex::escape(&self.helper_file),
            regex::escape(&self.shared_dir),
            regex::escape(&self.extension)
        )
    }

    /// Matches any path, absolute or relative, whose file name carries the
    /// test suffix. Used to attribute backtrace frames.
    pub fn test_suffix_pattern(&self) -> String {
        format!(
            r"{}\.{}$",
            regex::escape(&self.test_suffix),
            regex::escape(&self.extension)
        )
    }

    /// The conventional test file for a source path relative to `source_dir`.
    /// `widgets/box` becomes `spec/widgets/box_spec.rb`.
    pub fn test_file_for(&self, relative_stem: &str) -> String {
        format!(
            "{}/{}{}.{}",
            self.test_dir, relative_stem, self.test_suffix, self.extension
        )
    }

    pub fn test_file_regex(&self) -> Result<Regex, TriageError> {
        compile(&self.test_file_pattern())
    }

    pub fn test_suffix_regex(&self) -> Result<Regex, TriageError> {
        compile(&self.test_suffix_pattern())
    }
}

pub(crate) fn compile(pattern: &str) -> Result<Regex, TriageError> {
    Regex::new(pattern).map_err(|e| TriageError::invalid_pattern(pattern, e))
}
