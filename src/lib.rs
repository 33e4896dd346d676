//! # Triage Runner Library / Triage Runner 库
//!
//! This library provides the core functionality for the Triage Runner tool,
//! a change-driven test selector: it maps modified files to the test files
//! that validate them, and after a failing run narrows the next cycle to the
//! files implicated by those failures.
//!
//! 此库为 Triage Runner 工具提供核心功能，
//! 这是一个由变更驱动的测试选择器：它将修改过的文件映射到验证它们的测试文件，
//! 并在运行失败后将下一轮缩小到与这些失败相关的文件。
//!
//! ## Modules / 模块
//!
//! - `core` - Mapping rules, failure extraction and consolidation, command building
//! - `infra` - File system collaborators and logging setup
//! - `reporting` - Console and JSON output
//! - `cli` - Command-line interface and commands
//!
//! - `core` - 映射规则、失败提取与合并、命令构建
//! - `infra` - 文件系统协作组件和日志设置
//! - `reporting` - 控制台和 JSON 输出
//! - `cli` - 命令行接口和命令

pub mod cli;
pub mod core;
pub mod infra;
pub mod reporting;

// Re-export commonly used items
pub use self::core::config;
pub use self::core::mapping;
pub use self::core::{TestTarget, TriageConfig, TriageError};

// Initialize i18n
rust_i18n::i18n!("locales", fallback = "en");
