//! # Core Module / 核心模块
//!
//! This module contains the pure engine of Triage Runner: mapping changed
//! files to tests, extracting failures from run output, consolidating them,
//! and rendering the next runner command.
//!
//! 此模块包含 Triage Runner 的纯引擎部分：将变更文件映射到测试、
//! 从运行输出中提取失败、合并失败以及渲染下一条运行器命令。

pub mod command;
pub mod config;
pub mod consolidate;
pub mod cycle;
pub mod error;
pub mod extract;
pub mod layout;
pub mod mapping;
pub mod target;

// Re-exports
pub use config::TriageConfig;
pub use error::TriageError;
pub use target::TestTarget;
