//! # Infrastructure Module / 基础设施模块
//!
//! This module provides the thin collaborators around the engine:
//! file-system discovery and probing, and diagnostic logging setup.
//!
//! 此模块提供引擎周边的轻量协作组件：
//! 文件系统发现与探测，以及诊断日志设置。

pub mod fs;
pub mod logging;

// Re-export i18n functions for easier access
pub use rust_i18n::t;
