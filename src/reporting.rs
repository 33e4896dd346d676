//! # Reporting Module / 报告模块
//!
//! This module renders cycle plans and failure triage results, either as
//! colored console output or as JSON.
//!
//! 此模块渲染周期计划和失败分诊结果，输出为彩色控制台文本或 JSON。

pub mod console;
pub mod json;

// Re-export common reporting functions
pub use console::{print_failure_summary, print_incomplete_run, print_plan};
pub use json::TriageReport;
