//! # JSON Reporting Module / JSON 报告模块
//!
//! Machine-readable triage output for editors and CI wrappers.
//!
//! 面向编辑器和 CI 包装器的机器可读分诊输出。

use anyhow::Result;
use serde::Serialize;
use std::path::Path;

use crate::core::consolidate::FailureIndex;
use crate::core::cycle::CyclePlan;
use crate::core::extract::{FailureRecord, RunSummary};

/// Failures of one test file.
#[derive(Debug, Serialize)]
pub struct FileFailures<'a> {
    pub file: String,
    pub failures: &'a [FailureRecord],
}

/// The full triage result of one run.
/// 一次运行的完整分诊结果。
#[derive(Debug, Serialize)]
pub struct TriageReport<'a> {
    /// `false` when the run never printed its summary.
    pub complete: bool,
    pub summary: Option<RunSummary>,
    pub files: Vec<FileFailures<'a>>,
    pub plan: &'a CyclePlan,
    pub command: &'a str,
}

impl<'a> TriageReport<'a> {
    pub fn new(
        summary: Option<RunSummary>,
        index: &'a FailureIndex,
        root: &Path,
        plan: &'a CyclePlan,
        command: &'a str,
    ) -> Self {
        let files = index
            .iter()
            .map(|(target, failures)| FileFailures {
                file: target.relative_to(root),
                failures,
            })
            .collect();
        Self {
            complete: summary.is_some(),
            summary,
            files,
            plan,
            command,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
