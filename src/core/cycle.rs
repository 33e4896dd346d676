//! # Cycle Module / 周期模块
//!
//! `TriageSession` carries the only state that survives between cycles: the
//! failure index of the last completed run and whether a full-suite run is
//! owed. It decides what the next cycle runs:
//!
//! - a crashed run (no summary) or a run that turned everything green is
//!   followed by the full suite;
//! - pending failures are re-run first, plus whatever the changes map to;
//! - otherwise the changes alone decide.
//!
//! `TriageSession` 保存周期之间唯一保留的状态：上一次完成运行的失败索引，
//! 以及是否需要运行完整测试套件。它决定下一轮运行什么：
//!
//! - 崩溃的运行（没有摘要）或让所有测试通过的运行之后，运行完整套件；
//! - 优先重新运行待处理的失败，再加上变更所映射的测试；
//! - 否则仅由变更决定。

use serde::Serialize;

use crate::core::consolidate::{consolidate, FailureIndex};
use crate::core::error::TriageError;
use crate::core::extract::{FailureExtractor, RunSummary};
use crate::core::mapping::{PathResolver, TestCatalog};
use crate::core::target::{ChangeSet, TestTarget};

/// Why a plan holds the targets it holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanReason {
    /// Previously failing files, followed by targets mapped from changes.
    PendingFailures,
    /// Targets mapped from changes only.
    Changes,
    /// Every known test file.
    FullSuite,
    /// Nothing to run.
    Idle,
}

/// The targets for one cycle.
/// 一轮的测试目标。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CyclePlan {
    pub targets: Vec<TestTarget>,
    pub reason: PlanReason,
}

impl CyclePlan {
    pub fn is_idle(&self) -> bool {
        self.targets.is_empty()
    }
}

pub struct TriageSession {
    resolver: PathResolver,
    extractor: FailureExtractor,
    failures: FailureIndex,
    last_summary: Option<RunSummary>,
    full_run_owed: bool,
    last_reason: Option<PlanReason>,
}

impl TriageSession {
    pub fn new(resolver: PathResolver, extractor: FailureExtractor) -> Self {
        Self {
            resolver,
            extractor,
            failures: FailureIndex::new(),
            last_summary: None,
            full_run_owed: false,
            last_reason: None,
        }
    }

    pub fn resolver(&self) -> &PathResolver {
        &self.resolver
    }

    pub fn extractor(&self) -> &FailureExtractor {
        &self.extractor
    }

    /// Failures of the last completed run.
    pub fn failures(&self) -> &FailureIndex {
        &self.failures
    }

    pub fn last_summary(&self) -> Option<RunSummary> {
        self.last_summary
    }

    pub fn full_run_owed(&self) -> bool {
        self.full_run_owed
    }

    /// Decides the targets of the next cycle.
    ///
    /// # Arguments
    /// * `changes` - Files modified since the last cycle
    /// * `catalog` - Every known test file
    pub fn plan(&mut self, changes: &ChangeSet, catalog: &dyn TestCatalog) -> CyclePlan {
        let plan = if self.full_run_owed {
            let targets = catalog
                .test_files()
                .iter()
                .map(|path| TestTarget::from_absolute(path))
                .fold(Vec::new(), push_unique);
            CyclePlan {
                targets,
                reason: PlanReason::FullSuite,
            }
        } else if !self.failures.is_empty() {
            let mapped = self.resolver.resolve_all(changes, catalog);
            let targets = self
                .failures
                .targets()
                .into_iter()
                .chain(mapped)
                .fold(Vec::new(), push_unique);
            CyclePlan {
                targets,
                reason: PlanReason::PendingFailures,
            }
        } else {
            CyclePlan {
                targets: self.resolver.resolve_all(changes, catalog),
                reason: PlanReason::Changes,
            }
        };

        let plan = if plan.targets.is_empty() {
            CyclePlan {
                targets: plan.targets,
                reason: PlanReason::Idle,
            }
        } else {
            plan
        };
        self.last_reason = Some(plan.reason);
        plan
    }

    /// Consumes the output of the run that executed the last plan.
    /// The failure index is replaced, never merged.
    ///
    /// # Errors
    /// `TriageError::IncompleteRun` when the output has no summary. Previous
    /// failures are kept and the next plan covers the full suite.
    pub fn record(&mut self, output: &str) -> Result<&FailureIndex, TriageError> {
        let report = match self.extractor.extract_report(output) {
            Ok(report) => report,
            Err(e) => {
                if matches!(e, TriageError::IncompleteRun) {
                    self.full_run_owed = true;
                }
                return Err(e);
            }
        };

        let index = consolidate(&report.failures);
        let went_green = !self.failures.is_empty() && index.is_empty();
        let was_full = self.last_reason == Some(PlanReason::FullSuite);

        self.full_run_owed = went_green && !was_full;
        self.failures = index;
        self.last_summary = Some(report.summary);
        Ok(&self.failures)
    }

    /// Replaces the failure index directly, e.g. from a report captured
    /// outside the session.
    pub fn seed(&mut self, failures: FailureIndex) {
        self.failures = failures;
    }
}

fn push_unique(mut acc: Vec<TestTarget>, target: TestTarget) -> Vec<TestTarget> {
    if !acc.contains(&target) {
        acc.push(target);
    }
    acc
}
