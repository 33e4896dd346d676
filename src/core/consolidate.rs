//! # Failure Consolidation Module / 失败合并模块
//!
//! Groups extracted failures by the test file they are attributed to. The
//! resulting `FailureIndex` is rebuilt from scratch every cycle and seeds the
//! next one.
//!
//! 按失败所归属的测试文件对提取出的失败进行分组。
//! 生成的 `FailureIndex` 每轮都会从头重建，并作为下一轮的种子。

use serde::Serialize;
use std::collections::BTreeMap;

use crate::core::extract::FailureRecord;
use crate::core::target::TestTarget;

/// Failing test files and their failures, keyed by target.
/// An entry exists only while at least one failure attributes to it.
///
/// 失败的测试文件及其失败记录，以目标为键。
/// 只有当至少有一个失败归属于某个条目时，该条目才存在。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FailureIndex {
    entries: BTreeMap<TestTarget, Vec<FailureRecord>>,
}

impl FailureIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of failing files.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Total failures across all files.
    pub fn failure_count(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn get(&self, target: &TestTarget) -> Option<&[FailureRecord]> {
        self.entries.get(target).map(Vec::as_slice)
    }

    pub fn contains(&self, target: &TestTarget) -> bool {
        self.entries.contains_key(target)
    }

    /// Failing files, deduplicated, in path order. This is the seed handed to
    /// the next cycle.
    pub fn targets(&self) -> Vec<TestTarget> {
        self.entries.keys().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TestTarget, &[FailureRecord])> {
        self.entries.iter().map(|(t, r)| (t, r.as_slice()))
    }
}

/// Groups `records` by source file, keeping their order of occurrence
/// within each file.
///
/// # Arguments
/// * `records` - Failures as extracted from a single run
///
/// # Returns
/// A fresh index; empty input gives an empty index.
pub fn consolidate(records: &[FailureRecord]) -> FailureIndex {
    let mut entries: BTreeMap<TestTarget, Vec<FailureRecord>> = BTreeMap::new();
    for record in records {
        entries
            .entry(record.source.clone())
            .or_default()
            .push(record.clone());
    }
    FailureIndex { entries }
}
