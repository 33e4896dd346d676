//! # Failure Extraction Module / 失败提取模块
//!
//! Scans the textual report of one test run for two signatures: the completion
//! summary (`N examples, M failures`) and numbered failure blocks with their
//! backtraces. Each failure is attributed to the first backtrace frame that
//! points into a test file.
//!
//! 扫描一次测试运行的文本报告，寻找两种签名：完成摘要（`N examples, M failures`）
//! 以及带有回溯信息的编号失败块。每个失败都归属于第一个指向测试文件的回溯帧。
//!
//! ## Recognized shape / 识别的格式
//!
//! ```text
//!   1) Widget box renders
//!      Failure/Error: expect(box.width).to eq(3)
//!        expected: 3
//!             got: 2
//!      # ./spec/widgets/box_spec.rb:12:in `block (2 levels) in <top (required)>'
//!
//! 3 examples, 1 failure
//! ```

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::core::error::TriageError;
use crate::core::layout::{compile, ProjectLayout};
use crate::core::target::TestTarget;

/// Summary line at the start of a line; only terminal color codes may precede
/// the count.
pub const COMPLETION_PATTERN: &str = r"(?m)^(?:\x1b\[[0-9;]*m)*(?P<examples>\d+) examples?(?:, (?P<failures>\d+) failures?)?(?:, (?P<pending>\d+) pending)?";

/// `N) description` followed by an indented `Failure...` line.
pub const FAILURE_HEADER_PATTERN: &str =
    r"(?m)^[ \t]*(?P<index>\d+)\)[ \t]*(?P<description>.*)\r?\n[ \t]+Failure.*$";

/// `# path:line` with an optional `:suffix`. The line token is free-form so a
/// malformed number still yields a frame.
pub const BACKTRACE_FRAME_PATTERN: &str =
    r"(?m)^[ \t]+#[ \t](?P<path>.*?):(?P<line>[^:\s]+)(?::.*)?\r?$";

static COMPLETION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(COMPLETION_PATTERN).expect("completion pattern is valid"));
static FAILURE_HEADER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(FAILURE_HEADER_PATTERN).expect("failure header pattern is valid"));
static BACKTRACE_FRAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(BACKTRACE_FRAME_PATTERN).expect("backtrace frame pattern is valid"));

/// The three patterns the extractor depends on. Swappable when the upstream
/// report format changes.
///
/// 提取器所依赖的三个模式。当上游报告格式变化时可以替换。
#[derive(Debug, Clone)]
pub struct OutputSignatures {
    pub completion: Regex,
    pub failure_header: Regex,
    pub backtrace_frame: Regex,
}

impl Default for OutputSignatures {
    fn default() -> Self {
        Self {
            completion: COMPLETION_RE.clone(),
            failure_header: FAILURE_HEADER_RE.clone(),
            backtrace_frame: BACKTRACE_FRAME_RE.clone(),
        }
    }
}

impl OutputSignatures {
    /// Defaults, with any provided pattern replacing its counterpart.
    pub fn with_overrides(
        completion: Option<&str>,
        failure_header: Option<&str>,
        backtrace_frame: Option<&str>,
    ) -> Result<Self, TriageError> {
        let defaults = Self::default();
        Ok(Self {
            completion: completion.map(compile).transpose()?.unwrap_or(defaults.completion),
            failure_header: failure_header
                .map(compile)
                .transpose()?
                .unwrap_or(defaults.failure_header),
            backtrace_frame: backtrace_frame
                .map(compile)
                .transpose()?
                .unwrap_or(defaults.backtrace_frame),
        })
    }
}

/// Counts parsed from the completion line. A count that is absent or does
/// not fit is `None`.
/// 从完成行解析出的计数。缺失或溢出的计数为 `None`。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub examples: Option<u32>,
    pub failures: Option<u32>,
    pub pending: Option<u32>,
}

/// How a failure came to be tied to its source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribution {
    /// A backtrace frame named a file following the test naming convention.
    Convention,
    /// No frame did; the first frame's literal path is used instead.
    Fallback,
}

/// One failing example.
/// 一个失败的用例。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureRecord {
    /// The `N` of `N)`, if it parsed.
    pub index: Option<u32>,
    pub description: String,
    /// The file to re-run.
    pub source: TestTarget,
    pub line: Option<u32>,
    /// The `path:line` text of the attributed frame, as printed.
    pub location: String,
    pub attribution: Attribution,
    pub raw_trace: String,
}

/// Everything recovered from one completed run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub summary: RunSummary,
    pub failures: Vec<FailureRecord>,
}

/// Extracts failure records from raw run output.
/// 从原始运行输出中提取失败记录。
#[derive(Debug, Clone)]
pub struct FailureExtractor {
    signatures: OutputSignatures,
    test_suffix: Regex,
    root: PathBuf,
}

impl FailureExtractor {
    pub fn new(
        root: impl Into<PathBuf>,
        layout: &ProjectLayout,
        signatures: OutputSignatures,
    ) -> Result<Self, TriageError> {
        Ok(Self {
            signatures,
            test_suffix: layout.test_suffix_regex()?,
            root: root.into(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The failing examples of a completed run, in report order.
    ///
    /// # Errors
    /// `TriageError::IncompleteRun` when the completion signature is missing,
    /// including for empty output.
    pub fn extract(&self, output: &str) -> Result<Vec<FailureRecord>, TriageError> {
        self.extract_report(output).map(|report| report.failures)
    }

    /// Like `extract`, also returning the parsed summary counts.
    pub fn extract_report(&self, output: &str) -> Result<RunReport, TriageError> {
        let Some(completion) = self.signatures.completion.captures(output) else {
            warn!(bytes = output.len(), "run output has no completion summary");
            return Err(TriageError::IncompleteRun);
        };
        let summary = RunSummary {
            examples: parse_count(&completion, "examples"),
            failures: parse_count(&completion, "failures"),
            pending: parse_count(&completion, "pending"),
        };

        let summary_start = completion.get(0).map_or(output.len(), |m| m.start());
        let headers: Vec<Captures<'_>> =
            self.signatures.failure_header.captures_iter(output).collect();
        let mut failures = Vec::with_capacity(headers.len());

        for (i, header) in headers.iter().enumerate() {
            let start = header.get(0).map_or(0, |m| m.start());
            let mut end = headers
                .get(i + 1)
                .and_then(|next| next.get(0))
                .map_or(output.len(), |m| m.start());
            if summary_start > start {
                end = end.min(summary_start);
            }
            let block = self.trim_trailer(&output[start..end]);
            let description = header
                .name("description")
                .map_or("", |m| m.as_str())
                .trim()
                .to_string();

            match self.attribute(block) {
                Some((source, line, location, attribution)) => {
                    debug!(
                        description = %description,
                        source = %source,
                        ?attribution,
                        "failure block extracted"
                    );
                    failures.push(FailureRecord {
                        index: header.name("index").and_then(|m| m.as_str().parse().ok()),
                        description,
                        source,
                        line,
                        location,
                        attribution,
                        raw_trace: block.trim_end().to_string(),
                    });
                }
                None => {
                    warn!(description = %description, "failure block has no backtrace frame; skipped");
                }
            }
        }

        Ok(RunReport { summary, failures })
    }

    /// Cuts `block` at the first blank line after its last frame, dropping the
    /// run trailer (`Finished in ...`, failed-example lists).
    fn trim_trailer<'o>(&self, block: &'o str) -> &'o str {
        let Some(last) = self.signatures.backtrace_frame.find_iter(block).last() else {
            return block;
        };
        let mut cut = last.end();
        for (i, line) in block[last.end()..].split_inclusive('\n').enumerate() {
            if i > 0 && line.trim().is_empty() {
                break;
            }
            cut += line.len();
        }
        &block[..cut]
    }

    /// Picks the first frame naming a test file, else the first frame.
    fn attribute(&self, block: &str) -> Option<(TestTarget, Option<u32>, String, Attribution)> {
        let mut first = None;

        for frame in self.signatures.backtrace_frame.captures_iter(block) {
            let Some(path) = frame.name("path").or_else(|| frame.get(1)) else {
                continue;
            };
            let raw_line = frame.name("line").or_else(|| frame.get(2)).map(|m| m.as_str());
            let path = path.as_str().trim();
            let location = match raw_line {
                Some(line) => format!("{path}:{line}"),
                None => path.to_string(),
            };
            let line = raw_line.and_then(|l| l.parse::<u32>().ok());

            if self.test_suffix.is_match(path) {
                return Some((
                    TestTarget::new(&self.root, path),
                    line,
                    location,
                    Attribution::Convention,
                ));
            }
            if first.is_none() {
                first = Some((TestTarget::new(&self.root, path), line, location));
            }
        }

        first.map(|(source, line, location)| {
            warn!(location = %location, "no frame names a test file; using first frame");
            (source, line, location, Attribution::Fallback)
        })
    }
}

fn parse_count(captures: &Captures<'_>, name: &str) -> Option<u32> {
    captures.name(name).and_then(|m| m.as_str().parse().ok())
}
