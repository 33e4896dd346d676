//! # Error Taxonomy Module / 错误分类模块
//!
//! The engine degrades almost every irregular input to a conservative fallback.
//! Only the conditions below are surfaced as errors.
//!
//! 引擎会将几乎所有不规则输入降级为保守的回退行为，
//! 只有以下情况会作为错误抛出。

use thiserror::Error;

/// Errors produced by the triage engine.
/// 分诊引擎产生的错误。
#[derive(Debug, Error)]
pub enum TriageError {
    /// The run output carries no completion summary: the runner crashed, was
    /// killed, or never started. Callers must not read this as "zero failures".
    /// 运行输出中没有完成摘要：运行器崩溃、被终止或从未启动。
    #[error("test run did not report a summary; the run crashed or was interrupted")]
    IncompleteRun,

    /// A mapping rule or output signature could not be compiled.
    /// 映射规则或输出签名无法编译。
    #[error("invalid pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A configuration value has a shape the engine cannot use.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl TriageError {
    pub(crate) fn invalid_pattern(pattern: &str, source: regex::Error) -> Self {
        TriageError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        }
    }
}
