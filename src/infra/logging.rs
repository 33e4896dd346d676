//! # Logging Module / 日志模块
//!
//! Diagnostic events go to stderr through `tracing`, keeping stdout for the
//! report and the command line. `RUST_LOG` overrides the default level.
//!
//! 诊断事件通过 `tracing` 输出到 stderr，stdout 留给报告和命令行。
//! `RUST_LOG` 可覆盖默认级别。

use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. Safe to call more than once; later calls
/// are ignored.
pub fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("triage_runner={default_level}")));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
