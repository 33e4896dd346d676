//! # Triage Command Module / 分诊命令模块
//!
//! Reads the captured output of a test run, groups its failures by test file
//! and prints the command that re-runs only those files.
//!
//! 读取测试运行捕获的输出，按测试文件对失败进行分组，
//! 并打印仅重新运行这些文件的命令。

use anyhow::{bail, Result};
use std::path::Path;

use crate::core::error::TriageError;
use crate::core::target::ChangeSet;
use crate::infra::fs::read_run_output;
use crate::infra::t;
use crate::reporting::{print_failure_summary, print_incomplete_run, print_plan, TriageReport};

/// Executes the triage command.
///
/// # Arguments
/// * `ctx` - Resolved project context
/// * `output_path` - File holding the run output, or `-` for stdin
/// * `changed` - Files changed since that run, mapped after the failures
/// * `json` - Emit a JSON report instead of console text
///
/// # Returns
/// An error when the run never reported its summary
pub fn execute(
    ctx: &super::CommandContext,
    output_path: &Path,
    changed: &[String],
    json: bool,
) -> Result<()> {
    let locale = ctx.locale.as_str();
    let output = read_run_output(output_path)?;
    let mut session = ctx.session()?;

    let incomplete = match session.record(&output) {
        Ok(_) => false,
        Err(TriageError::IncompleteRun) => true,
        Err(e) => return Err(e.into()),
    };

    let changes = ChangeSet::from_paths(&ctx.root, changed);
    let plan = session.plan(&changes, &ctx.catalog());
    let command = ctx
        .config
        .command_builder()
        .build(&plan.targets, &ctx.runner_options());

    if json {
        let summary = if incomplete { None } else { session.last_summary() };
        let report = TriageReport::new(summary, session.failures(), &ctx.root, &plan, &command);
        println!("{}", report.to_json()?);
    } else {
        if incomplete {
            print_incomplete_run(&output, locale);
        } else if let Some(summary) = session.last_summary() {
            print_failure_summary(&summary, session.failures(), &ctx.root, locale);
        }
        print_plan(&plan, &ctx.root, &command, locale);
    }

    if incomplete {
        bail!("{}", t!("incomplete_run_error", locale = locale));
    }
    Ok(())
}
