//! # Map Command Module / 映射命令模块
//!
//! Resolves changed files into the test files that cover them and prints
//! the command for the next cycle. Failures from a previous report, when
//! given, are scheduled first.
//!
//! 将变更的文件解析为覆盖它们的测试文件，并打印下一轮的命令。
//! 如果提供了上一次的报告，其中的失败会被优先安排。

use anyhow::Result;
use colored::*;
use std::path::Path;

use crate::core::error::TriageError;
use crate::core::target::ChangeSet;
use crate::infra::fs::read_run_output;
use crate::infra::t;
use crate::reporting::print_plan;

/// Executes the map command.
///
/// # Arguments
/// * `ctx` - Resolved project context
/// * `changed` - Changed paths, absolute or relative to the project root
/// * `previous_output` - Captured output of the previous run, if any
pub fn execute(
    ctx: &super::CommandContext,
    changed: &[String],
    previous_output: Option<&Path>,
) -> Result<()> {
    let locale = ctx.locale.as_str();
    let mut session = ctx.session()?;

    println!(
        "{}",
        t!("project_root_detected", locale = locale, path = ctx.root.display())
    );

    if let Some(path) = previous_output {
        let output = read_run_output(path)?;
        match session.record(&output) {
            Ok(index) => {
                if !index.is_empty() {
                    println!(
                        "{}",
                        t!(
                            "failing_files",
                            locale = locale,
                            files = index.len(),
                            failures = index.failure_count()
                        )
                        .red()
                    );
                }
            }
            Err(TriageError::IncompleteRun) => {
                println!("{}", t!("previous_run_incomplete", locale = locale).yellow());
            }
            Err(e) => return Err(e.into()),
        }
    }

    let changes = ChangeSet::from_paths(&ctx.root, changed);
    let plan = session.plan(&changes, &ctx.catalog());
    let command = ctx
        .config
        .command_builder()
        .build(&plan.targets, &ctx.runner_options());

    print_plan(&plan, &ctx.root, &command, locale);
    Ok(())
}
