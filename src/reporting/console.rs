//! # Console Reporting Module / 控制台报告模块
//!
//! This module prints cycle plans and failure triage results to the console
//! with colors and internationalized messages.
//!
//! 此模块以彩色和国际化消息的形式在控制台打印周期计划和失败分诊结果。

use colored::*;
use std::path::Path;

use crate::core::consolidate::FailureIndex;
use crate::core::cycle::{CyclePlan, PlanReason};
use crate::core::extract::{Attribution, RunSummary};
use crate::infra::t;

/// Prints the targets chosen for the next cycle and the command that runs them.
///
/// 打印下一轮选定的测试目标以及运行它们的命令。
///
/// # Output Format / 输出格式
/// ```text
/// --- Next Cycle (pending failures) ---
///   - spec/widgets/box_spec.rb
///   - spec/widgets/frame_spec.rb
///
/// rspec --tty /project/spec/widgets/box_spec.rb /project/spec/widgets/frame_spec.rb
/// ```
pub fn print_plan(plan: &CyclePlan, root: &Path, command: &str, locale: &str) {
    let reason = reason_label(plan.reason, locale);
    println!(
        "\n{}",
        t!("plan_banner", locale = locale, reason = reason).bold()
    );

    if plan.is_idle() || command.is_empty() {
        println!("{}", t!("nothing_to_run", locale = locale).green());
        return;
    }

    for target in &plan.targets {
        println!("  - {}", target.relative_to(root).cyan());
    }
    println!("\n{}", command);
}

/// Prints failures grouped by the test file they are attributed to.
///
/// 打印按归属测试文件分组的失败信息。
///
/// # Arguments / 参数
/// * `summary` - Counts from the completion line / 完成行中的计数
/// * `index` - Consolidated failures / 合并后的失败
/// * `root` - Project root used to shorten paths / 用于缩短路径的项目根目录
/// * `locale` - The language locale to use for messages / 用于消息的语言区域设置
pub fn print_failure_summary(summary: &RunSummary, index: &FailureIndex, root: &Path, locale: &str) {
    println!("\n{}", t!("triage_banner", locale = locale).bold());
    println!(
        "{}",
        t!(
            "run_summary",
            locale = locale,
            examples = count_or_unknown(summary.examples),
            failures = count_or_unknown(summary.failures),
            pending = count_or_unknown(summary.pending)
        )
    );

    if index.is_empty() {
        println!("\n{}", t!("all_examples_passed", locale = locale).green().bold());
        return;
    }

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

    for (target, records) in index.iter() {
        println!("\n  {}", target.relative_to(root).cyan().bold());
        for record in records {
            let number = record
                .index
                .map(|n| format!("{n})"))
                .unwrap_or_else(|| "-)".to_string());
            let line = record
                .line
                .map(|l| format!(":{l}"))
                .unwrap_or_default();
            let marker = match record.attribution {
                Attribution::Convention => String::new(),
                Attribution::Fallback => format!(" {}", t!("fallback_marker", locale = locale).yellow()),
            };
            println!(
                "    {:<4} {}{}{}",
                number,
                record.description,
                line.dimmed(),
                marker
            );
        }
    }
}

/// Reports a run that never printed its summary. This points at a broken
/// environment (missing runner, wrong directory) rather than a test failure.
///
/// 报告一次从未打印摘要的运行。这表明环境已损坏（缺少运行器、目录错误），
/// 而不是测试失败。
pub fn print_incomplete_run(output: &str, locale: &str) {
    println!("\n{}", t!("incomplete_run_banner", locale = locale).red().bold());
    println!("{}", t!("incomplete_run_hint", locale = locale).yellow());
    println!("{}", "-".repeat(80));
    let snippet: Vec<&str> = output.lines().rev().take(20).collect();
    if snippet.is_empty() {
        println!("{}", t!("no_output_captured", locale = locale).dimmed());
    } else {
        for line in snippet.into_iter().rev() {
            println!("{}", line);
        }
    }
    println!("{}", "-".repeat(80));
}

fn reason_label(reason: PlanReason, locale: &str) -> String {
    match reason {
        PlanReason::PendingFailures => t!("reason_pending_failures", locale = locale),
        PlanReason::Changes => t!("reason_changes", locale = locale),
        PlanReason::FullSuite => t!("reason_full_suite", locale = locale),
        PlanReason::Idle => t!("reason_idle", locale = locale),
    }
    .to_string()
}

fn count_or_unknown(count: Option<u32>) -> String {
    count.map_or_else(|| "?".to_string(), |c| c.to_string())
}
