//! # Command Module Unit Tests / Command 模块单元测试
//!
//! This module contains unit tests for the `command.rs` module, checking
//! runner option parsing and the rendered command line.
//!
//! 此模块包含 `command.rs` 模块的单元测试，检查运行器选项解析和渲染出的命令行。

use std::path::Path;
use triage_runner::core::command::{CommandBuilder, RunnerInvocation, RunnerOption, RunnerOptions};
use triage_runner::TestTarget;

const ROOT: &str = "/project";

fn targets(files: &[&str]) -> Vec<TestTarget> {
    files
        .iter()
        .map(|f| TestTarget::new(Path::new(ROOT), f))
        .collect()
}

#[cfg(test)]
mod runner_option_tests {
    use super::*;

    #[test]
    fn test_flag_spelling() {
        let short = RunnerOption {
            name: "t".to_string(),
            value: Some("slow".to_string()),
        };
        let long = RunnerOption {
            name: "format".to_string(),
            value: None,
        };
        assert_eq!(short.flag(), "-t");
        assert_eq!(long.flag(), "--format");
    }

    #[test]
    fn test_parse_name_and_value() {
        let options = RunnerOptions::parse(["t,slow", "format,documentation", "fail-fast"]);
        assert_eq!(
            options.to_args(),
            vec!["-t", "slow", "--format", "documentation", "--fail-fast"]
        );
        assert!(!options.use_dependency_manager());
    }

    #[test]
    fn test_reserved_selector_is_consumed() {
        let options = RunnerOptions::parse(["bundle", "t,slow"]);
        assert!(options.use_dependency_manager());
        assert!(options.passthrough().iter().all(|o| o.name != "bundle"));
        assert_eq!(options.to_args(), vec!["-t", "slow"]);
    }

    #[test]
    fn test_leading_dashes_and_empty_values_are_tolerated() {
        let options = RunnerOptions::parse(["--seed,42", "-t,", "order,rand,extra"]);
        assert_eq!(
            options.to_args(),
            vec!["--seed", "42", "-t", "--order", "rand,extra"]
        );
    }

    #[test]
    fn test_malformed_names_are_skipped() {
        let options = RunnerOptions::parse(["", ",value", "two words,x", "--", "t,fast"]);
        assert_eq!(options.to_args(), vec!["-t", "fast"]);
    }

    #[test]
    fn test_strategy_can_be_forced() {
        let options = RunnerOptions::default().with_dependency_manager(true);
        assert!(options.use_dependency_manager());
        assert!(options.to_args().is_empty());
    }
}

#[cfg(test)]
mod command_builder_tests {
    use super::*;

    #[test]
    fn test_empty_targets_render_empty_string() {
        let builder = CommandBuilder::default();
        let options = RunnerOptions::parse(["t,slow", "bundle"]);
        assert_eq!(builder.build(&[], &options), "");
        assert_eq!(builder.build_args(&[], &options), None);
    }

    #[test]
    fn test_direct_invocation() {
        let command = CommandBuilder::default().build(
            &targets(&["spec/a_spec.rb", "spec/b_spec.rb"]),
            &RunnerOptions::default(),
        );
        assert_eq!(command, "rspec --tty /project/spec/a_spec.rb /project/spec/b_spec.rb");
    }

    #[test]
    fn test_options_precede_fixed_args_and_targets() {
        let command = CommandBuilder::default().build(
            &targets(&["spec/a_spec.rb"]),
            &RunnerOptions::parse(["t,slow", "format,documentation"]),
        );
        assert_eq!(
            command,
            "rspec -t slow --format documentation --tty /project/spec/a_spec.rb"
        );
    }

    #[test]
    fn test_wrapped_invocation() {
        let command = CommandBuilder::default().build(
            &targets(&["spec/a_spec.rb"]),
            &RunnerOptions::parse(["bundle"]),
        );
        assert_eq!(command, "bundle exec rspec --tty /project/spec/a_spec.rb");
        assert!(!command.contains("--bundle"));
    }

    #[test]
    fn test_duplicate_targets_keep_first_occurrence() {
        let args = CommandBuilder::default()
            .build_args(
                &targets(&["spec/b_spec.rb", "spec/a_spec.rb", "./spec/b_spec.rb"]),
                &RunnerOptions::default(),
            )
            .unwrap();
        assert_eq!(
            args,
            vec!["rspec", "--tty", "/project/spec/b_spec.rb", "/project/spec/a_spec.rb"]
        );
    }

    #[test]
    fn test_paths_with_spaces_are_quoted() {
        let command = CommandBuilder::default().build(
            &targets(&["spec/my widget_spec.rb"]),
            &RunnerOptions::default(),
        );
        let words = shlex::split(&command).unwrap();
        assert_eq!(words, vec!["rspec", "--tty", "/project/spec/my widget_spec.rb"]);
    }

    #[test]
    fn test_custom_invocation() {
        let builder = CommandBuilder::new(RunnerInvocation {
            program: "pytest".to_string(),
            wrapper: vec!["poetry".to_string(), "run".to_string()],
            fixed_args: vec![],
        });
        let command = builder.build(&targets(&["tests/a_test.py"]), &RunnerOptions::parse(["bundle", "x"]));
        assert_eq!(command, "poetry run pytest -x /project/tests/a_test.py");
    }
}
