//! # Config Module Unit Tests / Config 模块单元测试
//!
//! This module contains unit tests for the `config.rs` module, testing the
//! `Triage.toml` model, its defaults, and the engine parts built from it.
//!
//! 此模块包含 `config.rs` 模块的单元测试，
//! 测试 `Triage.toml` 模型、其默认值以及由其构建的引擎组件。

use std::path::{Path, PathBuf};
use triage_runner::config::{RuleConfig, RulePosition};
use triage_runner::mapping::MatchPolicy;
use triage_runner::{TestTarget, TriageConfig, TriageError};

const ROOT: &str = "/project";

fn target(relative: &str) -> TestTarget {
    TestTarget::new(Path::new(ROOT), relative)
}

#[cfg(test)]
mod parsing_tests {
    use super::*;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config = TriageConfig::from_toml("").unwrap();
        assert_eq!(config, TriageConfig::default());
        assert_eq!(config.language, "en");
        assert_eq!(config.layout.test_dir, "spec");
        assert_eq!(config.runner.invocation.program, "rspec");
        assert_eq!(config.runner.dependency_manifest, "Gemfile");
        assert_eq!(config.mapping.policy, MatchPolicy::FirstMatch);
        assert!(config.mapping.include_defaults);
    }

    #[test]
    fn test_full_file_parses() {
        let toml_str = r#"
language = "zh-CN"

[layout]
test_dir = "test"
source_dir = "src"
extension = "py"
test_suffix = "_test"

[mapping]
policy = "union"
include_defaults = false

[[mapping.rules]]
pattern = "^app/(.*)\\.py$"
targets = ["test/app/$1_test.py"]

[[mapping.rules]]
pattern = "^conftest\\.py$"
all_tests = true
position = "after"

[runner]
program = "pytest"
wrapper = ["poetry", "run"]
fixed_args = []
dependency_manifest = "pyproject.toml"
options = ["x"]

[signatures]
completion = "(?m)^=+ (?P<failures>\\d+) failed"
"#;
        let config = TriageConfig::from_toml(toml_str).unwrap();

        assert_eq!(config.language, "zh-CN");
        assert_eq!(config.layout.extension, "py");
        assert_eq!(config.layout.helper_file, "spec_helper");
        assert_eq!(config.mapping.policy, MatchPolicy::Union);
        assert_eq!(config.mapping.rules.len(), 2);
        assert_eq!(config.mapping.rules[0].position, RulePosition::Before);
        assert_eq!(config.mapping.rules[1].position, RulePosition::After);
        assert!(config.mapping.rules[1].all_tests);
        assert_eq!(config.runner.invocation.wrapper, vec!["poetry", "run"]);
        assert!(config.runner.invocation.fixed_args.is_empty());
        assert!(config.signatures.completion.is_some());
        assert!(config.signatures.backtrace_frame.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unknown_policy_is_rejected() {
        let result = TriageConfig::from_toml("[mapping]\npolicy = \"sometimes\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_default_config_round_trips_through_toml() {
        let config = TriageConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("program = \"rspec\""));
        assert_eq!(TriageConfig::from_toml(&toml_str).unwrap(), config);
    }
}

#[cfg(test)]
mod engine_building_tests {
    use super::*;

    fn rule(pattern: &str, targets: &[&str], position: RulePosition) -> RuleConfig {
        RuleConfig {
            pattern: pattern.to_string(),
            targets: targets.iter().map(|t| t.to_string()).collect(),
            all_tests: false,
            position,
        }
    }

    #[test]
    fn test_rule_order_is_before_builtins_after() {
        let mut config = TriageConfig::default();
        config.mapping.rules = vec![
            rule("^z/(.*)$", &["spec/$1_spec.rb"], RulePosition::After),
            rule("^a/(.*)$", &["spec/$1_spec.rb"], RulePosition::Before),
        ];
        let table = config.mapping_table().unwrap();
        let names: Vec<&str> = table.rules().iter().map(|r| r.name()).collect();
        assert_eq!(
            names,
            vec!["custom-2", "test-file", "source-file", "shared-infra", "custom-1"]
        );
    }

    #[test]
    fn test_builtins_can_be_excluded() {
        let mut config = TriageConfig::default();
        config.mapping.include_defaults = false;
        assert!(config.mapping_table().unwrap().is_empty());
    }

    #[test]
    fn test_custom_rule_overrides_builtin_in_resolver() {
        let mut config = TriageConfig::default();
        config.mapping.rules = vec![rule(
            r"^lib/widgets/(.*)\.rb$",
            &["spec/ui/$1_spec.rb"],
            RulePosition::Before,
        )];
        let resolver = config.resolver(Path::new(ROOT)).unwrap();
        let catalog: Vec<PathBuf> = vec![];
        assert_eq!(
            resolver.resolve(Path::new("lib/widgets/box.rb"), &catalog),
            vec![target("spec/ui/box_spec.rb")]
        );
    }

    #[test]
    fn test_all_tests_rule_fans_out() {
        let mut config = TriageConfig::default();
        config.mapping.rules = vec![RuleConfig {
            pattern: r"^config/.*\.yml$".to_string(),
            targets: vec![],
            all_tests: true,
            position: RulePosition::Before,
        }];
        let resolver = config.resolver(Path::new(ROOT)).unwrap();
        let catalog = vec![PathBuf::from("/project/spec/a_spec.rb")];
        assert_eq!(
            resolver.resolve(Path::new("config/app.yml"), &catalog),
            vec![target("spec/a_spec.rb")]
        );
    }

    #[test]
    fn test_rule_without_targets_is_a_config_error() {
        let mut config = TriageConfig::default();
        config.mapping.rules = vec![rule("^docs/", &[], RulePosition::Before)];
        assert!(matches!(config.validate(), Err(TriageError::Config(_))));
    }

    #[test]
    fn test_invalid_rule_pattern_fails_validation() {
        let mut config = TriageConfig::default();
        config.mapping.rules = vec![rule("^lib/(", &["x"], RulePosition::Before)];
        assert!(matches!(
            config.validate(),
            Err(TriageError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_invalid_signature_fails_validation() {
        let mut config = TriageConfig::default();
        config.signatures.backtrace_frame = Some("[".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_runner_options_merge_config_and_extras() {
        let mut config = TriageConfig::default();
        config.runner.options = vec!["format,progress".to_string()];
        let options = config.runner_options(&["t,slow"]);
        assert_eq!(options.to_args(), vec!["--format", "progress", "-t", "slow"]);
        assert!(!options.use_dependency_manager());
    }

    #[test]
    fn test_dependency_manager_from_config_or_extra() {
        let mut config = TriageConfig::default();
        assert!(config.runner_options(&["bundle"]).use_dependency_manager());

        config.runner.use_dependency_manager = true;
        let no_extras: [&str; 0] = [];
        assert!(config.runner_options(&no_extras).use_dependency_manager());
    }
}
