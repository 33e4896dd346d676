//! # File System Unit Tests / 文件系统单元测试
//!
//! Unit tests for `infra::fs`: test discovery, manifest probing and reading
//! configuration and run output from disk.
//!
//! `infra::fs` 的单元测试：测试文件发现、依赖清单探测以及从磁盘读取配置和运行输出。

mod common;

use triage_runner::core::layout::ProjectLayout;
use triage_runner::infra::fs::{
    absolute_path, discover_test_files, has_dependency_manifest, is_directory, load_config,
    read_run_output, DirectoryCatalog,
};
use triage_runner::mapping::TestCatalog;

#[cfg(test)]
mod discovery_tests {
    use super::*;

    #[test]
    fn test_discovers_only_conventional_test_files_sorted() {
        let project = common::setup_ruby_project();
        let root = common::canonical_root(&project);

        let files = discover_test_files(&root, &ProjectLayout::default()).unwrap();
        let relative: Vec<String> = files
            .iter()
            .map(|f| f.strip_prefix(&root).unwrap().to_string_lossy().replace('\\', "/"))
            .collect();
        assert_eq!(
            relative,
            vec![
                "spec/widgets/box_spec.rb",
                "spec/widgets/frame_spec.rb",
                "spec/z_last_spec.rb",
            ]
        );
    }

    #[test]
    fn test_missing_test_dir_is_empty() {
        let project = common::setup_project(&["lib/a.rb"]);
        let files = discover_test_files(project.path(), &ProjectLayout::default()).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn test_catalog_sees_files_added_later() {
        let project = common::setup_project(&["spec/a_spec.rb"]);
        let root = common::canonical_root(&project);
        let catalog = DirectoryCatalog::new(&root, ProjectLayout::default());
        assert_eq!(catalog.test_files().len(), 1);

        common::write_file(&root, "spec/b_spec.rb", "");
        assert_eq!(catalog.test_files().len(), 2);
    }
}

#[cfg(test)]
mod probing_tests {
    use super::*;

    #[test]
    fn test_dependency_manifest_probe() {
        let project = common::setup_project(&["Gemfile"]);
        assert!(has_dependency_manifest(project.path(), "Gemfile"));
        assert!(!has_dependency_manifest(project.path(), "pyproject.toml"));
        assert!(!has_dependency_manifest(project.path(), ""));
    }

    #[test]
    fn test_is_directory() {
        let project = common::setup_project(&["lib/a.rb"]);
        assert!(is_directory(&project.path().join("lib")));
        assert!(!is_directory(&project.path().join("lib/a.rb")));
        assert!(!is_directory(&project.path().join("missing")));
    }

    #[test]
    fn test_absolute_path_requires_existing_dir() {
        let project = common::setup_project(&[]);
        assert!(absolute_path(project.path()).unwrap().is_absolute());
        assert!(absolute_path(&project.path().join("missing")).is_err());
    }
}

#[cfg(test)]
mod loading_tests {
    use super::*;

    #[test]
    fn test_missing_implicit_config_gives_defaults() {
        let project = common::setup_project(&[]);
        let config = load_config(&project.path().join("Triage.toml"), false).unwrap();
        assert_eq!(config.layout, ProjectLayout::default());
    }

    #[test]
    fn test_missing_explicit_config_is_an_error() {
        let project = common::setup_project(&[]);
        assert!(load_config(&project.path().join("Triage.toml"), true).is_err());
    }

    #[test]
    fn test_config_with_bad_pattern_is_rejected() {
        let project = common::setup_project(&[]);
        let path = common::write_file(
            project.path(),
            "Triage.toml",
            "[[mapping.rules]]\npattern = \"(\"\ntargets = [\"x\"]\n",
        );
        assert!(load_config(&path, true).is_err());
    }

    #[test]
    fn test_config_is_loaded() {
        let project = common::setup_project(&[]);
        let path = common::write_file(project.path(), "Triage.toml", "[layout]\ntest_dir = \"test\"\n");
        let config = load_config(&path, false).unwrap();
        assert_eq!(config.layout.test_dir, "test");
    }

    #[test]
    fn test_run_output_is_read_lossily() {
        let project = common::setup_project(&[]);
        let path = project.path().join("out.txt");
        std::fs::write(&path, b"1 example, 0 failures\n\xff\n").unwrap();
        let output = read_run_output(&path).unwrap();
        assert!(output.starts_with("1 example, 0 failures"));
        assert!(output.contains('\u{FFFD}'));
    }

    #[test]
    fn test_missing_run_output_is_an_error() {
        let project = common::setup_project(&[]);
        assert!(read_run_output(&project.path().join("nope.txt")).is_err());
    }
}
