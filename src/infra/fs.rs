//! # File System Operations Module / 文件系统操作模块
//!
//! This module provides the file-system collaborators of the engine:
//! discovering known test files, probing for the dependency manifest, and
//! reading configuration and captured run output.
//!
//! 此模块提供引擎的文件系统协作功能：
//! 发现已知的测试文件、探测依赖清单文件，以及读取配置和捕获的运行输出。

use anyhow::{Context, Result};
use regex::Regex;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::core::config::TriageConfig;
use crate::core::layout::ProjectLayout;
use crate::core::mapping::TestCatalog;
use crate::core::target::relative_to_root;
use crate::infra::t;

/// Recursively lists test files under the layout's test directory.
/// A missing test directory yields an empty list.
///
/// # Arguments
/// * `root` - Absolute project root
/// * `layout` - Naming convention used to recognize test files
///
/// # Returns
/// Absolute paths, sorted so the enumeration order is stable
pub fn discover_test_files(root: &Path, layout: &ProjectLayout) -> Result<Vec<PathBuf>> {
    let test_dir = root.join(&layout.test_dir);
    if !is_directory(&test_dir) {
        return Ok(vec![]);
    }
    let convention = layout.test_file_regex()?;

    let mut files = Vec::new();
    collect_files(&test_dir, root, &convention, &mut files)
        .with_context(|| format!("Failed to scan test directory: {}", test_dir.display()))?;
    files.sort();
    debug!(count = files.len(), dir = %test_dir.display(), "test files discovered");
    Ok(files)
}

fn collect_files(dir: &Path, root: &Path, convention: &Regex, out: &mut Vec<PathBuf>) -> std::io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type()?.is_dir() {
            collect_files(&path, root, convention, out)?;
        } else if convention.is_match(&relative_to_root(root, &path)) {
            out.push(path);
        }
    }
    Ok(())
}

/// A `TestCatalog` backed by the project directory. Every query rescans, so
/// test files added between cycles are picked up.
///
/// 由项目目录支持的 `TestCatalog`。每次查询都会重新扫描，
/// 因此周期之间新增的测试文件会被发现。
#[derive(Debug, Clone)]
pub struct DirectoryCatalog {
    root: PathBuf,
    layout: ProjectLayout,
}

impl DirectoryCatalog {
    pub fn new(root: impl Into<PathBuf>, layout: ProjectLayout) -> Self {
        Self {
            root: root.into(),
            layout,
        }
    }
}

impl TestCatalog for DirectoryCatalog {
    fn test_files(&self) -> Vec<PathBuf> {
        discover_test_files(&self.root, &self.layout).unwrap_or_else(|e| {
            warn!(error = %e, "test file discovery failed; treating catalog as empty");
            vec![]
        })
    }
}

/// Whether the dependency manifest (e.g. `Gemfile`) exists at the root.
pub fn has_dependency_manifest(root: &Path, manifest: &str) -> bool {
    !manifest.is_empty() && root.join(manifest).is_file()
}

/// Loads the configuration file.
///
/// A missing file is only an error when the path was given explicitly;
/// otherwise the defaults apply.
pub fn load_config(path: &Path, explicit: bool) -> Result<TriageConfig> {
    // For config parsing, we don't have the locale yet. Use English as a default.
    let locale = "en";
    if !path.exists() && !explicit {
        debug!(path = %path.display(), "no configuration file; using defaults");
        return Ok(TriageConfig::default());
    }

    let content = fs::read_to_string(path)
        .with_context(|| t!("config_read_failed_path", locale = locale, path = path.display()))?;
    let config = TriageConfig::from_toml(&content)
        .with_context(|| t!("config_parse_failed", locale = locale))?;
    config
        .validate()
        .with_context(|| t!("config_parse_failed", locale = locale))?;
    Ok(config)
}

/// Reads captured run output from a file, or from stdin when `source` is `-`.
pub fn read_run_output(source: &Path) -> Result<String> {
    if source == Path::new("-") {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read run output from stdin")?;
        return Ok(buffer);
    }
    // Lossy: runner output may carry stray non-UTF-8 bytes.
    let bytes = fs::read(source)
        .with_context(|| t!("output_read_failed", path = source.display()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Checks if a path exists and is a directory.
pub fn is_directory(path: &Path) -> bool {
    path.exists() && path.is_dir()
}

/// Gets the absolute path from a potentially relative path.
///
/// # Arguments
/// * `path` - Path to canonicalize; `~` and `$VAR` are expanded first
///
/// # Returns
/// Canonicalized absolute path, or an error if the path doesn't exist
pub fn absolute_path(path: &Path) -> Result<PathBuf> {
    let raw = path.to_string_lossy();
    let expanded = shellexpand::full(&raw)
        .with_context(|| format!("Failed to expand path: {}", raw))?;
    fs::canonicalize(&*expanded)
        .with_context(|| t!("project_dir_not_found", path = path.display()))
}
