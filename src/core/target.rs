//! # Test Target Module / 测试目标模块
//!
//! This module defines `TestTarget`, the normalized absolute path of a runnable
//! test file, and `ChangeSet`, the ordered set of files modified since the last
//! cycle. Normalization is purely lexical: the file system is never consulted.
//!
//! 此模块定义了 `TestTarget`（可运行测试文件的规范化绝对路径）
//! 和 `ChangeSet`（自上一轮以来被修改的有序文件集合）。
//! 规范化完全基于词法处理，不会访问文件系统。

use serde::{Serialize, Serializer};
use std::fmt;
use std::path::{Component, Path, PathBuf};

/// Lexically normalizes `raw` against `root`.
///
/// `~` and `$VAR` are expanded first; a relative result is joined onto `root`;
/// `.` components are dropped and `..` pops the previous component.
///
/// 基于 `root` 对 `raw` 进行词法规范化。
/// 首先展开 `~` 和 `$VAR`；相对路径会拼接到 `root` 上；
/// 丢弃 `.` 组件，`..` 会弹出前一个组件。
pub fn normalize_path(root: &Path, raw: &str) -> PathBuf {
    let expanded = shellexpand::full(raw)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| raw.to_string());
    let candidate = Path::new(&expanded);
    let joined = if candidate.is_absolute() {
        candidate.to_path_buf()
    } else {
        root.join(candidate)
    };

    let mut normalized = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // Never climb above the filesystem root.
                if !matches!(
                    normalized.components().next_back(),
                    None | Some(Component::RootDir) | Some(Component::Prefix(_))
                ) {
                    normalized.pop();
                }
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// Renders `path` relative to `root` with forward slashes, the form mapping
/// rules are matched against. Paths outside `root` are rendered whole.
///
/// 以正斜杠形式渲染相对于 `root` 的 `path`，映射规则针对此形式进行匹配。
pub fn relative_to_root(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    let parts: Vec<String> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            Component::RootDir => Some(String::new()),
            _ => None,
        })
        .collect();
    parts.join("/")
}

/// An absolute, normalized path to a single runnable test file.
/// Two spellings of the same file compare equal once wrapped.
///
/// 指向单个可运行测试文件的绝对规范化路径。
/// 同一文件的两种写法在包装后比较结果相等。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TestTarget(PathBuf);

impl TestTarget {
    /// Builds a target from any spelling of a path, relative ones resolved
    /// against `root`.
    pub fn new(root: &Path, raw: &str) -> Self {
        TestTarget(normalize_path(root, raw))
    }

    /// Wraps a path that is already absolute, normalizing `.`/`..` only.
    pub fn from_absolute(path: &Path) -> Self {
        TestTarget(normalize_path(Path::new("/"), &path.to_string_lossy()))
    }

    pub fn path(&self) -> &Path {
        &self.0
    }

    /// The target rendered relative to `root`, forward-slash separated.
    pub fn relative_to(&self, root: &Path) -> String {
        relative_to_root(root, &self.0)
    }
}

impl fmt::Display for TestTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

impl Serialize for TestTarget {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string_lossy())
    }
}

/// Files modified since the last cycle, normalized and free of duplicates.
/// Insertion order is kept so results stay deterministic.
///
/// 自上一轮以来修改的文件，已规范化且无重复。
/// 保留插入顺序以确保结果的确定性。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    paths: Vec<PathBuf>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collects `raw` paths, resolving relative spellings against `root`.
    pub fn from_paths<I, S>(root: &Path, raw: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = ChangeSet::new();
        for path in raw {
            set.insert(normalize_path(root, path.as_ref()));
        }
        set
    }

    /// Adds a path; returns `false` if it was already present.
    pub fn insert(&mut self, path: PathBuf) -> bool {
        if self.paths.contains(&path) {
            return false;
        }
        self.paths.push(path);
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.paths.iter().map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}
