// Shared test helpers for integration tests
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};

/// A run with two failures in two files; the second failure's first frame
/// points into library code, not the test file.
pub const TWO_FAILURES_OUTPUT: &str = "\
Randomized with seed 1234
..F.F

Failures:

  1) Widget box renders
     Failure/Error: expect(box.width).to eq(3)

       expected: 3
            got: 2
     # ./spec/widgets/box_spec.rb:12:in `block (2 levels) in <top (required)>'

  2) Widget frame draws
     Failure/Error: frame.draw
     NoMethodError:
       undefined method `draw' for nil
     # ./lib/widgets/frame.rb:7:in `draw'
     # ./spec/widgets/frame_spec.rb:20:in `block (2 levels) in <top (required)>'

Finished in 0.01 seconds (files took 0.1 seconds to load)
5 examples, 2 failures

Failed examples:

rspec ./spec/widgets/box_spec.rb:10 # Widget box renders
rspec ./spec/widgets/frame_spec.rb:18 # Widget frame draws
";

/// A clean run.
pub const PASSING_OUTPUT: &str = "\
.....

Finished in 0.01 seconds (files took 0.1 seconds to load)
5 examples, 0 failures
";

/// A run killed before the summary was printed.
pub const CRASHED_OUTPUT: &str = "\
/usr/lib/ruby/3.2.0/rubygems.rb:250:in `find_spec_for_exe': can't find gem rspec-core (Gem::GemNotFoundException)
";

/// A failure with no frame following the test naming convention.
pub const FALLBACK_OUTPUT: &str = "\
Failures:

  1) Loader boots
     Failure/Error: Loader.boot!
     RuntimeError:
       boom
     # ./lib/loader.rb:3:in `boot!'
     # ./lib/app.rb:9:in `start'

1 example, 1 failure
";

/// Writes `files` (root-relative) into a fresh temporary project.
pub fn setup_project(files: &[&str]) -> TempDir {
    let temp_dir = tempdir().expect("Failed to create temporary directory");
    for file in files {
        let path = temp_dir.path().join(file);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        fs::write(&path, "# fixture\n").expect("Failed to write fixture file");
    }
    temp_dir
}

/// The default Ruby-style project used by most CLI tests.
pub fn setup_ruby_project() -> TempDir {
    setup_project(&[
        "Gemfile",
        "lib/widgets/box.rb",
        "lib/widgets/frame.rb",
        "spec/spec_helper.rb",
        "spec/shared/contexts.rb",
        "spec/widgets/box_spec.rb",
        "spec/widgets/frame_spec.rb",
        "spec/z_last_spec.rb",
    ])
}

/// Canonical root, so paths compare equal to the CLI's canonicalized root.
pub fn canonical_root(dir: &TempDir) -> PathBuf {
    fs::canonicalize(dir.path()).expect("Failed to canonicalize temporary directory")
}

pub fn write_file(root: &Path, name: &str, content: &str) -> PathBuf {
    let path = root.join(name);
    fs::write(&path, content).expect("Failed to write file");
    path
}

/// A fixed catalog for engine tests that never touch the disk.
pub fn fixed_catalog(root: &Path) -> Vec<PathBuf> {
    [
        "spec/a_spec.rb",
        "spec/widgets/box_spec.rb",
        "spec/widgets/frame_spec.rb",
    ]
    .iter()
    .map(|f| root.join(f))
    .collect()
}
