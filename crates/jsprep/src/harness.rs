// crates/jsprep/src/harness.rs
//
// The in.js/out.js harness: every file named `...in.js` under the test
// directory is parsed and compared byte-for-byte against its `...out.js`
// expectation. A case whose path mentions `always_fail` is required to
// mismatch instead.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use jsprep_engine::Preprocessor;
use walkdir::WalkDir;

use crate::CliError;

#[derive(Debug, Default)]
pub struct Summary {
    pub passed: usize,
    pub failed: usize,
}

impl Summary {
    pub fn total(&self) -> usize {
        self.passed + self.failed
    }
}

/// Discover test inputs, sorted so case numbers stay stable across runs.
fn discover_cases(dirname: &Path) -> Result<Vec<PathBuf>, CliError> {
    let mut cases = Vec::new();
    for entry in WalkDir::new(dirname).sort_by_file_name() {
        let entry = entry.map_err(io::Error::from)?;
        if entry.file_type().is_file() && entry.file_name().to_string_lossy().ends_with("in.js") {
            cases.push(entry.path().to_path_buf());
        }
    }
    Ok(cases)
}

/// Expectation path: the `in.js` suffix replaced by `out.js`.
fn expectation_path(in_path: &Path) -> PathBuf {
    let name = in_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = &name[..name.len() - "in.js".len()];
    in_path.with_file_name(format!("{}out.js", stem))
}

/// Run the cases under `dirname`, or just case `only` when given. The
/// engine is reset after every case so they stay independent.
pub fn run_cases(
    engine: &mut Preprocessor,
    dirname: &Path,
    only: Option<usize>,
) -> Result<Summary, CliError> {
    let cases = discover_cases(dirname)?;
    let mut summary = Summary::default();

    for (number, in_path) in cases.iter().enumerate() {
        if let Some(selected) = only {
            if number != selected {
                continue;
            }
        }

        let out_path = expectation_path(in_path);
        let parsed = engine.parse_file(in_path)?;
        let expected = fs::read_to_string(&out_path)?;

        let expect_failure = in_path.to_string_lossy().contains("always_fail");
        let matched = parsed == expected;

        if matched != expect_failure {
            println!("Test {} - PASS [{}]", number, in_path.display());
            summary.passed += 1;
        } else {
            println!("Test {} - FAIL [{}]", number, in_path.display());
            summary.failed += 1;
            if engine.save_failure_output {
                fs::write(format!("{}_expected", out_path.display()), &parsed)?;
            } else {
                println!("\n-- EXPECTED --\n{}", expected);
                println!("-- GOT --\n{}", parsed);
            }
        }

        engine.reset();
    }

    if summary.total() == 0 {
        println!("\n0 tests - nothing to run");
    } else {
        let rate = summary.passed as f64 / summary.total() as f64 * 100.0;
        println!(
            "\n{} tests - {:.1}% passed ({} passed, {} failed)",
            summary.total(),
            rate,
            summary.passed,
            summary.failed
        );
    }

    Ok(summary)
}
