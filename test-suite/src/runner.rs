use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use similar::TextDiff;
use typeval_compile::{Compiler, SchemaNode};

use crate::{Expectation, TestCase, TestFailure, TestResults, parse_test_case};

/// The outcome of one expectation of one case.
#[derive(Debug, Clone)]
pub struct CaseOutcome {
    pub name: String,
    pub result: Result<(), String>,
}

pub struct TestRunner {
    cases_dir: PathBuf,
}

impl TestRunner {
    pub fn new(cases_dir: impl Into<PathBuf>) -> Self {
        Self {
            cases_dir: cases_dir.into(),
        }
    }

    pub fn cases_dir(&self) -> &Path {
        &self.cases_dir
    }

    /// Discover and run all test cases
    pub fn run_all(&self) -> Result<TestResults> {
        self.run_filtered(None)
    }

    /// Run the cases whose name contains `filter`, or all of them.
    pub fn run_filtered(&self, filter: Option<&str>) -> Result<TestResults> {
        let mut results = TestResults::new();

        for test_file in self.discover_test_files()? {
            for outcome in self.run_file(&test_file)? {
                if filter.is_some_and(|filter| !outcome.name.contains(filter)) {
                    continue;
                }
                match outcome.result {
                    Ok(()) => results.add_pass(),
                    Err(error) => results.add_failure(TestFailure::new(outcome.name, error)),
                }
            }
        }

        Ok(results)
    }

    /// Run every expectation of one case file.
    pub fn run_file(&self, test_file: &Path) -> Result<Vec<CaseOutcome>> {
        let content = fs::read_to_string(test_file)
            .with_context(|| format!("Failed to read test file: {}", test_file.display()))?;
        let file_name = self.display_name(test_file);

        let test_case = match parse_test_case(test_file, &content) {
            Ok(test_case) => test_case,
            Err(e) => {
                return Ok(vec![CaseOutcome {
                    name: file_name,
                    result: Err(format!("Failed to parse test case: {e}")),
                }]);
            }
        };

        let compiled = compile_case(&test_case);
        Ok(test_case
            .expectations()
            .into_iter()
            .map(|expectation| CaseOutcome {
                name: format!("{file_name} ({})", expectation.label()),
                result: check(expectation, &compiled),
            })
            .collect())
    }

    /// Discover all .json test files
    pub fn discover_test_files(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        walk_directory(&self.cases_dir, &mut files)?;
        files.sort();
        Ok(files)
    }

    /// Path relative to the cases directory, without extension.
    fn display_name(&self, path: &Path) -> String {
        path.strip_prefix(&self.cases_dir)
            .unwrap_or(path)
            .with_extension("")
            .display()
            .to_string()
    }
}

fn walk_directory(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    if !dir.exists() {
        return Ok(());
    }

    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            walk_directory(&path, files)?;
        } else if path.extension().and_then(|s| s.to_str()) == Some("json") {
            files.push(path);
        }
    }

    Ok(())
}

/// Load the case graph and compile its root. Errors are rendered as strings
/// so that error expectations can match against them.
fn compile_case(test_case: &TestCase) -> Result<SchemaNode, String> {
    let graph = test_case
        .graph
        .clone()
        .into_graph()
        .map_err(|e| e.to_string())?;
    let root = graph
        .lookup(&test_case.root)
        .ok_or_else(|| format!("root type `{}` is not defined", test_case.root))?;
    Compiler::with_options(&graph, test_case.compile_options())
        .compile(root)
        .map_err(|e| e.to_string())
}

fn check(expectation: Expectation<'_>, compiled: &Result<SchemaNode, String>) -> Result<(), String> {
    match (expectation, compiled) {
        (Expectation::Error(expected), Err(actual)) => {
            if actual.contains(expected) {
                Ok(())
            } else {
                Err(format!("expected error containing `{expected}`, got `{actual}`"))
            }
        }
        (Expectation::Error(expected), Ok(schema)) => Err(format!(
            "expected error containing `{expected}`, got schema {}",
            schema.to_source()
        )),
        (_, Err(actual)) => Err(format!("compilation failed: {actual}")),
        (Expectation::Json(expected), Ok(schema)) => {
            let actual = serde_json::to_value(schema).map_err(|e| e.to_string())?;
            if &actual == expected {
                Ok(())
            } else {
                Err(diff(&pretty_json(expected), &pretty_json(&actual)))
            }
        }
        (Expectation::Source(expected), Ok(schema)) => {
            let expected = expected.trim_end();
            let actual = if expected.contains('\n') {
                schema.to_source_pretty()
            } else {
                schema.to_source()
            };
            if actual == expected {
                Ok(())
            } else {
                Err(diff(expected, &actual))
            }
        }
    }
}

fn pretty_json(value: &serde_json::Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// Unified line diff of `expected` against `actual`.
pub fn diff(expected: &str, actual: &str) -> String {
    let expected = format!("{expected}\n");
    let actual = format!("{actual}\n");
    TextDiff::from_lines(&expected, &actual)
        .unified_diff()
        .header("expected", "actual")
        .to_string()
}
