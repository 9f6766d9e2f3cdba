use std::path::Path;

use serde::Deserialize;
use typeval_compile::CompileOptions;
use typeval_types::load::TypeGraphFile;

/// A single case file: a type graph, the type to compile, and what the
/// compilation must produce.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TestCase {
    #[serde(skip)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub graph: TypeGraphFile,
    pub root: String,
    /// Compiler settings, defaults if absent.
    #[serde(default)]
    pub options: Option<CompileOptions>,
    #[serde(default)]
    pub json: Option<serde_json::Value>,
    /// Expected object literal. A multi-line value is compared against the
    /// pretty rendering.
    #[serde(default)]
    pub source: Option<String>,
    /// Substring of the expected error message.
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy)]
pub enum Expectation<'a> {
    Json(&'a serde_json::Value),
    Source(&'a str),
    Error(&'a str),
}

impl Expectation<'_> {
    pub fn label(&self) -> &'static str {
        match self {
            Expectation::Json(_) => "json",
            Expectation::Source(_) => "source",
            Expectation::Error(_) => "error",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TestCaseError {
    #[error("invalid case file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("case has no `json`, `source` or `error` expectation")]
    NoExpectation,
    #[error("`error` cannot be combined with `json` or `source`")]
    ConflictingExpectations,
}

impl TestCase {
    pub fn compile_options(&self) -> CompileOptions {
        self.options.clone().unwrap_or_default()
    }

    pub fn expectations(&self) -> Vec<Expectation<'_>> {
        let mut expectations = Vec::new();
        if let Some(json) = &self.json {
            expectations.push(Expectation::Json(json));
        }
        if let Some(source) = &self.source {
            expectations.push(Expectation::Source(source));
        }
        if let Some(error) = &self.error {
            expectations.push(Expectation::Error(error));
        }
        expectations
    }
}

/// Parse a case file. The case is named after the file stem.
pub fn parse_test_case(path: &Path, content: &str) -> Result<TestCase, TestCaseError> {
    let mut case: TestCase = serde_json::from_str(content)?;
    case.name = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("unknown")
        .to_string();

    if case.error.is_some() && (case.json.is_some() || case.source.is_some()) {
        return Err(TestCaseError::ConflictingExpectations);
    }
    if case.expectations().is_empty() {
        return Err(TestCaseError::NoExpectation);
    }
    Ok(case)
}
