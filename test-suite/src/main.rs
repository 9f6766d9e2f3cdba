//! Custom test runner for the typeval test suite.
//!
//! This binary runs all case files and reports one line per file:
//! - basic/root-primitive 2/2 PASS
//! - cycles/self-reference 0/1 FAIL

use clap::Parser;
use test_suite::{CaseOutcome, TestRunner, cases_dir};

#[derive(Parser)]
#[command(name = "test-suite", about = "typeval test suite runner")]
struct Args {
    /// Filter tests by name pattern (substring match)
    #[arg(short, long)]
    filter: Option<String>,

    /// Show short error summaries instead of detailed output
    #[arg(short, long)]
    short: bool,
}

/// ANSI color codes
mod colors {
    pub const GREEN: &str = "\x1b[32m";
    pub const RED: &str = "\x1b[31m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const CYAN: &str = "\x1b[36m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const RESET: &str = "\x1b[0m";
}

fn main() {
    let args = Args::parse();
    let exit_code = run(&args);
    std::process::exit(exit_code);
}

fn run(args: &Args) -> i32 {
    println!(
        "\n{}{}typeval Test Suite{}",
        colors::BOLD,
        colors::CYAN,
        colors::RESET
    );
    println!("{}{}", colors::DIM, "=".repeat(50));
    println!("{}\n", colors::RESET);

    let runner = TestRunner::new(cases_dir());
    let files = match runner.discover_test_files() {
        Ok(files) => files,
        Err(e) => {
            eprintln!(
                "{}{}Error:{} Failed to collect test cases: {e:#}",
                colors::BOLD,
                colors::RED,
                colors::RESET,
            );
            return 1;
        }
    };

    let mut passed = 0;
    let mut total = 0;
    let mut failures: Vec<CaseOutcome> = Vec::new();

    for file in &files {
        let outcomes = match runner.run_file(file) {
            Ok(outcomes) => outcomes,
            Err(e) => {
                eprintln!("{}{}Error:{} {e:#}", colors::BOLD, colors::RED, colors::RESET);
                return 1;
            }
        };
        let outcomes: Vec<_> = outcomes
            .into_iter()
            .filter(|outcome| {
                args.filter
                    .as_deref()
                    .is_none_or(|filter| outcome.name.contains(filter))
            })
            .collect();
        if outcomes.is_empty() {
            continue;
        }

        let file_passed = outcomes.iter().filter(|o| o.result.is_ok()).count();
        let file_name = file
            .strip_prefix(runner.cases_dir())
            .unwrap_or(file)
            .with_extension("")
            .display()
            .to_string();
        let (status, color) = if file_passed == outcomes.len() {
            ("PASS", colors::GREEN)
        } else {
            ("FAIL", colors::RED)
        };
        println!(
            "  {file_name} {file_passed}/{} {}{}{status}{}",
            outcomes.len(),
            colors::BOLD,
            color,
            colors::RESET
        );

        passed += file_passed;
        total += outcomes.len();
        failures.extend(outcomes.into_iter().filter(|o| o.result.is_err()));
    }

    if total == 0 {
        println!(
            "{}{}Warning:{} No test cases found{}",
            colors::BOLD,
            colors::YELLOW,
            colors::RESET,
            if args.filter.is_some() {
                " matching filter"
            } else {
                ""
            }
        );
        return 0;
    }

    if !failures.is_empty() {
        println!("\n{}{}Failures{}", colors::BOLD, colors::RED, colors::RESET);
        for failure in &failures {
            let error = failure.result.as_ref().err().map(String::as_str).unwrap_or_default();
            if args.short {
                let first_line = error.lines().next().unwrap_or_default();
                println!("  {}: {first_line}", failure.name);
            } else {
                println!("\n  {}{}{}", colors::BOLD, failure.name, colors::RESET);
                for line in error.lines() {
                    println!("    {line}");
                }
            }
        }
    }

    let color = if failures.is_empty() {
        colors::GREEN
    } else {
        colors::RED
    };
    println!(
        "\n{}{}{passed}/{total} passed{}",
        colors::BOLD,
        color,
        colors::RESET
    );

    if failures.is_empty() { 0 } else { 1 }
}
