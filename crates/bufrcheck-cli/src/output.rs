use crate::errors::EnhancedError;
use anyhow::{Context, Result};
use bufrcheck_syntax::{Diagnostic, SpannedToken, Template};
use bufrcheck_validate::{Input, Report};
use colored::*;
use serde::Serialize;

fn diagnostic_error(diagnostic: &Diagnostic, input: &Input) -> EnhancedError {
    EnhancedError::new(diagnostic.message.clone())
        .with_label(format!("{} error", diagnostic.category))
        .with_span(diagnostic.span)
        .with_file(input.name.clone())
        .with_source(input.text.clone())
}

/// Renders every diagnostic of every report followed by a summary line.
/// `reports` and `inputs` are parallel slices.
pub fn render_text(inputs: &[Input], reports: &[Report]) -> String {
    let mut out = String::new();
    let mut failed = 0;
    let mut errors = 0;

    for (input, report) in inputs.iter().zip(reports) {
        if report.is_clean() {
            out.push_str(&format!("{} {}\n", "ok".green().bold(), input.name));
            continue;
        }

        failed += 1;
        errors += report.error_count();
        for diagnostic in report.diagnostics() {
            out.push_str(&diagnostic_error(diagnostic, input).render());
            out.push('\n');
        }
    }

    let summary = format!(
        "{} checked, {} with errors, {} error{}",
        reports.len(),
        failed,
        errors,
        if errors == 1 { "" } else { "s" }
    );
    if failed == 0 {
        out.push_str(&format!("{}\n", summary.green()));
    } else {
        out.push_str(&format!("{}\n", summary.red().bold()));
    }

    out
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    clean: bool,
    reports: &'a [Report],
}

pub fn render_json(reports: &[Report]) -> Result<String> {
    let output = JsonOutput {
        clean: reports.iter().all(Report::is_clean),
        reports,
    };
    serde_json::to_string_pretty(&output).context("Failed to serialize reports")
}

/// One token per line: `line:col  kind  text`.
pub fn render_tokens(tokens: &[SpannedToken]) -> String {
    let mut out = String::new();
    for spanned in tokens {
        out.push_str(&format!("{:<8} {}\n", spanned.span.to_string(), spanned.token.display_name()));
    }
    out
}

pub fn render_tree(template: &Template, syntax: &[Diagnostic]) -> String {
    let mut out = if template.is_empty() {
        format!("template {}\n", "(empty)".dimmed())
    } else {
        template.to_string()
    };
    for diagnostic in syntax {
        out.push_str(&format!("{} {}\n", "!".yellow().bold(), diagnostic));
    }
    out
}
