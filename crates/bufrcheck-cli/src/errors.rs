use bufrcheck_syntax::Span;
use colored::*;
use std::fmt;

/// A message with optional location, source excerpt and hints, rendered
/// in the compiler-style layout used for every problem the CLI prints.
pub struct EnhancedError {
    pub label: String,
    pub message: String,
    pub span: Option<Span>,
    pub file: Option<String>,
    pub source: Option<String>,
    pub help: Option<String>,
}

impl EnhancedError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            label: "error".to_string(),
            message: message.into(),
            span: None,
            file: None,
            source: None,
            help: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Prints the rendered error to stderr.
    pub fn display(&self) {
        eprint!("{}", self.render());
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("{} {}\n", format!("{}:", self.label).red().bold(), self.message.bold()));

        if let (Some(file), Some(span)) = (&self.file, &self.span) {
            out.push_str(&format!("  {} {}:{}:{}\n", "-->".blue().bold(), file, span.line, span.col));
        } else if let Some(file) = &self.file {
            out.push_str(&format!("  {} {}\n", "-->".blue().bold(), file));
        }

        if let (Some(source), Some(span)) = (&self.source, &self.span) {
            self.render_source_with_span(&mut out, source, span);
        }

        if let Some(help) = &self.help {
            out.push_str(&format!("  {} {}\n", "help:".cyan().bold(), help));
        }

        out
    }

    fn render_source_with_span(&self, out: &mut String, source: &str, span: &Span) {
        let lines: Vec<&str> = source.lines().collect();
        let line_idx = span.line.saturating_sub(1);

        if line_idx >= lines.len() {
            return;
        }

        let end = (line_idx + 2).min(lines.len());
        let start = line_idx.saturating_sub(1);
        let line_num_width = end.to_string().len();

        for (i, line) in lines.iter().enumerate().take(end).skip(start) {
            let line_num = i + 1;

            if line_num == span.line {
                out.push_str(&format!(
                    "{:>width$} {} {}\n",
                    line_num.to_string().blue().bold(),
                    "|".blue().bold(),
                    line,
                    width = line_num_width
                ));

                let spaces = " ".repeat(span.col.saturating_sub(1));
                let carets = "^".repeat(span.len().max(1));
                out.push_str(&format!(
                    "{:>width$} {} {}{}\n",
                    "",
                    "|".blue().bold(),
                    spaces,
                    carets.red().bold(),
                    width = line_num_width
                ));
            } else {
                out.push_str(&format!(
                    "{:>width$} {} {}\n",
                    line_num.to_string().dimmed(),
                    "|".blue().bold(),
                    line,
                    width = line_num_width
                ));
            }
        }
    }
}

impl fmt::Display for EnhancedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl fmt::Debug for EnhancedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EnhancedError: {}", self.message)
    }
}

impl std::error::Error for EnhancedError {}

/// Turns an input acquisition failure into a printable error with a hint.
pub fn enhance_error(err: &anyhow::Error) -> EnhancedError {
    let message = format!("{:#}", err);
    let enhanced = EnhancedError::new(message.clone());

    if message.contains("byte limit") {
        enhanced.with_help("Raise max_input_bytes in .bufrcheckrc if this template is expected to be this large")
    } else if message.contains("stream did not contain valid UTF-8") {
        enhanced.with_help("Templates are text; binary BUFR messages cannot be checked directly")
    } else if message.contains("Failed to open") {
        enhanced.with_help("Check the path, or pass '-' to read the template from stdin")
    } else {
        enhanced
    }
}
