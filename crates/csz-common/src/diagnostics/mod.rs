//! Diagnostic types, message lookup, and the append-only diagnostic sink.
//!
//! Message templates live in `data.rs`, keyed by numeric code, with `{0}`,
//! `{1}`, ... placeholders filled by [`format_message`].

use crate::span::Span;
use serde::Serialize;

mod data;
pub use data::{DIAGNOSTIC_MESSAGES, diagnostic_codes};

// =============================================================================
// Diagnostic Types
// =============================================================================

/// Diagnostic category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum DiagnosticCategory {
    Warning = 0,
    Error = 1,
    Suggestion = 2,
    Message = 3,
}

/// Related information for a diagnostic (e.g. a hint or a "see also" location).
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DiagnosticRelatedInformation {
    pub span: Span,
    pub message_text: String,
    pub category: DiagnosticCategory,
}

/// A binder diagnostic: code, severity, location and message arguments.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub code: u32,
    pub category: DiagnosticCategory,
    pub span: Span,
    pub message_text: String,
    /// The raw arguments substituted into the message template.
    pub args: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub related_information: Vec<DiagnosticRelatedInformation>,
}

impl Diagnostic {
    /// Build a diagnostic from a registered code, formatting its template.
    ///
    /// Unknown codes still produce an error diagnostic whose text lists the
    /// arguments, so a missing table entry never loses information.
    #[must_use]
    pub fn from_code(code: u32, span: Span, args: &[&str]) -> Self {
        let (category, message_text) = match get_diagnostic_message(code) {
            Some(msg) => (msg.category, format_message(msg.message, args)),
            None => (DiagnosticCategory::Error, args.join(", ")),
        };
        Self {
            code,
            category,
            span,
            message_text,
            args: args.iter().map(|a| (*a).to_string()).collect(),
            related_information: Vec::new(),
        }
    }

    /// Attach related information to this diagnostic.
    #[must_use]
    pub fn with_related(mut self, span: Span, message: String) -> Self {
        self.related_information.push(DiagnosticRelatedInformation {
            span,
            message_text: message,
            category: DiagnosticCategory::Message,
        });
        self
    }

    pub fn is_error(&self) -> bool {
        self.category == DiagnosticCategory::Error
    }
}

/// Format a diagnostic message by replacing {0}, {1}, etc. with arguments.
#[must_use]
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut result = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{i}}}"), arg);
    }
    result
}

/// A diagnostic message definition with code, category, and message template.
#[derive(Clone, Copy, Debug)]
pub struct DiagnosticMessage {
    pub code: u32,
    pub category: DiagnosticCategory,
    pub message: &'static str,
}

/// Look up a diagnostic message definition by code.
#[must_use]
pub fn get_diagnostic_message(code: u32) -> Option<&'static DiagnosticMessage> {
    DIAGNOSTIC_MESSAGES.iter().find(|m| m.code == code)
}

/// Get the message template for a diagnostic code.
#[must_use]
pub fn get_message_template(code: u32) -> Option<&'static str> {
    get_diagnostic_message(code).map(|m| m.message)
}

// =============================================================================
// DiagnosticBag - append-only sink
// =============================================================================

/// Append-only diagnostic collector handed to every binding call.
///
/// The binder only ever appends to a bag; it never inspects what was
/// appended earlier to decide what to do next. Speculative work binds into a
/// fresh bag and [`DiagnosticBag::append`]s it to the caller's bag when that
/// interpretation wins.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DiagnosticBag {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Append a diagnostic for `code` at `span`.
    pub fn add(&mut self, code: u32, span: Span, args: &[&str]) {
        self.push(Diagnostic::from_code(code, span, args));
    }

    /// Move every diagnostic of `other` into this bag, preserving order.
    pub fn append(&mut self, other: DiagnosticBag) {
        self.diagnostics.extend(other.diagnostics);
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.diagnostics.iter()
    }

    /// Diagnostic codes in report order (convenient for assertions).
    pub fn codes(&self) -> Vec<u32> {
        self.diagnostics.iter().map(|d| d.code).collect()
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

impl<'a> IntoIterator for &'a DiagnosticBag {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.diagnostics.iter()
    }
}

#[cfg(test)]
#[path = "../../tests/diagnostics_tests.rs"]
mod tests;
