//! Common types and utilities for the csz semantic front end.
//!
//! This crate provides foundational types used across all csz crates:
//! - String interning (`Atom`, `Interner`)
//! - Source spans (`Span`, `Spanned`)
//! - Diagnostics and the append-only `DiagnosticBag` sink
//! - Binder limits and thresholds

// String interning for identifier deduplication
pub mod interner;
pub use interner::{Atom, Interner};

// Span - Source location tracking (byte offsets)
pub mod span;
pub use span::{Span, Spanned};

// Diagnostic types, message table and sink
pub mod diagnostics;
pub use diagnostics::{Diagnostic, DiagnosticBag, DiagnosticCategory};

// Centralized limits and thresholds
pub mod limits;
