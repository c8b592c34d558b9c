//! csz: a C#-style semantic expression binder and switch decision-DAG compiler.
//!
//! The workspace is split the same way binding is staged:
//! - [`common`] - spans, interning, diagnostics and limits
//! - [`syntax`] - the parsed syntax arena the binder reads
//! - [`symbols`] - symbols, types, scopes and the compilation builder
//! - [`binder`] - bound nodes, expression binding and switch compilation
//!
//! This crate adds the host-facing pieces: [`init_tracing`] and options-file
//! loading in [`config`].

pub use csz_binder as binder;
pub use csz_common as common;
pub use csz_symbols as symbols;
pub use csz_syntax as syntax;

pub use csz_binder::{Binder, BinderOptions, BoundNode, BoundSwitch, Collaborators};
pub use csz_common::{Diagnostic, DiagnosticBag, DiagnosticCategory};
pub use csz_symbols::{Compilation, CompilationBuilder};
pub use csz_syntax::{SyntaxArena, SyntaxBuilder};

pub mod config;

pub mod tracing_config;
pub use tracing_config::init_tracing;
