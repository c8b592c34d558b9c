//! One shared `Compilation`, many threads binding against the same scope chain.
//!
//! Each bind owns its syntax arena, binder and diagnostic bag; the scope chain
//! and the type interner are shared. Results must not depend on scheduling.

use csz_binder::{Binder, BoundNode};
use csz_common::DiagnosticBag;
use csz_common::diagnostics::{Diagnostic, diagnostic_codes};
use csz_symbols::{Compilation, CompilationBuilder, Parameter, ScopeId, TypeId};
use csz_syntax::{NodeIndex, SyntaxBuilder};
use rayon::prelude::*;

/// A block in `App.Host.Main` importing two namespaces that both declare `Widget`.
fn shared() -> (Compilation, ScopeId) {
    let mut builder = CompilationBuilder::new();
    builder.with_core_library();
    let left = builder.namespace("Vendor.Left");
    let right = builder.namespace("Vendor.Right");
    builder.add_class(left, "Widget");
    builder.add_class(right, "Widget");

    let app = builder.namespace("App");
    let host = builder.add_class(app, "Host");
    for ty in [TypeId::INT, TypeId::LONG] {
        let value = Parameter::new(builder.interner().intern("value"), ty);
        builder.add_static_method(host, "Format", vec![value], TypeId::STRING);
    }
    let main = builder.add_static_method(host, "Main", Vec::new(), TypeId::VOID);

    let global = builder.global_scope();
    let ns_scope = builder.namespace_scope(global, app);
    let type_scope = builder.type_scope(ns_scope, host);
    let member_scope = builder.member_scope(type_scope, main);
    let block = builder.block_scope(member_scope);
    builder.add_using(block, right);
    builder.add_using(block, left);
    builder.add_local(block, "code", TypeId::INT);
    (builder.build(), block)
}

#[derive(Debug, PartialEq)]
struct Outcome {
    kind: &'static str,
    ty: Option<TypeId>,
    has_errors: bool,
    diagnostics: Vec<Diagnostic>,
}

fn bind(
    compilation: &Compilation,
    scope: ScopeId,
    build: impl FnOnce(&mut SyntaxBuilder<'_>) -> NodeIndex,
) -> Outcome {
    let mut syntax = SyntaxBuilder::new(compilation.interner());
    let root = build(&mut syntax);
    let arena = syntax.finish();
    let mut binder = Binder::new(compilation, &arena, scope);
    let mut diag = DiagnosticBag::new();
    let bound: BoundNode = binder.bind_expression(root, &mut diag);
    Outcome {
        kind: bound.kind_name(),
        ty: bound.ty,
        has_errors: bound.has_errors,
        diagnostics: diag.into_vec(),
    }
}

fn ambiguous_creation(s: &mut SyntaxBuilder<'_>) -> NodeIndex {
    let ty = s.ident("Widget");
    s.new_object(ty, Some(Vec::new()), None)
}

fn format_call(s: &mut SyntaxBuilder<'_>, value: u64) -> NodeIndex {
    let target = s.ident("Format");
    let value = s.int(value);
    s.call(target, vec![value])
}

#[test]
fn test_ambiguity_is_reported_identically_on_every_thread() {
    let (compilation, scope) = shared();
    let outcomes: Vec<Outcome> = (0..64)
        .into_par_iter()
        .map(|_| bind(&compilation, scope, ambiguous_creation))
        .collect();

    let first = &outcomes[0];
    assert!(first.has_errors);
    let codes: Vec<u32> = first.diagnostics.iter().map(|d| d.code).collect();
    assert_eq!(codes, vec![diagnostic_codes::AMBIGUOUS_REFERENCE]);
    // Candidates are listed in a stable order, whatever the import order.
    assert_eq!(first.diagnostics[0].args[1], "Vendor.Left.Widget");
    assert!(outcomes.iter().all(|outcome| outcome == first));
}

#[test]
fn test_interleaved_binds_do_not_share_state() {
    let (compilation, scope) = shared();
    let outcomes: Vec<(usize, Outcome)> = (0..128usize)
        .into_par_iter()
        .map(|i| {
            let outcome = match i % 3 {
                0 => bind(&compilation, scope, |s| format_call(s, 7)),
                1 => bind(&compilation, scope, |s| format_call(s, 3_000_000_000)),
                _ => bind(&compilation, scope, ambiguous_creation),
            };
            (i, outcome)
        })
        .collect();

    for (i, outcome) in &outcomes {
        match i % 3 {
            0 | 1 => {
                assert!(outcome.diagnostics.is_empty(), "call {i}: {:?}", outcome.diagnostics);
                assert_eq!(outcome.kind, "Call");
                assert_eq!(outcome.ty, Some(TypeId::STRING));
            }
            _ => {
                assert!(outcome.has_errors);
                assert_eq!(outcome.diagnostics.len(), 1);
            }
        }
    }

    let sequential = bind(&compilation, scope, ambiguous_creation);
    assert!(outcomes.iter().filter(|(i, _)| i % 3 == 2).all(|(_, outcome)| *outcome == sequential));
}

#[test]
fn test_switches_bind_in_parallel() {
    let (compilation, scope) = shared();
    let reachability: Vec<(Vec<bool>, Vec<u32>)> = (0..32)
        .into_par_iter()
        .map(|_| {
            let mut syntax = SyntaxBuilder::new(compilation.interner());
            let input = syntax.ident("code");
            let sections = [1, 2, 1]
                .into_iter()
                .map(|value| {
                    let value = syntax.int(value);
                    let pattern = syntax.constant_pattern(value);
                    let label = syntax.case_label(pattern);
                    let statement = syntax.statement();
                    syntax.section(vec![label], vec![statement])
                })
                .collect();
            let root = syntax.switch(input, sections);
            let arena = syntax.finish();
            let mut binder = Binder::new(&compilation, &arena, scope);
            let mut diag = DiagnosticBag::new();
            let switch = binder.bind_switch(root, &mut diag);
            (switch.labels().map(|label| label.is_reachable).collect(), diag.codes())
        })
        .collect();

    for (labels, codes) in &reachability {
        assert_eq!(labels, &vec![true, true, false]);
        assert_eq!(codes, &vec![diagnostic_codes::SWITCH_CASE_SUBSUMED]);
    }
}
