//! Subsumption over a small class hierarchy: `Dog` and `Cat` derive from `Animal`.

use csz_binder::{
    Binder, BoundSwitch, Collaborators, DagCase, DagContext, DecisionDag, DecisionDagBuilder, StandardDagBuilder,
};
use csz_common::DiagnosticBag;
use csz_common::diagnostics::diagnostic_codes;
use csz_symbols::{Compilation, CompilationBuilder, ScopeId, TypeId};
use csz_syntax::{NodeIndex, PredefinedType, SyntaxBuilder};
use std::sync::atomic::{AtomicUsize, Ordering};

/// A block declaring `Animal pet` and `bool ready`.
fn zoo() -> (Compilation, ScopeId) {
    let mut builder = CompilationBuilder::new();
    builder.with_core_library();
    let ns = builder.namespace("Zoo");
    let animal = builder.add_class(ns, "Animal");
    let animal_ty = builder.declared_type(animal);
    for name in ["Dog", "Cat"] {
        let derived = builder.add_class(ns, name);
        builder.set_base(derived, animal_ty);
    }
    let global = builder.global_scope();
    let ns_scope = builder.namespace_scope(global, ns);
    let block = builder.block_scope(ns_scope);
    builder.add_local(block, "pet", animal_ty);
    builder.add_local(block, "ready", TypeId::BOOL);
    (builder.build(), block)
}

fn bind_switch_with(
    compilation: &Compilation,
    scope: ScopeId,
    collaborators: Collaborators<'_>,
    build: impl FnOnce(&mut SyntaxBuilder<'_>) -> Vec<NodeIndex>,
) -> (BoundSwitch, DiagnosticBag) {
    let mut syntax = SyntaxBuilder::new(compilation.interner());
    let input = syntax.ident("pet");
    let sections = build(&mut syntax);
    let root = syntax.switch(input, sections);
    let arena = syntax.finish();
    let mut binder = Binder::new(compilation, &arena, scope).with_collaborators(collaborators);
    let mut diag = DiagnosticBag::new();
    let bound = binder.bind_switch(root, &mut diag);
    (bound, diag)
}

fn bind_switch(
    compilation: &Compilation,
    scope: ScopeId,
    build: impl FnOnce(&mut SyntaxBuilder<'_>) -> Vec<NodeIndex>,
) -> (BoundSwitch, DiagnosticBag) {
    bind_switch_with(compilation, scope, Collaborators::standard(), build)
}

/// `case Type name:` (or `case Type:` without a name) with one statement.
fn type_case(s: &mut SyntaxBuilder<'_>, ty: &str, name: Option<&str>) -> NodeIndex {
    let ty = s.ident(ty);
    let pattern = match name {
        Some(name) => s.declaration_pattern(ty, name),
        None => s.type_pattern(ty),
    };
    let label = s.case_label(pattern);
    let statement = s.statement();
    s.section(vec![label], vec![statement])
}

fn reachability(switch: &BoundSwitch) -> Vec<bool> {
    switch.labels().map(|label| label.is_reachable).collect()
}

fn break_reachable(switch: &BoundSwitch) -> bool {
    switch.decision_dag.reachable_labels().contains(switch.break_label.0 as usize)
}

#[test]
fn test_base_type_case_subsumes_derived() {
    let (compilation, scope) = zoo();
    let (switch, diag) = bind_switch(&compilation, scope, |s| {
        vec![type_case(s, "Animal", Some("a")), type_case(s, "Dog", Some("d"))]
    });
    assert_eq!(diag.codes(), vec![diagnostic_codes::SWITCH_CASE_SUBSUMED]);
    assert_eq!(reachability(&switch), vec![true, false]);
    // Only null falls through.
    assert!(break_reachable(&switch));
}

#[test]
fn test_derived_type_case_first_leaves_base_reachable() {
    let (compilation, scope) = zoo();
    let (switch, diag) = bind_switch(&compilation, scope, |s| {
        vec![
            type_case(s, "Dog", Some("d")),
            type_case(s, "Cat", None),
            type_case(s, "Animal", Some("a")),
        ]
    });
    assert!(diag.is_empty(), "unexpected diagnostics: {:?}", diag.codes());
    assert_eq!(reachability(&switch), vec![true, true, true]);
    assert_eq!(switch.pattern_variables.len(), 2);
}

#[test]
fn test_guarded_case_does_not_subsume() {
    let (compilation, scope) = zoo();
    let (switch, diag) = bind_switch(&compilation, scope, |s| {
        let dog = s.ident("Dog");
        let pattern = s.declaration_pattern(dog, "d");
        let ready = s.ident("ready");
        let guarded = s.case_label_when(pattern, ready);
        let first = s.section(vec![guarded], Vec::new());
        vec![first, type_case(s, "Dog", None)]
    });
    assert!(diag.is_empty(), "unexpected diagnostics: {:?}", diag.codes());
    assert_eq!(reachability(&switch), vec![true, true]);
}

#[test]
fn test_var_pattern_catches_everything_after_null() {
    let (compilation, scope) = zoo();
    let (switch, diag) = bind_switch(&compilation, scope, |s| {
        let null = s.null();
        let null = s.constant_pattern(null);
        let null = s.case_label(null);
        let null = s.section(vec![null], Vec::new());
        let dog = type_case(s, "Dog", None);
        let any = s.var_pattern("any");
        let any = s.case_label(any);
        let any = s.section(vec![any], Vec::new());
        let cat = type_case(s, "Cat", None);
        vec![null, dog, any, cat]
    });
    assert_eq!(diag.codes(), vec![diagnostic_codes::SWITCH_CASE_SUBSUMED]);
    assert_eq!(reachability(&switch), vec![true, true, true, false]);
    assert!(!break_reachable(&switch));
}

#[test]
fn test_impossible_type_is_reported_instead_of_subsumption() {
    let (compilation, scope) = zoo();
    let (switch, diag) = bind_switch(&compilation, scope, |s| {
        let int = s.predefined(PredefinedType::Int);
        let pattern = s.type_pattern(int);
        let label = s.case_label(pattern);
        let first = s.section(vec![label], Vec::new());
        vec![first, type_case(s, "Dog", None)]
    });
    assert_eq!(diag.codes(), vec![diagnostic_codes::PATTERN_WRONG_TYPE]);
    assert!(switch.has_errors());
    assert!(switch.labels().nth(1).is_some_and(|label| label.is_reachable));
}

/// Delegates to the standard builder and records how many cases it was given.
#[derive(Default)]
struct CountingDagBuilder {
    cases: AtomicUsize,
}

impl DecisionDagBuilder for CountingDagBuilder {
    fn build(&self, ctx: &DagContext<'_>, cases: &[DagCase<'_>]) -> DecisionDag {
        self.cases.store(cases.len(), Ordering::Relaxed);
        StandardDagBuilder.build(ctx, cases)
    }
}

#[test]
fn test_dag_builder_is_a_replaceable_collaborator() {
    let (compilation, scope) = zoo();
    let counting = CountingDagBuilder::default();
    let collaborators = Collaborators {
        dag_builder: &counting,
        ..Collaborators::standard()
    };
    let (switch, diag) = bind_switch_with(&compilation, scope, collaborators, |s| {
        let missing = type_case(s, "Snake", None);
        let dog = type_case(s, "Dog", None);
        let default = s.default_label();
        let default = s.section(vec![default], Vec::new());
        vec![missing, dog, default]
    });
    assert_eq!(diag.codes(), vec![diagnostic_codes::TYPE_OR_NAMESPACE_NOT_FOUND]);
    // The erroneous `Snake` label and `default:` never reach the builder.
    assert_eq!(counting.cases.load(Ordering::Relaxed), 1);
    assert_eq!(switch.default_label.map(|label| label.0), Some(2));
    assert_eq!(reachability(&switch), vec![false, true, true]);
}
