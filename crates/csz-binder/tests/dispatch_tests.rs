use super::*;
use crate::options::BinderOptions;
use csz_common::Span;
use csz_common::limits::MAX_EXPR_BIND_DEPTH;
use csz_symbols::{Compilation, CompilationBuilder, ScopeId};
use csz_syntax::{PredefinedType, SyntaxBuilder};

/// Blocks with `int* p` and `int*[] table`; the second block is unsafe.
fn pointer_blocks() -> (Compilation, ScopeId, ScopeId) {
    let mut builder = CompilationBuilder::new();
    builder.with_core_library();
    let pointer = builder.pointer_type(TypeId::INT);
    let table = builder.array_type(pointer, 1);
    let global = builder.global_scope();
    let safe = builder.block_scope(global);
    let unsafe_block = builder.block_scope(global);
    builder.set_unsafe(unsafe_block);
    for scope in [safe, unsafe_block] {
        builder.add_local(scope, "p", pointer);
        builder.add_local(scope, "table", table);
    }
    (builder.build(), safe, unsafe_block)
}

fn core() -> Compilation {
    let mut builder = CompilationBuilder::new();
    builder.with_core_library();
    builder.build()
}

fn bind_in(
    compilation: &Compilation,
    scope: ScopeId,
    options: BinderOptions,
    build: impl FnOnce(&mut SyntaxBuilder<'_>) -> NodeIndex,
) -> (BoundNode, DiagnosticBag) {
    let mut syntax = SyntaxBuilder::new(compilation.interner());
    let root = build(&mut syntax);
    let arena = syntax.finish();
    let mut binder = Binder::new(compilation, &arena, scope).with_options(options);
    let mut diag = DiagnosticBag::new();
    let bound = binder.bind_expression(root, &mut diag);
    assert_eq!(binder.depth, 0, "depth must unwind");
    (bound, diag)
}

fn bind(compilation: &Compilation, build: impl FnOnce(&mut SyntaxBuilder<'_>) -> NodeIndex) -> (BoundNode, DiagnosticBag) {
    bind_in(compilation, compilation.global_scope(), BinderOptions::default(), build)
}

fn nested_parens(s: &mut SyntaxBuilder<'_>, depth: usize) -> NodeIndex {
    let mut node = s.int(7);
    for _ in 0..depth {
        node = s.paren(node);
    }
    node
}

#[test]
fn test_depth_limit_reports_once() {
    let compilation = core();
    let options = BinderOptions {
        max_expression_depth: 3,
        ..BinderOptions::default()
    };
    let (bound, diag) = bind_in(&compilation, compilation.global_scope(), options.clone(), |s| nested_parens(s, 4));
    assert_eq!(diag.codes(), vec![diagnostic_codes::EXPRESSION_TOO_COMPLEX]);
    assert!(bound.has_errors);

    let (bound, diag) = bind_in(&compilation, compilation.global_scope(), options, |s| nested_parens(s, 2));
    assert!(diag.is_empty());
    assert_eq!(bound.constant, Some(csz_symbols::ConstantValue::Integral(7)));
}

#[test]
fn test_default_depth_limit_on_deep_nesting() {
    let compilation = core();
    let (bound, diag) = bind(&compilation, |s| nested_parens(s, MAX_EXPR_BIND_DEPTH as usize + 100));
    assert_eq!(diag.codes(), vec![diagnostic_codes::EXPRESSION_TOO_COMPLEX]);
    assert!(bound.has_errors);
}

#[test]
fn test_parenthesized_takes_outer_span() {
    let compilation = core();
    let mut outer = Span::DUMMY;
    let (bound, diag) = bind(&compilation, |s| {
        let one = s.int(1);
        let node = s.paren(one);
        outer = s.arena().span(node);
        node
    });
    assert!(diag.is_empty());
    assert_eq!(bound.span, outer);
    assert!(matches!(bound.kind, BoundKind::Literal));
}

#[test]
fn test_pointer_values_need_unsafe_context() {
    let (compilation, safe, unsafe_block) = pointer_blocks();

    let (bound, diag) = bind_in(&compilation, safe, BinderOptions::default(), |s| s.ident("p"));
    assert_eq!(diag.codes(), vec![diagnostic_codes::UNSAFE_NEEDED]);
    assert!(bound.has_errors);

    let (_, diag) = bind_in(&compilation, safe, BinderOptions::default(), |s| s.ident("table"));
    assert_eq!(diag.codes(), vec![diagnostic_codes::UNSAFE_NEEDED]);

    let (bound, diag) = bind_in(&compilation, unsafe_block, BinderOptions::default(), |s| s.ident("p"));
    assert!(diag.is_empty());
    assert!(!bound.has_errors);

    let options = BinderOptions {
        allow_unsafe: true,
        ..BinderOptions::default()
    };
    let (_, diag) = bind_in(&compilation, safe, options, |s| s.ident("p"));
    assert!(diag.is_empty());
}

#[test]
fn test_unsafe_is_reported_at_the_innermost_node() {
    let (compilation, safe, _) = pointer_blocks();
    let mut inner = Span::DUMMY;
    let (_, diag) = bind_in(&compilation, safe, BinderOptions::default(), |s| {
        let p = s.ident("p");
        inner = s.arena().span(p);
        s.paren(p)
    });
    assert_eq!(diag.codes(), vec![diagnostic_codes::UNSAFE_NEEDED]);
    assert_eq!(diag.iter().next().map(|d| d.span), Some(inner));
}

#[test]
fn test_array_initializer_outside_creation() {
    let compilation = core();
    let (bound, diag) = bind(&compilation, |s| {
        let one = s.int(1);
        let missing = s.ident("missing");
        s.array_init(vec![one, missing])
    });
    assert_eq!(
        diag.codes(),
        vec![diagnostic_codes::ARRAY_INIT_IN_BAD_PLACE, diagnostic_codes::NAME_NOT_IN_CONTEXT]
    );
    assert!(bound.is_bad());
    assert_eq!(bound.ty, Some(TypeId::ERROR));
}

#[test]
fn test_types_and_namespaces_are_not_values() {
    let compilation = core();
    let (bound, diag) = bind(&compilation, |s| s.predefined(PredefinedType::Int));
    assert_eq!(diag.codes(), vec![diagnostic_codes::BAD_SYMBOL_KIND_CONTEXT]);
    assert_eq!(bound.result_kind(), Some(LookupResultKind::NotAValue));

    let (bound, diag) = bind(&compilation, |s| s.ident("System"));
    assert_eq!(diag.codes(), vec![diagnostic_codes::BAD_SYMBOL_KIND]);
    assert!(bound.is_bad());
}

#[test]
fn test_arglist_only_in_argument_position() {
    let compilation = core();
    let mut syntax = SyntaxBuilder::new(compilation.interner());
    let one = syntax.int(1);
    let arglist = syntax.arglist(vec![one]);
    let arena = syntax.finish();
    let mut binder = Binder::new(&compilation, &arena, compilation.global_scope());

    let mut diag = DiagnosticBag::new();
    let allowed = binder.bind_allowing_arglist(arglist, &mut diag);
    assert!(diag.is_empty());
    assert!(matches!(allowed.kind, BoundKind::ArgList { .. }));

    let rejected = binder.bind(arglist, &mut diag, false, false);
    assert_eq!(diag.codes(), vec![diagnostic_codes::ILLEGAL_ARGLIST]);
    assert!(rejected.is_bad());
}

#[test]
fn test_missing_node_is_silent() {
    let compilation = core();
    let (bound, diag) = bind(&compilation, |s| s.missing());
    assert!(diag.is_empty());
    assert!(bound.has_errors);
}

#[cfg(debug_assertions)]
#[test]
#[should_panic(expected = "unexpected syntax kind")]
fn test_unsupported_syntax_asserts_in_debug_builds() {
    let compilation = core();
    bind(&compilation, |s| s.unsupported("query expression"));
}
