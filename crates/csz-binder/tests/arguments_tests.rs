use super::*;
use csz_symbols::{Compilation, CompilationBuilder, ScopeId};
use csz_syntax::SyntaxBuilder;

fn literal(ty: TypeId) -> BoundNode {
    BoundNode::new(BoundKind::Literal, ty, Span::new(0, 1))
}

/// A block with `int n`, `string text` and `dynamic late` in scope.
fn block() -> (Compilation, ScopeId) {
    let mut builder = CompilationBuilder::new();
    builder.with_core_library();
    let global = builder.global_scope();
    let block = builder.block_scope(global);
    builder.add_local(block, "n", TypeId::INT);
    builder.add_local(block, "text", TypeId::STRING);
    builder.add_local(block, "late", TypeId::DYNAMIC);
    (builder.build(), block)
}

fn bind_arguments(
    compilation: &Compilation,
    scope: ScopeId,
    build: impl FnOnce(&mut SyntaxBuilder<'_>) -> Vec<NodeIndex>,
) -> (AnalyzedArguments, DiagnosticBag) {
    let mut syntax = SyntaxBuilder::new(compilation.interner());
    let nodes = build(&mut syntax);
    let arena = syntax.finish();
    let mut binder = Binder::new(compilation, &arena, scope);
    let mut diag = DiagnosticBag::new();
    let mut arguments = AnalyzedArguments::new();
    binder.bind_argument_list(&nodes, &mut arguments, &mut diag);
    (arguments, diag)
}

#[test]
fn test_positional_arguments_allocate_no_side_vectors() {
    let mut args = AnalyzedArguments::new();
    args.push(literal(TypeId::INT));
    args.push(literal(TypeId::STRING));
    assert_eq!(args.len(), 2);
    assert!(!args.has_names());
    assert!(args.ref_kinds().is_none());
    assert_eq!(args.ref_kind(1), RefKind::None);
    assert_eq!(args.name(0), None);
}

#[test]
fn test_side_vectors_are_backfilled_on_first_use() {
    let interner = csz_common::Interner::new();
    let name = interner.intern("count");
    let mut args = AnalyzedArguments::new();
    args.push(literal(TypeId::INT));
    args.add(literal(TypeId::INT), None, RefKind::Ref);
    args.add(literal(TypeId::INT), Some((name, Span::new(4, 9))), RefKind::None);

    assert_eq!(args.ref_kinds(), Some(&[RefKind::None, RefKind::Ref, RefKind::None][..]));
    let names = args.names().expect("names allocated");
    assert_eq!(names.len(), 3);
    assert!(names[0].is_none() && names[1].is_none());
    assert_eq!(args.name(2).map(|(atom, _)| atom), Some(name));
}

#[test]
fn test_erroneous_positional_after_named_is_kept() {
    let interner = csz_common::Interner::new();
    let name = interner.intern("count");
    let mut args = AnalyzedArguments::new();
    args.add(literal(TypeId::INT), Some((name, Span::new(0, 5))), RefKind::None);
    args.push(literal(TypeId::INT).with_errors());

    assert!(args.has_errors);
    assert_eq!(args.names().map(<[_]>::len), Some(2));
    assert_eq!(args.name(1), None);
}

#[test]
#[cfg(debug_assertions)]
#[should_panic(expected = "follows a named argument")]
fn test_unreported_positional_after_named_is_rejected() {
    let interner = csz_common::Interner::new();
    let name = interner.intern("count");
    let mut args = AnalyzedArguments::new();
    args.add(literal(TypeId::INT), Some((name, Span::new(0, 5))), RefKind::None);
    args.push(literal(TypeId::INT));
}

#[test]
fn test_insert_receiver_shifts_everything() {
    let interner = csz_common::Interner::new();
    let name = interner.intern("x");
    let mut args = AnalyzedArguments::new();
    args.add(literal(TypeId::INT), Some((name, Span::new(0, 1))), RefKind::Out);
    args.insert_receiver(literal(TypeId::STRING).with_errors());

    assert!(args.is_extension_invocation);
    assert!(args.has_errors);
    assert_eq!(args.arguments[0].ty, Some(TypeId::STRING));
    assert_eq!(args.name(0), None);
    assert_eq!(args.ref_kind(0), RefKind::None);
    assert_eq!(args.ref_kind(1), RefKind::Out);
    assert!(args.name(1).is_some());
}

#[test]
fn test_dynamic_argument_is_flagged() {
    let mut args = AnalyzedArguments::new();
    args.push(literal(TypeId::DYNAMIC));
    assert!(args.has_dynamic_argument);
    assert_eq!(args.take_arguments().len(), 1);
    assert!(args.is_empty());
}

#[test]
fn test_pool_reuses_returned_builders() {
    let pool = Rc::new(ArgumentPool::new());
    {
        let mut args = pool.acquire();
        args.push(literal(TypeId::INT));
        args.add(literal(TypeId::INT), None, RefKind::Ref);
    }
    assert_eq!(pool.available(), 1);
    {
        let args = pool.acquire();
        assert!(args.is_empty(), "a recycled builder starts empty");
        assert!(args.ref_kinds().is_none());
    }
    let stats = pool.stats();
    assert_eq!(stats.acquired, 2);
    assert_eq!(stats.created, 1);
    assert_eq!(stats.returned, 2);
    assert_eq!(stats.ref_kind_slot_allocations, 1);
    assert_eq!(stats.name_slot_allocations, 0);
}

#[test]
fn test_pool_keeps_at_most_its_capacity() {
    let pool = Rc::new(ArgumentPool::new());
    let loans: Vec<_> = (0..ARGUMENT_POOL_CAPACITY + 4).map(|_| pool.acquire()).collect();
    assert_eq!(pool.available(), 0);
    drop(loans);
    assert_eq!(pool.available(), ARGUMENT_POOL_CAPACITY);
    assert_eq!(pool.stats().returned, (ARGUMENT_POOL_CAPACITY + 4) as u64);
}

#[test]
fn test_duplicate_name_is_reported_once() {
    let (compilation, scope) = block();
    let (args, diag) = bind_arguments(&compilation, scope, |s| {
        (1..=3)
            .map(|v| {
                let value = s.int(v);
                s.named_arg("a", value)
            })
            .collect()
    });
    assert_eq!(diag.codes(), vec![diagnostic_codes::DUPLICATE_NAMED_ARGUMENT]);
    let errors: Vec<bool> = args.arguments.iter().map(|a| a.has_errors).collect();
    assert_eq!(errors, vec![false, true, true]);
}

#[test]
fn test_positional_after_named_is_reported_once() {
    let (compilation, scope) = block();
    let (args, diag) = bind_arguments(&compilation, scope, |s| {
        let one = s.int(1);
        let named = s.named_arg("a", one);
        let two = s.int(2);
        let three = s.int(3);
        vec![named, two, three]
    });
    assert_eq!(diag.codes(), vec![diagnostic_codes::NAMED_ARGUMENT_BEFORE_POSITIONAL]);
    assert!(args.arguments[1].has_errors && args.arguments[2].has_errors);
    assert!(!args.arguments[0].has_errors);
}

#[test]
fn test_ref_argument_must_be_a_variable() {
    let (compilation, scope) = block();
    let (args, diag) = bind_arguments(&compilation, scope, |s| {
        let n = s.ident("n");
        let by_ref = s.ref_arg(n);
        let one = s.int(1);
        let literal = s.out_arg(one);
        let text = s.ident("text");
        let length = s.member(text, "Length");
        let property = s.ref_arg(length);
        vec![by_ref, literal, property]
    });
    assert_eq!(
        diag.codes(),
        vec![diagnostic_codes::REF_LVALUE_EXPECTED, diagnostic_codes::REF_PROPERTY]
    );
    assert_eq!(args.ref_kind(0), RefKind::Ref);
    assert_eq!(args.ref_kind(1), RefKind::Out);
    assert!(!args.arguments[0].has_errors);
    assert!(args.arguments[1].has_errors);
}

#[test]
fn test_bound_arguments_carry_names_and_dynamic_flag() {
    let (compilation, scope) = block();
    let (args, diag) = bind_arguments(&compilation, scope, |s| {
        let late = s.ident("late");
        let late = s.arg(late);
        let n = s.ident("n");
        let named = s.named_arg("count", n);
        vec![late, named]
    });
    assert!(diag.is_empty());
    assert!(args.has_dynamic_argument);
    let count = compilation.interner().intern("count");
    assert_eq!(args.name(1).map(|(atom, _)| atom), Some(count));
    assert_eq!(args.arguments[1].ty, Some(TypeId::INT));
}
