use super::*;
use csz_symbols::{Accessibility, CompilationBuilder, Origin, Parameter, ScopeId};
use csz_syntax::{SyntaxArena, SyntaxBuilder};

fn core() -> CompilationBuilder {
    let mut builder = CompilationBuilder::new();
    builder.with_core_library();
    builder
}

fn empty_syntax(compilation: &Compilation) -> SyntaxArena {
    SyntaxBuilder::new(compilation.interner()).finish()
}

fn span() -> Span {
    Span::new(10, 14)
}

fn lookup(compilation: &Compilation, scope: ScopeId, name: &str, arity: usize, options: LookupOptions) -> LookupResult {
    let arena = empty_syntax(compilation);
    let binder = Binder::new(compilation, &arena, scope);
    let name = compilation.interner().intern(name);
    binder.lookup_simple_name(name, arity, options, span())
}

fn error_code(result: &LookupResult) -> Option<u32> {
    result.error.as_ref().map(|e| e.code)
}

#[test]
fn test_merge_equal_keeps_the_better_kind() {
    let mut result = LookupResult::not_viable(LookupResultKind::Inaccessible, SymbolId(1), None);
    result.merge_equal(LookupResult::good(SymbolId(2)));
    assert!(result.is_viable());
    assert_eq!(result.single_symbol(), Some(SymbolId(2)));

    result.merge_equal(LookupResult::not_viable(LookupResultKind::WrongArity, SymbolId(3), None));
    assert_eq!(result.single_symbol(), Some(SymbolId(2)));

    result.merge_equal(LookupResult::good(SymbolId(4)));
    result.merge_equal(LookupResult::good(SymbolId(2)));
    assert_eq!(result.symbols.as_slice(), &[SymbolId(2), SymbolId(4)]);
    assert_eq!(result.single_symbol(), None);
}

#[test]
fn test_merge_prioritized_only_takes_strictly_better() {
    let mut result = LookupResult::empty();
    result.merge_prioritized(LookupResult::not_viable(LookupResultKind::Inaccessible, SymbolId(1), None));
    assert_eq!(result.kind, LookupResultKind::Inaccessible);
    result.merge_prioritized(LookupResult::not_viable(LookupResultKind::WrongArity, SymbolId(2), None));
    result.merge_prioritized(LookupResult::not_viable(LookupResultKind::Inaccessible, SymbolId(3), None));
    assert_eq!(result.symbols.as_slice(), &[SymbolId(1)]);
    assert!(LookupResult::default().is_empty());
}

#[test]
fn test_local_shadows_field_of_enclosing_type() {
    let mut builder = core();
    let ns = builder.namespace("App");
    let class = builder.add_class(ns, "C");
    builder.add_field(class, "x", TypeId::STRING);
    let method = builder.add_method(class, "M", Vec::new(), TypeId::VOID);
    let global = builder.global_scope();
    let ns_scope = builder.namespace_scope(global, ns);
    let type_scope = builder.type_scope(ns_scope, class);
    let member_scope = builder.member_scope(type_scope, method);
    let block = builder.block_scope(member_scope);
    let local = builder.add_local(block, "x", TypeId::INT);
    let compilation = builder.build();

    let result = lookup(&compilation, block, "x", 0, LookupOptions::empty());
    assert!(result.is_viable());
    assert_eq!(result.single_symbol(), Some(local));

    let result = lookup(&compilation, member_scope, "x", 0, LookupOptions::empty());
    assert!(result.single_symbol().is_some_and(|s| compilation.symbol(s).is_member()));
}

#[test]
fn test_type_parameters_are_found_in_type_scope() {
    let mut builder = core();
    let ns = builder.namespace("App");
    let class = builder.add_class(ns, "Box");
    let parameters = builder.add_type_parameters(class, &["T"]);
    let global = builder.global_scope();
    let type_scope = builder.type_scope(global, class);
    let compilation = builder.build();

    let result = lookup(&compilation, type_scope, "T", 0, LookupOptions::NAMESPACES_OR_TYPES_ONLY);
    assert_eq!(result.single_symbol(), Some(parameters[0]));
}

#[test]
fn test_wrong_arity_is_not_viable() {
    let mut builder = core();
    let ns = builder.namespace("App");
    let list = builder.add_class(ns, "List");
    builder.add_type_parameters(list, &["T"]);
    builder.add_class(ns, "Plain");
    let global = builder.global_scope();
    let scope = builder.namespace_scope(global, ns);
    let compilation = builder.build();

    let bare = lookup(&compilation, scope, "List", 0, LookupOptions::NAMESPACES_OR_TYPES_ONLY);
    assert_eq!(bare.kind, LookupResultKind::WrongArity);
    assert_eq!(error_code(&bare), Some(diagnostic_codes::BAD_ARITY));

    let generic = lookup(&compilation, scope, "List", 1, LookupOptions::NAMESPACES_OR_TYPES_ONLY);
    assert_eq!(generic.single_symbol(), Some(list));

    let plain = lookup(&compilation, scope, "Plain", 2, LookupOptions::NAMESPACES_OR_TYPES_ONLY);
    assert_eq!(error_code(&plain), Some(diagnostic_codes::NON_GENERIC_WITH_TYPE_ARGS));
}

#[test]
fn test_value_where_type_expected() {
    let mut builder = core();
    let global = builder.global_scope();
    let block = builder.block_scope(global);
    builder.add_local(block, "count", TypeId::INT);
    let compilation = builder.build();

    let result = lookup(&compilation, block, "count", 0, LookupOptions::NAMESPACES_OR_TYPES_ONLY);
    assert_eq!(result.kind, LookupResultKind::NotATypeOrNamespace);
    assert_eq!(error_code(&result), Some(diagnostic_codes::BAD_SYMBOL_KIND));
}

#[test]
fn test_non_delegate_field_is_not_invocable() {
    let mut builder = core();
    let ns = builder.namespace("App");
    let class = builder.add_class(ns, "C");
    builder.add_field(class, "count", TypeId::INT);
    builder.add_field(class, "late", TypeId::DYNAMIC);
    let global = builder.global_scope();
    let type_scope = builder.type_scope(global, class);
    let compilation = builder.build();

    let result = lookup(&compilation, type_scope, "count", 0, LookupOptions::MUST_BE_INVOCABLE);
    assert_eq!(result.kind, LookupResultKind::NotInvocable);
    assert_eq!(error_code(&result), Some(diagnostic_codes::NON_INVOCABLE_MEMBER));

    let dynamic = lookup(&compilation, type_scope, "late", 0, LookupOptions::MUST_BE_INVOCABLE);
    assert!(dynamic.is_viable());
}

#[test]
fn test_private_member_is_inaccessible_from_outside() {
    let mut builder = core();
    let ns = builder.namespace("App");
    let owner = builder.add_class(ns, "Vault");
    let secret = builder.add_field(owner, "secret", TypeId::INT);
    builder.set_accessibility(secret, Accessibility::Private);
    let owner_ty = builder.declared_type(owner);
    let stranger = builder.add_class(ns, "Stranger");
    let global = builder.global_scope();
    let inside = builder.type_scope(global, owner);
    let outside = builder.type_scope(global, stranger);
    let compilation = builder.build();
    let arena = empty_syntax(&compilation);
    let name = compilation.interner().intern("secret");

    let binder = Binder::new(&compilation, &arena, outside);
    let result = binder.lookup_in_type(owner_ty, name, 0, LookupOptions::empty(), span());
    assert_eq!(result.kind, LookupResultKind::Inaccessible);
    assert_eq!(error_code(&result), Some(diagnostic_codes::INACCESSIBLE));

    let ignored = binder.lookup_in_type(owner_ty, name, 0, LookupOptions::IGNORE_ACCESSIBILITY, span());
    assert!(ignored.is_viable());

    let binder = Binder::new(&compilation, &arena, inside);
    let result = binder.lookup_in_type(owner_ty, name, 0, LookupOptions::empty(), span());
    assert_eq!(result.single_symbol(), Some(secret));
}

#[test]
fn test_methods_accumulate_across_the_base_chain() {
    let mut builder = core();
    let ns = builder.namespace("App");
    let value = builder.interner().intern("value");
    let base = builder.add_class(ns, "Base");
    let derived = builder.add_class(ns, "Derived");
    let base_ty = builder.declared_type(base);
    builder.set_base(derived, base_ty);
    let base_run = builder.add_method(base, "Run", vec![Parameter::new(value, TypeId::INT)], TypeId::VOID);
    let derived_run = builder.add_method(derived, "Run", vec![Parameter::new(value, TypeId::STRING)], TypeId::VOID);
    let base_stop = builder.add_method(base, "Stop", Vec::new(), TypeId::VOID);
    let derived_stop = builder.add_method(derived, "Stop", Vec::new(), TypeId::VOID);
    builder.set_overridden(derived_stop, base_stop);
    builder.add_method(base, "Size", Vec::new(), TypeId::INT);
    let size_field = builder.add_field(derived, "Size", TypeId::INT);
    let derived_ty = builder.declared_type(derived);
    let compilation = builder.build();
    let arena = empty_syntax(&compilation);
    let binder = Binder::new(&compilation, &arena, compilation.global_scope());
    let find = |name: &str| {
        let name = compilation.interner().intern(name);
        binder.lookup_in_type(derived_ty, name, 0, LookupOptions::empty(), span())
    };

    assert_eq!(find("Run").symbols.as_slice(), &[derived_run, base_run]);
    assert_eq!(find("Stop").symbols.as_slice(), &[derived_stop]);
    assert_eq!(find("Size").symbols.as_slice(), &[size_field]);
}

#[test]
fn test_labels_only_see_labels() {
    let mut builder = core();
    let global = builder.global_scope();
    let block = builder.block_scope(global);
    let label = builder.add_label(block, "done");
    let compilation = builder.build();

    let result = lookup(&compilation, block, "done", 0, LookupOptions::LABELS_ONLY);
    assert_eq!(result.single_symbol(), Some(label));
    let result = lookup(&compilation, block, "done", 0, LookupOptions::empty());
    assert!(result.is_empty());
}

#[test]
fn test_types_imported_twice_are_ambiguous() {
    let mut builder = core();
    let first = builder.namespace("Vendor.Left");
    let second = builder.namespace("Vendor.Right");
    let right = builder.add_class(second, "Widget");
    let left = builder.add_class(first, "Widget");
    let global = builder.global_scope();
    let block = builder.block_scope(global);
    builder.add_using(block, second);
    builder.add_using(block, first);
    let compilation = builder.build();

    let name = compilation.interner().intern("Widget");
    let result = lookup(&compilation, block, "Widget", 0, LookupOptions::NAMESPACES_OR_TYPES_ONLY);
    assert_eq!(result.symbols.len(), 2);

    let mut candidates = vec![right, left];
    sort_candidates(&compilation, &mut candidates);
    assert_eq!(candidates, vec![left, right]);

    let arena = empty_syntax(&compilation);
    let binder = Binder::new(&compilation, &arena, block);
    let mut diag = DiagnosticBag::new();
    let resolved = binder.resolve_single_symbol(&result, name, span(), &mut diag);
    assert_eq!(diag.codes(), vec![diagnostic_codes::AMBIGUOUS_REFERENCE]);
    let Resolved::Ambiguous { error_type, candidates } = resolved else {
        panic!("expected an ambiguity");
    };
    assert!(compilation.is_error_type(error_type));
    assert_eq!(candidates, vec![left, right]);
}

#[test]
fn test_source_namespace_wins_over_imported_type() {
    let mut builder = core();
    let global_ns = builder.global_namespace();
    builder.set_origin(Origin::Referenced, "Tools.dll");
    let imported = builder.add_class(global_ns, "Tools");
    builder.set_origin(Origin::PrimaryModule, "Program.cs");
    let namespace = builder.namespace("Tools");
    let compilation = builder.build();

    let result = lookup(&compilation, compilation.global_scope(), "Tools", 0, LookupOptions::NAMESPACES_OR_TYPES_ONLY);
    assert_eq!(result.symbols.len(), 2);
    assert!(result.symbols.contains(&imported));

    let arena = empty_syntax(&compilation);
    let binder = Binder::new(&compilation, &arena, compilation.global_scope());
    let mut diag = DiagnosticBag::new();
    let name = compilation.interner().intern("Tools");
    let resolved = binder.resolve_single_symbol(&result, name, span(), &mut diag);
    assert_eq!(resolved, Resolved::Symbol(namespace));
    assert_eq!(diag.codes(), vec![diagnostic_codes::SAME_FULL_NAME_NS_TYPE]);
}

#[test]
fn test_single_symbol_raises_its_unreported_error() {
    let mut builder = core();
    let ns = builder.namespace("App");
    let looped = builder.add_class(ns, "Loop");
    builder.mark_unreported_error(looped, diagnostic_codes::CIRCULAR_BASE, &["App.Loop"]);
    let global = builder.global_scope();
    let scope = builder.namespace_scope(global, ns);
    let compilation = builder.build();

    let result = lookup(&compilation, scope, "Loop", 0, LookupOptions::NAMESPACES_OR_TYPES_ONLY);
    let arena = empty_syntax(&compilation);
    let binder = Binder::new(&compilation, &arena, scope);
    let mut diag = DiagnosticBag::new();
    let name = compilation.interner().intern("Loop");
    assert_eq!(binder.resolve_single_symbol(&result, name, span(), &mut diag), Resolved::Symbol(looped));
    assert_eq!(diag.codes(), vec![diagnostic_codes::CIRCULAR_BASE]);
    assert_eq!(diag.iter().next().map(|d| d.span), Some(span()));
}

#[test]
fn test_report_lookup_failure() {
    let compilation = core().build();
    let arena = empty_syntax(&compilation);
    let binder = Binder::new(&compilation, &arena, compilation.global_scope());
    let name = compilation.interner().intern("nowhere");

    let mut diag = DiagnosticBag::new();
    binder.report_lookup_failure(&LookupResult::empty(), name, span(), &mut diag);
    assert_eq!(diag.codes(), vec![diagnostic_codes::NAME_NOT_IN_CONTEXT]);
    assert!(diag.iter().next().is_some_and(|d| d.message_text.contains("nowhere")));

    let carried = Diagnostic::from_code(diagnostic_codes::INACCESSIBLE, span(), &["App.Vault.secret"]);
    let result = LookupResult::not_viable(LookupResultKind::Inaccessible, SymbolId(1), Some(carried));
    let mut diag = DiagnosticBag::new();
    binder.report_lookup_failure(&result, name, span(), &mut diag);
    assert_eq!(diag.codes(), vec![diagnostic_codes::INACCESSIBLE]);
}
