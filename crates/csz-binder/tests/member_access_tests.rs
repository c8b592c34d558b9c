use super::*;
use crate::options::BinderOptions;
use csz_symbols::{Compilation, CompilationBuilder, ConstantValue, Parameter, ScopeId, SymbolModifiers};
use csz_syntax::SyntaxBuilder;

struct Fixture {
    compilation: Compilation,
    /// Block in instance `App.Painter.Paint` with `Widget w`, `string text`
    /// and `dynamic late`. `Painter` has a property `Color Color`.
    scope: ScopeId,
    count: SymbolId,
    total: SymbolId,
    refresh: SymbolId,
    shout: SymbolId,
    darken: SymbolId,
}

/// `import_extensions` adds `using App.Text;`, which holds the static class
/// with the `Shout(this string)` extension method.
fn fixture(import_extensions: bool) -> Fixture {
    let mut builder = CompilationBuilder::new();
    builder.with_core_library();
    let ns = builder.namespace("App");
    let widget = builder.add_class(ns, "Widget");
    let widget_ty = builder.declared_type(widget);
    let count = builder.add_field(widget, "count", TypeId::INT);
    let total = builder.add_field(widget, "Total", TypeId::INT);
    builder.add_modifiers(total, SymbolModifiers::STATIC);
    let refresh = builder.add_method(widget, "Refresh", Vec::new(), TypeId::VOID);
    builder.add_static_method(widget, "Create", Vec::new(), widget_ty);

    let color = builder.add_struct(ns, "Color");
    let color_ty = builder.declared_type(color);
    let red = builder.add_field(color, "Red", color_ty);
    builder.add_modifiers(red, SymbolModifiers::STATIC | SymbolModifiers::READONLY);
    let darken = builder.add_method(color, "Darken", Vec::new(), color_ty);
    let amount = builder.interner().intern("amount");
    builder.add_static_method(color, "Mix", vec![Parameter::new(amount, TypeId::INT)], color_ty);
    builder.add_method(color, "Mix", Vec::new(), color_ty);

    let text_ns = builder.namespace("App.Text");
    let extensions = builder.add_class(text_ns, "StringExtensions");
    builder.add_modifiers(extensions, SymbolModifiers::STATIC);
    let value = builder.interner().intern("value");
    let shout = builder.add_extension_method(
        extensions,
        "Shout",
        vec![Parameter::new(value, TypeId::STRING)],
        TypeId::STRING,
    );

    let painter = builder.add_class(ns, "Painter");
    builder.add_property(painter, "Color", color_ty, true);
    let paint = builder.add_method(painter, "Paint", Vec::new(), TypeId::VOID);

    let global = builder.global_scope();
    let ns_scope = builder.namespace_scope(global, ns);
    if import_extensions {
        builder.add_using(ns_scope, text_ns);
    }
    let type_scope = builder.type_scope(ns_scope, painter);
    let member = builder.member_scope(type_scope, paint);
    let scope = builder.block_scope(member);
    builder.add_local(scope, "w", widget_ty);
    builder.add_local(scope, "text", TypeId::STRING);
    builder.add_local(scope, "late", TypeId::DYNAMIC);
    Fixture {
        compilation: builder.build(),
        scope,
        count,
        total,
        refresh,
        shout,
        darken,
    }
}

fn bind_with(
    f: &Fixture,
    options: BinderOptions,
    build: impl FnOnce(&mut SyntaxBuilder<'_>) -> NodeIndex,
) -> (BoundNode, DiagnosticBag) {
    let mut syntax = SyntaxBuilder::new(f.compilation.interner());
    let root = build(&mut syntax);
    let arena = syntax.finish();
    let mut binder = Binder::new(&f.compilation, &arena, f.scope).with_options(options);
    let mut diag = DiagnosticBag::new();
    let bound = binder.bind(root, &mut diag, false, false);
    (bound, diag)
}

fn bind(f: &Fixture, build: impl FnOnce(&mut SyntaxBuilder<'_>) -> NodeIndex) -> (BoundNode, DiagnosticBag) {
    bind_with(f, BinderOptions::default(), build)
}

fn member_of(receiver: &str, name: &str) -> impl FnOnce(&mut SyntaxBuilder<'_>) -> NodeIndex {
    let (receiver, name) = (receiver.to_string(), name.to_string());
    move |s: &mut SyntaxBuilder<'_>| {
        let target = s.ident(&receiver);
        s.member(target, &name)
    }
}

fn group(bound: &BoundNode) -> &MethodGroup {
    match &bound.kind {
        BoundKind::MethodGroup(group) => group,
        _ => panic!("expected a method group, got {}", bound.kind_name()),
    }
}

// =============================================================================
// Instance and static access
// =============================================================================

#[test]
fn test_instance_field_through_a_value() {
    let f = fixture(false);
    let (bound, diag) = bind(&f, member_of("w", "count"));
    assert!(diag.is_empty());
    let BoundKind::FieldAccess { receiver, field } = &bound.kind else {
        panic!("expected a field access, got {}", bound.kind_name());
    };
    assert_eq!(*field, f.count);
    assert!(matches!(receiver.as_deref().map(|r| &r.kind), Some(BoundKind::Local { .. })));
    assert_eq!(bound.ty, Some(TypeId::INT));
}

#[test]
fn test_static_member_through_an_instance() {
    let f = fixture(false);
    let (bound, diag) = bind(&f, member_of("w", "Total"));
    assert_eq!(diag.codes(), vec![diagnostic_codes::OBJECT_PROHIBITED]);
    assert_eq!(bound.result_kind(), Some(LookupResultKind::StaticInstanceMismatch));
    assert_eq!(bound.candidates(), &[f.total]);
    assert_eq!(bound.ty, Some(TypeId::INT));
}

#[test]
fn test_instance_member_through_a_type() {
    let f = fixture(false);
    let (bound, diag) = bind(&f, member_of("Widget", "count"));
    assert_eq!(diag.codes(), vec![diagnostic_codes::OBJECT_REQUIRED]);
    assert_eq!(bound.result_kind(), Some(LookupResultKind::StaticInstanceMismatch));
}

#[test]
fn test_static_member_through_a_type() {
    let f = fixture(false);
    let (bound, diag) = bind(&f, member_of("Widget", "Total"));
    assert!(diag.is_empty());
    assert!(matches!(bound.kind, BoundKind::FieldAccess { receiver: None, .. }));

    let (bound, diag) = bind(&f, |s| {
        let int = s.predefined(csz_syntax::PredefinedType::Int);
        s.member(int, "MaxValue")
    });
    assert!(diag.is_empty());
    assert_eq!(bound.constant, Some(ConstantValue::Integral(i32::MAX as i128)));
}

#[test]
fn test_method_groups_remember_where_they_came_from() {
    let f = fixture(false);
    let (bound, diag) = bind(&f, member_of("w", "Refresh"));
    assert!(diag.is_empty());
    let instance = group(&bound);
    assert_eq!(instance.methods, vec![f.refresh]);
    assert!(instance.receiver.is_some());
    assert!(instance.search_extensions);

    let (bound, _) = bind(&f, member_of("Widget", "Create"));
    let on_type = group(&bound);
    assert!(!on_type.search_extensions);
    assert!(matches!(on_type.receiver.as_deref().map(|r| &r.kind), Some(BoundKind::TypeExpression)));
}

#[test]
fn test_missing_members() {
    let f = fixture(false);
    let (bound, diag) = bind(&f, member_of("w", "Nope"));
    assert_eq!(diag.codes(), vec![diagnostic_codes::NO_SUCH_MEMBER_OR_EXTENSION]);
    assert!(bound.is_bad());

    let (_, diag) = bind(&f, member_of("Widget", "Nope"));
    assert_eq!(diag.codes(), vec![diagnostic_codes::NO_SUCH_MEMBER]);
}

#[test]
fn test_query_operator_hint() {
    let f = fixture(false);
    let (_, diag) = bind(&f, member_of("text", "Where"));
    let diagnostic = diag.iter().next().expect("one diagnostic");
    assert_eq!(diagnostic.code, diagnostic_codes::NO_SUCH_MEMBER_OR_EXTENSION);
    assert_eq!(diagnostic.related_information.len(), 1);
    assert!(diagnostic.related_information[0].message_text.contains("System.Linq"));

    let quiet = BinderOptions {
        report_suggestions: false,
        ..BinderOptions::default()
    };
    let (_, diag) = bind_with(&f, quiet, member_of("text", "Where"));
    assert!(diag.iter().all(|d| d.related_information.is_empty()));

    // Ordinary names never get the hint.
    let (_, diag) = bind(&f, member_of("text", "Frobnicate"));
    assert!(diag.iter().all(|d| d.related_information.is_empty()));
}

#[test]
fn test_dynamic_receiver_defers_the_lookup() {
    let f = fixture(false);
    let (bound, diag) = bind(&f, member_of("late", "Anything"));
    assert!(diag.is_empty());
    assert_eq!(bound.ty, Some(TypeId::DYNAMIC));
    assert!(matches!(
        bound.kind,
        BoundKind::Dynamic {
            operation: DynamicOperation::MemberAccess(_),
            ..
        }
    ));
}

#[test]
fn test_receivers_without_members() {
    let f = fixture(false);
    let (bound, diag) = bind(&f, |s| {
        let null = s.null();
        s.member(null, "x")
    });
    assert_eq!(diag.codes(), vec![diagnostic_codes::BAD_UNARY_OP]);
    assert_eq!(diag.iter().next().map(|d| d.args.clone()), Some(vec![".".to_string(), "<null>".to_string()]));
    assert_eq!(bound.result_kind(), Some(LookupResultKind::NotAValue));

    let (_, diag) = bind(&f, |s| {
        let w = s.ident("w");
        let refresh = s.member(w, "Refresh");
        s.member(refresh, "x")
    });
    assert_eq!(diag.iter().next().map(|d| d.args[1].clone()), Some("method group".to_string()));
}

#[test]
fn test_namespace_members() {
    let f = fixture(false);
    let (bound, diag) = bind(&f, member_of("System", "Collections"));
    assert!(diag.is_empty());
    assert!(matches!(bound.kind, BoundKind::NamespaceExpression { .. }));

    let (bound, diag) = bind(&f, member_of("System", "Nope"));
    assert_eq!(diag.codes(), vec![diagnostic_codes::NAMESPACE_MEMBER_NOT_FOUND]);
    assert!(bound.is_bad());
}

// =============================================================================
// Extension methods
// =============================================================================

#[test]
fn test_extension_methods_need_their_namespace_imported() {
    let imported = fixture(true);
    let (bound, diag) = bind(&imported, member_of("text", "Shout"));
    assert!(diag.is_empty());
    let shout = group(&bound);
    assert!(shout.methods.is_empty(), "instance lookup found nothing");
    assert!(shout.search_extensions);

    let missing = fixture(false);
    let (_, diag) = bind(&missing, member_of("text", "Shout"));
    assert_eq!(diag.codes(), vec![diagnostic_codes::NO_SUCH_MEMBER_OR_EXTENSION]);
}

#[test]
fn test_lookup_extension_method_levels_by_name() {
    let f = fixture(true);
    let arena = SyntaxBuilder::new(f.compilation.interner()).finish();
    let binder = Binder::new(&f.compilation, &arena, f.scope);
    let interner = f.compilation.interner();
    let span = Span::new(0, 5);
    assert_eq!(binder.lookup_extension_method_levels(interner.intern("Shout"), 0, span), vec![vec![f.shout]]);
    assert!(binder.lookup_extension_method_levels(interner.intern("Whisper"), 0, span).is_empty());
    // Ordinary static methods are not extension methods.
    assert!(binder.lookup_extension_method_levels(interner.intern("Create"), 0, span).is_empty());
}

// =============================================================================
// Color-color
// =============================================================================

#[test]
fn test_color_color_static_member_reads_the_type() {
    let f = fixture(false);
    let (bound, diag) = bind(&f, member_of("Color", "Red"));
    assert!(diag.is_empty());
    assert!(matches!(bound.kind, BoundKind::FieldAccess { receiver: None, .. }));
}

#[test]
fn test_color_color_instance_member_reads_the_value() {
    let f = fixture(false);
    let (bound, diag) = bind(&f, member_of("Color", "Darken"));
    assert!(diag.is_empty());
    let darken = group(&bound);
    assert_eq!(darken.methods, vec![f.darken]);
    assert!(matches!(
        darken.receiver.as_deref().map(|r| &r.kind),
        Some(BoundKind::PropertyAccess { .. })
    ));
}

#[test]
fn test_color_color_mixed_group_stays_undecided() {
    let f = fixture(false);
    let (bound, diag) = bind(&f, member_of("Color", "Mix"));
    assert!(diag.is_empty());
    let mix = group(&bound);
    assert_eq!(mix.methods.len(), 2);
    assert!(matches!(mix.receiver.as_deref().map(|r| &r.kind), Some(BoundKind::TypeOrValue(_))));
}
