use super::*;
use crate::bound::BoundNode;
use crate::conversions::StandardConversions;
use csz_common::Span;
use csz_symbols::{Accessibility, CompilationBuilder, ConstantValue};

/// Declare methods on a fresh class `App.Target`; `declare` returns them in
/// the order they should be offered to the resolver.
fn methods(declare: impl FnOnce(&mut CompilationBuilder, SymbolId) -> Vec<SymbolId>) -> (Compilation, Vec<SymbolId>) {
    let mut builder = CompilationBuilder::new();
    builder.with_core_library();
    let ns = builder.namespace("App");
    let class = builder.add_class(ns, "Target");
    let members = declare(&mut builder, class);
    (builder.build(), members)
}

fn param(builder: &CompilationBuilder, name: &str, ty: TypeId) -> Parameter {
    Parameter::new(builder.interner().intern(name), ty)
}

fn context(compilation: &Compilation) -> OverloadContext<'_> {
    OverloadContext {
        compilation,
        conversions: &StandardConversions,
        receiver_type: None,
        type_args: &[],
        accessible_from: None,
        ignore_accessibility: false,
        checked: false,
    }
}

fn value(ty: TypeId) -> BoundNode {
    BoundNode::new(BoundKind::Literal, ty, Span::new(0, 1))
}

fn int_constant(v: i128) -> BoundNode {
    value(TypeId::INT).with_constant(Some(ConstantValue::Integral(v)))
}

fn positional(values: Vec<BoundNode>) -> AnalyzedArguments {
    let mut args = AnalyzedArguments::new();
    for v in values {
        args.push(v);
    }
    args
}

fn winner(result: &OverloadResolutionResult) -> SymbolId {
    match result {
        OverloadResolutionResult::Succeeded(best) => best.member,
        other => panic!("expected success, got {other:?}"),
    }
}

#[test]
fn test_identity_beats_widening() {
    let (compilation, members) = methods(|b, class| {
        let wide = vec![param(b, "x", TypeId::LONG)];
        let exact = vec![param(b, "x", TypeId::INT)];
        vec![
            b.add_method(class, "M", wide, TypeId::VOID),
            b.add_method(class, "M", exact, TypeId::VOID),
        ]
    });
    let result = StandardOverloadResolver.resolve(&context(&compilation), &members, &positional(vec![value(TypeId::INT)]));
    assert_eq!(winner(&result), members[1]);
}

#[test]
fn test_better_conversion_target_wins_for_constants() {
    let (compilation, members) = methods(|b, class| {
        let double = vec![param(b, "x", TypeId::DOUBLE)];
        let long = vec![param(b, "x", TypeId::LONG)];
        vec![
            b.add_method(class, "M", double, TypeId::VOID),
            b.add_method(class, "M", long, TypeId::VOID),
        ]
    });
    let result = StandardOverloadResolver.resolve(&context(&compilation), &members, &positional(vec![int_constant(1)]));
    assert_eq!(winner(&result), members[1]);
}

#[test]
fn test_crossed_parameters_are_ambiguous() {
    let (compilation, members) = methods(|b, class| {
        let first = vec![param(b, "a", TypeId::STRING), param(b, "b", TypeId::OBJECT)];
        let second = vec![param(b, "a", TypeId::OBJECT), param(b, "b", TypeId::STRING)];
        vec![
            b.add_method(class, "M", first, TypeId::VOID),
            b.add_method(class, "M", second, TypeId::VOID),
        ]
    });
    let args = positional(vec![value(TypeId::STRING), value(TypeId::STRING)]);
    let result = StandardOverloadResolver.resolve(&context(&compilation), &members, &args);
    let OverloadResolutionResult::Ambiguous(tied) = &result else {
        panic!("expected an ambiguity, got {result:?}");
    };
    assert_eq!(tied.len(), 2);
    assert_eq!(result.members(), members);
    assert!(!result.is_success());
}

#[test]
fn test_params_array_in_expanded_form() {
    let (compilation, members) = methods(|b, class| {
        let array = b.array_type(TypeId::INT, 1);
        let parameters = vec![param(b, "values", array).params()];
        vec![b.add_method(class, "Sum", parameters, TypeId::INT)]
    });
    let ctx = context(&compilation);

    let three = positional(vec![int_constant(1), int_constant(2), int_constant(3)]);
    let OverloadResolutionResult::Succeeded(best) = StandardOverloadResolver.resolve(&ctx, &members, &three) else {
        panic!("expanded form should apply");
    };
    assert!(best.expanded);
    assert_eq!(best.arg_to_param, vec![0, 0, 0]);
    assert_eq!(best.parameter_type(&compilation, 2), Some(TypeId::INT));

    let none = positional(Vec::new());
    let OverloadResolutionResult::Succeeded(best) = StandardOverloadResolver.resolve(&ctx, &members, &none) else {
        panic!("an empty params list should apply");
    };
    assert!(best.expanded);

    let array = compilation.types().array(TypeId::INT, 1);
    let direct = positional(vec![value(array)]);
    let OverloadResolutionResult::Succeeded(best) = StandardOverloadResolver.resolve(&ctx, &members, &direct) else {
        panic!("normal form should apply");
    };
    assert!(!best.expanded);
}

#[test]
fn test_normal_form_beats_expanded_form() {
    let (compilation, members) = methods(|b, class| {
        let array = b.array_type(TypeId::INT, 1);
        let expanded = vec![param(b, "values", array).params()];
        let single = vec![param(b, "value", TypeId::INT)];
        vec![
            b.add_method(class, "M", expanded, TypeId::VOID),
            b.add_method(class, "M", single, TypeId::VOID),
        ]
    });
    let result = StandardOverloadResolver.resolve(&context(&compilation), &members, &positional(vec![value(TypeId::INT)]));
    assert_eq!(winner(&result), members[1]);
}

#[test]
fn test_fewer_parameters_break_ties() {
    let (compilation, members) = methods(|b, class| {
        let longer = vec![param(b, "a", TypeId::INT), param(b, "b", TypeId::INT).optional()];
        let shorter = vec![param(b, "a", TypeId::INT)];
        vec![
            b.add_method(class, "M", longer, TypeId::VOID),
            b.add_method(class, "M", shorter, TypeId::VOID),
        ]
    });
    let result = StandardOverloadResolver.resolve(&context(&compilation), &members, &positional(vec![value(TypeId::INT)]));
    assert_eq!(winner(&result), members[1]);
}

#[test]
fn test_named_arguments_map_to_parameters() {
    let (compilation, members) = methods(|b, class| {
        let parameters = vec![param(b, "a", TypeId::INT), param(b, "b", TypeId::STRING)];
        vec![b.add_method(class, "M", parameters, TypeId::VOID)]
    });
    let interner = compilation.interner();
    let mut args = AnalyzedArguments::new();
    args.add(value(TypeId::STRING), Some((interner.intern("b"), Span::new(2, 3))), RefKind::None);
    args.add(value(TypeId::INT), Some((interner.intern("a"), Span::new(5, 6))), RefKind::None);
    let OverloadResolutionResult::Succeeded(best) = StandardOverloadResolver.resolve(&context(&compilation), &members, &args)
    else {
        panic!("named arguments should map");
    };
    assert_eq!(best.arg_to_param, vec![1, 0]);

    let mut unknown = AnalyzedArguments::new();
    unknown.add(value(TypeId::INT), Some((interner.intern("c"), Span::new(2, 3))), RefKind::None);
    let result = StandardOverloadResolver.resolve(&context(&compilation), &members, &unknown);
    assert_eq!(
        result.results()[0].kind,
        MemberResolutionKind::NoCorrespondingNamedParameter { argument: 0 }
    );
}

#[test]
fn test_missing_required_argument() {
    let (compilation, members) = methods(|b, class| {
        let parameters = vec![param(b, "a", TypeId::INT), param(b, "b", TypeId::INT)];
        vec![b.add_method(class, "M", parameters, TypeId::VOID)]
    });
    let result = StandardOverloadResolver.resolve(&context(&compilation), &members, &positional(vec![value(TypeId::INT)]));
    assert_eq!(result.results()[0].kind, MemberResolutionKind::WrongArgumentCount);
}

#[test]
fn test_ref_kinds_must_match() {
    let (compilation, members) = methods(|b, class| {
        let by_ref = vec![param(b, "x", TypeId::INT).with_ref_kind(RefKind::Ref)];
        let by_in = vec![param(b, "x", TypeId::INT).with_ref_kind(RefKind::In)];
        vec![
            b.add_method(class, "Swap", by_ref, TypeId::VOID),
            b.add_method(class, "Read", by_in, TypeId::VOID),
        ]
    });
    let ctx = context(&compilation);
    let plain = positional(vec![value(TypeId::INT)]);

    let result = StandardOverloadResolver.resolve(&ctx, &members[..1], &plain);
    assert_eq!(
        result.results()[0].kind,
        MemberResolutionKind::BadArgumentRefKind { argument: 0, parameter: 0 }
    );

    let mut by_ref = AnalyzedArguments::new();
    by_ref.add(value(TypeId::INT), None, RefKind::Ref);
    assert!(StandardOverloadResolver.resolve(&ctx, &members[..1], &by_ref).is_success());

    // `in` parameters accept plain arguments.
    assert!(StandardOverloadResolver.resolve(&ctx, &members[1..], &plain).is_success());
}

#[test]
fn test_ref_argument_needs_exact_type() {
    let (compilation, members) = methods(|b, class| {
        let parameters = vec![param(b, "x", TypeId::LONG).with_ref_kind(RefKind::Ref)];
        vec![b.add_method(class, "M", parameters, TypeId::VOID)]
    });
    let mut args = AnalyzedArguments::new();
    args.add(value(TypeId::INT), None, RefKind::Ref);
    let result = StandardOverloadResolver.resolve(&context(&compilation), &members, &args);
    assert_eq!(
        result.results()[0].kind,
        MemberResolutionKind::BadArgumentConversion { argument: 0, parameter: 0 }
    );
}

#[test]
fn test_type_argument_count_must_match() {
    let (compilation, members) = methods(|b, class| {
        let make = b.add_method(class, "Make", Vec::new(), TypeId::OBJECT);
        b.add_type_parameters(make, &["T"]);
        vec![make]
    });
    let none = positional(Vec::new());
    let result = StandardOverloadResolver.resolve(&context(&compilation), &members, &none);
    assert_eq!(result.results()[0].kind, MemberResolutionKind::TypeArgumentCountMismatch);

    let ctx = OverloadContext {
        type_args: &[TypeId::INT],
        ..context(&compilation)
    };
    assert!(StandardOverloadResolver.resolve(&ctx, &members, &none).is_success());
}

#[test]
fn test_inaccessible_candidate() {
    let (compilation, members) = methods(|b, class| {
        let hidden = b.add_method(class, "Hidden", Vec::new(), TypeId::VOID);
        b.set_accessibility(hidden, Accessibility::Private);
        vec![hidden]
    });
    let none = positional(Vec::new());
    let result = StandardOverloadResolver.resolve(&context(&compilation), &members, &none);
    assert_eq!(result.results()[0].kind, MemberResolutionKind::Inaccessible);

    let ctx = OverloadContext {
        ignore_accessibility: true,
        ..context(&compilation)
    };
    assert!(StandardOverloadResolver.resolve(&ctx, &members, &none).is_success());
}

#[test]
fn test_bad_argument_conversion_is_located() {
    let (compilation, members) = methods(|b, class| {
        let parameters = vec![param(b, "a", TypeId::STRING), param(b, "b", TypeId::INT)];
        vec![b.add_method(class, "M", parameters, TypeId::VOID)]
    });
    let args = positional(vec![value(TypeId::STRING), value(TypeId::STRING)]);
    let result = StandardOverloadResolver.resolve(&context(&compilation), &members, &args);
    let OverloadResolutionResult::NoneApplicable(failures) = &result else {
        panic!("nothing should apply");
    };
    assert_eq!(
        failures[0].kind,
        MemberResolutionKind::BadArgumentConversion { argument: 1, parameter: 1 }
    );
    assert_eq!(failures[0].return_type, TypeId::VOID);
}
