//! Array creation with initializers, end to end through the public binder API.

use csz_binder::{Binder, BinderOptions, BoundKind, BoundNode, ConversionKind};
use csz_common::DiagnosticBag;
use csz_common::diagnostics::diagnostic_codes;
use csz_symbols::{Compilation, CompilationBuilder, ConstantValue, TypeId};
use csz_syntax::{NodeIndex, PredefinedType, SyntaxBuilder};

fn core() -> Compilation {
    let mut builder = CompilationBuilder::new();
    builder.with_core_library();
    builder.build()
}

fn bind_with(
    compilation: &Compilation,
    options: BinderOptions,
    build: impl FnOnce(&mut SyntaxBuilder<'_>) -> NodeIndex,
) -> (BoundNode, DiagnosticBag) {
    let mut syntax = SyntaxBuilder::new(compilation.interner());
    let root = build(&mut syntax);
    let arena = syntax.finish();
    let mut binder = Binder::new(compilation, &arena, compilation.global_scope()).with_options(options);
    let mut diag = DiagnosticBag::new();
    let bound = binder.bind_expression(root, &mut diag);
    (bound, diag)
}

fn bind(compilation: &Compilation, build: impl FnOnce(&mut SyntaxBuilder<'_>) -> NodeIndex) -> (BoundNode, DiagnosticBag) {
    bind_with(compilation, BinderOptions::default(), build)
}

fn rows(s: &mut SyntaxBuilder<'_>, values: &[&[u64]]) -> NodeIndex {
    let rows = values
        .iter()
        .map(|row| {
            let elements = row.iter().map(|v| s.int(*v)).collect();
            s.array_init(elements)
        })
        .collect();
    s.array_init(rows)
}

fn sizes(node: &BoundNode) -> Vec<Option<i128>> {
    let BoundKind::ArrayCreation { sizes, .. } = &node.kind else {
        panic!("expected an array creation, got {}", node.kind_name());
    };
    sizes
        .iter()
        .map(|size| size.constant.as_ref().and_then(ConstantValue::as_integral))
        .collect()
}

fn leaves(node: &BoundNode) -> Vec<&BoundNode> {
    let mut out = Vec::new();
    if let BoundKind::ArrayCreation {
        initializer: Some(initializer),
        ..
    } = &node.kind
    {
        collect_leaves(initializer, &mut out);
    }
    out
}

fn collect_leaves<'a>(node: &'a BoundNode, out: &mut Vec<&'a BoundNode>) {
    match &node.kind {
        BoundKind::ArrayInitialization { elements } => elements.iter().for_each(|e| collect_leaves(e, out)),
        _ => out.push(node),
    }
}

#[test]
fn test_rectangular_array_infers_every_dimension() {
    let compilation = core();
    let (bound, diag) = bind(&compilation, |s| {
        let int = s.predefined(PredefinedType::Int);
        let init = rows(s, &[&[1, 2, 3], &[4, 5, 6]]);
        s.new_array(int, vec![NodeIndex::NONE, NodeIndex::NONE], Some(init))
    });
    assert!(diag.is_empty(), "unexpected diagnostics: {:?}", diag.codes());
    assert_eq!(bound.ty, Some(compilation.types().array(TypeId::INT, 2)));
    assert_eq!(sizes(&bound), vec![Some(2), Some(3)]);
    assert_eq!(leaves(&bound).len(), 6);
}

#[test]
fn test_elements_convert_to_the_element_type() {
    let compilation = core();
    let (bound, diag) = bind(&compilation, |s| {
        let double = s.predefined(PredefinedType::Double);
        let one = s.int(1);
        let half = s.double(2.5);
        let init = s.array_init(vec![one, half]);
        s.new_array(double, vec![NodeIndex::NONE], Some(init))
    });
    assert!(diag.is_empty());
    let elements = leaves(&bound);
    assert!(elements.iter().all(|e| e.ty == Some(TypeId::DOUBLE)));
    let BoundKind::Conversion { conversion, .. } = &elements[0].kind else {
        panic!("expected the int element to be converted, got {}", elements[0].kind_name());
    };
    assert_eq!(conversion.kind, ConversionKind::ImplicitNumeric);
    assert_eq!(elements[0].constant, Some(ConstantValue::Floating(1.0)));
}

#[test]
fn test_unconvertible_element_is_reported_at_the_element() {
    let compilation = core();
    let mut element_span = None;
    let (bound, diag) = bind(&compilation, |s| {
        let int = s.predefined(PredefinedType::Int);
        let one = s.int(1);
        let text = s.string("two");
        element_span = Some(s.arena().span(text));
        let init = s.array_init(vec![one, text]);
        s.new_array(int, vec![NodeIndex::NONE], Some(init))
    });
    assert_eq!(diag.codes(), vec![diagnostic_codes::NO_IMPLICIT_CONV]);
    assert_eq!(diag.iter().next().map(|d| d.span), element_span);
    assert!(bound.has_errors);
    assert_eq!(sizes(&bound), vec![Some(2)]);
}

#[test]
fn test_length_checks_follow_options_loaded_from_json() {
    let compilation = core();
    let lenient = BinderOptions::from_json_str(r#"{ "strictArrayInitializerLengths": false }"#)
        .expect("valid options");
    assert!(lenient.report_suggestions, "unspecified options keep their defaults");

    let declared = |s: &mut SyntaxBuilder<'_>| {
        let int = s.predefined(PredefinedType::Int);
        let two = s.int(2);
        let init = rows(s, &[&[1, 2, 3]]);
        let three = s.int(3);
        s.new_array(int, vec![two, three], Some(init))
    };
    let (_, diag) = bind(&compilation, declared);
    assert_eq!(diag.codes(), vec![diagnostic_codes::ARRAY_INITIALIZER_INCORRECT_LENGTH]);
    let (bound, diag) = bind_with(&compilation, lenient.clone(), declared);
    assert!(diag.is_empty());
    assert!(!bound.has_errors);

    // Rows of different lengths are wrong whatever the options say.
    let (bound, diag) = bind_with(&compilation, lenient, |s| {
        let int = s.predefined(PredefinedType::Int);
        let init = rows(s, &[&[1, 2], &[3]]);
        s.new_array(int, vec![NodeIndex::NONE, NodeIndex::NONE], Some(init))
    });
    assert_eq!(diag.codes(), vec![diagnostic_codes::ARRAY_INITIALIZER_INCORRECT_LENGTH]);
    assert!(bound.has_errors);
}

#[test]
fn test_implicitly_typed_rectangular_array() {
    let compilation = core();
    let (bound, diag) = bind(&compilation, |s| {
        let init = rows(s, &[&[1, 2], &[3, 4]]);
        s.new_implicit_array(2, init)
    });
    assert!(diag.is_empty(), "unexpected diagnostics: {:?}", diag.codes());
    assert_eq!(bound.ty, Some(compilation.types().array(TypeId::INT, 2)));
    assert_eq!(sizes(&bound), vec![Some(2), Some(2)]);
}

#[test]
fn test_null_elements_in_reference_arrays() {
    let compilation = core();
    let (bound, diag) = bind(&compilation, |s| {
        let string = s.predefined(PredefinedType::String);
        let null = s.null();
        let text = s.string("a");
        let init = s.array_init(vec![null, text]);
        s.new_array(string, vec![NodeIndex::NONE], Some(init))
    });
    assert!(diag.is_empty());
    assert!(leaves(&bound).iter().all(|e| e.ty == Some(TypeId::STRING)));
}
