use super::*;
use csz_symbols::{Compilation, CompilationBuilder, ScopeId};
use csz_syntax::{BinaryOperator, PredefinedType, SyntaxBuilder};

/// A block scope declaring `i: int`, `b: bool`, `o: object`.
fn block() -> (Compilation, ScopeId) {
    let mut builder = CompilationBuilder::new();
    builder.with_core_library();
    let global = builder.global_scope();
    let block = builder.block_scope(global);
    builder.add_local(block, "i", TypeId::INT);
    builder.add_local(block, "b", TypeId::BOOL);
    builder.add_local(block, "o", TypeId::OBJECT);
    (builder.build(), block)
}

fn bind_switch_in(
    compilation: &Compilation,
    scope: ScopeId,
    build: impl FnOnce(&mut SyntaxBuilder<'_>) -> NodeIndex,
) -> (BoundSwitch, DiagnosticBag) {
    let mut syntax = SyntaxBuilder::new(compilation.interner());
    let root = build(&mut syntax);
    let arena = syntax.finish();
    let mut binder = Binder::new(compilation, &arena, scope);
    let mut diag = DiagnosticBag::new();
    let bound = binder.bind_switch(root, &mut diag);
    (bound, diag)
}

/// `case <value>:` with one statement.
fn int_case(s: &mut SyntaxBuilder<'_>, value: u64) -> NodeIndex {
    let value = s.int(value);
    let pattern = s.constant_pattern(value);
    let label = s.case_label(pattern);
    let statement = s.statement();
    s.section(vec![label], vec![statement])
}

fn default_section(s: &mut SyntaxBuilder<'_>) -> NodeIndex {
    let label = s.default_label();
    let statement = s.statement();
    s.section(vec![label], vec![statement])
}

fn reachability(switch: &BoundSwitch) -> Vec<bool> {
    switch.labels().map(|label| label.is_reachable).collect()
}

#[test]
fn test_duplicate_constant_case_is_subsumed() {
    let (compilation, scope) = block();
    let mut duplicate_span = Span::DUMMY;
    let (switch, diag) = bind_switch_in(&compilation, scope, |s| {
        let input = s.ident("i");
        let first = int_case(s, 1);
        let second = int_case(s, 2);
        let value = s.int(1);
        let pattern = s.constant_pattern(value);
        duplicate_span = s.arena().span(pattern);
        let label = s.case_label(pattern);
        let third = s.section(vec![label], Vec::new());
        s.switch(input, vec![first, second, third])
    });
    assert_eq!(diag.codes(), vec![diagnostic_codes::SWITCH_CASE_SUBSUMED]);
    assert_eq!(diag.iter().next().map(|d| d.span), Some(duplicate_span));
    assert_eq!(reachability(&switch), vec![true, true, false]);
    assert_eq!(switch.sections.len(), 3);
    assert!(switch.sections[2].statements.is_empty());
}

#[test]
fn test_labels_are_numbered_in_source_order() {
    let (compilation, scope) = block();
    let (switch, diag) = bind_switch_in(&compilation, scope, |s| {
        let input = s.ident("i");
        let first = int_case(s, 1);
        let default = default_section(s);
        let second = int_case(s, 2);
        s.switch(input, vec![first, default, second])
    });
    assert!(diag.is_empty());
    let labels: Vec<u32> = switch.labels().map(|label| label.label.0).collect();
    assert_eq!(labels, vec![0, 1, 2]);
    assert_eq!(switch.default_label, Some(LabelId(1)));
    assert_eq!(switch.break_label, LabelId(3));
    assert!(switch.labels().nth(1).is_some_and(BoundSwitchLabel::is_default));
    assert_eq!(switch.expression.ty, Some(TypeId::INT));
}

#[test]
fn test_default_is_never_reported() {
    let (compilation, scope) = block();
    let (switch, diag) = bind_switch_in(&compilation, scope, |s| {
        let input = s.ident("b");
        let yes = s.boolean(true);
        let yes = s.constant_pattern(yes);
        let yes = s.case_label(yes);
        let no = s.boolean(false);
        let no = s.constant_pattern(no);
        let no = s.case_label(no);
        let both = s.section(vec![yes, no], Vec::new());
        let default = default_section(s);
        s.switch(input, vec![both, default])
    });
    assert!(diag.is_empty());
    assert_eq!(reachability(&switch), vec![true, true, false]);
}

#[test]
fn test_guard_sees_its_own_pattern_variable() {
    let (compilation, scope) = block();
    let (switch, diag) = bind_switch_in(&compilation, scope, |s| {
        let input = s.ident("i");
        let pattern = s.var_pattern("v");
        let v = s.ident("v");
        let zero = s.int(0);
        let guard = s.binary(BinaryOperator::GreaterThan, v, zero);
        let guarded = s.case_label_when(pattern, guard);
        let first = s.section(vec![guarded], Vec::new());
        let rest = s.var_pattern("w");
        let rest = s.case_label(rest);
        let second = s.section(vec![rest], Vec::new());
        s.switch(input, vec![first, second])
    });
    assert!(diag.is_empty(), "unexpected diagnostics: {:?}", diag.codes());
    assert_eq!(reachability(&switch), vec![true, true]);
    assert_eq!(switch.pattern_variables.len(), 2);
    let guard = switch.labels().next().and_then(|label| label.guard.as_ref()).expect("guard");
    assert_eq!(guard.ty, Some(TypeId::BOOL));
}

#[test]
fn test_pattern_variable_of_another_label_is_not_visible() {
    let (compilation, scope) = block();
    let (_, diag) = bind_switch_in(&compilation, scope, |s| {
        let input = s.ident("i");
        let first = s.var_pattern("a");
        let first = s.case_label(first);
        let second = s.var_pattern("b");
        let a = s.ident("a");
        let zero = s.int(0);
        let guard = s.binary(BinaryOperator::GreaterThan, a, zero);
        let second = s.case_label_when(second, guard);
        let section = s.section(vec![first, second], Vec::new());
        s.switch(input, vec![section])
    });
    assert_eq!(diag.codes(), vec![diagnostic_codes::NAME_NOT_IN_CONTEXT]);
}

#[test]
fn test_constant_false_guard_makes_label_unreachable() {
    let (compilation, scope) = block();
    let (switch, diag) = bind_switch_in(&compilation, scope, |s| {
        let input = s.ident("i");
        let one = s.int(1);
        let pattern = s.constant_pattern(one);
        let never = s.boolean(false);
        let label = s.case_label_when(pattern, never);
        let section = s.section(vec![label], Vec::new());
        s.switch(input, vec![section])
    });
    assert_eq!(diag.codes(), vec![diagnostic_codes::SWITCH_CASE_SUBSUMED]);
    assert_eq!(reachability(&switch), vec![false]);
}

#[test]
fn test_erroneous_expression_suppresses_subsumption() {
    let (compilation, scope) = block();
    let (switch, diag) = bind_switch_in(&compilation, scope, |s| {
        let input = s.ident("missing");
        let first = int_case(s, 1);
        let second = int_case(s, 1);
        s.switch(input, vec![first, second])
    });
    assert_eq!(diag.codes(), vec![diagnostic_codes::NAME_NOT_IN_CONTEXT]);
    assert!(switch.has_errors());
}

#[test]
fn test_erroneous_pattern_does_not_subsume_later_labels() {
    let (compilation, scope) = block();
    let (switch, diag) = bind_switch_in(&compilation, scope, |s| {
        let input = s.ident("o");
        let missing = s.ident("Missing");
        let bad = s.type_pattern(missing);
        let bad = s.case_label(bad);
        let bad = s.section(vec![bad], Vec::new());
        let string = s.predefined(PredefinedType::String);
        let text = s.type_pattern(string);
        let text = s.case_label(text);
        let text = s.section(vec![text], Vec::new());
        s.switch(input, vec![bad, text])
    });
    assert_eq!(diag.codes(), vec![diagnostic_codes::TYPE_OR_NAMESPACE_NOT_FOUND]);
    assert!(switch.has_errors());
    assert!(switch.labels().nth(1).is_some_and(|label| label.is_reachable));
}

#[test]
fn test_repeated_type_pattern_on_object() {
    let (compilation, scope) = block();
    let (switch, diag) = bind_switch_in(&compilation, scope, |s| {
        let input = s.ident("o");
        let string = s.predefined(PredefinedType::String);
        let first = s.declaration_pattern(string, "s");
        let first = s.case_label(first);
        let first = s.section(vec![first], Vec::new());
        let string = s.predefined(PredefinedType::String);
        let second = s.declaration_pattern(string, "t");
        let second = s.case_label(second);
        let second = s.section(vec![second], Vec::new());
        s.switch(input, vec![first, second])
    });
    assert_eq!(diag.codes(), vec![diagnostic_codes::SWITCH_CASE_SUBSUMED]);
    assert_eq!(reachability(&switch), vec![true, false]);
    assert_eq!(switch.pattern_variables.len(), 2);
    assert!(!switch.decision_dag.overflowed);
}
