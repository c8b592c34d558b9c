use super::*;
use crate::node::SyntaxData;

#[test]
fn test_leaf_spans_do_not_overlap() {
    let interner = Interner::new();
    let mut b = SyntaxBuilder::new(&interner);
    let a = b.ident("alpha");
    let c = b.ident("c");
    let arena = b.finish();
    let first = arena.span(a);
    let second = arena.span(c);
    assert_eq!(first.len(), 5);
    assert!(first.end < second.start);
}

#[test]
fn test_member_access_covers_receiver_and_name() {
    let interner = Interner::new();
    let mut b = SyntaxBuilder::new(&interner);
    let receiver = b.ident("Color");
    let access = b.member(receiver, "Red");
    let arena = b.finish();
    let span = arena.span(access);
    assert_eq!(span.start, arena.span(receiver).start);
    let Some(SyntaxData::MemberAccess { name, conditional, .. }) = arena.data(access) else {
        panic!("expected member access");
    };
    assert!(!conditional);
    assert_eq!(&*interner.resolve(name.name), "Red");
    assert_eq!(span.end, name.name_span.end);
}

#[test]
fn test_missing_index_has_dummy_span() {
    let arena = SyntaxArena::new();
    assert_eq!(arena.span(NodeIndex::NONE), Span::DUMMY);
    assert!(arena.get(NodeIndex::NONE).is_none());
}

#[test]
fn test_discard_designation_is_none() {
    let interner = Interner::new();
    let mut b = SyntaxBuilder::new(&interner);
    let ty = b.predefined(PredefinedType::Int);
    let pattern = b.declaration_pattern(ty, "_");
    let arena = b.finish();
    assert!(matches!(
        arena.data(pattern),
        Some(SyntaxData::DeclarationPattern { designation: None, .. })
    ));
}
