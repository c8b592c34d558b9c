use super::*;
use rayon::prelude::*;

#[test]
fn test_fixed_ids_match_their_data() {
    let interner = TypeInterner::new();
    assert_eq!(interner.lookup(TypeId::NULL), Some(TypeData::Null));
    assert_eq!(interner.lookup(TypeId::DYNAMIC), Some(TypeData::Dynamic));
    for special in SpecialType::ALL {
        let id = TypeId::special(special);
        assert_eq!(interner.lookup(id), Some(TypeData::Special(special)));
        assert_eq!(id.as_special(), Some(special));
    }
    assert_eq!(TypeId::special(SpecialType::Int32), TypeId::INT);
    assert_eq!(TypeId::special(SpecialType::Decimal), TypeId::DECIMAL);
}

#[test]
fn test_structural_types_are_deduplicated() {
    let interner = TypeInterner::new();
    let a = interner.array(TypeId::INT, 2);
    let b = interner.array(TypeId::INT, 2);
    let c = interner.array(TypeId::INT, 1);
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(interner.lookup(a), Some(TypeData::Array { element: TypeId::INT, rank: 2 }));
}

#[test]
fn test_error_type_without_information_is_the_generic_error() {
    let interner = TypeInterner::new();
    assert_eq!(interner.error(Atom::NONE, &[]), TypeId::ERROR);
    let named = interner.error(Atom(7), &[SymbolId(1), SymbolId(2)]);
    assert_ne!(named, TypeId::ERROR);
    assert!(interner.is_error(named));
}

#[test]
fn test_concurrent_interning_agrees_on_ids() {
    let interner = TypeInterner::new();
    let ids: Vec<Vec<TypeId>> = (0..16)
        .into_par_iter()
        .map(|_| (1..=32).map(|rank| interner.array(TypeId::STRING, rank)).collect())
        .collect();
    for other in &ids[1..] {
        assert_eq!(other, &ids[0]);
    }
    let before = interner.len();
    interner.array(TypeId::STRING, 5);
    assert_eq!(interner.len(), before);
}
