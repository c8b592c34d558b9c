use super::*;
use crate::special::SpecialType;
use crate::types::TypeData;

fn core() -> CompilationBuilder {
    let mut builder = CompilationBuilder::new();
    builder.with_core_library();
    builder
}

#[test]
fn test_core_library_maps_special_types() {
    let compilation = core().build();
    let int_symbol = compilation.special_type_symbol(SpecialType::Int32).expect("Int32 declared");
    assert_eq!(compilation.qualified_name(int_symbol), "System.Int32");
    assert_eq!(compilation.declared_type(int_symbol), Some(TypeId::INT));
    assert_eq!(compilation.type_symbol(TypeId::INT), Some(int_symbol));
    assert!(compilation.well_known_type(WellKnownType::SystemCollectionsIEnumerable).is_some());
    assert_eq!(compilation.display_type(TypeId::INT), "int");
}

#[test]
fn test_namespaces_merge_and_keep_highest_origin() {
    let mut builder = core();
    builder.set_origin(Origin::Referenced, "Lib.dll");
    let first = builder.namespace("Acme.Tools");
    builder.set_origin(Origin::PrimaryModule, "Program.cs");
    let second = builder.namespace("Acme.Tools");
    assert_eq!(first, second);
    let compilation = builder.build();
    assert_eq!(compilation.symbol(first).origin, Origin::PrimaryModule);
    assert_eq!(compilation.lookup_qualified("Acme.Tools"), Some(first));
}

#[test]
fn test_base_chain_and_interfaces() {
    let mut builder = core();
    let ns = builder.namespace("App");
    let enumerable = builder.build_lookup_enumerable();
    let animal = builder.add_class(ns, "Animal");
    let dog = builder.add_class(ns, "Dog");
    let animal_ty = builder.declared_type(animal);
    builder.set_base(dog, animal_ty);
    builder.add_interface_impl(animal, enumerable);
    let dog_ty = builder.declared_type(dog);
    let compilation = builder.build();

    assert_eq!(compilation.base_chain(dog_ty), vec![dog_ty, animal_ty, TypeId::OBJECT]);
    assert!(compilation.is_derived_from(dog_ty, animal_ty));
    assert!(!compilation.is_derived_from(animal_ty, dog_ty));
    assert!(compilation.implements(dog_ty, enumerable));
    assert!(compilation.is_reference_type(dog_ty));
}

#[test]
fn test_struct_base_is_value_type() {
    let mut builder = core();
    let ns = builder.namespace("App");
    let point = builder.add_struct(ns, "Point");
    let point_ty = builder.declared_type(point);
    let compilation = builder.build();
    let value_type = compilation.well_known_type(WellKnownType::SystemValueType);
    assert_eq!(compilation.base_type(point_ty), value_type);
    assert!(compilation.is_value_type(point_ty));
    assert!(compilation.is_non_nullable_value_type(point_ty));
}

#[test]
fn test_generic_member_types_are_substituted() {
    let mut builder = core();
    let ns = builder.namespace("App");
    let boxed = builder.add_class(ns, "Box");
    let params = builder.add_type_parameters(boxed, &["T"]);
    let t = builder.declared_type(params[0]);
    let value = builder.add_field(boxed, "Value", t);
    let box_of_int = builder.construct(boxed, &[TypeId::INT]);
    let compilation = builder.build();

    assert_eq!(compilation.member_type(value, Some(box_of_int)), TypeId::INT);
    assert_eq!(compilation.member_type(value, None), t);
    assert_eq!(compilation.display_type(box_of_int), "App.Box<int>");
    let interner = compilation.interner();
    assert!(compilation.members_named(boxed, interner.intern("T")).is_empty());
}

#[test]
fn test_least_overridden_follows_override_links() {
    let mut builder = core();
    let ns = builder.namespace("App");
    let base = builder.add_class(ns, "Base");
    let derived = builder.add_class(ns, "Derived");
    let base_m = builder.add_method(base, "M", vec![], TypeId::VOID);
    let derived_m = builder.add_method(derived, "M", vec![], TypeId::VOID);
    builder.set_overridden(derived_m, base_m);
    let compilation = builder.build();

    assert_eq!(compilation.least_overridden(derived_m), base_m);
    assert_eq!(compilation.least_overridden(base_m), base_m);
    assert!(compilation.overrides(derived_m, base_m));
}

#[test]
fn test_private_members_are_accessible_only_inside_their_type() {
    let mut builder = core();
    let ns = builder.namespace("App");
    let owner = builder.add_class(ns, "Owner");
    let other = builder.add_class(ns, "Other");
    let secret = builder.add_field(owner, "secret", TypeId::INT);
    builder.set_accessibility(secret, Accessibility::Private);
    let compilation = builder.build();

    assert!(compilation.is_accessible(secret, Some(owner)));
    assert!(!compilation.is_accessible(secret, Some(other)));
    assert!(!compilation.is_accessible(secret, None));
}

#[test]
fn test_member_scope_declares_parameters() {
    let mut builder = core();
    let ns = builder.namespace("App");
    let class = builder.add_class(ns, "C");
    let x = builder.interner().intern("x");
    let method = builder.add_static_method(class, "M", vec![Parameter::new(x, TypeId::INT)], TypeId::VOID);
    let ns_scope = builder.namespace_scope(builder.global_scope(), ns);
    let type_scope = builder.type_scope(ns_scope, class);
    let body = builder.member_scope(type_scope, method);
    let compilation = builder.build();

    let scope = compilation.scope(body).expect("scope exists");
    assert!(scope.is_static);
    let locals = scope.locals.get(&x).expect("parameter declared");
    assert!(matches!(compilation.symbol(locals[0]).kind, SymbolKind::Parameter { ty: TypeId::INT, .. }));
    let chain: Vec<ScopeId> = compilation.scopes().ancestors(body).map(|(id, _)| id).collect();
    assert_eq!(chain, vec![body, type_scope, ns_scope, compilation.global_scope()]);
}

#[test]
fn test_display_symbol_formats_signatures() {
    let mut builder = core();
    let ns = builder.namespace("App");
    let class = builder.add_class(ns, "C");
    let a = builder.interner().intern("a");
    let b = builder.interner().intern("b");
    let strings = builder.array_type(TypeId::STRING, 1);
    let method = builder.add_method(
        class,
        "M",
        vec![
            Parameter::new(a, TypeId::INT).with_ref_kind(RefKind::Ref),
            Parameter::new(b, strings).params(),
        ],
        TypeId::VOID,
    );
    let ctor = builder.add_constructor(class, vec![Parameter::new(a, TypeId::INT)]);
    let compilation = builder.build();
    assert_eq!(compilation.display_symbol(method), "App.C.M(ref int, params string[])");
    assert_eq!(compilation.display_symbol(ctor), "App.C.C(int)");
    assert!(matches!(compilation.type_data(strings), TypeData::Array { rank: 1, .. }));
}

impl CompilationBuilder {
    fn build_lookup_enumerable(&mut self) -> TypeId {
        let collections = self.namespace("System.Collections");
        let atom = self.interner().intern("IEnumerable");
        let symbol = self.symbols.get(collections).and_then(|s| s.members()).and_then(|m| m.get(&atom)).map(|ids| ids[0]);
        symbol.map_or(TypeId::ERROR, |s| self.declared_type(s))
    }
}

#[test]
fn test_builder_resolves_well_known_types_before_build() {
    let mut builder = CompilationBuilder::new();
    assert_eq!(builder.well_known_type(WellKnownType::SystemCollectionsIEnumerable), None);
    builder.with_core_library();
    let enumerable = builder
        .well_known_type(WellKnownType::SystemCollectionsIEnumerable)
        .expect("declared by the core library");
    let bag = builder.add_class(builder.global_namespace(), "Bag");
    builder.add_interface_impl(bag, enumerable);
    let bag = builder.declared_type(bag);
    let compilation = builder.build();
    assert_eq!(compilation.well_known_type(WellKnownType::SystemCollectionsIEnumerable), Some(enumerable));
    assert!(compilation.implements(bag, enumerable));
}
