//! Declaring a compilation.
//!
//! The declaration pass of a front end (or a test) feeds namespaces, types,
//! members and scopes into a [`CompilationBuilder`], then freezes it with
//! [`CompilationBuilder::build`].

use crate::compilation::{Compilation, SymbolTable, WellKnownType};
use crate::constant::ConstantValue;
use crate::scope::{Scope, ScopeArena, ScopeId, ScopeKind};
use crate::special::SpecialType;
use crate::symbol::{
    Accessibility, FieldData, LocalData, MethodData, MethodKind, NamedTypeData, NamespaceData,
    Origin, Parameter, PropertyData, RefKind, Symbol, SymbolId, SymbolKind, SymbolModifiers,
    TypeKind, TypeParameterData, UnreportedError,
};
use crate::types::{TypeId, TypeInterner};
use csz_common::{Atom, Interner, Span};
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

pub struct CompilationBuilder {
    interner: Interner,
    symbols: SymbolTable,
    types: TypeInterner,
    scopes: ScopeArena,
    global_namespace: SymbolId,
    global_scope: ScopeId,
    origin: Origin,
    module: Atom,
    special_symbols: FxHashMap<SpecialType, SymbolId>,
}

impl Default for CompilationBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CompilationBuilder {
    /// Start an empty compilation. Declarations default to the primary module.
    pub fn new() -> Self {
        let interner = Interner::new();
        let module = interner.intern("Program.cs");
        let mut symbols = SymbolTable::default();
        let global_namespace = symbols.alloc(Symbol {
            name: Atom::NONE,
            kind: SymbolKind::Namespace(NamespaceData::default()),
            container: SymbolId::NONE,
            origin: Origin::CoreLibrary,
            module,
            span: Span::DUMMY,
            accessibility: Accessibility::Public,
            modifiers: SymbolModifiers::empty(),
            unreported_error: None,
        });
        let mut scopes = ScopeArena::default();
        let global_scope = scopes.alloc(Scope::new(ScopeKind::Namespace(global_namespace), None));
        CompilationBuilder {
            interner,
            symbols,
            types: TypeInterner::new(),
            scopes,
            global_namespace,
            global_scope,
            origin: Origin::PrimaryModule,
            module,
            special_symbols: FxHashMap::default(),
        }
    }

    pub fn interner(&self) -> &Interner {
        &self.interner
    }

    pub fn types(&self) -> &TypeInterner {
        &self.types
    }

    pub fn global_namespace(&self) -> SymbolId {
        self.global_namespace
    }

    pub fn global_scope(&self) -> ScopeId {
        self.global_scope
    }

    /// Set where subsequent declarations come from.
    pub fn set_origin(&mut self, origin: Origin, module: &str) -> &mut Self {
        self.origin = origin;
        self.module = self.interner.intern(module);
        self
    }

    fn alloc(&mut self, name: &str, kind: SymbolKind, container: SymbolId) -> SymbolId {
        let id = self.alloc_unlisted(name, kind, container);
        let name = self.symbols.get(id).map_or(Atom::NONE, |s| s.name);
        if let Some(members) = self.symbols.get_mut(container).and_then(members_mut) {
            members.entry(name).or_default().push(id);
        }
        id
    }

    /// Allocate a symbol owned by `container` without making it a member of it.
    fn alloc_unlisted(&mut self, name: &str, kind: SymbolKind, container: SymbolId) -> SymbolId {
        let name = self.interner.intern(name);
        self.symbols.alloc(Symbol {
            name,
            kind,
            container,
            origin: self.origin,
            module: self.module,
            span: Span::DUMMY,
            accessibility: Accessibility::Public,
            modifiers: SymbolModifiers::empty(),
            unreported_error: None,
        })
    }

    fn symbol_mut(&mut self, id: SymbolId) -> Option<&mut Symbol> {
        self.symbols.get_mut(id)
    }

    // =========================================================================
    // Namespaces and types
    // =========================================================================

    /// Declare (or reopen) a dotted namespace path below the global namespace.
    pub fn namespace(&mut self, path: &str) -> SymbolId {
        let mut current = self.global_namespace;
        for part in path.split('.').filter(|p| !p.is_empty()) {
            let atom = self.interner.intern(part);
            let existing = self
                .symbols
                .get(current)
                .and_then(|s| s.members())
                .and_then(|m| m.get(&atom))
                .and_then(|ids| {
                    ids.iter()
                        .copied()
                        .find(|id| self.symbols.get(*id).is_some_and(Symbol::is_namespace))
                });
            current = match existing {
                Some(ns) => {
                    let origin = self.origin;
                    if let Some(symbol) = self.symbol_mut(ns) {
                        if origin > symbol.origin {
                            symbol.origin = origin;
                        }
                    }
                    ns
                }
                None => self.alloc(part, SymbolKind::Namespace(NamespaceData::default()), current),
            };
        }
        current
    }

    pub fn declare_type(&mut self, container: SymbolId, name: &str, type_kind: TypeKind) -> SymbolId {
        let id = self.alloc(
            name,
            SymbolKind::NamedType(NamedTypeData {
                type_kind,
                declared_type: TypeId::ERROR,
                type_parameters: Vec::new(),
                base: None,
                interfaces: Vec::new(),
                members: Default::default(),
                coclass: None,
                delegate_invoke: None,
            }),
            container,
        );
        let declared = match self.special_for(container, name) {
            Some(special) => {
                self.special_symbols.insert(special, id);
                TypeId::special(special)
            }
            None => self.types.named(id, &[]),
        };
        if let Some(data) = self.named_type_mut(id) {
            data.declared_type = declared;
        }
        trace!(name, ?type_kind, id = id.0, "declared type");
        id
    }

    /// Core-library `System.Int32` and friends map onto the fixed special types.
    fn special_for(&self, container: SymbolId, name: &str) -> Option<SpecialType> {
        if self.origin != Origin::CoreLibrary {
            return None;
        }
        let system = self.symbols.get(container)?;
        if system.container != self.global_namespace || &*self.interner.resolve(system.name) != "System" {
            return None;
        }
        SpecialType::ALL.into_iter().find(|s| s.metadata_name() == name)
    }

    pub fn add_class(&mut self, container: SymbolId, name: &str) -> SymbolId {
        self.declare_type(container, name, TypeKind::Class)
    }

    pub fn add_struct(&mut self, container: SymbolId, name: &str) -> SymbolId {
        self.declare_type(container, name, TypeKind::Struct)
    }

    pub fn add_interface(&mut self, container: SymbolId, name: &str) -> SymbolId {
        self.declare_type(container, name, TypeKind::Interface)
    }

    pub fn add_enum(&mut self, container: SymbolId, name: &str) -> SymbolId {
        self.declare_type(container, name, TypeKind::Enum)
    }

    /// Declare a delegate type together with its `Invoke` method.
    pub fn add_delegate(
        &mut self,
        container: SymbolId,
        name: &str,
        parameters: Vec<Parameter>,
        return_type: TypeId,
    ) -> SymbolId {
        let delegate = self.declare_type(container, name, TypeKind::Delegate);
        let invoke = self.alloc(
            "Invoke",
            SymbolKind::Method(MethodData {
                method_kind: MethodKind::DelegateInvoke,
                parameters,
                return_type,
                type_parameters: Vec::new(),
                overridden: None,
                is_vararg: false,
            }),
            delegate,
        );
        if let Some(data) = self.named_type_mut(delegate) {
            data.delegate_invoke = Some(invoke);
        }
        delegate
    }

    fn named_type_mut(&mut self, id: SymbolId) -> Option<&mut NamedTypeData> {
        match &mut self.symbol_mut(id)?.kind {
            SymbolKind::NamedType(data) => Some(data),
            _ => None,
        }
    }

    /// Give a type or method type parameters; returns them in order.
    pub fn add_type_parameters(&mut self, owner: SymbolId, names: &[&str]) -> Vec<SymbolId> {
        let mut ids = Vec::with_capacity(names.len());
        for (ordinal, name) in names.iter().enumerate() {
            let id = self.alloc_unlisted(
                name,
                SymbolKind::TypeParameter(TypeParameterData {
                    ordinal: ordinal as u32,
                    declared_type: TypeId::ERROR,
                    has_new_constraint: false,
                    has_value_type_constraint: false,
                    has_reference_type_constraint: false,
                }),
                owner,
            );
            let ty = self.types.type_parameter(id);
            if let Some(SymbolKind::TypeParameter(data)) = self.symbol_mut(id).map(|s| &mut s.kind) {
                data.declared_type = ty;
            }
            ids.push(id);
        }
        match self.symbol_mut(owner).map(|s| &mut s.kind) {
            Some(SymbolKind::NamedType(data)) => data.type_parameters.extend(ids.iter().copied()),
            Some(SymbolKind::Method(data)) => data.type_parameters.extend(ids.iter().copied()),
            _ => {}
        }
        if let Some(SymbolKind::NamedType(data)) = self.symbols.get(owner).map(|s| &s.kind) {
            let args: Vec<TypeId> = data
                .type_parameters
                .iter()
                .map(|tp| self.types.type_parameter(*tp))
                .collect();
            let self_type = self.types.named(owner, &args);
            if let Some(data) = self.named_type_mut(owner) {
                data.declared_type = self_type;
            }
        }
        ids
    }

    pub fn set_new_constraint(&mut self, type_parameter: SymbolId) {
        if let Some(SymbolKind::TypeParameter(data)) = self.symbol_mut(type_parameter).map(|s| &mut s.kind) {
            data.has_new_constraint = true;
        }
    }

    pub fn set_value_type_constraint(&mut self, type_parameter: SymbolId) {
        if let Some(SymbolKind::TypeParameter(data)) = self.symbol_mut(type_parameter).map(|s| &mut s.kind) {
            data.has_value_type_constraint = true;
        }
    }

    pub fn set_reference_type_constraint(&mut self, type_parameter: SymbolId) {
        if let Some(SymbolKind::TypeParameter(data)) = self.symbol_mut(type_parameter).map(|s| &mut s.kind) {
            data.has_reference_type_constraint = true;
        }
    }

    pub fn set_base(&mut self, ty: SymbolId, base: TypeId) {
        if let Some(data) = self.named_type_mut(ty) {
            data.base = Some(base);
        }
    }

    pub fn add_interface_impl(&mut self, ty: SymbolId, iface: TypeId) {
        if let Some(data) = self.named_type_mut(ty) {
            data.interfaces.push(iface);
        }
    }

    /// Attach the concrete class that `new I()` creates for interface `iface`.
    pub fn set_coclass(&mut self, iface: SymbolId, class: TypeId) {
        if let Some(data) = self.named_type_mut(iface) {
            data.coclass = Some(class);
        }
    }

    /// The unconstructed type of a type declaration.
    pub fn declared_type(&self, symbol: SymbolId) -> TypeId {
        match self.symbols.get(symbol).map(|s| &s.kind) {
            Some(SymbolKind::NamedType(data)) => data.declared_type,
            Some(SymbolKind::TypeParameter(data)) => data.declared_type,
            _ => TypeId::ERROR,
        }
    }

    /// The declared type of a well-known type, if it has been declared yet.
    pub fn well_known_type(&self, which: WellKnownType) -> Option<TypeId> {
        let mut current = self.global_namespace;
        for part in which.path().split('.') {
            let atom = self.interner.get(part)?;
            current = *self.symbols.get(current)?.members()?.get(&atom)?.first()?;
        }
        Some(self.declared_type(current))
    }

    pub fn construct(&self, symbol: SymbolId, type_args: &[TypeId]) -> TypeId {
        self.types.named(symbol, type_args)
    }

    pub fn array_type(&self, element: TypeId, rank: u32) -> TypeId {
        self.types.array(element, rank)
    }

    pub fn pointer_type(&self, pointee: TypeId) -> TypeId {
        self.types.pointer(pointee)
    }

    pub fn nullable_type(&self, underlying: TypeId) -> TypeId {
        self.types.nullable(underlying)
    }

    // =========================================================================
    // Members
    // =========================================================================

    pub fn add_field(&mut self, container: SymbolId, name: &str, ty: TypeId) -> SymbolId {
        self.alloc(name, SymbolKind::Field(FieldData { ty, constant: None }), container)
    }

    pub fn add_constant(
        &mut self,
        container: SymbolId,
        name: &str,
        ty: TypeId,
        value: ConstantValue,
    ) -> SymbolId {
        let id = self.alloc(
            name,
            SymbolKind::Field(FieldData {
                ty,
                constant: Some(value),
            }),
            container,
        );
        self.add_modifiers(id, SymbolModifiers::CONST | SymbolModifiers::STATIC);
        id
    }

    pub fn add_property(&mut self, container: SymbolId, name: &str, ty: TypeId, has_setter: bool) -> SymbolId {
        self.alloc(
            name,
            SymbolKind::Property(PropertyData {
                ty,
                has_getter: true,
                has_setter,
                parameters: Vec::new(),
                overridden: None,
            }),
            container,
        )
    }

    /// Declare an indexer (`this[...]`), stored under the name `Item`.
    pub fn add_indexer(&mut self, container: SymbolId, ty: TypeId, parameters: Vec<Parameter>, has_setter: bool) -> SymbolId {
        self.alloc(
            "Item",
            SymbolKind::Property(PropertyData {
                ty,
                has_getter: true,
                has_setter,
                parameters,
                overridden: None,
            }),
            container,
        )
    }

    pub fn add_method(
        &mut self,
        container: SymbolId,
        name: &str,
        parameters: Vec<Parameter>,
        return_type: TypeId,
    ) -> SymbolId {
        self.alloc(
            name,
            SymbolKind::Method(MethodData {
                method_kind: MethodKind::Ordinary,
                parameters,
                return_type,
                type_parameters: Vec::new(),
                overridden: None,
                is_vararg: false,
            }),
            container,
        )
    }

    pub fn add_static_method(
        &mut self,
        container: SymbolId,
        name: &str,
        parameters: Vec<Parameter>,
        return_type: TypeId,
    ) -> SymbolId {
        let id = self.add_method(container, name, parameters, return_type);
        self.add_modifiers(id, SymbolModifiers::STATIC);
        id
    }

    /// Declare an extension method; the first parameter is the `this` parameter.
    pub fn add_extension_method(
        &mut self,
        container: SymbolId,
        name: &str,
        parameters: Vec<Parameter>,
        return_type: TypeId,
    ) -> SymbolId {
        let id = self.add_method(container, name, parameters, return_type);
        self.add_modifiers(id, SymbolModifiers::STATIC | SymbolModifiers::EXTENSION);
        id
    }

    pub fn add_constructor(&mut self, container: SymbolId, parameters: Vec<Parameter>) -> SymbolId {
        self.alloc(
            ".ctor",
            SymbolKind::Method(MethodData {
                method_kind: MethodKind::Constructor,
                parameters,
                return_type: TypeId::VOID,
                type_parameters: Vec::new(),
                overridden: None,
                is_vararg: false,
            }),
            container,
        )
    }

    /// Declare `public static implicit/explicit operator to(from)`.
    pub fn add_conversion_operator(&mut self, container: SymbolId, implicit: bool, from: TypeId, to: TypeId) -> SymbolId {
        let name = if implicit { "op_Implicit" } else { "op_Explicit" };
        let value = self.interner.intern("value");
        let id = self.alloc(
            name,
            SymbolKind::Method(MethodData {
                method_kind: MethodKind::Conversion { implicit },
                parameters: vec![Parameter::new(value, from)],
                return_type: to,
                type_parameters: Vec::new(),
                overridden: None,
                is_vararg: false,
            }),
            container,
        );
        self.add_modifiers(id, SymbolModifiers::STATIC);
        id
    }

    /// Record that `member` overrides `base`.
    pub fn set_overridden(&mut self, member: SymbolId, base: SymbolId) {
        if let Some(symbol) = self.symbol_mut(member) {
            symbol.modifiers |= SymbolModifiers::OVERRIDE;
            match &mut symbol.kind {
                SymbolKind::Method(data) => data.overridden = Some(base),
                SymbolKind::Property(data) => data.overridden = Some(base),
                _ => {}
            }
        }
        if let Some(symbol) = self.symbol_mut(base) {
            symbol.modifiers |= SymbolModifiers::VIRTUAL;
        }
    }

    pub fn set_vararg(&mut self, method: SymbolId) {
        if let Some(SymbolKind::Method(data)) = self.symbol_mut(method).map(|s| &mut s.kind) {
            data.is_vararg = true;
        }
    }

    pub fn set_getter(&mut self, property: SymbolId, has_getter: bool) {
        if let Some(SymbolKind::Property(data)) = self.symbol_mut(property).map(|s| &mut s.kind) {
            data.has_getter = has_getter;
        }
    }

    pub fn add_modifiers(&mut self, symbol: SymbolId, modifiers: SymbolModifiers) {
        if let Some(symbol) = self.symbol_mut(symbol) {
            symbol.modifiers |= modifiers;
        }
    }

    pub fn set_accessibility(&mut self, symbol: SymbolId, accessibility: Accessibility) {
        if let Some(symbol) = self.symbol_mut(symbol) {
            symbol.accessibility = accessibility;
        }
    }

    pub fn set_span(&mut self, symbol: SymbolId, span: Span) {
        if let Some(symbol) = self.symbol_mut(symbol) {
            symbol.span = span;
        }
    }

    /// Attach a declaration error that should be reported where the symbol is used.
    pub fn mark_unreported_error(&mut self, symbol: SymbolId, code: u32, args: &[&str]) {
        if let Some(symbol) = self.symbol_mut(symbol) {
            symbol.unreported_error = Some(UnreportedError {
                code,
                args: args.iter().map(|a| (*a).to_string()).collect(),
            });
        }
    }

    // =========================================================================
    // Scopes
    // =========================================================================

    fn scope_mut(&mut self, scope: ScopeId) -> Option<&mut Scope> {
        self.scopes.get_mut(scope)
    }

    pub fn namespace_scope(&mut self, parent: ScopeId, namespace: SymbolId) -> ScopeId {
        self.scopes.alloc(Scope::new(ScopeKind::Namespace(namespace), Some(parent)))
    }

    pub fn type_scope(&mut self, parent: ScopeId, ty: SymbolId) -> ScopeId {
        self.scopes.alloc(Scope::new(ScopeKind::Type(ty), Some(parent)))
    }

    /// Scope of a member body. The member's parameters become locals of the scope.
    pub fn member_scope(&mut self, parent: ScopeId, member: SymbolId) -> ScopeId {
        let mut scope = Scope::new(ScopeKind::Member(member), Some(parent));
        scope.is_static = self.symbols.get(member).is_some_and(Symbol::is_static);
        let id = self.scopes.alloc(scope);
        let parameters: Vec<Parameter> = self
            .symbols
            .get(member)
            .map(|s| s.parameters().to_vec())
            .unwrap_or_default();
        for parameter in parameters {
            let name = self.interner.resolve(parameter.name);
            self.add_parameter(id, &name, parameter.ty, parameter.ref_kind);
        }
        id
    }

    pub fn block_scope(&mut self, parent: ScopeId) -> ScopeId {
        self.scopes.alloc(Scope::new(ScopeKind::Block, Some(parent)))
    }

    pub fn add_using(&mut self, scope: ScopeId, namespace: SymbolId) {
        if let Some(scope) = self.scope_mut(scope) {
            scope.usings.push(namespace);
        }
    }

    pub fn set_unsafe(&mut self, scope: ScopeId) {
        if let Some(scope) = self.scope_mut(scope) {
            scope.is_unsafe = true;
        }
    }

    pub fn set_checked(&mut self, scope: ScopeId) {
        if let Some(scope) = self.scope_mut(scope) {
            scope.is_checked = true;
        }
    }

    pub fn set_static(&mut self, scope: ScopeId) {
        if let Some(scope) = self.scope_mut(scope) {
            scope.is_static = true;
        }
    }

    fn add_scope_local(&mut self, scope: ScopeId, name: &str, kind: SymbolKind) -> SymbolId {
        let atom = self.interner.intern(name);
        let id = self.symbols.alloc(Symbol {
            name: atom,
            kind,
            container: SymbolId::NONE,
            origin: self.origin,
            module: self.module,
            span: Span::DUMMY,
            accessibility: Accessibility::Public,
            modifiers: SymbolModifiers::empty(),
            unreported_error: None,
        });
        if let Some(scope) = self.scope_mut(scope) {
            scope.locals.entry(atom).or_default().push(id);
        }
        id
    }

    pub fn add_local(&mut self, scope: ScopeId, name: &str, ty: TypeId) -> SymbolId {
        self.add_scope_local(scope, name, SymbolKind::Local(LocalData { ty, constant: None }))
    }

    pub fn add_local_constant(&mut self, scope: ScopeId, name: &str, ty: TypeId, value: ConstantValue) -> SymbolId {
        let id = self.add_scope_local(
            scope,
            name,
            SymbolKind::Local(LocalData {
                ty,
                constant: Some(value),
            }),
        );
        self.add_modifiers(id, SymbolModifiers::CONST);
        id
    }

    pub fn add_parameter(&mut self, scope: ScopeId, name: &str, ty: TypeId, ref_kind: RefKind) -> SymbolId {
        self.add_scope_local(scope, name, SymbolKind::Parameter { ty, ref_kind })
    }

    pub fn add_range_variable(&mut self, scope: ScopeId, name: &str, ty: TypeId) -> SymbolId {
        self.add_scope_local(scope, name, SymbolKind::RangeVariable { ty })
    }

    pub fn add_label(&mut self, scope: ScopeId, name: &str) -> SymbolId {
        self.add_scope_local(scope, name, SymbolKind::Label)
    }

    // =========================================================================
    // Core library
    // =========================================================================

    /// Declare the subset of the core library the binder relies on:
    /// `System.Object` and the other special types, `System.Array`,
    /// `System.Type`, `System.ValueType`, `System.Enum`, `System.Delegate` and
    /// `System.Collections.IEnumerable`.
    pub fn with_core_library(&mut self) -> &mut Self {
        let (saved_origin, saved_module) = (self.origin, self.module);
        self.set_origin(Origin::CoreLibrary, "mscorlib");

        let system = self.namespace("System");
        let collections = self.namespace("System.Collections");
        let enumerable = self.add_interface(collections, "IEnumerable");
        let enumerable_ty = self.declared_type(enumerable);

        for special in SpecialType::ALL {
            let kind = match special {
                SpecialType::Object | SpecialType::String => TypeKind::Class,
                _ => TypeKind::Struct,
            };
            self.declare_type(system, special.metadata_name(), kind);
        }
        let value_type = self.add_class(system, "ValueType");
        self.add_modifiers(value_type, SymbolModifiers::ABSTRACT);
        let enum_type = self.add_class(system, "Enum");
        self.add_modifiers(enum_type, SymbolModifiers::ABSTRACT);
        self.set_base(enum_type, self.declared_type(value_type));
        let delegate = self.add_class(system, "Delegate");
        self.add_modifiers(delegate, SymbolModifiers::ABSTRACT);
        self.add_class(system, "Type");

        let array = self.add_class(system, "Array");
        self.add_modifiers(array, SymbolModifiers::ABSTRACT);
        self.add_interface_impl(array, enumerable_ty);
        self.add_property(array, "Length", TypeId::INT, false);
        self.add_property(array, "Rank", TypeId::INT, false);

        if let Some(string) = self.special_symbols.get(&SpecialType::String).copied() {
            self.add_interface_impl(string, enumerable_ty);
            self.add_property(string, "Length", TypeId::INT, false);
        }
        let value_type_ty = self.declared_type(value_type);
        for special in SpecialType::ALL {
            if special.is_value_type() {
                if let Some(symbol) = self.special_symbols.get(&special).copied() {
                    self.set_base(symbol, value_type_ty);
                }
            }
        }
        let int_symbol = self.special_symbols.get(&SpecialType::Int32).copied();
        if let Some(int_symbol) = int_symbol {
            self.add_constant(int_symbol, "MaxValue", TypeId::INT, ConstantValue::Integral(i32::MAX as i128));
            self.add_constant(int_symbol, "MinValue", TypeId::INT, ConstantValue::Integral(i32::MIN as i128));
        }

        self.origin = saved_origin;
        self.module = saved_module;
        self
    }

    /// Freeze the declarations.
    pub fn build(self) -> Compilation {
        let mut compilation = Compilation {
            interner: self.interner,
            symbols: self.symbols,
            types: self.types,
            scopes: self.scopes,
            global_namespace: self.global_namespace,
            global_scope: self.global_scope,
            special_symbols: self.special_symbols,
            well_known: FxHashMap::default(),
        };
        for which in WellKnownType::ALL {
            if let Some(symbol) = compilation.lookup_qualified(which.path()) {
                compilation.well_known.insert(which, symbol);
            }
        }
        debug!(
            symbols = compilation.symbols.len(),
            scopes = compilation.scopes.len(),
            well_known = compilation.well_known.len(),
            "compilation built"
        );
        compilation
    }
}

fn members_mut(symbol: &mut Symbol) -> Option<&mut crate::symbol::MemberMap> {
    match &mut symbol.kind {
        SymbolKind::Namespace(data) => Some(&mut data.members),
        SymbolKind::NamedType(data) => Some(&mut data.members),
        _ => None,
    }
}

#[cfg(test)]
#[path = "../tests/compilation_tests.rs"]
mod tests;
