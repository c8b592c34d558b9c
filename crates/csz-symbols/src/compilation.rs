//! A frozen compilation: symbols, types and scopes.
//!
//! Everything here is read-only except the type interner, which accepts new
//! structural types concurrently. A `&Compilation` can be shared by every
//! thread that binds expressions of this compilation.

use crate::scope::{Scope, ScopeArena, ScopeId};
use crate::special::SpecialType;
use crate::symbol::{
    Accessibility, NamedTypeData, Parameter, Symbol, SymbolId, SymbolKind, TypeKind,
};
use crate::types::{TypeData, TypeId, TypeInterner};
use csz_common::limits::{MAX_BASE_CHAIN_WALK, MAX_OVERRIDE_CHAIN_WALK};
use csz_common::{Atom, Interner};
use rustc_hash::{FxHashMap, FxHashSet};
use std::sync::Arc;

/// Flat symbol storage addressed by [`SymbolId`].
#[derive(Clone, Debug, Default)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
}

impl SymbolTable {
    pub(crate) fn alloc(&mut self, symbol: Symbol) -> SymbolId {
        let id = SymbolId(self.symbols.len() as u32);
        self.symbols.push(symbol);
        id
    }

    pub fn get(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(id.0 as usize)
    }

    pub(crate) fn get_mut(&mut self, id: SymbolId) -> Option<&mut Symbol> {
        self.symbols.get_mut(id.0 as usize)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// Library types the binder needs by name rather than by keyword.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WellKnownType {
    SystemArray,
    SystemType,
    SystemValueType,
    SystemEnum,
    SystemDelegate,
    SystemCollectionsIEnumerable,
}

impl WellKnownType {
    pub const ALL: [WellKnownType; 6] = [
        WellKnownType::SystemArray,
        WellKnownType::SystemType,
        WellKnownType::SystemValueType,
        WellKnownType::SystemEnum,
        WellKnownType::SystemDelegate,
        WellKnownType::SystemCollectionsIEnumerable,
    ];

    pub fn path(self) -> &'static str {
        match self {
            WellKnownType::SystemArray => "System.Array",
            WellKnownType::SystemType => "System.Type",
            WellKnownType::SystemValueType => "System.ValueType",
            WellKnownType::SystemEnum => "System.Enum",
            WellKnownType::SystemDelegate => "System.Delegate",
            WellKnownType::SystemCollectionsIEnumerable => "System.Collections.IEnumerable",
        }
    }
}

pub struct Compilation {
    pub(crate) interner: Interner,
    pub(crate) symbols: SymbolTable,
    pub(crate) types: TypeInterner,
    pub(crate) scopes: ScopeArena,
    pub(crate) global_namespace: SymbolId,
    pub(crate) global_scope: ScopeId,
    pub(crate) special_symbols: FxHashMap<SpecialType, SymbolId>,
    pub(crate) well_known: FxHashMap<WellKnownType, SymbolId>,
}

impl Compilation {
    pub fn interner(&self) -> &Interner {
        &self.interner
    }

    pub fn types(&self) -> &TypeInterner {
        &self.types
    }

    pub fn scopes(&self) -> &ScopeArena {
        &self.scopes
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn global_namespace(&self) -> SymbolId {
        self.global_namespace
    }

    pub fn global_scope(&self) -> ScopeId {
        self.global_scope
    }

    pub fn scope(&self, id: ScopeId) -> Option<&Scope> {
        self.scopes.get(id)
    }

    /// The symbol behind `id`. Ids always come from this compilation.
    pub fn symbol(&self, id: SymbolId) -> &Symbol {
        &self.symbols.symbols[id.0 as usize]
    }

    pub fn name(&self, id: SymbolId) -> Arc<str> {
        self.interner.resolve(self.symbol(id).name)
    }

    /// Members of a namespace or type named `name`.
    pub fn members_named(&self, container: SymbolId, name: Atom) -> &[SymbolId] {
        self.symbols
            .get(container)
            .and_then(Symbol::members)
            .and_then(|members| members.get(&name))
            .map_or(&[], |ids| ids.as_slice())
    }

    /// Every member of a namespace or type, in declaration order.
    pub fn all_members(&self, container: SymbolId) -> impl Iterator<Item = SymbolId> + '_ {
        self.symbols
            .get(container)
            .and_then(Symbol::members)
            .into_iter()
            .flat_map(|members| members.values().flat_map(|ids| ids.iter().copied()))
    }

    /// Resolve a dotted path (`System.Collections.IEnumerable`) from the global namespace.
    pub fn lookup_qualified(&self, path: &str) -> Option<SymbolId> {
        let mut current = self.global_namespace;
        for part in path.split('.') {
            let atom = self.interner.get(part)?;
            current = *self.members_named(current, atom).first()?;
        }
        Some(current)
    }

    // =========================================================================
    // Type queries
    // =========================================================================

    pub fn type_data(&self, ty: TypeId) -> TypeData {
        self.types.lookup(ty).unwrap_or(TypeData::Error {
            name: Atom::NONE,
            candidates: Arc::from([]),
        })
    }

    pub fn special_type_symbol(&self, special: SpecialType) -> Option<SymbolId> {
        self.special_symbols.get(&special).copied()
    }

    pub fn well_known_type(&self, which: WellKnownType) -> Option<TypeId> {
        let symbol = *self.well_known.get(&which)?;
        self.declared_type(symbol)
    }

    /// The unconstructed type declared by a type or type-parameter symbol.
    pub fn declared_type(&self, symbol: SymbolId) -> Option<TypeId> {
        match &self.symbols.get(symbol)?.kind {
            SymbolKind::NamedType(data) => Some(data.declared_type),
            SymbolKind::TypeParameter(data) => Some(data.declared_type),
            _ => None,
        }
    }

    /// The declaring symbol of a named, special or type-parameter type.
    pub fn type_symbol(&self, ty: TypeId) -> Option<SymbolId> {
        match self.type_data(ty) {
            TypeData::Named { symbol, .. } | TypeData::TypeParameter(symbol) => Some(symbol),
            TypeData::Special(special) => self.special_type_symbol(special),
            _ => None,
        }
    }

    fn named_type_data(&self, ty: TypeId) -> Option<&NamedTypeData> {
        let symbol = self.type_symbol(ty)?;
        match &self.symbol(symbol).kind {
            SymbolKind::NamedType(data) => Some(data),
            _ => None,
        }
    }

    pub fn type_kind(&self, ty: TypeId) -> Option<TypeKind> {
        match self.type_data(ty) {
            TypeData::Special(SpecialType::Object | SpecialType::String) => Some(TypeKind::Class),
            TypeData::Special(_) => Some(TypeKind::Struct),
            TypeData::Named { .. } => self.named_type_data(ty).map(|data| data.type_kind),
            _ => None,
        }
    }

    pub fn is_error_type(&self, ty: TypeId) -> bool {
        matches!(self.type_data(ty), TypeData::Error { .. })
    }

    pub fn is_dynamic(&self, ty: TypeId) -> bool {
        ty == TypeId::DYNAMIC
    }

    pub fn is_interface(&self, ty: TypeId) -> bool {
        self.type_kind(ty) == Some(TypeKind::Interface)
    }

    pub fn is_delegate_type(&self, ty: TypeId) -> bool {
        self.type_kind(ty) == Some(TypeKind::Delegate)
    }

    pub fn is_enum(&self, ty: TypeId) -> bool {
        self.type_kind(ty) == Some(TypeKind::Enum)
    }

    pub fn is_reference_type(&self, ty: TypeId) -> bool {
        match self.type_data(ty) {
            TypeData::Dynamic | TypeData::Array { .. } => true,
            TypeData::TypeParameter(symbol) => match &self.symbol(symbol).kind {
                SymbolKind::TypeParameter(data) => data.has_reference_type_constraint,
                _ => false,
            },
            TypeData::Special(special) => !special.is_value_type() && special != SpecialType::Void,
            TypeData::Named { .. } => matches!(
                self.type_kind(ty),
                Some(TypeKind::Class | TypeKind::Interface | TypeKind::Delegate)
            ),
            _ => false,
        }
    }

    pub fn is_value_type(&self, ty: TypeId) -> bool {
        match self.type_data(ty) {
            TypeData::Nullable(_) => true,
            TypeData::TypeParameter(symbol) => match &self.symbol(symbol).kind {
                SymbolKind::TypeParameter(data) => data.has_value_type_constraint,
                _ => false,
            },
            TypeData::Special(special) => special.is_value_type(),
            TypeData::Named { .. } => {
                matches!(self.type_kind(ty), Some(TypeKind::Struct | TypeKind::Enum))
            }
            _ => false,
        }
    }

    /// A value type that cannot hold `null`.
    pub fn is_non_nullable_value_type(&self, ty: TypeId) -> bool {
        self.is_value_type(ty) && !matches!(self.type_data(ty), TypeData::Nullable(_))
    }

    pub fn nullable_underlying(&self, ty: TypeId) -> Option<TypeId> {
        match self.type_data(ty) {
            TypeData::Nullable(underlying) => Some(underlying),
            _ => None,
        }
    }

    /// Element type and rank of an array type.
    pub fn array_info(&self, ty: TypeId) -> Option<(TypeId, u32)> {
        match self.type_data(ty) {
            TypeData::Array { element, rank } => Some((element, rank)),
            _ => None,
        }
    }

    /// Whether `ty` is or contains a pointer type.
    pub fn contains_pointer(&self, ty: TypeId) -> bool {
        match self.type_data(ty) {
            TypeData::Pointer(_) => true,
            TypeData::Array { element, .. } => self.contains_pointer(element),
            TypeData::Nullable(inner) => self.contains_pointer(inner),
            _ => false,
        }
    }

    pub fn is_static_class(&self, ty: TypeId) -> bool {
        self.type_symbol(ty)
            .is_some_and(|s| self.symbol(s).is_static() && self.type_kind(ty) == Some(TypeKind::Class))
    }

    /// The `Invoke` method of a delegate type.
    pub fn delegate_invoke(&self, ty: TypeId) -> Option<SymbolId> {
        self.named_type_data(ty).and_then(|data| data.delegate_invoke)
    }

    /// Type parameters and arguments of a constructed generic type.
    pub fn type_substitution(&self, ty: TypeId) -> Option<(Vec<SymbolId>, Arc<[TypeId]>)> {
        match self.type_data(ty) {
            TypeData::Named { symbol, type_args } if !type_args.is_empty() => {
                match &self.symbol(symbol).kind {
                    SymbolKind::NamedType(data) => Some((data.type_parameters.clone(), type_args)),
                    _ => None,
                }
            }
            _ => None,
        }
    }

    /// Replace each type parameter in `params` with the matching entry of `args`.
    pub fn substitute(&self, ty: TypeId, params: &[SymbolId], args: &[TypeId]) -> TypeId {
        if params.is_empty() {
            return ty;
        }
        match self.type_data(ty) {
            TypeData::TypeParameter(symbol) => params
                .iter()
                .position(|p| *p == symbol)
                .and_then(|index| args.get(index).copied())
                .unwrap_or(ty),
            TypeData::Named { symbol, type_args } => {
                let mapped: Vec<TypeId> = type_args
                    .iter()
                    .map(|arg| self.substitute(*arg, params, args))
                    .collect();
                self.types.named(symbol, &mapped)
            }
            TypeData::Array { element, rank } => {
                self.types.array(self.substitute(element, params, args), rank)
            }
            TypeData::Pointer(inner) => self.types.pointer(self.substitute(inner, params, args)),
            TypeData::Nullable(inner) => self.types.nullable(self.substitute(inner, params, args)),
            _ => ty,
        }
    }

    /// Substitute the type arguments of `receiver` into `ty`.
    pub fn substitute_for_receiver(&self, ty: TypeId, receiver: Option<TypeId>) -> TypeId {
        match receiver.and_then(|r| self.type_substitution(r)) {
            Some((params, args)) => self.substitute(ty, &params, &args),
            None => ty,
        }
    }

    /// Type of a value member as seen through `receiver`.
    pub fn member_type(&self, member: SymbolId, receiver: Option<TypeId>) -> TypeId {
        let declared = self.symbol(member).value_type().unwrap_or(TypeId::ERROR);
        self.substitute_for_receiver(declared, receiver)
    }

    /// Parameters of a member as seen through `receiver`.
    pub fn member_parameters(&self, member: SymbolId, receiver: Option<TypeId>) -> Vec<Parameter> {
        self.symbol(member)
            .parameters()
            .iter()
            .map(|p| Parameter {
                ty: self.substitute_for_receiver(p.ty, receiver),
                ..p.clone()
            })
            .collect()
    }

    /// Base class of `ty`, following the implicit bases of structs, enums,
    /// delegates and arrays.
    pub fn base_type(&self, ty: TypeId) -> Option<TypeId> {
        let fallback = |which: WellKnownType| self.well_known_type(which).or(Some(TypeId::OBJECT));
        match self.type_data(ty) {
            TypeData::Special(SpecialType::Object) => None,
            TypeData::Special(special) => {
                let declared = self
                    .special_type_symbol(special)
                    .and_then(|s| match &self.symbol(s).kind {
                        SymbolKind::NamedType(data) => data.base,
                        _ => None,
                    });
                declared.or_else(|| {
                    if special.is_value_type() {
                        fallback(WellKnownType::SystemValueType)
                    } else {
                        Some(TypeId::OBJECT)
                    }
                })
            }
            TypeData::Named { symbol, type_args } => {
                let SymbolKind::NamedType(data) = &self.symbol(symbol).kind else {
                    return None;
                };
                if let Some(base) = data.base {
                    return Some(self.substitute(base, &data.type_parameters, &type_args));
                }
                match data.type_kind {
                    TypeKind::Interface => None,
                    TypeKind::Class => Some(TypeId::OBJECT),
                    TypeKind::Struct => fallback(WellKnownType::SystemValueType),
                    TypeKind::Enum => fallback(WellKnownType::SystemEnum),
                    TypeKind::Delegate => fallback(WellKnownType::SystemDelegate),
                }
            }
            TypeData::Array { .. } => fallback(WellKnownType::SystemArray),
            TypeData::Nullable(_) => fallback(WellKnownType::SystemValueType),
            TypeData::TypeParameter(_) => Some(TypeId::OBJECT),
            _ => None,
        }
    }

    /// `ty` followed by its base types, nearest first.
    pub fn base_chain(&self, ty: TypeId) -> Vec<TypeId> {
        let mut chain = vec![ty];
        let mut current = ty;
        while chain.len() < MAX_BASE_CHAIN_WALK {
            match self.base_type(current) {
                Some(base) if !chain.contains(&base) => {
                    chain.push(base);
                    current = base;
                }
                _ => break,
            }
        }
        chain
    }

    /// Whether `base` is a proper base class of `ty`.
    pub fn is_derived_from(&self, ty: TypeId, base: TypeId) -> bool {
        ty != base && self.base_chain(ty).contains(&base)
    }

    /// Every interface `ty` implements, directly or through bases and
    /// interface inheritance.
    pub fn all_interfaces(&self, ty: TypeId) -> Vec<TypeId> {
        let mut seen = FxHashSet::default();
        let mut result = Vec::new();
        let mut pending: Vec<TypeId> = Vec::new();
        for t in self.base_chain(ty) {
            pending.extend(self.declared_interfaces(t));
        }
        if matches!(self.type_data(ty), TypeData::Array { .. }) {
            pending.extend(self.well_known_type(WellKnownType::SystemCollectionsIEnumerable));
        }
        while let Some(iface) = pending.pop() {
            if result.len() >= MAX_BASE_CHAIN_WALK || !seen.insert(iface) {
                continue;
            }
            result.push(iface);
            pending.extend(self.declared_interfaces(iface));
        }
        result
    }

    fn declared_interfaces(&self, ty: TypeId) -> Vec<TypeId> {
        let Some(symbol) = self.type_symbol(ty) else {
            return Vec::new();
        };
        let SymbolKind::NamedType(data) = &self.symbol(symbol).kind else {
            return Vec::new();
        };
        let args = match self.type_data(ty) {
            TypeData::Named { type_args, .. } => type_args,
            _ => Arc::from([]),
        };
        data.interfaces
            .iter()
            .map(|i| self.substitute(*i, &data.type_parameters, &args))
            .collect()
    }

    pub fn implements(&self, ty: TypeId, iface: TypeId) -> bool {
        ty == iface || self.all_interfaces(ty).contains(&iface)
    }

    // =========================================================================
    // Member queries
    // =========================================================================

    /// The original declaration of a virtual member.
    pub fn least_overridden(&self, member: SymbolId) -> SymbolId {
        let mut current = member;
        for _ in 0..MAX_OVERRIDE_CHAIN_WALK {
            match self.symbol(current).overridden() {
                Some(next) if next != current => current = next,
                _ => break,
            }
        }
        current
    }

    /// Whether `member` overrides `base`, directly or through intermediate overrides.
    pub fn overrides(&self, member: SymbolId, base: SymbolId) -> bool {
        let mut current = member;
        for _ in 0..MAX_OVERRIDE_CHAIN_WALK {
            match self.symbol(current).overridden() {
                Some(next) if next == base => return true,
                Some(next) if next != current => current = next,
                _ => return false,
            }
        }
        false
    }

    /// Nearest enclosing type of a symbol (the symbol itself excluded).
    pub fn containing_type(&self, symbol: SymbolId) -> Option<SymbolId> {
        let mut current = self.symbol(symbol).container;
        while !current.is_none() {
            let container = self.symbol(current);
            if matches!(container.kind, SymbolKind::NamedType(_)) {
                return Some(current);
            }
            current = container.container;
        }
        None
    }

    /// Whether `inner` is `outer` or nested inside it.
    fn is_within(&self, inner: SymbolId, outer: SymbolId) -> bool {
        let mut current = inner;
        for _ in 0..MAX_BASE_CHAIN_WALK {
            if current == outer {
                return true;
            }
            if current.is_none() {
                return false;
            }
            current = self.symbol(current).container;
        }
        false
    }

    /// Whether code inside `from` (a type, or `None` for top-level code) may
    /// reference `member`.
    pub fn is_accessible(&self, member: SymbolId, from: Option<SymbolId>) -> bool {
        let symbol = self.symbol(member);
        match symbol.accessibility {
            Accessibility::Public => true,
            Accessibility::Internal => symbol.origin.is_source(),
            Accessibility::Private => {
                let owner = symbol.container;
                from.is_some_and(|f| self.is_within(f, owner))
            }
            Accessibility::Protected => {
                let Some(owner_ty) = self.declared_type(symbol.container) else {
                    return false;
                };
                let mut current = from;
                while let Some(f) = current {
                    if let Some(from_ty) = self.declared_type(f) {
                        if from_ty == owner_ty || self.is_derived_from(from_ty, owner_ty) {
                            return true;
                        }
                    }
                    current = self.containing_type(f);
                }
                false
            }
        }
    }

    // =========================================================================
    // Display
    // =========================================================================

    /// Dotted name of a symbol without the global namespace.
    pub fn qualified_name(&self, id: SymbolId) -> String {
        let mut parts = Vec::new();
        let mut current = id;
        for _ in 0..MAX_BASE_CHAIN_WALK {
            if current.is_none() || current == self.global_namespace {
                break;
            }
            let symbol = self.symbol(current);
            parts.push(self.interner.resolve(symbol.name));
            if !matches!(symbol.kind, SymbolKind::Namespace(_) | SymbolKind::NamedType(_)) {
                break;
            }
            current = symbol.container;
        }
        parts.reverse();
        parts.join(".")
    }

    pub fn display_type(&self, ty: TypeId) -> String {
        match self.type_data(ty) {
            TypeData::Error { name, .. } => {
                if name.is_none() {
                    "?".to_string()
                } else {
                    self.interner.resolve(name).to_string()
                }
            }
            TypeData::Null => "<null>".to_string(),
            TypeData::Dynamic => "dynamic".to_string(),
            TypeData::MethodGroup => "method group".to_string(),
            TypeData::Namespace => "namespace".to_string(),
            TypeData::Special(special) => special.keyword().to_string(),
            TypeData::Named { symbol, type_args } => {
                let mut text = self.qualified_name(symbol);
                if !type_args.is_empty() {
                    let args: Vec<String> = type_args.iter().map(|a| self.display_type(*a)).collect();
                    text.push('<');
                    text.push_str(&args.join(", "));
                    text.push('>');
                }
                text
            }
            TypeData::TypeParameter(symbol) => self.name(symbol).to_string(),
            TypeData::Array { element, rank } => {
                let commas = ",".repeat(rank.saturating_sub(1) as usize);
                format!("{}[{commas}]", self.display_type(element))
            }
            TypeData::Pointer(inner) => format!("{}*", self.display_type(inner)),
            TypeData::Nullable(inner) => format!("{}?", self.display_type(inner)),
        }
    }

    pub fn display_symbol(&self, id: SymbolId) -> String {
        let symbol = self.symbol(id);
        let owner = || {
            let container = symbol.container;
            if container.is_none() || container == self.global_namespace {
                String::new()
            } else {
                format!("{}.", self.qualified_name(container))
            }
        };
        let params = |parameters: &[Parameter]| {
            parameters
                .iter()
                .map(|p| {
                    let ty = self.display_type(p.ty);
                    match p.ref_kind.keyword() {
                        "" if p.is_params => format!("params {ty}"),
                        "" => ty,
                        keyword => format!("{keyword} {ty}"),
                    }
                })
                .collect::<Vec<_>>()
                .join(", ")
        };
        match &symbol.kind {
            SymbolKind::Namespace(_) | SymbolKind::NamedType(_) => self.qualified_name(id),
            SymbolKind::Method(data) => {
                let name = match data.method_kind {
                    crate::symbol::MethodKind::Constructor => self.name(symbol.container),
                    _ => self.name(id),
                };
                format!("{}{name}({})", owner(), params(&data.parameters))
            }
            SymbolKind::Property(data) if !data.parameters.is_empty() => {
                format!("{}this[{}]", owner(), params(&data.parameters))
            }
            SymbolKind::Field(_) | SymbolKind::Property(_) => format!("{}{}", owner(), self.name(id)),
            _ => self.name(id).to_string(),
        }
    }
}
