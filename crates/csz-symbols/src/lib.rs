//! Symbol table, scopes and type interner for the csz binder.
//!
//! This crate is the declaration-space collaborator of the binder:
//! - `Symbol` / `SymbolKind` - declared entities as a closed tagged variant
//! - `TypeInterner` / `TypeId` - structural types interned into handles
//! - `ScopeArena` / `ScopeId` - lexical scopes with index-based parent links
//! - `Compilation` - the frozen, thread-shareable result of `CompilationBuilder`

pub mod special;
pub use special::SpecialType;

pub mod constant;
pub use constant::ConstantValue;

pub mod symbol;
pub use symbol::{
    Accessibility, FieldData, LocalData, MemberMap, MethodData, MethodKind, NamedTypeData,
    NamespaceData, Origin, Parameter, PropertyData, RefKind, Symbol, SymbolId, SymbolKind,
    SymbolModifiers, TypeKind, TypeParameterData, UnreportedError,
};

pub mod types;
pub use types::{TypeData, TypeId, TypeInterner};

pub mod scope;
pub use scope::{Scope, ScopeArena, ScopeId, ScopeKind};

pub mod compilation;
pub use compilation::{Compilation, SymbolTable, WellKnownType};

pub mod builder;
pub use builder::CompilationBuilder;
