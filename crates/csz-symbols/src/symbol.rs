//! Symbols: declared entities addressed by [`SymbolId`].
//!
//! A symbol is a closed tagged variant ([`SymbolKind`]); code that needs a
//! field's type or a method's parameters matches on the kind instead of
//! downcasting.

use crate::constant::ConstantValue;
use crate::types::TypeId;
use bitflags::bitflags;
use csz_common::{Atom, Span};
use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use serde::Serialize;
use smallvec::SmallVec;

/// Handle to a symbol in a [`crate::SymbolTable`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SymbolId(pub u32);

impl SymbolId {
    pub const NONE: SymbolId = SymbolId(u32::MAX);

    #[inline]
    pub fn is_none(self) -> bool {
        self == Self::NONE
    }
}

/// Where a declaration comes from. Later variants rank higher when two
/// equally named declarations compete.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Origin {
    /// The core/runtime library (`System.Object` lives here).
    CoreLibrary,
    /// Any other referenced library.
    Referenced,
    /// Another module of the compilation being bound.
    AddedModule,
    /// The primary module of the compilation being bound.
    PrimaryModule,
}

impl Origin {
    /// Declared in the compilation itself rather than imported.
    pub fn is_source(self) -> bool {
        self >= Origin::AddedModule
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub enum Accessibility {
    #[default]
    Public,
    Internal,
    Protected,
    Private,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub enum RefKind {
    #[default]
    None,
    Ref,
    Out,
    In,
}

impl RefKind {
    pub fn keyword(self) -> &'static str {
        match self {
            RefKind::None => "",
            RefKind::Ref => "ref",
            RefKind::Out => "out",
            RefKind::In => "in",
        }
    }
}

bitflags! {
    /// Declaration modifiers.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct SymbolModifiers: u16 {
        const STATIC = 1 << 0;
        const READONLY = 1 << 1;
        const CONST = 1 << 2;
        const ABSTRACT = 1 << 3;
        const VIRTUAL = 1 << 4;
        const OVERRIDE = 1 << 5;
        const SEALED = 1 << 6;
        const EXTENSION = 1 << 7;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum TypeKind {
    Class,
    Struct,
    Interface,
    Enum,
    Delegate,
}

impl TypeKind {
    pub fn description(self) -> &'static str {
        match self {
            TypeKind::Class => "class",
            TypeKind::Struct => "struct",
            TypeKind::Interface => "interface",
            TypeKind::Enum => "enum",
            TypeKind::Delegate => "delegate",
        }
    }
}

/// A formal parameter of a method, constructor, indexer or delegate.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Parameter {
    pub name: Atom,
    pub ty: TypeId,
    pub ref_kind: RefKind,
    /// Trailing `params T[]` parameter.
    pub is_params: bool,
    pub has_default: bool,
}

impl Parameter {
    pub fn new(name: Atom, ty: TypeId) -> Self {
        Parameter {
            name,
            ty,
            ref_kind: RefKind::None,
            is_params: false,
            has_default: false,
        }
    }

    #[must_use]
    pub fn with_ref_kind(mut self, ref_kind: RefKind) -> Self {
        self.ref_kind = ref_kind;
        self
    }

    #[must_use]
    pub fn params(mut self) -> Self {
        self.is_params = true;
        self
    }

    #[must_use]
    pub fn optional(mut self) -> Self {
        self.has_default = true;
        self
    }
}

/// Members of a namespace or type, grouped by name in declaration order.
pub type MemberMap = IndexMap<Atom, SmallVec<[SymbolId; 2]>, FxBuildHasher>;

#[derive(Clone, Debug, Default)]
pub struct NamespaceData {
    pub members: MemberMap,
}

#[derive(Clone, Debug)]
pub struct NamedTypeData {
    pub type_kind: TypeKind,
    /// The unconstructed type (`List<T>` with its own type parameters).
    pub declared_type: TypeId,
    pub type_parameters: Vec<SymbolId>,
    pub base: Option<TypeId>,
    pub interfaces: Vec<TypeId>,
    pub members: MemberMap,
    /// Concrete class instantiated by `new I()` for an interface.
    pub coclass: Option<TypeId>,
    /// The `Invoke` method of a delegate type.
    pub delegate_invoke: Option<SymbolId>,
}

#[derive(Clone, Debug)]
pub struct TypeParameterData {
    pub ordinal: u32,
    pub declared_type: TypeId,
    pub has_new_constraint: bool,
    pub has_value_type_constraint: bool,
    pub has_reference_type_constraint: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MethodKind {
    Ordinary,
    Constructor,
    DelegateInvoke,
    /// `op_Implicit` / `op_Explicit`.
    Conversion { implicit: bool },
}

#[derive(Clone, Debug)]
pub struct MethodData {
    pub method_kind: MethodKind,
    pub parameters: Vec<Parameter>,
    pub return_type: TypeId,
    pub type_parameters: Vec<SymbolId>,
    /// The member this one overrides.
    pub overridden: Option<SymbolId>,
    /// Accepts a trailing `__arglist`.
    pub is_vararg: bool,
}

#[derive(Clone, Debug)]
pub struct FieldData {
    pub ty: TypeId,
    pub constant: Option<ConstantValue>,
}

#[derive(Clone, Debug)]
pub struct PropertyData {
    pub ty: TypeId,
    pub has_getter: bool,
    pub has_setter: bool,
    /// Non-empty for indexers.
    pub parameters: Vec<Parameter>,
    pub overridden: Option<SymbolId>,
}

#[derive(Clone, Debug)]
pub struct LocalData {
    pub ty: TypeId,
    pub constant: Option<ConstantValue>,
}

#[derive(Clone, Debug)]
pub enum SymbolKind {
    Namespace(NamespaceData),
    NamedType(NamedTypeData),
    TypeParameter(TypeParameterData),
    Method(MethodData),
    Field(FieldData),
    Property(PropertyData),
    Local(LocalData),
    Parameter { ty: TypeId, ref_kind: RefKind },
    RangeVariable { ty: TypeId },
    Label,
}

impl SymbolKind {
    /// Ordinal used to sort candidates deterministically.
    pub fn ordinal(&self) -> u8 {
        match self {
            SymbolKind::Namespace(_) => 0,
            SymbolKind::NamedType(_) => 1,
            SymbolKind::TypeParameter(_) => 2,
            SymbolKind::Method(_) => 3,
            SymbolKind::Field(_) => 4,
            SymbolKind::Property(_) => 5,
            SymbolKind::Local(_) => 6,
            SymbolKind::Parameter { .. } => 7,
            SymbolKind::RangeVariable { .. } => 8,
            SymbolKind::Label => 9,
        }
    }

    /// Word used for the symbol kind in diagnostics (`'X' is a namespace ...`).
    pub fn description(&self) -> &'static str {
        match self {
            SymbolKind::Namespace(_) => "namespace",
            SymbolKind::NamedType(data) => data.type_kind.description(),
            SymbolKind::TypeParameter(_) => "type parameter",
            SymbolKind::Method(_) => "method",
            SymbolKind::Field(_) => "field",
            SymbolKind::Property(_) => "property",
            SymbolKind::Local(_) => "variable",
            SymbolKind::Parameter { .. } => "parameter",
            SymbolKind::RangeVariable { .. } => "range variable",
            SymbolKind::Label => "label",
        }
    }
}

/// A diagnostic attached to a declaration that has not been reported yet
/// (e.g. a cyclic base list). It is raised where the symbol is used.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnreportedError {
    pub code: u32,
    pub args: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct Symbol {
    pub name: Atom,
    pub kind: SymbolKind,
    /// Enclosing namespace or type; `NONE` for the global namespace.
    pub container: SymbolId,
    pub origin: Origin,
    /// Source file or library the declaration comes from.
    pub module: Atom,
    pub span: Span,
    pub accessibility: Accessibility,
    pub modifiers: SymbolModifiers,
    pub unreported_error: Option<UnreportedError>,
}

impl Symbol {
    pub fn is_static(&self) -> bool {
        self.modifiers.contains(SymbolModifiers::STATIC)
    }

    pub fn is_abstract(&self) -> bool {
        self.modifiers.contains(SymbolModifiers::ABSTRACT)
    }

    pub fn is_readonly(&self) -> bool {
        self.modifiers.contains(SymbolModifiers::READONLY)
    }

    pub fn is_extension(&self) -> bool {
        self.modifiers.contains(SymbolModifiers::EXTENSION)
    }

    pub fn is_namespace(&self) -> bool {
        matches!(self.kind, SymbolKind::Namespace(_))
    }

    pub fn is_type(&self) -> bool {
        matches!(self.kind, SymbolKind::NamedType(_) | SymbolKind::TypeParameter(_))
    }

    pub fn is_method(&self) -> bool {
        matches!(self.kind, SymbolKind::Method(_))
    }

    /// Instance-vs-static only matters for type members.
    pub fn is_member(&self) -> bool {
        matches!(
            self.kind,
            SymbolKind::Method(_) | SymbolKind::Field(_) | SymbolKind::Property(_)
        )
    }

    /// Number of type parameters (generic arity).
    pub fn arity(&self) -> usize {
        match &self.kind {
            SymbolKind::NamedType(data) => data.type_parameters.len(),
            SymbolKind::Method(data) => data.type_parameters.len(),
            _ => 0,
        }
    }

    pub fn members(&self) -> Option<&MemberMap> {
        match &self.kind {
            SymbolKind::Namespace(data) => Some(&data.members),
            SymbolKind::NamedType(data) => Some(&data.members),
            _ => None,
        }
    }

    pub fn parameters(&self) -> &[Parameter] {
        match &self.kind {
            SymbolKind::Method(data) => &data.parameters,
            SymbolKind::Property(data) => &data.parameters,
            _ => &[],
        }
    }

    pub fn overridden(&self) -> Option<SymbolId> {
        match &self.kind {
            SymbolKind::Method(data) => data.overridden,
            SymbolKind::Property(data) => data.overridden,
            _ => None,
        }
    }

    /// Declared type of a value symbol or return type of a method.
    pub fn value_type(&self) -> Option<TypeId> {
        match &self.kind {
            SymbolKind::Method(data) => Some(data.return_type),
            SymbolKind::Field(data) => Some(data.ty),
            SymbolKind::Property(data) => Some(data.ty),
            SymbolKind::Local(data) => Some(data.ty),
            SymbolKind::Parameter { ty, .. } | SymbolKind::RangeVariable { ty } => Some(*ty),
            _ => None,
        }
    }

    pub fn constant(&self) -> Option<&ConstantValue> {
        match &self.kind {
            SymbolKind::Field(data) => data.constant.as_ref(),
            SymbolKind::Local(data) => data.constant.as_ref(),
            _ => None,
        }
    }
}
