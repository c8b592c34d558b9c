//! Type interning.
//!
//! Types are structural values ([`TypeData`]) interned into lightweight
//! [`TypeId`] handles, so type equality is an integer comparison. The interner
//! is shared by every binder working on a compilation and accepts new types
//! (array shapes, error types) concurrently.

use crate::special::SpecialType;
use crate::symbol::SymbolId;
use csz_common::Atom;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use rustc_hash::FxBuildHasher;
use serde::Serialize;
use std::sync::{Arc, PoisonError, RwLock};

/// Handle to an interned type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TypeId(pub u32);

impl TypeId {
    /// The generic error type, used when a failure was already reported.
    pub const ERROR: TypeId = TypeId(0);
    /// Type of the `null` literal.
    pub const NULL: TypeId = TypeId(1);
    pub const DYNAMIC: TypeId = TypeId(2);
    /// Placeholder type of a method group that has not been converted or invoked yet.
    pub const METHOD_GROUP: TypeId = TypeId(3);
    /// Placeholder type of an expression naming a namespace.
    pub const NAMESPACE: TypeId = TypeId(4);

    pub const VOID: TypeId = TypeId(5);
    pub const OBJECT: TypeId = TypeId(6);
    pub const STRING: TypeId = TypeId(7);
    pub const BOOL: TypeId = TypeId(8);
    pub const CHAR: TypeId = TypeId(9);
    pub const SBYTE: TypeId = TypeId(10);
    pub const BYTE: TypeId = TypeId(11);
    pub const SHORT: TypeId = TypeId(12);
    pub const USHORT: TypeId = TypeId(13);
    pub const INT: TypeId = TypeId(14);
    pub const UINT: TypeId = TypeId(15);
    pub const LONG: TypeId = TypeId(16);
    pub const ULONG: TypeId = TypeId(17);
    pub const FLOAT: TypeId = TypeId(18);
    pub const DOUBLE: TypeId = TypeId(19);
    pub const DECIMAL: TypeId = TypeId(20);

    const FIRST_SPECIAL: u32 = 5;

    /// Fixed id of a special type.
    pub const fn special(special: SpecialType) -> TypeId {
        TypeId(Self::FIRST_SPECIAL + special as u32)
    }

    pub fn as_special(self) -> Option<SpecialType> {
        let index = self.0.checked_sub(Self::FIRST_SPECIAL)? as usize;
        SpecialType::ALL.get(index).copied()
    }
}

/// Structural description of a type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeData {
    /// A type that could not be resolved. `name` is what the source wrote and
    /// `candidates` lists every symbol the failed lookup found.
    Error {
        name: Atom,
        candidates: Arc<[SymbolId]>,
    },
    Null,
    Dynamic,
    MethodGroup,
    Namespace,
    Special(SpecialType),
    /// Class, struct, interface, enum or delegate, possibly constructed.
    Named {
        symbol: SymbolId,
        type_args: Arc<[TypeId]>,
    },
    TypeParameter(SymbolId),
    Array {
        element: TypeId,
        rank: u32,
    },
    Pointer(TypeId),
    Nullable(TypeId),
}

/// Concurrent type interning table.
pub struct TypeInterner {
    ids: DashMap<TypeData, TypeId, FxBuildHasher>,
    types: RwLock<Vec<TypeData>>,
}

impl Default for TypeInterner {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeInterner {
    /// Create an interner with the fixed types pre-registered at their
    /// [`TypeId`] constants.
    pub fn new() -> Self {
        let interner = TypeInterner {
            ids: DashMap::with_hasher(FxBuildHasher),
            types: RwLock::new(Vec::new()),
        };
        interner.intern(TypeData::Error {
            name: Atom::NONE,
            candidates: Arc::from([]),
        });
        interner.intern(TypeData::Null);
        interner.intern(TypeData::Dynamic);
        interner.intern(TypeData::MethodGroup);
        interner.intern(TypeData::Namespace);
        for special in SpecialType::ALL {
            interner.intern(TypeData::Special(special));
        }
        debug_assert_eq!(interner.lookup(TypeId::INT), Some(TypeData::Special(SpecialType::Int32)));
        interner
    }

    /// Intern `data`, returning the existing id when it is already known.
    pub fn intern(&self, data: TypeData) -> TypeId {
        if let Some(id) = self.ids.get(&data) {
            return *id;
        }
        match self.ids.entry(data) {
            Entry::Occupied(entry) => *entry.get(),
            Entry::Vacant(entry) => {
                let mut types = self.types.write().unwrap_or_else(PoisonError::into_inner);
                let id = TypeId(types.len() as u32);
                types.push(entry.key().clone());
                entry.insert(id);
                id
            }
        }
    }

    pub fn lookup(&self, id: TypeId) -> Option<TypeData> {
        let types = self.types.read().unwrap_or_else(PoisonError::into_inner);
        types.get(id.0 as usize).cloned()
    }

    pub fn len(&self) -> usize {
        self.types.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // =========================================================================
    // Constructors
    // =========================================================================

    pub fn named(&self, symbol: SymbolId, type_args: &[TypeId]) -> TypeId {
        self.intern(TypeData::Named {
            symbol,
            type_args: Arc::from(type_args),
        })
    }

    pub fn type_parameter(&self, symbol: SymbolId) -> TypeId {
        self.intern(TypeData::TypeParameter(symbol))
    }

    pub fn array(&self, element: TypeId, rank: u32) -> TypeId {
        self.intern(TypeData::Array {
            element,
            rank: rank.max(1),
        })
    }

    pub fn pointer(&self, pointee: TypeId) -> TypeId {
        self.intern(TypeData::Pointer(pointee))
    }

    pub fn nullable(&self, underlying: TypeId) -> TypeId {
        self.intern(TypeData::Nullable(underlying))
    }

    /// Synthesize an error type remembering what failed to resolve.
    pub fn error(&self, name: Atom, candidates: &[SymbolId]) -> TypeId {
        if name.is_none() && candidates.is_empty() {
            return TypeId::ERROR;
        }
        self.intern(TypeData::Error {
            name,
            candidates: Arc::from(candidates),
        })
    }

    pub fn is_error(&self, id: TypeId) -> bool {
        matches!(self.lookup(id), Some(TypeData::Error { .. }) | None)
    }
}

#[cfg(test)]
#[path = "../tests/types_tests.rs"]
mod tests;
