//! Lexical scopes.
//!
//! Scopes live in an arena and point at their parent by [`ScopeId`], so a
//! binder can walk outward without owning anything. The arena is frozen once
//! the compilation is built; many binders may walk it at the same time.

use crate::symbol::SymbolId;
use csz_common::Atom;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScopeKind {
    /// Body of a namespace declaration; the symbol is the namespace.
    Namespace(SymbolId),
    /// Body of a type declaration; members of the type are in scope.
    Type(SymbolId),
    /// Body of a method, constructor or accessor.
    Member(SymbolId),
    Block,
}

#[derive(Clone, Debug)]
pub struct Scope {
    pub kind: ScopeKind,
    pub parent: Option<ScopeId>,
    /// Locals, parameters, range variables and labels declared directly here.
    pub locals: FxHashMap<Atom, SmallVec<[SymbolId; 1]>>,
    /// Namespaces imported by `using` directives attached to this scope.
    pub usings: Vec<SymbolId>,
    /// Code in this scope has no `this`.
    pub is_static: bool,
    pub is_unsafe: bool,
    pub is_checked: bool,
}

impl Scope {
    pub fn new(kind: ScopeKind, parent: Option<ScopeId>) -> Self {
        Scope {
            kind,
            parent,
            locals: FxHashMap::default(),
            usings: Vec::new(),
            is_static: false,
            is_unsafe: false,
            is_checked: false,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ScopeArena {
    scopes: Vec<Scope>,
}

impl ScopeArena {
    pub fn alloc(&mut self, scope: Scope) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(scope);
        id
    }

    pub fn get(&self, id: ScopeId) -> Option<&Scope> {
        self.scopes.get(id.0 as usize)
    }

    pub(crate) fn get_mut(&mut self, id: ScopeId) -> Option<&mut Scope> {
        self.scopes.get_mut(id.0 as usize)
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    /// Iterate from `start` outward to the root.
    pub fn ancestors(&self, start: ScopeId) -> Ancestors<'_> {
        Ancestors {
            arena: self,
            next: Some(start),
            steps: 0,
        }
    }
}

pub struct Ancestors<'a> {
    arena: &'a ScopeArena,
    next: Option<ScopeId>,
    steps: usize,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = (ScopeId, &'a Scope);

    fn next(&mut self) -> Option<Self::Item> {
        if self.steps >= csz_common::limits::MAX_SCOPE_WALK_ITERATIONS {
            return None;
        }
        let id = self.next?;
        let scope = self.arena.get(id)?;
        self.steps += 1;
        self.next = scope.parent;
        Some((id, scope))
    }
}
