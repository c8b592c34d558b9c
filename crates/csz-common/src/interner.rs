//! String interner for identifier deduplication.
//!
//! Names are interned into a shared pool and passed around as `u32` handles
//! (`Atom`). The pool is sharded so the binder can intern synthesized names
//! (`Invoke`, `Add`, ...) from several threads without a global lock.

use rustc_hash::{FxHashMap, FxHasher};
use serde::Serialize;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, RwLock};

/// An interned string identifier.
///
/// Atoms are cheap to copy and compare in O(1). Use `Interner::resolve` to
/// get the text back.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Default, PartialOrd, Ord)]
pub struct Atom(pub u32);

impl Atom {
    /// Sentinel for the empty string.
    pub const NONE: Atom = Atom(0);

    #[inline]
    pub fn is_none(self) -> bool {
        self.0 == 0
    }
}

const SHARD_BITS: u32 = 5;
const SHARD_COUNT: usize = 1 << SHARD_BITS;
const SHARD_MASK: u32 = (SHARD_COUNT as u32) - 1;

const COMMON_STRINGS: &[&str] = &[
    "System",
    "Object",
    "String",
    "Int32",
    "Boolean",
    "Collections",
    "IEnumerable",
    "Linq",
    "Invoke",
    "Add",
    "Length",
    "Count",
    "Value",
    "var",
    "value",
    "this",
    "base",
    "op_Implicit",
    "op_Explicit",
];

#[derive(Default)]
struct ShardState {
    map: FxHashMap<Arc<str>, Atom>,
    strings: Vec<Arc<str>>,
}

/// Sharded string interner for concurrent use.
pub struct Interner {
    shards: [RwLock<ShardState>; SHARD_COUNT],
}

impl Default for Interner {
    fn default() -> Self {
        Self::new()
    }
}

impl Interner {
    /// Create an interner with the empty string pre-interned as `Atom::NONE`.
    pub fn new() -> Self {
        let shards: [RwLock<ShardState>; SHARD_COUNT] =
            std::array::from_fn(|_| RwLock::new(ShardState::default()));
        if let Ok(mut state) = shards[0].write() {
            let empty: Arc<str> = Arc::from("");
            state.strings.push(empty.clone());
            state.map.insert(empty, Atom::NONE);
        }
        let interner = Interner { shards };
        for s in COMMON_STRINGS {
            interner.intern(s);
        }
        interner
    }

    /// Intern a string, returning the existing atom if it was seen before.
    pub fn intern(&self, s: &str) -> Atom {
        if s.is_empty() {
            return Atom::NONE;
        }
        let shard_idx = Self::shard_for(s);
        if let Ok(state) = self.shards[shard_idx].read()
            && let Some(&atom) = state.map.get(s)
        {
            return atom;
        }
        let Ok(mut state) = self.shards[shard_idx].write() else {
            return Atom::NONE;
        };
        if let Some(&atom) = state.map.get(s) {
            return atom;
        }
        let local_index = state.strings.len() as u32;
        if local_index > (u32::MAX >> SHARD_BITS) {
            return Atom::NONE;
        }
        let atom = Atom((local_index << SHARD_BITS) | (shard_idx as u32 & SHARD_MASK));
        let owned: Arc<str> = Arc::from(s);
        state.strings.push(owned.clone());
        state.map.insert(owned, atom);
        atom
    }

    /// Look up an already-interned string without inserting it.
    pub fn get(&self, s: &str) -> Option<Atom> {
        if s.is_empty() {
            return Some(Atom::NONE);
        }
        let state = self.shards[Self::shard_for(s)].read().ok()?;
        state.map.get(s).copied()
    }

    /// Resolve an atom back to its text. Unknown atoms resolve to `""`.
    pub fn resolve(&self, atom: Atom) -> Arc<str> {
        self.try_resolve(atom).unwrap_or_else(|| Arc::from(""))
    }

    pub fn try_resolve(&self, atom: Atom) -> Option<Arc<str>> {
        let shard_idx = (atom.0 & SHARD_MASK) as usize;
        let local_index = (atom.0 >> SHARD_BITS) as usize;
        let state = self.shards.get(shard_idx)?.read().ok()?;
        state.strings.get(local_index).cloned()
    }

    pub fn len(&self) -> usize {
        self.shards
            .iter()
            .map(|shard| shard.read().map(|state| state.strings.len()).unwrap_or(0))
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() <= 1
    }

    fn shard_for(s: &str) -> usize {
        let mut hasher = FxHasher::default();
        s.hash(&mut hasher);
        (hasher.finish() as usize) & (SHARD_COUNT - 1)
    }
}

#[cfg(test)]
#[path = "../tests/interner_tests.rs"]
mod tests;
