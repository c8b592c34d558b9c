//! The binder: per-call state and collaborators.
//!
//! A [`Binder`] binds expressions of one scope chain. It borrows the frozen
//! [`Compilation`] and the syntax arena, owns only call-local state (the
//! recursion depth, pattern variables of the switch being bound, the pooled
//! argument builders) and never writes to anything shared. Any number of
//! binders may run over the same compilation on different threads.
//!
//! The binding routines themselves live in sibling modules as further
//! `impl Binder` blocks, grouped by the kind of expression they handle.

use crate::arguments::{ArgumentPool, PoolStats};
use crate::conversions::{ConversionClassifier, ConversionContext, StandardConversions};
use crate::decision_dag::{DecisionDagBuilder, StandardDagBuilder};
use crate::options::BinderOptions;
use crate::overload::{OverloadResolver, StandardOverloadResolver};
use crate::patterns::PatternVariable;
use csz_common::{Atom, Span};
use csz_symbols::{Compilation, ScopeId, ScopeKind, SymbolId, TypeId};
use csz_syntax::{NodeIndex, SyntaxArena};
use std::rc::Rc;
use std::sync::Arc;

static STANDARD_CONVERSIONS: StandardConversions = StandardConversions;
static STANDARD_OVERLOADS: StandardOverloadResolver = StandardOverloadResolver;
static STANDARD_DAG_BUILDER: StandardDagBuilder = StandardDagBuilder;

/// The oracles a binder consults but does not implement.
#[derive(Clone, Copy)]
pub struct Collaborators<'c> {
    pub conversions: &'c dyn ConversionClassifier,
    pub overloads: &'c dyn OverloadResolver,
    pub dag_builder: &'c dyn DecisionDagBuilder,
}

impl Collaborators<'static> {
    pub fn standard() -> Self {
        Collaborators {
            conversions: &STANDARD_CONVERSIONS,
            overloads: &STANDARD_OVERLOADS,
            dag_builder: &STANDARD_DAG_BUILDER,
        }
    }
}

impl Default for Collaborators<'static> {
    fn default() -> Self {
        Self::standard()
    }
}

pub struct Binder<'c> {
    pub(crate) compilation: &'c Compilation,
    pub(crate) syntax: &'c SyntaxArena,
    pub(crate) options: BinderOptions,
    pub(crate) collaborators: Collaborators<'c>,
    /// Innermost scope of the code being bound.
    pub(crate) scope: ScopeId,
    pub(crate) depth: u32,
    /// Pattern variables declared so far in the switch being bound.
    pub(crate) pattern_variables: Vec<PatternVariable>,
    /// First pattern variable visible to name lookup.
    pub(crate) pattern_scope_start: usize,
    pub(crate) argument_pool: Rc<ArgumentPool>,
    /// Type of the object under construction inside an object or collection initializer.
    pub(crate) implicit_receiver: Option<TypeId>,
}

impl<'c> Binder<'c> {
    pub fn new(compilation: &'c Compilation, syntax: &'c SyntaxArena, scope: ScopeId) -> Self {
        Binder {
            compilation,
            syntax,
            options: BinderOptions::default(),
            collaborators: Collaborators::standard(),
            scope,
            depth: 0,
            pattern_variables: Vec::new(),
            pattern_scope_start: 0,
            argument_pool: Rc::new(ArgumentPool::new()),
            implicit_receiver: None,
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: BinderOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn with_collaborators(mut self, collaborators: Collaborators<'c>) -> Self {
        self.collaborators = collaborators;
        self
    }

    pub fn options(&self) -> &BinderOptions {
        &self.options
    }

    pub fn compilation(&self) -> &'c Compilation {
        self.compilation
    }

    pub fn scope(&self) -> ScopeId {
        self.scope
    }

    /// Allocation counters of this binder's argument builder pool.
    pub fn argument_pool_stats(&self) -> PoolStats {
        self.argument_pool.stats()
    }

    // =========================================================================
    // Context queries
    // =========================================================================

    /// The innermost type whose body contains the current scope.
    pub(crate) fn containing_type(&self) -> Option<SymbolId> {
        self.compilation
            .scopes()
            .ancestors(self.scope)
            .find_map(|(_, scope)| match scope.kind {
                ScopeKind::Type(ty) => Some(ty),
                _ => None,
            })
    }

    /// The member whose body contains the current scope.
    pub(crate) fn containing_member(&self) -> Option<SymbolId> {
        self.compilation
            .scopes()
            .ancestors(self.scope)
            .find_map(|(_, scope)| match scope.kind {
                ScopeKind::Member(member) => Some(member),
                _ => None,
            })
    }

    /// No `this` is available: a static member, or code outside any type.
    pub(crate) fn in_static_context(&self) -> bool {
        for (_, scope) in self.compilation.scopes().ancestors(self.scope) {
            if scope.is_static {
                return true;
            }
            if matches!(scope.kind, ScopeKind::Type(_)) {
                return false;
            }
        }
        true
    }

    pub(crate) fn in_unsafe_context(&self) -> bool {
        self.options.allow_unsafe
            || self
                .compilation
                .scopes()
                .ancestors(self.scope)
                .any(|(_, scope)| scope.is_unsafe)
    }

    pub(crate) fn in_checked_context(&self) -> bool {
        self.options.checked
            || self
                .compilation
                .scopes()
                .ancestors(self.scope)
                .any(|(_, scope)| scope.is_checked)
    }

    /// Type of `this` in the current context.
    pub(crate) fn this_type(&self) -> Option<TypeId> {
        self.containing_type()
            .and_then(|ty| self.compilation.declared_type(ty))
    }

    pub(crate) fn conversion_context(&self) -> ConversionContext<'c> {
        ConversionContext {
            compilation: self.compilation,
            checked: self.in_checked_context(),
        }
    }

    // =========================================================================
    // Small helpers
    // =========================================================================

    pub(crate) fn text(&self, atom: Atom) -> Arc<str> {
        self.compilation.interner().resolve(atom)
    }

    pub(crate) fn span(&self, idx: NodeIndex) -> Span {
        self.syntax.span(idx)
    }

    pub(crate) fn display_type(&self, ty: TypeId) -> String {
        self.compilation.display_type(ty)
    }

    pub(crate) fn display_symbol(&self, symbol: SymbolId) -> String {
        self.compilation.display_symbol(symbol)
    }
}
