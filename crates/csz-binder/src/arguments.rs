//! Argument lists.
//!
//! [`AnalyzedArguments`] is the per-call-site builder handed to overload
//! resolution. Names and ref kinds are stored in side vectors that only come
//! into existence when the first named or `ref`/`out`/`in` argument shows
//! up; until then a plain positional list costs nothing extra.
//!
//! Builders are recycled through an [`ArgumentPool`]. [`PooledArguments`] is
//! the guard: dropping it clears the builder and puts it back, whichever way
//! the binding routine exits.

use crate::binder::Binder;
use crate::bound::{BoundKind, BoundNode};
use csz_common::diagnostics::diagnostic_codes;
use csz_common::limits::ARGUMENT_POOL_CAPACITY;
use csz_common::{Atom, DiagnosticBag, Span};
use csz_symbols::{RefKind, TypeId};
use csz_syntax::{NodeIndex, RefKindSyntax, SyntaxData};
use std::cell::{Cell, RefCell};
use std::ops::{Deref, DerefMut};
use std::rc::Rc;
use tracing::trace;

#[derive(Clone, Debug, Default)]
pub struct AnalyzedArguments {
    pub arguments: Vec<BoundNode>,
    names: Option<Vec<Option<(Atom, Span)>>>,
    ref_kinds: Option<Vec<RefKind>>,
    pub has_dynamic_argument: bool,
    pub has_errors: bool,
    /// The receiver of an extension invocation has been inserted as argument 0.
    pub is_extension_invocation: bool,
    name_slot_allocations: u32,
    ref_kind_slot_allocations: u32,
}

impl AnalyzedArguments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.arguments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arguments.is_empty()
    }

    /// Append one argument. The name and ref-kind side vectors are created
    /// on first use and back-filled for the earlier slots.
    ///
    /// A positional argument after a named one must already carry errors;
    /// the argument-list binder reports it before adding.
    pub(crate) fn add(&mut self, argument: BoundNode, name: Option<(Atom, Span)>, ref_kind: RefKind) {
        let index = self.arguments.len();
        debug_assert!(
            name.is_some() || argument.has_errors || !self.names.iter().flatten().any(Option::is_some),
            "positional argument {index} follows a named argument"
        );
        match (&mut self.names, name) {
            (Some(names), name) => names.push(name),
            (None, Some(name)) => {
                let mut names = vec![None; index];
                names.push(Some(name));
                self.names = Some(names);
                self.name_slot_allocations += 1;
            }
            (None, None) => {}
        }
        match (&mut self.ref_kinds, ref_kind) {
            (Some(kinds), kind) => kinds.push(kind),
            (None, RefKind::None) => {}
            (None, kind) => {
                let mut kinds = vec![RefKind::None; index];
                kinds.push(kind);
                self.ref_kinds = Some(kinds);
                self.ref_kind_slot_allocations += 1;
            }
        }
        if argument.ty == Some(TypeId::DYNAMIC) {
            self.has_dynamic_argument = true;
        }
        self.has_errors |= argument.has_errors;
        self.arguments.push(argument);
        debug_assert!(self.names.as_ref().is_none_or(|names| names.len() == self.arguments.len()));
        debug_assert!(self.ref_kinds.as_ref().is_none_or(|kinds| kinds.len() == self.arguments.len()));
    }

    pub fn push(&mut self, argument: BoundNode) {
        self.add(argument, None, RefKind::None);
    }

    pub fn name(&self, index: usize) -> Option<(Atom, Span)> {
        self.names.as_ref().and_then(|names| names.get(index).copied().flatten())
    }

    pub fn ref_kind(&self, index: usize) -> RefKind {
        self.ref_kinds
            .as_ref()
            .and_then(|kinds| kinds.get(index).copied())
            .unwrap_or_default()
    }

    pub fn names(&self) -> Option<&[Option<(Atom, Span)>]> {
        self.names.as_deref()
    }

    pub fn ref_kinds(&self) -> Option<&[RefKind]> {
        self.ref_kinds.as_deref()
    }

    pub fn has_names(&self) -> bool {
        self.names.is_some()
    }

    /// Put the receiver of an extension method call in front.
    pub fn insert_receiver(&mut self, receiver: BoundNode) {
        if let Some(names) = &mut self.names {
            names.insert(0, None);
        }
        if let Some(kinds) = &mut self.ref_kinds {
            kinds.insert(0, RefKind::None);
        }
        self.has_errors |= receiver.has_errors;
        self.arguments.insert(0, receiver);
        self.is_extension_invocation = true;
    }

    /// Move the bound arguments out, leaving the builder empty.
    pub fn take_arguments(&mut self) -> Vec<BoundNode> {
        std::mem::take(&mut self.arguments)
    }

    fn clear(&mut self) {
        self.arguments.clear();
        self.names = None;
        self.ref_kinds = None;
        self.has_dynamic_argument = false;
        self.has_errors = false;
        self.is_extension_invocation = false;
        self.name_slot_allocations = 0;
        self.ref_kind_slot_allocations = 0;
    }
}

/// Allocation counters of an [`ArgumentPool`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PoolStats {
    pub acquired: u64,
    pub created: u64,
    pub returned: u64,
    /// Name side vectors created by returned builders.
    pub name_slot_allocations: u64,
    /// Ref-kind side vectors created by returned builders.
    pub ref_kind_slot_allocations: u64,
}

/// Free list of argument builders, owned by one binder.
#[derive(Debug, Default)]
pub struct ArgumentPool {
    free: RefCell<Vec<AnalyzedArguments>>,
    stats: Cell<PoolStats>,
}

impl ArgumentPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn acquire(self: &Rc<Self>) -> PooledArguments {
        let mut stats = self.stats.get();
        stats.acquired += 1;
        let args = match self.free.borrow_mut().pop() {
            Some(args) => args,
            None => {
                stats.created += 1;
                AnalyzedArguments::new()
            }
        };
        self.stats.set(stats);
        PooledArguments {
            pool: Rc::clone(self),
            args,
        }
    }

    pub fn stats(&self) -> PoolStats {
        self.stats.get()
    }

    /// Builders currently parked in the pool.
    pub fn available(&self) -> usize {
        self.free.borrow().len()
    }

    fn release(&self, mut args: AnalyzedArguments) {
        let mut stats = self.stats.get();
        stats.returned += 1;
        stats.name_slot_allocations += u64::from(args.name_slot_allocations);
        stats.ref_kind_slot_allocations += u64::from(args.ref_kind_slot_allocations);
        self.stats.set(stats);
        args.clear();
        let mut free = self.free.borrow_mut();
        if free.len() < ARGUMENT_POOL_CAPACITY {
            free.push(args);
        }
    }
}

/// A builder on loan from an [`ArgumentPool`]; returned on drop.
pub struct PooledArguments {
    pool: Rc<ArgumentPool>,
    args: AnalyzedArguments,
}

impl Deref for PooledArguments {
    type Target = AnalyzedArguments;

    fn deref(&self) -> &AnalyzedArguments {
        &self.args
    }
}

impl DerefMut for PooledArguments {
    fn deref_mut(&mut self) -> &mut AnalyzedArguments {
        &mut self.args
    }
}

impl Drop for PooledArguments {
    fn drop(&mut self) {
        self.pool.release(std::mem::take(&mut self.args));
    }
}

fn ref_kind_of(syntax: RefKindSyntax) -> RefKind {
    match syntax {
        RefKindSyntax::None => RefKind::None,
        RefKindSyntax::Ref => RefKind::Ref,
        RefKindSyntax::Out => RefKind::Out,
        RefKindSyntax::In => RefKind::In,
    }
}

impl<'c> Binder<'c> {
    /// Take a builder from this binder's pool.
    pub(crate) fn acquire_arguments(&self) -> PooledArguments {
        self.argument_pool.acquire()
    }

    /// Bind the argument nodes of a call, constructor or indexer.
    ///
    /// A repeated name and a positional argument after a named one are each
    /// reported once per list; the offending arguments are marked erroneous
    /// without further diagnostics.
    pub(crate) fn bind_argument_list(&mut self, arguments: &[NodeIndex], result: &mut AnalyzedArguments, diag: &mut DiagnosticBag) {
        let mut reported_duplicate = false;
        let mut reported_positional = false;
        let mut seen_named = false;
        for &idx in arguments {
            let (name, ref_kind, expression) = match self.syntax.data(idx) {
                Some(SyntaxData::Argument(argument)) => (argument.name, ref_kind_of(argument.ref_kind), argument.expression),
                _ => (None, RefKind::None, idx),
            };
            let mut bound = match ref_kind {
                RefKind::None | RefKind::In => self.bind_argument_value(expression, diag),
                RefKind::Ref | RefKind::Out => self.bind_ref_argument(expression, diag),
            };
            match name {
                Some((atom, span)) => {
                    let duplicate = result
                        .names()
                        .is_some_and(|names| names.iter().flatten().any(|(n, _)| *n == atom));
                    if duplicate {
                        if !reported_duplicate {
                            diag.add(diagnostic_codes::DUPLICATE_NAMED_ARGUMENT, span, &[&self.text(atom)]);
                            reported_duplicate = true;
                        }
                        bound = bound.with_errors();
                    }
                    seen_named = true;
                }
                None if seen_named => {
                    if !reported_positional {
                        diag.add(diagnostic_codes::NAMED_ARGUMENT_BEFORE_POSITIONAL, self.span(idx), &[]);
                        reported_positional = true;
                    }
                    bound = bound.with_errors();
                }
                None => {}
            }
            result.add(bound, name, ref_kind);
        }
        trace!(
            count = result.len(),
            named = result.has_names(),
            dynamic = result.has_dynamic_argument,
            "bound argument list"
        );
    }

    /// A by-value argument. `__arglist` is allowed here.
    fn bind_argument_value(&mut self, expression: NodeIndex, diag: &mut DiagnosticBag) -> BoundNode {
        let bound = self.bind_allowing_arglist(expression, diag);
        self.check_value(bound, diag)
    }

    /// A `ref`/`out` argument must be an assignable variable.
    fn bind_ref_argument(&mut self, expression: NodeIndex, diag: &mut DiagnosticBag) -> BoundNode {
        let bound = self.bind(expression, diag, false, false);
        if bound.has_errors {
            return bound;
        }
        match &bound.kind {
            BoundKind::PropertyAccess { .. } | BoundKind::IndexerAccess(_) => {
                diag.add(diagnostic_codes::REF_PROPERTY, bound.span, &[]);
                bound.with_errors()
            }
            _ if bound.is_variable() => bound,
            _ => {
                diag.add(diagnostic_codes::REF_LVALUE_EXPECTED, bound.span, &[]);
                bound.with_errors()
            }
        }
    }
}

#[cfg(test)]
#[path = "../tests/arguments_tests.rs"]
mod tests;
