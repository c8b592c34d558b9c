//! Name lookup and result disambiguation.
//!
//! Lookup walks the scope chain outward and stops at the first level that
//! produced a viable symbol. Each candidate is checked for viability against
//! the requested arity and option flags; non-viable candidates are kept with
//! the reason (and a ready-made diagnostic) so the best failure can be
//! reported when nothing viable turns up.
//!
//! When several viable non-method symbols survive, [`Binder::resolve_single_symbol`]
//! sorts them deterministically, ranks them by declaration origin and either
//! picks one (possibly with a warning) or reports an ambiguity.

use crate::binder::Binder;
use bitflags::bitflags;
use csz_common::diagnostics::diagnostic_codes;
use csz_common::limits::LOOKUP_INLINE_CANDIDATES;
use csz_common::{Atom, Diagnostic, DiagnosticBag, Span};
use csz_symbols::{Compilation, ScopeKind, SymbolId, SymbolKind, TypeId};
use serde::Serialize;
use smallvec::SmallVec;
use std::cmp::Ordering;
use tracing::{debug, trace};

/// How good a lookup result is. Later variants are better; merging keeps the
/// better kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum LookupResultKind {
    Empty,
    NotATypeOrNamespace,
    WrongArity,
    Inaccessible,
    NotAValue,
    NotAVariable,
    NotInvocable,
    StaticInstanceMismatch,
    OverloadResolutionFailure,
    Ambiguous,
    Viable,
}

impl LookupResultKind {
    pub fn is_viable(self) -> bool {
        self == LookupResultKind::Viable
    }
}

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct LookupOptions: u8 {
        const NAMESPACES_OR_TYPES_ONLY = 1 << 0;
        const MUST_BE_INVOCABLE = 1 << 1;
        const LABELS_ONLY = 1 << 2;
        const EXTENSION_METHODS_ONLY = 1 << 3;
        const IGNORE_ACCESSIBILITY = 1 << 4;
    }
}

pub type SymbolList = SmallVec<[SymbolId; LOOKUP_INLINE_CANDIDATES]>;

/// Outcome of a lookup. Never [`LookupResultKind::Viable`] with no symbols.
#[derive(Clone, Debug, PartialEq)]
pub struct LookupResult {
    pub kind: LookupResultKind,
    pub symbols: SymbolList,
    /// Diagnostic explaining a non-viable result.
    pub error: Option<Diagnostic>,
}

impl Default for LookupResult {
    fn default() -> Self {
        Self::empty()
    }
}

impl LookupResult {
    pub fn empty() -> Self {
        LookupResult {
            kind: LookupResultKind::Empty,
            symbols: SmallVec::new(),
            error: None,
        }
    }

    pub fn good(symbol: SymbolId) -> Self {
        let mut symbols = SmallVec::new();
        symbols.push(symbol);
        LookupResult {
            kind: LookupResultKind::Viable,
            symbols,
            error: None,
        }
    }

    pub fn not_viable(kind: LookupResultKind, symbol: SymbolId, error: Option<Diagnostic>) -> Self {
        debug_assert!(!kind.is_viable());
        let mut symbols = SmallVec::new();
        symbols.push(symbol);
        LookupResult { kind, symbols, error }
    }

    pub fn is_viable(&self) -> bool {
        self.kind.is_viable()
    }

    pub fn is_empty(&self) -> bool {
        self.kind == LookupResultKind::Empty
    }

    /// The only symbol, if exactly one was found.
    pub fn single_symbol(&self) -> Option<SymbolId> {
        match self.symbols.as_slice() {
            [only] => Some(*only),
            _ => None,
        }
    }

    /// Merge a result found at the same level: the better kind wins, equal
    /// kinds pool their symbols.
    pub fn merge_equal(&mut self, other: LookupResult) {
        match other.kind.cmp(&self.kind) {
            Ordering::Greater => *self = other,
            Ordering::Equal if other.kind != LookupResultKind::Empty => {
                for symbol in other.symbols {
                    if !self.symbols.contains(&symbol) {
                        self.symbols.push(symbol);
                    }
                }
                if self.error.is_none() {
                    self.error = other.error;
                }
            }
            _ => {}
        }
    }

    /// Merge a result from an outer level: it only replaces this one when strictly better.
    pub fn merge_prioritized(&mut self, other: LookupResult) {
        if other.kind > self.kind {
            *self = other;
        }
    }
}

/// What disambiguation made of a multi-symbol result.
#[derive(Clone, Debug, PartialEq)]
pub enum Resolved {
    Symbol(SymbolId),
    /// Several equally good candidates; `error_type` is a synthesized error
    /// type that still lists them.
    Ambiguous { error_type: TypeId, candidates: Vec<SymbolId> },
}

impl<'c> Binder<'c> {
    // =========================================================================
    // Scope-chain lookup
    // =========================================================================

    /// Look `name` up from the current scope outward.
    pub(crate) fn lookup_simple_name(&self, name: Atom, arity: usize, options: LookupOptions, span: Span) -> LookupResult {
        let compilation = self.compilation;
        let mut result = LookupResult::empty();
        for (scope_id, scope) in compilation.scopes().ancestors(self.scope) {
            let mut level = LookupResult::empty();
            if let Some(locals) = scope.locals.get(&name) {
                for symbol in locals {
                    level.merge_equal(self.check_viability(*symbol, arity, options, span));
                }
            }
            match scope.kind {
                ScopeKind::Type(ty) => {
                    self.lookup_type_parameters(ty, name, arity, options, span, &mut level);
                    if let Some(declared) = compilation.declared_type(ty) {
                        level.merge_equal(self.lookup_in_type(declared, name, arity, options, span));
                    }
                }
                ScopeKind::Member(member) => {
                    self.lookup_type_parameters(member, name, arity, options, span, &mut level);
                }
                ScopeKind::Namespace(ns) => {
                    level.merge_equal(self.lookup_in_namespace(ns, name, arity, options, span));
                }
                ScopeKind::Block => {}
            }
            if !level.is_viable() && !scope.usings.is_empty() {
                let mut imported = LookupResult::empty();
                for ns in &scope.usings {
                    for member in compilation.members_named(*ns, name) {
                        if compilation.symbol(*member).is_type() {
                            imported.merge_equal(self.check_viability(*member, arity, options, span));
                        }
                    }
                }
                level.merge_equal(imported);
            }
            if level.is_viable() {
                trace!(
                    name = %self.text(name),
                    scope = scope_id.0,
                    candidates = level.symbols.len(),
                    "lookup: found viable symbols"
                );
                return level;
            }
            result.merge_prioritized(level);
        }
        trace!(name = %self.text(name), kind = ?result.kind, "lookup: nothing viable");
        result
    }

    fn lookup_type_parameters(
        &self,
        owner: SymbolId,
        name: Atom,
        arity: usize,
        options: LookupOptions,
        span: Span,
        level: &mut LookupResult,
    ) {
        let parameters: &[SymbolId] = match &self.compilation.symbol(owner).kind {
            SymbolKind::NamedType(data) => &data.type_parameters,
            SymbolKind::Method(data) => &data.type_parameters,
            _ => &[],
        };
        for parameter in parameters {
            if self.compilation.symbol(*parameter).name == name {
                level.merge_equal(self.check_viability(*parameter, arity, options, span));
            }
        }
    }

    /// Members of a namespace named `name`.
    pub(crate) fn lookup_in_namespace(
        &self,
        namespace: SymbolId,
        name: Atom,
        arity: usize,
        options: LookupOptions,
        span: Span,
    ) -> LookupResult {
        let mut result = LookupResult::empty();
        for member in self.compilation.members_named(namespace, name) {
            result.merge_equal(self.check_viability(*member, arity, options, span));
        }
        result
    }

    /// Members of a type and its bases named `name`.
    ///
    /// A non-method member hides everything of that name further up the
    /// chain; methods accumulate across levels, except that a base method
    /// overridden by one already found is skipped.
    pub(crate) fn lookup_in_type(
        &self,
        ty: TypeId,
        name: Atom,
        arity: usize,
        options: LookupOptions,
        span: Span,
    ) -> LookupResult {
        let compilation = self.compilation;
        let mut chain = compilation.base_chain(ty);
        if compilation.is_interface(ty) {
            chain.extend(compilation.all_interfaces(ty));
            chain.push(TypeId::OBJECT);
        }
        let mut result = LookupResult::empty();
        let mut found_methods: SymbolList = SmallVec::new();
        for level_type in chain {
            let Some(owner) = compilation.type_symbol(level_type) else {
                continue;
            };
            let mut level = LookupResult::empty();
            for member in compilation.members_named(owner, name) {
                let symbol = compilation.symbol(*member);
                if symbol.is_method() {
                    if found_methods.iter().any(|m| compilation.overrides(*m, *member)) {
                        continue;
                    }
                    found_methods.push(*member);
                } else if !found_methods.is_empty() {
                    continue;
                }
                level.merge_equal(self.check_viability(*member, arity, options, span));
            }
            let hides = level.is_viable()
                && level
                    .symbols
                    .iter()
                    .any(|s| !compilation.symbol(*s).is_method());
            result.merge_equal(level);
            if hides {
                break;
            }
        }
        result
    }

    // =========================================================================
    // Viability
    // =========================================================================

    /// Check one candidate against the lookup request.
    pub(crate) fn check_viability(
        &self,
        symbol_id: SymbolId,
        arity: usize,
        options: LookupOptions,
        span: Span,
    ) -> LookupResult {
        let compilation = self.compilation;
        let symbol = compilation.symbol(symbol_id);
        let is_label = matches!(symbol.kind, SymbolKind::Label);
        if is_label != options.contains(LookupOptions::LABELS_ONLY) {
            return LookupResult::empty();
        }
        if options.contains(LookupOptions::EXTENSION_METHODS_ONLY) && !symbol.is_extension() {
            return LookupResult::empty();
        }
        let name = compilation.name(symbol_id);
        if options.contains(LookupOptions::NAMESPACES_OR_TYPES_ONLY) && !symbol.is_type() && !symbol.is_namespace() {
            let error = Diagnostic::from_code(
                diagnostic_codes::BAD_SYMBOL_KIND,
                span,
                &[&name, symbol.kind.description(), "type"],
            );
            return LookupResult::not_viable(LookupResultKind::NotATypeOrNamespace, symbol_id, Some(error));
        }
        let declared_arity = symbol.arity();
        if declared_arity != arity && (symbol.is_type() || symbol.is_method() || arity > 0) {
            let error = if declared_arity == 0 {
                Diagnostic::from_code(
                    diagnostic_codes::NON_GENERIC_WITH_TYPE_ARGS,
                    span,
                    &[&name, symbol.kind.description()],
                )
            } else {
                Diagnostic::from_code(
                    diagnostic_codes::BAD_ARITY,
                    span,
                    &[&compilation.display_symbol(symbol_id), symbol.kind.description(), &declared_arity.to_string()],
                )
            };
            return LookupResult::not_viable(LookupResultKind::WrongArity, symbol_id, Some(error));
        }
        if options.contains(LookupOptions::MUST_BE_INVOCABLE)
            && matches!(symbol.kind, SymbolKind::Field(_) | SymbolKind::Property(_))
        {
            let ty = symbol.value_type().unwrap_or(TypeId::ERROR);
            if !compilation.is_delegate_type(ty) && !compilation.is_dynamic(ty) && !compilation.is_error_type(ty) {
                let error = Diagnostic::from_code(
                    diagnostic_codes::NON_INVOCABLE_MEMBER,
                    span,
                    &[&compilation.display_symbol(symbol_id)],
                );
                return LookupResult::not_viable(LookupResultKind::NotInvocable, symbol_id, Some(error));
            }
        }
        if !options.contains(LookupOptions::IGNORE_ACCESSIBILITY)
            && (symbol.is_member() || symbol.is_type())
            && !compilation.is_accessible(symbol_id, self.containing_type())
        {
            let error = Diagnostic::from_code(
                diagnostic_codes::INACCESSIBLE,
                span,
                &[&compilation.display_symbol(symbol_id)],
            );
            return LookupResult::not_viable(LookupResultKind::Inaccessible, symbol_id, Some(error));
        }
        LookupResult::good(symbol_id)
    }

    // =========================================================================
    // Disambiguation
    // =========================================================================

    /// Reduce a viable, non-method result to one symbol.
    ///
    /// A single candidate carrying an unreported declaration error raises that
    /// error here. Several candidates are sorted for determinism, then ranked
    /// by origin tier; a namespace/type collision across tiers is a warning
    /// and the higher tier wins, anything else is an ambiguity.
    pub(crate) fn resolve_single_symbol(
        &self,
        result: &LookupResult,
        name: Atom,
        span: Span,
        diag: &mut DiagnosticBag,
    ) -> Resolved {
        debug_assert!(result.is_viable());
        let compilation = self.compilation;
        if let Some(only) = result.single_symbol() {
            if let Some(unreported) = &compilation.symbol(only).unreported_error {
                let args: Vec<&str> = unreported.args.iter().map(String::as_str).collect();
                diag.add(unreported.code, span, &args);
            }
            return Resolved::Symbol(only);
        }

        let mut candidates: Vec<SymbolId> = result.symbols.to_vec();
        sort_candidates(compilation, &mut candidates);
        let mut ranked = candidates.clone();
        // Stable: equal origins keep the deterministic order.
        ranked.sort_by(|a, b| compilation.symbol(*b).origin.cmp(&compilation.symbol(*a).origin));
        let best = ranked[0];
        let second = ranked[1];
        let best_symbol = compilation.symbol(best);
        let second_symbol = compilation.symbol(second);

        if best_symbol.origin > second_symbol.origin && best_symbol.is_namespace() != second_symbol.is_namespace() {
            let code = if best_symbol.is_namespace() {
                diagnostic_codes::SAME_FULL_NAME_NS_TYPE
            } else {
                diagnostic_codes::SAME_FULL_NAME_TYPE_NS
            };
            diag.add(
                code,
                span,
                &[
                    &compilation.qualified_name(best),
                    &self.text(best_symbol.module),
                    &compilation.qualified_name(second),
                    &self.text(second_symbol.module),
                ],
            );
            debug!(name = %self.text(name), winner = best.0, "lookup: namespace/type collision resolved by origin");
            return Resolved::Symbol(best);
        }

        diag.add(
            diagnostic_codes::AMBIGUOUS_REFERENCE,
            span,
            &[
                &self.text(name),
                &compilation.display_symbol(candidates[0]),
                &compilation.display_symbol(candidates[1]),
            ],
        );
        let error_type = compilation.types().error(name, &candidates);
        debug!(name = %self.text(name), candidates = candidates.len(), "lookup: ambiguous reference");
        Resolved::Ambiguous {
            error_type,
            candidates,
        }
    }

    /// Report the diagnostic carried by a non-viable result, or
    /// `NameNotInContext` when nothing was found at all.
    pub(crate) fn report_lookup_failure(&self, result: &LookupResult, name: Atom, span: Span, diag: &mut DiagnosticBag) {
        match &result.error {
            Some(error) => diag.push(error.clone()),
            None => diag.add(diagnostic_codes::NAME_NOT_IN_CONTEXT, span, &[&self.text(name)]),
        }
    }
}

/// Sort candidates by qualified name, kind, source-before-metadata, module
/// and position. This fixes the order; it does not choose a winner.
pub(crate) fn sort_candidates(compilation: &Compilation, candidates: &mut [SymbolId]) {
    candidates.sort_by_cached_key(|id| {
        let symbol = compilation.symbol(*id);
        (
            compilation.qualified_name(*id),
            symbol.kind.ordinal(),
            !symbol.origin.is_source(),
            compilation.interner().resolve(symbol.module).to_string(),
            symbol.span.start,
            id.0,
        )
    });
}

#[cfg(test)]
#[path = "../tests/lookup_tests.rs"]
mod tests;
