//! `receiver.name` and extension-method search.

use crate::binder::Binder;
use crate::bound::{BoundKind, BoundNode, DynamicOperation, MethodGroup, TypeOrValue};
use crate::lookup::{LookupOptions, LookupResult, LookupResultKind, Resolved, sort_candidates};
use csz_common::diagnostics::diagnostic_codes;
use csz_common::{Atom, Diagnostic, DiagnosticBag, Span};
use csz_symbols::{ScopeKind, SymbolId, SymbolKind, TypeId};
use csz_syntax::{NodeIndex, SimpleName};
use once_cell::sync::Lazy;
use rustc_hash::FxHashSet;
use smallvec::SmallVec;
use tracing::{debug, trace};

/// Query operators usually brought in by an import the code may be missing.
static WELL_KNOWN_QUERY_METHODS: Lazy<FxHashSet<&'static str>> = Lazy::new(|| {
    [
        "Select",
        "SelectMany",
        "Where",
        "OrderBy",
        "OrderByDescending",
        "ThenBy",
        "GroupBy",
        "Join",
        "First",
        "FirstOrDefault",
        "Single",
        "Any",
        "All",
        "Count",
        "Sum",
        "Min",
        "Max",
        "Average",
        "Skip",
        "Take",
        "Distinct",
        "ToList",
        "ToArray",
    ]
    .into_iter()
    .collect()
});

const QUERY_NAMESPACE_HINT: &str = "Are you missing a using directive for 'System.Linq'?";

/// Which interpretation of a color-color receiver a member lookup prefers.
enum ColorColorChoice {
    Type,
    Value,
    /// Static and instance methods both matched; overload resolution decides.
    Undecided,
}

impl<'c> Binder<'c> {
    pub(crate) fn bind_member_access(
        &mut self,
        receiver: NodeIndex,
        name: &SimpleName,
        span: Span,
        invoked: bool,
        diag: &mut DiagnosticBag,
    ) -> BoundNode {
        let receiver = self.bind_receiver(receiver, diag);
        self.bind_member_of_receiver(receiver, name, span, invoked, diag)
    }

    /// Bind `name` looked up on an already-bound receiver.
    pub(crate) fn bind_member_of_receiver(
        &mut self,
        receiver: BoundNode,
        name: &SimpleName,
        span: Span,
        invoked: bool,
        diag: &mut DiagnosticBag,
    ) -> BoundNode {
        let type_args = self.bind_type_arguments(&name.type_args, diag);
        let receiver = match receiver.kind {
            BoundKind::TypeOrValue(data) => {
                let ty = receiver.ty.unwrap_or(TypeId::ERROR);
                self.settle_color_color(*data, ty, receiver.span, name, diag)
            }
            kind => BoundNode { kind, ..receiver },
        };
        trace!(name = %self.text(name.name), receiver = receiver.kind_name(), invoked, "member access");
        match &receiver.kind {
            BoundKind::NamespaceExpression { namespace } => {
                let namespace = *namespace;
                self.bind_namespace_member(receiver, namespace, name, &type_args, span, diag)
            }
            BoundKind::TypeExpression => self.bind_static_member(receiver, name, type_args, span, invoked, diag),
            BoundKind::TypeOrValue(_) => {
                let ty = receiver.type_or_error();
                let result = self.lookup_in_type(ty, name.name, name.arity(), LookupOptions::empty(), name.name_span);
                self.method_group(Some(receiver), name.name, &result, type_args, false, span)
            }
            _ => self.bind_instance_member(receiver, name, type_args, span, invoked, diag),
        }
    }

    // =========================================================================
    // Color-color receivers
    // =========================================================================

    /// Pick the type or the value reading of a color-color receiver from
    /// what `name` finds on the type, keeping only the chosen branch's
    /// diagnostics.
    fn settle_color_color(
        &mut self,
        data: TypeOrValue,
        ty: TypeId,
        span: Span,
        name: &SimpleName,
        diag: &mut DiagnosticBag,
    ) -> BoundNode {
        let result = self.lookup_in_type(ty, name.name, name.arity(), LookupOptions::empty(), name.name_span);
        let choice = if result.is_viable() {
            let compilation = self.compilation;
            let is_static = |s: &SymbolId| {
                let symbol = compilation.symbol(*s);
                symbol.is_type() || symbol.is_static()
            };
            let statics = result.symbols.iter().filter(|s| is_static(s)).count();
            if statics == result.symbols.len() {
                ColorColorChoice::Type
            } else if statics == 0 {
                ColorColorChoice::Value
            } else {
                ColorColorChoice::Undecided
            }
        } else {
            ColorColorChoice::Value
        };
        match choice {
            ColorColorChoice::Type => {
                debug!(name = %self.text(name.name), "color-color: type interpretation");
                diag.append(data.type_diagnostics);
                data.type_expression
            }
            ColorColorChoice::Value => {
                debug!(name = %self.text(name.name), "color-color: value interpretation");
                diag.append(data.value_diagnostics);
                data.value
            }
            ColorColorChoice::Undecided => BoundNode::new(BoundKind::TypeOrValue(Box::new(data)), ty, span),
        }
    }

    /// Settle a color-color receiver once the member is known: static
    /// members take the type reading, instance members the value reading.
    pub(crate) fn settle_receiver_for(
        &mut self,
        receiver: BoundNode,
        member_is_static: bool,
        diag: &mut DiagnosticBag,
    ) -> BoundNode {
        match receiver.kind {
            BoundKind::TypeOrValue(data) => {
                let data = *data;
                if member_is_static {
                    diag.append(data.type_diagnostics);
                    data.type_expression
                } else {
                    diag.append(data.value_diagnostics);
                    data.value
                }
            }
            kind => BoundNode { kind, ..receiver },
        }
    }

    // =========================================================================
    // Receivers by kind
    // =========================================================================

    fn bind_namespace_member(
        &mut self,
        receiver: BoundNode,
        namespace: SymbolId,
        name: &SimpleName,
        type_args: &[TypeId],
        span: Span,
        diag: &mut DiagnosticBag,
    ) -> BoundNode {
        let result = self.lookup_in_namespace(namespace, name.name, name.arity(), LookupOptions::empty(), name.name_span);
        if !result.is_viable() {
            if result.is_empty() {
                diag.add(
                    diagnostic_codes::NAMESPACE_MEMBER_NOT_FOUND,
                    name.name_span,
                    &[&self.text(name.name), &self.compilation.qualified_name(namespace)],
                );
            } else {
                self.report_lookup_failure(&result, name.name, name.name_span, diag);
            }
            return self.bad_member(&result, name.name, receiver, span);
        }
        match self.resolve_single_symbol(&result, name.name, name.name_span, diag) {
            Resolved::Symbol(symbol) if self.compilation.symbol(symbol).is_namespace() => BoundNode::new(
                BoundKind::NamespaceExpression { namespace: symbol },
                TypeId::NAMESPACE,
                span,
            ),
            Resolved::Symbol(symbol) => {
                BoundNode::new(BoundKind::TypeExpression, self.construct_type(symbol, type_args), span)
            }
            Resolved::Ambiguous {
                error_type,
                candidates,
            } => BoundNode::bad(LookupResultKind::Ambiguous, candidates, vec![receiver], error_type, span),
        }
    }

    /// `Type.Member`.
    fn bind_static_member(
        &mut self,
        receiver: BoundNode,
        name: &SimpleName,
        type_args: Vec<TypeId>,
        span: Span,
        invoked: bool,
        diag: &mut DiagnosticBag,
    ) -> BoundNode {
        let ty = receiver.type_or_error();
        if receiver.has_errors || self.compilation.is_error_type(ty) {
            return BoundNode::bad(LookupResultKind::Empty, Vec::new(), vec![receiver], TypeId::ERROR, span);
        }
        let options = if invoked {
            LookupOptions::MUST_BE_INVOCABLE
        } else {
            LookupOptions::empty()
        };
        let result = self.lookup_in_type(ty, name.name, name.arity(), options, name.name_span);
        if !result.is_viable() {
            if result.is_empty() {
                diag.add(
                    diagnostic_codes::NO_SUCH_MEMBER,
                    name.name_span,
                    &[&self.display_type(ty), &self.text(name.name)],
                );
            } else {
                self.report_lookup_failure(&result, name.name, name.name_span, diag);
            }
            return self.bad_member(&result, name.name, receiver, span);
        }
        if self.all_methods(&result) {
            return self.method_group(Some(receiver), name.name, &result, type_args, false, span);
        }
        let symbol = match self.resolve_single_symbol(&result, name.name, name.name_span, diag) {
            Resolved::Symbol(symbol) => symbol,
            Resolved::Ambiguous {
                error_type,
                candidates,
            } => return BoundNode::bad(LookupResultKind::Ambiguous, candidates, vec![receiver], error_type, span),
        };
        let compilation = self.compilation;
        let member = compilation.symbol(symbol);
        if member.is_type() {
            return BoundNode::new(BoundKind::TypeExpression, self.construct_type(symbol, &type_args), span);
        }
        if !member.is_static() {
            diag.add(diagnostic_codes::OBJECT_REQUIRED, span, &[&self.display_symbol(symbol)]);
            let member_type = compilation.member_type(symbol, Some(ty));
            return BoundNode::bad(
                LookupResultKind::StaticInstanceMismatch,
                vec![symbol],
                vec![receiver],
                member_type,
                span,
            );
        }
        let node = self.bind_value_member(symbol, None, span);
        let member_type = compilation.member_type(symbol, Some(ty));
        BoundNode { ty: Some(member_type), ..node }
    }

    /// `value.Member`.
    fn bind_instance_member(
        &mut self,
        receiver: BoundNode,
        name: &SimpleName,
        type_args: Vec<TypeId>,
        span: Span,
        invoked: bool,
        diag: &mut DiagnosticBag,
    ) -> BoundNode {
        let compilation = self.compilation;
        let receiver_description = match (&receiver.kind, receiver.ty) {
            (BoundKind::UnboundLambda { .. }, _) => Some("lambda expression".to_string()),
            (BoundKind::MethodGroup(_), _) => Some("method group".to_string()),
            (_, Some(TypeId::NULL)) => Some("<null>".to_string()),
            (_, Some(TypeId::VOID)) => Some("void".to_string()),
            _ => None,
        };
        if let Some(description) = receiver_description {
            if !receiver.has_errors {
                diag.add(diagnostic_codes::BAD_UNARY_OP, span, &[".", &description]);
            }
            return BoundNode::bad(LookupResultKind::NotAValue, Vec::new(), vec![receiver], TypeId::ERROR, span);
        }
        let ty = receiver.type_or_error();
        if compilation.is_dynamic(ty) {
            return BoundNode::new(
                BoundKind::Dynamic {
                    operation: DynamicOperation::MemberAccess(name.name),
                    receiver: Some(Box::new(receiver)),
                    arguments: Vec::new(),
                    initializer: None,
                },
                TypeId::DYNAMIC,
                span,
            );
        }
        if compilation.is_error_type(ty) {
            return BoundNode::bad(LookupResultKind::Empty, Vec::new(), vec![receiver], TypeId::ERROR, span);
        }

        let options = if invoked {
            LookupOptions::MUST_BE_INVOCABLE
        } else {
            LookupOptions::empty()
        };
        let result = self.lookup_in_type(ty, name.name, name.arity(), options, name.name_span);
        if result.is_viable() && self.all_methods(&result) {
            return self.method_group(Some(receiver), name.name, &result, type_args, true, span);
        }
        if !result.is_viable() {
            let extensions_allowed = result.is_empty()
                || matches!(result.kind, LookupResultKind::NotInvocable | LookupResultKind::Inaccessible);
            if extensions_allowed && !self.lookup_extension_method_levels(name.name, name.arity(), name.name_span).is_empty() {
                let empty = LookupResult::empty();
                return self.method_group(Some(receiver), name.name, &empty, type_args, true, span);
            }
            if result.is_empty() {
                self.report_no_such_member(ty, name, diag);
            } else {
                self.report_lookup_failure(&result, name.name, name.name_span, diag);
            }
            return self.bad_member(&result, name.name, receiver, span);
        }

        let symbol = match self.resolve_single_symbol(&result, name.name, name.name_span, diag) {
            Resolved::Symbol(symbol) => symbol,
            Resolved::Ambiguous {
                error_type,
                candidates,
            } => return BoundNode::bad(LookupResultKind::Ambiguous, candidates, vec![receiver], error_type, span),
        };
        let member = compilation.symbol(symbol);
        if member.is_type() || member.is_static() {
            diag.add(diagnostic_codes::OBJECT_PROHIBITED, span, &[&self.display_symbol(symbol)]);
            let member_type = match &member.kind {
                SymbolKind::NamedType(_) | SymbolKind::TypeParameter(_) => TypeId::ERROR,
                _ => compilation.member_type(symbol, Some(ty)),
            };
            return BoundNode::bad(
                LookupResultKind::StaticInstanceMismatch,
                vec![symbol],
                vec![receiver],
                member_type,
                span,
            );
        }
        self.bind_value_member(symbol, Some(receiver), span)
    }

    fn report_no_such_member(&self, ty: TypeId, name: &SimpleName, diag: &mut DiagnosticBag) {
        let text = self.text(name.name);
        let mut diagnostic = Diagnostic::from_code(
            diagnostic_codes::NO_SUCH_MEMBER_OR_EXTENSION,
            name.name_span,
            &[&self.display_type(ty), &text],
        );
        if self.options.report_suggestions && WELL_KNOWN_QUERY_METHODS.contains(&*text) {
            diagnostic = diagnostic.with_related(name.name_span, QUERY_NAMESPACE_HINT.to_string());
        }
        diag.push(diagnostic);
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn all_methods(&self, result: &LookupResult) -> bool {
        !result.symbols.is_empty() && result.symbols.iter().all(|s| self.compilation.symbol(*s).is_method())
    }

    fn method_group(
        &self,
        receiver: Option<BoundNode>,
        name: Atom,
        result: &LookupResult,
        type_args: Vec<TypeId>,
        search_extensions: bool,
        span: Span,
    ) -> BoundNode {
        let methods = if result.is_viable() { result.symbols.to_vec() } else { Vec::new() };
        BoundNode::new(
            BoundKind::MethodGroup(Box::new(MethodGroup {
                receiver: receiver.map(Box::new),
                name,
                methods,
                type_args,
                result_kind: result.kind,
                search_extensions,
            })),
            TypeId::METHOD_GROUP,
            span,
        )
    }

    fn bad_member(&self, result: &LookupResult, name: Atom, receiver: BoundNode, span: Span) -> BoundNode {
        let mut bad = self.bad_from_lookup(result, name, span);
        if let BoundKind::BadExpression(data) = &mut bad.kind {
            data.children.push(receiver);
        }
        bad
    }

    // =========================================================================
    // Extension methods
    // =========================================================================

    /// Extension methods named `name` visible from the current scope, grouped
    /// by scope level, nearest first.
    ///
    /// At each level the enclosing namespace and the namespaces it imports
    /// contribute the extension methods of their static classes. Levels with
    /// no match are omitted; a method reachable from several levels is listed
    /// at the nearest one only.
    pub(crate) fn lookup_extension_method_levels(&self, name: Atom, arity: usize, span: Span) -> Vec<Vec<SymbolId>> {
        let compilation = self.compilation;
        let mut levels = Vec::new();
        for (_, scope) in compilation.scopes().ancestors(self.scope) {
            let mut namespaces: SmallVec<[SymbolId; 4]> = SmallVec::new();
            if let ScopeKind::Namespace(ns) = scope.kind {
                namespaces.push(ns);
            }
            namespaces.extend(scope.usings.iter().copied());
            let mut found = Vec::new();
            for ns in namespaces {
                for container in compilation.all_members(ns) {
                    let container_symbol = compilation.symbol(container);
                    if !matches!(container_symbol.kind, SymbolKind::NamedType(_)) || !container_symbol.is_static() {
                        continue;
                    }
                    for method in compilation.members_named(container, name) {
                        let viable = self
                            .check_viability(*method, arity, LookupOptions::EXTENSION_METHODS_ONLY, span)
                            .is_viable();
                        let seen = found.contains(method) || levels.iter().any(|level: &Vec<SymbolId>| level.contains(method));
                        if viable && !seen {
                            found.push(*method);
                        }
                    }
                }
            }
            if !found.is_empty() {
                sort_candidates(compilation, &mut found);
                trace!(name = %self.text(name), level = levels.len(), count = found.len(), "extension methods found");
                levels.push(found);
            }
        }
        levels
    }
}

#[cfg(test)]
#[path = "../tests/member_access_tests.rs"]
mod tests;
