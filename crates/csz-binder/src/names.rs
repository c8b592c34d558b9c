//! Simple names and type syntax.
//!
//! Identifiers resolve, in order, to pattern variables of the switch being
//! bound, then through scope-chain lookup to locals, parameters, range
//! variables, members of enclosing types, types and namespaces. Type syntax
//! (predefined, named, qualified, array, pointer, nullable) binds to a
//! [`BoundKind::TypeExpression`] whose `ty` is the denoted type.

use crate::binder::Binder;
use crate::bound::{BoundKind, BoundNode, MethodGroup, TypeOrValue};
use crate::lookup::{LookupOptions, LookupResult, LookupResultKind, Resolved};
use csz_common::diagnostics::diagnostic_codes;
use csz_common::{Atom, DiagnosticBag, Span};
use csz_symbols::{SymbolId, SymbolKind, TypeData, TypeId};
use csz_syntax::{NodeIndex, PredefinedType, SimpleName, SyntaxData};
use tracing::trace;

pub(crate) fn predefined_type(predefined: PredefinedType) -> TypeId {
    match predefined {
        PredefinedType::Bool => TypeId::BOOL,
        PredefinedType::Char => TypeId::CHAR,
        PredefinedType::SByte => TypeId::SBYTE,
        PredefinedType::Byte => TypeId::BYTE,
        PredefinedType::Short => TypeId::SHORT,
        PredefinedType::UShort => TypeId::USHORT,
        PredefinedType::Int => TypeId::INT,
        PredefinedType::UInt => TypeId::UINT,
        PredefinedType::Long => TypeId::LONG,
        PredefinedType::ULong => TypeId::ULONG,
        PredefinedType::Float => TypeId::FLOAT,
        PredefinedType::Double => TypeId::DOUBLE,
        PredefinedType::Decimal => TypeId::DECIMAL,
        PredefinedType::String => TypeId::STRING,
        PredefinedType::Object => TypeId::OBJECT,
        PredefinedType::Void => TypeId::VOID,
        PredefinedType::Dynamic => TypeId::DYNAMIC,
    }
}

impl<'c> Binder<'c> {
    // =========================================================================
    // Identifiers in expression position
    // =========================================================================

    pub(crate) fn bind_identifier(
        &mut self,
        name: &SimpleName,
        span: Span,
        invoked: bool,
        diag: &mut DiagnosticBag,
    ) -> BoundNode {
        if name.type_args.is_empty()
            && let Some(variable) = self.visible_pattern_variable(name.name)
        {
            return BoundNode::new(
                BoundKind::PatternLocal {
                    variable: variable.id,
                    name: variable.name,
                },
                variable.ty,
                span,
            );
        }

        let type_args = self.bind_type_arguments(&name.type_args, diag);
        let options = if invoked {
            LookupOptions::MUST_BE_INVOCABLE
        } else {
            LookupOptions::empty()
        };
        let result = self.lookup_simple_name(name.name, name.arity(), options, name.name_span);
        if !result.is_viable() {
            self.report_lookup_failure(&result, name.name, name.name_span, diag);
            return self.bad_from_lookup(&result, name.name, span);
        }

        let compilation = self.compilation;
        if result.symbols.iter().all(|s| compilation.symbol(*s).is_method()) {
            trace!(name = %self.text(name.name), methods = result.symbols.len(), "identifier: method group");
            return BoundNode::new(
                BoundKind::MethodGroup(Box::new(MethodGroup {
                    receiver: None,
                    name: name.name,
                    methods: result.symbols.to_vec(),
                    type_args,
                    result_kind: LookupResultKind::Viable,
                    search_extensions: false,
                })),
                TypeId::METHOD_GROUP,
                span,
            );
        }

        match self.resolve_single_symbol(&result, name.name, name.name_span, diag) {
            Resolved::Symbol(symbol) => self.bind_symbol_reference(symbol, &type_args, span, diag),
            Resolved::Ambiguous {
                error_type,
                candidates,
            } => BoundNode::bad(LookupResultKind::Ambiguous, candidates, Vec::new(), error_type, span),
        }
    }

    /// The innermost visible pattern variable named `name`.
    fn visible_pattern_variable(&self, name: Atom) -> Option<crate::patterns::PatternVariable> {
        self.pattern_variables
            .get(self.pattern_scope_start..)?
            .iter()
            .rev()
            .find(|v| v.name == name)
            .cloned()
    }

    /// A bad expression for a failed lookup, keeping what lookup found.
    pub(crate) fn bad_from_lookup(&self, result: &LookupResult, name: Atom, span: Span) -> BoundNode {
        let candidates = result.symbols.to_vec();
        let error_type = self.compilation.types().error(name, &candidates);
        BoundNode::bad(result.kind, candidates, Vec::new(), error_type, span)
    }

    /// Bind a reference to a single resolved symbol found by simple-name lookup.
    fn bind_symbol_reference(
        &mut self,
        symbol_id: SymbolId,
        type_args: &[TypeId],
        span: Span,
        diag: &mut DiagnosticBag,
    ) -> BoundNode {
        let compilation = self.compilation;
        let symbol = compilation.symbol(symbol_id);
        match &symbol.kind {
            SymbolKind::Local(data) => BoundNode::new(BoundKind::Local { symbol: symbol_id }, data.ty, span)
                .with_constant(data.constant.clone()),
            SymbolKind::Parameter { ty, .. } => {
                BoundNode::new(BoundKind::Parameter { symbol: symbol_id }, *ty, span)
            }
            SymbolKind::RangeVariable { ty } => {
                BoundNode::new(BoundKind::RangeVariable { symbol: symbol_id }, *ty, span)
            }
            SymbolKind::Field(_) | SymbolKind::Property(_) => {
                let receiver = if symbol.is_static() {
                    None
                } else if self.in_static_context() {
                    diag.add(
                        diagnostic_codes::OBJECT_REQUIRED,
                        span,
                        &[&self.display_symbol(symbol_id)],
                    );
                    let ty = compilation.member_type(symbol_id, None);
                    return BoundNode::bad(LookupResultKind::StaticInstanceMismatch, vec![symbol_id], Vec::new(), ty, span);
                } else {
                    self.this_type()
                        .map(|ty| BoundNode::new(BoundKind::ThisReference, ty, span))
                };
                self.bind_value_member(symbol_id, receiver, span)
            }
            SymbolKind::NamedType(_) | SymbolKind::TypeParameter(_) => {
                let ty = self.construct_type(symbol_id, type_args);
                BoundNode::new(BoundKind::TypeExpression, ty, span)
            }
            SymbolKind::Namespace(_) => BoundNode::new(
                BoundKind::NamespaceExpression { namespace: symbol_id },
                TypeId::NAMESPACE,
                span,
            ),
            SymbolKind::Method(_) | SymbolKind::Label => {
                BoundNode::bad(LookupResultKind::NotAValue, vec![symbol_id], Vec::new(), TypeId::ERROR, span)
            }
        }
    }

    /// A field or property read through `receiver` (`None` for static members).
    pub(crate) fn bind_value_member(&self, member: SymbolId, receiver: Option<BoundNode>, span: Span) -> BoundNode {
        let compilation = self.compilation;
        let receiver_type = receiver.as_ref().and_then(|r| r.ty);
        let ty = compilation.member_type(member, receiver_type);
        let receiver = receiver.map(Box::new);
        match &compilation.symbol(member).kind {
            SymbolKind::Field(data) => BoundNode::new(BoundKind::FieldAccess { receiver, field: member }, ty, span)
                .with_constant(data.constant.clone()),
            _ => BoundNode::new(BoundKind::PropertyAccess { receiver, property: member }, ty, span),
        }
    }

    /// The type a named type or type parameter denotes with `type_args`.
    pub(crate) fn construct_type(&self, symbol: SymbolId, type_args: &[TypeId]) -> TypeId {
        let compilation = self.compilation;
        match &compilation.symbol(symbol).kind {
            SymbolKind::NamedType(_) if !type_args.is_empty() => compilation.types().named(symbol, type_args),
            SymbolKind::NamedType(data) => data.declared_type,
            SymbolKind::TypeParameter(data) => data.declared_type,
            _ => TypeId::ERROR,
        }
    }

    // =========================================================================
    // Receivers: the color-color case
    // =========================================================================

    /// Bind the receiver of a member or element access.
    ///
    /// A bare identifier that names a value whose type has the same name as
    /// the identifier (`Color Color`) yields a [`BoundKind::TypeOrValue`]
    /// carrying both interpretations and their separate diagnostics.
    pub(crate) fn bind_receiver(&mut self, idx: NodeIndex, diag: &mut DiagnosticBag) -> BoundNode {
        let syntax = self.syntax;
        let Some(SyntaxData::Identifier(name)) = syntax.data(idx) else {
            return self.bind(idx, diag, false, false);
        };
        if !name.type_args.is_empty() {
            return self.bind(idx, diag, false, false);
        }
        let mut value_diagnostics = DiagnosticBag::new();
        let value = self.bind(idx, &mut value_diagnostics, false, false);
        let is_value = matches!(
            value.kind,
            BoundKind::Local { .. }
                | BoundKind::Parameter { .. }
                | BoundKind::RangeVariable { .. }
                | BoundKind::FieldAccess { .. }
                | BoundKind::PropertyAccess { .. }
        );
        let value_type = value.type_or_error();
        if !is_value || value.has_errors || !self.type_named(value_type, name.name) {
            diag.append(value_diagnostics);
            return value;
        }

        let mut type_diagnostics = DiagnosticBag::new();
        let result = self.lookup_simple_name(
            name.name,
            0,
            LookupOptions::NAMESPACES_OR_TYPES_ONLY,
            name.name_span,
        );
        let type_expression = if result.is_viable() {
            match self.resolve_single_symbol(&result, name.name, name.name_span, &mut type_diagnostics) {
                Resolved::Symbol(symbol) => {
                    BoundNode::new(BoundKind::TypeExpression, self.construct_type(symbol, &[]), value.span)
                }
                Resolved::Ambiguous { .. } => {
                    diag.append(value_diagnostics);
                    return value;
                }
            }
        } else {
            diag.append(value_diagnostics);
            return value;
        };
        if type_expression.ty != Some(value_type) {
            diag.append(value_diagnostics);
            return value;
        }
        trace!(name = %self.text(name.name), "receiver: color-color");
        let span = value.span;
        BoundNode::new(
            BoundKind::TypeOrValue(Box::new(TypeOrValue {
                value,
                value_diagnostics,
                type_expression,
                type_diagnostics,
            })),
            value_type,
            span,
        )
    }

    /// Whether `ty` is a named type whose simple name is `name`.
    fn type_named(&self, ty: TypeId, name: Atom) -> bool {
        self.compilation
            .type_symbol(ty)
            .is_some_and(|symbol| self.compilation.symbol(symbol).name == name)
    }

    // =========================================================================
    // Type syntax
    // =========================================================================

    pub(crate) fn bind_type_arguments(&mut self, type_args: &[NodeIndex], diag: &mut DiagnosticBag) -> Vec<TypeId> {
        type_args
            .iter()
            .map(|arg| self.bind_type(*arg, diag).type_or_error())
            .collect()
    }

    /// Bind type syntax; a namespace here is an error.
    pub(crate) fn bind_type(&mut self, idx: NodeIndex, diag: &mut DiagnosticBag) -> BoundNode {
        let bound = self.bind_namespace_or_type(idx, diag);
        match bound.kind {
            BoundKind::NamespaceExpression { namespace } => {
                diag.add(
                    diagnostic_codes::BAD_SYMBOL_KIND,
                    bound.span,
                    &[&self.compilation.qualified_name(namespace), "namespace", "type"],
                );
                BoundNode::bad(LookupResultKind::NotATypeOrNamespace, vec![namespace], Vec::new(), TypeId::ERROR, bound.span)
            }
            BoundKind::TypeExpression => bound,
            _ if bound.has_errors => bound,
            _ => {
                let span = bound.span;
                BoundNode::bad(LookupResultKind::NotATypeOrNamespace, Vec::new(), vec![bound], TypeId::ERROR, span)
            }
        }
    }

    /// Whether `idx` is the contextual keyword `var` and no type named `var` is in scope.
    pub(crate) fn is_implicitly_typed(&self, idx: NodeIndex) -> bool {
        let Some(SyntaxData::Identifier(name)) = self.syntax.data(idx) else {
            return false;
        };
        if !name.type_args.is_empty() || &*self.text(name.name) != "var" {
            return false;
        }
        !self
            .lookup_simple_name(name.name, 0, LookupOptions::NAMESPACES_OR_TYPES_ONLY, name.name_span)
            .is_viable()
    }

    /// Bind syntax that names a namespace or a type.
    pub(crate) fn bind_namespace_or_type(&mut self, idx: NodeIndex, diag: &mut DiagnosticBag) -> BoundNode {
        let syntax = self.syntax;
        let span = self.span(idx);
        let Some(data) = syntax.data(idx) else {
            return BoundNode::error(span);
        };
        match data {
            SyntaxData::PredefinedType(predefined) => {
                BoundNode::new(BoundKind::TypeExpression, predefined_type(*predefined), span)
            }
            SyntaxData::Identifier(name) => {
                let type_args = self.bind_type_arguments(&name.type_args, diag);
                let result = self.lookup_simple_name(
                    name.name,
                    name.arity(),
                    LookupOptions::NAMESPACES_OR_TYPES_ONLY,
                    name.name_span,
                );
                if !result.is_viable() {
                    if result.kind == LookupResultKind::Empty {
                        diag.add(
                            diagnostic_codes::TYPE_OR_NAMESPACE_NOT_FOUND,
                            name.name_span,
                            &[&self.text(name.name)],
                        );
                    } else {
                        self.report_lookup_failure(&result, name.name, name.name_span, diag);
                    }
                    return self.bad_type_from_lookup(&result, name.name, span);
                }
                self.namespace_or_type_from_result(&result, name.name, &type_args, span, diag)
            }
            SyntaxData::QualifiedName { left, right } => self.bind_qualified_name(*left, right, span, diag),
            SyntaxData::MemberAccess {
                receiver,
                name,
                conditional: false,
            } => self.bind_qualified_name(*receiver, name, span, diag),
            SyntaxData::ArrayType { element, rank } => {
                let element = self.bind_type(*element, diag);
                let ty = self.compilation.types().array(element.type_or_error(), *rank);
                self.wrap_type(ty, element.has_errors, span)
            }
            SyntaxData::PointerType { element } => {
                let element = self.bind_type(*element, diag);
                let ty = self.compilation.types().pointer(element.type_or_error());
                let mut has_errors = element.has_errors;
                if !has_errors && !self.in_unsafe_context() {
                    diag.add(diagnostic_codes::UNSAFE_NEEDED, span, &[]);
                    has_errors = true;
                }
                self.wrap_type(ty, has_errors, span)
            }
            SyntaxData::NullableType { element } => {
                let element = self.bind_type(*element, diag);
                let inner = element.type_or_error();
                let ty = if self.compilation.is_non_nullable_value_type(inner) {
                    self.compilation.types().nullable(inner)
                } else {
                    inner
                };
                self.wrap_type(ty, element.has_errors, span)
            }
            _ => {
                let bound = self.bind_value(idx, diag);
                let span = bound.span;
                if !bound.has_errors {
                    diag.add(diagnostic_codes::TYPE_OR_NAMESPACE_NOT_FOUND, span, &[data.kind_name()]);
                }
                BoundNode::bad(LookupResultKind::NotATypeOrNamespace, Vec::new(), vec![bound], TypeId::ERROR, span)
            }
        }
    }

    fn wrap_type(&self, ty: TypeId, has_errors: bool, span: Span) -> BoundNode {
        let node = BoundNode::new(BoundKind::TypeExpression, ty, span);
        if has_errors { node.with_errors() } else { node }
    }

    fn bad_type_from_lookup(&self, result: &LookupResult, name: Atom, span: Span) -> BoundNode {
        let mut bad = self.bad_from_lookup(result, name, span);
        if let BoundKind::BadExpression(data) = &mut bad.kind
            && data.result_kind == LookupResultKind::Empty
        {
            data.result_kind = LookupResultKind::NotATypeOrNamespace;
        }
        bad
    }

    fn namespace_or_type_from_result(
        &mut self,
        result: &LookupResult,
        name: Atom,
        type_args: &[TypeId],
        span: Span,
        diag: &mut DiagnosticBag,
    ) -> BoundNode {
        match self.resolve_single_symbol(result, name, span, diag) {
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
            } => BoundNode::bad(LookupResultKind::Ambiguous, candidates, Vec::new(), error_type, span),
        }
    }

    /// `Left.Right` in type position.
    fn bind_qualified_name(
        &mut self,
        left: NodeIndex,
        right: &SimpleName,
        span: Span,
        diag: &mut DiagnosticBag,
    ) -> BoundNode {
        let left = self.bind_namespace_or_type(left, diag);
        if left.has_errors {
            return BoundNode::bad(LookupResultKind::Empty, Vec::new(), vec![left], TypeId::ERROR, span);
        }
        let type_args = self.bind_type_arguments(&right.type_args, diag);
        let options = LookupOptions::NAMESPACES_OR_TYPES_ONLY;
        let (result, container_text, namespace_container) = match &left.kind {
            BoundKind::NamespaceExpression { namespace } => (
                self.lookup_in_namespace(*namespace, right.name, right.arity(), options, right.name_span),
                self.compilation.qualified_name(*namespace),
                true,
            ),
            _ => {
                let ty = left.type_or_error();
                let mut result = self.lookup_in_type(ty, right.name, right.arity(), options, right.name_span);
                result.symbols.retain(|s| self.compilation.symbol(*s).is_type());
                if result.symbols.is_empty() && result.kind == LookupResultKind::Viable {
                    result = LookupResult::empty();
                }
                (result, self.display_type(ty), false)
            }
        };
        if !result.is_viable() {
            if result.kind == LookupResultKind::Empty {
                let code = if namespace_container {
                    diagnostic_codes::NAMESPACE_MEMBER_NOT_FOUND
                } else {
                    diagnostic_codes::NESTED_TYPE_NOT_FOUND
                };
                diag.add(code, right.name_span, &[&self.text(right.name), &container_text]);
            } else {
                self.report_lookup_failure(&result, right.name, right.name_span, diag);
            }
            let mut bad = self.bad_type_from_lookup(&result, right.name, span);
            if let BoundKind::BadExpression(data) = &mut bad.kind {
                data.children.push(left);
            }
            return bad;
        }
        self.namespace_or_type_from_result(&result, right.name, &type_args, span, diag)
    }

    /// Whether `ty` is the error type or a type that contains it.
    pub(crate) fn is_erroneous_type(&self, ty: TypeId) -> bool {
        match self.compilation.type_data(ty) {
            TypeData::Error { .. } => true,
            TypeData::Array { element, .. } | TypeData::Pointer(element) | TypeData::Nullable(element) => {
                self.is_erroneous_type(element)
            }
            _ => false,
        }
    }
}

#[cfg(test)]
#[path = "../tests/names_tests.rs"]
mod tests;
