//! Expression dispatcher.
//!
//! [`Binder::bind`] is the single entry point every expression goes through.
//! It routes each syntax kind to its binding routine with an exhaustive
//! match, guards recursion depth, and runs the unsafe-context check on the
//! result so the individual routines never have to.

use crate::binder::Binder;
use crate::bound::{BoundKind, BoundNode};
use crate::lookup::LookupResultKind;
use csz_common::DiagnosticBag;
use csz_common::diagnostics::diagnostic_codes;
use csz_symbols::TypeId;
use csz_syntax::{InitializerKind, NodeIndex, SyntaxData};
use tracing::{trace, warn};

/// Stack left before `stacker` switches to a fresh segment.
const STACK_RED_ZONE: usize = 64 * 1024;
/// Size of each additional stack segment.
const STACK_GROWTH: usize = 2 * 1024 * 1024;

impl<'c> Binder<'c> {
    /// Bind an expression and require a value: types, namespaces and the
    /// type half of a color-color receiver are rejected here.
    pub fn bind_expression(&mut self, idx: NodeIndex, diag: &mut DiagnosticBag) -> BoundNode {
        self.bind_value(idx, diag)
    }

    /// Bind any expression. `__arglist` is reported here; `invoked` and
    /// `indexed` tell name binding what position the expression is in.
    pub fn bind(&mut self, idx: NodeIndex, diag: &mut DiagnosticBag, invoked: bool, indexed: bool) -> BoundNode {
        let bound = self.bind_checked(idx, diag, invoked, indexed);
        if matches!(bound.kind, BoundKind::ArgList { .. }) {
            diag.add(diagnostic_codes::ILLEGAL_ARGLIST, bound.span, &[]);
            let span = bound.span;
            return BoundNode::bad(LookupResultKind::Empty, Vec::new(), vec![bound], TypeId::ERROR, span);
        }
        bound
    }

    /// Like [`Binder::bind`] but allows `__arglist`, for argument positions.
    pub fn bind_allowing_arglist(&mut self, idx: NodeIndex, diag: &mut DiagnosticBag) -> BoundNode {
        self.bind_checked(idx, diag, false, false)
    }

    /// Bind `idx` as a value.
    pub(crate) fn bind_value(&mut self, idx: NodeIndex, diag: &mut DiagnosticBag) -> BoundNode {
        let bound = self.bind(idx, diag, false, false);
        self.check_value(bound, diag)
    }

    /// Reject expressions that are not values. A color-color receiver used
    /// as a value takes its value interpretation and that branch's diagnostics.
    pub(crate) fn check_value(&mut self, bound: BoundNode, diag: &mut DiagnosticBag) -> BoundNode {
        match bound.kind {
            BoundKind::TypeOrValue(data) => {
                let data = *data;
                diag.append(data.value_diagnostics);
                data.value
            }
            BoundKind::TypeExpression => {
                let ty = bound.type_or_error();
                if !bound.has_errors {
                    let kind = self
                        .compilation
                        .type_kind(ty)
                        .map_or("type", |kind| kind.description());
                    diag.add(
                        diagnostic_codes::BAD_SYMBOL_KIND_CONTEXT,
                        bound.span,
                        &[&self.display_type(ty), kind],
                    );
                }
                let candidates = self.compilation.type_symbol(ty).into_iter().collect();
                let span = bound.span;
                BoundNode::bad(LookupResultKind::NotAValue, candidates, vec![bound], TypeId::ERROR, span)
            }
            BoundKind::NamespaceExpression { namespace } => {
                if !bound.has_errors {
                    diag.add(
                        diagnostic_codes::BAD_SYMBOL_KIND,
                        bound.span,
                        &[&self.compilation.qualified_name(namespace), "namespace", "variable"],
                    );
                }
                let span = bound.span;
                BoundNode::bad(LookupResultKind::NotAValue, vec![namespace], vec![bound], TypeId::ERROR, span)
            }
            _ => bound,
        }
    }

    /// Depth guard, stack growth and the unsafe post-check around [`Binder::dispatch`].
    fn bind_checked(&mut self, idx: NodeIndex, diag: &mut DiagnosticBag, invoked: bool, indexed: bool) -> BoundNode {
        if self.depth >= self.options.max_expression_depth {
            let span = self.span(idx);
            diag.add(diagnostic_codes::EXPRESSION_TOO_COMPLEX, span, &[]);
            return BoundNode::error(span);
        }
        self.depth += 1;
        let bound = stacker::maybe_grow(STACK_RED_ZONE, STACK_GROWTH, || {
            self.dispatch(idx, diag, invoked, indexed)
        });
        self.depth -= 1;
        self.check_unsafe(bound, diag)
    }

    /// Pointer-typed results need an unsafe context. Reported once, at the
    /// innermost node, since parents inherit `has_errors`.
    fn check_unsafe(&self, bound: BoundNode, diag: &mut DiagnosticBag) -> BoundNode {
        let Some(ty) = bound.ty else {
            return bound;
        };
        if bound.has_errors || !self.compilation.contains_pointer(ty) || self.in_unsafe_context() {
            return bound;
        }
        diag.add(diagnostic_codes::UNSAFE_NEEDED, bound.span, &[]);
        bound.with_errors()
    }

    fn dispatch(&mut self, idx: NodeIndex, diag: &mut DiagnosticBag, invoked: bool, indexed: bool) -> BoundNode {
        let syntax = self.syntax;
        let span = self.span(idx);
        let Some(data) = syntax.data(idx) else {
            return BoundNode::error(span);
        };
        trace!(kind = data.kind_name(), depth = self.depth, invoked, indexed, "bind");
        match data {
            SyntaxData::Literal(literal) => self.bind_literal(literal, span),
            SyntaxData::Identifier(name) => self.bind_identifier(name, span, invoked, diag),
            SyntaxData::PredefinedType(_)
            | SyntaxData::QualifiedName { .. }
            | SyntaxData::ArrayType { .. }
            | SyntaxData::PointerType { .. }
            | SyntaxData::NullableType { .. } => self.bind_namespace_or_type(idx, diag),
            SyntaxData::MemberAccess {
                receiver,
                name,
                conditional,
            } => {
                if *conditional {
                    self.bind_conditional_access(*receiver, span, diag, |binder, receiver, diag| {
                        binder.bind_member_of_receiver(receiver, name, span, invoked, diag)
                    })
                } else {
                    self.bind_member_access(*receiver, name, span, invoked, diag)
                }
            }
            SyntaxData::Invocation { target, arguments } => self.bind_invocation(*target, arguments, span, diag),
            SyntaxData::ElementAccess {
                receiver,
                arguments,
                conditional,
            } => {
                if *conditional {
                    self.bind_conditional_access(*receiver, span, diag, |binder, receiver, diag| {
                        binder.bind_element_access_on(receiver, arguments, span, diag)
                    })
                } else {
                    self.bind_element_access(*receiver, arguments, span, diag)
                }
            }
            SyntaxData::ObjectCreation {
                ty,
                arguments,
                initializer,
            } => self.bind_object_creation(*ty, arguments.as_deref(), *initializer, span, diag),
            SyntaxData::ArrayCreation {
                element_type,
                rank_specifiers,
                initializer,
            } => self.bind_array_creation(*element_type, rank_specifiers, *initializer, span, diag),
            SyntaxData::ImplicitArrayCreation { rank, initializer } => {
                self.bind_implicit_array_creation(*rank, *initializer, span, diag)
            }
            SyntaxData::Initializer {
                kind: InitializerKind::Array,
                elements,
            } => {
                diag.add(diagnostic_codes::ARRAY_INIT_IN_BAD_PLACE, span, &[]);
                let children = elements.iter().map(|e| self.bind_value(*e, diag)).collect();
                BoundNode::bad(LookupResultKind::Empty, Vec::new(), children, TypeId::ERROR, span)
            }
            SyntaxData::Assignment { left, right } => self.bind_assignment(*left, *right, span, diag),
            SyntaxData::ImplicitElementAccess { arguments } if self.implicit_receiver.is_some() => {
                self.bind_implicit_element_access(arguments, span, diag)
            }
            SyntaxData::Parenthesized(inner) => {
                let mut bound = self.bind_value(*inner, diag);
                bound.span = span;
                bound
            }
            SyntaxData::Cast { ty, expression } => self.bind_cast(*ty, *expression, span, diag),
            SyntaxData::Binary { operator, left, right } => self.bind_binary(*operator, *left, *right, span, diag),
            SyntaxData::Unary { operator, operand } => self.bind_unary(*operator, *operand, span, diag),
            SyntaxData::Lambda { parameters, body } => self.bind_lambda(parameters, *body, span, diag),
            SyntaxData::This => self.bind_this(span, diag),
            SyntaxData::Base => self.bind_base(span, diag),
            SyntaxData::Default { ty } => self.bind_default(*ty, span, diag),
            SyntaxData::TypeOf { ty } => self.bind_type_of(*ty, span, diag),
            SyntaxData::ArgList { arguments } => self.bind_arglist(arguments, span, diag),
            // The parser already reported whatever produced this node.
            SyntaxData::Missing => BoundNode::error(span),
            SyntaxData::Unsupported { .. }
            | SyntaxData::Initializer { .. }
            | SyntaxData::ImplicitElementAccess { .. }
            | SyntaxData::Argument(_)
            | SyntaxData::ConstantPattern { .. }
            | SyntaxData::TypePattern { .. }
            | SyntaxData::DeclarationPattern { .. }
            | SyntaxData::DiscardPattern
            | SyntaxData::Switch { .. }
            | SyntaxData::SwitchSection { .. }
            | SyntaxData::CaseLabel { .. }
            | SyntaxData::DefaultLabel
            | SyntaxData::OpaqueStatement => {
                warn!(kind = data.kind_name(), node = idx.0, "bind: unexpected syntax kind in expression position");
                debug_assert!(false, "unexpected syntax kind in expression position: {}", data.kind_name());
                BoundNode::error(span)
            }
        }
    }
}

#[cfg(test)]
#[path = "../tests/dispatch_tests.rs"]
mod tests;
