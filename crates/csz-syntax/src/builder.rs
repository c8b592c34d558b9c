//! Programmatic construction of syntax arenas.
//!
//! Leaf tokens get consecutive, non-overlapping spans as if they had been
//! written left to right; composite nodes span from their first to their last
//! child. That keeps diagnostic locations distinct and ordered.

use crate::arena::SyntaxArena;
use crate::node::{
    ArgumentSyntax, BinaryOperator, InitializerKind, LambdaParameter, Literal, NodeIndex,
    PredefinedType, RefKindSyntax, SimpleName, SyntaxData, UnaryOperator,
};
use csz_common::{Interner, Span};
use std::sync::Arc;

pub struct SyntaxBuilder<'a> {
    arena: SyntaxArena,
    interner: &'a Interner,
    offset: u32,
}

impl<'a> SyntaxBuilder<'a> {
    pub fn new(interner: &'a Interner) -> Self {
        Self {
            arena: SyntaxArena::new(),
            interner,
            offset: 0,
        }
    }

    pub fn finish(self) -> SyntaxArena {
        self.arena
    }

    pub fn arena(&self) -> &SyntaxArena {
        &self.arena
    }

    // =========================================================================
    // Span helpers
    // =========================================================================

    fn token(&mut self, len: usize) -> Span {
        let len = len.max(1) as u32;
        let span = Span::new(self.offset, self.offset + len);
        self.offset += len + 1;
        span
    }

    fn cover(&self, first: Span, nodes: &[NodeIndex]) -> Span {
        nodes
            .iter()
            .filter(|idx| idx.is_some())
            .fold(first, |acc, idx| acc.merge(self.arena.span(*idx)))
    }

    fn span_of(&self, nodes: &[NodeIndex]) -> Span {
        let mut spans = nodes.iter().filter(|i| i.is_some()).map(|i| self.arena.span(*i));
        match spans.next() {
            Some(first) => spans.fold(first, Span::merge),
            None => Span::DUMMY,
        }
    }

    fn leaf(&mut self, len: usize, data: SyntaxData) -> NodeIndex {
        let span = self.token(len);
        self.arena.alloc(span, data)
    }

    fn composite(&mut self, keyword_len: usize, children: &[NodeIndex], data: SyntaxData) -> NodeIndex {
        let span = if keyword_len > 0 {
            let keyword = self.token(keyword_len);
            self.cover(keyword, children)
        } else {
            self.span_of(children)
        };
        self.arena.alloc(span, data)
    }

    fn simple_name(&mut self, text: &str, type_args: Vec<NodeIndex>) -> SimpleName {
        let name_span = self.token(text.len());
        SimpleName {
            name: self.interner.intern(text),
            name_span,
            type_args,
        }
    }

    // =========================================================================
    // Literals and names
    // =========================================================================

    pub fn int(&mut self, value: u64) -> NodeIndex {
        self.leaf(value.to_string().len(), SyntaxData::Literal(Literal::Integer(value)))
    }

    pub fn double(&mut self, value: f64) -> NodeIndex {
        self.leaf(value.to_string().len(), SyntaxData::Literal(Literal::Double(value)))
    }

    pub fn boolean(&mut self, value: bool) -> NodeIndex {
        self.leaf(5, SyntaxData::Literal(Literal::Bool(value)))
    }

    pub fn string(&mut self, value: &str) -> NodeIndex {
        self.leaf(
            value.len() + 2,
            SyntaxData::Literal(Literal::String(Arc::from(value))),
        )
    }

    pub fn char(&mut self, value: char) -> NodeIndex {
        self.leaf(3, SyntaxData::Literal(Literal::Char(value)))
    }

    pub fn null(&mut self) -> NodeIndex {
        self.leaf(4, SyntaxData::Literal(Literal::Null))
    }

    pub fn ident(&mut self, text: &str) -> NodeIndex {
        self.generic(text, Vec::new())
    }

    pub fn generic(&mut self, text: &str, type_args: Vec<NodeIndex>) -> NodeIndex {
        let name = self.simple_name(text, type_args);
        let span = self.cover(name.name_span, &name.type_args);
        self.arena.alloc(span, SyntaxData::Identifier(name))
    }

    pub fn predefined(&mut self, ty: PredefinedType) -> NodeIndex {
        self.leaf(ty.keyword().len(), SyntaxData::PredefinedType(ty))
    }

    pub fn this(&mut self) -> NodeIndex {
        self.leaf(4, SyntaxData::This)
    }

    pub fn base(&mut self) -> NodeIndex {
        self.leaf(4, SyntaxData::Base)
    }

    pub fn missing(&mut self) -> NodeIndex {
        self.leaf(0, SyntaxData::Missing)
    }

    pub fn unsupported(&mut self, kind: &'static str) -> NodeIndex {
        self.leaf(kind.len(), SyntaxData::Unsupported { kind })
    }

    // =========================================================================
    // Member access, invocation, element access
    // =========================================================================

    pub fn member(&mut self, receiver: NodeIndex, name: &str) -> NodeIndex {
        self.member_access(receiver, name, Vec::new(), false)
    }

    pub fn conditional_member(&mut self, receiver: NodeIndex, name: &str) -> NodeIndex {
        self.member_access(receiver, name, Vec::new(), true)
    }

    pub fn generic_member(&mut self, receiver: NodeIndex, name: &str, type_args: Vec<NodeIndex>) -> NodeIndex {
        self.member_access(receiver, name, type_args, false)
    }

    fn member_access(
        &mut self,
        receiver: NodeIndex,
        text: &str,
        type_args: Vec<NodeIndex>,
        conditional: bool,
    ) -> NodeIndex {
        let name = self.simple_name(text, type_args);
        let span = self.arena.span(receiver).merge(name.name_span);
        let span = self.cover(span, &name.type_args);
        self.arena.alloc(
            span,
            SyntaxData::MemberAccess {
                receiver,
                name,
                conditional,
            },
        )
    }

    pub fn call(&mut self, target: NodeIndex, arguments: Vec<NodeIndex>) -> NodeIndex {
        let mut children = vec![target];
        children.extend(&arguments);
        let close = self.token(1);
        let span = self.cover(close, &children);
        self.arena.alloc(span, SyntaxData::Invocation { target, arguments })
    }

    pub fn element(&mut self, receiver: NodeIndex, arguments: Vec<NodeIndex>) -> NodeIndex {
        self.element_access(receiver, arguments, false)
    }

    pub fn conditional_element(&mut self, receiver: NodeIndex, arguments: Vec<NodeIndex>) -> NodeIndex {
        self.element_access(receiver, arguments, true)
    }

    fn element_access(&mut self, receiver: NodeIndex, arguments: Vec<NodeIndex>, conditional: bool) -> NodeIndex {
        let mut children = vec![receiver];
        children.extend(&arguments);
        let close = self.token(1);
        let span = self.cover(close, &children);
        self.arena.alloc(
            span,
            SyntaxData::ElementAccess {
                receiver,
                arguments,
                conditional,
            },
        )
    }

    // =========================================================================
    // Arguments
    // =========================================================================

    pub fn arg(&mut self, expression: NodeIndex) -> NodeIndex {
        self.argument(None, RefKindSyntax::None, expression)
    }

    pub fn named_arg(&mut self, name: &str, expression: NodeIndex) -> NodeIndex {
        self.argument(Some(name), RefKindSyntax::None, expression)
    }

    pub fn ref_arg(&mut self, expression: NodeIndex) -> NodeIndex {
        self.argument(None, RefKindSyntax::Ref, expression)
    }

    pub fn out_arg(&mut self, expression: NodeIndex) -> NodeIndex {
        self.argument(None, RefKindSyntax::Out, expression)
    }

    pub fn in_arg(&mut self, expression: NodeIndex) -> NodeIndex {
        self.argument(None, RefKindSyntax::In, expression)
    }

    pub fn argument(&mut self, name: Option<&str>, ref_kind: RefKindSyntax, expression: NodeIndex) -> NodeIndex {
        let name = name.map(|text| {
            let span = self.token(text.len());
            (self.interner.intern(text), span)
        });
        let first = name
            .map(|(_, span)| span)
            .unwrap_or_else(|| self.arena.span(expression));
        let span = self.cover(first, &[expression]);
        self.arena.alloc(
            span,
            SyntaxData::Argument(ArgumentSyntax {
                name,
                ref_kind,
                expression,
            }),
        )
    }

    pub fn arglist(&mut self, arguments: Vec<NodeIndex>) -> NodeIndex {
        let children = arguments.clone();
        self.composite(9, &children, SyntaxData::ArgList { arguments })
    }

    // =========================================================================
    // Creation and initializers
    // =========================================================================

    pub fn new_object(
        &mut self,
        ty: NodeIndex,
        arguments: Option<Vec<NodeIndex>>,
        initializer: Option<NodeIndex>,
    ) -> NodeIndex {
        let mut children = vec![ty];
        children.extend(arguments.iter().flatten());
        children.extend(initializer);
        self.composite(
            3,
            &children,
            SyntaxData::ObjectCreation {
                ty,
                arguments,
                initializer,
            },
        )
    }

    /// `new element[sizes] initializer`; use [`NodeIndex::NONE`] for an omitted size.
    pub fn new_array(&mut self, element_type: NodeIndex, sizes: Vec<NodeIndex>, initializer: Option<NodeIndex>) -> NodeIndex {
        self.new_array_ranks(element_type, vec![sizes], initializer)
    }

    pub fn new_array_ranks(
        &mut self,
        element_type: NodeIndex,
        rank_specifiers: Vec<Vec<NodeIndex>>,
        initializer: Option<NodeIndex>,
    ) -> NodeIndex {
        let mut children = vec![element_type];
        children.extend(rank_specifiers.iter().flatten());
        children.extend(initializer);
        self.composite(
            3,
            &children,
            SyntaxData::ArrayCreation {
                element_type,
                rank_specifiers,
                initializer,
            },
        )
    }

    pub fn new_implicit_array(&mut self, rank: u32, initializer: NodeIndex) -> NodeIndex {
        self.composite(5, &[initializer], SyntaxData::ImplicitArrayCreation { rank, initializer })
    }

    pub fn array_init(&mut self, elements: Vec<NodeIndex>) -> NodeIndex {
        self.initializer(InitializerKind::Array, elements)
    }

    pub fn object_init(&mut self, elements: Vec<NodeIndex>) -> NodeIndex {
        self.initializer(InitializerKind::Object, elements)
    }

    pub fn collection_init(&mut self, elements: Vec<NodeIndex>) -> NodeIndex {
        self.initializer(InitializerKind::Collection, elements)
    }

    pub fn complex_init(&mut self, elements: Vec<NodeIndex>) -> NodeIndex {
        self.initializer(InitializerKind::Complex, elements)
    }

    fn initializer(&mut self, kind: InitializerKind, elements: Vec<NodeIndex>) -> NodeIndex {
        let open = self.token(1);
        let mut span = self.cover(open, &elements);
        span = span.merge(self.token(1));
        self.arena.alloc(span, SyntaxData::Initializer { kind, elements })
    }

    pub fn assign(&mut self, left: NodeIndex, right: NodeIndex) -> NodeIndex {
        let span = self.span_of(&[left, right]);
        self.arena.alloc(span, SyntaxData::Assignment { left, right })
    }

    pub fn implicit_element(&mut self, arguments: Vec<NodeIndex>) -> NodeIndex {
        let children = arguments.clone();
        self.composite(1, &children, SyntaxData::ImplicitElementAccess { arguments })
    }

    // =========================================================================
    // Operators and other expressions
    // =========================================================================

    pub fn paren(&mut self, inner: NodeIndex) -> NodeIndex {
        self.composite(1, &[inner], SyntaxData::Parenthesized(inner))
    }

    pub fn cast(&mut self, ty: NodeIndex, expression: NodeIndex) -> NodeIndex {
        self.composite(1, &[ty, expression], SyntaxData::Cast { ty, expression })
    }

    pub fn binary(&mut self, operator: BinaryOperator, left: NodeIndex, right: NodeIndex) -> NodeIndex {
        let span = self.span_of(&[left, right]);
        self.arena.alloc(span, SyntaxData::Binary { operator, left, right })
    }

    pub fn unary(&mut self, operator: UnaryOperator, operand: NodeIndex) -> NodeIndex {
        self.composite(1, &[operand], SyntaxData::Unary { operator, operand })
    }

    pub fn lambda(&mut self, parameters: &[&str], body: NodeIndex) -> NodeIndex {
        let parameters = parameters
            .iter()
            .map(|p| LambdaParameter {
                name: self.interner.intern(p),
                ty: None,
            })
            .collect();
        self.composite(2, &[body], SyntaxData::Lambda { parameters, body })
    }

    pub fn typed_lambda(&mut self, parameters: Vec<(&str, NodeIndex)>, body: NodeIndex) -> NodeIndex {
        let parameters = parameters
            .into_iter()
            .map(|(p, ty)| LambdaParameter {
                name: self.interner.intern(p),
                ty: Some(ty),
            })
            .collect();
        self.composite(2, &[body], SyntaxData::Lambda { parameters, body })
    }

    pub fn default_of(&mut self, ty: NodeIndex) -> NodeIndex {
        self.composite(7, &[ty], SyntaxData::Default { ty })
    }

    pub fn type_of(&mut self, ty: NodeIndex) -> NodeIndex {
        self.composite(6, &[ty], SyntaxData::TypeOf { ty })
    }

    // =========================================================================
    // Type syntax
    // =========================================================================

    pub fn qualified(&mut self, left: NodeIndex, text: &str) -> NodeIndex {
        let right = self.simple_name(text, Vec::new());
        let span = self.arena.span(left).merge(right.name_span);
        self.arena.alloc(span, SyntaxData::QualifiedName { left, right })
    }

    pub fn array_type(&mut self, element: NodeIndex, rank: u32) -> NodeIndex {
        self.composite(1 + rank as usize, &[element], SyntaxData::ArrayType { element, rank })
    }

    pub fn pointer_type(&mut self, element: NodeIndex) -> NodeIndex {
        self.composite(1, &[element], SyntaxData::PointerType { element })
    }

    pub fn nullable_type(&mut self, element: NodeIndex) -> NodeIndex {
        self.composite(1, &[element], SyntaxData::NullableType { element })
    }

    // =========================================================================
    // Patterns and switch statements
    // =========================================================================

    pub fn constant_pattern(&mut self, expression: NodeIndex) -> NodeIndex {
        let span = self.arena.span(expression);
        self.arena.alloc(span, SyntaxData::ConstantPattern { expression })
    }

    pub fn type_pattern(&mut self, ty: NodeIndex) -> NodeIndex {
        let span = self.arena.span(ty);
        self.arena.alloc(span, SyntaxData::TypePattern { ty })
    }

    pub fn declaration_pattern(&mut self, ty: NodeIndex, name: &str) -> NodeIndex {
        let name_span = self.token(name.len());
        let designation = if name == "_" {
            None
        } else {
            Some((self.interner.intern(name), name_span))
        };
        let span = self.arena.span(ty).merge(name_span);
        self.arena.alloc(span, SyntaxData::DeclarationPattern { ty, designation })
    }

    pub fn var_pattern(&mut self, name: &str) -> NodeIndex {
        let var = self.ident("var");
        self.declaration_pattern(var, name)
    }

    pub fn discard_pattern(&mut self) -> NodeIndex {
        self.leaf(1, SyntaxData::DiscardPattern)
    }

    pub fn case_label(&mut self, pattern: NodeIndex) -> NodeIndex {
        self.composite(4, &[pattern], SyntaxData::CaseLabel { pattern, guard: None })
    }

    pub fn case_label_when(&mut self, pattern: NodeIndex, guard: NodeIndex) -> NodeIndex {
        self.composite(
            4,
            &[pattern, guard],
            SyntaxData::CaseLabel {
                pattern,
                guard: Some(guard),
            },
        )
    }

    pub fn default_label(&mut self) -> NodeIndex {
        self.leaf(7, SyntaxData::DefaultLabel)
    }

    pub fn statement(&mut self) -> NodeIndex {
        self.leaf(6, SyntaxData::OpaqueStatement)
    }

    pub fn section(&mut self, labels: Vec<NodeIndex>, statements: Vec<NodeIndex>) -> NodeIndex {
        let mut children = labels.clone();
        children.extend(&statements);
        let span = self.span_of(&children);
        self.arena.alloc(span, SyntaxData::SwitchSection { labels, statements })
    }

    pub fn switch(&mut self, expression: NodeIndex, sections: Vec<NodeIndex>) -> NodeIndex {
        let mut children = vec![expression];
        children.extend(&sections);
        self.composite(6, &children, SyntaxData::Switch { expression, sections })
    }
}

#[cfg(test)]
#[path = "../tests/builder_tests.rs"]
mod tests;
