//! Array creation.
//!
//! `new T[n, m] { ... }`, `new T[] { ... }` and `new[] { ... }` all go
//! through the same three passes over the initializer:
//!
//! 1. collect: walk the initializer by dimension, binding every leaf and
//!    flagging values found where a nested `{ ... }` was expected;
//! 2. reconcile: compare each list's length with the size known for its
//!    dimension (declared by a constant, or inferred from the first sibling);
//! 3. materialize: convert leaves to the element type and build the
//!    [`BoundKind::ArrayInitialization`] tree.
//!
//! Implicitly typed arrays run pass 1 first and infer the element type from
//! the leaves before converting them.

use crate::binder::Binder;
use crate::bound::{BoundKind, BoundNode};
use crate::lookup::LookupResultKind;
use csz_common::diagnostics::diagnostic_codes;
use csz_common::{DiagnosticBag, Span};
use csz_symbols::{ConstantValue, TypeId};
use csz_syntax::{InitializerKind, NodeIndex, SyntaxData};
use tracing::{debug, trace};

/// What is known about the length of one dimension.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum KnownSize {
    Unknown,
    /// A constant size expression.
    Declared(usize),
    /// Length of the first initializer list seen at this depth.
    Inferred(usize),
    /// The size expression was already reported; mismatches stay silent.
    Erroneous,
}

/// Initializer after pass 1: lists by dimension, bound leaves at the bottom.
enum InitTree {
    List {
        span: Span,
        elements: Vec<InitTree>,
        has_errors: bool,
    },
    Leaf(BoundNode),
}

impl InitTree {
    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a BoundNode>) {
        match self {
            InitTree::List { elements, .. } => elements.iter().for_each(|e| e.collect_leaves(out)),
            InitTree::Leaf(node) => out.push(node),
        }
    }
}

impl<'c> Binder<'c> {
    // =========================================================================
    // Explicit array creation
    // =========================================================================

    pub(crate) fn bind_array_creation(
        &mut self,
        element_type: NodeIndex,
        rank_specifiers: &[Vec<NodeIndex>],
        initializer: Option<NodeIndex>,
        span: Span,
        diag: &mut DiagnosticBag,
    ) -> BoundNode {
        let element_node = self.bind_type(element_type, diag);
        let compilation = self.compilation;
        let types = compilation.types();

        // `new int[2][,]` creates an array of `int[,]`: later specifiers wrap
        // the element type right to left.
        let mut element = element_node.type_or_error();
        for specifier in rank_specifiers.iter().skip(1).rev() {
            element = types.array(element, specifier.len() as u32);
        }
        let size_syntax: &[NodeIndex] = rank_specifiers.first().map_or(&[], Vec::as_slice);
        let rank = size_syntax.len().max(1);
        let array_type = types.array(element, rank as u32);
        trace!(ty = %self.display_type(array_type), rank, has_initializer = initializer.is_some(), "array creation");

        let mut known = vec![KnownSize::Unknown; rank];
        let mut sizes = Vec::new();
        for (dimension, &size_idx) in size_syntax.iter().enumerate() {
            if size_idx.is_none() {
                continue;
            }
            let (size, size_known) = self.bind_array_size(size_idx, initializer.is_some(), diag);
            known[dimension] = size_known;
            sizes.push(size);
        }

        let Some(initializer) = initializer else {
            if sizes.is_empty() {
                diag.add(diagnostic_codes::MISSING_ARRAY_SIZE, span, &[]);
                return BoundNode::bad(LookupResultKind::Empty, Vec::new(), vec![element_node], array_type, span);
            }
            let node = BoundNode::new(
                BoundKind::ArrayCreation {
                    sizes,
                    initializer: None,
                },
                array_type,
                span,
            );
            return if element_node.has_errors { node.with_errors() } else { node };
        };

        let mut tree = self.collect_initializer(initializer, 0, rank, diag);
        self.reconcile_lengths(&mut tree, 0, &mut known, diag);
        let initializer = self.materialize_initializer(tree, 0, rank, array_type, element, diag);
        if sizes.is_empty() {
            sizes = known
                .iter()
                .map(|size| self.synthesized_size(*size, initializer.span))
                .collect();
        }
        let node = BoundNode::new(
            BoundKind::ArrayCreation {
                sizes,
                initializer: Some(Box::new(initializer)),
            },
            array_type,
            span,
        );
        if element_node.has_errors { node.with_errors() } else { node }
    }

    /// Bind one size expression and work out what it says about its dimension.
    fn bind_array_size(
        &mut self,
        size_idx: NodeIndex,
        has_initializer: bool,
        diag: &mut DiagnosticBag,
    ) -> (BoundNode, KnownSize) {
        let size = self.bind_value(size_idx, diag);
        let size = self.convert_to_array_index(size, diag);
        if size.has_errors {
            return (size, KnownSize::Erroneous);
        }
        match size.constant.as_ref().and_then(ConstantValue::as_integral) {
            Some(value) if value < 0 => {
                diag.add(diagnostic_codes::NEGATIVE_ARRAY_SIZE, size.span, &[]);
                (size.with_errors(), KnownSize::Erroneous)
            }
            Some(value) => (size, KnownSize::Declared(usize::try_from(value).unwrap_or(usize::MAX))),
            None if has_initializer => {
                diag.add(diagnostic_codes::CONSTANT_EXPECTED, size.span, &[]);
                (size.with_errors(), KnownSize::Erroneous)
            }
            None => (size, KnownSize::Unknown),
        }
    }

    /// Convert an array size or index to the first of `int`, `uint`, `long`,
    /// `ulong` it implicitly converts to. When none works the failure is
    /// reported against `int`.
    pub(crate) fn convert_to_array_index(&mut self, index: BoundNode, diag: &mut DiagnosticBag) -> BoundNode {
        let compilation = self.compilation;
        if index.has_errors || index.ty.is_some_and(|ty| compilation.is_error_type(ty)) {
            return index;
        }
        let ctx = self.conversion_context();
        for target in [TypeId::INT, TypeId::UINT, TypeId::LONG, TypeId::ULONG] {
            let conversion = self.collaborators.conversions.classify_expression(&ctx, &index, target);
            if conversion.is_implicit() {
                return self.create_conversion(index, conversion, target, false, diag);
            }
        }
        self.convert_to_type(index, TypeId::INT, diag)
    }

    // =========================================================================
    // Implicitly typed array creation
    // =========================================================================

    /// `new[] { ... }` and `new[,] { ... }`: the element type is the best
    /// common type of every leaf.
    pub(crate) fn bind_implicit_array_creation(
        &mut self,
        rank: u32,
        initializer: NodeIndex,
        span: Span,
        diag: &mut DiagnosticBag,
    ) -> BoundNode {
        let rank = rank.max(1) as usize;
        let mut tree = self.collect_initializer(initializer, 0, rank, diag);

        let mut leaves = Vec::new();
        tree.collect_leaves(&mut leaves);
        let ctx = self.conversion_context();
        let best = self.collaborators.conversions.best_common_type(&ctx, &leaves);
        let element = match best {
            Some(ty) => ty,
            None => {
                diag.add(diagnostic_codes::NO_BEST_TYPE_FOR_ARRAY, span, &[]);
                TypeId::ERROR
            }
        };
        debug!(element = %self.display_type(element), leaves = leaves.len(), rank, "implicit array element type");

        let array_type = self.compilation.types().array(element, rank as u32);
        let mut known = vec![KnownSize::Unknown; rank];
        self.reconcile_lengths(&mut tree, 0, &mut known, diag);
        let initializer = self.materialize_initializer(tree, 0, rank, array_type, element, diag);
        let sizes = known
            .iter()
            .map(|size| self.synthesized_size(*size, initializer.span))
            .collect();
        let node = BoundNode::new(
            BoundKind::ArrayCreation {
                sizes,
                initializer: Some(Box::new(initializer)),
            },
            array_type,
            span,
        );
        if best.is_none() { node.with_errors() } else { node }
    }

    // =========================================================================
    // Initializer passes
    // =========================================================================

    /// Pass 1. Dimensions `0..rank` expect nested lists; dimension `rank`
    /// expects values.
    fn collect_initializer(&mut self, idx: NodeIndex, depth: usize, rank: usize, diag: &mut DiagnosticBag) -> InitTree {
        let syntax = self.syntax;
        let span = self.span(idx);
        if depth == rank {
            // A nested list here reaches the dispatcher and is reported there.
            return InitTree::Leaf(self.bind_value(idx, diag));
        }
        match syntax.data(idx) {
            Some(SyntaxData::Initializer {
                kind: InitializerKind::Array,
                elements,
            }) => InitTree::List {
                span,
                elements: elements
                    .iter()
                    .map(|element| self.collect_initializer(*element, depth + 1, rank, diag))
                    .collect(),
                has_errors: false,
            },
            _ => {
                diag.add(diagnostic_codes::NESTED_ARRAY_INITIALIZER_EXPECTED, span, &[]);
                let value = self.bind_value(idx, diag);
                InitTree::Leaf(BoundNode::bad(LookupResultKind::Empty, Vec::new(), vec![value], TypeId::ERROR, span))
            }
        }
    }

    /// Pass 2. The first list at each depth fixes that dimension's length
    /// when no constant size did.
    fn reconcile_lengths(&self, tree: &mut InitTree, depth: usize, known: &mut [KnownSize], diag: &mut DiagnosticBag) {
        let InitTree::List {
            span,
            elements,
            has_errors,
        } = tree
        else {
            return;
        };
        let length = elements.len();
        match known[depth] {
            KnownSize::Unknown => known[depth] = KnownSize::Inferred(length),
            KnownSize::Declared(expected) if expected != length => {
                if self.options.strict_array_initializer_lengths {
                    diag.add(
                        diagnostic_codes::ARRAY_INITIALIZER_INCORRECT_LENGTH,
                        *span,
                        &[&expected.to_string()],
                    );
                    *has_errors = true;
                }
            }
            KnownSize::Inferred(expected) if expected != length => {
                diag.add(
                    diagnostic_codes::ARRAY_INITIALIZER_INCORRECT_LENGTH,
                    *span,
                    &[&expected.to_string()],
                );
                *has_errors = true;
            }
            _ => {}
        }
        if depth + 1 < known.len() {
            for element in elements.iter_mut() {
                self.reconcile_lengths(element, depth + 1, known, diag);
            }
        }
    }

    /// Pass 3.
    fn materialize_initializer(
        &mut self,
        tree: InitTree,
        depth: usize,
        rank: usize,
        array_type: TypeId,
        element: TypeId,
        diag: &mut DiagnosticBag,
    ) -> BoundNode {
        match tree {
            InitTree::List {
                span,
                elements,
                has_errors,
            } => {
                let elements = elements
                    .into_iter()
                    .map(|e| self.materialize_initializer(e, depth + 1, rank, array_type, element, diag))
                    .collect();
                let node = BoundNode::new(BoundKind::ArrayInitialization { elements }, array_type, span);
                if has_errors { node.with_errors() } else { node }
            }
            InitTree::Leaf(leaf) if depth == rank && !self.compilation.is_error_type(element) => {
                self.convert_to_type(leaf, element, diag)
            }
            InitTree::Leaf(leaf) => leaf,
        }
    }

    /// Size of a dimension given only by its initializer.
    fn synthesized_size(&self, size: KnownSize, span: Span) -> BoundNode {
        let length = match size {
            KnownSize::Declared(n) | KnownSize::Inferred(n) => n,
            KnownSize::Unknown | KnownSize::Erroneous => 0,
        };
        BoundNode::new(BoundKind::Literal, TypeId::INT, span)
            .with_constant(Some(ConstantValue::Integral(length as i128)))
    }
}

#[cfg(test)]
#[path = "../tests/arrays_tests.rs"]
mod tests;
