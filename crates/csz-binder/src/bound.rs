//! Bound nodes.
//!
//! A [`BoundNode`] is one semantically resolved expression: a kind tag with
//! its payload, a type, a source span, an optional constant value and a
//! `has_errors` flag. Nodes form a tree owned top-down; a node is never
//! mutated once its parent has been built.
//!
//! Invariants:
//! - `ty` is `None` only for [`BoundKind::UnboundLambda`].
//! - `has_errors` is true iff the node itself failed or any child has errors.
//! - [`BoundKind::BadExpression`] always has `has_errors` set.

use crate::conversions::Conversion;
use crate::lookup::LookupResultKind;
use csz_common::{Atom, DiagnosticBag, Span};
use csz_symbols::{ConstantValue, SymbolId, TypeId};
use csz_syntax::{BinaryOperator, NodeIndex, UnaryOperator};

/// Index of a pattern variable declared while binding one switch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PatternVariableId(pub u32);

#[derive(Clone, Debug)]
pub struct BoundNode {
    pub kind: BoundKind,
    pub ty: Option<TypeId>,
    pub span: Span,
    pub has_errors: bool,
    pub constant: Option<ConstantValue>,
}

/// A method group: every method a name found, before overload resolution.
#[derive(Clone, Debug)]
pub struct MethodGroup {
    /// `None` for a static context or an unqualified name without `this`.
    pub receiver: Option<Box<BoundNode>>,
    pub name: Atom,
    pub methods: Vec<SymbolId>,
    pub type_args: Vec<TypeId>,
    pub result_kind: LookupResultKind,
    /// The receiver is a value, so extension methods apply.
    pub search_extensions: bool,
}

/// A receiver that is both a value and a type of the same name
/// (`Color Color;`). Each interpretation keeps its own diagnostics; the
/// consumer picks one and appends only that bag.
#[derive(Clone, Debug)]
pub struct TypeOrValue {
    pub value: BoundNode,
    pub value_diagnostics: DiagnosticBag,
    pub type_expression: BoundNode,
    pub type_diagnostics: DiagnosticBag,
}

#[derive(Clone, Debug)]
pub struct BoundCall {
    pub receiver: Option<Box<BoundNode>>,
    pub method: SymbolId,
    pub arguments: Vec<BoundNode>,
    /// Parameter index each argument maps to.
    pub arg_to_param: Vec<usize>,
    pub expanded: bool,
    pub invoked_as_extension: bool,
}

#[derive(Clone, Debug)]
pub struct BoundObjectCreation {
    /// `None` for the implicit parameterless constructor of a value type.
    pub constructor: Option<SymbolId>,
    pub arguments: Vec<BoundNode>,
    pub arg_to_param: Vec<usize>,
    pub expanded: bool,
    pub initializer: Option<BoundNode>,
    /// Concrete class created for `new I()` when the interface names one.
    pub coclass: Option<TypeId>,
}

#[derive(Clone, Debug)]
pub struct BoundIndexerAccess {
    pub receiver: BoundNode,
    pub indexer: SymbolId,
    pub arguments: Vec<BoundNode>,
    pub arg_to_param: Vec<usize>,
    pub expanded: bool,
}

#[derive(Clone, Debug)]
pub struct BadExpression {
    pub result_kind: LookupResultKind,
    /// Everything lookup found, even though none of it was usable.
    pub candidates: Vec<SymbolId>,
    /// Partially bound sub-expressions.
    pub children: Vec<BoundNode>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DynamicOperation {
    MemberAccess(Atom),
    Invocation,
    Indexing,
    ObjectCreation,
}

#[derive(Clone, Debug)]
pub enum BoundKind {
    Literal,
    Local {
        symbol: SymbolId,
    },
    PatternLocal {
        variable: PatternVariableId,
        name: Atom,
    },
    Parameter {
        symbol: SymbolId,
    },
    RangeVariable {
        symbol: SymbolId,
    },
    ThisReference,
    BaseReference,
    FieldAccess {
        receiver: Option<Box<BoundNode>>,
        field: SymbolId,
    },
    PropertyAccess {
        receiver: Option<Box<BoundNode>>,
        property: SymbolId,
    },
    MethodGroup(Box<MethodGroup>),
    /// A type in expression position; the node's `ty` is the type.
    TypeExpression,
    NamespaceExpression {
        namespace: SymbolId,
    },
    TypeOrValue(Box<TypeOrValue>),
    Call(Box<BoundCall>),
    ObjectCreation(Box<BoundObjectCreation>),
    /// `new T()` for a type parameter with a `new()` or `struct` constraint.
    NewT {
        initializer: Option<Box<BoundNode>>,
    },
    DelegateCreation {
        argument: Box<BoundNode>,
        method: Option<SymbolId>,
        is_dynamic: bool,
    },
    ArrayCreation {
        sizes: Vec<BoundNode>,
        initializer: Option<Box<BoundNode>>,
    },
    ArrayInitialization {
        elements: Vec<BoundNode>,
    },
    ObjectInitializer {
        initializers: Vec<BoundNode>,
    },
    /// Each element is an `Add` call on the implicit receiver.
    CollectionInitializer {
        initializers: Vec<BoundNode>,
    },
    Assignment {
        left: Box<BoundNode>,
        right: Box<BoundNode>,
    },
    /// The object being initialized, inside an object or collection initializer.
    ImplicitReceiver,
    ArrayAccess {
        array: Box<BoundNode>,
        indices: Vec<BoundNode>,
    },
    IndexerAccess(Box<BoundIndexerAccess>),
    Conversion {
        operand: Box<BoundNode>,
        conversion: Conversion,
        explicit: bool,
        checked: bool,
    },
    Binary {
        operator: BinaryOperator,
        left: Box<BoundNode>,
        right: Box<BoundNode>,
    },
    Unary {
        operator: UnaryOperator,
        operand: Box<BoundNode>,
    },
    /// `receiver?.access`; `access` reads the receiver through a
    /// [`BoundKind::ConditionalReceiver`].
    ConditionalAccess {
        receiver: Box<BoundNode>,
        access: Box<BoundNode>,
    },
    ConditionalReceiver,
    DefaultExpression,
    TypeOf {
        operand_type: TypeId,
    },
    ArgList {
        arguments: Vec<BoundNode>,
    },
    /// A lambda whose delegate type is not known yet. Has no type.
    UnboundLambda {
        parameters: Vec<Atom>,
        parameter_types: Vec<Option<TypeId>>,
        body: NodeIndex,
    },
    /// A late-bound operation on a `dynamic` operand.
    Dynamic {
        operation: DynamicOperation,
        receiver: Option<Box<BoundNode>>,
        arguments: Vec<BoundNode>,
        /// Only for [`DynamicOperation::ObjectCreation`].
        initializer: Option<Box<BoundNode>>,
    },
    BadExpression(Box<BadExpression>),
}

impl BoundNode {
    /// Build a node; `has_errors` is derived from the children.
    pub fn new(kind: BoundKind, ty: TypeId, span: Span) -> Self {
        let mut node = BoundNode {
            kind,
            ty: Some(ty),
            span,
            has_errors: false,
            constant: None,
        };
        node.has_errors = node.any_child_has_errors();
        node
    }

    /// An error-recovery node. Always erroneous, always typed.
    pub fn bad(
        result_kind: LookupResultKind,
        candidates: Vec<SymbolId>,
        children: Vec<BoundNode>,
        ty: TypeId,
        span: Span,
    ) -> Self {
        BoundNode {
            kind: BoundKind::BadExpression(Box::new(BadExpression {
                result_kind,
                candidates,
                children,
            })),
            ty: Some(ty),
            span,
            has_errors: true,
            constant: None,
        }
    }

    /// A bad expression with nothing to carry.
    pub fn error(span: Span) -> Self {
        Self::bad(LookupResultKind::Empty, Vec::new(), Vec::new(), TypeId::ERROR, span)
    }

    pub fn unbound_lambda(
        parameters: Vec<Atom>,
        parameter_types: Vec<Option<TypeId>>,
        body: NodeIndex,
        span: Span,
    ) -> Self {
        BoundNode {
            kind: BoundKind::UnboundLambda {
                parameters,
                parameter_types,
                body,
            },
            ty: None,
            span,
            has_errors: false,
            constant: None,
        }
    }

    #[must_use]
    pub fn with_constant(mut self, constant: Option<ConstantValue>) -> Self {
        self.constant = constant;
        self
    }

    /// Mark this node as erroneous after a diagnostic was reported for it.
    #[must_use]
    pub fn with_errors(mut self) -> Self {
        self.has_errors = true;
        self
    }

    /// The node's type, or the error type for an unbound lambda.
    pub fn type_or_error(&self) -> TypeId {
        self.ty.unwrap_or(TypeId::ERROR)
    }

    pub fn is_bad(&self) -> bool {
        matches!(self.kind, BoundKind::BadExpression(_))
    }

    /// Lookup result kind carried by a bad expression.
    pub fn result_kind(&self) -> Option<LookupResultKind> {
        match &self.kind {
            BoundKind::BadExpression(bad) => Some(bad.result_kind),
            _ => None,
        }
    }

    /// Symbols a bad expression carries for tooling.
    pub fn candidates(&self) -> &[SymbolId] {
        match &self.kind {
            BoundKind::BadExpression(bad) => &bad.candidates,
            _ => &[],
        }
    }

    /// Whether the node denotes a storage location that can be written.
    pub fn is_variable(&self) -> bool {
        matches!(
            self.kind,
            BoundKind::Local { .. }
                | BoundKind::Parameter { .. }
                | BoundKind::PatternLocal { .. }
                | BoundKind::FieldAccess { .. }
                | BoundKind::ArrayAccess { .. }
        )
    }

    fn any_child_has_errors(&self) -> bool {
        let mut errors = false;
        self.for_each_child(&mut |child| errors |= child.has_errors);
        errors
    }

    /// Visit direct children in source order.
    pub fn for_each_child(&self, f: &mut dyn FnMut(&BoundNode)) {
        match &self.kind {
            BoundKind::Literal
            | BoundKind::Local { .. }
            | BoundKind::PatternLocal { .. }
            | BoundKind::Parameter { .. }
            | BoundKind::RangeVariable { .. }
            | BoundKind::ThisReference
            | BoundKind::BaseReference
            | BoundKind::TypeExpression
            | BoundKind::NamespaceExpression { .. }
            | BoundKind::ImplicitReceiver
            | BoundKind::ConditionalReceiver
            | BoundKind::DefaultExpression
            | BoundKind::TypeOf { .. }
            | BoundKind::UnboundLambda { .. } => {}
            BoundKind::FieldAccess { receiver, .. } | BoundKind::PropertyAccess { receiver, .. } => {
                if let Some(receiver) = receiver {
                    f(receiver);
                }
            }
            BoundKind::MethodGroup(group) => {
                if let Some(receiver) = &group.receiver {
                    f(receiver);
                }
            }
            BoundKind::TypeOrValue(data) => {
                f(&data.value);
                f(&data.type_expression);
            }
            BoundKind::Call(call) => {
                if let Some(receiver) = &call.receiver {
                    f(receiver);
                }
                call.arguments.iter().for_each(|a| f(a));
            }
            BoundKind::ObjectCreation(creation) => {
                creation.arguments.iter().for_each(|a| f(a));
                if let Some(initializer) = &creation.initializer {
                    f(initializer);
                }
            }
            BoundKind::NewT { initializer } => {
                if let Some(initializer) = initializer {
                    f(initializer);
                }
            }
            BoundKind::DelegateCreation { argument, .. } => f(argument),
            BoundKind::ArrayCreation { sizes, initializer } => {
                sizes.iter().for_each(|s| f(s));
                if let Some(initializer) = initializer {
                    f(initializer);
                }
            }
            BoundKind::ArrayInitialization { elements } => elements.iter().for_each(|e| f(e)),
            BoundKind::ObjectInitializer { initializers }
            | BoundKind::CollectionInitializer { initializers } => {
                initializers.iter().for_each(|i| f(i));
            }
            BoundKind::Assignment { left, right } => {
                f(left);
                f(right);
            }
            BoundKind::ArrayAccess { array, indices } => {
                f(array);
                indices.iter().for_each(|i| f(i));
            }
            BoundKind::IndexerAccess(access) => {
                f(&access.receiver);
                access.arguments.iter().for_each(|a| f(a));
            }
            BoundKind::Conversion { operand, .. } => f(operand),
            BoundKind::Binary { left, right, .. } => {
                f(left);
                f(right);
            }
            BoundKind::Unary { operand, .. } => f(operand),
            BoundKind::ConditionalAccess { receiver, access } => {
                f(receiver);
                f(access);
            }
            BoundKind::ArgList { arguments } => arguments.iter().for_each(|a| f(a)),
            BoundKind::Dynamic {
                receiver,
                arguments,
                initializer,
                ..
            } => {
                if let Some(receiver) = receiver {
                    f(receiver);
                }
                arguments.iter().for_each(|a| f(a));
                if let Some(initializer) = initializer {
                    f(initializer);
                }
            }
            BoundKind::BadExpression(bad) => bad.children.iter().for_each(|c| f(c)),
        }
    }

    /// Visit this node and all descendants, parents first.
    pub fn walk(&self, f: &mut dyn FnMut(&BoundNode)) {
        f(self);
        self.for_each_child(&mut |child| child.walk(f));
    }

    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            BoundKind::Literal => "Literal",
            BoundKind::Local { .. } => "Local",
            BoundKind::PatternLocal { .. } => "PatternLocal",
            BoundKind::Parameter { .. } => "Parameter",
            BoundKind::RangeVariable { .. } => "RangeVariable",
            BoundKind::ThisReference => "ThisReference",
            BoundKind::BaseReference => "BaseReference",
            BoundKind::FieldAccess { .. } => "FieldAccess",
            BoundKind::PropertyAccess { .. } => "PropertyAccess",
            BoundKind::MethodGroup(_) => "MethodGroup",
            BoundKind::TypeExpression => "TypeExpression",
            BoundKind::NamespaceExpression { .. } => "NamespaceExpression",
            BoundKind::TypeOrValue(_) => "TypeOrValue",
            BoundKind::Call(_) => "Call",
            BoundKind::ObjectCreation(_) => "ObjectCreation",
            BoundKind::NewT { .. } => "NewT",
            BoundKind::DelegateCreation { .. } => "DelegateCreation",
            BoundKind::ArrayCreation { .. } => "ArrayCreation",
            BoundKind::ArrayInitialization { .. } => "ArrayInitialization",
            BoundKind::ObjectInitializer { .. } => "ObjectInitializer",
            BoundKind::CollectionInitializer { .. } => "CollectionInitializer",
            BoundKind::Assignment { .. } => "Assignment",
            BoundKind::ImplicitReceiver => "ImplicitReceiver",
            BoundKind::ArrayAccess { .. } => "ArrayAccess",
            BoundKind::IndexerAccess(_) => "IndexerAccess",
            BoundKind::Conversion { .. } => "Conversion",
            BoundKind::Binary { .. } => "Binary",
            BoundKind::Unary { .. } => "Unary",
            BoundKind::ConditionalAccess { .. } => "ConditionalAccess",
            BoundKind::ConditionalReceiver => "ConditionalReceiver",
            BoundKind::DefaultExpression => "DefaultExpression",
            BoundKind::TypeOf { .. } => "TypeOf",
            BoundKind::ArgList { .. } => "ArgList",
            BoundKind::UnboundLambda { .. } => "UnboundLambda",
            BoundKind::Dynamic { .. } => "Dynamic",
            BoundKind::BadExpression(_) => "BadExpression",
        }
    }
}

#[cfg(test)]
#[path = "../tests/bound_tests.rs"]
mod tests;
