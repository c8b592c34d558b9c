//! Syntax node definitions.
//!
//! One closed enum, [`SyntaxData`], covers every node kind the binder can
//! meet: expressions, type syntax, patterns, arguments and switch pieces.

use csz_common::{Atom, Span};
use serde::Serialize;
use std::sync::Arc;

/// Index of a node in a [`crate::SyntaxArena`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeIndex(pub u32);

impl NodeIndex {
    pub const NONE: NodeIndex = NodeIndex(u32::MAX);

    #[inline]
    pub fn is_none(self) -> bool {
        self == Self::NONE
    }

    #[inline]
    pub fn is_some(self) -> bool {
        self != Self::NONE
    }
}

/// A syntax node: where it is and what it is.
#[derive(Clone, Debug, PartialEq)]
pub struct SyntaxNode {
    pub span: Span,
    pub data: SyntaxData,
}

/// An identifier with optional generic type arguments (`List<int>`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimpleName {
    pub name: Atom,
    pub name_span: Span,
    /// Type-syntax nodes; empty for a non-generic name.
    pub type_args: Vec<NodeIndex>,
}

impl SimpleName {
    pub fn arity(&self) -> usize {
        self.type_args.len()
    }
}

/// Literal tokens.
#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    Null,
    Bool(bool),
    /// Unsuffixed integer literal; its type is the first of
    /// `int`, `uint`, `long`, `ulong` that can hold it.
    Integer(u64),
    Double(f64),
    Char(char),
    String(Arc<str>),
}

/// Keywords naming predefined types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum PredefinedType {
    Bool,
    Char,
    SByte,
    Byte,
    Short,
    UShort,
    Int,
    UInt,
    Long,
    ULong,
    Float,
    Double,
    Decimal,
    String,
    Object,
    Void,
    Dynamic,
}

impl PredefinedType {
    pub fn keyword(self) -> &'static str {
        match self {
            PredefinedType::Bool => "bool",
            PredefinedType::Char => "char",
            PredefinedType::SByte => "sbyte",
            PredefinedType::Byte => "byte",
            PredefinedType::Short => "short",
            PredefinedType::UShort => "ushort",
            PredefinedType::Int => "int",
            PredefinedType::UInt => "uint",
            PredefinedType::Long => "long",
            PredefinedType::ULong => "ulong",
            PredefinedType::Float => "float",
            PredefinedType::Double => "double",
            PredefinedType::Decimal => "decimal",
            PredefinedType::String => "string",
            PredefinedType::Object => "object",
            PredefinedType::Void => "void",
            PredefinedType::Dynamic => "dynamic",
        }
    }
}

/// `ref` / `out` / `in` annotation written on an argument.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub enum RefKindSyntax {
    #[default]
    None,
    Ref,
    Out,
    In,
}

/// One argument in an argument list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArgumentSyntax {
    /// `name:` prefix, if any.
    pub name: Option<(Atom, Span)>,
    pub ref_kind: RefKindSyntax,
    pub expression: NodeIndex,
}

/// What kind of braced initializer this is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum InitializerKind {
    /// `new T { A = 1, [0] = 2 }`
    Object,
    /// `new T { 1, 2, { 3, 4 } }`
    Collection,
    /// `{ 1, 2 }` after an array creation, or nested inside one.
    Array,
    /// `{ a, b }` element of a collection initializer (multiple `Add` arguments).
    Complex,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Remainder,
    Equals,
    NotEquals,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    LogicalAnd,
    LogicalOr,
}

impl BinaryOperator {
    pub fn text(self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Remainder => "%",
            BinaryOperator::Equals => "==",
            BinaryOperator::NotEquals => "!=",
            BinaryOperator::LessThan => "<",
            BinaryOperator::LessThanOrEqual => "<=",
            BinaryOperator::GreaterThan => ">",
            BinaryOperator::GreaterThanOrEqual => ">=",
            BinaryOperator::LogicalAnd => "&&",
            BinaryOperator::LogicalOr => "||",
        }
    }

    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinaryOperator::Equals
                | BinaryOperator::NotEquals
                | BinaryOperator::LessThan
                | BinaryOperator::LessThanOrEqual
                | BinaryOperator::GreaterThan
                | BinaryOperator::GreaterThanOrEqual
        )
    }

    pub fn is_logical(self) -> bool {
        matches!(self, BinaryOperator::LogicalAnd | BinaryOperator::LogicalOr)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum UnaryOperator {
    Negate,
    Not,
}

impl UnaryOperator {
    pub fn text(self) -> &'static str {
        match self {
            UnaryOperator::Negate => "-",
            UnaryOperator::Not => "!",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LambdaParameter {
    pub name: Atom,
    /// Explicit parameter type, if written.
    pub ty: Option<NodeIndex>,
}

/// Node payloads.
#[derive(Clone, Debug, PartialEq)]
pub enum SyntaxData {
    // ---------------------------------------------------------------------
    // Expressions
    // ---------------------------------------------------------------------
    Literal(Literal),
    /// `x`, `List<int>` in expression position.
    Identifier(SimpleName),
    /// `int` in `int.MaxValue`; also a type.
    PredefinedType(PredefinedType),
    /// `receiver.name` / `receiver?.name`.
    MemberAccess {
        receiver: NodeIndex,
        name: SimpleName,
        conditional: bool,
    },
    Invocation {
        target: NodeIndex,
        arguments: Vec<NodeIndex>,
    },
    /// `receiver[args]` / `receiver?[args]`.
    ElementAccess {
        receiver: NodeIndex,
        arguments: Vec<NodeIndex>,
        conditional: bool,
    },
    /// `new T(args) { initializer }`; `arguments` is `None` when the
    /// parentheses are omitted.
    ObjectCreation {
        ty: NodeIndex,
        arguments: Option<Vec<NodeIndex>>,
        initializer: Option<NodeIndex>,
    },
    /// `new T[s0, s1][,] { ... }`: the first rank specifier may carry sizes
    /// (`NodeIndex::NONE` for an omitted size), later ones extend the element type.
    ArrayCreation {
        element_type: NodeIndex,
        rank_specifiers: Vec<Vec<NodeIndex>>,
        initializer: Option<NodeIndex>,
    },
    /// `new[,] { ... }`.
    ImplicitArrayCreation { rank: u32, initializer: NodeIndex },
    /// Braced initializer list.
    Initializer {
        kind: InitializerKind,
        elements: Vec<NodeIndex>,
    },
    /// `left = right`; inside object initializers `left` is a member name or
    /// an implicit-receiver element access.
    Assignment { left: NodeIndex, right: NodeIndex },
    /// `[args]` target inside an object initializer (`{ [0] = x }`).
    ImplicitElementAccess { arguments: Vec<NodeIndex> },
    Parenthesized(NodeIndex),
    Cast { ty: NodeIndex, expression: NodeIndex },
    Binary {
        operator: BinaryOperator,
        left: NodeIndex,
        right: NodeIndex,
    },
    Unary {
        operator: UnaryOperator,
        operand: NodeIndex,
    },
    Lambda {
        parameters: Vec<LambdaParameter>,
        body: NodeIndex,
    },
    This,
    Base,
    /// `default(T)`.
    Default { ty: NodeIndex },
    TypeOf { ty: NodeIndex },
    /// `__arglist(args)`.
    ArgList { arguments: Vec<NodeIndex> },
    /// An expression the parser had to invent to recover from a syntax error.
    Missing,
    /// A parsed expression kind this binder has no rule for.
    Unsupported { kind: &'static str },

    // ---------------------------------------------------------------------
    // Arguments
    // ---------------------------------------------------------------------
    Argument(ArgumentSyntax),

    // ---------------------------------------------------------------------
    // Type syntax
    // ---------------------------------------------------------------------
    QualifiedName { left: NodeIndex, right: SimpleName },
    ArrayType { element: NodeIndex, rank: u32 },
    PointerType { element: NodeIndex },
    NullableType { element: NodeIndex },

    // ---------------------------------------------------------------------
    // Patterns
    // ---------------------------------------------------------------------
    ConstantPattern { expression: NodeIndex },
    TypePattern { ty: NodeIndex },
    /// `T name` / `var name`; `designation` is `None` for `T _`.
    DeclarationPattern {
        ty: NodeIndex,
        designation: Option<(Atom, Span)>,
    },
    DiscardPattern,

    // ---------------------------------------------------------------------
    // Switch statements
    // ---------------------------------------------------------------------
    Switch {
        expression: NodeIndex,
        sections: Vec<NodeIndex>,
    },
    SwitchSection {
        labels: Vec<NodeIndex>,
        statements: Vec<NodeIndex>,
    },
    CaseLabel {
        pattern: NodeIndex,
        guard: Option<NodeIndex>,
    },
    DefaultLabel,
    /// A statement inside a switch section; the binder carries it but does not bind it.
    OpaqueStatement,
}

impl SyntaxData {
    /// Short kind name used in logs and recovery diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            SyntaxData::Literal(_) => "literal",
            SyntaxData::Identifier(_) => "identifier",
            SyntaxData::PredefinedType(_) => "predefined type",
            SyntaxData::MemberAccess { .. } => "member access",
            SyntaxData::Invocation { .. } => "invocation",
            SyntaxData::ElementAccess { .. } => "element access",
            SyntaxData::ObjectCreation { .. } => "object creation",
            SyntaxData::ArrayCreation { .. } => "array creation",
            SyntaxData::ImplicitArrayCreation { .. } => "implicit array creation",
            SyntaxData::Initializer { .. } => "initializer",
            SyntaxData::Assignment { .. } => "assignment",
            SyntaxData::ImplicitElementAccess { .. } => "implicit element access",
            SyntaxData::Parenthesized(_) => "parenthesized expression",
            SyntaxData::Cast { .. } => "cast",
            SyntaxData::Binary { .. } => "binary expression",
            SyntaxData::Unary { .. } => "unary expression",
            SyntaxData::Lambda { .. } => "lambda",
            SyntaxData::This => "this",
            SyntaxData::Base => "base",
            SyntaxData::Default { .. } => "default",
            SyntaxData::TypeOf { .. } => "typeof",
            SyntaxData::ArgList { .. } => "__arglist",
            SyntaxData::Missing => "missing expression",
            SyntaxData::Unsupported { kind } => kind,
            SyntaxData::Argument(_) => "argument",
            SyntaxData::QualifiedName { .. } => "qualified name",
            SyntaxData::ArrayType { .. } => "array type",
            SyntaxData::PointerType { .. } => "pointer type",
            SyntaxData::NullableType { .. } => "nullable type",
            SyntaxData::ConstantPattern { .. } => "constant pattern",
            SyntaxData::TypePattern { .. } => "type pattern",
            SyntaxData::DeclarationPattern { .. } => "declaration pattern",
            SyntaxData::DiscardPattern => "discard pattern",
            SyntaxData::Switch { .. } => "switch",
            SyntaxData::SwitchSection { .. } => "switch section",
            SyntaxData::CaseLabel { .. } => "case label",
            SyntaxData::DefaultLabel => "default label",
            SyntaxData::OpaqueStatement => "statement",
        }
    }
}
