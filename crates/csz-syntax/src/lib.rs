//! Read-only syntax model consumed by the csz binder.
//!
//! The parser is an external collaborator: it produces a [`SyntaxArena`] of
//! expression, type, pattern, argument and switch nodes addressed by
//! [`NodeIndex`]. The binder never mutates the arena. [`SyntaxBuilder`]
//! constructs arenas directly for hosts without a parser, and for tests.

pub mod node;
pub use node::{
    ArgumentSyntax, BinaryOperator, InitializerKind, LambdaParameter, Literal, NodeIndex,
    PredefinedType, RefKindSyntax, SimpleName, SyntaxData, SyntaxNode, UnaryOperator,
};

pub mod arena;
pub use arena::SyntaxArena;

pub mod builder;
pub use builder::SyntaxBuilder;
