//! Semantic expression binder and switch decision-DAG compiler.
//!
//! The binder turns expression syntax into trees of typed, error-annotated
//! [`BoundNode`]s. This crate is organized into:
//! - `binder` - [`Binder`] state and the collaborator set
//! - `dispatch` - the single entry point routing every expression kind
//! - `lookup` / `names` - scope search, disambiguation, simple names and types
//! - `member_access` - `receiver.member`, color-color receivers, extension methods
//! - `arguments` / `calls` / `overload` - argument lists, invocations, indexers
//! - `conversions` / `convert` - conversion classification and application
//! - `construction` / `arrays` - `new` expressions and initializers
//! - `operators` - literals, keywords, casts, operators, `?.`, assignment
//! - `patterns` / `decision_dag` / `switch` - `switch` statements
//!
//! Every binding routine returns a typed node even on failure, and reports
//! each failure once into the caller's [`csz_common::DiagnosticBag`].

pub mod options;
pub use options::BinderOptions;

pub mod bound;
pub use bound::{
    BadExpression, BoundCall, BoundIndexerAccess, BoundKind, BoundNode, BoundObjectCreation,
    DynamicOperation, MethodGroup, PatternVariableId, TypeOrValue,
};

pub mod conversions;
pub use conversions::{
    Conversion, ConversionClassifier, ConversionContext, ConversionKind, StandardConversions,
};

pub mod lookup;
pub use lookup::{LookupOptions, LookupResult, LookupResultKind};

pub mod arguments;
pub use arguments::{AnalyzedArguments, ArgumentPool, PoolStats, PooledArguments};

pub mod overload;
pub use overload::{
    MemberResolution, MemberResolutionKind, OverloadContext, OverloadResolutionResult,
    OverloadResolver, StandardOverloadResolver,
};

pub mod binder;
pub use binder::{Binder, Collaborators};

// Expression binding, one `impl Binder` block per module
mod arrays;
mod calls;
mod construction;
mod convert;
mod dispatch;
mod member_access;
mod names;
mod operators;

pub mod patterns;
pub use patterns::{BoundPattern, PatternKind, PatternVariable};

pub mod decision_dag;
pub use decision_dag::{
    DagCase, DagContext, DagEvaluation, DagNode, DagNodeId, DagTemp, DagTest, DecisionDag,
    DecisionDagBuilder, GuardValue, LabelId, StandardDagBuilder,
};

pub mod switch;
pub use switch::{BoundSwitch, BoundSwitchLabel, BoundSwitchSection};
