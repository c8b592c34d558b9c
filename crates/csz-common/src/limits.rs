//! Centralized limits and thresholds for the binder.
//!
//! Keeping these in one place prevents duplicate definitions with diverging
//! values across the symbol table, the binder and the decision-DAG builder.

// =============================================================================
// Recursion Depth Limits
// =============================================================================

/// Maximum nesting depth for expression binding.
///
/// Each nested expression adds a frame to the dispatcher. Past this depth the
/// dispatcher stops and yields a bad expression reporting
/// `EXPRESSION_TOO_COMPLEX`, instead of overflowing the stack.
pub const MAX_EXPR_BIND_DEPTH: u32 = 500;

/// Maximum number of steps when walking a base-type chain.
///
/// Base chains are acyclic in well-formed programs, but a cyclic definition
/// (`class A : B {}  class B : A {}`) must not hang member lookup.
pub const MAX_BASE_CHAIN_WALK: usize = 256;

/// Maximum number of scopes visited by one outward scope walk.
pub const MAX_SCOPE_WALK_ITERATIONS: usize = 10_000;

/// Maximum depth of `overridden` links followed to find the least-overridden member.
pub const MAX_OVERRIDE_CHAIN_WALK: usize = 128;

// =============================================================================
// Decision DAG Limits
// =============================================================================

/// Maximum number of DAG nodes created for a single switch.
///
/// Test factoring can blow up combinatorially for adversarial inputs. Past
/// this limit the builder stops sharing states and falls back to marking all
/// remaining labels reachable, which never produces a false subsumption error.
pub const MAX_DECISION_DAG_NODES: usize = 100_000;

// =============================================================================
// Capacity Hints
// =============================================================================

/// Inline capacity for candidate symbol lists in lookup results.
pub const LOOKUP_INLINE_CANDIDATES: usize = 4;

/// Number of argument builders an `ArgumentPool` keeps around for reuse.
pub const ARGUMENT_POOL_CAPACITY: usize = 16;
