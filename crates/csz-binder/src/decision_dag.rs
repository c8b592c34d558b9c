//! Decision DAG construction for `switch` statements.
//!
//! Each case label's pattern is lowered to a sequence of steps (tests on a
//! temp, plus evaluations that produce new temps). The builder then walks
//! the ordered cases: it emits the first pending step of the first case that
//! can still match, and recurses on both outcomes with every case's steps
//! simplified by what that outcome implies. States are memoized and nodes
//! hash-consed, so equivalent sub-DAGs are shared.
//!
//! A case whose steps are all satisfied reaches its guard (a where-clause
//! node) or, unguarded, a terminal node for its label. When no case is left
//! the path ends at the default label.

use crate::bound::PatternVariableId;
use crate::conversions::{ConversionKind, standard_explicit, standard_implicit};
use crate::patterns::{BoundPattern, PatternKind};
use csz_common::limits::MAX_DECISION_DAG_NODES;
use csz_symbols::{Compilation, ConstantValue, TypeId};
use fixedbitset::FixedBitSet;
use indexmap::IndexSet;
use rustc_hash::{FxBuildHasher, FxHashMap};
use smallvec::SmallVec;
use tracing::{debug, trace};

/// Stack left before the recursive build switches to a fresh segment.
const STACK_RED_ZONE: usize = 64 * 1024;
const STACK_GROWTH: usize = 1024 * 1024;

/// A value available at run time while matching: the switch input (index 0)
/// or the input converted to a tested type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DagTemp {
    pub index: u32,
    pub ty: TypeId,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum DagTest {
    NonNull { input: DagTemp },
    TypeTest { input: DagTemp, ty: TypeId },
    ValueTest { input: DagTemp, value: ConstantValue },
}

impl DagTest {
    pub fn input(&self) -> DagTemp {
        match self {
            DagTest::NonNull { input } | DagTest::TypeTest { input, .. } | DagTest::ValueTest { input, .. } => *input,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum DagEvaluation {
    /// Convert `input` to `ty` after a successful type test.
    TypeConversion { input: DagTemp, ty: TypeId, output: DagTemp },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DagNodeId(pub u32);

/// A jump target: one `case` label, the default label, or the end of the switch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LabelId(pub u32);

/// Pattern variables assigned on the way to a guard or terminal.
pub type DagBindings = SmallVec<[(PatternVariableId, DagTemp); 2]>;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum DagNode {
    Evaluation {
        evaluation: DagEvaluation,
        next: DagNodeId,
    },
    Decision {
        test: DagTest,
        when_true: DagNodeId,
        when_false: DagNodeId,
    },
    /// Evaluate the guard of `case_index` after assigning `bindings`.
    WhereClause {
        case_index: usize,
        bindings: DagBindings,
        when_true: DagNodeId,
        when_false: DagNodeId,
    },
    Terminal {
        label: LabelId,
        bindings: DagBindings,
    },
}

/// What the binder knows about a case guard.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GuardValue {
    Constant(bool),
    /// Only known at run time.
    Dynamic,
}

/// One case label fed to the builder, in source order.
#[derive(Clone, Copy, Debug)]
pub struct DagCase<'p> {
    pub label: LabelId,
    pub pattern: &'p BoundPattern,
    pub guard: Option<GuardValue>,
}

pub struct DagContext<'a> {
    pub compilation: &'a Compilation,
    pub input_type: TypeId,
    /// Where a value no case matches goes: the default label, or the end
    /// of the switch.
    pub default_label: LabelId,
    /// Exclusive upper bound of the label ids in use.
    pub label_count: usize,
}

#[derive(Debug)]
pub struct DecisionDag {
    nodes: IndexSet<DagNode, FxBuildHasher>,
    pub root: DagNodeId,
    label_count: usize,
    /// The node limit was hit; reachability is then unknown.
    pub overflowed: bool,
}

impl DecisionDag {
    pub fn node(&self, id: DagNodeId) -> &DagNode {
        &self.nodes[id.0 as usize]
    }

    pub fn nodes(&self) -> impl Iterator<Item = &DagNode> {
        self.nodes.iter()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Labels some path from the root reaches. All labels when the build
    /// overflowed.
    pub fn reachable_labels(&self) -> FixedBitSet {
        let mut labels = FixedBitSet::with_capacity(self.label_count);
        if self.overflowed {
            labels.insert_range(..);
            return labels;
        }
        let mut visited = FixedBitSet::with_capacity(self.nodes.len());
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            let index = id.0 as usize;
            if visited.put(index) {
                continue;
            }
            match self.node(id) {
                DagNode::Evaluation { next, .. } => stack.push(*next),
                DagNode::Decision {
                    when_true,
                    when_false,
                    ..
                }
                | DagNode::WhereClause {
                    when_true,
                    when_false,
                    ..
                } => {
                    stack.push(*when_true);
                    stack.push(*when_false);
                }
                DagNode::Terminal { label, .. } => {
                    if (label.0 as usize) < self.label_count {
                        labels.insert(label.0 as usize);
                    }
                }
            }
        }
        labels
    }
}

/// Builds the decision DAG of one switch.
pub trait DecisionDagBuilder: Send + Sync {
    fn build(&self, ctx: &DagContext<'_>, cases: &[DagCase<'_>]) -> DecisionDag;
}

/// Test-factoring builder with shared sub-DAGs.
#[derive(Clone, Copy, Debug, Default)]
pub struct StandardDagBuilder;

impl DecisionDagBuilder for StandardDagBuilder {
    fn build(&self, ctx: &DagContext<'_>, cases: &[DagCase<'_>]) -> DecisionDag {
        let mut build = DagBuild {
            ctx,
            nodes: IndexSet::with_hasher(FxBuildHasher),
            memo: FxHashMap::default(),
            temps: FxHashMap::default(),
            overflowed: false,
        };
        let input = DagTemp {
            index: 0,
            ty: ctx.input_type,
        };
        let states: Vec<CaseState> = cases
            .iter()
            .enumerate()
            .filter(|(_, case)| case.guard != Some(GuardValue::Constant(false)))
            .map(|(case_index, case)| {
                let mut lowered = LoweredPattern::default();
                build.lower_pattern(case.pattern, input, &mut lowered);
                CaseState {
                    case_index,
                    label: case.label,
                    steps: lowered.steps,
                    bindings: lowered.bindings,
                    guarded: matches!(case.guard, Some(GuardValue::Dynamic)),
                }
            })
            .collect();
        let root = build.build(states);
        debug!(
            cases = cases.len(),
            nodes = build.nodes.len(),
            overflowed = build.overflowed,
            "decision dag built"
        );
        DecisionDag {
            nodes: build.nodes,
            root,
            label_count: ctx.label_count,
            overflowed: build.overflowed,
        }
    }
}

// =============================================================================
// Lowering patterns to steps
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
enum Step {
    /// `test` must come out as `sense` for the case to match.
    Test { test: DagTest, sense: bool },
    Evaluate(DagEvaluation),
}

#[derive(Default)]
struct LoweredPattern {
    steps: Vec<Step>,
    bindings: DagBindings,
}

/// A case that can still match, with the steps not yet decided.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct CaseState {
    case_index: usize,
    label: LabelId,
    steps: Vec<Step>,
    bindings: DagBindings,
    guarded: bool,
}

struct DagBuild<'a, 'c> {
    ctx: &'a DagContext<'c>,
    nodes: IndexSet<DagNode, FxBuildHasher>,
    memo: FxHashMap<Vec<CaseState>, DagNodeId>,
    /// Canonical temps: the same conversion of the same temp is one temp.
    temps: FxHashMap<(u32, TypeId), DagTemp>,
    overflowed: bool,
}

impl DagBuild<'_, '_> {
    fn compilation(&self) -> &Compilation {
        self.ctx.compilation
    }

    fn lower_pattern(&mut self, pattern: &BoundPattern, input: DagTemp, out: &mut LoweredPattern) {
        match &pattern.kind {
            PatternKind::Discard => {}
            PatternKind::Type { ty } => {
                self.lower_type_test(input, *ty, out);
            }
            PatternKind::Declaration { ty, variable, is_var } => {
                let temp = if *is_var { input } else { self.lower_type_test(input, *ty, out) };
                if let Some(variable) = variable {
                    out.bindings.push((*variable, temp));
                }
            }
            PatternKind::Constant {
                constant, tested_type, ..
            } => {
                if constant.is_null() {
                    out.steps.push(Step::Test {
                        test: DagTest::NonNull { input },
                        sense: false,
                    });
                    return;
                }
                let temp = if *tested_type == input.ty {
                    input
                } else {
                    self.lower_type_test(input, *tested_type, out)
                };
                out.steps.push(Step::Test {
                    test: DagTest::ValueTest {
                        input: temp,
                        value: constant.clone(),
                    },
                    sense: true,
                });
            }
        }
    }

    /// Steps testing that `input` is a `ty`; returns the temp holding it as a `ty`.
    fn lower_type_test(&mut self, input: DagTemp, ty: TypeId, out: &mut LoweredPattern) -> DagTemp {
        let compilation = self.compilation();
        if ty == input.ty || compilation.is_error_type(ty) {
            if !compilation.is_non_nullable_value_type(input.ty) && !compilation.is_error_type(ty) {
                out.steps.push(Step::Test {
                    test: DagTest::NonNull { input },
                    sense: true,
                });
            }
            return input;
        }
        let always_matches = matches!(
            standard_implicit(compilation, input.ty, ty).kind,
            ConversionKind::ImplicitReference | ConversionKind::Boxing
        ) || compilation.nullable_underlying(input.ty) == Some(ty);
        if always_matches {
            // Only null can fail.
            if !compilation.is_non_nullable_value_type(input.ty) {
                out.steps.push(Step::Test {
                    test: DagTest::NonNull { input },
                    sense: true,
                });
            }
        } else {
            out.steps.push(Step::Test {
                test: DagTest::TypeTest { input, ty },
                sense: true,
            });
        }
        let output = self.temp_for(input, ty);
        out.steps.push(Step::Evaluate(DagEvaluation::TypeConversion { input, ty, output }));
        output
    }

    fn temp_for(&mut self, input: DagTemp, ty: TypeId) -> DagTemp {
        let next = self.temps.len() as u32 + 1;
        *self
            .temps
            .entry((input.index, ty))
            .or_insert(DagTemp { index: next, ty })
    }

    // =========================================================================
    // Building
    // =========================================================================

    fn add(&mut self, node: DagNode) -> DagNodeId {
        let (index, _) = self.nodes.insert_full(node);
        DagNodeId(index as u32)
    }

    fn terminal(&mut self, label: LabelId, bindings: DagBindings) -> DagNodeId {
        self.add(DagNode::Terminal { label, bindings })
    }

    fn build(&mut self, states: Vec<CaseState>) -> DagNodeId {
        if let Some(id) = self.memo.get(&states) {
            return *id;
        }
        if self.nodes.len() >= MAX_DECISION_DAG_NODES {
            self.overflowed = true;
            return self.terminal(self.ctx.default_label, DagBindings::new());
        }
        let id = stacker::maybe_grow(STACK_RED_ZONE, STACK_GROWTH, || self.build_uncached(&states));
        self.memo.insert(states, id);
        id
    }

    fn build_uncached(&mut self, states: &[CaseState]) -> DagNodeId {
        let Some(first) = states.first() else {
            return self.terminal(self.ctx.default_label, DagBindings::new());
        };
        match first.steps.first() {
            None if first.guarded => {
                let when_true = self.terminal(first.label, first.bindings.clone());
                let when_false = self.build(states[1..].to_vec());
                self.add(DagNode::WhereClause {
                    case_index: first.case_index,
                    bindings: first.bindings.clone(),
                    when_true,
                    when_false,
                })
            }
            None => self.terminal(first.label, first.bindings.clone()),
            Some(Step::Evaluate(evaluation)) => {
                let evaluation = evaluation.clone();
                let step = Step::Evaluate(evaluation.clone());
                let rest = states
                    .iter()
                    .map(|state| {
                        let mut state = state.clone();
                        state.steps.retain(|s| *s != step);
                        state
                    })
                    .collect();
                let next = self.build(rest);
                self.add(DagNode::Evaluation { evaluation, next })
            }
            Some(Step::Test { test, .. }) => {
                let test = test.clone();
                trace!(?test, remaining = states.len(), "decision");
                let when_true = self.build(self.assume(states, &test, true));
                let when_false = self.build(self.assume(states, &test, false));
                if when_true == when_false {
                    return when_true;
                }
                self.add(DagNode::Decision {
                    test,
                    when_true,
                    when_false,
                })
            }
        }
    }

    /// The cases that can still match once `test` came out as `outcome`,
    /// with the steps it decides removed.
    fn assume(&self, states: &[CaseState], test: &DagTest, outcome: bool) -> Vec<CaseState> {
        let mut remaining = Vec::with_capacity(states.len());
        'cases: for state in states {
            let mut steps = Vec::with_capacity(state.steps.len());
            for step in &state.steps {
                if let Step::Test { test: other, sense } = step {
                    match self.implies(test, outcome, other) {
                        Some(result) if result == *sense => continue,
                        Some(_) => continue 'cases,
                        None => {}
                    }
                }
                steps.push(step.clone());
            }
            remaining.push(CaseState {
                steps,
                ..state.clone()
            });
        }
        remaining
    }

    /// What `known` coming out as `outcome` says about `other`.
    fn implies(&self, known: &DagTest, outcome: bool, other: &DagTest) -> Option<bool> {
        if known == other {
            return Some(outcome);
        }
        if known.input() != other.input() {
            return None;
        }
        let compilation = self.compilation();
        match (known, outcome, other) {
            // Null is not a T and not a non-null constant.
            (DagTest::NonNull { .. }, false, DagTest::TypeTest { .. } | DagTest::ValueTest { .. }) => Some(false),
            (DagTest::TypeTest { .. } | DagTest::ValueTest { .. }, true, DagTest::NonNull { .. }) => Some(true),
            (DagTest::TypeTest { ty: known_ty, .. }, true, DagTest::TypeTest { ty, .. }) => {
                if is_subtype(compilation, *known_ty, *ty) {
                    Some(true)
                } else if are_disjoint(compilation, *known_ty, *ty) {
                    Some(false)
                } else {
                    None
                }
            }
            (DagTest::TypeTest { ty: known_ty, .. }, false, DagTest::TypeTest { ty, .. }) => {
                is_subtype(compilation, *ty, *known_ty).then_some(false)
            }
            (DagTest::ValueTest { value: known_value, .. }, true, DagTest::ValueTest { value, .. }) => {
                Some(known_value == value)
            }
            // The bool domain has two values.
            (
                DagTest::ValueTest {
                    input,
                    value: ConstantValue::Bool(known_value),
                },
                false,
                DagTest::ValueTest {
                    value: ConstantValue::Bool(value),
                    ..
                },
            ) if input.ty == TypeId::BOOL => Some(known_value != value),
            _ => None,
        }
    }
}

/// Every `sub` is a `sup`.
fn is_subtype(compilation: &Compilation, sub: TypeId, sup: TypeId) -> bool {
    matches!(
        standard_implicit(compilation, sub, sup).kind,
        ConversionKind::Identity | ConversionKind::ImplicitReference | ConversionKind::Boxing
    )
}

/// No value is both a `a` and a `b`.
fn are_disjoint(compilation: &Compilation, a: TypeId, b: TypeId) -> bool {
    !is_subtype(compilation, a, b)
        && !is_subtype(compilation, b, a)
        && !matches!(
            standard_explicit(compilation, a, b).kind,
            ConversionKind::ExplicitReference | ConversionKind::Unboxing
        )
}

#[cfg(test)]
#[path = "../tests/decision_dag_tests.rs"]
mod tests;
