//! `switch` statements.
//!
//! Binds the governing expression, every label's pattern and guard, builds
//! the decision DAG and reports each `case` label no path reaches. Section
//! statements are carried through unbound.

use crate::binder::Binder;
use crate::bound::BoundNode;
use crate::decision_dag::{DagCase, DagContext, DecisionDag, GuardValue, LabelId};
use crate::patterns::{BoundPattern, PatternVariable};
use csz_common::diagnostics::diagnostic_codes;
use csz_common::{DiagnosticBag, Span};
use csz_symbols::{ConstantValue, TypeId};
use csz_syntax::{NodeIndex, SyntaxData};
use tracing::{debug, warn};

#[derive(Debug)]
pub struct BoundSwitchLabel {
    pub label: LabelId,
    pub syntax: NodeIndex,
    pub span: Span,
    /// `None` for `default:`.
    pub pattern: Option<BoundPattern>,
    pub guard: Option<BoundNode>,
    pub is_reachable: bool,
}

impl BoundSwitchLabel {
    pub fn is_default(&self) -> bool {
        self.pattern.is_none()
    }

    fn has_errors(&self) -> bool {
        self.pattern.as_ref().is_some_and(|p| p.has_errors) || self.guard.as_ref().is_some_and(|g| g.has_errors)
    }
}

#[derive(Debug)]
pub struct BoundSwitchSection {
    pub labels: Vec<BoundSwitchLabel>,
    pub statements: Vec<NodeIndex>,
    pub span: Span,
}

#[derive(Debug)]
pub struct BoundSwitch {
    pub expression: BoundNode,
    pub sections: Vec<BoundSwitchSection>,
    pub decision_dag: DecisionDag,
    pub default_label: Option<LabelId>,
    /// Target of values no label matches when there is no `default:`.
    pub break_label: LabelId,
    /// Every pattern variable the labels declare, indexed by id.
    pub pattern_variables: Vec<PatternVariable>,
    pub span: Span,
}

impl BoundSwitch {
    pub fn labels(&self) -> impl Iterator<Item = &BoundSwitchLabel> {
        self.sections.iter().flat_map(|s| s.labels.iter())
    }

    pub fn has_errors(&self) -> bool {
        self.expression.has_errors || self.labels().any(BoundSwitchLabel::has_errors)
    }
}

impl<'c> Binder<'c> {
    pub fn bind_switch(&mut self, idx: NodeIndex, diag: &mut DiagnosticBag) -> BoundSwitch {
        let syntax = self.syntax;
        let span = self.span(idx);
        let (expression, section_syntax): (Option<NodeIndex>, &[NodeIndex]) = match syntax.data(idx) {
            Some(SyntaxData::Switch { expression, sections }) => (Some(*expression), sections.as_slice()),
            other => {
                let kind = other.map_or("<none>", |data| data.kind_name());
                warn!(kind, "bind_switch: not a switch statement");
                debug_assert!(false, "bind_switch called on {kind}");
                (None, &[][..])
            }
        };
        let expression = match expression {
            Some(expression) => self.bind_value(expression, diag),
            None => BoundNode::error(span),
        };
        let input_type = match expression.ty {
            Some(ty) if !expression.has_errors => ty,
            _ => TypeId::ERROR,
        };

        let saved_variables = std::mem::take(&mut self.pattern_variables);
        let saved_scope_start = self.pattern_scope_start;
        let mut next_label = 0u32;
        let mut default_label = None;
        let mut sections = Vec::with_capacity(section_syntax.len());
        for &section_idx in section_syntax {
            let Some(SyntaxData::SwitchSection { labels, statements }) = syntax.data(section_idx) else {
                continue;
            };
            let mut bound_labels = Vec::with_capacity(labels.len());
            for &label_idx in labels {
                let label = LabelId(next_label);
                next_label += 1;
                let label_span = self.span(label_idx);
                let (pattern, guard) = match syntax.data(label_idx) {
                    Some(SyntaxData::CaseLabel { pattern, guard }) => {
                        self.pattern_scope_start = self.pattern_variables.len();
                        let pattern = self.bind_pattern(*pattern, input_type, diag);
                        let guard = guard.map(|guard| {
                            let guard = self.bind_value(guard, diag);
                            self.convert_to_type(guard, TypeId::BOOL, diag)
                        });
                        (Some(pattern), guard)
                    }
                    _ => {
                        default_label = Some(label);
                        (None, None)
                    }
                };
                bound_labels.push(BoundSwitchLabel {
                    label,
                    syntax: label_idx,
                    span: label_span,
                    pattern,
                    guard,
                    is_reachable: true,
                });
            }
            sections.push(BoundSwitchSection {
                labels: bound_labels,
                statements: statements.clone(),
                span: self.span(section_idx),
            });
        }
        self.pattern_scope_start = saved_scope_start;
        let pattern_variables = std::mem::replace(&mut self.pattern_variables, saved_variables);

        let break_label = LabelId(next_label);
        let decision_dag = self.build_switch_dag(input_type, &sections, default_label.unwrap_or(break_label), next_label as usize + 1);
        let reachable = decision_dag.reachable_labels();
        let report = !expression.has_errors;
        for label in sections.iter_mut().flat_map(|s| s.labels.iter_mut()) {
            label.is_reachable = reachable.contains(label.label.0 as usize);
            // `default:` only runs when nothing else matched; it is never
            // reported even when the cases are exhaustive.
            if !label.is_reachable && report && !label.is_default() && !label.has_errors() {
                let span = label.pattern.as_ref().map_or(label.span, |p| p.span);
                diag.add(diagnostic_codes::SWITCH_CASE_SUBSUMED, span, &[]);
            }
        }
        debug!(
            labels = next_label,
            nodes = decision_dag.len(),
            reachable = reachable.count_ones(..),
            has_default = default_label.is_some(),
            "switch bound"
        );

        BoundSwitch {
            expression,
            sections,
            decision_dag,
            default_label,
            break_label,
            pattern_variables,
            span,
        }
    }

    /// Feed the labels to the DAG builder in source order. Erroneous
    /// patterns stay out so they cannot make later labels look unreachable.
    fn build_switch_dag(
        &self,
        input_type: TypeId,
        sections: &[BoundSwitchSection],
        default_label: LabelId,
        label_count: usize,
    ) -> DecisionDag {
        let cases: Vec<DagCase<'_>> = sections
            .iter()
            .flat_map(|s| s.labels.iter())
            .filter_map(|label| {
                let pattern = label.pattern.as_ref().filter(|p| !p.has_errors)?;
                let guard = label.guard.as_ref().map(|guard| match &guard.constant {
                    Some(ConstantValue::Bool(value)) if !guard.has_errors => GuardValue::Constant(*value),
                    _ => GuardValue::Dynamic,
                });
                Some(DagCase {
                    label: label.label,
                    pattern,
                    guard,
                })
            })
            .collect();
        let ctx = DagContext {
            compilation: self.compilation,
            input_type,
            default_label,
            label_count,
        };
        self.collaborators.dag_builder.build(&ctx, &cases)
    }
}

#[cfg(test)]
#[path = "../tests/switch_tests.rs"]
mod tests;
