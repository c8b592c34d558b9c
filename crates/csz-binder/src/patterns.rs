//! Pattern binding for `case` labels.
//!
//! A pattern binds against the type of the value being switched on (the
//! input type). Declaration patterns introduce [`PatternVariable`]s, visible
//! to the label's guard and to the section body.

use crate::binder::Binder;
use crate::bound::{BoundNode, PatternVariableId};
use crate::conversions::{ConversionKind, standard_explicit, standard_implicit};
use csz_common::diagnostics::diagnostic_codes;
use csz_common::{Atom, DiagnosticBag, Span};
use csz_symbols::{ConstantValue, TypeId};
use csz_syntax::{NodeIndex, SyntaxData};
use tracing::{debug, trace, warn};

/// A variable declared by a pattern (`case Circle c:`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatternVariable {
    pub id: PatternVariableId,
    pub name: Atom,
    pub ty: TypeId,
    pub span: Span,
}

#[derive(Clone, Debug)]
pub enum PatternKind {
    /// `case 1:` or `case null:`. `tested_type` is the type the constant is
    /// compared at; it differs from the input type when the input is `object`,
    /// an interface or a nullable value type.
    Constant {
        value: Box<BoundNode>,
        constant: ConstantValue,
        tested_type: TypeId,
    },
    /// `case string:`.
    Type { ty: TypeId },
    /// `case Circle c:`, `case var v:` and `case Circle _:`.
    Declaration {
        ty: TypeId,
        variable: Option<PatternVariableId>,
        is_var: bool,
    },
    /// `case _:` matches everything.
    Discard,
}

#[derive(Clone, Debug)]
pub struct BoundPattern {
    pub kind: PatternKind,
    pub input_type: TypeId,
    pub span: Span,
    pub has_errors: bool,
}

impl BoundPattern {
    fn new(kind: PatternKind, input_type: TypeId, span: Span) -> Self {
        BoundPattern {
            kind,
            input_type,
            span,
            has_errors: false,
        }
    }

    fn with_errors(mut self, has_errors: bool) -> Self {
        self.has_errors |= has_errors;
        self
    }

    /// Matches every non-error input without testing anything.
    pub fn is_irrefutable(&self) -> bool {
        match &self.kind {
            PatternKind::Discard => true,
            PatternKind::Declaration { is_var, .. } => *is_var,
            _ => false,
        }
    }
}

impl<'c> Binder<'c> {
    /// Bind the pattern of a `case` label against `input_type`.
    pub fn bind_pattern(&mut self, idx: NodeIndex, input_type: TypeId, diag: &mut DiagnosticBag) -> BoundPattern {
        let syntax = self.syntax;
        let span = self.span(idx);
        match syntax.data(idx) {
            Some(SyntaxData::ConstantPattern { expression }) => {
                self.bind_constant_pattern(*expression, input_type, span, diag)
            }
            Some(SyntaxData::TypePattern { ty }) => {
                let ty_node = self.bind_type(*ty, diag);
                let ty = ty_node.type_or_error();
                let compatible = ty_node.has_errors || self.check_pattern_type(input_type, ty, span, diag);
                BoundPattern::new(PatternKind::Type { ty }, input_type, span)
                    .with_errors(ty_node.has_errors || !compatible)
            }
            Some(SyntaxData::DeclarationPattern { ty, designation }) => {
                self.bind_declaration_pattern(*ty, *designation, input_type, span, diag)
            }
            Some(SyntaxData::DiscardPattern) => BoundPattern::new(PatternKind::Discard, input_type, span),
            Some(SyntaxData::Missing) | None => {
                BoundPattern::new(PatternKind::Discard, input_type, span).with_errors(true)
            }
            Some(other) => {
                warn!(kind = other.kind_name(), "bind_pattern: unexpected syntax kind in pattern position");
                debug_assert!(false, "unexpected syntax kind in pattern position: {}", other.kind_name());
                BoundPattern::new(PatternKind::Discard, input_type, span).with_errors(true)
            }
        }
    }

    fn bind_constant_pattern(
        &mut self,
        expression: NodeIndex,
        input_type: TypeId,
        span: Span,
        diag: &mut DiagnosticBag,
    ) -> BoundPattern {
        let compilation = self.compilation;
        let value = self.bind_value(expression, diag);
        let error_pattern = |value: BoundNode| {
            let constant = value.constant.clone().unwrap_or(ConstantValue::Null);
            BoundPattern::new(
                PatternKind::Constant {
                    value: Box::new(value),
                    constant,
                    tested_type: TypeId::ERROR,
                },
                input_type,
                span,
            )
            .with_errors(true)
        };
        if value.has_errors {
            return error_pattern(value);
        }

        let value_type = value.type_or_error();
        if compilation.is_error_type(input_type) || compilation.is_dynamic(input_type) {
            return self.finish_constant_pattern(value, value_type, input_type, span, diag);
        }
        let underlying = compilation.nullable_underlying(input_type);
        let open_input = compilation.is_reference_type(input_type) || underlying.is_some();
        if open_input && value.constant.as_ref().is_some_and(ConstantValue::is_null) {
            return self.finish_constant_pattern(value, input_type, input_type, span, diag);
        }
        if !open_input || value.ty.is_none() || value_type == input_type {
            let converted = self.convert_to_type(value, input_type, diag);
            if converted.has_errors {
                return error_pattern(converted);
            }
            return self.finish_constant_pattern(converted, input_type, input_type, span, diag);
        }

        // Against `T?` the constant is compared with the underlying value;
        // against `object` or an interface it keeps its own type and the match
        // tests for that type first.
        if let Some(underlying) = underlying {
            let converted = self.convert_to_type(value, underlying, diag);
            if converted.has_errors {
                return error_pattern(converted);
            }
            return self.finish_constant_pattern(converted, underlying, input_type, span, diag);
        }
        if !self.check_pattern_type(input_type, value_type, value.span, diag) {
            return error_pattern(value.with_errors());
        }
        self.finish_constant_pattern(value, value_type, input_type, span, diag)
    }

    fn finish_constant_pattern(
        &self,
        value: BoundNode,
        tested_type: TypeId,
        input_type: TypeId,
        span: Span,
        diag: &mut DiagnosticBag,
    ) -> BoundPattern {
        let Some(constant) = value.constant.clone() else {
            diag.add(diagnostic_codes::CONSTANT_EXPECTED, value.span, &[]);
            return BoundPattern::new(
                PatternKind::Constant {
                    value: Box::new(value),
                    constant: ConstantValue::Null,
                    tested_type: TypeId::ERROR,
                },
                input_type,
                span,
            )
            .with_errors(true);
        };
        trace!(%constant, tested = %self.display_type(tested_type), "constant pattern");
        BoundPattern::new(
            PatternKind::Constant {
                value: Box::new(value),
                constant,
                tested_type,
            },
            input_type,
            span,
        )
    }

    fn bind_declaration_pattern(
        &mut self,
        ty: NodeIndex,
        designation: Option<(Atom, Span)>,
        input_type: TypeId,
        span: Span,
        diag: &mut DiagnosticBag,
    ) -> BoundPattern {
        let is_var = self.is_implicitly_typed(ty);
        let (declared, has_errors) = if is_var {
            (input_type, false)
        } else {
            let ty_node = self.bind_type(ty, diag);
            let declared = ty_node.type_or_error();
            let compatible = ty_node.has_errors || self.check_pattern_type(input_type, declared, span, diag);
            (declared, ty_node.has_errors || !compatible)
        };

        let variable = designation.map(|(name, name_span)| {
            let id = PatternVariableId(self.pattern_variables.len() as u32);
            debug!(name = %self.text(name), ty = %self.display_type(declared), id = id.0, "pattern variable");
            self.pattern_variables.push(PatternVariable {
                id,
                name,
                ty: declared,
                span: name_span,
            });
            id
        });
        BoundPattern::new(
            PatternKind::Declaration {
                ty: declared,
                variable,
                is_var,
            },
            input_type,
            span,
        )
        .with_errors(has_errors)
    }

    /// Report when no value of `input` can ever be a `pattern_type`.
    fn check_pattern_type(&self, input: TypeId, pattern_type: TypeId, span: Span, diag: &mut DiagnosticBag) -> bool {
        if pattern_type_compatible(self.compilation, input, pattern_type) {
            return true;
        }
        diag.add(
            diagnostic_codes::PATTERN_WRONG_TYPE,
            span,
            &[&self.display_type(input), &self.display_type(pattern_type)],
        );
        false
    }
}

/// Whether a value of type `input` may be of type `pattern_type` at run time.
pub(crate) fn pattern_type_compatible(compilation: &csz_symbols::Compilation, input: TypeId, pattern_type: TypeId) -> bool {
    if compilation.is_error_type(input)
        || compilation.is_error_type(pattern_type)
        || compilation.is_dynamic(input)
        || compilation.is_dynamic(pattern_type)
    {
        return true;
    }
    let implicit = standard_implicit(compilation, input, pattern_type).kind;
    if matches!(
        implicit,
        ConversionKind::Identity
            | ConversionKind::ImplicitReference
            | ConversionKind::Boxing
            | ConversionKind::ImplicitNullable
    ) {
        return true;
    }
    matches!(
        standard_explicit(compilation, input, pattern_type).kind,
        ConversionKind::ExplicitReference | ConversionKind::Unboxing | ConversionKind::ExplicitNullable
    )
}

#[cfg(test)]
#[path = "../tests/patterns_tests.rs"]
mod tests;
