//! Applying conversions to bound expressions.

use crate::binder::Binder;
use crate::bound::{BoundKind, BoundNode};
use crate::conversions::{Conversion, ConversionKind};
use crate::lookup::LookupResultKind;
use csz_common::DiagnosticBag;
use csz_common::diagnostics::diagnostic_codes;
use csz_symbols::{ConstantValue, TypeId};
use tracing::trace;

impl<'c> Binder<'c> {
    /// Implicitly convert `operand` to `target`, reporting when no implicit
    /// conversion exists.
    pub(crate) fn convert_to_type(&mut self, operand: BoundNode, target: TypeId, diag: &mut DiagnosticBag) -> BoundNode {
        if operand.ty == Some(target) {
            return operand;
        }
        let ctx = self.conversion_context();
        let conversion = self.collaborators.conversions.classify_expression(&ctx, &operand, target);
        if !conversion.is_implicit() {
            return self.generate_conversion_error(operand, target, diag);
        }
        self.create_conversion(operand, conversion, target, false, diag)
    }

    /// `(T)operand`.
    pub(crate) fn create_explicit_conversion(
        &mut self,
        operand: BoundNode,
        target: TypeId,
        diag: &mut DiagnosticBag,
    ) -> BoundNode {
        let ctx = self.conversion_context();
        let conversion = self.collaborators.conversions.classify_explicit(&ctx, &operand, target);
        if !conversion.exists() {
            if !operand.has_errors && !self.compilation.is_error_type(target) {
                let from = self.describe_operand(&operand);
                diag.add(diagnostic_codes::NO_EXPLICIT_CONV, operand.span, &[&from, &self.display_type(target)]);
            }
            let span = operand.span;
            return BoundNode::bad(LookupResultKind::Empty, Vec::new(), vec![operand], target, span);
        }
        self.create_conversion(operand, conversion, target, true, diag)
    }

    /// Wrap `operand` in a conversion node, folding constants.
    ///
    /// An identity conversion returns the operand unchanged. A lambda or
    /// method group converted to a delegate becomes a delegate creation.
    pub(crate) fn create_conversion(
        &mut self,
        operand: BoundNode,
        conversion: Conversion,
        target: TypeId,
        explicit: bool,
        diag: &mut DiagnosticBag,
    ) -> BoundNode {
        if conversion.is_identity() && operand.ty == Some(target) {
            return operand;
        }
        let span = operand.span;
        match conversion.kind {
            ConversionKind::AnonymousFunction | ConversionKind::MethodGroup => {
                let method = conversion.method;
                return BoundNode::new(
                    BoundKind::DelegateCreation {
                        argument: Box::new(operand),
                        method,
                        is_dynamic: false,
                    },
                    target,
                    span,
                );
            }
            _ => {}
        }
        let checked = self.in_checked_context();
        let constant = self.fold_conversion(&operand, conversion, target, explicit, checked, diag);
        trace!(kind = ?conversion.kind, explicit, "conversion");
        let node = BoundNode::new(
            BoundKind::Conversion {
                operand: Box::new(operand),
                conversion,
                explicit,
                checked,
            },
            target,
            span,
        );
        match constant {
            Ok(constant) => node.with_constant(constant),
            Err(()) => node.with_errors(),
        }
    }

    /// Constant value of a converted constant; `Err` after reporting a
    /// checked overflow.
    fn fold_conversion(
        &self,
        operand: &BoundNode,
        conversion: Conversion,
        target: TypeId,
        explicit: bool,
        checked: bool,
        diag: &mut DiagnosticBag,
    ) -> Result<Option<ConstantValue>, ()> {
        let Some(value) = &operand.constant else {
            return Ok(None);
        };
        if conversion.kind.is_user_defined() {
            return Ok(None);
        }
        if value.is_null() {
            return Ok(self.compilation.is_reference_type(target).then_some(ConstantValue::Null));
        }
        if matches!(value, ConstantValue::String(_) | ConstantValue::Bool(_)) {
            return Ok((conversion.is_identity() || target == operand.type_or_error()).then(|| value.clone()));
        }
        let Some(special) = target.as_special() else {
            return Ok(None);
        };
        if !special.is_numeric() && special != csz_symbols::SpecialType::Char {
            return Ok(None);
        }
        let Some((converted, overflowed)) = value.convert_to(special) else {
            return Ok(None);
        };
        if overflowed && explicit && checked {
            if !operand.has_errors {
                diag.add(
                    diagnostic_codes::CONSTANT_OVERFLOW_CHECKED,
                    operand.span,
                    &[&value.to_string(), &self.display_type(target)],
                );
            }
            return Err(());
        }
        Ok(Some(converted))
    }

    /// Report the best diagnostic for a failed implicit conversion and
    /// return a bad expression typed as the target.
    pub(crate) fn generate_conversion_error(
        &mut self,
        operand: BoundNode,
        target: TypeId,
        diag: &mut DiagnosticBag,
    ) -> BoundNode {
        let span = operand.span;
        if !operand.has_errors && !self.compilation.is_error_type(target) {
            self.report_conversion_error(&operand, target, diag);
        }
        BoundNode::bad(LookupResultKind::Empty, Vec::new(), vec![operand], target, span)
    }

    fn report_conversion_error(&self, operand: &BoundNode, target: TypeId, diag: &mut DiagnosticBag) {
        let compilation = self.compilation;
        let span = operand.span;
        match &operand.kind {
            BoundKind::MethodGroup(group) => {
                let name = self.text(group.name);
                match compilation.delegate_invoke(target) {
                    None => diag.add(
                        diagnostic_codes::METHOD_GROUP_TO_NON_DELEGATE,
                        span,
                        &[&name, &self.display_type(target)],
                    ),
                    Some(_) => diag.add(
                        diagnostic_codes::METHOD_DELEGATE_MISMATCH,
                        span,
                        &[&name, &self.display_type(target)],
                    ),
                }
            }
            BoundKind::UnboundLambda { parameters, .. } => match compilation.delegate_invoke(target) {
                None => diag.add(
                    diagnostic_codes::ANON_FUNC_TO_NON_DELEGATE,
                    span,
                    &[&self.display_type(target)],
                ),
                Some(_) => diag.add(
                    diagnostic_codes::BAD_DELEGATE_ARG_COUNT,
                    span,
                    &[&self.display_type(target), &parameters.len().to_string()],
                ),
            },
            _ => {
                let from = self.describe_operand(operand);
                let to = self.display_type(target);
                let ctx = self.conversion_context();
                let explicit = self.collaborators.conversions.classify_explicit(&ctx, operand, target);
                let code = if explicit.exists() {
                    diagnostic_codes::NO_IMPLICIT_CONV_CAST
                } else {
                    diagnostic_codes::NO_IMPLICIT_CONV
                };
                diag.add(code, span, &[&from, &to]);
            }
        }
    }

    /// How an operand's type reads in a conversion diagnostic.
    pub(crate) fn describe_operand(&self, operand: &BoundNode) -> String {
        match &operand.kind {
            BoundKind::MethodGroup(_) => "method group".to_string(),
            BoundKind::UnboundLambda { .. } => "lambda expression".to_string(),
            _ => self.display_type(operand.type_or_error()),
        }
    }
}

#[cfg(test)]
#[path = "../tests/convert_tests.rs"]
mod tests;
