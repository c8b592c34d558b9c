//! Literals, keywords, casts, operators, conditional access and assignment.

use crate::binder::Binder;
use crate::bound::{BoundKind, BoundNode};
use crate::lookup::LookupResultKind;
use csz_common::diagnostics::diagnostic_codes;
use csz_common::{DiagnosticBag, Span};
use csz_symbols::{ConstantValue, SpecialType, SymbolKind, TypeId, WellKnownType};
use csz_syntax::{BinaryOperator, LambdaParameter, Literal, NodeIndex, UnaryOperator};
use std::sync::Arc;
use tracing::trace;

/// Numeric types binary operators promote to, in preference order.
const PROMOTED_TYPES: [TypeId; 7] = [
    TypeId::INT,
    TypeId::UINT,
    TypeId::LONG,
    TypeId::ULONG,
    TypeId::FLOAT,
    TypeId::DOUBLE,
    TypeId::DECIMAL,
];

/// The predefined operator chosen for a binary expression.
#[derive(Clone, Copy, Debug)]
struct BinarySignature {
    left: TypeId,
    right: TypeId,
    result: TypeId,
}

impl<'c> Binder<'c> {
    // =========================================================================
    // Literals and keywords
    // =========================================================================

    pub(crate) fn bind_literal(&self, literal: &Literal, span: Span) -> BoundNode {
        let (ty, constant) = match literal {
            Literal::Null => (TypeId::NULL, ConstantValue::Null),
            Literal::Bool(value) => (TypeId::BOOL, ConstantValue::Bool(*value)),
            Literal::Integer(value) => {
                let value = *value;
                let ty = if value <= i32::MAX as u64 {
                    TypeId::INT
                } else if value <= u32::MAX as u64 {
                    TypeId::UINT
                } else if value <= i64::MAX as u64 {
                    TypeId::LONG
                } else {
                    TypeId::ULONG
                };
                (ty, ConstantValue::Integral(value as i128))
            }
            Literal::Double(value) => (TypeId::DOUBLE, ConstantValue::Floating(*value)),
            Literal::Char(value) => (TypeId::CHAR, ConstantValue::Char(*value)),
            Literal::String(value) => (TypeId::STRING, ConstantValue::String(value.clone())),
        };
        BoundNode::new(BoundKind::Literal, ty, span).with_constant(Some(constant))
    }

    pub(crate) fn bind_this(&self, span: Span, diag: &mut DiagnosticBag) -> BoundNode {
        match self.this_type() {
            Some(ty) if !self.in_static_context() => BoundNode::new(BoundKind::ThisReference, ty, span),
            this_type => {
                diag.add(diagnostic_codes::THIS_IN_BAD_CONTEXT, span, &[]);
                BoundNode::bad(
                    LookupResultKind::StaticInstanceMismatch,
                    Vec::new(),
                    Vec::new(),
                    this_type.unwrap_or(TypeId::ERROR),
                    span,
                )
            }
        }
    }

    /// `base` reads `this` typed as the base class.
    pub(crate) fn bind_base(&self, span: Span, diag: &mut DiagnosticBag) -> BoundNode {
        let base_type = self
            .this_type()
            .map(|ty| self.compilation.base_type(ty).unwrap_or(TypeId::OBJECT));
        match base_type {
            Some(ty) if !self.in_static_context() => BoundNode::new(BoundKind::BaseReference, ty, span),
            base_type => {
                diag.add(diagnostic_codes::THIS_IN_BAD_CONTEXT, span, &[]);
                BoundNode::bad(
                    LookupResultKind::StaticInstanceMismatch,
                    Vec::new(),
                    Vec::new(),
                    base_type.unwrap_or(TypeId::ERROR),
                    span,
                )
            }
        }
    }

    pub(crate) fn bind_default(&mut self, ty: NodeIndex, span: Span, diag: &mut DiagnosticBag) -> BoundNode {
        let type_node = self.bind_type(ty, diag);
        let ty = type_node.type_or_error();
        if type_node.has_errors {
            return BoundNode::bad(LookupResultKind::Empty, Vec::new(), vec![type_node], ty, span);
        }
        BoundNode::new(BoundKind::DefaultExpression, ty, span).with_constant(self.default_constant(ty))
    }

    /// Constant value of `default(T)`, when it has one.
    fn default_constant(&self, ty: TypeId) -> Option<ConstantValue> {
        match ty.as_special() {
            Some(SpecialType::Boolean) => Some(ConstantValue::Bool(false)),
            Some(SpecialType::Char) => Some(ConstantValue::Char('\0')),
            Some(special) if special.is_floating() => Some(ConstantValue::Floating(0.0)),
            Some(special) if special.is_integral() => Some(ConstantValue::Integral(0)),
            _ if self.compilation.is_reference_type(ty) => Some(ConstantValue::Null),
            _ => None,
        }
    }

    pub(crate) fn bind_type_of(&mut self, ty: NodeIndex, span: Span, diag: &mut DiagnosticBag) -> BoundNode {
        let type_node = self.bind_type(ty, diag);
        let operand_type = type_node.type_or_error();
        let Some(system_type) = self.compilation.well_known_type(WellKnownType::SystemType) else {
            diag.add(
                diagnostic_codes::PREDEFINED_TYPE_NOT_FOUND,
                span,
                &[WellKnownType::SystemType.path()],
            );
            return BoundNode::bad(LookupResultKind::Empty, Vec::new(), vec![type_node], TypeId::ERROR, span);
        };
        let node = BoundNode::new(BoundKind::TypeOf { operand_type }, system_type, span);
        if type_node.has_errors { node.with_errors() } else { node }
    }

    pub(crate) fn bind_lambda(
        &mut self,
        parameters: &[LambdaParameter],
        body: NodeIndex,
        span: Span,
        diag: &mut DiagnosticBag,
    ) -> BoundNode {
        let names = parameters.iter().map(|p| p.name).collect();
        let mut types = Vec::with_capacity(parameters.len());
        for parameter in parameters {
            types.push(parameter.ty.map(|ty| self.bind_type(ty, diag).type_or_error()));
        }
        BoundNode::unbound_lambda(names, types, body, span)
    }

    /// `__arglist(...)`. Only valid as a call argument; [`Binder::bind`]
    /// reports it anywhere else.
    pub(crate) fn bind_arglist(&mut self, arguments: &[NodeIndex], span: Span, diag: &mut DiagnosticBag) -> BoundNode {
        let arguments = arguments.iter().map(|a| self.bind_value(*a, diag)).collect();
        BoundNode::new(BoundKind::ArgList { arguments }, TypeId::VOID, span)
    }

    // =========================================================================
    // Casts
    // =========================================================================

    pub(crate) fn bind_cast(
        &mut self,
        ty: NodeIndex,
        expression: NodeIndex,
        span: Span,
        diag: &mut DiagnosticBag,
    ) -> BoundNode {
        let type_node = self.bind_type(ty, diag);
        let target = type_node.type_or_error();
        let operand = self.bind_value(expression, diag);
        if type_node.has_errors || self.compilation.is_error_type(target) {
            return BoundNode::bad(LookupResultKind::Empty, Vec::new(), vec![operand], target, span);
        }
        let mut converted = self.create_explicit_conversion(operand, target, diag);
        converted.span = span;
        converted
    }

    // =========================================================================
    // Binary and unary operators
    // =========================================================================

    pub(crate) fn bind_binary(
        &mut self,
        operator: BinaryOperator,
        left: NodeIndex,
        right: NodeIndex,
        span: Span,
        diag: &mut DiagnosticBag,
    ) -> BoundNode {
        let left = self.bind_value(left, diag);
        let right = self.bind_value(right, diag);
        let compilation = self.compilation;

        if left.has_errors || right.has_errors {
            return BoundNode::bad(LookupResultKind::Empty, Vec::new(), vec![left, right], TypeId::ERROR, span);
        }
        let (left_type, right_type) = (left.type_or_error(), right.type_or_error());
        if left.ty.is_some() && right.ty.is_some() && (compilation.is_dynamic(left_type) || compilation.is_dynamic(right_type)) {
            return BoundNode::new(
                BoundKind::Binary {
                    operator,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                TypeId::DYNAMIC,
                span,
            );
        }

        let Some(signature) = self.binary_signature(operator, &left, &right) else {
            diag.add(
                diagnostic_codes::BAD_BINARY_OPS,
                span,
                &[operator.text(), &self.describe_operand(&left), &self.describe_operand(&right)],
            );
            return BoundNode::bad(LookupResultKind::Empty, Vec::new(), vec![left, right], TypeId::ERROR, span);
        };
        trace!(
            operator = operator.text(),
            left = %self.display_type(signature.left),
            right = %self.display_type(signature.right),
            result = %self.display_type(signature.result),
            "binary operator"
        );

        let left = self.convert_to_type(left, signature.left, diag);
        let right = self.convert_to_type(right, signature.right, diag);
        let folded = match (&left.constant, &right.constant) {
            (Some(l), Some(r)) => fold_binary(operator, l, r, signature.left, self.in_checked_context()),
            _ => Ok(None),
        };
        let node = BoundNode::new(
            BoundKind::Binary {
                operator,
                left: Box::new(left),
                right: Box::new(right),
            },
            signature.result,
            span,
        );
        self.finish_fold(node, folded, diag)
    }

    /// Attach a folded constant, or report why folding failed.
    fn finish_fold(
        &self,
        node: BoundNode,
        folded: Result<Option<ConstantValue>, FoldError>,
        diag: &mut DiagnosticBag,
    ) -> BoundNode {
        let code = match folded {
            Ok(constant) => return node.with_constant(constant),
            Err(FoldError::DivideByZero) => diagnostic_codes::DIVIDE_BY_ZERO,
            Err(FoldError::Overflow) => diagnostic_codes::CONSTANT_OVERFLOW,
        };
        trace!(code, "constant folding failed");
        diag.add(code, node.span, &[]);
        node.with_errors()
    }

    /// Pick the predefined operator for `left op right`.
    fn binary_signature(&self, operator: BinaryOperator, left: &BoundNode, right: &BoundNode) -> Option<BinarySignature> {
        let compilation = self.compilation;
        let (left_type, right_type) = (left.ty?, right.ty?);
        let same = |ty: TypeId, result: TypeId| BinarySignature {
            left: ty,
            right: ty,
            result,
        };

        if operator.is_logical() {
            return (self.converts_to(left, TypeId::BOOL) && self.converts_to(right, TypeId::BOOL))
                .then(|| same(TypeId::BOOL, TypeId::BOOL));
        }

        if operator == BinaryOperator::Add && (left_type == TypeId::STRING || right_type == TypeId::STRING) {
            let operand = |ty: TypeId| if ty == TypeId::STRING { TypeId::STRING } else { TypeId::OBJECT };
            return Some(BinarySignature {
                left: operand(left_type),
                right: operand(right_type),
                result: TypeId::STRING,
            });
        }

        let result_for = |promoted: TypeId| {
            if operator.is_comparison() {
                TypeId::BOOL
            } else {
                promoted
            }
        };
        if is_numeric_operand(left_type) && is_numeric_operand(right_type) {
            return PROMOTED_TYPES
                .into_iter()
                .find(|ty| self.converts_to(left, *ty) && self.converts_to(right, *ty))
                .map(|promoted| same(promoted, result_for(promoted)));
        }

        if !matches!(operator, BinaryOperator::Equals | BinaryOperator::NotEquals) {
            return None;
        }
        if left_type == right_type && (left_type == TypeId::BOOL || left_type == TypeId::STRING || compilation.is_enum(left_type)) {
            return Some(same(left_type, TypeId::BOOL));
        }
        let nullable_or_reference = |ty: TypeId| compilation.is_reference_type(ty) || compilation.nullable_underlying(ty).is_some();
        if right_type == TypeId::NULL && (left_type == TypeId::NULL || nullable_or_reference(left_type)) {
            return Some(same(left_type, TypeId::BOOL));
        }
        if left_type == TypeId::NULL && nullable_or_reference(right_type) {
            return Some(same(right_type, TypeId::BOOL));
        }
        let reference_related = compilation.is_reference_type(left_type)
            && compilation.is_reference_type(right_type)
            && (self.types_convert(left_type, right_type) || self.types_convert(right_type, left_type));
        reference_related.then_some(BinarySignature {
            left: left_type,
            right: right_type,
            result: TypeId::BOOL,
        })
    }

    fn converts_to(&self, node: &BoundNode, target: TypeId) -> bool {
        let ctx = self.conversion_context();
        self.collaborators
            .conversions
            .classify_expression(&ctx, node, target)
            .is_implicit()
    }

    fn types_convert(&self, from: TypeId, to: TypeId) -> bool {
        let ctx = self.conversion_context();
        self.collaborators.conversions.classify_types(&ctx, from, to).is_implicit()
    }

    pub(crate) fn bind_unary(
        &mut self,
        operator: UnaryOperator,
        operand: NodeIndex,
        span: Span,
        diag: &mut DiagnosticBag,
    ) -> BoundNode {
        let operand = self.bind_value(operand, diag);
        if operand.has_errors {
            return BoundNode::bad(LookupResultKind::Empty, Vec::new(), vec![operand], TypeId::ERROR, span);
        }
        if operand.ty.is_some_and(|ty| self.compilation.is_dynamic(ty)) {
            return BoundNode::new(
                BoundKind::Unary {
                    operator,
                    operand: Box::new(operand),
                },
                TypeId::DYNAMIC,
                span,
            );
        }

        let operand_type = match operator {
            UnaryOperator::Negate => operand.ty.and_then(negated_type),
            UnaryOperator::Not => self.converts_to(&operand, TypeId::BOOL).then_some(TypeId::BOOL),
        };
        let Some(operand_type) = operand_type else {
            diag.add(
                diagnostic_codes::BAD_UNARY_OP,
                span,
                &[operator.text(), &self.describe_operand(&operand)],
            );
            return BoundNode::bad(LookupResultKind::Empty, Vec::new(), vec![operand], TypeId::ERROR, span);
        };

        let operand = self.convert_to_type(operand, operand_type, diag);
        let folded = match &operand.constant {
            Some(value) => fold_unary(operator, value, operand_type, self.in_checked_context()),
            None => Ok(None),
        };
        let node = BoundNode::new(
            BoundKind::Unary {
                operator,
                operand: Box::new(operand),
            },
            operand_type,
            span,
        );
        self.finish_fold(node, folded, diag)
    }

    // =========================================================================
    // Conditional access
    // =========================================================================

    /// `receiver?.access`. `bind_access` binds the access against a
    /// [`BoundKind::ConditionalReceiver`] typed as the receiver's underlying
    /// non-nullable type. A value-typed result is lifted to nullable.
    pub(crate) fn bind_conditional_access<F>(
        &mut self,
        receiver: NodeIndex,
        span: Span,
        diag: &mut DiagnosticBag,
        bind_access: F,
    ) -> BoundNode
    where
        F: FnOnce(&mut Self, BoundNode, &mut DiagnosticBag) -> BoundNode,
    {
        let receiver = self.bind_value(receiver, diag);
        let compilation = self.compilation;
        if receiver.has_errors {
            return BoundNode::bad(LookupResultKind::Empty, Vec::new(), vec![receiver], TypeId::ERROR, span);
        }
        let receiver_type = receiver.type_or_error();
        let unusable = receiver.ty.is_none()
            || matches!(receiver.kind, BoundKind::MethodGroup(_))
            || compilation.is_non_nullable_value_type(receiver_type);
        if unusable {
            diag.add(
                diagnostic_codes::BAD_UNARY_OP,
                receiver.span,
                &["?", &self.describe_operand(&receiver)],
            );
            return BoundNode::bad(LookupResultKind::Empty, Vec::new(), vec![receiver], TypeId::ERROR, span);
        }

        let underlying = compilation.nullable_underlying(receiver_type).unwrap_or(receiver_type);
        let placeholder = BoundNode::new(BoundKind::ConditionalReceiver, underlying, receiver.span);
        let access = bind_access(self, placeholder, diag);
        let access = self.check_value(access, diag);
        let access_type = access.type_or_error();
        let ty = if access_type != TypeId::VOID && compilation.is_non_nullable_value_type(access_type) {
            compilation.types().nullable(access_type)
        } else {
            access_type
        };
        trace!(receiver = %self.display_type(receiver_type), ty = %self.display_type(ty), "conditional access");
        BoundNode::new(
            BoundKind::ConditionalAccess {
                receiver: Box::new(receiver),
                access: Box::new(access),
            },
            ty,
            span,
        )
    }

    // =========================================================================
    // Assignment
    // =========================================================================

    pub(crate) fn bind_assignment(
        &mut self,
        left: NodeIndex,
        right: NodeIndex,
        span: Span,
        diag: &mut DiagnosticBag,
    ) -> BoundNode {
        let left = self.bind_value(left, diag);
        let right = self.bind_value(right, diag);
        let assignable = self.check_assignable(&left, diag);
        let target = left.type_or_error();
        let right = if left.has_errors || self.compilation.is_error_type(target) {
            right
        } else {
            self.convert_to_type(right, target, diag)
        };
        let node = BoundNode::new(
            BoundKind::Assignment {
                left: Box::new(left),
                right: Box::new(right),
            },
            target,
            span,
        );
        if assignable { node } else { node.with_errors() }
    }

    /// Whether `left` denotes something an assignment may write.
    fn check_assignable(&self, left: &BoundNode, diag: &mut DiagnosticBag) -> bool {
        if left.has_errors {
            return true;
        }
        let compilation = self.compilation;
        let writable = match &left.kind {
            BoundKind::Local { symbol } => {
                !matches!(&compilation.symbol(*symbol).kind, SymbolKind::Local(data) if data.constant.is_some())
            }
            BoundKind::FieldAccess { field, .. } => {
                if left.constant.is_some()
                    || matches!(&compilation.symbol(*field).kind, SymbolKind::Field(data) if data.constant.is_some())
                {
                    false
                } else {
                    return self.check_member_assignable(left, diag);
                }
            }
            BoundKind::PropertyAccess { .. } | BoundKind::IndexerAccess(_) => {
                return self.check_member_assignable(left, diag);
            }
            BoundKind::Parameter { .. }
            | BoundKind::PatternLocal { .. }
            | BoundKind::ArrayAccess { .. }
            | BoundKind::Dynamic { .. } => true,
            _ => false,
        };
        if !writable {
            diag.add(diagnostic_codes::ASSIGNMENT_TARGET_NOT_VARIABLE, left.span, &[]);
        }
        writable
    }
}

// =============================================================================
// Operator typing and constant folding
// =============================================================================

fn is_numeric_operand(ty: TypeId) -> bool {
    ty.as_special()
        .is_some_and(|special| special.is_numeric() || special == SpecialType::Char)
}

/// Result type of unary minus on `ty`.
fn negated_type(ty: TypeId) -> Option<TypeId> {
    match ty.as_special()? {
        SpecialType::SByte
        | SpecialType::Byte
        | SpecialType::Int16
        | SpecialType::UInt16
        | SpecialType::Char
        | SpecialType::Int32 => Some(TypeId::INT),
        SpecialType::UInt32 | SpecialType::Int64 => Some(TypeId::LONG),
        SpecialType::Single | SpecialType::Double | SpecialType::Decimal => Some(ty),
        _ => None,
    }
}

/// Why a constant operation could not be folded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FoldError {
    DivideByZero,
    /// Only in a checked context; unchecked folding wraps.
    Overflow,
}

fn fold_binary(
    operator: BinaryOperator,
    left: &ConstantValue,
    right: &ConstantValue,
    operand_type: TypeId,
    checked: bool,
) -> Result<Option<ConstantValue>, FoldError> {
    use BinaryOperator::*;
    let special = operand_type.as_special();
    match (left, right) {
        (ConstantValue::Bool(l), ConstantValue::Bool(r)) => Ok(Some(ConstantValue::Bool(match operator {
            LogicalAnd => *l && *r,
            LogicalOr => *l || *r,
            Equals => l == r,
            NotEquals => l != r,
            _ => return Ok(None),
        }))),
        (ConstantValue::String(_) | ConstantValue::Null, ConstantValue::String(_) | ConstantValue::Null)
            if operand_type == TypeId::STRING =>
        {
            let text = |value: &ConstantValue| match value {
                ConstantValue::String(s) => s.to_string(),
                _ => String::new(),
            };
            Ok(match operator {
                Add => Some(ConstantValue::String(Arc::from(text(left) + &text(right)))),
                Equals => Some(ConstantValue::Bool(left == right)),
                NotEquals => Some(ConstantValue::Bool(left != right)),
                _ => None,
            })
        }
        _ => {
            let Some(special) = special else {
                return Ok(None);
            };
            if special.is_floating() {
                Ok(left
                    .as_f64()
                    .zip(right.as_f64())
                    .and_then(|(l, r)| fold_floating(operator, l, r, special)))
            } else if special.is_integral() {
                match (left.as_integral(), right.as_integral()) {
                    (Some(l), Some(r)) => fold_integral(operator, l, r, special, checked),
                    _ => Ok(None),
                }
            } else {
                Ok(None)
            }
        }
    }
}

fn fold_integral(
    operator: BinaryOperator,
    left: i128,
    right: i128,
    special: SpecialType,
    checked: bool,
) -> Result<Option<ConstantValue>, FoldError> {
    use BinaryOperator::*;
    let (value, overflowed) = match operator {
        Add => left.overflowing_add(right),
        Subtract => left.overflowing_sub(right),
        Multiply => left.overflowing_mul(right),
        Divide | Remainder if right == 0 => return Err(FoldError::DivideByZero),
        Divide => left.overflowing_div(right),
        Remainder => left.overflowing_rem(right),
        Equals => return Ok(Some(ConstantValue::Bool(left == right))),
        NotEquals => return Ok(Some(ConstantValue::Bool(left != right))),
        LessThan => return Ok(Some(ConstantValue::Bool(left < right))),
        LessThanOrEqual => return Ok(Some(ConstantValue::Bool(left <= right))),
        GreaterThan => return Ok(Some(ConstantValue::Bool(left > right))),
        GreaterThanOrEqual => return Ok(Some(ConstantValue::Bool(left >= right))),
        LogicalAnd | LogicalOr => return Ok(None),
    };
    narrow_folded(value, overflowed, special, checked)
}

/// Wrap a folded value into `special`, or fail in a checked context.
fn narrow_folded(
    value: i128,
    overflowed: bool,
    special: SpecialType,
    checked: bool,
) -> Result<Option<ConstantValue>, FoldError> {
    let Some((wrapped, narrowed)) = ConstantValue::Integral(value).convert_to(special) else {
        return Ok(None);
    };
    if checked && (overflowed || narrowed) {
        return Err(FoldError::Overflow);
    }
    Ok(Some(wrapped))
}

fn fold_floating(operator: BinaryOperator, left: f64, right: f64, special: SpecialType) -> Option<ConstantValue> {
    use BinaryOperator::*;
    let value = match operator {
        Add => left + right,
        Subtract => left - right,
        Multiply => left * right,
        Divide => left / right,
        Remainder => left % right,
        Equals => return Some(ConstantValue::Bool(left == right)),
        NotEquals => return Some(ConstantValue::Bool(left != right)),
        LessThan => return Some(ConstantValue::Bool(left < right)),
        LessThanOrEqual => return Some(ConstantValue::Bool(left <= right)),
        GreaterThan => return Some(ConstantValue::Bool(left > right)),
        GreaterThanOrEqual => return Some(ConstantValue::Bool(left >= right)),
        LogicalAnd | LogicalOr => return None,
    };
    let value = if special == SpecialType::Single {
        f64::from(value as f32)
    } else {
        value
    };
    Some(ConstantValue::Floating(value))
}

fn fold_unary(
    operator: UnaryOperator,
    value: &ConstantValue,
    operand_type: TypeId,
    checked: bool,
) -> Result<Option<ConstantValue>, FoldError> {
    match (operator, value) {
        (UnaryOperator::Not, ConstantValue::Bool(b)) => Ok(Some(ConstantValue::Bool(!b))),
        (UnaryOperator::Negate, ConstantValue::Floating(f)) => Ok(Some(ConstantValue::Floating(-f))),
        (UnaryOperator::Negate, value) => {
            let (Some(special), Some(integral)) = (operand_type.as_special(), value.as_integral()) else {
                return Ok(None);
            };
            let (negated, overflowed) = integral.overflowing_neg();
            narrow_folded(negated, overflowed, special, checked)
        }
        _ => Ok(None),
    }
}

#[cfg(test)]
#[path = "../tests/operators_tests.rs"]
mod tests;
