//! Conversion classification.
//!
//! The binder asks a [`ConversionClassifier`] what kind of conversion exists
//! between an expression (or a type) and a target type, and only consumes
//! the verdict. [`StandardConversions`] implements the usual C# rules over a
//! [`Compilation`]; hosts may plug in their own classifier.

use crate::bound::{BoundKind, BoundNode, MethodGroup};
use csz_symbols::{
    Compilation, ConstantValue, MethodKind, SpecialType, SymbolId, SymbolKind, TypeData, TypeId,
};
use smallvec::SmallVec;
use tracing::trace;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ConversionKind {
    Identity,
    ImplicitNumeric,
    /// A constant expression that fits the narrower target (`byte b = 1`).
    ImplicitConstant,
    ImplicitNullable,
    NullLiteral,
    ImplicitReference,
    Boxing,
    ImplicitDynamic,
    ImplicitUserDefined,
    AnonymousFunction,
    MethodGroup,
    ExplicitNumeric,
    ExplicitReference,
    Unboxing,
    ExplicitUserDefined,
    ExplicitNullable,
    ExplicitDynamic,
    NoConversion,
}

impl ConversionKind {
    pub fn exists(self) -> bool {
        self != ConversionKind::NoConversion
    }

    pub fn is_implicit(self) -> bool {
        matches!(
            self,
            ConversionKind::Identity
                | ConversionKind::ImplicitNumeric
                | ConversionKind::ImplicitConstant
                | ConversionKind::ImplicitNullable
                | ConversionKind::NullLiteral
                | ConversionKind::ImplicitReference
                | ConversionKind::Boxing
                | ConversionKind::ImplicitDynamic
                | ConversionKind::ImplicitUserDefined
                | ConversionKind::AnonymousFunction
                | ConversionKind::MethodGroup
        )
    }

    pub fn is_explicit(self) -> bool {
        self.exists() && !self.is_implicit()
    }

    pub fn is_user_defined(self) -> bool {
        matches!(
            self,
            ConversionKind::ImplicitUserDefined | ConversionKind::ExplicitUserDefined
        )
    }

    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            ConversionKind::ImplicitNumeric
                | ConversionKind::ImplicitConstant
                | ConversionKind::ExplicitNumeric
        )
    }

    /// Rank used when comparing two applicable conversions; lower is better.
    pub(crate) fn rank(self) -> u8 {
        match self {
            ConversionKind::Identity => 0,
            ConversionKind::ImplicitConstant
            | ConversionKind::ImplicitNumeric
            | ConversionKind::ImplicitNullable
            | ConversionKind::NullLiteral
            | ConversionKind::ImplicitReference
            | ConversionKind::Boxing
            | ConversionKind::AnonymousFunction
            | ConversionKind::MethodGroup => 1,
            ConversionKind::ImplicitDynamic => 2,
            ConversionKind::ImplicitUserDefined => 3,
            _ => 4,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Conversion {
    pub kind: ConversionKind,
    /// Operator method of a user-defined conversion, or the method chosen
    /// from a method group.
    pub method: Option<SymbolId>,
}

impl Conversion {
    pub const IDENTITY: Conversion = Conversion::new(ConversionKind::Identity);
    pub const NONE: Conversion = Conversion::new(ConversionKind::NoConversion);

    pub const fn new(kind: ConversionKind) -> Self {
        Conversion { kind, method: None }
    }

    pub const fn with_method(kind: ConversionKind, method: SymbolId) -> Self {
        Conversion {
            kind,
            method: Some(method),
        }
    }

    pub fn exists(&self) -> bool {
        self.kind.exists()
    }

    pub fn is_implicit(&self) -> bool {
        self.kind.is_implicit()
    }

    pub fn is_identity(&self) -> bool {
        self.kind == ConversionKind::Identity
    }
}

/// What a classifier may look at.
#[derive(Clone, Copy)]
pub struct ConversionContext<'a> {
    pub compilation: &'a Compilation,
    /// Checked arithmetic context.
    pub checked: bool,
}

pub trait ConversionClassifier: Send + Sync {
    /// Implicit conversion from an expression, which may be a constant,
    /// a lambda or a method group.
    fn classify_expression(&self, ctx: &ConversionContext<'_>, source: &BoundNode, target: TypeId) -> Conversion;

    /// Implicit conversion between two types.
    fn classify_types(&self, ctx: &ConversionContext<'_>, source: TypeId, target: TypeId) -> Conversion;

    /// Conversion allowed by a cast: implicit when one exists, otherwise explicit.
    fn classify_explicit(&self, ctx: &ConversionContext<'_>, source: &BoundNode, target: TypeId) -> Conversion;

    /// The type every expression converts to, for implicitly typed arrays.
    fn best_common_type(&self, ctx: &ConversionContext<'_>, nodes: &[&BoundNode]) -> Option<TypeId>;
}

/// The standard C# conversion rules.
#[derive(Clone, Copy, Debug, Default)]
pub struct StandardConversions;

impl ConversionClassifier for StandardConversions {
    fn classify_expression(&self, ctx: &ConversionContext<'_>, source: &BoundNode, target: TypeId) -> Conversion {
        match &source.kind {
            BoundKind::UnboundLambda { parameters, .. } => {
                return lambda_conversion(ctx.compilation, parameters.len(), target);
            }
            BoundKind::MethodGroup(group) => return method_group_conversion(ctx.compilation, group, target),
            _ => {}
        }
        let Some(source_type) = source.ty else {
            return Conversion::NONE;
        };
        if source_type != target
            && let Some(value) = &source.constant
            && constant_fits_implicitly(source_type, value, target)
        {
            return Conversion::new(ConversionKind::ImplicitConstant);
        }
        self.classify_types(ctx, source_type, target)
    }

    fn classify_types(&self, ctx: &ConversionContext<'_>, source: TypeId, target: TypeId) -> Conversion {
        let standard = standard_implicit(ctx.compilation, source, target);
        if standard.exists() {
            return standard;
        }
        match user_defined(ctx.compilation, source, target, false) {
            Some(method) => Conversion::with_method(ConversionKind::ImplicitUserDefined, method),
            None => Conversion::NONE,
        }
    }

    fn classify_explicit(&self, ctx: &ConversionContext<'_>, source: &BoundNode, target: TypeId) -> Conversion {
        let implicit = self.classify_expression(ctx, source, target);
        if implicit.exists() {
            return implicit;
        }
        let Some(source_type) = source.ty else {
            return Conversion::NONE;
        };
        let standard = standard_explicit(ctx.compilation, source_type, target);
        if standard.exists() {
            return standard;
        }
        match user_defined(ctx.compilation, source_type, target, true) {
            Some(method) => Conversion::with_method(ConversionKind::ExplicitUserDefined, method),
            None => Conversion::NONE,
        }
    }

    fn best_common_type(&self, ctx: &ConversionContext<'_>, nodes: &[&BoundNode]) -> Option<TypeId> {
        let compilation = ctx.compilation;
        if nodes
            .iter()
            .any(|n| n.ty.is_some_and(|t| compilation.is_error_type(t)))
        {
            return Some(TypeId::ERROR);
        }
        let mut candidates: SmallVec<[TypeId; 4]> = SmallVec::new();
        for node in nodes {
            if let Some(ty) = node.ty
                && ty != TypeId::NULL
                && !candidates.contains(&ty)
            {
                candidates.push(ty);
            }
        }
        let admissible: SmallVec<[TypeId; 4]> = candidates
            .iter()
            .copied()
            .filter(|c| {
                nodes
                    .iter()
                    .all(|n| self.classify_expression(ctx, n, *c).is_implicit())
            })
            .collect();
        let best = admissible.iter().copied().find(|best| {
            admissible
                .iter()
                .all(|other| other == best || self.classify_types(ctx, *other, *best).is_implicit())
        });
        trace!(candidates = candidates.len(), admissible = admissible.len(), ?best, "best common type");
        best
    }
}

// =============================================================================
// Standard conversions
// =============================================================================

fn implicit_numeric(from: SpecialType, to: SpecialType) -> bool {
    use SpecialType::*;
    match from {
        SByte => matches!(to, Int16 | Int32 | Int64 | Single | Double | Decimal),
        Byte => matches!(
            to,
            Int16 | UInt16 | Int32 | UInt32 | Int64 | UInt64 | Single | Double | Decimal
        ),
        Int16 => matches!(to, Int32 | Int64 | Single | Double | Decimal),
        UInt16 | Char => matches!(to, Int32 | UInt32 | Int64 | UInt64 | Single | Double | Decimal)
            || (from == Char && to == UInt16),
        Int32 => matches!(to, Int64 | Single | Double | Decimal),
        UInt32 => matches!(to, Int64 | UInt64 | Single | Double | Decimal),
        Int64 | UInt64 => matches!(to, Single | Double | Decimal),
        Single => to == Double,
        _ => false,
    }
}

fn numeric_special(ty: TypeId) -> Option<SpecialType> {
    ty.as_special().filter(|s| s.is_numeric())
}

fn constant_fits_implicitly(source: TypeId, value: &ConstantValue, target: TypeId) -> bool {
    let Some(target_special) = target.as_special().filter(|s| s.is_integral() && *s != SpecialType::Char) else {
        return false;
    };
    match source {
        TypeId::INT => value.fits_in(target_special),
        TypeId::LONG => target_special == SpecialType::UInt64 && value.fits_in(target_special),
        _ => false,
    }
}

/// Implicit conversions that involve no user-defined operator.
pub(crate) fn standard_implicit(compilation: &Compilation, source: TypeId, target: TypeId) -> Conversion {
    use ConversionKind::*;
    if source == target || compilation.is_error_type(source) || compilation.is_error_type(target) {
        return Conversion::IDENTITY;
    }
    if source == TypeId::VOID || target == TypeId::VOID {
        return Conversion::NONE;
    }
    if source == TypeId::NULL {
        return if compilation.is_reference_type(target) || compilation.nullable_underlying(target).is_some() {
            Conversion::new(NullLiteral)
        } else {
            Conversion::NONE
        };
    }
    if source == TypeId::DYNAMIC {
        return Conversion::new(ImplicitDynamic);
    }
    if target == TypeId::DYNAMIC {
        return if compilation.is_value_type(source) {
            Conversion::new(Boxing)
        } else {
            Conversion::new(ImplicitReference)
        };
    }
    if let (Some(from), Some(to)) = (numeric_special(source), numeric_special(target))
        && implicit_numeric(from, to)
    {
        return Conversion::new(ImplicitNumeric);
    }
    if let Some(underlying) = compilation.nullable_underlying(target) {
        let from = compilation.nullable_underlying(source).unwrap_or(source);
        if compilation.is_value_type(from) {
            let inner = standard_implicit(compilation, from, underlying);
            if matches!(inner.kind, Identity | ImplicitNumeric) {
                return Conversion::new(ImplicitNullable);
            }
        }
    }
    if let TypeData::TypeParameter(symbol) = compilation.type_data(source) {
        let reference = match &compilation.symbol(symbol).kind {
            SymbolKind::TypeParameter(data) => data.has_reference_type_constraint,
            _ => false,
        };
        if target == TypeId::OBJECT || compilation.implements(source, target) {
            return Conversion::new(if reference { ImplicitReference } else { Boxing });
        }
        return Conversion::NONE;
    }
    if compilation.is_reference_type(source) {
        if target == TypeId::OBJECT
            || compilation.is_derived_from(source, target)
            || (compilation.is_interface(target) && compilation.implements(source, target))
        {
            return Conversion::new(ImplicitReference);
        }
        if let (Some((source_element, source_rank)), Some((target_element, target_rank))) =
            (compilation.array_info(source), compilation.array_info(target))
            && source_rank == target_rank
            && compilation.is_reference_type(source_element)
            && standard_implicit(compilation, source_element, target_element).kind == ImplicitReference
        {
            return Conversion::new(ImplicitReference);
        }
        return Conversion::NONE;
    }
    if compilation.is_value_type(source)
        && (target == TypeId::OBJECT
            || compilation.is_derived_from(source, target)
            || (compilation.is_interface(target) && compilation.implements(source, target)))
    {
        return Conversion::new(Boxing);
    }
    Conversion::NONE
}

/// Explicit conversions that involve no user-defined operator.
pub(crate) fn standard_explicit(compilation: &Compilation, source: TypeId, target: TypeId) -> Conversion {
    use ConversionKind::*;
    if source == TypeId::DYNAMIC {
        return Conversion::new(ExplicitDynamic);
    }
    let numeric_or_enum = |ty: TypeId| numeric_special(ty).is_some() || compilation.is_enum(ty);
    if numeric_or_enum(source) && numeric_or_enum(target) {
        return Conversion::new(ExplicitNumeric);
    }
    if let Some(underlying) = compilation.nullable_underlying(source) {
        if underlying == target || (numeric_or_enum(underlying) && numeric_or_enum(target)) {
            return Conversion::new(ExplicitNullable);
        }
    }
    if let Some(underlying) = compilation.nullable_underlying(target) {
        if numeric_or_enum(source) && numeric_or_enum(underlying) {
            return Conversion::new(ExplicitNullable);
        }
    }
    if compilation.is_value_type(target)
        && (source == TypeId::OBJECT
            || compilation.is_derived_from(target, source)
            || (compilation.is_interface(source) && compilation.implements(target, source)))
    {
        return Conversion::new(Unboxing);
    }
    let is_type_parameter = |ty: TypeId| matches!(compilation.type_data(ty), TypeData::TypeParameter(_));
    if is_type_parameter(source) || is_type_parameter(target) {
        let other = if is_type_parameter(source) { target } else { source };
        if other == TypeId::OBJECT || compilation.is_interface(other) || is_type_parameter(other) {
            return Conversion::new(if compilation.is_value_type(target) { Unboxing } else { ExplicitReference });
        }
        return Conversion::NONE;
    }
    if compilation.is_reference_type(source) && compilation.is_reference_type(target) {
        let sealed = |ty: TypeId| {
            compilation
                .type_symbol(ty)
                .is_some_and(|s| compilation.symbol(s).modifiers.contains(csz_symbols::SymbolModifiers::SEALED))
        };
        if source == TypeId::OBJECT
            || compilation.is_derived_from(target, source)
            || (compilation.is_interface(source) && !sealed(target))
            || (compilation.is_interface(target) && !sealed(source))
        {
            return Conversion::new(ExplicitReference);
        }
        if let (Some((source_element, source_rank)), Some((target_element, target_rank))) =
            (compilation.array_info(source), compilation.array_info(target))
            && source_rank == target_rank
            && standard_explicit(compilation, source_element, target_element).kind == ExplicitReference
        {
            return Conversion::new(ExplicitReference);
        }
    }
    Conversion::NONE
}

/// Find a user-defined operator converting `source` to `target`.
fn user_defined(compilation: &Compilation, source: TypeId, target: TypeId, explicit: bool) -> Option<SymbolId> {
    if compilation.is_error_type(source) || compilation.is_error_type(target) {
        return None;
    }
    let strip = |ty: TypeId| compilation.nullable_underlying(ty).unwrap_or(ty);
    let mut owners: SmallVec<[SymbolId; 8]> = SmallVec::new();
    for ty in compilation
        .base_chain(strip(source))
        .into_iter()
        .chain(compilation.base_chain(strip(target)))
    {
        if let Some(symbol) = compilation.type_symbol(ty)
            && !owners.contains(&symbol)
        {
            owners.push(symbol);
        }
    }
    let names: &[&str] = if explicit {
        &["op_Implicit", "op_Explicit"]
    } else {
        &["op_Implicit"]
    };
    let fits = |from: TypeId, to: TypeId| {
        let conversion = standard_implicit(compilation, from, to);
        conversion.exists() || (explicit && standard_explicit(compilation, from, to).exists())
    };
    for owner in owners {
        for name in names {
            let Some(atom) = compilation.interner().get(name) else {
                continue;
            };
            for member in compilation.members_named(owner, atom) {
                let symbol = compilation.symbol(*member);
                let SymbolKind::Method(data) = &symbol.kind else {
                    continue;
                };
                if !matches!(data.method_kind, MethodKind::Conversion { .. }) {
                    continue;
                }
                let Some(parameter) = data.parameters.first() else {
                    continue;
                };
                if fits(source, parameter.ty) && fits(data.return_type, target) {
                    return Some(*member);
                }
            }
        }
    }
    None
}

fn lambda_conversion(compilation: &Compilation, parameter_count: usize, target: TypeId) -> Conversion {
    let Some(invoke) = compilation.delegate_invoke(target) else {
        return Conversion::NONE;
    };
    if compilation.member_parameters(invoke, Some(target)).len() == parameter_count {
        Conversion::new(ConversionKind::AnonymousFunction)
    } else {
        Conversion::NONE
    }
}

fn method_group_conversion(compilation: &Compilation, group: &MethodGroup, target: TypeId) -> Conversion {
    let Some(invoke) = compilation.delegate_invoke(target) else {
        return Conversion::NONE;
    };
    let delegate_params = compilation.member_parameters(invoke, Some(target));
    let delegate_return = compilation.member_type(invoke, Some(target));
    let receiver_type = group.receiver.as_ref().and_then(|r| r.ty);
    for method in &group.methods {
        let symbol = compilation.symbol(*method);
        if symbol.arity() != group.type_args.len() {
            continue;
        }
        let params = compilation.member_parameters(*method, receiver_type);
        let return_type = compilation.member_type(*method, receiver_type);
        let (params, return_type) = match &symbol.kind {
            SymbolKind::Method(data) if !data.type_parameters.is_empty() => (
                params
                    .into_iter()
                    .map(|mut p| {
                        p.ty = compilation.substitute(p.ty, &data.type_parameters, &group.type_args);
                        p
                    })
                    .collect::<Vec<_>>(),
                compilation.substitute(return_type, &data.type_parameters, &group.type_args),
            ),
            _ => (params, return_type),
        };
        if params.len() != delegate_params.len() {
            continue;
        }
        let params_match = params.iter().zip(&delegate_params).all(|(m, d)| {
            m.ref_kind == d.ref_kind
                && (m.ty == d.ty
                    || (m.ref_kind == csz_symbols::RefKind::None
                        && compilation.is_reference_type(d.ty)
                        && standard_implicit(compilation, d.ty, m.ty).kind == ConversionKind::ImplicitReference))
        });
        let return_matches = return_type == delegate_return
            || (compilation.is_reference_type(return_type)
                && standard_implicit(compilation, return_type, delegate_return).kind
                    == ConversionKind::ImplicitReference);
        if params_match && return_matches {
            return Conversion::with_method(ConversionKind::MethodGroup, *method);
        }
    }
    Conversion::NONE
}

#[cfg(test)]
#[path = "../tests/conversions_tests.rs"]
mod tests;
