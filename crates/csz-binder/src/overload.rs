//! Overload resolution.
//!
//! The binder hands a candidate set and an [`AnalyzedArguments`] to an
//! [`OverloadResolver`] and materializes whatever verdict comes back.
//! [`StandardOverloadResolver`] checks applicability in normal and expanded
//! (`params`) form and picks the best applicable candidate by conversion
//! quality, then normal form over expanded form, then fewer parameters.

use crate::arguments::AnalyzedArguments;
use crate::bound::BoundKind;
use crate::conversions::{Conversion, ConversionClassifier, ConversionContext, ConversionKind};
use csz_symbols::{Compilation, Parameter, RefKind, SymbolId, SymbolKind, TypeId};
use std::cmp::Ordering;
use tracing::trace;

/// What the resolver may look at besides the candidates and arguments.
#[derive(Clone, Copy)]
pub struct OverloadContext<'a> {
    pub compilation: &'a Compilation,
    pub conversions: &'a dyn ConversionClassifier,
    /// Type through which the members are accessed; substitutes class type arguments.
    pub receiver_type: Option<TypeId>,
    /// Explicit method type arguments (`M<int>(...)`).
    pub type_args: &'a [TypeId],
    /// Type whose code makes the call, for accessibility.
    pub accessible_from: Option<SymbolId>,
    pub ignore_accessibility: bool,
    pub checked: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MemberResolutionKind {
    Applicable,
    WrongArgumentCount,
    BadArgumentConversion { argument: usize, parameter: usize },
    BadArgumentRefKind { argument: usize, parameter: usize },
    NoCorrespondingNamedParameter { argument: usize },
    TypeArgumentCountMismatch,
    Inaccessible,
}

/// The verdict for one candidate.
#[derive(Clone, Debug, PartialEq)]
pub struct MemberResolution {
    pub member: SymbolId,
    pub kind: MemberResolutionKind,
    /// Applicable only in expanded `params` form.
    pub expanded: bool,
    /// Parameter index each argument maps to.
    pub arg_to_param: Vec<usize>,
    /// Conversion each argument needs to reach its parameter type.
    pub conversions: Vec<Conversion>,
    /// Parameters as seen through the receiver and type arguments.
    pub parameters: Vec<Parameter>,
    pub return_type: TypeId,
}

impl MemberResolution {
    pub fn is_applicable(&self) -> bool {
        self.kind == MemberResolutionKind::Applicable
    }

    /// Type the argument at `index` is converted to.
    pub fn parameter_type(&self, compilation: &Compilation, index: usize) -> Option<TypeId> {
        expanded_type(compilation, self, index)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum OverloadResolutionResult {
    Succeeded(MemberResolution),
    /// Two or more applicable candidates, none better than the others.
    Ambiguous(Vec<MemberResolution>),
    /// Nothing applicable; one entry per candidate explaining why.
    NoneApplicable(Vec<MemberResolution>),
}

impl OverloadResolutionResult {
    pub fn is_success(&self) -> bool {
        matches!(self, OverloadResolutionResult::Succeeded(_))
    }

    pub fn results(&self) -> &[MemberResolution] {
        match self {
            OverloadResolutionResult::Succeeded(best) => std::slice::from_ref(best),
            OverloadResolutionResult::Ambiguous(all) | OverloadResolutionResult::NoneApplicable(all) => all,
        }
    }

    pub fn members(&self) -> Vec<SymbolId> {
        self.results().iter().map(|r| r.member).collect()
    }
}

pub trait OverloadResolver: Send + Sync {
    fn resolve(
        &self,
        ctx: &OverloadContext<'_>,
        members: &[SymbolId],
        arguments: &AnalyzedArguments,
    ) -> OverloadResolutionResult;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct StandardOverloadResolver;

impl OverloadResolver for StandardOverloadResolver {
    fn resolve(
        &self,
        ctx: &OverloadContext<'_>,
        members: &[SymbolId],
        arguments: &AnalyzedArguments,
    ) -> OverloadResolutionResult {
        let results: Vec<MemberResolution> = members.iter().map(|m| analyze_member(ctx, *m, arguments)).collect();
        let applicable: Vec<&MemberResolution> = results.iter().filter(|r| r.is_applicable()).collect();
        trace!(
            candidates = members.len(),
            applicable = applicable.len(),
            "overload resolution"
        );
        match applicable.len() {
            0 => OverloadResolutionResult::NoneApplicable(results),
            1 => OverloadResolutionResult::Succeeded(applicable[0].clone()),
            _ => {
                let undominated: Vec<&MemberResolution> = applicable
                    .iter()
                    .copied()
                    .filter(|candidate| {
                        !applicable
                            .iter()
                            .any(|other| compare(ctx, other, candidate) == Some(Ordering::Greater))
                    })
                    .collect();
                let best = undominated.iter().copied().find(|candidate| {
                    applicable.iter().all(|other| {
                        std::ptr::eq(*other, *candidate) || compare(ctx, candidate, other) == Some(Ordering::Greater)
                    })
                });
                match best {
                    Some(best) => OverloadResolutionResult::Succeeded(best.clone()),
                    None => OverloadResolutionResult::Ambiguous(undominated.into_iter().cloned().collect()),
                }
            }
        }
    }
}

/// Parameters and return type of `member` as seen through the receiver and
/// explicit type arguments; `None` when the type argument count is wrong.
fn signature(ctx: &OverloadContext<'_>, member: SymbolId) -> Option<(Vec<Parameter>, TypeId)> {
    let compilation = ctx.compilation;
    let mut parameters = compilation.member_parameters(member, ctx.receiver_type);
    let mut return_type = compilation.member_type(member, ctx.receiver_type);
    let type_parameters: &[SymbolId] = match &compilation.symbol(member).kind {
        SymbolKind::Method(data) => &data.type_parameters,
        _ => &[],
    };
    if type_parameters.len() != ctx.type_args.len() {
        return None;
    }
    if !type_parameters.is_empty() {
        for parameter in &mut parameters {
            parameter.ty = compilation.substitute(parameter.ty, type_parameters, ctx.type_args);
        }
        return_type = compilation.substitute(return_type, type_parameters, ctx.type_args);
    }
    Some((parameters, return_type))
}

fn analyze_member(ctx: &OverloadContext<'_>, member: SymbolId, arguments: &AnalyzedArguments) -> MemberResolution {
    let compilation = ctx.compilation;
    let failed = |kind, parameters: Vec<Parameter>, return_type| MemberResolution {
        member,
        kind,
        expanded: false,
        arg_to_param: Vec::new(),
        conversions: Vec::new(),
        parameters,
        return_type,
    };
    let Some((parameters, return_type)) = signature(ctx, member) else {
        let parameters = compilation.member_parameters(member, ctx.receiver_type);
        let return_type = compilation.member_type(member, ctx.receiver_type);
        return failed(MemberResolutionKind::TypeArgumentCountMismatch, parameters, return_type);
    };
    if !ctx.ignore_accessibility && !compilation.is_accessible(member, ctx.accessible_from) {
        return failed(MemberResolutionKind::Inaccessible, parameters, return_type);
    }
    let is_vararg = matches!(&compilation.symbol(member).kind, SymbolKind::Method(data) if data.is_vararg);

    let normal = analyze_form(ctx, &parameters, arguments, false, is_vararg);
    let result = match normal {
        Ok(form) => Ok((form, false)),
        Err(normal_failure) => {
            let has_params = parameters.last().is_some_and(|p| p.is_params && compilation.array_info(p.ty).is_some());
            if has_params {
                match analyze_form(ctx, &parameters, arguments, true, is_vararg) {
                    Ok(form) => Ok((form, true)),
                    Err(expanded_failure) if normal_failure == MemberResolutionKind::WrongArgumentCount => {
                        Err(expanded_failure)
                    }
                    Err(_) => Err(normal_failure),
                }
            } else {
                Err(normal_failure)
            }
        }
    };
    match result {
        Ok(((arg_to_param, conversions), expanded)) => MemberResolution {
            member,
            kind: MemberResolutionKind::Applicable,
            expanded,
            arg_to_param,
            conversions,
            parameters,
            return_type,
        },
        Err(kind) => failed(kind, parameters, return_type),
    }
}

/// Map arguments to parameters and classify each conversion.
fn analyze_form(
    ctx: &OverloadContext<'_>,
    parameters: &[Parameter],
    arguments: &AnalyzedArguments,
    expanded: bool,
    is_vararg: bool,
) -> Result<(Vec<usize>, Vec<Conversion>), MemberResolutionKind> {
    let compilation = ctx.compilation;
    let params_index = if expanded { parameters.len().checked_sub(1) } else { None };
    let mut arg_to_param = Vec::with_capacity(arguments.len());
    let mut filled = vec![false; parameters.len()];
    for index in 0..arguments.len() {
        let parameter = match arguments.name(index) {
            Some((name, _)) => match parameters.iter().position(|p| p.name == name) {
                Some(position) if Some(position) != params_index => position,
                _ => return Err(MemberResolutionKind::NoCorrespondingNamedParameter { argument: index }),
            },
            None if index < parameters.len() && Some(index) != params_index => index,
            None => match params_index {
                Some(last) if index >= last => last,
                _ if is_vararg
                    && index == parameters.len()
                    && matches!(arguments.arguments[index].kind, BoundKind::ArgList { .. }) =>
                {
                    arg_to_param.push(parameters.len());
                    continue;
                }
                _ => return Err(MemberResolutionKind::WrongArgumentCount),
            },
        };
        if Some(parameter) != params_index && filled[parameter] {
            return Err(MemberResolutionKind::NoCorrespondingNamedParameter { argument: index });
        }
        filled[parameter] = true;
        arg_to_param.push(parameter);
    }
    let unfilled_required = parameters.iter().enumerate().any(|(i, p)| {
        !filled[i] && !p.has_default && !(Some(i) == params_index || (p.is_params && expanded))
    });
    if unfilled_required {
        return Err(MemberResolutionKind::WrongArgumentCount);
    }

    let conversion_ctx = ConversionContext {
        compilation,
        checked: ctx.checked,
    };
    let mut conversions = Vec::with_capacity(arguments.len());
    for (index, &parameter_index) in arg_to_param.iter().enumerate() {
        let Some(parameter) = parameters.get(parameter_index) else {
            conversions.push(Conversion::IDENTITY);
            continue;
        };
        let argument = &arguments.arguments[index];
        let argument_ref = arguments.ref_kind(index);
        let ref_matches = argument_ref == parameter.ref_kind
            || (parameter.ref_kind == RefKind::In && argument_ref == RefKind::None);
        if !ref_matches {
            return Err(MemberResolutionKind::BadArgumentRefKind {
                argument: index,
                parameter: parameter_index,
            });
        }
        let target = if Some(parameter_index) == params_index {
            compilation.array_info(parameter.ty).map_or(parameter.ty, |(element, _)| element)
        } else {
            parameter.ty
        };
        let conversion = if matches!(argument_ref, RefKind::Ref | RefKind::Out) {
            if argument.ty == Some(target) || argument.ty.is_some_and(|t| compilation.is_error_type(t)) {
                Conversion::IDENTITY
            } else {
                Conversion::NONE
            }
        } else {
            ctx.conversions.classify_expression(&conversion_ctx, argument, target)
        };
        if !conversion.is_implicit() {
            return Err(MemberResolutionKind::BadArgumentConversion {
                argument: index,
                parameter: parameter_index,
            });
        }
        conversions.push(conversion);
    }
    Ok((arg_to_param, conversions))
}

/// Whether `a` is a better function member than `b` for these arguments.
fn compare(ctx: &OverloadContext<'_>, a: &MemberResolution, b: &MemberResolution) -> Option<Ordering> {
    let compilation = ctx.compilation;
    let conversion_ctx = ConversionContext {
        compilation,
        checked: ctx.checked,
    };
    let mut a_better = false;
    let mut b_better = false;
    for index in 0..a.conversions.len().min(b.conversions.len()) {
        let (Some(pa), Some(pb)) = (expanded_type(compilation, a, index), expanded_type(compilation, b, index)) else {
            continue;
        };
        if pa == pb {
            continue;
        }
        let (ca, cb) = (a.conversions[index].kind, b.conversions[index].kind);
        match ca.rank().cmp(&cb.rank()) {
            Ordering::Less => a_better = true,
            Ordering::Greater => b_better = true,
            Ordering::Equal => {
                let a_to_b = ctx.conversions.classify_types(&conversion_ctx, pa, pb).is_implicit();
                let b_to_a = ctx.conversions.classify_types(&conversion_ctx, pb, pa).is_implicit();
                if a_to_b && !b_to_a {
                    a_better = true;
                } else if b_to_a && !a_to_b {
                    b_better = true;
                } else if ca == ConversionKind::Identity {
                    a_better = true;
                } else if cb == ConversionKind::Identity {
                    b_better = true;
                }
            }
        }
    }
    match (a_better, b_better) {
        (true, false) => Some(Ordering::Greater),
        (false, true) => Some(Ordering::Less),
        (true, true) => None,
        (false, false) => {
            if a.expanded != b.expanded {
                return Some(if a.expanded { Ordering::Less } else { Ordering::Greater });
            }
            match a.parameters.len().cmp(&b.parameters.len()) {
                Ordering::Less => Some(Ordering::Greater),
                Ordering::Greater => Some(Ordering::Less),
                Ordering::Equal => None,
            }
        }
    }
}

fn expanded_type(compilation: &Compilation, resolution: &MemberResolution, index: usize) -> Option<TypeId> {
    let parameter = resolution.parameters.get(*resolution.arg_to_param.get(index)?)?;
    if resolution.expanded && parameter.is_params {
        return compilation.array_info(parameter.ty).map(|(element, _)| element);
    }
    Some(parameter.ty)
}

#[cfg(test)]
#[path = "../tests/overload_tests.rs"]
mod tests;
