//! Invocations, element access and overload-resolution failures.
//!
//! Every call-shaped construct goes the same way: bind the argument list
//! into a pooled [`AnalyzedArguments`], hand the candidates to the
//! [`OverloadResolver`](crate::overload::OverloadResolver), then either
//! coerce the arguments to the winner's parameters or turn the verdict into
//! one diagnostic and a bad expression that keeps every candidate.

use crate::arguments::AnalyzedArguments;
use crate::binder::Binder;
use crate::bound::{BoundCall, BoundIndexerAccess, BoundKind, BoundNode, DynamicOperation, MethodGroup};
use crate::lookup::{LookupOptions, LookupResultKind};
use crate::overload::{MemberResolution, MemberResolutionKind, OverloadContext, OverloadResolutionResult};
use csz_common::diagnostics::diagnostic_codes;
use csz_common::{Atom, DiagnosticBag, Span};
use csz_symbols::{RefKind, SymbolId, SymbolKind, TypeData, TypeId};
use csz_syntax::{NodeIndex, SyntaxData};
use tracing::{debug, trace};

/// What kind of member overload resolution ran over, for diagnostics.
#[derive(Clone, Copy, Debug)]
pub(crate) enum InvocationKind {
    Method(Atom),
    Constructor(TypeId),
    Delegate(TypeId),
    Indexer,
}

impl<'c> Binder<'c> {
    // =========================================================================
    // Invocation
    // =========================================================================

    pub(crate) fn bind_invocation(
        &mut self,
        target: NodeIndex,
        arguments: &[NodeIndex],
        span: Span,
        diag: &mut DiagnosticBag,
    ) -> BoundNode {
        let syntax = self.syntax;
        if let Some(SyntaxData::MemberAccess {
            receiver,
            name,
            conditional: true,
        }) = syntax.data(target)
        {
            let target_span = self.span(target);
            return self.bind_conditional_access(*receiver, span, diag, |binder, receiver, diag| {
                let target = binder.bind_member_of_receiver(receiver, name, target_span, true, diag);
                binder.bind_invocation_of(target, arguments, span, diag)
            });
        }
        let target = self.bind(target, diag, true, false);
        self.bind_invocation_of(target, arguments, span, diag)
    }

    /// Invoke an already-bound target.
    fn bind_invocation_of(
        &mut self,
        target: BoundNode,
        arguments: &[NodeIndex],
        span: Span,
        diag: &mut DiagnosticBag,
    ) -> BoundNode {
        let mut args = self.acquire_arguments();
        self.bind_argument_list(arguments, &mut args, diag);

        let target = match target.kind {
            BoundKind::MethodGroup(group) => {
                return self.bind_method_group_invocation(*group, target.span, &mut args, span, diag);
            }
            BoundKind::TypeOrValue(_) => self.check_value(target, diag),
            kind => BoundNode { kind, ..target },
        };
        let compilation = self.compilation;
        let ty = target.type_or_error();

        match &target.kind {
            BoundKind::TypeExpression | BoundKind::NamespaceExpression { .. } => {
                if !target.has_errors {
                    let (name, kind) = match &target.kind {
                        BoundKind::NamespaceExpression { namespace } => {
                            (compilation.qualified_name(*namespace), "namespace")
                        }
                        _ => (
                            self.display_type(ty),
                            compilation.type_kind(ty).map_or("type", |kind| kind.description()),
                        ),
                    };
                    diag.add(diagnostic_codes::BAD_SYMBOL_KIND, target.span, &[&name, kind, "variable"]);
                }
                return self.bad_call(LookupResultKind::NotAValue, Vec::new(), Some(target), &mut args, TypeId::ERROR, span);
            }
            _ => {}
        }

        if compilation.is_dynamic(ty) {
            return self.bind_dynamic_invocation(target, &mut args, span, diag);
        }
        if target.has_errors && compilation.is_error_type(ty) {
            return self.bad_call(LookupResultKind::Empty, Vec::new(), Some(target), &mut args, TypeId::ERROR, span);
        }
        if let Some(invoke) = compilation.delegate_invoke(ty) {
            return self.bind_delegate_invocation(target, invoke, &mut args, span, diag);
        }

        if !target.has_errors {
            match &target.kind {
                BoundKind::FieldAccess { field: member, .. } | BoundKind::PropertyAccess { property: member, .. } => {
                    diag.add(diagnostic_codes::NON_INVOCABLE_MEMBER, target.span, &[&self.display_symbol(*member)]);
                }
                _ => diag.add(diagnostic_codes::METHOD_NAME_EXPECTED, target.span, &[]),
            }
        }
        self.bad_call(LookupResultKind::NotInvocable, Vec::new(), Some(target), &mut args, TypeId::ERROR, span)
    }

    /// `d(args)` for a delegate-typed value.
    fn bind_delegate_invocation(
        &mut self,
        target: BoundNode,
        invoke: SymbolId,
        args: &mut AnalyzedArguments,
        span: Span,
        diag: &mut DiagnosticBag,
    ) -> BoundNode {
        let ty = target.type_or_error();
        let result = self.resolve_overloads(&[invoke], Some(ty), &[], args, false);
        match result {
            OverloadResolutionResult::Succeeded(best) => {
                let arguments = self.coerce_arguments(&best, Some(ty), args, diag);
                BoundNode::new(
                    BoundKind::Call(Box::new(BoundCall {
                        receiver: Some(Box::new(target)),
                        method: best.member,
                        arguments,
                        arg_to_param: best.arg_to_param,
                        expanded: best.expanded,
                        invoked_as_extension: false,
                    })),
                    best.return_type,
                    span,
                )
            }
            failed => {
                let (kind, ty) = self.report_overload_failure(
                    InvocationKind::Delegate(ty),
                    &[invoke],
                    Some(ty),
                    &[],
                    &failed,
                    args,
                    span,
                    diag,
                );
                self.bad_call(kind, failed.members(), Some(target), args, ty, span)
            }
        }
    }

    /// Late-bound invocation: a `dynamic` target, or a `dynamic` argument.
    fn bind_dynamic_invocation(
        &mut self,
        target: BoundNode,
        args: &mut AnalyzedArguments,
        span: Span,
        diag: &mut DiagnosticBag,
    ) -> BoundNode {
        let arguments = self.check_dynamic_arguments(args.take_arguments(), diag);
        trace!(arguments = arguments.len(), "dynamic invocation");
        BoundNode::new(
            BoundKind::Dynamic {
                operation: DynamicOperation::Invocation,
                receiver: Some(Box::new(target)),
                arguments,
                initializer: None,
            },
            TypeId::DYNAMIC,
            span,
        )
    }

    /// Lambdas have no type to send to a late-bound operation.
    pub(crate) fn check_dynamic_arguments(&self, arguments: Vec<BoundNode>, diag: &mut DiagnosticBag) -> Vec<BoundNode> {
        arguments
            .into_iter()
            .map(|argument| {
                if matches!(argument.kind, BoundKind::UnboundLambda { .. }) {
                    diag.add(diagnostic_codes::BAD_DYNAMIC_LAMBDA_ARG, argument.span, &[]);
                    argument.with_errors()
                } else {
                    argument
                }
            })
            .collect()
    }

    // =========================================================================
    // Method groups
    // =========================================================================

    pub(crate) fn bind_method_group_invocation(
        &mut self,
        group: MethodGroup,
        group_span: Span,
        args: &mut AnalyzedArguments,
        span: Span,
        diag: &mut DiagnosticBag,
    ) -> BoundNode {
        let MethodGroup {
            receiver,
            name,
            methods,
            type_args,
            search_extensions,
            ..
        } = group;
        let receiver = receiver.map(|r| *r);

        if args.has_dynamic_argument && !methods.is_empty() {
            let group_node = BoundNode::new(
                BoundKind::MethodGroup(Box::new(MethodGroup {
                    receiver: receiver.map(Box::new),
                    name,
                    methods,
                    type_args,
                    result_kind: LookupResultKind::Viable,
                    search_extensions,
                })),
                TypeId::METHOD_GROUP,
                group_span,
            );
            return self.bind_dynamic_invocation(group_node, args, span, diag);
        }

        let receiver_type = receiver.as_ref().and_then(|r| r.ty);
        let instance_result = if methods.is_empty() {
            None
        } else {
            Some(self.resolve_overloads(&methods, receiver_type, &type_args, args, false))
        };
        let instance_result = match instance_result {
            Some(OverloadResolutionResult::Succeeded(best)) => {
                return self.finish_method_call(receiver, best, receiver_type, args, group_span, span, diag);
            }
            other => other,
        };

        let extension_receiver = receiver.as_ref().filter(|r| {
            search_extensions && !matches!(r.kind, BoundKind::TypeExpression | BoundKind::NamespaceExpression { .. })
        });
        if let Some(extension_receiver) = extension_receiver {
            let levels = self.lookup_extension_method_levels(name, type_args.len(), group_span);
            if !levels.is_empty() {
                let settled = self.settle_receiver_for(extension_receiver.clone(), false, diag);
                let mut extension_args = args.clone();
                extension_args.insert_receiver(settled);
                let mut nearest_failure = None;
                for extensions in levels {
                    let result = self.resolve_overloads(&extensions, None, &type_args, &extension_args, false);
                    debug!(name = %self.text(name), candidates = extensions.len(), success = result.is_success(), "extension method fallback");
                    match result {
                        OverloadResolutionResult::Succeeded(best) => {
                            let arguments = self.coerce_arguments(&best, None, &mut extension_args, diag);
                            return BoundNode::new(
                                BoundKind::Call(Box::new(BoundCall {
                                    receiver: None,
                                    method: best.member,
                                    arguments,
                                    arg_to_param: best.arg_to_param,
                                    expanded: best.expanded,
                                    invoked_as_extension: true,
                                })),
                                best.return_type,
                                span,
                            );
                        }
                        failed => {
                            nearest_failure.get_or_insert((extensions, failed));
                        }
                    }
                }
                if let Some((extensions, failed)) = nearest_failure
                    && instance_result.is_none()
                {
                    let (kind, ty) = self.report_overload_failure(
                        InvocationKind::Method(name),
                        &extensions,
                        None,
                        &type_args,
                        &failed,
                        &extension_args,
                        span,
                        diag,
                    );
                    return self.bad_call(kind, failed.members(), None, &mut extension_args, ty, span);
                }
            }
        }

        let Some(failed) = instance_result else {
            if !args.has_errors {
                diag.add(diagnostic_codes::METHOD_NAME_EXPECTED, group_span, &[]);
            }
            return self.bad_call(LookupResultKind::Empty, Vec::new(), receiver, args, TypeId::ERROR, span);
        };
        let (kind, ty) = self.report_overload_failure(
            InvocationKind::Method(name),
            &methods,
            receiver_type,
            &type_args,
            &failed,
            args,
            span,
            diag,
        );
        let receiver = receiver.map(|r| self.settle_receiver_for(r, false, diag));
        self.bad_call(kind, methods, receiver, args, ty, span)
    }

    /// Check the receiver against the winner's static-ness and build the call.
    #[allow(clippy::too_many_arguments)]
    fn finish_method_call(
        &mut self,
        receiver: Option<BoundNode>,
        best: MemberResolution,
        receiver_type: Option<TypeId>,
        args: &mut AnalyzedArguments,
        group_span: Span,
        span: Span,
        diag: &mut DiagnosticBag,
    ) -> BoundNode {
        let is_static = self.compilation.symbol(best.member).is_static();
        let receiver = match receiver {
            None if is_static => None,
            None if self.in_static_context() => {
                diag.add(diagnostic_codes::OBJECT_REQUIRED, group_span, &[&self.display_symbol(best.member)]);
                return self.static_mismatch_call(best, None, args, span, diag);
            }
            None => self
                .this_type()
                .map(|ty| BoundNode::new(BoundKind::ThisReference, ty, group_span)),
            Some(receiver) => match receiver.kind {
                BoundKind::TypeOrValue(_) => {
                    let settled = self.settle_receiver_for(receiver, is_static, diag);
                    (!is_static).then_some(settled)
                }
                BoundKind::TypeExpression if is_static => None,
                BoundKind::TypeExpression => {
                    diag.add(diagnostic_codes::OBJECT_REQUIRED, group_span, &[&self.display_symbol(best.member)]);
                    return self.static_mismatch_call(best, Some(receiver), args, span, diag);
                }
                _ if is_static => {
                    diag.add(diagnostic_codes::OBJECT_PROHIBITED, group_span, &[&self.display_symbol(best.member)]);
                    return self.static_mismatch_call(best, Some(receiver), args, span, diag);
                }
                kind => Some(BoundNode { kind, ..receiver }),
            },
        };
        let arguments = self.coerce_arguments(&best, receiver_type, args, diag);
        trace!(method = %self.display_symbol(best.member), expanded = best.expanded, "call");
        BoundNode::new(
            BoundKind::Call(Box::new(BoundCall {
                receiver: receiver.map(Box::new),
                method: best.member,
                arguments,
                arg_to_param: best.arg_to_param,
                expanded: best.expanded,
                invoked_as_extension: false,
            })),
            best.return_type,
            span,
        )
    }

    fn static_mismatch_call(
        &mut self,
        best: MemberResolution,
        receiver: Option<BoundNode>,
        args: &mut AnalyzedArguments,
        span: Span,
        diag: &mut DiagnosticBag,
    ) -> BoundNode {
        let receiver = receiver.map(|r| self.settle_receiver_for(r, false, diag));
        self.bad_call(
            LookupResultKind::StaticInstanceMismatch,
            vec![best.member],
            receiver,
            args,
            best.return_type,
            span,
        )
    }

    // =========================================================================
    // Overload resolution plumbing
    // =========================================================================

    pub(crate) fn resolve_overloads(
        &self,
        members: &[SymbolId],
        receiver_type: Option<TypeId>,
        type_args: &[TypeId],
        args: &AnalyzedArguments,
        ignore_accessibility: bool,
    ) -> OverloadResolutionResult {
        let ctx = OverloadContext {
            compilation: self.compilation,
            conversions: self.collaborators.conversions,
            receiver_type,
            type_args,
            accessible_from: self.containing_type(),
            ignore_accessibility,
            checked: self.in_checked_context(),
        };
        self.collaborators.overloads.resolve(&ctx, members, args)
    }

    /// Convert each argument to the parameter it maps to.
    ///
    /// Parameter types come from the least-overridden declaration of the
    /// winner; expanded `params` arguments convert to the element type.
    pub(crate) fn coerce_arguments(
        &mut self,
        best: &MemberResolution,
        receiver_type: Option<TypeId>,
        args: &mut AnalyzedArguments,
        diag: &mut DiagnosticBag,
    ) -> Vec<BoundNode> {
        let compilation = self.compilation;
        let original = compilation.least_overridden(best.member);
        let original_parameters = if original == best.member {
            None
        } else {
            Some(compilation.member_parameters(original, receiver_type))
        };
        let ctx = self.conversion_context();
        let arguments = args.take_arguments();
        let mut coerced = Vec::with_capacity(arguments.len());
        for (index, argument) in arguments.into_iter().enumerate() {
            let Some(resolved_target) = best.parameter_type(compilation, index) else {
                coerced.push(argument);
                continue;
            };
            let target = original_parameters
                .as_ref()
                .and_then(|params| params.get(best.arg_to_param[index]))
                .map(|p| {
                    if best.expanded && p.is_params {
                        compilation.array_info(p.ty).map_or(p.ty, |(element, _)| element)
                    } else {
                        p.ty
                    }
                })
                .filter(|ty| !matches!(compilation.type_data(*ty), TypeData::TypeParameter(_)))
                .unwrap_or(resolved_target);
            if matches!(args.ref_kind(index), RefKind::Ref | RefKind::Out) || argument.ty == Some(target) {
                coerced.push(argument);
                continue;
            }
            let conversion = match best.conversions.get(index) {
                Some(conversion) if target == resolved_target => *conversion,
                _ => self.collaborators.conversions.classify_expression(&ctx, &argument, target),
            };
            if !conversion.is_implicit() {
                coerced.push(self.generate_conversion_error(argument, target, diag));
                continue;
            }
            coerced.push(self.create_conversion(argument, conversion, target, false, diag));
        }
        coerced
    }

    /// Report a failed resolution once. Returns the lookup kind and the type
    /// for the bad expression: the return type when there was a single
    /// candidate, the error type otherwise.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn report_overload_failure(
        &self,
        invocation: InvocationKind,
        members: &[SymbolId],
        receiver_type: Option<TypeId>,
        type_args: &[TypeId],
        result: &OverloadResolutionResult,
        args: &AnalyzedArguments,
        span: Span,
        diag: &mut DiagnosticBag,
    ) -> (LookupResultKind, TypeId) {
        let results = result.results();
        let ty = match results {
            [only] => only.return_type,
            _ => TypeId::ERROR,
        };
        let kind = match result {
            OverloadResolutionResult::Ambiguous(_) => LookupResultKind::Ambiguous,
            _ => LookupResultKind::OverloadResolutionFailure,
        };
        if args.has_errors {
            debug!(candidates = members.len(), "overload failure not reported: argument errors");
            return (kind, ty);
        }
        match result {
            OverloadResolutionResult::Succeeded(_) => {}
            OverloadResolutionResult::Ambiguous(candidates) => {
                diag.add(
                    diagnostic_codes::AMBIGUOUS_CALL,
                    span,
                    &[
                        &self.display_symbol(candidates[0].member),
                        &self.display_symbol(candidates[1].member),
                    ],
                );
            }
            OverloadResolutionResult::NoneApplicable(candidates) => {
                if candidates.iter().any(|c| c.kind == MemberResolutionKind::Inaccessible) {
                    let retry = self.resolve_overloads(members, receiver_type, type_args, args, true);
                    if let OverloadResolutionResult::Succeeded(best) = retry {
                        diag.add(diagnostic_codes::INACCESSIBLE, span, &[&self.display_symbol(best.member)]);
                        return (LookupResultKind::Inaccessible, best.return_type);
                    }
                }
                self.report_inapplicable(invocation, candidates, args, span, diag);
            }
        }
        (kind, ty)
    }

    fn report_inapplicable(
        &self,
        invocation: InvocationKind,
        candidates: &[MemberResolution],
        args: &AnalyzedArguments,
        span: Span,
        diag: &mut DiagnosticBag,
    ) {
        let compilation = self.compilation;
        let relevant: Vec<&MemberResolution> = candidates
            .iter()
            .filter(|c| c.kind != MemberResolutionKind::Inaccessible)
            .collect();
        let Some(first) = relevant.first() else {
            if let Some(candidate) = candidates.first() {
                diag.add(diagnostic_codes::INACCESSIBLE, span, &[&self.display_symbol(candidate.member)]);
            }
            return;
        };
        if relevant
            .iter()
            .all(|c| c.kind == MemberResolutionKind::TypeArgumentCountMismatch)
        {
            let member = compilation.symbol(first.member);
            diag.add(
                diagnostic_codes::BAD_ARITY,
                span,
                &[
                    &self.display_symbol(first.member),
                    member.kind.description(),
                    &member.arity().to_string(),
                ],
            );
            return;
        }

        let argument_failure = relevant.iter().find(|c| {
            matches!(
                c.kind,
                MemberResolutionKind::BadArgumentRefKind { .. } | MemberResolutionKind::BadArgumentConversion { .. }
            )
        });
        if let Some(candidate) = argument_failure {
            match candidate.kind {
                MemberResolutionKind::BadArgumentRefKind { argument, parameter } => {
                    let number = (argument + 1).to_string();
                    let argument_ref = args.ref_kind(argument);
                    let parameter_ref = candidate.parameters.get(parameter).map_or(RefKind::None, |p| p.ref_kind);
                    let span = args.arguments.get(argument).map_or(span, |a| a.span);
                    if parameter_ref == RefKind::None {
                        diag.add(diagnostic_codes::BAD_ARG_EXTRA_REF, span, &[&number, argument_ref.keyword()]);
                    } else {
                        diag.add(diagnostic_codes::BAD_ARG_REF, span, &[&number, parameter_ref.keyword()]);
                    }
                }
                MemberResolutionKind::BadArgumentConversion { argument, parameter } => {
                    let Some(node) = args.arguments.get(argument) else {
                        return;
                    };
                    let target = candidate.parameters.get(parameter).map_or(TypeId::ERROR, |p| {
                        let is_array_argument = node.ty.is_some_and(|t| compilation.array_info(t).is_some());
                        match compilation.array_info(p.ty) {
                            Some((element, _)) if p.is_params && !is_array_argument => element,
                            _ => p.ty,
                        }
                    });
                    let from = match &node.kind {
                        BoundKind::UnboundLambda { .. } => "lambda expression".to_string(),
                        BoundKind::MethodGroup(_) => "method group".to_string(),
                        _ => self.display_type(node.type_or_error()),
                    };
                    diag.add(
                        diagnostic_codes::BAD_ARG_TYPE,
                        node.span,
                        &[&(argument + 1).to_string(), &from, &self.display_type(target)],
                    );
                }
                _ => {}
            }
            return;
        }

        if let Some(candidate) = relevant
            .iter()
            .find(|c| matches!(c.kind, MemberResolutionKind::NoCorrespondingNamedParameter { .. }))
            && let MemberResolutionKind::NoCorrespondingNamedParameter { argument } = candidate.kind
            && let Some((name, name_span)) = args.name(argument)
        {
            diag.add(
                diagnostic_codes::BAD_NAMED_ARGUMENT,
                name_span,
                &[&self.display_symbol(candidate.member), &self.text(name)],
            );
            return;
        }

        let count = args.len() - usize::from(args.is_extension_invocation);
        let count = count.to_string();
        match invocation {
            InvocationKind::Method(name) => {
                diag.add(diagnostic_codes::BAD_ARG_COUNT, span, &[&self.text(name), &count]);
            }
            InvocationKind::Constructor(ty) => {
                diag.add(diagnostic_codes::BAD_CTOR_ARG_COUNT, span, &[&self.display_type(ty), &count]);
            }
            InvocationKind::Delegate(ty) => {
                diag.add(diagnostic_codes::BAD_DELEGATE_ARG_COUNT, span, &[&self.display_type(ty), &count]);
            }
            InvocationKind::Indexer => {
                diag.add(diagnostic_codes::BAD_ARG_COUNT, span, &["this", &count]);
            }
        }
    }

    /// A bad call node keeping the receiver and the arguments as children.
    pub(crate) fn bad_call(
        &self,
        kind: LookupResultKind,
        candidates: Vec<SymbolId>,
        receiver: Option<BoundNode>,
        args: &mut AnalyzedArguments,
        ty: TypeId,
        span: Span,
    ) -> BoundNode {
        let mut children: Vec<BoundNode> = receiver.into_iter().collect();
        children.extend(args.take_arguments());
        BoundNode::bad(kind, candidates, children, ty, span)
    }

    // =========================================================================
    // Element access
    // =========================================================================

    pub(crate) fn bind_element_access(
        &mut self,
        receiver: NodeIndex,
        arguments: &[NodeIndex],
        span: Span,
        diag: &mut DiagnosticBag,
    ) -> BoundNode {
        let receiver = self.bind_receiver(receiver, diag);
        self.bind_element_access_on(receiver, arguments, span, diag)
    }

    /// `receiver[arguments]` on an already-bound receiver.
    pub(crate) fn bind_element_access_on(
        &mut self,
        receiver: BoundNode,
        arguments: &[NodeIndex],
        span: Span,
        diag: &mut DiagnosticBag,
    ) -> BoundNode {
        let receiver = self.check_value(receiver, diag);
        let mut args = self.acquire_arguments();
        self.bind_argument_list(arguments, &mut args, diag);
        let compilation = self.compilation;
        let ty = receiver.type_or_error();

        if matches!(receiver.kind, BoundKind::MethodGroup(_) | BoundKind::UnboundLambda { .. }) {
            if !receiver.has_errors {
                let description = if receiver.ty.is_none() { "lambda expression" } else { "method group" };
                diag.add(diagnostic_codes::BAD_INDEX_LHS, receiver.span, &[description]);
            }
            return self.bad_call(LookupResultKind::NotAValue, Vec::new(), Some(receiver), &mut args, TypeId::ERROR, span);
        }
        if compilation.is_dynamic(ty) || (args.has_dynamic_argument && compilation.array_info(ty).is_none()) {
            let arguments = self.check_dynamic_arguments(args.take_arguments(), diag);
            return BoundNode::new(
                BoundKind::Dynamic {
                    operation: DynamicOperation::Indexing,
                    receiver: Some(Box::new(receiver)),
                    arguments,
                    initializer: None,
                },
                TypeId::DYNAMIC,
                span,
            );
        }
        if compilation.is_error_type(ty) {
            return self.bad_call(LookupResultKind::Empty, Vec::new(), Some(receiver), &mut args, TypeId::ERROR, span);
        }
        if let Some((element, rank)) = compilation.array_info(ty) {
            return self.bind_array_access(receiver, element, rank, &mut args, span, diag);
        }
        self.bind_indexer_access(receiver, &mut args, span, diag)
    }

    fn bind_array_access(
        &mut self,
        array: BoundNode,
        element: TypeId,
        rank: u32,
        args: &mut AnalyzedArguments,
        span: Span,
        diag: &mut DiagnosticBag,
    ) -> BoundNode {
        if args.len() != rank as usize {
            diag.add(diagnostic_codes::BAD_INDEX_COUNT, span, &[&rank.to_string()]);
            return self.bad_call(LookupResultKind::Empty, Vec::new(), Some(array), args, element, span);
        }
        let indices = args
            .take_arguments()
            .into_iter()
            .map(|index| self.convert_to_array_index(index, diag))
            .collect();
        BoundNode::new(
            BoundKind::ArrayAccess {
                array: Box::new(array),
                indices,
            },
            element,
            span,
        )
    }

    fn bind_indexer_access(
        &mut self,
        receiver: BoundNode,
        args: &mut AnalyzedArguments,
        span: Span,
        diag: &mut DiagnosticBag,
    ) -> BoundNode {
        let compilation = self.compilation;
        let ty = receiver.type_or_error();
        let indexers: Vec<SymbolId> = compilation
            .interner()
            .get("Item")
            .map(|item| {
                self.lookup_in_type(ty, item, 0, LookupOptions::IGNORE_ACCESSIBILITY, receiver.span)
                    .symbols
                    .into_iter()
                    .filter(|s| matches!(&compilation.symbol(*s).kind, SymbolKind::Property(p) if !p.parameters.is_empty()))
                    .collect()
            })
            .unwrap_or_default();
        if indexers.is_empty() {
            if !receiver.has_errors {
                diag.add(diagnostic_codes::BAD_INDEX_LHS, receiver.span, &[&self.display_type(ty)]);
            }
            return self.bad_call(LookupResultKind::Empty, Vec::new(), Some(receiver), args, TypeId::ERROR, span);
        }
        match self.resolve_overloads(&indexers, Some(ty), &[], args, false) {
            OverloadResolutionResult::Succeeded(best) => {
                let arguments = self.coerce_arguments(&best, Some(ty), args, diag);
                BoundNode::new(
                    BoundKind::IndexerAccess(Box::new(BoundIndexerAccess {
                        receiver,
                        indexer: best.member,
                        arguments,
                        arg_to_param: best.arg_to_param,
                        expanded: best.expanded,
                    })),
                    best.return_type,
                    span,
                )
            }
            failed => {
                let (kind, ty) = self.report_overload_failure(
                    InvocationKind::Indexer,
                    &indexers,
                    Some(ty),
                    &[],
                    &failed,
                    args,
                    span,
                    diag,
                );
                self.bad_call(kind, indexers, Some(receiver), args, ty, span)
            }
        }
    }
}

#[cfg(test)]
#[path = "../tests/calls_tests.rs"]
mod tests;
