//! `new` expressions and the object and collection initializers attached to them.
//!
//! Object creation splits on what the bound type turns out to be: a delegate
//! (one argument converted to the delegate type), a type parameter (needs a
//! `new()` or `struct` constraint), an interface (needs a coclass), or a
//! class or struct (constructor overload resolution). Initializers bind
//! against an [`BoundKind::ImplicitReceiver`] typed as the created object.
//!
//! Array creation lives in [`crate::arrays`].

use crate::binder::Binder;
use crate::bound::{BoundKind, BoundNode, BoundObjectCreation, DynamicOperation, MethodGroup};
use crate::calls::InvocationKind;
use crate::lookup::{LookupOptions, LookupResultKind};
use crate::overload::OverloadResolutionResult;
use csz_common::diagnostics::diagnostic_codes;
use csz_common::{DiagnosticBag, Span};
use csz_symbols::{MethodKind, SymbolId, SymbolKind, TypeData, TypeId, TypeKind, WellKnownType};
use csz_syntax::{InitializerKind, NodeIndex, SimpleName, SyntaxData};
use rustc_hash::FxHashSet;
use tracing::{debug, trace};

impl<'c> Binder<'c> {
    // =========================================================================
    // Object creation
    // =========================================================================

    pub(crate) fn bind_object_creation(
        &mut self,
        ty: NodeIndex,
        arguments: Option<&[NodeIndex]>,
        initializer: Option<NodeIndex>,
        span: Span,
        diag: &mut DiagnosticBag,
    ) -> BoundNode {
        let type_node = self.bind_type(ty, diag);
        let created = type_node.type_or_error();
        let argument_syntax = arguments.unwrap_or(&[]);
        let compilation = self.compilation;
        trace!(ty = %self.display_type(created), arguments = argument_syntax.len(), "object creation");

        if type_node.has_errors || compilation.is_error_type(created) {
            let mut args = self.acquire_arguments();
            self.bind_argument_list(argument_syntax, &mut args, diag);
            let initializer = initializer.map(|init| self.bind_initializer_for(init, TypeId::ERROR, diag));
            let mut children = args.take_arguments();
            children.extend(initializer);
            return BoundNode::bad(LookupResultKind::Empty, Vec::new(), children, created, span);
        }

        match compilation.type_data(created) {
            TypeData::TypeParameter(symbol) => {
                return self.bind_new_type_parameter(symbol, created, argument_syntax, initializer, span, diag);
            }
            TypeData::Named { .. } | TypeData::Special(_) => {}
            _ => {
                diag.add(diagnostic_codes::INVALID_EXPRESSION_TERM, type_node.span, &[&self.display_type(created)]);
                return BoundNode::bad(LookupResultKind::NotAValue, Vec::new(), vec![type_node], TypeId::ERROR, span);
            }
        }

        match compilation.type_kind(created) {
            Some(TypeKind::Delegate) => self.bind_delegate_creation(created, argument_syntax, initializer, span, diag),
            Some(TypeKind::Interface) => {
                let coclass = compilation.type_symbol(created).and_then(|s| match &compilation.symbol(s).kind {
                    SymbolKind::NamedType(data) => data.coclass,
                    _ => None,
                });
                match coclass {
                    Some(coclass) => {
                        debug!(interface = %self.display_type(created), coclass = %self.display_type(coclass), "coclass creation");
                        self.bind_class_creation(created, Some(coclass), argument_syntax, initializer, span, diag)
                    }
                    None => self.report_abstract_creation(created, argument_syntax, initializer, span, diag),
                }
            }
            _ if compilation
                .type_symbol(created)
                .is_some_and(|s| compilation.symbol(s).is_abstract()) =>
            {
                self.report_abstract_creation(created, argument_syntax, initializer, span, diag)
            }
            _ => self.bind_class_creation(created, None, argument_syntax, initializer, span, diag),
        }
    }

    fn report_abstract_creation(
        &mut self,
        created: TypeId,
        argument_syntax: &[NodeIndex],
        initializer: Option<NodeIndex>,
        span: Span,
        diag: &mut DiagnosticBag,
    ) -> BoundNode {
        diag.add(diagnostic_codes::NO_NEW_ABSTRACT, span, &[&self.display_type(created)]);
        let mut args = self.acquire_arguments();
        self.bind_argument_list(argument_syntax, &mut args, diag);
        let initializer = initializer.map(|init| self.bind_initializer_for(init, created, diag));
        let mut children = args.take_arguments();
        children.extend(initializer);
        let candidates = self.compilation.type_symbol(created).into_iter().collect();
        BoundNode::bad(LookupResultKind::NotAValue, candidates, children, created, span)
    }

    /// `new C(args)` for a class or struct, or `new I(args)` through the
    /// interface's coclass.
    fn bind_class_creation(
        &mut self,
        created: TypeId,
        coclass: Option<TypeId>,
        argument_syntax: &[NodeIndex],
        initializer: Option<NodeIndex>,
        span: Span,
        diag: &mut DiagnosticBag,
    ) -> BoundNode {
        let compilation = self.compilation;
        let mut args = self.acquire_arguments();
        self.bind_argument_list(argument_syntax, &mut args, diag);
        let constructed = coclass.unwrap_or(created);

        if args.has_dynamic_argument {
            let arguments = self.check_dynamic_arguments(args.take_arguments(), diag);
            let initializer = initializer.map(|init| Box::new(self.bind_initializer_for(init, created, diag)));
            return BoundNode::new(
                BoundKind::Dynamic {
                    operation: DynamicOperation::ObjectCreation,
                    receiver: None,
                    arguments,
                    initializer,
                },
                created,
                span,
            );
        }

        let constructors = self.constructors_of(constructed);
        let implicit_default = args.is_empty()
            && (compilation.is_value_type(constructed) || constructors.is_empty());
        if implicit_default {
            let initializer = initializer.map(|init| self.bind_initializer_for(init, created, diag));
            return BoundNode::new(
                BoundKind::ObjectCreation(Box::new(BoundObjectCreation {
                    constructor: None,
                    arguments: Vec::new(),
                    arg_to_param: Vec::new(),
                    expanded: false,
                    initializer,
                    coclass,
                })),
                created,
                span,
            );
        }

        if constructors.is_empty() {
            if !args.has_errors {
                diag.add(
                    diagnostic_codes::BAD_CTOR_ARG_COUNT,
                    span,
                    &[&self.display_type(constructed), &args.len().to_string()],
                );
            }
            let initializer = initializer.map(|init| self.bind_initializer_for(init, created, diag));
            let mut children = args.take_arguments();
            children.extend(initializer);
            return BoundNode::bad(LookupResultKind::OverloadResolutionFailure, Vec::new(), children, created, span);
        }

        match self.resolve_overloads(&constructors, Some(constructed), &[], &args, false) {
            OverloadResolutionResult::Succeeded(best) => {
                let arguments = self.coerce_arguments(&best, Some(constructed), &mut args, diag);
                let initializer = initializer.map(|init| self.bind_initializer_for(init, created, diag));
                BoundNode::new(
                    BoundKind::ObjectCreation(Box::new(BoundObjectCreation {
                        constructor: Some(best.member),
                        arguments,
                        arg_to_param: best.arg_to_param,
                        expanded: best.expanded,
                        initializer,
                        coclass,
                    })),
                    created,
                    span,
                )
            }
            failed => {
                let (kind, _) = self.report_overload_failure(
                    InvocationKind::Constructor(constructed),
                    &constructors,
                    Some(constructed),
                    &[],
                    &failed,
                    &args,
                    span,
                    diag,
                );
                let initializer = initializer.map(|init| self.bind_initializer_for(init, created, diag));
                let mut children = args.take_arguments();
                children.extend(initializer);
                BoundNode::bad(kind, constructors, children, created, span)
            }
        }
    }

    /// Instance constructors declared on the type itself.
    fn constructors_of(&self, ty: TypeId) -> Vec<SymbolId> {
        let compilation = self.compilation;
        let (Some(owner), Some(name)) = (compilation.type_symbol(ty), compilation.interner().get(".ctor")) else {
            return Vec::new();
        };
        compilation
            .members_named(owner, name)
            .iter()
            .copied()
            .filter(|c| !compilation.symbol(*c).is_static())
            .collect()
    }

    /// `new T()` for a type parameter.
    fn bind_new_type_parameter(
        &mut self,
        symbol: SymbolId,
        created: TypeId,
        argument_syntax: &[NodeIndex],
        initializer: Option<NodeIndex>,
        span: Span,
        diag: &mut DiagnosticBag,
    ) -> BoundNode {
        let name = self.display_type(created);
        let constructible = match &self.compilation.symbol(symbol).kind {
            SymbolKind::TypeParameter(data) => data.has_new_constraint || data.has_value_type_constraint,
            _ => false,
        };
        if !argument_syntax.is_empty() {
            diag.add(diagnostic_codes::NEW_TYPE_VARIABLE_WITH_ARGS, span, &[&name]);
            let mut args = self.acquire_arguments();
            self.bind_argument_list(argument_syntax, &mut args, diag);
            return BoundNode::bad(LookupResultKind::NotInvocable, vec![symbol], args.take_arguments(), created, span);
        }
        if !constructible {
            diag.add(diagnostic_codes::NO_NEW_TYPE_VARIABLE, span, &[&name]);
            return BoundNode::bad(LookupResultKind::NotInvocable, vec![symbol], Vec::new(), created, span);
        }
        let initializer = initializer.map(|init| Box::new(self.bind_initializer_for(init, created, diag)));
        BoundNode::new(BoundKind::NewT { initializer }, created, span)
    }

    // =========================================================================
    // Delegate creation
    // =========================================================================

    /// `new D(x)`: `x` may be a lambda, a method group, a `dynamic` value or
    /// a value of a compatible delegate type.
    fn bind_delegate_creation(
        &mut self,
        delegate: TypeId,
        argument_syntax: &[NodeIndex],
        initializer: Option<NodeIndex>,
        span: Span,
        diag: &mut DiagnosticBag,
    ) -> BoundNode {
        let compilation = self.compilation;
        let mut args = self.acquire_arguments();
        self.bind_argument_list(argument_syntax, &mut args, diag);
        if args.len() != 1 || args.has_names() || initializer.is_some() {
            if !args.has_errors {
                diag.add(diagnostic_codes::METHOD_NAME_EXPECTED, span, &[]);
            }
            return BoundNode::bad(LookupResultKind::NotInvocable, Vec::new(), args.take_arguments(), delegate, span);
        }
        let mut arguments = args.take_arguments();
        let Some(argument) = arguments.pop() else {
            return BoundNode::error(span);
        };

        match &argument.kind {
            BoundKind::UnboundLambda { .. } | BoundKind::MethodGroup(_) => {
                let converted = self.convert_to_type(argument, delegate, diag);
                BoundNode { span, ..converted }
            }
            _ if argument.ty.is_some_and(|t| compilation.is_dynamic(t)) => BoundNode::new(
                BoundKind::DelegateCreation {
                    argument: Box::new(argument),
                    method: None,
                    is_dynamic: true,
                },
                delegate,
                span,
            ),
            _ if argument.has_errors => {
                BoundNode::bad(LookupResultKind::Empty, Vec::new(), vec![argument], delegate, span)
            }
            _ => {
                let source = argument.type_or_error();
                let Some(invoke) = compilation.delegate_invoke(source) else {
                    diag.add(diagnostic_codes::METHOD_NAME_EXPECTED, argument.span, &[]);
                    return BoundNode::bad(LookupResultKind::NotInvocable, Vec::new(), vec![argument], delegate, span);
                };
                let invoke_name = compilation.symbol(invoke).name;
                let group = BoundNode::new(
                    BoundKind::MethodGroup(Box::new(MethodGroup {
                        receiver: Some(Box::new(argument)),
                        name: invoke_name,
                        methods: vec![invoke],
                        type_args: Vec::new(),
                        result_kind: LookupResultKind::Viable,
                        search_extensions: false,
                    })),
                    TypeId::METHOD_GROUP,
                    span,
                );
                self.convert_to_type(group, delegate, diag)
            }
        }
    }

    // =========================================================================
    // Initializers
    // =========================================================================

    /// Bind an object or collection initializer for an object of type `target`.
    pub(crate) fn bind_initializer_for(
        &mut self,
        idx: NodeIndex,
        target: TypeId,
        diag: &mut DiagnosticBag,
    ) -> BoundNode {
        let syntax = self.syntax;
        let span = self.span(idx);
        let saved = self.implicit_receiver.replace(target);
        let bound = match syntax.data(idx) {
            Some(SyntaxData::Initializer {
                kind: InitializerKind::Object,
                elements,
            }) => self.bind_object_initializer(elements, target, span, diag),
            Some(SyntaxData::Initializer {
                kind: InitializerKind::Collection,
                elements,
            }) => self.bind_collection_initializer(elements, target, span, diag),
            _ => self.bind_value(idx, diag),
        };
        self.implicit_receiver = saved;
        bound
    }

    fn implicit_receiver_node(&self, span: Span) -> BoundNode {
        BoundNode::new(
            BoundKind::ImplicitReceiver,
            self.implicit_receiver.unwrap_or(TypeId::ERROR),
            span,
        )
    }

    /// `[args]` on the object being initialized.
    pub(crate) fn bind_implicit_element_access(
        &mut self,
        arguments: &[NodeIndex],
        span: Span,
        diag: &mut DiagnosticBag,
    ) -> BoundNode {
        let receiver = self.implicit_receiver_node(span);
        self.bind_element_access_on(receiver, arguments, span, diag)
    }

    fn bind_object_initializer(
        &mut self,
        elements: &[NodeIndex],
        target: TypeId,
        span: Span,
        diag: &mut DiagnosticBag,
    ) -> BoundNode {
        let syntax = self.syntax;
        let mut initialized: FxHashSet<SymbolId> = FxHashSet::default();
        let mut initializers = Vec::with_capacity(elements.len());
        for element in elements {
            let element_span = self.span(*element);
            let bound = match syntax.data(*element) {
                Some(SyntaxData::Assignment { left, right }) => {
                    self.bind_member_initializer(*left, *right, target, &mut initialized, element_span, diag)
                }
                _ => {
                    diag.add(diagnostic_codes::INVALID_INITIALIZER_MEMBER, element_span, &[]);
                    let value = self.bind_value(*element, diag);
                    BoundNode::bad(LookupResultKind::Empty, Vec::new(), vec![value], TypeId::ERROR, element_span)
                }
            };
            initializers.push(bound);
        }
        BoundNode::new(BoundKind::ObjectInitializer { initializers }, target, span)
    }

    /// One `Member = value` or `[index] = value` entry.
    fn bind_member_initializer(
        &mut self,
        left: NodeIndex,
        right: NodeIndex,
        target: TypeId,
        initialized: &mut FxHashSet<SymbolId>,
        span: Span,
        diag: &mut DiagnosticBag,
    ) -> BoundNode {
        let syntax = self.syntax;
        let left_span = self.span(left);
        let right_initializer = match syntax.data(right) {
            Some(SyntaxData::Initializer { kind, .. })
                if matches!(kind, InitializerKind::Object | InitializerKind::Collection) =>
            {
                Some(*kind)
            }
            _ => None,
        };

        let member_node = match syntax.data(left) {
            Some(SyntaxData::Identifier(name)) => {
                self.bind_initialized_member(name, target, right_initializer.is_some(), initialized, left_span, diag)
            }
            Some(SyntaxData::ImplicitElementAccess { arguments }) => {
                self.bind_implicit_element_access(arguments, left_span, diag)
            }
            _ => {
                diag.add(diagnostic_codes::INVALID_INITIALIZER_MEMBER, left_span, &[]);
                let value = self.bind_value(left, diag);
                BoundNode::bad(LookupResultKind::Empty, Vec::new(), vec![value], TypeId::ERROR, left_span)
            }
        };
        let member_type = member_node.type_or_error();

        let mut assignable = true;
        let value = match right_initializer {
            Some(kind) => {
                let is_value_type_member = matches!(
                    member_node.kind,
                    BoundKind::PropertyAccess { .. } | BoundKind::IndexerAccess(_)
                ) && self.compilation.is_value_type(member_type);
                if kind == InitializerKind::Object && is_value_type_member && !member_node.has_errors {
                    let member_name = match &member_node.kind {
                        BoundKind::PropertyAccess { property, .. } => self.display_symbol(*property),
                        BoundKind::IndexerAccess(access) => self.display_symbol(access.indexer),
                        _ => String::new(),
                    };
                    diag.add(
                        diagnostic_codes::VALUE_TYPE_PROPERTY_IN_OBJECT_INITIALIZER,
                        left_span,
                        &[&member_name, &self.display_type(member_type)],
                    );
                    let inner = self.bind_initializer_for(right, member_type, diag);
                    BoundNode::bad(LookupResultKind::Empty, Vec::new(), vec![inner], member_type, self.span(right))
                } else {
                    self.bind_initializer_for(right, member_type, diag)
                }
            }
            None => {
                assignable = self.check_member_assignable(&member_node, diag);
                let value = self.bind_value(right, diag);
                self.convert_to_type(value, member_type, diag)
            }
        };
        let node = BoundNode::new(
            BoundKind::Assignment {
                left: Box::new(member_node),
                right: Box::new(value),
            },
            member_type,
            span,
        );
        if assignable { node } else { node.with_errors() }
    }

    /// Resolve the member named on the left of an object-initializer entry.
    fn bind_initialized_member(
        &mut self,
        name: &SimpleName,
        target: TypeId,
        nested_value: bool,
        initialized: &mut FxHashSet<SymbolId>,
        span: Span,
        diag: &mut DiagnosticBag,
    ) -> BoundNode {
        let compilation = self.compilation;
        let text = self.text(name.name);
        if compilation.is_error_type(target) {
            return BoundNode::error(span);
        }
        if compilation.is_dynamic(target) {
            let receiver = self.implicit_receiver_node(span);
            return BoundNode::new(
                BoundKind::Dynamic {
                    operation: DynamicOperation::MemberAccess(name.name),
                    receiver: Some(Box::new(receiver)),
                    arguments: Vec::new(),
                    initializer: None,
                },
                TypeId::DYNAMIC,
                span,
            );
        }
        let result = self.lookup_in_type(target, name.name, 0, LookupOptions::empty(), span);
        if result.is_empty() {
            diag.add(diagnostic_codes::NO_SUCH_MEMBER, span, &[&self.display_type(target), &text]);
            return BoundNode::bad(LookupResultKind::Empty, Vec::new(), Vec::new(), TypeId::ERROR, span);
        }
        if !result.is_viable() {
            self.report_lookup_failure(&result, name.name, span, diag);
            return self.bad_from_lookup(&result, name.name, span);
        }
        let Some(member) = result.single_symbol() else {
            diag.add(diagnostic_codes::MEMBER_CANNOT_BE_INITIALIZED, span, &[&text]);
            return BoundNode::bad(LookupResultKind::NotAVariable, result.symbols.to_vec(), Vec::new(), TypeId::ERROR, span);
        };
        let symbol = compilation.symbol(member);
        let member_type = compilation.member_type(member, Some(target));
        if !matches!(symbol.kind, SymbolKind::Field(_) | SymbolKind::Property(_)) {
            diag.add(diagnostic_codes::MEMBER_CANNOT_BE_INITIALIZED, span, &[&text]);
            return BoundNode::bad(LookupResultKind::NotAVariable, vec![member], Vec::new(), TypeId::ERROR, span);
        }
        if symbol.is_static() {
            diag.add(diagnostic_codes::STATIC_MEMBER_IN_OBJECT_INITIALIZER, span, &[&text]);
            return BoundNode::bad(LookupResultKind::StaticInstanceMismatch, vec![member], Vec::new(), member_type, span);
        }
        if !initialized.insert(member) {
            diag.add(diagnostic_codes::MEMBER_ALREADY_INITIALIZED, span, &[&text]);
            return BoundNode::bad(LookupResultKind::Viable, vec![member], Vec::new(), member_type, span);
        }
        if nested_value
            && let SymbolKind::Property(data) = &symbol.kind
            && !data.has_getter
        {
            diag.add(diagnostic_codes::PROPERTY_LACKS_GET, span, &[&self.display_symbol(member)]);
            return BoundNode::bad(LookupResultKind::NotAValue, vec![member], Vec::new(), member_type, span);
        }
        let receiver = self.implicit_receiver_node(span);
        self.bind_value_member(member, Some(receiver), span)
    }

    /// Report a readonly field outside its constructor or a property or
    /// indexer without a setter. Returns whether `member` can be assigned.
    pub(crate) fn check_member_assignable(&self, member: &BoundNode, diag: &mut DiagnosticBag) -> bool {
        if member.has_errors {
            return true;
        }
        let compilation = self.compilation;
        let read_only_property = |property: SymbolId| {
            matches!(&compilation.symbol(property).kind, SymbolKind::Property(data) if !data.has_setter)
        };
        match &member.kind {
            BoundKind::FieldAccess { field, .. } => {
                if compilation.symbol(*field).is_readonly() && !self.in_constructor_of(*field) {
                    diag.add(diagnostic_codes::READONLY_FIELD_ASSIGNMENT, member.span, &[]);
                    return false;
                }
            }
            BoundKind::PropertyAccess { property, .. } if read_only_property(*property) => {
                diag.add(
                    diagnostic_codes::READONLY_PROPERTY_ASSIGNMENT,
                    member.span,
                    &[&self.display_symbol(*property)],
                );
                return false;
            }
            BoundKind::IndexerAccess(access) if read_only_property(access.indexer) => {
                diag.add(
                    diagnostic_codes::READONLY_PROPERTY_ASSIGNMENT,
                    member.span,
                    &[&self.display_symbol(access.indexer)],
                );
                return false;
            }
            _ => {}
        }
        true
    }

    /// Collection initializer: each element becomes an `Add` call on the
    /// implicit receiver.
    fn bind_collection_initializer(
        &mut self,
        elements: &[NodeIndex],
        target: TypeId,
        span: Span,
        diag: &mut DiagnosticBag,
    ) -> BoundNode {
        let compilation = self.compilation;
        let enumerable_ok = if compilation.is_error_type(target) || compilation.is_dynamic(target) {
            true
        } else {
            match compilation.well_known_type(WellKnownType::SystemCollectionsIEnumerable) {
                None => {
                    diag.add(
                        diagnostic_codes::PREDEFINED_TYPE_NOT_FOUND,
                        span,
                        &[WellKnownType::SystemCollectionsIEnumerable.path()],
                    );
                    false
                }
                Some(enumerable) if !compilation.implements(target, enumerable) => {
                    diag.add(
                        diagnostic_codes::COLLECTION_INIT_REQUIRES_ENUMERABLE,
                        span,
                        &[&self.display_type(target)],
                    );
                    false
                }
                Some(_) => true,
            }
        };

        let syntax = self.syntax;
        let mut initializers = Vec::with_capacity(elements.len());
        for element in elements {
            let element_span = self.span(*element);
            let values: Vec<BoundNode> = match syntax.data(*element) {
                Some(SyntaxData::Initializer {
                    kind: InitializerKind::Complex,
                    elements: parts,
                }) => parts.iter().map(|p| self.bind_value(*p, diag)).collect(),
                _ => vec![self.bind_value(*element, diag)],
            };
            if !enumerable_ok {
                initializers.push(BoundNode::bad(LookupResultKind::Empty, Vec::new(), values, TypeId::ERROR, element_span));
                continue;
            }
            initializers.push(self.bind_collection_add(values, target, element_span, diag));
        }
        let node = BoundNode::new(BoundKind::CollectionInitializer { initializers }, target, span);
        if enumerable_ok { node } else { node.with_errors() }
    }

    /// `Add(values)` on the implicit receiver.
    fn bind_collection_add(
        &mut self,
        values: Vec<BoundNode>,
        target: TypeId,
        span: Span,
        diag: &mut DiagnosticBag,
    ) -> BoundNode {
        let receiver = self.implicit_receiver_node(span);
        let mut args = self.acquire_arguments();
        for value in values {
            args.push(value);
        }
        if self.compilation.is_dynamic(target) || args.has_dynamic_argument {
            let arguments = self.check_dynamic_arguments(args.take_arguments(), diag);
            return BoundNode::new(
                BoundKind::Dynamic {
                    operation: DynamicOperation::Invocation,
                    receiver: Some(Box::new(receiver)),
                    arguments,
                    initializer: None,
                },
                TypeId::DYNAMIC,
                span,
            );
        }
        // A name nobody interned cannot name a member.
        let Some(name) = self.compilation.interner().get("Add") else {
            let shown = self.display_type(target);
            diag.add(diagnostic_codes::NO_SUCH_MEMBER_OR_EXTENSION, span, &[&shown, "Add"]);
            return self.bad_call(LookupResultKind::Empty, Vec::new(), Some(receiver), &mut args, TypeId::ERROR, span);
        };
        let add = SimpleName { name, name_span: span, type_args: Vec::new() };
        let group = self.bind_member_of_receiver(receiver, &add, span, true, diag);
        match group.kind {
            BoundKind::MethodGroup(group) => self.bind_method_group_invocation(*group, span, &mut args, span, diag),
            kind => {
                let target = BoundNode { kind, ..group };
                self.bad_call(LookupResultKind::NotInvocable, Vec::new(), Some(target), &mut args, TypeId::ERROR, span)
            }
        }
    }

    /// Whether the current code is a constructor of the type declaring `member`.
    pub(crate) fn in_constructor_of(&self, member: SymbolId) -> bool {
        let compilation = self.compilation;
        let Some(current) = self.containing_member() else {
            return false;
        };
        let is_constructor = matches!(
            &compilation.symbol(current).kind,
            SymbolKind::Method(data) if data.method_kind == MethodKind::Constructor
        );
        is_constructor && compilation.symbol(current).container == compilation.symbol(member).container
    }
}

#[cfg(test)]
#[path = "../tests/construction_tests.rs"]
mod tests;
