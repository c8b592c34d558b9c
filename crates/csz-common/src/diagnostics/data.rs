//! Diagnostic message table.
//!
//! Codes follow the numbering of the C# compiler's messages so tooling that
//! already knows them keeps working.

use super::{DiagnosticCategory, DiagnosticMessage};

pub mod diagnostic_codes {
    pub const BAD_BINARY_OPS: u32 = 19;
    pub const DIVIDE_BY_ZERO: u32 = 20;
    pub const BAD_INDEX_LHS: u32 = 21;
    pub const BAD_INDEX_COUNT: u32 = 22;
    pub const BAD_UNARY_OP: u32 = 23;
    pub const THIS_IN_BAD_CONTEXT: u32 = 27;
    pub const NO_IMPLICIT_CONV: u32 = 29;
    pub const NO_EXPLICIT_CONV: u32 = 30;
    pub const NAME_NOT_IN_CONTEXT: u32 = 103;
    pub const AMBIGUOUS_REFERENCE: u32 = 104;
    pub const CIRCULAR_CONSTANT: u32 = 110;
    pub const NO_SUCH_MEMBER: u32 = 117;
    pub const BAD_SYMBOL_KIND: u32 = 118;
    pub const BAD_SYMBOL_KIND_CONTEXT: u32 = 119;
    pub const OBJECT_REQUIRED: u32 = 120;
    pub const AMBIGUOUS_CALL: u32 = 121;
    pub const INACCESSIBLE: u32 = 122;
    pub const METHOD_DELEGATE_MISMATCH: u32 = 123;
    pub const ASSIGNMENT_TARGET_NOT_VARIABLE: u32 = 131;
    pub const NO_NEW_ABSTRACT: u32 = 144;
    pub const CIRCULAR_BASE: u32 = 146;
    pub const METHOD_NAME_EXPECTED: u32 = 149;
    pub const CONSTANT_EXPECTED: u32 = 150;
    pub const PROPERTY_LACKS_GET: u32 = 154;
    pub const OBJECT_PROHIBITED: u32 = 176;
    pub const READONLY_FIELD_ASSIGNMENT: u32 = 191;
    pub const READONLY_PROPERTY_ASSIGNMENT: u32 = 200;
    pub const REF_PROPERTY: u32 = 206;
    pub const UNSAFE_NEEDED: u32 = 214;
    pub const CONSTANT_OVERFLOW: u32 = 220;
    pub const CONSTANT_OVERFLOW_CHECKED: u32 = 221;
    pub const ILLEGAL_ARGLIST: u32 = 226;
    pub const NAMESPACE_MEMBER_NOT_FOUND: u32 = 234;
    pub const TYPE_OR_NAMESPACE_NOT_FOUND: u32 = 246;
    pub const NEGATIVE_ARRAY_SIZE: u32 = 248;
    pub const NO_IMPLICIT_CONV_CAST: u32 = 266;
    pub const NO_NEW_TYPE_VARIABLE: u32 = 304;
    pub const BAD_ARITY: u32 = 305;
    pub const NON_GENERIC_WITH_TYPE_ARGS: u32 = 308;
    pub const NEW_TYPE_VARIABLE_WITH_ARGS: u32 = 417;
    pub const NESTED_TYPE_NOT_FOUND: u32 = 426;
    pub const METHOD_GROUP_TO_NON_DELEGATE: u32 = 428;
    pub const SAME_FULL_NAME_NS_TYPE: u32 = 435;
    pub const SAME_FULL_NAME_TYPE_NS: u32 = 437;
    pub const PREDEFINED_TYPE_NOT_FOUND: u32 = 518;
    pub const ARRAY_INIT_IN_BAD_PLACE: u32 = 623;
    pub const INVALID_INITIALIZER_MEMBER: u32 = 747;
    pub const NO_BEST_TYPE_FOR_ARRAY: u32 = 826;
    pub const NESTED_ARRAY_INITIALIZER_EXPECTED: u32 = 846;
    pub const ARRAY_INITIALIZER_INCORRECT_LENGTH: u32 = 847;
    pub const NO_SUCH_MEMBER_OR_EXTENSION: u32 = 1061;
    pub const BAD_ARG_COUNT: u32 = 1501;
    pub const BAD_ARG_TYPE: u32 = 1503;
    pub const REF_LVALUE_EXPECTED: u32 = 1510;
    pub const INVALID_EXPRESSION_TERM: u32 = 1525;
    pub const MISSING_ARRAY_SIZE: u32 = 1586;
    pub const BAD_DELEGATE_ARG_COUNT: u32 = 1593;
    pub const BAD_ARG_EXTRA_REF: u32 = 1615;
    pub const BAD_ARG_REF: u32 = 1620;
    pub const ANON_FUNC_TO_NON_DELEGATE: u32 = 1660;
    pub const BAD_CTOR_ARG_COUNT: u32 = 1729;
    pub const NAMED_ARGUMENT_BEFORE_POSITIONAL: u32 = 1738;
    pub const BAD_NAMED_ARGUMENT: u32 = 1739;
    pub const DUPLICATE_NAMED_ARGUMENT: u32 = 1740;
    pub const MEMBER_ALREADY_INITIALIZED: u32 = 1912;
    pub const MEMBER_CANNOT_BE_INITIALIZED: u32 = 1913;
    pub const STATIC_MEMBER_IN_OBJECT_INITIALIZER: u32 = 1914;
    pub const VALUE_TYPE_PROPERTY_IN_OBJECT_INITIALIZER: u32 = 1918;
    pub const COLLECTION_INIT_REQUIRES_ENUMERABLE: u32 = 1922;
    pub const NON_INVOCABLE_MEMBER: u32 = 1955;
    pub const BAD_DYNAMIC_LAMBDA_ARG: u32 = 1977;
    pub const EXPRESSION_TOO_COMPLEX: u32 = 8078;
    pub const SWITCH_CASE_SUBSUMED: u32 = 8120;
    pub const PATTERN_WRONG_TYPE: u32 = 8121;
}

use diagnostic_codes::*;
use DiagnosticCategory::{Error, Warning};

const fn msg(code: u32, category: DiagnosticCategory, message: &'static str) -> DiagnosticMessage {
    DiagnosticMessage {
        code,
        category,
        message,
    }
}

pub static DIAGNOSTIC_MESSAGES: &[DiagnosticMessage] = &[
    msg(BAD_BINARY_OPS, Error, "Operator '{0}' cannot be applied to operands of type '{1}' and '{2}'"),
    msg(DIVIDE_BY_ZERO, Error, "Division by constant zero"),
    msg(BAD_INDEX_LHS, Error, "Cannot apply indexing with [] to an expression of type '{0}'"),
    msg(BAD_INDEX_COUNT, Error, "Wrong number of indices inside []; expected {0}"),
    msg(BAD_UNARY_OP, Error, "Operator '{0}' cannot be applied to operand of type '{1}'"),
    msg(THIS_IN_BAD_CONTEXT, Error, "Keyword 'this' is not available in the current context"),
    msg(NO_IMPLICIT_CONV, Error, "Cannot implicitly convert type '{0}' to '{1}'"),
    msg(NO_EXPLICIT_CONV, Error, "Cannot convert type '{0}' to '{1}'"),
    msg(NAME_NOT_IN_CONTEXT, Error, "The name '{0}' does not exist in the current context"),
    msg(AMBIGUOUS_REFERENCE, Error, "'{0}' is an ambiguous reference between '{1}' and '{2}'"),
    msg(CIRCULAR_CONSTANT, Error, "The evaluation of the constant value for '{0}' involves a circular definition"),
    msg(NO_SUCH_MEMBER, Error, "'{0}' does not contain a definition for '{1}'"),
    msg(BAD_SYMBOL_KIND, Error, "'{0}' is a {1} but is used like a {2}"),
    msg(BAD_SYMBOL_KIND_CONTEXT, Error, "'{0}' is a {1}, which is not valid in the given context"),
    msg(OBJECT_REQUIRED, Error, "An object reference is required for the non-static field, method, or property '{0}'"),
    msg(AMBIGUOUS_CALL, Error, "The call is ambiguous between the following methods or properties: '{0}' and '{1}'"),
    msg(INACCESSIBLE, Error, "'{0}' is inaccessible due to its protection level"),
    msg(METHOD_DELEGATE_MISMATCH, Error, "No overload for '{0}' matches delegate '{1}'"),
    msg(ASSIGNMENT_TARGET_NOT_VARIABLE, Error, "The left-hand side of an assignment must be a variable, property or indexer"),
    msg(NO_NEW_ABSTRACT, Error, "Cannot create an instance of the abstract type or interface '{0}'"),
    msg(CIRCULAR_BASE, Error, "Circular base type dependency involving '{0}' and '{1}'"),
    msg(METHOD_NAME_EXPECTED, Error, "Method name expected"),
    msg(CONSTANT_EXPECTED, Error, "A constant value is expected"),
    msg(PROPERTY_LACKS_GET, Error, "The property or indexer '{0}' cannot be used in this context because it lacks the get accessor"),
    msg(OBJECT_PROHIBITED, Error, "Member '{0}' cannot be accessed with an instance reference; qualify it with a type name instead"),
    msg(READONLY_FIELD_ASSIGNMENT, Error, "A readonly field cannot be assigned to (except in a constructor or a variable initializer)"),
    msg(READONLY_PROPERTY_ASSIGNMENT, Error, "Property or indexer '{0}' cannot be assigned to -- it is read only"),
    msg(REF_PROPERTY, Error, "A property or indexer may not be passed as an out or ref parameter"),
    msg(UNSAFE_NEEDED, Error, "Pointers and fixed size buffers may only be used in an unsafe context"),
    msg(CONSTANT_OVERFLOW, Error, "The operation overflows at compile time in checked mode"),
    msg(CONSTANT_OVERFLOW_CHECKED, Error, "Constant value '{0}' cannot be converted to a '{1}' (use 'unchecked' syntax to override)"),
    msg(ILLEGAL_ARGLIST, Error, "An __arglist expression may only appear inside of a call or new expression"),
    msg(NAMESPACE_MEMBER_NOT_FOUND, Error, "The type or namespace name '{0}' does not exist in the namespace '{1}' (are you missing an assembly reference?)"),
    msg(TYPE_OR_NAMESPACE_NOT_FOUND, Error, "The type or namespace name '{0}' could not be found (are you missing a using directive or an assembly reference?)"),
    msg(NEGATIVE_ARRAY_SIZE, Error, "Cannot create an array with a negative size"),
    msg(NO_IMPLICIT_CONV_CAST, Error, "Cannot implicitly convert type '{0}' to '{1}'. An explicit conversion exists (are you missing a cast?)"),
    msg(NO_NEW_TYPE_VARIABLE, Error, "Cannot create an instance of the variable type '{0}' because it does not have the new() constraint"),
    msg(BAD_ARITY, Error, "Using the generic {1} '{0}' requires {2} type arguments"),
    msg(NON_GENERIC_WITH_TYPE_ARGS, Error, "The non-generic {1} '{0}' cannot be used with type arguments"),
    msg(NEW_TYPE_VARIABLE_WITH_ARGS, Error, "'{0}': cannot provide arguments when creating an instance of a variable type"),
    msg(NESTED_TYPE_NOT_FOUND, Error, "The type name '{0}' does not exist in the type '{1}'"),
    msg(METHOD_GROUP_TO_NON_DELEGATE, Error, "Cannot convert method group '{0}' to non-delegate type '{1}'. Did you intend to invoke the method?"),
    msg(SAME_FULL_NAME_NS_TYPE, Warning, "The namespace '{0}' in '{1}' conflicts with the imported type '{2}' in '{3}'. Using the namespace defined in '{1}'."),
    msg(SAME_FULL_NAME_TYPE_NS, Warning, "The type '{0}' in '{1}' conflicts with the imported namespace '{2}' in '{3}'. Using the type defined in '{1}'."),
    msg(PREDEFINED_TYPE_NOT_FOUND, Error, "Predefined type '{0}' is not defined or imported"),
    msg(ARRAY_INIT_IN_BAD_PLACE, Error, "Array initializers can only be used in a variable or field initializer. Try using a new expression instead."),
    msg(INVALID_INITIALIZER_MEMBER, Error, "Invalid initializer member declarator"),
    msg(NO_BEST_TYPE_FOR_ARRAY, Error, "No best type found for implicitly-typed array"),
    msg(NESTED_ARRAY_INITIALIZER_EXPECTED, Error, "A nested array initializer is expected"),
    msg(ARRAY_INITIALIZER_INCORRECT_LENGTH, Error, "An array initializer of length '{0}' is expected"),
    msg(NO_SUCH_MEMBER_OR_EXTENSION, Error, "'{0}' does not contain a definition for '{1}' and no accessible extension method '{1}' accepting a first argument of type '{0}' could be found (are you missing a using directive or an assembly reference?)"),
    msg(BAD_ARG_COUNT, Error, "No overload for method '{0}' takes {1} arguments"),
    msg(BAD_ARG_TYPE, Error, "Argument {0}: cannot convert from '{1}' to '{2}'"),
    msg(REF_LVALUE_EXPECTED, Error, "A ref or out value must be an assignable variable"),
    msg(INVALID_EXPRESSION_TERM, Error, "Invalid expression term '{0}'"),
    msg(MISSING_ARRAY_SIZE, Error, "Array creation must have array size or array initializer"),
    msg(BAD_DELEGATE_ARG_COUNT, Error, "Delegate '{0}' does not take {1} arguments"),
    msg(BAD_ARG_EXTRA_REF, Error, "Argument {0} may not be passed with the '{1}' keyword"),
    msg(BAD_ARG_REF, Error, "Argument {0} must be passed with the '{1}' keyword"),
    msg(ANON_FUNC_TO_NON_DELEGATE, Error, "Cannot convert lambda expression to type '{0}' because it is not a delegate type"),
    msg(BAD_CTOR_ARG_COUNT, Error, "'{0}' does not contain a constructor that takes {1} arguments"),
    msg(NAMED_ARGUMENT_BEFORE_POSITIONAL, Error, "Named argument specifications must appear after all fixed arguments have been specified"),
    msg(BAD_NAMED_ARGUMENT, Error, "The best overload for '{0}' does not have a parameter named '{1}'"),
    msg(DUPLICATE_NAMED_ARGUMENT, Error, "Named argument '{0}' cannot be specified multiple times"),
    msg(MEMBER_ALREADY_INITIALIZED, Error, "Duplicate initialization of member '{0}'"),
    msg(MEMBER_CANNOT_BE_INITIALIZED, Error, "Member '{0}' cannot be initialized. It is not a field or property."),
    msg(STATIC_MEMBER_IN_OBJECT_INITIALIZER, Error, "Static field or property '{0}' cannot be assigned in an object initializer"),
    msg(VALUE_TYPE_PROPERTY_IN_OBJECT_INITIALIZER, Error, "Members of property '{0}' of type '{1}' cannot be assigned with an object initializer because it is of a value type"),
    msg(COLLECTION_INIT_REQUIRES_ENUMERABLE, Error, "Cannot initialize type '{0}' with a collection initializer because it does not implement 'System.Collections.IEnumerable'"),
    msg(NON_INVOCABLE_MEMBER, Error, "Non-invocable member '{0}' cannot be used like a method."),
    msg(BAD_DYNAMIC_LAMBDA_ARG, Error, "Cannot use a lambda expression as an argument to a dynamically dispatched operation without first casting it to a delegate or expression tree type."),
    msg(EXPRESSION_TOO_COMPLEX, Error, "An expression is too long or complex to compile"),
    msg(SWITCH_CASE_SUBSUMED, Error, "The switch case is unreachable. It has already been handled by a previous case or it is impossible to match."),
    msg(PATTERN_WRONG_TYPE, Error, "An expression of type '{0}' cannot be handled by a pattern of type '{1}'."),
];
