//! Predefined ("special") types.
//!
//! Each special type has a fixed [`crate::TypeId`] pre-interned by
//! [`crate::TypeInterner::new`], so `int` never needs a lookup to get a type.

use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum SpecialType {
    Void,
    Object,
    String,
    Boolean,
    Char,
    SByte,
    Byte,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Single,
    Double,
    Decimal,
}

impl SpecialType {
    /// All special types, in `TypeId` order.
    pub const ALL: [SpecialType; 16] = [
        SpecialType::Void,
        SpecialType::Object,
        SpecialType::String,
        SpecialType::Boolean,
        SpecialType::Char,
        SpecialType::SByte,
        SpecialType::Byte,
        SpecialType::Int16,
        SpecialType::UInt16,
        SpecialType::Int32,
        SpecialType::UInt32,
        SpecialType::Int64,
        SpecialType::UInt64,
        SpecialType::Single,
        SpecialType::Double,
        SpecialType::Decimal,
    ];

    /// Name of the type in the `System` namespace.
    pub fn metadata_name(self) -> &'static str {
        match self {
            SpecialType::Void => "Void",
            SpecialType::Object => "Object",
            SpecialType::String => "String",
            SpecialType::Boolean => "Boolean",
            SpecialType::Char => "Char",
            SpecialType::SByte => "SByte",
            SpecialType::Byte => "Byte",
            SpecialType::Int16 => "Int16",
            SpecialType::UInt16 => "UInt16",
            SpecialType::Int32 => "Int32",
            SpecialType::UInt32 => "UInt32",
            SpecialType::Int64 => "Int64",
            SpecialType::UInt64 => "UInt64",
            SpecialType::Single => "Single",
            SpecialType::Double => "Double",
            SpecialType::Decimal => "Decimal",
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            SpecialType::Void => "void",
            SpecialType::Object => "object",
            SpecialType::String => "string",
            SpecialType::Boolean => "bool",
            SpecialType::Char => "char",
            SpecialType::SByte => "sbyte",
            SpecialType::Byte => "byte",
            SpecialType::Int16 => "short",
            SpecialType::UInt16 => "ushort",
            SpecialType::Int32 => "int",
            SpecialType::UInt32 => "uint",
            SpecialType::Int64 => "long",
            SpecialType::UInt64 => "ulong",
            SpecialType::Single => "float",
            SpecialType::Double => "double",
            SpecialType::Decimal => "decimal",
        }
    }

    pub fn is_integral(self) -> bool {
        matches!(
            self,
            SpecialType::SByte
                | SpecialType::Byte
                | SpecialType::Int16
                | SpecialType::UInt16
                | SpecialType::Int32
                | SpecialType::UInt32
                | SpecialType::Int64
                | SpecialType::UInt64
                | SpecialType::Char
        )
    }

    pub fn is_floating(self) -> bool {
        matches!(self, SpecialType::Single | SpecialType::Double | SpecialType::Decimal)
    }

    pub fn is_numeric(self) -> bool {
        self.is_integral() || self.is_floating()
    }

    pub fn is_signed(self) -> bool {
        matches!(
            self,
            SpecialType::SByte | SpecialType::Int16 | SpecialType::Int32 | SpecialType::Int64
        )
    }

    pub fn is_value_type(self) -> bool {
        !matches!(self, SpecialType::Object | SpecialType::String | SpecialType::Void)
    }

    /// Inclusive range of an integral type.
    pub fn integral_range(self) -> Option<(i128, i128)> {
        let range = match self {
            SpecialType::SByte => (i8::MIN as i128, i8::MAX as i128),
            SpecialType::Byte => (0, u8::MAX as i128),
            SpecialType::Int16 => (i16::MIN as i128, i16::MAX as i128),
            SpecialType::UInt16 | SpecialType::Char => (0, u16::MAX as i128),
            SpecialType::Int32 => (i32::MIN as i128, i32::MAX as i128),
            SpecialType::UInt32 => (0, u32::MAX as i128),
            SpecialType::Int64 => (i64::MIN as i128, i64::MAX as i128),
            SpecialType::UInt64 => (0, u64::MAX as i128),
            _ => return None,
        };
        Some(range)
    }
}
