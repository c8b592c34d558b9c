//! Compile-time constant values.

use crate::special::SpecialType;
use serde::Serialize;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// A constant value carried by literals, `const` members and folded expressions.
///
/// Integral values of every width share one `i128` representation; the owning
/// node's type says how wide the value really is. Floating values compare and
/// hash by bit pattern so constants can key decision-DAG tests.
#[derive(Clone, Debug, Serialize)]
pub enum ConstantValue {
    Null,
    Bool(bool),
    Char(char),
    Integral(i128),
    Floating(f64),
    String(Arc<str>),
}

impl PartialEq for ConstantValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ConstantValue::Null, ConstantValue::Null) => true,
            (ConstantValue::Bool(a), ConstantValue::Bool(b)) => a == b,
            (ConstantValue::Char(a), ConstantValue::Char(b)) => a == b,
            (ConstantValue::Integral(a), ConstantValue::Integral(b)) => a == b,
            (ConstantValue::Floating(a), ConstantValue::Floating(b)) => a.to_bits() == b.to_bits(),
            (ConstantValue::String(a), ConstantValue::String(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for ConstantValue {}

impl Hash for ConstantValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            ConstantValue::Null => {}
            ConstantValue::Bool(b) => b.hash(state),
            ConstantValue::Char(c) => c.hash(state),
            ConstantValue::Integral(i) => i.hash(state),
            ConstantValue::Floating(f) => f.to_bits().hash(state),
            ConstantValue::String(s) => s.hash(state),
        }
    }
}

impl ConstantValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConstantValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Integral view of the value; `char` counts as integral.
    pub fn as_integral(&self) -> Option<i128> {
        match self {
            ConstantValue::Integral(i) => Some(*i),
            ConstantValue::Char(c) => Some(*c as i128),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ConstantValue::Floating(f) => Some(*f),
            ConstantValue::Integral(i) => Some(*i as f64),
            ConstantValue::Char(c) => Some(*c as u32 as f64),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ConstantValue::Null)
    }

    /// Whether this value is representable in `target` without loss.
    pub fn fits_in(&self, target: SpecialType) -> bool {
        match (self.as_integral(), target.integral_range()) {
            (Some(value), Some((min, max))) => value >= min && value <= max,
            (Some(_), None) => target.is_floating(),
            (None, _) => false,
        }
    }

    /// Convert to `target`, wrapping integral values the way an unchecked
    /// conversion does. Returns the converted value and whether it overflowed.
    pub fn convert_to(&self, target: SpecialType) -> Option<(ConstantValue, bool)> {
        if target.is_floating() {
            return self.as_f64().map(|f| (ConstantValue::Floating(f), false));
        }
        let (min, max) = target.integral_range()?;
        let value = match self {
            ConstantValue::Floating(f) => {
                if f.is_nan() {
                    return Some((ConstantValue::Integral(0), true));
                }
                f.trunc() as i128
            }
            other => other.as_integral()?,
        };
        let overflowed = value < min || value > max;
        let width = (max - min + 1) as u128;
        let wrapped = if overflowed {
            let offset = (value - min).rem_euclid(width as i128);
            min + offset
        } else {
            value
        };
        let converted = if target == SpecialType::Char {
            char::from_u32(wrapped as u32).map_or(ConstantValue::Integral(wrapped), ConstantValue::Char)
        } else {
            ConstantValue::Integral(wrapped)
        };
        Some((converted, overflowed))
    }
}

impl fmt::Display for ConstantValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstantValue::Null => write!(f, "null"),
            ConstantValue::Bool(b) => write!(f, "{b}"),
            ConstantValue::Char(c) => write!(f, "'{c}'"),
            ConstantValue::Integral(i) => write!(f, "{i}"),
            ConstantValue::Floating(x) => write!(f, "{x}"),
            ConstantValue::String(s) => write!(f, "\"{s}\""),
        }
    }
}
