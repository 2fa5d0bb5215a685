//! Runtime values of literals, with base decoding and overflow detection.

use sablec_ast::{Annotation, TypeKind};
use sablec_token::TokenKind;

/// A value tagged with its concrete kind.
///
/// The arithmetic surface is closed within kind families: combining an
/// `Int` with a `Bool` is a compiler bug, not a user error, and panics.
/// The parser only builds well-typed operations.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    None,
    Int(i64),
    Uint(u64),
    Float(f64),
    Char(u8),
    Str(String),
    Bool(bool),
    /// A numeric literal out of range for its type.
    Overflow,
}

impl Value {
    /// Decode the lexeme of a literal token under `annotation`.
    ///
    /// The base comes from the token kind: 16 for hex, 2 for binary, 10
    /// otherwise. Overflow is detected against the 64-bit range and, when
    /// the annotation names a narrower bit width, against that range too.
    pub fn from_literal(annotation: &Annotation, kind: TokenKind, lexeme: &str) -> Value {
        let (digits, base) = match kind {
            TokenKind::HexLit => (lexeme.get(2..).unwrap_or(""), 16),
            TokenKind::BinLit => (lexeme.get(2..lexeme.len().saturating_sub(1)).unwrap_or(""), 2),
            _ => (lexeme, 10),
        };

        let type_kind = if annotation.actual != TypeKind::None {
            annotation.actual
        } else {
            annotation.ostensible
        };

        match type_kind {
            TypeKind::Int if annotation.is_signed => {
                if digits.is_empty() {
                    return Value::None;
                }

                match i64::from_str_radix(digits, base) {
                    Ok(v) if fits_signed(v, annotation.bit_width) => Value::Int(v),
                    _ => Value::Overflow,
                }
            }
            TypeKind::Int => {
                if digits.is_empty() {
                    return Value::None;
                }

                match u64::from_str_radix(digits, base) {
                    Ok(v) if fits_unsigned(v, annotation.bit_width) => Value::Uint(v),
                    _ => Value::Overflow,
                }
            }
            TypeKind::Float => {
                let Ok(v) = lexeme.parse::<f64>() else {
                    return Value::None;
                };

                if !v.is_finite() {
                    return Value::Overflow;
                }
                if annotation.bit_width == 32 && v.abs() > f32::MAX as f64 {
                    return Value::Overflow;
                }

                Value::Float(v)
            }
            TypeKind::Bool => match lexeme {
                "true" => Value::Bool(true),
                "false" => Value::Bool(false),
                _ => Value::None,
            },
            TypeKind::Char => match lexeme.as_bytes() {
                // exactly one byte between the quotes
                [b'\'', c, b'\''] => Value::Char(*c),
                _ => Value::None,
            },
            TypeKind::Str => {
                if lexeme.len() < 2 {
                    return Value::None;
                }

                // owned copy of the inter-quote bytes
                Value::Str(lexeme[1..lexeme.len() - 1].to_string())
            }
            _ => Value::None,
        }
    }

    /// Human readable name of this value's kind, for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::None => "none",
            Value::Int(_) | Value::Uint(_) => "int",
            Value::Float(_) => "float",
            Value::Char(_) => "char",
            Value::Str(_) => "string",
            Value::Bool(_) => "bool",
            Value::Overflow => "overflow",
        }
    }

    /// Do both values carry the same concrete kind?
    pub fn same_kind(&self, other: &Value) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }

    pub fn add(self, rhs: Value) -> Value {
        match (self, rhs) {
            (Value::Int(a), Value::Int(b)) => Value::Int(a.wrapping_add(b)),
            (Value::Uint(a), Value::Uint(b)) => Value::Uint(a.wrapping_add(b)),
            (Value::Float(a), Value::Float(b)) => Value::Float(a + b),
            (a, b) => mismatch("add", &a, &b),
        }
    }

    pub fn sub(self, rhs: Value) -> Value {
        match (self, rhs) {
            (Value::Int(a), Value::Int(b)) => Value::Int(a.wrapping_sub(b)),
            (Value::Uint(a), Value::Uint(b)) => Value::Uint(a.wrapping_sub(b)),
            (Value::Float(a), Value::Float(b)) => Value::Float(a - b),
            (a, b) => mismatch("sub", &a, &b),
        }
    }

    pub fn mul(self, rhs: Value) -> Value {
        match (self, rhs) {
            (Value::Int(a), Value::Int(b)) => Value::Int(a.wrapping_mul(b)),
            (Value::Uint(a), Value::Uint(b)) => Value::Uint(a.wrapping_mul(b)),
            (Value::Float(a), Value::Float(b)) => Value::Float(a * b),
            (a, b) => mismatch("mul", &a, &b),
        }
    }

    /// The caller guards against a zero divisor.
    pub fn div(self, rhs: Value) -> Value {
        match (self, rhs) {
            (Value::Int(a), Value::Int(b)) => Value::Int(a.wrapping_div(b)),
            (Value::Uint(a), Value::Uint(b)) => Value::Uint(a.wrapping_div(b)),
            (Value::Float(a), Value::Float(b)) => Value::Float(a / b),
            (a, b) => mismatch("div", &a, &b),
        }
    }

    /// Modulo is defined for int and uint only. The caller guards against a
    /// zero divisor.
    pub fn rem(self, rhs: Value) -> Value {
        match (self, rhs) {
            (Value::Int(a), Value::Int(b)) => Value::Int(a.wrapping_rem(b)),
            (Value::Uint(a), Value::Uint(b)) => Value::Uint(a.wrapping_rem(b)),
            (a, b) => mismatch("mod", &a, &b),
        }
    }

    /// Logical not, bool only.
    pub fn not(self) -> Value {
        match self {
            Value::Bool(b) => Value::Bool(!b),
            v => mismatch("not", &v, &Value::None),
        }
    }

    /// Equality is defined for every primitive kind, including bool and
    /// char, between values of the same kind.
    pub fn equals(&self, rhs: &Value) -> Value {
        match (self, rhs) {
            (Value::Int(a), Value::Int(b)) => Value::Bool(a == b),
            (Value::Uint(a), Value::Uint(b)) => Value::Bool(a == b),
            (Value::Float(a), Value::Float(b)) => Value::Bool(a == b),
            (Value::Char(a), Value::Char(b)) => Value::Bool(a == b),
            (Value::Str(a), Value::Str(b)) => Value::Bool(a == b),
            (Value::Bool(a), Value::Bool(b)) => Value::Bool(a == b),
            (a, b) => mismatch("equals", a, b),
        }
    }

    pub fn greater(&self, rhs: &Value) -> Value {
        match (self, rhs) {
            (Value::Int(a), Value::Int(b)) => Value::Bool(a > b),
            (Value::Uint(a), Value::Uint(b)) => Value::Bool(a > b),
            (Value::Float(a), Value::Float(b)) => Value::Bool(a > b),
            (Value::Char(a), Value::Char(b)) => Value::Bool(a > b),
            (a, b) => mismatch("greater", a, b),
        }
    }

    pub fn less(&self, rhs: &Value) -> Value {
        match (self, rhs) {
            (Value::Int(a), Value::Int(b)) => Value::Bool(a < b),
            (Value::Uint(a), Value::Uint(b)) => Value::Bool(a < b),
            (Value::Float(a), Value::Float(b)) => Value::Bool(a < b),
            (Value::Char(a), Value::Char(b)) => Value::Bool(a < b),
            (a, b) => mismatch("less", a, b),
        }
    }

    /// Logical and, bool × bool.
    pub fn logical_and(self, rhs: Value) -> Value {
        match (self, rhs) {
            (Value::Bool(a), Value::Bool(b)) => Value::Bool(a && b),
            (a, b) => mismatch("logical_and", &a, &b),
        }
    }

    /// Logical or, bool × bool.
    pub fn logical_or(self, rhs: Value) -> Value {
        match (self, rhs) {
            (Value::Bool(a), Value::Bool(b)) => Value::Bool(a || b),
            (a, b) => mismatch("logical_or", &a, &b),
        }
    }
}

fn mismatch(op: &str, lhs: &Value, rhs: &Value) -> ! {
    panic!("value operation `{op}` on mismatched kinds: {lhs:?} and {rhs:?}")
}

fn fits_signed(v: i64, bit_width: u8) -> bool {
    if bit_width == 0 || bit_width >= 64 {
        return true;
    }

    let max = (1i64 << (bit_width - 1)) - 1;
    let min = -(1i64 << (bit_width - 1));
    (min..=max).contains(&v)
}

fn fits_unsigned(v: u64, bit_width: u8) -> bool {
    if bit_width == 0 || bit_width >= 64 {
        return true;
    }

    v <= (1u64 << bit_width) - 1
}
