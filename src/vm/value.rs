// Patito - An educational compiler and quadruple VM for a Pascal-like language
// Copyright (C) 2026  Marcel Joachim Kloubert <marcel@kloubert.dev>
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Runtime values for the quadruple machine.
//!
//! The machine is forgiving by policy: operations coerce what they can
//! and substitute defaults instead of failing, because the compiler's
//! type checking already rejected every program that would actually
//! misuse a value.

/// A value stored in the machine's virtual memory.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
}

impl Value {
    /// Truthiness for GOTOF/GOTOT.
    pub fn truthy(&self) -> bool {
        match self {
            Value::Int(n) => *n != 0,
            Value::Float(f) => *f != 0.0,
            Value::Bool(b) => *b,
            Value::Str(s) => !s.is_empty(),
        }
    }

    /// Numeric view of the value.
    pub fn as_f64(&self) -> f64 {
        match self {
            Value::Int(n) => *n as f64,
            Value::Float(f) => *f,
            Value::Bool(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            Value::Str(_) => 0.0,
        }
    }

    fn both_ints(&self, other: &Value) -> Option<(i64, i64)> {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => Some((*a, *b)),
            _ => None,
        }
    }

    /// Addition with int/float promotion.
    pub fn add(&self, other: &Value) -> Value {
        match self.both_ints(other) {
            Some((a, b)) => Value::Int(a.wrapping_add(b)),
            None => Value::Float(self.as_f64() + other.as_f64()),
        }
    }

    /// Subtraction with int/float promotion.
    pub fn sub(&self, other: &Value) -> Value {
        match self.both_ints(other) {
            Some((a, b)) => Value::Int(a.wrapping_sub(b)),
            None => Value::Float(self.as_f64() - other.as_f64()),
        }
    }

    /// Multiplication with int/float promotion.
    pub fn mul(&self, other: &Value) -> Value {
        match self.both_ints(other) {
            Some((a, b)) => Value::Int(a.wrapping_mul(b)),
            None => Value::Float(self.as_f64() * other.as_f64()),
        }
    }

    /// Division always yields float, matching the semantic cube.
    /// Division by zero substitutes 0.0 and execution continues.
    pub fn div(&self, other: &Value) -> Value {
        let divisor = other.as_f64();
        if divisor == 0.0 {
            return Value::Float(0.0);
        }
        Value::Float(self.as_f64() / divisor)
    }

    /// Arithmetic negation.
    pub fn neg(&self) -> Value {
        match self {
            Value::Int(n) => Value::Int(n.wrapping_neg()),
            Value::Float(f) => Value::Float(-f),
            other => Value::Float(-other.as_f64()),
        }
    }

    /// Equality; strings and bools compare structurally, numerics by value.
    pub fn eq_value(&self, other: &Value) -> Value {
        let equal = match (self, other) {
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            _ => self.as_f64() == other.as_f64(),
        };
        Value::Bool(equal)
    }

    /// Inequality.
    pub fn ne_value(&self, other: &Value) -> Value {
        match self.eq_value(other) {
            Value::Bool(equal) => Value::Bool(!equal),
            _ => Value::Bool(false),
        }
    }

    /// Less-than over the numeric view.
    pub fn lt(&self, other: &Value) -> Value {
        Value::Bool(self.as_f64() < other.as_f64())
    }

    /// Less-or-equal over the numeric view.
    pub fn le(&self, other: &Value) -> Value {
        Value::Bool(self.as_f64() <= other.as_f64())
    }

    /// Greater-than over the numeric view.
    pub fn gt(&self, other: &Value) -> Value {
        Value::Bool(self.as_f64() > other.as_f64())
    }

    /// Greater-or-equal over the numeric view.
    pub fn ge(&self, other: &Value) -> Value {
        Value::Bool(self.as_f64() >= other.as_f64())
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            // Whole floats keep one decimal so 16.0 stays visibly float.
            Value::Float(v) if v.fract() == 0.0 && v.is_finite() => write!(f, "{:.1}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Str(s) => write!(f, "{}", s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truthiness() {
        assert!(Value::Int(3).truthy());
        assert!(!Value::Int(0).truthy());
        assert!(Value::Float(0.5).truthy());
        assert!(!Value::Float(0.0).truthy());
        assert!(Value::Bool(true).truthy());
        assert!(!Value::Bool(false).truthy());
        assert!(Value::Str("x".into()).truthy());
        assert!(!Value::Str("".into()).truthy());
    }

    #[test]
    fn test_int_arithmetic_stays_int() {
        assert_eq!(Value::Int(2).add(&Value::Int(3)), Value::Int(5));
        assert_eq!(Value::Int(2).sub(&Value::Int(3)), Value::Int(-1));
        assert_eq!(Value::Int(2).mul(&Value::Int(3)), Value::Int(6));
    }

    #[test]
    fn test_mixed_arithmetic_promotes() {
        assert_eq!(Value::Int(2).add(&Value::Float(0.5)), Value::Float(2.5));
        assert_eq!(Value::Float(1.5).mul(&Value::Int(2)), Value::Float(3.0));
    }

    #[test]
    fn test_division_always_float() {
        assert_eq!(Value::Int(7).div(&Value::Int(2)), Value::Float(3.5));
        assert_eq!(Value::Int(6).div(&Value::Int(3)), Value::Float(2.0));
    }

    #[test]
    fn test_division_by_zero_substitutes_default() {
        assert_eq!(Value::Int(7).div(&Value::Int(0)), Value::Float(0.0));
        assert_eq!(Value::Float(1.0).div(&Value::Float(0.0)), Value::Float(0.0));
    }

    #[test]
    fn test_comparisons() {
        assert_eq!(Value::Int(10).gt(&Value::Int(2)), Value::Bool(true));
        assert_eq!(Value::Int(2).ge(&Value::Float(2.0)), Value::Bool(true));
        assert_eq!(Value::Int(1).lt(&Value::Int(1)), Value::Bool(false));
        assert_eq!(Value::Int(1).le(&Value::Int(1)), Value::Bool(true));
        assert_eq!(
            Value::Str("a".into()).eq_value(&Value::Str("a".into())),
            Value::Bool(true)
        );
        assert_eq!(Value::Int(1).ne_value(&Value::Int(2)), Value::Bool(true));
    }

    #[test]
    fn test_negation() {
        assert_eq!(Value::Int(5).neg(), Value::Int(-5));
        assert_eq!(Value::Float(2.5).neg(), Value::Float(-2.5));
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Int(42).to_string(), "42");
        assert_eq!(Value::Float(16.0).to_string(), "16.0");
        assert_eq!(Value::Float(2.5).to_string(), "2.5");
        assert_eq!(Value::Bool(true).to_string(), "true");
        assert_eq!(Value::Str("hi".into()).to_string(), "hi");
    }
}
