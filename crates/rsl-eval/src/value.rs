//! Runtime values.
//!
//! RSL is dynamically typed with five runtime types. Arithmetic and
//! relational operators require both operands to have the same type;
//! there is no implicit int/float conversion.

use rsl_types::ast::BinOp;
use std::fmt;

/// A runtime value. `Void` only arises from functions without a
/// `return expr;` and is rejected in expression position.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Void,
    Bool(bool),
    Int(i32),
    Float(f32),
    Str(String),
}

/// Operator failures that do not depend on a source location.
/// The evaluator attaches the current line when converting these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OpError {
    DivisionByZero,
    Unsupported {
        op: BinOp,
        type_name: &'static str,
    },
}

impl Value {
    /// Lower-case type name used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Void => "void",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
        }
    }

    pub fn is_void(&self) -> bool {
        matches!(self, Value::Void)
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Float(_))
    }

    /// Applies an arithmetic operator. Operands must already be of the
    /// same numeric type; integer arithmetic wraps on overflow.
    pub(crate) fn arith(op: BinOp, a: &Value, b: &Value) -> Result<Value, OpError> {
        match (a, b) {
            (Value::Int(x), Value::Int(y)) => {
                let v = match op {
                    BinOp::Add => x.wrapping_add(*y),
                    BinOp::Sub => x.wrapping_sub(*y),
                    BinOp::Mul => x.wrapping_mul(*y),
                    BinOp::Div => {
                        if *y == 0 {
                            return Err(OpError::DivisionByZero);
                        }
                        x.wrapping_div(*y)
                    }
                    BinOp::Mod => {
                        if *y == 0 {
                            return Err(OpError::DivisionByZero);
                        }
                        x.wrapping_rem(*y)
                    }
                    _ => {
                        return Err(OpError::Unsupported {
                            op,
                            type_name: "int",
                        })
                    }
                };
                Ok(Value::Int(v))
            }
            (Value::Float(x), Value::Float(y)) => {
                let v = match op {
                    BinOp::Add => x + y,
                    BinOp::Sub => x - y,
                    BinOp::Mul => x * y,
                    BinOp::Div => {
                        if *y == 0.0 {
                            return Err(OpError::DivisionByZero);
                        }
                        x / y
                    }
                    _ => {
                        return Err(OpError::Unsupported {
                            op,
                            type_name: "float",
                        })
                    }
                };
                Ok(Value::Float(v))
            }
            _ => Err(OpError::Unsupported {
                op,
                type_name: a.type_name(),
            }),
        }
    }

    /// Applies a relational operator to two operands of the same type.
    /// Strings and booleans only support `==` and `!=`.
    pub(crate) fn relational(op: BinOp, a: &Value, b: &Value) -> Result<Value, OpError> {
        let result = match (a, b) {
            (Value::Int(x), Value::Int(y)) => match op {
                BinOp::Eq => x == y,
                BinOp::NotEq => x != y,
                BinOp::Less => x < y,
                BinOp::LessEq => x <= y,
                BinOp::Greater => x > y,
                BinOp::GreaterEq => x >= y,
                _ => {
                    return Err(OpError::Unsupported {
                        op,
                        type_name: "int",
                    })
                }
            },
            (Value::Float(x), Value::Float(y)) => match op {
                BinOp::Eq => x == y,
                BinOp::NotEq => x != y,
                BinOp::Less => x < y,
                BinOp::LessEq => x <= y,
                BinOp::Greater => x > y,
                BinOp::GreaterEq => x >= y,
                _ => {
                    return Err(OpError::Unsupported {
                        op,
                        type_name: "float",
                    })
                }
            },
            (Value::Str(x), Value::Str(y)) => match op {
                BinOp::Eq => x == y,
                BinOp::NotEq => x != y,
                _ => {
                    return Err(OpError::Unsupported {
                        op,
                        type_name: "string",
                    })
                }
            },
            (Value::Bool(x), Value::Bool(y)) => match op {
                BinOp::Eq => x == y,
                BinOp::NotEq => x != y,
                _ => {
                    return Err(OpError::Unsupported {
                        op,
                        type_name: "bool",
                    })
                }
            },
            _ => {
                return Err(OpError::Unsupported {
                    op,
                    type_name: a.type_name(),
                })
            }
        };
        Ok(Value::Bool(result))
    }
}

/// Renders a float with at least one decimal digit, so whole values
/// print as `25.0` rather than `25`.
pub(crate) fn fmt_float(v: f32) -> String {
    if v.is_finite() && v.fract() == 0.0 {
        format!("{v:.1}")
    } else {
        format!("{v}")
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Void => write!(f, "void"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{}", fmt_float(*v)),
            Value::Str(s) => write!(f, "{s}"),
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Tests
// ══════════════════════════════════════════════════════════════════════════════
