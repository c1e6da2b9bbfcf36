use std::fmt;

use crate::opcode::CmpKind;

/// Scalar payload attached to `imm`, `index` and `cmp` nodes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Immediate {
    Int(i64),
    Float(f64),
    Cmp(CmpKind),
}

impl Immediate {
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Immediate::Int(_) => "int",
            Immediate::Float(_) => "float",
            Immediate::Cmp(_) => "cmp",
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Immediate::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Immediate::Float(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_cmp(&self) -> Option<CmpKind> {
        match self {
            Immediate::Cmp(kind) => Some(*kind),
            _ => None,
        }
    }
}

impl fmt::Display for Immediate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Immediate::Int(value) => write!(f, "{}", value),
            Immediate::Float(value) => write!(f, "{:?}", value),
            Immediate::Cmp(kind) => write!(f, "{}", kind),
        }
    }
}
