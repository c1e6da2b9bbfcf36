use itertools::Itertools;
use miette::Diagnostic;
use thiserror::Error;

use crate::{
    data_type::DataType,
    opcode::{Arity, Opcode},
};

pub type Result<T> = std::result::Result<T, IrError>;

/// Misuse of the graph builder.
///
/// None of these are transient: once one is returned, the graph under
/// construction should be discarded.
#[derive(Debug, Clone, PartialEq, Error, Diagnostic)]
pub enum IrError {
    #[error("Type mismatch in `{op}`: left operand is {lhs}, right operand is {rhs}")]
    #[diagnostic(code(tlang_ir::type_mismatch))]
    TypeMismatch {
        op: Opcode,
        lhs: DataType,
        rhs: DataType,
    },

    #[error("Expected a `{}` node, found `{found}`", .expected.iter().join("` or `"))]
    #[diagnostic(code(tlang_ir::opcode_mismatch))]
    OpcodeMismatch {
        expected: &'static [Opcode],
        found: Opcode,
    },

    #[error("`{opcode}` takes {expected} children, got {found}")]
    #[diagnostic(code(tlang_ir::arity_mismatch))]
    ArityMismatch {
        opcode: Opcode,
        expected: Arity,
        found: usize,
    },

    #[error("Child index {index} is out of range for a node with {len} children")]
    #[diagnostic(code(tlang_ir::child_out_of_range))]
    ChildOutOfRange { index: usize, len: usize },

    #[error("Expression does not reference a node")]
    #[diagnostic(code(tlang_ir::empty_expr))]
    EmptyExpr,

    #[error("Expression references a node that is not part of this graph")]
    #[diagnostic(code(tlang_ir::unknown_node))]
    UnknownNode,

    #[error("Broken pointer chain: {reason}")]
    #[diagnostic(code(tlang_ir::broken_address_chain))]
    BrokenAddressChain { reason: &'static str },

    #[error("Address node has not been bound to a location")]
    #[diagnostic(code(tlang_ir::unbound_address))]
    UnboundAddress,

    #[error("`{opcode}` nodes carry an immediate and are built with `Graph::{builder}`")]
    #[diagnostic(code(tlang_ir::immediate_required))]
    ImmediateRequired {
        opcode: Opcode,
        builder: &'static str,
    },

    #[error("Expected a {expected} immediate, found {found}")]
    #[diagnostic(code(tlang_ir::immediate_mismatch))]
    ImmediateMismatch {
        expected: &'static str,
        found: &'static str,
    },
}
