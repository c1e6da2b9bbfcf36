//! Expression graph IR for a SIMD array compute compiler.
//!
//! Programs are built as a DAG of [`Node`]s owned by a [`Graph`] and referenced
//! through copyable [`Expr`] handles. Builders check operand types and shapes as
//! they go, so a graph that was built without errors is well formed.
//!
//! ## Example
//!
//! ```rust
//! use tlang_ir::{BufferAddress, DataType, Expr, Graph, Opcode};
//!
//! # fn main() -> tlang_ir::Result<()> {
//! let mut graph: Graph = Graph::new();
//!
//! // y[0] = x[0] * 2.0
//! let x = graph.addr(BufferAddress::new("x", DataType::F32, 0))?;
//! let y = graph.addr(BufferAddress::new("y", DataType::F32, 0))?;
//! let x = graph.pointer(x)?;
//! let y = graph.pointer(y)?;
//! let two = graph.imm(2.0f32)?;
//! let scaled = graph.mul(x, two)?;
//!
//! let mut root = Expr::empty();
//! let store = graph.store(&mut root, y, scaled)?;
//!
//! assert_eq!(graph.opcode(root)?, Opcode::Combine);
//! assert_eq!(graph.resolved_address(store)?.buffer(), "y");
//! println!("{}", tlang_ir::dump_graph(&graph, root)?);
//! # Ok(())
//! # }
//! ```
mod address;
mod builder;
mod data_type;
mod debug;
mod error;
mod expr;
mod graph;
mod immediate;
mod node;
mod opcode;
mod options;
mod sequence;
mod visitor;

pub use address::Address;
pub use address::BufferAddress;
pub use address::prior_to;
pub use data_type::DataType;
pub use data_type::NativeType;
pub use data_type::data_type_of;
pub use debug::dump_graph;
pub use debug::dump_graph_sequential;
pub use error::IrError;
pub use error::Result;
pub use expr::Expr;
pub use graph::Graph;
pub use immediate::Immediate;
pub use node::Node;
pub use node::NodeId;
pub use opcode::Arity;
pub use opcode::BinaryOp;
pub use opcode::CmpKind;
pub use opcode::Opcode;
pub use options::Options;
pub use sequence::GraphId;
pub use sequence::Sequence;
pub use visitor::Order;
pub use visitor::Visitor;
