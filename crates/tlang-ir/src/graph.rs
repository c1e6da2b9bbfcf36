use slotmap::SlotMap;
use smol_str::SmolStr;

use crate::{
    address::{self, Address, BufferAddress},
    data_type::DataType,
    error::{IrError, Result},
    expr::Expr,
    node::{Children, Node, NodeId},
    opcode::Opcode,
    options::Options,
    sequence::{GraphId, Sequence},
};

/// Owns every node built during one construction session.
///
/// Nodes live as long as the graph does; handles ([`Expr`]) are indices into
/// it. Children always exist before their parents, so the graph is acyclic by
/// construction.
///
/// A graph is not meant to be shared between threads while it is being built.
/// Node numbering is per graph, so independent sessions get independent,
/// deterministic ids. Handles are only accepted by the graph that issued them;
/// a clone keeps accepting the handles of its original.
#[derive(Debug, Clone)]
pub struct Graph<A = BufferAddress> {
    id: GraphId,
    nodes: SlotMap<NodeId, Node<A>>,
    sequence: Sequence,
    options: Options,
}

impl<A: Address> Default for Graph<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Address> Graph<A> {
    pub fn new() -> Self {
        Self::with_options(Options::default())
    }

    pub fn with_options(options: Options) -> Self {
        Self {
            id: GraphId::fresh(),
            nodes: SlotMap::with_capacity_and_key(options.capacity),
            sequence: Sequence::new(),
            options,
        }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Restarts node numbering at zero.
    ///
    /// Only call this between independent construction sessions; ids handed
    /// out afterwards repeat the ones already in the graph.
    pub fn reset_counter(&mut self) {
        tracing::debug!(
            "Resetting node counter at {} ({} nodes allocated)",
            self.sequence.peek(),
            self.nodes.len()
        );
        self.sequence.reset();
    }

    /// Builds a node of any opcode from its children.
    ///
    /// Checks the child count and the operand shapes the rest of the graph
    /// relies on: a `store` writes through a `pointer`, and a `pointer` starts
    /// at an `addr`. Opcodes that carry an immediate (`cmp`, `index`, `imm`)
    /// are refused here and only come from their own builders.
    pub fn create(&mut self, opcode: Opcode, children: &[Expr]) -> Result<Expr> {
        let expected = opcode.arity();

        if !expected.accepts(children.len()) {
            return Err(IrError::ArityMismatch {
                opcode,
                expected,
                found: children.len(),
            });
        }

        self.check_operands(opcode, children)?;
        self.alloc(opcode, children)
    }

    fn check_operands(&self, opcode: Opcode, children: &[Expr]) -> Result<()> {
        match (opcode, children.first()) {
            (Opcode::Cmp, _) => Err(IrError::ImmediateRequired { opcode, builder: "cmp" }),
            (Opcode::Index, _) => Err(IrError::ImmediateRequired { opcode, builder: "index" }),
            (Opcode::Imm, _) => Err(IrError::ImmediateRequired { opcode, builder: "imm" }),
            (Opcode::Store, Some(pointer)) => self.expect_opcode(*pointer, &[Opcode::Pointer]),
            (Opcode::Pointer, Some(addr)) => self.expect_opcode(*addr, &[Opcode::Addr]),
            _ => Ok(()),
        }
    }

    pub(crate) fn alloc(&mut self, opcode: Opcode, children: &[Expr]) -> Result<Expr> {
        let children = children
            .iter()
            .map(|child| self.node_id(*child).map(|_| *child))
            .collect::<Result<Children>>()?;
        let id = self.sequence.next_id();

        tracing::trace!("Allocated node #{} `{}` with {} children", id, opcode, children.len());

        let node = Node::new(opcode, self.options.default_data_type, children, id);
        Ok(Expr::new(self.id, self.nodes.insert(node)))
    }

    pub(crate) fn node_id(&self, expr: Expr) -> Result<NodeId> {
        let id = expr.node_id().ok_or(IrError::EmptyExpr)?;

        if expr.graph_id() == Some(self.id) && self.nodes.contains_key(id) {
            Ok(id)
        } else {
            Err(IrError::UnknownNode)
        }
    }

    pub(crate) fn expect_opcode(&self, expr: Expr, expected: &'static [Opcode]) -> Result<()> {
        let found = self.opcode(expr)?;

        if expected.contains(&found) {
            Ok(())
        } else {
            Err(IrError::OpcodeMismatch { expected, found })
        }
    }

    pub fn contains(&self, expr: Expr) -> bool {
        self.node_id(expr).is_ok()
    }

    pub fn node(&self, expr: Expr) -> Result<&Node<A>> {
        let id = self.node_id(expr)?;
        Ok(&self.nodes[id])
    }

    pub fn node_mut(&mut self, expr: Expr) -> Result<&mut Node<A>> {
        let id = self.node_id(expr)?;
        Ok(&mut self.nodes[id])
    }

    /// All nodes in allocation order.
    pub fn iter(&self) -> impl Iterator<Item = (Expr, &Node<A>)> {
        self.nodes.iter().map(|(id, node)| (Expr::new(self.id, id), node))
    }

    pub fn opcode(&self, expr: Expr) -> Result<Opcode> {
        self.node(expr).map(Node::opcode)
    }

    pub fn data_type(&self, expr: Expr) -> Result<DataType> {
        self.node(expr).map(Node::data_type)
    }

    /// The `index`-th child of `expr`.
    pub fn child(&self, expr: Expr, index: usize) -> Result<Expr> {
        let node = self.node(expr)?;

        node.child(index).ok_or(IrError::ChildOutOfRange {
            index,
            len: node.arity(),
        })
    }

    /// Labels a node and hands the handle back for chaining.
    pub fn set_name(&mut self, expr: Expr, name: impl Into<SmolStr>) -> Result<Expr> {
        self.node_mut(expr)?.set_name(name);
        Ok(expr)
    }

    /// Replaces the scalar lanes bundled under `group`.
    pub fn set_members(&mut self, group: Expr, members: impl IntoIterator<Item = Expr>) -> Result<()> {
        let members = members
            .into_iter()
            .map(|member| self.node_id(member).map(|_| member))
            .collect::<Result<Vec<_>>>()?;

        self.node_mut(group)?.set_members(members);
        Ok(())
    }

    pub fn push_member(&mut self, group: Expr, member: Expr) -> Result<()> {
        self.node_id(member)?;
        self.node_mut(group)?.push_member(member);
        Ok(())
    }

    pub fn member_id(&self, group: Expr, expr: Expr) -> Result<Option<usize>> {
        Ok(self.node(group)?.member_id(expr))
    }

    /// The location of an `addr` node.
    pub fn address(&self, expr: Expr) -> Result<&A> {
        self.node(expr)?.address()
    }

    /// Binds a placeholder `addr` node to a location.
    pub fn bind_address(&mut self, expr: Expr, address: A) -> Result<()> {
        self.node_mut(expr)?.bind_address(address)
    }

    /// The location a `load` or `store` touches, two hops down through its pointer.
    pub fn resolved_address(&self, expr: Expr) -> Result<&A> {
        let node = self.node(expr)?;

        if !node.opcode().is_memory_access() {
            return Err(IrError::OpcodeMismatch {
                expected: &[Opcode::Load, Opcode::Store],
                found: node.opcode(),
            });
        }

        let pointer = node.child(0).ok_or(IrError::BrokenAddressChain {
            reason: "memory access has no operands",
        })?;
        let pointer = self.node(pointer)?;

        if pointer.opcode() != Opcode::Pointer {
            return Err(IrError::BrokenAddressChain {
                reason: "first operand is not a pointer",
            });
        }

        let addr = pointer.child(0).ok_or(IrError::BrokenAddressChain {
            reason: "pointer has no operands",
        })?;
        let addr = self.node(addr)?;

        if addr.opcode() != Opcode::Addr {
            return Err(IrError::BrokenAddressChain {
                reason: "pointer does not point at an addr node",
            });
        }

        addr.address()
    }

    /// Whether pointer `second` addresses the element right after pointer `first`.
    pub fn prior_to(&self, first: Expr, second: Expr) -> Result<bool> {
        let first = self.pointer_address(first)?;
        let second = self.pointer_address(second)?;
        Ok(address::prior_to(first, second))
    }

    fn pointer_address(&self, pointer: Expr) -> Result<&A> {
        self.expect_opcode(pointer, &[Opcode::Pointer])?;

        let addr = self.node(pointer)?.child(0).ok_or(IrError::BrokenAddressChain {
            reason: "pointer has no operands",
        })?;
        self.address(addr)
    }
}
