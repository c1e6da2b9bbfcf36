use std::fmt;

use smallvec::SmallVec;
use smol_str::SmolStr;

use crate::{
    address::Address,
    data_type::DataType,
    error::{IrError, Result},
    expr::Expr,
    immediate::Immediate,
    opcode::{CmpKind, Opcode},
};

slotmap::new_key_type! { pub struct NodeId; }

pub(crate) type Children = SmallVec<[Expr; 4]>;

/// A vertex of the expression graph.
///
/// Opcode and children are fixed once the node is built. Data type, name,
/// vectorization group and replication factor stay writable so the builder
/// can fill them in after construction.
#[derive(Debug, Clone)]
pub struct Node<A> {
    opcode: Opcode,
    data_type: DataType,
    children: Children,
    members: Vec<Expr>,
    immediate: Option<Immediate>,
    address: Option<A>,
    id: u32,
    num_groups: usize,
    is_vectorized: bool,
    name: SmolStr,
}

impl<A: Address> Node<A> {
    pub(crate) fn new(opcode: Opcode, data_type: DataType, children: Children, id: u32) -> Self {
        Self {
            opcode,
            data_type,
            children,
            members: Vec::new(),
            immediate: None,
            address: None,
            id,
            num_groups: 1,
            is_vectorized: false,
            name: SmolStr::default(),
        }
    }

    #[inline(always)]
    pub fn opcode(&self) -> Opcode {
        self.opcode
    }

    pub fn opcode_name(&self) -> &'static str {
        self.opcode.name()
    }

    #[inline(always)]
    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    pub fn data_type_name(&self) -> &'static str {
        self.data_type.name()
    }

    pub fn set_data_type(&mut self, data_type: DataType) {
        self.data_type = data_type;
    }

    /// Construction-order number assigned by the graph's sequence.
    #[inline(always)]
    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn set_name(&mut self, name: impl Into<SmolStr>) {
        self.name = name.into();
    }

    #[inline(always)]
    pub fn arity(&self) -> usize {
        self.children.len()
    }

    pub fn children(&self) -> impl DoubleEndedIterator<Item = Expr> + ExactSizeIterator + '_ {
        self.children.iter().copied()
    }

    pub fn child(&self, index: usize) -> Option<Expr> {
        self.children.get(index).copied()
    }

    pub(crate) fn push_child(&mut self, child: Expr) {
        self.children.push(child);
    }

    pub fn members(&self) -> &[Expr] {
        &self.members
    }

    pub(crate) fn set_members(&mut self, members: Vec<Expr>) {
        self.members = members;
    }

    pub(crate) fn push_member(&mut self, member: Expr) {
        self.members.push(member);
    }

    /// Number of scalar lanes bundled into this node's vector group.
    #[inline(always)]
    pub fn group_size(&self) -> usize {
        self.members.len()
    }

    #[inline(always)]
    pub fn num_groups(&self) -> usize {
        self.num_groups
    }

    pub fn num_groups_mut(&mut self) -> &mut usize {
        &mut self.num_groups
    }

    /// Total scalar lanes this node stands for.
    #[inline(always)]
    pub fn vv_width(&self) -> usize {
        self.group_size() * self.num_groups
    }

    /// Lane index of `expr` within this node's group, by handle identity.
    pub fn member_id(&self, expr: Expr) -> Option<usize> {
        self.members.iter().position(|member| *member == expr)
    }

    pub fn is_vectorized(&self) -> bool {
        self.is_vectorized
    }

    pub fn set_vectorized(&mut self, is_vectorized: bool) {
        self.is_vectorized = is_vectorized;
    }

    pub fn immediate(&self) -> Option<Immediate> {
        self.immediate
    }

    pub(crate) fn set_immediate(&mut self, immediate: Immediate) {
        self.immediate = Some(immediate);
    }

    pub fn immediate_int(&self) -> Result<i64> {
        self.immediate
            .and_then(|immediate| immediate.as_int())
            .ok_or_else(|| self.immediate_mismatch("int"))
    }

    pub fn immediate_float(&self) -> Result<f64> {
        self.immediate
            .and_then(|immediate| immediate.as_float())
            .ok_or_else(|| self.immediate_mismatch("float"))
    }

    pub fn cmp_kind(&self) -> Result<CmpKind> {
        self.immediate
            .and_then(|immediate| immediate.as_cmp())
            .ok_or_else(|| self.immediate_mismatch("cmp"))
    }

    fn immediate_mismatch(&self, expected: &'static str) -> IrError {
        IrError::ImmediateMismatch {
            expected,
            found: self.immediate.as_ref().map_or("no", Immediate::kind_name),
        }
    }

    /// The location of an `addr` node.
    pub fn address(&self) -> Result<&A> {
        if self.opcode != Opcode::Addr {
            return Err(IrError::OpcodeMismatch {
                expected: &[Opcode::Addr],
                found: self.opcode,
            });
        }

        self.address.as_ref().ok_or(IrError::UnboundAddress)
    }

    pub(crate) fn bind_address(&mut self, address: A) -> Result<()> {
        if self.opcode != Opcode::Addr {
            return Err(IrError::OpcodeMismatch {
                expected: &[Opcode::Addr],
                found: self.opcode,
            });
        }

        self.address = Some(address);
        Ok(())
    }
}

impl<A: Address> fmt::Display for Node<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}<{}>", self.opcode, self.data_type)?;

        if let Some(immediate) = &self.immediate {
            write!(f, " [{}]", immediate)?;
        }

        if !self.name.is_empty() {
            write!(f, " \"{}\"", self.name)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use slotmap::SlotMap;

    use super::*;
    use crate::{address::BufferAddress, sequence::GraphId};

    fn create_test_node(opcode: Opcode) -> Node<BufferAddress> {
        Node::new(opcode, DataType::F32, Children::new(), 0)
    }

    #[test]
    fn test_new_defaults() {
        let node = create_test_node(Opcode::Add);
        assert_eq!(node.data_type(), DataType::F32);
        assert_eq!(node.num_groups(), 1);
        assert_eq!(node.group_size(), 0);
        assert!(!node.is_vectorized());
        assert_eq!(node.name(), "");
        assert_eq!(node.immediate(), None);
    }

    #[test]
    fn test_vv_width() {
        let graph = GraphId::fresh();
        let mut ids: SlotMap<NodeId, ()> = SlotMap::default();
        let mut node = create_test_node(Opcode::Add);
        node.set_members((0..4).map(|_| Expr::new(graph, ids.insert(()))).collect());
        *node.num_groups_mut() = 2;

        assert_eq!(node.group_size(), 4);
        assert_eq!(node.num_groups(), 2);
        assert_eq!(node.vv_width(), 8);
    }

    #[test]
    fn test_member_id() {
        let graph = GraphId::fresh();
        let mut ids: SlotMap<NodeId, ()> = SlotMap::default();
        let lanes = (0..3).map(|_| Expr::new(graph, ids.insert(()))).collect::<Vec<_>>();
        let fresh = Expr::new(graph, ids.insert(()));
        let mut node = create_test_node(Opcode::Load);
        node.set_members(lanes.clone());

        assert_eq!(node.member_id(lanes[0]), Some(0));
        assert_eq!(node.member_id(lanes[1]), Some(1));
        assert_eq!(node.member_id(lanes[2]), Some(2));
        assert_eq!(node.member_id(fresh), None);
    }

    #[rstest]
    #[case(Some(Immediate::Int(9)), Ok(9))]
    #[case(Some(Immediate::Float(1.0)), Err(IrError::ImmediateMismatch { expected: "int", found: "float" }))]
    #[case(None, Err(IrError::ImmediateMismatch { expected: "int", found: "no" }))]
    fn test_immediate_int(#[case] immediate: Option<Immediate>, #[case] expected: Result<i64>) {
        let mut node = create_test_node(Opcode::Imm);
        if let Some(immediate) = immediate {
            node.set_immediate(immediate);
        }
        assert_eq!(node.immediate_int(), expected);
    }

    #[test]
    fn test_cmp_kind() {
        let mut node = create_test_node(Opcode::Cmp);
        node.set_immediate(Immediate::Cmp(CmpKind::Le));
        assert_eq!(node.cmp_kind(), Ok(CmpKind::Le));
        assert!(node.immediate_float().is_err());
    }

    #[test]
    fn test_address_requires_addr_opcode() {
        let mut node = create_test_node(Opcode::Load);
        assert_eq!(
            node.address(),
            Err(IrError::OpcodeMismatch {
                expected: &[Opcode::Addr],
                found: Opcode::Load
            })
        );
        assert!(node.bind_address(BufferAddress::new("x", DataType::F32, 0)).is_err());
    }

    #[test]
    fn test_address_unbound_then_bound() {
        let mut node = create_test_node(Opcode::Addr);
        assert_eq!(node.address(), Err(IrError::UnboundAddress));

        let address = BufferAddress::new("x", DataType::F32, 3);
        node.bind_address(address.clone()).unwrap();
        assert_eq!(node.address(), Ok(&address));
    }

    #[rstest]
    #[case(Opcode::Add, None, "", "add<float32>")]
    #[case(Opcode::Index, Some(Immediate::Int(4)), "", "index<float32> [4]")]
    #[case(Opcode::Cmp, Some(Immediate::Cmp(CmpKind::Lt)), "mask", "cmp<float32> [lt] \"mask\"")]
    fn test_display(
        #[case] opcode: Opcode,
        #[case] immediate: Option<Immediate>,
        #[case] name: &str,
        #[case] expected: &str,
    ) {
        let mut node = create_test_node(opcode);
        if let Some(immediate) = immediate {
            node.set_immediate(immediate);
        }
        node.set_name(name);
        assert_eq!(node.to_string(), expected);
    }
}
