use crate::{
    address::Address,
    data_type::{DataType, NativeType},
    error::{IrError, Result},
    expr::Expr,
    graph::Graph,
    immediate::Immediate,
    opcode::{BinaryOp, CmpKind, Opcode},
};

impl<A: Address> Graph<A> {
    /// Wraps a `pointer` node in an implicit `load`; anything else passes through.
    pub fn load_if_pointer(&mut self, expr: Expr) -> Result<Expr> {
        if self.opcode(expr)? == Opcode::Pointer {
            tracing::debug!("Dereferencing pointer #{} implicitly", self.node(expr)?.id());
            self.load(expr)
        } else {
            Ok(expr)
        }
    }

    /// Builds a two-operand node.
    ///
    /// Both operands must carry the same data type. Pointer operands are loaded
    /// first, and the result takes the type of the right-hand operand.
    pub fn binary(&mut self, op: BinaryOp, lhs: Expr, rhs: Expr) -> Result<Expr> {
        let lhs_type = self.data_type(lhs)?;
        let rhs_type = self.data_type(rhs)?;

        if lhs_type != rhs_type {
            return Err(IrError::TypeMismatch {
                op: op.opcode(),
                lhs: lhs_type,
                rhs: rhs_type,
            });
        }

        let lhs = self.load_if_pointer(lhs)?;
        let rhs = self.load_if_pointer(rhs)?;
        let expr = self.alloc(op.opcode(), &[lhs, rhs])?;
        self.node_mut(expr)?.set_data_type(rhs_type);

        Ok(expr)
    }

    pub fn mul(&mut self, lhs: Expr, rhs: Expr) -> Result<Expr> {
        self.binary(BinaryOp::Mul, lhs, rhs)
    }

    pub fn add(&mut self, lhs: Expr, rhs: Expr) -> Result<Expr> {
        self.binary(BinaryOp::Add, lhs, rhs)
    }

    pub fn sub(&mut self, lhs: Expr, rhs: Expr) -> Result<Expr> {
        self.binary(BinaryOp::Sub, lhs, rhs)
    }

    pub fn div(&mut self, lhs: Expr, rhs: Expr) -> Result<Expr> {
        self.binary(BinaryOp::Div, lhs, rhs)
    }

    /// Remainder, built as a `mod` node.
    pub fn rem(&mut self, lhs: Expr, rhs: Expr) -> Result<Expr> {
        self.binary(BinaryOp::Mod, lhs, rhs)
    }

    pub fn max(&mut self, lhs: Expr, rhs: Expr) -> Result<Expr> {
        self.binary(BinaryOp::Max, lhs, rhs)
    }

    pub fn min(&mut self, lhs: Expr, rhs: Expr) -> Result<Expr> {
        self.binary(BinaryOp::Min, lhs, rhs)
    }

    /// Bitwise and.
    pub fn land(&mut self, lhs: Expr, rhs: Expr) -> Result<Expr> {
        self.binary(BinaryOp::Land, lhs, rhs)
    }

    pub fn shr(&mut self, lhs: Expr, rhs: Expr) -> Result<Expr> {
        self.binary(BinaryOp::Shr, lhs, rhs)
    }

    pub fn shl(&mut self, lhs: Expr, rhs: Expr) -> Result<Expr> {
        self.binary(BinaryOp::Shl, lhs, rhs)
    }

    pub fn load(&mut self, addr: Expr) -> Result<Expr> {
        self.alloc(Opcode::Load, &[addr])
    }

    /// Appends a `store` of `value` through `pointer` to the combine node behind `root`.
    ///
    /// An empty `root` is first pointed at a fresh `combine` node, so repeated
    /// calls on one handle collect every write under a single root, in call
    /// order. Returns the new `store` node.
    pub fn store(&mut self, root: &mut Expr, pointer: Expr, value: Expr) -> Result<Expr> {
        self.expect_opcode(pointer, &[Opcode::Pointer])?;
        self.node_id(value)?;

        if root.is_empty() {
            *root = self.alloc(Opcode::Combine, &[])?;
            tracing::debug!("Created combine root #{}", self.node(*root)?.id());
        } else {
            self.expect_opcode(*root, &[Opcode::Combine])?;
        }

        let store = self.alloc(Opcode::Store, &[pointer, value])?;
        self.node_mut(*root)?.push_child(store);

        Ok(store)
    }

    pub fn select(&mut self, mask: Expr, on_true: Expr, on_false: Expr) -> Result<Expr> {
        self.alloc(Opcode::Select, &[mask, on_true, on_false])
    }

    pub fn cmp(&mut self, kind: CmpKind, lhs: Expr, rhs: Expr) -> Result<Expr> {
        let expr = self.alloc(Opcode::Cmp, &[lhs, rhs])?;
        self.node_mut(expr)?.set_immediate(Immediate::Cmp(kind));
        Ok(expr)
    }

    pub fn cmp_eq(&mut self, lhs: Expr, rhs: Expr) -> Result<Expr> {
        self.cmp(CmpKind::Eq, lhs, rhs)
    }

    pub fn cmp_ne(&mut self, lhs: Expr, rhs: Expr) -> Result<Expr> {
        self.cmp(CmpKind::Ne, lhs, rhs)
    }

    pub fn cmp_le(&mut self, lhs: Expr, rhs: Expr) -> Result<Expr> {
        self.cmp(CmpKind::Le, lhs, rhs)
    }

    pub fn cmp_lt(&mut self, lhs: Expr, rhs: Expr) -> Result<Expr> {
        self.cmp(CmpKind::Lt, lhs, rhs)
    }

    /// Integer literal node of type `int32`.
    pub fn index(&mut self, value: i32) -> Result<Expr> {
        let expr = self.alloc(Opcode::Index, &[])?;
        let node = self.node_mut(expr)?;
        node.set_immediate(Immediate::Int(i64::from(value)));
        node.set_data_type(DataType::I32);
        Ok(expr)
    }

    /// A storage location to be bound later with [`Graph::bind_address`].
    pub fn placeholder(&mut self) -> Result<Expr> {
        self.alloc(Opcode::Addr, &[])
    }

    pub fn addr(&mut self, address: A) -> Result<Expr> {
        let expr = self.placeholder()?;
        self.bind_address(expr, address)?;
        Ok(expr)
    }

    /// Constant node typed after the native type of `value`.
    pub fn imm<T: NativeType>(&mut self, value: T) -> Result<Expr> {
        let expr = self.alloc(Opcode::Imm, &[])?;
        let node = self.node_mut(expr)?;
        node.set_immediate(value.into_immediate());
        node.set_data_type(T::DATA_TYPE);
        Ok(expr)
    }

    pub fn pointer(&mut self, addr: Expr) -> Result<Expr> {
        self.expect_opcode(addr, &[Opcode::Addr])?;
        self.alloc(Opcode::Pointer, &[addr])
    }

    /// Pointer to `addr` displaced by a runtime `index`.
    pub fn pointer_indexed(&mut self, addr: Expr, index: Expr) -> Result<Expr> {
        self.expect_opcode(addr, &[Opcode::Addr])?;
        self.alloc(Opcode::Pointer, &[addr, index])
    }

    pub fn floor(&mut self, expr: Expr) -> Result<Expr> {
        let data_type = self.data_type(expr)?;
        let operand = self.load_if_pointer(expr)?;
        let floor = self.alloc(Opcode::Floor, &[operand])?;
        self.node_mut(floor)?.set_data_type(data_type);
        Ok(floor)
    }

    pub fn cast(&mut self, expr: Expr, data_type: DataType) -> Result<Expr> {
        let operand = self.load_if_pointer(expr)?;
        let cast = self.alloc(Opcode::Cast, &[operand])?;
        self.node_mut(cast)?.set_data_type(data_type);
        Ok(cast)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::address::BufferAddress;

    fn x(offset: i64) -> BufferAddress {
        BufferAddress::new("x", DataType::F32, offset)
    }

    fn pointer_to(graph: &mut Graph, address: BufferAddress) -> Expr {
        let addr = graph.addr(address).unwrap();
        graph.pointer(addr).unwrap()
    }

    #[rstest]
    #[case(BinaryOp::Mul, Opcode::Mul)]
    #[case(BinaryOp::Add, Opcode::Add)]
    #[case(BinaryOp::Sub, Opcode::Sub)]
    #[case(BinaryOp::Div, Opcode::Div)]
    #[case(BinaryOp::Mod, Opcode::Mod)]
    #[case(BinaryOp::Max, Opcode::Max)]
    #[case(BinaryOp::Min, Opcode::Min)]
    #[case(BinaryOp::Land, Opcode::Land)]
    #[case(BinaryOp::Shr, Opcode::Shr)]
    #[case(BinaryOp::Shl, Opcode::Shl)]
    fn test_binary(#[case] op: BinaryOp, #[case] expected: Opcode) {
        let mut graph: Graph = Graph::new();
        let a = graph.index(1).unwrap();
        let b = graph.index(2).unwrap();
        let expr = graph.binary(op, a, b).unwrap();

        let node = graph.node(expr).unwrap();
        assert_eq!(node.opcode(), expected);
        assert_eq!(node.data_type(), DataType::I32);
        assert_eq!(node.children().collect::<Vec<_>>(), vec![a, b]);
    }

    #[test]
    fn test_binary_type_mismatch() {
        let mut graph: Graph = Graph::new();
        let a = graph.imm(1.5f32).unwrap();
        let b = graph.index(2).unwrap();
        let before = graph.len();

        assert_eq!(
            graph.add(a, b),
            Err(IrError::TypeMismatch {
                op: Opcode::Add,
                lhs: DataType::F32,
                rhs: DataType::I32
            })
        );
        assert_eq!(graph.len(), before);
    }

    #[test]
    fn test_binary_loads_pointers() {
        let mut graph: Graph = Graph::new();
        let p = pointer_to(&mut graph, x(0));
        let c = graph.imm(2.0f32).unwrap();
        let product = graph.mul(p, c).unwrap();

        let lhs = graph.child(product, 0).unwrap();
        assert_eq!(graph.opcode(lhs), Ok(Opcode::Load));
        assert_eq!(graph.child(lhs, 0), Ok(p));
        assert_eq!(graph.child(product, 1), Ok(c));
    }

    #[test]
    fn test_load_if_pointer_passes_through() {
        let mut graph: Graph = Graph::new();
        let i = graph.index(3).unwrap();
        assert_eq!(graph.load_if_pointer(i), Ok(i));
    }

    #[test]
    fn test_store_accumulates_under_combine() {
        let mut graph: Graph = Graph::new();
        let mut root = Expr::empty();
        let p0 = pointer_to(&mut graph, x(0));
        let p1 = pointer_to(&mut graph, x(1));
        let v = graph.imm(1.0f32).unwrap();

        let s0 = graph.store(&mut root, p0, v).unwrap();
        let combine = root;
        let s1 = graph.store(&mut root, p1, v).unwrap();

        assert_eq!(root, combine);
        assert_eq!(graph.opcode(root), Ok(Opcode::Combine));
        assert_eq!(graph.node(root).unwrap().children().collect::<Vec<_>>(), vec![s0, s1]);
        assert_eq!(graph.child(s0, 0), Ok(p0));
        assert_eq!(graph.child(s0, 1), Ok(v));
        assert!(graph.node(root).unwrap().id() < graph.node(s0).unwrap().id());
    }

    #[test]
    fn test_store_requires_pointer() {
        let mut graph: Graph = Graph::new();
        let mut root = Expr::empty();
        let v = graph.imm(1.0f32).unwrap();

        assert_eq!(
            graph.store(&mut root, v, v),
            Err(IrError::OpcodeMismatch {
                expected: &[Opcode::Pointer],
                found: Opcode::Imm
            })
        );
        assert!(root.is_empty());
    }

    #[test]
    fn test_store_requires_combine_root() {
        let mut graph: Graph = Graph::new();
        let p = pointer_to(&mut graph, x(0));
        let v = graph.imm(1.0f32).unwrap();
        let mut root = v;

        assert_eq!(
            graph.store(&mut root, p, v),
            Err(IrError::OpcodeMismatch {
                expected: &[Opcode::Combine],
                found: Opcode::Imm
            })
        );
    }

    #[rstest]
    #[case(CmpKind::Eq)]
    #[case(CmpKind::Ne)]
    #[case(CmpKind::Le)]
    #[case(CmpKind::Lt)]
    fn test_cmp(#[case] kind: CmpKind) {
        let mut graph: Graph = Graph::new();
        let a = graph.index(0).unwrap();
        let b = graph.index(1).unwrap();
        let expr = match kind {
            CmpKind::Eq => graph.cmp_eq(a, b),
            CmpKind::Ne => graph.cmp_ne(a, b),
            CmpKind::Le => graph.cmp_le(a, b),
            CmpKind::Lt => graph.cmp_lt(a, b),
        }
        .unwrap();

        let node = graph.node(expr).unwrap();
        assert_eq!(node.opcode(), Opcode::Cmp);
        assert_eq!(node.cmp_kind(), Ok(kind));
        assert_eq!(node.arity(), 2);
    }

    #[test]
    fn test_select() {
        let mut graph: Graph = Graph::new();
        let a = graph.index(0).unwrap();
        let b = graph.index(1).unwrap();
        let mask = graph.cmp_lt(a, b).unwrap();
        let expr = graph.select(mask, a, b).unwrap();
        assert_eq!(graph.node(expr).unwrap().children().collect::<Vec<_>>(), vec![mask, a, b]);
    }

    #[test]
    fn test_index() {
        let mut graph: Graph = Graph::new();
        let expr = graph.index(-7).unwrap();
        let node = graph.node(expr).unwrap();
        assert_eq!(node.opcode(), Opcode::Index);
        assert_eq!(node.data_type(), DataType::I32);
        assert_eq!(node.immediate_int(), Ok(-7));
        assert_eq!(node.arity(), 0);
    }

    #[rstest]
    #[case::float(Immediate::Float(0.5), DataType::F32)]
    #[case::int(Immediate::Int(3), DataType::I32)]
    fn test_imm(#[case] expected: Immediate, #[case] data_type: DataType) {
        let mut graph: Graph = Graph::new();
        let expr = match expected {
            Immediate::Float(_) => graph.imm(0.5f32),
            _ => graph.imm(3i32),
        }
        .unwrap();

        let node = graph.node(expr).unwrap();
        assert_eq!(node.immediate(), Some(expected));
        assert_eq!(node.data_type(), data_type);
    }

    #[test]
    fn test_placeholder_is_unbound_addr() {
        let mut graph: Graph = Graph::new();
        let expr = graph.placeholder().unwrap();
        assert_eq!(graph.opcode(expr), Ok(Opcode::Addr));
        assert_eq!(graph.address(expr), Err(IrError::UnboundAddress));
    }

    #[test]
    fn test_pointer_requires_addr() {
        let mut graph: Graph = Graph::new();
        let i = graph.index(0).unwrap();
        assert_eq!(
            graph.pointer(i),
            Err(IrError::OpcodeMismatch {
                expected: &[Opcode::Addr],
                found: Opcode::Index
            })
        );

        let addr = graph.addr(x(4)).unwrap();
        let pointer = graph.pointer_indexed(addr, i).unwrap();
        assert_eq!(graph.node(pointer).unwrap().children().collect::<Vec<_>>(), vec![addr, i]);
    }

    #[test]
    fn test_floor_and_cast() {
        let mut graph: Graph = Graph::new();
        let p = pointer_to(&mut graph, x(0));
        let floored = graph.floor(p).unwrap();
        assert_eq!(graph.opcode(graph.child(floored, 0).unwrap()), Ok(Opcode::Load));

        let cast = graph.cast(floored, DataType::I32).unwrap();
        assert_eq!(graph.data_type(cast), Ok(DataType::I32));
        assert_eq!(graph.child(cast, 0), Ok(floored));
    }
}
