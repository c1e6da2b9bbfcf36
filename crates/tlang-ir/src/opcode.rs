use std::fmt;

/// The closed set of operations a node can represent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, strum::EnumIter)]
pub enum Opcode {
    Mul,
    Add,
    Sub,
    Div,
    Mod,
    Load,
    Store,
    Pointer,
    Combine,
    Index,
    Addr,
    AdapterStore,
    AdapterLoad,
    Imm,
    Floor,
    Max,
    Min,
    Cast,
    Land,
    Shr,
    Shl,
    Cmp,
    Select,
}

impl Opcode {
    pub const fn name(self) -> &'static str {
        match self {
            Opcode::Mul => "mul",
            Opcode::Add => "add",
            Opcode::Sub => "sub",
            Opcode::Div => "div",
            Opcode::Mod => "mod",
            Opcode::Load => "load",
            Opcode::Store => "store",
            Opcode::Pointer => "pointer",
            Opcode::Combine => "combine",
            Opcode::Index => "index",
            Opcode::Addr => "addr",
            Opcode::AdapterStore => "adapter_store",
            Opcode::AdapterLoad => "adapter_load",
            Opcode::Imm => "imm",
            Opcode::Floor => "floor",
            Opcode::Max => "max",
            Opcode::Min => "min",
            Opcode::Cast => "cast",
            Opcode::Land => "land",
            Opcode::Shr => "shr",
            Opcode::Shl => "shl",
            Opcode::Cmp => "cmp",
            Opcode::Select => "select",
        }
    }

    /// Number of children a node of this opcode is built with.
    pub const fn arity(self) -> Arity {
        match self {
            Opcode::Index | Opcode::Addr | Opcode::Imm => Arity::Exact(0),
            Opcode::Load | Opcode::Floor | Opcode::Cast => Arity::Exact(1),
            Opcode::Mul
            | Opcode::Add
            | Opcode::Sub
            | Opcode::Div
            | Opcode::Mod
            | Opcode::Max
            | Opcode::Min
            | Opcode::Land
            | Opcode::Shr
            | Opcode::Shl
            | Opcode::Store
            | Opcode::Cmp => Arity::Exact(2),
            Opcode::Select => Arity::Exact(3),
            Opcode::Pointer => Arity::Range { min: 1, max: 2 },
            Opcode::AdapterStore | Opcode::AdapterLoad => Arity::Range { min: 0, max: 4 },
            Opcode::Combine => Arity::Variadic,
        }
    }

    #[inline(always)]
    pub fn is_memory_access(self) -> bool {
        matches!(self, Opcode::Load | Opcode::Store)
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exact(usize),
    Range { min: usize, max: usize },
    Variadic,
}

impl Arity {
    pub fn accepts(self, len: usize) -> bool {
        match self {
            Arity::Exact(n) => len == n,
            Arity::Range { min, max } => (min..=max).contains(&len),
            Arity::Variadic => true,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Exact(n) => write!(f, "{}", n),
            Arity::Range { min, max } => write!(f, "{}..={}", min, max),
            Arity::Variadic => write!(f, "any number of"),
        }
    }
}

/// Comparison sub-kind stored in the immediate slot of a `cmp` node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::EnumIter)]
pub enum CmpKind {
    Eq,
    Ne,
    Le,
    Lt,
}

impl CmpKind {
    pub const fn name(self) -> &'static str {
        match self {
            CmpKind::Eq => "eq",
            CmpKind::Ne => "ne",
            CmpKind::Le => "le",
            CmpKind::Lt => "lt",
        }
    }
}

impl fmt::Display for CmpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Two-operand opcodes that share the type-equality and implicit-load rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::EnumIter)]
pub enum BinaryOp {
    Mul,
    Add,
    Sub,
    Div,
    Mod,
    Max,
    Min,
    Land,
    Shr,
    Shl,
}

impl BinaryOp {
    pub const fn opcode(self) -> Opcode {
        match self {
            BinaryOp::Mul => Opcode::Mul,
            BinaryOp::Add => Opcode::Add,
            BinaryOp::Sub => Opcode::Sub,
            BinaryOp::Div => Opcode::Div,
            BinaryOp::Mod => Opcode::Mod,
            BinaryOp::Max => Opcode::Max,
            BinaryOp::Min => Opcode::Min,
            BinaryOp::Land => Opcode::Land,
            BinaryOp::Shr => Opcode::Shr,
            BinaryOp::Shl => Opcode::Shl,
        }
    }
}
