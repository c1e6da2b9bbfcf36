use crate::{
    address::{Address, BufferAddress},
    error::Result,
    expr::Expr,
    graph::Graph,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Order {
    #[default]
    ParentFirst,
    ChildFirst,
}

/// A read-only pass over the graph, driven by [`Graph::accept`].
pub trait Visitor<A: Address = BufferAddress> {
    fn order(&self) -> Order;

    fn visit(&mut self, graph: &Graph<A>, expr: Expr);
}

impl<A: Address> Graph<A> {
    /// Walks everything reachable from `root`.
    ///
    /// Nodes are visited once per incoming edge, not once per node: a node
    /// shared by two parents is seen twice, each time in the context of the
    /// parent being walked. Children are visited in positional order.
    pub fn accept<V: Visitor<A>>(&self, root: Expr, visitor: &mut V) -> Result<()> {
        self.node_id(root)?;

        let order = visitor.order();
        let mut stack: Vec<(Expr, usize)> = vec![(root, 0)];

        if order == Order::ParentFirst {
            visitor.visit(self, root);
        }

        while let Some((expr, next)) = stack.last_mut() {
            match self.node(*expr)?.child(*next) {
                Some(child) => {
                    *next += 1;

                    if order == Order::ParentFirst {
                        visitor.visit(self, child);
                    }

                    stack.push((child, 0));
                }
                None => {
                    let expr = *expr;
                    stack.pop();

                    if order == Order::ChildFirst {
                        visitor.visit(self, expr);
                    }
                }
            }
        }

        Ok(())
    }
}
