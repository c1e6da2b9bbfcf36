use crate::{node::NodeId, sequence::GraphId};

/// A nullable handle to a node in a [`Graph`](crate::Graph).
///
/// Handles are plain indices, so copying one shares the node rather than
/// duplicating it. Two handles are equal only when they name the same node;
/// nodes with identical contents built separately are never equal.
///
/// Every handle remembers the graph that issued it. Passing it to another
/// graph fails with [`IrError::UnknownNode`](crate::IrError::UnknownNode)
/// instead of resolving to an unrelated node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Expr(Option<(GraphId, NodeId)>);

impl Expr {
    /// A handle that references nothing yet.
    pub const fn empty() -> Self {
        Self(None)
    }

    pub(crate) fn new(graph: GraphId, node: NodeId) -> Self {
        Self(Some((graph, node)))
    }

    #[inline(always)]
    pub fn is_some(self) -> bool {
        self.0.is_some()
    }

    #[inline(always)]
    pub fn is_empty(self) -> bool {
        self.0.is_none()
    }

    pub fn node_id(self) -> Option<NodeId> {
        self.0.map(|(_, node)| node)
    }

    pub fn graph_id(self) -> Option<GraphId> {
        self.0.map(|(graph, _)| graph)
    }
}
