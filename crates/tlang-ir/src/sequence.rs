use std::sync::atomic::{AtomicU32, Ordering};

static NEXT_GRAPH_ID: AtomicU32 = AtomicU32::new(0);

/// Process-unique tag stamped on every handle a graph hands out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GraphId(u32);

impl GraphId {
    pub(crate) fn fresh() -> Self {
        Self(NEXT_GRAPH_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Monotonic node numbering for one graph-construction session.
///
/// Numbers are only used for ordering and debugging output, never for identity.
/// After `u32::MAX` the sequence wraps back to zero.
#[derive(Debug, Clone, Default)]
pub struct Sequence {
    next: u32,
}

impl Sequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current number and advances.
    pub fn next_id(&mut self) -> u32 {
        let id = self.next;
        self.next = self.next.wrapping_add(1);
        id
    }

    pub fn peek(&self) -> u32 {
        self.next
    }

    pub fn reset(&mut self) {
        self.next = 0;
    }
}
