//! Forward-only graph with a build-time counting sort, no reverse arcs.
//!
//! Network Simplex targets this variant: spec.md §9 calls out that the
//! engines statically target one graph variant each rather than going
//! through a dynamic-dispatch hierarchy, and Network Simplex is the one
//! engine in this crate with no reverse-arc requirement.

use super::{ArcIndex, BaseGraph, NodeIndex};

/// A static, forward-only graph. Arcs may be added in any order; [`build`]
/// sorts them by tail so that, afterward, the outgoing arcs of any node
/// occupy a contiguous index range.
///
/// [`build`]: StaticGraph::build
#[derive(Debug, Clone, Default)]
pub struct StaticGraph {
    num_nodes: NodeIndex,
    arc_tail: Vec<NodeIndex>,
    arc_head: Vec<NodeIndex>,
    // Valid only after `build`: outgoing_start[v]..outgoing_start[v+1] is
    // the contiguous range of (sorted) arc ids leaving v.
    outgoing_start: Vec<ArcIndex>,
    built: bool,
}

impl StaticGraph {
    /// An empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Grow the node set so node `v` becomes valid; no-op if already so.
    pub fn add_node(&mut self, v: NodeIndex) {
        assert!(v >= 0, "node index must be non-negative");
        if v >= self.num_nodes {
            self.num_nodes = v + 1;
        }
    }

    /// Add a forward arc `tail -> head`, returning its pre-build id.
    /// `build()` will renumber it; callers with per-arc side tables must
    /// apply the permutation `build()` returns.
    pub fn add_arc(&mut self, tail: NodeIndex, head: NodeIndex) -> ArcIndex {
        assert!(!self.built, "cannot add arcs to a StaticGraph after build()");
        self.add_node(tail);
        self.add_node(head);
        let id = self.arc_tail.len() as ArcIndex;
        self.arc_tail.push(tail);
        self.arc_head.push(head);
        id
    }

    /// True once `build()` has run.
    pub fn is_built(&self) -> bool {
        self.built
    }

    /// Sort arcs by tail so outgoing arcs of every node form a contiguous
    /// range, and return the permutation mapping each original arc id to
    /// its new one. Idempotent: a second call does nothing and returns
    /// `None`, per spec.md §4.4.
    pub fn build(&mut self) -> Option<Vec<ArcIndex>> {
        if self.built {
            return None;
        }
        let n = self.num_nodes as usize;
        let m = self.arc_tail.len();

        let mut start = vec![0 as ArcIndex; n + 1];
        for &t in &self.arc_tail {
            start[t as usize + 1] += 1;
        }
        for i in 0..n {
            start[i + 1] += start[i];
        }

        let mut cursor = start.clone();
        let mut new_tail = vec![0 as NodeIndex; m];
        let mut new_head = vec![0 as NodeIndex; m];
        let mut permutation = vec![0 as ArcIndex; m];
        for i in 0..m {
            let t = self.arc_tail[i] as usize;
            let p = cursor[t];
            cursor[t] += 1;
            new_tail[p as usize] = self.arc_tail[i];
            new_head[p as usize] = self.arc_head[i];
            permutation[i] = p;
        }

        self.arc_tail = new_tail;
        self.arc_head = new_head;
        self.outgoing_start = start;
        self.built = true;
        Some(permutation)
    }
}

impl BaseGraph for StaticGraph {
    fn num_nodes(&self) -> NodeIndex {
        self.num_nodes
    }

    fn num_arcs(&self) -> ArcIndex {
        self.arc_tail.len() as ArcIndex
    }

    fn tail(&self, a: ArcIndex) -> NodeIndex {
        self.arc_tail[a as usize]
    }

    fn head(&self, a: ArcIndex) -> NodeIndex {
        self.arc_head[a as usize]
    }

    fn out_degree(&self, v: NodeIndex) -> ArcIndex {
        assert!(self.built, "out_degree requires build()");
        let v = v as usize;
        self.outgoing_start[v + 1] - self.outgoing_start[v]
    }

    fn outgoing_arcs(&self, v: NodeIndex) -> impl Iterator<Item = ArcIndex> + '_ {
        assert!(self.built, "outgoing_arcs requires build()");
        let v = v as usize;
        self.outgoing_start[v]..self.outgoing_start[v + 1]
    }

    fn outgoing_arcs_starting_from(
        &self,
        v: NodeIndex,
        from: ArcIndex,
    ) -> impl Iterator<Item = ArcIndex> + '_ {
        assert!(self.built, "outgoing_arcs_starting_from requires build()");
        let v = v as usize;
        let start = from.max(self.outgoing_start[v]);
        start..self.outgoing_start[v + 1]
    }
}
