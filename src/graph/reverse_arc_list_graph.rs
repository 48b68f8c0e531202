//! Dynamic reverse-arc graph: adding a forward arc atomically prepends its
//! reverse onto the head node's list (spec.md §4.4). The per-arc `next`
//! pointers and head-node lookups are indexed by signed arc id, which is
//! exactly what [`SVector`] is for.

use crate::collections::SVector;

use super::{opposite, ArcIndex, BaseGraph, NodeIndex, ReverseArcGraph, NO_ARC};

/// A dynamic graph with reverse arcs. Each node's adjacency list mixes its
/// own outgoing (forward) arcs together with the opposites of its
/// incoming arcs — precisely the union push-relabel discharge scans.
#[derive(Debug, Clone, Default)]
pub struct ReverseArcListGraph {
    num_nodes: NodeIndex,
    // Per node, the signed id of the most recently inserted list entry.
    head: Vec<ArcIndex>,
    // Per signed arc id: next entry in the same node's list.
    next: SVector<ArcIndex>,
    // Per signed arc id: the node this (possibly reverse) arc points at.
    // `tail(a)` is then just `arc_head(opposite(a))`.
    arc_head: SVector<NodeIndex>,
}

impl ReverseArcListGraph {
    /// An empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Grow the node set so node `v` becomes valid.
    pub fn add_node(&mut self, v: NodeIndex) {
        assert!(v >= 0, "node index must be non-negative");
        if v >= self.num_nodes {
            self.head.resize((v + 1) as usize, NO_ARC);
            self.num_nodes = v + 1;
        }
    }

    /// Add a forward arc `tail -> head`; its reverse (`opposite(id)`) is
    /// created in the same call and prepended onto `head`'s list.
    pub fn add_arc(&mut self, tail: NodeIndex, head: NodeIndex) -> ArcIndex {
        self.add_node(tail);
        self.add_node(head);
        let id = self.next.size(); // forward arcs are 0, 1, 2, ... in insertion order

        // SVector::grow appends at the new negative extreme (index
        // `-(size+1)` == `opposite(id)`) and the new positive extreme
        // (index `size` == `id`) in one shot.
        self.next.grow(self.head[head as usize], self.head[tail as usize]);
        self.arc_head.grow(tail, head);

        self.head[tail as usize] = id;
        self.head[head as usize] = opposite(id);
        id
    }
}

struct ListIter<'a> {
    next: &'a SVector<ArcIndex>,
    current: ArcIndex,
}

impl Iterator for ListIter<'_> {
    type Item = ArcIndex;
    fn next(&mut self) -> Option<ArcIndex> {
        if self.current == NO_ARC {
            return None;
        }
        let a = self.current;
        self.current = self.next[a];
        Some(a)
    }
}

impl BaseGraph for ReverseArcListGraph {
    fn num_nodes(&self) -> NodeIndex {
        self.num_nodes
    }

    fn num_arcs(&self) -> ArcIndex {
        self.next.size()
    }

    fn tail(&self, a: ArcIndex) -> NodeIndex {
        self.arc_head[opposite(a)]
    }

    fn head(&self, a: ArcIndex) -> NodeIndex {
        self.arc_head[a]
    }

    fn out_degree(&self, v: NodeIndex) -> ArcIndex {
        self.outgoing_arcs(v).count() as ArcIndex
    }

    fn outgoing_arcs(&self, v: NodeIndex) -> impl Iterator<Item = ArcIndex> + '_ {
        ListIter {
            next: &self.next,
            current: self.head[v as usize],
        }
        .filter(|&a| a >= 0)
    }

    fn outgoing_arcs_starting_from(
        &self,
        v: NodeIndex,
        from: ArcIndex,
    ) -> impl Iterator<Item = ArcIndex> + '_ {
        let start = if from == NO_ARC { self.head[v as usize] } else { from };
        ListIter {
            next: &self.next,
            current: start,
        }
        .filter(|&a| a >= 0)
    }
}

impl ReverseArcGraph for ReverseArcListGraph {
    fn in_degree(&self, v: NodeIndex) -> ArcIndex {
        self.incoming_arcs(v).count() as ArcIndex
    }

    fn incoming_arcs(&self, v: NodeIndex) -> impl Iterator<Item = ArcIndex> + '_ {
        self.opposite_incoming_arcs(v).map(opposite)
    }

    fn opposite_incoming_arcs(&self, v: NodeIndex) -> impl Iterator<Item = ArcIndex> + '_ {
        ListIter {
            next: &self.next,
            current: self.head[v as usize],
        }
        .filter(|&a| a < 0)
    }

    fn outgoing_or_opposite_incoming_arcs(
        &self,
        v: NodeIndex,
    ) -> impl Iterator<Item = ArcIndex> + '_ {
        ListIter {
            next: &self.next,
            current: self.head[v as usize],
        }
    }

    fn outgoing_or_opposite_incoming_arcs_starting_from(
        &self,
        v: NodeIndex,
        from: ArcIndex,
    ) -> impl Iterator<Item = ArcIndex> + '_ {
        let start = if from == NO_ARC { self.head[v as usize] } else { from };
        ListIter {
            next: &self.next,
            current: start,
        }
    }
}
