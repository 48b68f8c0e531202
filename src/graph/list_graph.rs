//! Forward-only dynamic graph: per-node singly linked arc lists, no build
//! step. Arcs are inserted at the head of their tail node's list, so
//! `outgoing_arcs` visits them in reverse insertion order.

use super::{ArcIndex, BaseGraph, NodeIndex, NO_ARC};

/// A dynamic, forward-only graph. Unlike [`super::StaticGraph`], arcs
/// become visible immediately on `add_arc` with no separate build step, at
/// the cost of a linked-list traversal instead of a contiguous range.
#[derive(Debug, Clone, Default)]
pub struct ListGraph {
    num_nodes: NodeIndex,
    head: Vec<ArcIndex>,
    next: Vec<ArcIndex>,
    arc_tail: Vec<NodeIndex>,
    arc_head: Vec<NodeIndex>,
}

impl ListGraph {
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

    /// Add a forward arc `tail -> head`, prepended onto `tail`'s list.
    pub fn add_arc(&mut self, tail: NodeIndex, head: NodeIndex) -> ArcIndex {
        self.add_node(tail);
        self.add_node(head);
        let id = self.arc_tail.len() as ArcIndex;
        self.arc_tail.push(tail);
        self.arc_head.push(head);
        self.next.push(self.head[tail as usize]);
        self.head[tail as usize] = id;
        id
    }
}

struct ListIter<'a> {
    next: &'a [ArcIndex],
    current: ArcIndex,
}

impl Iterator for ListIter<'_> {
    type Item = ArcIndex;
    fn next(&mut self) -> Option<ArcIndex> {
        if self.current == NO_ARC {
            return None;
        }
        let a = self.current;
        self.current = self.next[a as usize];
        Some(a)
    }
}

impl BaseGraph for ListGraph {
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
        self.outgoing_arcs(v).count() as ArcIndex
    }

    fn outgoing_arcs(&self, v: NodeIndex) -> impl Iterator<Item = ArcIndex> + '_ {
        ListIter {
            next: &self.next,
            current: self.head[v as usize],
        }
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
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arcs_visible_immediately_no_build() {
        let mut g = ListGraph::new();
        let a = g.add_arc(0, 1);
        let b = g.add_arc(0, 2);
        assert_eq!(g.out_degree(0), 2);
        let arcs: Vec<ArcIndex> = g.outgoing_arcs(0).collect();
        // Head-insertion means most recent arc comes first.
        assert_eq!(arcs, vec![b, a]);
        assert_eq!(g.head(a), 1);
        assert_eq!(g.head(b), 2);
    }

    #[test]
    fn starting_from_resumes_the_scan() {
        let mut g = ListGraph::new();
        let a = g.add_arc(0, 1);
        let b = g.add_arc(0, 2);
        let c = g.add_arc(0, 3);
        let resumed: Vec<ArcIndex> = g.outgoing_arcs_starting_from(0, b).collect();
        assert_eq!(resumed, vec![b, a]);
        let _ = c;
    }
}
