//! Static graph with reverse arcs — the substrate MaxFlow and cost-scaling
//! MCF both target.
//!
//! Beyond `StaticGraph`'s sort-by-tail, this variant also groups, for every
//! node, the opposites of its incoming arcs into a contiguous range. The
//! union of a node's outgoing range and that range is exactly
//! `outgoing_or_opposite_incoming_arcs`, the iteration basis push-relabel
//! discharge uses to scan for admissible arcs (spec.md §4.4, §4.5.3).

use super::{opposite, ArcIndex, BaseGraph, NodeIndex, ReverseArcGraph};

/// A static graph with implicit reverse arcs under the 0-based `~a`
/// convention. `build()` must run before any topology query; it sorts
/// forward arcs by tail (for `outgoing_arcs`) and separately groups reverse
/// arcs by their tail, i.e. by the head of the forward arc they oppose (for
/// `opposite_incoming_arcs`).
#[derive(Debug, Clone, Default)]
pub struct ReverseArcStaticGraph {
    num_nodes: NodeIndex,
    arc_tail: Vec<NodeIndex>,
    arc_head: Vec<NodeIndex>,
    outgoing_start: Vec<ArcIndex>,
    // incoming_start[v]..incoming_start[v+1] indexes into `incoming_arcs`,
    // which stores *reverse* (negative) arc ids grouped by their tail (==
    // head of the forward arc they oppose).
    incoming_start: Vec<ArcIndex>,
    incoming_arcs: Vec<ArcIndex>,
    built: bool,
}

impl ReverseArcStaticGraph {
    /// An empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Grow the node set so node `v` becomes valid.
    pub fn add_node(&mut self, v: NodeIndex) {
        assert!(v >= 0, "node index must be non-negative");
        if v >= self.num_nodes {
            self.num_nodes = v + 1;
        }
    }

    /// Add a forward arc; its reverse (`opposite(id)`) exists implicitly
    /// and carries no independent capacity/cost of its own in the graph —
    /// those live in the engine's side tables, addressed by the signed id.
    pub fn add_arc(&mut self, tail: NodeIndex, head: NodeIndex) -> ArcIndex {
        assert!(
            !self.built,
            "cannot add arcs to a ReverseArcStaticGraph after build()"
        );
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

    /// Sort forward arcs by tail and group reverse arcs by their tail;
    /// returns the forward-arc permutation, or `None` on a repeat call
    /// (build is idempotent, spec.md §4.4/§8.2).
    pub fn build(&mut self) -> Option<Vec<ArcIndex>> {
        if self.built {
            return None;
        }
        let n = self.num_nodes as usize;
        let m = self.arc_tail.len();

        let mut outgoing_start = vec![0 as ArcIndex; n + 1];
        for &t in &self.arc_tail {
            outgoing_start[t as usize + 1] += 1;
        }
        for i in 0..n {
            outgoing_start[i + 1] += outgoing_start[i];
        }
        let mut cursor = outgoing_start.clone();
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
        self.outgoing_start = outgoing_start;

        // Reverse arc `opposite(i)` has tail == head(i). Group those by
        // that tail so a node's incoming range is contiguous too.
        let mut incoming_start = vec![0 as ArcIndex; n + 1];
        for &h in &self.arc_head {
            incoming_start[h as usize + 1] += 1;
        }
        for i in 0..n {
            incoming_start[i + 1] += incoming_start[i];
        }
        let mut cursor2 = incoming_start.clone();
        let mut incoming_arcs = vec![0 as ArcIndex; m];
        for i in 0..m {
            let h = self.arc_head[i] as usize;
            let p = cursor2[h];
            cursor2[h] += 1;
            incoming_arcs[p as usize] = opposite(i as ArcIndex);
        }
        self.incoming_start = incoming_start;
        self.incoming_arcs = incoming_arcs;

        self.built = true;
        Some(permutation)
    }

    fn outgoing_range(&self, v: NodeIndex) -> std::ops::Range<usize> {
        let v = v as usize;
        self.outgoing_start[v] as usize..self.outgoing_start[v + 1] as usize
    }

    fn incoming_range(&self, v: NodeIndex) -> std::ops::Range<usize> {
        let v = v as usize;
        self.incoming_start[v] as usize..self.incoming_start[v + 1] as usize
    }
}

impl BaseGraph for ReverseArcStaticGraph {
    fn num_nodes(&self) -> NodeIndex {
        self.num_nodes
    }

    fn num_arcs(&self) -> ArcIndex {
        self.arc_tail.len() as ArcIndex
    }

    fn tail(&self, a: ArcIndex) -> NodeIndex {
        if a >= 0 {
            self.arc_tail[a as usize]
        } else {
            self.arc_head[opposite(a) as usize]
        }
    }

    fn head(&self, a: ArcIndex) -> NodeIndex {
        if a >= 0 {
            self.arc_head[a as usize]
        } else {
            self.arc_tail[opposite(a) as usize]
        }
    }

    fn out_degree(&self, v: NodeIndex) -> ArcIndex {
        assert!(self.built, "out_degree requires build()");
        self.outgoing_range(v).len() as ArcIndex
    }

    fn outgoing_arcs(&self, v: NodeIndex) -> impl Iterator<Item = ArcIndex> + '_ {
        assert!(self.built, "outgoing_arcs requires build()");
        self.outgoing_range(v).map(|i| i as ArcIndex)
    }

    fn outgoing_arcs_starting_from(
        &self,
        v: NodeIndex,
        from: ArcIndex,
    ) -> impl Iterator<Item = ArcIndex> + '_ {
        assert!(self.built, "outgoing_arcs_starting_from requires build()");
        let range = self.outgoing_range(v);
        let start = (from.max(range.start as ArcIndex)) as usize;
        (start..range.end).map(|i| i as ArcIndex)
    }
}

impl ReverseArcGraph for ReverseArcStaticGraph {
    fn in_degree(&self, v: NodeIndex) -> ArcIndex {
        assert!(self.built, "in_degree requires build()");
        self.incoming_range(v).len() as ArcIndex
    }

    fn incoming_arcs(&self, v: NodeIndex) -> impl Iterator<Item = ArcIndex> + '_ {
        assert!(self.built, "incoming_arcs requires build()");
        self.incoming_range(v).map(|i| opposite(self.incoming_arcs[i]))
    }

    fn opposite_incoming_arcs(&self, v: NodeIndex) -> impl Iterator<Item = ArcIndex> + '_ {
        assert!(self.built, "opposite_incoming_arcs requires build()");
        self.incoming_range(v).map(|i| self.incoming_arcs[i])
    }

    fn outgoing_or_opposite_incoming_arcs(
        &self,
        v: NodeIndex,
    ) -> impl Iterator<Item = ArcIndex> + '_ {
        self.outgoing_arcs(v).chain(self.opposite_incoming_arcs(v))
    }

    fn outgoing_or_opposite_incoming_arcs_starting_from(
        &self,
        v: NodeIndex,
        from: ArcIndex,
    ) -> impl Iterator<Item = ArcIndex> + '_ {
        // `from` was previously produced by this same combined iterator;
        // just replay the combined order and drop everything before it.
        let mut reached = false;
        self.outgoing_or_opposite_incoming_arcs(v)
            .skip_while(move |&a| {
                if reached {
                    false
                } else if a == from {
                    reached = true;
                    false
                } else {
                    true
                }
            })
    }
}

#[cfg(test)]
mod tests {
    use proptest::collection::vec as arc_vec;
    use proptest::prelude::*;

    use super::*;

    proptest! {
        /// For any arc set, after `build()`, `opposite` is an involution and
        /// `tail`/`head` swap correctly across it — the one invariant every
        /// push-relabel discharge loop silently depends on.
        #[test]
        fn opposite_is_always_an_involution(
            arcs in arc_vec((0i64..20, 0i64..20), 0..60)
        ) {
            let mut g = ReverseArcStaticGraph::new();
            for &(t, h) in &arcs {
                g.add_arc(t, h);
            }
            g.build();
            for a in 0..g.num_arcs() {
                prop_assert_eq!(opposite(opposite(a)), a);
                prop_assert_eq!(g.head(opposite(a)), g.tail(a));
                prop_assert_eq!(g.tail(opposite(a)), g.head(a));
            }
        }
    }

    fn diamond() -> ReverseArcStaticGraph {
        let mut g = ReverseArcStaticGraph::new();
        g.add_arc(0, 1);
        g.add_arc(0, 2);
        g.add_arc(1, 3);
        g.add_arc(2, 3);
        g.build();
        g
    }

    #[test]
    fn opposite_is_an_involution() {
        let g = diamond();
        for a in 0..g.num_arcs() {
            assert_eq!(opposite(opposite(a)), a);
            assert_eq!(g.head(opposite(a)), g.tail(a));
            assert_eq!(g.tail(opposite(a)), g.head(a));
        }
    }

    #[test]
    fn incoming_arcs_match_heads() {
        let g = diamond();
        let into_3: Vec<ArcIndex> = g.incoming_arcs(3).collect();
        assert_eq!(into_3.len(), 2);
        for a in into_3 {
            assert_eq!(g.head(a), 3);
        }
    }

    #[test]
    fn combined_iterator_unions_outgoing_and_opposite_incoming() {
        let g = diamond();
        let combined: Vec<ArcIndex> = g.outgoing_or_opposite_incoming_arcs(3).collect();
        // Node 3 has out-degree 0 and in-degree 2, so the combined set is
        // exactly the two opposite-of-incoming (negative) arcs.
        assert_eq!(combined.len(), 2);
        assert!(combined.iter().all(|&a| a < 0));
    }

    #[test]
    fn build_is_idempotent() {
        let mut g = ReverseArcStaticGraph::new();
        g.add_arc(0, 1);
        assert!(g.build().is_some());
        assert!(g.build().is_none());
    }
}
