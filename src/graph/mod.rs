//! Graph substrate: five containers sharing one interface.
//!
//! Nodes are plain integers in `[0, n)`. Arcs are integers too; reverse-arc
//! variants use the 0-based `~a` signed-arc convention (spec.md §3.2, §6.3):
//! a forward arc's index is non-negative, its opposite is the bitwise
//! complement, and `opposite(opposite(a)) == a` falls out of `!!a == a` for
//! free. The codebase's other historical convention (`opposite(a) = -a`,
//! forward arcs starting at 1) is not implemented here — the flow engines
//! only ever need one, and mixing both in one engine is exactly the bug
//! spec.md §9 warns about.
//!
//! [`StaticGraph`] and [`ReverseArcStaticGraph`] require a [`build`] step
//! that sorts arcs by tail for cache-dense outgoing iteration, at the cost
//! of handing back a permutation the caller must apply to any per-arc side
//! table (capacities, costs — the graph itself carries none). [`ListGraph`]
//! and [`ReverseArcListGraph`] need no build step: arcs are pushed onto the
//! head of a per-node singly linked list as they arrive.
//!
//! [`build`]: StaticGraph::build

mod complete_graph;
mod list_graph;
mod reverse_arc_list_graph;
mod reverse_arc_static_graph;
mod static_graph;

pub use complete_graph::{CompleteBipartiteGraph, CompleteGraph};
pub use list_graph::ListGraph;
pub use reverse_arc_list_graph::ReverseArcListGraph;
pub use reverse_arc_static_graph::ReverseArcStaticGraph;
pub use static_graph::StaticGraph;

/// A node identifier, always in `[0, num_nodes)`.
pub type NodeIndex = i64;

/// An arc identifier. Non-negative for a forward arc; for reverse-arc
/// graphs, negative values address the implicit opposite arc.
pub type ArcIndex = i64;

/// Sentinel meaning "no arc here" — used by adjacency-list heads/cursors.
/// Deliberately far outside any valid `opposite()` range (`[-m, m)`) so it
/// can never collide with a real (possibly negative) arc id.
pub const NO_ARC: ArcIndex = ArcIndex::MIN;

/// `opposite(opposite(a)) == a` by construction: `!!a == a` for any integer
/// type under two's complement. This is the one free lunch in the whole
/// signed-arc convention.
#[inline]
pub fn opposite(a: ArcIndex) -> ArcIndex {
    !a
}

/// The minimal graph interface: topology queries and forward iteration.
/// Every variant in this module implements it; engines that don't need
/// reverse arcs (Network Simplex) are written against this trait alone so
/// they monomorphize over whichever forward-only variant the caller picks.
pub trait BaseGraph {
    /// Number of nodes, all integers in `[0, num_nodes)`.
    fn num_nodes(&self) -> NodeIndex;

    /// Number of forward arcs.
    fn num_arcs(&self) -> ArcIndex;

    /// Tail (origin) of arc `a`.
    fn tail(&self, a: ArcIndex) -> NodeIndex;

    /// Head (destination) of arc `a`.
    fn head(&self, a: ArcIndex) -> NodeIndex;

    /// Number of arcs leaving `v`.
    fn out_degree(&self, v: NodeIndex) -> ArcIndex;

    /// All arcs leaving `v`, in whatever order the variant stores them.
    fn outgoing_arcs(&self, v: NodeIndex) -> impl Iterator<Item = ArcIndex> + '_;

    /// Arcs leaving `v`, skipping forward until `from` is reached (used to
    /// resume a discharge loop from a cached scan cursor).
    fn outgoing_arcs_starting_from(
        &self,
        v: NodeIndex,
        from: ArcIndex,
    ) -> impl Iterator<Item = ArcIndex> + '_;

    /// True if `v` is a valid node of this graph.
    fn is_node_valid(&self, v: NodeIndex) -> bool {
        v >= 0 && v < self.num_nodes()
    }
}

/// Extends [`BaseGraph`] with the reverse-arc operations the push-relabel
/// engines (MaxFlow, cost-scaling MCF) depend on.
pub trait ReverseArcGraph: BaseGraph {
    /// The opposite of arc `a`; always satisfies `opposite(opposite(a)) == a`.
    fn opposite(&self, a: ArcIndex) -> ArcIndex {
        opposite(a)
    }

    /// Number of arcs entering `v`.
    fn in_degree(&self, v: NodeIndex) -> ArcIndex;

    /// True forward arcs entering `v` (not their opposites).
    fn incoming_arcs(&self, v: NodeIndex) -> impl Iterator<Item = ArcIndex> + '_;

    /// Opposites of the arcs entering `v` — i.e. the reverse arcs whose
    /// *tail* is `v`. This, unioned with `outgoing_arcs(v)`, is the
    /// iteration basis of every push-relabel discharge step.
    fn opposite_incoming_arcs(&self, v: NodeIndex) -> impl Iterator<Item = ArcIndex> + '_;

    /// `outgoing_arcs(v)` chained with `opposite_incoming_arcs(v)`.
    fn outgoing_or_opposite_incoming_arcs(
        &self,
        v: NodeIndex,
    ) -> impl Iterator<Item = ArcIndex> + '_;

    /// Same as [`outgoing_or_opposite_incoming_arcs`](Self::outgoing_or_opposite_incoming_arcs),
    /// resuming from a cached cursor arc.
    fn outgoing_or_opposite_incoming_arcs_starting_from(
        &self,
        v: NodeIndex,
        from: ArcIndex,
    ) -> impl Iterator<Item = ArcIndex> + '_;
}
