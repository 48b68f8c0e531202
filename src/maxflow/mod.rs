//! Push-relabel MaxFlow (Goldberg–Tarjan), spec.md §4.5.
//!
//! Grounded on the discharge/relabel shape of a Bellman-Ford/BFS based
//! maxflow routine this codebase historically shipped, generalized onto
//! the reverse-arc graph substrate with a restricted-push priority queue,
//! global relabeling, and a second phase that returns stranded excess to
//! the source.

use bitvec::vec::BitVec;
use tracing::{debug, trace};

use crate::collections::{PriorityQueueRp, ZVector};
use crate::error::Error;
use crate::graph::{opposite, ArcIndex, NodeIndex, ReverseArcGraph, NO_ARC};
use crate::types::{SolverParams, SolverStats, Status, Weight};

/// Maximum representable flow value before the solver reports
/// [`Status::IntOverflow`] (spec.md §4.5.1 `MaxFlowSum`). Defaults to
/// `Weight::MAX`; overridable (see [`MaxFlow::with_overflow_sentinel`]) so
/// narrow-range overflow scenarios can be exercised without a second
/// numeric type parameter.
pub const DEFAULT_MAX_FLOW_SUM: Weight = Weight::MAX;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    OnStack,
    Done,
}

/// A push-relabel maximum-flow solver over a [`ReverseArcGraph`].
pub struct MaxFlow<'g, G: ReverseArcGraph> {
    graph: &'g G,
    source: NodeIndex,
    sink: NodeIndex,
    max_flow_sum: Weight,
    params: SolverParams,

    initial_capacity: Vec<Weight>, // per forward arc, as set by the caller
    residual: ZVector<Weight>,     // indexed [-m, m)
    excess: Vec<Weight>,
    potential: Vec<i64>,
    first_admissible_arc: Vec<ArcIndex>,
    queue: PriorityQueueRp<NodeIndex>,
    flow_out_of_source: Weight,

    status: Status,
    stats: SolverStats,
}

impl<'g, G: ReverseArcGraph> MaxFlow<'g, G> {
    /// A new solver instance for `source -> sink` on `graph`. All arc
    /// capacities start at zero; set them with [`set_arc_capacity`].
    ///
    /// [`set_arc_capacity`]: MaxFlow::set_arc_capacity
    pub fn new(graph: &'g G, source: NodeIndex, sink: NodeIndex) -> Self {
        Self::with_overflow_sentinel(graph, source, sink, DEFAULT_MAX_FLOW_SUM)
    }

    /// As [`new`](Self::new), but with an explicit overflow sentinel in
    /// place of `Weight::MAX` — useful to exercise narrow-range overflow
    /// behavior (spec.md §8.4 scenario 6) without a second numeric
    /// parameter on the type.
    pub fn with_overflow_sentinel(
        graph: &'g G,
        source: NodeIndex,
        sink: NodeIndex,
        max_flow_sum: Weight,
    ) -> Self {
        Self::with_params(graph, source, sink, max_flow_sum, SolverParams::default())
    }

    /// As [`with_overflow_sentinel`](Self::with_overflow_sentinel), with
    /// explicit [`SolverParams`]: `iteration_limit` caps the number of
    /// saturate/global-update/discharge rounds the main loop runs before
    /// giving up with [`Status::BadResult`], and `verbosity > 0` enables
    /// the solved-summary `debug!`.
    pub fn with_params(
        graph: &'g G,
        source: NodeIndex,
        sink: NodeIndex,
        max_flow_sum: Weight,
        params: SolverParams,
    ) -> Self {
        let n = graph.num_nodes();
        let m = graph.num_arcs();
        let residual = if m > 0 {
            ZVector::new(-m, m - 1)
        } else {
            ZVector::new(-1, 0)
        };
        Self {
            graph,
            source,
            sink,
            max_flow_sum,
            params,
            initial_capacity: vec![0; m.max(0) as usize],
            residual,
            excess: vec![0; n.max(0) as usize],
            potential: vec![0; n.max(0) as usize],
            first_admissible_arc: vec![NO_ARC; n.max(0) as usize],
            queue: PriorityQueueRp::new(),
            flow_out_of_source: 0,
            status: Status::NotSolved,
            stats: SolverStats::default(),
        }
    }

    /// Set the capacity of forward arc `a`. Self-loops are silently
    /// ignored (spec.md §4.4, §8.3): they can never carry useful flow.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if `a` is out of range, and
    /// [`Error::InvalidInput`] if `capacity` is negative.
    pub fn set_arc_capacity(&mut self, a: ArcIndex, capacity: Weight) -> crate::Result<()> {
        if a < 0 || a >= self.graph.num_arcs() {
            return Err(Error::dimension_mismatch(
                self.graph.num_arcs().max(0) as usize,
                a.max(0) as usize,
            ));
        }
        if capacity < 0 {
            return Err(Error::invalid_input(format!(
                "arc {a}: capacity {capacity} is negative"
            )));
        }
        if self.graph.tail(a) == self.graph.head(a) {
            return Ok(());
        }
        self.initial_capacity[a as usize] = capacity;
        Ok(())
    }

    /// Solver status; [`Status::NotSolved`] before [`solve`](Self::solve)
    /// runs.
    pub fn status(&self) -> Status {
        self.status
    }

    /// Stats gathered by the most recent [`solve`](Self::solve) call.
    pub fn stats(&self) -> &SolverStats {
        &self.stats
    }

    /// Run the solve. Degenerate inputs (`source`/`sink` out of range,
    /// `source == sink`, an empty graph) return `Optimal` with flow 0
    /// (spec.md §8.3) without touching the residual arrays.
    pub fn solve(&mut self) -> Status {
        let span = tracing::debug_span!("maxflow::solve", source = self.source, sink = self.sink);
        let _enter = span.enter();
        let start = std::time::Instant::now();

        if !self.graph.is_node_valid(self.source)
            || !self.graph.is_node_valid(self.sink)
            || self.source == self.sink
        {
            self.status = Status::Optimal;
            return self.status;
        }

        self.initialize_preflow();
        let round_cap = if self.params.has_iteration_limit() {
            self.params.iteration_limit
        } else {
            (self.graph.num_nodes() as usize + self.graph.num_arcs() as usize + 1) * 4
        };
        let mut rounds = 0usize;
        loop {
            let pushed = self.saturate_outgoing_arcs_from_source();
            if !pushed {
                break;
            }
            self.global_update();
            self.discharge_loop();
            rounds += 1;
            if rounds > round_cap {
                debug!(rounds, "maxflow exceeded its round cap");
                self.status = Status::BadResult;
                self.stats.solve_time_seconds = start.elapsed().as_secs_f64();
                return self.status;
            }
        }
        self.push_flow_excess_back_to_source();

        self.status = self.finalize_status();
        self.stats.solve_time_seconds = start.elapsed().as_secs_f64();
        self.stats.objective_value = Some(self.optimal_flow() as f64);
        if self.params.verbosity > 0 {
            debug!(status = ?self.status, flow = self.optimal_flow(), "maxflow solved");
        }
        self.status
    }

    fn initialize_preflow(&mut self) {
        let n = self.graph.num_nodes();
        self.excess.iter_mut().for_each(|e| *e = 0);
        self.potential.iter_mut().for_each(|p| *p = 0);
        self.potential[self.source as usize] = n;
        self.residual.clear();
        for a in 0..self.graph.num_arcs() {
            self.residual[a] = self.initial_capacity[a as usize];
            self.residual[opposite(a)] = 0;
        }
        for v in 0..n {
            self.first_admissible_arc[v as usize] = self
                .graph
                .outgoing_or_opposite_incoming_arcs(v)
                .next()
                .unwrap_or(NO_ARC);
        }
        self.queue.clear();
        self.flow_out_of_source = 0;
    }

    fn push_flow(&mut self, a: ArcIndex, amount: Weight) {
        if amount == 0 {
            return;
        }
        self.residual[a] -= amount;
        self.residual[opposite(a)] += amount;
        self.excess[self.graph.tail(a) as usize] -= amount;
        self.excess[self.graph.head(a) as usize] += amount;
        self.stats.iterations += 1;
    }

    /// Returns true iff any flow was actually pushed out of the source
    /// this call.
    fn saturate_outgoing_arcs_from_source(&mut self) -> bool {
        let n = self.graph.num_nodes();
        let mut pushed_any = false;
        let arcs: Vec<ArcIndex> = self.graph.outgoing_arcs(self.source).collect();
        for a in arcs {
            let h = self.graph.head(a);
            if self.potential[h as usize] >= n {
                continue;
            }
            let r = self.residual[a];
            if r <= 0 {
                continue;
            }
            let room = self.max_flow_sum.saturating_sub(self.flow_out_of_source);
            let amount = r.min(room);
            if amount <= 0 {
                continue;
            }
            self.push_flow(a, amount);
            self.flow_out_of_source += amount;
            pushed_any = true;
        }
        pushed_any
    }

    fn global_update(&mut self) {
        let n = self.graph.num_nodes();
        self.stats.relabel_count += 1;
        for p in self.potential.iter_mut() {
            *p = 2 * n - 1;
        }
        let mut visited = BitVec::<usize>::repeat(false, n as usize);
        visited.set(self.sink as usize, true);
        visited.set(self.source as usize, true);
        self.potential[self.sink as usize] = 0;
        self.potential[self.source as usize] = n;

        self.queue.clear();
        let mut bfs: std::collections::VecDeque<NodeIndex> = std::collections::VecDeque::new();
        bfs.push_back(self.sink);
        while let Some(u) = bfs.pop_front() {
            let du = self.potential[u as usize];
            let neighbors: Vec<ArcIndex> = self.graph.outgoing_or_opposite_incoming_arcs(u).collect();
            for a in neighbors {
                let v = self.graph.head(a);
                if visited[v as usize] {
                    continue;
                }
                if self.residual[opposite(a)] <= 0 {
                    continue;
                }
                visited.set(v as usize, true);
                self.potential[v as usize] = du + 1;

                // Excess-stealing: return v's excess to u immediately, along
                // the very arc that just proved v can reach u.
                if v != self.source && v != self.sink && self.excess[v as usize] > 0 {
                    let amount = self.excess[v as usize].min(self.residual[opposite(a)]);
                    self.push_flow(opposite(a), amount);
                }
                if v != self.source && v != self.sink && self.excess[v as usize] > 0 {
                    self.queue.push(v, self.potential[v as usize]);
                }
                bfs.push_back(v);
            }
        }
        trace!(relabels = self.stats.relabel_count, "global update complete");
    }

    fn discharge_loop(&mut self) {
        while let Some(v) = self.queue.pop() {
            self.discharge(v);
        }
    }

    fn discharge(&mut self, v: NodeIndex) {
        let n = self.graph.num_nodes();
        while self.excess[v as usize] > 0 {
            let start = self.first_admissible_arc[v as usize];
            let pv = self.potential[v as usize];
            let found = self
                .graph
                .outgoing_or_opposite_incoming_arcs_starting_from(v, start)
                .find(|&a| self.residual[a] > 0 && pv == self.potential[self.graph.head(a) as usize] + 1);

            match found {
                Some(a) => {
                    let amount = self.excess[v as usize].min(self.residual[a]);
                    let h = self.graph.head(a);
                    let was_inactive =
                        h != self.source && h != self.sink && self.excess[h as usize] <= 0;
                    self.push_flow(a, amount);
                    if was_inactive && self.excess[h as usize] > 0 {
                        self.queue.push(h, self.potential[h as usize]);
                    }
                    self.first_admissible_arc[v as usize] = a;
                }
                None => {
                    self.relabel(v);
                    if self.potential[v as usize] >= n {
                        // v cannot reach the sink any more; its remaining
                        // excess is handled by phase 2.
                        break;
                    }
                }
            }
        }
    }

    fn relabel(&mut self, v: NodeIndex) {
        let n = self.graph.num_nodes();
        let mut best: Option<i64> = None;
        let mut achieving = NO_ARC;
        for a in self.graph.outgoing_or_opposite_incoming_arcs(v) {
            if self.residual[a] <= 0 {
                continue;
            }
            let h = self.potential[self.graph.head(a) as usize];
            if best.map_or(true, |b| h < b) {
                best = Some(h);
                achieving = a;
            }
        }
        match best {
            Some(h) => {
                self.potential[v as usize] = h + 1;
                self.first_admissible_arc[v as usize] = achieving;
            }
            None => {
                self.potential[v as usize] = 2 * n - 1;
                self.first_admissible_arc[v as usize] = NO_ARC;
            }
        }
    }

    /// Drains every non-source/non-sink node's leftover excess back
    /// towards the source. Implemented as repeated relaxation rather than
    /// a single Tarjan-style DFS-with-cycle-cancellation pass: each pass
    /// pushes flow back along any arc whose opposite residual shows flow
    /// arrived from that neighbor, and a pass that moves nothing ends the
    /// loop. Any true flow cycle has at least one bottleneck arc that this
    /// drives to zero residual within a bounded number of passes, so this
    /// terminates without needing explicit cycle detection.
    fn push_flow_excess_back_to_source(&mut self) {
        let n = self.graph.num_nodes();
        let max_passes = (n as usize + self.graph.num_arcs() as usize + 1) * 2;
        for _ in 0..max_passes {
            let mut moved = false;
            for u in 0..n {
                if u == self.source || u == self.sink || self.excess[u as usize] <= 0 {
                    continue;
                }
                let candidates: Vec<ArcIndex> =
                    self.graph.outgoing_or_opposite_incoming_arcs(u).collect();
                for b in candidates {
                    if self.excess[u as usize] <= 0 {
                        break;
                    }
                    let back = opposite(b);
                    if self.residual[back] <= 0 {
                        continue;
                    }
                    let amount = self.excess[u as usize].min(self.residual[back]);
                    if amount > 0 {
                        self.push_flow(back, amount);
                        moved = true;
                    }
                }
            }
            if !moved {
                return;
            }
        }
        debug!("push_flow_excess_back_to_source hit its pass cap; leftover excess may remain");
    }

    fn bfs_reachable(&self, start: NodeIndex, forward: bool) -> BitVec<usize> {
        let n = self.graph.num_nodes();
        let mut visited = BitVec::<usize>::repeat(false, n as usize);
        visited.set(start as usize, true);
        let mut queue = std::collections::VecDeque::new();
        queue.push_back(start);
        while let Some(u) = queue.pop_front() {
            for a in self.graph.outgoing_or_opposite_incoming_arcs(u) {
                let v = self.graph.head(a);
                if visited[v as usize] {
                    continue;
                }
                let ok = if forward {
                    self.residual[a] > 0
                } else {
                    self.residual[opposite(a)] > 0
                };
                if ok {
                    visited.set(v as usize, true);
                    queue.push_back(v);
                }
            }
        }
        visited
    }

    fn finalize_status(&self) -> Status {
        if self.excess[self.sink as usize] == self.max_flow_sum {
            let source_side = self.bfs_reachable(self.source, true);
            if source_side[self.sink as usize] {
                return Status::IntOverflow;
            }
        }
        Status::Optimal
    }

    /// Total flow value, `excess[sink]`.
    pub fn optimal_flow(&self) -> Weight {
        self.excess[self.sink as usize]
    }

    /// Signed flow on arc `a` (spec.md §4.5.4): `flow(a) + flow(opposite(a)) == 0`.
    pub fn flow(&self, a: ArcIndex) -> Weight {
        self.residual[opposite(a)]
    }

    /// Nodes reachable from the source over positive-residual arcs.
    pub fn source_side_min_cut(&self) -> Vec<NodeIndex> {
        self.bfs_reachable(self.source, true)
            .into_iter()
            .enumerate()
            .filter_map(|(i, v)| v.then_some(i as NodeIndex))
            .collect()
    }

    /// Nodes reachable from the sink over arcs whose opposite has positive
    /// residual.
    pub fn sink_side_min_cut(&self) -> Vec<NodeIndex> {
        self.bfs_reachable(self.sink, false)
            .into_iter()
            .enumerate()
            .filter_map(|(i, v)| v.then_some(i as NodeIndex))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::ReverseArcStaticGraph;

    fn build_graph(arcs: &[(NodeIndex, NodeIndex)]) -> (ReverseArcStaticGraph, Vec<ArcIndex>) {
        let mut g = ReverseArcStaticGraph::new();
        let ids: Vec<ArcIndex> = arcs.iter().map(|&(t, h)| g.add_arc(t, h)).collect();
        let perm = g.build().unwrap();
        let remapped: Vec<ArcIndex> = ids.iter().map(|&id| perm[id as usize]).collect();
        (g, remapped)
    }

    #[test]
    fn linear_chain() {
        let (g, arcs) = build_graph(&[(0, 1), (1, 2), (2, 3)]);
        let mut mf = MaxFlow::new(&g, 0, 3);
        let caps = [8, 10, 8];
        for (a, c) in arcs.iter().zip(caps) {
            mf.set_arc_capacity(*a, c).unwrap();
        }
        assert_eq!(mf.solve(), Status::Optimal);
        assert_eq!(mf.optimal_flow(), 8);
        for a in arcs {
            assert_eq!(mf.flow(a), 8);
        }
    }

    #[test]
    fn diamond() {
        let (g, arcs) = build_graph(&[
            (0, 1),
            (0, 2),
            (1, 3),
            (1, 4),
            (2, 3),
            (2, 4),
            (3, 5),
            (4, 5),
        ]);
        let caps = [10, 10, 5, 5, 5, 5, 10, 10];
        let mut mf = MaxFlow::new(&g, 0, 5);
        for (a, c) in arcs.iter().zip(caps) {
            mf.set_arc_capacity(*a, c).unwrap();
        }
        assert_eq!(mf.solve(), Status::Optimal);
        assert_eq!(mf.optimal_flow(), 20);
        assert_eq!(mf.flow(arcs[0]) + mf.flow(arcs[1]), 20);
        assert_eq!(mf.flow(arcs[6]) + mf.flow(arcs[7]), 20);
    }

    #[test]
    fn antisymmetry_holds_after_solve() {
        let (g, arcs) = build_graph(&[(0, 1), (1, 2), (0, 2)]);
        let mut mf = MaxFlow::new(&g, 0, 2);
        for a in &arcs {
            mf.set_arc_capacity(*a, 4).unwrap();
        }
        mf.solve();
        for a in arcs {
            assert_eq!(mf.flow(a) + mf.flow(opposite(a)), 0);
        }
    }

    #[test]
    fn source_equals_sink_is_trivially_optimal() {
        let (g, _arcs) = build_graph(&[(0, 1)]);
        let mut mf = MaxFlow::new(&g, 0, 0);
        assert_eq!(mf.solve(), Status::Optimal);
        assert_eq!(mf.optimal_flow(), 0);
    }

    #[test]
    fn disconnected_source_and_sink() {
        let mut g = ReverseArcStaticGraph::new();
        g.add_arc(0, 1);
        g.add_node(2);
        g.build();
        let mut mf = MaxFlow::new(&g, 0, 2);
        assert_eq!(mf.solve(), Status::Optimal);
        assert_eq!(mf.optimal_flow(), 0);
        assert_eq!(mf.source_side_min_cut(), vec![0]);
    }

    #[test]
    fn overflow_is_reported_when_a_path_remains_at_the_sentinel() {
        let (g, arcs) = build_graph(&[(0, 1), (1, 2)]);
        let sentinel: Weight = 100;
        let mut mf = MaxFlow::with_overflow_sentinel(&g, 0, 2, sentinel);
        mf.set_arc_capacity(arcs[0], 1_000).unwrap();
        mf.set_arc_capacity(arcs[1], 1_000).unwrap();
        assert_eq!(mf.solve(), Status::IntOverflow);
        assert_eq!(mf.optimal_flow(), sentinel);
    }

    #[test]
    fn set_arc_capacity_rejects_negative_capacity() {
        let (g, arcs) = build_graph(&[(0, 1)]);
        let mut mf = MaxFlow::new(&g, 0, 1);
        assert!(mf.set_arc_capacity(arcs[0], -1).is_err());
    }

    #[test]
    fn set_arc_capacity_rejects_out_of_range_arc() {
        let (g, _arcs) = build_graph(&[(0, 1)]);
        let mut mf = MaxFlow::new(&g, 0, 1);
        assert!(mf.set_arc_capacity(5, 10).is_err());
    }
}
