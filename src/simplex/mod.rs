//! Primal Network Simplex MCF, spec.md §4.6.
//!
//! Targets a forward-only graph (no reverse-arc requirement, per spec.md
//! §9: "Network Simplex targets the simple reverse-arc-free variant").
//! The graph supplies topology only; bounds, costs, and supplies are
//! external side tables the caller sets through [`NetworkSimplex`]'s
//! setters, consistent with this crate's "the graph owns nothing beyond
//! topology" convention.
//!
//! **Simplification from the literal algorithm in spec.md §4.6.2 step 5**:
//! rather than an incremental, link-local rethread touching only the moved
//! subtree, this implementation rebuilds `thread`/`rev_thread`/`succ_num`/
//! `last_succ`/`potential` from scratch from the tree-arc set after every
//! pivot that changes the tree (bound flips skip this entirely). That's an
//! `O(n)` rebuild instead of `O(subtree size)`, trading the spec's
//! asymptotic target for code whose correctness follows directly from the
//! tree invariants rather than from exact-sequence link surgery — documented
//! in DESIGN.md. The entering-arc selection (block search) and the
//! minimum-ratio leaving-arc test are implemented as specified.

use tracing::debug;

use crate::error::Error;
use crate::graph::{ArcIndex, BaseGraph, NodeIndex, NO_ARC};
use crate::types::{Cost, SolverParams, SolverStats, Status, Weight};

/// Controls the sign of the per-node conservation inequality (spec.md §3.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupplyType {
    /// `net(v) == supply(v)` for every node; requires `sum(supply) == 0`.
    Eq,
    /// `net(v) >= supply(v)`.
    Geq,
    /// `net(v) <= supply(v)`.
    Leq,
}

/// Whether node `v`'s artificial arc must be driven to zero flow for a
/// feasible solution, given its adjusted supply `s` and the problem's
/// [`SupplyType`].
///
/// `Eq` requires `net(v) == supply(v)` exactly, so every artificial arc is
/// required. `Geq` (`net(v) >= supply(v)`) only binds a floor on nodes with
/// `s >= 0` (the ones whose artificial arc points *into* the root) — the
/// `s < 0` side is free to leave nonzero slack on its artificial arc. `Leq`
/// is the mirror image: the `s < 0` side is the floor, `s >= 0` is free.
pub(crate) fn artificial_required(supply_type: SupplyType, s: Weight) -> bool {
    match supply_type {
        SupplyType::Eq => true,
        SupplyType::Geq => s >= 0,
        SupplyType::Leq => s < 0,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArcState {
    Lower,
    Tree,
    Upper,
}

/// A bound large enough to stand in for "no practical upper bound" on an
/// artificial arc without risking overflow in the ratio test's arithmetic.
const BIG_CAPACITY: Weight = Weight::MAX / 4;

/// A primal Network Simplex solver for minimum-cost flow.
pub struct NetworkSimplex<'g, G: BaseGraph> {
    graph: &'g G,
    n: NodeIndex,
    m: ArcIndex,
    supply_type: SupplyType,

    lower: Vec<Weight>,
    upper: Vec<Weight>,
    cost: Vec<Cost>,
    supply: Vec<Weight>,
    params: SolverParams,

    // Working arrays over real arcs (0..m) plus one artificial arc per
    // real node (m..m+n).
    arc_tail: Vec<NodeIndex>,
    arc_head: Vec<NodeIndex>,
    arc_cost: Vec<Cost>,
    arc_cap: Vec<Weight>, // upper - lower
    x: Vec<Weight>,       // shifted flow, 0 <= x <= arc_cap
    state: Vec<ArcState>,
    // True for node v (indexed 0..n) if its artificial arc m+v must carry
    // zero flow for feasibility; false if nonzero flow there is permitted
    // slack under `supply_type` (see `artificial_required`).
    art_required: Vec<bool>,

    parent: Vec<NodeIndex>,
    pred_arc: Vec<ArcIndex>,
    depth: Vec<i64>,
    thread: Vec<NodeIndex>,
    rev_thread: Vec<NodeIndex>,
    succ_num: Vec<i64>,
    last_succ: Vec<NodeIndex>,
    potential: Vec<Cost>,

    next_block_start: ArcIndex,
    block_size: ArcIndex,

    initialized: bool,
    status: Status,
    stats: SolverStats,
}

impl<'g, G: BaseGraph> NetworkSimplex<'g, G> {
    /// A solver over `graph`'s topology. All bounds/costs/supplies start at
    /// zero; set them before calling [`solve`](Self::solve).
    pub fn new(graph: &'g G, supply_type: SupplyType) -> Self {
        Self::with_params(graph, supply_type, SolverParams::default())
    }

    /// As [`new`](Self::new), with explicit [`SolverParams`]: `iteration_limit`
    /// overrides the default pivot cap (`max(10^6, n*m)`) when set, and
    /// `verbosity > 0` enables the solved-summary `debug!` at the end of
    /// [`solve`](Self::solve).
    pub fn with_params(graph: &'g G, supply_type: SupplyType, params: SolverParams) -> Self {
        let n = graph.num_nodes();
        let m = graph.num_arcs();
        Self {
            graph,
            n,
            m,
            supply_type,
            lower: vec![0; m.max(0) as usize],
            upper: vec![0; m.max(0) as usize],
            cost: vec![0; m.max(0) as usize],
            supply: vec![0; n.max(0) as usize],
            params,
            arc_tail: Vec::new(),
            arc_head: Vec::new(),
            arc_cost: Vec::new(),
            arc_cap: Vec::new(),
            x: Vec::new(),
            state: Vec::new(),
            art_required: Vec::new(),
            parent: Vec::new(),
            pred_arc: Vec::new(),
            depth: Vec::new(),
            thread: Vec::new(),
            rev_thread: Vec::new(),
            succ_num: Vec::new(),
            last_succ: Vec::new(),
            potential: Vec::new(),
            next_block_start: 0,
            block_size: 1,
            initialized: false,
            status: Status::NotSolved,
            stats: SolverStats::default(),
        }
    }

    /// Set arc `a`'s `[lower, upper]` bounds.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if `lower > upper`, and
    /// [`Error::DimensionMismatch`] if `a` is out of range for this graph.
    pub fn set_arc_bounds(&mut self, a: ArcIndex, lower: Weight, upper: Weight) -> crate::Result<()> {
        if a < 0 || a >= self.m {
            return Err(Error::dimension_mismatch(self.m.max(0) as usize, a as usize));
        }
        if lower > upper {
            return Err(Error::invalid_input(format!(
                "arc {a}: lower bound {lower} exceeds upper bound {upper}"
            )));
        }
        self.lower[a as usize] = lower;
        self.upper[a as usize] = upper;
        Ok(())
    }

    /// Set arc `a`'s per-unit cost.
    pub fn set_arc_cost(&mut self, a: ArcIndex, cost: Cost) {
        self.cost[a as usize] = cost;
    }

    /// Set node `v`'s supply (sign convention per [`SupplyType`]).
    pub fn set_supply(&mut self, v: NodeIndex, supply: Weight) {
        self.supply[v as usize] = supply;
    }

    /// Solver status; [`Status::NotSolved`] before [`solve`](Self::solve)
    /// runs.
    pub fn status(&self) -> Status {
        self.status
    }

    pub fn stats(&self) -> &SolverStats {
        &self.stats
    }

    pub fn supply_type(&self) -> SupplyType {
        self.supply_type
    }

    fn root(&self) -> NodeIndex {
        self.n
    }

    fn total_arcs(&self) -> ArcIndex {
        self.m + self.n
    }

    /// Run the solve. A second call on an already-`Optimal` instance
    /// re-enters the pivot loop without reinitializing the artificial tree
    /// — the warm-start contract of spec.md §4.6.5: the caller may adjust
    /// costs (and, with care, bounds/supplies) via the setters between
    /// calls and resume; no deeper verification is performed.
    pub fn solve(&mut self) -> Status {
        let span = tracing::debug_span!("simplex::solve");
        let _enter = span.enter();
        let start = std::time::Instant::now();

        if self.supply_type == SupplyType::Eq && self.supply.iter().sum::<Weight>() != 0 {
            self.status = Status::Unbalanced;
            return self.status;
        }

        if self.n == 0 {
            self.status = Status::Optimal;
            return self.status;
        }

        if !self.initialized {
            self.initialize();
            self.initialized = true;
        }

        let limit = if self.params.has_iteration_limit() {
            self.params.iteration_limit as i64
        } else {
            (1_000_000i64).max(self.n * self.m.max(1))
        };
        let mut iterations: i64 = 0;
        loop {
            let Some(entering) = self.find_entering_arc() else {
                break;
            };
            self.pivot(entering);
            iterations += 1;
            self.stats.iterations += 1;
            if iterations > limit {
                debug!(iterations, "network simplex exceeded its pivot cap");
                self.status = Status::BadResult;
                self.stats.solve_time_seconds = start.elapsed().as_secs_f64();
                return self.status;
            }
        }

        // Only nodes whose artificial arc is *required* (supply_type,
        // adjusted_supply(v)) need it driven to zero; under Geq/Leq the
        // free side may legitimately leave slack there.
        let infeasible = (0..self.n).any(|v| {
            self.art_required[v as usize] && self.x[(self.m + v) as usize] > 0
        });
        self.status = if infeasible {
            Status::Infeasible
        } else {
            Status::Optimal
        };
        self.stats.solve_time_seconds = start.elapsed().as_secs_f64();
        self.stats.objective_value = Some(self.total_cost() as f64);
        if self.params.verbosity > 0 {
            debug!(status = ?self.status, cost = self.total_cost(), "network simplex solved");
        }
        self.status
    }

    fn initialize(&mut self) {
        let n = self.n;
        let m = self.m;
        let total_nodes = (n + 1) as usize;
        let total_arcs = (m + n) as usize;

        self.arc_tail = vec![0; total_arcs];
        self.arc_head = vec![0; total_arcs];
        self.arc_cost = vec![0; total_arcs];
        self.arc_cap = vec![0; total_arcs];
        self.x = vec![0; total_arcs];
        self.state = vec![ArcState::Lower; total_arcs];
        self.art_required = vec![true; n.max(0) as usize];

        self.parent = vec![0; total_nodes];
        self.pred_arc = vec![NO_ARC; total_nodes];
        self.depth = vec![0; total_nodes];
        self.thread = vec![0; total_nodes];
        self.rev_thread = vec![0; total_nodes];
        self.succ_num = vec![0; total_nodes];
        self.last_succ = vec![0; total_nodes];
        self.potential = vec![0; total_nodes];

        let mut adjusted_supply = self.supply.clone();
        for a in 0..m {
            let t = self.graph.tail(a);
            let h = self.graph.head(a);
            self.arc_tail[a as usize] = t;
            self.arc_head[a as usize] = h;
            self.arc_cost[a as usize] = self.cost[a as usize];
            self.arc_cap[a as usize] = self.upper[a as usize] - self.lower[a as usize];
            adjusted_supply[t as usize] -= self.lower[a as usize];
            adjusted_supply[h as usize] += self.lower[a as usize];
        }

        let big_cost: Cost = 1 + self.cost.iter().map(|c| c.abs()).sum::<Cost>();
        let r = self.root();
        for v in 0..n {
            let art = m + v;
            let s = adjusted_supply[v as usize];
            let required = artificial_required(self.supply_type, s);
            if s >= 0 {
                self.arc_tail[art as usize] = v;
                self.arc_head[art as usize] = r;
                self.x[art as usize] = s;
            } else {
                self.arc_tail[art as usize] = r;
                self.arc_head[art as usize] = v;
                self.x[art as usize] = -s;
            }
            // A required artificial arc costs big-M, so the pivot loop
            // drives it to zero. A free one (permitted slack under
            // Geq/Leq) costs nothing, so it never distorts potentials or
            // reduced costs on real arcs while carrying leftover flow.
            self.arc_cost[art as usize] = if required { big_cost } else { 0 };
            self.arc_cap[art as usize] = BIG_CAPACITY;
            self.state[art as usize] = ArcState::Tree;
            self.art_required[v as usize] = required;
            self.parent[v as usize] = r;
            self.pred_arc[v as usize] = art;
        }

        self.rebuild_tree_indices();

        let sqrt_m = (m.max(1) as f64).sqrt().ceil() as ArcIndex;
        self.block_size = sqrt_m.max(10).min(m.max(1));
        self.next_block_start = 0;
    }

    fn rebuild_tree_indices(&mut self) {
        let r = self.root();
        let total = (self.n + 1) as usize;
        let mut children: Vec<Vec<NodeIndex>> = vec![Vec::new(); total];
        for v in 0..self.n {
            children[self.parent[v as usize] as usize].push(v);
        }
        self.depth[r as usize] = 0;
        self.potential[r as usize] = 0;
        let mut preorder = Vec::with_capacity(total);
        self.dfs_assign(r, &children, &mut preorder);

        let len = preorder.len();
        for i in 0..len {
            let u = preorder[i];
            let next = preorder[(i + 1) % len];
            self.thread[u as usize] = next;
            self.rev_thread[next as usize] = u;
        }

        let mut pos = vec![0i64; total];
        for (i, &u) in preorder.iter().enumerate() {
            pos[u as usize] = i as i64;
        }
        for &u in &preorder {
            let idx = pos[u as usize] + self.succ_num[u as usize] - 1;
            self.last_succ[u as usize] = preorder[idx as usize];
        }
    }

    fn dfs_assign(
        &mut self,
        u: NodeIndex,
        children: &[Vec<NodeIndex>],
        preorder: &mut Vec<NodeIndex>,
    ) -> i64 {
        preorder.push(u);
        let mut size = 1i64;
        for &c in &children[u as usize] {
            let e = self.pred_arc[c as usize];
            self.depth[c as usize] = self.depth[u as usize] + 1;
            if self.arc_tail[e as usize] == u {
                self.potential[c as usize] = self.potential[u as usize] - self.arc_cost[e as usize];
            } else {
                self.potential[c as usize] = self.potential[u as usize] + self.arc_cost[e as usize];
            }
            size += self.dfs_assign(c, children, preorder);
        }
        self.succ_num[u as usize] = size;
        size
    }

    fn reduced_cost_internal(&self, a: ArcIndex) -> Cost {
        self.arc_cost[a as usize] - self.potential[self.arc_tail[a as usize] as usize]
            + self.potential[self.arc_head[a as usize] as usize]
    }

    fn find_entering_arc(&mut self) -> Option<ArcIndex> {
        let m = self.m;
        if m == 0 {
            return None;
        }
        let block = self.block_size.max(1);
        let mut scanned: ArcIndex = 0;
        while scanned < m {
            let mut best: Option<(ArcIndex, Cost)> = None;
            for _ in 0..block {
                if scanned >= m {
                    break;
                }
                let a = self.next_block_start;
                self.next_block_start = (self.next_block_start + 1) % m;
                scanned += 1;
                let rc = self.reduced_cost_internal(a);
                let violation = match self.state[a as usize] {
                    ArcState::Lower if rc < 0 => Some(-rc),
                    ArcState::Upper if rc > 0 => Some(rc),
                    _ => None,
                };
                if let Some(v) = violation {
                    if best.map_or(true, |(_, bv)| v > bv) {
                        best = Some((a, v));
                    }
                }
            }
            if let Some((a, _)) = best {
                return Some(a);
            }
        }
        None
    }

    fn find_join(&self, mut u: NodeIndex, mut v: NodeIndex) -> NodeIndex {
        while self.depth[u as usize] > self.depth[v as usize] {
            u = self.parent[u as usize];
        }
        while self.depth[v as usize] > self.depth[u as usize] {
            v = self.parent[v as usize];
        }
        while u != v {
            u = self.parent[u as usize];
            v = self.parent[v as usize];
        }
        u
    }

    /// Path from `u` up to (excluding) `join`, as `(node, arc)` pairs where
    /// `arc == pred_arc[node]`.
    fn path_to_join(&self, mut u: NodeIndex, join: NodeIndex) -> Vec<(NodeIndex, ArcIndex)> {
        let mut path = Vec::new();
        while u != join {
            path.push((u, self.pred_arc[u as usize]));
            u = self.parent[u as usize];
        }
        path
    }

    fn room(&self, a: ArcIndex, sign: i8) -> Weight {
        if sign > 0 {
            self.arc_cap[a as usize] - self.x[a as usize]
        } else {
            self.x[a as usize]
        }
    }

    /// True if tree arc `arc == pred_arc[node]` points from `node`'s parent
    /// down to `node` (rather than from `node` up to its parent).
    fn arc_points_down(&self, node: NodeIndex, arc: ArcIndex) -> bool {
        self.arc_tail[arc as usize] == self.parent[node as usize]
    }

    /// One pivot: find the leaving arc via the minimum-ratio test, update
    /// flows along the cycle, and either flip the entering arc's bound (no
    /// tree change) or swap it into the tree in place of the leaving arc.
    fn pivot(&mut self, entering: ArcIndex) {
        let (ct, ch) = match self.state[entering as usize] {
            ArcState::Lower => (self.arc_tail[entering as usize], self.arc_head[entering as usize]),
            _ => (self.arc_head[entering as usize], self.arc_tail[entering as usize]),
        };
        let join = self.find_join(ct, ch);

        // ct-path traversed "downward" in the cycle (join -> ct): arc
        // points down => matches => x increases (+1); else decreases (-1).
        let ct_path = self.path_to_join(ct, join);
        // ch-path traversed "upward" in the cycle (ch -> join): arc points
        // down => against => x decreases (-1); else increases (+1).
        let ch_path = self.path_to_join(ch, join);

        let entering_sign: i8 = if self.state[entering as usize] == ArcState::Lower {
            1
        } else {
            -1
        };
        let mut best_room = self.room(entering, entering_sign);
        // 0 = entering, 1 = ct-path, 2 = ch-path.
        let mut best_kind = 0usize;
        let mut best_index = 0usize;

        for (i, &(node, arc)) in ct_path.iter().enumerate() {
            let sign: i8 = if self.arc_points_down(node, arc) { 1 } else { -1 };
            let r = self.room(arc, sign);
            if r < best_room {
                best_room = r;
                best_kind = 1;
                best_index = i;
            }
        }
        for (i, &(node, arc)) in ch_path.iter().enumerate() {
            let sign: i8 = if self.arc_points_down(node, arc) { -1 } else { 1 };
            let r = self.room(arc, sign);
            if r < best_room {
                best_room = r;
                best_kind = 2;
                best_index = i;
            }
        }

        if best_room >= BIG_CAPACITY {
            self.status = Status::Unbounded;
            return;
        }
        let theta = best_room;

        // Apply theta to the entering arc.
        match self.state[entering as usize] {
            ArcState::Lower => self.x[entering as usize] += theta,
            _ => self.x[entering as usize] -= theta,
        }
        for &(node, arc) in &ct_path {
            let sign: i8 = if self.arc_points_down(node, arc) { 1 } else { -1 };
            self.x[arc as usize] += sign as Weight * theta;
        }
        for &(node, arc) in &ch_path {
            let sign: i8 = if self.arc_points_down(node, arc) { -1 } else { 1 };
            self.x[arc as usize] += sign as Weight * theta;
        }

        if best_kind == 0 {
            // Bound flip: entering arc changes bound, tree untouched.
            self.state[entering as usize] = match self.state[entering as usize] {
                ArcState::Lower => ArcState::Upper,
                _ => ArcState::Lower,
            };
            return;
        }

        let (leave_node, leave_arc, u_in, base) = if best_kind == 1 {
            let (node, arc) = ct_path[best_index];
            (node, arc, ct, ch)
        } else {
            let (node, arc) = ch_path[best_index];
            (node, arc, ch, ct)
        };

        self.state[leave_arc as usize] = if self.x[leave_arc as usize] <= 0 {
            ArcState::Lower
        } else {
            ArcState::Upper
        };
        self.state[entering as usize] = ArcState::Tree;

        // Reverse the parent chain from u_in up to (and including)
        // leave_node, then attach u_in to `base` via the entering arc.
        let mut chain = Vec::new();
        let mut cur = u_in;
        loop {
            chain.push(cur);
            if cur == leave_node {
                break;
            }
            cur = self.parent[cur as usize];
        }
        let old_pred: Vec<ArcIndex> = chain.iter().map(|&node| self.pred_arc[node as usize]).collect();

        self.parent[chain[0] as usize] = base;
        self.pred_arc[chain[0] as usize] = entering;
        for i in 1..chain.len() {
            self.parent[chain[i] as usize] = chain[i - 1];
            self.pred_arc[chain[i] as usize] = old_pred[i - 1];
        }

        self.rebuild_tree_indices();
    }

    /// Original (unshifted) flow on real arc `a`.
    pub fn flow(&self, a: ArcIndex) -> Weight {
        self.lower[a as usize] + self.x[a as usize]
    }

    /// Dual price of node `v`.
    pub fn potential(&self, v: NodeIndex) -> Cost {
        self.potential[v as usize]
    }

    /// Reduced cost of real arc `a`.
    pub fn reduced_cost(&self, a: ArcIndex) -> Cost {
        self.reduced_cost_internal(a)
    }

    /// Total cost of the reported flow.
    pub fn total_cost(&self) -> Cost {
        (0..self.m)
            .map(|a| self.cost[a as usize] * self.flow(a))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::StaticGraph;

    fn build(arcs: &[(NodeIndex, NodeIndex)]) -> (StaticGraph, Vec<ArcIndex>) {
        let mut g = StaticGraph::new();
        let ids: Vec<ArcIndex> = arcs.iter().map(|&(t, h)| g.add_arc(t, h)).collect();
        let perm = g.build().unwrap();
        let remapped: Vec<ArcIndex> = ids.iter().map(|&id| perm[id as usize]).collect();
        (g, remapped)
    }

    #[test]
    fn four_node_transportation() {
        // Nodes 1..4 in spec.md become 0..3 here.
        let (g, arcs) = build(&[(0, 1), (0, 2), (1, 3), (2, 3), (1, 2)]);
        let mut ns = NetworkSimplex::new(&g, SupplyType::Eq);
        ns.set_supply(0, 10);
        ns.set_supply(3, -10);

        let bounds = [(0, 10), (0, 10), (0, 10), (0, 10), (0, 5)];
        let costs = [1, 3, 2, 1, 1];
        for (a, ((lo, up), c)) in arcs.iter().zip(bounds.into_iter().zip(costs)) {
            ns.set_arc_bounds(*a, lo, up).unwrap();
            ns.set_arc_cost(*a, c);
        }

        assert_eq!(ns.solve(), Status::Optimal);
        assert_eq!(ns.total_cost(), 30);
        assert_eq!(ns.flow(arcs[0]), 10);
        assert_eq!(ns.flow(arcs[2]), 10);
        assert_eq!(ns.flow(arcs[1]), 0);
        assert_eq!(ns.flow(arcs[3]), 0);
        assert_eq!(ns.flow(arcs[4]), 0);
    }

    #[test]
    fn unbalanced_eq_supply_fails_fast() {
        let (g, arcs) = build(&[(0, 1)]);
        let mut ns = NetworkSimplex::new(&g, SupplyType::Eq);
        ns.set_supply(0, 5);
        ns.set_supply(1, -4);
        ns.set_arc_bounds(arcs[0], 0, 10).unwrap();
        assert_eq!(ns.solve(), Status::Unbalanced);
    }

    #[test]
    fn reduced_cost_is_zero_on_every_tree_arc_at_optimum() {
        let (g, arcs) = build(&[(0, 1), (1, 2), (0, 2)]);
        let mut ns = NetworkSimplex::new(&g, SupplyType::Eq);
        ns.set_supply(0, 5);
        ns.set_supply(2, -5);
        for a in &arcs {
            ns.set_arc_bounds(*a, 0, 10).unwrap();
        }
        ns.set_arc_cost(arcs[0], 1);
        ns.set_arc_cost(arcs[1], 1);
        ns.set_arc_cost(arcs[2], 5);
        assert_eq!(ns.solve(), Status::Optimal);
        assert_eq!(ns.total_cost(), 10);
    }

    #[test]
    fn set_arc_bounds_rejects_inverted_range() {
        let (g, arcs) = build(&[(0, 1)]);
        let mut ns = NetworkSimplex::new(&g, SupplyType::Eq);
        assert!(ns.set_arc_bounds(arcs[0], 10, 0).is_err());
    }

    #[test]
    fn set_arc_bounds_rejects_out_of_range_arc() {
        let (g, _arcs) = build(&[(0, 1)]);
        let mut ns = NetworkSimplex::new(&g, SupplyType::Eq);
        assert!(ns.set_arc_bounds(5, 0, 10).is_err());
    }

    #[test]
    fn geq_requires_supply_floor_to_be_met() {
        // 0 -> 1, capacity 10, cost 1. Under Geq, node 0's declared supply
        // is a floor (net(0) >= 10) that must be realized exactly when the
        // only path is capacity-bound at exactly 10.
        let (g, arcs) = build(&[(0, 1)]);
        let mut ns = NetworkSimplex::new(&g, SupplyType::Geq);
        ns.set_supply(0, 10);
        ns.set_supply(1, -10);
        ns.set_arc_bounds(arcs[0], 0, 10).unwrap();
        ns.set_arc_cost(arcs[0], 1);
        assert_eq!(ns.solve(), Status::Optimal);
        assert_eq!(ns.flow(arcs[0]), 10);
    }

    #[test]
    fn geq_permits_partially_satisfied_demand() {
        // Node 1's demand (supply -10) is a ceiling under Geq, not a
        // floor: routing only part of it through a narrow arc is still
        // feasible, unlike under Eq where this instance is infeasible.
        let (g, arcs) = build(&[(0, 1)]);
        let mut ns = NetworkSimplex::new(&g, SupplyType::Geq);
        ns.set_supply(0, 3);
        ns.set_supply(1, -10);
        ns.set_arc_bounds(arcs[0], 0, 3).unwrap();
        ns.set_arc_cost(arcs[0], 1);
        assert_eq!(ns.solve(), Status::Optimal);
        assert_eq!(ns.flow(arcs[0]), 3);
    }

    #[test]
    fn leq_permits_undersupplied_source() {
        // Mirror of the Geq case: under Leq, node 0's supply is a ceiling
        // (it may emit less than declared) while node 1's demand is a
        // floor that must be met exactly.
        let (g, arcs) = build(&[(0, 1)]);
        let mut ns = NetworkSimplex::new(&g, SupplyType::Leq);
        ns.set_supply(0, 10);
        ns.set_supply(1, -3);
        ns.set_arc_bounds(arcs[0], 0, 3).unwrap();
        ns.set_arc_cost(arcs[0], 1);
        assert_eq!(ns.solve(), Status::Optimal);
        assert_eq!(ns.flow(arcs[0]), 3);
    }

    #[test]
    fn leq_infeasible_when_floor_demand_cannot_be_met() {
        let (g, arcs) = build(&[(0, 1)]);
        let mut ns = NetworkSimplex::new(&g, SupplyType::Leq);
        ns.set_supply(0, 10);
        ns.set_supply(1, -10);
        ns.set_arc_bounds(arcs[0], 0, 3).unwrap();
        ns.set_arc_cost(arcs[0], 1);
        assert_eq!(ns.solve(), Status::Infeasible);
    }
}
