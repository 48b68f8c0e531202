//! Solution validator, spec.md §4.8.
//!
//! Independent of which engine produced a flow: checks conservation,
//! bounds, complementary slackness, dual feasibility, and the primal/dual
//! cost identity in `O(n+m)`. A validator that shares no code with the
//! solvers is the only way a bug in one doesn't also hide in the check.

use thiserror::Error;

use crate::graph::{ArcIndex, BaseGraph, NodeIndex};
use crate::simplex::SupplyType;
use crate::types::{Cost, Weight};

/// Why a reported solution failed validation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// `net(v)` doesn't satisfy the conservation inequality for the
    /// problem's supply type.
    #[error("node {node}: flow conservation violated (net={net}, supply={supply})")]
    FlowConservation {
        node: NodeIndex,
        net: Weight,
        supply: Weight,
    },

    /// `flow(a)` outside `[lower(a), upper(a)]`.
    #[error("arc {arc}: flow {flow} outside bounds [{lower}, {upper}]")]
    BoundsViolated {
        arc: ArcIndex,
        flow: Weight,
        lower: Weight,
        upper: Weight,
    },

    /// A positive reduced cost arc isn't pinned at its lower bound, or a
    /// negative one isn't pinned at its upper bound.
    #[error(
        "arc {arc}: complementary slackness violated (reduced cost {reduced_cost}, flow {flow}, bounds [{lower}, {upper}])"
    )]
    ComplementarySlackness {
        arc: ArcIndex,
        reduced_cost: Cost,
        flow: Weight,
        lower: Weight,
        upper: Weight,
    },

    /// `potential(v)`'s sign is wrong given how `net(v)` compares to
    /// `supply(v)` for a GEQ/LEQ problem.
    #[error("node {node}: dual infeasible (potential={potential}, net={net}, supply={supply})")]
    DualInfeasible {
        node: NodeIndex,
        potential: Cost,
        net: Weight,
        supply: Weight,
    },

    /// Primal total cost doesn't match the dual objective.
    #[error("dual cost identity violated: primal cost {primal_cost}, dual value {dual_value}")]
    DualCostMismatch { primal_cost: Cost, dual_value: Cost },
}

/// The reported solution a validator checks, keyed by the same node/arc
/// indices as the graph it was solved on.
pub struct Solution<'a> {
    pub lower: &'a [Weight],
    pub upper: &'a [Weight],
    pub cost: &'a [Cost],
    pub flow: &'a [Weight],
    pub supply: &'a [Weight],
    pub potential: &'a [Cost],
}

fn reduced_cost<G: BaseGraph>(graph: &G, solution: &Solution, a: ArcIndex) -> Cost {
    let t = graph.tail(a) as usize;
    let h = graph.head(a) as usize;
    solution.cost[a as usize] - solution.potential[t] + solution.potential[h]
}

/// Run all five checks from spec.md §4.8, stopping at (and reporting) the
/// first one that fails.
pub fn validate<G: BaseGraph>(
    graph: &G,
    supply_type: SupplyType,
    solution: &Solution,
) -> Result<(), ValidationError> {
    let n = graph.num_nodes();
    let m = graph.num_arcs();

    // net(v) = outflow(v) - inflow(v), the sign convention that keeps this
    // consistent with the reduced-cost formula used everywhere else
    // (cost(a) - potential(tail(a)) + potential(head(a))) and with the
    // positive-supply-is-a-source convention the solvers use when building
    // artificial arcs.
    let mut net = vec![0 as Weight; n as usize];
    for a in 0..m {
        let t = graph.tail(a) as usize;
        let h = graph.head(a) as usize;
        let f = solution.flow[a as usize];
        net[t] += f;
        net[h] -= f;
    }

    for v in 0..n {
        let idx = v as usize;
        let ok = match supply_type {
            SupplyType::Eq => net[idx] == solution.supply[idx],
            SupplyType::Geq => net[idx] >= solution.supply[idx],
            SupplyType::Leq => net[idx] <= solution.supply[idx],
        };
        if !ok {
            return Err(ValidationError::FlowConservation {
                node: v,
                net: net[idx],
                supply: solution.supply[idx],
            });
        }
    }

    for a in 0..m {
        let idx = a as usize;
        let f = solution.flow[idx];
        if f < solution.lower[idx] || f > solution.upper[idx] {
            return Err(ValidationError::BoundsViolated {
                arc: a,
                flow: f,
                lower: solution.lower[idx],
                upper: solution.upper[idx],
            });
        }
    }

    for a in 0..m {
        let idx = a as usize;
        let rc = reduced_cost(graph, solution, a);
        let f = solution.flow[idx];
        if rc > 0 && f != solution.lower[idx] {
            return Err(ValidationError::ComplementarySlackness {
                arc: a,
                reduced_cost: rc,
                flow: f,
                lower: solution.lower[idx],
                upper: solution.upper[idx],
            });
        }
        if rc < 0 && f != solution.upper[idx] {
            return Err(ValidationError::ComplementarySlackness {
                arc: a,
                reduced_cost: rc,
                flow: f,
                lower: solution.lower[idx],
                upper: solution.upper[idx],
            });
        }
    }

    for v in 0..n {
        let idx = v as usize;
        match supply_type {
            SupplyType::Geq => {
                if net[idx] > solution.supply[idx] && solution.potential[idx] > 0 {
                    return Err(ValidationError::DualInfeasible {
                        node: v,
                        potential: solution.potential[idx],
                        net: net[idx],
                        supply: solution.supply[idx],
                    });
                }
            }
            SupplyType::Leq => {
                if net[idx] < solution.supply[idx] && solution.potential[idx] < 0 {
                    return Err(ValidationError::DualInfeasible {
                        node: v,
                        potential: solution.potential[idx],
                        net: net[idx],
                        supply: solution.supply[idx],
                    });
                }
            }
            SupplyType::Eq => {}
        }
    }

    let primal_cost: Cost = (0..m)
        .map(|a| solution.cost[a as usize] * solution.flow[a as usize])
        .sum();

    let mut dual_value: Cost = (0..n).map(|v| solution.potential[v as usize] * solution.supply[v as usize]).sum();
    for a in 0..m {
        let idx = a as usize;
        dual_value += solution.lower[idx] * solution.cost[idx];
        let rc = reduced_cost(graph, solution, a);
        dual_value += solution.upper[idx] * (-rc).max(0);
    }
    if primal_cost != dual_value {
        return Err(ValidationError::DualCostMismatch {
            primal_cost,
            dual_value,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::StaticGraph;

    fn path_graph() -> (StaticGraph, Vec<ArcIndex>) {
        let mut g = StaticGraph::new();
        let ids = vec![g.add_arc(0, 1), g.add_arc(1, 2)];
        let perm = g.build().unwrap();
        (g, ids.iter().map(|&id| perm[id as usize]).collect())
    }

    #[test]
    fn accepts_a_hand_verified_optimal_solution() {
        let (g, arcs) = path_graph();
        let mut lower = vec![0; 2];
        let mut upper = vec![10; 2];
        let mut cost = vec![0; 2];
        let mut flow = vec![0; 2];
        lower[arcs[0] as usize] = 0;
        upper[arcs[0] as usize] = 10;
        cost[arcs[0] as usize] = 1;
        flow[arcs[0] as usize] = 5;
        lower[arcs[1] as usize] = 0;
        upper[arcs[1] as usize] = 10;
        cost[arcs[1] as usize] = 2;
        flow[arcs[1] as usize] = 5;

        let supply = vec![5, 0, -5];
        // Both arcs carry flow strictly between their bounds, so both must
        // be zero-reduced-cost: potential[0] = 0, potential[1] =
        // potential[0] - cost(0->1) = -1, potential[2] = potential[1] -
        // cost(1->2) = -3.
        let potential = vec![0, -1, -3];

        let solution = Solution {
            lower: &lower,
            upper: &upper,
            cost: &cost,
            flow: &flow,
            supply: &supply,
            potential: &potential,
        };
        assert_eq!(validate(&g, SupplyType::Eq, &solution), Ok(()));
    }

    #[test]
    fn rejects_a_conservation_violation() {
        let (g, arcs) = path_graph();
        let mut lower = vec![0; 2];
        let mut upper = vec![10; 2];
        let cost = vec![0; 2];
        let mut flow = vec![0; 2];
        upper[arcs[0] as usize] = 10;
        upper[arcs[1] as usize] = 10;
        flow[arcs[0] as usize] = 5;
        flow[arcs[1] as usize] = 3; // breaks conservation at node 1
        lower.iter_mut().for_each(|l| *l = 0);

        let supply = vec![5, 0, -5];
        let potential = vec![0, 0, 0];
        let solution = Solution {
            lower: &lower,
            upper: &upper,
            cost: &cost,
            flow: &flow,
            supply: &supply,
            potential: &potential,
        };
        assert!(matches!(
            validate(&g, SupplyType::Eq, &solution),
            Err(ValidationError::FlowConservation { .. })
        ));
    }

    #[test]
    fn rejects_an_out_of_bounds_flow() {
        let (g, arcs) = path_graph();
        let mut lower = vec![0; 2];
        let mut upper = vec![5; 2];
        let cost = vec![0; 2];
        let mut flow = vec![0; 2];
        flow[arcs[0] as usize] = 7; // over upper bound of 5
        flow[arcs[1] as usize] = 7;
        lower.iter_mut().for_each(|l| *l = 0);
        upper.iter_mut().for_each(|u| *u = 5);

        let supply = vec![7, 0, -7];
        let potential = vec![0, 0, 0];
        let solution = Solution {
            lower: &lower,
            upper: &upper,
            cost: &cost,
            flow: &flow,
            supply: &supply,
            potential: &potential,
        };
        assert!(matches!(
            validate(&g, SupplyType::Eq, &solution),
            Err(ValidationError::BoundsViolated { .. })
        ));
    }

    // Zero cost everywhere makes every reduced cost zero regardless of
    // potentials, which keeps complementary slackness and the dual cost
    // identity trivially satisfied and isolates these cases to the
    // GEQ/LEQ conservation inequality itself.
    fn zero_cost_solution<'a>(
        lower: &'a [Weight],
        upper: &'a [Weight],
        cost: &'a [Cost],
        flow: &'a [Weight],
        supply: &'a [Weight],
        potential: &'a [Cost],
    ) -> Solution<'a> {
        Solution {
            lower,
            upper,
            cost,
            flow,
            supply,
            potential,
        }
    }

    #[test]
    fn geq_accepts_slack_on_the_demand_side() {
        let (g, arcs) = path_graph();
        let mut lower = vec![0; 2];
        let mut upper = vec![10; 2];
        let cost = vec![0; 2];
        let mut flow = vec![0; 2];
        flow[arcs[0] as usize] = 5;
        flow[arcs[1] as usize] = 5;
        upper.iter_mut().for_each(|u| *u = 10);
        lower.iter_mut().for_each(|l| *l = 0);

        // net = [5, 0, -5]; supply states a deeper demand of -10 at node 2
        // than the flow actually drains, which Geq (net >= supply) permits.
        let supply = vec![5, 0, -10];
        let potential = vec![0, 0, 0];
        let solution = zero_cost_solution(&lower, &upper, &cost, &flow, &supply, &potential);
        assert_eq!(validate(&g, SupplyType::Geq, &solution), Ok(()));
    }

    #[test]
    fn geq_rejects_when_the_supply_floor_is_unmet() {
        let (g, arcs) = path_graph();
        let mut lower = vec![0; 2];
        let mut upper = vec![10; 2];
        let cost = vec![0; 2];
        let mut flow = vec![0; 2];
        flow[arcs[0] as usize] = 5;
        flow[arcs[1] as usize] = 5;
        upper.iter_mut().for_each(|u| *u = 10);
        lower.iter_mut().for_each(|l| *l = 0);

        // node 0 must supply at least 10 under Geq but the flow only routes 5.
        let supply = vec![10, 0, -5];
        let potential = vec![0, 0, 0];
        let solution = zero_cost_solution(&lower, &upper, &cost, &flow, &supply, &potential);
        assert!(matches!(
            validate(&g, SupplyType::Geq, &solution),
            Err(ValidationError::FlowConservation { .. })
        ));
    }

    #[test]
    fn leq_accepts_slack_on_the_supply_side() {
        let (g, arcs) = path_graph();
        let mut lower = vec![0; 2];
        let mut upper = vec![10; 2];
        let cost = vec![0; 2];
        let mut flow = vec![0; 2];
        flow[arcs[0] as usize] = 5;
        flow[arcs[1] as usize] = 5;
        upper.iter_mut().for_each(|u| *u = 10);
        lower.iter_mut().for_each(|l| *l = 0);

        // node 0 is willing to supply up to 10 under Leq but only 5 is used.
        let supply = vec![10, 0, -5];
        let potential = vec![0, 0, 0];
        let solution = zero_cost_solution(&lower, &upper, &cost, &flow, &supply, &potential);
        assert_eq!(validate(&g, SupplyType::Leq, &solution), Ok(()));
    }

    #[test]
    fn leq_rejects_when_the_supply_ceiling_is_exceeded() {
        let (g, arcs) = path_graph();
        let mut lower = vec![0; 2];
        let mut upper = vec![10; 2];
        let cost = vec![0; 2];
        let mut flow = vec![0; 2];
        flow[arcs[0] as usize] = 5;
        flow[arcs[1] as usize] = 5;
        upper.iter_mut().for_each(|u| *u = 10);
        lower.iter_mut().for_each(|l| *l = 0);

        // node 0 may supply at most 3 under Leq but the flow routes 5.
        let supply = vec![3, 0, -5];
        let potential = vec![0, 0, 0];
        let solution = zero_cost_solution(&lower, &upper, &cost, &flow, &supply, &potential);
        assert!(matches!(
            validate(&g, SupplyType::Leq, &solution),
            Err(ValidationError::FlowConservation { .. })
        ));
    }
}
