//! Benchmarks for the flow solvers.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use converge_flow::cost_scaling::CostScaling;
use converge_flow::graph::{ReverseArcStaticGraph, StaticGraph};
use converge_flow::maxflow::MaxFlow;
use converge_flow::simplex::{NetworkSimplex, SupplyType};

fn random_dag_arcs(nodes: usize, edges: usize, seed: u64) -> Vec<(i64, i64, i64, i64)> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..edges)
        .map(|_| {
            let t = rng.gen_range(0..nodes - 1);
            let h = rng.gen_range(t + 1..nodes);
            let cap = rng.gen_range(1..100);
            let cost = rng.gen_range(1..50);
            (t as i64, h as i64, cap, cost)
        })
        .collect()
}

fn bench_maxflow(c: &mut Criterion) {
    let mut group = c.benchmark_group("maxflow");

    for (nodes, edges) in [(100, 500), (500, 2500), (1000, 5000)] {
        let arcs = random_dag_arcs(nodes, edges, 42);
        group.bench_with_input(BenchmarkId::new("nodes", nodes), &arcs, |b, arcs| {
            b.iter(|| {
                let mut g = ReverseArcStaticGraph::new();
                let ids: Vec<_> = arcs.iter().map(|&(t, h, _, _)| g.add_arc(t, h)).collect();
                let perm = g.build().unwrap();
                let mut mf = MaxFlow::new(&g, 0, (nodes - 1) as i64);
                for (&(_, _, cap, _), id) in arcs.iter().zip(ids) {
                    mf.set_arc_capacity(perm[id as usize], cap).unwrap();
                }
                black_box(mf.solve());
                black_box(mf.optimal_flow())
            })
        });
    }

    group.finish();
}

fn bench_network_simplex(c: &mut Criterion) {
    let mut group = c.benchmark_group("network_simplex");

    for (nodes, edges) in [(100, 500), (500, 2500)] {
        let arcs = random_dag_arcs(nodes, edges, 7);
        group.bench_with_input(BenchmarkId::new("nodes", nodes), &arcs, |b, arcs| {
            b.iter(|| {
                let mut g = StaticGraph::new();
                let ids: Vec<_> = arcs.iter().map(|&(t, h, _, _)| g.add_arc(t, h)).collect();
                let perm = g.build().unwrap();
                let mut ns = NetworkSimplex::new(&g, SupplyType::Eq);
                for (&(_, _, cap, cost), id) in arcs.iter().zip(ids) {
                    ns.set_arc_bounds(perm[id as usize], 0, cap as i64).unwrap();
                    ns.set_arc_cost(perm[id as usize], cost as i64);
                }
                ns.set_supply(0, 50);
                ns.set_supply((nodes - 1) as i64, -50);
                black_box(ns.solve());
            })
        });
    }

    group.finish();
}

fn bench_cost_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("cost_scaling");

    for (nodes, edges) in [(100, 500), (500, 2500)] {
        let arcs = random_dag_arcs(nodes, edges, 99);
        group.bench_with_input(BenchmarkId::new("nodes", nodes), &arcs, |b, arcs| {
            b.iter(|| {
                let mut g = ReverseArcStaticGraph::new();
                let ids: Vec<_> = arcs.iter().map(|&(t, h, _, _)| g.add_arc(t, h)).collect();
                let perm = g.build().unwrap();
                let mut cs = CostScaling::new(&g, SupplyType::Eq);
                for (&(_, _, cap, cost), id) in arcs.iter().zip(ids) {
                    cs.set_arc_bounds(perm[id as usize], 0, cap as i64).unwrap();
                    cs.set_arc_cost(perm[id as usize], cost as i64);
                }
                cs.set_supply(0, 50);
                cs.set_supply((nodes - 1) as i64, -50);
                black_box(cs.solve());
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_maxflow, bench_network_simplex, bench_cost_scaling);
criterion_main!(benches);
