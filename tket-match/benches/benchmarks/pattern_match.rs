use std::hint::black_box;

use criterion::{criterion_group, AxisScale, BenchmarkId, Criterion, PlotConfiguration};
use tket_match::gadgets::{all_gadgets, CXGadgetMatcher, ThreeQubitBoundaryMatcher};
use tket_match::rewrite::matcher::{CircuitMatchAdapter, MatchingOptions};

use super::generators::{make_cnot_layers, make_zz_sandwiches};

/// Benchmark the stream matcher on layers of CNOTs, sequentially and with
/// parallel attempts.
fn bench_cx_layers(c: &mut Criterion) {
    let mut g = c.benchmark_group("match CX layers");
    g.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for layers in [10, 100, 1000] {
        let circ = make_cnot_layers(8, layers);
        let matcher = CircuitMatchAdapter::new(&CXGadgetMatcher);
        for (name, options) in [
            ("sequential", MatchingOptions::default()),
            ("parallel", MatchingOptions::default().parallel()),
        ] {
            g.bench_with_input(BenchmarkId::new(name, layers), &circ, |b, circ| {
                b.iter(|| black_box(matcher.get_all_matches(circ, &options)))
            });
        }
    }
    g.finish();
}

/// The boundary collector keeps many attempts alive; bound their span.
fn bench_three_qubit_span(c: &mut Criterion) {
    let mut g = c.benchmark_group("match 3-qubit blocks");

    let circ = make_cnot_layers(8, 200);
    let matcher = CircuitMatchAdapter::new(&ThreeQubitBoundaryMatcher);
    for span in [4, 16, 64] {
        let options = MatchingOptions::default()
            .with_max_attempt_span(span)
            .only_maximal_matches();
        g.bench_with_input(BenchmarkId::from_parameter(span), &circ, |b, circ| {
            b.iter(|| black_box(matcher.get_all_matches(circ, &options)))
        });
    }
    g.finish();
}

/// Find the rewrites of every gadget.
fn bench_all_gadgets(c: &mut Criterion) {
    let mut g = c.benchmark_group("all gadgets");

    let gadgets = all_gadgets();
    for layers in [10, 50] {
        let circ = make_zz_sandwiches(6, layers);
        g.bench_with_input(BenchmarkId::from_parameter(layers), &circ, |b, circ| {
            b.iter(|| {
                for gadget in &gadgets {
                    black_box(gadget.get_rewrites(circ).unwrap());
                }
            })
        });
    }
    g.finish();
}

criterion_group! {
    name = benches;
    config = Criterion::default();
    targets =
        bench_cx_layers,
        bench_three_qubit_span,
        bench_all_gadgets,
}
