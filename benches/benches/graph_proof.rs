use ark_std::rand::{rngs::StdRng, SeedableRng};
use benches::{prove_graph, verify_graph, VERTEX_COUNTS};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use gs_proof_system::{encoding::encode_graph, keys::GraphEncodingParameters};
use test_utils::graphs::{
    random_graph, setup_extended_key_pair_with, test_encoding_params, test_key_gen_params,
};

fn graph_proof_benchmark(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0u64);
    let max_vertices = VERTEX_COUNTS[VERTEX_COUNTS.len() - 1];
    let encoding = GraphEncodingParameters {
        l_v_pool: max_vertices,
        l_e_pool: 2 * max_vertices,
        ..test_encoding_params()
    };
    let ekp = setup_extended_key_pair_with(&mut rng, &test_key_gen_params(), &encoding);
    let epk = &ekp.public;

    let mut prove_group = c.benchmark_group("Graph proof creation");
    let mut cases = Vec::new();
    for vertices in VERTEX_COUNTS {
        let graph = random_graph(&mut rng, vertices, 2 * vertices, &encoding);
        let encoded = encode_graph(&mut rng, &graph, epk).unwrap();
        prove_group.bench_with_input(BenchmarkId::from_parameter(vertices), &vertices, |b, _| {
            b.iter(|| prove_graph(&mut rng, epk, black_box(&encoded.bases)))
        });
        cases.push((vertices, prove_graph(&mut rng, epk, &encoded.bases)));
    }
    prove_group.finish();

    let mut verify_group = c.benchmark_group("Graph proof verification");
    for (vertices, proof) in cases {
        assert!(verify_graph(epk, &proof).is_accepted());
        verify_group.bench_with_input(BenchmarkId::from_parameter(vertices), &vertices, |b, _| {
            b.iter(|| verify_graph(epk, black_box(&proof)))
        });
    }
    verify_group.finish();
}

criterion_group!(benches, graph_proof_benchmark);
criterion_main!(benches);
