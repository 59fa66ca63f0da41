use ark_std::rand::{rngs::StdRng, SeedableRng};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use gs_crypto_utils::misc::rand_bits_signed;
use qr_group::{
    element::{GroupElement, QrElementN},
    group::{QrGroup, QrGroupPq},
    prime::SpecialRsaMod,
};

const MODULUS_BITS: usize = 512;
const EXPONENT_BITS: usize = 600;

fn mod_pow_benchmark(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0u64);
    let modulus = SpecialRsaMod::generate(&mut rng, MODULUS_BITS, 40).unwrap();
    let group = QrGroupPq::new(modulus).unwrap();
    let element = group.create_random_element(&mut rng).unwrap();
    let public = element.public_clone();
    let exponent = rand_bits_signed(&mut rng, EXPONENT_BITS);

    let mut bench_group = c.benchmark_group(format!("{} bit modulus", MODULUS_BITS));
    bench_group.bench_function("mod_pow with CRT", |b| {
        b.iter(|| element.mod_pow(black_box(&exponent)).unwrap())
    });
    bench_group.bench_function("mod_pow without factorization", |b| {
        b.iter(|| public.mod_pow(black_box(&exponent)).unwrap())
    });
    bench_group.finish();
}

fn multi_base_exp_benchmark(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0u64);
    let modulus = SpecialRsaMod::generate(&mut rng, MODULUS_BITS, 40).unwrap();
    let group = QrGroupPq::new(modulus).unwrap().public_group();

    let mut bench_group = c.benchmark_group("multi_base_exp");
    for count in [2, 8, 32, 64] {
        let bases = (0..count)
            .map(|_| group.create_random_element(&mut rng).unwrap())
            .collect::<Vec<_>>();
        let exponents = (0..count)
            .map(|_| rand_bits_signed(&mut rng, EXPONENT_BITS))
            .collect::<Vec<_>>();
        bench_group.bench_with_input(BenchmarkId::new("simultaneous", count), &count, |b, _| {
            b.iter(|| {
                QrElementN::multi_base_exp(black_box(&bases), black_box(&exponents)).unwrap()
            })
        });
        bench_group.bench_with_input(BenchmarkId::new("one by one", count), &count, |b, _| {
            b.iter(|| {
                bases
                    .iter()
                    .zip(exponents.iter())
                    .map(|(g, e)| g.mod_pow(e).unwrap())
                    .reduce(|acc, x| acc.multiply(&x).unwrap())
                    .unwrap()
            })
        });
    }
    bench_group.finish();
}

criterion_group!(benches, mod_pow_benchmark, multi_base_exp_benchmark);
criterion_main!(benches);
