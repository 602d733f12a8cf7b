//! Benchmarks for witness computation
//!
//! Run with: cargo bench

use criterion::{criterion_group, criterion_main, Criterion};
use zk_credit_witness::{
    calculate_witness, circuit::ORDER_COUNT, Config, CreditCheckCircuit, CreditCheckInput,
    FieldElement, Template,
};

fn bench_credit_check(c: &mut Criterion) {
    let circuit = CreditCheckCircuit::new().unwrap();
    let amounts: Vec<u64> = (0..ORDER_COUNT as u64).map(|i| 100 + i * 37).collect();
    let input = CreditCheckInput::from_orders(&amounts, &Config::default()).unwrap();

    c.bench_function("CreditCheck witness", |b| {
        b.iter(|| circuit.calculate(&input).unwrap());
    });

    c.bench_function("CreditCheck layout + witness", |b| {
        b.iter(|| CreditCheckCircuit::new().unwrap().calculate(&input).unwrap());
    });
}

fn bench_comparator(c: &mut Criterion) {
    let operands = [FieldElement::from(50_000u64), FieldElement::from(40_000u64)];

    c.bench_function("LessThan(64) witness", |b| {
        b.iter(|| calculate_witness(Template::LessThan { n: 64 }, &[("in", &operands)]).unwrap());
    });
}

criterion_group!(benches, bench_credit_check, bench_comparator);
criterion_main!(benches);
