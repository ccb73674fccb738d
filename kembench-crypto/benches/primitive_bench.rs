//! Criterion benchmarks for the bundled primitives: keygen, encapsulate, decapsulate.
//!
//! Inputs are generated outside the measured closure with `iter_batched`, so
//! each sample sees fresh key material the way the engine's input pool does.

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use kembench_core::constants::*;
use kembench_core::{KemPrimitive, KeyLengths, NativeResource};
use kembench_crypto::mlkem::{MlKem768, MlKemPrimitive};
use kembench_crypto::{KyberLevel, KyberPrimitive, ToyKem};

fn kems() -> Vec<(&'static str, Box<dyn KemPrimitive>)> {
    let kyber: Box<dyn KemPrimitive> = Box::new(KyberPrimitive::new(KyberLevel::Kyber768));
    let ml_kem: Box<dyn KemPrimitive> = Box::new(MlKemPrimitive::<MlKem768>::new(
        "ML-KEM-768",
        KeyLengths::new(
            KEM_768_PUBLIC_KEY_SIZE,
            KEM_768_SECRET_KEY_SIZE,
            KEM_768_CIPHERTEXT_SIZE,
            KEM_SHARED_SECRET_SIZE,
        ),
    ));
    let toy: Box<dyn KemPrimitive> = Box::new(ToyKem::new());

    vec![("Kyber768", kyber), ("ML-KEM-768", ml_kem), (TOY_KEM_NAME, toy)]
}

fn bench_keygen(c: &mut Criterion) {
    let mut g = c.benchmark_group("keygen");
    g.throughput(Throughput::Elements(1));
    for (name, kem) in kems() {
        g.bench_function(name, |b| {
            b.iter(|| black_box(kem.keypair()).unwrap());
        });
    }
    g.finish();
}

fn bench_encapsulate(c: &mut Criterion) {
    let mut g = c.benchmark_group("encapsulate");
    g.throughput(Throughput::Elements(1));
    for (name, kem) in kems() {
        g.bench_function(name, |b| {
            b.iter_batched(
                || kem.keypair().unwrap().0,
                |pk| black_box(kem.encapsulate(&pk)).unwrap(),
                BatchSize::SmallInput,
            );
        });
    }
    g.finish();
}

fn bench_decapsulate(c: &mut Criterion) {
    let mut g = c.benchmark_group("decapsulate");
    g.throughput(Throughput::Elements(1));
    for (name, kem) in kems() {
        g.bench_function(name, |b| {
            b.iter_batched(
                || {
                    let (pk, sk) = kem.keypair().unwrap();
                    let (ct, _ss) = kem.encapsulate(&pk).unwrap();
                    (ct, sk)
                },
                |(ct, sk)| black_box(kem.decapsulate(&ct, &sk)).unwrap(),
                BatchSize::SmallInput,
            );
        });
    }
    g.finish();
}

criterion_group!(benches, bench_keygen, bench_encapsulate, bench_decapsulate);
criterion_main!(benches);
