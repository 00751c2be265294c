//! # Random Derivation Benchmarks
//!
//! | Operation | Dominant cost |
//! |-----------|---------------|
//! | Root generation | Seed hashing plus clamp retries |
//! | Key bundle | Two V1 child derivations plus PBKDF2 (500 rounds) |
//! | Ownership check | One CBOR decode plus one AEAD open |
//! | Ledger scan | Ownership check per candidate, sequential vs rayon |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::RngCore;
use std::time::Duration;

use rnd_derivation::{
    AddressAttributes, AddressPayload, DerivationPath, Ed25519Bip32Engine, Passphrase,
    PayloadDerivation, RndDerivationApi, RndDerivationService, ScanConfig,
};

// ============================================================================
// Fixtures
// ============================================================================

fn service(config: ScanConfig) -> RndDerivationService<Ed25519Bip32Engine> {
    RndDerivationService::with_config(Ed25519Bip32Engine::new(), config).unwrap()
}

fn random_payload_key() -> Passphrase<PayloadDerivation> {
    let mut key = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut key);
    Passphrase::from_key(key)
}

/// Ledger where one candidate in `stride` belongs to `mine`.
fn ledger(mine: &Passphrase<PayloadDerivation>, len: usize, stride: usize) -> Vec<Vec<u8>> {
    let theirs = random_payload_key();
    (0..len)
        .map(|i| {
            let key = if i % stride == 0 { mine } else { &theirs };
            let path = DerivationPath::from_raw(0x8000_0000, i as u32);
            let attributes = AddressAttributes::with_derivation_path(key, &path).unwrap();
            AddressPayload::new(vec![0u8; 28], attributes)
                .to_cbor()
                .unwrap()
        })
        .collect()
}

// ============================================================================
// Key hierarchy
// ============================================================================

fn bench_key_hierarchy(c: &mut Criterion) {
    let mut group = c.benchmark_group("rnd-key-hierarchy");
    let service = service(ScanConfig::default());
    let seed = Passphrase::new(vec![7u8; 32]);

    for (label, spending) in [
        ("empty_passphrase", Passphrase::empty()),
        ("encrypted", Passphrase::new("spending password")),
    ] {
        group.bench_function(BenchmarkId::new("generate_root_key", label), |b| {
            b.iter(|| black_box(service.generate_root_key(&seed, &spending).unwrap()))
        });

        let root = service.generate_root_key(&seed, &spending).unwrap();
        group.bench_function(BenchmarkId::new("build_key_bundle", label), |b| {
            b.iter(|| black_box(service.build_key_bundle(&spending, &root)))
        });
    }

    group.finish();
}

// ============================================================================
// Ownership scan
// ============================================================================

fn bench_ownership_check(c: &mut Criterion) {
    let mut group = c.benchmark_group("rnd-ownership-check");
    let service = service(ScanConfig::sequential());
    let mine = random_payload_key();
    let candidates = ledger(&mine, 2, 2);

    group.bench_function("decoded", |b| {
        b.iter(|| black_box(service.decode_address_derivation_path(&mine, &candidates[0])))
    });
    group.bench_function("not_mine", |b| {
        b.iter(|| black_box(service.decode_address_derivation_path(&mine, &candidates[1])))
    });

    group.finish();
}

fn bench_ledger_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("rnd-ledger-scan");
    group.measurement_time(Duration::from_secs(10));

    let sequential = service(ScanConfig::sequential());
    let parallel = service(ScanConfig::default());
    let mine = random_payload_key();

    for size in [64usize, 1_000, 10_000] {
        let candidates = ledger(&mine, size, 50);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("sequential", size), &candidates, |b, batch| {
            b.iter(|| black_box(sequential.scan_addresses(&mine, batch)))
        });
        group.bench_with_input(BenchmarkId::new("parallel", size), &candidates, |b, batch| {
            b.iter(|| black_box(parallel.scan_addresses(&mine, batch)))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_key_hierarchy,
    bench_ownership_check,
    bench_ledger_scan
);
criterion_main!(benches);
