//! Criterion benchmarks for riskflow-engine critical operations.
//!
//! Covers: feature extraction, component scoring, and full-batch scoring.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::collections::BTreeMap;

use riskflow_core::types::{Event, EventKind, ProtocolVersion};
use riskflow_core::{ScoringConfig, WalletAddress};
use riskflow_engine::{ComponentScorer, FeatureExtractor, RiskEngine};

const T0: i64 = 1_700_000_000;

fn wallet(n: u32) -> WalletAddress {
    format!("0x{:040x}", n).parse().unwrap()
}

fn history(w: &WalletAddress, events: usize) -> Vec<Event> {
    (0..events)
        .map(|i| Event {
            wallet: w.clone(),
            kind: match i % 4 {
                0 => EventKind::Supply,
                1 => EventKind::Borrow,
                2 => EventKind::Repay,
                _ => EventKind::Withdraw,
            },
            asset: if i % 5 == 0 { "WBTC" } else { "USDC" }.to_string(),
            usd_value: 1000.0,
            protocol_version: if i % 3 == 0 {
                ProtocolVersion::V2
            } else {
                ProtocolVersion::V3
            },
            collateral_factor: if i % 2 == 0 { Some(0.85) } else { None },
            timestamp: T0 + i as i64 * 3600,
            is_borrower_side: false,
        })
        .collect()
}

fn bench_feature_extraction(c: &mut Criterion) {
    let extractor = FeatureExtractor::new(ScoringConfig::default());
    let w = wallet(1);
    let events = history(&w, 500);

    c.bench_function("extract_features_500_events", |b| {
        b.iter(|| extractor.extract(black_box(&w), black_box(&events), T0 + 1_000_000))
    });
}

fn bench_component_scoring(c: &mut Criterion) {
    let extractor = FeatureExtractor::new(ScoringConfig::default());
    let scorer = ComponentScorer::new(ScoringConfig::default().buckets);
    let w = wallet(1);
    let events = history(&w, 50);
    let features = extractor
        .extract(&w, &events, T0 + 1_000_000)
        .expect("bench fixture extracts");

    c.bench_function("score_components", |b| {
        b.iter(|| scorer.score(black_box(&features)))
    });
}

fn bench_batch_scoring(c: &mut Criterion) {
    let engine = RiskEngine::new(ScoringConfig::default()).expect("default config");
    let mut histories = BTreeMap::new();
    for n in 0..100 {
        let w = wallet(n);
        let events = history(&w, 50);
        histories.insert(w, events);
    }

    c.bench_function("score_batch_100_wallets", |b| {
        b.iter(|| engine.score_batch(black_box(&histories), T0 + 1_000_000))
    });
}

criterion_group!(
    benches,
    bench_feature_extraction,
    bench_component_scoring,
    bench_batch_scoring,
);
criterion_main!(benches);
