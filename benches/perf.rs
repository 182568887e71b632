use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use hb_ingest::document::parse_game_document;
use hb_ingest::extract::extract_game;

const GAME_JSON: &str = include_str!("../tests/fixtures/combined_game.json");

fn bench_document_parse(c: &mut Criterion) {
    c.bench_function("document_parse", |b| {
        b.iter(|| {
            let doc = parse_game_document(black_box(GAME_JSON)).unwrap();
            black_box(doc.data.is_some());
        })
    });
}

fn bench_game_extract(c: &mut Criterion) {
    let doc = parse_game_document(GAME_JSON).unwrap();
    c.bench_function("game_extract", |b| {
        b.iter(|| {
            let extracted = extract_game(black_box(&doc), "7504381").unwrap();
            black_box(extracted.events.len());
        })
    });
}

criterion_group!(benches, bench_document_parse, bench_game_extract);
criterion_main!(benches);
