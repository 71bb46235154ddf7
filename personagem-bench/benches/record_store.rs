//! Personagem Benchmark Suite
//!
//! Targets:
//!   inventory_encode_100_items ......... < 20μs
//!   inventory_decode_100_items ......... < 20μs
//!   sqlite_save_insert ................. < 50μs
//!   sqlite_find_by_id .................. < 20μs

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use personagem_core::codec::{self, InventoryCodec, JsonCodec};
use personagem_core::{Character, CharacterStore, PersonagemConfig, SqliteStore};

fn make_items(n: usize) -> Vec<String> {
    (0..n)
        .map(|i| {
            if i % 10 == 0 {
                format!("Potion, grade {i}")
            } else {
                format!("Item number {i}")
            }
        })
        .collect()
}

fn make_character(i: usize) -> Character {
    let mut c = Character::new();
    c.set_name(format!("Hero {i}"));
    c.set_adventurer_name(format!("The {i}th"));
    c.set_class("Guerreiro");
    c.set_level(1);
    c.set_strength(5);
    c.set_defense(5);
    c.set_inventory(make_items(20));
    c
}

/// Benchmark: encode/decode of a 100-item inventory with both codecs.
fn bench_codec(c: &mut Criterion) {
    let items = make_items(100);
    let text = codec::encode(&items).expect("encode");
    let json = JsonCodec.encode(&items).expect("encode");

    c.bench_function("inventory_encode_100_items", |b| {
        b.iter(|| black_box(codec::encode(black_box(&items))));
    });
    c.bench_function("inventory_decode_100_items", |b| {
        b.iter(|| black_box(codec::decode(black_box(&text))));
    });
    c.bench_function("inventory_json_decode_100_items", |b| {
        b.iter(|| black_box(JsonCodec.decode(black_box(&json))));
    });
}

/// Benchmark: SQLite insert and point lookup.
fn bench_store(c: &mut Criterion) {
    let store = SqliteStore::open_in_memory(&PersonagemConfig::default()).expect("open");
    let mut seeded = Vec::new();
    for i in 0..1_000 {
        seeded.push(store.save(&mut make_character(i)).expect("seed"));
    }

    c.bench_function("sqlite_save_insert", |b| {
        b.iter(|| {
            let mut hero = make_character(black_box(7));
            black_box(store.save(&mut hero).expect("save"));
        });
    });

    let target = seeded[seeded.len() / 2];
    c.bench_function("sqlite_find_by_id", |b| {
        b.iter(|| black_box(store.find_by_id(black_box(target)).expect("find")));
    });
}

criterion_group!(benches, bench_codec, bench_store);
criterion_main!(benches);
