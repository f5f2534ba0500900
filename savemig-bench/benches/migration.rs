//! savemig Benchmark Suite
//!
//! Targets, on a save with 40 full storage boxes and a 300-stack bag:
//!   builtin_run_legacy_save ....... < 5ms
//!   builtin_run_current_save ...... < 50μs
//!   registry_ordering_200_steps ... < 20μs

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};

use savemig_core::game_data::{ItemData, SpeciesData, TrainerTypeData};
use savemig_core::model::metadata::ItemStack;
use savemig_core::model::{
    Bag, GlobalMetadata, LegacyOptions, LegacyPokemon, LegacyTrainer, OptionsSlot, PlayerSlot,
    PokemonBox, PokemonSlot, PokemonStorage,
};
use savemig_core::{
    builtin_registry, BuiltinSettings, Conversion, ConversionRegistry, DataRef, EngineVersions,
    GameData, SaveRecord, Version,
};

const SPECIES: u32 = 400;
const ITEMS: u32 = 300;

fn game_data() -> Arc<GameData> {
    let items = (1..=ITEMS)
        .map(|n| ItemData { id: format!("ITEM_{n}"), id_number: n })
        .collect();
    let species = (1..=SPECIES)
        .map(|n| SpeciesData {
            id: format!("SPECIES_{n}"),
            species: format!("SPECIES_{n}"),
            form: 0,
            id_number: n,
        })
        .collect();
    let dex = (1..=SPECIES).map(|n| format!("SPECIES_{n}")).collect();
    Arc::new(GameData::new(
        items,
        species,
        vec![TrainerTypeData { id: "PLAYER".into(), id_number: 0 }],
        vec![dex],
    ))
}

fn legacy_pokemon(i: u32) -> PokemonSlot {
    PokemonSlot::Legacy(LegacyPokemon {
        species: DataRef::Number(i % SPECIES + 1),
        form: None,
        level: Some(50),
        name: None,
        item: Some(DataRef::Number(i % (ITEMS + 20))),
        hp: Some(100),
        shiny: None,
        shadow: None,
        trainer_id: Some(1),
    })
}

fn legacy_save() -> SaveRecord {
    let flags: Vec<bool> = (0..=SPECIES).map(|n| n % 2 == 1).collect();
    let trainer = LegacyTrainer {
        trainer_type: DataRef::Number(0),
        name: "Bench".into(),
        id: 1,
        meta_id: None,
        outfit: None,
        language: None,
        party: (0..6).map(legacy_pokemon).collect(),
        badges: vec![true; 8],
        money: 999_999,
        seen: flags.clone(),
        owned: flags,
        form_seen: Vec::new(),
        form_last_seen: Vec::new(),
        shadow_caught: None,
        pokedex: Some(true),
        pokegear: true,
        mystery_gift_access: None,
        mystery_gift: None,
    };
    let boxes = (0..40)
        .map(|b| PokemonBox {
            name: format!("Box {}", b + 1),
            background: 0,
            pokemon: (0..30).map(|i| Some(legacy_pokemon(b * 30 + i))).collect(),
        })
        .collect();
    let pocket = (0..300)
        .map(|i| Some(ItemStack::new(i % (ITEMS + 20), 1)))
        .collect();

    SaveRecord {
        player: Some(PlayerSlot::Legacy(trainer)),
        global_metadata: Some(GlobalMetadata {
            pokedex_unlocked: Some(vec![true, true]),
            ..GlobalMetadata::default()
        }),
        pokemon_system: Some(OptionsSlot::Legacy(LegacyOptions::default())),
        bag: Some(Bag {
            pockets: vec![pocket],
            registered_items: Vec::new(),
            registered_index: None,
        }),
        storage_system: Some(PokemonStorage { boxes, current_box: 0 }),
        ..SaveRecord::default()
    }
}

/// Benchmark: full built-in conversion of a large release-18 save.
fn bench_builtin_legacy(c: &mut Criterion) {
    let registry = builtin_registry(&BuiltinSettings::new(game_data())).expect("registry");
    let versions = EngineVersions::default();
    let save = legacy_save();

    c.bench_function("builtin_run_legacy_save", |b| {
        b.iter_batched(
            || save.clone(),
            |mut record| {
                let report = registry.run(&mut record, &versions).expect("run");
                black_box(report);
            },
            BatchSize::LargeInput,
        );
    });
}

/// Benchmark: loading a save that is already current (every step skipped).
fn bench_builtin_current(c: &mut Criterion) {
    let registry = builtin_registry(&BuiltinSettings::new(game_data())).expect("registry");
    let versions = EngineVersions::default();
    let mut current = legacy_save();
    registry.run(&mut current, &versions).expect("convert once");

    c.bench_function("builtin_run_current_save", |b| {
        b.iter(|| {
            let report = registry.run(black_box(&mut current), &versions).expect("run");
            black_box(report);
        });
    });
}

/// Benchmark: ordering a large registry.
fn bench_ordering(c: &mut Criterion) {
    let mut registry = ConversionRegistry::new();
    for i in 0..200u64 {
        let conversion = Conversion::builder(format!("step_{i}"))
            .essentials_version(Version::from_segments([i % 17, i % 5]))
            .to_all(Ok)
            .expect("build");
        registry.register(conversion).expect("register");
    }

    c.bench_function("registry_ordering_200_steps", |b| {
        b.iter(|| black_box(registry.ordered().len()));
    });
}

criterion_group!(
    benches,
    bench_builtin_legacy,
    bench_builtin_current,
    bench_ordering
);
criterion_main!(benches);
