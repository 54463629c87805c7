//! Logic Engine Benchmarks
//!
//! Parse-path cost (tokenize → parse → simplify) and end-to-end location
//! queries against a small synthetic world.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use remote_logic::{parse_requires, Diagnostics, Evaluator, World, WorldData, Yaml};

const REQUIRES: &str =
    "(|sword| AND |@armor:2|) OR (|bow| AND |arrow:20|) OR ({YamlEnabled(glitches)} AND |boots|)";

fn world_json() -> &'static str {
    r#"{
        "items": [
            {"name": "sword", "count": 1, "category": ["gear"]},
            {"name": "bow", "count": 1, "category": ["gear"]},
            {"name": "arrow", "count": 30, "category": ["ammo"]},
            {"name": "helmet", "count": 1, "category": ["armor"]},
            {"name": "shield", "count": 1, "category": ["armor"]},
            {"name": "boots", "count": 1, "category": ["gear"]}
        ],
        "regions": {
            "Start": {"starting": true, "connects_to": ["Field"]},
            "Field": {"requires": "|sword|", "connects_to": ["Keep"]},
            "Keep": {"requires": "|@armor:1|"}
        },
        "locations": [
            {"name": "Armory", "region": "Keep", "requires": "(|sword| AND |@armor:2|) OR |bow|"},
            {"name": "Range", "requires": "{canReachLocation(Armory)} AND |arrow:5|"}
        ]
    }"#
}

fn bench_parse(c: &mut Criterion) {
    let diagnostics = Diagnostics::disabled();
    c.bench_function("tokenize_parse_simplify", |b| {
        b.iter(|| parse_requires(black_box(REQUIRES), &diagnostics));
    });
}

fn bench_world_build(c: &mut Criterion) {
    let data = WorldData::from_json(world_json()).expect("decode");
    let diagnostics = Diagnostics::disabled();
    c.bench_function("world_build", |b| {
        b.iter(|| World::build(black_box(&data), &diagnostics));
    });
}

fn bench_inspect_location(c: &mut Criterion) {
    let data = WorldData::from_json(world_json()).expect("decode");
    let world = World::build(&data, &Diagnostics::disabled());
    let yaml = Yaml::new();
    c.bench_function("inspect_location", |b| {
        b.iter(|| {
            let mut evaluator = Evaluator::new(
                &world,
                &yaml,
                ["sword", "helmet", "shield", "arrow", "arrow", "arrow", "arrow", "arrow"],
            );
            black_box(evaluator.inspect_location("Range"))
        });
    });
}

criterion_group!(
    benches,
    bench_parse,
    bench_world_build,
    bench_inspect_location
);
criterion_main!(benches);
