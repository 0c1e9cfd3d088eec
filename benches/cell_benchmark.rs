use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pgo_rpc::CellId;

fn benchmark_cell_ids(c: &mut Criterion) {
    let mut group = c.benchmark_group("cell_id");

    let places = [
        ("equator", (0.0, 0.0)),
        ("san_francisco", (37.7749, -122.4194)),
        ("sydney", (-33.8688, 151.2093)),
    ];

    for (name, (lat, lng)) in places {
        group.bench_with_input(BenchmarkId::new("from_lat_lng", name), &(lat, lng), |b, &(lat, lng)| {
            b.iter(|| CellId::from_lat_lng(black_box(lat), black_box(lng)))
        });
    }

    let leaf = CellId::from_lat_lng(37.7749, -122.4194);
    group.bench_function("parent_15", |b| b.iter(|| black_box(leaf).parent(black_box(15))));

    // A map query walks the neighbourhood of a level-15 cell.
    let cell = leaf.parent(15).unwrap_or(leaf);
    group.bench_function("walk_21_siblings", |b| {
        b.iter(|| {
            let mut current = black_box(cell);
            for _ in 0..10 {
                current = current.prev();
            }
            (0..21).fold(current, |c, _| c.next())
        })
    });

    group.finish();
}

criterion_group!(benches, benchmark_cell_ids);
criterion_main!(benches);
