//! Benchmarks for normalization and catalog scans.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use odcaf_search::{FacilityQuery, FacilityRecord, Limit, MemoryStore, QueryEngine, normalize};

const TYPES: [&str; 4] = ["Museum", "Gallery", "Library or Archives", "Ice Rink"];
const CITIES: [(&str, &str); 4] = [
    ("Montréal", "qc"),
    ("Saint-Jean-sur-Richelieu", "qc"),
    ("Vancouver", "bc"),
    ("St. John's", "nl"),
];

fn create_catalog(count: usize) -> MemoryStore {
    (0..count)
        .map(|i| {
            let (city, province) = CITIES[i % CITIES.len()];
            FacilityRecord::new(
                format!("Facility n° {i} de l'Île"),
                TYPES[i % TYPES.len()],
                city,
                province,
            )
        })
        .collect()
}

fn bench_normalize(c: &mut Criterion) {
    c.bench_function("normalize_accented", |b| {
        b.iter(|| normalize(black_box("Musée d'art contemporain de Montréal -- St.-Jean's")))
    });
}

fn bench_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("catalog_queries");

    for size in [100, 1000, 10000].iter() {
        let engine = QueryEngine::new(create_catalog(*size));
        let museum = FacilityQuery::new().with_province("Quebec").with_facility_type("museum");

        group.bench_with_input(BenchmarkId::new("query_museum", size), size, |b, _| {
            b.iter(|| engine.query_facilities(black_box(&museum), Limit::default()))
        });

        group.bench_with_input(BenchmarkId::new("search_miss", size), size, |b, _| {
            b.iter(|| engine.search_facilities(black_box("planetarium yukon"), Limit::default()))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_normalize, bench_queries);
criterion_main!(benches);
