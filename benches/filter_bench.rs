//! Benchmarks for the dataset filter engine
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use labscope::dataset::*;
use std::fmt::Write;

const TECHNOLOGIES: [&str; 4] = ["Visium", "Xenium", "MERFISH", "CosMx"];
const TISSUES: [&str; 5] = ["liver", "brain", "lung", "kidney", "breast"];
const SPECIES: [&str; 2] = ["human", "mouse"];
const STATUSES: [&str; 3] = ["normal", "cancer", "fibrosis"];

fn create_test_csv(count: usize) -> String {
    let mut csv = TABLE_COLUMNS.join(",");
    csv.push('\n');
    for i in 0..count {
        let _ = writeln!(
            csv,
            "2024-01-{:02},dataset_{i},sample_{i}.h5ad,{},{},{},region {},{},{},paper {i},https://doi.org/10.1/{i},https://viewer/{i}",
            i % 28 + 1,
            TECHNOLOGIES[i % TECHNOLOGIES.len()],
            SPECIES[i % SPECIES.len()],
            TISSUES[i % TISSUES.len()],
            i % 7,
            STATUSES[i % STATUSES.len()],
            1000 + i,
        );
    }
    csv
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");

    for size in [100, 1000, 10000] {
        let csv = create_test_csv(size);

        group.throughput(Throughput::Elements(size as u64));

        group.bench_function(format!("parse_csv_{}", size), |b| {
            b.iter(|| parse_csv(black_box(&csv)).unwrap())
        });
    }

    group.finish();
}

fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter");

    let rows = load_from_str(&create_test_csv(10000));
    let facets = Facets::from_rows(&rows);
    group.throughput(Throughput::Elements(rows.len() as u64));

    group.bench_function("tab_only", |b| {
        let state = FilterState::initial(&facets);
        b.iter(|| apply_filters(black_box(&rows), &state))
    });

    group.bench_function("tab_and_checkboxes", |b| {
        let mut state = FilterState::initial(&facets);
        state.toggle_tissue("liver", true);
        state.toggle_tissue("lung", true);
        state.toggle_species("human", true);
        state.toggle_status("cancer", true);
        b.iter(|| apply_filters(black_box(&rows), &state))
    });

    group.bench_function("search", |b| {
        let mut state = FilterState::default();
        state.set_search("DATASET_99");
        b.iter(|| apply_filters(black_box(&rows), &state))
    });

    group.bench_function("render_visible", |b| {
        let state = FilterState::initial(&facets);
        let visible = apply_filters(&rows, &state);
        b.iter(|| render_table(black_box(visible.iter().copied())))
    });

    group.finish();
}

fn bench_facets(c: &mut Criterion) {
    let rows = load_from_str(&create_test_csv(10000));

    c.bench_function("facets_from_rows", |b| {
        b.iter(|| Facets::from_rows(black_box(&rows)))
    });
}

criterion_group!(benches, bench_parse, bench_filter, bench_facets);
criterion_main!(benches);
