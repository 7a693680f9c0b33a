//! Criterion benchmarks for dmmtool critical paths
//!
//! Benchmarks the core performance-critical operations:
//! - Splitter: Atom list and property splitting
//! - ID codec: Encoding and decoding tile IDs
//! - Registry: Tile interning with duplicates
//! - Map: Reading and writing whole maps
//! - Compositor: Layer compositing

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use dmmtool::compositor::{render_map, RenderOptions};
use dmmtool::icons::StaticIcons;
use dmmtool::id_codec::{decode, encode};
use dmmtool::map::{MapDocument, WriteOptions};
use dmmtool::models::{Atom, Tile, Value};
use dmmtool::registry::TileRegistry;
use dmmtool::resolver::BareResolver;
use dmmtool::splitter::{split, split_properties};
use image::{Rgba, RgbaImage};

// =============================================================================
// Test Data Generators
// =============================================================================

/// Generate a tile definition body with n atoms
fn make_atom_list(n: usize) -> String {
    (0..n)
        .map(|i| format!("/obj/item{}{{name = \"item, {}\"; dir = 4; icon_state = \"s{}\"}}", i, i, i))
        .collect::<Vec<_>>()
        .join(",")
}

/// Generate map text with `tiles` distinct definitions on a size x size grid
fn make_map(tiles: usize, size: usize) -> String {
    let mut text = String::new();
    for i in 0..tiles {
        text.push_str(&format!(
            "\"{}\" = (/obj/thing{{icon = 'o.dmi'; icon_state = \"t{}\"}},/turf/floor{{icon = 't.dmi'}},/area/station)\n",
            encode(i, 2),
            i % 4
        ));
    }
    text.push_str("\n(1,1,1) = {\"\n");
    for y in 0..size {
        for x in 0..size {
            text.push_str(&encode((x * 7 + y * 13) % tiles, 2));
        }
        text.push('\n');
    }
    text.push_str("\"}\n");
    text
}

fn make_tiles(count: usize) -> Vec<Tile> {
    (0..count)
        .map(|i| {
            let atoms = vec![
                Atom::new("/obj/thing").with_property("icon_state", Value::Str(format!("t{}", i % 64))),
                Atom::new("/turf/floor"),
            ];
            Tile::new(encode(i, 3), atoms)
        })
        .collect()
}

// =============================================================================
// Splitter Benchmarks
// =============================================================================

fn bench_splitter(c: &mut Criterion) {
    let mut group = c.benchmark_group("splitter");

    for size in [1, 4, 16, 64].iter() {
        let list = make_atom_list(*size);
        group.throughput(Throughput::Bytes(list.len() as u64));
        group.bench_with_input(BenchmarkId::new("split_atoms", size), &list, |b, list| {
            b.iter(|| split(black_box(list), ','))
        });
    }

    let props = "name = \"a; b\"; dir = 4; icon = 'x.dmi'; pixel_x = -3; desc = \"{nested}\"";
    group.bench_function("split_properties", |b| b.iter(|| split_properties(black_box(props))));

    group.finish();
}

// =============================================================================
// ID Codec Benchmarks
// =============================================================================

fn bench_id_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("id_codec");
    group.bench_function("encode_10000", |b| {
        b.iter(|| (0..10_000).map(|n| encode(black_box(n), 3)).count())
    });
    group.bench_function("decode_3", |b| b.iter(|| decode(black_box("ZzA"))));
    group.finish();
}

// =============================================================================
// Registry Benchmarks
// =============================================================================

fn bench_registry(c: &mut Criterion) {
    let mut group = c.benchmark_group("registry");

    for count in [100, 1000, 5000].iter() {
        let tiles = make_tiles(*count);
        group.throughput(Throughput::Elements(*count as u64));
        group.bench_with_input(BenchmarkId::new("intern", count), &tiles, |b, tiles| {
            b.iter(|| {
                let mut registry = TileRegistry::new();
                for tile in tiles.iter().cloned() {
                    registry.intern(tile);
                }
                registry
            })
        });
    }

    group.finish();
}

// =============================================================================
// Map Benchmarks
// =============================================================================

fn bench_map(c: &mut Criterion) {
    let mut group = c.benchmark_group("map");

    for size in [32, 128, 255].iter() {
        let text = make_map(200, *size);
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::new("read", size), &text, |b, text| {
            b.iter(|| MapDocument::read_str(black_box(text), &BareResolver))
        });
    }

    let doc = MapDocument::read_str(&make_map(200, 128), &BareResolver).expect("benchmark map");
    group.bench_function("write_128", |b| b.iter(|| doc.write_string(WriteOptions::default())));

    group.finish();
}

// =============================================================================
// Compositor Benchmarks
// =============================================================================

fn bench_compositor(c: &mut Criterion) {
    let mut group = c.benchmark_group("compositor");
    group.sample_size(20);

    let options = RenderOptions { tile_size: 8, ..Default::default() };
    for size in [16, 64].iter() {
        let doc = MapDocument::read_str(&make_map(64, *size), &BareResolver).expect("benchmark map");
        group.throughput(Throughput::Elements((*size * *size) as u64));
        group.bench_with_input(BenchmarkId::new("render_map", size), &doc, |b, doc| {
            b.iter(|| {
                let mut icons = StaticIcons::new()
                    .with("t.dmi", "", RgbaImage::from_pixel(8, 8, Rgba([90, 90, 90, 255])))
                    .with("o.dmi", "t0", RgbaImage::from_pixel(8, 8, Rgba([200, 0, 0, 128])))
                    .with("o.dmi", "t1", RgbaImage::from_pixel(8, 4, Rgba([0, 200, 0, 255])));
                render_map(doc, &mut icons, &options)
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_splitter, bench_id_codec, bench_registry, bench_map, bench_compositor);
criterion_main!(benches);
