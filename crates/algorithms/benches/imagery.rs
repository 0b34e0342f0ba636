//! Benchmarks for spectral indices

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use verdex_algorithms::imagery::ndvi;
use verdex_core::{GeoTransform, Raster};

/// Sentinel-2 style u16 reflectance band with a sprinkling of zero cells.
fn create_band(size: usize, base: u16) -> Raster<u16> {
    let data = (0..size * size)
        .map(|i| {
            if i % 97 == 0 {
                0
            } else {
                base + ((i * 13) % 2000) as u16
            }
        })
        .collect();
    let mut r = Raster::from_vec(data, size, size).unwrap();
    r.set_transform(GeoTransform::new(399_960.0, 4_500_000.0, 10.0, -10.0));
    r
}

fn bench_ndvi(c: &mut Criterion) {
    let mut group = c.benchmark_group("imagery/ndvi");
    for size in [256, 512, 1024, 2048] {
        let nir = create_band(size, 2500);
        let red = create_band(size, 800);
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| ndvi(black_box(&nir), black_box(&red)).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_ndvi);
criterion_main!(benches);
