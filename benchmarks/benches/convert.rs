use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use zune_luma::coordinator::Coordinator;
use zune_luma::options::LumaOptions;
use zune_luma_benches::synthetic_rgb;

fn convert(pixels: &[u8], width: usize, height: usize, workers: usize) {
    let options = LumaOptions::default().set_workers(workers);
    let mut round = Coordinator::new(options).prepare(width, height).unwrap();
    round.fill_input(pixels).unwrap();
    let image = round.run().unwrap();
    black_box(image.pixels());
}

fn bench_workers(c: &mut Criterion) {
    let (width, height) = (3840, 2160);
    let pixels = synthetic_rgb(width, height);

    let mut group = c.benchmark_group("luma: rgb to grayscale");
    group.throughput(Throughput::Bytes(pixels.len() as u64));

    for workers in [1, 2, 4, 8, 16] {
        group.bench_with_input(BenchmarkId::from_parameter(workers), &workers, |b, w| {
            b.iter(|| convert(&pixels, width, height, *w))
        });
    }
    group.finish();
}

criterion_group!(name=benches;
      config={
      let c = Criterion::default();
        c.measurement_time(Duration::from_secs(10))
      };
    targets=bench_workers);

criterion_main!(benches);
