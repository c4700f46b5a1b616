use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use cvgl_image::{Image, ImageSize};
use cvgl_imgproc::edge_filter::{EdgeFilter, EdgeFilterConfig};
use cvgl_imgproc::edges::{canny, GradientNorm};
use cvgl_imgproc::parallel::ExecutionStrategy;

use image::GrayImage;
use rand::{rngs::StdRng, Rng, SeedableRng};

fn noisy_image(size: ImageSize) -> Image<u8, 1> {
    let mut rng = StdRng::seed_from_u64(42);
    let data = (0..size.num_pixels())
        .map(|i| {
            // a few vertical bars plus noise so that canny has work to do
            let base = if (i % size.width / 40) % 2 == 0 { 60 } else { 190 };
            base + rng.random_range(0..20u8)
        })
        .collect();
    Image::new(size, data).unwrap()
}

fn bench_edges(c: &mut Criterion) {
    let mut group = c.benchmark_group("Canny");

    for (width, height) in [(320, 240), (640, 480), (1280, 720)].iter() {
        group.throughput(criterion::Throughput::Elements((*width * *height) as u64));

        let parameter_string = format!("{width}x{height}");
        let image_size = ImageSize {
            width: *width,
            height: *height,
        };

        let src = noisy_image(image_size);
        let dst = Image::<u8, 1>::from_size_val(image_size, 0).unwrap();

        group.bench_with_input(
            BenchmarkId::new("canny", &parameter_string),
            &(&src, &dst),
            |b, i| {
                let (src, mut dst) = (i.0, i.1.clone());
                b.iter(|| {
                    black_box(canny(
                        src,
                        &mut dst,
                        50.0,
                        150.0,
                        GradientNorm::L1,
                        ExecutionStrategy::Serial,
                    ))
                })
            },
        );

        group.bench_with_input(
            BenchmarkId::new("canny_imageproc", &parameter_string),
            &src,
            |b, i| {
                let gray =
                    GrayImage::from_raw(i.cols() as u32, i.rows() as u32, i.as_slice().to_vec())
                        .unwrap();
                b.iter(|| black_box(imageproc::edges::canny(&gray, 50.0, 150.0)))
            },
        );

        for execution in [ExecutionStrategy::Serial, ExecutionStrategy::Parallel] {
            let filter = EdgeFilter::new(EdgeFilterConfig {
                execution,
                ..Default::default()
            })
            .unwrap();

            group.bench_with_input(
                BenchmarkId::new(format!("edge_filter_{execution:?}"), &parameter_string),
                &(&src, &dst),
                |b, i| {
                    let (src, mut dst) = (i.0, i.1.clone());
                    b.iter(|| black_box(filter.apply(src, &mut dst)))
                },
            );
        }
    }

    group.finish();
}

criterion_group!(benches, bench_edges);
criterion_main!(benches);
