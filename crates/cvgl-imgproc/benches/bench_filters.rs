use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use cvgl_image::Image;
use cvgl_imgproc::filter::{gaussian_blur_with_strategy, spatial_gradient_i16};
use cvgl_imgproc::parallel::ExecutionStrategy;

use image::GrayImage;
use imageproc::filter::gaussian_blur_f32;

fn bench_filters(c: &mut Criterion) {
    let mut group = c.benchmark_group("Gaussian Blur");

    for (width, height) in [(320, 240), (640, 480), (1280, 720)].iter() {
        for kernel_size in [3, 5, 7].iter() {
            group.throughput(criterion::Throughput::Elements((*width * *height) as u64));

            let parameter_string = format!("{width}x{height}x{kernel_size}");
            let image_size = [*width, *height].into();

            let src = Image::<u8, 1>::from_size_val(image_size, 128).unwrap();
            let dst = Image::<u8, 1>::from_size_val(image_size, 0).unwrap();

            for strategy in [ExecutionStrategy::Serial, ExecutionStrategy::Parallel] {
                group.bench_with_input(
                    BenchmarkId::new(format!("gaussian_blur_u8_{strategy:?}"), &parameter_string),
                    &(&src, &dst),
                    |b, i| {
                        let (src, mut dst) = (i.0, i.1.clone());
                        b.iter(|| {
                            black_box(gaussian_blur_with_strategy(
                                src,
                                &mut dst,
                                (*kernel_size, *kernel_size),
                                (1.5, 1.5),
                                strategy,
                            ))
                        })
                    },
                );
            }

            group.bench_with_input(
                BenchmarkId::new("gaussian_blur_imageproc", &parameter_string),
                &src,
                |b, i| {
                    let gray = GrayImage::new(i.cols() as u32, i.rows() as u32);
                    b.iter(|| black_box(gaussian_blur_f32(&gray, 1.5)))
                },
            );
        }
    }

    group.finish();

    let mut group = c.benchmark_group("Sobel");

    for (width, height) in [(640, 480), (1280, 720)].iter() {
        let parameter_string = format!("{width}x{height}");
        let image_size = [*width, *height].into();

        let src = Image::<u8, 1>::from_size_val(image_size, 128).unwrap();
        let dx = Image::<i16, 1>::from_size_val(image_size, 0).unwrap();
        let dy = Image::<i16, 1>::from_size_val(image_size, 0).unwrap();

        group.bench_with_input(
            BenchmarkId::new("spatial_gradient_i16", &parameter_string),
            &(&src, &dx, &dy),
            |b, i| {
                let (src, mut dx, mut dy) = (i.0, i.1.clone(), i.2.clone());
                b.iter(|| {
                    black_box(spatial_gradient_i16(
                        src,
                        &mut dx,
                        &mut dy,
                        ExecutionStrategy::Serial,
                    ))
                })
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_filters);
criterion_main!(benches);
