use cvgl_image::{Image, ImageError, ImageSize, ImageView, ImageViewMut};
use cvgl_imgproc::edge_filter::{
    edge_filter, EdgeFilter, EdgeFilterConfig, EdgeFilterError, EdgeFilterStatus, EdgePolarity,
};
use cvgl_imgproc::parallel::ExecutionStrategy;
use rand::{rngs::StdRng, Rng, SeedableRng};

fn vertical_step(size: ImageSize, step: usize) -> Result<Image<u8, 1>, ImageError> {
    let data = (0..size.num_pixels())
        .map(|i| if i % size.width < step { 0 } else { 255 })
        .collect();
    Image::new(size, data)
}

fn random_image(size: ImageSize, seed: u64) -> Result<Image<u8, 1>, ImageError> {
    let mut rng = StdRng::seed_from_u64(seed);
    let data = (0..size.num_pixels()).map(|_| rng.random::<u8>()).collect();
    Image::new(size, data)
}

#[test]
fn empty_input_leaves_output_untouched() -> Result<(), ImageError> {
    for src_size in [[0, 0], [0, 5], [5, 0]] {
        let src = Image::<u8, 1>::from_size_val(src_size.into(), 0)?;

        // the output size does not matter for an empty input
        for dst_size in [[0, 0], [3, 3], [5, 5]] {
            let mut dst = Image::<u8, 1>::from_size_val(dst_size.into(), 7)?;
            let status = edge_filter(&src, &mut dst)?;
            assert_eq!(status, EdgeFilterStatus::SkippedEmpty);
            assert!(dst.as_slice().iter().all(|&v| v == 7));
        }
    }
    Ok(())
}

#[test]
fn uniform_input_has_no_edges() -> Result<(), ImageError> {
    let size = ImageSize {
        width: 64,
        height: 48,
    };
    let src = Image::<u8, 1>::from_size_val(size, 128)?;
    let mut dst = Image::<u8, 1>::from_size_val(size, 42)?;

    assert_eq!(edge_filter(&src, &mut dst)?, EdgeFilterStatus::Processed);
    assert!(dst.as_slice().iter().all(|&v| v == 0));

    Ok(())
}

#[test]
fn vertical_step_gives_single_edge_column() -> Result<(), ImageError> {
    let size = ImageSize {
        width: 32,
        height: 16,
    };
    let step = 16;
    let src = vertical_step(size, step)?;
    let mut dst = Image::<u8, 1>::from_size_val(size, 0)?;

    edge_filter(&src, &mut dst)?;

    assert!(dst.as_slice().iter().all(|&v| v == 0 || v == 255));

    let mut edge_column = None;
    for y in 0..size.height {
        let edges = dst
            .row(y)
            .iter()
            .enumerate()
            .filter(|(_, &v)| v == 255)
            .map(|(x, _)| x)
            .collect::<Vec<_>>();

        assert_eq!(edges.len(), 1, "row {y} has edges at {edges:?}");
        let column = *edge_column.get_or_insert(edges[0]);
        assert_eq!(edges[0], column);
    }

    let column = edge_column.unwrap_or_default();
    assert!(column == step - 1 || column == step, "edge at column {column}");

    Ok(())
}

#[test]
fn edge_filter_is_not_idempotent() -> Result<(), ImageError> {
    let size = ImageSize {
        width: 32,
        height: 16,
    };
    let src = vertical_step(size, 16)?;

    let mut first = Image::<u8, 1>::from_size_val(size, 0)?;
    edge_filter(&src, &mut first)?;

    let mut second = Image::<u8, 1>::from_size_val(size, 0)?;
    edge_filter(&first, &mut second)?;

    assert_ne!(first.as_slice(), second.as_slice());

    Ok(())
}

#[test]
fn source_is_not_modified() -> Result<(), ImageError> {
    let size = ImageSize {
        width: 40,
        height: 30,
    };
    let src = random_image(size, 1)?;
    let before = src.clone();

    let mut dst = Image::<u8, 1>::from_size_val(size, 0)?;
    edge_filter(&src, &mut dst)?;

    assert_eq!(src.as_slice(), before.as_slice());

    Ok(())
}

#[test]
fn mismatched_output_is_rejected_without_writing() -> Result<(), ImageError> {
    let src = random_image([16, 16].into(), 2)?;

    for dst_size in [[15, 16], [16, 15], [8, 8], [0, 0]] {
        let mut dst = Image::<u8, 1>::from_size_val(dst_size.into(), 3)?;
        let res = edge_filter(&src, &mut dst);
        assert_eq!(
            res,
            Err(ImageError::InvalidImageSize(
                16,
                16,
                dst_size[0],
                dst_size[1]
            ))
        );
        assert!(dst.as_slice().iter().all(|&v| v == 3));
    }

    Ok(())
}

#[test]
fn caller_owned_buffers() -> Result<(), ImageError> {
    let size = ImageSize {
        width: 32,
        height: 16,
    };
    let src_buffer = vertical_step(size, 10)?.into_vec();
    let mut dst_buffer = vec![0u8; size.num_pixels()];

    {
        let src = ImageView::<u8, 1>::from_slice(size, &src_buffer)?;
        let mut dst = ImageViewMut::<u8, 1>::from_slice_mut(size, &mut dst_buffer)?;
        edge_filter(&src, &mut dst)?;
    }

    let mut owned = Image::<u8, 1>::from_size_val(size, 0)?;
    edge_filter(&Image::<u8, 1>::new(size, src_buffer)?, &mut owned)?;

    assert_eq!(dst_buffer.as_slice(), owned.as_slice());

    Ok(())
}

#[test]
fn inverted_polarity_is_the_complement() -> Result<(), EdgeFilterError> {
    let size = ImageSize {
        width: 48,
        height: 32,
    };
    let src = random_image(size, 5)?;

    let white = EdgeFilter::default();
    let black = EdgeFilter::new(EdgeFilterConfig {
        polarity: EdgePolarity::BlackOnWhite,
        ..Default::default()
    })?;

    let mut white_dst = Image::<u8, 1>::from_size_val(size, 0)?;
    let mut black_dst = Image::<u8, 1>::from_size_val(size, 0)?;
    white.apply(&src, &mut white_dst)?;
    black.apply(&src, &mut black_dst)?;

    assert!(white_dst
        .as_slice()
        .iter()
        .zip(black_dst.as_slice())
        .all(|(&w, &b)| w == 255 - b));

    Ok(())
}

#[test]
fn execution_strategies_agree() -> Result<(), EdgeFilterError> {
    // large enough for the auto strategy to go parallel
    let size = ImageSize {
        width: 400,
        height: 260,
    };
    let src = random_image(size, 9)?;

    let mut reference = Image::<u8, 1>::from_size_val(size, 0)?;
    EdgeFilter::default().apply(&src, &mut reference)?;

    for execution in [ExecutionStrategy::Parallel, ExecutionStrategy::Auto] {
        let filter = EdgeFilter::new(EdgeFilterConfig {
            execution,
            ..Default::default()
        })?;
        let mut dst = Image::<u8, 1>::from_size_val(size, 0)?;
        filter.apply(&src, &mut dst)?;
        assert_eq!(dst.as_slice(), reference.as_slice());
    }

    Ok(())
}

#[test]
fn config_from_json() -> Result<(), Box<dyn std::error::Error>> {
    let config: EdgeFilterConfig =
        serde_json::from_str(r#"{ "low_threshold": 10, "high_threshold": 30 }"#)?;
    let filter = EdgeFilter::new(config)?;

    let size = ImageSize {
        width: 32,
        height: 32,
    };

    // a faint step only passes the lower thresholds
    let data = (0..size.num_pixels())
        .map(|i| if i % size.width < 16 { 100 } else { 120 })
        .collect();
    let src = Image::<u8, 1>::new(size, data)?;

    let mut default_dst = Image::<u8, 1>::from_size_val(size, 0)?;
    let mut tuned_dst = Image::<u8, 1>::from_size_val(size, 0)?;
    edge_filter(&src, &mut default_dst)?;
    filter.apply(&src, &mut tuned_dst)?;

    assert!(default_dst.as_slice().iter().all(|&v| v == 0));
    assert!(tuned_dst.as_slice().contains(&255));

    Ok(())
}
