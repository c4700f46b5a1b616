use argh::FromArgs;
use std::path::PathBuf;

use cvgl::{
    image::Image,
    imgproc::{
        color::gray_from_rgb_u8,
        edge_filter::{EdgeFilter, EdgeFilterConfig, EdgeFilterStatus, EdgePolarity},
        edges::GradientNorm,
        parallel::ExecutionStrategy,
    },
    io::{fps_counter::FpsCounter, functional::read_image_any_rgb8, jpeg, png},
};

#[derive(FromArgs)]
/// Detect edges in an image with a gaussian blur followed by canny
struct Args {
    /// path to the input image
    #[argh(option, short = 'i')]
    input: PathBuf,

    /// path to the output edge map, .png or .jpg
    #[argh(option, short = 'o')]
    output: PathBuf,

    /// path to a json file with the edge filter configuration
    #[argh(option)]
    config: Option<PathBuf>,

    /// size of the gaussian kernel, must be odd
    #[argh(option)]
    kernel_size: Option<usize>,

    /// sigma of the gaussian kernel, non-positive to derive it from the kernel size
    #[argh(option)]
    sigma: Option<f32>,

    /// hysteresis low threshold
    #[argh(option)]
    low: Option<f32>,

    /// hysteresis high threshold
    #[argh(option)]
    high: Option<f32>,

    /// use the L2 norm for the gradient magnitude
    #[argh(switch)]
    l2_gradient: bool,

    /// write black edges on a white background
    #[argh(switch)]
    invert: bool,

    /// process the rows on all cores
    #[argh(switch)]
    parallel: bool,

    /// number of times the filter runs on the image, the frame rate is logged every second
    #[argh(option, default = "1")]
    repeat: usize,

    /// encode every n-th result to jpeg in memory, as a streaming client would
    #[argh(option)]
    encode_every: Option<usize>,

    /// quality of jpeg outputs, from 0 to 100
    #[argh(option, default = "90")]
    jpeg_quality: u8,
}

impl Args {
    fn edge_filter_config(&self) -> Result<EdgeFilterConfig, Box<dyn std::error::Error>> {
        let mut config = match &self.config {
            Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
            None => EdgeFilterConfig::default(),
        };

        if let Some(kernel_size) = self.kernel_size {
            config.kernel_size = kernel_size;
        }
        if let Some(sigma) = self.sigma {
            config.sigma = sigma;
        }
        if let Some(low) = self.low {
            config.low_threshold = low;
        }
        if let Some(high) = self.high {
            config.high_threshold = high;
        }
        if self.l2_gradient {
            config.gradient_norm = GradientNorm::L2;
        }
        if self.invert {
            config.polarity = EdgePolarity::BlackOnWhite;
        }
        if self.parallel {
            config.execution = ExecutionStrategy::Parallel;
        }

        Ok(config)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Args = argh::from_env();

    let filter = EdgeFilter::new(args.edge_filter_config()?)?;

    let rgb = read_image_any_rgb8(&args.input)?;
    let mut gray = Image::<u8, 1>::from_size_val(rgb.size(), 0)?;
    gray_from_rgb_u8(&rgb, &mut gray)?;
    log::info!("loaded {} ({})", args.input.display(), gray.size());

    let mut edges = Image::<u8, 1>::from_size_val(gray.size(), 0)?;
    let mut fps_counter = FpsCounter::new();

    for i in 0..args.repeat.max(1) {
        if filter.apply(&gray, &mut edges)? == EdgeFilterStatus::SkippedEmpty {
            log::warn!("{} is empty, nothing to do", args.input.display());
            return Ok(());
        }

        if let Some(every) = args.encode_every.filter(|&n| n > 0) {
            if i % every == 0 {
                let bytes = jpeg::encode_image_jpeg_gray8(&edges, args.jpeg_quality)?;
                log::debug!("frame {i} encoded to {} jpeg bytes", bytes.len());
            }
        }

        if let Some(frames) = fps_counter.update() {
            log::info!("FPS: {frames} (smoothed {:.1})", fps_counter.fps());
        }
    }

    let extension = args
        .output
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("png") => png::write_image_png_gray8(&args.output, &edges)?,
        Some("jpg") | Some("jpeg") => {
            jpeg::write_image_jpeg_gray8(&args.output, &edges, args.jpeg_quality)?
        }
        _ => {
            return Err(format!(
                "unsupported output extension: {}, use .png or .jpg",
                args.output.display()
            )
            .into())
        }
    }

    let edge_value = match filter.config().polarity {
        EdgePolarity::WhiteOnBlack => 255,
        EdgePolarity::BlackOnWhite => 0,
    };
    log::info!(
        "wrote {} edge pixels to {}",
        edges.as_slice().iter().filter(|&&v| v == edge_value).count(),
        args.output.display()
    );

    Ok(())
}
