use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use imgref::ImgVec;
use log::info;
use mstquant::{Color, QuantizeConfig};

/// Reduce the colors of an image by cutting its color spanning tree.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Input image path
    input: PathBuf,

    /// Number of palette colors
    #[arg(short = 'k', long, default_value_t = 16)]
    colors: usize,

    /// Output PNG path (defaults to `<input stem>_q.png`)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Clamp the color count to the number of distinct colors in the image
    #[arg(long)]
    clamp: bool,

    /// Gaussian smoothing sigma applied before quantization
    #[arg(long)]
    sigma: Option<f64>,

    /// Gaussian mask size (odd), used with --sigma
    #[arg(long, default_value_t = 5)]
    mask_size: usize,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let img = image::open(&args.input)
        .with_context(|| format!("cannot open {}", args.input.display()))?
        .to_rgb8();
    let (w, h) = (img.width() as usize, img.height() as usize);
    let pixels: Vec<Color> = img
        .pixels()
        .map(|p| Color::new(p.0[0], p.0[1], p.0[2]))
        .collect();
    let mut source = ImgVec::new(pixels, w, h);
    info!("loaded {} ({w}x{h})", args.input.display());

    if let Some(sigma) = args.sigma {
        source = mstquant::smooth::gaussian_blur(source.as_ref(), args.mask_size, sigma)
            .context("smoothing failed")?;
        info!("smoothed with sigma {sigma}, mask {}", args.mask_size);
    }

    let config = QuantizeConfig::new()
        .colors(args.colors)
        .clamp_colors(args.clamp);

    let start = Instant::now();
    let result = mstquant::quantize_img(source.as_ref(), &config).context("quantization failed")?;
    let elapsed = start.elapsed();

    let out_path = args.output.clone().unwrap_or_else(|| {
        let stem = args.input.file_stem().unwrap_or_default().to_string_lossy();
        args.input.with_file_name(format!("{stem}_q.png"))
    });

    let raw: Vec<u8> = result
        .image()
        .pixels()
        .flat_map(|p| [p.r, p.g, p.b])
        .collect();
    let out = image::RgbImage::from_raw(w as u32, h as u32, raw)
        .context("quantized buffer does not match image dimensions")?;
    out.save(&out_path)
        .with_context(|| format!("cannot write {}", out_path.display()))?;

    println!("distinct colors: {}", result.distinct_colors());
    println!("mst total weight: {:.3}", result.mst_total_weight());
    println!("palette size: {}", result.palette_len());
    println!("elapsed: {:.3} ms", elapsed.as_secs_f64() * 1000.0);
    println!("saved → {}", out_path.display());

    Ok(())
}
