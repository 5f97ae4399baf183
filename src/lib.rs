#![forbid(unsafe_code)]

pub mod cluster;
pub mod color;
pub mod error;
pub mod histogram;
pub mod mst;
pub mod palette;
pub mod remap;
pub mod smooth;

pub use color::Color;
pub use error::QuantizeError;
pub use palette::Palette;

use imgref::{ImgRef, ImgVec};

/// Configuration for palette quantization.
#[derive(Debug, Clone)]
pub struct QuantizeConfig {
    /// Number of palette colors to produce (the cluster count `k`).
    pub colors: usize,
    /// Clamp `colors` to the number of distinct colors in the image instead of
    /// failing with [`QuantizeError::InvalidColorCount`].
    pub clamp_colors: bool,
}

impl Default for QuantizeConfig {
    fn default() -> Self {
        Self {
            colors: 16,
            clamp_colors: false,
        }
    }
}

impl QuantizeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn colors(mut self, k: usize) -> Self {
        self.colors = k;
        self
    }

    pub fn clamp_colors(mut self, clamp: bool) -> Self {
        self.clamp_colors = clamp;
        self
    }

    /// Resolve the cluster count for an image with `available` distinct colors.
    fn cluster_count(&self, available: usize) -> Result<usize, QuantizeError> {
        let k = if self.clamp_colors {
            self.colors.min(available)
        } else {
            self.colors
        };
        if k == 0 || k > available {
            return Err(QuantizeError::InvalidColorCount {
                requested: self.colors,
                available,
            });
        }
        Ok(k)
    }
}

/// Summary figures of one quantization run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuantizeStats {
    /// Number of distinct colors in the source image.
    pub distinct_colors: usize,
    /// Total weight of the spanning tree before any edge was cut.
    pub mst_total_weight: f64,
    /// Number of clusters, equal to the palette length.
    pub clusters: usize,
}

/// Quantization result.
#[derive(Debug)]
pub struct QuantizeResult {
    palette: Palette,
    indices: Vec<usize>,
    image: ImgVec<Color>,
    stats: QuantizeStats,
}

impl QuantizeResult {
    /// Palette entries in cluster discovery order.
    pub fn palette(&self) -> &[Color] {
        self.palette.entries()
    }

    /// Number of colors in the palette.
    pub fn palette_len(&self) -> usize {
        self.palette.len()
    }

    /// Palette index for each pixel, row-major.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// The quantized image, same dimensions as the input.
    pub fn image(&self) -> ImgRef<'_, Color> {
        self.image.as_ref()
    }

    pub fn into_image(self) -> ImgVec<Color> {
        self.image
    }

    pub fn stats(&self) -> &QuantizeStats {
        &self.stats
    }

    pub fn distinct_colors(&self) -> usize {
        self.stats.distinct_colors
    }

    pub fn mst_total_weight(&self) -> f64 {
        self.stats.mst_total_weight
    }
}

/// Quantize an RGB image to `config.colors` colors.
///
/// 1. Collect the distinct colors of the image.
/// 2. Build their minimum spanning tree.
/// 3. Cut the heaviest `k - 1` tree edges into `k` clusters.
/// 4. Average each cluster into a palette entry.
/// 5. Remap every pixel to its nearest palette entry.
pub fn quantize(
    pixels: &[Color],
    width: usize,
    height: usize,
    config: &QuantizeConfig,
) -> Result<QuantizeResult, QuantizeError> {
    validate_inputs(pixels.len(), width, height)?;

    let (palette, stats) = build_palette(&histogram::distinct_colors(pixels), config)?;

    let indices = remap::remap_pixels(pixels, &palette)?;
    let entries = palette.entries();
    let image = ImgVec::new(indices.iter().map(|&i| entries[i]).collect(), width, height);

    Ok(QuantizeResult {
        palette,
        indices,
        image,
        stats,
    })
}

/// Quantize an image held as an `imgref` buffer (stride is honored).
pub fn quantize_img(
    img: ImgRef<'_, Color>,
    config: &QuantizeConfig,
) -> Result<QuantizeResult, QuantizeError> {
    let pixels: Vec<Color> = img.pixels().collect();
    quantize(&pixels, img.width(), img.height(), config)
}

/// Build a palette from a list of distinct colors without remapping any image.
///
/// The first color is the spanning tree root. `colors` must not contain duplicates.
pub fn build_palette(
    colors: &[Color],
    config: &QuantizeConfig,
) -> Result<(Palette, QuantizeStats), QuantizeError> {
    if colors.is_empty() {
        return Err(QuantizeError::EmptyInput);
    }
    let k = config.cluster_count(colors.len())?;
    log::debug!("{} distinct colors, {k} clusters requested", colors.len());

    let mut tree = mst::build_mst(colors)?;
    let mst_total_weight = tree.total_weight();
    log::debug!("spanning tree weight {mst_total_weight:.3}");

    let clusters = cluster::partition(&mut tree, k)?;
    let palette = palette::extract_palette(&clusters);
    log::debug!("palette of {} colors", palette.len());

    let stats = QuantizeStats {
        distinct_colors: colors.len(),
        mst_total_weight,
        clusters: clusters.len(),
    };
    Ok((palette, stats))
}

fn validate_inputs(pixel_count: usize, width: usize, height: usize) -> Result<(), QuantizeError> {
    if width == 0 || height == 0 {
        return Err(QuantizeError::ZeroDimension);
    }
    if pixel_count != width * height {
        return Err(QuantizeError::DimensionMismatch {
            len: pixel_count,
            width,
            height,
        });
    }
    Ok(())
}
