use imgref::{ImgRef, ImgVec};

use crate::color::Color;
use crate::error::QuantizeError;
use crate::palette::Palette;

/// Map pixels to the index of their nearest palette entry.
pub fn remap_pixels(pixels: &[Color], palette: &Palette) -> Result<Vec<usize>, QuantizeError> {
    if palette.is_empty() {
        return Err(QuantizeError::EmptyInput);
    }

    #[cfg(feature = "rayon")]
    let indices: Vec<usize> = {
        use rayon::prelude::*;
        pixels
            .par_iter()
            .map(|&p| palette.nearest(p).unwrap_or(0))
            .collect()
    };

    #[cfg(not(feature = "rayon"))]
    let indices: Vec<usize> = pixels
        .iter()
        .map(|&p| palette.nearest(p).unwrap_or(0))
        .collect();

    Ok(indices)
}

/// Replace every pixel with its nearest palette entry.
pub fn remap_in_place(pixels: &mut [Color], palette: &Palette) -> Result<(), QuantizeError> {
    if palette.is_empty() {
        return Err(QuantizeError::EmptyInput);
    }
    let entries = palette.entries();
    let apply = |p: &mut Color| {
        if let Some(i) = palette.nearest(*p) {
            *p = entries[i];
        }
    };

    #[cfg(feature = "rayon")]
    {
        use rayon::prelude::*;
        pixels.par_iter_mut().for_each(apply);
    }

    #[cfg(not(feature = "rayon"))]
    {
        pixels.iter_mut().for_each(apply);
    }

    Ok(())
}

/// Produce a quantized copy of an image. Stride padding is dropped.
pub fn quantize_image(
    img: ImgRef<'_, Color>,
    palette: &Palette,
) -> Result<ImgVec<Color>, QuantizeError> {
    let (width, height) = (img.width(), img.height());
    let mut buf: Vec<Color> = img.pixels().collect();
    remap_in_place(&mut buf, palette)?;
    Ok(ImgVec::new(buf, width, height))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_test_palette() -> Palette {
        Palette::new(vec![
            Color::new(0, 0, 0),
            Color::new(85, 85, 85),
            Color::new(170, 170, 170),
            Color::new(255, 255, 255),
        ])
    }

    #[test]
    fn indices_point_at_nearest() {
        let palette = make_test_palette();
        let pixels = vec![
            Color::new(0, 0, 0),
            Color::new(90, 80, 85),
            Color::new(255, 255, 255),
        ];
        let indices = remap_pixels(&pixels, &palette).unwrap();
        assert_eq!(indices, vec![0, 1, 3]);
    }

    #[test]
    fn in_place_rewrites_pixels() {
        let palette = make_test_palette();
        let mut pixels = vec![Color::new(160, 180, 170), Color::new(30, 30, 30)];
        remap_in_place(&mut pixels, &palette).unwrap();
        assert_eq!(pixels, vec![Color::new(170, 170, 170), Color::new(0, 0, 0)]);
    }

    #[test]
    fn empty_palette_is_an_error() {
        let palette = Palette::new(Vec::new());
        let mut pixels = vec![Color::new(1, 1, 1)];
        assert_eq!(
            remap_in_place(&mut pixels, &palette),
            Err(QuantizeError::EmptyInput)
        );
        assert_eq!(remap_pixels(&pixels, &palette), Err(QuantizeError::EmptyInput));
    }

    #[test]
    fn image_keeps_dimensions_and_drops_stride() {
        let palette = make_test_palette();
        // 3x2 image stored with stride 4
        let buf = vec![Color::new(10, 10, 10); 8];
        let img = ImgRef::new_stride(&buf, 3, 2, 4);
        let out = quantize_image(img, &palette).unwrap();
        assert_eq!((out.width(), out.height()), (3, 2));
        assert_eq!(out.buf().len(), 6);
        assert!(out.pixels().all(|p| p == Color::new(0, 0, 0)));
    }

    #[test]
    fn remapping_twice_is_stable() {
        let palette = make_test_palette();
        let mut pixels: Vec<Color> = (0..=255u8).map(|v| Color::new(v, v / 2, 255 - v)).collect();
        remap_in_place(&mut pixels, &palette).unwrap();
        let once = pixels.clone();
        remap_in_place(&mut pixels, &palette).unwrap();
        assert_eq!(pixels, once);
    }
}
