use imgref::{ImgRef, ImgVec};

use crate::color::Color;
use crate::error::QuantizeError;

/// Normalized 1-D Gaussian kernel of `mask_size` taps centered on the middle tap.
///
/// `mask_size` must be odd and positive, `sigma` finite and positive.
pub fn gaussian_kernel(mask_size: usize, sigma: f64) -> Result<Vec<f64>, QuantizeError> {
    if mask_size == 0 || mask_size % 2 == 0 {
        return Err(QuantizeError::InvalidMaskSize(mask_size));
    }
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(QuantizeError::InvalidSigma(sigma));
    }

    let half = (mask_size / 2) as isize;
    let denom = 2.0 * sigma * sigma;
    let mut kernel: Vec<f64> = (-half..=half)
        .map(|x| (-((x * x) as f64) / denom).exp())
        .collect();
    let sum: f64 = kernel.iter().sum();
    for k in &mut kernel {
        *k /= sum;
    }
    Ok(kernel)
}

/// Separable Gaussian blur: one horizontal pass, then one vertical pass.
///
/// Near the borders only in-range taps contribute, renormalized by the sum of
/// the taps used, so flat regions stay flat up to the edge.
pub fn gaussian_blur(
    img: ImgRef<'_, Color>,
    mask_size: usize,
    sigma: f64,
) -> Result<ImgVec<Color>, QuantizeError> {
    let (width, height) = (img.width(), img.height());
    if width == 0 || height == 0 {
        return Err(QuantizeError::ZeroDimension);
    }
    let kernel = gaussian_kernel(mask_size, sigma)?;
    let half = mask_size / 2;

    // Horizontal pass
    let mut rows = vec![[0.0f64; 3]; width * height];
    for (y, row) in img.rows().enumerate() {
        for x in 0..width {
            let lo = x.saturating_sub(half);
            let hi = (x + half).min(width - 1);
            let mut acc = [0.0f64; 3];
            let mut used = 0.0f64;
            for sx in lo..=hi {
                let w = kernel[sx + half - x];
                let p = row[sx];
                acc[0] += p.r as f64 * w;
                acc[1] += p.g as f64 * w;
                acc[2] += p.b as f64 * w;
                used += w;
            }
            rows[y * width + x] = [acc[0] / used, acc[1] / used, acc[2] / used];
        }
    }

    // Vertical pass
    let mut out = Vec::with_capacity(width * height);
    for y in 0..height {
        let lo = y.saturating_sub(half);
        let hi = (y + half).min(height - 1);
        for x in 0..width {
            let mut acc = [0.0f64; 3];
            let mut used = 0.0f64;
            for sy in lo..=hi {
                let w = kernel[sy + half - y];
                let p = rows[sy * width + x];
                acc[0] += p[0] * w;
                acc[1] += p[1] * w;
                acc[2] += p[2] * w;
                used += w;
            }
            out.push(Color::new(
                to_channel(acc[0] / used),
                to_channel(acc[1] / used),
                to_channel(acc[2] / used),
            ));
        }
    }

    Ok(ImgVec::new(out, width, height))
}

#[inline]
fn to_channel(v: f64) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_image(c: Color, width: usize, height: usize) -> ImgVec<Color> {
        ImgVec::new(vec![c; width * height], width, height)
    }

    #[test]
    fn kernel_is_normalized_and_symmetric() {
        let k = gaussian_kernel(5, 1.0).unwrap();
        assert_eq!(k.len(), 5);
        let sum: f64 = k.iter().sum();
        assert!((sum - 1.0).abs() < 1e-9);
        assert!((k[0] - k[4]).abs() < 1e-12);
        assert!((k[1] - k[3]).abs() < 1e-12);
        assert!(k[2] > k[1] && k[1] > k[0]);
    }

    #[test]
    fn invalid_parameters() {
        assert_eq!(gaussian_kernel(0, 1.0), Err(QuantizeError::InvalidMaskSize(0)));
        assert_eq!(gaussian_kernel(4, 1.0), Err(QuantizeError::InvalidMaskSize(4)));
        assert_eq!(gaussian_kernel(3, 0.0), Err(QuantizeError::InvalidSigma(0.0)));
        assert!(matches!(
            gaussian_kernel(3, f64::NAN),
            Err(QuantizeError::InvalidSigma(_))
        ));
    }

    #[test]
    fn flat_image_is_unchanged() {
        let img = flat_image(Color::new(40, 120, 200), 9, 7);
        let out = gaussian_blur(img.as_ref(), 5, 2.0).unwrap();
        assert_eq!((out.width(), out.height()), (9, 7));
        assert!(out.pixels().all(|p| p == Color::new(40, 120, 200)));
    }

    #[test]
    fn single_tap_is_identity() {
        let buf: Vec<Color> = (0..16u8).map(|i| Color::new(i * 16, 255 - i, i)).collect();
        let img = ImgVec::new(buf.clone(), 4, 4);
        let out = gaussian_blur(img.as_ref(), 1, 1.0).unwrap();
        assert_eq!(out.buf(), &buf);
    }

    #[test]
    fn blur_softens_an_edge() {
        let mut buf = vec![Color::new(0, 0, 0); 8];
        for p in &mut buf[4..] {
            *p = Color::new(255, 255, 255);
        }
        let img = ImgVec::new(buf, 8, 1);
        let out = gaussian_blur(img.as_ref(), 3, 1.0).unwrap();
        let px = out.buf();
        assert!(px[3].r > 0 && px[3].r < 255);
        assert!(px[4].r > 0 && px[4].r < 255);
        assert_eq!(px[0], Color::new(0, 0, 0));
        assert_eq!(px[7], Color::new(255, 255, 255));
    }

    #[test]
    fn noise_variance_drops() {
        let buf: Vec<Color> = (0..256u32)
            .map(|i| {
                let h = i.wrapping_mul(2654435761) as u8;
                Color::new(h, h.wrapping_add(50), h.wrapping_add(100))
            })
            .collect();
        let img = ImgVec::new(buf.clone(), 16, 16);
        let out = gaussian_blur(img.as_ref(), 5, 1.5).unwrap();

        let variance = |px: &[Color]| {
            let n = px.len() as f64;
            let mean = px.iter().map(|p| p.r as f64).sum::<f64>() / n;
            px.iter().map(|p| (p.r as f64 - mean).powi(2)).sum::<f64>() / n
        };
        let before = variance(&buf[..]);
        let after = variance(&out.buf()[..]);
        assert!(after < before / 2.0, "variance {before} -> {after}");
    }
}
