/// An 8-bit sRGB color. Equality, ordering and hashing are structural over
/// the three channels, so a color can key a map directly.
pub type Color = rgb::RGB8;

/// Pack a color into a `0xRRGGBB` integer. Distinct colors get distinct keys.
#[inline]
pub fn color_key(c: Color) -> u32 {
    (c.r as u32) << 16 | (c.g as u32) << 8 | c.b as u32
}

/// Squared Euclidean distance between two colors in RGB channel space.
///
/// Exact integer arithmetic; use this when only the ordering of distances matters.
#[inline]
pub fn distance_sq(a: Color, b: Color) -> u32 {
    let dr = a.r as i32 - b.r as i32;
    let dg = a.g as i32 - b.g as i32;
    let db = a.b as i32 - b.b as i32;
    (dr * dr + dg * dg + db * db) as u32
}

/// Euclidean distance between two colors in RGB channel space.
#[inline]
pub fn distance(a: Color, b: Color) -> f32 {
    (distance_sq(a, b) as f32).sqrt()
}

/// Component-wise mean of a set of colors, truncated toward zero.
///
/// Returns `None` for an empty set.
pub fn mean(colors: &[Color]) -> Option<Color> {
    if colors.is_empty() {
        return None;
    }

    let (mut r, mut g, mut b) = (0u64, 0u64, 0u64);
    for c in colors {
        r += c.r as u64;
        g += c.g as u64;
        b += c.b as u64;
    }

    let n = colors.len() as u64;
    Some(Color {
        r: (r / n) as u8,
        g: (g / n) as u8,
        b: (b / n) as u8,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_symmetric() {
        let a = Color::new(10, 20, 30);
        let b = Color::new(40, 0, 255);
        assert_eq!(distance_sq(a, b), distance_sq(b, a));
        assert_eq!(distance(a, b), distance(b, a));
    }

    #[test]
    fn distance_of_unit_axes() {
        let black = Color::new(0, 0, 0);
        assert_eq!(distance(black, Color::new(3, 4, 0)), 5.0);
        assert_eq!(distance_sq(black, Color::new(0, 0, 12)), 144);
        assert_eq!(distance(black, black), 0.0);
    }

    #[test]
    fn distinct_colors_have_positive_distance() {
        let a = Color::new(0, 0, 0);
        let b = Color::new(0, 0, 1);
        assert!(distance(a, b) > 0.0);
    }

    #[test]
    fn extreme_distance_does_not_overflow() {
        let d = distance_sq(Color::new(0, 0, 0), Color::new(255, 255, 255));
        assert_eq!(d, 3 * 255 * 255);
    }

    #[test]
    fn mean_truncates() {
        let colors = [Color::new(0, 0, 0), Color::new(10, 0, 0), Color::new(0, 0, 10)];
        assert_eq!(mean(&colors), Some(Color::new(3, 0, 3)));
    }

    #[test]
    fn mean_of_empty_is_none() {
        assert_eq!(mean(&[]), None);
    }

    #[test]
    fn mean_of_many_white_pixels() {
        let colors = vec![Color::new(255, 255, 255); 100_000];
        assert_eq!(mean(&colors), Some(Color::new(255, 255, 255)));
    }
}
