use std::collections::BTreeSet;

use crate::color::{Color, color_key};

/// Collect the distinct colors of an image in first-occurrence order.
///
/// The first entry is the color of the first pixel, which makes it the root
/// of the spanning tree built over the result.
pub fn distinct_colors(pixels: &[Color]) -> Vec<Color> {
    let mut seen = BTreeSet::new();
    let mut colors = Vec::new();
    for &p in pixels {
        if seen.insert(color_key(p)) {
            colors.push(p);
        }
    }
    colors
}
