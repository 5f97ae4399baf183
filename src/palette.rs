use crate::cluster::Cluster;
use crate::color::{Color, distance_sq, mean};

/// Representative colors, one per cluster, in cluster discovery order.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    entries: Vec<Color>,
}

impl Palette {
    /// Wrap an explicit list of entries.
    pub fn new(entries: Vec<Color>) -> Self {
        Self { entries }
    }

    /// Get palette entries.
    pub fn entries(&self) -> &[Color] {
        &self.entries
    }

    /// Number of palette entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the palette is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Find the nearest palette index for a color (brute force).
    ///
    /// Ties go to the lowest index. Returns `None` only for an empty palette.
    pub fn nearest(&self, color: Color) -> Option<usize> {
        let mut best_idx = None;
        let mut best_dist = u32::MAX;

        for (i, &entry) in self.entries.iter().enumerate() {
            let d = distance_sq(color, entry);
            if best_idx.is_none() || d < best_dist {
                best_dist = d;
                best_idx = Some(i);
                if d == 0 {
                    break;
                }
            }
        }

        best_idx
    }
}

/// Average each cluster into one representative color.
///
/// Channel means are truncated toward zero. Empty clusters are skipped.
pub fn extract_palette(clusters: &[Cluster]) -> Palette {
    Palette {
        entries: clusters.iter().filter_map(|c| mean(c)).collect(),
    }
}
