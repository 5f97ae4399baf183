use std::collections::BTreeMap;

use crate::color::{Color, color_key};
use crate::error::QuantizeError;
use crate::mst::SpanningTree;

/// One connected component of the forest left after cutting tree edges.
pub type Cluster = Vec<Color>;

/// Neighbor lists of the forest left after cutting tree edges.
///
/// Iteration order is the order in which vertices were first registered.
#[derive(Debug, Clone, Default)]
pub struct AdjacencyMap {
    index: BTreeMap<u32, usize>,
    colors: Vec<Color>,
    neighbors: Vec<Vec<usize>>,
}

impl AdjacencyMap {
    /// Build the map from a tree, linking the endpoints of every uncut edge.
    ///
    /// Vertices are registered as edge endpoints in edge order, source before
    /// destination. Endpoints of cut edges still get an entry. A tree without
    /// edges contributes its lone vertex.
    pub fn from_tree(tree: &SpanningTree) -> Self {
        let mut map = Self::default();
        if tree.edges().is_empty() {
            for &v in tree.vertices() {
                map.register(v);
            }
        }
        for e in tree.edges() {
            let a = map.register(e.src);
            let b = map.register(e.dst);
            if !e.is_cut() {
                map.neighbors[a].push(b);
                map.neighbors[b].push(a);
            }
        }
        map
    }

    fn register(&mut self, color: Color) -> usize {
        let key = color_key(color);
        if let Some(&i) = self.index.get(&key) {
            return i;
        }
        let i = self.colors.len();
        self.index.insert(key, i);
        self.colors.push(color);
        self.neighbors.push(Vec::new());
        i
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn contains(&self, color: Color) -> bool {
        self.index.contains_key(&color_key(color))
    }

    /// Colors directly connected to `color`, or `None` if it is not a vertex.
    pub fn neighbors(&self, color: Color) -> Option<impl Iterator<Item = Color> + '_> {
        let i = *self.index.get(&color_key(color))?;
        Some(self.neighbors[i].iter().map(|&j| self.colors[j]))
    }

    /// Connected components, each collected by depth-first traversal from the
    /// first unvisited vertex in map order.
    pub fn components(&self) -> Vec<Cluster> {
        let mut visited = vec![false; self.colors.len()];
        let mut clusters = Vec::new();
        let mut stack = Vec::new();

        for start in 0..self.colors.len() {
            if visited[start] {
                continue;
            }
            let mut cluster = Vec::new();
            visited[start] = true;
            stack.push(start);
            while let Some(v) = stack.pop() {
                cluster.push(self.colors[v]);
                for &n in self.neighbors[v].iter().rev() {
                    if !visited[n] {
                        visited[n] = true;
                        stack.push(n);
                    }
                }
            }
            clusters.push(cluster);
        }

        clusters
    }
}

/// Cut the `k - 1` heaviest edges of `tree` and return the resulting `k`
/// connected components.
///
/// Cut edges are tombstoned in place (weight set to zero), heaviest first,
/// with ties going to the earliest edge. `k` is checked before any edge is
/// touched: it must lie in `1..=tree.vertex_count()`.
pub fn partition(tree: &mut SpanningTree, k: usize) -> Result<Vec<Cluster>, QuantizeError> {
    let available = tree.vertex_count();
    if available == 0 {
        return Err(QuantizeError::EmptyInput);
    }
    if k == 0 || k > available {
        return Err(QuantizeError::InvalidColorCount {
            requested: k,
            available,
        });
    }

    cut_heaviest(tree, k - 1);
    log::trace!("cut {} of {} tree edges", k - 1, tree.edges().len());

    Ok(AdjacencyMap::from_tree(tree).components())
}

/// Tombstone the `count` heaviest edges, one linear scan per cut.
fn cut_heaviest(tree: &mut SpanningTree, count: usize) {
    let edges = tree.edges_mut();
    for _ in 0..count {
        let mut max_idx = None;
        let mut max_weight = 0.0f32;
        for (i, e) in edges.iter().enumerate() {
            if e.weight > max_weight {
                max_weight = e.weight;
                max_idx = Some(i);
            }
        }
        match max_idx {
            Some(i) => edges[i].weight = 0.0,
            None => break,
        }
    }
}
