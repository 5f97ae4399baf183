use crate::color::{Color, distance};
use crate::error::QuantizeError;

/// A tree edge between two distinct colors.
///
/// The weight is the RGB distance between the endpoints, so it is strictly
/// positive for every edge the builder emits. A weight of `0.0` marks an edge
/// that has been cut.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub src: Color,
    pub dst: Color,
    pub weight: f32,
}

impl Edge {
    pub fn is_cut(&self) -> bool {
        self.weight == 0.0
    }
}

/// Minimum spanning tree over the complete graph of an image's distinct colors.
#[derive(Debug, Clone)]
pub struct SpanningTree {
    vertices: Vec<Color>,
    edges: Vec<Edge>,
    total_weight: f64,
}

impl SpanningTree {
    /// Vertices in input order.
    pub fn vertices(&self) -> &[Color] {
        &self.vertices
    }

    /// Edges in extraction order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub(crate) fn edges_mut(&mut self) -> &mut [Edge] {
        &mut self.edges
    }

    /// Sum of the edge weights as built. Cutting edges does not change it.
    pub fn total_weight(&self) -> f64 {
        self.total_weight
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of edges that have been cut.
    pub fn cut_count(&self) -> usize {
        self.edges.iter().filter(|e| e.is_cut()).count()
    }
}

/// Build a minimum spanning tree with Prim's algorithm.
///
/// The graph is implicit: every pair of vertices is connected, and distances
/// are computed on demand during relaxation. The first vertex is the root.
/// Runs in O(V²) time and O(V) memory.
///
/// `vertices` must not contain duplicates.
pub fn build_mst(vertices: &[Color]) -> Result<SpanningTree, QuantizeError> {
    let n = vertices.len();
    if n == 0 {
        return Err(QuantizeError::EmptyInput);
    }

    let mut best = vec![f32::MAX; n];
    let mut parent: Vec<Option<usize>> = vec![None; n];
    let mut in_tree = vec![false; n];
    best[0] = 0.0;

    let mut edges = Vec::with_capacity(n - 1);
    let mut total_weight = 0.0f64;

    for _ in 0..n {
        // Lowest index wins ties
        let mut current = usize::MAX;
        let mut current_weight = f32::INFINITY;
        for (i, (&w, &done)) in best.iter().zip(in_tree.iter()).enumerate() {
            if !done && w < current_weight {
                current_weight = w;
                current = i;
            }
        }

        in_tree[current] = true;
        if let Some(p) = parent[current] {
            edges.push(Edge {
                src: vertices[current],
                dst: vertices[p],
                weight: current_weight,
            });
            total_weight += current_weight as f64;
        }

        relax(vertices, current, &in_tree, &mut best, &mut parent);
    }

    log::trace!("spanning tree over {n} colors, total weight {total_weight}");

    Ok(SpanningTree {
        vertices: vertices.to_vec(),
        edges,
        total_weight,
    })
}

/// Lower the best known connection weight of every vertex outside the tree
/// against the vertex just added.
#[cfg(not(feature = "rayon"))]
fn relax(
    vertices: &[Color],
    added: usize,
    in_tree: &[bool],
    best: &mut [f32],
    parent: &mut [Option<usize>],
) {
    let root = vertices[added];
    for i in 0..vertices.len() {
        if in_tree[i] {
            continue;
        }
        let d = distance(vertices[i], root);
        if d < best[i] {
            best[i] = d;
            parent[i] = Some(added);
        }
    }
}

#[cfg(feature = "rayon")]
fn relax(
    vertices: &[Color],
    added: usize,
    in_tree: &[bool],
    best: &mut [f32],
    parent: &mut [Option<usize>],
) {
    use rayon::prelude::*;

    const MIN_PARALLEL: usize = 4096;

    let root = vertices[added];
    let update = |(((v, done), b), p): (((&Color, &bool), &mut f32), &mut Option<usize>)| {
        if *done {
            return;
        }
        let d = distance(*v, root);
        if d < *b {
            *b = d;
            *p = Some(added);
        }
    };

    if vertices.len() < MIN_PARALLEL {
        vertices
            .iter()
            .zip(in_tree.iter())
            .zip(best.iter_mut())
            .zip(parent.iter_mut())
            .for_each(update);
    } else {
        vertices
            .par_iter()
            .zip(in_tree.par_iter())
            .zip(best.par_iter_mut())
            .zip(parent.par_iter_mut())
            .for_each(update);
    }
}
