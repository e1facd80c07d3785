//! Single-source shortest paths over a [`WeightedGraph`].
//!
//! Dijkstra's algorithm with a binary heap and lazy deletion: a vertex is
//! finalized the first time it is popped, and later (stale) heap entries for
//! it are skipped. Distances along graph edges approximate geodesic distances
//! on the surface the graph was sampled from.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use rayon::prelude::*;

use super::WeightedGraph;

/// Options for shortest path computation.
#[derive(Debug, Clone)]
pub struct ShortestPathOptions {
    /// Vertices farther than this are left unreached. `None` for no limit.
    pub max_distance: Option<f64>,

    /// Stop as soon as this vertex is finalized.
    pub target: Option<usize>,

    /// Whether [`shortest_paths_from_many`] runs roots in parallel.
    pub parallel: bool,
}

impl Default for ShortestPathOptions {
    fn default() -> Self {
        Self {
            max_distance: None,
            target: None,
            parallel: true,
        }
    }
}

impl ShortestPathOptions {
    /// Set maximum distance to explore.
    pub fn with_max_distance(mut self, max_dist: f64) -> Self {
        self.max_distance = Some(max_dist);
        self
    }

    /// Set target vertex for early termination.
    pub fn with_target(mut self, target: usize) -> Self {
        self.target = Some(target);
        self
    }

    /// Set whether to use parallel execution.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

/// Entry in the priority queue: a tentative distance and the vertex it came from.
#[derive(Debug, Clone)]
struct QueueEntry {
    distance: f64,
    vertex: usize,
    prev: Option<usize>,
}

// Reverse ordering turns BinaryHeap into a min-heap on distance.
impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.distance == other.distance
    }
}

impl Eq for QueueEntry {}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .distance
            .partial_cmp(&self.distance)
            .unwrap_or(Ordering::Equal)
    }
}

/// Shortest path tree from one root.
///
/// Unreached vertices have no distance and no predecessor. The root has
/// distance zero and no predecessor.
#[derive(Debug, Clone, PartialEq)]
pub struct ShortestPaths {
    root: usize,
    /// `f64::INFINITY` marks unreached vertices.
    distances: Vec<f64>,
    predecessors: Vec<Option<usize>>,
}

impl ShortestPaths {
    /// The root the tree was grown from.
    #[inline]
    pub fn root(&self) -> usize {
        self.root
    }

    /// Number of vertices covered (reached or not).
    #[inline]
    pub fn len(&self) -> usize {
        self.distances.len()
    }

    /// Check if the graph had no vertices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
    }

    /// Accumulated edge length from the root, `None` if unreached.
    #[inline]
    pub fn distance(&self, v: usize) -> Option<f64> {
        let d = self.distances[v];
        d.is_finite().then_some(d)
    }

    /// Raw distances; unreached vertices hold `f64::INFINITY`.
    #[inline]
    pub fn distances(&self) -> &[f64] {
        &self.distances
    }

    /// Previous vertex on the shortest path, `None` for the root and for
    /// unreached vertices.
    #[inline]
    pub fn predecessor(&self, v: usize) -> Option<usize> {
        self.predecessors[v]
    }

    /// Check if a vertex was reached from the root.
    #[inline]
    pub fn is_reachable(&self, v: usize) -> bool {
        self.distances[v].is_finite()
    }

    /// Count the number of reached vertices.
    pub fn reachable_count(&self) -> usize {
        self.distances.iter().filter(|d| d.is_finite()).count()
    }

    /// The reached vertex farthest from the root.
    pub fn farthest(&self) -> Option<(usize, f64)> {
        self.distances
            .iter()
            .copied()
            .enumerate()
            .filter(|(_, d)| d.is_finite())
            .fold(None, |best, (v, d)| match best {
                Some((_, bd)) if bd >= d => best,
                _ => Some((v, d)),
            })
    }

    /// Vertices from the root to `target`, both included.
    ///
    /// `None` if `target` was not reached.
    pub fn path_to(&self, target: usize) -> Option<Vec<usize>> {
        if !self.is_reachable(target) {
            return None;
        }

        let mut path = vec![target];
        let mut current = target;
        while let Some(prev) = self.predecessors[current] {
            path.push(prev);
            current = prev;
            if path.len() > self.distances.len() {
                return None;
            }
        }

        path.reverse();
        Some(path)
    }
}

/// Compute the shortest path tree of `graph` from `root`.
///
/// Edge weights are Euclidean distances between endpoint positions, so they
/// are never negative. Disconnected parts of the graph stay unreached. Ties
/// between equal tentative distances are resolved by heap order, which is
/// deterministic but otherwise unspecified.
///
/// Runs in O(E log V).
///
/// # Example
///
/// ```
/// use armature::graph::{shortest_paths, ShortestPathOptions, WeightedGraph};
/// use nalgebra::Point3;
///
/// let mut graph = WeightedGraph::with_vertices(vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(0.0, 2.0, 0.0),
/// ]);
/// graph.add_edge(0, 1);
///
/// let paths = shortest_paths(&graph, 1, &ShortestPathOptions::default());
/// assert_eq!(paths.distance(0), Some(2.0));
/// assert_eq!(paths.predecessor(0), Some(1));
/// ```
pub fn shortest_paths(
    graph: &WeightedGraph,
    root: usize,
    options: &ShortestPathOptions,
) -> ShortestPaths {
    let n = graph.num_vertices();
    let mut distances = vec![f64::INFINITY; n];
    let mut predecessors = vec![None; n];
    let mut done = vec![false; n];

    if root >= n {
        return ShortestPaths {
            root,
            distances,
            predecessors,
        };
    }

    let mut heap = BinaryHeap::new();
    heap.push(QueueEntry {
        distance: 0.0,
        vertex: root,
        prev: None,
    });

    while let Some(entry) = heap.pop() {
        let u = entry.vertex;
        if done[u] {
            continue;
        }

        if let Some(max_dist) = options.max_distance {
            if entry.distance > max_dist {
                break;
            }
        }

        done[u] = true;
        distances[u] = entry.distance;
        predecessors[u] = entry.prev;

        if options.target == Some(u) {
            break;
        }

        for &v in graph.neighbors(u) {
            if !done[v] {
                heap.push(QueueEntry {
                    distance: entry.distance + graph.edge_length(u, v),
                    vertex: v,
                    prev: Some(u),
                });
            }
        }
    }

    ShortestPaths {
        root,
        distances,
        predecessors,
    }
}

/// Compute one shortest path tree per root.
///
/// Results come back in `roots` order. With `options.parallel` the roots are
/// processed on the rayon thread pool.
pub fn shortest_paths_from_many(
    graph: &WeightedGraph,
    roots: &[usize],
    options: &ShortestPathOptions,
) -> Vec<ShortestPaths> {
    if options.parallel {
        roots
            .par_iter()
            .map(|&root| shortest_paths(graph, root, options))
            .collect()
    } else {
        roots
            .iter()
            .map(|&root| shortest_paths(graph, root, options))
            .collect()
    }
}
