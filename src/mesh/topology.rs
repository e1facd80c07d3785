//! Topology derivation and structural checks for half-edge meshes.
//!
//! Importers hand over triangle soup: consecutive half-edge triplets whose
//! only meaningful field is the target vertex. [`HalfEdgeMesh::compute_topology`]
//! turns that into a linked structure (prev cycles, twins, per-vertex
//! outgoing half-edges). Running it again on its own output changes nothing.

use std::collections::{HashMap, HashSet, VecDeque};

use super::halfedge::{HalfEdge, HalfEdgeMesh};
use super::index::{HalfEdgeId, MeshIndex, VertexId};

/// Directed (start, end) vertex pairs of the triplet starting at `base`.
fn triplet_edges<I: MeshIndex>(edges: &[HalfEdge<I>], base: usize) -> [(usize, usize); 3] {
    let t = [
        edges[base].vertex.index(),
        edges[base + 1].vertex.index(),
        edges[base + 2].vertex.index(),
    ];
    [(t[2], t[0]), (t[0], t[1]), (t[1], t[2])]
}

impl<I: MeshIndex> HalfEdgeMesh<I> {
    /// Derive prev/twin links and vertex half-edges from the raw triplets.
    ///
    /// Duplicate and degenerate faces are removed first (see
    /// [`fix_dup_faces`](Self::fix_dup_faces)), so every directed vertex pair
    /// occurs at most once and twins are unambiguous. A half-edge whose
    /// reverse pair does not exist is a boundary half-edge and has no twin.
    ///
    /// Returns the number of faces removed.
    pub fn compute_topology(&mut self) -> usize {
        let removed = self.fix_dup_faces();

        for base in (0..self.halfedges.len()).step_by(3) {
            for j in 0..3 {
                self.halfedges[base + j].prev = HalfEdgeId::new(base + (j + 2) % 3);
            }
        }

        let mut by_pair: HashMap<(usize, usize), HalfEdgeId<I>> =
            HashMap::with_capacity(self.halfedges.len());
        for base in (0..self.halfedges.len()).step_by(3) {
            for (j, pair) in triplet_edges(&self.halfedges, base).into_iter().enumerate() {
                // Triplet order is (prev-target -> target) for half-edge base + j.
                by_pair.insert(pair, HalfEdgeId::new(base + j));
            }
        }

        let mut boundary = 0;
        for (&(a, b), &he) in &by_pair {
            let twin = by_pair.get(&(b, a)).copied().unwrap_or_default();
            if !twin.is_valid() {
                boundary += 1;
            }
            self.halfedges[he.index()].twin = twin;
        }

        for v in &mut self.vertices {
            v.halfedge = HalfEdgeId::invalid();
        }
        for he in self.halfedge_ids().collect::<Vec<_>>() {
            let source = self.source(he).index();
            let current = self.vertices[source].halfedge;
            // Boundary vertices keep an outgoing boundary half-edge so the
            // one-ring walk starts at one end of the open fan.
            if !current.is_valid()
                || (self.is_boundary_halfedge(he) && !self.is_boundary_halfedge(current))
            {
                self.vertices[source].halfedge = he;
            }
        }

        log::debug!(
            "computed topology: {} faces, {} boundary half-edges, {} faces removed",
            self.num_faces(),
            boundary,
            removed
        );

        removed
    }

    /// Remove faces that would make twin matching ambiguous.
    ///
    /// A face is dropped when one of its directed edges was already claimed
    /// by an earlier face (a duplicated or flipped-over copy of the same
    /// triangle), or when it repeats a vertex. Surviving faces keep their
    /// relative order. Returns the number of faces removed.
    pub fn fix_dup_faces(&mut self) -> usize {
        let num_faces = self.halfedges.len() / 3;
        let mut seen: HashSet<(usize, usize)> = HashSet::with_capacity(self.halfedges.len());
        let mut kept: Vec<HalfEdge<I>> = Vec::with_capacity(self.halfedges.len());

        for base in (0..num_faces * 3).step_by(3) {
            let pairs = triplet_edges(&self.halfedges, base);
            let degenerate = pairs.iter().any(|&(a, b)| a == b);
            if degenerate || pairs.iter().any(|pair| seen.contains(pair)) {
                continue;
            }
            seen.extend(pairs);
            kept.extend_from_slice(&self.halfedges[base..base + 3]);
        }

        let removed = num_faces - kept.len() / 3;
        if removed > 0 {
            log::warn!("removed {} duplicate or degenerate faces", removed);
        }
        self.halfedges = kept;
        removed
    }

    /// Verify the structural invariants of the half-edge arrays.
    ///
    /// Checks face triplets, `prev` cycles of length three, vertex index
    /// bounds, twin symmetry and orientation, and vertex half-edge ownership.
    /// Logs the first violated predicate and returns `false` on failure.
    pub fn integrity_check(&self) -> bool {
        let num_he = self.halfedges.len();
        let num_v = self.vertices.len();

        check!("mesh", num_he % 3 == 0);

        for (i, he) in self.halfedges.iter().enumerate() {
            check!("mesh", he.vertex.is_valid() && he.vertex.index() < num_v);
            check!("mesh", he.prev.is_valid() && he.prev.index() < num_he);
            check!("mesh", he.prev.index() / 3 == i / 3);
            check!("mesh", he.prev.index() != i);
        }

        for (i, he) in self.halfedges.iter().enumerate() {
            let id = HalfEdgeId::<I>::new(i);
            check!("mesh", self.prev(self.prev(self.prev(id))) == id);

            if he.twin.is_valid() {
                check!("mesh", he.twin.index() < num_he);
                check!("mesh", self.twin(he.twin) == id);
                check!("mesh", self.target(he.twin) == self.source(id));
                check!("mesh", self.source(he.twin) == he.vertex);
            }
        }

        for (i, v) in self.vertices.iter().enumerate() {
            if v.halfedge.is_valid() {
                check!("mesh", v.halfedge.index() < num_he);
                check!("mesh", self.source(v.halfedge) == VertexId::new(i));
            }
        }

        true
    }

    /// Label each vertex with the index of its connected component.
    ///
    /// Components are numbered from zero in order of their lowest vertex.
    /// Vertices without any face form components of their own.
    pub fn connected_components(&self) -> Vec<usize> {
        let adjacency = self.vertex_adjacency();
        let mut labels = vec![usize::MAX; self.vertices.len()];
        let mut next_label = 0;
        let mut queue = VecDeque::new();

        for start in 0..self.vertices.len() {
            if labels[start] != usize::MAX {
                continue;
            }
            labels[start] = next_label;
            queue.push_back(start);

            while let Some(v) = queue.pop_front() {
                for &n in &adjacency[v] {
                    if labels[n] == usize::MAX {
                        labels[n] = next_label;
                        queue.push_back(n);
                    }
                }
            }
            next_label += 1;
        }

        labels
    }

    /// Check that the mesh is a single connected component.
    ///
    /// An empty mesh is not connected.
    pub fn is_connected(&self) -> bool {
        if self.vertices.is_empty() {
            return false;
        }
        self.connected_components().iter().all(|&c| c == 0)
    }
}
