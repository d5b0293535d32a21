//! Edge routing between two vertices.
//!
//! Dijkstra over the vertex graph rooted at `start`. Entering a vertex costs
//! its straight-line distance to `start` rather than the length of the edge
//! taken, so routes prefer to stay close to the origin instead of being
//! strictly shortest.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use super::poly_mesh::{EdgeId, MeshError, PolyMesh, VertId};

/// Edges found by [`edge_path`], listed from `end` back towards `start`.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgePath {
    pub edges: Vec<EdgeId>,
    /// Where the backward walk from `end` stopped. Equals `start` exactly
    /// when `end` was reachable.
    pub origin: VertId,
}

impl EdgePath {
    pub fn connects(&self, start: VertId) -> bool {
        self.origin == start
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Edges ordered from `start` to `end`.
    pub fn forward(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.edges.iter().rev().copied()
    }
}

#[derive(Debug, Clone, Copy)]
struct QueueEntry {
    cost: f32,
    vert: VertId,
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueueEntry {}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry {
    // Reversed so the max-heap pops the cheapest entry first.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.vert.cmp(&self.vert))
    }
}

/// Route from `start` to `end` along mesh edges.
///
/// If `end` cannot be reached the returned path is empty and its `origin`
/// is `end`; check [`EdgePath::connects`] before using it.
pub fn edge_path(mesh: &PolyMesh, start: VertId, end: VertId) -> Result<EdgePath, MeshError> {
    mesh.check_vert(start)?;
    mesh.check_vert(end)?;

    let origin = mesh.position(start);
    let mut dist: HashMap<VertId, f32> = HashMap::from([(start, 0.0)]);
    let mut prev: HashMap<VertId, (VertId, EdgeId)> = HashMap::new();
    let mut visited: HashSet<VertId> = HashSet::new();
    let mut queue = BinaryHeap::from([QueueEntry {
        cost: 0.0,
        vert: start,
    }]);

    while let Some(QueueEntry { cost, vert: u }) = queue.pop() {
        if !visited.insert(u) {
            continue;
        }
        if u == end {
            break;
        }
        for &e in mesh.link_edges(u) {
            let Some(v) = mesh.other_vert(e, u) else {
                continue;
            };
            if visited.contains(&v) {
                continue;
            }
            let alt = cost + mesh.position(v).distance(origin);
            if dist.get(&v).is_none_or(|&d| alt < d) {
                dist.insert(v, alt);
                prev.insert(v, (u, e));
                queue.push(QueueEntry { cost: alt, vert: v });
            }
        }
    }

    let mut edges = Vec::new();
    let mut at = end;
    while let Some(&(p, e)) = prev.get(&at) {
        edges.push(e);
        at = p;
    }
    Ok(EdgePath { edges, origin: at })
}
