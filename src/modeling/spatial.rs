//! Nearest-face lookup over face centers.
//!
//! A balanced k-d tree keyed on each face's median center. The index is a
//! snapshot: after any topology change the caller must rebuild it before
//! querying again, otherwise lookups may return faces that no longer exist.

use bevy::prelude::*;

use super::poly_mesh::{FaceId, PolyMesh};

#[derive(Debug, Clone, Copy)]
struct KdNode {
    point: Vec3,
    face: FaceId,
    axis: usize,
    left: Option<u32>,
    right: Option<u32>,
}

#[derive(Debug, Clone, Default)]
pub struct SpatialIndex {
    nodes: Vec<KdNode>,
    root: Option<u32>,
}

impl SpatialIndex {
    /// Index every live face of `mesh` by its center.
    pub fn build(mesh: &PolyMesh) -> Self {
        let entries = mesh
            .face_ids()
            .map(|f| (mesh.face_center(f), f))
            .collect();
        Self::from_entries(entries)
    }

    pub fn from_entries(mut entries: Vec<(Vec3, FaceId)>) -> Self {
        let mut nodes = Vec::with_capacity(entries.len());
        let root = build_node(&mut entries, 0, &mut nodes);
        Self { nodes, root }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The face whose center is closest to `point`. Ties keep the first found.
    pub fn nearest(&self, point: Vec3) -> Option<FaceId> {
        self.nearest_with_distance(point).map(|(face, _)| face)
    }

    pub fn nearest_with_distance(&self, point: Vec3) -> Option<(FaceId, f32)> {
        let mut best = None;
        self.search(self.root?, point, &mut best);
        best.map(|(node, d2): (u32, f32)| (self.nodes[node as usize].face, d2.sqrt()))
    }

    fn search(&self, node: u32, point: Vec3, best: &mut Option<(u32, f32)>) {
        let n = &self.nodes[node as usize];
        let d2 = n.point.distance_squared(point);
        if best.is_none_or(|(_, bd)| d2 < bd) {
            *best = Some((node, d2));
        }

        let diff = point[n.axis] - n.point[n.axis];
        let (near, far) = if diff < 0.0 {
            (n.left, n.right)
        } else {
            (n.right, n.left)
        };
        if let Some(near) = near {
            self.search(near, point, best);
        }
        // The far side can only win if the splitting plane is closer than the best hit.
        if let Some(far) = far {
            if best.is_none_or(|(_, bd)| diff * diff < bd) {
                self.search(far, point, best);
            }
        }
    }
}

fn build_node(entries: &mut [(Vec3, FaceId)], depth: usize, nodes: &mut Vec<KdNode>) -> Option<u32> {
    if entries.is_empty() {
        return None;
    }
    let axis = depth % 3;
    let mid = entries.len() / 2;
    entries.select_nth_unstable_by(mid, |a, b| a.0[axis].total_cmp(&b.0[axis]));

    let (point, face) = entries[mid];
    let index = nodes.len() as u32;
    nodes.push(KdNode {
        point,
        face,
        axis,
        left: None,
        right: None,
    });

    let (left, rest) = entries.split_at_mut(mid);
    let left = build_node(left, depth + 1, nodes);
    let right = build_node(&mut rest[1..], depth + 1, nodes);
    nodes[index as usize].left = left;
    nodes[index as usize].right = right;
    Some(index)
}
