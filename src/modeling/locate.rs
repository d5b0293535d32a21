//! Edge picking for the rectangle tool.
//!
//! `closest_edge` answers hover queries: the nearest face by center, then the
//! nearest of that face's boundary edges. This is an approximation (a
//! neighbouring face can own a closer edge) that holds up for picks made
//! directly on visible geometry.
//!
//! `closest_connected_edge` follows the edge graph from a picked edge towards
//! a target that lies beyond it, so a rectangle can be dragged along bent or
//! branching edge chains.

use bevy::prelude::*;
use std::collections::HashSet;

use super::geometry::{edge_dir, edge_distance, edge_factor, edge_snap};
use super::poly_mesh::{EdgeId, FaceId, PolyMesh};
use super::spatial::SpatialIndex;

/// Candidates whose direction has a dot product at or below this with the
/// walking direction bend away too sharply (roughly 84 degrees) to follow.
pub const BEND_THRESHOLD: f32 = 0.1;

/// Result of a hover query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeHit {
    pub edge: EdgeId,
    /// Distance to the edge segment.
    pub distance: f32,
    /// `point` projected onto the edge's line. Lies beyond an endpoint when
    /// the hover is past the end of the edge, so a gesture started there
    /// extrudes a free start vertex.
    pub point: Vec3,
    pub face: FaceId,
}

/// Find the closest edge of the face nearest to `point`.
///
/// Returns `None` for a face-less mesh, or when `index` points at a face that
/// has since been removed (a stale index).
pub fn closest_edge(mesh: &PolyMesh, index: &SpatialIndex, point: Vec3) -> Option<EdgeHit> {
    let face = index.nearest(point)?;
    mesh.face(face)?;

    let mut best: Option<(EdgeId, f32)> = None;
    for e in mesh.face_edges(face) {
        let d = edge_distance(mesh, e, point, true);
        if best.is_none_or(|(_, bd)| d < bd) {
            best = Some((e, d));
        }
    }
    let (edge, distance) = best?;
    Some(EdgeHit {
        edge,
        distance,
        point: edge_snap(mesh, edge, point, false),
        face,
    })
}

/// Walk from `edge` towards `point` until `point` projects onto the current edge.
///
/// Each step leaves through the endpoint on the overshoot side and takes the
/// incident edge closest to `point` among those that keep heading the same
/// way (see [`BEND_THRESHOLD`]). The walk stops early, returning the edge it
/// reached, when no candidate survives or an edge would be visited twice.
pub fn closest_connected_edge(mesh: &PolyMesh, edge: EdgeId, point: Vec3) -> EdgeId {
    let mut current = edge;
    let mut visited = HashSet::from([edge]);

    loop {
        let f = edge_factor(mesh, current, point, false);
        if (0.0..=1.0).contains(&f) {
            return current;
        }

        let [v0, v1] = mesh.edge_verts(current);
        let forward = edge_dir(mesh, current).normalize_or_zero();
        let (tip, dir) = if f < 0.0 { (v0, -forward) } else { (v1, forward) };
        let tip_pos = mesh.position(tip);

        let mut best: Option<(EdgeId, f32)> = None;
        for &candidate in mesh.link_edges(tip) {
            if candidate == current {
                continue;
            }
            let Some(other) = mesh.other_vert(candidate, tip) else {
                continue;
            };
            let candidate_dir = (mesh.position(other) - tip_pos).normalize_or_zero();
            if candidate_dir.dot(dir) <= BEND_THRESHOLD {
                continue;
            }
            let d = edge_distance(mesh, candidate, point, true);
            if best.is_none_or(|(_, bd)| d < bd) {
                best = Some((candidate, d));
            }
        }

        let Some((next, _)) = best else {
            debug!("Edge walk stopped at {:?}: no edge continues towards {}", current, point);
            return current;
        };
        if !visited.insert(next) {
            debug!("Edge walk stopped at {:?}: {:?} already visited", current, next);
            return current;
        }
        current = next;
    }
}

/// Point on the cursor ray at the view depth of `depth_ref`.
///
/// `view_forward` is the camera's forward axis; the result lies on the plane
/// through `depth_ref` facing the camera. `None` if the ray runs parallel to
/// that plane.
pub fn ray_at_depth(ray: Ray3d, view_forward: Vec3, depth_ref: Vec3) -> Option<Vec3> {
    let denom = ray.direction.dot(view_forward);
    if denom.abs() < 1e-6 {
        return None;
    }
    let t = (depth_ref - ray.origin).dot(view_forward) / denom;
    Some(ray.get_point(t))
}

/// Map a viewport position into the world at the view depth of `depth_ref`.
pub fn viewport_to_depth(
    camera: &Camera,
    camera_transform: &GlobalTransform,
    viewport_position: Vec2,
    depth_ref: Vec3,
) -> Option<Vec3> {
    let ray = camera
        .viewport_to_world(camera_transform, viewport_position)
        .ok()?;
    ray_at_depth(ray, *camera_transform.forward(), depth_ref)
}

/// Project a world position into viewport coordinates.
pub fn world_to_viewport(
    camera: &Camera,
    camera_transform: &GlobalTransform,
    position: Vec3,
) -> Option<Vec2> {
    camera.world_to_viewport(camera_transform, position).ok()
}

/// Hover query from a viewport position, resolving depth at `depth_ref`.
pub fn closest_edge_from_screen(
    mesh: &PolyMesh,
    index: &SpatialIndex,
    camera: &Camera,
    camera_transform: &GlobalTransform,
    viewport_position: Vec2,
    depth_ref: Vec3,
) -> Option<EdgeHit> {
    let point = viewport_to_depth(camera, camera_transform, viewport_position, depth_ref)?;
    closest_edge(mesh, index, point)
}
