//! Line, segment and rotation math used for edge picking.
//!
//! All projections are parametric: a factor `t` places a point at
//! `a + t * (b - a)`. Clamped variants stay on the segment; unclamped ones
//! report overshoot as `t < 0` or `t > 1`.

use bevy::prelude::*;
use std::f32::consts::PI;

use super::poly_mesh::{EdgeId, PolyMesh};

/// Segments shorter than this are treated as a single point.
pub const MIN_EDGE_LENGTH: f32 = 1e-6;

/// Projection factor of `p` onto the line `a -> b`.
///
/// A zero-length segment has no direction, so every point projects onto its
/// start and the factor is `0.0`.
pub fn line_factor(p: Vec3, a: Vec3, b: Vec3, clamp: bool) -> f32 {
    let s = b - a;
    let l2 = s.length_squared();
    if l2 < MIN_EDGE_LENGTH * MIN_EDGE_LENGTH {
        return 0.0;
    }
    let t = (p - a).dot(s) / l2;
    if clamp { t.clamp(0.0, 1.0) } else { t }
}

/// Closest point to `p` on the segment (clamped) or line (unclamped) `a -> b`.
pub fn line_snap(p: Vec3, a: Vec3, b: Vec3, clamp: bool) -> Vec3 {
    a + line_factor(p, a, b, clamp) * (b - a)
}

/// [`line_factor`] along an edge, measured from `verts[0]`.
pub fn edge_factor(mesh: &PolyMesh, edge: EdgeId, p: Vec3, clamp: bool) -> f32 {
    let [a, b] = mesh.edge_verts(edge);
    line_factor(p, mesh.position(a), mesh.position(b), clamp)
}

/// Unnormalized direction from `verts[0]` to `verts[1]`.
pub fn edge_dir(mesh: &PolyMesh, edge: EdgeId) -> Vec3 {
    let [a, b] = mesh.edge_verts(edge);
    mesh.position(b) - mesh.position(a)
}

pub fn edge_snap(mesh: &PolyMesh, edge: EdgeId, p: Vec3, clamp: bool) -> Vec3 {
    let [a, b] = mesh.edge_verts(edge);
    line_snap(p, mesh.position(a), mesh.position(b), clamp)
}

/// Distance from `p` to the edge segment (clamped) or its line (unclamped).
///
/// Edge ranking always passes `clamp = true`.
pub fn edge_distance(mesh: &PolyMesh, edge: EdgeId, p: Vec3, clamp: bool) -> f32 {
    edge_snap(mesh, edge, p, clamp).distance(p)
}

pub fn is_degenerate_edge(mesh: &PolyMesh, edge: EdgeId) -> bool {
    edge_dir(mesh, edge).length_squared() < MIN_EDGE_LENGTH * MIN_EDGE_LENGTH
}

/// Shortest rotation taking unit direction `a` onto unit direction `b`.
///
/// Opposite directions have no unique shortest arc; they turn half a circle
/// about +Y, or about +X when `a` itself lies along Y.
pub fn rotation_between(a: Vec3, b: Vec3) -> Quat {
    let d = a.dot(b);
    if d >= 1.0 - 1e-6 {
        return Quat::IDENTITY;
    }
    if d <= -1.0 + 1e-6 {
        let axis = if a.cross(Vec3::Y).length_squared() < 1e-6 {
            Vec3::X
        } else {
            Vec3::Y
        };
        return Quat::from_axis_angle(axis, PI);
    }
    Quat::from_rotation_arc(a, b)
}

/// Rotation taking +X onto the direction of the line `a -> b`.
pub fn line_rotation(a: Vec3, b: Vec3) -> Quat {
    let dir = (b - a).normalize_or_zero();
    if dir == Vec3::ZERO {
        return Quat::IDENTITY;
    }
    rotation_between(Vec3::X, dir)
}
