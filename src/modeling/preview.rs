//! Placement of the in-progress rectangle preview.
//!
//! The host draws a unit quad spanning `(0, 0)..(1, 1)` in the XY plane with
//! the transform computed here. Local +X runs along the picked edge and the
//! quad's far corner lands on the (snapped) cursor point.

use bevy::prelude::*;

use super::geometry::{line_rotation, line_snap};
use super::snap::SnapSettings;

const UNIT_QUAD: [Vec3; 4] = [
    Vec3::new(0.0, 0.0, 0.0),
    Vec3::new(1.0, 0.0, 0.0),
    Vec3::new(1.0, 1.0, 0.0),
    Vec3::new(0.0, 1.0, 0.0),
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectPreview {
    /// Start point projected onto the picked edge's line.
    pub origin: Vec3,
    pub rotation: Quat,
    /// Size of the rectangle along the edge (x) and across it (y).
    pub extent: Vec2,
}

impl RectPreview {
    /// Preview for a gesture on the edge `edge_a -> edge_b`.
    pub fn new(edge_a: Vec3, edge_b: Vec3, start: Vec3, end: Vec3, snap: &SnapSettings) -> Self {
        let origin = line_snap(snap.apply(start), edge_a, edge_b, false);
        let end = snap.apply(end);
        let rotation = line_rotation(edge_a, edge_b);
        let local = rotation.inverse() * (end - origin);
        Self {
            origin,
            rotation,
            extent: local.truncate(),
        }
    }

    pub fn transform(&self) -> Transform {
        Transform {
            translation: self.origin,
            rotation: self.rotation,
            scale: self.extent.extend(1.0),
        }
    }

    pub fn matrix(&self) -> Mat4 {
        self.transform().to_matrix()
    }

    /// World-space corners, starting at the origin and winding through the
    /// point along the edge, the far corner, then back across.
    pub fn corners(&self) -> [Vec3; 4] {
        let m = self.matrix();
        UNIT_QUAD.map(|c| m.transform_point3(c))
    }

    /// Whether the preview has collapsed to a line or a point.
    pub fn is_degenerate(&self) -> bool {
        self.extent.x.abs() < f32::EPSILON || self.extent.y.abs() < f32::EPSILON
    }
}
