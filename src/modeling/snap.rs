//! Grid snapping for rectangle gesture points.

use bevy::prelude::*;

/// Bases with a determinant this small cannot be inverted reliably.
const MIN_BASIS_DETERMINANT: f32 = 1e-8;

/// Grid used to snap gesture points before they reach the builder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapSettings {
    /// Grid spacing (0.0 = disabled)
    pub grid: f32,
    /// Frame the grid is aligned to, e.g. the edited object's transform.
    pub basis: Mat4,
}

impl Default for SnapSettings {
    fn default() -> Self {
        Self {
            grid: 0.0,
            basis: Mat4::IDENTITY,
        }
    }
}

impl SnapSettings {
    pub fn new(grid: f32) -> Self {
        Self {
            grid,
            ..default()
        }
    }

    pub fn with_basis(mut self, basis: Mat4) -> Self {
        self.basis = basis;
        self
    }

    pub fn apply(&self, point: Vec3) -> Vec3 {
        snap_to_grid(point, self.grid, self.basis)
    }
}

/// Round each coordinate of `point`, measured in `basis`, to a multiple of `grid`.
///
/// A zero grid returns `point` unchanged. A singular basis snaps along the
/// world axes instead.
pub fn snap_to_grid(point: Vec3, grid: f32, basis: Mat4) -> Vec3 {
    if grid == 0.0 {
        return point;
    }
    let basis = if basis.determinant().abs() < MIN_BASIS_DETERMINANT {
        Mat4::IDENTITY
    } else {
        basis
    };
    let local = basis.inverse().transform_point3(point);
    let snapped = (local / grid).round() * grid;
    basis.transform_point3(snapped)
}
