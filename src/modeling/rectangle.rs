//! Rectangle extrusion along an edge chain.
//!
//! A gesture picks a point on a start edge and a target point somewhere off
//! the mesh. The builder materializes vertices at both ends of the edge chain
//! between them, extrudes that chain and slides the copy onto the target,
//! producing a strip of quads whose far side is the new rectangle edge.

use bevy::prelude::*;
use thiserror::Error;

use super::geometry::{edge_factor, edge_snap, is_degenerate_edge, line_factor};
use super::locate::closest_connected_edge;
use super::path::edge_path;
use super::poly_mesh::{EdgeId, MeshError, PolyMesh, VertId};

/// Factors this close to 0 or 1 reuse the edge's endpoint instead of splitting.
pub const ENDPOINT_EPSILON: f32 = 1e-5;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RectError {
    #[error(transparent)]
    Mesh(#[from] MeshError),
    #[error("edge {0:?} has zero length")]
    DegenerateEdge(EdgeId),
    #[error("rectangle would have zero area: start and end resolve to the same vertex")]
    CoincidentEndpoints,
    #[error("no edge path from {start:?} to {end:?}")]
    Unreachable { start: VertId, end: VertId },
}

/// Input of one completed gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectRequest {
    pub start_edge: EdgeId,
    pub start: Vec3,
    pub target: Vec3,
    /// Merge the interior copies of the extruded chain into one edge.
    pub dissolve_verts: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RectResult {
    /// New start and end vertices, ordered along the start edge.
    pub verts: (VertId, VertId),
    /// The rectangle's far side: one edge when dissolved, otherwise the
    /// full extruded chain from start to end.
    pub edges: Vec<EdgeId>,
    /// Every extruded vertex that survived, ordered along the start edge.
    pub created: Vec<VertId>,
}

/// Extrude a rectangle from `request.start_edge` out to `request.target`.
///
/// Runs on a working copy of `mesh`; the caller's mesh is only replaced when
/// the whole operation succeeds, so an `Err` never leaves a partial edit.
pub fn create_rect(mesh: &mut PolyMesh, request: RectRequest) -> Result<RectResult, RectError> {
    let mut work = mesh.clone();
    let result = build_rect(&mut work, request)?;
    *mesh = work;
    Ok(result)
}

fn build_rect(mesh: &mut PolyMesh, request: RectRequest) -> Result<RectResult, RectError> {
    let RectRequest {
        start_edge,
        start,
        target,
        dissolve_verts,
    } = request;
    mesh.check_edge(start_edge)?;
    if is_degenerate_edge(mesh, start_edge) {
        return Err(RectError::DegenerateEdge(start_edge));
    }

    // Splitting shortens the start edge, so ordering uses the original line.
    let [sa, sb] = mesh.edge_verts(start_edge);
    let (line_a, line_b) = (mesh.position(sa), mesh.position(sb));

    let start_vert = create_vertex(mesh, start_edge, start)?;
    let end_edge = closest_connected_edge(mesh, start_edge, target);
    if is_degenerate_edge(mesh, end_edge) {
        return Err(RectError::DegenerateEdge(end_edge));
    }
    let end_point = edge_snap(mesh, end_edge, target, false);
    let end_vert = create_vertex(mesh, end_edge, end_point)?;
    if end_vert == start_vert {
        return Err(RectError::CoincidentEndpoints);
    }

    let path = edge_path(mesh, start_vert, end_vert)?;
    if !path.connects(start_vert) {
        return Err(RectError::Unreachable {
            start: start_vert,
            end: end_vert,
        });
    }
    debug!(
        "Routing rectangle from {:?} to {:?} over {} edges",
        start_vert,
        end_vert,
        path.len()
    );

    let chain: Vec<EdgeId> = path.forward().collect();
    let extrusion = mesh.extrude_edges(&chain)?;
    let start_copy = extrusion
        .copy_of(start_vert)
        .ok_or(MeshError::MissingVertex(start_vert))?;
    let end_copy = extrusion
        .copy_of(end_vert)
        .ok_or(MeshError::MissingVertex(end_vert))?;

    let displacement = target - mesh.position(end_copy);
    for copy in extrusion.new_verts() {
        let p = mesh.position(copy);
        mesh.set_position(copy, p + displacement);
    }

    let dissolved = dissolve_verts && extrusion.verts.len() > 2;
    if dissolved {
        let interior: Vec<VertId> = extrusion
            .new_verts()
            .filter(|&v| v != start_copy && v != end_copy)
            .collect();
        mesh.dissolve_verts(&interior)?;
    }

    let edges = match mesh.edge_between(start_copy, end_copy) {
        Some(e) if dissolved => vec![e],
        _ => extrusion
            .edges
            .iter()
            .copied()
            .filter(|&e| mesh.edge(e).is_some())
            .collect(),
    };
    let factor = |v: VertId| line_factor(mesh.position(v), line_a, line_b, false);
    let mut created: Vec<VertId> = extrusion
        .new_verts()
        .filter(|&v| mesh.vertex(v).is_some())
        .collect();
    created.sort_by(|&a, &b| factor(a).total_cmp(&factor(b)));

    let verts = if factor(end_copy) < factor(start_copy) {
        (end_copy, start_copy)
    } else {
        (start_copy, end_copy)
    };

    info!(
        "Created rectangle between {:?} and {:?} ({} new vertices)",
        verts.0,
        verts.1,
        created.len()
    );
    Ok(RectResult {
        verts,
        edges,
        created,
    })
}

/// Vertex at `point` relative to `edge`: an endpoint, a split, or an
/// extruded free vertex when `point` lies beyond the edge.
fn create_vertex(mesh: &mut PolyMesh, edge: EdgeId, point: Vec3) -> Result<VertId, MeshError> {
    let f = edge_factor(mesh, edge, point, false);
    let [a, b] = mesh.edge_verts(edge);
    if f.abs() <= ENDPOINT_EPSILON {
        Ok(a)
    } else if (f - 1.0).abs() <= ENDPOINT_EPSILON {
        Ok(b)
    } else if 0.0 < f && f < 1.0 {
        Ok(mesh.split_edge(edge, a, f)?.1)
    } else {
        let v = mesh.extrude_vert(if f < 0.0 { a } else { b })?;
        mesh.set_position(v, point);
        Ok(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modeling::fixtures::{make_square, make_strip};

    fn counts(mesh: &PolyMesh) -> (usize, usize, usize) {
        (mesh.vertex_count(), mesh.edge_count(), mesh.face_count())
    }

    fn request(mesh: &PolyMesh, a: u32, b: u32, start: Vec3, target: Vec3) -> RectRequest {
        RectRequest {
            start_edge: mesh.edge_between(VertId(a), VertId(b)).unwrap(),
            start,
            target,
            dissolve_verts: true,
        }
    }

    #[test]
    fn square_edge_extends_outward() {
        let mut mesh = make_square();
        let req = request(&mesh, 0, 1, Vec3::new(0.5, 0.0, 0.0), Vec3::new(1.0, -1.0, 0.0));
        let rect = create_rect(&mut mesh, req).unwrap();

        assert_eq!(rect.created.len(), 2);
        assert_eq!(rect.edges.len(), 1);
        let (s, e) = rect.verts;
        assert!(mesh.position(s).abs_diff_eq(Vec3::new(0.5, -1.0, 0.0), 1e-6));
        assert!(mesh.position(e).abs_diff_eq(Vec3::new(1.0, -1.0, 0.0), 1e-6));
        assert_eq!(mesh.edge_between(s, e), Some(rect.edges[0]));
        assert_eq!(counts(&mesh), (7, 8, 2));
    }

    #[test]
    fn target_along_face_normal_is_degenerate() {
        // The target projects back onto the split point.
        let mut mesh = make_square();
        let before = counts(&mesh);
        let req = request(&mesh, 0, 1, Vec3::new(0.5, 0.0, 0.0), Vec3::new(0.5, 0.0, 1.0));
        assert_eq!(create_rect(&mut mesh, req), Err(RectError::CoincidentEndpoints));
        assert_eq!(counts(&mesh), before);
    }

    #[test]
    fn aborts_leave_mesh_untouched() {
        let mut mesh = make_square();
        let before = counts(&mesh);
        let missing = RectRequest {
            start_edge: EdgeId(99),
            start: Vec3::ZERO,
            target: Vec3::ONE,
            dissolve_verts: true,
        };
        assert_eq!(
            create_rect(&mut mesh, missing),
            Err(RectError::Mesh(MeshError::MissingEdge(EdgeId(99))))
        );

        let same = request(&mesh, 1, 2, Vec3::new(1.0, 0.3, 0.0), Vec3::new(2.0, 0.3, 0.0));
        assert_eq!(create_rect(&mut mesh, same), Err(RectError::CoincidentEndpoints));
        assert_eq!(counts(&mesh), before);

        let mut pinched = PolyMesh::new();
        let a = pinched.add_vertex(Vec3::ONE);
        let b = pinched.add_vertex(Vec3::ONE);
        let e = pinched.add_edge(a, b).unwrap();
        let req = RectRequest {
            start_edge: e,
            start: Vec3::ONE,
            target: Vec3::ZERO,
            dissolve_verts: false,
        };
        assert_eq!(create_rect(&mut pinched, req), Err(RectError::DegenerateEdge(e)));
        assert_eq!(counts(&pinched), (2, 1, 0));
    }

    #[test]
    fn dissolve_merges_strip_into_one_edge() {
        let mut mesh = make_strip(3);
        let req = request(&mesh, 0, 1, Vec3::ZERO, Vec3::new(3.0, -1.0, 0.0));
        let rect = create_rect(&mut mesh, req).unwrap();

        assert_eq!(rect.created.len(), 2);
        assert_eq!(rect.edges.len(), 1);
        let (s, e) = rect.verts;
        assert!(mesh.position(s).abs_diff_eq(Vec3::new(0.0, -1.0, 0.0), 1e-6));
        assert!(mesh.position(e).abs_diff_eq(Vec3::new(3.0, -1.0, 0.0), 1e-6));
        assert_eq!(mesh.edge_between(s, e), Some(rect.edges[0]));
        assert_eq!(counts(&mesh), (10, 13, 4));
    }

    #[test]
    fn without_dissolve_chain_is_kept() {
        let mut mesh = make_strip(3);
        let mut req = request(&mesh, 0, 1, Vec3::ZERO, Vec3::new(3.0, -1.0, 0.0));
        req.dissolve_verts = false;
        let rect = create_rect(&mut mesh, req).unwrap();

        assert_eq!(rect.created.len(), 4);
        assert_eq!(rect.edges.len(), 3);
        for (i, &v) in rect.created.iter().enumerate() {
            assert!(mesh.position(v).abs_diff_eq(Vec3::new(i as f32, -1.0, 0.0), 1e-6));
        }
        assert_eq!(counts(&mesh), (12, 17, 6));
    }

    #[test]
    fn near_endpoint_start_reuses_vertex() {
        let mut mesh = make_strip(2);
        let req = request(&mesh, 0, 1, Vec3::new(1e-7, 0.0, 0.0), Vec3::new(2.0, -1.0, 0.0));
        let rect = create_rect(&mut mesh, req).unwrap();
        // No split vertex: 6 originals plus 2 surviving copies.
        assert_eq!(mesh.vertex_count(), 8);
        assert!(mesh.position(rect.verts.0).abs_diff_eq(Vec3::new(0.0, -1.0, 0.0), 1e-6));
    }

    #[test]
    fn start_beyond_edge_extrudes_free_vertex() {
        let mut mesh = make_square();
        let req = request(&mesh, 0, 1, Vec3::new(-0.5, 0.0, 0.0), Vec3::new(1.0, -1.0, 0.0));
        let rect = create_rect(&mut mesh, req).unwrap();

        assert_eq!(rect.created.len(), 2);
        let (s, e) = rect.verts;
        assert!(mesh.position(s).abs_diff_eq(Vec3::new(-0.5, -1.0, 0.0), 1e-6));
        assert!(mesh.position(e).abs_diff_eq(Vec3::new(1.0, -1.0, 0.0), 1e-6));
        assert!(mesh.edge_between(s, e).is_some());
        assert!(mesh.vert_ids().any(|v| mesh.position(v).abs_diff_eq(Vec3::new(-0.5, 0.0, 0.0), 1e-6)));
    }
}
