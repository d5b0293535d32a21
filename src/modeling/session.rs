//! One editing session of the rectangle tool over a mesh.
//!
//! Owns the mesh together with its face index and keeps the two in step:
//! every successful rectangle rebuilds the index before the next hover query.

use bevy::prelude::*;

use super::locate::{self, EdgeHit};
use super::poly_mesh::{EdgeId, Element, PolyMesh};
use super::preview::RectPreview;
use super::rectangle::{self, RectError, RectRequest, RectResult};
use super::settings::RectToolSettings;
use super::spatial::SpatialIndex;

#[derive(Debug, Clone)]
pub struct RectToolSession {
    mesh: PolyMesh,
    index: SpatialIndex,
    /// Frame the snapping grid is aligned to.
    basis: Mat4,
}

impl RectToolSession {
    pub fn new(mesh: PolyMesh) -> Self {
        let index = SpatialIndex::build(&mesh);
        Self {
            mesh,
            index,
            basis: Mat4::IDENTITY,
        }
    }

    pub fn from_bevy_mesh(mesh: &Mesh) -> Option<Self> {
        PolyMesh::from_bevy_mesh(mesh).map(Self::new)
    }

    pub fn with_basis(mut self, basis: Mat4) -> Self {
        self.basis = basis;
        self
    }

    pub fn mesh(&self) -> &PolyMesh {
        &self.mesh
    }

    pub fn index(&self) -> &SpatialIndex {
        &self.index
    }

    /// Rebuild the face index after the mesh changed.
    pub fn refresh(&mut self) {
        self.index = SpatialIndex::build(&self.mesh);
    }

    pub fn closest_edge(&self, point: Vec3) -> Option<EdgeHit> {
        locate::closest_edge(&self.mesh, &self.index, point)
    }

    pub fn closest_edge_from_screen(
        &self,
        camera: &Camera,
        camera_transform: &GlobalTransform,
        viewport_position: Vec2,
        depth_ref: Vec3,
    ) -> Option<EdgeHit> {
        locate::closest_edge_from_screen(
            &self.mesh,
            &self.index,
            camera,
            camera_transform,
            viewport_position,
            depth_ref,
        )
    }

    /// Preview quad for a gesture in progress on `edge`.
    pub fn preview(
        &self,
        edge: EdgeId,
        start: Vec3,
        end: Vec3,
        settings: &RectToolSettings,
    ) -> Option<RectPreview> {
        let [a, b] = self.mesh.edge(edge)?.verts;
        let snap = settings.snap().with_basis(self.basis);
        Some(RectPreview::new(
            self.mesh.position(a),
            self.mesh.position(b),
            start,
            end,
            &snap,
        ))
    }

    /// Snap the gesture points and extrude a rectangle from `edge`.
    ///
    /// On success the new far edge(s) become the selection.
    pub fn create_rect(
        &mut self,
        edge: EdgeId,
        start: Vec3,
        end: Vec3,
        settings: &RectToolSettings,
    ) -> Result<RectResult, RectError> {
        let snap = settings.snap().with_basis(self.basis);
        let request = RectRequest {
            start_edge: edge,
            start: snap.apply(start),
            target: snap.apply(end),
            dissolve_verts: settings.dissolve_verts,
        };
        match rectangle::create_rect(&mut self.mesh, request) {
            Ok(result) => {
                let selection: Vec<Element> = result.edges.iter().map(|&e| Element::Edge(e)).collect();
                self.mesh.select_many(&selection);
                self.refresh();
                Ok(result)
            }
            Err(e) => {
                warn!("Rectangle on {:?} aborted: {}", edge, e);
                Err(e)
            }
        }
    }

    pub fn into_mesh(self) -> PolyMesh {
        self.mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modeling::fixtures::make_square;
    use crate::modeling::poly_mesh::VertId;

    fn bottom_edge(session: &RectToolSession) -> EdgeId {
        session.mesh().edge_between(VertId(0), VertId(1)).unwrap()
    }

    #[test]
    fn rectangle_snaps_selects_and_refreshes() {
        let mut session = RectToolSession::new(make_square());
        let edge = bottom_edge(&session);
        let rect = session
            .create_rect(
                edge,
                Vec3::new(0.52, 0.01, 0.0),
                Vec3::new(1.04, -0.98, 0.0),
                &RectToolSettings::default(),
            )
            .unwrap();

        let mesh = session.mesh();
        assert!(mesh.position(rect.verts.0).abs_diff_eq(Vec3::new(0.5, -1.0, 0.0), 1e-5));
        assert!(mesh.position(rect.verts.1).abs_diff_eq(Vec3::new(1.0, -1.0, 0.0), 1e-5));
        assert_eq!(mesh.selected_edges(), rect.edges);
        assert!(mesh.selected_faces().is_empty());

        assert_eq!(session.index().len(), 2);
        let hit = session.closest_edge(Vec3::new(0.75, -1.2, 0.0)).unwrap();
        assert_eq!(hit.edge, rect.edges[0]);
    }

    #[test]
    fn hover_past_corner_starts_free_vertex() {
        let mut session = RectToolSession::new(make_square());
        let settings = RectToolSettings {
            grid: 0.0,
            dissolve_verts: true,
        };
        let hit = session.closest_edge(Vec3::new(-0.5, -0.1, 0.0)).unwrap();
        assert_eq!(hit.edge, bottom_edge(&session));

        let rect = session
            .create_rect(hit.edge, hit.point, Vec3::new(1.0, -1.0, 0.0), &settings)
            .unwrap();
        let mesh = session.mesh();
        assert!(mesh.position(rect.verts.0).abs_diff_eq(Vec3::new(-0.5, -1.0, 0.0), 1e-6));
        assert!(mesh.position(rect.verts.1).abs_diff_eq(Vec3::new(1.0, -1.0, 0.0), 1e-6));
        // The free start vertex hangs off the original corner.
        assert_eq!(mesh.vertex_count(), 7);
    }

    #[test]
    fn session_from_bevy_mesh_indexes_triangles() {
        let session = RectToolSession::from_bevy_mesh(&make_square().to_bevy_mesh()).unwrap();
        assert_eq!(session.mesh().face_count(), 2);
        assert_eq!(session.index().len(), 2);

        let lines = Mesh::new(bevy::mesh::PrimitiveTopology::LineList, default());
        assert!(RectToolSession::from_bevy_mesh(&lines).is_none());
    }

    #[test]
    fn aborted_rectangle_keeps_mesh_and_selection() {
        let mut session = RectToolSession::new(make_square());
        let edge = bottom_edge(&session);
        let before = session.mesh().vertex_count();

        let result = session.create_rect(
            edge,
            Vec3::new(0.5, 0.0, 0.0),
            Vec3::new(0.5, 0.0, 2.0),
            &RectToolSettings::default(),
        );
        assert_eq!(result, Err(RectError::CoincidentEndpoints));
        assert_eq!(session.mesh().vertex_count(), before);
        assert!(session.mesh().selected_edges().is_empty());
    }

    #[test]
    fn preview_uses_session_snap() {
        let session = RectToolSession::new(make_square());
        let preview = session
            .preview(
                bottom_edge(&session),
                Vec3::new(0.33, 0.0, 0.0),
                Vec3::new(0.98, -0.51, 0.0),
                &RectToolSettings::default(),
            )
            .unwrap();
        assert!(preview.origin.abs_diff_eq(Vec3::new(0.3, 0.0, 0.0), 1e-5));
        assert!(preview.extent.abs_diff_eq(Vec2::new(0.7, -0.5), 1e-5));
        assert!(session.preview(EdgeId(40), Vec3::ZERO, Vec3::ONE, &RectToolSettings::default()).is_none());
    }
}
