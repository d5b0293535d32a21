//! # Bevy Rect Tool
//!
//! Interactive rectangle extrusion for polygon meshes in Bevy.
//!
//! ## Quick Start
//!
//! ```no_run
//! use bevy::prelude::*;
//! use bevy_rect_tool::RectToolPlugin;
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(DefaultPlugins)
//!         .add_plugins(RectToolPlugin)
//!         .run();
//! }
//! ```
//!
//! Start a session by handing a mesh to [`RectToolState::begin`], then write a
//! [`DrawRectangle`] message for each completed gesture. Every rectangle that
//! was built is answered with a [`RectangleDrawn`] message.
//!
//! ## Without the plugin
//!
//! The geometric core works on a plain [`PolyMesh`]:
//!
//! ```
//! use bevy::prelude::*;
//! use bevy_rect_tool::{create_rect, PolyMesh, RectRequest, VertId};
//!
//! let mut mesh = PolyMesh::from_polygons(
//!     &[Vec3::ZERO, Vec3::X, Vec3::new(1.0, 1.0, 0.0), Vec3::Y],
//!     &[vec![0, 1, 2, 3]],
//! )
//! .unwrap();
//! let edge = mesh.edge_between(VertId(0), VertId(1)).unwrap();
//! let rect = create_rect(
//!     &mut mesh,
//!     RectRequest {
//!         start_edge: edge,
//!         start: Vec3::ZERO,
//!         target: Vec3::new(1.0, -1.0, 0.0),
//!         dissolve_verts: true,
//!     },
//! )
//! .unwrap();
//! assert_eq!(mesh.face_count(), 2);
//! assert_eq!(rect.edges.len(), 1);
//! ```

pub mod modeling;

pub use modeling::geometry::{edge_factor, line_factor, rotation_between};
pub use modeling::locate::{closest_connected_edge, closest_edge, EdgeHit};
pub use modeling::path::{edge_path, EdgePath};
pub use modeling::poly_mesh::{EdgeId, Element, FaceId, MeshError, PolyMesh, VertId};
pub use modeling::preview::RectPreview;
pub use modeling::rectangle::{create_rect, RectError, RectRequest, RectResult};
pub use modeling::session::RectToolSession;
pub use modeling::settings::{RectToolSettings, SettingsError};
pub use modeling::snap::{snap_to_grid, SnapSettings};
pub use modeling::spatial::SpatialIndex;
pub use modeling::{DrawRectangle, RectToolPlugin, RectToolState, RectangleDrawn};
