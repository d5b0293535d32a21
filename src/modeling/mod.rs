//! Rectangle tool: extrude quads out of a mesh's edges.
//!
//! Pick an edge, drag from a point on it to a target point, and the tool
//! extrudes the edge chain between them into a strip of quads ending at the
//! target. The geometric core lives in the submodules. The plugin here only
//! exposes it to an app through messages and a session resource; input
//! handling and drawing the preview are left to the host.

pub mod geometry;
pub mod locate;
pub mod path;
pub mod poly_mesh;
pub mod preview;
pub mod rectangle;
pub mod session;
pub mod settings;
pub mod snap;
pub mod spatial;

#[cfg(test)]
pub(crate) mod fixtures;

use bevy::prelude::*;

use poly_mesh::{EdgeId, PolyMesh, VertId};
use session::RectToolSession;
use settings::RectToolSettings;

/// Request to extrude a rectangle from `edge`, dragged from `start` to `end`.
#[derive(Message, Debug, Clone)]
pub struct DrawRectangle {
    pub edge: EdgeId,
    pub start: Vec3,
    pub end: Vec3,
}

/// Written after a rectangle was added to the session mesh.
#[derive(Message, Debug, Clone)]
pub struct RectangleDrawn {
    pub verts: (VertId, VertId),
    pub edges: Vec<EdgeId>,
}

/// The mesh currently being edited, if any.
#[derive(Resource, Default)]
pub struct RectToolState {
    pub session: Option<RectToolSession>,
}

impl RectToolState {
    /// Start editing `mesh`, replacing any previous session.
    pub fn begin(&mut self, mesh: PolyMesh) {
        if self.session.is_some() {
            debug!("Replacing active rectangle tool session");
        }
        self.session = Some(RectToolSession::new(mesh));
    }

    /// End the session and hand back the edited mesh.
    pub fn finish(&mut self) -> Option<PolyMesh> {
        self.session.take().map(RectToolSession::into_mesh)
    }
}

pub struct RectToolPlugin;

impl Plugin for RectToolPlugin {
    fn build(&self, app: &mut App) {
        if !app.world().contains_resource::<RectToolSettings>() {
            app.insert_resource(RectToolSettings::load());
        }
        app.init_resource::<RectToolState>()
            .add_message::<DrawRectangle>()
            .add_message::<RectangleDrawn>()
            .add_systems(Update, apply_draw_rectangle)
            .add_systems(
                Update,
                save_settings.run_if(
                    resource_changed::<RectToolSettings>
                        .and(not(resource_added::<RectToolSettings>)),
                ),
            );
    }
}

/// Persist settings whenever the host edits them.
fn save_settings(settings: Res<RectToolSettings>) {
    settings.save();
}

/// Apply queued gestures one at a time, in the order they were written.
fn apply_draw_rectangle(
    mut requests: MessageReader<DrawRectangle>,
    mut drawn: MessageWriter<RectangleDrawn>,
    mut state: ResMut<RectToolState>,
    settings: Res<RectToolSettings>,
) {
    for request in requests.read() {
        let Some(session) = state.session.as_mut() else {
            warn!("Ignoring rectangle on {:?}: no mesh is being edited", request.edge);
            continue;
        };
        if let Ok(result) = session.create_rect(request.edge, request.start, request.end, &settings) {
            drawn.write(RectangleDrawn {
                verts: result.verts,
                edges: result.edges,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::fixtures::make_square;

    fn test_app() -> App {
        let mut app = App::new();
        app.insert_resource(RectToolSettings::default())
            .add_plugins(RectToolPlugin);
        app
    }

    fn write(app: &mut App, message: DrawRectangle) {
        app.world_mut()
            .resource_mut::<Messages<DrawRectangle>>()
            .write(message);
    }

    fn drain_drawn(app: &mut App) -> Vec<RectangleDrawn> {
        app.world_mut()
            .resource_mut::<Messages<RectangleDrawn>>()
            .drain()
            .collect()
    }

    #[test]
    fn plugin_keeps_inserted_settings() {
        let mut app = App::new();
        let custom = RectToolSettings {
            grid: 0.0,
            dissolve_verts: false,
        };
        app.insert_resource(custom.clone()).add_plugins(RectToolPlugin);
        assert_eq!(*app.world().resource::<RectToolSettings>(), custom);
        assert!(app.world().resource::<RectToolState>().session.is_none());
    }

    #[test]
    fn draw_message_edits_session_mesh() {
        let mut app = test_app();
        let mesh = make_square();
        let edge = mesh.edge_between(VertId(0), VertId(1)).unwrap();
        app.world_mut().resource_mut::<RectToolState>().begin(mesh);

        write(
            &mut app,
            DrawRectangle {
                edge,
                start: Vec3::new(0.5, 0.0, 0.0),
                end: Vec3::new(1.0, -1.0, 0.0),
            },
        );
        // Projects back onto the new split vertex, so it is rejected.
        write(
            &mut app,
            DrawRectangle {
                edge,
                start: Vec3::new(0.5, 0.0, 0.0),
                end: Vec3::new(0.5, 0.0, 3.0),
            },
        );
        app.update();

        let drawn = drain_drawn(&mut app);
        assert_eq!(drawn.len(), 1);
        assert_eq!(drawn[0].edges.len(), 1);

        let mesh = app
            .world_mut()
            .resource_mut::<RectToolState>()
            .finish()
            .unwrap();
        assert_eq!(mesh.face_count(), 2);
        assert!(mesh.position(drawn[0].verts.1).abs_diff_eq(Vec3::new(1.0, -1.0, 0.0), 1e-5));
    }

    #[test]
    fn draw_without_session_is_ignored() {
        let mut app = test_app();
        write(
            &mut app,
            DrawRectangle {
                edge: EdgeId(0),
                start: Vec3::ZERO,
                end: Vec3::ONE,
            },
        );
        app.update();
        assert!(drain_drawn(&mut app).is_empty());
    }
}
