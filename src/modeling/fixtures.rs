//! Shared test meshes.

use bevy::prelude::*;

use super::poly_mesh::PolyMesh;

/// Unit square in the XY plane, counter-clockwise from the origin.
pub fn make_square() -> PolyMesh {
    PolyMesh::from_polygons(
        &[
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ],
        &[vec![0, 1, 2, 3]],
    )
    .unwrap()
}

/// Two unit quads side by side sharing the edge x = 1.
///
/// ```text
///   3--4--5
///   |  |  |
///   0--1--2
/// ```
pub fn make_two_quads() -> PolyMesh {
    make_strip(2)
}

/// A row of `n` unit quads along +X. Bottom vertices are `0..=n`, top
/// vertices are `n+1..=2n+1`.
pub fn make_strip(n: u32) -> PolyMesh {
    let mut positions = Vec::new();
    for y in 0..2 {
        for x in 0..=n {
            positions.push(Vec3::new(x as f32, y as f32, 0.0));
        }
    }
    let loops: Vec<Vec<u32>> = (0..n).map(|i| vec![i, i + 1, n + 2 + i, n + 1 + i]).collect();
    PolyMesh::from_polygons(&positions, &loops).unwrap()
}

/// Three unit quads forming an L.
///
/// ```text
///      6--7
///      |  |
///   3--4--5
///   |  |  |
///   0--1--2
/// ```
pub fn make_l_shape() -> PolyMesh {
    PolyMesh::from_polygons(
        &[
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(2.0, 1.0, 0.0),
            Vec3::new(1.0, 2.0, 0.0),
            Vec3::new(2.0, 2.0, 0.0),
        ],
        &[vec![0, 1, 4, 3], vec![1, 2, 5, 4], vec![4, 5, 7, 6]],
    )
    .unwrap()
}

/// A wire polyline that bends gently upwards, with two side branches at
/// vertex 1: one square to the chain (4) and one slanting backwards (5).
///
/// ```text
///            4         3
///            |      2
///   0--------1
///           /
///          5
/// ```
pub fn make_bent_chain() -> PolyMesh {
    let mut mesh = PolyMesh::new();
    let points = [
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(2.0, 0.5, 0.0),
        Vec3::new(3.0, 1.5, 0.0),
        Vec3::new(1.0, 1.0, 0.0),
        Vec3::new(0.9, -1.0, 0.0),
    ];
    let verts: Vec<_> = points.iter().map(|&p| mesh.add_vertex(p)).collect();
    for (a, b) in [(0, 1), (1, 2), (2, 3), (1, 4), (1, 5)] {
        mesh.add_edge(verts[a], verts[b]).unwrap();
    }
    mesh
}

/// The unit square plus a second square far away that shares nothing with it.
pub fn make_disconnected() -> PolyMesh {
    PolyMesh::from_polygons(
        &[
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(10.0, 0.0, 0.0),
            Vec3::new(11.0, 0.0, 0.0),
            Vec3::new(11.0, 1.0, 0.0),
            Vec3::new(10.0, 1.0, 0.0),
        ],
        &[vec![0, 1, 2, 3], vec![4, 5, 6, 7]],
    )
    .unwrap()
}
