//! Polygon mesh arena used by the rectangle tool.
//!
//! `PolyMesh` is the editing kernel: vertices, edges and faces live in
//! index-addressed slots and refer to each other through typed handles, so
//! the cyclic vertex/edge/face graph never needs shared ownership. Removed
//! elements leave an empty slot behind, which keeps every other handle valid
//! for the rest of the editing session.
//!
//! Faces are arbitrary polygons and edges may exist without any face (wire
//! edges), which is what extruding a loose vertex or an open edge chain
//! produces.

use bevy::mesh::{Indices, PrimitiveTopology, VertexAttributeValues};
use bevy::prelude::*;
use std::collections::HashMap;
use thiserror::Error;

/// Handle to a vertex slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertId(pub u32);

/// Handle to an edge slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(pub u32);

/// Handle to a face slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FaceId(pub u32);

impl VertId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl EdgeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl FaceId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Any selectable mesh element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Element {
    Vert(VertId),
    Edge(EdgeId),
    Face(FaceId),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MeshError {
    #[error("vertex {0:?} does not exist")]
    MissingVertex(VertId),
    #[error("edge {0:?} does not exist")]
    MissingEdge(EdgeId),
    #[error("face {0:?} does not exist")]
    MissingFace(FaceId),
    #[error("vertex {vert:?} is not an endpoint of edge {edge:?}")]
    NotOnEdge { vert: VertId, edge: EdgeId },
    #[error("an edge cannot connect vertex {0:?} to itself")]
    SelfLoop(VertId),
    #[error("a face needs at least 3 distinct vertices, got {0}")]
    DegenerateFace(usize),
}

#[derive(Debug, Clone)]
pub struct Vertex {
    pub position: Vec3,
    /// Edges incident to this vertex.
    pub link: Vec<EdgeId>,
    pub selected: bool,
}

#[derive(Debug, Clone)]
pub struct Edge {
    pub verts: [VertId; 2],
    /// Faces using this edge, in insertion order.
    pub faces: Vec<FaceId>,
    pub selected: bool,
}

#[derive(Debug, Clone)]
pub struct Face {
    /// Boundary loop, counter-clockwise when seen from the front.
    pub verts: Vec<VertId>,
    pub selected: bool,
}

/// Geometry created by [`PolyMesh::extrude_edges`].
#[derive(Debug, Clone, Default)]
pub struct EdgeExtrusion {
    /// `(original, copy)` pairs in the order the chain first reached them.
    pub verts: Vec<(VertId, VertId)>,
    /// Copies of the input edges, parallel to them.
    pub edges: Vec<EdgeId>,
    /// Edges joining each original vertex to its copy.
    pub bridges: Vec<EdgeId>,
    /// One quad per input edge.
    pub faces: Vec<FaceId>,
}

impl EdgeExtrusion {
    /// The copy made of `original`, if it was part of the chain.
    pub fn copy_of(&self, original: VertId) -> Option<VertId> {
        self.verts
            .iter()
            .find(|(o, _)| *o == original)
            .map(|(_, c)| *c)
    }

    pub fn new_verts(&self) -> impl Iterator<Item = VertId> + '_ {
        self.verts.iter().map(|(_, c)| *c)
    }
}

/// Arena-backed polygon mesh.
#[derive(Debug, Clone, Default)]
pub struct PolyMesh {
    vertices: Vec<Option<Vertex>>,
    edges: Vec<Option<Edge>>,
    faces: Vec<Option<Face>>,
}

impl PolyMesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a mesh from vertex positions and polygon index loops.
    pub fn from_polygons(positions: &[Vec3], loops: &[Vec<u32>]) -> Result<Self, MeshError> {
        let mut mesh = Self::new();
        for &p in positions {
            mesh.add_vertex(p);
        }
        for polygon in loops {
            let verts: Vec<VertId> = polygon.iter().map(|&i| VertId(i)).collect();
            mesh.add_face(&verts)?;
        }
        Ok(mesh)
    }

    /// Build a `PolyMesh` from a Bevy `Mesh`.
    ///
    /// Returns `None` if the mesh lacks positions or uses a non-triangle
    /// topology. Triangles that repeat a vertex index are skipped.
    pub fn from_bevy_mesh(mesh: &Mesh) -> Option<Self> {
        if mesh.primitive_topology() != PrimitiveTopology::TriangleList {
            return None;
        }

        let positions: Vec<Vec3> = match mesh.attribute(Mesh::ATTRIBUTE_POSITION)? {
            VertexAttributeValues::Float32x3(v) => v.iter().map(|p| Vec3::from(*p)).collect(),
            _ => return None,
        };

        let triangles: Vec<[u32; 3]> = match mesh.indices() {
            Some(Indices::U32(indices)) => indices
                .chunks_exact(3)
                .map(|c| [c[0], c[1], c[2]])
                .collect(),
            Some(Indices::U16(indices)) => indices
                .chunks_exact(3)
                .map(|c| [c[0] as u32, c[1] as u32, c[2] as u32])
                .collect(),
            None => (0..positions.len() as u32)
                .collect::<Vec<_>>()
                .chunks_exact(3)
                .map(|c| [c[0], c[1], c[2]])
                .collect(),
        };

        let mut result = Self::new();
        for &p in &positions {
            result.add_vertex(p);
        }
        for tri in triangles {
            let verts = tri.map(VertId);
            if let Err(e) = result.add_face(&verts) {
                debug!("Skipping triangle {:?}: {e}", tri);
            }
        }
        Some(result)
    }

    /// Convert to a Bevy `Mesh`, fan-triangulating every face.
    ///
    /// Removed slots are compacted away; normals are accumulated smoothly
    /// from the face normals.
    pub fn to_bevy_mesh(&self) -> Mesh {
        let mut remap: HashMap<VertId, u32> = HashMap::new();
        let mut positions: Vec<[f32; 3]> = Vec::new();
        for v in self.vert_ids() {
            remap.insert(v, positions.len() as u32);
            positions.push(self.position(v).to_array());
        }

        let mut normals = vec![Vec3::ZERO; positions.len()];
        let mut indices: Vec<u32> = Vec::new();
        for f in self.face_ids() {
            let verts = self.face_verts(f);
            let normal = self.face_normal(f);
            for &v in verts {
                normals[remap[&v] as usize] += normal;
            }
            for i in 1..verts.len() - 1 {
                indices.extend([remap[&verts[0]], remap[&verts[i]], remap[&verts[i + 1]]]);
            }
        }
        let normals: Vec<[f32; 3]> = normals
            .into_iter()
            .map(|n| n.normalize_or_zero().to_array())
            .collect();

        let mut mesh = Mesh::new(PrimitiveTopology::TriangleList, default());
        mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
        mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
        mesh.insert_indices(Indices::U32(indices));
        mesh
    }

    // -------------------------------------------------------------------
    // Element access
    // -------------------------------------------------------------------

    pub fn vertex(&self, v: VertId) -> Option<&Vertex> {
        self.vertices.get(v.index()).and_then(Option::as_ref)
    }

    pub fn edge(&self, e: EdgeId) -> Option<&Edge> {
        self.edges.get(e.index()).and_then(Option::as_ref)
    }

    pub fn face(&self, f: FaceId) -> Option<&Face> {
        self.faces.get(f.index()).and_then(Option::as_ref)
    }

    /// Live vertex handles in slot order.
    pub fn vert_ids(&self) -> impl Iterator<Item = VertId> + '_ {
        live_ids(&self.vertices).map(VertId)
    }

    pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId> + '_ {
        live_ids(&self.edges).map(EdgeId)
    }

    pub fn face_ids(&self) -> impl Iterator<Item = FaceId> + '_ {
        live_ids(&self.faces).map(FaceId)
    }

    pub fn vertex_count(&self) -> usize {
        self.vert_ids().count()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_ids().count()
    }

    pub fn face_count(&self) -> usize {
        self.face_ids().count()
    }

    /// Position of a live vertex.
    ///
    /// # Panics
    /// Panics if `v` was removed, like indexing past the end of a slice.
    pub fn position(&self, v: VertId) -> Vec3 {
        self.vert(v).position
    }

    pub fn set_position(&mut self, v: VertId, position: Vec3) {
        self.vert_mut(v).position = position;
    }

    pub fn edge_verts(&self, e: EdgeId) -> [VertId; 2] {
        self.edge_ref(e).verts
    }

    /// The endpoint of `e` that is not `v`, or `None` if `v` is not on `e`.
    pub fn other_vert(&self, e: EdgeId, v: VertId) -> Option<VertId> {
        match self.edge_ref(e).verts {
            [a, b] if a == v => Some(b),
            [a, b] if b == v => Some(a),
            _ => None,
        }
    }

    /// Edges incident to `v`.
    pub fn link_edges(&self, v: VertId) -> &[EdgeId] {
        &self.vert(v).link
    }

    pub fn edge_faces(&self, e: EdgeId) -> &[FaceId] {
        &self.edge_ref(e).faces
    }

    /// The edge joining `a` and `b`, if any.
    pub fn edge_between(&self, a: VertId, b: VertId) -> Option<EdgeId> {
        self.vertex(a)?
            .link
            .iter()
            .copied()
            .find(|&e| self.other_vert(e, a) == Some(b))
    }

    pub fn face_verts(&self, f: FaceId) -> &[VertId] {
        &self.face_ref(f).verts
    }

    /// Boundary edges of a face, in loop order.
    pub fn face_edges(&self, f: FaceId) -> Vec<EdgeId> {
        let verts = self.face_verts(f);
        (0..verts.len())
            .filter_map(|i| self.edge_between(verts[i], verts[(i + 1) % verts.len()]))
            .collect()
    }

    /// Vertex-mean ("median") center of a face.
    pub fn face_center(&self, f: FaceId) -> Vec3 {
        let verts = self.face_verts(f);
        let sum: Vec3 = verts.iter().map(|&v| self.position(v)).sum();
        sum / verts.len() as f32
    }

    /// Newell normal, robust for slightly non-planar polygons.
    pub fn face_normal(&self, f: FaceId) -> Vec3 {
        let verts = self.face_verts(f);
        let mut normal = Vec3::ZERO;
        for i in 0..verts.len() {
            let a = self.position(verts[i]);
            let b = self.position(verts[(i + 1) % verts.len()]);
            normal += Vec3::new(
                (a.y - b.y) * (a.z + b.z),
                (a.z - b.z) * (a.x + b.x),
                (a.x - b.x) * (a.y + b.y),
            );
        }
        normal.normalize_or_zero()
    }

    // -------------------------------------------------------------------
    // Construction
    // -------------------------------------------------------------------

    pub fn add_vertex(&mut self, position: Vec3) -> VertId {
        let id = VertId(self.vertices.len() as u32);
        self.vertices.push(Some(Vertex {
            position,
            link: Vec::new(),
            selected: false,
        }));
        id
    }

    /// Connect two vertices. Returns the existing edge if they already are.
    pub fn add_edge(&mut self, a: VertId, b: VertId) -> Result<EdgeId, MeshError> {
        self.check_vert(a)?;
        self.check_vert(b)?;
        if a == b {
            return Err(MeshError::SelfLoop(a));
        }
        if let Some(existing) = self.edge_between(a, b) {
            return Ok(existing);
        }
        let id = EdgeId(self.edges.len() as u32);
        self.edges.push(Some(Edge {
            verts: [a, b],
            faces: Vec::new(),
            selected: false,
        }));
        self.vert_mut(a).link.push(id);
        self.vert_mut(b).link.push(id);
        Ok(id)
    }

    /// Add a polygon, creating any boundary edge that does not exist yet.
    pub fn add_face(&mut self, verts: &[VertId]) -> Result<FaceId, MeshError> {
        for &v in verts {
            self.check_vert(v)?;
        }
        let mut distinct = verts.to_vec();
        distinct.sort_unstable();
        distinct.dedup();
        if verts.len() < 3 || distinct.len() != verts.len() {
            return Err(MeshError::DegenerateFace(distinct.len()));
        }

        let id = FaceId(self.faces.len() as u32);
        for i in 0..verts.len() {
            let e = self.add_edge(verts[i], verts[(i + 1) % verts.len()])?;
            self.edge_mut(e).faces.push(id);
        }
        self.faces.push(Some(Face {
            verts: verts.to_vec(),
            selected: false,
        }));
        Ok(id)
    }

    // -------------------------------------------------------------------
    // Mutation primitives
    // -------------------------------------------------------------------

    /// Split `e` at `factor` measured from its endpoint `from`.
    ///
    /// `e` keeps the `from` side; the returned edge covers the rest. Every
    /// face using `e` gets the new vertex inserted into its loop.
    pub fn split_edge(
        &mut self,
        e: EdgeId,
        from: VertId,
        factor: f32,
    ) -> Result<(EdgeId, VertId), MeshError> {
        self.check_edge(e)?;
        let other = self
            .other_vert(e, from)
            .ok_or(MeshError::NotOnEdge { vert: from, edge: e })?;

        let start = self.position(from);
        let position = start + (self.position(other) - start) * factor;
        let mid = self.add_vertex(position);

        let faces = self.edge_ref(e).faces.clone();
        let verts = self.edge_ref(e).verts;
        let (kept, split) = if verts[0] == from {
            ([from, mid], [mid, other])
        } else {
            ([mid, from], [other, mid])
        };

        self.edge_mut(e).verts = kept;
        self.vert_mut(other).link.retain(|&l| l != e);
        self.vert_mut(mid).link.push(e);

        let new_edge = EdgeId(self.edges.len() as u32);
        self.edges.push(Some(Edge {
            verts: split,
            faces: faces.clone(),
            selected: false,
        }));
        self.vert_mut(mid).link.push(new_edge);
        self.vert_mut(other).link.push(new_edge);

        for f in faces {
            let face = self.face_mut(f);
            let n = face.verts.len();
            if let Some(i) = (0..n).find(|&i| {
                let (a, b) = (face.verts[i], face.verts[(i + 1) % n]);
                (a == from && b == other) || (a == other && b == from)
            }) {
                face.verts.insert(i + 1, mid);
            }
        }

        Ok((new_edge, mid))
    }

    /// Duplicate `v` into a coincident free vertex joined to it by a wire edge.
    pub fn extrude_vert(&mut self, v: VertId) -> Result<VertId, MeshError> {
        self.check_vert(v)?;
        let copy = self.add_vertex(self.position(v));
        self.add_edge(v, copy)?;
        Ok(copy)
    }

    /// Extrude a chain of edges into a parallel chain bridged by quads.
    ///
    /// New geometry starts coincident with the originals. Each quad is wound
    /// opposite to an existing face on the source edge so the strip's normal
    /// agrees with its neighbour.
    pub fn extrude_edges(&mut self, edges: &[EdgeId]) -> Result<EdgeExtrusion, MeshError> {
        for &e in edges {
            self.check_edge(e)?;
        }

        let mut result = EdgeExtrusion::default();
        for &e in edges {
            let [a, b] = self.edge_verts(e);
            let mut copies = [a, b];
            for (slot, v) in [a, b].into_iter().enumerate() {
                copies[slot] = match result.copy_of(v) {
                    Some(copy) => copy,
                    None => {
                        let copy = self.add_vertex(self.position(v));
                        result.bridges.push(self.add_edge(v, copy)?);
                        result.verts.push((v, copy));
                        copy
                    }
                };
            }
            let [a2, b2] = copies;
            result.edges.push(self.add_edge(a2, b2)?);

            let forward = self
                .edge_faces(e)
                .iter()
                .any(|&f| loop_has_step(self.face_verts(f), a, b));
            let quad = if forward {
                [b, a, a2, b2]
            } else {
                [a, b, b2, a2]
            };
            result.faces.push(self.add_face(&quad)?);
        }
        Ok(result)
    }

    /// Dissolve vertices, merging their geometry into the surroundings.
    ///
    /// Faces fanned around each vertex are joined first. A vertex left with
    /// two edges is then collapsed so its neighbours share a single edge; a
    /// loose or wire-end vertex is removed outright. Vertices with a wider
    /// wire fan are left in place.
    pub fn dissolve_verts(&mut self, verts: &[VertId]) -> Result<(), MeshError> {
        for &v in verts {
            self.check_vert(v)?;
        }
        for &v in verts {
            if self.vertex(v).is_none() {
                continue;
            }
            self.join_faces_around(v);
            match self.link_edges(v).len() {
                0 => self.vertices[v.index()] = None,
                1 => self.remove_spur(v),
                2 => self.collapse_vert(v),
                n => debug!("Leaving vertex {:?} with {} wire edges in place", v, n),
            }
        }
        Ok(())
    }

    // -------------------------------------------------------------------
    // Selection
    // -------------------------------------------------------------------

    pub fn clear_selection(&mut self) {
        for v in self.vertices.iter_mut().flatten() {
            v.selected = false;
        }
        for e in self.edges.iter_mut().flatten() {
            e.selected = false;
        }
        for f in self.faces.iter_mut().flatten() {
            f.selected = false;
        }
    }

    /// Replace the selection with a single element.
    pub fn select_one(&mut self, element: Element) {
        self.select_many(&[element]);
    }

    /// Replace the selection with `elements`, flushing down to sub-elements.
    pub fn select_many(&mut self, elements: &[Element]) {
        self.clear_selection();
        for &element in elements {
            match element {
                Element::Vert(v) => {
                    if let Some(Some(vertex)) = self.vertices.get_mut(v.index()) {
                        vertex.selected = true;
                    }
                }
                Element::Edge(e) => self.mark_edge(e),
                Element::Face(f) => {
                    if self.face(f).is_none() {
                        continue;
                    }
                    self.face_mut(f).selected = true;
                    for e in self.face_edges(f) {
                        self.mark_edge(e);
                    }
                }
            }
        }
    }

    pub fn selected_verts(&self) -> Vec<VertId> {
        self.vert_ids().filter(|&v| self.vert(v).selected).collect()
    }

    pub fn selected_edges(&self) -> Vec<EdgeId> {
        self.edge_ids().filter(|&e| self.edge_ref(e).selected).collect()
    }

    pub fn selected_faces(&self) -> Vec<FaceId> {
        self.face_ids().filter(|&f| self.face_ref(f).selected).collect()
    }

    fn mark_edge(&mut self, e: EdgeId) {
        let Some(edge) = self.edges.get_mut(e.index()).and_then(Option::as_mut) else {
            return;
        };
        edge.selected = true;
        let [a, b] = edge.verts;
        self.vert_mut(a).selected = true;
        self.vert_mut(b).selected = true;
    }

    // -------------------------------------------------------------------
    // Dissolve helpers
    // -------------------------------------------------------------------

    /// Join pairs of distinct faces across edges incident to `v` until none remain.
    fn join_faces_around(&mut self, v: VertId) {
        while let Some((e, keep, drop)) = self.link_edges(v).iter().find_map(|&e| {
            match self.edge_faces(e) {
                [f1, f2] if f1 != f2 => Some((e, *f1, *f2)),
                _ => None,
            }
        }) {
            self.merge_faces(keep, drop, e);
        }
    }

    /// Merge `drop` into `keep` across their shared edge `e`, removing `e`.
    fn merge_faces(&mut self, keep: FaceId, drop: FaceId, e: EdgeId) {
        let [p, q] = self.edge_verts(e);
        let a = self.face_verts(keep).to_vec();
        let mut b = self.face_verts(drop).to_vec();

        // `keep` walks x -> y across the shared edge, `drop` must walk y -> x.
        let (x, y) = if loop_has_step(&a, p, q) { (p, q) } else { (q, p) };
        if loop_has_step(&b, x, y) {
            b.reverse();
        }
        let a = rotate_to(&a, y);
        let b = rotate_to(&b, x);
        let mut merged: Vec<VertId> = a[..a.len() - 1].to_vec();
        merged.extend_from_slice(&b[..b.len() - 1]);

        let dropped_edges = self.face_edges(drop);
        self.remove_edge(e);
        for de in dropped_edges {
            if de == e {
                continue;
            }
            let faces = &mut self.edge_mut(de).faces;
            for f in faces.iter_mut() {
                if *f == drop {
                    *f = keep;
                }
            }
            faces.sort_unstable();
            faces.dedup();
        }
        self.faces[drop.index()] = None;
        self.face_mut(keep).verts = merged;
    }

    /// Replace the two edges of a valence-2 vertex with a single edge.
    fn collapse_vert(&mut self, v: VertId) {
        let [e1, e2] = [self.link_edges(v)[0], self.link_edges(v)[1]];
        let (Some(a), Some(b)) = (self.other_vert(e1, v), self.other_vert(e2, v)) else {
            return;
        };

        let mut faces: Vec<FaceId> = self.edge_faces(e1).to_vec();
        for &f in self.edge_faces(e2) {
            if !faces.contains(&f) {
                faces.push(f);
            }
        }
        let mut degenerate = Vec::new();
        for &f in &faces {
            let face = self.face_mut(f);
            face.verts.retain(|&fv| fv != v);
            if face.verts.len() < 3 {
                degenerate.push(f);
            }
        }
        faces.retain(|f| !degenerate.contains(f));

        match self.edge_between(a, b) {
            Some(existing) => {
                self.remove_edge(e1);
                self.remove_edge(e2);
                let target = &mut self.edge_mut(existing).faces;
                for f in faces {
                    if !target.contains(&f) {
                        target.push(f);
                    }
                }
            }
            None => {
                self.remove_edge(e2);
                let edge = self.edge_mut(e1);
                for end in edge.verts.iter_mut() {
                    if *end == v {
                        *end = b;
                    }
                }
                edge.faces = faces;
                self.vert_mut(v).link.retain(|&l| l != e1);
                self.vert_mut(b).link.push(e1);
            }
        }
        for f in degenerate {
            self.remove_face(f);
        }
        self.vertices[v.index()] = None;
    }

    /// Remove a vertex hanging off a single edge, pinching any `w, v, w`
    /// spike out of the face loops that still reference it.
    fn remove_spur(&mut self, v: VertId) {
        let e = self.link_edges(v)[0];
        let faces = self.edge_faces(e).to_vec();
        let mut degenerate = Vec::new();
        for f in faces {
            let face = self.face_mut(f);
            if let Some(i) = face.verts.iter().position(|&fv| fv == v) {
                face.verts.remove(i);
                let n = face.verts.len();
                if n > 0 {
                    // The spike's two copies of `w` are now adjacent.
                    face.verts.remove(i % n);
                }
            }
            if face.verts.len() < 3 {
                degenerate.push(f);
            }
        }
        self.remove_edge(e);
        for f in degenerate {
            self.remove_face(f);
        }
        self.vertices[v.index()] = None;
    }

    fn remove_edge(&mut self, e: EdgeId) {
        let Some(edge) = self.edges[e.index()].take() else {
            return;
        };
        for v in edge.verts {
            if let Some(Some(vertex)) = self.vertices.get_mut(v.index()) {
                vertex.link.retain(|&l| l != e);
            }
        }
    }

    fn remove_face(&mut self, f: FaceId) {
        let Some(face) = self.faces[f.index()].take() else {
            return;
        };
        for v in face.verts {
            for &e in &self.vert(v).link.clone() {
                self.edge_mut(e).faces.retain(|&ef| ef != f);
            }
        }
    }

    // -------------------------------------------------------------------
    // Slot access
    // -------------------------------------------------------------------

    pub fn check_vert(&self, v: VertId) -> Result<(), MeshError> {
        self.vertex(v).map(|_| ()).ok_or(MeshError::MissingVertex(v))
    }

    pub fn check_edge(&self, e: EdgeId) -> Result<(), MeshError> {
        self.edge(e).map(|_| ()).ok_or(MeshError::MissingEdge(e))
    }

    pub fn check_face(&self, f: FaceId) -> Result<(), MeshError> {
        self.face(f).map(|_| ()).ok_or(MeshError::MissingFace(f))
    }

    fn vert(&self, v: VertId) -> &Vertex {
        match self.vertex(v) {
            Some(vertex) => vertex,
            None => panic!("vertex {v:?} was removed"),
        }
    }

    fn vert_mut(&mut self, v: VertId) -> &mut Vertex {
        match self.vertices.get_mut(v.index()).and_then(Option::as_mut) {
            Some(vertex) => vertex,
            None => panic!("vertex {v:?} was removed"),
        }
    }

    fn edge_ref(&self, e: EdgeId) -> &Edge {
        match self.edge(e) {
            Some(edge) => edge,
            None => panic!("edge {e:?} was removed"),
        }
    }

    fn edge_mut(&mut self, e: EdgeId) -> &mut Edge {
        match self.edges.get_mut(e.index()).and_then(Option::as_mut) {
            Some(edge) => edge,
            None => panic!("edge {e:?} was removed"),
        }
    }

    fn face_ref(&self, f: FaceId) -> &Face {
        match self.face(f) {
            Some(face) => face,
            None => panic!("face {f:?} was removed"),
        }
    }

    fn face_mut(&mut self, f: FaceId) -> &mut Face {
        match self.faces.get_mut(f.index()).and_then(Option::as_mut) {
            Some(face) => face,
            None => panic!("face {f:?} was removed"),
        }
    }
}

fn live_ids<T>(slots: &[Option<T>]) -> impl Iterator<Item = u32> + '_ {
    slots
        .iter()
        .enumerate()
        .filter(|(_, s)| s.is_some())
        .map(|(i, _)| i as u32)
}

/// Whether the cyclic loop steps directly from `a` to `b`.
fn loop_has_step(verts: &[VertId], a: VertId, b: VertId) -> bool {
    let n = verts.len();
    (0..n).any(|i| verts[i] == a && verts[(i + 1) % n] == b)
}

/// Rotate a cyclic loop so it starts at `start`.
fn rotate_to(verts: &[VertId], start: VertId) -> Vec<VertId> {
    let i = verts.iter().position(|&v| v == start).unwrap_or(0);
    verts[i..].iter().chain(&verts[..i]).copied().collect()
}
