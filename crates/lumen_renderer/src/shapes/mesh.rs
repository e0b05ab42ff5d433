//! Triangle meshes, given inline or loaded from Wavefront OBJ files.

use std::path::Path;

use lumen_core::{LumenError, Result, ShapeEntry};
use lumen_math::{Color, DVec3, Interval, Ray};

use super::{moller_trumbore, Shape};
use crate::{Factory, Hit, Surface};

/// One triangle of a mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshFace {
    /// Indices into the mesh vertex list
    pub indices: [usize; 3],
    /// Unit face normal
    pub normal: DVec3,
    /// Color overriding the mesh surface color, e.g. from an OBJ material
    pub color: Option<Color>,
}

/// A list of triangles sharing one surface.
pub struct Mesh {
    vertices: Vec<DVec3>,
    faces: Vec<MeshFace>,
    surface: Surface,
}

impl Mesh {
    /// Create a mesh from vertices and index triples.
    ///
    /// Out-of-range indices are an error; degenerate triangles are dropped.
    pub fn new(vertices: Vec<DVec3>, faces: &[[usize; 3]], surface: Surface) -> Result<Self> {
        let faces: Vec<_> = faces.iter().map(|&indices| (indices, None)).collect();
        Self::with_face_colors(vertices, &faces, surface)
    }

    /// Create a mesh whose faces may carry their own color.
    pub fn with_face_colors(
        vertices: Vec<DVec3>,
        faces: &[([usize; 3], Option<Color>)],
        surface: Surface,
    ) -> Result<Self> {
        let mut built = Vec::with_capacity(faces.len());
        let mut degenerate = 0usize;

        for (i, &(indices, color)) in faces.iter().enumerate() {
            if let Some(bad) = indices.iter().find(|&&idx| idx >= vertices.len()) {
                return Err(LumenError::config(format!(
                    "face {i} references vertex {bad}, but the mesh has {} vertices",
                    vertices.len()
                )));
            }

            let [a, b, c] = indices.map(|idx| vertices[idx]);
            match (b - a).cross(c - a).try_normalize() {
                Some(normal) => built.push(MeshFace {
                    indices,
                    normal,
                    color,
                }),
                None => degenerate += 1,
            }
        }

        if degenerate > 0 {
            log::warn!("Dropped {} degenerate mesh faces", degenerate);
        }

        Ok(Self {
            vertices,
            faces: built,
            surface,
        })
    }

    /// Load every model of an OBJ file into a single mesh.
    ///
    /// Faces take the diffuse color of their `.mtl` material when one is
    /// available; otherwise they use the surface color.
    pub fn load_obj(path: impl AsRef<Path>, surface: Surface) -> Result<Self> {
        let path = path.as_ref();
        let (models, materials) = tobj::load_obj(
            path,
            &tobj::LoadOptions {
                single_index: true,
                triangulate: true,
                ..Default::default()
            },
        )
        .map_err(|e| {
            LumenError::config(format!("cannot load OBJ file {}: {e}", path.display()))
        })?;

        let materials = materials.unwrap_or_else(|e| {
            log::warn!("No materials for {}: {}", path.display(), e);
            Vec::new()
        });

        if models.is_empty() {
            return Err(LumenError::config(format!(
                "no models found in OBJ file {}",
                path.display()
            )));
        }

        let mut vertices = Vec::new();
        let mut faces = Vec::new();

        for model in &models {
            let mesh = &model.mesh;
            let base = vertices.len();

            vertices.extend(
                mesh.positions
                    .chunks_exact(3)
                    .map(|p| DVec3::new(p[0] as f64, p[1] as f64, p[2] as f64)),
            );

            let color = mesh
                .material_id
                .and_then(|id| materials.get(id))
                .and_then(|m| m.diffuse)
                .map(|[r, g, b]| Color::new(r as f64, g as f64, b as f64).clamp(Color::ZERO, Color::ONE));

            faces.extend(mesh.indices.chunks_exact(3).map(|face| {
                (
                    [
                        base + face[0] as usize,
                        base + face[1] as usize,
                        base + face[2] as usize,
                    ],
                    color,
                )
            }));
        }

        log::info!(
            "Loaded {}: {} models, {} vertices, {} triangles",
            path.display(),
            models.len(),
            vertices.len(),
            faces.len()
        );

        Self::with_face_colors(vertices, &faces, surface)
    }

    /// Build from inline `vertices` and `faces`, or from an `obj` path.
    ///
    /// `color` defaults to white; an optional `translate` shifts every
    /// vertex.
    pub fn from_entry(entry: &ShapeEntry, factory: &Factory) -> Result<Self> {
        let params = &entry.params;
        let surface = Surface::from_entry_or(entry, factory, Color::ONE)?;

        let mut mesh = match params.text_opt("obj")? {
            Some(path) => Self::load_obj(path, surface)?,
            None => Self::new(
                params.points("vertices")?,
                &params.index_triples("faces")?,
                surface,
            )?,
        };

        if let Some(offset) = params.vec3_opt("translate")? {
            mesh.vertices.iter_mut().for_each(|v| *v += offset);
        }
        Ok(mesh)
    }

    pub fn vertices(&self) -> &[DVec3] {
        &self.vertices
    }

    pub fn faces(&self) -> &[MeshFace] {
        &self.faces
    }
}

impl Shape for Mesh {
    fn intersect_within(&self, ray: &Ray, ray_t: Interval) -> Option<Hit<'_>> {
        let mut closest: Option<(f64, &MeshFace)> = None;

        for face in &self.faces {
            let limit = closest.map_or(ray_t.max, |(t, _)| t);
            let [a, b, c] = face.indices.map(|idx| self.vertices[idx]);

            if let Some((t, _, _)) = moller_trumbore(ray, a, b, c) {
                if ray_t.min < t && t < limit {
                    closest = Some((t, face));
                }
            }
        }

        let (t, face) = closest?;
        let hit = Hit::new(ray, t, face.normal, &self.surface);
        Some(match face.color {
            Some(color) => hit.with_color(color),
            None => hit,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    // Unit square at z = -3 split into two triangles
    fn square() -> (Vec<DVec3>, Vec<[usize; 3]>) {
        (
            vec![
                DVec3::new(-1.0, -1.0, -3.0),
                DVec3::new(1.0, -1.0, -3.0),
                DVec3::new(1.0, 1.0, -3.0),
                DVec3::new(-1.0, 1.0, -3.0),
            ],
            vec![[0, 1, 2], [0, 2, 3]],
        )
    }

    #[test]
    fn test_mesh_hits_both_triangles() {
        let (vertices, faces) = square();
        let mesh = Mesh::new(vertices, &faces, Surface::new(Color::ONE)).unwrap();

        for x in [0.5, -0.5] {
            let ray = Ray::new(DVec3::new(x, x * 0.5, 0.0), DVec3::NEG_Z);
            let hit = mesh.intersect(&ray).unwrap();
            assert!((hit.t - 3.0).abs() < 1e-9);
            assert_eq!(hit.normal, DVec3::Z);
        }

        let ray = Ray::new(DVec3::new(2.0, 0.0, 0.0), DVec3::NEG_Z);
        assert!(mesh.intersect(&ray).is_none());
    }

    #[test]
    fn test_mesh_returns_nearest_face() {
        let vertices = vec![
            DVec3::new(-1.0, -1.0, -5.0),
            DVec3::new(1.0, -1.0, -5.0),
            DVec3::new(0.0, 1.0, -5.0),
            DVec3::new(-1.0, -1.0, -2.0),
            DVec3::new(1.0, -1.0, -2.0),
            DVec3::new(0.0, 1.0, -2.0),
        ];
        let mesh = Mesh::new(vertices, &[[0, 1, 2], [3, 4, 5]], Surface::new(Color::ONE)).unwrap();

        let hit = mesh.intersect(&Ray::new(DVec3::ZERO, DVec3::NEG_Z)).unwrap();
        assert!((hit.t - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_face_color_overrides_surface() {
        let (vertices, faces) = square();
        let red = Color::new(1.0, 0.0, 0.0);
        let faces = [(faces[0], Some(red)), (faces[1], None)];
        let mesh = Mesh::with_face_colors(vertices, &faces, Surface::new(Color::ONE)).unwrap();

        let hit = mesh
            .intersect(&Ray::new(DVec3::new(0.5, -0.5, 0.0), DVec3::NEG_Z))
            .unwrap();
        assert_eq!(hit.color, red);

        let hit = mesh
            .intersect(&Ray::new(DVec3::new(-0.5, 0.5, 0.0), DVec3::NEG_Z))
            .unwrap();
        assert_eq!(hit.color, Color::ONE);
    }

    #[test]
    fn test_out_of_range_index() {
        let (vertices, _) = square();
        let result = Mesh::new(vertices, &[[0, 1, 7]], Surface::new(Color::ONE));
        assert!(result.is_err());
    }

    #[test]
    fn test_degenerate_faces_dropped() {
        let (vertices, _) = square();
        let mesh = Mesh::new(vertices, &[[0, 1, 2], [0, 0, 1]], Surface::new(Color::ONE)).unwrap();
        assert_eq!(mesh.faces().len(), 1);
    }

    #[test]
    fn test_load_obj_with_material() {
        let dir = std::env::temp_dir().join(format!("lumen_mesh_test_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join("quad.mtl"),
            "newmtl green\nKd 0.0 1.0 0.0\n",
        )
        .unwrap();
        fs::write(
            dir.join("quad.obj"),
            "mtllib quad.mtl\n\
             v -1 -1 -3\nv 1 -1 -3\nv 1 1 -3\nv -1 1 -3\n\
             usemtl green\n\
             f 1 2 3 4\n",
        )
        .unwrap();

        let mesh = Mesh::load_obj(dir.join("quad.obj"), Surface::new(Color::ONE)).unwrap();
        assert_eq!(mesh.faces().len(), 2);

        let hit = mesh.intersect(&Ray::new(DVec3::ZERO, DVec3::NEG_Z)).unwrap();
        assert!((hit.t - 3.0).abs() < 1e-6);
        assert_eq!(hit.color, Color::new(0.0, 1.0, 0.0));

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_missing_obj_is_config_error() {
        let result = Mesh::load_obj("/nonexistent/model.obj", Surface::new(Color::ONE));
        assert!(matches!(result, Err(LumenError::Config { .. })));
    }
}
