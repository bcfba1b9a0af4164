use super::MeshError;

/// Floats per interleaved vertex: position (3), normal (3), texcoord (2).
pub const FLOATS_PER_VERTEX: usize = 8;

/// CPU-side mesh: one flat, non-indexed, interleaved vertex stream.
///
/// Every triangle corner is expanded, so `vertex_count == triangle_count * 3`.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshData {
    vertices: Vec<f32>,
    vertex_count: u32,
}

impl MeshData {
    /// Parses Wavefront OBJ text. Polygons are triangulated; all objects in
    /// the file are concatenated. Missing normals/texcoords are zero-filled.
    pub fn from_obj(text: &str) -> Result<Self, MeshError> {
        let options = tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ignore_points: true,
            ignore_lines: true,
            ..Default::default()
        };

        // Materials are not used; a missing .mtl must not fail the mesh.
        let (models, _materials) =
            tobj::load_obj_buf(&mut text.as_bytes(), &options, |_| {
                Err(tobj::LoadError::OpenFileFailed)
            })
            .map_err(MeshError::Parse)?;

        let mut vertices = Vec::new();
        for model in &models {
            append_interleaved(&model.mesh, &mut vertices)?;
        }

        if vertices.is_empty() {
            return Err(MeshError::Empty);
        }

        let vertex_count = (vertices.len() / FLOATS_PER_VERTEX) as u32;
        Ok(Self {
            vertices,
            vertex_count,
        })
    }

    pub fn vertices(&self) -> &[f32] {
        &self.vertices
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    pub fn triangle_count(&self) -> u32 {
        self.vertex_count / 3
    }

    /// Byte length of the vertex stream.
    pub fn byte_len(&self) -> u64 {
        std::mem::size_of_val(self.vertices.as_slice()) as u64
    }
}

fn append_interleaved(mesh: &tobj::Mesh, out: &mut Vec<f32>) -> Result<(), MeshError> {
    let position_count = mesh.positions.len() / 3;
    let has_normals = mesh.normals.len() / 3 == position_count;
    let has_texcoords = mesh.texcoords.len() / 2 == position_count;

    out.reserve(mesh.indices.len() * FLOATS_PER_VERTEX);
    for &index in &mesh.indices {
        let i = index as usize;
        if i >= position_count {
            return Err(MeshError::IndexOutOfRange {
                index,
                len: position_count,
            });
        }

        out.extend_from_slice(&mesh.positions[i * 3..i * 3 + 3]);
        if has_normals {
            out.extend_from_slice(&mesh.normals[i * 3..i * 3 + 3]);
        } else {
            out.extend_from_slice(&[0.0; 3]);
        }
        if has_texcoords {
            out.extend_from_slice(&mesh.texcoords[i * 2..i * 2 + 2]);
        } else {
            out.extend_from_slice(&[0.0; 2]);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRIANGLE: &str = "\
v 0 0 0
v 1 0 0
v 0 1 0
vn 0 0 1
vt 0 0
vt 1 0
vt 0 1
f 1/1/1 2/2/1 3/3/1
";

    const QUAD_NO_ATTRIBUTES: &str = "\
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
f 1 2 3 4
";

    const TWO_OBJECTS: &str = "\
o first
v 0 0 0
v 1 0 0
v 0 1 0
f 1 2 3
o second
v 0 0 1
v 1 0 1
v 1 1 1
v 0 1 1
f 4 5 6
f 4 6 7
";

    fn vertex(mesh: &MeshData, i: usize) -> &[f32] {
        &mesh.vertices()[i * FLOATS_PER_VERTEX..(i + 1) * FLOATS_PER_VERTEX]
    }

    #[test]
    fn single_triangle_is_interleaved() {
        let mesh = MeshData::from_obj(TRIANGLE).unwrap();
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.vertices().len(), 3 * FLOATS_PER_VERTEX);
        assert_eq!(vertex(&mesh, 1), &[1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 0.0]);
        assert_eq!(mesh.byte_len(), 3 * 32);
    }

    #[test]
    fn quad_is_triangulated() {
        let mesh = MeshData::from_obj(QUAD_NO_ATTRIBUTES).unwrap();
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.vertex_count(), mesh.triangle_count() * 3);
    }

    #[test]
    fn missing_attributes_are_zero_filled() {
        let mesh = MeshData::from_obj(QUAD_NO_ATTRIBUTES).unwrap();
        for i in 0..mesh.vertex_count() as usize {
            assert_eq!(&vertex(&mesh, i)[3..], &[0.0; 5]);
        }
    }

    #[test]
    fn objects_are_concatenated() {
        let mesh = MeshData::from_obj(TWO_OBJECTS).unwrap();
        assert_eq!(mesh.triangle_count(), 3);
        assert_eq!(mesh.vertex_count(), 9);
        // first vertex of the second object
        assert_eq!(&vertex(&mesh, 3)[..3], &[0.0, 0.0, 1.0]);
    }

    #[test]
    fn empty_input_is_rejected() {
        assert!(matches!(
            MeshData::from_obj("# nothing here\n"),
            Err(MeshError::Empty)
        ));
    }

    #[test]
    fn vertices_without_faces_are_rejected() {
        assert!(matches!(
            MeshData::from_obj("v 0 0 0\nv 1 0 0\n"),
            Err(MeshError::Empty)
        ));
    }

    #[test]
    fn shipped_meshes_parse() {
        let dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../../assets/meshes");
        for name in ["torus", "cube", "icosphere"] {
            let text = std::fs::read_to_string(dir.join(format!("{name}.obj"))).unwrap();
            let mesh = MeshData::from_obj(&text).unwrap();
            assert!(mesh.vertex_count() > 0, "{name}");
            assert_eq!(mesh.vertex_count(), mesh.triangle_count() * 3, "{name}");
        }
    }
}
