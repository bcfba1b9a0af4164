use std::path::{Path, PathBuf};

use super::{AssetError, AssetSource, MeshData, ShaderBinary};

/// Paths of everything one session needs, relative to the asset source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetPaths {
    pub mesh: PathBuf,
    pub vertex_shader: PathBuf,
    pub fragment_shader: PathBuf,
}

impl AssetPaths {
    pub const MESH_DIR: &'static str = "meshes";

    /// Maps a mesh name (e.g. `torus`) to `meshes/<name>.obj`, keeping the
    /// shader paths.
    pub fn with_mesh_name(mut self, name: &str) -> Self {
        self.mesh = Path::new(Self::MESH_DIR).join(format!("{name}.obj"));
        self
    }
}

impl Default for AssetPaths {
    fn default() -> Self {
        Self {
            mesh: PathBuf::from("meshes/torus.obj"),
            vertex_shader: PathBuf::from("shaders/basic/basic.vert.wgsl"),
            fragment_shader: PathBuf::from("shaders/basic/basic.frag.wgsl"),
        }
    }
}

/// Decoded assets, ready for GPU upload.
#[derive(Debug, Clone)]
pub struct LoadedAssets {
    pub mesh: MeshData,
    pub vertex_shader: ShaderBinary,
    pub fragment_shader: ShaderBinary,
}

/// Fetches and decodes the mesh, then the two shader binaries.
///
/// The mesh goes first: if it cannot be fetched or parsed, the shaders are
/// never requested. The shader pair is fetched concurrently and joined before
/// decoding. The first failure ends the load.
pub fn load_assets<S>(source: &S, paths: &AssetPaths) -> Result<LoadedAssets, AssetError>
where
    S: AssetSource + ?Sized,
{
    let mesh_text = source
        .fetch_text(&paths.mesh)
        .map_err(|e| AssetError::Fetch {
            path: paths.mesh.clone(),
            source: e,
        })?;
    let mesh = MeshData::from_obj(&mesh_text).map_err(|e| AssetError::Mesh {
        path: paths.mesh.clone(),
        source: e,
    })?;
    log::info!(
        "mesh {}: {} vertices ({} triangles)",
        paths.mesh.display(),
        mesh.vertex_count(),
        mesh.triangle_count()
    );

    let (vert_bytes, frag_bytes) = std::thread::scope(|s| {
        let vert = s.spawn(|| source.fetch(&paths.vertex_shader));
        let frag = source.fetch(&paths.fragment_shader);
        let vert = vert
            .join()
            .unwrap_or_else(|panic| std::panic::resume_unwind(panic));
        (vert, frag)
    });

    let vertex_shader = decode_shader(&paths.vertex_shader, vert_bytes)?;
    let fragment_shader = decode_shader(&paths.fragment_shader, frag_bytes)?;

    Ok(LoadedAssets {
        mesh,
        vertex_shader,
        fragment_shader,
    })
}

fn decode_shader(
    path: &Path,
    fetched: std::io::Result<Vec<u8>>,
) -> Result<ShaderBinary, AssetError> {
    let bytes = fetched.map_err(|e| AssetError::Fetch {
        path: path.to_path_buf(),
        source: e,
    })?;
    ShaderBinary::from_bytes(&bytes).map_err(|e| AssetError::Shader {
        path: path.to_path_buf(),
        source: e,
    })
}
