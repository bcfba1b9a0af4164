//! Asset loading.
//!
//! Assets are fetched by path through an [`AssetSource`], then decoded:
//! meshes are parsed by `tobj` into one interleaved, non-indexed vertex stream;
//! shader binaries are classified (SPIR-V or WGSL) and validated by `naga`
//! before any GPU object is created from them.

mod error;
mod loader;
mod mesh;
mod shader;
mod source;

pub use error::{AssetError, MeshError, ShaderError};
pub use loader::{AssetPaths, LoadedAssets, load_assets};
pub use mesh::{FLOATS_PER_VERTEX, MeshData};
pub use shader::{ShaderBinary, ShaderStage};
pub use source::{AssetSource, DirSource};
