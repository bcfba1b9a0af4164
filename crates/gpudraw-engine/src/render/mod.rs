//! GPU rendering: one mesh, one pipeline, one draw call per frame.
//!
//! Resource creation happens once in [`Renderer::new`]; every tick after that
//! rotates the model, stages the transform uniform, and records a single pass.
//!
//! Uniform upload goes through a host-writable staging buffer that is copied
//! into the shader-bound buffer on the GPU timeline. The staging buffer is only
//! written while mapped; see [`StagingState`].

mod depth;
mod mesh;
mod pipeline;
mod renderer;
mod staging;
mod uniforms;
mod vertex;

pub use depth::{DEPTH_FORMAT, DepthTarget};
pub use mesh::GpuMesh;
pub use pipeline::{MeshPipeline, PipelineShaders};
pub use renderer::{RenderSettings, Renderer};
pub use staging::{StagingCell, StagingState};
pub use uniforms::UniformPair;
pub use vertex::MeshVertex;
