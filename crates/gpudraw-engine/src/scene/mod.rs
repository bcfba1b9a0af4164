//! Transform state fed to the vertex shader.
//!
//! Matrices are `glam` column-major `Mat4`, matching WGSL `mat4x4<f32>`.

mod camera;
mod transform;

pub use camera::CameraConfig;
pub use transform::{
    INV_MODEL_VIEW_OFFSET, MODEL_OFFSET, PROJECTION_OFFSET, TRANSFORM_BYTES, TRANSFORM_FLOATS,
    TransformSet, TransformUniform, VIEW_OFFSET,
};
