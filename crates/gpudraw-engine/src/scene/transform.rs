use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

/// Floats in one packed transform set (four 4x4 matrices).
pub const TRANSFORM_FLOATS: usize = 64;
/// Bytes in one packed transform set.
pub const TRANSFORM_BYTES: u64 = (TRANSFORM_FLOATS * std::mem::size_of::<f32>()) as u64;

// Float offsets of each matrix; the shader's uniform block uses this order.
pub const MODEL_OFFSET: usize = 0;
pub const VIEW_OFFSET: usize = 16;
pub const PROJECTION_OFFSET: usize = 32;
pub const INV_MODEL_VIEW_OFFSET: usize = 48;

/// GPU layout of the transform uniform.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct TransformUniform {
    pub model: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
    pub inv_model_view: [[f32; 4]; 4],
}

const _: () = assert!(std::mem::size_of::<TransformUniform>() as u64 == TRANSFORM_BYTES);

/// Model/view/projection plus the normal matrix derived from them.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TransformSet {
    pub model: Mat4,
    pub view: Mat4,
    pub projection: Mat4,
    /// `inverse(transpose(view * model))`; kept in sync by every mutator.
    pub inv_model_view: Mat4,
}

impl TransformSet {
    pub fn new(view: Mat4, projection: Mat4) -> Self {
        let mut set = Self {
            model: Mat4::IDENTITY,
            view,
            projection,
            inv_model_view: Mat4::IDENTITY,
        };
        set.refresh_normal_matrix();
        set
    }

    /// Applies one rotation step about X, then Y, then Z, in model space.
    pub fn rotate(&mut self, step: Vec3) {
        self.model = self.model
            * Mat4::from_rotation_x(step.x)
            * Mat4::from_rotation_y(step.y)
            * Mat4::from_rotation_z(step.z);
        self.refresh_normal_matrix();
    }

    /// Recomputes the normal matrix so normals stay correct under
    /// non-uniform scale.
    pub fn refresh_normal_matrix(&mut self) {
        self.inv_model_view = (self.view * self.model).transpose().inverse();
    }

    pub fn uniform(&self) -> TransformUniform {
        TransformUniform {
            model: self.model.to_cols_array_2d(),
            view: self.view.to_cols_array_2d(),
            projection: self.projection.to_cols_array_2d(),
            inv_model_view: self.inv_model_view.to_cols_array_2d(),
        }
    }

    /// The uniform as a flat float array, 16 floats per matrix.
    pub fn packed(&self) -> [f32; TRANSFORM_FLOATS] {
        bytemuck::cast(self.uniform())
    }
}
