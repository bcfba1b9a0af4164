use glam::{Mat4, Vec3};

/// Fixed camera: perspective projection looking down -Z from `distance`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CameraConfig {
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Distance of the eye from the origin along +Z.
    pub distance: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_y_degrees: 40.0,
            near: 0.1,
            far: 1000.0,
            distance: 10.0,
        }
    }
}

impl CameraConfig {
    /// Width over height, guarding against a zero-height drawable.
    pub fn aspect(width: u32, height: u32) -> f32 {
        width.max(1) as f32 / height.max(1) as f32
    }

    /// Right-handed perspective with a 0..1 depth range.
    ///
    /// Computed once from the drawable size at initialization; resizing the
    /// window later does not change it.
    pub fn projection(&self, width: u32, height: u32) -> Mat4 {
        Mat4::perspective_rh(
            self.fov_y_degrees.to_radians(),
            Self::aspect(width, height),
            self.near,
            self.far,
        )
    }

    pub fn view(&self) -> Mat4 {
        Mat4::from_translation(Vec3::new(0.0, 0.0, -self.distance))
    }
}
