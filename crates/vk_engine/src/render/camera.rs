//! Camera with view and projection matrices

use crate::foundation::math::{perspective, Mat4, Transform};

/// Perspective camera
///
/// The view matrix is the inverse of the camera's world transform; the
/// projection flips Y for Vulkan clip space.
#[derive(Debug, Clone)]
pub struct Camera {
    /// World transform of the camera
    pub transform: Transform,
    /// Vertical field of view in radians
    pub fov_y: f32,
    /// Near clip plane distance
    pub near: f32,
    /// Far clip plane distance
    pub far: f32,
}

impl Camera {
    /// Create a camera at the origin looking down -Z
    pub fn new(fov_y: f32, near: f32, far: f32) -> Self {
        Self {
            transform: Transform::identity(),
            fov_y,
            near,
            far,
        }
    }

    /// World-to-view matrix
    pub fn view_matrix(&self) -> Mat4 {
        self.transform.inverse_matrix()
    }

    /// View-to-clip matrix for the given aspect ratio
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        let mut proj = perspective(aspect, self.fov_y, self.near, self.far);
        proj[(1, 1)] *= -1.0;
        proj
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(std::f32::consts::FRAC_PI_4, 0.1, 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{Point3, Vec3};
    use approx::assert_relative_eq;

    /// Moving the camera moves the world the opposite way
    #[test]
    fn view_matrix_inverts_camera_transform() {
        let mut camera = Camera::default();
        camera.transform.position = Vec3::new(0.0, 0.0, 5.0);

        let p = camera
            .view_matrix()
            .transform_point(&Point3::new(0.0, 0.0, 0.0));
        assert_relative_eq!(p, Point3::new(0.0, 0.0, -5.0), epsilon = 1e-5);
    }

    /// The projection flips Y for Vulkan clip space
    #[test]
    fn projection_flips_y() {
        let camera = Camera::default();
        let proj = camera.projection_matrix(1.0);
        assert!(proj[(1, 1)] < 0.0);
    }
}
