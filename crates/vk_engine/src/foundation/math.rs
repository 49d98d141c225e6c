//! Math utilities and types
//!
//! Fundamental math types for 3D rendering, built on nalgebra.

pub use nalgebra::{Matrix3, Matrix4, Quaternion, Unit, Vector2, Vector3, Vector4};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// 3x3 matrix type
pub type Mat3 = Matrix3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Quaternion type for rotations
pub type Quat = Unit<Quaternion<f32>>;

/// Transform representing position, rotation, and scale
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// Position in 3D space
    pub position: Vec3,

    /// Rotation quaternion
    pub rotation: Quat,

    /// Scale factors
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    /// Create a new identity transform
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create a transform with only position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create a transform with position and rotation
    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            rotation,
            ..Default::default()
        }
    }

    /// Convert to a transformation matrix (translation * rotation * scale)
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::new_translation(&self.position)
            * self.rotation.to_homogeneous()
            * Mat4::new_nonuniform_scaling(&self.scale)
    }

    /// Inverse of [`to_matrix`](Self::to_matrix), composed directly as
    /// scale⁻¹ * rotation⁻¹ * translation⁻¹.
    pub fn inverse_matrix(&self) -> Mat4 {
        let inv_scale = Vec3::new(1.0 / self.scale.x, 1.0 / self.scale.y, 1.0 / self.scale.z);
        Mat4::new_nonuniform_scaling(&inv_scale)
            * self.rotation.inverse().to_homogeneous()
            * Mat4::new_translation(&-self.position)
    }
}

/// Right-handed perspective projection with a [0, 1] depth range
///
/// Vulkan clip space has Y pointing down, which callers account for by
/// negating the `[1][1]` element (see `Camera::projection_matrix`).
pub fn perspective(aspect: f32, fov_y: f32, near: f32, far: f32) -> Mat4 {
    let f = 1.0 / (fov_y * 0.5).tan();
    let mut m = Mat4::zeros();
    m[(0, 0)] = f / aspect;
    m[(1, 1)] = f;
    m[(2, 2)] = far / (near - far);
    m[(2, 3)] = (near * far) / (near - far);
    m[(3, 2)] = -1.0;
    m
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Identity transform produces the identity matrix
    #[test]
    fn identity_transform_matrix() {
        let m = Transform::identity().to_matrix();
        assert_relative_eq!(m, Mat4::identity(), epsilon = 1e-6);
    }

    /// Position, rotation, and scale compose as T * R * S
    #[test]
    fn transform_composition_order() {
        let t = Transform {
            position: Vec3::new(1.0, 2.0, 3.0),
            rotation: Quat::from_axis_angle(&Vector3::z_axis(), std::f32::consts::FRAC_PI_2),
            scale: Vec3::new(2.0, 2.0, 2.0),
        };
        // The local +X axis scales to length 2, rotates onto +Y, then translates.
        let p = t.to_matrix().transform_point(&Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(p, Point3::new(1.0, 4.0, 3.0), epsilon = 1e-5);
    }

    /// A transform composed with its inverse is the identity, including
    /// under nonuniform scale
    #[test]
    fn transform_inverse_round_trip() {
        let t = Transform {
            position: Vec3::new(-4.0, 0.5, 9.0),
            rotation: Quat::from_axis_angle(&Vector3::y_axis(), 1.2),
            scale: Vec3::new(1.0, 3.0, 0.5),
        };
        let m = t.to_matrix() * t.inverse_matrix();
        assert_relative_eq!(m, Mat4::identity(), epsilon = 1e-4);
    }

    /// Points on the near plane map to depth 0, far plane to depth 1
    #[test]
    fn perspective_depth_range() {
        let m = perspective(16.0 / 9.0, std::f32::consts::FRAC_PI_3, 0.1, 100.0);

        let near = m * Vec4::new(0.0, 0.0, -0.1, 1.0);
        assert_relative_eq!(near.z / near.w, 0.0, epsilon = 1e-5);

        let far = m * Vec4::new(0.0, 0.0, -100.0, 1.0);
        assert_relative_eq!(far.z / far.w, 1.0, epsilon = 1e-4);
    }
}
