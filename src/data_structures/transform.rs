//! Parent-relative node transforms.
//!
//! Every scene node stores a local [`Transform`] (its offset from the parent's
//! origin) and a cached world transform obtained by composing all ancestors.

use std::ops::Mul;

use cgmath::{InnerSpace, Matrix, One, SquareMatrix};

/// Position, rotation (as quaternion) and scale of a node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position: cgmath::Vector3<f32>,
    pub rotation: cgmath::Quaternion<f32>,
    pub scale: cgmath::Vector3<f32>,
}

impl Transform {
    /// Identity transformation (no move, rotate, or scale).
    pub fn new() -> Self {
        Self {
            position: cgmath::Vector3::new(0.0, 0.0, 0.0),
            // `Quaternion::one()` is the identity quaternion (no rotation)
            rotation: cgmath::Quaternion::one(),
            scale: cgmath::Vector3::new(1.0, 1.0, 1.0),
        }
    }

    pub fn from_xyz(x: f32, y: f32, z: f32) -> Self {
        cgmath::Vector3::new(x, y, z).into()
    }

    pub fn to_matrix(&self) -> cgmath::Matrix4<f32> {
        cgmath::Matrix4::from_translation(self.position)
            * cgmath::Matrix4::from(self.rotation)
            * cgmath::Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }

    /// Matrix used to bring normals into world space.
    ///
    /// For non-uniform scale this is the inverse transpose of the model matrix,
    /// otherwise the rotation alone is enough.
    pub fn normal_matrix(&self) -> cgmath::Matrix4<f32> {
        let uniform = (self.scale.x - self.scale.y).abs() < f32::EPSILON
            && (self.scale.y - self.scale.z).abs() < f32::EPSILON;
        if uniform {
            return cgmath::Matrix4::from(self.rotation.normalize());
        }
        self.to_matrix()
            .invert()
            .map(|inverse| inverse.transpose())
            .unwrap_or_else(|| cgmath::Matrix4::from(self.rotation))
    }

    /// Apply this transform to a point in local space.
    pub fn transform_point(&self, point: cgmath::Vector3<f32>) -> cgmath::Vector3<f32> {
        let scaled = cgmath::Vector3::new(
            self.scale.x * point.x,
            self.scale.y * point.y,
            self.scale.z * point.z,
        );
        self.position + self.rotation * scaled
    }
}

impl<'a, 'b> Mul<&'b Transform> for &'a Transform {
    type Output = Transform;

    fn mul(self, rhs: &'b Transform) -> Self::Output {
        let new_rotation = self.rotation * rhs.rotation;

        let new_scale = cgmath::Vector3::new(
            self.scale.x * rhs.scale.x,
            self.scale.y * rhs.scale.y,
            self.scale.z * rhs.scale.z,
        );

        Transform {
            position: self.transform_point(rhs.position),
            rotation: new_rotation,
            scale: new_scale,
        }
    }
}

impl Mul<Transform> for Transform {
    type Output = Self;

    fn mul(self, rhs: Transform) -> Self::Output {
        &self * &rhs
    }
}

impl From<cgmath::Vector3<f32>> for Transform {
    fn from(position: cgmath::Vector3<f32>) -> Self {
        Transform {
            position,
            ..Default::default()
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use cgmath::{Deg, Rotation3, Vector3};

    use super::*;

    #[test]
    fn composition_applies_parent_first() {
        let parent = Transform {
            rotation: cgmath::Quaternion::from_angle_y(Deg(90.0)),
            ..Transform::from_xyz(0.0, 3.0, 0.0)
        };
        let child = Transform::from_xyz(1.0, 0.0, 0.0);
        let world = &parent * &child;
        let expected = Vector3::new(0.0, 3.0, -1.0);
        assert!((world.position - expected).magnitude() < 1e-5);
    }

    #[test]
    fn composition_matches_matrix_product() {
        let parent = Transform {
            scale: Vector3::new(2.0, 2.0, 2.0),
            ..Transform::from_xyz(1.0, 2.0, 3.0)
        };
        let child = Transform::from_xyz(0.5, -1.0, 0.25);
        let composed = (parent * child).to_matrix();
        let product = parent.to_matrix() * child.to_matrix();
        for col in 0..4 {
            assert!((composed[col] - product[col]).magnitude() < 1e-5);
        }
    }
}
