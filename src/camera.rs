//! Perspective camera, its live parameters and the GPU uniform it feeds.
//!
//! The camera keeps its projection cached: changing [`PerspectiveCamera::fov`]
//! or the aspect ratio only takes effect after
//! [`PerspectiveCamera::update_projection_matrix`].

use cgmath::{EuclideanSpace, InnerSpace, Matrix, Matrix3, Matrix4, Point3, SquareMatrix, Vector3};
use wgpu::util::DeviceExt;

use crate::pipelines::basic::uniform_layout_entry;

/// cgmath builds OpenGL clip space (z in -1..1); wgpu expects z in 0..1.
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

/// Offset applied to a view axis that is parallel to `up`.
const LOOK_AT_NUDGE: f32 = 0.0001;

/// The four values the panel edits. Read once per render.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraParams {
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Default for CameraParams {
    fn default() -> Self {
        Self {
            fov: 60.0,
            x: 30.0,
            y: 20.0,
            z: 40.0,
        }
    }
}

impl CameraParams {
    pub fn position(&self) -> Point3<f32> {
        Point3::new(self.x, self.y, self.z)
    }
}

#[derive(Clone, Debug)]
pub struct PerspectiveCamera {
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub position: Point3<f32>,
    pub up: Vector3<f32>,
    rotation: Matrix3<f32>,
    projection: Matrix4<f32>,
}

impl PerspectiveCamera {
    pub fn new(fov: f32, aspect: f32, near: f32, far: f32) -> Self {
        let mut camera = Self {
            fov,
            aspect,
            near,
            far,
            position: Point3::origin(),
            up: Vector3::unit_y(),
            rotation: Matrix3::identity(),
            projection: Matrix4::identity(),
        };
        camera.update_projection_matrix();
        camera
    }

    /// Orient the camera so its -Z axis points from `position` at `target`.
    pub fn look_at(&mut self, target: Point3<f32>) {
        let mut z = self.position - target;
        if z.magnitude2() == 0.0 {
            z.z = 1.0;
        }
        z = z.normalize();
        let mut x = self.up.cross(z);
        if x.magnitude2() == 0.0 {
            if self.up.z.abs() == 1.0 {
                z.x += LOOK_AT_NUDGE;
            } else {
                z.z += LOOK_AT_NUDGE;
            }
            z = z.normalize();
            x = self.up.cross(z);
        }
        let x = x.normalize();
        let y = z.cross(x);
        self.rotation = Matrix3::from_cols(x, y, z);
    }

    pub fn update_projection_matrix(&mut self) {
        self.projection = cgmath::perspective(cgmath::Deg(self.fov), self.aspect, self.near, self.far);
    }

    /// The projection as of the last [`update_projection_matrix`](Self::update_projection_matrix).
    pub fn projection_matrix(&self) -> Matrix4<f32> {
        self.projection
    }

    /// Camera orientation; columns are the camera's x, y and z axes in world space.
    pub fn rotation(&self) -> Matrix3<f32> {
        self.rotation
    }

    /// Unit vector the camera looks along.
    pub fn direction(&self) -> Vector3<f32> {
        -self.rotation.z
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::from(self.rotation.transpose()) * Matrix4::from_translation(-self.position.to_vec())
    }

    /// Combined view-projection in wgpu clip space.
    pub fn view_proj(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * self.projection * self.view_matrix()
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_position: [f32; 4],
    pub view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn new() -> Self {
        Self {
            view_position: [0.0; 4],
            view_proj: Matrix4::identity().into(),
        }
    }

    pub fn update_view_proj(&mut self, camera: &PerspectiveCamera) {
        self.view_position = camera.position.to_homogeneous().into();
        self.view_proj = camera.view_proj().into();
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

/// GPU side of the camera: the uniform, its buffer and bind group.
#[derive(Debug)]
pub struct CameraResources {
    pub uniform: CameraUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

impl CameraResources {
    pub fn new(device: &wgpu::Device) -> Self {
        let uniform = CameraUniform::new();
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Buffer"),
            contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[uniform_layout_entry()],
            label: Some("camera_bind_group_layout"),
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
            label: Some("camera_bind_group"),
        });
        Self {
            uniform,
            buffer,
            bind_group,
            bind_group_layout,
        }
    }

    pub fn write(&mut self, queue: &wgpu::Queue, camera: &PerspectiveCamera) {
        self.uniform.update_view_proj(camera);
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[self.uniform]));
    }
}
