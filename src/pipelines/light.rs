use wgpu::util::DeviceExt;

use crate::{pipelines::basic::uniform_layout_entry, scene::SpotLight};

pub struct LightResources {
    pub uniform: LightUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

/// Spotlight as seen by `mesh.wgsl`. Scalars fill the fourth lane of each
/// vec3 so the struct packs into four 16 byte rows.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightUniform {
    pub position: [f32; 3],
    pub intensity: f32,
    pub color: [f32; 3],
    pub decay: f32,
    /// Unit vector from the target towards the light.
    pub direction: [f32; 3],
    pub cone_cos: f32,
    pub penumbra_cos: f32,
    /// Cut-off range, zero for none.
    pub distance: f32,
    _padding: [f32; 2],
}

impl LightUniform {
    /// A light that contributes nothing, used when the scene has none.
    pub fn dark() -> Self {
        Self {
            position: [0.0; 3],
            intensity: 0.0,
            color: [0.0; 3],
            decay: 2.0,
            direction: [0.0, 1.0, 0.0],
            cone_cos: 1.0,
            penumbra_cos: 1.0,
            distance: 0.0,
            _padding: [0.0; 2],
        }
    }
}

impl From<&SpotLight> for LightUniform {
    fn from(light: &SpotLight) -> Self {
        Self {
            position: light.position.into(),
            intensity: light.intensity,
            color: light.color.to_array(),
            decay: light.decay,
            direction: light.direction().into(),
            cone_cos: light.cone_cos(),
            penumbra_cos: light.penumbra_cos(),
            distance: light.distance,
            _padding: [0.0; 2],
        }
    }
}

pub fn mk_buffer(device: &wgpu::Device, light_uniform: LightUniform) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Light Buffer"),
        contents: bytemuck::cast_slice(&[light_uniform]),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    })
}

pub fn mk_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[uniform_layout_entry()],
        label: Some("light_bind_group_layout"),
    })
}

pub fn mk_bind_group(
    device: &wgpu::Device,
    bind_group_layout: &wgpu::BindGroupLayout,
    light_buffer: &wgpu::Buffer,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout: bind_group_layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: light_buffer.as_entire_binding(),
        }],
        label: Some("light_bind_group"),
    })
}

impl LightResources {
    pub fn new(device: &wgpu::Device) -> Self {
        let uniform = LightUniform::dark();
        let buffer = mk_buffer(device, uniform);
        let bind_group_layout = mk_bind_group_layout(device);
        let bind_group = mk_bind_group(device, &bind_group_layout, &buffer);
        Self {
            uniform,
            buffer,
            bind_group,
            bind_group_layout,
        }
    }

    /// Upload the first light of the scene; the shader lights with one spot.
    pub fn write(&mut self, queue: &wgpu::Queue, lights: &[SpotLight]) {
        if lights.len() > 1 {
            log::warn!("only the first of {} lights is drawn", lights.len());
        }
        self.uniform = lights.first().map(LightUniform::from).unwrap_or_else(LightUniform::dark);
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[self.uniform]));
    }
}
