use cgmath::Matrix4;

use crate::data_structures::{
    material::Material,
    model::{ModelVertex, Vertex},
    texture::Texture,
};

use super::basic::{mk_render_pipeline, uniform_layout_entry};

/// Per-node data for `mesh.wgsl`: transforms plus the flattened material.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct NodeUniform {
    pub model: [[f32; 4]; 4],
    pub normal: [[f32; 4]; 4],
    pub color: [f32; 4],
    /// Specular colour in rgb, shininess in w.
    pub specular: [f32; 4],
    /// Shading model id in x.
    pub shading: [u32; 4],
}

impl NodeUniform {
    pub fn new(model: Matrix4<f32>, normal: Matrix4<f32>, material: &Material) -> Self {
        let [r, g, b] = material.color.to_array();
        let [sr, sg, sb] = material.specular.to_array();
        Self {
            model: model.into(),
            normal: normal.into(),
            color: [r, g, b, 1.0],
            specular: [sr, sg, sb, material.shininess],
            shading: [material.shading.id(), 0, 0, 0],
        }
    }
}

pub fn mk_node_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[uniform_layout_entry()],
        label: Some("node_bind_group_layout"),
    })
}

pub fn mk_mesh_pipeline(
    device: &wgpu::Device,
    color_format: wgpu::TextureFormat,
    camera_bind_group_layout: &wgpu::BindGroupLayout,
    light_bind_group_layout: &wgpu::BindGroupLayout,
    node_bind_group_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Mesh Pipeline Layout"),
        bind_group_layouts: &[
            camera_bind_group_layout,
            light_bind_group_layout,
            node_bind_group_layout,
        ],
        push_constant_ranges: &[],
    });
    let shader = wgpu::ShaderModuleDescriptor {
        label: Some("Mesh Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("mesh.wgsl").into()),
    };
    mk_render_pipeline(
        device,
        "Mesh Pipeline",
        &layout,
        color_format,
        Some(Texture::DEPTH_FORMAT),
        wgpu::CompareFunction::Less,
        &[ModelVertex::desc()],
        wgpu::PrimitiveTopology::TriangleList,
        shader,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_structures::transform::Transform;

    #[test]
    fn phong_material_is_flattened() {
        let material = Material::phong(0xffffff, 60.0, 0x000000);
        let transform = Transform::from_xyz(1.0, 2.0, 3.0);
        let uniform = NodeUniform::new(transform.to_matrix(), transform.normal_matrix(), &material);
        assert_eq!(uniform.specular[3], 60.0);
        assert_eq!(uniform.shading[0], 2);
        assert_eq!(uniform.model[3], [1.0, 2.0, 3.0, 1.0]);
        assert_eq!(std::mem::size_of::<NodeUniform>(), 176);
    }
}
