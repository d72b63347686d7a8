use crate::data_structures::{
    model::{LineVertex, Vertex},
    texture::Texture,
};

use super::basic::mk_render_pipeline;

/// Unlit coloured lines, used for the axes indicator.
pub fn mk_axes_pipeline(
    device: &wgpu::Device,
    color_format: wgpu::TextureFormat,
    camera_bind_group_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Axes Pipeline Layout"),
        bind_group_layouts: &[camera_bind_group_layout],
        push_constant_ranges: &[],
    });
    let shader = wgpu::ShaderModuleDescriptor {
        label: Some("Axes Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("axes.wgsl").into()),
    };
    mk_render_pipeline(
        device,
        "Axes Pipeline",
        &layout,
        color_format,
        Some(Texture::DEPTH_FORMAT),
        wgpu::CompareFunction::Less,
        &[LineVertex::desc()],
        wgpu::PrimitiveTopology::LineList,
        shader,
    )
}
