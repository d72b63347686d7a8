use crate::data_structures::{
    model::{LineVertex, Vertex},
    texture::Texture,
};

use super::basic::mk_render_pipeline;

/// Flat coloured triangles given in normalised device coordinates, drawn over
/// whatever the depth buffer holds.
pub fn mk_overlay_pipeline(
    device: &wgpu::Device,
    color_format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Overlay Pipeline Layout"),
        bind_group_layouts: &[],
        push_constant_ranges: &[],
    });
    let shader = wgpu::ShaderModuleDescriptor {
        label: Some("Overlay Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("overlay.wgsl").into()),
    };
    mk_render_pipeline(
        device,
        "Overlay Pipeline",
        &layout,
        color_format,
        Some(Texture::DEPTH_FORMAT),
        wgpu::CompareFunction::Always,
        &[LineVertex::desc()],
        wgpu::PrimitiveTopology::TriangleList,
        shader,
    )
}
