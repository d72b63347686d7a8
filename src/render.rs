//! Drawing a [`Scene`] through a [`PerspectiveCamera`].
//!
//! The [`Renderer`] trait is the seam between the viewer and the GPU.
//! [`WgpuRenderer`] is the real implementation; the draw list it consumes is
//! built by [`collect_draw_items`], which needs no GPU.
//!
//! # Key types
//!
//! - [`DrawItem`] is one mesh node flattened to world space
//! - [`WgpuRenderer`] owns the context, pipelines and uploaded meshes

use std::iter;

use anyhow::Context as _;
use cgmath::Matrix4;
use instant::Instant;
use wgpu::util::DeviceExt;

use crate::{
    camera::{CameraResources, PerspectiveCamera},
    context::{Context, RenderTarget},
    data_structures::{
        geometry::Geometry,
        material::{Color, Material},
        model::LineVertex,
        scene_graph::visit,
    },
    pipelines::{
        axes::mk_axes_pipeline,
        light::LightResources,
        mesh::{NodeUniform, mk_mesh_pipeline, mk_node_bind_group_layout},
        overlay::mk_overlay_pipeline,
    },
    scene::Scene,
};

pub trait Renderer {
    /// Draw one frame synchronously.
    fn draw(&mut self, scene: &Scene, camera: &PerspectiveCamera) -> Result<(), wgpu::SurfaceError>;

    /// Current target size in pixels.
    fn size(&self) -> [u32; 2];

    fn resize(&mut self, width: u32, height: u32);

    fn set_clear_colour(&mut self, colour: Color);

    /// Replace the screen-space triangles drawn on top of the scene. Positions
    /// are in normalised device coordinates.
    fn set_overlay(&mut self, vertices: &[LineVertex]);
}

/// A mesh node resolved to world space.
#[derive(Clone, Debug)]
pub struct DrawItem<'a> {
    pub name: &'a str,
    pub geometry: &'a Geometry,
    pub material: &'a Material,
    pub model: Matrix4<f32>,
    pub normal: Matrix4<f32>,
}

/// Every mesh in the scene in depth-first order, using the cached world transforms.
pub fn collect_draw_items(scene: &Scene) -> Vec<DrawItem<'_>> {
    let mut items = Vec::new();
    for root in &scene.children {
        visit(root.as_ref(), &mut |node| {
            if let Some((geometry, material)) = node.primitive() {
                let world = node.get_world_transform();
                items.push(DrawItem {
                    name: node.name(),
                    geometry,
                    material,
                    model: world.to_matrix(),
                    normal: world.normal_matrix(),
                });
            }
        });
    }
    items
}

/// Vertex, index and uniform buffers of one uploaded mesh.
#[derive(Debug)]
struct GpuMesh {
    geometry: Geometry,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl GpuMesh {
    fn new(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        item: &DrawItem,
    ) -> Self {
        let data = item.geometry.tessellate();
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Vertex Buffer", item.name)),
            contents: bytemuck::cast_slice(&data.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Index Buffer", item.name)),
            contents: bytemuck::cast_slice(&data.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        let uniform = NodeUniform::new(item.model, item.normal, item.material);
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Node Buffer", item.name)),
            contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
            label: Some("node_bind_group"),
        });
        Self {
            geometry: item.geometry.clone(),
            vertex_buffer,
            index_buffer,
            index_count: data.indices.len() as u32,
            uniform_buffer,
            bind_group,
        }
    }
}

#[derive(Debug)]
struct GpuOverlay {
    vertex_buffer: wgpu::Buffer,
    vertex_count: u32,
}

#[derive(Debug)]
struct GpuAxes {
    size: f32,
    vertex_buffer: wgpu::Buffer,
}

/// Renders scenes with wgpu into a window surface or an offscreen texture.
pub struct WgpuRenderer {
    pub ctx: Context,
    camera: CameraResources,
    light: LightResources,
    node_bind_group_layout: wgpu::BindGroupLayout,
    mesh_pipeline: wgpu::RenderPipeline,
    axes_pipeline: wgpu::RenderPipeline,
    overlay_pipeline: wgpu::RenderPipeline,
    meshes: Vec<GpuMesh>,
    axes: Option<GpuAxes>,
    overlay: Option<GpuOverlay>,
}

impl std::fmt::Debug for WgpuRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WgpuRenderer")
            .field("size", &self.ctx.size())
            .field("meshes", &self.meshes.len())
            .field("overlay", &self.overlay.as_ref().map(|o| o.vertex_count))
            .finish()
    }
}

impl WgpuRenderer {
    pub fn new(ctx: Context) -> Self {
        let camera = CameraResources::new(&ctx.device);
        let light = LightResources::new(&ctx.device);
        let node_bind_group_layout = mk_node_bind_group_layout(&ctx.device);
        let mesh_pipeline = mk_mesh_pipeline(
            &ctx.device,
            ctx.format(),
            &camera.bind_group_layout,
            &light.bind_group_layout,
            &node_bind_group_layout,
        );
        let axes_pipeline = mk_axes_pipeline(&ctx.device, ctx.format(), &camera.bind_group_layout);
        let overlay_pipeline = mk_overlay_pipeline(&ctx.device, ctx.format());
        Self {
            ctx,
            camera,
            light,
            node_bind_group_layout,
            mesh_pipeline,
            axes_pipeline,
            overlay_pipeline,
            meshes: Vec::new(),
            axes: None,
            overlay: None,
        }
    }

    /// Upload meshes that are new or whose shape changed, refresh every node uniform.
    fn prepare(&mut self, items: &[DrawItem]) {
        self.meshes.truncate(items.len());
        for (index, item) in items.iter().enumerate() {
            match self.meshes.get(index) {
                Some(mesh) if mesh.geometry == *item.geometry => {
                    let uniform = NodeUniform::new(item.model, item.normal, item.material);
                    self.ctx
                        .queue
                        .write_buffer(&mesh.uniform_buffer, 0, bytemuck::cast_slice(&[uniform]));
                }
                Some(_) => {
                    self.meshes[index] = GpuMesh::new(&self.ctx.device, &self.node_bind_group_layout, item);
                }
                None => {
                    log::debug!("uploading mesh {}", item.name);
                    self.meshes
                        .push(GpuMesh::new(&self.ctx.device, &self.node_bind_group_layout, item));
                }
            }
        }
    }

    fn prepare_axes(&mut self, scene: &Scene) {
        self.axes = match (scene.axes, self.axes.take()) {
            (None, _) => None,
            (Some(helper), Some(axes)) if axes.size == helper.size => Some(axes),
            (Some(helper), _) => Some(GpuAxes {
                size: helper.size,
                vertex_buffer: self.ctx.device.create_buffer_init(
                    &wgpu::util::BufferInitDescriptor {
                        label: Some("Axes Vertex Buffer"),
                        contents: bytemuck::cast_slice(&helper.vertices()),
                        usage: wgpu::BufferUsages::VERTEX,
                    },
                ),
            }),
        };
    }

    /// Copy the offscreen target back to the CPU. Fails for window surfaces.
    pub async fn capture(&self) -> anyhow::Result<image::RgbaImage> {
        let texture = match &self.ctx.target {
            RenderTarget::Texture(texture) => texture,
            RenderTarget::Surface { .. } => anyhow::bail!("cannot read back a window surface"),
        };
        let [width, height] = texture.size();
        let u32_size = std::mem::size_of::<u32>() as u32;
        let unpadded_bytes_per_row = u32_size * width;
        // Buffer copies need rows aligned to 256 bytes
        let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
        let padded_bytes_per_row = unpadded_bytes_per_row.div_ceil(align) * align;

        let output_buffer = self.ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Read-back Buffer"),
            size: (padded_bytes_per_row * height) as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });
        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Read-back Encoder"),
            });
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                aspect: wgpu::TextureAspect::All,
                texture: &texture.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &output_buffer,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(padded_bytes_per_row),
                    rows_per_image: Some(height),
                },
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );
        self.ctx.queue.submit(iter::once(encoder.finish()));

        let (tx, rx) = futures_intrusive::channel::shared::oneshot_channel();
        let buffer_slice = output_buffer.slice(..);
        buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
            // the receiver only disappears if capture was dropped
            let _ = tx.send(result);
        });
        // The mapping has to be polled before awaiting it. WebGL cannot block.
        #[cfg(target_arch = "wasm32")]
        let poll_type = wgpu::PollType::Poll;
        #[cfg(not(target_arch = "wasm32"))]
        let poll_type = wgpu::PollType::Wait {
            submission_index: None,
            timeout: Some(instant::Duration::from_secs(3)),
        };
        self.ctx
            .device
            .poll(poll_type)
            .context("waiting for the read-back copy")?;
        rx.receive()
            .await
            .context("read-back channel closed")?
            .context("mapping the read-back buffer")?;

        let data = buffer_slice.get_mapped_range();
        let pixels: Vec<u8> = data
            .chunks(padded_bytes_per_row as usize)
            .flat_map(|row| &row[..unpadded_bytes_per_row as usize])
            .copied()
            .collect();
        drop(data);
        output_buffer.unmap();

        image::RgbaImage::from_raw(width, height, pixels).context("read-back size mismatch")
    }
}

impl Renderer for WgpuRenderer {
    fn draw(&mut self, scene: &Scene, camera: &PerspectiveCamera) -> Result<(), wgpu::SurfaceError> {
        let start = Instant::now();
        let frame = self.ctx.acquire_frame()?;

        self.camera.write(&self.ctx.queue, camera);
        self.light.write(&self.ctx.queue, &scene.lights);
        let items = collect_draw_items(scene);
        self.prepare(&items);
        self.prepare_axes(scene);

        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &frame.view,
                    resolve_target: None,
                    depth_slice: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.ctx.clear_colour),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.ctx.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            render_pass.set_bind_group(0, &self.camera.bind_group, &[]);
            if let Some(axes) = &self.axes {
                render_pass.set_pipeline(&self.axes_pipeline);
                render_pass.set_vertex_buffer(0, axes.vertex_buffer.slice(..));
                render_pass.draw(0..6, 0..1);
            }

            render_pass.set_pipeline(&self.mesh_pipeline);
            render_pass.set_bind_group(1, &self.light.bind_group, &[]);
            for mesh in &self.meshes {
                render_pass.set_bind_group(2, &mesh.bind_group, &[]);
                render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                render_pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(0..mesh.index_count, 0, 0..1);
            }

            if let Some(overlay) = &self.overlay {
                render_pass.set_pipeline(&self.overlay_pipeline);
                render_pass.set_vertex_buffer(0, overlay.vertex_buffer.slice(..));
                render_pass.draw(0..overlay.vertex_count, 0..1);
            }
        }

        self.ctx.queue.submit(iter::once(encoder.finish()));
        frame.present();
        log::trace!("drew {} meshes in {:?}", self.meshes.len(), start.elapsed());
        Ok(())
    }

    fn size(&self) -> [u32; 2] {
        self.ctx.size()
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.ctx.resize(width, height);
    }

    fn set_clear_colour(&mut self, colour: Color) {
        self.ctx.clear_colour = colour.into();
    }

    fn set_overlay(&mut self, vertices: &[LineVertex]) {
        self.overlay = (!vertices.is_empty()).then(|| GpuOverlay {
            vertex_buffer: self
                .ctx
                .device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("Overlay Vertex Buffer"),
                    contents: bytemuck::cast_slice(vertices),
                    usage: wgpu::BufferUsages::VERTEX,
                }),
            vertex_count: vertices.len() as u32,
        });
    }
}
