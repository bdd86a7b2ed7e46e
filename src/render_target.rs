//! Off-screen render target the scene and its overlays are drawn into.

use crate::gpu::GpuContext;

/// A surface-sized texture that is rendered to, sampled by the present pass,
/// and copied from when a screen capture is requested.
///
/// # Fields
///
/// * `texture` - The underlying wgpu texture resource
/// * `view` - A view for binding as render attachment or sampler input
pub struct RenderTarget {
    /// The underlying GPU texture that stores pixel data.
    pub texture: wgpu::Texture,
    /// A view into the texture, used for render pass attachments and shader sampling.
    pub view: wgpu::TextureView,
    format: wgpu::TextureFormat,
    width: u32,
    height: u32,
}

impl RenderTarget {
    /// Creates a new render target matching the current GPU surface dimensions.
    ///
    /// The texture is created with:
    /// - Same format as the surface (typically `Bgra8UnormSrgb`)
    /// - `RENDER_ATTACHMENT` usage for writing via render passes
    /// - `TEXTURE_BINDING` usage for the present pass
    /// - `COPY_SRC` usage for screen captures
    pub fn new(gpu: &GpuContext, label: &str) -> Self {
        let format = gpu.config.format;
        let texture = gpu.device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width: gpu.width(),
                height: gpu.height(),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT
                | wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            texture,
            view,
            format,
            width: gpu.width(),
            height: gpu.height(),
        }
    }

    /// Checks if the target dimensions match the GPU surface and recreates if needed.
    ///
    /// Call at the start of each frame to follow window resizes.
    pub fn ensure_size(&mut self, gpu: &GpuContext, label: &str) {
        if self.width != gpu.width() || self.height != gpu.height() {
            *self = Self::new(gpu, label);
        }
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        self.format
    }
}
