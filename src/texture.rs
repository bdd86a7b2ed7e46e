use crate::gpu::GpuContext;
use crate::render_target::RenderTarget;

/// A GPU texture holding a copy of a rendered frame.
#[derive(Debug)]
pub struct Texture {
    // Owns the storage behind `view`
    _texture: wgpu::Texture,
    pub(crate) view: wgpu::TextureView,
    pub(crate) sampler: wgpu::Sampler,
    pub width: u32,
    pub height: u32,
}

impl Texture {
    /// Copy the current contents of `source` into a new sampleable texture.
    ///
    /// The copy is recorded into `encoder` and becomes valid once the encoder
    /// has been submitted.
    pub fn copy_of(
        gpu: &GpuContext,
        encoder: &mut wgpu::CommandEncoder,
        source: &RenderTarget,
        label: &str,
    ) -> Self {
        let (width, height) = source.size();
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        let texture = gpu.device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: source.format(),
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        encoder.copy_texture_to_texture(
            source.texture.as_image_copy(),
            texture.as_image_copy(),
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        // Tiles are drawn at sub-pixel scales while they collapse
        let sampler = gpu.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(&format!("{} Sampler", label)),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        Self {
            _texture: texture,
            view,
            sampler,
            width,
            height,
        }
    }
}
