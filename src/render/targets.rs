use super::helpers;
use wgpu;

pub(crate) const HDR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba16Float;

/// Offscreen color targets for the render pipeline.
///
/// `hdr_view` holds the full-resolution scene color; `bloom_*` are half-res
/// ping-pong buffers for bright-pass and blur. `msaa_view` exists only when
/// the current performance level asks for multisampling and resolves into
/// `hdr_view`.
pub(crate) struct RenderTargets {
    pub(crate) hdr_view: wgpu::TextureView,
    pub(crate) bloom_a_view: wgpu::TextureView,
    pub(crate) bloom_b_view: wgpu::TextureView,
    pub(crate) msaa_view: Option<wgpu::TextureView>,
}

impl RenderTargets {
    pub(crate) fn new(
        device: &wgpu::Device,
        width: u32,
        height: u32,
        msaa_samples: u32,
    ) -> Self {
        let hdr_view = helpers::create_color_texture(
            device,
            "hdr_tex",
            width,
            height,
            HDR_FORMAT,
            1,
            wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
        );
        let bw = (width.max(1) / 2).max(1);
        let bh = (height.max(1) / 2).max(1);
        let bloom_a_view = helpers::create_color_texture(
            device,
            "bloom_a",
            bw,
            bh,
            HDR_FORMAT,
            1,
            wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
        );
        let bloom_b_view = helpers::create_color_texture(
            device,
            "bloom_b",
            bw,
            bh,
            HDR_FORMAT,
            1,
            wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
        );
        let msaa_view = (msaa_samples > 1).then(|| {
            helpers::create_color_texture(
                device,
                "msaa_tex",
                width,
                height,
                HDR_FORMAT,
                msaa_samples,
                wgpu::TextureUsages::RENDER_ATTACHMENT,
            )
        });
        Self {
            hdr_view,
            bloom_a_view,
            bloom_b_view,
            msaa_view,
        }
    }

    pub(crate) fn recreate(
        &mut self,
        device: &wgpu::Device,
        width: u32,
        height: u32,
        msaa_samples: u32,
    ) {
        *self = Self::new(device, width, height, msaa_samples);
    }
}
