use crate::constants::{
    BLOOM_STRENGTH, CAMERA_FOV_Y, CAMERA_Z, CAMERA_ZFAR, CAMERA_ZNEAR, CLEAR_COLOR, GLOW_COLOR,
    NODE_BASE_SIZE, NODE_COLOR, VIGNETTE_STRENGTH,
};
use crate::core::perf::PerformanceLevel;
use crate::core::pulse::{PulseUniforms, MAX_PULSES};
use glam::{Mat4, Vec3};
use wgpu::util::DeviceExt;
use web_sys as web;

mod helpers;
mod post;
mod targets;
use targets::{RenderTargets, HDR_FORMAT};

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct PostUniforms {
    resolution: [f32; 2],
    time: f32,
    bloom_strength: f32,
    blur_dir: [f32; 2],
    threshold: f32,
    vignette: f32,
}

/// Matches `SceneUniforms` in shaders/scene.wgsl.
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct SceneUniforms {
    view: [[f32; 4]; 4],
    proj: [[f32; 4]; 4],
    model: [[f32; 4]; 4],
    color: [f32; 4],
    glow_color: [f32; 4],
    // xyz = origin (field-local), w = age in seconds
    pulses: [[f32; 4]; MAX_PULSES],
    time: f32,
    node_size: f32,
    _pad: [f32; 2],
}

// Unit quad, expanded per-instance in view space by the vertex shader.
const QUAD_VERTS: [[f32; 2]; 6] = [
    [-0.5, -0.5],
    [0.5, -0.5],
    [0.5, 0.5],
    [-0.5, -0.5],
    [0.5, 0.5],
    [-0.5, 0.5],
];

const QUAD_ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];
const INSTANCE_ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![1 => Float32x3];
const LINE_ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];

const VEC3_STRIDE: u64 = std::mem::size_of::<Vec3>() as u64;

fn node_buffer_layouts() -> [wgpu::VertexBufferLayout<'static>; 2] {
    [
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<[f32; 2]>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &QUAD_ATTRS,
        },
        wgpu::VertexBufferLayout {
            array_stride: VEC3_STRIDE,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &INSTANCE_ATTRS,
        },
    ]
}

fn line_buffer_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: VEC3_STRIDE,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &LINE_ATTRS,
    }
}

fn build_field_pipelines(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    color_format: wgpu::TextureFormat,
    sample_count: u32,
) -> (wgpu::RenderPipeline, wgpu::RenderPipeline) {
    let node = helpers::make_scene_pipeline(
        device,
        layout,
        shader,
        "node_pipeline",
        "vs_node",
        "fs_node",
        &node_buffer_layouts(),
        wgpu::PrimitiveTopology::TriangleList,
        color_format,
        sample_count,
    );
    let line = helpers::make_scene_pipeline(
        device,
        layout,
        shader,
        "line_pipeline",
        "vs_line",
        "fs_line",
        &[line_buffer_layout()],
        wgpu::PrimitiveTopology::LineList,
        color_format,
        sample_count,
    );
    (node, line)
}

pub struct GpuState<'a> {
    surface: wgpu::Surface<'a>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,

    // Field scene
    scene_shader: wgpu::ShaderModule,
    scene_layout: wgpu::PipelineLayout,
    scene_uniform_buffer: wgpu::Buffer,
    scene_bind_group: wgpu::BindGroup,
    quad_vb: wgpu::Buffer,
    instance_vb: wgpu::Buffer,
    line_vb: wgpu::Buffer,
    max_nodes: u32,
    max_line_vertices: u32,
    line_vertex_count: u32,
    // HDR-path pipelines carry the current MSAA sample count; the direct
    // pipelines target the swapchain at 1x for when post is skipped.
    node_pipeline: wgpu::RenderPipeline,
    line_pipeline: wgpu::RenderPipeline,
    node_pipeline_direct: wgpu::RenderPipeline,
    line_pipeline_direct: wgpu::RenderPipeline,

    // Post-processing resources
    targets: RenderTargets,
    linear_sampler: wgpu::Sampler,
    post: post::PostResources,
    bg_hdr: wgpu::BindGroup,
    bg_from_bloom_a: wgpu::BindGroup,
    bg_from_bloom_b: wgpu::BindGroup,
    bg_bloom_a_only: wgpu::BindGroup, // group1 for composite, sampling bloom A

    width: u32,
    height: u32,
    clear_color: wgpu::Color,
    perf: PerformanceLevel,
    time_accum: f32,
}

impl<'a> GpuState<'a> {
    /// Buffers are sized for `max_nodes`/`max_line_vertices`; degradation
    /// only ever shrinks counts, so they are never reallocated.
    pub async fn new(
        canvas: &'a web::HtmlCanvasElement,
        perf: PerformanceLevel,
        max_nodes: u32,
        max_line_vertices: u32,
    ) -> anyhow::Result<Self> {
        let width = canvas.width();
        let height = canvas.height();

        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No WebGPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    // Use default limits on web to avoid passing unknown fields to older WebGPU impls
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| anyhow::anyhow!(format!("request_device error: {:?}", e)))?;
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| {
                matches!(
                    f,
                    wgpu::TextureFormat::Bgra8UnormSrgb | wgpu::TextureFormat::Rgba8UnormSrgb
                )
            })
            .unwrap_or(caps.formats[0]);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let targets = RenderTargets::new(&device, width, height, perf.msaa_samples);

        // Field scene shader, uniforms, and geometry buffers
        let scene_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("scene_shader"),
            source: wgpu::ShaderSource::Wgsl(crate::core::SCENE_WGSL.into()),
        });
        let scene_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("scene_bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });
        let scene_uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("scene_uniforms"),
            size: std::mem::size_of::<SceneUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let scene_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("scene_bg"),
            layout: &scene_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: scene_uniform_buffer.as_entire_binding(),
            }],
        });
        let scene_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pl_scene"),
            bind_group_layouts: &[&scene_bgl],
            push_constant_ranges: &[],
        });
        let quad_vb = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quad_vb"),
            contents: bytemuck::cast_slice(&QUAD_VERTS),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let instance_vb = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("instance_vb"),
            size: u64::from(max_nodes) * VEC3_STRIDE,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let line_vb = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("line_vb"),
            size: u64::from(max_line_vertices) * VEC3_STRIDE,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let (node_pipeline, line_pipeline) = build_field_pipelines(
            &device,
            &scene_layout,
            &scene_shader,
            HDR_FORMAT,
            perf.msaa_samples,
        );
        let (node_pipeline_direct, line_pipeline_direct) =
            build_field_pipelines(&device, &scene_layout, &scene_shader, format, 1);

        // Post shader + pipelines
        let post_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("post_shader"),
            source: wgpu::ShaderSource::Wgsl(crate::core::POST_WGSL.into()),
        });
        let linear_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("linear_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });
        let post = post::create_post_resources(&device, &post_shader, HDR_FORMAT, format);
        let (bg_hdr, bg_from_bloom_a, bg_from_bloom_b, bg_bloom_a_only) =
            post::rebuild_bind_groups(
                &device,
                &post,
                &linear_sampler,
                &targets.hdr_view,
                &targets.bloom_a_view,
                &targets.bloom_b_view,
            );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            scene_shader,
            scene_layout,
            scene_uniform_buffer,
            scene_bind_group,
            quad_vb,
            instance_vb,
            line_vb,
            max_nodes,
            max_line_vertices,
            line_vertex_count: 0,
            node_pipeline,
            line_pipeline,
            node_pipeline_direct,
            line_pipeline_direct,
            targets,
            linear_sampler,
            post,
            bg_hdr,
            bg_from_bloom_a,
            bg_from_bloom_b,
            bg_bloom_a_only,
            width,
            height,
            clear_color: wgpu::Color {
                r: CLEAR_COLOR[0],
                g: CLEAR_COLOR[1],
                b: CLEAR_COLOR[2],
                a: 1.0,
            },
            perf,
            time_accum: 0.0,
        })
    }

    pub fn resize_if_needed(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if width != self.width || height != self.height {
            self.width = width;
            self.height = height;
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);

            // Recreate offscreen render targets and dependent bind groups
            self.targets
                .recreate(&self.device, width, height, self.perf.msaa_samples);
            self.rebuild_post_bind_groups();
        }
    }

    /// Adopt a new quality level. Only a sample-count change forces pipeline
    /// and target rebuilds; bloom/vignette toggles are uniform-only.
    pub fn apply_performance(&mut self, perf: PerformanceLevel) {
        let msaa_changed = perf.msaa_samples != self.perf.msaa_samples;
        self.perf = perf;
        if msaa_changed {
            let (node, line) = build_field_pipelines(
                &self.device,
                &self.scene_layout,
                &self.scene_shader,
                HDR_FORMAT,
                perf.msaa_samples,
            );
            self.node_pipeline = node;
            self.line_pipeline = line;
            self.targets
                .recreate(&self.device, self.width, self.height, perf.msaa_samples);
            self.rebuild_post_bind_groups();
        }
    }

    /// Connection endpoints are static between field rebuilds, so the line
    /// buffer is uploaded once per topology change rather than per frame.
    pub fn upload_lines(&mut self, vertices: &[Vec3]) {
        let n = (vertices.len() as u32).min(self.max_line_vertices);
        self.queue.write_buffer(
            &self.line_vb,
            0,
            bytemuck::cast_slice(&vertices[..n as usize]),
        );
        self.line_vertex_count = n;
    }

    pub fn render(
        &mut self,
        dt_sec: f32,
        positions: &[Vec3],
        rotation_y: f32,
        pulses: &PulseUniforms,
    ) -> Result<(), wgpu::SurfaceError> {
        self.time_accum += dt_sec.max(0.0);
        let node_count = (positions.len() as u32).min(self.max_nodes);

        // Per-frame uploads: node positions and scene uniforms
        self.queue.write_buffer(
            &self.instance_vb,
            0,
            bytemuck::cast_slice(&positions[..node_count as usize]),
        );
        let aspect = self.width as f32 / self.height.max(1) as f32;
        let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, CAMERA_Z), Vec3::ZERO, Vec3::Y);
        let proj = Mat4::perspective_rh(CAMERA_FOV_Y, aspect, CAMERA_ZNEAR, CAMERA_ZFAR);
        let mut packed = [[0.0f32; 4]; MAX_PULSES];
        for i in 0..MAX_PULSES {
            let o = pulses.origins[i];
            packed[i] = [o.x, o.y, o.z, pulses.ages[i]];
        }
        let u = SceneUniforms {
            view: view.to_cols_array_2d(),
            proj: proj.to_cols_array_2d(),
            model: Mat4::from_rotation_y(rotation_y).to_cols_array_2d(),
            color: [NODE_COLOR[0], NODE_COLOR[1], NODE_COLOR[2], 1.0],
            glow_color: [GLOW_COLOR[0], GLOW_COLOR[1], GLOW_COLOR[2], 1.0],
            pulses: packed,
            time: self.time_accum,
            node_size: NODE_BASE_SIZE,
            _pad: [0.0; 2],
        };
        self.queue
            .write_buffer(&self.scene_uniform_buffer, 0, bytemuck::bytes_of(&u));

        let frame = self.surface.get_current_texture()?;
        let swap_view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });

        if self.perf.post_enabled() {
            // Pass 1: field scene into the HDR target (MSAA-resolved if on)
            let (attachment, resolve_target) = match &self.targets.msaa_view {
                Some(msaa) => (msaa, Some(&self.targets.hdr_view)),
                None => (&self.targets.hdr_view, None),
            };
            {
                let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("scene_pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: attachment,
                        resolve_target,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Clear(self.clear_color),
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    timestamp_writes: None,
                    occlusion_query_set: None,
                });
                Self::draw_field(
                    &mut rpass,
                    &self.node_pipeline,
                    &self.line_pipeline,
                    &self.scene_bind_group,
                    &self.quad_vb,
                    &self.instance_vb,
                    &self.line_vb,
                    node_count,
                    self.line_vertex_count,
                );
            }

            let res = [self.width as f32 / 2.0, self.height as f32 / 2.0];
            let bloom_strength = if self.perf.bloom_enabled {
                BLOOM_STRENGTH
            } else {
                0.0
            };
            let vignette = if self.perf.vignette_enabled {
                VIGNETTE_STRENGTH
            } else {
                0.0
            };
            post::write_post_uniforms(
                &self.queue,
                &self.post.uniform_buffer,
                res,
                self.time_accum,
                bloom_strength,
                [1.0, 0.0],
                vignette,
            );
            post::write_post_uniforms(
                &self.queue,
                &self.post.uniform_buffer_v,
                res,
                self.time_accum,
                bloom_strength,
                [0.0, 1.0],
                vignette,
            );

            if self.perf.bloom_enabled {
                // Pass 2: bright pass -> bloom_a
                post::blit(
                    &mut encoder,
                    "bright_pass",
                    &self.targets.bloom_a_view,
                    wgpu::Color::BLACK,
                    &self.post.bright_pipeline,
                    &self.bg_hdr,
                    None,
                );
                // Pass 3: blur horizontal bloom_a -> bloom_b
                post::blit(
                    &mut encoder,
                    "blur_h",
                    &self.targets.bloom_b_view,
                    wgpu::Color::BLACK,
                    &self.post.blur_pipeline,
                    &self.bg_from_bloom_a,
                    None,
                );
                // Pass 4: blur vertical bloom_b -> bloom_a
                post::blit(
                    &mut encoder,
                    "blur_v",
                    &self.targets.bloom_a_view,
                    wgpu::Color::BLACK,
                    &self.post.blur_pipeline,
                    &self.bg_from_bloom_b,
                    None,
                );
            }

            // Final pass: composite to swapchain. With bloom off the bloom
            // term is multiplied by zero, so stale bloom_a content is inert.
            post::blit(
                &mut encoder,
                "composite",
                &swap_view,
                self.clear_color,
                &self.post.composite_pipeline,
                &self.bg_hdr,
                Some(&self.bg_bloom_a_only),
            );
        } else {
            // Lowest quality: single pass straight at the swapchain
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass_direct"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &swap_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            Self::draw_field(
                &mut rpass,
                &self.node_pipeline_direct,
                &self.line_pipeline_direct,
                &self.scene_bind_group,
                &self.quad_vb,
                &self.instance_vb,
                &self.line_vb,
                node_count,
                self.line_vertex_count,
            );
        }

        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_field(
        rpass: &mut wgpu::RenderPass<'_>,
        node_pipeline: &wgpu::RenderPipeline,
        line_pipeline: &wgpu::RenderPipeline,
        scene_bind_group: &wgpu::BindGroup,
        quad_vb: &wgpu::Buffer,
        instance_vb: &wgpu::Buffer,
        line_vb: &wgpu::Buffer,
        node_count: u32,
        line_vertex_count: u32,
    ) {
        // Lines first so node discs read as sitting on top of the mesh
        if line_vertex_count > 0 {
            rpass.set_pipeline(line_pipeline);
            rpass.set_bind_group(0, scene_bind_group, &[]);
            rpass.set_vertex_buffer(0, line_vb.slice(..u64::from(line_vertex_count) * VEC3_STRIDE));
            rpass.draw(0..line_vertex_count, 0..1);
        }
        if node_count > 0 {
            rpass.set_pipeline(node_pipeline);
            rpass.set_bind_group(0, scene_bind_group, &[]);
            rpass.set_vertex_buffer(0, quad_vb.slice(..));
            rpass.set_vertex_buffer(1, instance_vb.slice(..u64::from(node_count) * VEC3_STRIDE));
            rpass.draw(0..QUAD_VERTS.len() as u32, 0..node_count);
        }
    }
}

impl<'a> GpuState<'a> {
    fn rebuild_post_bind_groups(&mut self) {
        let (bg_hdr, bg_from_a, bg_from_b, bg_a_only) = post::rebuild_bind_groups(
            &self.device,
            &self.post,
            &self.linear_sampler,
            &self.targets.hdr_view,
            &self.targets.bloom_a_view,
            &self.targets.bloom_b_view,
        );
        self.bg_hdr = bg_hdr;
        self.bg_from_bloom_a = bg_from_a;
        self.bg_from_bloom_b = bg_from_b;
        self.bg_bloom_a_only = bg_a_only;
    }
}
