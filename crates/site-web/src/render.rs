//! WebGPU renderer for the neural effect.
//!
//! Two instanced pipelines over one uniform set: camera-facing quad sprites
//! with a circular fragment mask for the dots, and view-space-expanded quads
//! for the branch lines. The canvas is cleared to transparent so the effect
//! composites over the page background.

use glam::{Mat4, Vec3};
use web_sys as web;

use site_core::{DotInstance, SegmentInstance};

use crate::constants::{CAMERA_FAR, CAMERA_FOVY_DEG, CAMERA_NEAR, CAMERA_Z};

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct Uniforms {
    proj: [[f32; 4]; 4],
    view_model: [[f32; 4]; 4],
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct SpriteRaw {
    pos: [f32; 3],
    scale: f32,
    color: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct SegmentRaw {
    a: [f32; 3],
    half_width: f32,
    b: [f32; 3],
    _pad: f32,
    color: [f32; 4],
}

const SHADER_SRC: &str = r#"
struct Uniforms {
  proj: mat4x4<f32>,
  view_model: mat4x4<f32>,
};
@group(0) @binding(0) var<uniform> u: Uniforms;

struct SpriteOut {
  @builtin(position) pos: vec4<f32>,
  @location(0) color: vec4<f32>,
  @location(1) local: vec2<f32>,
};

@vertex
fn vs_sprite(
  @location(0) v_pos: vec2<f32>,
  @location(1) i_pos: vec3<f32>,
  @location(2) i_scale: f32,
  @location(3) i_color: vec4<f32>,
) -> SpriteOut {
  // Billboard: expand the quad in view space so sprites face the camera.
  var view = u.view_model * vec4<f32>(i_pos, 1.0);
  view = vec4<f32>(view.xy + v_pos * i_scale, view.z, 1.0);
  var out: SpriteOut;
  out.pos = u.proj * view;
  out.color = i_color;
  out.local = v_pos;
  return out;
}

@fragment
fn fs_sprite(inf: SpriteOut) -> @location(0) vec4<f32> {
  // Circular mask within the quad (unit circle of radius 0.5)
  let r = length(inf.local);
  let shape_alpha = 1.0 - smoothstep(0.48, 0.5, r);
  return vec4<f32>(inf.color.rgb, shape_alpha * inf.color.a);
}

struct SegmentOut {
  @builtin(position) pos: vec4<f32>,
  @location(0) color: vec4<f32>,
};

@vertex
fn vs_segment(
  @builtin(vertex_index) vi: u32,
  @location(0) i_a: vec3<f32>,
  @location(1) i_half_width: f32,
  @location(2) i_b: vec3<f32>,
  @location(3) i_color: vec4<f32>,
) -> SegmentOut {
  var ends = array<f32, 6>(0.0, 0.0, 1.0, 0.0, 1.0, 1.0);
  var sides = array<f32, 6>(-1.0, 1.0, 1.0, -1.0, 1.0, -1.0);
  let a = (u.view_model * vec4<f32>(i_a, 1.0)).xyz;
  let b = (u.view_model * vec4<f32>(i_b, 1.0)).xyz;
  // Expand perpendicular to the segment's screen-space direction.
  let along = b.xy - a.xy;
  let len = max(length(along), 1e-5);
  let n = vec2<f32>(-along.y, along.x) / len;
  let p = mix(a, b, ends[vi]);
  let view = vec4<f32>(p.xy + n * sides[vi] * i_half_width, p.z, 1.0);
  var out: SegmentOut;
  out.pos = u.proj * view;
  out.color = i_color;
  return out;
}

@fragment
fn fs_segment(inf: SegmentOut) -> @location(0) vec4<f32> {
  return inf.color;
}
"#;

pub struct GpuState<'a> {
    surface: wgpu::Surface<'a>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    sprite_pipeline: wgpu::RenderPipeline,
    segment_pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    quad_vb: wgpu::Buffer,
    sprite_vb: wgpu::Buffer,
    segment_vb: wgpu::Buffer,
    sprite_capacity: usize,
    segment_capacity: usize,
    bind_group: wgpu::BindGroup,
    width: u32,
    height: u32,
}

impl<'a> GpuState<'a> {
    pub async fn new(canvas: &'a web::HtmlCanvasElement) -> anyhow::Result<Self> {
        use wgpu::util::DeviceExt;

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
                    // Default limits avoid passing unknown fields to older WebGPU impls
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| anyhow::anyhow!(format!("request_device error: {:?}", e)))?;

        let caps = surface.get_capabilities(&adapter);
        let format = caps.formats[0];
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

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("neural shader"),
            source: wgpu::ShaderSource::Wgsl(SHADER_SRC.into()),
        });

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("uniforms"),
            size: std::mem::size_of::<Uniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        // Quad vertex buffer (two triangles)
        let quad_vertices: [f32; 12] = [
            -0.5, -0.5, 0.5, -0.5, 0.5, 0.5, -0.5, -0.5, 0.5, 0.5, -0.5, 0.5,
        ];
        let quad_vb = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quad_vb"),
            contents: bytemuck::cast_slice(&quad_vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let sprite_capacity = 256;
        let sprite_vb = create_instance_buffer::<SpriteRaw>(&device, "sprite_vb", sprite_capacity);
        let segment_capacity = 256;
        let segment_vb =
            create_instance_buffer::<SegmentRaw>(&device, "segment_vb", segment_capacity);

        let bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("bg"),
            layout: &bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pl"),
            bind_group_layouts: &[&bgl],
            push_constant_ranges: &[],
        });

        let sprite_buffers = [
            // slot 0: quad corners
            wgpu::VertexBufferLayout {
                array_stride: (std::mem::size_of::<f32>() * 2) as u64,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &[wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x2,
                    offset: 0,
                    shader_location: 0,
                }],
            },
            // slot 1: instance data
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<SpriteRaw>() as u64,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &[
                    wgpu::VertexAttribute {
                        format: wgpu::VertexFormat::Float32x3,
                        offset: 0,
                        shader_location: 1,
                    },
                    wgpu::VertexAttribute {
                        format: wgpu::VertexFormat::Float32,
                        offset: 12,
                        shader_location: 2,
                    },
                    wgpu::VertexAttribute {
                        format: wgpu::VertexFormat::Float32x4,
                        offset: 16,
                        shader_location: 3,
                    },
                ],
            },
        ];
        let segment_buffers = [wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<SegmentRaw>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x3,
                    offset: 0,
                    shader_location: 0,
                },
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32,
                    offset: 12,
                    shader_location: 1,
                },
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x3,
                    offset: 16,
                    shader_location: 2,
                },
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x4,
                    offset: 32,
                    shader_location: 3,
                },
            ],
        }];

        let sprite_pipeline = build_pipeline(
            &device,
            &pipeline_layout,
            &shader,
            "vs_sprite",
            "fs_sprite",
            &sprite_buffers,
            format,
        );
        let segment_pipeline = build_pipeline(
            &device,
            &pipeline_layout,
            &shader,
            "vs_segment",
            "fs_segment",
            &segment_buffers,
            format,
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            sprite_pipeline,
            segment_pipeline,
            uniform_buffer,
            quad_vb,
            sprite_vb,
            segment_vb,
            sprite_capacity,
            segment_capacity,
            bind_group,
            width,
            height,
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
        }
    }

    fn matrices(&self, rotation: f32) -> Uniforms {
        let aspect = self.width as f32 / self.height.max(1) as f32;
        let proj = Mat4::perspective_rh(
            CAMERA_FOVY_DEG.to_radians(),
            aspect,
            CAMERA_NEAR,
            CAMERA_FAR,
        );
        let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, CAMERA_Z), Vec3::ZERO, Vec3::Y);
        let model = Mat4::from_rotation_z(rotation) * Mat4::from_rotation_y(rotation);
        Uniforms {
            proj: proj.to_cols_array_2d(),
            view_model: (view * model).to_cols_array_2d(),
        }
    }

    pub fn render(
        &mut self,
        rotation: f32,
        dots: &[DotInstance],
        segments: &[SegmentInstance],
    ) -> Result<(), wgpu::SurfaceError> {
        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });

        self.queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::bytes_of(&self.matrices(rotation)),
        );

        let sprite_data: Vec<SpriteRaw> = dots
            .iter()
            .map(|d| SpriteRaw {
                pos: d.pos.to_array(),
                scale: d.scale,
                color: [d.color[0], d.color[1], d.color[2], 1.0],
            })
            .collect();
        let segment_data: Vec<SegmentRaw> = segments
            .iter()
            .map(|s| SegmentRaw {
                a: s.a.to_array(),
                half_width: s.half_width,
                b: s.b.to_array(),
                _pad: 0.0,
                color: [s.color[0], s.color[1], s.color[2], 1.0],
            })
            .collect();

        if sprite_data.len() > self.sprite_capacity {
            self.sprite_capacity = sprite_data.len().next_power_of_two();
            self.sprite_vb =
                create_instance_buffer::<SpriteRaw>(&self.device, "sprite_vb", self.sprite_capacity);
        }
        if segment_data.len() > self.segment_capacity {
            self.segment_capacity = segment_data.len().next_power_of_two();
            self.segment_vb = create_instance_buffer::<SegmentRaw>(
                &self.device,
                "segment_vb",
                self.segment_capacity,
            );
        }
        self.queue
            .write_buffer(&self.sprite_vb, 0, bytemuck::cast_slice(&sprite_data));
        self.queue
            .write_buffer(&self.segment_vb, 0, bytemuck::cast_slice(&segment_data));

        let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("rpass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        // Lines first so dots sit on top of their branches.
        rpass.set_pipeline(&self.segment_pipeline);
        rpass.set_bind_group(0, &self.bind_group, &[]);
        rpass.set_vertex_buffer(0, self.segment_vb.slice(..));
        rpass.draw(0..6, 0..(segment_data.len() as u32));

        rpass.set_pipeline(&self.sprite_pipeline);
        rpass.set_bind_group(0, &self.bind_group, &[]);
        rpass.set_vertex_buffer(0, self.quad_vb.slice(..));
        rpass.set_vertex_buffer(1, self.sprite_vb.slice(..));
        rpass.draw(0..6, 0..(sprite_data.len() as u32));

        drop(rpass);
        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}

fn create_instance_buffer<T>(device: &wgpu::Device, label: &str, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size: (std::mem::size_of::<T>() * capacity) as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

#[allow(clippy::too_many_arguments)]
fn build_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    vs_entry: &str,
    fs_entry: &str,
    buffers: &[wgpu::VertexBufferLayout<'_>],
    format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(vs_entry),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some(vs_entry),
            buffers,
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        primitive: wgpu::PrimitiveState::default(),
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some(fs_entry),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        cache: None,
        multiview: None,
    })
}
