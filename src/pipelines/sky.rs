use cgmath::{Matrix4, SquareMatrix};
use wgpu::util::DeviceExt;

use crate::data_structures::{
    mesh::{PositionVertex, Vertex},
    texture::Texture,
};

/// The transformation-projection matrix as it lives in the uniform buffer.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct SkyUniform {
    transform_projection: [[f32; 4]; 4],
}

/// The skybox "shader program": a render pipeline plus the uniform buffer
/// holding the transformation-projection matrix.
///
/// One instance is shared by all skybox nodes through the resource cache;
/// each node combines the shared uniform buffer with its own cube texture in
/// a bind group via [`bind`](Self::bind) and sets the matrix right before its
/// draw with [`set_transformation_projection`](Self::set_transformation_projection).
#[derive(Debug)]
pub struct SkyPipeline {
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    uniform_buffer: wgpu::Buffer,
}

impl SkyPipeline {
    pub fn new(
        device: &wgpu::Device,
        color_format: wgpu::TextureFormat,
        depth_format: Option<wgpu::TextureFormat>,
    ) -> Self {
        let bind_group_layout = sky_layout(device);

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Sky Pipeline Layout"),
            bind_group_layouts: &[Some(&bind_group_layout)],
            immediate_size: 0,
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Sky Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("sky_shader.wgsl").into()),
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            cache: None,
            label: Some("Sky Pipeline"),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[PositionVertex::desc()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: color_format,
                    blend: Some(wgpu::BlendState {
                        alpha: wgpu::BlendComponent::REPLACE,
                        color: wgpu::BlendComponent::REPLACE,
                    }),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                // The cube's winding is inverted, so the interior faces are
                // the front-facing ones and back-face culling still applies.
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: depth_format.map(|format| wgpu::DepthStencilState {
                format,
                // The sky sits behind everything; it must not occlude later
                // passes, so depth writes stay off.
                depth_write_enabled: Some(false),
                depth_compare: Some(wgpu::CompareFunction::LessEqual),
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview_mask: None,
        });

        let uniform = SkyUniform {
            transform_projection: Matrix4::identity().into(),
        };
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Sky Uniform Buffer"),
            contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        Self {
            pipeline,
            bind_group_layout,
            uniform_buffer,
        }
    }

    /// Combine the shared uniform buffer with a cube texture into the bind
    /// group a node uses for drawing.
    pub fn bind(&self, device: &wgpu::Device, texture: &Texture) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: self.uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&texture.view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&texture.sampler),
                },
            ],
            label: Some("sky_bind_group"),
        })
    }

    /// Write the transformation-projection matrix for the next draw.
    pub fn set_transformation_projection(&self, queue: &wgpu::Queue, matrix: Matrix4<f32>) {
        let uniform = SkyUniform {
            transform_projection: matrix.into(),
        };
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[uniform]));
    }

    pub fn pipeline(&self) -> &wgpu::RenderPipeline {
        &self.pipeline
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::Projection;
    use cgmath::Deg;

    #[test]
    fn uniform_packs_matrix_column_major() {
        let translation = Matrix4::from_translation([1.0, 2.0, 3.0].into());
        let uniform = SkyUniform {
            transform_projection: translation.into(),
        };
        // WGSL mat4x4 constructors take columns, so the translation has to
        // end up in the last column of the packed array.
        assert_eq!(uniform.transform_projection[3], [1.0, 2.0, 3.0, 1.0]);
        assert_eq!(uniform.transform_projection[0], [1.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn transform_projection_is_projection_times_transform() {
        let projection = Projection::new(640, 480, Deg(45.0), 0.1, 500.0);
        let transform = Matrix4::from_translation([0.0, 0.0, -5.0].into());
        let combined = projection.calc_matrix() * transform;
        // A point at the local origin ends up 5 units down the view axis.
        let clip = combined * cgmath::Vector4::new(0.0, 0.0, 0.0, 1.0);
        assert!((clip.w - 5.0).abs() < 1e-4);
        assert!(clip.z > 0.0 && clip.z < clip.w);
    }
}

fn sky_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    multisampled: false,
                    view_dimension: wgpu::TextureViewDimension::Cube,
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 2,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
        ],
        label: Some("sky_bind_group_layout"),
    })
}
