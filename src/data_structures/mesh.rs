//! GPU-side meshes: a vertex buffer, a compressed index buffer and the
//! metadata needed to issue the draw.

use std::ops::RangeInclusive;

use wgpu::util::DeviceExt;

use crate::data_structures::cube::{self, CubeData};

/// Trait for vertex types that can describe their GPU buffer layout.
pub trait Vertex {
    fn desc() -> wgpu::VertexBufferLayout<'static>;
}

/// A position-only vertex, the only attribute the skybox shader consumes.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PositionVertex {
    pub position: [f32; 3],
}

impl Vertex for PositionVertex {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<PositionVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x3,
            }],
        }
    }
}

/// A mesh ready to draw: immutable after creation and shared by every node
/// that looks it up in the resource cache.
#[derive(Debug)]
pub struct Mesh {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub topology: wgpu::PrimitiveTopology,
    pub index_format: wgpu::IndexFormat,
    pub index_range: RangeInclusive<u32>,
    pub num_elements: u32,
}

impl Mesh {
    /// Upload cube geometry into a mesh.
    ///
    /// Positions are interleaved into one vertex buffer, the index list is
    /// compressed to its final width and the buffers land on the device. The
    /// buffers are returned alongside the mesh so callers can cache them
    /// under their own keys.
    pub fn from_cube(device: &wgpu::Device, data: &CubeData) -> (Self, wgpu::Buffer, wgpu::Buffer) {
        let vertices = data
            .positions
            .iter()
            .map(|&position| PositionVertex { position })
            .collect::<Vec<_>>();

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Cube Vertex Buffer"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let compressed = cube::compress_indices(&data.indices);
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Cube Index Buffer"),
            contents: compressed.contents(),
            usage: wgpu::BufferUsages::INDEX,
        });

        let mesh = Self {
            vertex_buffer: vertex_buffer.clone(),
            index_buffer: index_buffer.clone(),
            topology: data.topology,
            index_format: compressed.format,
            index_range: compressed.range,
            num_elements: compressed.count,
        };
        (mesh, vertex_buffer, index_buffer)
    }
}

/// Drawing a [`Mesh`] into an active render pass.
pub trait DrawMesh {
    fn draw_mesh(&mut self, mesh: &Mesh);
}

impl DrawMesh for wgpu::RenderPass<'_> {
    fn draw_mesh(&mut self, mesh: &Mesh) {
        self.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
        self.set_index_buffer(mesh.index_buffer.slice(..), mesh.index_format);
        self.draw_indexed(0..mesh.num_elements, 0, 0..1);
    }
}
