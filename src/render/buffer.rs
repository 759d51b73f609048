use wgpu::util::DeviceExt;

// Vertex buffers

/// Position (3 floats) followed by texcoord (2 floats), stride 5 floats.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex3D {
    pub position: [f32; 3],
    pub uvs: [f32; 2],
}

/// A vertex buffer whose full contents are rewritten every draw.
pub struct DynamicVertexBuffer {
    pub buffer: wgpu::Buffer,
    pub size: u32,
}

impl DynamicVertexBuffer {
    pub fn new(vertices: &[Vertex3D], device: &wgpu::Device) -> Self {
        DynamicVertexBuffer {
            buffer: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Dynamic Vertex Buffer"),
                contents: bytemuck::cast_slice(vertices),
                usage: wgpu::BufferUsage::VERTEX | wgpu::BufferUsage::COPY_DST,
            }),
            size: vertices.len() as u32,
        }
    }

    pub fn write(&self, vertices: &[Vertex3D], queue: &wgpu::Queue) {
        debug_assert_eq!(vertices.len() as u32, self.size);
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(vertices));
    }

    pub fn layout<'a>() -> wgpu::VertexBufferLayout<'a> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex3D>() as wgpu::BufferAddress,
            step_mode: wgpu::InputStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }
}
