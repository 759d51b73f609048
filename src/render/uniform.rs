use std::{fmt::Debug, marker::PhantomData};

use wgpu::util::DeviceExt;

pub type ShaderStage = wgpu::ShaderStage;

pub trait UniformSource:
    Copy + Clone + bytemuck::Pod + bytemuck::Zeroable + Debug + 'static
{
}

impl<T> UniformSource for T where
    T: Copy + Clone + bytemuck::Pod + bytemuck::Zeroable + Debug + 'static
{
}

/// Model, view and projection matrices as uploaded to the sprite shader.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MatrixUniforms {
    pub model: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
}

impl MatrixUniforms {
    pub fn new(
        model: cgmath::Matrix4<f32>,
        view: cgmath::Matrix4<f32>,
        projection: cgmath::Matrix4<f32>,
    ) -> Self {
        Self {
            model: model.into(),
            view: view.into(),
            projection: projection.into(),
        }
    }
}

impl Default for MatrixUniforms {
    fn default() -> Self {
        use cgmath::SquareMatrix;
        let identity = cgmath::Matrix4::<f32>::identity();
        Self::new(identity, identity, identity)
    }
}

pub fn uniform_layout(device: &wgpu::Device, stage: ShaderStage) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: stage,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
        label: Some("uniform_bind_group_layout"),
    })
}

/// One uniform block living in its own buffer and bind group.
pub struct UniformBuffer<U: UniformSource> {
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    _marker: PhantomData<U>,
}

impl<U: UniformSource> UniformBuffer<U> {
    pub fn new(source: U, device: &wgpu::Device, layout: &wgpu::BindGroupLayout) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Uniform Buffer"),
            contents: bytemuck::cast_slice(&[source]),
            usage: wgpu::BufferUsage::UNIFORM | wgpu::BufferUsage::COPY_DST,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(buffer.as_entire_buffer_binding()),
            }],
            label: Some("uniform_bind_group"),
        });
        Self {
            buffer,
            bind_group,
            _marker: PhantomData,
        }
    }

    pub fn write(&self, source: &U, queue: &wgpu::Queue) {
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(std::slice::from_ref(source)));
    }
}
