use super::{buffer::DynamicVertexBuffer, texture, uniform};

pub const TEXTURE_BIND_GROUP: u32 = 0;
pub const MATRIX_BIND_GROUP: u32 = 1;

pub enum ShaderSource {
    WGSL(String),
}

impl ShaderSource {
    pub fn sprite() -> Self {
        ShaderSource::WGSL(include_str!("shaders/sprite.wgsl").to_owned())
    }
}

/// The compiled sprite shader program together with the bind group
/// layouts its resources are created against.
pub struct SpritePipeline {
    pub pipeline: wgpu::RenderPipeline,
    pub shader_module: wgpu::ShaderModule,
    pub texture_layout: wgpu::BindGroupLayout,
    pub uniform_layout: wgpu::BindGroupLayout,
}

impl SpritePipeline {
    pub fn new(
        device: &wgpu::Device,
        chain_desc: &wgpu::SwapChainDescriptor,
        source: &ShaderSource,
    ) -> Self {
        debug!("building sprite pipeline");
        let shader_module = build_shader(source, device);
        let texture_layout = texture::texture_layout(device);
        let uniform_layout = uniform::uniform_layout(device, uniform::ShaderStage::VERTEX);

        let render_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Sprite Pipeline Layout"),
                bind_group_layouts: &[&texture_layout, &uniform_layout],
                push_constant_ranges: &[],
            });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Sprite Pipeline"),
            layout: Some(&render_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader_module,
                entry_point: "vs_main",
                buffers: &[DynamicVertexBuffer::layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader_module,
                entry_point: "fs_main",
                targets: &[wgpu::ColorTargetState {
                    format: chain_desc.format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrite::ALL,
                }],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                // The quad mixes windings
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                clamp_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
        });

        Self {
            pipeline,
            shader_module,
            texture_layout,
            uniform_layout,
        }
    }
}

fn build_shader(source: &ShaderSource, device: &wgpu::Device) -> wgpu::ShaderModule {
    device.create_shader_module(&wgpu::ShaderModuleDescriptor {
        label: Some("Sprite Shader"),
        flags: wgpu::ShaderFlags::all(),
        source: match source {
            ShaderSource::WGSL(src) => wgpu::ShaderSource::Wgsl(src.clone().into()),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sprite_shader_declares_entry_points() {
        let ShaderSource::WGSL(src) = ShaderSource::sprite();
        assert!(src.contains("fn vs_main"));
        assert!(src.contains("fn fs_main"));
        assert!(src.contains("discard"));
    }
}
