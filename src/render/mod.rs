use anyhow::{anyhow, Result};
use std::{iter, ops::Range};
use winit::window::Window;

pub mod buffer;
pub mod pipeline;
pub mod texture;
pub mod uniform;

use crate::resource::camera::Camera;

/// Something that records draw calls into a frame's render pass.
pub trait Draw {
    fn draw<'p>(
        &'p self,
        ctx: &mut RenderContext<'p>,
        view: &cgmath::Matrix4<f32>,
        projection: &cgmath::Matrix4<f32>,
    );
}

pub struct GpuState {
    pub surface: wgpu::Surface,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub chain_descriptor: wgpu::SwapChainDescriptor,
    pub swap_chain: wgpu::SwapChain,
    pub screen_size: (u32, u32),
}

pub struct GpuStateBuilder {
    pub screen_size: (u32, u32),
    pub instance: wgpu::Instance,
    pub surface: wgpu::Surface,
}

impl GpuStateBuilder {
    pub fn winit(window: &Window) -> Self {
        let size = window.inner_size();

        // Instance is a handle to the GPU
        // BackendBit::PRIMARY => Vulkan + Metal + DX12 + Browser WebGPU
        let instance = wgpu::Instance::new(wgpu::BackendBit::PRIMARY);

        // Surface is used to create a swap chain
        let surface = unsafe { instance.create_surface(window) };

        Self {
            screen_size: (size.width, size.height),
            instance,
            surface,
        }
    }

    pub async fn build(self) -> Result<GpuState> {
        let surface = self.surface;

        // Adapter is used to request a device and queue
        let adapter = self
            .instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
            })
            .await
            .ok_or_else(|| anyhow!("GpuStateBuilder: failed to request adapter"))?;

        let info = adapter.get_info();
        info!("using adapter {} ({:?})", info.name, info.backend);

        // Device is an open connection to the GPU
        // Queue is a handle to the GPU's command buffer executor
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: None,
                    features: wgpu::Features::empty(),
                    limits: wgpu::Limits::default(),
                },
                None,
            )
            .await
            .map_err(|err| anyhow!("GpuStateBuilder: failed to request device: {}", err))?;

        // Shader and pipeline validation failures are reported, not fatal
        device.on_uncaptured_error(|err| {
            error!("gpu validation error: {}", err);
        });

        // Swap chain is used to store rendered textures which
        // are synced with the display
        let chain_descriptor = wgpu::SwapChainDescriptor {
            usage: wgpu::TextureUsage::RENDER_ATTACHMENT,
            format: adapter
                .get_swap_chain_preferred_format(&surface)
                .ok_or_else(|| anyhow!("failed to get preferred swap chain format"))?,
            width: self.screen_size.0,
            height: self.screen_size.1,
            present_mode: wgpu::PresentMode::Fifo,
        };
        let swap_chain = device.create_swap_chain(&surface, &chain_descriptor);

        Ok(GpuState {
            screen_size: self.screen_size,
            surface,
            device,
            queue,
            chain_descriptor,
            swap_chain,
        })
    }
}

impl GpuState {
    pub fn resize(&mut self, new_size: (u32, u32)) {
        if new_size.0 == 0 || new_size.1 == 0 {
            debug!("ignoring resize to {:?}", new_size);
            return;
        }
        debug!("resizing swap chain to {:?}", new_size);
        self.screen_size = new_size;
        self.chain_descriptor.width = new_size.0;
        self.chain_descriptor.height = new_size.1;
        self.swap_chain = self
            .device
            .create_swap_chain(&self.surface, &self.chain_descriptor);
    }

    /// Clears the frame, draws `drawable` once and presents.
    pub fn render<D: Draw>(
        &mut self,
        clear: wgpu::Color,
        world_size: cgmath::Vector2<f32>,
        camera: &Camera,
        drawable: &D,
    ) -> Result<()> {
        let frame = match self.swap_chain.get_current_frame() {
            Ok(frame) => frame.output,
            Err(err) => {
                return match recover_frame(&err) {
                    FrameRecovery::Recreate => {
                        warn!("swap chain {}; recreating", err);
                        self.resize(self.screen_size);
                        Ok(())
                    }
                    FrameRecovery::Skip => {
                        warn!("skipping frame: {}", err);
                        Ok(())
                    }
                    FrameRecovery::Fatal => Err(anyhow!("failed to acquire frame: {}", err)),
                };
            }
        };

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Sprite Encoder"),
            });
        let pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Sprite Pass"),
            color_attachments: &[wgpu::RenderPassColorAttachment {
                view: &frame.view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear),
                    store: true,
                },
            }],
            depth_stencil_attachment: None,
        });

        let mut context = RenderContext::new(pass, &self.queue, world_size);
        drawable.draw(&mut context, &camera.view(), &camera.projection());
        let draws = context.finish();
        trace!("frame recorded {} draw calls", draws);

        self.queue.submit(iter::once(encoder.finish()));
        Ok(())
    }
}

pub const MAX_BIND_GROUPS: usize = 4;

/// Explicit GPU binding state for one render pass. Draw calls go through
/// this instead of touching the pass directly, so rebinding the same
/// pipeline, bind group or vertex buffer is skipped and nothing bound by
/// one drawable outlives the pass.
pub struct RenderContext<'p> {
    pass: wgpu::RenderPass<'p>,
    queue: &'p wgpu::Queue,
    world_size: cgmath::Vector2<f32>,
    pipeline: Option<&'p wgpu::RenderPipeline>,
    bind_groups: [Option<&'p wgpu::BindGroup>; MAX_BIND_GROUPS],
    vertex_buffer: Option<&'p wgpu::Buffer>,
    draws: u32,
}

impl<'p> RenderContext<'p> {
    pub fn new(
        pass: wgpu::RenderPass<'p>,
        queue: &'p wgpu::Queue,
        world_size: cgmath::Vector2<f32>,
    ) -> Self {
        Self {
            pass,
            queue,
            world_size,
            pipeline: None,
            bind_groups: [None; MAX_BIND_GROUPS],
            vertex_buffer: None,
            draws: 0,
        }
    }

    pub fn queue(&self) -> &'p wgpu::Queue {
        self.queue
    }

    /// Size that logical sprite positions are divided by.
    pub fn world_size(&self) -> cgmath::Vector2<f32> {
        self.world_size
    }

    pub fn set_pipeline(&mut self, pipeline: &'p wgpu::RenderPipeline) {
        if !same(self.pipeline, pipeline) {
            self.pass.set_pipeline(pipeline);
            self.pipeline = Some(pipeline);
        }
    }

    pub fn set_bind_group(&mut self, index: u32, bind_group: &'p wgpu::BindGroup) {
        let slot = &mut self.bind_groups[index as usize];
        if !same(*slot, bind_group) {
            self.pass.set_bind_group(index, bind_group, &[]);
            *slot = Some(bind_group);
        }
    }

    pub fn set_vertex_buffer(&mut self, buffer: &'p wgpu::Buffer) {
        if !same(self.vertex_buffer, buffer) {
            self.pass.set_vertex_buffer(0, buffer.slice(..));
            self.vertex_buffer = Some(buffer);
        }
    }

    pub fn draw(&mut self, vertices: Range<u32>) {
        self.pass.draw(vertices, 0..1);
        self.draws += 1;
    }

    /// Ends the pass, returning the number of draws issued.
    pub fn finish(self) -> u32 {
        self.draws
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FrameRecovery {
    Recreate,
    Skip,
    Fatal,
}

/// Only running out of memory ends the loop. A timed out frame (minimized or
/// covered window) is dropped and the next one is tried.
pub fn recover_frame(err: &wgpu::SwapChainError) -> FrameRecovery {
    match err {
        wgpu::SwapChainError::Outdated | wgpu::SwapChainError::Lost => FrameRecovery::Recreate,
        wgpu::SwapChainError::Timeout => FrameRecovery::Skip,
        wgpu::SwapChainError::OutOfMemory => FrameRecovery::Fatal,
    }
}

fn same<T>(bound: Option<&T>, candidate: &T) -> bool {
    bound.map_or(false, |bound| std::ptr::eq(bound, candidate))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_compares_identity() {
        let a = 1u32;
        let b = 1u32;
        assert!(same(Some(&a), &a));
        assert!(!same(Some(&a), &b));
        assert!(!same(None, &a));
    }

    #[test]
    fn test_timeout_skips_frame_instead_of_exiting() {
        assert_eq!(recover_frame(&wgpu::SwapChainError::Timeout), FrameRecovery::Skip);
    }

    #[test]
    fn test_lost_and_outdated_recreate_swap_chain() {
        assert_eq!(recover_frame(&wgpu::SwapChainError::Lost), FrameRecovery::Recreate);
        assert_eq!(recover_frame(&wgpu::SwapChainError::Outdated), FrameRecovery::Recreate);
    }

    #[test]
    fn test_only_out_of_memory_is_fatal() {
        assert_eq!(recover_frame(&wgpu::SwapChainError::OutOfMemory), FrameRecovery::Fatal);
    }
}
