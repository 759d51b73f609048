#[macro_use]
extern crate log;

use anyhow::{anyhow, Result};
use std::time::Instant;
use winit::{
    dpi::PhysicalSize,
    event::{Event, VirtualKeyCode},
    event_loop::{ControlFlow, EventLoop},
    platform::run_return::EventLoopExtRunReturn,
    window::{Fullscreen, Window, WindowBuilder},
};
use winit_input_helper::WinitInputHelper;

pub mod config;
pub mod constants;
pub mod datboi;
pub mod render;
pub mod resource;
pub mod sprite;
pub mod sprite_sheet;

use crate::{
    config::Config,
    constants::{CLEAR_COLOR, FPS_LOG_INTERVAL_FRAMES},
    datboi::DatBoi,
    render::{
        pipeline::{ShaderSource, SpritePipeline},
        texture::Texture,
        GpuState, GpuStateBuilder,
    },
    resource::{camera::Camera, timestep::FixedTimestep},
    sprite::Sprite,
    sprite_sheet::SpriteSheet,
};

pub fn engine() -> EngineBuilder {
    EngineBuilder {
        config: Config::default(),
    }
}

// Engine owns everything with a lifetime of the whole run:
//  - window + gpu state
//  - the sprite shader program
//  - the sprite sheet texture
// The sprite chain borrowing the last two is built inside `run`.

pub struct Engine {
    window: Window,
    gpu: GpuState,
    pipeline: SpritePipeline,
    texture: Texture,
    camera: Camera,
    input: WinitInputHelper,
    config: Config,
}

impl Engine {
    /// Runs until the window closes or Escape is pressed.
    pub fn run(self, mut event_loop: EventLoop<()>) -> Result<()> {
        let Engine {
            window,
            mut gpu,
            pipeline,
            texture,
            camera,
            mut input,
            config,
        } = self;

        let sprite = Sprite::new(&gpu.device, &texture, &pipeline);
        let sheet = SpriteSheet::with_layout(sprite, &config.sheet);
        let mut datboi = DatBoi::with_bounce(sheet, config.bounce);

        let world_size = config.screen_size_f32();
        let mut timestep = FixedTimestep::new(config.fixed_step);
        let mut last_frame = Instant::now();
        let mut start_time = Instant::now();
        let mut frame_count = 0;
        let mut failure = None;

        info!("starting engine");
        event_loop.run_return(|event, _, control_flow| {
            *control_flow = ControlFlow::Poll;

            if let Event::RedrawRequested(_) = event {
                let now = Instant::now();
                let dt = now.duration_since(last_frame).as_secs_f32();
                last_frame = now;

                let steps = timestep.advance(dt, |step| datboi.update(step));
                trace!("ran {} fixed steps for {:.4}s", steps, dt);

                if let Err(err) = gpu.render(CLEAR_COLOR, world_size, &camera, &datboi) {
                    failure = Some(err);
                    *control_flow = ControlFlow::Exit;
                    return;
                }
                frame_count += 1;
            }

            if input.update(&event) {
                if input.key_pressed(VirtualKeyCode::Escape) || input.quit() {
                    debug!("received exit signal; shutting down");
                    *control_flow = ControlFlow::Exit;
                    return;
                }

                if let Some(physical_size) = input.resolution() {
                    gpu.resize(physical_size);
                }

                window.request_redraw();
            }

            if frame_count == FPS_LOG_INTERVAL_FRAMES {
                let elapsed = start_time.elapsed();
                info!(
                    "{} frames took {:.2?}, average fps = {}",
                    FPS_LOG_INTERVAL_FRAMES,
                    elapsed,
                    (1.0 / (elapsed.as_secs_f64() / FPS_LOG_INTERVAL_FRAMES as f64)) as u32 + 1
                );
                start_time = Instant::now();
                frame_count = 0;
            }
        });

        match failure {
            Some(err) => Err(err),
            None => {
                info!("window closed");
                Ok(())
            }
        }
    }
}

pub struct EngineBuilder {
    config: Config,
}

impl EngineBuilder {
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Result<(Engine, EventLoop<()>)> {
        let config = self.config;
        config.validate()?;
        info!("building engine");

        info!("creating window");
        let event_loop = EventLoop::new();
        let size = PhysicalSize::new(config.screen_size.0, config.screen_size.1);
        let mut window_builder = WindowBuilder::new()
            .with_title(&config.title)
            .with_inner_size(size);
        if config.fullscreen {
            window_builder = window_builder
                .with_fullscreen(Some(Fullscreen::Borderless(event_loop.primary_monitor())));
        }
        let window = window_builder
            .build(&event_loop)
            .map_err(|err| anyhow!("failed to create window: {}", err))?;

        info!("building gpu state");
        let gpu = futures::executor::block_on(GpuStateBuilder::winit(&window).build())?;

        info!("building sprite pipeline");
        let pipeline = SpritePipeline::new(&gpu.device, &gpu.chain_descriptor, &ShaderSource::sprite());

        info!("loading textures");
        let texture = Texture::from_path(
            &gpu.device,
            &gpu.queue,
            &pipeline.texture_layout,
            &config.asset_path,
        )?;
        info!(
            "loaded {} ({}x{})",
            config.asset_path.display(),
            texture.width(),
            texture.height()
        );

        let camera = Camera::new(config.aspect());

        info!("ready to start!");
        Ok((
            Engine {
                window,
                gpu,
                pipeline,
                texture,
                camera,
                input: WinitInputHelper::new(),
                config,
            },
            event_loop,
        ))
    }
}
