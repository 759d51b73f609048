use cgmath::{Matrix4, Vector2};

use crate::{
    constants::{DEFAULT_CELL_HEIGHT, DEFAULT_CELL_WIDTH, DEFAULT_FRAME_COUNT, DEFAULT_FRAME_TIME},
    render::{Draw, RenderContext},
    sprite::Drawable2D,
};

/// Layout of a single-row sheet: cell size in pixels, starting offset,
/// frame count and seconds per frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SheetLayout {
    pub cell_size: Vector2<f32>,
    pub offset: Vector2<f32>,
    pub frames: u32,
    pub frame_time: f32,
}

impl Default for SheetLayout {
    fn default() -> Self {
        Self {
            cell_size: Vector2::new(DEFAULT_CELL_WIDTH, DEFAULT_CELL_HEIGHT),
            offset: Vector2::new(0.0, 0.0),
            frames: DEFAULT_FRAME_COUNT,
            frame_time: DEFAULT_FRAME_TIME,
        }
    }
}

/// Steps a sprite's texture rect through the cells of a single-row sheet.
///
/// The frame index runs from 0 through `frames` inclusive before wrapping,
/// so a sheet built with `frames = 4` shows five cells.
pub struct SpriteSheet<S: Drawable2D> {
    sprite: S,
    cell_size: Vector2<f32>,
    offset: Vector2<f32>,
    frames: u32,
    current_frame: u32,
    frame_time: f32,
    elapsed_time: f32,
}

impl<S: Drawable2D> SpriteSheet<S> {
    pub fn new(
        mut sprite: S,
        cell_size: Vector2<f32>,
        offset: Vector2<f32>,
        frames: u32,
        frame_time: f32,
    ) -> Self {
        sprite.set_texture_rect(offset, cell_size);
        Self {
            sprite,
            cell_size,
            offset,
            frames,
            current_frame: 0,
            frame_time,
            elapsed_time: 0.0,
        }
    }

    pub fn with_layout(sprite: S, layout: &SheetLayout) -> Self {
        Self::new(
            sprite,
            layout.cell_size,
            layout.offset,
            layout.frames,
            layout.frame_time,
        )
    }

    pub fn update(&mut self, dt: f32) {
        self.elapsed_time += dt;
        if self.elapsed_time >= self.frame_time {
            self.elapsed_time = 0.0;
            self.current_frame += 1;
            if self.current_frame > self.frames {
                self.current_frame = 0;
            }
            self.offset = cell_offset(self.cell_size, self.current_frame);
            trace!("sprite sheet advanced to frame {}", self.current_frame);
            self.sprite.set_texture_rect(self.offset, self.cell_size);
        }
    }

    pub fn set_position(&mut self, position: Vector2<f32>) {
        self.sprite.set_position(position);
    }

    pub fn position(&self) -> Vector2<f32> {
        self.sprite.position()
    }

    pub fn current_frame(&self) -> u32 {
        self.current_frame
    }

    pub fn offset(&self) -> Vector2<f32> {
        self.offset
    }

    pub fn sprite(&self) -> &S {
        &self.sprite
    }
}

impl<S: Drawable2D> Draw for SpriteSheet<S> {
    fn draw<'p>(
        &'p self,
        ctx: &mut RenderContext<'p>,
        view: &Matrix4<f32>,
        projection: &Matrix4<f32>,
    ) {
        self.sprite.draw(ctx, view, projection);
    }
}

pub fn cell_offset(cell_size: Vector2<f32>, frame: u32) -> Vector2<f32> {
    Vector2::new(cell_size.x * frame as f32, 0.0)
}
