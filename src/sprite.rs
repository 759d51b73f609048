use cgmath::{Matrix4, Rad, Vector2};

use crate::render::{
    buffer::{DynamicVertexBuffer, Vertex3D},
    pipeline::{SpritePipeline, MATRIX_BIND_GROUP, TEXTURE_BIND_GROUP},
    texture::Texture,
    uniform::{MatrixUniforms, UniformBuffer},
    Draw, RenderContext,
};

/// Anything that can stand in for a sprite: it has a texture sub-rectangle
/// and a position, and can draw itself into a render pass.
pub trait Drawable2D: Draw {
    fn set_texture_rect(&mut self, origin: Vector2<f32>, size: Vector2<f32>);
    fn set_position(&mut self, position: Vector2<f32>);
    fn position(&self) -> Vector2<f32>;
}

/// Sub-rectangle of a texture in pixel units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextureRect {
    pub origin: Vector2<f32>,
    pub size: Vector2<f32>,
}

impl TextureRect {
    pub fn new(origin: Vector2<f32>, size: Vector2<f32>) -> Self {
        Self { origin, size }
    }

    pub fn full(texture_size: Vector2<f32>) -> Self {
        Self::new(Vector2::new(0.0, 0.0), texture_size)
    }

    pub fn uv_min(&self, texture_size: Vector2<f32>) -> [f32; 2] {
        [
            self.origin.x / texture_size.x,
            self.origin.y / texture_size.y,
        ]
    }

    pub fn uv_max(&self, texture_size: Vector2<f32>) -> [f32; 2] {
        [
            (self.origin.x + self.size.x) / texture_size.x,
            (self.origin.y + self.size.y) / texture_size.y,
        ]
    }

    /// Two triangles of a unit quad centered on the origin.
    pub fn vertices(&self, texture_size: Vector2<f32>) -> [Vertex3D; 6] {
        let [u0, v0] = self.uv_min(texture_size);
        let [u1, v1] = self.uv_max(texture_size);
        [
            vertex(-0.5, -0.5, u0, v0),
            vertex(-0.5, 0.5, u0, v1),
            vertex(0.5, -0.5, u1, v0),
            vertex(-0.5, 0.5, u0, v1),
            vertex(0.5, -0.5, u1, v0),
            vertex(0.5, 0.5, u1, v1),
        ]
    }
}

fn vertex(x: f32, y: f32, u: f32, v: f32) -> Vertex3D {
    Vertex3D {
        position: [x, y, 0.0],
        uvs: [u, v],
    }
}

/// Stretches the unit quad along the texture's longer side so a full-texture
/// sprite keeps the image's aspect ratio.
pub fn native_scale(width: u32, height: u32) -> Vector2<f32> {
    if width > height {
        Vector2::new(width as f32 / height as f32, 1.0)
    } else {
        Vector2::new(1.0, height as f32 / width as f32)
    }
}

/// translate(position / world) * rotate_z(rotation) * scale(scale * native * rect / texture)
pub fn model_matrix(
    position: Vector2<f32>,
    world_size: Vector2<f32>,
    rotation: Rad<f32>,
    scale: Vector2<f32>,
    native_scale: Vector2<f32>,
    rect: &TextureRect,
    texture_size: Vector2<f32>,
) -> Matrix4<f32> {
    let translation = Matrix4::from_translation(cgmath::vec3(
        position.x / world_size.x,
        position.y / world_size.y,
        0.0,
    ));
    let rotation = Matrix4::from_angle_z(rotation);
    let scale = Matrix4::from_nonuniform_scale(
        scale.x * native_scale.x * rect.size.x / texture_size.x,
        scale.y * native_scale.y * rect.size.y / texture_size.y,
        0.0,
    );
    translation * rotation * scale
}

/// A textured quad. Borrows its texture and shader program, which must
/// outlive it; owns its vertex and uniform buffers.
pub struct Sprite<'a> {
    texture: &'a Texture,
    program: &'a SpritePipeline,
    rect: TextureRect,
    position: Vector2<f32>,
    rotation: Rad<f32>,
    scale: Vector2<f32>,
    native_scale: Vector2<f32>,
    vertex_buffer: DynamicVertexBuffer,
    uniforms: UniformBuffer<MatrixUniforms>,
}

impl<'a> Sprite<'a> {
    pub fn new(device: &wgpu::Device, texture: &'a Texture, program: &'a SpritePipeline) -> Self {
        let rect = TextureRect::full(texture.size());
        Self {
            texture,
            program,
            rect,
            position: Vector2::new(0.0, 0.0),
            rotation: Rad(0.0),
            scale: Vector2::new(1.0, 1.0),
            native_scale: native_scale(texture.width(), texture.height()),
            vertex_buffer: DynamicVertexBuffer::new(&rect.vertices(texture.size()), device),
            uniforms: UniformBuffer::new(
                MatrixUniforms::default(),
                device,
                &program.uniform_layout,
            ),
        }
    }

    pub fn texture_rect(&self) -> TextureRect {
        self.rect
    }

    pub fn native_scale(&self) -> Vector2<f32> {
        self.native_scale
    }

    pub fn rotation(&self) -> Rad<f32> {
        self.rotation
    }

    pub fn set_rotation(&mut self, rotation: Rad<f32>) {
        self.rotation = rotation;
    }

    pub fn scale(&self) -> Vector2<f32> {
        self.scale
    }

    pub fn set_scale(&mut self, scale: Vector2<f32>) {
        self.scale = scale;
    }
}

impl<'a> Drawable2D for Sprite<'a> {
    // Unchecked: a rect outside the texture samples with repeat wrapping
    fn set_texture_rect(&mut self, origin: Vector2<f32>, size: Vector2<f32>) {
        self.rect = TextureRect::new(origin, size);
    }

    fn set_position(&mut self, position: Vector2<f32>) {
        self.position = position;
    }

    fn position(&self) -> Vector2<f32> {
        self.position
    }
}

impl<'a> Draw for Sprite<'a> {
    fn draw<'p>(
        &'p self,
        ctx: &mut RenderContext<'p>,
        view: &Matrix4<f32>,
        projection: &Matrix4<f32>,
    ) {
        let texture_size = self.texture.size();
        let queue = ctx.queue();

        self.vertex_buffer
            .write(&self.rect.vertices(texture_size), queue);

        let model = model_matrix(
            self.position,
            ctx.world_size(),
            self.rotation,
            self.scale,
            self.native_scale,
            &self.rect,
            texture_size,
        );
        self.uniforms
            .write(&MatrixUniforms::new(model, *view, *projection), queue);

        ctx.set_pipeline(&self.program.pipeline);
        ctx.set_bind_group(TEXTURE_BIND_GROUP, &self.texture.bind_group);
        ctx.set_bind_group(MATRIX_BIND_GROUP, &self.uniforms.bind_group);
        ctx.set_vertex_buffer(&self.vertex_buffer.buffer);
        ctx.draw(0..self.vertex_buffer.size);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{vec2, vec4, SquareMatrix};

    const SHEET: Vector2<f32> = Vector2 {
        x: 1560.0,
        y: 390.0,
    };

    #[test]
    fn test_full_rect_spans_unit_uvs() {
        let rect = TextureRect::full(SHEET);
        assert_eq!(rect.uv_min(SHEET), [0.0, 0.0]);
        assert_eq!(rect.uv_max(SHEET), [1.0, 1.0]);
    }

    #[test]
    fn test_uvs_are_origin_and_extent_over_texture_size() {
        let rect = TextureRect::new(vec2(624.0, 0.0), vec2(312.0, 390.0));
        assert_eq!(rect.uv_min(SHEET), [624.0 / 1560.0, 0.0]);
        assert_eq!(rect.uv_max(SHEET), [936.0 / 1560.0, 1.0]);
    }

    #[test]
    fn test_vertices_are_stable_across_repeated_calls() {
        let rect = TextureRect::new(vec2(936.0, 0.0), vec2(312.0, 390.0));
        let first = rect.vertices(SHEET);
        for _ in 0..1000 {
            assert_eq!(rect.vertices(SHEET), first);
        }
    }

    #[test]
    fn test_vertex_layout_of_quad() {
        let rect = TextureRect::new(vec2(312.0, 0.0), vec2(312.0, 390.0));
        let v = rect.vertices(SHEET);
        let (u0, u1) = (312.0 / 1560.0, 624.0 / 1560.0);
        assert_eq!(v[0], vertex(-0.5, -0.5, u0, 0.0));
        assert_eq!(v[1], vertex(-0.5, 0.5, u0, 1.0));
        assert_eq!(v[2], vertex(0.5, -0.5, u1, 0.0));
        assert_eq!(v[3], v[1]);
        assert_eq!(v[4], v[2]);
        assert_eq!(v[5], vertex(0.5, 0.5, u1, 1.0));
    }

    #[test]
    fn test_native_scale_follows_longer_side() {
        assert_eq!(native_scale(1560, 390), vec2(4.0, 1.0));
        assert_eq!(native_scale(100, 400), vec2(1.0, 4.0));
        assert_eq!(native_scale(64, 64), vec2(1.0, 1.0));
    }

    #[test]
    fn test_model_matrix_identity_transform() {
        let rect = TextureRect::full(vec2(64.0, 64.0));
        let model = model_matrix(
            vec2(0.0, 0.0),
            vec2(1920.0, 1080.0),
            Rad(0.0),
            vec2(1.0, 1.0),
            vec2(1.0, 1.0),
            &rect,
            vec2(64.0, 64.0),
        );
        let mut expected = Matrix4::identity();
        expected.z.z = 0.0;
        assert_eq!(model, expected);
    }

    #[test]
    fn test_model_matrix_scales_by_cell_and_translates_by_world() {
        let rect = TextureRect::new(vec2(0.0, 0.0), vec2(390.0, 390.0));
        let model = model_matrix(
            vec2(960.0, -540.0),
            vec2(1920.0, 1080.0),
            Rad(0.0),
            vec2(1.0, 1.0),
            native_scale(1560, 390),
            &rect,
            SHEET,
        );
        // corner of the unit quad
        let corner = model * vec4(0.5, 0.5, 0.0, 1.0);
        assert!((corner.x - (0.5 + 0.5 * 4.0 * 0.25)).abs() < 1e-6);
        assert!((corner.y - (-0.5 + 0.5)).abs() < 1e-6);
        assert_eq!(corner.z, 0.0);
    }

    #[test]
    fn test_model_matrix_rotates_about_z() {
        let rect = TextureRect::full(vec2(10.0, 10.0));
        let model = model_matrix(
            vec2(0.0, 0.0),
            vec2(1.0, 1.0),
            Rad(std::f32::consts::FRAC_PI_2),
            vec2(1.0, 1.0),
            vec2(1.0, 1.0),
            &rect,
            vec2(10.0, 10.0),
        );
        let p = model * vec4(0.5, 0.0, 0.0, 1.0);
        assert!(p.x.abs() < 1e-6);
        assert!((p.y - 0.5).abs() < 1e-6);
    }
}
