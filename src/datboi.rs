use cgmath::{Matrix4, Vector2};

use crate::{
    constants::{DEFAULT_BOUND_X, DEFAULT_BOUND_Y, DEFAULT_SPEED_X, DEFAULT_SPEED_Y},
    render::{Draw, RenderContext},
    sprite::Drawable2D,
    sprite_sheet::SpriteSheet,
};

/// Symmetric world bounds and the speed the sprite is sent back in with
/// once it crosses one.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounce {
    pub bound_x: f32,
    pub bound_y: f32,
    pub speed_x: f32,
    pub speed_y: f32,
}

impl Default for Bounce {
    fn default() -> Self {
        Self {
            bound_x: DEFAULT_BOUND_X,
            bound_y: DEFAULT_BOUND_Y,
            speed_x: DEFAULT_SPEED_X,
            speed_y: DEFAULT_SPEED_Y,
        }
    }
}

impl Bounce {
    pub fn initial_velocity(&self) -> Vector2<f32> {
        Vector2::new(self.speed_x, self.speed_y)
    }

    /// Points each velocity component back inside the bounds. Axes are
    /// independent, and a crossing snaps the component to the fixed speed
    /// rather than mirroring it.
    pub fn reflect(&self, position: Vector2<f32>, velocity: &mut Vector2<f32>) {
        if position.x < -self.bound_x {
            velocity.x = self.speed_x;
        }
        if position.x > self.bound_x {
            velocity.x = -self.speed_x;
        }
        if position.y < -self.bound_y {
            velocity.y = self.speed_y;
        }
        if position.y > self.bound_y {
            velocity.y = -self.speed_y;
        }
    }
}

/// The animated sprite sheet bouncing around the screen.
pub struct DatBoi<S: Drawable2D> {
    sheet: SpriteSheet<S>,
    velocity: Vector2<f32>,
    bounce: Bounce,
}

impl<S: Drawable2D> DatBoi<S> {
    pub fn new(sheet: SpriteSheet<S>) -> Self {
        Self::with_bounce(sheet, Bounce::default())
    }

    pub fn with_bounce(mut sheet: SpriteSheet<S>, bounce: Bounce) -> Self {
        sheet.set_position(Vector2::new(0.0, 0.0));
        Self {
            sheet,
            velocity: bounce.initial_velocity(),
            bounce,
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.sheet.update(dt);
        let position = self.sheet.position() + self.velocity * dt;
        self.sheet.set_position(position);
        self.bounce.reflect(position, &mut self.velocity);
    }

    pub fn velocity(&self) -> Vector2<f32> {
        self.velocity
    }

    pub fn set_velocity(&mut self, velocity: Vector2<f32>) {
        self.velocity = velocity;
    }

    pub fn position(&self) -> Vector2<f32> {
        self.sheet.position()
    }

    pub fn sheet(&self) -> &SpriteSheet<S> {
        &self.sheet
    }

    pub fn sheet_mut(&mut self) -> &mut SpriteSheet<S> {
        &mut self.sheet
    }
}

impl<S: Drawable2D> Draw for DatBoi<S> {
    fn draw<'p>(
        &'p self,
        ctx: &mut RenderContext<'p>,
        view: &Matrix4<f32>,
        projection: &Matrix4<f32>,
    ) {
        self.sheet.draw(ctx, view, projection);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sprite_sheet::tests::FakeSprite;
    use cgmath::vec2;

    const DT: f32 = 1.0 / 60.0;

    fn datboi() -> DatBoi<FakeSprite> {
        let mut sprite = FakeSprite::new();
        sprite.set_position(vec2(55.0, 55.0));
        DatBoi::new(SpriteSheet::new(
            sprite,
            vec2(312.0, 390.0),
            vec2(0.0, 0.0),
            4,
            0.1,
        ))
    }

    fn placed_at(position: Vector2<f32>, velocity: Vector2<f32>) -> DatBoi<FakeSprite> {
        let mut datboi = datboi();
        datboi.sheet_mut().set_position(position);
        datboi.set_velocity(velocity);
        datboi
    }

    #[test]
    fn test_new_resets_position_and_velocity() {
        let datboi = datboi();
        assert_eq!(datboi.position(), vec2(0.0, 0.0));
        assert_eq!(datboi.velocity(), vec2(400.0, 560.0));
    }

    #[test]
    fn test_update_translates_by_velocity() {
        let mut datboi = datboi();
        datboi.update(0.5);
        assert_eq!(datboi.position(), vec2(200.0, 280.0));
    }

    #[test]
    fn test_update_advances_animation() {
        let mut datboi = datboi();
        datboi.update(0.1);
        assert_eq!(datboi.sheet().current_frame(), 1);
    }

    #[test]
    fn test_left_bound_sends_right_regardless_of_sign() {
        for vx in &[-400.0, 400.0, -10.0] {
            let mut datboi = placed_at(vec2(-3400.0, 0.0), vec2(*vx, 0.0));
            datboi.update(DT);
            assert_eq!(datboi.velocity().x, 400.0);
        }
    }

    #[test]
    fn test_right_bound_sends_left() {
        for vx in &[-400.0, 400.0] {
            let mut datboi = placed_at(vec2(3400.0, 0.0), vec2(*vx, 0.0));
            datboi.update(DT);
            assert_eq!(datboi.velocity().x, -400.0);
        }
    }

    #[test]
    fn test_bottom_bound_sends_up() {
        for vy in &[-560.0, 560.0] {
            let mut datboi = placed_at(vec2(0.0, -800.0), vec2(0.0, *vy));
            datboi.update(DT);
            assert_eq!(datboi.velocity().y, 560.0);
        }
    }

    #[test]
    fn test_top_bound_sends_down() {
        for vy in &[-560.0, 560.0] {
            let mut datboi = placed_at(vec2(0.0, 800.0), vec2(0.0, *vy));
            datboi.update(DT);
            assert_eq!(datboi.velocity().y, -560.0);
        }
    }

    #[test]
    fn test_repeated_crossings_keep_fixed_speed() {
        let mut datboi = placed_at(vec2(5000.0, 0.0), vec2(400.0, 0.0));
        for _ in 0..3 {
            datboi.update(DT);
            assert_eq!(datboi.velocity().x, -400.0);
        }
    }

    #[test]
    fn test_inside_bounds_velocity_unchanged() {
        let mut datboi = datboi();
        datboi.update(DT);
        assert_eq!(datboi.velocity(), vec2(400.0, 560.0));
    }

    #[test]
    fn test_reaches_left_bound_only_moving_left_then_turns() {
        let mut datboi = datboi();
        let mut previous_x = datboi.position().x;
        let mut crossed = false;
        for _ in 0..(60 * 60) {
            let velocity_before = datboi.velocity();
            datboi.update(DT);
            let x = datboi.position().x;
            if x < -3300.0 && !crossed {
                assert!(velocity_before.x < 0.0);
                assert!(x < previous_x);
                assert_eq!(datboi.velocity().x, 400.0);
                crossed = true;
                datboi.update(DT);
                assert!(datboi.position().x > x);
                break;
            }
            previous_x = x;
        }
        assert!(crossed, "never reached the left bound");
    }

    #[test]
    fn test_stays_near_bounds_over_long_run() {
        let mut datboi = datboi();
        for _ in 0..(60 * 120) {
            datboi.update(DT);
            let p = datboi.position();
            assert!(p.x.abs() <= 3300.0 + 400.0 * DT + 1e-3);
            assert!(p.y.abs() <= 700.0 + 560.0 * DT + 1e-3);
        }
    }
}
