use anyhow::{anyhow, Result};
use std::path::PathBuf;

use crate::{constants::*, datboi::Bounce, sprite_sheet::SheetLayout};

/// Everything the demo used to hard-code. The defaults reproduce the
/// original fullscreen 1920x1080 run of `datboi.png`.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub screen_size: (u32, u32),
    pub title: String,
    pub fullscreen: bool,
    pub asset_path: PathBuf,
    pub sheet: SheetLayout,
    pub bounce: Bounce,
    pub fixed_step: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            screen_size: (DEFAULT_SCREEN_WIDTH, DEFAULT_SCREEN_HEIGHT),
            title: DEFAULT_WINDOW_TITLE.to_owned(),
            fullscreen: true,
            asset_path: PathBuf::from(DEFAULT_ASSET_PATH),
            sheet: SheetLayout::default(),
            bounce: Bounce::default(),
            fixed_step: DEFAULT_FIXED_STEP,
        }
    }
}

impl Config {
    /// Rejects settings the loop cannot run with.
    pub fn validate(&self) -> Result<()> {
        if !(self.fixed_step.is_finite() && self.fixed_step > 0.0) {
            return Err(anyhow!(
                "fixed step must be a positive number of seconds, got {}",
                self.fixed_step
            ));
        }
        if self.screen_size.0 == 0 || self.screen_size.1 == 0 {
            return Err(anyhow!(
                "screen size must be non-zero, got {}x{}",
                self.screen_size.0,
                self.screen_size.1
            ));
        }
        Ok(())
    }

    pub fn aspect(&self) -> f32 {
        self.screen_size.0 as f32 / self.screen_size.1 as f32
    }

    pub fn screen_size_f32(&self) -> cgmath::Vector2<f32> {
        cgmath::Vector2::new(self.screen_size.0 as f32, self.screen_size.1 as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_original_literals() {
        let config = Config::default();
        assert_eq!(config.screen_size, (1920, 1080));
        assert_eq!(config.asset_path, PathBuf::from("datboi.png"));
        assert!(config.fullscreen);
        assert_eq!(config.bounce.bound_x, 3300.0);
        assert_eq!(config.bounce.bound_y, 700.0);
        assert_eq!(config.sheet.frames, 4);
    }

    #[test]
    fn test_aspect() {
        let config = Config::default();
        assert!((config.aspect() - 1920.0 / 1080.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_validate_accepts_defaults() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_non_positive_step() {
        for step in &[0.0, -1.0 / 60.0, f32::NAN] {
            let config = Config {
                fixed_step: *step,
                ..Config::default()
            };
            assert!(config.validate().is_err(), "accepted step {}", step);
        }
    }

    #[test]
    fn test_validate_rejects_empty_screen() {
        let config = Config {
            screen_size: (1920, 0),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }
}
