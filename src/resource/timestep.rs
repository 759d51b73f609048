/// Fixed-step accumulator: wall-clock deltas go in, whole simulation
/// steps come out, and the remainder carries over to the next frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedTimestep {
    step: f32,
    accumulator: f32,
}

impl FixedTimestep {
    pub fn new(step: f32) -> Self {
        assert!(step > 0.0, "fixed step must be positive, got {}", step);
        Self {
            step,
            accumulator: 0.0,
        }
    }

    pub fn step(&self) -> f32 {
        self.step
    }

    /// Time carried over that has not yet been simulated; always in `[0, step)`
    /// after `advance` returns.
    pub fn leftover(&self) -> f32 {
        self.accumulator
    }

    /// Adds `dt` seconds and runs `update` once per whole step available.
    /// Returns the number of steps run.
    pub fn advance<F: FnMut(f32)>(&mut self, dt: f32, mut update: F) -> u32 {
        self.accumulator += dt.max(0.0);
        let mut steps = 0;
        while self.accumulator >= self.step {
            self.accumulator -= self.step;
            update(self.step);
            steps += 1;
        }
        steps
    }
}
