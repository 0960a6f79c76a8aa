use std::f32::consts::TAU;
use tidewatch_common::lerp;

/// Timer counting down from a reset value to zero. Starts finished.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CountdownTimer {
    reset_value: f32,
    current: f32,
}

impl CountdownTimer {
    pub fn new(reset_value: f32) -> Self {
        Self {
            reset_value,
            current: 0.0,
        }
    }

    /// Restart from the reset value.
    pub fn reset(&mut self) {
        self.current = self.reset_value;
    }

    pub fn update(&mut self, dt: f32) {
        self.current = (self.current - dt).max(0.0);
    }

    pub fn is_done(&self) -> bool {
        self.current <= 0.0
    }

    pub fn current_value(&self) -> f32 {
        self.current
    }

    pub fn reset_value(&self) -> f32 {
        self.reset_value
    }

    /// Remaining fraction: 1 right after a reset, 0 when done.
    pub fn remaining_fraction(&self) -> f32 {
        if self.reset_value > 0.0 {
            self.current / self.reset_value
        } else {
            0.0
        }
    }
}

/// Radar ping state: how visible the pinged markers are, and where the
/// sweeping radar line points.
///
/// After a ping, visibility ramps 0 -> 1 over the first half of the timer and
/// back to 0 over the second half.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadarSweep {
    timer: CountdownTimer,
    visibility: f32,
    line_rotation: f32,
    line_speed: f32,
}

impl RadarSweep {
    pub fn new(duration: f32, line_speed: f32) -> Self {
        Self {
            timer: CountdownTimer::new(duration),
            visibility: 1.0,
            line_rotation: 0.0,
            line_speed,
        }
    }

    pub fn ping(&mut self) {
        self.timer.reset();
        self.visibility = 0.0;
    }

    pub fn update(&mut self, dt: f32) {
        if !self.timer.is_done() {
            self.timer.update(dt);
            let t = self.timer.remaining_fraction();
            self.visibility = if self.timer.is_done() {
                0.0
            } else if t > 0.5 {
                lerp(2.0, 0.0, t)
            } else {
                lerp(0.0, 2.0, t)
            };
        }
        self.line_rotation = (self.line_rotation + self.line_speed * dt).rem_euclid(TAU);
    }

    pub fn is_active(&self) -> bool {
        !self.timer.is_done()
    }

    /// Opacity scalar applied to pinged markers.
    pub fn visibility(&self) -> f32 {
        self.visibility
    }

    pub fn line_rotation(&self) -> f32 {
        self.line_rotation
    }

    pub fn timer(&self) -> &CountdownTimer {
        &self.timer
    }
}
