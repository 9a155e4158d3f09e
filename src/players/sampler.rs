use std::collections::VecDeque;

use glam::Vec2;

/// Pointer samples kept for estimating throw momentum.
pub const NUM_SAMPLES: usize = 200;

/// Ring buffer of timestamped pointer positions.
#[derive(Debug, Clone)]
pub struct MomentumSampler {
    samples: VecDeque<(f32, Vec2)>,
}

impl MomentumSampler {
    pub fn new() -> Self {
        MomentumSampler {
            samples: VecDeque::with_capacity(NUM_SAMPLES),
        }
    }

    pub fn add(&mut self, position: Vec2, time: f32) {
        if self.samples.len() == NUM_SAMPLES {
            self.samples.pop_front();
        }
        self.samples.push_back((time, position));
    }

    pub fn reset(&mut self) {
        self.samples.clear();
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Oldest and newest sample with the time between them, if it is positive.
    fn span(&self) -> Option<((f32, Vec2), (f32, Vec2), f32)> {
        let first = *self.samples.front()?;
        let last = *self.samples.back()?;
        let elapsed = last.0 - first.0;
        (self.samples.len() >= 2 && elapsed > 0.0).then_some((first, last, elapsed))
    }

    /// Average pointer velocity across the buffer.
    pub fn velocity(&self) -> Vec2 {
        match self.span() {
            Some(((_, first), (_, last), elapsed)) => (last - first) * (1.0 / elapsed),
            None => Vec2::ZERO,
        }
    }

    /// Degrees per second the pointer swept around `pivot`.
    pub fn angular_velocity(&self, pivot: Vec2) -> f32 {
        let Some(((_, first), (_, last), elapsed)) = self.span() else {
            return 0.0;
        };
        let from = first - pivot;
        let to = last - pivot;
        delta_angle(
            from.y.atan2(from.x).to_degrees(),
            to.y.atan2(to.x).to_degrees(),
        ) / elapsed
    }
}

impl Default for MomentumSampler {
    fn default() -> Self {
        Self::new()
    }
}

/// Shortest signed difference between two angles in degrees.
fn delta_angle(from: f32, to: f32) -> f32 {
    (to - from + 180.0).rem_euclid(360.0) - 180.0
}
