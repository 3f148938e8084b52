/*
 * Swirl Module
 *
 * This module defines the SwirlField, a smoothly time-varying pseudo-random
 * vector field used as an additive turbulence force. Three channels of
 * coherent noise are sampled along the time axis, one per spatial axis, so
 * the resulting vector drifts smoothly and has no net directional bias.
 *
 * The field is owned by the controller and sampled with an explicit elapsed
 * time; there is no hidden process-wide clock, so simulations can be reset or
 * run concurrently.
 */

use glam::Vec3;
use libnoise::{Generator, ImprovedPerlin, Source};

// Offsets separating the three noise channels along the second axis. Any
// spacing larger than the noise feature size keeps the channels decorrelated.
const CHANNEL_Y: f64 = 19.7;
const CHANNEL_Z: f64 = 43.3;

pub struct SwirlField {
    noise: ImprovedPerlin<2>,
}

impl SwirlField {
    pub fn new(seed: u64) -> Self {
        Self {
            noise: Source::improved_perlin(seed),
        }
    }

    // Sample the field at a point along the time axis. Callers fold their own
    // frequency scaling and per-agent phase into `t`; each component lies in
    // [-1, 1].
    pub fn sample(&self, t: f32) -> Vec3 {
        let t = f64::from(t);
        Vec3::new(
            self.noise.sample([t, 0.0]) as f32,
            self.noise.sample([t, CHANNEL_Y]) as f32,
            self.noise.sample([t, CHANNEL_Z]) as f32,
        )
    }
}
