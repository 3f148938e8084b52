/*
 * Simulation Parameters Module
 *
 * This module defines the SimulationParams struct that contains all the
 * adjustable parameters for the flocking simulation, the policy enums for the
 * separation and boundary behaviors, and construction-time validation. All
 * parameters are independently tunable; no invariant relates the weights to
 * each other.
 */

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// Rejected parameter combinations. Misconfiguration is caught when the flock
// is built, never silently turned into wrong motion.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("max_speed must be positive and finite, got {0}")]
    InvalidMaxSpeed(f32),
    #[error("min_speed must lie in [0, max_speed], got {min} with max_speed {max}")]
    InvalidMinSpeed { min: f32, max: f32 },
    #[error("perception_radius must be positive, got {0}")]
    InvalidPerceptionRadius(f32),
    #[error("separation_radius must be positive, got {0}")]
    InvalidSeparationRadius(f32),
    #[error("boundary_force must be non-negative, got {0}")]
    InvalidBoundaryForce(f32),
    #[error("spawn_bounds components must be non-negative, got {0}")]
    InvalidSpawnBounds(Vec3),
    #[error("boundary_box components must be non-negative, got {0}")]
    InvalidBoundaryBox(Vec3),
}

// How the accumulated separation steering is finished. The distance-weighted
// sum is the default; normalizing the sum is an earlier, simpler variant kept
// as an explicit policy rather than an accident of history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SeparationMode {
    #[default]
    DistanceWeighted,
    Normalized,
}

// How an out-of-bounds boid is brought back. Soft relies purely on the
// weighted push force curving the path back; Hard additionally reflects and
// dampens the outward velocity component, producing a bounce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BoundaryPolicy {
    #[default]
    Soft,
    Hard,
}

// Parameters for the simulation. Everything is fixed at spawn time and copied
// into each boid; the controller never reaches into a live boid to retune it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationParams {
    pub boid_count: usize,
    pub max_speed: f32,
    // Boids slower than this are boosted back along their own heading so the
    // flock never stalls. Zero disables the boost.
    pub min_speed: f32,
    pub perception_radius: f32,
    // Short-range cutoff for the separation force, well inside the
    // perception radius.
    pub separation_radius: f32,
    pub separation_weight: f32,
    pub alignment_weight: f32,
    pub cohesion_weight: f32,
    pub avoidance_weight: f32,
    pub swirl_strength: f32,
    pub swirl_frequency: f32,
    // Per-axis half-extents around the controller's center.
    pub spawn_bounds: Vec3,
    pub boundary_box: Vec3,
    pub boundary_force: f32,
    pub separation_mode: SeparationMode,
    pub boundary_policy: BoundaryPolicy,
    // Performance settings
    pub parallel: bool,
    // Fixed seed for spawn positions and swirl phases; None draws from
    // entropy.
    pub rng_seed: Option<u64>,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            boid_count: 100,
            max_speed: 350.0,
            min_speed: 100.0,
            perception_radius: 1000.0,
            separation_radius: 500.0,
            separation_weight: 1.2,
            alignment_weight: 1.5,
            cohesion_weight: 1.3,
            avoidance_weight: 2.5,
            swirl_strength: 0.0,
            swirl_frequency: 0.5,
            spawn_bounds: Vec3::new(1000.0, 1000.0, 1000.0),
            boundary_box: Vec3::new(1500.0, 1500.0, 1500.0),
            boundary_force: 600.0,
            separation_mode: SeparationMode::default(),
            boundary_policy: BoundaryPolicy::default(),
            parallel: true,
            rng_seed: None,
        }
    }
}

impl SimulationParams {
    // Check the parameter set before any boid is built from it.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.max_speed.is_finite() || self.max_speed <= 0.0 {
            return Err(ConfigError::InvalidMaxSpeed(self.max_speed));
        }
        if !(0.0..=self.max_speed).contains(&self.min_speed) {
            return Err(ConfigError::InvalidMinSpeed {
                min: self.min_speed,
                max: self.max_speed,
            });
        }
        if self.perception_radius <= 0.0 {
            return Err(ConfigError::InvalidPerceptionRadius(self.perception_radius));
        }
        if self.separation_radius <= 0.0 {
            return Err(ConfigError::InvalidSeparationRadius(self.separation_radius));
        }
        if self.boundary_force < 0.0 {
            return Err(ConfigError::InvalidBoundaryForce(self.boundary_force));
        }
        if self.spawn_bounds.min_element() < 0.0 {
            return Err(ConfigError::InvalidSpawnBounds(self.spawn_bounds));
        }
        if self.boundary_box.min_element() < 0.0 {
            return Err(ConfigError::InvalidBoundaryBox(self.boundary_box));
        }
        Ok(())
    }
}
