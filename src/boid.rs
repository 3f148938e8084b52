/*
 * Boid Module
 *
 * This module defines the Boid struct and its behavior.
 * Each boid steers by combining weighted forces:
 * 1. Separation: Avoid crowding neighbors
 * 2. Alignment: Steer towards the average heading of neighbors
 * 3. Cohesion: Steer towards the average position of neighbors
 * 4. Boundary avoidance: Per-axis push back into the containment box
 * 5. Swirl: Optional coherent-noise turbulence
 *
 * A boid only ever reads the pre-step snapshot of its neighbors and only
 * mutates its own state, so force computation can run for many boids
 * concurrently.
 */

use glam::Vec3;
use rand::Rng;

use crate::params::{BoundaryPolicy, SeparationMode, SimulationParams};
use crate::swirl::SwirlField;

// Velocity damping factor applied on the excursion axis under the Hard
// boundary policy.
const BOUNDARY_REFLECTION: f32 = 0.8;

// Read-only view of another boid, captured before any boid in the step has
// moved. Force computation sees only these.
#[derive(Debug, Clone, Copy)]
pub struct BoidView {
    pub position: Vec3,
    pub velocity: Vec3,
}

// The named steering contributions for one boid and one step, unweighted.
// Weights are applied when the forces are folded into the velocity, so a
// debug observer sees each raw term.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SteeringForces {
    pub separation: Vec3,
    pub alignment: Vec3,
    pub cohesion: Vec3,
    pub boundary: Vec3,
    pub swirl: Vec3,
}

#[derive(Debug, Clone)]
pub struct Boid {
    pub position: Vec3,
    pub velocity: Vec3,
    // Unit heading derived from velocity. Kept at its last value while the
    // velocity is near zero, so a stalled boid never faces an undefined
    // direction.
    pub orientation: Vec3,
    // Random phase offsetting this boid's swirl sampling so the flock does
    // not move in lockstep.
    pub swirl_phase: f32,
    pub max_speed: f32,
    pub min_speed: f32,
    pub perception_radius: f32,
    pub separation_radius: f32,
    pub separation_weight: f32,
    pub alignment_weight: f32,
    pub cohesion_weight: f32,
    pub avoidance_weight: f32,
    pub swirl_strength: f32,
    pub swirl_frequency: f32,
    pub boundary_box: Vec3,
    pub boundary_force: f32,
    pub separation_mode: SeparationMode,
    pub boundary_policy: BoundaryPolicy,
}

impl Boid {
    pub fn new(position: Vec3, params: &SimulationParams, rng: &mut impl Rng) -> Self {
        // Random initial heading at full speed. Resample the rare degenerate
        // draw near the origin instead of normalizing garbage.
        let velocity = loop {
            let v = Vec3::new(
                rng.gen_range(-1.0..=1.0),
                rng.gen_range(-1.0..=1.0),
                rng.gen_range(-1.0..=1.0),
            );
            if v.length_squared() > 1e-6 {
                break v.normalize() * params.max_speed;
            }
        };

        Self {
            position,
            velocity,
            orientation: velocity / params.max_speed,
            swirl_phase: rng.gen_range(0.0..1024.0),
            max_speed: params.max_speed,
            min_speed: params.min_speed,
            perception_radius: params.perception_radius,
            separation_radius: params.separation_radius,
            separation_weight: params.separation_weight,
            alignment_weight: params.alignment_weight,
            cohesion_weight: params.cohesion_weight,
            avoidance_weight: params.avoidance_weight,
            swirl_strength: params.swirl_strength,
            swirl_frequency: params.swirl_frequency,
            boundary_box: params.boundary_box,
            boundary_force: params.boundary_force,
            separation_mode: params.separation_mode,
            boundary_policy: params.boundary_policy,
        }
    }

    // Compute all steering contributions against the pre-step snapshot.
    // With no neighbors in perception range, only the boundary force applies.
    pub fn compute_forces(
        &self,
        neighbors: &[BoidView],
        center: Vec3,
        elapsed: f32,
        swirl: &SwirlField,
    ) -> SteeringForces {
        let boundary = self.boundary_avoidance(center);

        if neighbors.is_empty() {
            return SteeringForces {
                boundary,
                ..SteeringForces::default()
            };
        }

        SteeringForces {
            separation: self.separation(neighbors),
            alignment: self.alignment(neighbors),
            cohesion: self.cohesion(neighbors),
            boundary,
            swirl: self.swirl(elapsed, swirl),
        }
    }

    // Calculate separation force (avoid crowding neighbors)
    fn separation(&self, neighbors: &[BoidView]) -> Vec3 {
        let mut steering = Vec3::ZERO;

        for other in neighbors {
            let diff = self.position - other.position;
            let d = diff.length();

            // Coincident neighbors are skipped rather than dividing by zero
            if d > 0.0 && d < self.separation_radius {
                // Weight by distance: the unit direction away from the
                // neighbor scaled by 1/d, so closer boids push harder
                steering += diff / (d * d);
            }
        }

        match self.separation_mode {
            SeparationMode::DistanceWeighted => steering,
            SeparationMode::Normalized => steering.normalize_or_zero(),
        }
    }

    // Calculate alignment force (steer towards average heading of neighbors)
    fn alignment(&self, neighbors: &[BoidView]) -> Vec3 {
        let mut average_velocity = Vec3::ZERO;

        for other in neighbors {
            average_velocity += other.velocity;
        }
        average_velocity /= neighbors.len() as f32;

        average_velocity - self.velocity
    }

    // Calculate cohesion force (steer towards average position of neighbors)
    fn cohesion(&self, neighbors: &[BoidView]) -> Vec3 {
        let mut centroid = Vec3::ZERO;

        for other in neighbors {
            centroid += other.position;
        }
        centroid /= neighbors.len() as f32;

        centroid - self.position
    }

    // Calculate the per-axis push back towards the containment box. Each axis
    // is handled independently; axes within bounds contribute nothing.
    fn boundary_avoidance(&self, center: Vec3) -> Vec3 {
        let relative = self.position - center;
        let mut force = Vec3::ZERO;

        for axis in 0..3 {
            if relative[axis].abs() > self.boundary_box[axis] {
                force[axis] = -relative[axis].signum() * self.boundary_force;
            }
        }

        force
    }

    fn swirl(&self, elapsed: f32, field: &SwirlField) -> Vec3 {
        if self.swirl_strength == 0.0 {
            return Vec3::ZERO;
        }
        field.sample(elapsed * self.swirl_frequency + self.swirl_phase)
    }

    // The combined steering step: compute forces against the snapshot, then
    // fold them into the velocity. Returns the computed forces so a caller
    // can forward them to a diagnostics observer.
    pub fn update(
        &mut self,
        neighbors: &[BoidView],
        delta_time: f32,
        center: Vec3,
        elapsed: f32,
        swirl: &SwirlField,
    ) -> SteeringForces {
        let forces = self.compute_forces(neighbors, center, elapsed, swirl);
        self.steer(&forces, delta_time);
        forces
    }

    // Fold the weighted forces into the velocity and enforce the speed
    // limits. Velocity magnitude never exceeds max_speed afterwards; a boid
    // that has slowed below min_speed is boosted along its current heading,
    // never turned.
    pub fn steer(&mut self, forces: &SteeringForces, delta_time: f32) {
        let combined = forces.separation * self.separation_weight
            + forces.alignment * self.alignment_weight
            + forces.cohesion * self.cohesion_weight
            + forces.boundary * self.avoidance_weight
            + forces.swirl * self.swirl_strength;

        self.velocity += combined * delta_time;

        // Under the Hard policy an excursion also bounces: the velocity
        // component still moving outward is flipped and dampened. Inward
        // components are left alone so a returning boid is not re-ejected.
        if self.boundary_policy == BoundaryPolicy::Hard {
            for axis in 0..3 {
                let push = forces.boundary[axis];
                if push != 0.0 && self.velocity[axis] * push < 0.0 {
                    self.velocity[axis] = -self.velocity[axis] * BOUNDARY_REFLECTION;
                }
            }
        }

        // Limit speed
        self.velocity = self.velocity.clamp_length_max(self.max_speed);

        // Restore the minimum speed without changing direction. An exactly
        // stalled boid has no direction to boost along and stays put.
        let speed = self.velocity.length();
        if speed > f32::EPSILON && speed < self.min_speed {
            self.velocity *= self.min_speed / speed;
        }
    }

    // Advance the position along the current velocity. Unconditional, no
    // failure mode; a zero delta_time leaves the boid exactly where it was.
    pub fn integrate(&mut self, delta_time: f32) {
        self.position += self.velocity * delta_time;

        if let Some(heading) = self.velocity.try_normalize() {
            self.orientation = heading;
        }
    }
}
