/*
 * Flock Module
 *
 * This module defines the Flock, the population controller for the
 * simulation. It owns the set of live boids in a generational arena, builds
 * each boid's neighbor snapshot every step, and drives the per-boid update.
 *
 * Every step runs in two phases:
 * - Force phase: all neighbor views are captured before any boid moves, then
 *   each boid's steering forces are computed against that snapshot only (in
 *   parallel when enabled). No boid ever reads a sibling's mid-step state,
 *   so iteration order cannot affect the result.
 * - Apply phase: forces are folded into each boid sequentially, observer
 *   callbacks fire, and positions integrate. Ids that stopped resolving are
 *   silently skipped.
 */

use glam::Vec3;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use slotmap::{new_key_type, SlotMap};
use tracing::{debug, warn};

use crate::boid::{Boid, BoidView, SteeringForces};
use crate::observer::{FlockObserver, SteeringKind};
use crate::params::{ConfigError, SimulationParams};
use crate::swirl::SwirlField;

new_key_type! {
    // Stable generational handle for a boid. A removed boid's id never
    // resolves again, even if its slot is reused.
    pub struct BoidId;
}

pub struct Flock {
    boids: SlotMap<BoidId, Boid>,
    params: SimulationParams,
    // Reference point for spawn placement and boundary containment.
    center: Vec3,
    swirl: SwirlField,
    // Simulation clock advanced by step(); drives the swirl field.
    elapsed: f32,
    rng: SmallRng,
    observer: Option<Box<dyn FlockObserver + Send>>,
}

impl Flock {
    pub fn new(center: Vec3, params: SimulationParams) -> Result<Self, ConfigError> {
        params.validate()?;

        let mut rng = match params.rng_seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        let swirl = SwirlField::new(rng.gen());

        Ok(Self {
            boids: SlotMap::with_key(),
            params,
            center,
            swirl,
            elapsed: 0.0,
            rng,
            observer: None,
        })
    }

    // Replace the population with a fresh one: boid_count boids at uniformly
    // random positions within the spawn bounds around the center. Calling
    // this again resets the flock.
    pub fn spawn(&mut self) {
        self.boids.clear();

        for _ in 0..self.params.boid_count {
            let bounds = self.params.spawn_bounds;
            let offset = Vec3::new(
                self.rng.gen_range(-bounds.x..=bounds.x),
                self.rng.gen_range(-bounds.y..=bounds.y),
                self.rng.gen_range(-bounds.z..=bounds.z),
            );
            let boid = Boid::new(self.center + offset, &self.params, &mut self.rng);
            self.boids.insert(boid);
        }

        debug!(count = self.boids.len(), "spawned flock");
    }

    // Add a single boid, e.g. one constructed at an exact position.
    pub fn insert(&mut self, boid: Boid) -> BoidId {
        self.boids.insert(boid)
    }

    // Remove a boid from the population. Stale ids are tolerated.
    pub fn remove(&mut self, id: BoidId) -> Option<Boid> {
        self.boids.remove(id)
    }

    // Advance the simulation by one step. Exclusive access to the population
    // for the whole step; membership changes cannot interleave with it.
    pub fn step(&mut self, delta_time: f32) {
        if delta_time <= 0.0 {
            // Zero is a legitimate no-op; negative input is a caller bug.
            if delta_time < 0.0 {
                warn!(delta_time, "ignoring step with negative delta time");
            }
            return;
        }
        self.elapsed += delta_time;

        // Snapshot every live boid before anything moves.
        let views: Vec<(BoidId, BoidView)> = self
            .boids
            .iter()
            .map(|(id, boid)| {
                (
                    id,
                    BoidView {
                        position: boid.position,
                        velocity: boid.velocity,
                    },
                )
            })
            .collect();

        let boids = &self.boids;
        let swirl = &self.swirl;
        let center = self.center;
        let elapsed = self.elapsed;

        // Brute-force neighbor scan: every other snapshotted boid strictly
        // within this boid's perception radius, in no particular order.
        let compute = |&(id, view): &(BoidId, BoidView)| -> Option<(BoidId, SteeringForces)> {
            let boid = boids.get(id)?;
            let neighbors: Vec<BoidView> = views
                .iter()
                .filter(|&&(other_id, other)| {
                    other_id != id && other.position.distance(view.position) < boid.perception_radius
                })
                .map(|&(_, other)| other)
                .collect();
            Some((id, boid.compute_forces(&neighbors, center, elapsed, swirl)))
        };

        let forces: Vec<(BoidId, SteeringForces)> = if self.params.parallel {
            views.par_iter().filter_map(compute).collect()
        } else {
            views.iter().filter_map(compute).collect()
        };

        // Apply phase: each boid mutates only itself. A boid that vanished
        // since the snapshot simply no longer participates this step.
        for (id, forces) in forces {
            let Some(boid) = self.boids.get_mut(id) else {
                continue;
            };

            if let Some(observer) = self.observer.as_deref_mut() {
                let origin = boid.position;
                observer.force(id, origin, SteeringKind::Separation, forces.separation);
                observer.force(id, origin, SteeringKind::Alignment, forces.alignment);
                observer.force(id, origin, SteeringKind::Cohesion, forces.cohesion);
                observer.force(id, origin, SteeringKind::Boundary, forces.boundary);
                observer.force(id, origin, SteeringKind::Swirl, forces.swirl);
            }

            boid.steer(&forces, delta_time);
            boid.integrate(delta_time);

            if let Some(observer) = self.observer.as_deref_mut() {
                observer.transform(id, boid.position, boid.orientation);
            }
        }
    }

    // Install the placement/diagnostics collaborator. The flock is fully
    // functional without one.
    pub fn set_observer(&mut self, observer: impl FlockObserver + Send + 'static) {
        self.observer = Some(Box::new(observer));
    }

    pub fn get(&self, id: BoidId) -> Option<&Boid> {
        self.boids.get(id)
    }

    pub fn get_mut(&mut self, id: BoidId) -> Option<&mut Boid> {
        self.boids.get_mut(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (BoidId, &Boid)> {
        self.boids.iter()
    }

    pub fn len(&self) -> usize {
        self.boids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boids.is_empty()
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn set_center(&mut self, center: Vec3) {
        self.center = center;
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn params(&self) -> &SimulationParams {
        &self.params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded_params() -> SimulationParams {
        SimulationParams {
            boid_count: 40,
            rng_seed: Some(0xB01D),
            ..SimulationParams::default()
        }
    }

    #[test]
    fn spawn_creates_requested_population() {
        let params = seeded_params();
        let center = Vec3::new(100.0, -50.0, 20.0);
        let mut flock = Flock::new(center, params.clone()).unwrap();
        flock.spawn();

        assert_eq!(flock.len(), params.boid_count);
        for (_, boid) in flock.iter() {
            let offset = boid.position - center;
            assert!(offset.x.abs() <= params.spawn_bounds.x);
            assert!(offset.y.abs() <= params.spawn_bounds.y);
            assert!(offset.z.abs() <= params.spawn_bounds.z);
            assert!((boid.velocity.length() - params.max_speed).abs() < 1e-2);
            assert_eq!(boid.boundary_box, params.boundary_box);
        }
    }

    #[test]
    fn spawn_replaces_previous_population() {
        let mut flock = Flock::new(Vec3::ZERO, seeded_params()).unwrap();
        flock.spawn();
        let old_ids: Vec<BoidId> = flock.iter().map(|(id, _)| id).collect();

        flock.spawn();
        assert_eq!(flock.len(), flock.params().boid_count);
        for id in old_ids {
            assert!(flock.get(id).is_none());
        }
    }

    #[test]
    fn invalid_params_are_rejected_at_construction() {
        let params = SimulationParams {
            max_speed: 0.0,
            min_speed: 0.0,
            ..SimulationParams::default()
        };
        assert!(Flock::new(Vec3::ZERO, params).is_err());
    }

    #[test]
    fn removed_ids_stay_stale() {
        let mut flock = Flock::new(Vec3::ZERO, seeded_params()).unwrap();
        flock.spawn();
        let id = flock.iter().next().map(|(id, _)| id).unwrap();

        assert!(flock.remove(id).is_some());
        assert!(flock.get(id).is_none());
        assert!(flock.remove(id).is_none());

        // The population keeps stepping without the removed boid.
        flock.step(1.0 / 60.0);
        assert_eq!(flock.len(), flock.params().boid_count - 1);
    }

    #[test]
    fn non_positive_delta_time_is_a_no_op() {
        let mut flock = Flock::new(Vec3::ZERO, seeded_params()).unwrap();
        flock.spawn();
        let before: Vec<Vec3> = flock.iter().map(|(_, b)| b.position).collect();

        flock.step(0.0);
        flock.step(-0.25);

        let after: Vec<Vec3> = flock.iter().map(|(_, b)| b.position).collect();
        assert_eq!(before, after);
        assert_eq!(flock.elapsed(), 0.0);
    }

    #[test]
    fn seeded_runs_are_reproducible() {
        let params = SimulationParams {
            swirl_strength: 30.0,
            ..seeded_params()
        };
        let mut a = Flock::new(Vec3::ZERO, params.clone()).unwrap();
        let mut b = Flock::new(Vec3::ZERO, params).unwrap();
        a.spawn();
        b.spawn();

        for _ in 0..20 {
            a.step(1.0 / 60.0);
            b.step(1.0 / 60.0);
        }

        let positions_a: Vec<Vec3> = a.iter().map(|(_, boid)| boid.position).collect();
        let positions_b: Vec<Vec3> = b.iter().map(|(_, boid)| boid.position).collect();
        assert_eq!(positions_a, positions_b);
    }

    #[test]
    fn parallel_and_sequential_agree_exactly() {
        let base = SimulationParams {
            swirl_strength: 30.0,
            ..seeded_params()
        };
        let sequential = SimulationParams {
            parallel: false,
            ..base.clone()
        };

        let mut a = Flock::new(Vec3::ZERO, base).unwrap();
        let mut b = Flock::new(Vec3::ZERO, sequential).unwrap();
        a.spawn();
        b.spawn();

        for _ in 0..10 {
            a.step(1.0 / 60.0);
            b.step(1.0 / 60.0);
        }

        let positions_a: Vec<Vec3> = a.iter().map(|(_, boid)| boid.position).collect();
        let positions_b: Vec<Vec3> = b.iter().map(|(_, boid)| boid.position).collect();
        assert_eq!(positions_a, positions_b);
    }

    #[test]
    fn isolated_boid_inside_bounds_keeps_its_velocity() {
        let params = SimulationParams {
            min_speed: 0.0,
            swirl_strength: 0.0,
            ..seeded_params()
        };
        let mut flock = Flock::new(Vec3::ZERO, params.clone()).unwrap();

        let mut rng = SmallRng::seed_from_u64(1);
        let mut boid = Boid::new(Vec3::ZERO, &params, &mut rng);
        boid.velocity = Vec3::new(10.0, 20.0, -5.0);
        let id = flock.insert(boid);

        flock.step(1.0);
        let boid = flock.get(id).unwrap();
        assert_eq!(boid.velocity, Vec3::new(10.0, 20.0, -5.0));
        assert_eq!(boid.position, Vec3::new(10.0, 20.0, -5.0));
    }
}
