/*
 * Observer Module
 *
 * This module defines the FlockObserver trait, the seam between the
 * simulation core and its collaborators: a placement/rendering host that
 * consumes each boid's new transform, and an optional debug visualizer that
 * consumes the individual steering forces. Both hooks default to no-ops, so
 * the core runs headless and is unit-testable with no observer installed.
 *
 * Observer calls never affect simulation state.
 */

use glam::Vec3;

use crate::flock::BoidId;

// Which named steering behavior produced a force sample. A visualizer
// typically maps each kind to its own debug-line color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SteeringKind {
    Separation,
    Alignment,
    Cohesion,
    Boundary,
    Swirl,
}

pub trait FlockObserver {
    // Called once per boid per step with the post-update transform.
    // Orientation is the unit heading derived from velocity.
    fn transform(&mut self, _id: BoidId, _position: Vec3, _orientation: Vec3) {}

    // Called once per named force per boid per step, before the force is
    // applied. Origin is the boid's pre-update position.
    fn force(&mut self, _id: BoidId, _origin: Vec3, _kind: SteeringKind, _force: Vec3) {}
}
