/*
 * 3D Boid Flocking Simulation Core - Module Definitions
 *
 * This file defines the module structure for the flocking simulation
 * library. The core is headless: placement, rendering, and debug
 * visualization are collaborators behind the FlockObserver trait.
 */

// Re-export key components for easier access
pub use boid::{Boid, BoidView, SteeringForces};
pub use flock::{BoidId, Flock};
pub use observer::{FlockObserver, SteeringKind};
pub use params::{BoundaryPolicy, ConfigError, SeparationMode, SimulationParams};
pub use swirl::SwirlField;

// Define modules
pub mod boid;
pub mod flock;
pub mod observer;
pub mod params;
pub mod swirl;
