/*
 * Headless Flocking Demo
 *
 * Runs the simulation core without any renderer attached: spawns a flock,
 * steps it at a fixed timestep, and logs aggregate motion so the emergent
 * behavior can be eyeballed from the terminal. A real host would install a
 * FlockObserver and forward the transforms to its scene graph instead.
 */

use boids3d::{ConfigError, Flock, SimulationParams};
use glam::Vec3;
use tracing::info;

const STEP: f32 = 1.0 / 60.0;
const TOTAL_STEPS: u32 = 600;
const REPORT_EVERY: u32 = 60;

fn main() -> Result<(), ConfigError> {
    tracing_subscriber::fmt::init();

    let params = SimulationParams {
        swirl_strength: 40.0,
        rng_seed: Some(0xF10C),
        ..SimulationParams::default()
    };

    let mut flock = Flock::new(Vec3::ZERO, params)?;
    flock.spawn();
    info!(boids = flock.len(), "simulation start");

    for step in 1..=TOTAL_STEPS {
        flock.step(STEP);

        if step % REPORT_EVERY == 0 {
            let count = flock.len() as f32;
            let centroid: Vec3 =
                flock.iter().map(|(_, b)| b.position).sum::<Vec3>() / count;
            let avg_speed: f32 =
                flock.iter().map(|(_, b)| b.velocity.length()).sum::<f32>() / count;
            info!(
                step,
                elapsed = flock.elapsed(),
                ?centroid,
                avg_speed,
                "flock status"
            );
        }
    }

    info!("simulation finished");
    Ok(())
}
