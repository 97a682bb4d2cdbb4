// simulation/mod.rs
// Fixed-step transverse integrator and its per-run particle state

pub mod integrator;
pub mod state;
pub use integrator::*;
pub use state::ParticleState;
