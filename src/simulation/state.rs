// simulation/state.rs
// Mutable state of one particle during a single integrator run

use crate::config::SimulationParameters;
use crate::error::SimResult;
use crate::field::FieldModel;

/// Transverse state of the particle. Created fresh for every run and
/// dropped when the run's stopping condition fires.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParticleState {
    /// Distance to the inner wall; zero or below means the wall was struck.
    pub pos: f64,
    /// Transverse speed toward the inner wall
    pub vy: f64,
    /// Elapsed time
    pub t: f64,
    /// Acceleration at `pos`
    pub a: f64,
}

impl ParticleState {
    pub fn initial(
        params: &SimulationParameters,
        field: &FieldModel,
        voltage: f64,
    ) -> SimResult<Self> {
        let pos = params.initial_offset;
        Ok(Self {
            pos,
            vy: 0.0,
            t: 0.0,
            a: field.acceleration(voltage, pos + params.inner_radius)?,
        })
    }

    /// Still between the walls and still within the capacitor's length.
    pub fn in_transit(&self, params: &SimulationParameters) -> bool {
        self.pos > 0.0 && self.t * params.initial_speed <= params.length
    }

    pub fn struck_wall(&self) -> bool {
        self.pos <= 0.0
    }

    /// Lateral displacement recorded for plotting.
    pub fn lateral_displacement(&self) -> f64 {
        self.vy * self.t
    }

    /// Advance one step of constant-acceleration kinematics.
    pub fn advance(
        &mut self,
        params: &SimulationParameters,
        field: &FieldModel,
        voltage: f64,
    ) -> SimResult<()> {
        let dt = params.dt;
        self.pos += -self.vy * dt - self.a * dt.powi(2) / 2.0;
        if self.pos > 0.0 {
            self.vy += self.a * dt;
            self.a = field.acceleration(voltage, self.pos + params.inner_radius)?;
        } else {
            // Wall struck: the run ends after this step and `a` is never read again.
            self.vy = 0.0;
        }
        self.t += dt;
        Ok(())
    }
}
