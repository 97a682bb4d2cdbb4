//! Explicit fixed-step integration of the transverse motion.
//!
//! Both the scalar mode (`simulate`, `run`) and the recording mode (`record`)
//! drive the same stepping loop; recording only adds a snapshot of the
//! pre-update state at every step.

use serde::{Deserialize, Serialize};

use super::state::ParticleState;
use crate::config::{IntegratorConfig, SimulationParameters};
use crate::error::{SimError, SimResult};
use crate::field::FieldModel;
use crate::profile_scope;
use crate::trajectory::{Trajectory, TrajectorySample};

/// How a run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// Reached the inner wall before the end of the capacitor; the particle stays inside.
    StruckWall,
    /// Crossed the full length without touching the wall and left the capacitor.
    Transited,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub voltage: f64,
    pub final_position: f64,
    pub final_velocity: f64,
    pub elapsed: f64,
    pub steps: usize,
    pub outcome: Outcome,
}

pub struct Integrator {
    params: SimulationParameters,
    field: FieldModel,
    config: IntegratorConfig,
}

impl Integrator {
    pub fn new(params: SimulationParameters) -> SimResult<Self> {
        Self::with_config(params, IntegratorConfig::default())
    }

    pub fn with_config(params: SimulationParameters, config: IntegratorConfig) -> SimResult<Self> {
        params.validate()?;
        if config.max_steps == 0 {
            return Err(SimError::invalid("max_steps", "must be at least 1"));
        }
        let field = FieldModel::new(&params)?;
        Ok(Self {
            params,
            field,
            config,
        })
    }

    pub fn params(&self) -> &SimulationParameters {
        &self.params
    }

    pub fn field(&self) -> &FieldModel {
        &self.field
    }

    /// Final transverse position for `voltage`. `<= 0` means the wall was struck.
    pub fn simulate(&self, voltage: f64) -> SimResult<f64> {
        Ok(self.run(voltage)?.final_position)
    }

    pub fn run(&self, voltage: f64) -> SimResult<RunSummary> {
        self.integrate(voltage, |_| {})
    }

    /// Run in recording mode: one sample per step, taken before the update.
    pub fn record(&self, voltage: f64) -> SimResult<Trajectory> {
        let mut samples = Vec::new();
        self.integrate(voltage, |state| {
            samples.push(TrajectorySample::from_state(state))
        })?;
        Ok(Trajectory { voltage, samples })
    }

    fn integrate<F>(&self, voltage: f64, mut on_step: F) -> SimResult<RunSummary>
    where
        F: FnMut(&ParticleState),
    {
        profile_scope!("integrate");
        // The outer electrode is not a stopping condition, so the field must point inward.
        if !voltage.is_finite() || voltage < 0.0 {
            return Err(SimError::invalid(
                "voltage",
                format!("must be finite and non-negative, got {}", voltage),
            ));
        }

        let mut state = ParticleState::initial(&self.params, &self.field, voltage)?;
        let mut steps = 0usize;
        while state.in_transit(&self.params) {
            if steps == self.config.max_steps {
                log::warn!(
                    "[integrator] step cap {} hit at voltage={} t={:e}",
                    self.config.max_steps,
                    voltage,
                    state.t
                );
                return Err(SimError::DidNotTerminate {
                    max_steps: self.config.max_steps,
                    voltage,
                });
            }
            on_step(&state);
            state.advance(&self.params, &self.field, voltage)?;
            steps += 1;
        }

        let outcome = if state.struck_wall() {
            Outcome::StruckWall
        } else {
            Outcome::Transited
        };
        log::trace!(
            "[integrator] voltage={} steps={} pos={:e} outcome={:?}",
            voltage,
            steps,
            state.pos,
            outcome
        );
        Ok(RunSummary {
            voltage,
            final_position: state.pos,
            final_velocity: state.vy,
            elapsed: state.t,
            steps,
            outcome,
        })
    }
}
