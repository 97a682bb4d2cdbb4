// trajectory.rs
// Recorded trajectories and the sampler that hands them to plotting

use serde::{Deserialize, Serialize};

use crate::error::SimResult;
use crate::simulation::{Integrator, ParticleState};

/// Snapshot of the particle at the start of one step.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrajectorySample {
    pub t: f64,
    pub lateral_displacement: f64,
    pub pos: f64,
    pub a: f64,
    pub vy: f64,
}

impl TrajectorySample {
    pub fn from_state(state: &ParticleState) -> Self {
        Self {
            t: state.t,
            lateral_displacement: state.lateral_displacement(),
            pos: state.pos,
            a: state.a,
            vy: state.vy,
        }
    }
}

/// Samples of one recording-mode run, in time order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    pub voltage: f64,
    pub samples: Vec<TrajectorySample>,
}

impl Trajectory {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn times(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.t).collect()
    }

    pub fn lateral_displacements(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.lateral_displacement).collect()
    }

    pub fn positions(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.pos).collect()
    }

    pub fn accelerations(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.a).collect()
    }

    pub fn velocities(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.vy).collect()
    }

    /// Split into parallel columns indexed by step number.
    pub fn series(&self) -> TrajectorySeries {
        TrajectorySeries {
            voltage: self.voltage,
            times: self.times(),
            lateral_displacements: self.lateral_displacements(),
            positions: self.positions(),
            accelerations: self.accelerations(),
            velocities: self.velocities(),
        }
    }
}

/// Column-oriented view of a trajectory, as consumed by plotting.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TrajectorySeries {
    pub voltage: f64,
    pub times: Vec<f64>,
    pub lateral_displacements: Vec<f64>,
    pub positions: Vec<f64>,
    pub accelerations: Vec<f64>,
    pub velocities: Vec<f64>,
}

impl TrajectorySeries {
    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }
}

/// Receiver of sampled trajectories (chart writers, in-memory collectors).
pub trait PlotSink {
    fn accept(&mut self, series: &TrajectorySeries) -> SimResult<()>;
}

impl PlotSink for Vec<TrajectorySeries> {
    fn accept(&mut self, series: &TrajectorySeries) -> SimResult<()> {
        self.push(series.clone());
        Ok(())
    }
}

pub struct TrajectorySampler<'a> {
    integrator: &'a Integrator,
}

impl<'a> TrajectorySampler<'a> {
    pub fn new(integrator: &'a Integrator) -> Self {
        Self { integrator }
    }

    pub fn trajectory(&self, voltage: f64) -> SimResult<Trajectory> {
        self.integrator.record(voltage)
    }

    pub fn sample(&self, voltage: f64) -> SimResult<TrajectorySeries> {
        Ok(self.trajectory(voltage)?.series())
    }

    pub fn sample_into<S: PlotSink + ?Sized>(&self, voltage: f64, sink: &mut S) -> SimResult<()> {
        let series = self.sample(voltage)?;
        log::info!(
            "[sampler] voltage={} samples={} -> plotting",
            voltage,
            series.len()
        );
        sink.accept(&series)
    }
}
