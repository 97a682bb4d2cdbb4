// Centralized configuration for simulation parameters

use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};
use crate::units;

// ====================
// Particle Parameters
// ====================
/// Charge magnitude of the simulated particle (C).
pub const DEFAULT_PARTICLE_CHARGE: f64 = units::ELECTRON_CHARGE_ROUNDED;
/// Mass of the simulated particle (kg).
pub const DEFAULT_PARTICLE_MASS: f64 = units::ELECTRON_MASS_ROUNDED;

// ====================
// Integration Parameters
// ====================
/// Number of fixed steps across the nominal transit time `length / initial_speed`.
pub const DEFAULT_STEPS_PER_TRANSIT: u32 = 1000;
/// Hard cap on integration steps per run. Only reached with degenerate inputs.
pub const DEFAULT_MAX_STEPS: usize = 10_000_000;

// ====================
// Voltage Search Parameters
// ====================
/// Absolute tolerance on the voltage axis (V).
pub const VOLTAGE_TOLERANCE: f64 = 1e-5;
/// Lower bracket end: at zero potential difference the particle flies straight through.
pub const DEFAULT_VOLTAGE_LOW: f64 = 0.0;
/// Upper bracket end, tuned to electron-scale apparatus.
pub const DEFAULT_VOLTAGE_HIGH: f64 = 1000.0;
/// Maximum number of times `high` is doubled under `BracketPolicy::Expand`.
pub const MAX_BRACKET_EXPANSIONS: usize = 64;

// ====================
// Threading/Parallelism
// ====================
pub const MIN_THREADS: usize = 1; // Minimum number of sweep worker threads
pub const THREADS_LEAVE_FREE: usize = 1; // Number of logical cores to leave free

/// How the fixed integration step is derived.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeStep {
    /// `dt = length / (initial_speed * n)`
    StepsPerTransit(u32),
    /// Caller-supplied step in seconds.
    Fixed(f64),
}

impl Default for TimeStep {
    fn default() -> Self {
        TimeStep::StepsPerTransit(DEFAULT_STEPS_PER_TRANSIT)
    }
}

impl TimeStep {
    /// Resolve the step size for a capacitor of `length` crossed at `initial_speed`.
    pub fn resolve(self, length: f64, initial_speed: f64) -> SimResult<f64> {
        let dt = match self {
            TimeStep::StepsPerTransit(0) => {
                return Err(SimError::invalid("steps_per_transit", "must be at least 1"));
            }
            TimeStep::StepsPerTransit(n) => length / (initial_speed * n as f64),
            TimeStep::Fixed(dt) => dt,
        };
        if !dt.is_finite() || dt <= 0.0 {
            return Err(SimError::invalid(
                "dt",
                format!("time step must be positive and finite, got {}", dt),
            ));
        }
        Ok(dt)
    }
}

/// Physical and geometric constants of one capacitor run. Immutable once built.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationParameters {
    /// Particle charge magnitude (C)
    pub charge: f64,
    /// Particle mass (kg)
    pub mass: f64,
    /// Longitudinal speed at the capacitor entrance (m/s)
    pub initial_speed: f64,
    /// Capacitor length along the axis (m)
    pub length: f64,
    pub inner_radius: f64,
    pub outer_radius: f64,
    /// Distance from the inner wall at entry (m)
    pub initial_offset: f64,
    /// Fixed integration step (s)
    pub dt: f64,
}

impl SimulationParameters {
    /// Electron entering mid-gap, default charge/mass and default step policy.
    pub fn new(
        inner_radius: f64,
        outer_radius: f64,
        initial_speed: f64,
        length: f64,
    ) -> SimResult<Self> {
        let params = Self {
            charge: DEFAULT_PARTICLE_CHARGE,
            mass: DEFAULT_PARTICLE_MASS,
            initial_speed,
            length,
            inner_radius,
            outer_radius,
            initial_offset: (outer_radius - inner_radius) / 2.0,
            dt: TimeStep::default().resolve(length, initial_speed)?,
        };
        params.validate()?;
        Ok(params)
    }

    pub fn with_time_step(mut self, step: TimeStep) -> SimResult<Self> {
        self.dt = step.resolve(self.length, self.initial_speed)?;
        self.validate()?;
        Ok(self)
    }

    pub fn with_particle(mut self, charge: f64, mass: f64) -> SimResult<Self> {
        self.charge = charge;
        self.mass = mass;
        self.validate()?;
        Ok(self)
    }

    pub fn with_initial_offset(mut self, offset: f64) -> SimResult<Self> {
        self.initial_offset = offset;
        self.validate()?;
        Ok(self)
    }

    /// Width of the gap between the cylinders.
    pub fn gap(&self) -> f64 {
        self.outer_radius - self.inner_radius
    }

    /// Time the particle needs to cross the full length.
    pub fn transit_time(&self) -> f64 {
        self.length / self.initial_speed
    }

    pub fn validate(&self) -> SimResult<()> {
        let fields = [
            ("charge", self.charge),
            ("mass", self.mass),
            ("initial_speed", self.initial_speed),
            ("length", self.length),
            ("inner_radius", self.inner_radius),
            ("outer_radius", self.outer_radius),
            ("initial_offset", self.initial_offset),
            ("dt", self.dt),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(SimError::invalid(name, format!("must be finite, got {}", value)));
            }
            if value <= 0.0 {
                return Err(SimError::invalid(name, format!("must be positive, got {}", value)));
            }
        }
        if self.outer_radius <= self.inner_radius {
            return Err(SimError::invalid(
                "outer_radius",
                format!(
                    "must exceed inner radius ({} <= {})",
                    self.outer_radius, self.inner_radius
                ),
            ));
        }
        if self.initial_offset > self.gap() / 2.0 {
            return Err(SimError::invalid(
                "initial_offset",
                format!(
                    "must not exceed half the gap ({} > {})",
                    self.initial_offset,
                    self.gap() / 2.0
                ),
            ));
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct IntegratorConfig {
    pub max_steps: usize,
}

impl Default for IntegratorConfig {
    fn default() -> Self {
        Self {
            max_steps: DEFAULT_MAX_STEPS,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BracketPolicy {
    /// Use `[low, high]` as given; fail when it does not straddle the threshold.
    #[default]
    Fixed,
    /// Double `high` until the particle is captured.
    Expand,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_low")]
    pub low: f64,
    #[serde(default = "default_high")]
    pub high: f64,
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    #[serde(default)]
    pub bracket: BracketPolicy,
    #[serde(default = "default_max_expansions")]
    pub max_expansions: usize,
}

fn default_low() -> f64 {
    DEFAULT_VOLTAGE_LOW
}
fn default_high() -> f64 {
    DEFAULT_VOLTAGE_HIGH
}
fn default_tolerance() -> f64 {
    VOLTAGE_TOLERANCE
}
fn default_max_expansions() -> usize {
    MAX_BRACKET_EXPANSIONS
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            low: default_low(),
            high: default_high(),
            tolerance: default_tolerance(),
            bracket: BracketPolicy::default(),
            max_expansions: default_max_expansions(),
        }
    }
}

impl SearchConfig {
    pub fn validate(&self) -> SimResult<()> {
        if !self.low.is_finite() || self.low < 0.0 {
            return Err(SimError::invalid(
                "low",
                format!("must be finite and non-negative, got {}", self.low),
            ));
        }
        if !self.high.is_finite() || self.high <= self.low {
            return Err(SimError::invalid(
                "high",
                format!("must be finite and above low ({} <= {})", self.high, self.low),
            ));
        }
        if !self.tolerance.is_finite() || self.tolerance <= 0.0 {
            return Err(SimError::invalid(
                "tolerance",
                format!("must be positive, got {}", self.tolerance),
            ));
        }
        if self.tolerance < f64::EPSILON * self.high {
            return Err(SimError::invalid(
                "tolerance",
                format!(
                    "{} is below the float resolution at the upper bracket end {}",
                    self.tolerance, self.high
                ),
            ));
        }
        Ok(())
    }
}
