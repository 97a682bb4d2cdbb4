// init_config.rs
// Handles loading the capacitor, particle and run settings from capacitor.toml

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::config::{
    IntegratorConfig, SearchConfig, SimulationParameters, TimeStep, DEFAULT_MAX_STEPS,
};
use crate::error::{SimError, SimResult};
use crate::plotting::ExportFormat;

#[derive(Debug, Deserialize, Serialize)]
pub struct InitConfig {
    pub capacitor: CapacitorConfig,
    pub particle: ParticleConfig,
    #[serde(default)]
    pub integration: IntegrationConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub trajectory: TrajectoryConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct CapacitorConfig {
    pub inner_radius: f64,
    pub outer_radius: f64,
    pub length: f64,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ParticleConfig {
    pub initial_speed: f64,
    /// Optional charge magnitude. Falls back to the electron value when omitted.
    pub charge: Option<f64>,
    /// Optional mass. Falls back to the electron value when omitted.
    pub mass: Option<f64>,
    /// Optional distance from the inner wall at entry. Defaults to mid-gap.
    pub initial_offset: Option<f64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct IntegrationConfig {
    /// Steps across the nominal transit time. Ignored when `dt` is set.
    pub steps_per_transit: Option<u32>,
    /// Explicit time step in seconds.
    pub dt: Option<f64>,
    pub max_steps: Option<usize>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct TrajectoryConfig {
    /// Voltage to sample. When omitted it is read from stdin.
    pub voltage: Option<f64>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: String,
    #[serde(default)]
    pub format: ExportFormat,
    /// Optional path for the saved run (`.json`, `.bin`, optionally `.gz`).
    pub save_run: Option<String>,
}

fn default_output_dir() -> String {
    "plots".to_string()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            format: ExportFormat::default(),
            save_run: None,
        }
    }
}

impl IntegrationConfig {
    pub fn time_step(&self) -> TimeStep {
        match (self.dt, self.steps_per_transit) {
            (Some(dt), _) => TimeStep::Fixed(dt),
            (None, Some(n)) => TimeStep::StepsPerTransit(n),
            (None, None) => TimeStep::default(),
        }
    }
}

impl InitConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> SimResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> SimResult<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn load_default() -> SimResult<Self> {
        Self::load_from_file("capacitor.toml")
    }

    pub fn to_parameters(&self) -> SimResult<SimulationParameters> {
        let mut params = SimulationParameters::new(
            self.capacitor.inner_radius,
            self.capacitor.outer_radius,
            self.particle.initial_speed,
            self.capacitor.length,
        )?
        .with_time_step(self.integration.time_step())?;
        if self.particle.charge.is_some() || self.particle.mass.is_some() {
            let charge = self.particle.charge.unwrap_or(params.charge);
            let mass = self.particle.mass.unwrap_or(params.mass);
            params = params.with_particle(charge, mass)?;
        }
        if let Some(offset) = self.particle.initial_offset {
            params = params.with_initial_offset(offset)?;
        }
        Ok(params)
    }

    pub fn integrator_config(&self) -> IntegratorConfig {
        IntegratorConfig {
            max_steps: self.integration.max_steps.unwrap_or(DEFAULT_MAX_STEPS),
        }
    }

    pub fn search_config(&self) -> SimResult<SearchConfig> {
        self.search.validate()?;
        Ok(self.search)
    }
}

/// Parse `count` whitespace-separated numbers from one input line.
pub fn parse_numbers(line: &str, count: usize) -> SimResult<Vec<f64>> {
    let values = line
        .split_whitespace()
        .map(|tok| {
            tok.parse::<f64>()
                .map_err(|e| SimError::invalid("input", format!("'{}': {}", tok, e)))
        })
        .collect::<SimResult<Vec<f64>>>()?;
    if values.len() != count {
        return Err(SimError::invalid(
            "input",
            format!("expected {} numbers, got {}", count, values.len()),
        ));
    }
    Ok(values)
}

/// Parse the interactive geometry line: `inner_radius outer_radius initial_speed length`.
pub fn parse_geometry_line(line: &str) -> SimResult<SimulationParameters> {
    let v = parse_numbers(line, 4)?;
    SimulationParameters::new(v[0], v[1], v[2], v[3])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BracketPolicy;

    const FULL: &str = r#"
        [capacitor]
        inner_radius = 0.01
        outer_radius = 0.02
        length = 0.1

        [particle]
        initial_speed = 1e6
        initial_offset = 0.004

        [integration]
        steps_per_transit = 2000
        max_steps = 50000

        [search]
        high = 10.0
        bracket = "expand"

        [trajectory]
        voltage = 0.05

        [output]
        dir = "out"
        format = "json"
        save_run = "out/run.bin.gz"
    "#;

    #[test]
    fn full_file_maps_onto_run_settings() {
        let cfg = InitConfig::from_toml_str(FULL).unwrap();
        let params = cfg.to_parameters().unwrap();
        assert_eq!(params.initial_offset, 0.004);
        assert_eq!(params.dt, 0.1 / (1e6 * 2000.0));
        assert_eq!(cfg.integrator_config().max_steps, 50000);

        let search = cfg.search_config().unwrap();
        assert_eq!(search.high, 10.0);
        assert_eq!(search.low, 0.0);
        assert_eq!(search.bracket, BracketPolicy::Expand);
        assert_eq!(cfg.trajectory.voltage, Some(0.05));
        assert_eq!(cfg.output.format, ExportFormat::JSON);
        assert_eq!(cfg.output.save_run.as_deref(), Some("out/run.bin.gz"));
    }

    #[test]
    fn minimal_file_uses_defaults() {
        let cfg = InitConfig::from_toml_str(
            r#"
            [capacitor]
            inner_radius = 0.01
            outer_radius = 0.02
            length = 0.1
            [particle]
            initial_speed = 1e6
            "#,
        )
        .unwrap();
        let params = cfg.to_parameters().unwrap();
        assert_eq!(params, SimulationParameters::new(0.01, 0.02, 1e6, 0.1).unwrap());
        assert_eq!(cfg.search_config().unwrap(), SearchConfig::default());
        assert_eq!(cfg.integrator_config(), IntegratorConfig::default());
        assert_eq!(cfg.output.dir, "plots");
        assert!(cfg.trajectory.voltage.is_none());
    }

    #[test]
    fn bundled_capacitor_toml_loads() {
        let cfg = InitConfig::load_default().unwrap();
        assert_eq!(cfg.to_parameters().unwrap(), SimulationParameters::new(0.01, 0.02, 1e6, 0.1).unwrap());
        assert_eq!(cfg.search_config().unwrap(), SearchConfig::default());
    }

    #[test]
    fn explicit_dt_wins_over_step_count() {
        let integration = IntegrationConfig {
            steps_per_transit: Some(10),
            dt: Some(1e-11),
            max_steps: None,
        };
        assert_eq!(integration.time_step(), TimeStep::Fixed(1e-11));
    }

    #[test]
    fn missing_section_is_a_parse_error() {
        let err = InitConfig::from_toml_str("[particle]\ninitial_speed = 1.0\n").unwrap_err();
        assert!(matches!(err, SimError::TomlParse(_)));
    }

    #[test]
    fn geometry_line_parses_four_numbers() {
        let p = parse_geometry_line("0.01 0.02 1e6 0.1").unwrap();
        assert_eq!(p.inner_radius, 0.01);
        assert_eq!(p.length, 0.1);
        assert!(parse_geometry_line("0.01 0.02 1e6").is_err());
        assert!(parse_geometry_line("0.01 0.02 fast 0.1").is_err());
        assert!(parse_geometry_line("0.02 0.01 1e6 0.1").is_err());
    }
}
