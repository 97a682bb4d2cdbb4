/// Parameter sweeps: critical voltage over many capacitor configurations.
///
/// Each case is an independent integrator + bisection, so cases are evaluated
/// in parallel. A failing case is reported in its result row and does not stop
/// the sweep.
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::{SearchConfig, SimulationParameters, TimeStep};
use crate::error::{SimError, SimResult};
use crate::profile_scope;
use crate::search::CriticalVoltageSearch;
use crate::simulation::Integrator;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepConfig {
    /// Name of the sweep study
    pub study_name: String,

    /// Step policy shared by all cases. Defaults to 1000 steps per transit.
    #[serde(default)]
    pub steps_per_transit: Option<u32>,

    /// Bisection settings shared by all cases
    #[serde(default)]
    pub search: SearchConfig,

    /// Cases to evaluate
    pub cases: Vec<SweepCase>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SweepCase {
    pub case_id: String,
    pub inner_radius: f64,
    pub outer_radius: f64,
    pub initial_speed: f64,
    pub length: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SweepResult {
    pub case_id: String,
    pub critical_voltage: Option<f64>,
    pub iterations: Option<usize>,
    /// Time to reach the inner wall at the critical voltage
    pub capture_time: Option<f64>,
    pub error: Option<String>,
}

impl SweepCase {
    pub fn parameters(&self, step: TimeStep) -> SimResult<SimulationParameters> {
        SimulationParameters::new(
            self.inner_radius,
            self.outer_radius,
            self.initial_speed,
            self.length,
        )?
        .with_time_step(step)
    }
}

impl SweepConfig {
    /// Full-factorial grid over the given value lists. Combinations with
    /// `outer <= inner` are skipped.
    pub fn generate_grid(
        study_name: String,
        inner_radii: &[f64],
        outer_radii: &[f64],
        speeds: &[f64],
        lengths: &[f64],
    ) -> Self {
        let mut cases = Vec::new();
        for &inner in inner_radii {
            for &outer in outer_radii {
                if outer <= inner {
                    continue;
                }
                for &speed in speeds {
                    for &length in lengths {
                        cases.push(SweepCase {
                            case_id: format!("R1_{}_R2_{}_V_{:e}_L_{}", inner, outer, speed, length),
                            inner_radius: inner,
                            outer_radius: outer,
                            initial_speed: speed,
                            length,
                        });
                    }
                }
            }
        }

        SweepConfig {
            study_name,
            steps_per_transit: None,
            search: SearchConfig::default(),
            cases,
        }
    }

    pub fn time_step(&self) -> TimeStep {
        self.steps_per_transit
            .map(TimeStep::StepsPerTransit)
            .unwrap_or_default()
    }

    /// Load sweep configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> SimResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Save sweep configuration to TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> SimResult<()> {
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }
}

pub fn evaluate_case(case: &SweepCase, step: TimeStep, search: SearchConfig) -> SweepResult {
    let outcome = (|| -> SimResult<(f64, usize, f64)> {
        let integrator = Integrator::new(case.parameters(step)?)?;
        let report = CriticalVoltageSearch::with_config(&integrator, search).run()?;
        let capture = integrator.run(report.voltage)?;
        Ok((report.voltage, report.iterations, capture.elapsed))
    })();

    match outcome {
        Ok((voltage, iterations, capture_time)) => SweepResult {
            case_id: case.case_id.clone(),
            critical_voltage: Some(voltage),
            iterations: Some(iterations),
            capture_time: Some(capture_time),
            error: None,
        },
        Err(e) => {
            log::warn!("[sweep] case {} failed: {}", case.case_id, e);
            SweepResult {
                case_id: case.case_id.clone(),
                critical_voltage: None,
                iterations: None,
                capture_time: None,
                error: Some(e.to_string()),
            }
        }
    }
}

pub struct SweepRunner {
    config: SweepConfig,
    output_dir: PathBuf,
}

impl SweepRunner {
    pub fn new<P: AsRef<Path>>(config: SweepConfig, output_dir: P) -> Self {
        Self {
            config,
            output_dir: output_dir.as_ref().to_path_buf(),
        }
    }

    pub fn config(&self) -> &SweepConfig {
        &self.config
    }

    /// Run a specific case by ID
    pub fn run_case(&self, case_id: &str) -> SimResult<SweepResult> {
        let case = self
            .config
            .cases
            .iter()
            .find(|c| c.case_id == case_id)
            .ok_or_else(|| SimError::invalid("case_id", format!("'{}' not found", case_id)))?;
        Ok(evaluate_case(case, self.config.time_step(), self.config.search))
    }

    /// Evaluate every case in parallel. Results keep the case order.
    pub fn run_all(&self) -> Vec<SweepResult> {
        profile_scope!("sweep");
        let step = self.config.time_step();
        let search = self.config.search;
        log::info!(
            "[sweep] '{}': {} cases on {} threads",
            self.config.study_name,
            self.config.cases.len(),
            rayon::current_num_threads()
        );
        self.config
            .cases
            .par_iter()
            .map(|case| evaluate_case(case, step, search))
            .collect()
    }

    /// Run all cases and write the summary CSV.
    pub fn run_and_export(&self) -> SimResult<(Vec<SweepResult>, PathBuf)> {
        let results = self.run_all();
        let path = export_sweep_summary(&self.config.cases, &results, &self.output_dir)?;
        Ok((results, path))
    }

    /// List all cases
    pub fn list_cases(&self) {
        println!("\n╔══════════════════════════════════════════╗");
        println!("║  Sweep Study: {}  ", self.config.study_name);
        println!("╚══════════════════════════════════════════╝\n");

        println!("Total cases: {}\n", self.config.cases.len());

        for (idx, case) in self.config.cases.iter().enumerate() {
            println!("  [{}] {}", idx + 1, case.case_id);
            println!(
                "      R1={} m  R2={} m  v0={:e} m/s  L={} m",
                case.inner_radius, case.outer_radius, case.initial_speed, case.length
            );
        }
        println!();
    }
}

/// Export one summary row per case
pub fn export_sweep_summary(
    cases: &[SweepCase],
    results: &[SweepResult],
    output_dir: &Path,
) -> SimResult<PathBuf> {
    std::fs::create_dir_all(output_dir)?;
    let filename = output_dir.join("Sweep_Summary.csv");
    let mut file = File::create(&filename)?;

    writeln!(
        file,
        "Case_ID,Inner_Radius_m,Outer_Radius_m,Initial_Speed_m_s,Length_m,Critical_Voltage_V,Iterations,Capture_Time_s,Error"
    )?;

    for (case, result) in cases.iter().zip(results.iter()) {
        let opt = |v: Option<f64>| v.map(|x| format!("{:e}", x)).unwrap_or_default();
        writeln!(
            file,
            "{},{},{},{:e},{},{},{},{},{}",
            case.case_id,
            case.inner_radius,
            case.outer_radius,
            case.initial_speed,
            case.length,
            opt(result.critical_voltage),
            result.iterations.map(|i| i.to_string()).unwrap_or_default(),
            opt(result.capture_time),
            result
                .error
                .as_deref()
                .unwrap_or("")
                .replace(',', ";")
        )?;
    }

    log::info!("[sweep] exported summary to {}", filename.display());
    Ok(filename)
}
