use std::error::Error;
use std::io::{self, BufRead};
use std::path::PathBuf;

use crate::config::{IntegratorConfig, SearchConfig, SimulationParameters};
use crate::init_config::{self, InitConfig};
use crate::io::{save_run, SavedRun};
use crate::plotting::{ChartExporter, ExportFormat};
use crate::search::CriticalVoltageSearch;
use crate::simulation::Integrator;
use crate::trajectory::TrajectorySampler;

/// Everything one interactive run needs, from a config file or from stdin.
pub struct RunSettings {
    pub params: SimulationParameters,
    pub integrator: IntegratorConfig,
    pub search: SearchConfig,
    pub voltage: Option<f64>,
    pub output_dir: PathBuf,
    pub format: ExportFormat,
    pub save_run: Option<PathBuf>,
}

impl RunSettings {
    pub fn from_init_config(cfg: &InitConfig) -> crate::error::SimResult<Self> {
        Ok(Self {
            params: cfg.to_parameters()?,
            integrator: cfg.integrator_config(),
            search: cfg.search_config()?,
            voltage: cfg.trajectory.voltage,
            output_dir: PathBuf::from(&cfg.output.dir),
            format: cfg.output.format,
            save_run: cfg.output.save_run.as_ref().map(PathBuf::from),
        })
    }

    pub fn from_geometry_line(line: &str) -> crate::error::SimResult<Self> {
        Ok(Self {
            params: init_config::parse_geometry_line(line)?,
            integrator: IntegratorConfig::default(),
            search: SearchConfig::default(),
            voltage: None,
            output_dir: PathBuf::from("plots"),
            format: ExportFormat::default(),
            save_run: None,
        })
    }
}

fn read_line<B: BufRead>(input: &mut B, prompt: &str) -> Result<String, Box<dyn Error>> {
    println!("{}", prompt);
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err("unexpected end of input".into());
    }
    Ok(line)
}

/// `coax_sim [capacitor.toml]`
pub fn run() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = std::env::args().collect();
    let stdin = io::stdin();
    let mut input = stdin.lock();

    let settings = match args.get(1) {
        Some(path) => {
            let cfg = InitConfig::load_from_file(path)?;
            log::info!("[app] loaded {}", path);
            RunSettings::from_init_config(&cfg)?
        }
        None => {
            let line = read_line(
                &mut input,
                "Enter inner radius, outer radius, initial speed and length:",
            )?;
            RunSettings::from_geometry_line(&line)?
        }
    };
    run_with(settings, &mut input)
}

pub fn run_with<B: BufRead>(settings: RunSettings, input: &mut B) -> Result<(), Box<dyn Error>> {
    let integrator = Integrator::with_config(settings.params.clone(), settings.integrator)?;
    log::debug!("[app] parameters: {:?}", integrator.params());

    let report = CriticalVoltageSearch::with_config(&integrator, settings.search).run()?;
    println!("Minimum potential difference: {} V", report.voltage);

    let voltage = match settings.voltage {
        Some(v) => v,
        None => {
            let line = read_line(input, "Enter potential difference to plot:")?;
            init_config::parse_numbers(&line, 1)?[0]
        }
    };

    let sampler = TrajectorySampler::new(&integrator);
    let mut exporter = ChartExporter::new(&settings.output_dir, settings.format);
    sampler.sample_into(voltage, &mut exporter)?;
    for path in exporter.written() {
        println!("✓ Wrote {}", path.display());
    }

    if let Some(path) = &settings.save_run {
        let run = SavedRun {
            parameters: settings.params.clone(),
            search: Some(report),
            trajectory: Some(sampler.trajectory(voltage)?),
        };
        save_run(path, &run)?;
        println!("✓ Saved run to {}", path.display());
    }

    #[cfg(feature = "profiling")]
    crate::PROFILER.lock().log_and_clear();

    Ok(())
}

/// Global rayon pool for sweeps, leaving some cores free.
pub fn init_thread_pool() {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    let threads = cores
        .saturating_sub(crate::config::THREADS_LEAVE_FREE)
        .max(crate::config::MIN_THREADS);
    if let Err(e) = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
    {
        log::warn!("[app] thread pool already initialised: {}", e);
    }
}
