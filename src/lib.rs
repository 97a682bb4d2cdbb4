pub mod app;
pub mod config;
pub mod error;
pub mod field;
pub mod init_config;
pub mod io;
pub mod plotting;
pub mod profiler;
pub mod search;
pub mod simulation;
pub mod sweep;
pub mod trajectory;
pub mod units;

pub use config::{SearchConfig, SimulationParameters};
pub use error::{SimError, SimResult};
pub use field::FieldModel;
pub use search::CriticalVoltageSearch;
pub use simulation::Integrator;
pub use trajectory::TrajectorySampler;

#[cfg(feature = "profiling")]
use once_cell::sync::Lazy;
#[cfg(feature = "profiling")]
use parking_lot::Mutex;

#[cfg(feature = "profiling")]
pub static PROFILER: Lazy<Mutex<profiler::Profiler>> =
    Lazy::new(|| Mutex::new(profiler::Profiler::new()));
