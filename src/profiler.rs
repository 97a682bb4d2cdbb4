use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Cumulative wall time and call count for one profiled section.
#[derive(Clone, Copy, Debug, Default)]
pub struct SectionTiming {
    pub total: Duration,
    pub calls: u64,
}

impl SectionTiming {
    pub fn mean(&self) -> Duration {
        if self.calls == 0 {
            Duration::ZERO
        } else {
            self.total / self.calls as u32
        }
    }
}

/// Scoped profiler recording cumulative time per section
/// (integrator runs, bisection, sweeps).
#[derive(Default)]
pub struct Profiler {
    pub timings: HashMap<&'static str, SectionTiming>,
}

impl Profiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn finish(&mut self, guard: &ProfilerGuard) {
        let entry = self.timings.entry(guard.name).or_default();
        entry.total += guard.start.elapsed();
        entry.calls += 1;
    }

    pub fn report_sorted(&self) -> Vec<(&'static str, SectionTiming)> {
        let mut v: Vec<_> = self.timings.iter().map(|(n, t)| (*n, *t)).collect();
        v.sort_by(|a, b| b.1.total.cmp(&a.1.total));
        v
    }

    pub fn clear(&mut self) {
        self.timings.clear();
    }

    pub fn log_and_clear(&mut self) {
        for (name, timing) in self.report_sorted() {
            log::info!(
                "[profile] {:<20} total={:?} calls={} mean={:?}",
                name,
                timing.total,
                timing.calls,
                timing.mean()
            );
        }
        self.clear();
    }
}

pub struct ProfilerGuard {
    name: &'static str,
    start: Instant,
}

/// Start a profiling section. Returns a guard that updates the global
/// profiler when dropped.
pub fn start(name: &'static str) -> ProfilerGuard {
    ProfilerGuard {
        name,
        start: Instant::now(),
    }
}

#[cfg(feature = "profiling")]
impl Drop for ProfilerGuard {
    fn drop(&mut self) {
        crate::PROFILER.lock().finish(self);
    }
}

/// Profile the enclosing scope when the `profiling` feature is enabled.
#[macro_export]
macro_rules! profile_scope {
    ($name:expr) => {
        #[cfg(feature = "profiling")]
        let _guard = $crate::profiler::start($name);
    };
}
