//! Bisection search for the critical potential difference.
//!
//! The decision predicate is the sign of the integrator's final position:
//! `> 0` means the particle crossed the whole capacitor, `<= 0` means it was
//! pulled into the inner wall. Raising the voltage strengthens the pull, so the
//! predicate is assumed monotonic in voltage. The search is only as good as that
//! assumption: in a non-monotonic regime it converges to some sign change, not
//! necessarily the lowest one.

use serde::{Deserialize, Serialize};

use crate::config::{BracketPolicy, SearchConfig};
use crate::error::{SimError, SimResult};
use crate::profile_scope;
use crate::simulation::Integrator;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchReport {
    /// Minimum voltage that keeps the particle inside (upper bracket end).
    pub voltage: f64,
    pub low: f64,
    pub high: f64,
    pub iterations: usize,
    /// Number of times `high` was doubled before bisecting.
    pub expansions: usize,
}

pub struct CriticalVoltageSearch<'a> {
    integrator: &'a Integrator,
    config: SearchConfig,
}

impl<'a> CriticalVoltageSearch<'a> {
    pub fn new(integrator: &'a Integrator) -> Self {
        Self::with_config(integrator, SearchConfig::default())
    }

    pub fn with_config(integrator: &'a Integrator, config: SearchConfig) -> Self {
        Self { integrator, config }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Minimum potential difference at which the particle strikes the inner
    /// wall instead of leaving the capacitor, within `tolerance`.
    pub fn find_minimum_voltage(&self) -> SimResult<f64> {
        Ok(self.run()?.voltage)
    }

    pub fn run(&self) -> SimResult<SearchReport> {
        profile_scope!("bisection");
        self.config.validate()?;

        let (mut low, mut high, expansions) = self.bracket()?;
        let mut iterations = 0usize;
        while high - low > self.config.tolerance {
            let mid = (low + high) / 2.0;
            if mid <= low || mid >= high {
                // No representable voltage left between the bracket ends.
                log::warn!(
                    "[bisect] bracket [{}, {}] at float resolution, tolerance {} not reachable",
                    low,
                    high,
                    self.config.tolerance
                );
                break;
            }
            let pos = self.integrator.simulate(mid)?;
            if pos <= 0.0 {
                high = mid;
            } else {
                low = mid;
            }
            iterations += 1;
            log::debug!(
                "[bisect] iter={} mid={} pos={:e} bracket=[{}, {}]",
                iterations,
                mid,
                pos,
                low,
                high
            );
        }

        log::info!(
            "[bisect] critical voltage {} V after {} iterations ({} expansions)",
            high,
            iterations,
            expansions
        );
        Ok(SearchReport {
            voltage: high,
            low,
            high,
            iterations,
            expansions,
        })
    }

    /// Check that the particle crosses at `low` and is captured at `high`,
    /// growing `high` first when the policy allows it.
    fn bracket(&self) -> SimResult<(f64, f64, usize)> {
        let SearchConfig { low, high, .. } = self.config;

        if self.integrator.simulate(low)? <= 0.0 {
            return Err(SimError::BracketInvalid {
                low,
                high,
                message: format!("particle is already captured at the lower end {} V", low),
            });
        }

        let mut low = low;
        let mut high = high;
        let mut expansions = 0usize;
        while self.integrator.simulate(high)? > 0.0 {
            match self.config.bracket {
                BracketPolicy::Fixed => {
                    return Err(SimError::BracketInvalid {
                        low,
                        high,
                        message: format!("particle still crosses the capacitor at {} V", high),
                    });
                }
                BracketPolicy::Expand => {
                    if expansions == self.config.max_expansions {
                        return Err(SimError::BracketInvalid {
                            low,
                            high,
                            message: format!(
                                "particle still crosses after {} doublings",
                                expansions
                            ),
                        });
                    }
                    low = high;
                    high *= 2.0;
                    expansions += 1;
                    log::debug!("[bisect] expanded bracket to [{}, {}]", low, high);
                }
            }
        }
        Ok((low, high, expansions))
    }
}
