//! Radial field of a coaxial cylindrical capacitor.
//!
//! Between two cylinders at potential difference `U` the field falls off as `1/r`:
//! `E(r) = U / (r * ln(R2 / R1))`. The particle acceleration is `a = qE / m`.

use crate::config::SimulationParameters;
use crate::error::{SimError, SimResult};

/// Acceleration model, configured once from the run parameters.
#[derive(Clone, Debug)]
pub struct FieldModel {
    charge: f64,
    mass: f64,
    log_ratio: f64,
}

impl FieldModel {
    pub fn new(params: &SimulationParameters) -> SimResult<Self> {
        if !(params.inner_radius > 0.0) || !(params.outer_radius > params.inner_radius) {
            return Err(SimError::invalid(
                "outer_radius",
                format!(
                    "coaxial geometry requires outer > inner > 0 (inner={}, outer={})",
                    params.inner_radius, params.outer_radius
                ),
            ));
        }
        Ok(Self {
            charge: params.charge,
            mass: params.mass,
            log_ratio: (params.outer_radius / params.inner_radius).ln(),
        })
    }

    /// Radial acceleration at distance `radial_distance` from the axis.
    pub fn acceleration(&self, voltage: f64, radial_distance: f64) -> SimResult<f64> {
        if !(radial_distance > 0.0) || !radial_distance.is_finite() {
            return Err(SimError::DomainViolation { radial_distance });
        }
        Ok((self.charge * voltage) / (self.mass * radial_distance * self.log_ratio))
    }

    /// Field strength `E(r)` in V/m.
    pub fn field_strength(&self, voltage: f64, radial_distance: f64) -> SimResult<f64> {
        Ok(self.acceleration(voltage, radial_distance)? * self.mass / self.charge)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> FieldModel {
        let params = SimulationParameters::new(0.01, 0.02, 1e6, 0.1).unwrap();
        FieldModel::new(&params).unwrap()
    }

    #[test]
    fn matches_closed_form() {
        let a = model().acceleration(10.0, 0.015).unwrap();
        let expected = (1.6e-19 * 10.0) / (9.1e-31 * 0.015 * 2.0f64.ln());
        assert_eq!(a, expected);
    }

    #[test]
    fn decreases_with_radius_and_grows_with_voltage() {
        let m = model();
        let near = m.acceleration(5.0, 0.011).unwrap();
        let far = m.acceleration(5.0, 0.019).unwrap();
        assert!(near > far);

        let low = m.acceleration(1.0, 0.015).unwrap();
        let high = m.acceleration(2.0, 0.015).unwrap();
        assert!(high > low);
    }

    #[test]
    fn zero_voltage_gives_zero_acceleration() {
        assert_eq!(model().acceleration(0.0, 0.015).unwrap(), 0.0);
    }

    #[test]
    fn non_positive_radius_is_domain_violation() {
        let m = model();
        assert!(matches!(
            m.acceleration(1.0, 0.0),
            Err(SimError::DomainViolation { .. })
        ));
        assert!(matches!(
            m.acceleration(1.0, -0.01),
            Err(SimError::DomainViolation { .. })
        ));
        assert!(m.acceleration(1.0, f64::NAN).is_err());
    }

    #[test]
    fn field_strength_inverse_radius() {
        let m = model();
        let e = m.field_strength(100.0, 0.01).unwrap();
        let expected = 100.0 / (0.01 * 2.0f64.ln());
        assert!((e - expected).abs() / expected < 1e-12);
    }

    #[test]
    fn degenerate_geometry_rejected() {
        let mut params = SimulationParameters::new(0.01, 0.02, 1e6, 0.1).unwrap();
        params.outer_radius = params.inner_radius;
        assert!(FieldModel::new(&params).is_err());
    }
}
