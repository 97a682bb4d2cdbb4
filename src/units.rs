//! Physical constants.
//!
//! All quantities are SI:
//! - Length: metre (m)
//! - Time: second (s)
//! - Charge: coulomb (C)
//! - Mass: kilogram (kg)
//! - Potential: volt (V)

/// Elementary charge in coulombs (CODATA 2018, exact).
pub const ELEMENTARY_CHARGE: f64 = 1.602_176_634e-19;
/// Electron rest mass in kilograms (CODATA 2018).
pub const ELECTRON_MASS: f64 = 9.109_383_701_5e-31;

/// Rounded electron charge magnitude used by the reference apparatus.
pub const ELECTRON_CHARGE_ROUNDED: f64 = 1.6e-19;
/// Rounded electron mass used by the reference apparatus.
pub const ELECTRON_MASS_ROUNDED: f64 = 9.1e-31;

/// Charge-to-mass ratio of the electron (C/kg).
pub const ELECTRON_CHARGE_TO_MASS: f64 = ELEMENTARY_CHARGE / ELECTRON_MASS;
