//! Default coefficients for both estimation strategies.
//!
//! These values seed [`super::FormulaCoefficients`] and
//! [`super::ModelSettings`]; a configuration file may override any of them.

/// Engine load (percent MCR) at which the formula strategy applies no load correction.
pub const NEUTRAL_ENGINE_LOAD_PCT: f64 = 75.0;

/// Reference speed lost per metre of significant wave height (kn/m).
pub const SPEED_PENALTY_PER_WAVE_M: f64 = 0.2;
/// Reference speed lost per knot of wind (kn/kn).
pub const SPEED_PENALTY_PER_WIND_KN: f64 = 0.1;
/// Reference speed gained per percent of engine load above neutral (kn/%).
pub const SPEED_GAIN_PER_LOAD_PCT: f64 = 0.05;
/// Reference speed gained per degree of trim (kn/deg).
pub const SPEED_GAIN_PER_TRIM_DEG: f64 = 0.02;

/// Daily fuel burn at neutral load in calm water (t/day).
pub const BASE_FUEL_T_PER_DAY: f64 = 50.0;
/// Extra fuel per percent of engine load below neutral (t/day/%).
pub const FUEL_PER_LOAD_DEFICIT_PCT: f64 = 0.3;
/// Extra fuel per metre of wave height (t/day/m).
pub const FUEL_PER_WAVE_M: f64 = 1.5;
/// Extra fuel per knot of wind (t/day/kn).
pub const FUEL_PER_WIND_KN: f64 = 0.8;

/// Fuel strictly above this rates C under the formula strategy.
pub const FORMULA_RATING_C_ABOVE: f64 = 48.0;
/// Fuel strictly below this rates A under the formula strategy.
pub const FORMULA_RATING_A_BELOW: f64 = 42.0;

/// Fuel (t/day) per kN of resistance per knot of speed.
pub const FUEL_PER_RESISTANCE_SPEED: f64 = 0.00025;
/// Compliance score before the fuel deduction.
pub const COMPLIANCE_SCORE_BASE: f64 = 120.0;
/// Scores strictly above these thresholds rate A, B and C; anything else is D.
pub const SCORE_BAND_A_ABOVE: f64 = 90.0;
pub const SCORE_BAND_B_ABOVE: f64 = 75.0;
pub const SCORE_BAND_C_ABOVE: f64 = 60.0;

/// Decimal places kept on reported reference speed.
pub const SPEED_DECIMALS: i32 = 2;
/// Decimal places kept on reported fuel consumption.
pub const FUEL_DECIMALS: i32 = 1;
/// Decimal places kept on reported resistance.
pub const RESISTANCE_DECIMALS: i32 = 2;
