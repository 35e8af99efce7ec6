//! Remapping of raw metric values into a bounded range.
//!
//! Raw per-feature distances live in incompatible units (an age gap of 50
//! years vs. an income gap of 50 dollars). A remap takes a raw distance `d`
//! and a caller-chosen scale `r` and maps it into [0, 1] so features can be
//! combined.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{FeatureError, FeatureResult};

/// Maps a non-negative raw distance and a positive scale into [0, 1].
pub trait Remap: Send + Sync + fmt::Debug {
    /// Short identifier used in logs and error messages
    fn name(&self) -> &str;

    /// Remap a raw distance `d` using scale `scale`
    fn remap(&self, d: f64, scale: f64) -> FeatureResult<f64>;
}

/// Built-in remaps
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "uniffi", derive(uniffi::Enum))]
pub enum RemapKind {
    /// min(d / r, 1); saturates at d >= r
    Linear,

    /// 1 − exp(−d / r); approaches 1 but never reaches it
    Exponential,
}

impl RemapKind {
    /// All built-in remaps
    pub fn all() -> &'static [RemapKind] {
        &[RemapKind::Linear, RemapKind::Exponential]
    }

    /// Identifier matching the serialized form
    pub fn name(&self) -> &'static str {
        match self {
            RemapKind::Linear => "linear",
            RemapKind::Exponential => "exponential",
        }
    }
}

impl fmt::Display for RemapKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RemapKind {
    type Err = FeatureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "linear" => Ok(RemapKind::Linear),
            "exponential" | "exp" => Ok(RemapKind::Exponential),
            other => Err(FeatureError::InvalidConfig(format!(
                "unknown remap '{}'",
                other
            ))),
        }
    }
}

impl Remap for RemapKind {
    fn name(&self) -> &str {
        RemapKind::name(self)
    }

    fn remap(&self, d: f64, scale: f64) -> FeatureResult<f64> {
        match self {
            RemapKind::Linear => linear_remap(d, scale),
            RemapKind::Exponential => exponential_remap(d, scale),
        }
    }
}

/// A caller-supplied remap backed by a closure.
pub struct FnRemap<F> {
    name: String,
    func: F,
}

impl<F> FnRemap<F>
where
    F: Fn(f64, f64) -> f64 + Send + Sync,
{
    pub fn new(name: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            func,
        }
    }
}

impl<F> fmt::Debug for FnRemap<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnRemap").field("name", &self.name).finish()
    }
}

impl<F> Remap for FnRemap<F>
where
    F: Fn(f64, f64) -> f64 + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn remap(&self, d: f64, scale: f64) -> FeatureResult<f64> {
        check_inputs(&self.name, d, scale)?;
        let t = (self.func)(d, scale);
        if !(0.0..=1.0).contains(&t) {
            return Err(FeatureError::domain(
                &self.name,
                format!("remap returned {}, expected a value in [0, 1]", t),
            ));
        }
        Ok(t)
    }
}

fn check_inputs(remap: &str, d: f64, scale: f64) -> FeatureResult<()> {
    if !scale.is_finite() || scale <= 0.0 {
        return Err(FeatureError::domain(
            remap,
            format!("scale must be finite and > 0, got {}", scale),
        ));
    }
    if d.is_nan() || d < 0.0 {
        return Err(FeatureError::domain(
            remap,
            format!("distance must be >= 0, got {}", d),
        ));
    }
    Ok(())
}

/// Linear remap: min(d / r, 1)
pub fn linear_remap(d: f64, r: f64) -> FeatureResult<f64> {
    check_inputs("linear", d, r)?;
    Ok((d / r).min(1.0))
}

/// Largest f64 strictly below 1.0
const BELOW_ONE: f64 = 1.0 - f64::EPSILON / 2.0;

/// Exponential remap: 1 − exp(−d / r), always in [0, 1).
///
/// Once d / r exceeds about 37 the exact value rounds to 1.0; those results
/// are held at the largest f64 below 1.
pub fn exponential_remap(d: f64, r: f64) -> FeatureResult<f64> {
    check_inputs("exponential", d, r)?;
    // -expm1(-x) == 1 - exp(-x) without cancellation for small x
    Ok((-(-d / r).exp_m1()).min(BELOW_ONE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_remap() {
        assert_eq!(linear_remap(50.0, 100.0).unwrap(), 0.5);
        assert_eq!(linear_remap(5000.0, 100000.0).unwrap(), 0.05);
        assert_eq!(linear_remap(250.0, 100.0).unwrap(), 1.0);
        assert_eq!(linear_remap(0.0, 1.0).unwrap(), 0.0);
    }

    #[test]
    fn test_exponential_remap() {
        assert_eq!(exponential_remap(0.0, 1.0).unwrap(), 0.0);
        let t = exponential_remap(1.0, 1.0).unwrap();
        assert!((t - (1.0 - (-1.0_f64).exp())).abs() < 1e-15);
        let far = exponential_remap(30.0, 1.0).unwrap();
        assert!(far < 1.0 && far > 0.999);
    }

    #[test]
    fn test_bad_scale() {
        for scale in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(linear_remap(1.0, scale).is_err());
            assert!(exponential_remap(1.0, scale).is_err());
        }
    }

    #[test]
    fn test_bad_distance() {
        assert!(linear_remap(-0.5, 1.0).is_err());
        assert!(exponential_remap(f64::NAN, 1.0).is_err());
    }

    #[test]
    fn test_infinite_distance_saturates() {
        assert_eq!(linear_remap(f64::INFINITY, 1.0).unwrap(), 1.0);
        assert_eq!(exponential_remap(f64::INFINITY, 1.0).unwrap(), BELOW_ONE);
    }

    #[test]
    fn test_exponential_remap_stays_below_one() {
        assert!(BELOW_ONE < 1.0);
        assert_eq!(BELOW_ONE, f64::from_bits(1.0_f64.to_bits() - 1));
        for d in [37.0, 40.0, 1e3, 1e300] {
            let t = exponential_remap(d, 1.0).unwrap();
            assert!(t < 1.0, "exponential_remap({}, 1) = {}", d, t);
        }
        assert!(exponential_remap(1e6, 1e-3).unwrap() < 1.0);
    }

    #[test]
    fn test_remap_kind_dispatch() {
        assert_eq!(RemapKind::Linear.remap(2.0, 4.0).unwrap(), 0.5);
        assert!(RemapKind::Exponential.remap(2.0, 4.0).unwrap() < 0.5);
        assert_eq!("exp".parse::<RemapKind>().unwrap(), RemapKind::Exponential);
        assert!("sigmoid".parse::<RemapKind>().is_err());
    }

    #[test]
    fn test_fn_remap() {
        let half = FnRemap::new("half", |d: f64, r: f64| (d / (2.0 * r)).min(1.0));
        assert_eq!(half.remap(1.0, 1.0).unwrap(), 0.5);
        assert!(half.remap(1.0, 0.0).is_err());

        let broken = FnRemap::new("broken", |d: f64, _r: f64| d + 2.0);
        assert!(broken.remap(0.0, 1.0).is_err());
    }
}
