//! Per-feature distance metrics.
//!
//! Each metric computes a non-negative dissimilarity between two values of the
//! same feature. The numeric metrics are exposed as standalone functions over
//! `&[f64]` and can be used outside any feature space. [`MetricKind`] wraps the
//! built-in set behind the [`Metric`] trait; [`FnMetric`] adapts a closure.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{FeatureError, FeatureResult};
use crate::value::FeatureValue;

/// A per-feature distance metric.
///
/// Implementations must be pure: same inputs, same output. The returned value
/// must be finite and >= 0.
pub trait Metric: Send + Sync + fmt::Debug {
    /// Short identifier used in logs and error messages
    fn name(&self) -> &str;

    /// Compute the distance between two values of one feature
    fn distance(&self, a: &FeatureValue, b: &FeatureValue) -> FeatureResult<f64>;
}

/// Built-in metrics
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "uniffi", derive(uniffi::Enum))]
pub enum MetricKind {
    /// L2 norm of the difference
    Euclidean,

    /// L1 norm of the difference
    #[default]
    Manhattan,

    /// L-infinity norm of the difference
    MaxAbs,

    /// One minus the cosine similarity
    Cosine,

    /// 0 for equal values, 1 otherwise
    Discrete,

    /// Hellinger distance between two unnormalized distributions
    Hellinger,
}

impl MetricKind {
    /// All built-in metrics
    pub fn all() -> &'static [MetricKind] {
        &[
            MetricKind::Euclidean,
            MetricKind::Manhattan,
            MetricKind::MaxAbs,
            MetricKind::Cosine,
            MetricKind::Discrete,
            MetricKind::Hellinger,
        ]
    }

    /// Identifier matching the serialized form
    pub fn name(&self) -> &'static str {
        match self {
            MetricKind::Euclidean => "euclidean",
            MetricKind::Manhattan => "manhattan",
            MetricKind::MaxAbs => "max_abs",
            MetricKind::Cosine => "cosine",
            MetricKind::Discrete => "discrete",
            MetricKind::Hellinger => "hellinger",
        }
    }

    /// Whether this metric only accepts numeric values
    pub fn is_numeric(&self) -> bool {
        !matches!(self, MetricKind::Discrete)
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MetricKind {
    type Err = FeatureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "euclidean" | "l2" => Ok(MetricKind::Euclidean),
            "manhattan" | "l1" => Ok(MetricKind::Manhattan),
            "max_abs" | "maxabs" | "linf" => Ok(MetricKind::MaxAbs),
            "cosine" => Ok(MetricKind::Cosine),
            "discrete" => Ok(MetricKind::Discrete),
            "hellinger" => Ok(MetricKind::Hellinger),
            other => Err(FeatureError::InvalidConfig(format!(
                "unknown metric '{}'",
                other
            ))),
        }
    }
}

impl Metric for MetricKind {
    fn name(&self) -> &str {
        MetricKind::name(self)
    }

    fn distance(&self, a: &FeatureValue, b: &FeatureValue) -> FeatureResult<f64> {
        let numeric: fn(&[f64], &[f64]) -> FeatureResult<f64> = match self {
            MetricKind::Discrete => return Ok(discrete_distance(a, b)),
            MetricKind::Euclidean => euclidean_distance,
            MetricKind::Manhattan => manhattan_distance,
            MetricKind::MaxAbs => max_abs_distance,
            MetricKind::Cosine => cosine_distance,
            MetricKind::Hellinger => hellinger_distance,
        };

        let (a, b) = numeric_pair(self.name(), a, b)?;
        numeric(a, b)
    }
}

/// A caller-supplied metric backed by a closure.
pub struct FnMetric<F> {
    name: String,
    func: F,
}

impl<F> FnMetric<F>
where
    F: Fn(&FeatureValue, &FeatureValue) -> FeatureResult<f64> + Send + Sync,
{
    pub fn new(name: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            func,
        }
    }
}

impl<F> fmt::Debug for FnMetric<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnMetric").field("name", &self.name).finish()
    }
}

impl<F> Metric for FnMetric<F>
where
    F: Fn(&FeatureValue, &FeatureValue) -> FeatureResult<f64> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn distance(&self, a: &FeatureValue, b: &FeatureValue) -> FeatureResult<f64> {
        let d = (self.func)(a, b)?;
        if !d.is_finite() || d < 0.0 {
            return Err(FeatureError::domain(
                &self.name,
                format!("metric returned {}, expected a finite value >= 0", d),
            ));
        }
        Ok(d)
    }
}

fn numeric_pair<'a>(
    metric: &str,
    a: &'a FeatureValue,
    b: &'a FeatureValue,
) -> FeatureResult<(&'a [f64], &'a [f64])> {
    match (a.as_slice(), b.as_slice()) {
        (Some(a), Some(b)) => Ok((a, b)),
        _ => Err(FeatureError::domain(
            metric,
            format!(
                "expected numeric values, got {} and {}",
                a.kind_name(),
                b.kind_name()
            ),
        )),
    }
}

fn check_lengths(metric: &str, a: &[f64], b: &[f64]) -> FeatureResult<()> {
    if a.len() != b.len() {
        return Err(FeatureError::domain(
            metric,
            format!("vector lengths differ ({} vs {})", a.len(), b.len()),
        ));
    }
    Ok(())
}

fn finite(metric: &str, d: f64) -> FeatureResult<f64> {
    if d.is_finite() {
        Ok(d)
    } else {
        Err(FeatureError::domain(metric, format!("non-finite result {}", d)))
    }
}

/// Largest |aᵢ−bᵢ|, rejecting NaN components
fn largest_difference(metric: &str, a: &[f64], b: &[f64]) -> FeatureResult<f64> {
    let mut max = 0.0_f64;
    for (x, y) in a.iter().zip(b) {
        let d = (x - y).abs();
        // f64::max would swallow a NaN difference
        if d.is_nan() {
            return Err(FeatureError::domain(metric, "NaN component"));
        }
        max = max.max(d);
    }
    finite(metric, max)
}

/// Euclidean (L2) distance: sqrt(Σ (aᵢ−bᵢ)²)
///
/// Differences are scaled by the largest one before squaring, so the result
/// is finite whenever the true distance is.
pub fn euclidean_distance(a: &[f64], b: &[f64]) -> FeatureResult<f64> {
    check_lengths("euclidean", a, b)?;
    let scale = largest_difference("euclidean", a, b)?;
    if scale == 0.0 {
        return Ok(0.0);
    }
    let sum: f64 = a.iter().zip(b).map(|(x, y)| ((x - y) / scale).powi(2)).sum();
    finite("euclidean", scale * sum.sqrt())
}

/// Manhattan (L1) distance: Σ |aᵢ−bᵢ|
pub fn manhattan_distance(a: &[f64], b: &[f64]) -> FeatureResult<f64> {
    check_lengths("manhattan", a, b)?;
    let sum: f64 = a.iter().zip(b).map(|(x, y)| (x - y).abs()).sum();
    finite("manhattan", sum)
}

/// Maximum element-wise absolute difference (L∞). Empty vectors give 0.
pub fn max_abs_distance(a: &[f64], b: &[f64]) -> FeatureResult<f64> {
    check_lengths("max_abs", a, b)?;
    largest_difference("max_abs", a, b)
}

/// Cosine distance: 1 − (a·b)/(‖a‖‖b‖), in [0, 2].
///
/// Fails when either vector has zero norm.
pub fn cosine_distance(a: &[f64], b: &[f64]) -> FeatureResult<f64> {
    check_lengths("cosine", a, b)?;

    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return Err(FeatureError::domain("cosine", "zero-norm vector"));
    }
    if a == b {
        return Ok(0.0);
    }

    let d = 1.0 - dot / (norm_a * norm_b);
    finite("cosine", d.clamp(0.0, 2.0))
}

/// Discrete distance: 0 if equal, 1 otherwise. No tolerance.
pub fn discrete_distance<T: PartialEq + ?Sized>(a: &T, b: &T) -> f64 {
    if a == b {
        0.0
    } else {
        1.0
    }
}

/// Hellinger distance between two unnormalized distributions.
///
/// Both inputs are normalized to sum to 1, then
/// `sqrt(1 − Σ sqrt(aᵢ·bᵢ))` is returned. The inner term is clamped at 0
/// when rounding pushes the Bhattacharyya coefficient above 1.
pub fn hellinger_distance(a: &[f64], b: &[f64]) -> FeatureResult<f64> {
    check_lengths("hellinger", a, b)?;

    if a.iter().chain(b).any(|x| !x.is_finite() || *x < 0.0) {
        return Err(FeatureError::domain(
            "hellinger",
            "components must be finite and non-negative",
        ));
    }

    let sum_a: f64 = a.iter().sum();
    let sum_b: f64 = b.iter().sum();
    if sum_a <= 0.0 || sum_b <= 0.0 {
        return Err(FeatureError::domain("hellinger", "distribution sums to zero"));
    }
    if a == b {
        return Ok(0.0);
    }

    let bc: f64 = a
        .iter()
        .zip(b)
        .map(|(x, y)| ((x / sum_a) * (y / sum_b)).sqrt())
        .sum();

    finite("hellinger", (1.0 - bc).max(0.0).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    #[test]
    fn test_euclidean() {
        assert!((euclidean_distance(&[0.0, 0.0], &[3.0, 4.0]).unwrap() - 5.0).abs() < EPS);
        assert_eq!(euclidean_distance(&[1.0], &[1.0]).unwrap(), 0.0);
    }

    #[test]
    fn test_euclidean_large_components() {
        assert_eq!(euclidean_distance(&[1e200], &[0.0]).unwrap(), 1e200);
        let d = euclidean_distance(&[3e200, 0.0], &[0.0, 4e200]).unwrap();
        assert!((d / 5e200 - 1.0).abs() < EPS);
        assert!(euclidean_distance(&[f64::NAN, 0.0], &[0.0, 0.0]).is_err());
    }

    #[test]
    fn test_manhattan() {
        assert_eq!(manhattan_distance(&[30.0], &[80.0]).unwrap(), 50.0);
        assert_eq!(manhattan_distance(&[1.0, -1.0], &[-1.0, 1.0]).unwrap(), 4.0);
    }

    #[test]
    fn test_max_abs_is_elementwise_max() {
        assert_eq!(
            max_abs_distance(&[1.0, 5.0, -2.0], &[2.0, 1.0, -2.5]).unwrap(),
            4.0
        );
        assert_eq!(max_abs_distance(&[], &[]).unwrap(), 0.0);
    }

    #[test]
    fn test_max_abs_rejects_nan() {
        assert!(max_abs_distance(&[f64::NAN], &[1.0]).is_err());
    }

    #[test]
    fn test_cosine() {
        assert!((cosine_distance(&[1.0, 0.0], &[0.0, 1.0]).unwrap() - 1.0).abs() < EPS);
        assert!((cosine_distance(&[1.0, 0.0], &[-1.0, 0.0]).unwrap() - 2.0).abs() < EPS);
        assert!(cosine_distance(&[1.0, 2.0], &[2.0, 4.0]).unwrap() < EPS);
        assert_eq!(cosine_distance(&[0.3, 0.7], &[0.3, 0.7]).unwrap(), 0.0);
    }

    #[test]
    fn test_cosine_zero_norm() {
        let err = cosine_distance(&[0.0, 0.0], &[1.0, 0.0]).unwrap_err();
        assert!(matches!(err, FeatureError::Domain { .. }));
    }

    #[test]
    fn test_discrete() {
        assert_eq!(discrete_distance("X", "X"), 0.0);
        assert_eq!(discrete_distance("X", "Y"), 1.0);
        assert_eq!(discrete_distance(&true, &false), 1.0);
    }

    #[test]
    fn test_hellinger() {
        assert_eq!(hellinger_distance(&[1.0, 2.0], &[1.0, 2.0]).unwrap(), 0.0);
        // Disjoint supports are maximally distant
        assert!((hellinger_distance(&[1.0, 0.0], &[0.0, 1.0]).unwrap() - 1.0).abs() < EPS);
        // Scaling does not matter after normalization
        assert!(hellinger_distance(&[1.0, 3.0], &[2.0, 6.0]).unwrap() < 1e-7);
    }

    #[test]
    fn test_hellinger_domain() {
        assert!(hellinger_distance(&[0.0, 0.0], &[1.0, 1.0]).is_err());
        assert!(hellinger_distance(&[-1.0, 2.0], &[1.0, 1.0]).is_err());
    }

    #[test]
    fn test_length_mismatch() {
        let err = euclidean_distance(&[1.0, 2.0], &[1.0]).unwrap_err();
        assert!(err.to_string().contains("lengths differ"));
    }

    #[test]
    fn test_metric_kind_dispatch() {
        let a = FeatureValue::from(vec![1.0, 2.0]);
        let b = FeatureValue::from(vec![4.0, 6.0]);
        assert!((MetricKind::Euclidean.distance(&a, &b).unwrap() - 5.0).abs() < EPS);
        assert_eq!(MetricKind::Manhattan.distance(&a, &b).unwrap(), 7.0);
        assert_eq!(MetricKind::MaxAbs.distance(&a, &b).unwrap(), 4.0);
    }

    #[test]
    fn test_metric_kind_rejects_categories() {
        let a = FeatureValue::from("X");
        let err = MetricKind::Manhattan.distance(&a, &a).unwrap_err();
        assert!(err.to_string().contains("category"));
    }

    #[test]
    fn test_discrete_kind_on_values() {
        let x = FeatureValue::from("X");
        let y = FeatureValue::from("Y");
        assert_eq!(MetricKind::Discrete.distance(&x, &x).unwrap(), 0.0);
        assert_eq!(MetricKind::Discrete.distance(&x, &y).unwrap(), 1.0);
        assert_eq!(
            MetricKind::Discrete
                .distance(&FeatureValue::from(1.0), &FeatureValue::from(vec![1.0]))
                .unwrap(),
            1.0
        );
    }

    #[test]
    fn test_default_metric_is_manhattan() {
        assert_eq!(MetricKind::default(), MetricKind::Manhattan);
    }

    #[test]
    fn test_metric_kind_from_str() {
        for kind in MetricKind::all() {
            assert_eq!(kind.name().parse::<MetricKind>().unwrap(), *kind);
        }
        assert_eq!("L2".parse::<MetricKind>().unwrap(), MetricKind::Euclidean);
        assert_eq!("max-abs".parse::<MetricKind>().unwrap(), MetricKind::MaxAbs);
        assert!("chebyshev2".parse::<MetricKind>().is_err());
    }

    #[test]
    fn test_metric_kind_serde_matches_name() {
        for kind in MetricKind::all() {
            let json = serde_json::to_string(kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.name()));
        }
    }

    #[test]
    fn test_fn_metric() {
        let metric = FnMetric::new("year_gap", |a: &FeatureValue, b: &FeatureValue| {
            match (a.as_scalar(), b.as_scalar()) {
                (Some(x), Some(y)) => Ok((x - y).abs() / 10.0),
                _ => Err(FeatureError::domain("year_gap", "expected scalars")),
            }
        });
        assert_eq!(metric.name(), "year_gap");
        let d = metric
            .distance(&FeatureValue::from(1990.0), &FeatureValue::from(2010.0))
            .unwrap();
        assert!((d - 2.0).abs() < EPS);
    }

    #[test]
    fn test_fn_metric_rejects_negative_output() {
        let metric = FnMetric::new("broken", |_: &FeatureValue, _: &FeatureValue| Ok(-1.0));
        let v = FeatureValue::from(1.0);
        assert!(matches!(
            metric.distance(&v, &v),
            Err(FeatureError::Domain { .. })
        ));
    }
}
