//! Feature registry entries.

use std::sync::Arc;

use crate::error::{validation, FeatureError, FeatureResult};
use crate::metric::{Metric, MetricKind};
use crate::remap::Remap;
use crate::value::FeatureValue;

/// A single feature of a feature space.
///
/// Binds a name to a prototype value, a metric, an optional remap with its
/// scale, and a weight. Defaults: Manhattan metric, no remap, scale 1.0,
/// weight 1.0.
#[derive(Clone, Debug)]
pub struct Feature {
    name: String,
    prototype: FeatureValue,
    metric: Arc<dyn Metric>,
    remap: Option<Arc<dyn Remap>>,
    scale: f64,
    weight: f64,
}

impl Feature {
    /// Create a feature with the default metric and weight
    pub fn new(name: impl Into<String>, prototype: impl Into<FeatureValue>) -> Self {
        Self {
            name: name.into(),
            prototype: prototype.into(),
            metric: Arc::new(MetricKind::default()),
            remap: None,
            scale: 1.0,
            weight: 1.0,
        }
    }

    /// Use a different metric
    pub fn with_metric(mut self, metric: impl Metric + 'static) -> Self {
        self.metric = Arc::new(metric);
        self
    }

    /// Use an already shared metric
    pub fn with_shared_metric(mut self, metric: Arc<dyn Metric>) -> Self {
        self.metric = metric;
        self
    }

    /// Remap raw distances before weighting
    pub fn with_remap(mut self, remap: impl Remap + 'static) -> Self {
        self.remap = Some(Arc::new(remap));
        self
    }

    /// Use an already shared remap
    pub fn with_shared_remap(mut self, remap: Arc<dyn Remap>) -> Self {
        self.remap = Some(remap);
        self
    }

    /// Set the remap scale
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// Set the weight of this feature in the aggregate
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    /// Feature name, unique within a space
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Value a blank element starts with
    pub fn prototype(&self) -> &FeatureValue {
        &self.prototype
    }

    /// Metric comparing two values of this feature
    pub fn metric(&self) -> &dyn Metric {
        self.metric.as_ref()
    }

    /// Remap applied to the raw distance, if any
    pub fn remap(&self) -> Option<&dyn Remap> {
        self.remap.as_deref()
    }

    /// Remap scale (unused without a remap)
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Weight in the aggregate
    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Check name, weight, and (when a remap is set) scale
    pub fn validate(&self) -> FeatureResult<()> {
        validation::validate_name(&self.name)?;
        validation::validate_weight(&self.name, self.weight)?;
        if self.remap.is_some() {
            validation::validate_scale(&self.name, self.scale)?;
        }
        Ok(())
    }

    /// Raw metric value followed by the remapped value (raw when no remap).
    ///
    /// The raw value must be finite and >= 0 whatever the metric's origin.
    pub(crate) fn measure(&self, a: &FeatureValue, b: &FeatureValue) -> FeatureResult<(f64, f64)> {
        let raw = self.metric.distance(a, b)?;
        if !raw.is_finite() || raw < 0.0 {
            return Err(FeatureError::domain(
                self.metric.name(),
                format!("metric returned {}, expected a finite value >= 0", raw),
            ));
        }
        let normalized = match &self.remap {
            Some(remap) => {
                let t = remap.remap(raw, self.scale)?;
                if !(0.0..=1.0).contains(&t) {
                    return Err(FeatureError::domain(
                        remap.name(),
                        format!("remap returned {}, expected a value in [0, 1]", t),
                    ));
                }
                t
            }
            None => raw,
        };
        Ok((raw, normalized))
    }
}
