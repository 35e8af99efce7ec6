//! Feature space registry and weighted difference computation.
//!
//! A [`FeatureSpace`] owns an ordered list of [`Feature`]s. Each instance has
//! its own registry; nothing is shared between spaces.
//!
//! # Example
//!
//! ```
//! use implore_features::{Element, Feature, FeatureSpace, RemapKind};
//!
//! let mut space = FeatureSpace::new();
//! space
//!     .add_feature(
//!         Feature::new("age", 0.0)
//!             .with_remap(RemapKind::Linear)
//!             .with_scale(100.0),
//!     )
//!     .unwrap();
//! space
//!     .add_feature(
//!         Feature::new("income", 0.0)
//!             .with_remap(RemapKind::Linear)
//!             .with_scale(100_000.0),
//!     )
//!     .unwrap();
//!
//! let a = Element::new().with("age", 30.0).with("income", 40_000.0);
//! let b = Element::new().with("age", 80.0).with("income", 45_000.0);
//!
//! let d = space.difference(&a, &b).unwrap();
//! assert!((d - 0.275).abs() < 1e-12);
//! ```

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::{debug, trace, warn};

use crate::error::{ElementSide, FeatureError, FeatureResult};
use crate::feature::Feature;
use crate::value::{Element, FeatureValue};

/// Contribution of one feature to a difference
#[derive(Clone, Debug, PartialEq)]
pub struct FeatureDistance {
    /// Feature name
    pub name: String,
    /// Metric output before remapping
    pub raw: f64,
    /// Remapped value (equal to `raw` when the feature has no remap)
    pub normalized: f64,
    /// Weight the feature was registered with
    pub weight: f64,
}

/// Aggregate difference between two elements with its per-feature breakdown
#[derive(Clone, Debug, PartialEq)]
pub struct Difference {
    /// Weighted mean of the normalized per-feature distances
    pub value: f64,
    /// Per-feature distances in registration order
    pub features: Vec<FeatureDistance>,
}

impl Difference {
    /// Normalized per-feature distances in registration order
    pub fn normalized(&self) -> Vec<f64> {
        self.features.iter().map(|f| f.normalized).collect()
    }

    /// Look up the contribution of a feature by name
    pub fn get(&self, name: &str) -> Option<&FeatureDistance> {
        self.features.iter().find(|f| f.name == name)
    }
}

/// Registry of features defining a multivariate space and its distance.
#[derive(Clone, Debug, Default)]
pub struct FeatureSpace {
    features: Vec<Feature>,
    by_name: HashMap<String, usize>,
}

impl FeatureSpace {
    /// Create an empty feature space
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a feature.
    ///
    /// Fails if the feature is invalid or a feature with the same name is
    /// already registered.
    pub fn add_feature(&mut self, feature: Feature) -> FeatureResult<()> {
        feature.validate()?;
        if self.by_name.contains_key(feature.name()) {
            return Err(FeatureError::DuplicateFeature(feature.name().to_string()));
        }

        if feature.weight() == 0.0 {
            warn!(feature = feature.name(), "registered feature has zero weight");
        }
        debug!(
            feature = feature.name(),
            metric = feature.metric().name(),
            remap = feature.remap().map(|r| r.name()),
            scale = feature.scale(),
            weight = feature.weight(),
            "registered feature"
        );

        let index = self.features.len();
        self.by_name.insert(feature.name().to_string(), index);
        self.features.push(feature);
        Ok(())
    }

    /// Register a feature, builder style
    pub fn with_feature(mut self, feature: Feature) -> FeatureResult<Self> {
        self.add_feature(feature)?;
        Ok(self)
    }

    /// A blank element: every feature mapped to a copy of its prototype
    pub fn element(&self) -> Element {
        self.features
            .iter()
            .map(|f| (f.name().to_string(), f.prototype().clone()))
            .collect()
    }

    /// Weighted mean of the normalized per-feature distances between `a` and `b`
    pub fn difference(&self, a: &Element, b: &Element) -> FeatureResult<f64> {
        self.accumulate(a, b, None)
    }

    /// Like [`difference`](Self::difference), also returning each feature's
    /// contribution in registration order
    pub fn difference_with_metrics(&self, a: &Element, b: &Element) -> FeatureResult<Difference> {
        let mut features = Vec::with_capacity(self.features.len());
        let value = self.accumulate(a, b, Some(&mut features))?;
        Ok(Difference { value, features })
    }

    fn accumulate(
        &self,
        a: &Element,
        b: &Element,
        mut record: Option<&mut Vec<FeatureDistance>>,
    ) -> FeatureResult<f64> {
        let mut weighted_sum = 0.0;
        let mut weight_total = 0.0;

        for feature in &self.features {
            let name = feature.name();
            let av = lookup(a, name, ElementSide::Left)?;
            let bv = lookup(b, name, ElementSide::Right)?;

            let (raw, normalized) = feature.measure(av, bv)?;
            trace!(feature = name, raw, normalized, weight = feature.weight());

            weighted_sum += normalized * feature.weight();
            weight_total += feature.weight();

            if let Some(out) = record.as_deref_mut() {
                out.push(FeatureDistance {
                    name: name.to_string(),
                    raw,
                    normalized,
                    weight: feature.weight(),
                });
            }
        }

        if weight_total <= 0.0 {
            return Err(FeatureError::ZeroWeight);
        }

        let value = weighted_sum / weight_total;
        if !weight_total.is_finite() || !value.is_finite() {
            return Err(FeatureError::domain(
                "difference",
                format!(
                    "weighted mean overflowed (sum {}, total weight {})",
                    weighted_sum, weight_total
                ),
            ));
        }
        debug!(value, features = self.features.len(), "computed difference");
        Ok(value)
    }

    /// Get a feature by name
    pub fn get(&self, name: &str) -> Option<&Feature> {
        self.by_name.get(name).map(|&index| &self.features[index])
    }

    /// Whether a feature with this name is registered
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Feature names in registration order
    pub fn feature_names(&self) -> Vec<&str> {
        self.features.iter().map(|f| f.name()).collect()
    }

    /// Iterate over features in registration order
    pub fn iter(&self) -> impl Iterator<Item = &Feature> {
        self.features.iter()
    }

    /// Sum of all registered weights
    pub fn total_weight(&self) -> f64 {
        self.features.iter().map(|f| f.weight()).sum()
    }

    /// Get the number of registered features
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Check if no features are registered
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

fn lookup<'a>(element: &'a Element, name: &str, side: ElementSide) -> FeatureResult<&'a FeatureValue> {
    element.get(name).ok_or_else(|| FeatureError::MissingFeature {
        feature: name.to_string(),
        side,
    })
}

/// A feature space that can be extended while other threads compute
/// differences.
///
/// Spaces that are fully built before use can be shared directly (`FeatureSpace`
/// is `Send + Sync`); this wrapper is for registration interleaved with reads.
#[derive(Clone, Debug, Default)]
pub struct SharedFeatureSpace {
    inner: Arc<RwLock<FeatureSpace>>,
}

impl SharedFeatureSpace {
    /// Wrap an existing feature space
    pub fn new(space: FeatureSpace) -> Self {
        Self {
            inner: Arc::new(RwLock::new(space)),
        }
    }

    /// Register a feature under the write lock
    pub fn add_feature(&self, feature: Feature) -> FeatureResult<()> {
        self.inner
            .write()
            .map_err(|_| FeatureError::LockPoisoned)?
            .add_feature(feature)
    }

    /// A blank element of the current registry
    pub fn element(&self) -> FeatureResult<Element> {
        Ok(self.read()?.element())
    }

    /// See [`FeatureSpace::difference`]
    pub fn difference(&self, a: &Element, b: &Element) -> FeatureResult<f64> {
        self.read()?.difference(a, b)
    }

    /// See [`FeatureSpace::difference_with_metrics`]
    pub fn difference_with_metrics(&self, a: &Element, b: &Element) -> FeatureResult<Difference> {
        self.read()?.difference_with_metrics(a, b)
    }

    /// Number of registered features
    pub fn len(&self) -> FeatureResult<usize> {
        Ok(self.read()?.len())
    }

    /// Copy of the current registry
    pub fn snapshot(&self) -> FeatureResult<FeatureSpace> {
        Ok(self.read()?.clone())
    }

    fn read(&self) -> FeatureResult<std::sync::RwLockReadGuard<'_, FeatureSpace>> {
        self.inner.read().map_err(|_| FeatureError::LockPoisoned)
    }
}

impl From<FeatureSpace> for SharedFeatureSpace {
    fn from(space: FeatureSpace) -> Self {
        Self::new(space)
    }
}
