//! Declarative feature space configuration
//!
//! A [`FeatureSpaceConfig`] describes a feature space using the built-in
//! metrics and remaps, so a space can be defined in JSON (or TOML with the
//! `toml-config` feature) and built in one call.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::{validation, FeatureError, FeatureResult};
use crate::feature::Feature;
use crate::metric::MetricKind;
use crate::remap::RemapKind;
use crate::space::FeatureSpace;
use crate::value::FeatureValue;

/// Configuration of a whole feature space
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureSpaceConfig {
    /// Features in registration order
    #[serde(default)]
    pub features: Vec<FeatureConfig>,
}

/// Configuration of a single feature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureConfig {
    /// Feature name, unique within the space
    pub name: String,
    /// Distance metric
    #[serde(default)]
    pub metric: MetricKind,
    /// Optional remap into [0, 1]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remap: Option<RemapKind>,
    /// Remap scale
    #[serde(default = "default_scale")]
    pub scale: f64,
    /// Weight in the aggregate
    #[serde(default = "default_weight")]
    pub weight: f64,
    /// Value used for blank elements
    pub prototype: FeatureValue,
}

fn default_scale() -> f64 {
    1.0
}

fn default_weight() -> f64 {
    1.0
}

impl FeatureConfig {
    pub fn new(name: impl Into<String>, prototype: impl Into<FeatureValue>) -> Self {
        Self {
            name: name.into(),
            metric: MetricKind::default(),
            remap: None,
            scale: default_scale(),
            weight: default_weight(),
            prototype: prototype.into(),
        }
    }

    /// Check the same constraints registration enforces
    pub fn validate(&self) -> FeatureResult<()> {
        validation::validate_name(&self.name)?;
        validation::validate_weight(&self.name, self.weight)?;
        if self.remap.is_some() {
            validation::validate_scale(&self.name, self.scale)?;
        }
        Ok(())
    }

    /// Turn this configuration into a registry entry
    pub fn to_feature(&self) -> Feature {
        let feature = Feature::new(self.name.clone(), self.prototype.clone())
            .with_metric(self.metric)
            .with_scale(self.scale)
            .with_weight(self.weight);
        match self.remap {
            Some(remap) => feature.with_remap(remap),
            None => feature,
        }
    }
}

impl FeatureSpaceConfig {
    /// Create an empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a feature, builder style
    pub fn with_feature(mut self, feature: FeatureConfig) -> Self {
        self.features.push(feature);
        self
    }

    /// Load configuration from a JSON string
    pub fn from_json(json_str: &str) -> FeatureResult<Self> {
        Ok(serde_json::from_str(json_str)?)
    }

    /// Serialize configuration to JSON
    pub fn to_json(&self) -> FeatureResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load configuration from a TOML string
    #[cfg(feature = "toml-config")]
    pub fn from_toml(toml_str: &str) -> FeatureResult<Self> {
        toml::from_str(toml_str).map_err(|e| FeatureError::Toml(e.to_string()))
    }

    /// Serialize configuration to TOML
    #[cfg(feature = "toml-config")]
    pub fn to_toml(&self) -> FeatureResult<String> {
        toml::to_string_pretty(self).map_err(|e| FeatureError::Toml(e.to_string()))
    }

    /// Validate every feature and check names are unique
    pub fn validate(&self) -> FeatureResult<()> {
        let mut seen = HashSet::new();
        for feature in &self.features {
            feature.validate()?;
            if !seen.insert(feature.name.as_str()) {
                return Err(FeatureError::DuplicateFeature(feature.name.clone()));
            }
        }
        Ok(())
    }

    /// Build a feature space with the configured features in order
    pub fn build(&self) -> FeatureResult<FeatureSpace> {
        self.validate()?;
        let mut space = FeatureSpace::new();
        for feature in &self.features {
            space.add_feature(feature.to_feature())?;
        }
        Ok(space)
    }
}
