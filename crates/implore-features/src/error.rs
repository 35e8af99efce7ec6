//! Error types for implore-features
//!
//! Errors fall into three caller-facing categories:
//! - Configuration mistakes (bad weights, bad scales, duplicate names)
//! - Lookup failures (an element is missing a registered feature)
//! - Numeric domain violations (a metric cannot produce a finite value)

use std::fmt;

use thiserror::Error;

/// Which of the two elements passed to a difference call was at fault
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ElementSide {
    Left,
    Right,
}

impl fmt::Display for ElementSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementSide::Left => write!(f, "left"),
            ElementSide::Right => write!(f, "right"),
        }
    }
}

/// Broad category of a [`FeatureError`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Lookup,
    Domain,
    Internal,
}

/// Main error type for feature space operations
#[derive(Error, Debug)]
pub enum FeatureError {
    /// The registered weights sum to zero (or nothing is registered)
    #[error("Total feature weight is zero; the weighted mean is undefined")]
    ZeroWeight,

    /// Remap scale must be finite and strictly positive
    #[error("Invalid scale for feature '{feature}': {scale} (must be finite and > 0)")]
    InvalidScale { feature: String, scale: f64 },

    /// Weights must be finite and non-negative
    #[error("Invalid weight for feature '{feature}': {weight} (must be finite and >= 0)")]
    InvalidWeight { feature: String, weight: f64 },

    /// A feature with this name is already registered
    #[error("Feature '{0}' is already registered")]
    DuplicateFeature(String),

    /// Other configuration problems
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// An element has no value for a registered feature
    #[error("Feature '{feature}' is missing from the {side} element")]
    MissingFeature { feature: String, side: ElementSide },

    /// A metric or remap received input outside its domain
    #[error("{metric}: {reason}")]
    Domain { metric: String, reason: String },

    /// The shared registry lock was poisoned by a panicking writer
    #[error("Feature space lock poisoned")]
    LockPoisoned,

    /// JSON configuration could not be parsed or written
    #[error("JSON configuration error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML configuration could not be parsed or written
    #[error("TOML configuration error: {0}")]
    Toml(String),
}

impl FeatureError {
    /// Shorthand for a [`FeatureError::Domain`] error
    pub fn domain(metric: impl Into<String>, reason: impl Into<String>) -> Self {
        FeatureError::Domain {
            metric: metric.into(),
            reason: reason.into(),
        }
    }

    /// Categorize this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            FeatureError::ZeroWeight
            | FeatureError::InvalidScale { .. }
            | FeatureError::InvalidWeight { .. }
            | FeatureError::DuplicateFeature(_)
            | FeatureError::InvalidConfig(_)
            | FeatureError::Json(_)
            | FeatureError::Toml(_) => ErrorKind::Configuration,
            FeatureError::MissingFeature { .. } => ErrorKind::Lookup,
            FeatureError::Domain { .. } => ErrorKind::Domain,
            FeatureError::LockPoisoned => ErrorKind::Internal,
        }
    }
}

/// Result type alias for feature space operations
pub type FeatureResult<T> = Result<T, FeatureError>;

/// Validation utilities shared by registration and configuration
pub mod validation {
    use super::*;

    /// Validate a feature weight
    pub fn validate_weight(feature: &str, weight: f64) -> FeatureResult<()> {
        if !weight.is_finite() || weight < 0.0 {
            return Err(FeatureError::InvalidWeight {
                feature: feature.to_string(),
                weight,
            });
        }
        Ok(())
    }

    /// Validate a remap scale
    pub fn validate_scale(feature: &str, scale: f64) -> FeatureResult<()> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(FeatureError::InvalidScale {
                feature: feature.to_string(),
                scale,
            });
        }
        Ok(())
    }

    /// Validate a feature name
    pub fn validate_name(name: &str) -> FeatureResult<()> {
        if name.trim().is_empty() {
            return Err(FeatureError::InvalidConfig(
                "feature name must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
