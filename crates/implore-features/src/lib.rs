//! implore-features - Multivariate feature spaces and element distances
//!
//! A feature space is a named set of heterogeneous attributes (scalar or
//! vector, real, categorical, boolean). This crate computes one comparable
//! distance between two elements of such a space:
//!
//! - **Metric**: per-feature raw dissimilarity (Euclidean, Manhattan, MaxAbs,
//!   Cosine, Discrete, Hellinger, or a caller-supplied closure)
//! - **Remap**: optional normalization of the raw value into [0, 1]
//!   (Linear, Exponential) so that features in different units compare
//! - **FeatureSpace**: the registry; combines the normalized per-feature
//!   distances as a weighted mean
//!
//! Distances are computed pairwise; there is no batch or matrix API.

pub mod config;
pub mod error;
pub mod feature;
pub mod metric;
pub mod remap;
pub mod space;
pub mod value;

pub use config::{FeatureConfig, FeatureSpaceConfig};
pub use error::{ElementSide, ErrorKind, FeatureError, FeatureResult};
pub use feature::Feature;
pub use metric::*;
pub use remap::*;
pub use space::{Difference, FeatureDistance, FeatureSpace, SharedFeatureSpace};
pub use value::{Element, FeatureValue};

// Setup UniFFI when the feature is enabled
#[cfg(feature = "uniffi")]
uniffi::setup_scaffolding!();
