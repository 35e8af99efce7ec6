//! Feature values and elements.
//!
//! A [`FeatureValue`] is a single attribute value (scalar, vector, category,
//! or boolean). An [`Element`] maps feature names to values and represents one
//! concrete point of a feature space.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Runtime value of a single feature
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "uniffi", derive(uniffi::Enum))]
pub enum FeatureValue {
    /// Scalar numeric value
    Scalar(f64),

    /// Fixed-length numeric vector
    Vector(Vec<f64>),

    /// Categorical token
    Category(String),

    /// Boolean flag
    Bool(bool),
}

impl FeatureValue {
    /// Numeric view of this value.
    ///
    /// Scalars are exposed as length-1 slices; categories and booleans have no
    /// numeric view.
    pub fn as_slice(&self) -> Option<&[f64]> {
        match self {
            FeatureValue::Scalar(v) => Some(std::slice::from_ref(v)),
            FeatureValue::Vector(v) => Some(v),
            _ => None,
        }
    }

    /// Try to extract as f64
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            FeatureValue::Scalar(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to extract as a category token
    pub fn as_category(&self) -> Option<&str> {
        match self {
            FeatureValue::Category(v) => Some(v),
            _ => None,
        }
    }

    /// Try to extract as bool
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FeatureValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Whether this value has a numeric view
    pub fn is_numeric(&self) -> bool {
        matches!(self, FeatureValue::Scalar(_) | FeatureValue::Vector(_))
    }

    /// Human-readable kind name
    pub fn kind_name(&self) -> &'static str {
        match self {
            FeatureValue::Scalar(_) => "scalar",
            FeatureValue::Vector(_) => "vector",
            FeatureValue::Category(_) => "category",
            FeatureValue::Bool(_) => "bool",
        }
    }
}

impl From<f64> for FeatureValue {
    fn from(v: f64) -> Self {
        FeatureValue::Scalar(v)
    }
}

impl From<i64> for FeatureValue {
    fn from(v: i64) -> Self {
        FeatureValue::Scalar(v as f64)
    }
}

impl From<i32> for FeatureValue {
    fn from(v: i32) -> Self {
        FeatureValue::Scalar(f64::from(v))
    }
}

impl From<Vec<f64>> for FeatureValue {
    fn from(v: Vec<f64>) -> Self {
        FeatureValue::Vector(v)
    }
}

impl From<&[f64]> for FeatureValue {
    fn from(v: &[f64]) -> Self {
        FeatureValue::Vector(v.to_vec())
    }
}

impl From<&str> for FeatureValue {
    fn from(v: &str) -> Self {
        FeatureValue::Category(v.to_string())
    }
}

impl From<String> for FeatureValue {
    fn from(v: String) -> Self {
        FeatureValue::Category(v)
    }
}

impl From<bool> for FeatureValue {
    fn from(v: bool) -> Self {
        FeatureValue::Bool(v)
    }
}

/// One element of a feature space: feature name to value.
///
/// Elements are not checked against any registry when built. Missing
/// features surface when the element is used in a difference computation.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Element {
    values: HashMap<String, FeatureValue>,
}

impl Element {
    /// Create an empty element
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a value, builder style
    pub fn with(mut self, name: impl Into<String>, value: impl Into<FeatureValue>) -> Self {
        self.set(name, value);
        self
    }

    /// Set a value, returning the previous one if any
    pub fn set(
        &mut self,
        name: impl Into<String>,
        value: impl Into<FeatureValue>,
    ) -> Option<FeatureValue> {
        self.values.insert(name.into(), value.into())
    }

    /// Get the value of a feature
    pub fn get(&self, name: &str) -> Option<&FeatureValue> {
        self.values.get(name)
    }

    /// Get a mutable reference to the value of a feature
    pub fn get_mut(&mut self, name: &str) -> Option<&mut FeatureValue> {
        self.values.get_mut(name)
    }

    /// Remove a feature value
    pub fn remove(&mut self, name: &str) -> Option<FeatureValue> {
        self.values.remove(name)
    }

    /// Whether a value is present for this feature
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Number of feature values in this element
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the element holds no values
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over (name, value) pairs in arbitrary order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &FeatureValue)> {
        self.values.iter()
    }
}

impl<K, V> FromIterator<(K, V)> for Element
where
    K: Into<String>,
    V: Into<FeatureValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl From<HashMap<String, FeatureValue>> for Element {
    fn from(values: HashMap<String, FeatureValue>) -> Self {
        Self { values }
    }
}
