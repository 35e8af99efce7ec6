//! Shared feature spaces and fixture loading for integration tests

use implore_features::{Element, Feature, FeatureSpace, FeatureSpaceConfig, RemapKind};
use std::path::PathBuf;

/// Get the path to a fixture file
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("test_fixtures")
        .join(name)
}

/// Load a fixture file as a string
pub fn load_fixture(name: &str) -> String {
    std::fs::read_to_string(fixture_path(name))
        .unwrap_or_else(|_| panic!("Failed to load fixture: {}", name))
}

/// Load a feature space configuration fixture
#[allow(dead_code)]
pub fn load_config_fixture(name: &str) -> FeatureSpaceConfig {
    FeatureSpaceConfig::from_json(&load_fixture(name))
        .unwrap_or_else(|e| panic!("Failed to parse fixture {}: {}", name, e))
}

/// Age and income, both linearly remapped to comparable ranges
#[allow(dead_code)]
pub fn age_income_space() -> FeatureSpace {
    FeatureSpace::new()
        .with_feature(
            Feature::new("age", 0.0)
                .with_remap(RemapKind::Linear)
                .with_scale(100.0),
        )
        .unwrap()
        .with_feature(
            Feature::new("income", 0.0)
                .with_remap(RemapKind::Linear)
                .with_scale(100_000.0),
        )
        .unwrap()
}

#[allow(dead_code)]
pub fn person(age: f64, income: f64) -> Element {
    Element::new().with("age", age).with("income", income)
}
