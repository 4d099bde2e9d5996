//! Stellar classification tables used by the search filters and the
//! stellar-system scene.
//!
//! Ranges are inclusive on both ends; lookups scan in table order and fall
//! back to the first entry when nothing matches.

use serde::Serialize;

/// Spectral class by effective temperature (cool to hot).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StellarClass {
    pub min_k: f64,
    pub max_k: f64,
    pub class: &'static str,
    pub color: &'static str,
    pub name: &'static str,
}

/// Size category in solar radii.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SizeCategory {
    pub min_r_sun: f64,
    pub max_r_sun: f64,
    pub name: &'static str,
    pub description: &'static str,
}

/// Distance category in light-years.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DistanceCategory {
    pub min_ly: f64,
    pub max_ly: f64,
    pub name: &'static str,
    pub description: &'static str,
}

pub const STELLAR_CLASSES: [StellarClass; 7] = [
    StellarClass { min_k: 2000.0, max_k: 3700.0, class: "M", color: "#ff6b6b", name: "Red" },
    StellarClass { min_k: 3700.0, max_k: 5200.0, class: "K", color: "#ff9e6d", name: "Orange" },
    StellarClass { min_k: 5200.0, max_k: 6000.0, class: "G", color: "#ffeb66", name: "Yellow" },
    StellarClass { min_k: 6000.0, max_k: 7500.0, class: "F", color: "#f0f8ff", name: "Yellow-White" },
    StellarClass { min_k: 7500.0, max_k: 10000.0, class: "A", color: "#ffffff", name: "White" },
    StellarClass { min_k: 10000.0, max_k: 30000.0, class: "B", color: "#b0d4ff", name: "Blue-White" },
    StellarClass { min_k: 30000.0, max_k: 50000.0, class: "O", color: "#7bb6ff", name: "Blue" },
];

pub const SIZE_CATEGORIES: [SizeCategory; 6] = [
    SizeCategory {
        min_r_sun: 0.1,
        max_r_sun: 0.5,
        name: "Dwarf",
        description: "Small stars like red dwarfs",
    },
    SizeCategory {
        min_r_sun: 0.5,
        max_r_sun: 1.0,
        name: "Solar",
        description: "Similar in size to our Sun (1 R☉)",
    },
    SizeCategory {
        min_r_sun: 1.0,
        max_r_sun: 2.0,
        name: "Subgiant",
        description: "Larger than the Sun, evolving off the main sequence",
    },
    SizeCategory {
        min_r_sun: 2.0,
        max_r_sun: 10.0,
        name: "Giant",
        description: "Giant stars like Arcturus",
    },
    SizeCategory {
        min_r_sun: 10.0,
        max_r_sun: 100.0,
        name: "Supergiant",
        description: "Supergiants like Betelgeuse",
    },
    SizeCategory {
        min_r_sun: 100.0,
        max_r_sun: 1000.0,
        name: "Hypergiant",
        description: "Rare hypergiants like VY Canis Majoris",
    },
];

pub const DISTANCE_CATEGORIES: [DistanceCategory; 6] = [
    DistanceCategory {
        min_ly: 1.0,
        max_ly: 10.0,
        name: "Very Close",
        description: "Solar system and nearby stars",
    },
    DistanceCategory {
        min_ly: 10.0,
        max_ly: 100.0,
        name: "Close",
        description: "Stars in the solar neighborhood",
    },
    DistanceCategory {
        min_ly: 100.0,
        max_ly: 1000.0,
        name: "Intermediate",
        description: "Within the local spiral arm",
    },
    DistanceCategory {
        min_ly: 1000.0,
        max_ly: 10000.0,
        name: "Far",
        description: "Other arms of the Milky Way",
    },
    DistanceCategory {
        min_ly: 10000.0,
        max_ly: 100000.0,
        name: "Very Far",
        description: "Across the entire galaxy",
    },
    DistanceCategory {
        min_ly: 100000.0,
        max_ly: 10000000.0,
        name: "Galaxies",
        description: "Beyond the Milky Way",
    },
];

/// Index into [`STELLAR_CLASSES`] for a temperature.
pub fn stellar_class_index(temperature_k: f64) -> usize {
    STELLAR_CLASSES
        .iter()
        .position(|c| temperature_k >= c.min_k && temperature_k <= c.max_k)
        .unwrap_or(0)
}

/// Index into [`SIZE_CATEGORIES`] for a radius in solar radii.
pub fn size_category_index(radius_r_sun: f64) -> usize {
    SIZE_CATEGORIES
        .iter()
        .position(|c| radius_r_sun >= c.min_r_sun && radius_r_sun <= c.max_r_sun)
        .unwrap_or(0)
}

/// Index into [`DISTANCE_CATEGORIES`] for a distance in light-years.
pub fn distance_category_index(distance_ly: f64) -> usize {
    DISTANCE_CATEGORIES
        .iter()
        .position(|c| distance_ly >= c.min_ly && distance_ly <= c.max_ly)
        .unwrap_or(0)
}

pub fn classify_temperature(temperature_k: f64) -> &'static StellarClass {
    &STELLAR_CLASSES[stellar_class_index(temperature_k)]
}

pub fn classify_size(radius_r_sun: f64) -> &'static SizeCategory {
    &SIZE_CATEGORIES[size_category_index(radius_r_sun)]
}

pub fn classify_distance(distance_ly: f64) -> &'static DistanceCategory {
    &DISTANCE_CATEGORIES[distance_category_index(distance_ly)]
}
