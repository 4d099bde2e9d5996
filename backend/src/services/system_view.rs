//! Stellar-system scene parameters for the candidate backdrop.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::models::stellar::{
    classify_distance, classify_size, classify_temperature, distance_category_index,
};

const BASE_STAR_RADIUS_PX: f64 = 20.0;
const MAX_STAR_RADIUS_PX: f64 = 80.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BackgroundStar {
    /// Percent of scene width
    pub x: f64,
    /// Percent of scene height
    pub y: f64,
    pub size: f64,
    pub opacity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemScene {
    pub stellar_class: String,
    pub class_name: String,
    pub color: String,
    pub size_category: String,
    pub distance_category: String,
    pub star_radius_px: f64,
    pub glow_intensity: f64,
    pub background_stars: Vec<BackgroundStar>,
}

/// Star radius in pixels, logarithmic in solar radii.
pub fn star_radius_px(radius_r_sun: f64) -> f64 {
    let multiplier = radius_r_sun.max(0.1).log10() + 1.0;
    (BASE_STAR_RADIUS_PX * multiplier).min(MAX_STAR_RADIUS_PX)
}

/// Farther systems glow dimmer.
pub fn glow_intensity(distance_index: usize) -> f64 {
    (1.0 - distance_index as f64 * 0.15).max(0.0)
}

/// Farther systems show fewer background stars, never fewer than five.
pub fn background_star_count(distance_index: usize) -> usize {
    20usize.saturating_sub(distance_index * 3).max(5)
}

pub fn system_scene<R: Rng + ?Sized>(
    temperature_k: f64,
    radius_r_sun: f64,
    distance_ly: f64,
    rng: &mut R,
) -> SystemScene {
    let class = classify_temperature(temperature_k);
    let distance_index = distance_category_index(distance_ly);

    let background_stars = (0..background_star_count(distance_index))
        .map(|_| BackgroundStar {
            x: rng.gen::<f64>() * 100.0,
            y: rng.gen::<f64>() * 100.0,
            size: rng.gen::<f64>() * 2.0 + 0.5,
            opacity: rng.gen::<f64>() * 0.6 + 0.2,
        })
        .collect();

    SystemScene {
        stellar_class: class.class.to_string(),
        class_name: class.name.to_string(),
        color: class.color.to_string(),
        size_category: classify_size(radius_r_sun).name.to_string(),
        distance_category: classify_distance(distance_ly).name.to_string(),
        star_radius_px: star_radius_px(radius_r_sun),
        glow_intensity: glow_intensity(distance_index),
        background_stars,
    }
}
