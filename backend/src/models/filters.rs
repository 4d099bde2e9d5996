//! Search filter sliders (distance, temperature, size).

use serde::{Deserialize, Serialize};

use super::stellar::{DISTANCE_CATEGORIES, SIZE_CATEGORIES, STELLAR_CLASSES};

/// Slider positions on the search view. Each index addresses one row of the
/// matching table in [`super::stellar`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchFilters {
    pub distance_index: usize,
    pub temperature_index: usize,
    pub size_index: usize,
}

impl Default for SearchFilters {
    fn default() -> Self {
        // Intermediate distance, F class, solar size
        Self {
            distance_index: 2,
            temperature_index: 3,
            size_index: 1,
        }
    }
}

/// Human-readable description of one slider position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterInfo {
    pub index: usize,
    pub name: String,
    pub description: String,
    pub range: String,
    /// Representative value for the category (its midpoint)
    pub value: f64,
}

impl SearchFilters {
    /// Build filters from raw slider values, rounding and clamping each.
    pub fn from_sliders(distance: f64, temperature: f64, size: f64) -> Self {
        Self {
            distance_index: clamp_slider(distance, DISTANCE_CATEGORIES.len()),
            temperature_index: clamp_slider(temperature, STELLAR_CLASSES.len()),
            size_index: clamp_slider(size, SIZE_CATEGORIES.len()),
        }
    }

    /// Same filters with every index clamped into its table.
    pub fn clamped(self) -> Self {
        Self {
            distance_index: self.distance_index.min(DISTANCE_CATEGORIES.len() - 1),
            temperature_index: self.temperature_index.min(STELLAR_CLASSES.len() - 1),
            size_index: self.size_index.min(SIZE_CATEGORIES.len() - 1),
        }
    }

    pub fn temperature_info(&self) -> FilterInfo {
        let class = &STELLAR_CLASSES[self.clamped().temperature_index];
        FilterInfo {
            index: self.clamped().temperature_index,
            name: format!("{} ({})", class.class, class.name),
            description: format!("Class {}", class.class),
            range: format!("{}–{} K", class.min_k, class.max_k),
            value: ((class.min_k + class.max_k) / 2.0).round(),
        }
    }

    pub fn size_info(&self) -> FilterInfo {
        let category = &SIZE_CATEGORIES[self.clamped().size_index];
        FilterInfo {
            index: self.clamped().size_index,
            name: category.name.to_string(),
            description: category.description.to_string(),
            range: format!("{}–{} R☉", category.min_r_sun, category.max_r_sun),
            value: (category.min_r_sun + category.max_r_sun) / 2.0,
        }
    }

    pub fn distance_info(&self) -> FilterInfo {
        let category = &DISTANCE_CATEGORIES[self.clamped().distance_index];
        FilterInfo {
            index: self.clamped().distance_index,
            name: category.name.to_string(),
            description: category.description.to_string(),
            range: format!("{}–{} light-years", category.min_ly, category.max_ly),
            value: ((category.min_ly + category.max_ly) / 2.0).round(),
        }
    }
}

fn clamp_slider(value: f64, len: usize) -> usize {
    if !value.is_finite() || value <= 0.0 {
        return 0;
    }
    (value.round() as usize).min(len - 1)
}
