//! Data models for the packaging evaluation.
//!
//! This module defines the fundamental records:
//! - `Product`: A catalog item with dimensions, weight and fragility
//! - `Material`: A packaging material with sustainability and cost attributes
//! - `PackagingBox`: A computed box with its derived volume
//!
//! Products and boxes implement the traits from the `types` module.

use serde::{Deserialize, Serialize};
#[allow(unused_imports)]
use serde_json::json;
use utoipa::ToSchema;

use crate::types::{Dimensional, Dims, Weighted, validation};

/// Validation error for reference rows.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    InvalidDimension(String),
    InvalidWeight(String),
    InvalidScore(String),
    InvalidCost(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::InvalidDimension(msg) => write!(f, "Invalid dimension: {}", msg),
            ValidationError::InvalidWeight(msg) => write!(f, "Invalid weight: {}", msg),
            ValidationError::InvalidScore(msg) => write!(f, "Invalid score: {}", msg),
            ValidationError::InvalidCost(msg) => write!(f, "Invalid cost: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Lowest value on the fragility/strength scale.
const MIN_ORDINAL: u8 = 1;
const MIN_SCORE: u8 = 1;
const MAX_SCORE: u8 = 5;

fn validate_ordinal(value: u8, name: &str) -> Result<(), ValidationError> {
    if value < MIN_ORDINAL {
        return Err(ValidationError::InvalidScore(format!(
            "{} must be at least {}, got: {}",
            name, MIN_ORDINAL, value
        )));
    }
    Ok(())
}

fn validate_score(value: u8, name: &str) -> Result<(), ValidationError> {
    if !(MIN_SCORE..=MAX_SCORE).contains(&value) {
        return Err(ValidationError::InvalidScore(format!(
            "{} must be between {} and {}, got: {}",
            name, MIN_SCORE, MAX_SCORE, value
        )));
    }
    Ok(())
}

/// A catalog product as read from the products table.
///
/// # Fields
/// * `product_id` - Unique key
/// * `length_cm`, `width_cm`, `height_cm` - Raw item dimensions
/// * `weight_kg` - Item weight
/// * `fragility_score` - Ordinal, higher means more protection required
/// * `current_packaging_material` - Material id of today's packaging
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "product_id": "P003",
    "name": "Wireless Earbuds",
    "length_cm": 8.0,
    "width_cm": 6.0,
    "height_cm": 4.0,
    "weight_kg": 0.1,
    "fragility_score": 3,
    "current_packaging_material": "cardboard_standard"
}))]
pub struct Product {
    pub product_id: String,
    pub name: String,
    pub length_cm: f64,
    pub width_cm: f64,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub fragility_score: u8,
    pub current_packaging_material: String,
}

impl Product {
    /// Checks dimensions, weight and fragility of a loaded row.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validation::validate_dimensions_3d(self.dimensions().as_tuple())
            .map_err(ValidationError::InvalidDimension)?;
        validation::validate_weight(self.weight_kg).map_err(ValidationError::InvalidWeight)?;
        validate_ordinal(self.fragility_score, "Fragility score")?;
        Ok(())
    }
}

impl Dimensional for Product {
    fn dimensions(&self) -> Dims {
        Dims::new(self.length_cm, self.width_cm, self.height_cm)
    }
}

impl Weighted for Product {
    fn weight(&self) -> f64 {
        self.weight_kg
    }
}

/// A packaging material as read from the materials table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "material_id": "cardboard_recycled",
    "name": "Recycled Corrugated Cardboard",
    "strength_rating": 3,
    "recycled_content_percent": 100.0,
    "recyclability_score": 5,
    "biodegradability_score": 4,
    "carbon_footprint_per_unit_sqm": 0.28,
    "cost_per_unit_area": 0.92
}))]
pub struct Material {
    pub material_id: String,
    pub name: String,
    pub strength_rating: u8,
    pub recycled_content_percent: f64,
    pub recyclability_score: u8,
    pub biodegradability_score: u8,
    pub carbon_footprint_per_unit_sqm: f64,
    pub cost_per_unit_area: f64,
}

impl Material {
    /// Checks the rating scales, percentages and cost of a loaded row.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_ordinal(self.strength_rating, "Strength rating")?;
        validation::validate_range(
            self.recycled_content_percent,
            0.0,
            100.0,
            "Recycled content percent",
        )
        .map_err(ValidationError::InvalidScore)?;
        validate_score(self.recyclability_score, "Recyclability score")?;
        validate_score(self.biodegradability_score, "Biodegradability score")?;
        validation::validate_non_negative(self.carbon_footprint_per_unit_sqm, "Carbon footprint")
            .map_err(ValidationError::InvalidScore)?;
        validation::validate_dimension(self.cost_per_unit_area, "Cost per unit area")
            .map_err(ValidationError::InvalidCost)?;
        Ok(())
    }

    /// A material is suitable when its strength meets the required fragility.
    #[inline]
    pub fn is_suitable_for(&self, fragility: f64) -> bool {
        f64::from(self.strength_rating) >= fragility
    }
}

/// A computed packaging box.
///
/// The volume is always derived from the three edges at construction time.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, ToSchema)]
#[schema(example = json!({"length": 11.0, "width": 11.0, "height": 11.0, "volume": 1331.0}))]
pub struct PackagingBox {
    length: f64,
    width: f64,
    height: f64,
    volume: f64,
}

impl PackagingBox {
    /// Creates a box from its edges.
    pub fn from_dims(dims: Dims) -> Self {
        Self {
            length: dims.length,
            width: dims.width,
            height: dims.height,
            volume: dims.volume(),
        }
    }

    /// The zero box that stands for "no items".
    pub fn zero() -> Self {
        Self::from_dims(Dims::zero())
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }
}

impl Dimensional for PackagingBox {
    fn dimensions(&self) -> Dims {
        Dims::new(self.length, self.width, self.height)
    }
}
