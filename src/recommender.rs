//! Sustainable packaging material recommendation.
//!
//! Picks the most sustainable material that is strong enough for the
//! requested fragility and not more than `cost_tolerance_factor` times as
//! expensive as the cheapest strong-enough material:
//! 1. Keep materials with `strength_rating >= fragility`
//! 2. Score each by recycled content, recyclability, biodegradability and
//!    inverted carbon footprint
//! 3. Stable sort by score, highest first
//! 4. Keep those within the cost ceiling and return the best one
//!
//! If the cost ceiling leaves nothing, the best suitable material is returned
//! regardless of cost.

use std::cmp::Ordering;

use serde::Serialize;
use utoipa::ToSchema;

use crate::catalog::{ReferenceData, max_carbon_footprint};
use crate::model::Material;

/// Weight per recycled-content percentage point.
pub const RECYCLED_CONTENT_WEIGHT: f64 = 0.005;
/// Weight per recyclability score point.
pub const RECYCLABILITY_WEIGHT: f64 = 0.1;
/// Weight per biodegradability score point.
pub const BIODEGRADABILITY_WEIGHT: f64 = 0.05;
/// Weight of the normalized, inverted carbon footprint.
pub const CARBON_WEIGHT: f64 = 0.2;

/// A recommended material with its sustainability score.
#[derive(Clone, Debug, PartialEq, Serialize, ToSchema)]
pub struct Recommendation {
    pub material: Material,
    /// Internal ranking value, higher is more sustainable
    pub sustainability_score: f64,
}

/// Composite sustainability score of one material.
///
/// `max_carbon` is the largest footprint of the whole material table. If it is
/// zero every footprint is zero and the carbon term gets its full weight.
pub fn sustainability_score(material: &Material, max_carbon: f64) -> f64 {
    let carbon_ratio = if max_carbon > 0.0 {
        material.carbon_footprint_per_unit_sqm / max_carbon
    } else {
        0.0
    };

    material.recycled_content_percent * RECYCLED_CONTENT_WEIGHT
        + f64::from(material.recyclability_score) * RECYCLABILITY_WEIGHT
        + f64::from(material.biodegradability_score) * BIODEGRADABILITY_WEIGHT
        + (1.0 - carbon_ratio) * CARBON_WEIGHT
}

/// Recommends a material from the reference table.
///
/// # Parameters
/// * `fragility` - Required protection, may be a mean over several products
/// * `cost_tolerance_factor` - Allowed multiple of the cheapest suitable cost
///
/// # Returns
/// `None` only if no material is strong enough
pub fn recommend_material(
    catalog: &ReferenceData,
    fragility: f64,
    cost_tolerance_factor: f64,
) -> Option<Recommendation> {
    recommend_from(catalog.materials(), fragility, cost_tolerance_factor)
}

/// Recommends a material from an arbitrary table, see `recommend_material`.
///
/// Materials with equal scores keep their table order.
pub fn recommend_from(
    materials: &[Material],
    fragility: f64,
    cost_tolerance_factor: f64,
) -> Option<Recommendation> {
    let max_carbon = max_carbon_footprint(materials);

    let mut suitable: Vec<(&Material, f64)> = materials
        .iter()
        .filter(|m| m.is_suitable_for(fragility))
        .map(|m| (m, sustainability_score(m, max_carbon)))
        .collect();

    if suitable.is_empty() {
        return None;
    }

    suitable.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

    let floor_cost = suitable
        .iter()
        .map(|(m, _)| m.cost_per_unit_area)
        .fold(f64::INFINITY, f64::min);
    let ceiling = floor_cost * cost_tolerance_factor;

    let (material, score) = suitable
        .iter()
        .find(|(m, _)| m.cost_per_unit_area <= ceiling)
        .unwrap_or(&suitable[0]);

    Some(Recommendation {
        material: (*material).clone(),
        sustainability_score: *score,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fixture;
    use crate::types::EPSILON_GENERAL;

    fn material(
        id: &str,
        strength: u8,
        recycled: f64,
        recyclability: u8,
        biodegradability: u8,
        carbon: f64,
        cost: f64,
    ) -> Material {
        Material {
            material_id: id.to_string(),
            name: id.to_string(),
            strength_rating: strength,
            recycled_content_percent: recycled,
            recyclability_score: recyclability,
            biodegradability_score: biodegradability,
            carbon_footprint_per_unit_sqm: carbon,
            cost_per_unit_area: cost,
        }
    }

    #[test]
    fn score_follows_weighted_sum() {
        let m = material("m", 3, 100.0, 5, 4, 0.25, 1.0);
        // 0.5 + 0.5 + 0.2 + (1 - 0.25/0.5) * 0.2
        let expected = 0.5 + 0.5 + 0.2 + 0.1;
        assert!((sustainability_score(&m, 0.5) - expected).abs() < EPSILON_GENERAL);
    }

    #[test]
    fn score_with_zero_max_carbon_uses_full_carbon_weight() {
        let m = material("m", 3, 0.0, 1, 1, 0.0, 1.0);
        let expected = 0.1 + 0.05 + 0.2;
        assert!((sustainability_score(&m, 0.0) - expected).abs() < EPSILON_GENERAL);
        assert!(sustainability_score(&m, 0.0).is_finite());
    }

    #[test]
    fn sole_suitable_material_wins_regardless_of_cost() {
        let materials = vec![
            material("M1", 2, 10.0, 2, 2, 0.5, 1.0),
            material("M2", 4, 80.0, 5, 4, 0.2, 1.3),
        ];
        let rec = recommend_from(&materials, 3.0, 1.2).unwrap();
        assert_eq!(rec.material.material_id, "M2");
    }

    #[test]
    fn cost_tolerance_decides_between_two_suitable_materials() {
        let materials = vec![
            material("cheap", 3, 20.0, 3, 2, 0.6, 1.0),
            material("green", 3, 90.0, 5, 5, 0.2, 1.25),
        ];
        let tight = recommend_from(&materials, 3.0, 1.2).unwrap();
        assert_eq!(tight.material.material_id, "cheap");

        let relaxed = recommend_from(&materials, 3.0, 1.3).unwrap();
        assert_eq!(relaxed.material.material_id, "green");
        assert!(relaxed.sustainability_score > tight.sustainability_score);
    }

    #[test]
    fn no_suitable_material_is_none() {
        let materials = vec![
            material("M1", 2, 10.0, 2, 2, 0.5, 1.0),
            material("M2", 3, 80.0, 5, 4, 0.2, 1.3),
        ];
        assert!(recommend_from(&materials, 3.5, 1.5).is_none());
        assert!(recommend_from(&[], 1.0, 1.2).is_none());
    }

    #[test]
    fn fractional_fragility_needs_next_strength() {
        let materials = vec![
            material("weak", 2, 100.0, 5, 5, 0.1, 0.5),
            material("strong", 3, 0.0, 1, 1, 1.0, 2.0),
        ];
        let rec = recommend_from(&materials, 2.5, 1.0).unwrap();
        assert_eq!(rec.material.material_id, "strong");
    }

    #[test]
    fn falls_back_to_best_suitable_when_ceiling_excludes_everything() {
        let materials = vec![
            material("cheap", 3, 20.0, 3, 2, 0.6, 1.0),
            material("green", 3, 90.0, 5, 5, 0.2, 1.25),
        ];
        let rec = recommend_from(&materials, 3.0, 0.5).unwrap();
        assert_eq!(rec.material.material_id, "green");
    }

    #[test]
    fn equal_scores_keep_table_order() {
        let materials = vec![
            material("first", 3, 50.0, 4, 3, 0.3, 1.0),
            material("second", 3, 50.0, 4, 3, 0.3, 1.0),
        ];
        let rec = recommend_from(&materials, 1.0, 1.2).unwrap();
        assert_eq!(rec.material.material_id, "first");
    }

    #[test]
    fn normalization_uses_entire_table() {
        // The unsuitable foam sets the carbon maximum
        let materials = vec![
            material("foam", 1, 0.0, 1, 1, 2.0, 0.4),
            material("board", 3, 0.0, 1, 1, 1.0, 1.0),
        ];
        let rec = recommend_from(&materials, 3.0, 1.2).unwrap();
        let expected = 0.1 + 0.05 + 0.5 * 0.2;
        assert!((rec.sustainability_score - expected).abs() < EPSILON_GENERAL);
    }

    #[test]
    fn never_recommends_too_weak_material() {
        let catalog = fixture();
        for step in 0..=10 {
            let fragility = 1.0 + step as f64 * 0.4;
            for &tolerance in &[1.0, 1.1, 1.2, 1.5] {
                let max_strength = catalog
                    .materials()
                    .iter()
                    .map(|m| m.strength_rating)
                    .max()
                    .unwrap();
                match recommend_material(&catalog, fragility, tolerance) {
                    Some(rec) => assert!(f64::from(rec.material.strength_rating) >= fragility),
                    None => assert!(f64::from(max_strength) < fragility),
                }
            }
        }
    }

    #[test]
    fn raising_tolerance_never_lowers_score() {
        let catalog = fixture();
        for fragility in 1..=5 {
            let mut previous = f64::NEG_INFINITY;
            for step in 0..=10 {
                let tolerance = 1.0 + step as f64 * 0.05;
                let rec = recommend_material(&catalog, f64::from(fragility), tolerance)
                    .expect("fixture has a material for every fragility level");
                assert!(
                    rec.sustainability_score + EPSILON_GENERAL >= previous,
                    "score dropped at fragility {} tolerance {}",
                    fragility,
                    tolerance
                );
                previous = rec.sustainability_score;
            }
        }
    }
}
