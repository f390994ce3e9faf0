//! Mocked "current" packaging used as the comparison baseline.
//!
//! Today's boxes are modelled as fixed multiples of the raw item dimensions.
//! They are illustrative, not derived from shipment history.

use serde::Serialize;
use utoipa::ToSchema;

use crate::catalog::{LookupError, ReferenceData};
use crate::geometry::stacked_extent;
use crate::model::{Material, PackagingBox};
use crate::sizing::SizingConfig;
use crate::types::Dimensional;

/// Estimated current packaging: box plus material.
#[derive(Clone, Debug, PartialEq, Serialize, ToSchema)]
pub struct CurrentPackaging {
    #[serde(rename = "box")]
    pub packaging: PackagingBox,
    pub material: Material,
}

/// Current packaging for one product.
///
/// Every raw edge is multiplied by the single-item inflation factor (no buffer).
/// The material is the product's recorded current packaging material.
pub fn mock_current_packaging(
    catalog: &ReferenceData,
    product_id: &str,
    config: &SizingConfig,
) -> Result<CurrentPackaging, LookupError> {
    let product = catalog.lookup_product(product_id)?;
    let material = catalog.lookup_material(&product.current_packaging_material)?;
    Ok(CurrentPackaging {
        packaging: PackagingBox::from_dims(product.dimensions() * config.current_single_inflation),
        material: material.clone(),
    })
}

/// Current packaging for several products.
///
/// Same stacked extent as the optimal multi box, multiplied by the multi-item
/// inflation factor. The material is always the configured baseline material,
/// also for an empty selection which yields the zero box.
pub fn mock_current_multi_packaging<S: AsRef<str>>(
    catalog: &ReferenceData,
    product_ids: &[S],
    config: &SizingConfig,
) -> Result<CurrentPackaging, LookupError> {
    let material = catalog.lookup_material(&config.baseline_material_id)?;
    let products = catalog.resolve_selection(product_ids)?;
    let packaging = match stacked_extent(products.iter().copied()) {
        Some(extent) => PackagingBox::from_dims(extent * config.current_multi_inflation),
        None => PackagingBox::zero(),
    };
    Ok(CurrentPackaging {
        packaging,
        material: material.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Product;
    use crate::types::EPSILON_GENERAL;

    fn catalog() -> ReferenceData {
        let materials = vec![
            Material {
                material_id: "cardboard_standard".to_string(),
                name: "Standard Cardboard".to_string(),
                strength_rating: 3,
                recycled_content_percent: 35.0,
                recyclability_score: 4,
                biodegradability_score: 3,
                carbon_footprint_per_unit_sqm: 0.45,
                cost_per_unit_area: 0.8,
            },
            Material {
                material_id: "eps_foam".to_string(),
                name: "EPS Foam".to_string(),
                strength_rating: 5,
                recycled_content_percent: 5.0,
                recyclability_score: 1,
                biodegradability_score: 1,
                carbon_footprint_per_unit_sqm: 1.15,
                cost_per_unit_area: 1.35,
            },
        ];
        let products = vec![
            Product {
                product_id: "P1".to_string(),
                name: "Cube".to_string(),
                length_cm: 10.0,
                width_cm: 10.0,
                height_cm: 10.0,
                weight_kg: 1.0,
                fragility_score: 3,
                current_packaging_material: "eps_foam".to_string(),
            },
            Product {
                product_id: "P2".to_string(),
                name: "Slab".to_string(),
                length_cm: 20.0,
                width_cm: 4.0,
                height_cm: 2.0,
                weight_kg: 0.5,
                fragility_score: 1,
                current_packaging_material: "cardboard_standard".to_string(),
            },
        ];
        ReferenceData::new(products, materials).unwrap()
    }

    fn assert_dims(b: &PackagingBox, l: f64, w: f64, h: f64) {
        let dims = b.dimensions();
        assert!((dims.length - l).abs() < EPSILON_GENERAL);
        assert!((dims.width - w).abs() < EPSILON_GENERAL);
        assert!((dims.height - h).abs() < EPSILON_GENERAL);
        assert!((b.volume() - l * w * h).abs() < 1e-6);
    }

    #[test]
    fn single_current_box_is_inflated_by_twenty_percent() {
        let current = mock_current_packaging(&catalog(), "P1", &SizingConfig::default()).unwrap();
        assert_dims(&current.packaging, 12.0, 12.0, 12.0);
        assert!((current.packaging.volume() - 1728.0).abs() < 1e-6);
        assert_eq!(current.material.material_id, "eps_foam");
    }

    #[test]
    fn single_current_unknown_product_fails() {
        let err = mock_current_packaging(&catalog(), "P9", &SizingConfig::default()).unwrap_err();
        assert_eq!(err, LookupError::UnknownProduct("P9".to_string()));
    }

    #[test]
    fn multi_current_box_is_inflated_stack_with_default_material() {
        let current =
            mock_current_multi_packaging(&catalog(), &["P1", "P2"], &SizingConfig::default())
                .unwrap();
        assert_dims(&current.packaging, 30.0, 15.0, 18.0);
        assert_eq!(current.material.material_id, "cardboard_standard");
    }

    #[test]
    fn empty_multi_selection_yields_zero_box_and_default_material() {
        let empty: [&str; 0] = [];
        let current =
            mock_current_multi_packaging(&catalog(), &empty, &SizingConfig::default()).unwrap();
        assert_eq!(current.packaging, PackagingBox::zero());
        assert_eq!(current.packaging.volume(), 0.0);
        assert_eq!(current.material.material_id, "cardboard_standard");
    }

    #[test]
    fn missing_baseline_material_is_lookup_error() {
        let config = SizingConfig::builder()
            .baseline_material_id("kraft_paper")
            .build();
        let empty: [&str; 0] = [];
        let err = mock_current_multi_packaging(&catalog(), &empty, &config).unwrap_err();
        assert_eq!(err, LookupError::UnknownMaterial("kraft_paper".to_string()));
    }
}
