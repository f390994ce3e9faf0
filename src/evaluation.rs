//! Evaluation of one product selection.
//!
//! Combines sizing, baseline and recommendation into the comparison figures
//! shown to the user, plus an illustrative per-order and annual extrapolation.

use serde::Serialize;
use utoipa::ToSchema;

use crate::baseline::{CurrentPackaging, mock_current_multi_packaging, mock_current_packaging};
use crate::catalog::{LookupError, ReferenceData};
use crate::geometry::reduction_percent;
use crate::model::{Material, PackagingBox};
use crate::recommender::{Recommendation, recommend_material};
use crate::sizing::{SizingConfig, approximate_multi_box, optimal_single_box};
use crate::types::{Dimensional, Weighted};

/// Settings for evaluations and the annual projection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EvaluationConfig {
    /// Tolerance used when a request does not name one
    pub default_cost_tolerance: f64,
    /// Packages shipped per day for the annual projection
    pub daily_packages: u64,
}

impl EvaluationConfig {
    pub const DEFAULT_COST_TOLERANCE: f64 = 1.2;
    pub const MIN_COST_TOLERANCE: f64 = 1.0;
    pub const MAX_COST_TOLERANCE: f64 = 1.5;
    pub const DEFAULT_DAILY_PACKAGES: u64 = 500_000;
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            default_cost_tolerance: Self::DEFAULT_COST_TOLERANCE,
            daily_packages: Self::DEFAULT_DAILY_PACKAGES,
        }
    }
}

/// Fragility assumed for an empty selection.
const EMPTY_SELECTION_FRAGILITY: f64 = 1.0;
/// Shipping savings per kg and unit of relative volume reduction.
const SHIPPING_SAVINGS_PER_KG: f64 = 0.5;
/// Dollar value of one saved cm³ per package.
const SHIPPING_COST_PER_CM3: f64 = 1e-7;
const DAYS_PER_YEAR: u64 = 365;
const CM2_PER_M2: f64 = 10_000.0;
/// Faces of a box, used for the surface area estimate.
const BOX_FACES: f64 = 6.0;

/// How the optimal box was derived.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SizingMode {
    /// Exactly one distinct product
    Single,
    /// None or several products
    Multi,
}

/// Differences between today's material and the recommended one.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, ToSchema)]
pub struct MaterialComparison {
    /// kg CO2e per m² saved by switching (negative if worse)
    pub carbon_reduction_per_sqm: f64,
    pub carbon_reduction_percent: f64,
    /// Percentage points of recycled content gained (may be negative)
    pub recycled_content_increase: f64,
}

impl MaterialComparison {
    pub fn between(current: &Material, recommended: &Material) -> Self {
        let carbon_reduction_per_sqm =
            current.carbon_footprint_per_unit_sqm - recommended.carbon_footprint_per_unit_sqm;
        let carbon_reduction_percent = if current.carbon_footprint_per_unit_sqm > 0.0 {
            carbon_reduction_per_sqm / current.carbon_footprint_per_unit_sqm * 100.0
        } else {
            0.0
        };
        Self {
            carbon_reduction_per_sqm,
            carbon_reduction_percent,
            recycled_content_increase: recommended.recycled_content_percent
                - current.recycled_content_percent,
        }
    }
}

/// Extrapolation of one order's savings to a year of shipments.
///
/// These figures are illustrative only.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, ToSchema)]
pub struct AnnualProjection {
    pub daily_packages: u64,
    pub annual_packages: u64,
    /// Never negative: a larger optimal box counts as no saving
    pub volume_saved_per_package_cm3: f64,
    pub annual_shipping_cost_savings_musd: f64,
    /// Six times the optimal box footprint in m²
    pub box_surface_area_sqm: f64,
    /// Absent when no material could be recommended
    pub annual_co2_avoided_tonnes: Option<f64>,
}

impl AnnualProjection {
    pub fn project(
        optimal: &PackagingBox,
        current: &PackagingBox,
        comparison: Option<&MaterialComparison>,
        daily_packages: u64,
    ) -> Self {
        let annual_packages = daily_packages.saturating_mul(DAYS_PER_YEAR);
        let packages = annual_packages as f64;
        let volume_saved_per_package_cm3 = (current.volume() - optimal.volume()).max(0.0);
        let annual_shipping_cost_savings_musd =
            volume_saved_per_package_cm3 * packages * SHIPPING_COST_PER_CM3 / 1_000_000.0;
        let box_surface_area_sqm = optimal.dimensions().footprint_area() / CM2_PER_M2 * BOX_FACES;
        let annual_co2_avoided_tonnes = comparison
            .map(|c| c.carbon_reduction_per_sqm * box_surface_area_sqm * packages / 1000.0);

        Self {
            daily_packages,
            annual_packages,
            volume_saved_per_package_cm3,
            annual_shipping_cost_savings_musd,
            box_surface_area_sqm,
            annual_co2_avoided_tonnes,
        }
    }
}

/// Full result for one selection.
#[derive(Clone, Debug, PartialEq, Serialize, ToSchema)]
pub struct Evaluation {
    /// Distinct selected product ids in request order
    pub product_ids: Vec<String>,
    pub sizing_mode: SizingMode,
    pub cost_tolerance: f64,
    pub mean_fragility: f64,
    pub total_weight_kg: f64,
    pub optimal_box: PackagingBox,
    pub current: CurrentPackaging,
    pub volume_reduction_percent: f64,
    pub recommendation: Option<Recommendation>,
    pub material_comparison: Option<MaterialComparison>,
    /// Per-order shipping cost savings estimate
    pub estimated_shipping_cost_savings: f64,
    pub annual_projection: AnnualProjection,
}

impl Evaluation {
    pub fn item_count(&self) -> usize {
        self.product_ids.len()
    }
}

/// Evaluates a selection of product ids.
///
/// # Returns
/// `Err(LookupError)` if any id is unknown
pub fn evaluate<S: AsRef<str>>(
    catalog: &ReferenceData,
    product_ids: &[S],
    cost_tolerance: f64,
    sizing: &SizingConfig,
    config: &EvaluationConfig,
) -> Result<Evaluation, LookupError> {
    let products = catalog.resolve_selection(product_ids)?;
    let distinct_ids: Vec<String> = products.iter().map(|p| p.product_id.clone()).collect();

    let (sizing_mode, optimal_box, current) = match products.as_slice() {
        [product] => (
            SizingMode::Single,
            optimal_single_box(
                product.length_cm,
                product.width_cm,
                product.height_cm,
                sizing.single_buffer_cm,
            ),
            mock_current_packaging(catalog, &product.product_id, sizing)?,
        ),
        _ => (
            SizingMode::Multi,
            approximate_multi_box(catalog, &distinct_ids, sizing.multi_buffer_cm)?,
            mock_current_multi_packaging(catalog, &distinct_ids, sizing)?,
        ),
    };

    let volume_reduction_percent =
        reduction_percent(current.packaging.volume(), optimal_box.volume());

    let mean_fragility = if products.is_empty() {
        EMPTY_SELECTION_FRAGILITY
    } else {
        products
            .iter()
            .map(|p| f64::from(p.fragility_score))
            .sum::<f64>()
            / products.len() as f64
    };
    let total_weight_kg: f64 = products.iter().map(|p| p.weight()).sum();

    let recommendation = recommend_material(catalog, mean_fragility, cost_tolerance);
    let material_comparison = recommendation
        .as_ref()
        .map(|rec| MaterialComparison::between(&current.material, &rec.material));

    let estimated_shipping_cost_savings =
        volume_reduction_percent / 100.0 * SHIPPING_SAVINGS_PER_KG * total_weight_kg;
    let annual_projection = AnnualProjection::project(
        &optimal_box,
        &current.packaging,
        material_comparison.as_ref(),
        config.daily_packages,
    );

    Ok(Evaluation {
        product_ids: distinct_ids,
        sizing_mode,
        cost_tolerance,
        mean_fragility,
        total_weight_kg,
        optimal_box,
        current,
        volume_reduction_percent,
        recommendation,
        material_comparison,
        estimated_shipping_cost_savings,
        annual_projection,
    })
}
