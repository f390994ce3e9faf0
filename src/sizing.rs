//! Box sizing for single items and multi-item orders.
//!
//! - Single item: every edge padded by a small buffer
//! - Several items: stacked bounding extent (largest footprint, summed heights)
//!   padded by a larger buffer to absorb aggregation uncertainty

use crate::catalog::{LookupError, ReferenceData};
use crate::geometry::stacked_extent;
use crate::model::PackagingBox;
use crate::types::Dims;

/// Configuration for box sizing and the mocked current packaging.
///
/// Holds the buffers, inflation factors and the default baseline material.
#[derive(Clone, Debug, PartialEq)]
pub struct SizingConfig {
    /// Padding added to every edge of a single-item box (cm)
    pub single_buffer_cm: f64,
    /// Padding added to every edge of a multi-item box (cm)
    pub multi_buffer_cm: f64,
    /// Multiplier for today's single-item packaging
    pub current_single_inflation: f64,
    /// Multiplier for today's multi-item packaging
    pub current_multi_inflation: f64,
    /// Material assumed for today's multi-item packaging
    pub baseline_material_id: String,
}

impl SizingConfig {
    pub const DEFAULT_SINGLE_BUFFER_CM: f64 = 1.0;
    pub const DEFAULT_MULTI_BUFFER_CM: f64 = 2.0;
    pub const DEFAULT_CURRENT_SINGLE_INFLATION: f64 = 1.2;
    pub const DEFAULT_CURRENT_MULTI_INFLATION: f64 = 1.5;
    pub const DEFAULT_BASELINE_MATERIAL_ID: &'static str = "cardboard_standard";

    /// Creates a builder for custom configuration.
    pub fn builder() -> SizingConfigBuilder {
        SizingConfigBuilder::default()
    }
}

impl Default for SizingConfig {
    fn default() -> Self {
        Self {
            single_buffer_cm: Self::DEFAULT_SINGLE_BUFFER_CM,
            multi_buffer_cm: Self::DEFAULT_MULTI_BUFFER_CM,
            current_single_inflation: Self::DEFAULT_CURRENT_SINGLE_INFLATION,
            current_multi_inflation: Self::DEFAULT_CURRENT_MULTI_INFLATION,
            baseline_material_id: Self::DEFAULT_BASELINE_MATERIAL_ID.to_string(),
        }
    }
}

/// Builder for SizingConfig.
#[derive(Clone, Debug, Default)]
pub struct SizingConfigBuilder {
    config: SizingConfig,
}

impl SizingConfigBuilder {
    /// Sets the single-item buffer.
    pub fn single_buffer_cm(mut self, buffer: f64) -> Self {
        self.config.single_buffer_cm = buffer;
        self
    }

    /// Sets the multi-item buffer.
    pub fn multi_buffer_cm(mut self, buffer: f64) -> Self {
        self.config.multi_buffer_cm = buffer;
        self
    }

    /// Sets the inflation of today's single-item packaging.
    pub fn current_single_inflation(mut self, factor: f64) -> Self {
        self.config.current_single_inflation = factor;
        self
    }

    /// Sets the inflation of today's multi-item packaging.
    pub fn current_multi_inflation(mut self, factor: f64) -> Self {
        self.config.current_multi_inflation = factor;
        self
    }

    /// Sets the baseline material for multi-item packaging.
    pub fn baseline_material_id(mut self, material_id: impl Into<String>) -> Self {
        self.config.baseline_material_id = material_id.into();
        self
    }

    /// Creates the final configuration.
    pub fn build(self) -> SizingConfig {
        self.config
    }
}

/// Smallest box for one item: each edge plus `buffer_cm`.
///
/// # Example
/// ```ignore
/// let b = optimal_single_box(10.0, 10.0, 10.0, 1.0); // 11 × 11 × 11, volume 1331
/// ```
pub fn optimal_single_box(length: f64, width: f64, height: f64, buffer_cm: f64) -> PackagingBox {
    PackagingBox::from_dims(Dims::new(length, width, height).grow(buffer_cm))
}

/// Approximate box for several items.
///
/// Longest length, widest width and summed heights, each padded by `buffer_cm`.
/// An empty selection yields the zero box. Duplicate ids count once.
///
/// # Returns
/// `Err(LookupError)` if any id is not in the product table
pub fn approximate_multi_box<S: AsRef<str>>(
    catalog: &ReferenceData,
    product_ids: &[S],
    buffer_cm: f64,
) -> Result<PackagingBox, LookupError> {
    let products = catalog.resolve_selection(product_ids)?;
    Ok(match stacked_extent(products.iter().copied()) {
        Some(extent) => PackagingBox::from_dims(extent.grow(buffer_cm)),
        None => PackagingBox::zero(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fixture;
    use crate::types::{Dimensional, EPSILON_GENERAL};

    fn assert_box(b: &PackagingBox, expected: (f64, f64, f64, f64)) {
        let (l, w, h, v) = expected;
        let dims = b.dimensions();
        assert!((dims.length - l).abs() < EPSILON_GENERAL, "length {}", dims.length);
        assert!((dims.width - w).abs() < EPSILON_GENERAL, "width {}", dims.width);
        assert!((dims.height - h).abs() < EPSILON_GENERAL, "height {}", dims.height);
        assert!((b.volume() - v).abs() < 1e-6 * v.max(1.0), "volume {}", b.volume());
    }

    #[test]
    fn single_box_pads_every_edge() {
        let b = optimal_single_box(10.0, 10.0, 10.0, SizingConfig::DEFAULT_SINGLE_BUFFER_CM);
        assert_box(&b, (11.0, 11.0, 11.0, 1331.0));
    }

    #[test]
    fn single_box_with_custom_buffers() {
        for &(l, w, h) in &[(1.0, 2.0, 3.0), (12.5, 0.3, 40.0), (100.0, 50.0, 25.0)] {
            for &buffer in &[0.0, 0.5, 1.0, 3.0] {
                let b = optimal_single_box(l, w, h, buffer);
                let (el, ew, eh) = (l + buffer, w + buffer, h + buffer);
                assert_box(&b, (el, ew, eh, el * ew * eh));
            }
        }
    }

    #[test]
    fn single_box_is_monotonic() {
        let small = optimal_single_box(10.0, 10.0, 10.0, 1.0);
        let longer = optimal_single_box(11.0, 10.0, 10.0, 1.0);
        let taller = optimal_single_box(10.0, 10.0, 12.0, 1.0);
        assert!(longer.volume() > small.volume());
        assert!(taller.volume() > small.volume());
        assert!(longer.dimensions().length > small.dimensions().length);
    }

    #[test]
    fn multi_box_stacks_selected_products() {
        let catalog = fixture();
        // P002 20×13×3 and P005 25×20×2
        let b = approximate_multi_box(&catalog, &["P002", "P005"], 2.0).unwrap();
        assert_box(&b, (27.0, 22.0, 7.0, 27.0 * 22.0 * 7.0));
    }

    #[test]
    fn multi_box_of_single_product_uses_multi_buffer() {
        let catalog = fixture();
        // P003 8×6×4
        let b = approximate_multi_box(&catalog, &["P003"], 2.0).unwrap();
        assert_box(&b, (10.0, 8.0, 6.0, 480.0));
    }

    #[test]
    fn multi_box_ignores_duplicate_ids() {
        let catalog = fixture();
        let once = approximate_multi_box(&catalog, &["P002", "P005"], 2.0).unwrap();
        let twice = approximate_multi_box(&catalog, &["P002", "P005", "P002"], 2.0).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn empty_selection_is_zero_box() {
        let catalog = fixture();
        let empty: [&str; 0] = [];
        let b = approximate_multi_box(&catalog, &empty, 2.0).unwrap();
        assert_box(&b, (0.0, 0.0, 0.0, 0.0));
        assert_eq!(b, PackagingBox::zero());
    }

    #[test]
    fn unknown_product_is_lookup_error() {
        let catalog = fixture();
        let err = approximate_multi_box(&catalog, &["P001", "missing"], 2.0).unwrap_err();
        assert_eq!(err, LookupError::UnknownProduct("missing".to_string()));
    }

    #[test]
    fn builder_overrides_defaults() {
        let config = SizingConfig::builder()
            .single_buffer_cm(0.5)
            .multi_buffer_cm(3.0)
            .current_single_inflation(1.1)
            .current_multi_inflation(1.4)
            .baseline_material_id("molded_pulp")
            .build();
        assert_eq!(config.single_buffer_cm, 0.5);
        assert_eq!(config.multi_buffer_cm, 3.0);
        assert_eq!(config.current_single_inflation, 1.1);
        assert_eq!(config.current_multi_inflation, 1.4);
        assert_eq!(config.baseline_material_id, "molded_pulp");
        assert_eq!(SizingConfig::builder().build(), SizingConfig::default());
    }
}
