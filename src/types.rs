//! Common types and traits for box dimensions.
//!
//! This module defines the reusable dimension vector and the trait abstractions
//! shared by products, boxes and the aggregation heuristics.

use std::ops::{Add, Mul};

/// Global numerical tolerance for floating-point comparisons.
pub const EPSILON_GENERAL: f64 = 1e-6;

/// Represents the three edge lengths of a box-shaped object in centimeters.
///
/// # Examples
/// ```ignore
/// let item = Dims::new(10.0, 10.0, 10.0);
/// let padded = item.grow(1.0);
/// assert_eq!(padded.volume(), 1331.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Dims {
    pub length: f64,
    pub width: f64,
    pub height: f64,
}

impl Dims {
    /// Creates a new dimension triple.
    ///
    /// # Parameters
    /// * `length` - Length in cm
    /// * `width` - Width in cm
    /// * `height` - Height in cm
    #[inline]
    pub const fn new(length: f64, width: f64, height: f64) -> Self {
        Self {
            length,
            width,
            height,
        }
    }

    /// Creates the zero triple used for "no items".
    #[inline]
    pub const fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// Converts to tuple format for API compatibility.
    #[inline]
    pub const fn as_tuple(&self) -> (f64, f64, f64) {
        (self.length, self.width, self.height)
    }

    /// Calculates the volume (product of all components).
    #[inline]
    pub fn volume(&self) -> f64 {
        self.length * self.width * self.height
    }

    /// Calculates the footprint area (length × width).
    #[inline]
    pub fn footprint_area(&self) -> f64 {
        self.length * self.width
    }

    /// Adds the same padding to every edge.
    #[inline]
    pub fn grow(&self, buffer: f64) -> Self {
        Self::new(
            self.length + buffer,
            self.width + buffer,
            self.height + buffer,
        )
    }

}

impl Add for Dims {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        Self::new(
            self.length + rhs.length,
            self.width + rhs.width,
            self.height + rhs.height,
        )
    }
}

impl Mul<f64> for Dims {
    type Output = Self;

    #[inline]
    fn mul(self, scalar: f64) -> Self::Output {
        Self::new(
            self.length * scalar,
            self.width * scalar,
            self.height * scalar,
        )
    }
}

/// Trait for objects with box-shaped extent.
///
/// Implemented by products and by computed packaging boxes so the
/// aggregation helpers in `geometry` accept either.
pub trait Dimensional {
    /// Returns the dimensions of the object.
    fn dimensions(&self) -> Dims;
}

/// Trait for objects with weight.
pub trait Weighted {
    /// Returns the weight in kg.
    fn weight(&self) -> f64;
}

/// Validation functions shared by reference rows and API requests.
pub mod validation {

    /// Validates a single dimension.
    ///
    /// # Returns
    /// `Ok(())` for valid values, otherwise error text
    pub fn validate_dimension(value: f64, name: &str) -> Result<(), String> {
        if value.is_nan() {
            return Err(format!("{} must not be NaN", name));
        }
        if value.is_infinite() {
            return Err(format!("{} must not be infinite", name));
        }
        if value <= 0.0 {
            return Err(format!("{} must be positive, got: {}", name, value));
        }
        Ok(())
    }

    /// Validates a weight.
    pub fn validate_weight(value: f64) -> Result<(), String> {
        validate_dimension(value, "Weight")
    }

    /// Validates all three dimensions of a box-shaped object.
    pub fn validate_dimensions_3d(dims: (f64, f64, f64)) -> Result<(), String> {
        validate_dimension(dims.0, "Length")?;
        validate_dimension(dims.1, "Width")?;
        validate_dimension(dims.2, "Height")?;
        Ok(())
    }

    /// Validates a finite value inside an inclusive range.
    pub fn validate_range(value: f64, min: f64, max: f64, name: &str) -> Result<(), String> {
        if !value.is_finite() || value < min || value > max {
            return Err(format!(
                "{} must be between {} and {}, got: {}",
                name, min, max, value
            ));
        }
        Ok(())
    }

    /// Validates a finite, non-negative value.
    pub fn validate_non_negative(value: f64, name: &str) -> Result<(), String> {
        if !value.is_finite() || value < 0.0 {
            return Err(format!("{} must not be negative, got: {}", name, value));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dims_operations() {
        let a = Dims::new(1.0, 2.0, 3.0);
        let b = Dims::new(4.0, 5.0, 6.0);

        assert_eq!(a + b, Dims::new(5.0, 7.0, 9.0));
        assert_eq!(a * 2.0, Dims::new(2.0, 4.0, 6.0));
        assert_eq!(a.grow(1.0), Dims::new(2.0, 3.0, 4.0));
    }

    #[test]
    fn test_dims_volume_and_area() {
        let dims = Dims::new(10.0, 20.0, 30.0);
        assert!((dims.volume() - 6000.0).abs() < EPSILON_GENERAL);
        assert!((dims.footprint_area() - 200.0).abs() < EPSILON_GENERAL);
    }

    #[test]
    fn test_validation_dimension() {
        assert!(validation::validate_dimension(10.0, "Length").is_ok());
        assert!(validation::validate_dimension(0.0, "Length").is_err());
        assert!(validation::validate_dimension(-1.0, "Length").is_err());
        assert!(validation::validate_dimension(f64::NAN, "Length").is_err());
        assert!(validation::validate_dimension(f64::INFINITY, "Length").is_err());
    }

    #[test]
    fn test_validation_range() {
        assert!(validation::validate_range(3.0, 1.0, 5.0, "Score").is_ok());
        assert!(validation::validate_range(1.0, 1.0, 5.0, "Score").is_ok());
        assert!(validation::validate_range(5.5, 1.0, 5.0, "Score").is_err());
        assert!(validation::validate_range(f64::NAN, 1.0, 5.0, "Score").is_err());
    }

    #[test]
    fn test_validation_non_negative() {
        assert!(validation::validate_non_negative(0.0, "Carbon").is_ok());
        assert!(validation::validate_non_negative(-0.1, "Carbon").is_err());
        assert!(validation::validate_weight(0.5).is_ok());
        assert!(validation::validate_weight(0.0).is_err());
    }
}
