//! Validation helper functions for configuration types.

use crate::core::errors::{QimingError, Result};

/// Validate that a usize value is greater than zero.
pub fn validate_positive_usize(value: usize, field: &str) -> Result<()> {
    if value == 0 {
        return Err(QimingError::validation_field(
            format!("{} must be greater than 0", field),
            field,
        ));
    }
    Ok(())
}

/// Validate that a u64 value is greater than zero.
pub fn validate_positive_u64(value: u64, field: &str) -> Result<()> {
    if value == 0 {
        return Err(QimingError::validation_field(
            format!("{} must be greater than 0", field),
            field,
        ));
    }
    Ok(())
}

/// Validate that an f64 value is greater than zero.
pub fn validate_positive_f64(value: f64, field: &str) -> Result<()> {
    if value <= 0.0 || value.is_nan() {
        return Err(QimingError::validation_field(
            format!("{} must be greater than 0.0", field),
            field,
        ));
    }
    Ok(())
}

/// Validate that an f64 value is in the unit range [0.0, 1.0].
pub fn validate_unit_range(value: f64, field: &str) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(QimingError::validation_field(
            format!("{} must be between 0.0 and 1.0", field),
            field,
        ));
    }
    Ok(())
}

/// Validate that an f64 score lies on the 0-100 scale.
pub fn validate_score_range(value: f64, field: &str) -> Result<()> {
    if !(0.0..=100.0).contains(&value) {
        return Err(QimingError::validation_field(
            format!("{} must be between 0 and 100", field),
            field,
        ));
    }
    Ok(())
}

/// Validate that a usize value is within a bounded range (inclusive).
pub fn validate_bounded_usize(value: usize, min: usize, max: usize, field: &str) -> Result<()> {
    if value < min || value > max {
        return Err(QimingError::validation_field(
            format!("{} must be between {} and {}", field, min, max),
            field,
        ));
    }
    Ok(())
}

/// Validate that weights sum to approximately 1.0 (within tolerance).
pub fn validate_weights_sum(weights: &[f64], tolerance: f64, field: &str) -> Result<()> {
    let sum: f64 = weights.iter().sum();
    if (sum - 1.0).abs() > tolerance {
        return Err(QimingError::validation_field(
            format!("{} should sum to approximately 1.0, got {:.4}", field, sum),
            field,
        ));
    }
    Ok(())
}
