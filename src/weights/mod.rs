//! Portfolio weights are supplied by the caller and only normalized here, nothing ties them to the
//! computed risk or return.
use derive_more::{Display, Error};

pub const TOTAL_WEIGHT: f64 = 100.0;

#[derive(Debug, Display, Error, PartialEq)]
pub enum WeightError {
    #[display("no weights given")]
    Empty,
    #[display("weight {value} at position {position} is negative or not finite")]
    InvalidWeight { position: usize, value: f64 },
    #[display("weights sum to zero")]
    ZeroSum,
}

/// Scales raw weights so that they sum to [TOTAL_WEIGHT], keeping their relative proportions.
pub fn normalize(raw: &[f64]) -> Result<Vec<f64>, WeightError> {
    if raw.is_empty() {
        return Err(WeightError::Empty);
    }
    if let Some((position, value)) = raw
        .iter()
        .enumerate()
        .find(|(_, weight)| !weight.is_finite() || **weight < 0.0)
    {
        return Err(WeightError::InvalidWeight {
            position,
            value: *value,
        });
    }

    let sum: f64 = raw.iter().sum();
    if sum == 0.0 {
        return Err(WeightError::ZeroSum);
    }
    Ok(raw.iter().map(|weight| weight / sum * TOTAL_WEIGHT).collect())
}

#[cfg(test)]
mod tests {
    use super::{normalize, WeightError};

    #[test]
    fn test_that_weights_sum_to_one_hundred() {
        let weights = normalize(&[40.0, 35.0, 25.0]).unwrap();
        assert!((weights.iter().sum::<f64>() - 100.0).abs() < 1e-9);
        assert!((weights[0] / weights[1] - 40.0 / 35.0).abs() < 1e-12);
        assert!((weights[1] / weights[2] - 35.0 / 25.0).abs() < 1e-12);
    }

    #[test]
    fn test_that_fractional_weights_are_scaled_up() {
        let weights = normalize(&[0.5, 0.25, 0.25]).unwrap();
        assert!((weights[0] - 50.0).abs() < 1e-9);
        assert!((weights[2] - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_that_invalid_weights_are_rejected() {
        assert_eq!(normalize(&[]), Err(WeightError::Empty));
        assert_eq!(normalize(&[0.0, 0.0]), Err(WeightError::ZeroSum));
        assert_eq!(
            normalize(&[10.0, -1.0]),
            Err(WeightError::InvalidWeight {
                position: 1,
                value: -1.0
            })
        );
    }
}
