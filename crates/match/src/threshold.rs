//! Match thresholds and their squared, per-reference normal form.

use crate::error::MatchError;

/// Maximum match distance, either shared or one per reference point.
///
/// A reference point only matches a query point whose distance to it is at
/// most that reference point's threshold. `f64::INFINITY` accepts any
/// distance; `0.0` accepts only coincident points.
#[derive(Debug, Clone, PartialEq)]
pub enum Threshold {
    /// One threshold applied to every reference point.
    Scalar(f64),
    /// One threshold per reference point, in reference order.
    PerPoint(Vec<f64>),
}

impl Threshold {
    /// Returns the number of values held (1 for a scalar).
    pub fn len(&self) -> usize {
        match self {
            Self::Scalar(_) => 1,
            Self::PerPoint(v) => v.len(),
        }
    }

    /// Returns `true` for an empty per-point vector.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Expands to one squared threshold per reference point.
    ///
    /// # Errors
    ///
    /// A one-element per-point vector is broadcast like a scalar. Returns
    /// [`MatchError::ThresholdLength`] if any other per-point vector does not
    /// have `n_reference` entries, and [`MatchError::InvalidThreshold`] for
    /// any negative or NaN value.
    pub fn squared(&self, n_reference: usize) -> Result<Vec<f64>, MatchError> {
        match self {
            Self::Scalar(t) => {
                check_value(0, *t)?;
                Ok(vec![t * t; n_reference])
            }
            Self::PerPoint(values) if values.len() == 1 => {
                let t = values[0];
                check_value(0, t)?;
                Ok(vec![t * t; n_reference])
            }
            Self::PerPoint(values) => {
                if values.len() != n_reference {
                    return Err(MatchError::ThresholdLength {
                        len: values.len(),
                        n_reference,
                    });
                }
                values
                    .iter()
                    .enumerate()
                    .map(|(index, &t)| check_value(index, t).map(|()| t * t))
                    .collect()
            }
        }
    }
}

fn check_value(index: usize, value: f64) -> Result<(), MatchError> {
    if value.is_nan() || value < 0.0 {
        return Err(MatchError::InvalidThreshold { index, value });
    }
    Ok(())
}

impl From<f64> for Threshold {
    fn from(value: f64) -> Self {
        Self::Scalar(value)
    }
}

impl From<Vec<f64>> for Threshold {
    fn from(values: Vec<f64>) -> Self {
        Self::PerPoint(values)
    }
}
