use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};

/// Weights and thresholds for one signal computation run.
///
/// Weights need not sum to 1; the engine normalizes by their sum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalParameters {
    /// Volume weight, in [0, 1].
    pub volume_weight: f64,
    /// Price weight, in [0, 1].
    pub price_weight: f64,
    /// Mining-pressure weight, in [0, 1].
    pub mining_weight: f64,
    /// Momentum threshold for long/short signals, strictly positive.
    pub momentum_threshold: f64,
    /// Scalp sensitivity. Zero is legal and disables all scalp signals.
    pub scalp_sensitivity: f64,
}

impl Default for SignalParameters {
    fn default() -> Self {
        Self {
            volume_weight: 0.3,
            price_weight: 0.4,
            mining_weight: 0.3,
            momentum_threshold: 0.01,
            scalp_sensitivity: 0.05,
        }
    }
}

impl SignalParameters {
    /// Validate parameter ranges. Runs before any computation; a failure
    /// here is fatal for the run.
    pub fn validate(&self) -> Result<()> {
        for (name, weight) in [
            ("volume_weight", self.volume_weight),
            ("price_weight", self.price_weight),
            ("mining_weight", self.mining_weight),
        ] {
            if !(0.0..=1.0).contains(&weight) {
                return Err(AppError::Configuration(format!(
                    "{} must be in [0, 1], got {}",
                    name, weight
                )));
            }
        }

        if self.weight_sum() == 0.0 {
            return Err(AppError::Configuration(
                "weights must not all be zero".to_string(),
            ));
        }

        if self.momentum_threshold <= 0.0 {
            return Err(AppError::Configuration(format!(
                "momentum_threshold must be positive, got {}",
                self.momentum_threshold
            )));
        }

        if self.scalp_sensitivity < 0.0 {
            return Err(AppError::Configuration(format!(
                "scalp_sensitivity must not be negative, got {}",
                self.scalp_sensitivity
            )));
        }

        Ok(())
    }

    pub fn weight_sum(&self) -> f64 {
        self.volume_weight + self.price_weight + self.mining_weight
    }
}

/// Derived signals for one price period.
///
/// `momentum` is `None` while the trailing window has too little history;
/// every boolean derived from an unformed window is false, never undefined.
/// `buy_signal` and `sell_signal` are never both true for the same record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalRecord {
    pub timestamp: i64,
    pub price: f64,
    pub volume: f64,
    pub mining_pressure: f64,
    pub probability: f64,
    pub momentum: Option<f64>,
    pub scalp_long: bool,
    pub scalp_short: bool,
    pub long_signal: bool,
    pub short_signal: bool,
    pub buy_signal: bool,
    pub sell_signal: bool,
}

/// Full output of one signal computation run, as served by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalReport {
    pub symbol: String,
    pub mining_pressure: f64,
    pub records: Vec<SignalRecord>,
    pub timestamp: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_parameters_are_valid() {
        assert!(SignalParameters::default().validate().is_ok());
    }

    #[test]
    fn test_default_parameter_values() {
        let params = SignalParameters::default();
        assert_eq!(params.volume_weight, 0.3);
        assert_eq!(params.price_weight, 0.4);
        assert_eq!(params.mining_weight, 0.3);
        assert_eq!(params.momentum_threshold, 0.01);
        assert_eq!(params.scalp_sensitivity, 0.05);
    }

    #[test]
    fn test_zero_weight_sum_rejected() {
        let params = SignalParameters {
            volume_weight: 0.0,
            price_weight: 0.0,
            mining_weight: 0.0,
            ..Default::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_weight_out_of_range_rejected() {
        let params = SignalParameters {
            price_weight: 1.5,
            ..Default::default()
        };
        assert!(params.validate().is_err());

        let params = SignalParameters {
            volume_weight: -0.1,
            ..Default::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_non_positive_momentum_threshold_rejected() {
        let params = SignalParameters {
            momentum_threshold: 0.0,
            ..Default::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_zero_scalp_sensitivity_allowed() {
        let params = SignalParameters {
            scalp_sensitivity: 0.0,
            ..Default::default()
        };
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_negative_scalp_sensitivity_rejected() {
        let params = SignalParameters {
            scalp_sensitivity: -0.01,
            ..Default::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_weight_sum() {
        let params = SignalParameters::default();
        assert!((params.weight_sum() - 1.0).abs() < 1e-12);
    }
}
