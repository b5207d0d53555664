//! Analysis parameter configuration

use anyhow::{bail, Result};

/// Tuning parameters for one hotspot analysis run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalysisParams {
    /// Maximum path length over which an incident's contribution propagates, in meters
    pub bandwidth: f64,

    /// Minimum accumulated density for a node to be eligible for clustering
    pub density_threshold: f64,

    /// Stopping distance for agglomerative clustering, in meters
    pub distance_threshold: f64,
}

impl Default for AnalysisParams {
    fn default() -> Self {
        Self {
            bandwidth: 200.0,
            density_threshold: 1.0,
            distance_threshold: 300.0,
        }
    }
}

impl AnalysisParams {
    /// Create parameters with custom values
    pub fn new(bandwidth: f64, density_threshold: f64, distance_threshold: f64) -> Self {
        Self {
            bandwidth,
            density_threshold,
            distance_threshold,
        }
    }

    /// Reject out-of-range parameter values
    pub fn validate(&self) -> Result<()> {
        if !(self.bandwidth > 0.0) {
            bail!("bandwidth must be positive, got {}", self.bandwidth);
        }
        if !(self.density_threshold >= 0.0) {
            bail!(
                "density threshold must be non-negative, got {}",
                self.density_threshold
            );
        }
        if !(self.distance_threshold > 0.0) {
            bail!(
                "distance threshold must be positive, got {}",
                self.distance_threshold
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params_are_valid() {
        assert!(AnalysisParams::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_params() {
        assert!(AnalysisParams::new(0.0, 1.0, 300.0).validate().is_err());
        assert!(AnalysisParams::new(200.0, -0.1, 300.0).validate().is_err());
        assert!(AnalysisParams::new(200.0, 1.0, 0.0).validate().is_err());
        assert!(AnalysisParams::new(f64::NAN, 1.0, 300.0).validate().is_err());
    }
}
