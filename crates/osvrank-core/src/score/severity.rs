// SPDX-License-Identifier: Apache-2.0

//! Severity normalization.
//!
//! Maps the ordinal severity label to its CVSS approximation and rescales
//! by the maximum possible value (9.0) into [0, 1]. The divisor is a fixed
//! constant, not a batch statistic, so the axis is comparable across runs.

use crate::osv::Severity;

/// Maximum CVSS approximation across the label set (CRITICAL).
pub const MAX_CVSS_ESTIMATE: f64 = 9.0;

/// Normalized severity in [0, 1].
#[must_use]
pub fn normalize(severity: Severity) -> f64 {
    severity.cvss_estimate() / MAX_CVSS_ESTIMATE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_documented_values() {
        assert!((normalize(Severity::Low) - 3.9 / 9.0).abs() < 1e-12);
        assert!((normalize(Severity::Moderate) - 5.5 / 9.0).abs() < 1e-12);
        assert!((normalize(Severity::High) - 7.5 / 9.0).abs() < 1e-12);
        assert!((normalize(Severity::Critical) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_normalize_monotonic_and_bounded() {
        let values = [
            normalize(Severity::Low),
            normalize(Severity::Moderate),
            normalize(Severity::High),
            normalize(Severity::Critical),
        ];
        for pair in values.windows(2) {
            assert!(pair[0] < pair[1]);
        }
        for v in values {
            assert!((0.0..=1.0).contains(&v));
        }
    }
}
