//! EPTS and KDPI estimates from clinical factors.
//!
//! These are simplified point-based approximations of the published
//! formulas, used to populate percentiles for records that arrive without
//! them (sample data, manual entry).

use serde::{Deserialize, Serialize};

/// Recipient factors feeding the EPTS estimate
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EptsFactors {
    pub age: u8,
    pub diabetes: bool,
    pub prior_transplant: bool,
    pub dialysis_days: u32,
}

/// Donor factors feeding the KDPI estimate
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct KdpiFactors {
    pub age: u8,
    pub height_in: f64,
    pub weight_lb: f64,
    pub hypertension: bool,
    pub diabetes: bool,
    pub creatinine: f64,
    pub hcv: bool,
    pub dcd: bool,
}

/// Estimated Post-Transplant Survival percentile (lower is better)
pub fn estimate_epts(factors: &EptsFactors) -> f64 {
    let dialysis_years = (factors.dialysis_days as f64 / 365.0).min(5.0);

    let mut score = factors.age as f64 * 0.4;
    if factors.diabetes {
        score += 20.0;
    }
    if factors.prior_transplant {
        score += 10.0;
    }
    score += dialysis_years * 3.0;

    score.min(100.0)
}

/// Kidney Donor Profile Index percentile (lower is better)
pub fn estimate_kdpi(factors: &KdpiFactors) -> f64 {
    let mut score = factors.age as f64 * 0.5;
    if factors.hypertension {
        score += 15.0;
    }
    if factors.diabetes {
        score += 15.0;
    }
    if factors.hcv {
        score += 10.0;
    }
    if factors.dcd {
        score += 20.0;
    }
    score += ((factors.creatinine - 1.0) * 10.0).max(0.0);

    if factors.height_in > 0.0 {
        let bmi = (factors.weight_lb * 703.0) / factors.height_in.powi(2);
        if bmi > 30.0 {
            score += 10.0;
        }
    }

    score.clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epts_estimate() {
        let factors = EptsFactors {
            age: 45,
            diabetes: true,
            prior_transplant: false,
            dialysis_days: 547,
        };
        // 18 + 20 + 1.4986 * 3
        let epts = estimate_epts(&factors);
        assert!((epts - 42.4959).abs() < 0.01, "got {}", epts);
    }

    #[test]
    fn test_epts_capped() {
        let factors = EptsFactors {
            age: 255,
            diabetes: true,
            prior_transplant: true,
            dialysis_days: 10_000,
        };
        assert_eq!(estimate_epts(&factors), 100.0);
    }

    #[test]
    fn test_kdpi_estimate_with_bmi_penalty() {
        let lean = KdpiFactors {
            age: 42,
            height_in: 68.0,
            weight_lb: 170.0,
            hypertension: false,
            diabetes: false,
            creatinine: 1.1,
            hcv: false,
            dcd: false,
        };
        let kdpi = estimate_kdpi(&lean);
        assert!((kdpi - 22.0).abs() < 0.01, "got {}", kdpi);

        let heavy = KdpiFactors { weight_lb: 260.0, ..lean };
        assert!((estimate_kdpi(&heavy) - 32.0).abs() < 0.01);
    }
}
