use chrono::NaiveDate;

use crate::core::{
    compatibility::{blood_type_score, count_hla_matches, hla_score},
    distance::{distance_score, haversine_miles},
};
use crate::error::Result;
use crate::models::{Donor, MatchScore, Patient, ScoringWeights};

/// Wait time stops accruing points after five years
const MAX_WAIT_DAYS: f64 = 365.0 * 5.0;

/// Calculate the compatibility score (0-100) for a patient/donor pair
///
/// Scoring formula:
/// composite = (
///     blood_type * 0.25 +   # ABO compatible = 100, else 0
///     hla        * 0.20 +   # matched antigens / 6
///     cpra       * 0.15 +   # sensitisation priority tiers
///     wait_time  * 0.15 +   # days waited, capped at 5 years
///     age        * 0.10 +   # age band alignment
///     distance   * 0.10 +   # transport distance bands
///     quality    * 0.05     # EPTS/KDPI alignment
/// )
///
/// `as_of` is the date wait time is measured against, so the result depends
/// only on the arguments.
pub fn calculate_match_score(
    patient: &Patient,
    donor: &Donor,
    as_of: NaiveDate,
    weights: &ScoringWeights,
) -> Result<MatchScore> {
    patient.validate_clinical()?;
    donor.validate_clinical()?;

    let blood_type = blood_type_score(patient, donor);

    let hla_matches = count_hla_matches(&patient.hla, &donor.hla);
    let hla = hla_score(hla_matches);

    let cpra = calculate_cpra_priority(patient.cpra);

    let wait_time = calculate_wait_time_score(patient.wait_days(as_of));

    let age = calculate_age_score(patient.age, donor.age);

    let distance_miles = haversine_miles(patient.location, donor.location);
    let distance = distance_score(distance_miles);

    let quality = calculate_quality_alignment(patient.epts, donor.kdpi);

    // Weighted combination
    let composite = blood_type * weights.blood_type
        + hla * weights.hla
        + cpra * weights.cpra
        + wait_time * weights.wait_time
        + age * weights.age
        + distance * weights.distance
        + quality * weights.quality;

    Ok(MatchScore {
        composite: composite.clamp(0.0, 100.0),
        blood_type,
        hla,
        cpra,
        wait_time,
        age,
        distance,
        quality,
        abo_compatible: blood_type > 0.0,
        hla_matches,
        distance_miles,
    })
}

/// CPRA priority (0-100)
/// Highly sensitised patients are hardest to match and get the most points
#[inline]
pub fn calculate_cpra_priority(cpra: f64) -> f64 {
    if cpra >= 98.0 {
        100.0
    } else if cpra >= 80.0 {
        80.0
    } else if cpra >= 20.0 {
        50.0
    } else {
        20.0
    }
}

/// Wait time score (0-100), linear up to five years
#[inline]
pub fn calculate_wait_time_score(wait_days: i64) -> f64 {
    let days = (wait_days.max(0) as f64).min(MAX_WAIT_DAYS);
    days / MAX_WAIT_DAYS * 100.0
}

/// Age band used for age compatibility
#[inline]
fn age_band(age: u8) -> i32 {
    match age {
        0..=17 => 0,
        18..=34 => 1,
        35..=49 => 2,
        50..=64 => 3,
        _ => 4,
    }
}

/// Age score (0-100)
/// Same band scores highest; each band apart costs 20 points, floor 20
#[inline]
pub fn calculate_age_score(patient_age: u8, donor_age: u8) -> f64 {
    let band_distance = (age_band(patient_age) - age_band(donor_age)).abs();
    (100.0 - 20.0 * band_distance as f64).max(20.0)
}

/// EPTS/KDPI alignment (0-100)
/// Low-EPTS recipients paired with low-KDPI kidneys score highest
#[inline]
pub fn calculate_quality_alignment(epts: f64, kdpi: f64) -> f64 {
    (100.0 - (epts - kdpi).abs()).clamp(0.0, 100.0)
}
