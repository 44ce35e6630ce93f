use chrono::NaiveDate;
use std::cmp::Ordering;

use crate::core::{compatibility::is_eligible_pair, scoring::calculate_match_score};
use crate::error::Result;
use crate::models::{
    Donor, DonorRanking, DonorStatus, MatchScore, MatchStatistics, Patient, PatientStatus,
    RankedCandidate, ScoringWeights,
};

/// Ranking orchestrator - scores every Active patient against every Available donor
///
/// # Pipeline Stages
/// 1. Status filter (Active patients, Available donors)
/// 2. ABO filter (incompatible pairs are excluded, not ranked)
/// 3. Scoring
/// 4. Ordering: score desc, longer wait first, then patient id
#[derive(Debug, Clone)]
pub struct Matcher {
    weights: ScoringWeights,
}

impl Matcher {
    pub fn new(weights: ScoringWeights) -> Result<Self> {
        weights.validate()?;
        Ok(Self { weights })
    }

    pub fn with_default_weights() -> Self {
        Self {
            weights: ScoringWeights::default(),
        }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Score a single pair regardless of status or compatibility
    pub fn score_pair(
        &self,
        patient: &Patient,
        donor: &Donor,
        as_of: NaiveDate,
    ) -> Result<MatchScore> {
        calculate_match_score(patient, donor, as_of, &self.weights)
    }

    /// Rank all eligible patients for one donor
    ///
    /// Pairs whose records fail validation are skipped and counted rather than
    /// aborting the whole ranking.
    pub fn rank_donor(
        &self,
        donor: &Donor,
        patients: &[Patient],
        as_of: NaiveDate,
    ) -> DonorRanking {
        let mut excluded_incompatible = 0;
        let mut skipped = 0;
        let mut candidates = Vec::new();

        if donor.status == DonorStatus::Available {
            for patient in patients.iter().filter(|p| p.status == PatientStatus::Active) {
                if !is_eligible_pair(patient, donor) {
                    excluded_incompatible += 1;
                    continue;
                }

                match self.score_pair(patient, donor, as_of) {
                    Ok(score) => candidates.push(RankedCandidate {
                        donor_id: donor.donor_id.clone(),
                        patient_id: patient.patient_id.clone(),
                        patient_name: patient.name.clone(),
                        physician_id: patient.physician_id.clone(),
                        wait_days: patient.wait_days(as_of),
                        score,
                    }),
                    Err(e) => {
                        tracing::warn!(
                            "Skipping pair {} <- {}: {}",
                            patient.patient_id,
                            donor.donor_id,
                            e
                        );
                        skipped += 1;
                    }
                }
            }
        }

        candidates.sort_by(compare_candidates);

        DonorRanking {
            donor_id: donor.donor_id.clone(),
            candidates,
            excluded_incompatible,
            skipped,
        }
    }

    /// Rank every Available donor, in donor id order
    pub fn rank_all(
        &self,
        donors: &[Donor],
        patients: &[Patient],
        as_of: NaiveDate,
    ) -> Vec<DonorRanking> {
        let mut available: Vec<&Donor> = donors
            .iter()
            .filter(|d| d.status == DonorStatus::Available)
            .collect();
        available.sort_by(|a, b| a.donor_id.cmp(&b.donor_id));

        let rankings: Vec<DonorRanking> = available
            .into_iter()
            .map(|donor| self.rank_donor(donor, patients, as_of))
            .collect();

        tracing::debug!(
            "Ranked {} donors against {} patients",
            rankings.len(),
            patients.len()
        );

        rankings
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_default_weights()
    }
}

/// Score descending, then longer wait, then patient id for determinism
fn compare_candidates(a: &RankedCandidate, b: &RankedCandidate) -> Ordering {
    b.score
        .composite
        .total_cmp(&a.score.composite)
        .then_with(|| b.wait_days.cmp(&a.wait_days))
        .then_with(|| a.patient_id.cmp(&b.patient_id))
}

/// Flatten rankings donor by donor, keeping at most `limit` entries
pub fn top_matches(rankings: &[DonorRanking], limit: usize) -> Vec<RankedCandidate> {
    rankings
        .iter()
        .flat_map(|ranking| ranking.candidates.iter().cloned())
        .take(limit)
        .collect()
}

/// Average and highest composite across all ranked candidates
pub fn match_statistics(rankings: &[DonorRanking]) -> MatchStatistics {
    let scores: Vec<f64> = rankings
        .iter()
        .flat_map(|ranking| ranking.candidates.iter().map(|c| c.score.composite))
        .collect();

    if scores.is_empty() {
        return MatchStatistics {
            total_matches: 0,
            average_score: 0.0,
            highest_score: 0.0,
        };
    }

    let total: f64 = scores.iter().sum();
    let highest = scores.iter().copied().fold(f64::MIN, f64::max);

    MatchStatistics {
        total_matches: scores.len(),
        average_score: total / scores.len() as f64,
        highest_score: highest,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BloodType, GeoPoint, HlaTyping};

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn create_patient(id: &str, blood_type: BloodType, wait_days: i64) -> Patient {
        Patient {
            patient_id: id.to_string(),
            name: format!("Patient {}", id),
            blood_type,
            hla: HlaTyping::from_panel(["A1", "A2", "B8", "B44", "DR3", "DR4"]),
            cpra: 10.0,
            wait_list_start: as_of() - chrono::Duration::days(wait_days),
            age: 40,
            epts: 20.0,
            location: GeoPoint::new(39.7392, -104.9903),
            status: PatientStatus::Active,
            physician_id: "dr.smith".to_string(),
        }
    }

    fn create_donor(id: &str, blood_type: BloodType) -> Donor {
        Donor {
            donor_id: id.to_string(),
            blood_type,
            hla: HlaTyping::from_panel(["A1", "A3", "B7", "B8", "DR3", "DR7"]),
            age: 42,
            kdpi: 20.0,
            location: GeoPoint::new(39.7392, -104.9903),
            status: DonorStatus::Available,
            procured_at: None,
        }
    }

    #[test]
    fn test_rank_donor_excludes_incompatible() {
        let matcher = Matcher::with_default_weights();
        let donor = create_donor("D1", BloodType::A);
        let patients = vec![
            create_patient("P1", BloodType::A, 100),
            create_patient("P2", BloodType::O, 2000),
            create_patient("P3", BloodType::AB, 50),
        ];

        let ranking = matcher.rank_donor(&donor, &patients, as_of());

        assert_eq!(ranking.excluded_incompatible, 1);
        let ids: Vec<&str> = ranking.candidates.iter().map(|c| c.patient_id.as_str()).collect();
        assert!(!ids.contains(&"P2"));
        assert_eq!(ids.len(), 2);
    }

    #[test]
    fn test_ties_broken_by_wait_then_id() {
        let matcher = Matcher::with_default_weights();
        let donor = create_donor("D1", BloodType::O);
        // Wait beyond the five-year cap gives equal scores
        let patients = vec![
            create_patient("P3", BloodType::O, 3000),
            create_patient("P2", BloodType::O, 2500),
            create_patient("P1", BloodType::O, 2500),
        ];

        let ranking = matcher.rank_donor(&donor, &patients, as_of());
        let ids: Vec<&str> = ranking.candidates.iter().map(|c| c.patient_id.as_str()).collect();

        assert_eq!(ids, vec!["P3", "P1", "P2"]);
        assert_eq!(ranking.candidates[0].score.composite, ranking.candidates[2].score.composite);
    }

    #[test]
    fn test_inactive_records_ignored() {
        let matcher = Matcher::with_default_weights();
        let mut allocated = create_donor("D2", BloodType::O);
        allocated.status = DonorStatus::Allocated;
        let donors = vec![create_donor("D1", BloodType::O), allocated];

        let mut matched = create_patient("P2", BloodType::O, 100);
        matched.status = PatientStatus::Matched;
        let patients = vec![create_patient("P1", BloodType::O, 100), matched];

        let rankings = matcher.rank_all(&donors, &patients, as_of());

        assert_eq!(rankings.len(), 1);
        assert_eq!(rankings[0].donor_id, "D1");
        assert_eq!(rankings[0].candidates.len(), 1);
        assert_eq!(rankings[0].candidates[0].patient_id, "P1");
    }

    #[test]
    fn test_invalid_record_is_skipped() {
        let matcher = Matcher::with_default_weights();
        let donor = create_donor("D1", BloodType::O);
        let mut broken = create_patient("P2", BloodType::O, 100);
        broken.cpra = 150.0;
        let patients = vec![create_patient("P1", BloodType::O, 100), broken];

        let ranking = matcher.rank_donor(&donor, &patients, as_of());

        assert_eq!(ranking.skipped, 1);
        assert_eq!(ranking.candidates.len(), 1);
    }

    #[test]
    fn test_rejects_bad_weights() {
        let weights = ScoringWeights {
            blood_type: 1.0,
            ..ScoringWeights::default()
        };
        assert!(Matcher::new(weights).is_err());
    }

    #[test]
    fn test_statistics() {
        let matcher = Matcher::with_default_weights();
        let donors = vec![create_donor("D1", BloodType::O)];
        let patients = vec![
            create_patient("P1", BloodType::O, 100),
            create_patient("P2", BloodType::O, 1000),
        ];

        let rankings = matcher.rank_all(&donors, &patients, as_of());
        let stats = match_statistics(&rankings);

        assert_eq!(stats.total_matches, 2);
        assert!(stats.highest_score >= stats.average_score);
        assert_eq!(stats.highest_score, rankings[0].candidates[0].score.composite);
        assert_eq!(top_matches(&rankings, 1).len(), 1);
        assert_eq!(match_statistics(&[]).total_matches, 0);
    }
}
