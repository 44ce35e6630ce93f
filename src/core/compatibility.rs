use crate::models::{Donor, DonorStatus, HlaTyping, Patient, PatientStatus};

/// Check whether a pair may enter ranking at all
///
/// Only Active patients and Available donors take part, and the donor's
/// blood group must be ABO compatible with the recipient.
#[inline]
pub fn is_eligible_pair(patient: &Patient, donor: &Donor) -> bool {
    patient.status == PatientStatus::Active
        && donor.status == DonorStatus::Available
        && donor.blood_type.can_donate_to(patient.blood_type)
}

/// Blood type sub-score: binary pass/fail scaled to 100/0
#[inline]
pub fn blood_type_score(patient: &Patient, donor: &Donor) -> f64 {
    if donor.blood_type.can_donate_to(patient.blood_type) {
        100.0
    } else {
        0.0
    }
}

/// Count donor antigens the patient also carries, locus by locus
///
/// Each patient antigen can only be matched once, so a homozygous donor
/// (A2, A2) against a patient (A2, A1) scores one match at that locus.
pub fn count_hla_matches(patient: &HlaTyping, donor: &HlaTyping) -> u8 {
    let mut matches = 0u8;

    for ((_, patient_locus), (_, donor_locus)) in patient.loci().iter().zip(donor.loci().iter()) {
        let mut consumed = [false; 2];
        for donor_antigen in donor_locus.iter() {
            let hit = patient_locus
                .iter()
                .enumerate()
                .find(|(i, antigen)| !consumed[*i] && antigens_equal(antigen, donor_antigen));
            if let Some((i, _)) = hit {
                consumed[i] = true;
                matches += 1;
            }
        }
    }

    matches
}

/// HLA sub-score: matched antigens out of six, scaled to 100
#[inline]
pub fn hla_score(matches: u8) -> f64 {
    (matches.min(6) as f64 / 6.0) * 100.0
}

#[inline]
fn antigens_equal(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_match() {
        let typing = HlaTyping::from_panel(["A1", "A2", "B8", "B44", "DR3", "DR4"]);
        assert_eq!(count_hla_matches(&typing, &typing), 6);
        assert_eq!(hla_score(6), 100.0);
    }

    #[test]
    fn test_matches_are_per_locus_not_positional() {
        let patient = HlaTyping::from_panel(["A1", "A2", "B8", "B44", "DR3", "DR4"]);
        let donor = HlaTyping::from_panel(["A2", "A1", "B44", "B7", "DR4", "DR15"]);
        assert_eq!(count_hla_matches(&patient, &donor), 4);
    }

    #[test]
    fn test_antigen_at_wrong_locus_does_not_match() {
        let patient = HlaTyping::from_panel(["A1", "A2", "B8", "B44", "DR3", "DR4"]);
        let donor = HlaTyping::from_panel(["B8", "B44", "A1", "A2", "DR1", "DR7"]);
        assert_eq!(count_hla_matches(&patient, &donor), 0);
    }

    #[test]
    fn test_homozygous_donor_counts_once() {
        let patient = HlaTyping::from_panel(["A2", "A1", "B7", "B8", "DR1", "DR3"]);
        let donor = HlaTyping::from_panel(["A2", "A2", "B13", "B14", "DR4", "DR7"]);
        assert_eq!(count_hla_matches(&patient, &donor), 1);
    }
}
