use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::error::{AllocationError, Result};

/// ABO blood group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BloodType {
    O,
    A,
    B,
    #[serde(rename = "AB")]
    AB,
}

impl BloodType {
    /// Standard ABO compatibility: O gives to everyone, AB receives from everyone
    pub fn can_donate_to(self, recipient: BloodType) -> bool {
        match (self, recipient) {
            (BloodType::O, _) => true,
            (_, BloodType::AB) => true,
            (donor, recipient) => donor == recipient,
        }
    }
}

impl std::fmt::Display for BloodType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            BloodType::O => "O",
            BloodType::A => "A",
            BloodType::B => "B",
            BloodType::AB => "AB",
        };
        f.write_str(s)
    }
}

/// HLA typing: two antigens at each of the A, B and DR loci
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HlaTyping {
    pub a: [String; 2],
    pub b: [String; 2],
    pub dr: [String; 2],
}

impl HlaTyping {
    /// Build from a six-antigen panel ordered A, A, B, B, DR, DR
    pub fn from_panel(panel: [&str; 6]) -> Self {
        Self {
            a: [panel[0].to_string(), panel[1].to_string()],
            b: [panel[2].to_string(), panel[3].to_string()],
            dr: [panel[4].to_string(), panel[5].to_string()],
        }
    }

    pub fn loci(&self) -> [(&'static str, &[String; 2]); 3] {
        [("A", &self.a), ("B", &self.b), ("DR", &self.dr)]
    }

    fn check(&self) -> Result<()> {
        for (locus, antigens) in self.loci() {
            if antigens.iter().any(|antigen| antigen.trim().is_empty()) {
                return Err(AllocationError::InvalidInput(format!(
                    "missing HLA-{} antigen",
                    locus
                )));
            }
        }
        Ok(())
    }
}

/// Geographic location of a transplant centre or procurement site
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    fn check(&self) -> Result<()> {
        let valid = self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude);
        if valid {
            Ok(())
        } else {
            Err(AllocationError::InvalidInput(format!(
                "location out of range: ({}, {})",
                self.latitude, self.longitude
            )))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PatientStatus {
    Active,
    Matched,
    Removed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DonorStatus {
    Available,
    Allocated,
    Discarded,
}

/// Wait-listed kidney recipient
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    #[validate(length(min = 1))]
    pub patient_id: String,
    pub name: String,
    pub blood_type: BloodType,
    pub hla: HlaTyping,
    #[validate(range(min = 0.0, max = 100.0))]
    pub cpra: f64,
    pub wait_list_start: NaiveDate,
    #[validate(range(max = 120))]
    pub age: u8,
    #[validate(range(min = 0.0, max = 100.0))]
    pub epts: f64,
    pub location: GeoPoint,
    pub status: PatientStatus,
    #[validate(length(min = 1))]
    pub physician_id: String,
}

impl Patient {
    /// Validate every clinical field the scorer relies on
    pub fn validate_clinical(&self) -> Result<()> {
        self.validate().map_err(|e| {
            AllocationError::InvalidInput(format!("patient {}: {}", self.patient_id, e))
        })?;
        if !self.cpra.is_finite() || !self.epts.is_finite() {
            return Err(AllocationError::InvalidInput(format!(
                "patient {}: CPRA and EPTS must be finite",
                self.patient_id
            )));
        }
        self.hla.check()?;
        self.location.check()
    }

    /// Whole days on the wait list as of the given date, never negative
    pub fn wait_days(&self, as_of: NaiveDate) -> i64 {
        (as_of - self.wait_list_start).num_days().max(0)
    }
}

/// Deceased kidney donor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Donor {
    #[validate(length(min = 1))]
    pub donor_id: String,
    pub blood_type: BloodType,
    pub hla: HlaTyping,
    #[validate(range(max = 120))]
    pub age: u8,
    #[validate(range(min = 0.0, max = 100.0))]
    pub kdpi: f64,
    pub location: GeoPoint,
    pub status: DonorStatus,
    #[serde(default)]
    pub procured_at: Option<DateTime<Utc>>,
}

impl Donor {
    pub fn validate_clinical(&self) -> Result<()> {
        self.validate().map_err(|e| {
            AllocationError::InvalidInput(format!("donor {}: {}", self.donor_id, e))
        })?;
        if !self.kdpi.is_finite() {
            return Err(AllocationError::InvalidInput(format!(
                "donor {}: KDPI must be finite",
                self.donor_id
            )));
        }
        self.hla.check()?;
        self.location.check()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OfferStatus {
    Pending,
    Accepted,
    Rejected,
    Expired,
}

impl OfferStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, OfferStatus::Pending)
    }
}

/// Time-limited organ offer sent to the patient's physician
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    pub offer_id: Uuid,
    pub patient_id: String,
    pub donor_id: String,
    pub physician_id: String,
    pub score: MatchScore,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub status: OfferStatus,
    pub decided_at: Option<DateTime<Utc>>,
}

impl Offer {
    /// Status as observed at `now`: a stored Pending past its deadline reads as Expired
    pub fn effective_status(&self, now: DateTime<Utc>) -> OfferStatus {
        if self.status == OfferStatus::Pending && now >= self.expires_at {
            OfferStatus::Expired
        } else {
            self.status
        }
    }

    pub fn is_pending_at(&self, now: DateTime<Utc>) -> bool {
        self.effective_status(now) == OfferStatus::Pending
    }

    /// Whole minutes left before expiry, zero once expired or decided
    pub fn minutes_remaining(&self, now: DateTime<Utc>) -> i64 {
        if !self.is_pending_at(now) {
            return 0;
        }
        (self.expires_at - now).num_minutes().max(0)
    }
}

/// Score breakdown for one patient/donor pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchScore {
    pub composite: f64,
    pub blood_type: f64,
    pub hla: f64,
    pub cpra: f64,
    pub wait_time: f64,
    pub age: f64,
    pub distance: f64,
    pub quality: f64,
    pub abo_compatible: bool,
    pub hla_matches: u8,
    pub distance_miles: f64,
}

/// Weights applied to the seven sub-scores
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub blood_type: f64,
    pub hla: f64,
    pub cpra: f64,
    pub wait_time: f64,
    pub age: f64,
    pub distance: f64,
    pub quality: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            blood_type: 0.25,
            hla: 0.20,
            cpra: 0.15,
            wait_time: 0.15,
            age: 0.10,
            distance: 0.10,
            quality: 0.05,
        }
    }
}

impl ScoringWeights {
    fn as_array(&self) -> [f64; 7] {
        [
            self.blood_type,
            self.hla,
            self.cpra,
            self.wait_time,
            self.age,
            self.distance,
            self.quality,
        ]
    }

    /// Weights must be non-negative and sum to 1.0 so the composite stays in [0, 100]
    pub fn validate(&self) -> Result<()> {
        let weights = self.as_array();
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(AllocationError::InvalidInput(
                "scoring weights must be finite and non-negative".to_string(),
            ));
        }
        let sum: f64 = weights.iter().sum();
        if (sum - 1.0).abs() > 1e-6 {
            return Err(AllocationError::InvalidInput(format!(
                "scoring weights must sum to 1.0, got {}",
                sum
            )));
        }
        Ok(())
    }
}

/// One patient in a donor's ranked candidate list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedCandidate {
    pub donor_id: String,
    pub patient_id: String,
    pub patient_name: String,
    pub physician_id: String,
    pub wait_days: i64,
    pub score: MatchScore,
}

/// Ranked candidates for a single donor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonorRanking {
    pub donor_id: String,
    pub candidates: Vec<RankedCandidate>,
    pub excluded_incompatible: usize,
    pub skipped: usize,
}

/// Aggregate figures over a ranking run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchStatistics {
    pub total_matches: usize,
    pub average_score: f64,
    pub highest_score: f64,
}

/// Role carried by an authenticated session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Physician,
    Administrator,
}

/// Authenticated caller identity passed to every entry point
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub physician_id: String,
    pub role: Role,
}

impl Session {
    pub fn physician(physician_id: impl Into<String>) -> Self {
        Self {
            physician_id: physician_id.into(),
            role: Role::Physician,
        }
    }

    pub fn administrator(physician_id: impl Into<String>) -> Self {
        Self {
            physician_id: physician_id.into(),
            role: Role::Administrator,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Administrator
    }

    /// Administrators see everything; physicians only their own records
    pub fn can_act_for(&self, physician_id: &str) -> bool {
        self.is_admin() || self.physician_id == physician_id
    }
}
