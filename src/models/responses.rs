use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::domain::{
    BloodType, DonorRanking, MatchScore, MatchStatistics, Offer, OfferStatus, PatientStatus,
    RankedCandidate, Role,
};

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub physician_id: String,
    pub role: Role,
    pub expires_at: DateTime<Utc>,
}

/// Headline counts for the dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub active_patients: usize,
    pub available_donors: usize,
    pub pending_offers: usize,
    pub accepted_offers: usize,
}

/// Waitlist entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientSummary {
    pub patient_id: String,
    pub name: String,
    pub age: u8,
    pub blood_type: BloodType,
    pub cpra: f64,
    pub wait_list_start: NaiveDate,
    pub wait_days: i64,
    pub epts: f64,
    pub status: PatientStatus,
    pub physician_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonorSummary {
    pub donor_id: String,
    pub age: u8,
    pub blood_type: BloodType,
    pub kdpi: f64,
    pub procured_at: Option<DateTime<Utc>>,
}

/// Result of a ranking run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateMatchesResponse {
    pub rankings: Vec<DonorRanking>,
    pub top_matches: Vec<RankedCandidate>,
    pub statistics: MatchStatistics,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScorePairResponse {
    pub patient_id: String,
    pub donor_id: String,
    pub score: MatchScore,
}

/// Offer as observed at read time
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferView {
    pub offer_id: Uuid,
    pub patient_id: String,
    pub donor_id: String,
    pub physician_id: String,
    pub score: MatchScore,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub status: OfferStatus,
    pub decided_at: Option<DateTime<Utc>>,
    pub minutes_remaining: i64,
}

impl OfferView {
    pub fn at(offer: &Offer, now: DateTime<Utc>) -> Self {
        Self {
            offer_id: offer.offer_id,
            patient_id: offer.patient_id.clone(),
            donor_id: offer.donor_id.clone(),
            physician_id: offer.physician_id.clone(),
            score: offer.score,
            created_at: offer.created_at,
            expires_at: offer.expires_at,
            status: offer.effective_status(now),
            decided_at: offer.decided_at,
            minutes_remaining: offer.minutes_remaining(now),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OffersResponse {
    pub pending: Vec<OfferView>,
    pub history: Vec<OfferView>,
}
