use serde::{Deserialize, Serialize};
use validator::Validate;

/// Login with username and password
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Request to send an offer for a patient/donor pair
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateOfferRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "patient_id", rename = "patientId")]
    pub patient_id: String,
    #[validate(length(min = 1))]
    #[serde(alias = "donor_id", rename = "donorId")]
    pub donor_id: String,
}

/// Query for a single pair score breakdown
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ScorePairQuery {
    #[validate(length(min = 1))]
    #[serde(alias = "patient_id", rename = "patientId")]
    pub patient_id: String,
    #[validate(length(min = 1))]
    #[serde(alias = "donor_id", rename = "donorId")]
    pub donor_id: String,
}

/// Optional size of the flattened top-matches list
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerateMatchesRequest {
    #[serde(default)]
    pub limit: Option<usize>,
}
