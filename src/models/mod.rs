// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    BloodType, Donor, DonorRanking, DonorStatus, GeoPoint, HlaTyping, MatchScore, MatchStatistics,
    Offer, OfferStatus, Patient, PatientStatus, RankedCandidate, Role, ScoringWeights, Session,
};
pub use requests::{CreateOfferRequest, GenerateMatchesRequest, LoginRequest, ScorePairQuery};
pub use responses::{
    DashboardResponse, DonorSummary, ErrorResponse, GenerateMatchesResponse, HealthResponse,
    LoginResponse, OfferView, OffersResponse, PatientSummary, ScorePairResponse,
};
