//! Kidney Match - deceased-donor kidney allocation service
//!
//! Scores waitlisted patients against available donors, ranks candidates
//! per donor, and tracks time-limited organ offers through to a decision.

pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{calculate_match_score, Matcher, OfferTracker};
pub use error::{AllocationError, Result};
pub use models::{Donor, MatchScore, Offer, OfferStatus, Patient, ScoringWeights, Session};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let matcher = Matcher::default();
        assert_eq!(matcher.weights(), &ScoringWeights::default());
    }
}
