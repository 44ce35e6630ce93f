// Core algorithm exports
pub mod clock;
pub mod compatibility;
pub mod distance;
pub mod indices;
pub mod matcher;
pub mod offers;
pub mod scoring;

pub use clock::{Clock, ManualClock, SystemClock};
pub use compatibility::{count_hla_matches, is_eligible_pair};
pub use distance::{distance_score, haversine_miles};
pub use indices::{estimate_epts, estimate_kdpi, EptsFactors, KdpiFactors};
pub use matcher::{match_statistics, top_matches, Matcher};
pub use offers::{OfferTracker, DEFAULT_OFFER_DURATION_MINUTES};
pub use scoring::calculate_match_score;
