use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::core::{match_statistics, top_matches};
use crate::error::AllocationError;
use crate::models::{
    GenerateMatchesRequest, GenerateMatchesResponse, ScorePairQuery, ScorePairResponse, Session,
};
use crate::routes::AppState;

/// Default size of the flattened top-matches list
const DEFAULT_TOP_MATCHES: usize = 10;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/matches/generate", web::post().to(generate_matches))
        .route("/matches/score", web::get().to(score_pair));
}

/// Generate matches endpoint
///
/// POST /api/v1/matches/generate
///
/// Scores every Active patient against every Available donor and returns
/// per-donor rankings. Request body is optional:
/// ```json
/// { "limit": 10 }
/// ```
async fn generate_matches(
    state: web::Data<AppState>,
    session: Session,
    req: Option<web::Json<GenerateMatchesRequest>>,
) -> Result<HttpResponse, AllocationError> {
    let limit = req
        .and_then(|r| r.into_inner().limit)
        .unwrap_or(DEFAULT_TOP_MATCHES);

    let now = state.tracker.now();
    let patients = state.store.list_patients()?;
    let donors = state.store.list_donors()?;

    let rankings = state.matcher.rank_all(&donors, &patients, now.date_naive());
    let statistics = match_statistics(&rankings);

    tracing::info!(
        "{} generated {} matches across {} donors",
        session.physician_id,
        statistics.total_matches,
        rankings.len()
    );

    Ok(HttpResponse::Ok().json(GenerateMatchesResponse {
        top_matches: top_matches(&rankings, limit),
        rankings,
        statistics,
        generated_at: now,
    }))
}

/// Score breakdown for one pair
///
/// GET /api/v1/matches/score?patientId={id}&donorId={id}
async fn score_pair(
    state: web::Data<AppState>,
    _session: Session,
    query: web::Query<ScorePairQuery>,
) -> Result<HttpResponse, AllocationError> {
    query.validate()?;

    let patient = state.store.get_patient(&query.patient_id)?;
    let donor = state.store.get_donor(&query.donor_id)?;
    let score = state
        .matcher
        .score_pair(&patient, &donor, state.tracker.now().date_naive())?;

    Ok(HttpResponse::Ok().json(ScorePairResponse {
        patient_id: patient.patient_id,
        donor_id: donor.donor_id,
        score,
    }))
}
