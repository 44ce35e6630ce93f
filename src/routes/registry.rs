use actix_web::{web, HttpResponse, Responder};

use crate::error::AllocationError;
use crate::models::{
    DashboardResponse, DonorStatus, DonorSummary, HealthResponse, OfferStatus, PatientStatus,
    PatientSummary, Session,
};
use crate::routes::AppState;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/dashboard", web::get().to(dashboard))
        .route("/patients", web::get().to(list_patients))
        .route("/donors", web::get().to(list_donors));
}

/// Health check endpoint
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Headline counts
///
/// GET /api/v1/dashboard
async fn dashboard(
    state: web::Data<AppState>,
    _session: Session,
) -> Result<HttpResponse, AllocationError> {
    let now = state.tracker.now();

    let active_patients = state
        .store
        .list_patients()?
        .iter()
        .filter(|p| p.status == PatientStatus::Active)
        .count();
    let available_donors = state
        .store
        .list_donors()?
        .iter()
        .filter(|d| d.status == DonorStatus::Available)
        .count();

    let offers = state.store.list_offers()?;
    let pending_offers = offers.iter().filter(|o| o.is_pending_at(now)).count();
    let accepted_offers = offers
        .iter()
        .filter(|o| o.status == OfferStatus::Accepted)
        .count();

    Ok(HttpResponse::Ok().json(DashboardResponse {
        active_patients,
        available_donors,
        pending_offers,
        accepted_offers,
    }))
}

/// Waitlist; physicians see their own patients, administrators everyone
///
/// GET /api/v1/patients
async fn list_patients(
    state: web::Data<AppState>,
    session: Session,
) -> Result<HttpResponse, AllocationError> {
    let today = state.tracker.now().date_naive();

    let patients: Vec<PatientSummary> = state
        .store
        .list_patients()?
        .into_iter()
        .filter(|p| session.can_act_for(&p.physician_id))
        .map(|p| PatientSummary {
            wait_days: p.wait_days(today),
            patient_id: p.patient_id,
            name: p.name,
            age: p.age,
            blood_type: p.blood_type,
            cpra: p.cpra,
            wait_list_start: p.wait_list_start,
            epts: p.epts,
            status: p.status,
            physician_id: p.physician_id,
        })
        .collect();

    tracing::debug!("{} can see {} patients", session.physician_id, patients.len());

    Ok(HttpResponse::Ok().json(patients))
}

/// Donors currently available for allocation
///
/// GET /api/v1/donors
async fn list_donors(
    state: web::Data<AppState>,
    _session: Session,
) -> Result<HttpResponse, AllocationError> {
    let donors: Vec<DonorSummary> = state
        .store
        .list_donors()?
        .into_iter()
        .filter(|d| d.status == DonorStatus::Available)
        .map(|d| DonorSummary {
            donor_id: d.donor_id,
            age: d.age,
            blood_type: d.blood_type,
            kdpi: d.kdpi,
            procured_at: d.procured_at,
        })
        .collect();

    Ok(HttpResponse::Ok().json(donors))
}
