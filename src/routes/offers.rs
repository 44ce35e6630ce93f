use actix_web::{web, HttpResponse};
use uuid::Uuid;
use validator::Validate;

use crate::error::AllocationError;
use crate::models::{CreateOfferRequest, OfferStatus, OfferView, OffersResponse, Session};
use crate::routes::AppState;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/offers", web::post().to(create_offer))
        .route("/offers", web::get().to(list_offers))
        .route("/offers/{offer_id}", web::get().to(get_offer))
        .route("/offers/{offer_id}/accept", web::post().to(accept_offer))
        .route("/offers/{offer_id}/reject", web::post().to(reject_offer));
}

/// Create offer endpoint
///
/// POST /api/v1/offers
///
/// Request body:
/// ```json
/// { "patientId": "P001", "donorId": "D001" }
/// ```
async fn create_offer(
    state: web::Data<AppState>,
    session: Session,
    req: web::Json<CreateOfferRequest>,
) -> Result<HttpResponse, AllocationError> {
    req.validate()?;

    let offer = state.tracker.create(&session, &req.patient_id, &req.donor_id)?;

    Ok(HttpResponse::Created().json(OfferView::at(&offer, state.tracker.now())))
}

/// Pending offers and decision history visible to the caller
///
/// GET /api/v1/offers
async fn list_offers(
    state: web::Data<AppState>,
    session: Session,
) -> Result<HttpResponse, AllocationError> {
    let offers = state.tracker.list(&session)?;
    let now = state.tracker.now();

    let (pending, history): (Vec<OfferView>, Vec<OfferView>) = offers
        .iter()
        .map(|offer| OfferView::at(offer, now))
        .partition(|view| view.status == OfferStatus::Pending);

    Ok(HttpResponse::Ok().json(OffersResponse { pending, history }))
}

/// GET /api/v1/offers/{offer_id}
async fn get_offer(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AllocationError> {
    let offer = state.tracker.get(&session, path.into_inner())?;

    Ok(HttpResponse::Ok().json(OfferView::at(&offer, state.tracker.now())))
}

/// POST /api/v1/offers/{offer_id}/accept
async fn accept_offer(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AllocationError> {
    let offer = state.tracker.accept(&session, path.into_inner())?;

    Ok(HttpResponse::Ok().json(OfferView::at(&offer, state.tracker.now())))
}

/// POST /api/v1/offers/{offer_id}/reject
async fn reject_offer(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AllocationError> {
    let offer = state.tracker.reject(&session, path.into_inner())?;

    Ok(HttpResponse::Ok().json(OfferView::at(&offer, state.tracker.now())))
}
