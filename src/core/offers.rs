use chrono::{DateTime, Duration, Utc};
use std::sync::{Arc, Mutex, MutexGuard};
use uuid::Uuid;

use crate::core::{clock::Clock, matcher::Matcher};
use crate::error::{AllocationError, Result};
use crate::models::{DonorStatus, Offer, OfferStatus, PatientStatus, Session};
use crate::services::store::AllocationStore;

/// Default time a physician has to answer an offer
pub const DEFAULT_OFFER_DURATION_MINUTES: i64 = 60;

/// Offer lifecycle: Pending -> Accepted | Rejected | Expired
///
/// Expiry is never scheduled. Every read compares the stored deadline with
/// the clock, and a write on an overdue offer persists Expired first.
/// Create, accept and reject run under one writer lock so the
/// "one pending offer per donor" check and the write that follows are atomic.
pub struct OfferTracker {
    store: Arc<dyn AllocationStore>,
    clock: Arc<dyn Clock>,
    matcher: Matcher,
    offer_duration: Duration,
    writer: Mutex<()>,
}

impl OfferTracker {
    pub fn new(
        store: Arc<dyn AllocationStore>,
        clock: Arc<dyn Clock>,
        matcher: Matcher,
        offer_duration: Duration,
    ) -> Self {
        Self {
            store,
            clock,
            matcher,
            offer_duration,
            writer: Mutex::new(()),
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn offer_duration(&self) -> Duration {
        self.offer_duration
    }

    fn lock_writer(&self) -> Result<MutexGuard<'_, ()>> {
        self.writer
            .lock()
            .map_err(|_| AllocationError::Internal("offer writer lock poisoned".to_string()))
    }

    /// Send an offer for a donor to the patient's physician
    pub fn create(&self, session: &Session, patient_id: &str, donor_id: &str) -> Result<Offer> {
        let _guard = self.lock_writer()?;
        let now = self.clock.now();

        let patient = self.store.get_patient(patient_id)?;
        let donor = self.store.get_donor(donor_id)?;

        if patient.status != PatientStatus::Active {
            return Err(AllocationError::InvalidState(format!(
                "patient {} is {:?}, expected Active",
                patient_id, patient.status
            )));
        }
        if donor.status != DonorStatus::Available {
            return Err(AllocationError::InvalidState(format!(
                "donor {} is {:?}, expected Available",
                donor_id, donor.status
            )));
        }

        for existing in self.store.list_offers()? {
            if !existing.is_pending_at(now) {
                continue;
            }
            if existing.donor_id == donor_id {
                return Err(AllocationError::InvalidState(format!(
                    "donor {} already has pending offer {}",
                    donor_id, existing.offer_id
                )));
            }
            if existing.patient_id == patient_id {
                return Err(AllocationError::InvalidState(format!(
                    "patient {} already has pending offer {}",
                    patient_id, existing.offer_id
                )));
            }
        }

        let score = self.matcher.score_pair(&patient, &donor, now.date_naive())?;
        if !score.abo_compatible {
            return Err(AllocationError::InvalidState(format!(
                "donor {} ({}) is ABO incompatible with patient {} ({})",
                donor_id, donor.blood_type, patient_id, patient.blood_type
            )));
        }

        let offer = Offer {
            offer_id: Uuid::new_v4(),
            patient_id: patient.patient_id.clone(),
            donor_id: donor.donor_id.clone(),
            physician_id: patient.physician_id.clone(),
            score,
            created_at: now,
            expires_at: now + self.offer_duration,
            status: OfferStatus::Pending,
            decided_at: None,
        };

        self.store.insert_offer(offer.clone())?;

        tracing::info!(
            "Offer {} created by {}: donor {} -> patient {} \
             (physician {}, score {:.2}, expires {})",
            offer.offer_id,
            session.physician_id,
            offer.donor_id,
            offer.patient_id,
            offer.physician_id,
            offer.score.composite,
            offer.expires_at
        );

        Ok(offer)
    }

    /// Accept a pending offer: patient becomes Matched, donor Allocated
    pub fn accept(&self, session: &Session, offer_id: Uuid) -> Result<Offer> {
        let _guard = self.lock_writer()?;
        let now = self.clock.now();

        let mut offer = self.decidable_offer(session, offer_id, now)?;

        let patient = self.store.get_patient(&offer.patient_id)?;
        let donor = self.store.get_donor(&offer.donor_id)?;
        if patient.status != PatientStatus::Active || donor.status != DonorStatus::Available {
            return Err(AllocationError::InvalidState(format!(
                "offer {} can no longer be accepted: patient {:?}, donor {:?}",
                offer_id, patient.status, donor.status
            )));
        }

        // Records first, offer last; undo earlier writes if a later one fails
        self.store
            .set_patient_status(&offer.patient_id, PatientStatus::Matched)?;
        if let Err(e) = self
            .store
            .set_donor_status(&offer.donor_id, DonorStatus::Allocated)
        {
            self.restore_patient(&offer.patient_id);
            return Err(e);
        }

        offer.status = OfferStatus::Accepted;
        offer.decided_at = Some(now);
        if let Err(e) = self.store.update_offer(offer.clone()) {
            self.restore_patient(&offer.patient_id);
            if let Err(undo) = self
                .store
                .set_donor_status(&offer.donor_id, DonorStatus::Available)
            {
                tracing::error!("Failed to restore donor {}: {}", offer.donor_id, undo);
            }
            return Err(e);
        }

        tracing::info!(
            "Offer {} accepted by {}: donor {} allocated to patient {}",
            offer.offer_id,
            session.physician_id,
            offer.donor_id,
            offer.patient_id
        );

        Ok(offer)
    }

    fn restore_patient(&self, patient_id: &str) {
        if let Err(e) = self.store.set_patient_status(patient_id, PatientStatus::Active) {
            tracing::error!("Failed to restore patient {}: {}", patient_id, e);
        }
    }

    /// Reject a pending offer; the donor stays Available for the next ranking
    pub fn reject(&self, session: &Session, offer_id: Uuid) -> Result<Offer> {
        let _guard = self.lock_writer()?;
        let now = self.clock.now();

        let mut offer = self.decidable_offer(session, offer_id, now)?;

        offer.status = OfferStatus::Rejected;
        offer.decided_at = Some(now);
        self.store.update_offer(offer.clone())?;

        tracing::info!(
            "Offer {} rejected by {}: donor {} remains available",
            offer.offer_id,
            session.physician_id,
            offer.donor_id
        );

        Ok(offer)
    }

    /// Load an offer the session may decide, enforcing Pending and unexpired
    fn decidable_offer(
        &self,
        session: &Session,
        offer_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Offer> {
        let mut offer = self.store.get_offer(offer_id)?;

        if !session.can_act_for(&offer.physician_id) {
            return Err(AllocationError::Forbidden(format!(
                "offer {} belongs to {}",
                offer_id, offer.physician_id
            )));
        }

        if offer.status.is_terminal() {
            return Err(AllocationError::AlreadyDecided(offer_id.to_string()));
        }

        if offer.effective_status(now) == OfferStatus::Expired {
            offer.status = OfferStatus::Expired;
            self.store.update_offer(offer)?;
            tracing::info!("Offer {} expired before a decision was made", offer_id);
            return Err(AllocationError::Expired(offer_id.to_string()));
        }

        Ok(offer)
    }

    /// Read one offer with its status evaluated at the current time
    pub fn get(&self, session: &Session, offer_id: Uuid) -> Result<Offer> {
        let now = self.clock.now();
        let offer = self.store.get_offer(offer_id)?;

        if !session.can_act_for(&offer.physician_id) {
            return Err(AllocationError::Forbidden(format!(
                "offer {} belongs to {}",
                offer_id, offer.physician_id
            )));
        }

        Ok(observe(offer, now))
    }

    /// Offers visible to the session, oldest first, with effective statuses
    pub fn list(&self, session: &Session) -> Result<Vec<Offer>> {
        self.sweep_expired()?;
        let now = self.clock.now();

        Ok(self
            .store
            .list_offers()?
            .into_iter()
            .filter(|offer| session.can_act_for(&offer.physician_id))
            .map(|offer| observe(offer, now))
            .collect())
    }

    /// Persist Expired for every stored Pending offer past its deadline
    pub fn sweep_expired(&self) -> Result<usize> {
        let _guard = self.lock_writer()?;
        let now = self.clock.now();
        let mut expired = 0;

        for mut offer in self.store.list_offers()? {
            if offer.status == OfferStatus::Pending
                && offer.effective_status(now) == OfferStatus::Expired
            {
                offer.status = OfferStatus::Expired;
                self.store.update_offer(offer)?;
                expired += 1;
            }
        }

        if expired > 0 {
            tracing::debug!("Marked {} overdue offers as expired", expired);
        }

        Ok(expired)
    }
}

/// Copy of the offer with its status as seen at `now`
fn observe(mut offer: Offer, now: DateTime<Utc>) -> Offer {
    offer.status = offer.effective_status(now);
    offer
}
