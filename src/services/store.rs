use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

use crate::error::{AllocationError, Result};
use crate::models::{Donor, DonorStatus, Offer, Patient, PatientStatus};

/// Storage for patients, donors and offers
///
/// Implementations only need keyed reads, full listings and in-place updates;
/// listings are returned sorted by identifier (offers by creation time).
pub trait AllocationStore: Send + Sync {
    fn get_patient(&self, patient_id: &str) -> Result<Patient>;
    fn list_patients(&self) -> Result<Vec<Patient>>;
    fn upsert_patient(&self, patient: Patient) -> Result<()>;
    fn set_patient_status(&self, patient_id: &str, status: PatientStatus) -> Result<()>;

    fn get_donor(&self, donor_id: &str) -> Result<Donor>;
    fn list_donors(&self) -> Result<Vec<Donor>>;
    fn upsert_donor(&self, donor: Donor) -> Result<()>;
    fn set_donor_status(&self, donor_id: &str, status: DonorStatus) -> Result<()>;

    fn get_offer(&self, offer_id: Uuid) -> Result<Offer>;
    fn list_offers(&self) -> Result<Vec<Offer>>;
    fn insert_offer(&self, offer: Offer) -> Result<()>;
    fn update_offer(&self, offer: Offer) -> Result<()>;
}

/// Process-local store backed by hash maps
#[derive(Debug, Default)]
pub struct InMemoryStore {
    patients: RwLock<HashMap<String, Patient>>,
    donors: RwLock<HashMap<String, Donor>>,
    offers: RwLock<HashMap<Uuid, Offer>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn read<T>(lock: &RwLock<T>) -> Result<RwLockReadGuard<'_, T>> {
    lock.read()
        .map_err(|_| AllocationError::Internal("store lock poisoned".to_string()))
}

fn write<T>(lock: &RwLock<T>) -> Result<RwLockWriteGuard<'_, T>> {
    lock.write()
        .map_err(|_| AllocationError::Internal("store lock poisoned".to_string()))
}

impl AllocationStore for InMemoryStore {
    fn get_patient(&self, patient_id: &str) -> Result<Patient> {
        read(&self.patients)?
            .get(patient_id)
            .cloned()
            .ok_or_else(|| AllocationError::NotFound(format!("patient {}", patient_id)))
    }

    fn list_patients(&self) -> Result<Vec<Patient>> {
        let mut patients: Vec<Patient> = read(&self.patients)?.values().cloned().collect();
        patients.sort_by(|a, b| a.patient_id.cmp(&b.patient_id));
        Ok(patients)
    }

    fn upsert_patient(&self, patient: Patient) -> Result<()> {
        write(&self.patients)?.insert(patient.patient_id.clone(), patient);
        Ok(())
    }

    fn set_patient_status(&self, patient_id: &str, status: PatientStatus) -> Result<()> {
        let mut patients = write(&self.patients)?;
        let patient = patients
            .get_mut(patient_id)
            .ok_or_else(|| AllocationError::NotFound(format!("patient {}", patient_id)))?;
        patient.status = status;
        Ok(())
    }

    fn get_donor(&self, donor_id: &str) -> Result<Donor> {
        read(&self.donors)?
            .get(donor_id)
            .cloned()
            .ok_or_else(|| AllocationError::NotFound(format!("donor {}", donor_id)))
    }

    fn list_donors(&self) -> Result<Vec<Donor>> {
        let mut donors: Vec<Donor> = read(&self.donors)?.values().cloned().collect();
        donors.sort_by(|a, b| a.donor_id.cmp(&b.donor_id));
        Ok(donors)
    }

    fn upsert_donor(&self, donor: Donor) -> Result<()> {
        write(&self.donors)?.insert(donor.donor_id.clone(), donor);
        Ok(())
    }

    fn set_donor_status(&self, donor_id: &str, status: DonorStatus) -> Result<()> {
        let mut donors = write(&self.donors)?;
        let donor = donors
            .get_mut(donor_id)
            .ok_or_else(|| AllocationError::NotFound(format!("donor {}", donor_id)))?;
        donor.status = status;
        Ok(())
    }

    fn get_offer(&self, offer_id: Uuid) -> Result<Offer> {
        read(&self.offers)?
            .get(&offer_id)
            .cloned()
            .ok_or_else(|| AllocationError::NotFound(format!("offer {}", offer_id)))
    }

    fn list_offers(&self) -> Result<Vec<Offer>> {
        let mut offers: Vec<Offer> = read(&self.offers)?.values().cloned().collect();
        offers.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.offer_id.cmp(&b.offer_id))
        });
        Ok(offers)
    }

    fn insert_offer(&self, offer: Offer) -> Result<()> {
        let mut offers = write(&self.offers)?;
        if offers.contains_key(&offer.offer_id) {
            return Err(AllocationError::InvalidState(format!(
                "offer {} already exists",
                offer.offer_id
            )));
        }
        offers.insert(offer.offer_id, offer);
        Ok(())
    }

    fn update_offer(&self, offer: Offer) -> Result<()> {
        let mut offers = write(&self.offers)?;
        match offers.get_mut(&offer.offer_id) {
            Some(existing) => {
                *existing = offer;
                Ok(())
            }
            None => Err(AllocationError::NotFound(format!("offer {}", offer.offer_id))),
        }
    }
}
