//! Demo waitlist, donors and accounts loaded at start-up.

use chrono::{DateTime, Duration, Utc};

use crate::core::indices::{estimate_epts, estimate_kdpi, EptsFactors, KdpiFactors};
use crate::error::Result;
use crate::models::{
    BloodType, Donor, DonorStatus, GeoPoint, HlaTyping, Patient, PatientStatus, Role,
};
use crate::services::auth::UserAccount;
use crate::services::store::AllocationStore;

/// Procurement organisation both sample donors are recovered at
const OPO_LOCATION: GeoPoint = GeoPoint {
    latitude: 41.8781,
    longitude: -87.6298,
};

struct SamplePatient {
    id: &'static str,
    name: &'static str,
    age: u8,
    blood_type: BloodType,
    hla: [&'static str; 6],
    cpra: f64,
    wait_days: i64,
    diabetes: bool,
    prior_transplant: bool,
    dialysis_days: u32,
    location: GeoPoint,
    physician: &'static str,
}

const SAMPLE_PATIENTS: [SamplePatient; 4] = [
    SamplePatient {
        id: "P001",
        name: "John Anderson",
        age: 45,
        blood_type: BloodType::A,
        hla: ["A1", "A2", "B8", "B44", "DR3", "DR4"],
        cpra: 85.0,
        wait_days: 730,
        diabetes: true,
        prior_transplant: false,
        dialysis_days: 547,
        location: GeoPoint { latitude: 42.0451, longitude: -87.6877 },
        physician: "dr.smith",
    },
    SamplePatient {
        id: "P002",
        name: "Sarah Martinez",
        age: 32,
        blood_type: BloodType::O,
        hla: ["A3", "A24", "B7", "B35", "DR1", "DR15"],
        cpra: 95.0,
        wait_days: 1095,
        diabetes: false,
        prior_transplant: true,
        dialysis_days: 821,
        location: GeoPoint { latitude: 41.5250, longitude: -88.0817 },
        physician: "dr.johnson",
    },
    SamplePatient {
        id: "P003",
        name: "Michael Chen",
        age: 58,
        blood_type: BloodType::B,
        hla: ["A2", "A11", "B44", "B51", "DR4", "DR7"],
        cpra: 15.0,
        wait_days: 365,
        diabetes: false,
        prior_transplant: false,
        dialysis_days: 273,
        location: GeoPoint { latitude: 40.6936, longitude: -89.5890 },
        physician: "dr.smith",
    },
    SamplePatient {
        id: "P004",
        name: "Emily Thompson",
        age: 28,
        blood_type: BloodType::AB,
        hla: ["A1", "A3", "B8", "B7", "DR3", "DR1"],
        cpra: 42.0,
        wait_days: 180,
        diabetes: false,
        prior_transplant: false,
        dialysis_days: 91,
        location: GeoPoint { latitude: 42.2711, longitude: -89.0940 },
        physician: "dr.johnson",
    },
];

pub fn sample_patients(now: DateTime<Utc>) -> Vec<Patient> {
    let today = now.date_naive();

    SAMPLE_PATIENTS
        .iter()
        .map(|p| Patient {
            patient_id: p.id.to_string(),
            name: p.name.to_string(),
            blood_type: p.blood_type,
            hla: HlaTyping::from_panel(p.hla),
            cpra: p.cpra,
            wait_list_start: today - Duration::days(p.wait_days),
            age: p.age,
            epts: estimate_epts(&EptsFactors {
                age: p.age,
                diabetes: p.diabetes,
                prior_transplant: p.prior_transplant,
                dialysis_days: p.dialysis_days,
            }),
            location: p.location,
            status: PatientStatus::Active,
            physician_id: p.physician.to_string(),
        })
        .collect()
}

pub fn sample_donors(now: DateTime<Utc>) -> Vec<Donor> {
    let d001 = KdpiFactors {
        age: 42,
        height_in: 68.0,
        weight_lb: 170.0,
        hypertension: false,
        diabetes: false,
        creatinine: 1.1,
        hcv: false,
        dcd: false,
    };
    let d002 = KdpiFactors {
        age: 35,
        height_in: 65.0,
        weight_lb: 145.0,
        creatinine: 0.9,
        ..d001
    };

    vec![
        Donor {
            donor_id: "D001".to_string(),
            blood_type: BloodType::O,
            hla: HlaTyping::from_panel(["A1", "A2", "B8", "B35", "DR3", "DR15"]),
            age: d001.age,
            kdpi: estimate_kdpi(&d001),
            location: OPO_LOCATION,
            status: DonorStatus::Available,
            procured_at: Some(now),
        },
        Donor {
            donor_id: "D002".to_string(),
            blood_type: BloodType::A,
            hla: HlaTyping::from_panel(["A1", "A3", "B7", "B44", "DR4", "DR7"]),
            age: d002.age,
            kdpi: estimate_kdpi(&d002),
            location: OPO_LOCATION,
            status: DonorStatus::Available,
            procured_at: Some(now),
        },
    ]
}

/// Demo sign-in accounts
pub fn demo_accounts() -> Vec<UserAccount> {
    vec![
        UserAccount::new("dr.smith", "password123", Role::Physician),
        UserAccount::new("dr.johnson", "password123", Role::Physician),
        UserAccount::new("admin", "admin123", Role::Administrator),
    ]
}

/// Populate an empty store with the sample waitlist and donors
pub fn seed_store(store: &dyn AllocationStore, now: DateTime<Utc>) -> Result<()> {
    if !store.list_patients()?.is_empty() || !store.list_donors()?.is_empty() {
        tracing::debug!("Store already populated, skipping sample data");
        return Ok(());
    }

    let patients = sample_patients(now);
    let donors = sample_donors(now);
    let (patient_count, donor_count) = (patients.len(), donors.len());

    for patient in patients {
        store.upsert_patient(patient)?;
    }
    for donor in donors {
        store.upsert_donor(donor)?;
    }

    tracing::info!("Seeded {} patients and {} donors", patient_count, donor_count);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::store::InMemoryStore;

    #[test]
    fn test_sample_records_are_valid() {
        let now = Utc::now();
        for patient in sample_patients(now) {
            assert!(patient.validate_clinical().is_ok(), "{} invalid", patient.patient_id);
        }
        for donor in sample_donors(now) {
            assert!(donor.validate_clinical().is_ok(), "{} invalid", donor.donor_id);
        }
    }

    #[test]
    fn test_seed_is_idempotent() {
        let store = InMemoryStore::new();
        let now = Utc::now();

        seed_store(&store, now).unwrap();
        seed_store(&store, now).unwrap();

        assert_eq!(store.list_patients().unwrap().len(), 4);
        assert_eq!(store.list_donors().unwrap().len(), 2);
    }
}
