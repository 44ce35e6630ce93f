// Criterion benchmarks for kidney matching

use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use kidney_match::core::{compatibility::count_hla_matches, distance::haversine_miles, Matcher};
use kidney_match::models::{
    BloodType, Donor, DonorStatus, GeoPoint, HlaTyping, Patient, PatientStatus,
};

const BLOOD_TYPES: [BloodType; 4] = [BloodType::O, BloodType::A, BloodType::B, BloodType::AB];
const ANTIGENS_A: [&str; 6] = ["A1", "A2", "A3", "A11", "A24", "A68"];
const ANTIGENS_B: [&str; 6] = ["B7", "B8", "B35", "B44", "B51", "B57"];
const ANTIGENS_DR: [&str; 6] = ["DR1", "DR3", "DR4", "DR7", "DR11", "DR15"];

fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
}

fn typing(seed: usize) -> HlaTyping {
    HlaTyping::from_panel([
        ANTIGENS_A[seed % 6],
        ANTIGENS_A[(seed / 6) % 6],
        ANTIGENS_B[(seed / 2) % 6],
        ANTIGENS_B[(seed / 3) % 6],
        ANTIGENS_DR[(seed / 5) % 6],
        ANTIGENS_DR[(seed / 7) % 6],
    ])
}

fn create_patient(id: usize) -> Patient {
    let offset = (id as f64 * 0.01) % 5.0;
    Patient {
        patient_id: format!("P{:05}", id),
        name: format!("Patient {}", id),
        blood_type: BLOOD_TYPES[id % 4],
        hla: typing(id),
        cpra: (id % 100) as f64,
        wait_list_start: as_of() - Duration::days((id * 37 % 2500) as i64),
        age: 18 + (id % 60) as u8,
        epts: (id * 13 % 100) as f64,
        location: GeoPoint::new(41.8781 - offset, -87.6298 + offset),
        status: PatientStatus::Active,
        physician_id: format!("dr.{}", id % 5),
    }
}

fn create_donor(id: usize) -> Donor {
    Donor {
        donor_id: format!("D{:03}", id),
        blood_type: BLOOD_TYPES[id % 4],
        hla: typing(id * 11 + 3),
        age: 20 + (id * 7 % 50) as u8,
        kdpi: (id * 17 % 100) as f64,
        location: GeoPoint::new(41.8781, -87.6298),
        status: DonorStatus::Available,
        procured_at: None,
    }
}

fn bench_haversine_miles(c: &mut Criterion) {
    let chicago = GeoPoint::new(41.8781, -87.6298);
    let st_louis = GeoPoint::new(38.6270, -90.1994);

    c.bench_function("haversine_miles", |b| {
        b.iter(|| haversine_miles(black_box(chicago), black_box(st_louis)));
    });
}

fn bench_hla_matching(c: &mut Criterion) {
    let patient = typing(1);
    let donor = typing(42);

    c.bench_function("count_hla_matches", |b| {
        b.iter(|| count_hla_matches(black_box(&patient), black_box(&donor)));
    });
}

fn bench_score_pair(c: &mut Criterion) {
    let matcher = Matcher::with_default_weights();
    let patient = create_patient(0);
    let donor = create_donor(0);

    c.bench_function("score_pair", |b| {
        b.iter(|| matcher.score_pair(black_box(&patient), black_box(&donor), as_of()));
    });
}

fn bench_ranking(c: &mut Criterion) {
    let matcher = Matcher::with_default_weights();
    let donors: Vec<Donor> = (0..4).map(create_donor).collect();

    let mut group = c.benchmark_group("ranking");

    for patient_count in [10, 50, 100, 500, 1000].iter() {
        let patients: Vec<Patient> = (0..*patient_count).map(create_patient).collect();

        group.bench_with_input(
            BenchmarkId::new("rank_all", patient_count),
            patient_count,
            |b, _| {
                b.iter(|| matcher.rank_all(black_box(&donors), black_box(&patients), as_of()));
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_haversine_miles,
    bench_hla_matching,
    bench_score_pair,
    bench_ranking
);

criterion_main!(benches);
