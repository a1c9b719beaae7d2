use crate::collection::{load_collection, position, remove_by_id, save_collection};
use crate::ids::{self, Strategy, PATIENT_PREFIX};
use crate::search::Needle;
use crate::Db;
use common::{text, AppError, AppResult, Patient, PatientFields, Resource};
use tracing::info;

const RESOURCE: Resource = Resource::Patient;

fn matches_query(patient: &Patient, needle: &Needle<'_>) -> bool {
    needle.in_text(text(&patient.username))
        || needle.in_exact(text(&patient.dob))
        || needle.in_text(text(&patient.location))
        || needle.in_exact(text(&patient.phone_number))
}

fn apply(patient: &mut Patient, fields: PatientFields) {
    patient.username = fields.username;
    patient.dob = fields.dob;
    patient.location = fields.location;
    patient.phone_number = fields.phone_number;
}

pub async fn list_patients(db: &Db, q: Option<&str>) -> Vec<Patient> {
    let patients: Vec<Patient> = load_collection(db, RESOURCE).await;
    match Needle::parse(q) {
        Some(needle) => patients
            .into_iter()
            .filter(|p| matches_query(p, &needle))
            .collect(),
        None => patients,
    }
}

pub async fn insert_patient(db: &Db, fields: PatientFields) -> AppResult<Patient> {
    let _guard = db.lock(RESOURCE).await;
    let mut patients: Vec<Patient> = load_collection(db, RESOURCE).await;

    let mut patient = Patient {
        id: ids::allocate(
            PATIENT_PREFIX,
            Strategy::Count,
            patients.iter().map(|p| p.id.as_str()),
        ),
        ..Default::default()
    };
    apply(&mut patient, fields);

    patients.push(patient.clone());
    save_collection(db, RESOURCE, &patients).await;
    info!(id = %patient.id, "patient created");
    Ok(patient)
}

pub async fn update_patient(db: &Db, id: &str, fields: PatientFields) -> AppResult<Patient> {
    let _guard = db.lock(RESOURCE).await;
    let mut patients: Vec<Patient> = load_collection(db, RESOURCE).await;
    let index = position(&patients, id).ok_or(AppError::NotFound(RESOURCE))?;

    apply(&mut patients[index], fields);
    save_collection(db, RESOURCE, &patients).await;
    info!(id = %id, "patient updated");
    Ok(patients[index].clone())
}

/// Removes the patient and renumbers the survivors `P-1..P-n` in order.
pub async fn delete_patient(db: &Db, id: &str) -> AppResult<()> {
    let _guard = db.lock(RESOURCE).await;
    let mut patients: Vec<Patient> = load_collection(db, RESOURCE).await;
    if !remove_by_id(&mut patients, id) {
        return Err(AppError::NotFound(RESOURCE));
    }
    save_collection(db, RESOURCE, &patients).await;

    ids::renumber(&mut patients, |_| Some(((), PATIENT_PREFIX.to_string())));
    save_collection(db, RESOURCE, &patients).await;
    info!(id = %id, remaining = patients.len(), "patient deleted, ids reassigned");
    Ok(())
}
