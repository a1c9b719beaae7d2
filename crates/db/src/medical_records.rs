use crate::collection::{load_collection, position, remove_by_id, save_collection};
use crate::search::Needle;
use crate::Db;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use common::{
    id_text, text, AppError, AppResult, Field, MedicalRecord, MedicalRecordFields, Resource,
};
use std::cmp::Ordering;
use tracing::info;

const RESOURCE: Resource = Resource::MedicalRecord;

const DATE_TIME_FORMATS: [&str; 6] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parses the timestamp shapes the front-end sends.
pub fn parse_time(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    DATE_TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Newest first; equal or unparseable times fall back to descending id.
/// Records without a usable time sort last.
fn newest_first(a: &MedicalRecord, b: &MedicalRecord) -> Ordering {
    let ta = text(&a.time).and_then(parse_time);
    let tb = text(&b.time).and_then(parse_time);
    tb.cmp(&ta).then_with(|| b.id.cmp(&a.id))
}

fn matches_query(record: &MedicalRecord, needle: &Needle<'_>) -> bool {
    needle.in_text(text(&record.username))
        || needle.in_text(text(&record.doctor))
        || needle.in_text(text(&record.condition))
        || needle.in_text(text(&record.description))
        || needle.in_exact(text(&record.time))
}

fn apply(record: &mut MedicalRecord, fields: MedicalRecordFields) {
    record.username = fields.username;
    record.doctor = fields.doctor;
    record.condition = fields.condition;
    record.description = fields.description;
    record.time = fields.time;
    record.finished_time = fields.finished_time;
    record.duration = fields.duration;
}

/// Search hits in stored order, or the whole collection newest first.
pub async fn list_medical_records(db: &Db, q: Option<&str>) -> Vec<MedicalRecord> {
    let _guard = db.lock(RESOURCE).await;
    let mut records: Vec<MedicalRecord> = load_collection(db, RESOURCE).await;
    match Needle::parse(q) {
        Some(needle) => records
            .into_iter()
            .filter(|r| matches_query(r, &needle))
            .collect(),
        None => {
            records.sort_by(newest_first);
            records
        }
    }
}

/// Stores a record under the id of the appointment it was created from.
pub async fn insert_medical_record(
    db: &Db,
    fields: MedicalRecordFields,
) -> AppResult<MedicalRecord> {
    let id = fields
        .appointment_id
        .as_ref()
        .and_then(id_text)
        .ok_or_else(|| AppError::BadRequest("appointmentId is required".into()))?;

    let _guard = db.lock(RESOURCE).await;
    let mut records: Vec<MedicalRecord> = load_collection(db, RESOURCE).await;

    let mut record = MedicalRecord {
        id,
        ..Default::default()
    };
    apply(&mut record, fields);

    records.push(record.clone());
    save_collection(db, RESOURCE, &records).await;
    info!(id = %record.id, "medical record created");
    Ok(record)
}

pub async fn update_medical_record(
    db: &Db,
    id: &str,
    fields: MedicalRecordFields,
) -> AppResult<MedicalRecord> {
    let _guard = db.lock(RESOURCE).await;
    let mut records: Vec<MedicalRecord> = load_collection(db, RESOURCE).await;
    let index = position(&records, id).ok_or(AppError::NotFound(RESOURCE))?;

    apply(&mut records[index], fields);
    save_collection(db, RESOURCE, &records).await;
    info!(id = %id, "medical record updated");
    Ok(records[index].clone())
}

pub async fn edit_medical_record_description(
    db: &Db,
    id: &str,
    description: Field,
) -> AppResult<MedicalRecord> {
    let _guard = db.lock(RESOURCE).await;
    let mut records: Vec<MedicalRecord> = load_collection(db, RESOURCE).await;
    let index = position(&records, id).ok_or(AppError::NotFound(RESOURCE))?;

    records[index].description = description;
    save_collection(db, RESOURCE, &records).await;
    info!(id = %id, "medical record description edited");
    Ok(records[index].clone())
}

pub async fn delete_medical_record(db: &Db, id: &str) -> AppResult<()> {
    let _guard = db.lock(RESOURCE).await;
    let mut records: Vec<MedicalRecord> = load_collection(db, RESOURCE).await;
    if !remove_by_id(&mut records, id) {
        return Err(AppError::NotFound(RESOURCE));
    }
    save_collection(db, RESOURCE, &records).await;
    info!(id = %id, "medical record deleted");
    Ok(())
}
