use crate::collection::{load_collection, position, remove_by_id, save_collection};
use crate::ids::{self, Strategy, APPOINTMENT_PREFIX};
use crate::search::Needle;
use crate::Db;
use common::{
    id_text, is_blank, text, AppError, AppResult, Appointment, AppointmentFields, Field,
    MedicalRecord, Resource, DEFAULT_APPOINTMENT_STATUS,
};
use serde_json::Value;
use tracing::info;

const RESOURCE: Resource = Resource::Appointment;

fn matches_query(appointment: &Appointment, needle: &Needle<'_>) -> bool {
    needle.in_text(text(&appointment.username))
        || needle.in_text(text(&appointment.doctor))
        || needle.in_text(text(&appointment.condition))
        || needle.in_text(text(&appointment.description))
        || needle.in_exact(text(&appointment.time))
        || needle.in_text(text(&appointment.status))
}

/// Appointment ids share their numeric space with medical-record ids, so a
/// record created from an appointment never collides with a new appointment.
fn next_appointment_id(appointments: &[Appointment], records: &[MedicalRecord]) -> String {
    ids::allocate(
        APPOINTMENT_PREFIX,
        Strategy::GapFill,
        appointments
            .iter()
            .map(|a| a.id.as_str())
            .chain(records.iter().map(|r| r.id.as_str())),
    )
}

/// Loads the collection, applies `mutate` to the appointment with `id`, saves.
async fn modify<F>(db: &Db, id: &str, mutate: F) -> AppResult<Appointment>
where
    F: FnOnce(&mut Appointment),
{
    let _guard = db.lock(RESOURCE).await;
    let mut appointments: Vec<Appointment> = load_collection(db, RESOURCE).await;
    let index = position(&appointments, id).ok_or(AppError::NotFound(RESOURCE))?;

    mutate(&mut appointments[index]);
    save_collection(db, RESOURCE, &appointments).await;
    Ok(appointments[index].clone())
}

pub async fn list_appointments(db: &Db, q: Option<&str>) -> Vec<Appointment> {
    let appointments: Vec<Appointment> = load_collection(db, RESOURCE).await;
    match Needle::parse(q) {
        Some(needle) => appointments
            .into_iter()
            .filter(|a| matches_query(a, &needle))
            .collect(),
        None => appointments,
    }
}

/// Creates an appointment. A non-blank string or numeric `appointmentId` is
/// used as the id; status and `disabled` always start at their defaults.
pub async fn insert_appointment(db: &Db, fields: AppointmentFields) -> AppResult<Appointment> {
    let _guard = db.lock(RESOURCE).await;
    let mut appointments: Vec<Appointment> = load_collection(db, RESOURCE).await;

    let explicit = if is_blank(&fields.appointment_id) {
        None
    } else {
        fields.appointment_id.as_ref().and_then(id_text)
    };
    let id = match explicit {
        Some(id) => id,
        None => {
            let records: Vec<MedicalRecord> = {
                let _records_guard = db.lock(Resource::MedicalRecord).await;
                load_collection(db, Resource::MedicalRecord).await
            };
            next_appointment_id(&appointments, &records)
        }
    };

    let appointment = Appointment {
        id,
        username: fields.username,
        doctor: fields.doctor,
        condition: fields.condition,
        description: fields.description,
        time: fields.time,
        status: Some(Value::from(DEFAULT_APPOINTMENT_STATUS)),
        disabled: Some(Value::Bool(false)),
        ..Default::default()
    };

    appointments.push(appointment.clone());
    save_collection(db, RESOURCE, &appointments).await;
    info!(id = %appointment.id, "appointment created");
    Ok(appointment)
}

pub async fn update_appointment(
    db: &Db,
    id: &str,
    fields: AppointmentFields,
) -> AppResult<Appointment> {
    let updated = modify(db, id, |a| {
        a.username = fields.username;
        a.doctor = fields.doctor;
        a.condition = fields.condition;
        a.description = fields.description;
        a.time = fields.time;
        a.status = fields.status;
        a.disabled = fields.disabled;
    })
    .await?;
    info!(id = %id, "appointment updated");
    Ok(updated)
}

pub async fn update_appointment_status(
    db: &Db,
    id: &str,
    status: Field,
) -> AppResult<Appointment> {
    let updated = modify(db, id, |a| a.status = status).await?;
    info!(id = %id, status = ?updated.status, "appointment status changed");
    Ok(updated)
}

pub async fn update_appointment_time(
    db: &Db,
    id: &str,
    time: Field,
) -> AppResult<Appointment> {
    let updated = modify(db, id, |a| a.time = time).await?;
    info!(id = %id, time = ?updated.time, "appointment rescheduled");
    Ok(updated)
}

/// Removes the appointment. Other appointment ids are left as they are.
pub async fn delete_appointment(db: &Db, id: &str) -> AppResult<()> {
    let _guard = db.lock(RESOURCE).await;
    let mut appointments: Vec<Appointment> = load_collection(db, RESOURCE).await;
    if !remove_by_id(&mut appointments, id) {
        return Err(AppError::NotFound(RESOURCE));
    }
    save_collection(db, RESOURCE, &appointments).await;
    info!(id = %id, "appointment deleted");
    Ok(())
}
