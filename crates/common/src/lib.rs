use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// The four collections the backend persists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    User,
    Patient,
    Appointment,
    MedicalRecord,
}

impl Resource {
    /// Human label used in API messages ("User not found").
    pub fn label(self) -> &'static str {
        match self {
            Resource::User => "User",
            Resource::Patient => "Patient",
            Resource::Appointment => "Appointment",
            Resource::MedicalRecord => "Medical Record",
        }
    }

    /// Name of the backing JSON document.
    pub fn document(self) -> &'static str {
        match self {
            Resource::User => "Staff.json",
            Resource::Patient => "Patients.json",
            Resource::Appointment => "Appointments.json",
            Resource::MedicalRecord => "MedicalRecords.json",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A stored or submitted field: absent (`None`) or whatever JSON value was
/// sent, `null` included. Values are kept as received, never coerced.
pub type Field = Option<Value>;

/// Deserializes a present key as `Some`, so an explicit `null` survives.
pub fn present<'de, D>(deserializer: D) -> Result<Field, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

fn lenient_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(id_text(&value).unwrap_or_default())
}

/// Text of an id value: strings as is, numbers in decimal.
pub fn id_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// The field's text, when it holds a JSON string.
pub fn text(field: &Field) -> Option<&str> {
    field.as_ref().and_then(Value::as_str)
}

/// Absent, `null`, `false`, zero or the empty string.
pub fn is_blank(field: &Field) -> bool {
    match field {
        None | Some(Value::Null) => true,
        Some(Value::Bool(b)) => !b,
        Some(Value::Number(n)) => n.as_f64() == Some(0.0),
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

/// Staff member. Keys not modelled here survive in `extra`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct User {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: String,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub username: Field,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub role: Field,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub field: Field,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub dob: Field,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub location: Field,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub phone: Field,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub email: Field,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub password: Field,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Patient {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: String,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub username: Field,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub dob: Field,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub location: Field,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub phone_number: Field,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

pub const DEFAULT_APPOINTMENT_STATUS: &str = "Registered";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Appointment {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: String,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub username: Field,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub doctor: Field,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub condition: Field,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub description: Field,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub time: Field,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub status: Field,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub disabled: Field,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MedicalRecord {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: String,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub username: Field,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub doctor: Field,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub condition: Field,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub description: Field,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub time: Field,
    #[serde(
        rename = "finishedTime",
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub finished_time: Field,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub duration: Field,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ==== Request payloads ====
//
// Bodies are not validated: every listed key is taken as whatever JSON value
// was sent.

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserFields {
    #[serde(default, deserialize_with = "present")]
    pub username: Field,
    #[serde(default, deserialize_with = "present")]
    pub role: Field,
    #[serde(default, deserialize_with = "present")]
    pub field: Field,
    #[serde(default, deserialize_with = "present")]
    pub dob: Field,
    #[serde(default, deserialize_with = "present")]
    pub location: Field,
    #[serde(default, deserialize_with = "present")]
    pub phone: Field,
    #[serde(default, deserialize_with = "present")]
    pub email: Field,
    #[serde(default, deserialize_with = "present")]
    pub password: Field,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PatientFields {
    #[serde(default, deserialize_with = "present")]
    pub username: Field,
    #[serde(default, deserialize_with = "present")]
    pub dob: Field,
    #[serde(default, deserialize_with = "present")]
    pub location: Field,
    #[serde(default, deserialize_with = "present")]
    pub phone_number: Field,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppointmentFields {
    #[serde(rename = "appointmentId", default, deserialize_with = "present")]
    pub appointment_id: Field,
    #[serde(default, deserialize_with = "present")]
    pub username: Field,
    #[serde(default, deserialize_with = "present")]
    pub doctor: Field,
    #[serde(default, deserialize_with = "present")]
    pub condition: Field,
    #[serde(default, deserialize_with = "present")]
    pub description: Field,
    #[serde(default, deserialize_with = "present")]
    pub time: Field,
    #[serde(default, deserialize_with = "present")]
    pub status: Field,
    #[serde(default, deserialize_with = "present")]
    pub disabled: Field,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MedicalRecordFields {
    #[serde(rename = "appointmentId", default, deserialize_with = "present")]
    pub appointment_id: Field,
    #[serde(default, deserialize_with = "present")]
    pub username: Field,
    #[serde(default, deserialize_with = "present")]
    pub doctor: Field,
    #[serde(default, deserialize_with = "present")]
    pub condition: Field,
    #[serde(default, deserialize_with = "present")]
    pub description: Field,
    #[serde(default, deserialize_with = "present")]
    pub time: Field,
    #[serde(rename = "finishedTime", default, deserialize_with = "present")]
    pub finished_time: Field,
    #[serde(default, deserialize_with = "present")]
    pub duration: Field,
}

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("{0} not found")]
    NotFound(Resource),
    #[error("bad request: {0}")]
    BadRequest(String),
}

pub type AppResult<T> = Result<T, AppError>;
