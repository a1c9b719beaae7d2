pub mod appointments;
pub mod auth;
pub mod medical_records;
pub mod patients;
pub mod users;
