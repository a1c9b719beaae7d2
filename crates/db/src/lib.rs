use common::Resource;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};

pub mod appointments;
pub mod collection;
pub mod ids;
pub mod medical_records;
pub mod patients;
mod search;
pub mod storage;
pub mod users;

pub use appointments::{
    delete_appointment, insert_appointment, list_appointments, update_appointment,
    update_appointment_status, update_appointment_time,
};
pub use collection::{load_collection, save_collection};
pub use medical_records::{
    delete_medical_record, edit_medical_record_description, insert_medical_record,
    list_medical_records, update_medical_record,
};
pub use patients::{delete_patient, insert_patient, list_patients, update_patient};
pub use storage::{FileStorage, MemoryStorage, Storage};
pub use users::{delete_user, insert_user, list_users, update_user};

#[derive(thiserror::Error, Debug)]
pub enum DbError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Handle to the four JSON collections.
///
/// Cloning is cheap; clones share the backend and the per-resource locks, so a
/// read-modify-write on one collection never interleaves with another on the
/// same collection inside this process.
#[derive(Clone)]
pub struct Db {
    storage: Arc<dyn Storage>,
    locks: Arc<Locks>,
}

#[derive(Default)]
struct Locks {
    users: Mutex<()>,
    patients: Mutex<()>,
    appointments: Mutex<()>,
    medical_records: Mutex<()>,
}

impl Db {
    pub fn new(storage: impl Storage + 'static) -> Self {
        Self {
            storage: Arc::new(storage),
            locks: Arc::new(Locks::default()),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(MemoryStorage::default())
    }

    pub fn storage(&self) -> &dyn Storage {
        self.storage.as_ref()
    }

    pub(crate) async fn lock(&self, resource: Resource) -> MutexGuard<'_, ()> {
        let lock = match resource {
            Resource::User => &self.locks.users,
            Resource::Patient => &self.locks.patients,
            Resource::Appointment => &self.locks.appointments,
            Resource::MedicalRecord => &self.locks.medical_records,
        };
        lock.lock().await
    }
}

impl std::fmt::Debug for Db {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Db").finish_non_exhaustive()
    }
}

/// Opens the file-backed store rooted at `data_dir`, creating the directory.
pub async fn connect(data_dir: impl AsRef<Path>) -> Result<Db, DbError> {
    let storage = FileStorage::open(data_dir).await?;
    Ok(Db::new(storage))
}
