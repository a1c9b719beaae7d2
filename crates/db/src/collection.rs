//! Whole-collection load/save on top of a [`Storage`](crate::Storage).
//!
//! Failures never reach the caller: a collection that cannot be read is an
//! empty collection, and a write that fails is only logged.
//!
//! Records are decoded one by one. Field values are never type-checked, so
//! only an entry that is not a JSON object at all is dropped.

use crate::{Db, DbError};
use common::{Appointment, MedicalRecord, Patient, Resource, User};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::{debug, error, warn};

/// Records addressed by a string id.
pub trait Identified {
    fn id(&self) -> &str;
    fn id_mut(&mut self) -> &mut String;
}

macro_rules! identified {
    ($($ty:ty),*) => {
        $(impl Identified for $ty {
            fn id(&self) -> &str {
                &self.id
            }
            fn id_mut(&mut self) -> &mut String {
                &mut self.id
            }
        })*
    };
}

identified!(User, Patient, Appointment, MedicalRecord);

pub(crate) fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<Vec<T>, DbError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }
    let entries: Vec<Value> = serde_json::from_slice(bytes)?;
    let records = entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match serde_json::from_value(entry) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(index, error = %e, "skipping unreadable entry");
                None
            }
        })
        .collect();
    Ok(records)
}

pub(crate) fn encode<T: Serialize>(records: &[T]) -> Result<Vec<u8>, DbError> {
    Ok(serde_json::to_vec_pretty(records)?)
}

/// Reads the full collection for `resource`.
///
/// A missing medical-records document is created empty on first read.
pub async fn load_collection<T: DeserializeOwned>(db: &Db, resource: Resource) -> Vec<T> {
    let document = resource.document();
    match db.storage().read(document).await {
        Ok(Some(bytes)) => match decode(&bytes) {
            Ok(records) => records,
            Err(e) => {
                error!(%resource, document, error = %e, "failed to parse collection");
                Vec::new()
            }
        },
        Ok(None) if resource == Resource::MedicalRecord => {
            warn!(%resource, document, "collection not found, creating an empty one");
            save_collection::<Value>(db, resource, &[]).await;
            Vec::new()
        }
        Ok(None) => {
            error!(%resource, document, "collection not found");
            Vec::new()
        }
        Err(e) => {
            error!(%resource, document, error = %e, "failed to read collection");
            Vec::new()
        }
    }
}

/// Writes the full collection for `resource`, replacing the stored document.
pub async fn save_collection<T: Serialize>(db: &Db, resource: Resource, records: &[T]) {
    let document = resource.document();
    let bytes = match encode(records) {
        Ok(bytes) => bytes,
        Err(e) => {
            error!(%resource, document, error = %e, "failed to serialize collection");
            return;
        }
    };
    match db.storage().write(document, bytes).await {
        Ok(()) => debug!(%resource, document, len = records.len(), "collection written"),
        Err(e) => error!(%resource, document, error = %e, "failed to write collection"),
    }
}

pub(crate) fn position<T: Identified>(records: &[T], id: &str) -> Option<usize> {
    records.iter().position(|r| r.id() == id)
}

/// Drops every record with `id`; returns whether anything was removed.
pub(crate) fn remove_by_id<T: Identified>(records: &mut Vec<T>, id: &str) -> bool {
    let before = records.len();
    records.retain(|r| r.id() != id);
    records.len() < before
}
