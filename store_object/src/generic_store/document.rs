//! Document preparation shared by every repository backend
//!
//! Creates and updates both go through these helpers so that id assignment,
//! timestamps and validation behave the same in PostgreSQL and in memory.

use crate::errors::StoreError;
use crate::traits::Entity;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use uuid::Uuid;

pub const ID_FIELD: &str = "id";
pub const CREATED_AT_FIELD: &str = "createdAt";
pub const UPDATED_AT_FIELD: &str = "updatedAt";

/// Serialize an entity to its JSON object form
pub fn to_document<E: Entity>(entity: &E) -> Result<Map<String, Value>, StoreError> {
    match serde_json::to_value(entity)? {
        Value::Object(map) => Ok(map),
        other => Err(StoreError::validation(format!(
            "{} must serialize to a JSON object, got {}",
            E::POLICY.entity,
            other
        ))),
    }
}

/// Deserialize a stored document, reporting shape mismatches as validation errors
pub fn from_document<E: Entity>(document: Value) -> Result<E, StoreError> {
    serde_json::from_value(document)
        .map_err(|err| StoreError::validation(format!("invalid {}: {}", E::POLICY.entity, err)))
}

fn timestamp(now: DateTime<Utc>) -> Result<Value, StoreError> {
    Ok(serde_json::to_value(now)?)
}

/// Document for a new record: id assigned if empty, both timestamps set to `now`
pub fn prepare_new<E: Entity>(entity: &E, now: DateTime<Utc>) -> Result<(String, Value), StoreError> {
    let mut document = to_document(entity)?;

    let id = match document.get(ID_FIELD).and_then(Value::as_str) {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => Uuid::new_v4().to_string(),
    };
    document.insert(ID_FIELD.to_string(), Value::String(id.clone()));

    let stamp = timestamp(now)?;
    document.insert(CREATED_AT_FIELD.to_string(), stamp.clone());
    document.insert(UPDATED_AT_FIELD.to_string(), stamp);

    let document = Value::Object(document);
    from_document::<E>(document.clone())?;
    Ok((id, document))
}

/// Merge a change object into a stored document
///
/// Top-level members of `changes` replace those of `current`. The id and
/// creation time cannot change; `updatedAt` is refreshed. The result must
/// still deserialize into `E`.
pub fn apply_changes<E: Entity>(
    current: Value,
    id: &str,
    changes: Value,
    now: DateTime<Utc>,
) -> Result<(E, Value), StoreError> {
    let Value::Object(changes) = changes else {
        return Err(StoreError::validation("changes must be a JSON object"));
    };
    let Value::Object(mut document) = current else {
        return Err(StoreError::validation(format!(
            "stored {} '{}' is not a JSON object",
            E::POLICY.entity,
            id
        )));
    };

    for (field, value) in changes {
        match field.as_str() {
            ID_FIELD => {
                if value.as_str() != Some(id) {
                    return Err(StoreError::validation(format!(
                        "{} id cannot be changed",
                        E::POLICY.entity
                    )));
                }
            }
            CREATED_AT_FIELD => {}
            _ => {
                document.insert(field, value);
            }
        }
    }
    document.insert(UPDATED_AT_FIELD.to_string(), timestamp(now)?);

    let document = Value::Object(document);
    let entity = from_document::<E>(document.clone())?;
    Ok((entity, document))
}
