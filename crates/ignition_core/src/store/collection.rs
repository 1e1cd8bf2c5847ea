//! Flat JSON collections stored under well-known keys.
//!
//! # Responsibility
//! - Read a collection as raw JSON records, degrading to empty on bad data.
//! - Decode raw records into typed entities, skipping undecodable ones.
//! - Write a collection back as one JSON array.
//!
//! # Invariants
//! - Absent or unparseable collections read as empty; this never errors.
//! - Raw records are returned verbatim so merges can preserve records this
//!   build cannot decode.

use super::{KeyValueStore, StoreResult};
use log::warn;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `Workspaces` collection.
pub const WORKSPACES_KEY: &str = "workspaces";
/// `AllBoards` collection, spanning every workspace.
pub const ALL_BOARDS_KEY: &str = "kanban_boards";
/// `AllCards` collection, spanning every workspace.
pub const ALL_CARDS_KEY: &str = "kanban_cards";
/// Currently selected workspace scalar.
pub const SELECTED_WORKSPACE_KEY: &str = "selected_workspace";

/// Field used to scope board/card records to a workspace.
pub const WORKSPACE_FIELD: &str = "workspaceId";

/// Reads one collection as raw JSON records.
pub fn read_raw_records<S: KeyValueStore>(store: &S, key: &str) -> StoreResult<Vec<Value>> {
    let Some(text) = store.get(key)? else {
        return Ok(Vec::new());
    };

    match serde_json::from_str::<Value>(&text) {
        Ok(Value::Array(records)) => Ok(records),
        Ok(Value::Null) => Ok(Vec::new()),
        Ok(_) => {
            warn!("event=store_decode module=store status=degraded key={key} reason=not_array");
            Ok(Vec::new())
        }
        Err(err) => {
            warn!(
                "event=store_decode module=store status=degraded key={key} reason=invalid_json error={err}"
            );
            Ok(Vec::new())
        }
    }
}

/// Decodes raw records, dropping the ones that do not match `T`.
pub fn decode_records<T: DeserializeOwned>(key: &str, raw: Vec<Value>) -> Vec<T> {
    let total = raw.len();
    let decoded: Vec<T> = raw
        .into_iter()
        .filter_map(|record| serde_json::from_value(record).ok())
        .collect();

    let skipped = total - decoded.len();
    if skipped > 0 {
        warn!(
            "event=store_decode module=store status=partial key={key} total={total} skipped={skipped}"
        );
    }
    decoded
}

/// Reads and decodes one collection.
pub fn read_records<S: KeyValueStore, T: DeserializeOwned>(
    store: &S,
    key: &str,
) -> StoreResult<Vec<T>> {
    Ok(decode_records(key, read_raw_records(store, key)?))
}

/// Writes raw records as one JSON array.
pub fn write_raw_records<S: KeyValueStore>(
    store: &S,
    key: &str,
    records: &[Value],
) -> StoreResult<()> {
    let text = serde_json::to_string(records)?;
    store.set(key, &text)
}

/// Encodes typed records to raw JSON values.
pub fn encode_records<T: Serialize>(records: &[T]) -> StoreResult<Vec<Value>> {
    records
        .iter()
        .map(|record| serde_json::to_value(record).map_err(Into::into))
        .collect()
}

/// Returns the workspace key of a raw board/card record, if it has one.
pub fn record_workspace_key(record: &Value) -> Option<&str> {
    record.get(WORKSPACE_FIELD).and_then(Value::as_str)
}

/// Returns the `id` of a raw record, if it has a string one.
pub fn record_id(record: &Value) -> Option<&str> {
    record.get("id").and_then(Value::as_str)
}

/// Returns whether a raw record decodes as `T`.
pub fn decodes_as<T: DeserializeOwned>(record: &Value) -> bool {
    T::deserialize(record).is_ok()
}
